//! Drawing surfaces
//!
//! [`Canvas`] is the object-safe sink a render pass draws into; every
//! embedded-graphics `DrawTarget<Color = Rgb888>` already is one. [`Surface`]
//! wraps a canvas for the duration of a single render and adds clipping and
//! high-DPI scaling on top of it. Plottables, grids and panels draw onto a
//! `Surface` with ordinary embedded-graphics primitives.

pub mod bitmap;

use core::fmt::Debug;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use thiserror_no_std::Error;

pub use bitmap::Bitmap;

/// Failure reported by a canvas
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CanvasError {
    message: String,
}

impl CanvasError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Sink for draw primitives
pub trait Canvas {
    /// Size of the canvas in physical pixels
    fn size(&self) -> Size;

    /// Set individual pixels; pixels outside the canvas are ignored
    fn draw_pixels(
        &mut self,
        pixels: &mut dyn Iterator<Item = Pixel<Rgb888>>,
    ) -> Result<(), CanvasError>;

    /// Fill an axis-aligned rectangle with a solid colour
    fn fill_rect(&mut self, area: &Rectangle, color: Rgb888) -> Result<(), CanvasError>;
}

impl<D> Canvas for D
where
    D: DrawTarget<Color = Rgb888>,
    D::Error: Debug,
{
    fn size(&self) -> Size {
        self.bounding_box().size
    }

    fn draw_pixels(
        &mut self,
        pixels: &mut dyn Iterator<Item = Pixel<Rgb888>>,
    ) -> Result<(), CanvasError> {
        self.draw_iter(pixels)
            .map_err(|e| CanvasError::new(format!("{e:?}")))
    }

    fn fill_rect(&mut self, area: &Rectangle, color: Rgb888) -> Result<(), CanvasError> {
        self.fill_solid(area, color)
            .map_err(|e| CanvasError::new(format!("{e:?}")))
    }
}

/// A canvas borrowed for one render pass
///
/// Coordinates given to a `Surface` are logical pixels. Each logical pixel
/// covers a `scale_factor`-sized block of the underlying canvas.
pub struct Surface<'a> {
    canvas: &'a mut dyn Canvas,
    scale_factor: f32,
    clip: Option<Rectangle>,
}

impl<'a> Surface<'a> {
    pub fn new(canvas: &'a mut dyn Canvas, scale_factor: f32) -> Self {
        Self {
            canvas,
            scale_factor,
            clip: None,
        }
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Canvas size divided by the scale factor
    pub fn logical_size(&self) -> Size {
        let physical = self.canvas.size();
        Size::new(
            (physical.width as f32 / self.scale_factor).floor() as u32,
            (physical.height as f32 / self.scale_factor).floor() as u32,
        )
    }

    /// Current clip rectangle in logical pixels
    pub fn clip(&self) -> Option<Rectangle> {
        self.clip
    }

    /// Run `draw` with drawing restricted to `area`
    ///
    /// Nested clips intersect. The previous clip is restored before
    /// returning, whether `draw` succeeded or not.
    pub fn with_clip<T, E>(
        &mut self,
        area: Rectangle,
        draw: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let clipped = match self.clip {
            Some(current) => current.intersection(&area),
            None => area,
        };
        let previous = self.clip.replace(clipped);
        let result = draw(self);
        self.clip = previous;
        result
    }

    fn physical_rect(&self, logical: &Rectangle) -> Rectangle {
        let s = self.scale_factor;
        let x0 = (logical.top_left.x as f32 * s).floor() as i32;
        let y0 = (logical.top_left.y as f32 * s).floor() as i32;
        let x1 = ((logical.top_left.x + logical.size.width as i32) as f32 * s).floor() as i32;
        let y1 = ((logical.top_left.y + logical.size.height as i32) as f32 * s).floor() as i32;

        Rectangle::new(
            Point::new(x0, y0),
            Size::new((x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32),
        )
    }
}

impl Dimensions for Surface<'_> {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.logical_size())
    }
}

impl DrawTarget for Surface<'_> {
    type Color = Rgb888;
    type Error = CanvasError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let clip = self.clip;
        let visible = move |pixel: &Pixel<Rgb888>| clip.is_none_or(|c| c.contains(pixel.0));

        if self.scale_factor == 1.0 {
            let mut iter = pixels.into_iter().filter(visible);
            return self.canvas.draw_pixels(&mut iter);
        }

        for pixel in pixels.into_iter().filter(visible) {
            let block = self.physical_rect(&Rectangle::new(pixel.0, Size::new(1, 1)));
            if !block.is_zero_sized() {
                self.canvas.fill_rect(&block, pixel.1)?;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = match self.clip {
            Some(clip) => area.intersection(&clip),
            None => *area,
        };
        if area.is_zero_sized() {
            return Ok(());
        }

        let physical = self.physical_rect(&area);
        self.canvas.fill_rect(&physical, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_discards_outside_pixels_and_restores() {
        let mut bitmap = Bitmap::new(10, 10).unwrap();
        let mut surface = Surface::new(&mut bitmap, 1.0);

        let clip = Rectangle::new(Point::new(2, 2), Size::new(3, 3));
        surface
            .with_clip(clip, |s| s.fill_solid(&s.bounding_box(), Rgb888::RED))
            .unwrap();
        assert!(surface.clip().is_none());

        drop(surface);
        assert_eq!(bitmap.pixel(2, 2), Some(Rgb888::RED));
        assert_eq!(bitmap.pixel(4, 4), Some(Rgb888::RED));
        assert_eq!(bitmap.pixel(5, 5), Some(Rgb888::BLACK));
        assert_eq!(bitmap.pixel(0, 0), Some(Rgb888::BLACK));
    }

    #[test]
    fn clip_is_restored_after_failure() {
        let mut bitmap = Bitmap::new(4, 4).unwrap();
        let mut surface = Surface::new(&mut bitmap, 1.0);

        let result: Result<(), CanvasError> = surface.with_clip(
            Rectangle::new(Point::zero(), Size::new(1, 1)),
            |_| Err(CanvasError::new("boom")),
        );
        assert!(result.is_err());
        assert!(surface.clip().is_none());
    }

    #[test]
    fn scale_factor_expands_pixels_into_blocks() {
        let mut bitmap = Bitmap::new(8, 8).unwrap();
        let mut surface = Surface::new(&mut bitmap, 2.0);
        assert_eq!(surface.logical_size(), Size::new(4, 4));

        surface
            .draw_iter([Pixel(Point::new(1, 1), Rgb888::GREEN)])
            .unwrap();
        drop(surface);

        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            assert_eq!(bitmap.pixel(x, y), Some(Rgb888::GREEN));
        }
        assert_eq!(bitmap.pixel(1, 1), Some(Rgb888::BLACK));
        assert_eq!(bitmap.pixel(4, 4), Some(Rgb888::BLACK));
    }
}
