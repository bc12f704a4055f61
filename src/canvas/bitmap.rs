//! In-memory RGB canvas with changed-region tracking.
//!
//! Exports render into a `Bitmap` and hand its bytes to an encoder. Interactive
//! front ends can instead render into a `Bitmap` and [`flush`](Bitmap::flush)
//! only the rectangle that changed since the previous flush onto their display.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::PlotResult;
use crate::error::validate_size;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    /// Expand the dirty region to include the given pixel coordinate.
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Create a new dirty rect covering a single pixel.
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }
}

/// Heap-allocated `width x height` canvas implementing `DrawTarget<Color = Rgb888>`.
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<Rgb888>,
    dirty: Option<DirtyRect>,
}

impl Bitmap {
    /// Allocate a bitmap filled with black pixels.
    ///
    /// Fails with `InvalidArgument` before allocating when either side is zero.
    pub fn new(width: u32, height: u32) -> PlotResult<Self> {
        validate_size(width, height)?;

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels: vec![Rgb888::BLACK; width as usize * height as usize],
            dirty: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    /// Colour at a pixel, `None` outside the bitmap
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Row-major `R, G, B` bytes
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| [color.r(), color.g(), color.b()])
            .collect()
    }

    /// Rectangle containing every pixel changed since the last flush
    pub fn dirty_region(&self) -> Option<Rectangle> {
        self.dirty.map(|rect| {
            Rectangle::new(
                Point::new(rect.min_x as i32, rect.min_y as i32),
                Size::new(
                    (rect.max_x - rect.min_x + 1) as u32,
                    (rect.max_y - rect.min_y + 1) as u32,
                ),
            )
        })
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb888) {
        let idx = y * self.width + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Copy the dirty region onto another draw target, then reset the dirty state.
    ///
    /// If nothing changed, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let Some(area) = self.dirty_region() else {
            return Ok(());
        };
        self.dirty = None;

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, area.top_left.x, area.top_left.y
        );

        let pixels = &self.pixels;
        let stride = self.width;
        let min_x = area.top_left.x as usize;
        let min_y = area.top_left.y as usize;
        let width = area.size.width as usize;
        let height = area.size.height as usize;
        let pixel_iter = (min_y..min_y + height).flat_map(move |y| {
            let row_start = y * stride + min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for Bitmap {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as usize) < self.width
                && (coord.y as usize) < self.height
            {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.is_zero_sized() {
            return Ok(());
        }

        let x_start = area.top_left.x as usize;
        let y_start = area.top_left.y as usize;
        let x_end = x_start + area.size.width as usize;
        let y_end = y_start + area.size.height as usize;

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlotError;

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            Bitmap::new(0, 10),
            Err(PlotError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Bitmap::new(10, 0),
            Err(PlotError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn fill_solid_clamps_to_bounds() {
        let mut bitmap = Bitmap::new(4, 3).unwrap();
        bitmap
            .fill_solid(
                &Rectangle::new(Point::new(-2, 1), Size::new(10, 10)),
                Rgb888::WHITE,
            )
            .unwrap();

        assert_eq!(bitmap.pixel(0, 0), Some(Rgb888::BLACK));
        assert_eq!(bitmap.pixel(3, 2), Some(Rgb888::WHITE));
        assert_eq!(bitmap.pixel(4, 2), None);
        assert_eq!(
            bitmap.dirty_region(),
            Some(Rectangle::new(Point::new(0, 1), Size::new(4, 2)))
        );
    }

    #[test]
    fn flush_copies_only_changed_pixels() {
        let mut source = Bitmap::new(6, 6).unwrap();
        let mut target = Bitmap::new(6, 6).unwrap();

        source
            .draw_iter([
                Pixel(Point::new(1, 2), Rgb888::RED),
                Pixel(Point::new(3, 4), Rgb888::BLUE),
            ])
            .unwrap();
        source.flush(&mut target).unwrap();

        assert!(source.dirty_region().is_none());
        assert_eq!(target.pixel(1, 2), Some(Rgb888::RED));
        assert_eq!(target.pixel(3, 4), Some(Rgb888::BLUE));
        assert_eq!(
            target.dirty_region(),
            Some(Rectangle::new(Point::new(1, 2), Size::new(3, 3)))
        );
    }

    #[test]
    fn rgb_bytes_are_row_major() {
        let mut bitmap = Bitmap::new(2, 1).unwrap();
        bitmap
            .draw_iter([Pixel(Point::new(1, 0), Rgb888::new(1, 2, 3))])
            .unwrap();
        assert_eq!(bitmap.to_rgb_bytes(), vec![0, 0, 0, 1, 2, 3]);
    }
}
