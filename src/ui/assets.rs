//! Display assets: decoded raster images and their surface-resolution cache.

use alloc::{vec, vec::Vec};

use embedded_graphics::{
    geometry::Size,
    pixelcolor::{Rgb565, RgbColor},
};

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Pixel buffer length does not match the declared dimensions.
    PixelCountMismatch,
}

/// A decoded raster image with optional color-key transparency.
///
/// Hand images are drawn over the background, so pixels matching the key
/// color are skipped when blitting.
#[derive(Clone)]
pub struct RasterImage {
    size: Size,
    pixels: Vec<Rgb565>,
    transparent: Option<Rgb565>,
}

impl RasterImage {
    /// Wrap decoded pixel data, row-major, `width * height` entries long.
    pub fn from_pixels(size: Size, pixels: Vec<Rgb565>) -> Result<Self, Error> {
        if pixels.len() != (size.width * size.height) as usize {
            return Err(Error::PixelCountMismatch);
        }
        Ok(Self {
            size,
            pixels,
            transparent: None,
        })
    }

    /// An image of a single solid color.
    pub fn filled(size: Size, color: Rgb565) -> Self {
        Self {
            size,
            pixels: vec![color; (size.width * size.height) as usize],
            transparent: None,
        }
    }

    /// Treat `color` as fully transparent when blitting.
    pub fn with_transparent(mut self, color: Rgb565) -> Self {
        self.transparent = Some(color);
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Raw pixel data, row-major.
    pub fn data(&self) -> &[Rgb565] {
        &self.pixels
    }

    /// Pixel at `(x, y)`; `None` outside the image or on the key color.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if x < 0 || y < 0 || x >= self.size.width as i32 || y >= self.size.height as i32 {
            return None;
        }
        let color = self.raw(x as u32, y as u32);
        if self.transparent == Some(color) {
            None
        } else {
            Some(color)
        }
    }

    fn raw(&self, x: u32, y: u32) -> Rgb565 {
        self.pixels[(y * self.size.width + x) as usize]
    }

    /// Bilinearly filtered copy at `size`.
    pub fn scaled(&self, size: Size) -> Self {
        if self.size.width == 0 || self.size.height == 0 {
            let fill = self.transparent.unwrap_or(Rgb565::BLACK);
            return Self {
                size,
                pixels: vec![fill; (size.width * size.height) as usize],
                transparent: self.transparent,
            };
        }

        let step_x = self.size.width as f32 / size.width as f32;
        let step_y = self.size.height as f32 / size.height as f32;
        let mut pixels = Vec::with_capacity((size.width * size.height) as usize);
        for y in 0..size.height {
            for x in 0..size.width {
                // Center-of-pixel mapping keeps edges stable when scaling
                // in either direction.
                let u = (x as f32 + 0.5) * step_x - 0.5;
                let v = (y as f32 + 0.5) * step_y - 0.5;
                pixels.push(self.sample_bilinear(u, v));
            }
        }
        Self {
            size,
            pixels,
            transparent: self.transparent,
        }
    }

    fn sample_bilinear(&self, u: f32, v: f32) -> Rgb565 {
        let u = u.clamp(0.0, (self.size.width - 1) as f32);
        let v = v.clamp(0.0, (self.size.height - 1) as f32);

        let x0 = u as u32;
        let y0 = v as u32;
        let x1 = (x0 + 1).min(self.size.width - 1);
        let y1 = (y0 + 1).min(self.size.height - 1);
        let fx = u - x0 as f32;
        let fy = v - y0 as f32;

        // Transparency follows the nearest sample so the key color keeps a
        // hard edge.
        let nearest = self.raw(
            if fx < 0.5 { x0 } else { x1 },
            if fy < 0.5 { y0 } else { y1 },
        );
        if self.transparent == Some(nearest) {
            return nearest;
        }

        let p00 = self.raw(x0, y0);
        let p10 = self.raw(x1, y0);
        let p01 = self.raw(x0, y1);
        let p11 = self.raw(x1, y1);
        // A keyed-out neighbor would drag the key color into the blend;
        // fall back to the nearest sample at hand edges.
        if [p00, p10, p01, p11]
            .iter()
            .any(|p| self.transparent == Some(*p))
        {
            return nearest;
        }

        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
        let channel = |c00: u8, c10: u8, c01: u8, c11: u8| {
            let top = lerp(f32::from(c00), f32::from(c10), fx);
            let bottom = lerp(f32::from(c01), f32::from(c11), fx);
            (lerp(top, bottom, fy) + 0.5) as u8
        };
        Rgb565::new(
            channel(p00.r(), p10.r(), p01.r(), p11.r()),
            channel(p00.g(), p10.g(), p01.g(), p11.g()),
            channel(p00.b(), p10.b(), p01.b(), p11.b()),
        )
    }
}

/// The four native-resolution face images, injected as decoded data.
pub struct FaceAssets {
    pub background: RasterImage,
    pub hour_hand: RasterImage,
    pub minute_hand: RasterImage,
    pub second_hand: RasterImage,
}

/// Surface-resolution copies of the face images.
pub struct ScaledAssets {
    size: Size,
    pub background: RasterImage,
    pub hour_hand: RasterImage,
    pub minute_hand: RasterImage,
    pub second_hand: RasterImage,
}

impl ScaledAssets {
    /// Scale all four source images to the given surface size.
    pub fn from_source(source: &FaceAssets, size: Size) -> Self {
        Self {
            size,
            background: source.background.scaled(size),
            hour_hand: source.hour_hand.scaled(size),
            minute_hand: source.minute_hand.scaled(size),
            second_hand: source.second_hand.scaled(size),
        }
    }

    /// The surface size these assets were scaled for.
    pub fn size(&self) -> Size {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pixels_validates_dimensions() {
        let pixels = vec![Rgb565::RED; 6];
        assert!(RasterImage::from_pixels(Size::new(3, 2), pixels.clone()).is_ok());
        assert!(matches!(
            RasterImage::from_pixels(Size::new(3, 3), pixels),
            Err(Error::PixelCountMismatch)
        ));
    }

    #[test]
    fn pixel_respects_bounds_and_key_color() {
        let image = RasterImage::from_pixels(
            Size::new(2, 1),
            vec![Rgb565::RED, Rgb565::MAGENTA],
        )
        .unwrap()
        .with_transparent(Rgb565::MAGENTA);

        assert_eq!(image.pixel(0, 0), Some(Rgb565::RED));
        assert_eq!(image.pixel(1, 0), None);
        assert_eq!(image.pixel(-1, 0), None);
        assert_eq!(image.pixel(2, 0), None);
        assert_eq!(image.pixel(0, 1), None);
    }

    #[test]
    fn scaling_a_uniform_image_stays_uniform() {
        let color = Rgb565::new(12, 33, 7);
        let image = RasterImage::filled(Size::new(4, 4), color);
        let scaled = image.scaled(Size::new(9, 3));

        assert_eq!(scaled.size(), Size::new(9, 3));
        assert_eq!(scaled.data().len(), 27);
        assert!(scaled.data().iter().all(|p| *p == color));
    }

    #[test]
    fn upscaling_preserves_the_transparency_key() {
        // Left column opaque, right column keyed out.
        let image = RasterImage::from_pixels(
            Size::new(2, 2),
            vec![Rgb565::WHITE, Rgb565::MAGENTA, Rgb565::WHITE, Rgb565::MAGENTA],
        )
        .unwrap()
        .with_transparent(Rgb565::MAGENTA);

        let scaled = image.scaled(Size::new(4, 4));
        assert_eq!(scaled.pixel(0, 0), Some(Rgb565::WHITE));
        assert_eq!(scaled.pixel(3, 0), None);
        assert_eq!(scaled.pixel(3, 3), None);
    }

    #[test]
    fn interior_samples_blend_neighbors() {
        // 2x1 black/white image scaled to 4x1: the inner pixels sit between
        // the sources and must land strictly between the extremes.
        let image =
            RasterImage::from_pixels(Size::new(2, 1), vec![Rgb565::BLACK, Rgb565::WHITE]).unwrap();
        let scaled = image.scaled(Size::new(4, 1));

        assert_eq!(scaled.pixel(0, 0), Some(Rgb565::BLACK));
        assert_eq!(scaled.pixel(3, 0), Some(Rgb565::WHITE));
        let mid = scaled.pixel(1, 0).unwrap();
        assert!(mid.r() > 0 && mid.r() < Rgb565::WHITE.r());
    }

    #[test]
    fn scaled_assets_remember_their_size() {
        let assets = FaceAssets {
            background: RasterImage::filled(Size::new(4, 4), Rgb565::BLUE),
            hour_hand: RasterImage::filled(Size::new(4, 4), Rgb565::WHITE),
            minute_hand: RasterImage::filled(Size::new(4, 4), Rgb565::WHITE),
            second_hand: RasterImage::filled(Size::new(4, 4), Rgb565::RED),
        };
        let scaled = ScaledAssets::from_source(&assets, Size::new(8, 8));

        assert_eq!(scaled.size(), Size::new(8, 8));
        assert_eq!(scaled.background.size(), Size::new(8, 8));
        assert_eq!(scaled.second_hand.size(), Size::new(8, 8));
    }
}
