//! Rotation-aware drawing canvas.
//!
//! `embedded-graphics` has no transform stack, and hand rendering needs
//! one: rotate about the surface center, paint a hand, rotate further,
//! paint the next, restore. This wraps any [`DrawTarget`] with a
//! degree-based rotation state and a save stack.

use alloc::vec::Vec;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Point,
    mono_font::MonoTextStyle,
    pixelcolor::{Rgb565, RgbColor},
    primitives::{PointsIter, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Drawable, Pixel,
};
use libm::{cosf, sinf};

use super::assets::RasterImage;

/// A drawing surface for one frame.
///
/// Rotation is in degrees, clockwise, with 0° pointing to 12 o'clock.
/// The transform is per-frame state: a fresh canvas starts at identity,
/// and render code is expected to leave the transform it found.
pub struct Canvas<'a, D> {
    target: &'a mut D,
    bounds: Rectangle,
    rotation_deg: f32,
    pivot: Point,
    saved: Vec<(f32, Point)>,
    low_bit: bool,
}

impl<'a, D> Canvas<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: &'a mut D, bounds: Rectangle) -> Self {
        Self {
            target,
            bounds,
            rotation_deg: 0.0,
            pivot: Point::zero(),
            saved: Vec::new(),
            low_bit: false,
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Current rotation in degrees, clockwise.
    pub fn rotation(&self) -> f32 {
        self.rotation_deg
    }

    /// Quantize all subsequent painting to pure black/white, for displays
    /// with 1-bit ambient color depth.
    pub fn set_low_bit(&mut self, low_bit: bool) {
        self.low_bit = low_bit;
    }

    /// Push the current transform state.
    pub fn save(&mut self) {
        self.saved.push((self.rotation_deg, self.pivot));
    }

    /// Pop the most recently saved transform state.
    ///
    /// Without a matching [`save`](Self::save) this is a no-op.
    pub fn restore(&mut self) {
        if let Some((rotation, pivot)) = self.saved.pop() {
            self.rotation_deg = rotation;
            self.pivot = pivot;
        }
    }

    /// Rotate subsequent drawing by `degrees` clockwise about `pivot`
    /// (absolute target coordinates).
    ///
    /// Rotations accumulate. Successive calls must share the pivot; hand
    /// drawing only ever rotates about the surface center.
    pub fn rotate(&mut self, degrees: f32, pivot: Point) {
        self.rotation_deg += degrees;
        self.pivot = pivot;
    }

    /// Fill the whole canvas with a solid color.
    pub fn fill(&mut self, color: Rgb565) -> Result<(), D::Error> {
        let color = shade(color, self.low_bit);
        self.target.fill_solid(&self.bounds, color)
    }

    /// Paint `image` with its top-left corner at `at` (canvas-relative),
    /// under the current rotation. Key-colored pixels are skipped and
    /// everything is clipped to the canvas bounds.
    pub fn draw_image(&mut self, image: &RasterImage, at: Point) -> Result<(), D::Error> {
        if self.rotation_deg == 0.0 {
            self.blit_upright(image, at)
        } else {
            self.blit_rotated(image, at)
        }
    }

    /// Paint a single line of text centered on `at` (canvas-relative).
    ///
    /// Text is always upright; the rotation state does not apply.
    pub fn draw_text(
        &mut self,
        text: &str,
        at: Point,
        style: MonoTextStyle<'static, Rgb565>,
    ) -> Result<(), D::Error> {
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(text, self.bounds.top_left + at, style, text_style)
            .draw(self.target)?;
        Ok(())
    }

    fn blit_upright(&mut self, image: &RasterImage, at: Point) -> Result<(), D::Error> {
        let origin = self.bounds.top_left + at;
        let area = Rectangle::new(origin, image.size()).intersection(&self.bounds);
        let low_bit = self.low_bit;
        let pixels = area.points().filter_map(move |point| {
            let src = point - origin;
            let color = image.pixel(src.x, src.y)?;
            Some(Pixel(point, shade(color, low_bit)))
        });
        self.target.draw_iter(pixels)
    }

    fn blit_rotated(&mut self, image: &RasterImage, at: Point) -> Result<(), D::Error> {
        let theta = (self.rotation_deg % 360.0).to_radians();
        let (sin, cos) = (sinf(theta), cosf(theta));
        let pivot_x = self.pivot.x as f32;
        let pivot_y = self.pivot.y as f32;
        let offset_x = (self.bounds.top_left.x + at.x) as f32;
        let offset_y = (self.bounds.top_left.y + at.y) as f32;
        let clip = self.bounds;
        let low_bit = self.low_bit;

        // Dest-driven inverse mapping: for every pixel of the canvas,
        // rotate back by -theta about the pivot and sample the source.
        let pixels = clip.points().filter_map(move |point| {
            let dx = point.x as f32 - pivot_x;
            let dy = point.y as f32 - pivot_y;
            // Inverse of a clockwise rotation in y-down screen coordinates.
            let src_x = cos * dx + sin * dy + pivot_x - offset_x;
            let src_y = -sin * dx + cos * dy + pivot_y - offset_y;
            if src_x < -0.5 || src_y < -0.5 {
                return None;
            }
            let color = image.pixel((src_x + 0.5) as i32, (src_y + 0.5) as i32)?;
            Some(Pixel(point, shade(color, low_bit)))
        });
        self.target.draw_iter(pixels)
    }
}

fn shade(color: Rgb565, low_bit: bool) -> Rgb565 {
    if low_bit {
        quantize(color)
    } else {
        color
    }
}

/// Collapse a color to pure black or white using integer luma weights.
fn quantize(color: Rgb565) -> Rgb565 {
    let r = u16::from(color.r()) << 3;
    let g = u16::from(color.g()) << 2;
    let b = u16::from(color.b()) << 3;
    let luma = (r * 3 + g * 6 + b) / 10;
    if luma >= 128 {
        Rgb565::WHITE
    } else {
        Rgb565::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::assets::RasterImage;
    use embedded_graphics::{geometry::Size, mock_display::MockDisplay};

    fn display() -> MockDisplay<Rgb565> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display
    }

    fn bounds(width: u32, height: u32) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(width, height))
    }

    #[test]
    fn save_restore_round_trips_the_transform() {
        let mut target = display();
        let mut canvas = Canvas::new(&mut target, bounds(16, 16));

        canvas.save();
        canvas.rotate(105.0, Point::new(8, 8));
        canvas.rotate(75.0, Point::new(8, 8));
        assert_eq!(canvas.rotation(), 180.0);
        canvas.restore();
        assert_eq!(canvas.rotation(), 0.0);

        // Unbalanced restore is a silent no-op.
        canvas.restore();
        assert_eq!(canvas.rotation(), 0.0);
    }

    #[test]
    fn upright_blit_skips_the_key_color_and_clips() {
        let mut target = display();
        let image = RasterImage::from_pixels(
            Size::new(2, 1),
            alloc::vec![Rgb565::RED, Rgb565::MAGENTA],
        )
        .unwrap()
        .with_transparent(Rgb565::MAGENTA);

        let mut canvas = Canvas::new(&mut target, bounds(4, 4));
        canvas.draw_image(&image, Point::new(3, 0)).unwrap();
        drop(canvas);

        // Opaque pixel lands, keyed pixel is skipped, nothing outside the
        // canvas is touched.
        assert_eq!(target.get_pixel(Point::new(3, 0)), Some(Rgb565::RED));
        assert_eq!(target.get_pixel(Point::new(4, 0)), None);
    }

    #[test]
    fn quarter_turn_moves_a_north_mark_east() {
        // A single mark above the pivot.
        let mut pixels = alloc::vec![Rgb565::MAGENTA; 16 * 16];
        pixels[4 * 16 + 8] = Rgb565::RED; // (8, 4)
        let image = RasterImage::from_pixels(Size::new(16, 16), pixels)
            .unwrap()
            .with_transparent(Rgb565::MAGENTA);

        let mut target = display();
        let mut canvas = Canvas::new(&mut target, bounds(16, 16));
        canvas.rotate(90.0, Point::new(8, 8));
        canvas.draw_image(&image, Point::zero()).unwrap();
        drop(canvas);

        // 90° clockwise about (8, 8): (8, 4) ends up at (12, 8).
        assert_eq!(target.get_pixel(Point::new(12, 8)), Some(Rgb565::RED));
        assert_eq!(target.get_pixel(Point::new(8, 4)), None);
    }

    #[test]
    fn full_turn_is_identity_for_the_mark() {
        let mut pixels = alloc::vec![Rgb565::MAGENTA; 16 * 16];
        pixels[2 * 16 + 8] = Rgb565::RED; // (8, 2)
        let image = RasterImage::from_pixels(Size::new(16, 16), pixels)
            .unwrap()
            .with_transparent(Rgb565::MAGENTA);

        let mut target = display();
        let mut canvas = Canvas::new(&mut target, bounds(16, 16));
        canvas.rotate(360.0, Point::new(8, 8));
        canvas.draw_image(&image, Point::zero()).unwrap();
        drop(canvas);

        assert_eq!(target.get_pixel(Point::new(8, 2)), Some(Rgb565::RED));
    }

    #[test]
    fn fill_covers_exactly_the_bounds() {
        let mut target = display();
        let mut canvas = Canvas::new(&mut target, bounds(4, 4));
        canvas.fill(Rgb565::BLUE).unwrap();
        drop(canvas);

        assert_eq!(target.get_pixel(Point::new(0, 0)), Some(Rgb565::BLUE));
        assert_eq!(target.get_pixel(Point::new(3, 3)), Some(Rgb565::BLUE));
        assert_eq!(target.get_pixel(Point::new(4, 4)), None);
    }

    #[test]
    fn low_bit_mode_quantizes_to_black_and_white() {
        let dim = Rgb565::new(6, 12, 6);
        let bright = Rgb565::new(28, 56, 28);
        let image = RasterImage::from_pixels(Size::new(2, 1), alloc::vec![dim, bright]).unwrap();

        let mut target = display();
        let mut canvas = Canvas::new(&mut target, bounds(4, 4));
        canvas.set_low_bit(true);
        canvas.draw_image(&image, Point::zero()).unwrap();
        drop(canvas);

        assert_eq!(target.get_pixel(Point::new(0, 0)), Some(Rgb565::BLACK));
        assert_eq!(target.get_pixel(Point::new(1, 0)), Some(Rgb565::WHITE));
    }
}
