//! UI definitions module

pub mod assets;
pub mod canvas;

mod analog_face;

pub use analog_face::{hand_angles, AnalogFace, HandAngles};

use embedded_graphics::{
    draw_target::DrawTarget,
    mono_font::MonoFont,
    pixelcolor::{Rgb565, RgbColor},
};
use profont::PROFONT_24_POINT;

use crate::system::time::ClockSnapshot;
use assets::ScaledAssets;
use canvas::Canvas;

/// A watch face paints one frame from per-frame state and scaled assets.
pub trait WatchFace {
    /// Paint one frame onto the canvas.
    fn render<D>(
        &self,
        canvas: &mut Canvas<'_, D>,
        assets: &ScaledAssets,
        state: &FrameState,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;
}

/// State for one frame of the watch face.
#[derive(Clone, Copy, Debug)]
pub struct FrameState {
    pub clock: ClockSnapshot,
    /// Host is in low-power ambient mode.
    pub ambient: bool,
    /// Display only has 1-bit color depth while ambient.
    pub low_bit_ambient: bool,
}

/// Text styling resolved from the host theme.
#[derive(Clone, Copy)]
pub struct Theme {
    pub text_color: Rgb565,
    pub font: &'static MonoFont<'static>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_color: Rgb565::WHITE,
            font: &PROFONT_24_POINT,
        }
    }
}
