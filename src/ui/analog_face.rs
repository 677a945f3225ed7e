//! Analog watch face: rotated hand images over a background with date text.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Point,
    mono_font::MonoTextStyle,
    pixelcolor::{Rgb565, RgbColor},
};

use super::{assets::ScaledAssets, canvas::Canvas, FrameState, Theme, WatchFace};
use crate::system::time::ClockSnapshot;

/// Weekday abbreviations, indexed by [`ClockSnapshot::weekday`].
const DAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
/// Month abbreviations, indexed by [`ClockSnapshot::month`].
const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Hand rotations in degrees, clockwise, 0° at 12 o'clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandAngles {
    pub hours: f32,
    pub minutes: f32,
    pub seconds: f32,
}

/// The time-to-geometry transform.
///
/// The hour hand creeps half a degree per minute instead of jumping on the
/// hour. All angles are in `[0, 360)`.
pub fn hand_angles(clock: &ClockSnapshot) -> HandAngles {
    HandAngles {
        hours: f32::from(clock.hour % 12) * 30.0 + f32::from(clock.minute) / 2.0,
        minutes: f32::from(clock.minute) * 6.0,
        seconds: f32::from(clock.second) * 6.0,
    }
}

/// Render "MON DAY" into `buf`.
fn date_label<'a>(buf: &'a mut [u8], clock: &ClockSnapshot) -> &'a str {
    let month = MONTHS[(clock.month % 12) as usize];
    format_no_std::show(buf, format_args!("{} {}", month, clock.day)).unwrap_or("")
}

/// The default analog face.
pub struct AnalogFace {
    text_style: MonoTextStyle<'static, Rgb565>,
}

impl AnalogFace {
    /// Create a face with text styling taken from the theme.
    pub fn new(theme: Theme) -> Self {
        Self {
            text_style: MonoTextStyle::new(theme.font, theme.text_color),
        }
    }
}

impl Default for AnalogFace {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl WatchFace for AnalogFace {
    fn render<D>(
        &self,
        canvas: &mut Canvas<'_, D>,
        assets: &ScaledAssets,
        state: &FrameState,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        canvas.set_low_bit(state.ambient && state.low_bit_ambient);

        let bounds = canvas.bounds();
        let width = bounds.size.width as i32;
        let height = bounds.size.height as i32;
        let center = bounds.top_left + Point::new(width / 2, height / 2);
        let angles = hand_angles(&state.clock);

        if !state.ambient {
            canvas.draw_image(&assets.background, Point::zero())?;

            let day = DAYS[(state.clock.weekday % 7) as usize];
            let mut buf = [0u8; 16];
            let date = date_label(&mut buf, &state.clock);
            canvas.draw_text(
                day,
                Point::new(width / 2 - width / 4, height / 2),
                self.text_style,
            )?;
            canvas.draw_text(
                date,
                Point::new(width / 2 + width / 5, height / 2),
                self.text_style,
            )?;
        } else {
            // Power-saving path: solid black, no background, no date.
            canvas.fill(Rgb565::BLACK)?;
        }

        canvas.save();
        canvas.rotate(angles.hours, center);
        canvas.draw_image(&assets.hour_hand, Point::zero())?;

        canvas.rotate(angles.minutes - angles.hours, center);
        canvas.draw_image(&assets.minute_hand, Point::zero())?;

        if !state.ambient {
            // The second hand never runs in ambient mode.
            canvas.rotate(angles.seconds - angles.minutes, center);
            canvas.draw_image(&assets.second_hand, Point::zero())?;
        }
        canvas.restore();

        Ok(())
    }
}
