//! Watch-face engine: lifecycle callbacks and the redraw timer policy.

use embassy_time::Duration;
use embedded_graphics::{
    draw_target::DrawTarget, geometry::Size, pixelcolor::Rgb565, primitives::Rectangle,
};

use crate::{
    host::{Anchor, BackgroundVisibility, FaceStyle, PeekMode, Properties, WatchHost},
    system::time::{TimeSource, WallClock},
    ui::{
        assets::{FaceAssets, ScaledAssets},
        canvas::Canvas,
        FrameState, WatchFace,
    },
};

/// Interactive-mode repaint period.
const INTERACTIVE_UPDATE_RATE_MS: u64 = 1_000;

/// Delay until the next wall-clock second boundary.
///
/// Aligning every tick to the boundary keeps the second hand in step with
/// the displayed time instead of drifting at a fixed offset from the last
/// fire time.
pub fn next_tick_delay(now_epoch_ms: u64) -> Duration {
    Duration::from_millis(INTERACTIVE_UPDATE_RATE_MS - now_epoch_ms % INTERACTIVE_UPDATE_RATE_MS)
}

/// The renderer/timer engine behind the host's watch-face callbacks.
///
/// All state is per-instance; the host owns one engine per face and drives
/// it from a single UI thread, so no callback ever races another.
///
/// The redraw timer runs iff the face is visible and interactive. The
/// engine never sleeps itself: it arms the host's one-shot tick through
/// [`WatchHost::schedule_tick`] and cancels it by handle, including on
/// teardown, so a stale tick can never reach a dead engine.
pub struct Engine<T, F>
where
    T: TimeSource,
    F: WatchFace,
{
    face: F,
    assets: FaceAssets,
    scaled: Option<ScaledAssets>,
    clock: WallClock<T>,
    ambient: bool,
    visible: bool,
    low_bit_ambient: bool,
    timezone_registered: bool,
    torn_down: bool,
}

impl<T, F> Engine<T, F>
where
    T: TimeSource,
    F: WatchFace,
{
    /// Create the engine: register the face style with the host and take
    /// the first clock snapshot. The face starts hidden and interactive.
    pub fn create(host: &mut impl WatchHost, assets: FaceAssets, face: F, time: T) -> Self {
        info!("watch face engine created");
        host.set_style(
            FaceStyle::builder()
                .peek_mode(PeekMode::Short)
                .background_visibility(BackgroundVisibility::Interruptive)
                .show_system_time(false)
                .status_bar_anchor(Anchor::TopCenter)
                .hotword_anchor(Anchor::TopCenter)
                .build(),
        );

        let mut clock = WallClock::new(time);
        clock.set_offset(host.utc_offset_seconds());

        Self {
            face,
            assets,
            scaled: None,
            clock,
            ambient: false,
            visible: false,
            low_bit_ambient: false,
            timezone_registered: false,
            torn_down: false,
        }
    }

    /// The host reported a new drawable surface size.
    ///
    /// Rescales the face images, unless they are already cached at exactly
    /// this size.
    pub fn surface_changed(&mut self, width: u32, height: u32) {
        let size = Size::new(width, height);
        if self.scaled.as_ref().map(ScaledAssets::size) == Some(size) {
            return;
        }
        debug!("rescaling face assets to {}x{}", width, height);
        self.scaled = Some(ScaledAssets::from_source(&self.assets, size));
    }

    /// Paint one frame.
    ///
    /// Refreshes the clock snapshot first. Before the first surface-size
    /// notification there is nothing to paint and the call is a no-op.
    pub fn draw<D>(&mut self, target: &mut D, bounds: Rectangle) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let clock = self.clock.refresh();
        let scaled = match self.scaled.as_ref() {
            Some(scaled) => scaled,
            None => return Ok(()),
        };

        let state = FrameState {
            clock,
            ambient: self.ambient,
            low_bit_ambient: self.low_bit_ambient,
        };
        let mut canvas = Canvas::new(target, bounds);
        self.face.render(&mut canvas, scaled, &state)
    }

    /// The host switched between interactive and ambient mode.
    pub fn ambient_mode_changed(&mut self, host: &mut impl WatchHost, ambient: bool) {
        if self.ambient != ambient {
            debug!("ambient mode: {}", ambient);
            self.ambient = ambient;
            host.request_redraw();
        }
        self.update_timer(host);
    }

    /// The host delivered display capabilities.
    pub fn properties_changed(&mut self, properties: Properties) {
        self.low_bit_ambient = properties.low_bit_ambient;
    }

    /// Host-driven low-frequency repaint trigger, used while ambient.
    pub fn time_tick(&mut self, host: &mut impl WatchHost) {
        host.request_redraw();
    }

    /// The face became shown or hidden.
    pub fn visibility_changed(&mut self, host: &mut impl WatchHost, visible: bool) {
        debug!("visible: {}", visible);
        self.visible = visible;
        if visible {
            if !self.timezone_registered {
                self.timezone_registered = true;
                host.subscribe_timezone();
            }
            // Pick up timezone moves that happened while hidden.
            self.clock.set_offset(host.utc_offset_seconds());
        } else if self.timezone_registered {
            self.timezone_registered = false;
            host.unsubscribe_timezone();
        }
        self.update_timer(host);
    }

    /// The system timezone changed while the face was visible.
    pub fn timezone_changed(&mut self, utc_offset_seconds: i32) {
        self.clock.set_offset(utc_offset_seconds);
    }

    /// The redraw timer fired.
    ///
    /// A tick arriving after [`destroy`](Self::destroy) is dropped
    /// silently; a missed frame is invisible, not an error.
    pub fn tick_fired(&mut self, host: &mut impl WatchHost) {
        if self.torn_down {
            return;
        }
        trace!("tick");
        host.request_redraw();
        if self.should_timer_run() {
            host.schedule_tick(next_tick_delay(self.clock.now_ms()));
        }
    }

    /// The host is tearing the engine down.
    pub fn destroy(&mut self, host: &mut impl WatchHost) {
        info!("watch face engine teardown");
        host.cancel_tick();
        if self.timezone_registered {
            self.timezone_registered = false;
            host.unsubscribe_timezone();
        }
        self.scaled = None;
        self.torn_down = true;
    }

    /// Re-evaluate the timer policy: cancel any pending tick, then arm a
    /// fresh one when the policy holds.
    fn update_timer(&mut self, host: &mut impl WatchHost) {
        host.cancel_tick();
        if self.should_timer_run() {
            host.schedule_tick(Duration::from_millis(0));
        }
    }

    /// The timer runs iff the face is visible and interactive.
    fn should_timer_run(&self) -> bool {
        self.visible && !self.ambient
    }
}
