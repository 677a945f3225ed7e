//! Host service contract.
//!
//! The watch-face host (surface management, ambient-mode detection,
//! broadcast delivery, power management) lives outside this crate. It
//! drives the [`Engine`](crate::Engine) through lifecycle callbacks and is
//! serviced in return through [`WatchHost`].

use embassy_time::Duration;

/// Services the engine requests from its host.
///
/// [`schedule_tick`](Self::schedule_tick) arms the single one-shot redraw
/// timer, replacing any pending tick; together with
/// [`cancel_tick`](Self::cancel_tick) it guarantees at most one pending
/// redraw callback at any time. All callbacks run on the host's UI thread.
pub trait WatchHost {
    /// Ask the host to repaint the face as soon as possible.
    fn request_redraw(&mut self);

    /// Arm the redraw timer to call `Engine::tick_fired` after `delay`.
    fn schedule_tick(&mut self, delay: Duration);

    /// Disarm the redraw timer, if armed.
    fn cancel_tick(&mut self);

    /// Start delivering timezone changes to `Engine::timezone_changed`.
    fn subscribe_timezone(&mut self);

    /// Stop delivering timezone changes.
    fn unsubscribe_timezone(&mut self);

    /// UTC offset of the current local timezone, in seconds east.
    fn utc_offset_seconds(&self) -> i32;

    /// Record the face chrome preferences. Called once at creation.
    fn set_style(&mut self, style: FaceStyle);
}

/// How notification cards may peek over the face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeekMode {
    /// Cards peek a single line at the bottom of the face.
    Short,
    /// Cards may take as much vertical space as they need.
    Variable,
}

/// When the host shows the face behind a peeking card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackgroundVisibility {
    /// Shown briefly, only for interruptive notifications.
    Interruptive,
    /// Always visible behind peeking cards.
    Persistent,
}

/// Screen anchor for host-drawn indicators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    BottomCenter,
}

/// Face chrome preferences, registered with the host once at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceStyle {
    pub peek_mode: PeekMode,
    pub background_visibility: BackgroundVisibility,
    /// Whether the host overlays its own digital time on the face.
    pub show_system_time: bool,
    pub status_bar_anchor: Anchor,
    pub hotword_anchor: Anchor,
}

impl FaceStyle {
    pub fn builder() -> FaceStyleBuilder {
        FaceStyleBuilder {
            style: Self::default(),
        }
    }
}

impl Default for FaceStyle {
    fn default() -> Self {
        Self {
            peek_mode: PeekMode::Variable,
            background_visibility: BackgroundVisibility::Persistent,
            show_system_time: true,
            status_bar_anchor: Anchor::TopLeft,
            hotword_anchor: Anchor::TopLeft,
        }
    }
}

/// Builder for [`FaceStyle`].
pub struct FaceStyleBuilder {
    style: FaceStyle,
}

impl FaceStyleBuilder {
    pub fn peek_mode(mut self, mode: PeekMode) -> Self {
        self.style.peek_mode = mode;
        self
    }

    pub fn background_visibility(mut self, visibility: BackgroundVisibility) -> Self {
        self.style.background_visibility = visibility;
        self
    }

    pub fn show_system_time(mut self, show: bool) -> Self {
        self.style.show_system_time = show;
        self
    }

    pub fn status_bar_anchor(mut self, anchor: Anchor) -> Self {
        self.style.status_bar_anchor = anchor;
        self
    }

    pub fn hotword_anchor(mut self, anchor: Anchor) -> Self {
        self.style.hotword_anchor = anchor;
        self
    }

    pub fn build(self) -> FaceStyle {
        self.style
    }
}

/// Capability flags the host delivers once after creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Properties {
    /// Display has reduced color depth while in ambient mode.
    pub low_bit_ambient: bool,
}
