//! Analog watch-face engine.
//!
//! Renders an analog face (background, date text, rotated hour, minute
//! and second hand images) onto any `embedded-graphics` draw target and
//! manages the host-driven face lifecycle: visibility, ambient mode,
//! timezone changes and the one-second interactive redraw timer.
//!
//! The host framework (surface management, ambient-mode detection,
//! broadcast delivery) stays outside this crate: it drives an [`Engine`]
//! through its callback methods and services it through [`WatchHost`].
//! Time comes from an injected [`TimeSource`] and images arrive as
//! decoded [`RasterImage`] data, so the whole engine runs without any
//! platform resource system.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod engine;
pub mod host;
pub mod system;
pub mod ui;

pub use engine::Engine;
pub use host::{FaceStyle, Properties, WatchHost};
pub use system::time::{ClockSnapshot, TimeSource};
pub use ui::assets::{FaceAssets, RasterImage, ScaledAssets};
pub use ui::canvas::Canvas;
pub use ui::{AnalogFace, FrameState, Theme, WatchFace};
