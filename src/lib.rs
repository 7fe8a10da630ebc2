#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/countdown-widgets/")]

//! # countdown-widgets
//!
//! Countdown timer widgets for terminal applications built with
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! ## Overview
//!
//! The crate is built around a single state machine, the countdown
//! [`Timer`]: a fixed duration counted down to zero on a one second cadence,
//! controlled through start, pause, resume and reset commands, announcing
//! expiry with a [`timer::CompleteMsg`]. Around it sit the pieces a
//! countdown display needs:
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Timer`] | Countdown state machine with an `MM:SS` clock view |
//! | [`Ring`]  | Progress track renderer fed by the timer's percentage |
//! | [`TimerKeyMap`] | Default key bindings for driving the timer |
//!
//! Every component follows the Elm Architecture pattern of bubbletea-rs:
//! state changes happen in `update`, rendering in `view`, and scheduled
//! work travels as commands.
//!
//! ## Quick Start
//!
//! ```rust
//! use countdown_widgets::prelude::*;
//!
//! let mut timer = timer_new(90).unwrap().with_auto_start(true);
//! let first_tick = timer.init();
//! assert!(first_tick.is_some());
//! assert_eq!(timer.view(), "01:30");
//!
//! let mut ring = ring_new(&[]);
//! ring.set_percentage(timer.percentage());
//! ```
//!
//! ## Wiring the display
//!
//! The timer pushes its percentage into anything implementing
//! [`ProgressSink`], so a shared ring can follow the countdown without the
//! owning program copying values by hand. Programs that keep the ring to
//! themselves can instead render with `ring.view_as(timer.percentage())`
//! each frame; both paths produce the same track.

pub mod key;
pub mod ring;
pub mod timer;

/// Capability for receiving countdown display updates.
///
/// The timer calls this on every start, reset and tick with the share of
/// time remaining as a percentage in `[0, 100]`. [`ring::Model`] implements
/// it; test doubles and custom renderers can too.
///
/// # Examples
///
/// ```rust
/// use countdown_widgets::{ring, timer, ProgressSink};
///
/// let ring = ring::new(&[]);
/// let timer = timer::new(30)
///     .unwrap()
///     .with_sink(Box::new(ring));
/// ```
pub trait ProgressSink {
    /// Receives the latest remaining-time percentage, in `[0, 100]`.
    fn update_progress(&mut self, percentage: f64);
}

pub use key::{Binding, TimerKeyMap};
pub use ring::{
    new as ring_new, with_empty_color, with_solid_fill, with_track, with_width, without_label,
    Model as Ring, RingOption, Track, BLOCK, DOTS, LINE,
};
pub use timer::{
    new as timer_new, CompleteMsg as TimerCompleteMsg, ControlMsg as TimerControlMsg,
    Model as Timer, State as TimerState, TickMsg as TimerTickMsg, TimerError,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use countdown_widgets::prelude::*;
///
/// let timer = timer_new(60).unwrap();
/// let keys = TimerKeyMap::default();
/// ```
pub mod prelude {
    pub use crate::key::{Binding, TimerKeyMap};
    pub use crate::ring::{
        new as ring_new, with_empty_color, with_solid_fill, with_track, with_width, without_label,
        Model as Ring, RingOption, Track, BLOCK, DOTS, LINE,
    };
    pub use crate::timer::{
        new as timer_new, CompleteMsg as TimerCompleteMsg, ControlMsg as TimerControlMsg,
        Model as Timer, State as TimerState, TickMsg as TimerTickMsg, TimerError,
    };
    pub use crate::ProgressSink;
}
