//! Progress track renderer for countdown displays.
//!
//! The ring is the timer's visual collaborator. It holds a percentage in
//! `[0, 100]` and draws it as a track of filled and drained cells, the
//! terminal analog of a shrinking ring: full at 100, empty at 0.
//!
//! It implements [`crate::ProgressSink`], so it can be handed to a timer
//! directly, or driven by the owning program with
//! [`Model::set_percentage`].
//!
//! # Basic Usage
//!
//! ```rust
//! use countdown_widgets::ring::{new, with_width, without_label};
//!
//! // Default track.
//! let ring = new(&[]);
//!
//! // Narrow, no percentage label.
//! let mut compact = new(&[with_width(12), without_label()]);
//! compact.set_percentage(50.0);
//! ```

use crate::ProgressSink;
use lipgloss_extras::lipgloss::{Color, Style};
use once_cell::sync::Lazy;

const DEFAULT_WIDTH: i32 = 30;
const DEFAULT_FULL_COLOR: &str = "#7D56F4";
const DEFAULT_EMPTY_COLOR: &str = "#3C3C3C";

/// Characters drawn for the filled and drained portions of the track.
#[derive(Debug, Clone)]
pub struct Track {
    /// Cell for time still remaining.
    pub full: char,
    /// Cell for time already elapsed.
    pub empty: char,
}

/// Solid block track, the default.
pub static BLOCK: Lazy<Track> = Lazy::new(|| Track {
    full: '█',
    empty: '░',
});

/// Thin line track.
pub static LINE: Lazy<Track> = Lazy::new(|| Track {
    full: '━',
    empty: '─',
});

/// Dot track.
pub static DOTS: Lazy<Track> = Lazy::new(|| Track {
    full: '●',
    empty: '○',
});

/// Configuration options for customizing the track's appearance.
///
/// Options are applied in order by [`new`], so later options win when they
/// overlap.
pub enum RingOption {
    /// Sets the track width in cells (label excluded).
    WithWidth(i32),
    /// Sets the filled and drained cell characters.
    WithTrack(Track),
    /// Sets the color of the filled portion (hex or named color).
    WithSolidFill(String),
    /// Sets the color of the drained portion (hex or named color).
    WithEmptyColor(String),
    /// Hides the numeric percentage label.
    WithoutLabel,
}

impl RingOption {
    fn apply(&self, m: &mut Model) {
        match self {
            RingOption::WithWidth(width) => m.width = *width,
            RingOption::WithTrack(track) => m.track = track.clone(),
            RingOption::WithSolidFill(color) => m.full_color = color.clone(),
            RingOption::WithEmptyColor(color) => m.empty_color = color.clone(),
            RingOption::WithoutLabel => m.show_label = false,
        }
    }
}

/// Sets the track width in cells.
pub fn with_width(width: i32) -> RingOption {
    RingOption::WithWidth(width)
}

/// Sets the filled and drained cell characters.
///
/// ```rust
/// use countdown_widgets::ring::{new, with_track, DOTS};
///
/// let ring = new(&[with_track(DOTS.clone())]);
/// assert_eq!(ring.track.full, '●');
/// ```
pub fn with_track(track: Track) -> RingOption {
    RingOption::WithTrack(track)
}

/// Sets the color of the filled portion.
pub fn with_solid_fill(color: String) -> RingOption {
    RingOption::WithSolidFill(color)
}

/// Sets the color of the drained portion.
pub fn with_empty_color(color: String) -> RingOption {
    RingOption::WithEmptyColor(color)
}

/// Hides the numeric percentage label.
pub fn without_label() -> RingOption {
    RingOption::WithoutLabel
}

/// The track model: a stored percentage plus rendering configuration.
#[derive(Debug, Clone)]
pub struct Model {
    /// Track width in cells. The label, when shown, is extra.
    pub width: i32,
    /// Cell characters for the two portions.
    pub track: Track,
    /// Color of the filled portion.
    pub full_color: String,
    /// Color of the drained portion.
    pub empty_color: String,
    /// Whether the numeric percentage label is rendered after the track.
    pub show_label: bool,
    percentage: f64,
}

/// Creates a track renderer with the given options.
///
/// Defaults: 30 cells wide, block track, label shown, starting at 100
/// (a countdown that has not begun has all of its time left).
pub fn new(opts: &[RingOption]) -> Model {
    let mut m = Model {
        width: DEFAULT_WIDTH,
        track: BLOCK.clone(),
        full_color: DEFAULT_FULL_COLOR.to_string(),
        empty_color: DEFAULT_EMPTY_COLOR.to_string(),
        show_label: true,
        percentage: 100.0,
    };
    for opt in opts {
        opt.apply(&mut m);
    }
    m
}

impl Model {
    /// Stores a new percentage, clamped into `[0, 100]`.
    pub fn set_percentage(&mut self, percentage: f64) {
        self.percentage = percentage.clamp(0.0, 100.0);
    }

    /// The currently stored percentage.
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Renders the track at the stored percentage.
    pub fn view(&self) -> String {
        self.view_as(self.percentage)
    }

    /// Renders the track at an explicit percentage, ignoring stored state.
    ///
    /// Useful for stateless composition where the owner already tracks the
    /// value, typically `ring.view_as(timer.percentage())`.
    pub fn view_as(&self, percentage: f64) -> String {
        let percentage = percentage.clamp(0.0, 100.0);
        let width = self.width.max(0);
        let filled = ((width as f64) * percentage / 100.0).round() as i32;
        let filled = filled.clamp(0, width);

        let full_cell = Style::new()
            .foreground(Color::from(self.full_color.as_str()))
            .render(&self.track.full.to_string());
        let empty_cell = Style::new()
            .foreground(Color::from(self.empty_color.as_str()))
            .render(&self.track.empty.to_string());

        let mut out = String::new();
        out.push_str(&full_cell.repeat(filled as usize));
        out.push_str(&empty_cell.repeat((width - filled) as usize));
        if self.show_label {
            out.push_str(&format!(" {:3.0}%", percentage));
        }
        out
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

impl ProgressSink for Model {
    fn update_progress(&mut self, percentage: f64) {
        self.set_percentage(percentage);
    }
}
