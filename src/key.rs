//! Key bindings for driving a countdown timer.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;

/// A set of keys that trigger one action, plus the help text describing it.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Key codes that trigger this binding.
    pub keys: Vec<KeyCode>,
    /// Short key name shown in help, e.g. `"space"`.
    pub help_key: String,
    /// What the binding does, e.g. `"pause/resume"`.
    pub help_desc: String,
}

impl Binding {
    /// Creates a binding for the given key codes with empty help text.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            help_key: String::new(),
            help_desc: String::new(),
        }
    }

    /// Sets the help key name and description.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help_key = key.into();
        self.help_desc = desc.into();
        self
    }

    /// Returns whether the key message matches one of this binding's keys.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.keys.contains(&msg.key)
    }

    /// Help entry in `"key description"` form.
    pub fn help(&self) -> String {
        format!("{} {}", self.help_key, self.help_desc)
    }
}

/// The default controls for a countdown timer.
#[derive(Debug, Clone)]
pub struct TimerKeyMap {
    /// Restart the countdown from the full duration.
    pub start: Binding,
    /// Pause a running countdown, or continue a paused one.
    pub toggle: Binding,
    /// Return to idle with the full duration.
    pub reset: Binding,
    /// Leave the program.
    pub quit: Binding,
}

impl Default for TimerKeyMap {
    fn default() -> Self {
        Self {
            start: Binding::new(vec![KeyCode::Char('s')]).with_help("s", "start"),
            toggle: Binding::new(vec![KeyCode::Char(' ')]).with_help("space", "pause/resume"),
            reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
            quit: Binding::new(vec![KeyCode::Char('q'), KeyCode::Esc]).with_help("q/esc", "quit"),
        }
    }
}

impl TimerKeyMap {
    /// One line help footer listing every binding.
    pub fn help_line(&self) -> String {
        [&self.start, &self.toggle, &self.reset, &self.quit]
            .iter()
            .map(|binding| binding.help())
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn bindings_match_their_keys() {
        let keys = TimerKeyMap::default();
        assert!(keys.start.matches(&key(KeyCode::Char('s'))));
        assert!(keys.toggle.matches(&key(KeyCode::Char(' '))));
        assert!(keys.reset.matches(&key(KeyCode::Char('r'))));
        assert!(keys.quit.matches(&key(KeyCode::Char('q'))));
        assert!(keys.quit.matches(&key(KeyCode::Esc)));
    }

    #[test]
    fn unbound_keys_do_not_match() {
        let keys = TimerKeyMap::default();
        assert!(!keys.toggle.matches(&key(KeyCode::Char('x'))));
        assert!(!keys.start.matches(&key(KeyCode::Enter)));
    }

    #[test]
    fn help_line_lists_every_binding() {
        let line = TimerKeyMap::default().help_line();
        assert!(line.contains("s start"));
        assert!(line.contains("space pause/resume"));
        assert!(line.contains("r reset"));
        assert!(line.contains("q/esc quit"));
    }
}
