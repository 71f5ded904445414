//! Terminal color capability detection.
//!
//! The harness only emits ANSI escapes when the environment says it is safe
//! to do so. The decision sits behind the [`ColorSupport`] trait so callers
//! (and tests) can swap in a fixed answer instead of reading the process
//! environment.

use std::env;

/// Disables coloring whenever present, whatever its value.
pub const NO_COLOR_VAR: &str = "NO_COLOR";
/// Terminal type identifier.
pub const TERM_VAR: &str = "TERM";
/// Forces coloring for terminal types outside the known list.
pub const COLOR_TERM_VAR: &str = "COLORTERM";

/// Terminal families known to understand SGR color escapes. A `TERM` value
/// matches when it starts with any of these, which also covers the
/// `-256color` and `-color` variants.
const COLOR_TERMS: &[&str] = &[
    "xterm",
    "xterm-color",
    "xterm-256color",
    "screen",
    "screen-256color",
    "tmux",
    "tmux-256color",
    "rxvt",
    "rxvt-unicode",
    "rxvt-256color",
    "linux",
    "cygwin",
    "ansi",
    "vt100",
    "vt220",
];

/// Decides whether colored output may be written to the terminal.
pub trait ColorSupport {
    fn is_supported(&self) -> bool;
}

/// How the harness picks its [`ColorSupport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    /// Inspect the environment on every decision.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl ColorMode {
    pub fn color_support(self) -> Box<dyn ColorSupport> {
        match self {
            ColorMode::Auto => Box::new(EnvColorSupport),
            ColorMode::Always => Box::new(FixedColorSupport::new(true)),
            ColorMode::Never => Box::new(FixedColorSupport::new(false)),
        }
    }
}

/// A point-in-time reading of every signal the color decision depends on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorSignals {
    pub no_color: bool,
    pub is_tty: bool,
    pub term: Option<String>,
    pub color_term: bool,
}

impl ColorSignals {
    /// Reads the signals from the live process environment.
    pub fn capture() -> Self {
        let support = EnvColorSupport;
        Self {
            no_color: support.is_no_color_set(),
            is_tty: support.is_tty(),
            term: support.term(),
            color_term: support.is_color_term_set(),
        }
    }

    /// Applies the decision rules in order; the first rule that fires wins.
    pub fn allows_color(&self) -> bool {
        if self.no_color || !self.is_tty {
            return false;
        }
        let term = match self.term.as_deref() {
            None | Some("dumb") => return false,
            Some(term) => term,
        };
        if COLOR_TERMS.iter().any(|known| term.starts_with(known)) {
            return true;
        }
        self.color_term
    }
}

/// Reads `NO_COLOR`, `TERM`, `COLORTERM` and the TTY status of stdout each
/// time it is asked. Nothing is cached, so changes to the environment are
/// visible on the next call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvColorSupport;

impl EnvColorSupport {
    pub fn is_no_color_set(&self) -> bool {
        env::var_os(NO_COLOR_VAR).is_some()
    }

    pub fn is_tty(&self) -> bool {
        atty::is(atty::Stream::Stdout)
    }

    /// Raw `TERM` value, `None` when unset or not valid unicode.
    pub fn term(&self) -> Option<String> {
        env::var(TERM_VAR).ok()
    }

    pub fn is_color_term_set(&self) -> bool {
        env::var_os(COLOR_TERM_VAR).is_some()
    }
}

impl ColorSupport for EnvColorSupport {
    fn is_supported(&self) -> bool {
        ColorSignals::capture().allows_color()
    }
}

/// A decision fixed at construction time.
#[derive(Debug, Clone, Copy)]
pub struct FixedColorSupport {
    supported: bool,
}

impl FixedColorSupport {
    pub fn new(supported: bool) -> Self {
        Self { supported }
    }
}

impl ColorSupport for FixedColorSupport {
    fn is_supported(&self) -> bool {
        self.supported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn tty_with_term(term: &str) -> ColorSignals {
        ColorSignals {
            no_color: false,
            is_tty: true,
            term: Some(term.to_string()),
            color_term: false,
        }
    }

    #[test]
    fn known_terminal_families_support_color() {
        for term in ["xterm", "xterm-256color", "screen-256color", "tmux", "rxvt-unicode", "linux", "vt220"] {
            assert!(tty_with_term(term).allows_color(), "{term} should allow color");
        }
    }

    #[test]
    fn dumb_terminal_never_supports_color() {
        let mut signals = tty_with_term("dumb");
        signals.color_term = true;
        assert!(!signals.allows_color());
    }

    #[test]
    fn no_color_overrides_everything() {
        let mut signals = tty_with_term("xterm-256color");
        signals.no_color = true;
        signals.color_term = true;
        assert!(!signals.allows_color());
    }

    #[test]
    fn non_tty_disables_color() {
        let mut signals = tty_with_term("xterm");
        signals.is_tty = false;
        assert!(!signals.allows_color());
    }

    #[test]
    fn missing_term_disables_color() {
        let signals = ColorSignals {
            is_tty: true,
            color_term: true,
            ..ColorSignals::default()
        };
        assert!(!signals.allows_color());
    }

    #[test]
    fn unknown_term_falls_back_to_colorterm() {
        let mut signals = tty_with_term("kitty");
        assert!(!signals.allows_color());
        signals.color_term = true;
        assert!(signals.allows_color());
    }

    #[test]
    fn env_predicates_track_live_environment() {
        let _guard = ENV_LOCK.lock().unwrap();
        let support = EnvColorSupport;
        let saved_no_color = env::var_os(NO_COLOR_VAR);
        let saved_term = env::var_os(TERM_VAR);
        let saved_color_term = env::var_os(COLOR_TERM_VAR);

        env::set_var(NO_COLOR_VAR, "1");
        assert!(support.is_no_color_set());
        assert!(!support.is_supported());
        env::remove_var(NO_COLOR_VAR);
        assert!(!support.is_no_color_set());

        env::set_var(TERM_VAR, "dumb");
        assert_eq!(support.term().as_deref(), Some("dumb"));
        assert!(!support.is_supported());

        env::set_var(COLOR_TERM_VAR, "truecolor");
        assert!(support.is_color_term_set());

        let restore = |key: &str, value: Option<std::ffi::OsString>| match value {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        };
        restore(NO_COLOR_VAR, saved_no_color);
        restore(TERM_VAR, saved_term);
        restore(COLOR_TERM_VAR, saved_color_term);
    }

    #[test]
    fn color_modes_map_to_fixed_decisions() {
        assert!(ColorMode::Always.color_support().is_supported());
        assert!(!ColorMode::Never.color_support().is_supported());
    }
}
