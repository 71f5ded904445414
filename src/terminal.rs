//! ANSI color wrapping for report text.

use std::rc::Rc;
use std::str::FromStr;

use termcolor::Color;

use crate::color::ColorSupport;

const RESET: &str = "\x1b[0m";

/// Wraps text in SGR escapes when the configured [`ColorSupport`] allows it.
#[derive(Clone)]
pub struct TerminalString {
    color_support: Rc<dyn ColorSupport>,
}

impl TerminalString {
    pub fn new(color_support: Rc<dyn ColorSupport>) -> Self {
        Self { color_support }
    }

    pub fn from_boxed(color_support: Box<dyn ColorSupport>) -> Self {
        Self {
            color_support: Rc::from(color_support),
        }
    }

    /// Colors `content` with optional foreground and background names.
    ///
    /// Unknown names contribute nothing. With no usable code, or when color
    /// is unsupported, `content` comes back unchanged. Each line is wrapped
    /// separately so a color never bleeds past a line break.
    pub fn text(&self, content: &str, fg: Option<&str>, bg: Option<&str>) -> String {
        if fg.is_none() && bg.is_none() {
            return content.to_string();
        }
        if !self.color_support.is_supported() {
            return content.to_string();
        }

        let codes: Vec<&str> = fg
            .and_then(foreground_code)
            .into_iter()
            .chain(bg.and_then(background_code))
            .collect();
        if codes.is_empty() {
            return content.to_string();
        }

        let sgr = format!("\x1b[{}m", codes.join(";"));
        content
            .split('\n')
            .map(|line| {
                let line = line.strip_suffix('\r').unwrap_or(line);
                format!("{sgr}{line}{RESET}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Foreground-only shorthand used by the per-test report lines.
    pub fn fg(&self, content: &str, color: &str) -> String {
        self.text(content, Some(color), None)
    }
}

/// Names are matched exactly. termcolor also accepts other casings and
/// ANSI256 or RGB forms, none of which have a code here.
fn named_color(name: &str) -> Option<Color> {
    if !matches!(
        name,
        "black" | "red" | "green" | "yellow" | "blue" | "magenta" | "cyan" | "white"
    ) {
        return None;
    }
    Color::from_str(name).ok()
}

fn foreground_code(name: &str) -> Option<&'static str> {
    Some(match named_color(name)? {
        Color::Black => "30",
        Color::Red => "31",
        Color::Green => "32",
        Color::Yellow => "33",
        Color::Blue => "34",
        Color::Magenta => "35",
        Color::Cyan => "36",
        Color::White => "97",
        _ => return None,
    })
}

fn background_code(name: &str) -> Option<&'static str> {
    Some(match named_color(name)? {
        Color::Black => "40",
        Color::Red => "41",
        Color::Green => "42",
        Color::Yellow => "43",
        Color::Blue => "44",
        Color::Magenta => "45",
        Color::Cyan => "46",
        Color::White => "107",
        _ => return None,
    })
}
