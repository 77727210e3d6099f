//! Terminal styling for human-readable output.
//!
//! Colors are applied only when the destination stream is a terminal, so piped
//! output and test captures stay plain text.

use is_terminal::IsTerminal;
use owo_colors::{AnsiColors, OwoColorize};
use std::io::{self, Write};

/// The logical parts of the output that get their own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Header,
    Stage,
    RuleName,
    Before,
    After,
    Success,
    Warn,
    Error,
}

impl Style {
    pub fn color(self) -> AnsiColors {
        match self {
            Style::Header => AnsiColors::BrightWhite,
            Style::Stage => AnsiColors::Cyan,
            Style::RuleName => AnsiColors::BrightBlue,
            Style::Before => AnsiColors::Red,
            Style::After => AnsiColors::Green,
            Style::Success => AnsiColors::BrightGreen,
            Style::Warn => AnsiColors::Yellow,
            Style::Error => AnsiColors::BrightRed,
        }
    }
}

/// Whether stdout should receive ANSI colors.
pub fn stdout_supports_color() -> bool {
    io::stdout().is_terminal()
}

/// Whether stderr should receive ANSI colors.
pub fn stderr_supports_color() -> bool {
    io::stderr().is_terminal()
}

/// Renders `text` in the color of `style`, or unchanged when `enable_colors` is false.
pub fn paint(text: &str, style: Style, enable_colors: bool) -> String {
    if enable_colors {
        text.color(style.color()).to_string()
    } else {
        text.to_string()
    }
}

pub fn print_success_message<W: Write>(writer: &mut W, msg: &str, enable_colors: bool) -> io::Result<()> {
    writeln!(writer, "{}", paint(msg, Style::Success, enable_colors))
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, enable_colors: bool) -> io::Result<()> {
    writeln!(writer, "{}", paint(&format!("Warning: {}", msg), Style::Warn, enable_colors))
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, enable_colors: bool) -> io::Result<()> {
    writeln!(writer, "{}", paint(&format!("Error: {}", msg), Style::Error, enable_colors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_plain_when_disabled() {
        assert_eq!(paint("credit card", Style::After, false), "credit card");
    }

    #[test]
    fn test_paint_wraps_in_ansi_when_enabled() {
        let painted = paint("cc", Style::Before, true);
        assert!(painted.starts_with("\u{1b}["));
        assert!(painted.contains("cc"));
    }

    #[test]
    fn test_print_error_message_prefix() {
        let mut buf = Vec::new();
        print_error_message(&mut buf, "bad rule", false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Error: bad rule\n");
    }
}
