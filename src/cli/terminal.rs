//! Colour helpers for terminal output

use std::fmt;

use owo_colors::{OwoColorize, colors::css};

/// Whether stdout accepts ANSI colours.
fn colour_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

fn paint(text: String, style: impl FnOnce(&str) -> String) -> String {
    if colour_enabled() { style(&text) } else { text }
}

/// Extension trait for colourising anything printable.
pub trait Colorize: fmt::Display {
    /// Green
    fn success(&self) -> String {
        paint(self.to_string(), |s| s.fg::<css::Green>().to_string())
    }

    /// Amber
    fn warning(&self) -> String {
        paint(self.to_string(), |s| s.fg::<css::Orange>().to_string())
    }

    /// Blue
    fn info(&self) -> String {
        paint(self.to_string(), |s| s.fg::<css::LightBlue>().to_string())
    }

    /// Dimmed
    fn dim(&self) -> String {
        paint(self.to_string(), |s| s.dimmed().to_string())
    }
}

impl<T: fmt::Display + ?Sized> Colorize for T {}
