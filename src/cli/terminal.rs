//! Coloured terminal output

use std::fmt::Display;

use owo_colors::{colors::css, OwoColorize};

/// Extension trait for colorizing output.
///
/// Colours are only applied when stdout supports them.
pub trait Colorize: Display {
    /// Color as success (green)
    fn success(&self) -> String {
        paint(self, |text| text.fg::<css::Green>().to_string())
    }

    /// Color as warning (amber)
    fn warning(&self) -> String {
        paint(self, |text| text.fg::<css::Orange>().to_string())
    }

    /// Color as info (blue)
    fn info(&self) -> String {
        paint(self, |text| text.fg::<css::LightBlue>().to_string())
    }

    /// Dim the text
    fn dim(&self) -> String {
        paint(self, |text| text.dimmed().to_string())
    }
}

impl<T: Display + ?Sized> Colorize for T {}

fn paint<T: Display + ?Sized>(text: &T, style: impl FnOnce(&T) -> String) -> String {
    if supports_color::on_cached(supports_color::Stream::Stdout).is_some() {
        style(text)
    } else {
        text.to_string()
    }
}
