//! ANSI color codes for terminal output.
//!
//! Candid values and type tables share one palette:
//! - Blue: field labels, section headers
//! - Green: text and principal literals
//! - Dim: punctuation, keywords, table indices

/// ANSI color palette for printed values and dumps.
///
/// Uses only standard 16-color ANSI codes so output reads in light and dark themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        green: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        blue: "",
        green: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.blue.is_empty()
    }

    /// Wrap `text` in `color` and a trailing reset.
    pub fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            return text.to_string();
        }
        format!("{color}{text}{}", self.reset)
    }
}
