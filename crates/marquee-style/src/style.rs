use std::fmt;
use std::str::FromStr;

use crate::error::{StyleError, StyleResult};

const FG_RESET: u8 = 39;
const BG_RESET: u8 = 49;

/// One of the eight base ANSI colors, or the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Default,
}

impl Color {
    pub const ALL: [Color; 9] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
        Color::Default,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
            Color::Default => "default",
        }
    }

    fn offset(self) -> u8 {
        match self {
            Color::Black => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
            Color::Default => 9,
        }
    }

    pub fn foreground_code(self) -> u8 {
        30 + self.offset()
    }

    pub fn background_code(self) -> u8 {
        40 + self.offset()
    }

    fn parse_for(element: &str, name: &str) -> StyleResult<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| invalid(element, name, Self::ALL.iter().map(|c| c.name())))
    }

    pub fn foreground(name: &str) -> StyleResult<Self> {
        Self::parse_for("foreground color", name)
    }

    pub fn background(name: &str) -> StyleResult<Self> {
        Self::parse_for("background color", name)
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_for("color", s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SGR text attributes with their set/reset code pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextOption {
    Bold,
    Underscore,
    Blink,
    Reverse,
    Conceal,
}

impl TextOption {
    pub const ALL: [TextOption; 5] = [
        TextOption::Bold,
        TextOption::Underscore,
        TextOption::Blink,
        TextOption::Reverse,
        TextOption::Conceal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextOption::Bold => "bold",
            TextOption::Underscore => "underscore",
            TextOption::Blink => "blink",
            TextOption::Reverse => "reverse",
            TextOption::Conceal => "conceal",
        }
    }

    pub fn set_code(self) -> u8 {
        match self {
            TextOption::Bold => 1,
            TextOption::Underscore => 4,
            TextOption::Blink => 5,
            TextOption::Reverse => 7,
            TextOption::Conceal => 8,
        }
    }

    pub fn unset_code(self) -> u8 {
        match self {
            TextOption::Bold => 22,
            TextOption::Underscore => 24,
            TextOption::Blink => 25,
            TextOption::Reverse => 27,
            TextOption::Conceal => 28,
        }
    }
}

impl FromStr for TextOption {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.name() == s)
            .ok_or_else(|| invalid("option", s, Self::ALL.iter().map(|o| o.name())))
    }
}

impl fmt::Display for TextOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn invalid<'a>(element: &str, value: &str, expected: impl Iterator<Item = &'a str>) -> StyleError {
    let expected: Vec<&str> = expected.collect();
    StyleError::InvalidArgument(format!(
        "Invalid {element} specified: \"{value}\". Expected one of ({})",
        expected.join(", ")
    ))
}

/// A foreground, a background and a set of text options.
///
/// `Style::default()` has none of them and renders text unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    foreground: Option<Color>,
    background: Option<Color>,
    options: Vec<TextOption>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a style from color and option names, as found in style sheets.
    pub fn from_names<S: AsRef<str>>(
        foreground: Option<&str>,
        background: Option<&str>,
        options: &[S],
    ) -> StyleResult<Self> {
        let mut style = Self::new();
        if let Some(name) = foreground {
            style.foreground = Some(Color::foreground(name)?);
        }
        if let Some(name) = background {
            style.background = Some(Color::background(name)?);
        }
        for option in options {
            style.set_option(option.as_ref().parse()?);
        }
        Ok(style)
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_option(mut self, option: TextOption) -> Self {
        self.set_option(option);
        self
    }

    pub fn set_foreground(&mut self, color: Option<Color>) {
        self.foreground = color;
    }

    pub fn set_background(&mut self, color: Option<Color>) {
        self.background = color;
    }

    /// Add an option; already present options keep their position.
    pub fn set_option(&mut self, option: TextOption) {
        if !self.options.contains(&option) {
            self.options.push(option);
        }
    }

    pub fn unset_option(&mut self, option: TextOption) {
        self.options.retain(|o| *o != option);
    }

    pub fn set_options(&mut self, options: impl IntoIterator<Item = TextOption>) {
        self.options.clear();
        for option in options {
            self.set_option(option);
        }
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn options(&self) -> &[TextOption] {
        &self.options
    }

    pub fn has_option(&self, option: TextOption) -> bool {
        self.options.contains(&option)
    }

    /// Codes that switch this style on: foreground, background, options.
    pub fn set_codes(&self) -> Vec<u8> {
        let mut codes = Vec::with_capacity(2 + self.options.len());
        codes.extend(self.foreground.map(Color::foreground_code));
        codes.extend(self.background.map(Color::background_code));
        codes.extend(self.options.iter().map(|o| o.set_code()));
        codes
    }

    /// Codes that return to the terminal defaults, paired with [`Self::set_codes`].
    pub fn unset_codes(&self) -> Vec<u8> {
        let mut codes = Vec::with_capacity(2 + self.options.len());
        if self.foreground.is_some() {
            codes.push(FG_RESET);
        }
        if self.background.is_some() {
            codes.push(BG_RESET);
        }
        codes.extend(self.options.iter().map(|o| o.unset_code()));
        codes
    }

    /// Codes that end this style when it is nested inside `parent`, leaving the
    /// terminal in `parent`'s state instead of the defaults.
    pub fn restore_codes(&self, parent: &Style) -> Vec<u8> {
        let mut codes = Vec::new();

        if self.foreground.is_some() || parent.foreground.is_some() {
            codes.push(parent.foreground.map_or(FG_RESET, Color::foreground_code));
        }
        if self.background.is_some() || parent.background.is_some() {
            codes.push(parent.background.map_or(BG_RESET, Color::background_code));
        }

        for option in &self.options {
            if parent.has_option(*option) {
                codes.push(option.set_code());
            } else {
                codes.push(option.unset_code());
            }
        }
        for option in &parent.options {
            if !self.has_option(*option) {
                codes.push(option.set_code());
            }
        }

        codes
    }

    /// Wrap `text` in this style's set and reset sequences.
    pub fn apply(&self, text: &str) -> String {
        self.apply_with_restore(text, &self.unset_codes())
    }

    /// Wrap `text` in this style's set sequence followed by `restore`.
    pub fn apply_with_restore(&self, text: &str, restore: &[u8]) -> String {
        let set = self.set_codes();
        if set.is_empty() {
            return text.to_string();
        }
        let mut out = format!("\x1b[{}m{text}", join_codes(&set));
        if !restore.is_empty() {
            out.push_str(&format!("\x1b[{}m", join_codes(restore)));
        }
        out
    }
}

fn join_codes(codes: &[u8]) -> String {
    codes
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(";")
}
