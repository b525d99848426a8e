//! Terminal styling for marquee.
//!
//! Text is written with lightweight markup (`<info>done</info>`) and rendered
//! to ANSI SGR sequences by an [`OutputFormatter`]. Tags nest; closing an
//! inner tag restores the enclosing style rather than resetting to the
//! terminal default.

mod error;
mod formatter;
pub mod helper;
mod sheet;
mod stack;
mod style;

pub use error::{StyleError, StyleResult};
pub use formatter::{OutputFormatter, strip_tags};
pub use sheet::{StyleSheet, StyleSpec};
pub use stack::StyleStack;
pub use style::{Color, Style, TextOption};
