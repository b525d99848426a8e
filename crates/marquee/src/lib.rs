//! Console commands for marquee.
//!
//! A [`Command`] declares its [`CommandSpec`] (name, help, input definition)
//! and implements `execute`; [`Command::run`] drives binding, interaction,
//! validation and execution against any [`Input`] and [`Output`].

mod command;
pub mod describe;
mod error;
mod manifest;
mod output;
mod tester;

pub use command::{Command, CommandSpec};
pub use error::{Error, Result};
pub use manifest::{ArgumentManifest, CommandManifest, OptionManifest, ShortcutSpec};
pub use output::{
    BufferedOutput, ConsoleOutput, NullOutput, Output, OutputType, StreamOutput, Verbosity,
    WriteOptions,
};
pub use tester::{CommandTester, TesterOptions};

pub use marquee_input::{
    ArgumentMode, ArgvInput, ArrayInput, Definition, DefinitionItem, Input, InputArgument,
    InputError, InputOption, OptionMode, ParamKey, Value,
};
pub use marquee_style::{Color, OutputFormatter, Style, StyleError, StyleSheet, TextOption};
