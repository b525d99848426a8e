//! Input definitions and parsing for marquee commands.
//!
//! A [`Definition`] declares the positional [`InputArgument`]s and named
//! [`InputOption`]s a command accepts. Raw input is bound against it by one of
//! the [`Input`] implementations:
//! - [`ArgvInput`] for process-style token lists (`--name=value`, `-abc`, `--`)
//! - [`ArrayInput`] for programmatic `(key, value)` pairs

mod argument;
mod argv;
mod array;
mod definition;
mod error;
mod input;
mod option;
mod value;

pub use argument::{ArgumentMode, InputArgument};
pub use argv::ArgvInput;
pub use array::{ArrayInput, ParamKey};
pub use definition::{Definition, DefinitionItem};
pub use error::{InputError, InputResult};
pub use input::{Input, InputState};
pub use option::{InputOption, OptionMode, ShortcutNames, ValueMode};
pub use value::Value;
