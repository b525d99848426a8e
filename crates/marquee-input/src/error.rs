use thiserror::Error;

pub type InputResult<T> = Result<T, InputError>;

/// Failures raised while declaring or parsing input.
///
/// `InvalidArgument` and `Logic` are programmer errors (bad construction or a
/// broken definition invariant). `Runtime` comes from the actual process input.
/// The `*NotFound` and `OptionValueRequired` variants are the typed lookup
/// failures callers can branch on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Logic(String),

    #[error("Argument \"{0}\" does not exist.")]
    ArgumentNotFound(String),

    #[error("Option \"{}\" does not exist.", display_option(.0))]
    OptionNotFound(String),

    #[error("Option \"--{0}\" requires a value.")]
    OptionValueRequired(String),

    #[error("{0}")]
    Runtime(String),
}

impl InputError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// One-character names are shortcuts (`-f`), everything else is long (`--foo`).
fn display_option(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}
