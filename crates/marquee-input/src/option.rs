use crate::error::{InputError, InputResult};
use crate::value::Value;

/// Whether an option takes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueMode {
    /// A plain flag (`--verbose`).
    None,
    /// `--output FILE` / `--output=FILE`, the value must be present.
    Required,
    /// `--color` or `--color=auto`.
    Optional,
}

/// Value handling of an option plus whether it may repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionMode {
    value: ValueMode,
    array: bool,
}

impl OptionMode {
    pub const NONE: Self = Self {
        value: ValueMode::None,
        array: false,
    };
    pub const REQUIRED: Self = Self {
        value: ValueMode::Required,
        array: false,
    };
    pub const OPTIONAL: Self = Self {
        value: ValueMode::Optional,
        array: false,
    };
    pub const REQUIRED_ARRAY: Self = Self {
        value: ValueMode::Required,
        array: true,
    };
    pub const OPTIONAL_ARRAY: Self = Self {
        value: ValueMode::Optional,
        array: true,
    };

    const BIT_NONE: u8 = 1;
    const BIT_REQUIRED: u8 = 2;
    const BIT_OPTIONAL: u8 = 4;
    const BIT_IS_ARRAY: u8 = 8;

    /// Decode `VALUE_NONE=1 | VALUE_REQUIRED=2 | VALUE_OPTIONAL=4 | VALUE_IS_ARRAY=8`.
    ///
    /// Exactly one value bit must be set, and a flag (`VALUE_NONE`) cannot repeat.
    pub fn from_bits(bits: u8) -> InputResult<Self> {
        match bits {
            1 => Ok(Self::NONE),
            2 => Ok(Self::REQUIRED),
            4 => Ok(Self::OPTIONAL),
            10 => Ok(Self::REQUIRED_ARRAY),
            12 => Ok(Self::OPTIONAL_ARRAY),
            _ => Err(InputError::InvalidArgument(format!(
                "Option mode \"{bits}\" is not valid."
            ))),
        }
    }

    /// Build a mode from flag names (`none`, `required`, `optional`, `array`).
    ///
    /// An empty list means `none`.
    pub fn from_flags<I, S>(flags: I) -> InputResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bits = 0u8;
        for flag in flags {
            bits |= match flag.as_ref().trim().to_ascii_lowercase().as_str() {
                "none" => Self::BIT_NONE,
                "required" => Self::BIT_REQUIRED,
                "optional" => Self::BIT_OPTIONAL,
                "array" | "is_array" | "is-array" => Self::BIT_IS_ARRAY,
                other => {
                    return Err(InputError::InvalidArgument(format!(
                        "Option mode flag \"{other}\" is not valid. Expected one of (none, required, optional, array)"
                    )));
                }
            };
        }
        if bits == 0 {
            return Ok(Self::NONE);
        }
        Self::from_bits(bits)
    }

    pub fn bits(self) -> u8 {
        let base = match self.value {
            ValueMode::None => Self::BIT_NONE,
            ValueMode::Required => Self::BIT_REQUIRED,
            ValueMode::Optional => Self::BIT_OPTIONAL,
        };
        if self.array {
            base | Self::BIT_IS_ARRAY
        } else {
            base
        }
    }

    pub fn value_mode(self) -> ValueMode {
        self.value
    }

    pub fn accepts_value(self) -> bool {
        self.value != ValueMode::None
    }

    pub fn is_array(self) -> bool {
        self.array
    }
}

impl Default for OptionMode {
    fn default() -> Self {
        Self::NONE
    }
}

/// Shortcut spellings accepted by [`InputOption::with_shortcut`].
///
/// Accepts a single string (`"f"`, `"-f"`, `"f|ff"`) or a list of them.
pub trait ShortcutNames<'a> {
    type Iter: Iterator<Item = &'a str>;
    fn iter(self) -> Self::Iter;
}

impl<'a> ShortcutNames<'a> for &'a str {
    type Iter = std::iter::Once<&'a str>;

    fn iter(self) -> Self::Iter {
        std::iter::once(self)
    }
}

impl<'a> ShortcutNames<'a> for &'a [&'a str] {
    type Iter = std::iter::Copied<std::slice::Iter<'a, &'a str>>;

    fn iter(self) -> Self::Iter {
        self.iter().copied()
    }
}

impl<'a, const N: usize> ShortcutNames<'a> for [&'a str; N] {
    type Iter = std::array::IntoIter<&'a str, N>;

    fn iter(self) -> Self::Iter {
        self.into_iter()
    }
}

impl<'a> ShortcutNames<'a> for &'a [String] {
    type Iter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn iter(self) -> Self::Iter {
        self.iter().map(String::as_str)
    }
}

fn normalize_shortcut<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let parts: Vec<&str> = names
        .flat_map(|name| name.split('|'))
        .map(|part| part.trim().trim_start_matches('-'))
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("|"))
    }
}

/// A named command-line option (`--name`, with optional `-s` shortcuts).
#[derive(Debug, Clone)]
pub struct InputOption {
    name: String,
    shortcut: Option<String>,
    mode: OptionMode,
    description: String,
    default: Value,
}

impl InputOption {
    /// Create an option. A leading `--` on `name` is stripped.
    pub fn new(name: impl AsRef<str>, mode: OptionMode) -> InputResult<Self> {
        let raw = name.as_ref();
        let name = raw.strip_prefix("--").unwrap_or(raw);
        if name.is_empty() {
            return Err(InputError::InvalidArgument(
                "An option name cannot be empty.".to_string(),
            ));
        }

        let default = if !mode.accepts_value() {
            Value::Bool(false)
        } else if mode.is_array() {
            Value::List(Vec::new())
        } else {
            Value::Null
        };

        Ok(Self {
            name: name.to_string(),
            shortcut: None,
            mode,
            description: String::new(),
            default,
        })
    }

    /// Shorthand for a valueless flag.
    pub fn flag(name: impl AsRef<str>) -> InputResult<Self> {
        Self::new(name, OptionMode::NONE)
    }

    /// Attach shortcut(s). Leading dashes are stripped and empty entries are
    /// dropped; if nothing remains the option has no shortcut.
    pub fn with_shortcut<'a, N: ShortcutNames<'a>>(mut self, names: N) -> Self {
        self.shortcut = normalize_shortcut(names.iter());
        if self.shortcut.is_none() {
            tracing::warn!(option = %self.name, "shortcut is empty after normalization; ignoring it");
        }
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> InputResult<Self> {
        self.set_default(default.into())?;
        Ok(self)
    }

    /// Replace the default value.
    ///
    /// Flags cannot carry a default (they always report `false`); array options
    /// need a list (`Null` resets them to the empty list).
    pub fn set_default(&mut self, default: Value) -> InputResult<()> {
        if !self.mode.accepts_value() {
            if !default.is_null() {
                return Err(InputError::Logic(
                    "Cannot set a default value when using VALUE_NONE mode.".to_string(),
                ));
            }
            self.default = Value::Bool(false);
            return Ok(());
        }

        if self.mode.is_array() {
            self.default = match default {
                Value::Null => Value::List(Vec::new()),
                Value::List(items) => Value::List(items),
                _ => {
                    return Err(InputError::Logic(
                        "A default value for an array option must be an array.".to_string(),
                    ));
                }
            };
            return Ok(());
        }

        self.default = default;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical `|`-joined shortcut list.
    pub fn shortcut(&self) -> Option<&str> {
        self.shortcut.as_deref()
    }

    pub fn shortcuts(&self) -> impl Iterator<Item = &str> {
        self.shortcut.as_deref().into_iter().flat_map(|s| s.split('|'))
    }

    pub fn mode(&self) -> OptionMode {
        self.mode
    }

    pub fn accepts_value(&self) -> bool {
        self.mode.accepts_value()
    }

    pub fn is_value_required(&self) -> bool {
        self.mode.value_mode() == ValueMode::Required
    }

    pub fn is_value_optional(&self) -> bool {
        self.mode.value_mode() == ValueMode::Optional
    }

    pub fn is_array(&self) -> bool {
        self.mode.is_array()
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Structural equality used to merge repeated registrations: name, shortcut,
/// default and value/array handling must match. The description is ignored.
impl PartialEq for InputOption {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.shortcut == other.shortcut
            && self.default == other.default
            && self.is_array() == other.is_array()
            && self.is_value_required() == other.is_value_required()
            && self.is_value_optional() == other.is_value_optional()
    }
}

impl Eq for InputOption {}
