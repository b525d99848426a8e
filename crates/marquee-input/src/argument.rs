use crate::error::{InputError, InputResult};
use crate::value::Value;

/// How a positional argument is consumed: required or optional, and whether
/// it collects every remaining token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgumentMode {
    required: bool,
    array: bool,
}

impl ArgumentMode {
    pub const REQUIRED: Self = Self {
        required: true,
        array: false,
    };
    pub const OPTIONAL: Self = Self {
        required: false,
        array: false,
    };
    pub const REQUIRED_ARRAY: Self = Self {
        required: true,
        array: true,
    };
    pub const OPTIONAL_ARRAY: Self = Self {
        required: false,
        array: true,
    };

    const BIT_REQUIRED: u8 = 1;
    const BIT_OPTIONAL: u8 = 2;
    const BIT_IS_ARRAY: u8 = 4;

    /// Decode the flag encoding `REQUIRED=1 | OPTIONAL=2 | IS_ARRAY=4`.
    ///
    /// Only the combinations that describe a real mode are accepted;
    /// `REQUIRED | OPTIONAL` is rejected.
    pub fn from_bits(bits: u8) -> InputResult<Self> {
        match bits {
            1 => Ok(Self::REQUIRED),
            2 => Ok(Self::OPTIONAL),
            4 | 6 => Ok(Self::OPTIONAL_ARRAY),
            5 => Ok(Self::REQUIRED_ARRAY),
            _ => Err(InputError::InvalidArgument(format!(
                "Argument mode \"{bits}\" is not valid."
            ))),
        }
    }

    /// Build a mode from flag names (`required`, `optional`, `array`).
    ///
    /// An empty list means `optional`.
    pub fn from_flags<I, S>(flags: I) -> InputResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bits = 0u8;
        for flag in flags {
            bits |= match flag.as_ref().trim().to_ascii_lowercase().as_str() {
                "required" => Self::BIT_REQUIRED,
                "optional" => Self::BIT_OPTIONAL,
                "array" | "is_array" | "is-array" => Self::BIT_IS_ARRAY,
                other => {
                    return Err(InputError::InvalidArgument(format!(
                        "Argument mode flag \"{other}\" is not valid. Expected one of (required, optional, array)"
                    )));
                }
            };
        }
        if bits == 0 {
            return Ok(Self::OPTIONAL);
        }
        Self::from_bits(bits)
    }

    pub fn bits(self) -> u8 {
        let base = if self.required {
            Self::BIT_REQUIRED
        } else {
            Self::BIT_OPTIONAL
        };
        if self.array {
            base | Self::BIT_IS_ARRAY
        } else {
            base
        }
    }

    pub fn is_required(self) -> bool {
        self.required
    }

    pub fn is_array(self) -> bool {
        self.array
    }
}

impl Default for ArgumentMode {
    fn default() -> Self {
        Self::OPTIONAL
    }
}

/// A positional command-line argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputArgument {
    name: String,
    mode: ArgumentMode,
    description: String,
    default: Value,
}

impl InputArgument {
    pub fn new(name: impl Into<String>, mode: ArgumentMode) -> Self {
        let default = if mode.is_array() {
            Value::List(Vec::new())
        } else {
            Value::Null
        };
        Self {
            name: name.into(),
            mode,
            description: String::new(),
            default,
        }
    }

    pub fn required(name: impl Into<String>) -> Self {
        Self::new(name, ArgumentMode::REQUIRED)
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self::new(name, ArgumentMode::OPTIONAL)
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
    /// Required arguments cannot carry a default; array arguments need a list
    /// (`Null` resets them to the empty list).
    pub fn set_default(&mut self, default: Value) -> InputResult<()> {
        if self.mode.is_required() && !default.is_null() {
            return Err(InputError::Logic(
                "Cannot set a default value for a required argument.".to_string(),
            ));
        }

        if self.mode.is_array() {
            self.default = match default {
                Value::Null => Value::List(Vec::new()),
                Value::List(items) => Value::List(items),
                _ => {
                    return Err(InputError::Logic(
                        "A default value for an array argument must be an array.".to_string(),
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

    pub fn mode(&self) -> ArgumentMode {
        self.mode
    }

    pub fn is_required(&self) -> bool {
        self.mode.is_required()
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

#[cfg(test)]
mod tests {
    use super::{ArgumentMode, InputArgument};
    use crate::error::InputError;
    use crate::value::Value;

    #[test]
    fn mode_bits_follow_allow_list() {
        assert_eq!(ArgumentMode::from_bits(1).unwrap(), ArgumentMode::REQUIRED);
        assert_eq!(ArgumentMode::from_bits(2).unwrap(), ArgumentMode::OPTIONAL);
        assert_eq!(
            ArgumentMode::from_bits(5).unwrap(),
            ArgumentMode::REQUIRED_ARRAY
        );
        assert_eq!(
            ArgumentMode::from_bits(4).unwrap(),
            ArgumentMode::OPTIONAL_ARRAY
        );

        for bad in [0u8, 3, 7, 8, 42] {
            let err = ArgumentMode::from_bits(bad).unwrap_err();
            assert_eq!(
                err,
                InputError::InvalidArgument(format!("Argument mode \"{bad}\" is not valid."))
            );
        }
    }

    #[test]
    fn mode_from_flag_names() {
        assert_eq!(
            ArgumentMode::from_flags(["required", "array"]).unwrap(),
            ArgumentMode::REQUIRED_ARRAY
        );
        assert_eq!(
            ArgumentMode::from_flags(Vec::<String>::new()).unwrap(),
            ArgumentMode::OPTIONAL
        );
        assert!(matches!(
            ArgumentMode::from_flags(["sometimes"]),
            Err(InputError::InvalidArgument(_))
        ));
        assert!(matches!(
            ArgumentMode::from_flags(["required", "optional"]),
            Err(InputError::InvalidArgument(_))
        ));
    }

    #[test]
    fn defaults_follow_mode() {
        let arg = InputArgument::optional("foo").with_default("bar").unwrap();
        assert_eq!(arg.default_value(), &Value::from("bar"));

        let arg = InputArgument::new("foo", ArgumentMode::OPTIONAL_ARRAY);
        assert_eq!(arg.default_value(), &Value::List(Vec::new()));

        let arg = InputArgument::new("foo", ArgumentMode::OPTIONAL_ARRAY)
            .with_default(vec!["a", "b"])
            .unwrap();
        assert_eq!(arg.default_value(), &Value::from(vec!["a", "b"]));
    }

    #[test]
    fn required_argument_rejects_default() {
        let err = InputArgument::required("foo")
            .with_default("bar")
            .unwrap_err();
        assert!(matches!(err, InputError::Logic(_)));
        assert_eq!(
            err.to_string(),
            "Cannot set a default value for a required argument."
        );

        let mut arg = InputArgument::required("foo");
        assert!(arg.set_default(Value::Null).is_ok());
    }

    #[test]
    fn array_argument_requires_list_default() {
        let err = InputArgument::new("foo", ArgumentMode::OPTIONAL_ARRAY)
            .with_default("bar")
            .unwrap_err();
        assert_eq!(
            err,
            InputError::Logic("A default value for an array argument must be an array.".to_string())
        );
    }
}
