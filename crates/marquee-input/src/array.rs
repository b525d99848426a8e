use std::fmt;

use crate::error::{InputError, InputResult};
use crate::input::{Input, InputState, escape_token};
use crate::value::Value;

/// Key of one [`ArrayInput`] parameter: `--name`, `-x`, an argument name, or
/// a positional index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Index(usize),
    Name(String),
}

impl From<usize> for ParamKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl ParamKey {
    fn is_option(&self) -> bool {
        matches!(self, Self::Name(name) if name.starts_with('-'))
    }
}

/// Input built from ordered `(key, value)` pairs, for programmatic callers
/// and tests.
///
/// Unlike [`ArgvInput`](crate::ArgvInput) there is no token stream, so a
/// `Null` option value is resolved without lookahead and lookup failures are
/// reported with the typed `*NotFound` errors.
#[derive(Debug, Clone, Default)]
pub struct ArrayInput {
    parameters: Vec<(ParamKey, Value)>,
    state: InputState,
}

impl ArrayInput {
    pub fn new<I, K, V>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ParamKey>,
        V: Into<Value>,
    {
        Self {
            parameters: parameters
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            state: InputState::default(),
        }
    }

    /// Append one parameter; takes effect on the next bind.
    pub fn push(&mut self, key: impl Into<ParamKey>, value: impl Into<Value>) {
        self.parameters.push((key.into(), value.into()));
    }

    pub fn parameters(&self) -> &[(ParamKey, Value)] {
        &self.parameters
    }

    fn parse_parameters(&mut self, parameters: &[(ParamKey, Value)]) -> InputResult<()> {
        for (key, value) in parameters {
            tracing::trace!(?key, ?value, "array parameter");
            if is_sentinel(key, value) {
                break;
            }
            match key {
                ParamKey::Name(name) if name.starts_with("--") => {
                    self.add_long_option(&name[2..], value)?;
                }
                ParamKey::Name(name) if name.starts_with('-') => {
                    self.add_short_option(&name[1..], value)?;
                }
                _ => self.add_argument(key, value)?,
            }
        }
        Ok(())
    }

    fn add_short_option(&mut self, shortcut: &str, value: &Value) -> InputResult<()> {
        let name = self
            .state
            .definition
            .option_by_shortcut(shortcut)?
            .name()
            .to_string();
        self.add_long_option(&name, value)
    }

    fn add_long_option(&mut self, name: &str, value: &Value) -> InputResult<()> {
        let option = self.state.definition.option(name)?;
        let resolved = if value.is_null() {
            if option.is_value_required() {
                return Err(InputError::OptionValueRequired(name.to_string()));
            }
            if option.accepts_value() {
                option.default_value().clone()
            } else {
                Value::Bool(true)
            }
        } else {
            value.clone()
        };
        self.state.options.insert(name.to_string(), resolved);
        Ok(())
    }

    fn add_argument(&mut self, key: &ParamKey, value: &Value) -> InputResult<()> {
        let definition = &self.state.definition;
        let argument = match key {
            ParamKey::Index(position) => definition.argument_at(*position)?,
            ParamKey::Name(name) => definition.argument(name)?,
        };
        self.state
            .arguments
            .insert(argument.name().to_string(), value.clone());
        Ok(())
    }
}

fn is_sentinel(key: &ParamKey, value: &Value) -> bool {
    match key {
        ParamKey::Name(name) => name == "--",
        ParamKey::Index(_) => value.as_str() == Some("--"),
    }
}

impl Input for ArrayInput {
    fn state(&self) -> &InputState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    fn parse(&mut self) -> InputResult<()> {
        let parameters = std::mem::take(&mut self.parameters);
        let result = self.parse_parameters(&parameters);
        self.parameters = parameters;
        result
    }

    fn first_argument(&self) -> Option<String> {
        self.parameters
            .iter()
            .find(|(key, _)| !key.is_option())
            .map(|(_, value)| value.to_string())
    }

    fn has_parameter_option(&self, values: &[&str], only_params: bool) -> bool {
        for (key, value) in &self.parameters {
            let candidate = match key {
                ParamKey::Name(name) => Some(name.as_str()),
                ParamKey::Index(_) => value.as_str(),
            };
            let Some(candidate) = candidate else {
                continue;
            };
            if only_params && candidate == "--" {
                return false;
            }
            if values.contains(&candidate) {
                return true;
            }
        }
        false
    }

    /// A positional match has no value of its own and reports `true`.
    fn parameter_option(&self, values: &[&str], default: Value, only_params: bool) -> Value {
        for (key, value) in &self.parameters {
            if only_params && is_sentinel(key, value) {
                return default;
            }
            match key {
                ParamKey::Index(_) => {
                    if value.as_str().is_some_and(|v| values.contains(&v)) {
                        return Value::Bool(true);
                    }
                }
                ParamKey::Name(name) => {
                    if values.contains(&name.as_str()) {
                        return value.clone();
                    }
                }
            }
        }
        default
    }
}

impl fmt::Display for ArrayInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, value)) in self.parameters.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            match key {
                ParamKey::Name(name) if key.is_option() => {
                    let rendered = value.to_string();
                    if rendered.is_empty() {
                        f.write_str(name)?;
                    } else {
                        write!(f, "{name}={}", escape_token(&rendered))?;
                    }
                }
                _ => f.write_str(&escape_token(&value.to_string()))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrayInput, ParamKey};
    use crate::argument::InputArgument;
    use crate::definition::{Definition, DefinitionItem};
    use crate::error::InputError;
    use crate::input::Input;
    use crate::option::{InputOption, OptionMode};
    use crate::value::Value;

    fn foo_with_default(mode: OptionMode) -> DefinitionItem {
        InputOption::new("foo", mode)
            .unwrap()
            .with_shortcut("f")
            .with_default("default")
            .unwrap()
            .into()
    }

    fn bind(input: &mut ArrayInput, items: Vec<DefinitionItem>) -> Result<(), InputError> {
        input.bind(&Definition::from_items(items).unwrap())
    }

    #[test]
    fn first_argument() {
        let input = ArrayInput::new(Vec::<(ParamKey, Value)>::new());
        assert_eq!(input.first_argument(), None);

        let input = ArrayInput::new([("name", "Fabien")]);
        assert_eq!(input.first_argument(), Some("Fabien".to_string()));

        let input = ArrayInput::new([("--foo", "bar"), ("name", "Fabien")]);
        assert_eq!(input.first_argument(), Some("Fabien".to_string()));
    }

    #[test]
    fn has_parameter_option() {
        let input = ArrayInput::new([("name", "Fabien"), ("--foo", "bar")]);
        assert!(input.has_parameter_option(&["--foo"], false));
        assert!(!input.has_parameter_option(&["--bar"], false));

        let input = ArrayInput::new([(0usize, "--foo")]);
        assert!(input.has_parameter_option(&["--foo"], false));

        let input = ArrayInput::new([(0usize, "--foo"), (1, "--"), (2, "--bar")]);
        assert!(input.has_parameter_option(&["--bar"], false));
        assert!(!input.has_parameter_option(&["--bar"], true));
    }

    #[test]
    fn parameter_option() {
        let no = Value::Bool(false);

        let input = ArrayInput::new([("name", "Fabien"), ("--foo", "bar")]);
        assert_eq!(input.parameter_option(&["--foo"], no.clone(), false), Value::from("bar"));
        assert_eq!(input.parameter_option(&["--bar"], no.clone(), false), no);

        let input = ArrayInput::new([
            (ParamKey::Index(0), Value::from("Fabien")),
            (ParamKey::from("--foo"), Value::from("bar")),
        ]);
        assert_eq!(input.parameter_option(&["--foo"], no.clone(), false), Value::from("bar"));

        let input = ArrayInput::new([
            (ParamKey::Index(0), Value::from("--foo")),
            (ParamKey::Index(1), Value::from("--")),
            (ParamKey::from("--bar"), Value::from("woop")),
        ]);
        assert_eq!(input.parameter_option(&["--bar"], no.clone(), false), Value::from("woop"));
        assert_eq!(input.parameter_option(&["--bar"], no.clone(), true), no);
        assert_eq!(input.parameter_option(&["--foo"], no.clone(), false), Value::Bool(true));
    }

    #[test]
    fn parses_arguments_by_name_and_position() {
        let mut input = ArrayInput::new([("name", "foo")]);
        bind(&mut input, vec![InputArgument::optional("name").into()]).unwrap();
        assert_eq!(input.arguments()["name"], Value::from("foo"));

        let mut input = ArrayInput::new([(0usize, "foo"), (1, "bar")]);
        bind(
            &mut input,
            vec![
                InputArgument::required("first").into(),
                InputArgument::optional("second").into(),
            ],
        )
        .unwrap();
        assert_eq!(input.arguments()["second"], Value::from("bar"));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn parses_options() {
        let cases: Vec<(Vec<(&str, Value)>, Vec<DefinitionItem>, Vec<(&str, Value)>)> = vec![
            (
                vec![("--foo", Value::from("bar"))],
                vec![InputOption::flag("foo").unwrap().into()],
                vec![("foo", Value::from("bar"))],
            ),
            (
                vec![("--foo", Value::from("bar"))],
                vec![foo_with_default(OptionMode::OPTIONAL)],
                vec![("foo", Value::from("bar"))],
            ),
            (
                vec![("--foo", Value::Null)],
                vec![foo_with_default(OptionMode::OPTIONAL)],
                vec![("foo", Value::from("default"))],
            ),
            (
                vec![("-f", Value::from("bar"))],
                vec![InputOption::flag("foo").unwrap().with_shortcut("f").into()],
                vec![("foo", Value::from("bar"))],
            ),
            (
                vec![("--", Value::Null), ("-f", Value::from("bar"))],
                vec![foo_with_default(OptionMode::OPTIONAL)],
                vec![("foo", Value::from("default"))],
            ),
            (vec![("--", Value::Null)], vec![], vec![]),
            (
                vec![("--foo", Value::Null)],
                vec![InputOption::flag("foo").unwrap().into()],
                vec![("foo", Value::Bool(true))],
            ),
        ];

        for (params, items, expected) in cases {
            let mut input = ArrayInput::new(params.clone());
            bind(&mut input, items).unwrap();
            let expected: Vec<(String, Value)> = expected
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
            let got: Vec<(String, Value)> = input.options().into_iter().collect();
            assert_eq!(got, expected, "params: {params:?}");
        }
    }

    #[test]
    fn invalid_input_uses_typed_errors() {
        let mut input = ArrayInput::new([("foo", "foo")]);
        let err = bind(&mut input, vec![InputArgument::optional("name").into()]).unwrap_err();
        match err {
            InputError::ArgumentNotFound(name) => assert_eq!(name, "foo"),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut input = ArrayInput::new([("--foo", Value::Null)]);
        let err = bind(
            &mut input,
            vec![
                InputOption::new("foo", OptionMode::REQUIRED)
                    .unwrap()
                    .with_shortcut("f")
                    .into(),
            ],
        )
        .unwrap_err();
        assert_eq!(err, InputError::OptionValueRequired("foo".to_string()));
        assert_eq!(err.to_string(), "Option \"--foo\" requires a value.");

        let mut input = ArrayInput::new([("--foo", "foo")]);
        let err = bind(&mut input, vec![]).unwrap_err();
        assert_eq!(err.to_string(), "Option \"--foo\" does not exist.");

        let mut input = ArrayInput::new([("-o", "foo")]);
        let err = bind(&mut input, vec![]).unwrap_err();
        assert_eq!(err, InputError::OptionNotFound("o".to_string()));
        assert_eq!(err.to_string(), "Option \"-o\" does not exist.");
    }

    #[test]
    fn positional_double_dash_halts_parsing() {
        let mut input = ArrayInput::new([(0usize, "a"), (1, "--"), (2, "b")]);
        bind(
            &mut input,
            vec![
                InputArgument::optional("x").into(),
                InputArgument::optional("y").into(),
            ],
        )
        .unwrap();
        assert_eq!(input.arguments()["x"], Value::from("a"));
        assert_eq!(input.arguments()["y"], Value::Null);
    }

    #[test]
    fn displays_as_shell_command_line() {
        let input = ArrayInput::new([
            ("-f", Value::Null),
            ("-b", Value::from("bar")),
            ("--foo", Value::from("b a z")),
            ("--lala", Value::Null),
            ("test", Value::from("Foo")),
            ("test2", Value::from("A\nB'C")),
        ]);
        assert_eq!(
            input.to_string(),
            "-f -b=bar --foo='b a z' --lala Foo 'A\nB'\\''C'"
        );
    }
}
