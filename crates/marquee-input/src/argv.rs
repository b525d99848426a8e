use std::collections::VecDeque;
use std::fmt;

use crate::error::{InputError, InputResult};
use crate::input::{Input, InputState, escape_token};
use crate::value::Value;

/// Input read from a process-style token list.
///
/// ```text
/// tool --name=value -abc -o out -- -literal positional
/// ```
#[derive(Debug, Clone)]
pub struct ArgvInput {
    tokens: Vec<String>,
    state: InputState,
}

impl ArgvInput {
    /// Tokens must not include the program name.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            state: InputState::default(),
        }
    }

    /// Tokens of the current process, program name skipped.
    pub fn from_env() -> Self {
        Self::new(std::env::args().skip(1))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Parse pass over the token queue. Kept apart from [`ArgvInput`] so the
/// queue and the bound state can be borrowed independently.
struct Parser<'a> {
    remaining: VecDeque<&'a str>,
    state: &'a mut InputState,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> InputResult<()> {
        let mut parse_options = true;
        while let Some(token) = self.remaining.pop_front() {
            tracing::trace!(token, parse_options, "argv token");
            if parse_options && token.is_empty() {
                self.parse_argument(token)?;
            } else if parse_options && token == "--" {
                parse_options = false;
            } else if parse_options && token.starts_with("--") {
                self.parse_long_option(&token[2..])?;
            } else if parse_options && token.starts_with('-') && token != "-" {
                self.parse_short_option(&token[1..])?;
            } else {
                self.parse_argument(token)?;
            }
        }
        Ok(())
    }

    fn parse_long_option(&mut self, name: &'a str) -> InputResult<()> {
        match name.split_once('=') {
            Some((name, value)) => self.add_long_option(name, Some(value)),
            None => self.add_long_option(name, None),
        }
    }

    /// `-abc` is `-a -b -c` unless one of the shortcuts takes a value, in
    /// which case the rest of the cluster is that value.
    fn parse_short_option(&mut self, cluster: &'a str) -> InputResult<()> {
        let mut rest = cluster;
        while let Some(first) = rest.chars().next() {
            let shortcut = &rest[..first.len_utf8()];
            let tail = &rest[first.len_utf8()..];
            if tail.is_empty() {
                return self.add_short_option(shortcut, None);
            }
            let takes_value = self
                .state
                .definition
                .option_by_shortcut(shortcut)
                .is_ok_and(|o| o.accepts_value());
            if takes_value {
                return self.add_short_option(shortcut, Some(tail));
            }
            self.add_short_option(shortcut, None)?;
            rest = tail;
        }
        Ok(())
    }

    fn parse_argument(&mut self, token: &str) -> InputResult<()> {
        let definition = &self.state.definition;
        let position = self.state.arguments.len();

        if let Ok(argument) = definition.argument_at(position) {
            let value = if argument.is_array() {
                Value::List(vec![Value::from(token)])
            } else {
                Value::from(token)
            };
            self.state
                .arguments
                .insert(argument.name().to_string(), value);
            return Ok(());
        }

        let last = position
            .checked_sub(1)
            .and_then(|p| definition.argument_at(p).ok())
            .filter(|a| a.is_array());
        match last {
            Some(argument) => {
                self.state
                    .arguments
                    .entry(argument.name().to_string())
                    .or_default()
                    .push(Value::from(token));
                Ok(())
            }
            None => Err(InputError::Runtime("Too many arguments.".to_string())),
        }
    }

    fn add_short_option(&mut self, shortcut: &str, value: Option<&'a str>) -> InputResult<()> {
        let name = match self.state.definition.option_by_shortcut(shortcut) {
            Ok(option) => option.name().to_string(),
            Err(_) => {
                return Err(InputError::Runtime(format!(
                    "Option \"-{shortcut}\" does not exist."
                )));
            }
        };
        self.add_long_option(&name, value)
    }

    fn add_long_option(&mut self, name: &str, value: Option<&'a str>) -> InputResult<()> {
        let option = match self.state.definition.option(name) {
            Ok(option) => option.clone(),
            Err(_) => {
                return Err(InputError::Runtime(format!(
                    "Option \"--{name}\" does not exist."
                )));
            }
        };

        let mut value = value.filter(|v| !v.is_empty());

        if value.is_some() && !option.accepts_value() {
            return Err(InputError::Runtime(format!(
                "Option \"--{name}\" does not accept a value."
            )));
        }

        if value.is_none() && option.accepts_value() {
            if let Some(next) = self.remaining.front().copied() {
                if next.is_empty() || !next.starts_with('-') {
                    self.remaining.pop_front();
                    value = Some(next);
                }
            }
        }

        let resolved = match value {
            Some(v) => Value::from(v),
            None => {
                if option.is_value_required() {
                    return Err(InputError::Runtime(format!(
                        "Option \"--{name}\" requires a value."
                    )));
                }
                if option.is_array() {
                    Value::Null
                } else if option.is_value_optional() {
                    option.default_value().clone()
                } else {
                    Value::Bool(true)
                }
            }
        };

        if option.is_array() {
            self.state
                .options
                .entry(name.to_string())
                .or_insert_with(|| Value::List(Vec::new()))
                .push(resolved);
        } else {
            self.state.options.insert(name.to_string(), resolved);
        }
        Ok(())
    }
}

fn matches_parameter(token: &str, value: &str) -> bool {
    token == value
        || token
            .strip_prefix(value)
            .is_some_and(|rest| rest.starts_with('='))
}

impl Input for ArgvInput {
    fn state(&self) -> &InputState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    fn parse(&mut self) -> InputResult<()> {
        let parser = Parser {
            remaining: self.tokens.iter().map(String::as_str).collect(),
            state: &mut self.state,
        };
        parser.run()
    }

    fn first_argument(&self) -> Option<String> {
        self.tokens
            .iter()
            .find(|t| !t.starts_with('-'))
            .cloned()
    }

    fn has_parameter_option(&self, values: &[&str], only_params: bool) -> bool {
        for token in &self.tokens {
            if only_params && token == "--" {
                return false;
            }
            if values.iter().any(|v| matches_parameter(token, v)) {
                return true;
            }
        }
        false
    }

    fn parameter_option(&self, values: &[&str], default: Value, only_params: bool) -> Value {
        let mut tokens = self.tokens.iter();
        while let Some(token) = tokens.next() {
            if only_params && token == "--" {
                return default;
            }
            if values.iter().any(|v| matches_parameter(token, v)) {
                return match token.split_once('=') {
                    Some((_, value)) => Value::from(value),
                    None => tokens.next().map(|t| Value::from(t.as_str())).into(),
                };
            }
        }
        default
    }
}

impl fmt::Display for ArgvInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, token) in self.tokens.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            if let Some((prefix, value)) = token
                .split_once('=')
                .filter(|(prefix, value)| prefix.len() > 1 && prefix.starts_with('-') && !value.is_empty())
            {
                write!(f, "{prefix}={}", escape_token(value))?;
            } else if !token.is_empty() && !token.starts_with('-') {
                f.write_str(&escape_token(token))?;
            } else {
                f.write_str(token)?;
            }
        }
        Ok(())
    }
}
