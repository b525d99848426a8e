use indexmap::IndexMap;

use crate::definition::Definition;
use crate::error::{InputError, InputResult};
use crate::value::Value;

/// Bound values shared by every [`Input`] implementation.
#[derive(Debug, Clone)]
pub struct InputState {
    pub(crate) definition: Definition,
    pub(crate) arguments: IndexMap<String, Value>,
    pub(crate) options: IndexMap<String, Value>,
    pub(crate) interactive: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            definition: Definition::default(),
            arguments: IndexMap::new(),
            options: IndexMap::new(),
            interactive: true,
        }
    }
}

impl InputState {
    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Values explicitly bound by the parser or a setter, without defaults.
    pub fn bound_arguments(&self) -> &IndexMap<String, Value> {
        &self.arguments
    }

    pub fn bound_options(&self) -> &IndexMap<String, Value> {
        &self.options
    }

    fn reset(&mut self, definition: &Definition) {
        self.definition = definition.clone();
        self.arguments.clear();
        self.options.clear();
    }
}

/// Raw input bound against a [`Definition`].
///
/// Implementors own the raw data and provide `parse`, which fills the
/// shared [`InputState`] from it. Everything else is provided.
pub trait Input {
    fn state(&self) -> &InputState;

    fn state_mut(&mut self) -> &mut InputState;

    /// Fill the (freshly reset) state from the raw input.
    fn parse(&mut self) -> InputResult<()>;

    /// First raw value that does not look like an option.
    fn first_argument(&self) -> Option<String>;

    /// Whether the raw input contains one of `values`, either exactly or as
    /// `value=...`. With `only_params`, scanning stops at `--`.
    fn has_parameter_option(&self, values: &[&str], only_params: bool) -> bool;

    /// Raw value of the first of `values` present in the input, `default`
    /// when none is present.
    fn parameter_option(&self, values: &[&str], default: Value, only_params: bool) -> Value;

    /// Reset bound values and parse the raw input against `definition`.
    fn bind(&mut self, definition: &Definition) -> InputResult<()> {
        tracing::debug!(
            arguments = definition.arguments().len(),
            options = definition.options().len(),
            "binding input"
        );
        self.state_mut().reset(definition);
        self.parse()
    }

    fn definition(&self) -> &Definition {
        &self.state().definition
    }

    /// Fail when any required argument is still missing.
    fn validate(&self) -> InputResult<()> {
        let state = self.state();
        let missing: Vec<&str> = state
            .definition
            .arguments()
            .filter(|a| a.is_required() && !state.arguments.contains_key(a.name()))
            .map(|a| a.name())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(InputError::Runtime(format!(
            "Not enough arguments (missing: \"{}\").",
            missing.join(", ")
        )))
    }

    /// Every declared argument, bound value over default.
    fn arguments(&self) -> IndexMap<String, Value> {
        let state = self.state();
        let mut values = state.definition.argument_defaults();
        for (name, value) in &state.arguments {
            values.insert(name.clone(), value.clone());
        }
        values
    }

    fn argument(&self, name: &str) -> InputResult<&Value> {
        let state = self.state();
        let declared = state.definition.argument(name)?;
        Ok(state
            .arguments
            .get(name)
            .unwrap_or_else(|| declared.default_value()))
    }

    fn set_argument(&mut self, name: &str, value: Value) -> InputResult<()> {
        let state = self.state_mut();
        if !state.definition.has_argument(name) {
            return Err(InputError::ArgumentNotFound(name.to_string()));
        }
        state.arguments.insert(name.to_string(), value);
        Ok(())
    }

    fn has_argument(&self, name: &str) -> bool {
        self.state().definition.has_argument(name)
    }

    /// Every declared option, bound value over default.
    fn options(&self) -> IndexMap<String, Value> {
        let state = self.state();
        let mut values = state.definition.option_defaults();
        for (name, value) in &state.options {
            values.insert(name.clone(), value.clone());
        }
        values
    }

    fn option(&self, name: &str) -> InputResult<&Value> {
        let state = self.state();
        let declared = state.definition.option(name)?;
        Ok(state
            .options
            .get(name)
            .unwrap_or_else(|| declared.default_value()))
    }

    fn set_option(&mut self, name: &str, value: Value) -> InputResult<()> {
        let state = self.state_mut();
        if !state.definition.has_option(name) {
            return Err(InputError::OptionNotFound(name.to_string()));
        }
        state.options.insert(name.to_string(), value);
        Ok(())
    }

    fn has_option(&self, name: &str) -> bool {
        self.state().definition.has_option(name)
    }

    fn is_interactive(&self) -> bool {
        self.state().interactive
    }

    fn set_interactive(&mut self, interactive: bool) {
        self.state_mut().interactive = interactive;
    }
}

/// Shell-style quoting used by the `Display` impls of the inputs.
pub(crate) fn escape_token(token: &str) -> String {
    let bare = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if bare {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', "'\\''"))
    }
}
