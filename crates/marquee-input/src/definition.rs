use indexmap::IndexMap;

use crate::argument::InputArgument;
use crate::error::{InputError, InputResult};
use crate::option::InputOption;
use crate::value::Value;

/// Either half of a [`Definition`], so both can be declared in one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionItem {
    Argument(InputArgument),
    Option(InputOption),
}

impl From<InputArgument> for DefinitionItem {
    fn from(argument: InputArgument) -> Self {
        Self::Argument(argument)
    }
}

impl From<InputOption> for DefinitionItem {
    fn from(option: InputOption) -> Self {
        Self::Option(option)
    }
}

/// The arguments and options a command accepts.
///
/// Arguments keep insertion order; required ones come first and at most the
/// last one may be an array. Options are keyed by long name with a separate
/// shortcut index.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    arguments: IndexMap<String, InputArgument>,
    required_count: usize,
    has_array_argument: bool,
    has_optional: bool,
    options: IndexMap<String, InputOption>,
    shortcuts: IndexMap<String, String>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a definition from a mixed list of arguments and options.
    pub fn from_items<I>(items: I) -> InputResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<DefinitionItem>,
    {
        let mut definition = Self::new();
        definition.set_definition(items)?;
        Ok(definition)
    }

    /// Replace both arguments and options.
    pub fn set_definition<I>(&mut self, items: I) -> InputResult<()>
    where
        I: IntoIterator,
        I::Item: Into<DefinitionItem>,
    {
        let mut arguments = Vec::new();
        let mut options = Vec::new();
        for item in items {
            match item.into() {
                DefinitionItem::Argument(argument) => arguments.push(argument),
                DefinitionItem::Option(option) => options.push(option),
            }
        }
        self.set_arguments(arguments)?;
        self.set_options(options)
    }

    pub fn set_arguments(
        &mut self,
        arguments: impl IntoIterator<Item = InputArgument>,
    ) -> InputResult<()> {
        self.arguments.clear();
        self.required_count = 0;
        self.has_array_argument = false;
        self.has_optional = false;
        self.add_arguments(arguments)
    }

    pub fn add_arguments(
        &mut self,
        arguments: impl IntoIterator<Item = InputArgument>,
    ) -> InputResult<()> {
        for argument in arguments {
            self.add_argument(argument)?;
        }
        Ok(())
    }

    pub fn add_argument(&mut self, argument: InputArgument) -> InputResult<()> {
        if self.arguments.contains_key(argument.name()) {
            return Err(InputError::Logic(format!(
                "An argument with name \"{}\" already exists.",
                argument.name()
            )));
        }
        if self.has_array_argument {
            return Err(InputError::Logic(
                "Cannot add an argument after an array argument.".to_string(),
            ));
        }
        if argument.is_required() && self.has_optional {
            return Err(InputError::Logic(
                "Cannot add a required argument after an optional one.".to_string(),
            ));
        }

        if argument.is_array() {
            self.has_array_argument = true;
        }
        if argument.is_required() {
            self.required_count += 1;
        } else {
            self.has_optional = true;
        }
        self.arguments.insert(argument.name().to_string(), argument);
        Ok(())
    }

    pub fn argument(&self, name: &str) -> InputResult<&InputArgument> {
        self.arguments
            .get(name)
            .ok_or_else(|| InputError::ArgumentNotFound(name.to_string()))
    }

    /// Positional lookup.
    pub fn argument_at(&self, position: usize) -> InputResult<&InputArgument> {
        self.arguments
            .get_index(position)
            .map(|(_, argument)| argument)
            .ok_or_else(|| InputError::ArgumentNotFound(position.to_string()))
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    pub fn has_argument_at(&self, position: usize) -> bool {
        position < self.arguments.len()
    }

    pub fn arguments(&self) -> impl ExactSizeIterator<Item = &InputArgument> {
        self.arguments.values()
    }

    /// Number of positional slots; unbounded (`usize::MAX`) once an array
    /// argument is declared.
    pub fn argument_count(&self) -> usize {
        if self.has_array_argument {
            usize::MAX
        } else {
            self.arguments.len()
        }
    }

    pub fn argument_required_count(&self) -> usize {
        self.required_count
    }

    pub fn argument_defaults(&self) -> IndexMap<String, Value> {
        self.arguments
            .values()
            .map(|a| (a.name().to_string(), a.default_value().clone()))
            .collect()
    }

    pub fn set_options(&mut self, options: impl IntoIterator<Item = InputOption>) -> InputResult<()> {
        self.options.clear();
        self.shortcuts.clear();
        self.add_options(options)
    }

    pub fn add_options(&mut self, options: impl IntoIterator<Item = InputOption>) -> InputResult<()> {
        for option in options {
            self.add_option(option)?;
        }
        Ok(())
    }

    /// Register an option. Re-adding an option equal to the registered one
    /// (see [`InputOption`]'s `PartialEq`) is a no-op merge rather than a
    /// conflict.
    pub fn add_option(&mut self, option: InputOption) -> InputResult<()> {
        if let Some(existing) = self.options.get(option.name()) {
            if *existing != option {
                return Err(InputError::Logic(format!(
                    "An option named \"{}\" already exists.",
                    option.name()
                )));
            }
        }

        for shortcut in option.shortcuts() {
            let clash = self
                .shortcuts
                .get(shortcut)
                .and_then(|owner| self.options.get(owner))
                .is_some_and(|owner| *owner != option);
            if clash {
                return Err(InputError::Logic(format!(
                    "An option with shortcut \"{shortcut}\" already exists."
                )));
            }
        }

        for shortcut in option.shortcuts() {
            self.shortcuts
                .insert(shortcut.to_string(), option.name().to_string());
        }
        self.options.insert(option.name().to_string(), option);
        Ok(())
    }

    pub fn option(&self, name: &str) -> InputResult<&InputOption> {
        self.options
            .get(name)
            .ok_or_else(|| InputError::OptionNotFound(name.to_string()))
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn options(&self) -> impl ExactSizeIterator<Item = &InputOption> {
        self.options.values()
    }

    pub fn has_shortcut(&self, shortcut: &str) -> bool {
        self.shortcuts.contains_key(shortcut)
    }

    pub fn option_by_shortcut(&self, shortcut: &str) -> InputResult<&InputOption> {
        let name = self
            .shortcuts
            .get(shortcut)
            .ok_or_else(|| InputError::OptionNotFound(shortcut.to_string()))?;
        self.option(name)
    }

    pub fn option_defaults(&self) -> IndexMap<String, Value> {
        self.options
            .values()
            .map(|o| (o.name().to_string(), o.default_value().clone()))
            .collect()
    }

    /// One-line usage summary, e.g. `[-f|--foo FOO] [--] <bar> [<baz>]...`.
    ///
    /// With `short` set, all options collapse into a single `[options]` token.
    pub fn synopsis(&self, short: bool) -> String {
        let mut elements: Vec<String> = Vec::new();

        if short {
            if !self.options.is_empty() {
                elements.push("[options]".to_string());
            }
        } else {
            for option in self.options.values() {
                let value = if option.accepts_value() {
                    let upper = option.name().to_uppercase();
                    if option.is_value_optional() {
                        format!(" [{upper}]")
                    } else {
                        format!(" {upper}")
                    }
                } else {
                    String::new()
                };
                let shortcut: String = option
                    .shortcuts()
                    .map(|s| format!("-{s}|"))
                    .collect();
                elements.push(format!("[{shortcut}--{}{value}]", option.name()));
            }
        }

        if !elements.is_empty() && !self.arguments.is_empty() {
            elements.push("[--]".to_string());
        }

        for argument in self.arguments.values() {
            let mut element = format!("<{}>", argument.name());
            if !argument.is_required() {
                element = format!("[{element}]");
            } else if argument.is_array() {
                element = format!("{element} ({element})");
            }
            if argument.is_array() {
                element.push_str("...");
            }
            elements.push(element);
        }

        elements.join(" ")
    }
}
