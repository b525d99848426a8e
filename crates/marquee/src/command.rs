use marquee_input::{Definition, Input, InputArgument, InputOption, Value};

use crate::error::{Error, Result};
use crate::output::Output;

/// Static description of a command: name, texts and accepted input.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    name: String,
    description: String,
    help: String,
    aliases: Vec<String>,
    usages: Vec<String>,
    definition: Definition,
    ignore_validation_errors: bool,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            description: String::new(),
            help: String::new(),
            aliases: Vec::new(),
            usages: Vec::new(),
            definition: Definition::new(),
            ignore_validation_errors: false,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_aliases(aliases)?;
        Ok(self)
    }

    pub fn with_usage(mut self, usage: impl AsRef<str>) -> Self {
        self.add_usage(usage);
        self
    }

    pub fn with_definition(mut self, definition: Definition) -> Self {
        self.definition = definition;
        self
    }

    pub fn with_argument(mut self, argument: InputArgument) -> Result<Self> {
        self.definition.add_argument(argument)?;
        Ok(self)
    }

    pub fn with_option(mut self, option: InputOption) -> Result<Self> {
        self.definition.add_option(option)?;
        Ok(self)
    }

    /// Let `run` continue when binding fails, e.g. for help-style commands.
    pub fn ignore_validation_errors(mut self) -> Self {
        self.ignore_validation_errors = true;
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_aliases<I, S>(&mut self, aliases: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let aliases = aliases.into_iter().map(Into::into).collect::<Vec<String>>();
        for alias in &aliases {
            validate_name(alias)?;
        }
        self.aliases = aliases;
        Ok(())
    }

    /// Record an example invocation. The command name is prepended unless the
    /// usage already starts with it.
    pub fn add_usage(&mut self, usage: impl AsRef<str>) {
        let usage = usage.as_ref();
        let usage = if usage.starts_with(self.name.as_str()) {
            usage.to_string()
        } else {
            format!("{} {usage}", self.name)
        };
        self.usages.push(usage);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Help with `%command.name%` and `%command.full_name%` replaced; falls
    /// back to the description when no help is set.
    pub fn processed_help(&self) -> String {
        let text = if self.help.is_empty() {
            &self.description
        } else {
            &self.help
        };
        text.replace("%command.name%", &self.name)
            .replace("%command.full_name%", &self.name)
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn usages(&self) -> &[String] {
        &self.usages
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn definition_mut(&mut self) -> &mut Definition {
        &mut self.definition
    }

    pub fn ignores_validation_errors(&self) -> bool {
        self.ignore_validation_errors
    }

    pub fn synopsis(&self, short: bool) -> String {
        format!("{} {}", self.name, self.definition.synopsis(short))
            .trim()
            .to_string()
    }
}

/// Names are `:`-separated segments without spaces, e.g. `cache:clear`.
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .split(':')
            .all(|segment| !segment.is_empty() && !segment.contains(' '));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "Command name \"{name}\" is invalid."
        )))
    }
}

/// A console command.
///
/// Implementors describe themselves through [`CommandSpec`] and implement
/// `execute`; `run` drives the whole lifecycle.
pub trait Command {
    fn spec(&self) -> &CommandSpec;

    /// Whether the command can run in the current environment.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Called right after binding, before interaction and validation.
    fn initialize(&mut self, _input: &mut dyn Input, _output: &mut dyn Output) -> Result<()> {
        Ok(())
    }

    /// Last chance to fill missing required arguments. Only called for
    /// interactive input.
    fn interact(&mut self, _input: &mut dyn Input, _output: &mut dyn Output) -> Result<()> {
        Ok(())
    }

    /// `None` means success.
    fn execute(&mut self, input: &mut dyn Input, output: &mut dyn Output) -> Result<Option<i32>>;

    /// Bind, initialize, interact, validate and execute; returns the exit code.
    fn run(&mut self, input: &mut dyn Input, output: &mut dyn Output) -> Result<i32> {
        let definition = self.spec().definition().clone();
        if let Err(err) = input.bind(&definition) {
            if !self.spec().ignores_validation_errors() {
                return Err(err.into());
            }
            tracing::debug!(command = self.spec().name(), error = %err, "ignoring bind error");
        }

        self.initialize(input, output)?;

        if input.is_interactive() {
            self.interact(input, output)?;
        }

        // Commands run directly never receive their own name.
        if input.has_argument("command") && input.argument("command")?.is_null() {
            let name = self.spec().name().to_string();
            input.set_argument("command", Value::from(name))?;
        }

        input.validate()?;

        let status = self.execute(input, output)?;
        Ok(status.unwrap_or(0))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use marquee_input::{
        ArrayInput, Definition, Input, InputArgument, InputError, InputOption, OptionMode, Value,
    };

    use super::{Command, CommandSpec};
    use crate::error::{Error, Result};
    use crate::output::{BufferedOutput, NullOutput, Output};

    /// Logs the lifecycle hooks it goes through.
    pub(crate) struct TestCommand {
        pub(crate) spec: CommandSpec,
        pub(crate) status: Option<i32>,
    }

    impl TestCommand {
        pub(crate) fn new() -> Self {
            Self {
                spec: CommandSpec::new("namespace:name")
                    .unwrap()
                    .with_aliases(["name"])
                    .unwrap()
                    .with_description("description")
                    .with_help("help"),
                status: None,
            }
        }
    }

    impl Command for TestCommand {
        fn spec(&self) -> &CommandSpec {
            &self.spec
        }

        fn interact(&mut self, _input: &mut dyn Input, output: &mut dyn Output) -> Result<()> {
            output.writeln("interact called")
        }

        fn execute(&mut self, _input: &mut dyn Input, output: &mut dyn Output) -> Result<Option<i32>> {
            output.writeln("execute called")?;
            Ok(self.status)
        }
    }

    #[test]
    fn new_sets_name_and_texts() {
        let command = TestCommand::new();
        assert_eq!(command.spec().name(), "namespace:name");
        assert_eq!(command.spec().aliases(), ["name"]);
        assert_eq!(command.spec().description(), "description");
        assert_eq!(command.spec().help(), "help");
        assert!(command.is_enabled());
    }

    #[test]
    fn set_name() {
        let mut spec = TestCommand::new().spec;
        spec.set_name("foo").unwrap();
        assert_eq!(spec.name(), "foo");
        spec.set_name("foobar:bar").unwrap();
        assert_eq!(spec.name(), "foobar:bar");
    }

    #[test]
    fn invalid_names_are_rejected() {
        for name in ["", "foo:", ":foo", "foo bar", "foo::bar", " "] {
            let err = CommandSpec::new(name).unwrap_err();
            match err {
                Error::InvalidArgument(msg) => {
                    assert_eq!(msg, format!("Command name \"{name}\" is invalid."))
                }
                other => panic!("unexpected error for {name:?}: {other:?}"),
            }
        }

        let err = CommandSpec::new("ok").unwrap().with_aliases(["fine", "not fine"]);
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn definition_builders() {
        let mut definition = Definition::new();
        definition
            .add_argument(InputArgument::optional("foo"))
            .unwrap();
        let spec = CommandSpec::new("cmd")
            .unwrap()
            .with_definition(definition)
            .with_argument(InputArgument::optional("bar"))
            .unwrap()
            .with_option(InputOption::flag("baz").unwrap())
            .unwrap();

        assert!(spec.definition().has_argument("foo"));
        assert!(spec.definition().has_argument("bar"));
        assert!(spec.definition().has_option("baz"));
    }

    #[test]
    fn processed_help_substitutes_placeholders() {
        let spec = TestCommand::new()
            .spec
            .with_help("The %command.name% command does... Example: %command.full_name%.");
        let help = spec.processed_help();
        assert!(help.contains("The namespace:name command does..."));
        assert!(!help.contains("%command.full_name%"));

        let spec = TestCommand::new().spec.with_help("");
        assert_eq!(spec.processed_help(), "description");
    }

    #[test]
    fn usages_are_prefixed_with_the_name() {
        let spec = CommandSpec::new("foo")
            .unwrap()
            .with_usage("--bar")
            .with_usage("foo --baz");
        assert_eq!(spec.usages(), ["foo --bar", "foo --baz"]);
    }

    #[test]
    fn synopsis() {
        let spec = TestCommand::new()
            .spec
            .with_option(InputOption::flag("foo").unwrap())
            .unwrap()
            .with_argument(InputArgument::optional("bar"))
            .unwrap();
        assert_eq!(spec.synopsis(false), "namespace:name [--foo] [--] [<bar>]");
        assert_eq!(spec.synopsis(true), "namespace:name [options] [--] [<bar>]");
        assert_eq!(CommandSpec::new("bare").unwrap().synopsis(false), "bare");
    }

    #[test]
    fn run_interactive_calls_interact() {
        let mut command = TestCommand::new();
        let mut input = ArrayInput::default();
        let mut output = BufferedOutput::default();
        command.run(&mut input, &mut output).unwrap();
        assert_eq!(output.fetch(), "interact called\nexecute called\n");
    }

    #[test]
    fn run_non_interactive_skips_interact() {
        let mut command = TestCommand::new();
        let mut input = ArrayInput::default();
        input.set_interactive(false);
        let mut output = BufferedOutput::default();
        command.run(&mut input, &mut output).unwrap();
        assert_eq!(output.fetch(), "execute called\n");
    }

    #[test]
    fn run_with_invalid_option_fails() {
        let mut command = TestCommand::new();
        let mut input = ArrayInput::new([("--bar", true)]);
        let err = command.run(&mut input, &mut NullOutput::new()).unwrap_err();
        assert!(matches!(err, Error::Input(InputError::OptionNotFound(_))));
        assert_eq!(err.to_string(), "Option \"--bar\" does not exist.");
    }

    #[test]
    fn run_ignoring_validation_errors_still_executes() {
        let mut command = TestCommand::new();
        command.spec = command.spec.ignore_validation_errors();
        let mut input = ArrayInput::new([("--bar", true)]);
        input.set_interactive(false);
        let mut output = BufferedOutput::default();
        assert_eq!(command.run(&mut input, &mut output).unwrap(), 0);
        assert_eq!(output.fetch(), "execute called\n");
    }

    #[test]
    fn run_returns_exit_code() {
        let mut command = TestCommand::new();
        let code = command
            .run(&mut ArrayInput::default(), &mut NullOutput::new())
            .unwrap();
        assert_eq!(code, 0);

        command.status = Some(2);
        let code = command
            .run(&mut ArrayInput::default(), &mut NullOutput::new())
            .unwrap();
        assert_eq!(code, 2);
    }

    #[test]
    fn run_fills_the_command_argument() {
        let mut command = TestCommand::new();
        command.spec = command
            .spec
            .with_argument(InputArgument::required("command"))
            .unwrap();
        let mut input = ArrayInput::default();
        command.run(&mut input, &mut NullOutput::new()).unwrap();
        assert_eq!(
            input.argument("command").unwrap(),
            &Value::from("namespace:name")
        );
    }

    #[test]
    fn run_validates_required_arguments() {
        let mut command = TestCommand::new();
        command.spec = command
            .spec
            .with_argument(InputArgument::required("file"))
            .unwrap()
            .with_option(InputOption::new("mode", OptionMode::REQUIRED).unwrap())
            .unwrap();
        let err = command
            .run(&mut ArrayInput::default(), &mut NullOutput::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Not enough arguments (missing: \"file\").");
    }
}
