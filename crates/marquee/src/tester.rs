use marquee_input::{ArrayInput, Input, ParamKey, Value};

use crate::command::Command;
use crate::error::Result;
use crate::output::{BufferedOutput, Verbosity};

/// Settings applied to the input and output of one [`CommandTester`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TesterOptions {
    pub interactive: bool,
    pub decorated: bool,
    pub verbosity: Verbosity,
}

impl Default for TesterOptions {
    fn default() -> Self {
        Self {
            interactive: true,
            decorated: false,
            verbosity: Verbosity::Normal,
        }
    }
}

/// Runs a command against in-memory input and captures what it writes.
pub struct CommandTester<C> {
    command: C,
    input: ArrayInput,
    output: BufferedOutput,
    status_code: Option<i32>,
}

impl<C: Command> CommandTester<C> {
    pub fn new(command: C) -> Self {
        Self {
            command,
            input: ArrayInput::default(),
            output: BufferedOutput::default(),
            status_code: None,
        }
    }

    /// Run with `parameters` (keys as for [`ArrayInput`]). The command's own
    /// name is passed as the `command` argument when the definition declares
    /// one and no value is given.
    pub fn execute<I, K, V>(&mut self, parameters: I, options: TesterOptions) -> Result<i32>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ParamKey>,
        V: Into<Value>,
    {
        let mut params: Vec<(ParamKey, Value)> = parameters
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let has_command = params
            .iter()
            .any(|(key, _)| matches!(key, ParamKey::Name(name) if name == "command"));
        let spec = self.command.spec();
        if !has_command && spec.definition().has_argument("command") {
            params.insert(
                0,
                (ParamKey::from("command"), Value::from(spec.name())),
            );
        }

        self.status_code = None;
        self.input = ArrayInput::new(params);
        self.input.set_interactive(options.interactive);
        self.output = BufferedOutput::new(options.verbosity, options.decorated);

        let code = self.command.run(&mut self.input, &mut self.output)?;
        self.status_code = Some(code);
        Ok(code)
    }

    /// Everything written by the last run.
    pub fn display(&self) -> &str {
        self.output.contents()
    }

    pub fn input(&self) -> &ArrayInput {
        &self.input
    }

    pub fn output(&self) -> &BufferedOutput {
        &self.output
    }

    /// Exit code of the last run; `None` if it failed.
    pub fn status_code(&self) -> Option<i32> {
        self.status_code
    }

    pub fn command(&self) -> &C {
        &self.command
    }

    pub fn into_command(self) -> C {
        self.command
    }
}
