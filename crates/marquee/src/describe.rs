//! Plain-text help for arguments, options, definitions and commands.
//!
//! The `*_text` functions build markup; [`describe`] renders it to an
//! [`Output`].

use marquee_input::{Definition, InputArgument, InputOption, Value};

use crate::command::CommandSpec;
use crate::error::Result;
use crate::output::{Output, WriteOptions};

/// Anything [`describe`] can render.
#[derive(Debug, Clone, Copy)]
pub enum Describable<'a> {
    Argument(&'a InputArgument),
    Option(&'a InputOption),
    Definition(&'a Definition),
    Command(&'a CommandSpec),
}

impl<'a> From<&'a InputArgument> for Describable<'a> {
    fn from(argument: &'a InputArgument) -> Self {
        Self::Argument(argument)
    }
}

impl<'a> From<&'a InputOption> for Describable<'a> {
    fn from(option: &'a InputOption) -> Self {
        Self::Option(option)
    }
}

impl<'a> From<&'a Definition> for Describable<'a> {
    fn from(definition: &'a Definition) -> Self {
        Self::Definition(definition)
    }
}

impl<'a> From<&'a CommandSpec> for Describable<'a> {
    fn from(spec: &'a CommandSpec) -> Self {
        Self::Command(spec)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescribeOptions {
    /// Render style tags away, leaving plain text.
    pub raw_text: bool,
    /// Write the markup itself instead of rendering it.
    pub raw_output: bool,
}

pub fn describe<'a>(
    output: &mut dyn Output,
    item: impl Into<Describable<'a>>,
    options: DescribeOptions,
) -> Result<()> {
    let text = match item.into() {
        Describable::Argument(argument) => argument_text(argument, None),
        Describable::Option(option) => option_text(option, None),
        Describable::Definition(definition) => definition_text(definition),
        Describable::Command(spec) => command_text(spec),
    };

    if options.raw_text {
        let mut plain = output.formatter().clone();
        plain.set_decorated(false);
        let text = plain.format(&text);
        return output.write_with(&text, false, WriteOptions::raw());
    }
    let kind = if options.raw_output {
        WriteOptions::raw()
    } else {
        WriteOptions::default()
    };
    output.write_with(&text, false, kind)
}

/// `  <info>name</info>  description [default: ...]`, padded to `width`.
pub fn argument_text(argument: &InputArgument, width: Option<usize>) -> String {
    let name = argument.name();
    let name_width = name.chars().count();
    let width = width.unwrap_or(name_width);
    format!(
        "  <info>{name}</info>{}{}{}",
        " ".repeat(width.saturating_sub(name_width) + 2),
        continue_lines(argument.description(), width + 4),
        default_text(argument.default_value()),
    )
}

/// `  <info>-o, --name=NAME</info>  description`, padded to `width`.
pub fn option_text(option: &InputOption, width: Option<usize>) -> String {
    let synopsis = option_synopsis(option);
    let synopsis_width = synopsis.chars().count();
    let width = width.unwrap_or(synopsis_width);
    let default = if option.accepts_value() {
        default_text(option.default_value())
    } else {
        String::new()
    };
    let multiple = if option.is_array() {
        "<comment> (multiple values allowed)</comment>"
    } else {
        ""
    };
    format!(
        "  <info>{synopsis}</info>{}{}{default}{multiple}",
        " ".repeat(width.saturating_sub(synopsis_width) + 2),
        continue_lines(option.description(), width + 4),
    )
}

pub fn definition_text(definition: &Definition) -> String {
    let width = definition
        .options()
        .map(|o| option_synopsis(o).chars().count())
        .chain(definition.arguments().map(|a| a.name().chars().count()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    if definition.arguments().len() > 0 {
        lines.push("<comment>Arguments:</comment>".to_string());
        lines.extend(definition.arguments().map(|a| argument_text(a, Some(width))));
    }
    if definition.arguments().len() > 0 && definition.options().len() > 0 {
        lines.push(String::new());
    }
    if definition.options().len() > 0 {
        lines.push("<comment>Options:</comment>".to_string());
        lines.extend(definition.options().map(|o| option_text(o, Some(width))));
    }
    lines.join("\n")
}

pub fn command_text(spec: &CommandSpec) -> String {
    let mut text = String::from("<comment>Usage:</comment>");
    let usages = std::iter::once(spec.synopsis(true))
        .chain(spec.aliases().iter().cloned())
        .chain(spec.usages().iter().cloned());
    for usage in usages {
        text.push_str("\n  ");
        text.push_str(&usage);
    }
    text.push('\n');

    let definition = spec.definition();
    if definition.arguments().len() > 0 || definition.options().len() > 0 {
        text.push('\n');
        text.push_str(&definition_text(definition));
        text.push('\n');
    }

    let help = spec.processed_help();
    if !help.is_empty() {
        text.push_str("\n<comment>Help:</comment>\n ");
        text.push_str(&help.replace('\n', "\n "));
        text.push('\n');
    }
    text
}

fn option_synopsis(option: &InputOption) -> String {
    let shortcut = match option.shortcut() {
        Some(_) => {
            let names: Vec<String> = option.shortcuts().map(|s| format!("-{s}")).collect();
            format!("{}, ", names.join("|"))
        }
        None => "    ".to_string(),
    };
    let value = if option.accepts_value() {
        let value = format!("={}", option.name().to_uppercase());
        if option.is_value_optional() {
            format!("[{value}]")
        } else {
            value
        }
    } else {
        String::new()
    };
    format!("{shortcut}--{}{value}", option.name())
}

fn default_text(default: &Value) -> String {
    let shown = match default {
        Value::Null => false,
        Value::List(items) => !items.is_empty(),
        _ => true,
    };
    if !shown {
        return String::new();
    }
    let json = serde_json::to_string(default).unwrap_or_default();
    format!("<comment> [default: {}]</comment>", json.replace("\\\\", "\\"))
}

/// Fold line breaks (and the whitespace around them) into a newline plus
/// `indent` spaces, so continuation lines align with the first one.
fn continue_lines(description: &str, indent: usize) -> String {
    if !description.contains(['\r', '\n']) {
        return description.to_string();
    }
    let separator = format!("\n{}", " ".repeat(indent));
    description
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(&separator)
}

#[cfg(test)]
mod tests {
    use marquee_input::{
        ArgumentMode, Definition, DefinitionItem, InputArgument, InputOption, OptionMode,
    };

    use super::{DescribeOptions, argument_text, command_text, definition_text, describe, option_text};
    use crate::command::CommandSpec;
    use crate::output::BufferedOutput;

    fn option(mode: OptionMode) -> InputOption {
        InputOption::new("option_name", mode)
            .unwrap()
            .with_shortcut("o")
    }

    #[test]
    fn arguments() {
        assert_eq!(
            argument_text(&InputArgument::required("argument_name"), None),
            "  <info>argument_name</info>  "
        );
        assert_eq!(
            argument_text(
                &InputArgument::new("argument_name", ArgumentMode::OPTIONAL_ARRAY)
                    .with_description("argument description"),
                None
            ),
            "  <info>argument_name</info>  argument description"
        );
        assert_eq!(
            argument_text(
                &InputArgument::optional("argument_name")
                    .with_description("argument description")
                    .with_default("default_value")
                    .unwrap(),
                None
            ),
            "  <info>argument_name</info>  argument description<comment> [default: \"default_value\"]</comment>"
        );
        assert_eq!(
            argument_text(
                &InputArgument::required("argument_name")
                    .with_description("multiline\nargument description"),
                None
            ),
            "  <info>argument_name</info>  multiline\n                 argument description"
        );
    }

    #[test]
    fn options() {
        assert_eq!(
            option_text(&option(OptionMode::NONE), None),
            "  <info>-o, --option_name</info>  "
        );
        assert_eq!(
            option_text(
                &option(OptionMode::OPTIONAL)
                    .with_description("option description")
                    .with_default("default_value")
                    .unwrap(),
                None
            ),
            "  <info>-o, --option_name[=OPTION_NAME]</info>  option description<comment> [default: \"default_value\"]</comment>"
        );
        assert_eq!(
            option_text(&option(OptionMode::REQUIRED).with_description("option description"), None),
            "  <info>-o, --option_name=OPTION_NAME</info>  option description"
        );
        assert_eq!(
            option_text(
                &option(OptionMode::OPTIONAL_ARRAY).with_description("option description"),
                None
            ),
            "  <info>-o, --option_name[=OPTION_NAME]</info>  option description<comment> (multiple values allowed)</comment>"
        );
        assert_eq!(
            option_text(
                &InputOption::new("option_name", OptionMode::REQUIRED)
                    .unwrap()
                    .with_shortcut(["o", "O"])
                    .with_description("option with multiple shortcuts"),
                None
            ),
            "  <info>-o|-O, --option_name=OPTION_NAME</info>  option with multiple shortcuts"
        );
    }

    #[test]
    fn option_without_shortcut_is_indented() {
        assert_eq!(
            option_text(&InputOption::flag("verbose").unwrap(), None),
            "  <info>    --verbose</info>  "
        );
    }

    #[test]
    fn defaults_escape_like_json() {
        let argument = InputArgument::optional("path")
            .with_default("C:\\temp/x")
            .unwrap();
        assert!(argument_text(&argument, None).ends_with("[default: \"C:\\temp/x\"]</comment>"));

        let list = InputOption::new("tag", OptionMode::OPTIONAL_ARRAY)
            .unwrap()
            .with_default(vec!["a", "b"])
            .unwrap();
        assert!(option_text(&list, None).contains("[default: [\"a\",\"b\"]]"));
    }

    #[test]
    fn definitions() {
        assert_eq!(definition_text(&Definition::new()), "");

        let args = Definition::from_items([InputArgument::required("argument_name")]).unwrap();
        assert_eq!(
            definition_text(&args),
            "<comment>Arguments:</comment>\n  <info>argument_name</info>  "
        );

        let opts = Definition::from_items([option(OptionMode::NONE)]).unwrap();
        assert_eq!(
            definition_text(&opts),
            "<comment>Options:</comment>\n  <info>-o, --option_name</info>  "
        );

        let both = Definition::from_items([
            DefinitionItem::from(InputArgument::required("argument_name")),
            DefinitionItem::from(option(OptionMode::NONE)),
        ])
        .unwrap();
        assert_eq!(
            definition_text(&both),
            "<comment>Arguments:</comment>\n  <info>argument_name</info>      \n\n<comment>Options:</comment>\n  <info>-o, --option_name</info>  "
        );
    }

    #[test]
    fn definitions_list_every_option() {
        let definition = Definition::from_items([
            InputOption::flag("first").unwrap().with_shortcut(["f", "F"]),
            InputOption::flag("second").unwrap().with_shortcut("s"),
        ])
        .unwrap();
        let text = definition_text(&definition);
        assert!(text.contains("-f|-F, --first"));
        assert!(text.contains("-s, --second"));
    }

    #[test]
    fn commands() {
        let spec = CommandSpec::new("descriptor:command1")
            .unwrap()
            .with_aliases(["alias1", "alias2"])
            .unwrap()
            .with_description("command 1 description")
            .with_help("command 1 help");
        assert_eq!(
            command_text(&spec),
            "<comment>Usage:</comment>\n  descriptor:command1\n  alias1\n  alias2\n\n<comment>Help:</comment>\n command 1 help\n"
        );

        let spec = CommandSpec::new("descriptor:command2")
            .unwrap()
            .with_description("command 2 description")
            .with_help("command 2 help")
            .with_usage("-o|--option_name <argument_name>")
            .with_usage("<argument_name>")
            .with_argument(InputArgument::required("argument_name"))
            .unwrap()
            .with_option(option(OptionMode::NONE))
            .unwrap();
        assert_eq!(
            command_text(&spec),
            "<comment>Usage:</comment>\n  descriptor:command2 [options] [--] <argument_name>\n  descriptor:command2 -o|--option_name <argument_name>\n  descriptor:command2 <argument_name>\n\n<comment>Arguments:</comment>\n  <info>argument_name</info>      \n\n<comment>Options:</comment>\n  <info>-o, --option_name</info>  \n\n<comment>Help:</comment>\n command 2 help\n"
        );
    }

    #[test]
    fn describe_renders_through_the_output() {
        let argument = InputArgument::required("name").with_description("who");

        let mut output = BufferedOutput::new(Default::default(), true);
        describe(&mut output, &argument, DescribeOptions::default()).unwrap();
        assert_eq!(output.fetch(), "  \x1b[32mname\x1b[39m  who");

        describe(
            &mut output,
            &argument,
            DescribeOptions {
                raw_output: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(output.fetch(), "  <info>name</info>  who");

        describe(
            &mut output,
            &argument,
            DescribeOptions {
                raw_text: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(output.fetch(), "  name  who");
    }

    #[test]
    fn raw_text_keeps_placeholders() {
        let spec = CommandSpec::new("greet")
            .unwrap()
            .with_argument(InputArgument::required("who"))
            .unwrap();
        let mut output = BufferedOutput::new(Default::default(), true);
        describe(
            &mut output,
            &spec,
            DescribeOptions {
                raw_text: true,
                ..Default::default()
            },
        )
        .unwrap();
        let text = output.fetch();
        assert!(text.starts_with("Usage:\n  greet <who>\n"));
        assert!(!text.contains('\x1b'));
    }
}
