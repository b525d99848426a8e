use std::fs;
use std::path::Path;

use marquee_input::{ArgumentMode, InputArgument, InputOption, OptionMode, Value};
use serde::{Deserialize, Serialize};

use crate::command::CommandSpec;
use crate::error::{Error, Result};

/// A command declared in JSON:
///
/// ```json
/// {
///   "name": "app:greet",
///   "description": "Say hello",
///   "arguments": [{ "name": "who", "mode": ["required"] }],
///   "options": [{ "name": "yell", "shortcut": "y" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandManifest {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usages: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentManifest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionManifest>,

    #[serde(default)]
    pub ignore_validation_errors: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentManifest {
    pub name: String,

    /// Flag names: `required`, `optional`, `array`. Empty means optional.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mode: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub default: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionManifest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<ShortcutSpec>,

    /// Flag names: `none`, `required`, `optional`, `array`. Empty means none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mode: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub default: Value,
}

/// `"v"`, `"v|V"` or `["v", "V"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShortcutSpec {
    One(String),
    Many(Vec<String>),
}

impl CommandManifest {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ManifestIo {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded command manifest");
        Self::from_json(&text)
    }

    /// Build the command spec, validating names, modes and defaults.
    pub fn to_spec(&self) -> Result<CommandSpec> {
        let mut spec = CommandSpec::new(self.name.as_str())?
            .with_description(self.description.as_str())
            .with_help(self.help.as_str())
            .with_aliases(self.aliases.iter().map(String::as_str))?;
        for usage in &self.usages {
            spec.add_usage(usage);
        }
        for argument in &self.arguments {
            spec = spec.with_argument(argument.to_argument()?)?;
        }
        for option in &self.options {
            spec = spec.with_option(option.to_option()?)?;
        }
        if self.ignore_validation_errors {
            spec = spec.ignore_validation_errors();
        }
        Ok(spec)
    }
}

impl ArgumentManifest {
    pub fn to_argument(&self) -> Result<InputArgument> {
        let mode = ArgumentMode::from_flags(&self.mode)?;
        let argument = InputArgument::new(self.name.as_str(), mode)
            .with_description(self.description.as_str())
            .with_default(self.default.clone())?;
        Ok(argument)
    }
}

impl OptionManifest {
    pub fn to_option(&self) -> Result<InputOption> {
        let mode = OptionMode::from_flags(&self.mode)?;
        let mut option = InputOption::new(&self.name, mode)?
            .with_description(self.description.as_str())
            .with_default(self.default.clone())?;
        match &self.shortcut {
            Some(ShortcutSpec::One(names)) => option = option.with_shortcut(names.as_str()),
            Some(ShortcutSpec::Many(names)) => option = option.with_shortcut(names.as_slice()),
            None => {}
        }
        Ok(option)
    }
}

#[cfg(test)]
mod tests {
    use marquee_input::{InputError, Value};

    use super::{CommandManifest, ShortcutSpec};
    use crate::error::Error;

    const GREET: &str = r#"{
        "name": "app:greet",
        "description": "Say hello",
        "help": "Greets %command.name% style",
        "aliases": ["greet"],
        "usages": ["--yell bob"],
        "arguments": [
            { "name": "who", "mode": ["required"], "description": "Who to greet" },
            { "name": "extra", "mode": ["optional", "array"], "default": ["x"] }
        ],
        "options": [
            { "name": "yell", "shortcut": "y" },
            { "name": "times", "shortcut": ["t", "T"], "mode": ["required"], "default": "1" }
        ],
        "ignoreValidationErrors": true
    }"#;

    #[test]
    fn builds_a_command_spec() {
        let manifest = CommandManifest::from_json(GREET).unwrap();
        assert_eq!(
            manifest.options[1].shortcut,
            Some(ShortcutSpec::Many(vec!["t".to_string(), "T".to_string()]))
        );

        let spec = manifest.to_spec().unwrap();
        assert_eq!(spec.name(), "app:greet");
        assert_eq!(spec.aliases(), ["greet"]);
        assert_eq!(spec.usages(), ["app:greet --yell bob"]);
        assert_eq!(spec.processed_help(), "Greets app:greet style");
        assert!(spec.ignores_validation_errors());

        let definition = spec.definition();
        assert!(definition.argument("who").unwrap().is_required());
        assert_eq!(
            definition.argument("extra").unwrap().default_value(),
            &Value::from(vec!["x"])
        );
        assert_eq!(definition.option_by_shortcut("T").unwrap().name(), "times");
        assert_eq!(
            definition.option("times").unwrap().default_value(),
            &Value::from("1")
        );
        assert_eq!(definition.option("yell").unwrap().default_value(), &Value::Bool(false));
        assert_eq!(
            spec.synopsis(false),
            "app:greet [-y|--yell] [-t|-T|--times TIMES] [--] <who> [<extra>]..."
        );
    }

    #[test]
    fn invalid_mode_flag_is_rejected() {
        let err = CommandManifest::from_json(
            r#"{ "name": "x", "arguments": [{ "name": "a", "mode": ["sometimes"] }] }"#,
        )
        .unwrap()
        .to_spec()
        .unwrap_err();
        assert!(matches!(err, Error::Input(InputError::InvalidArgument(_))));
    }

    #[test]
    fn default_on_required_argument_is_a_logic_error() {
        let err = CommandManifest::from_json(
            r#"{ "name": "x", "arguments": [{ "name": "a", "mode": ["required"], "default": "v" }] }"#,
        )
        .unwrap()
        .to_spec()
        .unwrap_err();
        assert!(matches!(err, Error::Input(InputError::Logic(_))));
    }

    #[test]
    fn invalid_name_is_rejected() {
        let err = CommandManifest::from_json(r#"{ "name": "bad name" }"#)
            .unwrap()
            .to_spec()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn malformed_json_is_a_manifest_error() {
        let err = CommandManifest::from_json(r#"{ "name": 3 }"#).unwrap_err();
        assert!(matches!(err, Error::Manifest(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join(format!(
            "marquee-missing-manifest-{}.json",
            std::process::id()
        ));
        let err = CommandManifest::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::ManifestIo { .. }));
    }
}
