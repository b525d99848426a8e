use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{StyleError, StyleResult};
use crate::formatter::OutputFormatter;
use crate::style::Style;

/// One style entry of a [`StyleSheet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "foreground")]
    pub fg: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "background")]
    pub bg: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl StyleSpec {
    pub fn to_style(&self) -> StyleResult<Style> {
        Style::from_names(self.fg.as_deref(), self.bg.as_deref(), self.options.as_slice())
    }
}

/// Named styles loaded from JSON:
///
/// ```json
/// {
///   "decorated": true,
///   "styles": {
///     "title": { "fg": "white", "bg": "blue", "options": ["bold"] }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSheet {
    /// Overrides the formatter's decoration when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorated: Option<bool>,

    #[serde(default)]
    pub styles: IndexMap<String, StyleSpec>,
}

impl StyleSheet {
    pub fn from_json(text: &str) -> StyleResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> StyleResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded style sheet");
        Self::from_json(&text)
    }

    /// Register every style on `formatter`. Nothing is registered when one of
    /// the entries is invalid.
    pub fn apply(&self, formatter: &mut OutputFormatter) -> StyleResult<()> {
        let styles = self
            .styles
            .iter()
            .map(|(name, spec)| Ok((name.as_str(), spec.to_style()?)))
            .collect::<StyleResult<Vec<_>>>()?;

        for (name, style) in styles {
            formatter.set_style(name, style);
        }
        if let Some(decorated) = self.decorated {
            formatter.set_decorated(decorated);
        }
        Ok(())
    }
}
