use indexmap::IndexMap;

use crate::error::{StyleError, StyleResult};
use crate::stack::StyleStack;
use crate::style::{Color, Style};

/// A `<name>content</name>` span located in markup (byte offsets).
struct Tag<'a> {
    name: &'a str,
    content_start: usize,
    content_end: usize,
    end: usize,
}

/// Match a tag opening at `start` (which must hold `<`) and its first
/// case-insensitive closing tag.
fn scan_tag(text: &str, start: usize) -> Option<Tag<'_>> {
    let bytes = text.as_bytes();
    let name_start = start + 1;
    if !bytes.get(name_start)?.is_ascii_alphabetic() {
        return None;
    }
    let mut name_end = name_start + 1;
    while bytes
        .get(name_end)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'-')
    {
        name_end += 1;
    }
    if bytes.get(name_end) != Some(&b'>') {
        return None;
    }

    let name = &text[name_start..name_end];
    let content_start = name_end + 1;
    let mut from = content_start;
    while let Some(rel) = text[from..].find("</") {
        let close = from + rel;
        let close_name_end = close + 2 + name.len();
        let matches = text
            .get(close + 2..close_name_end)
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            && bytes.get(close_name_end) == Some(&b'>');
        if matches {
            return Some(Tag {
                name,
                content_start,
                content_end: close,
                end: close_name_end + 1,
            });
        }
        from = close + 2;
    }
    None
}

/// Renders `<style>...</style>` markup into ANSI sequences.
///
/// Unknown tag names are left as they are, so placeholders like `<file>` can
/// appear in text. A backslash before `<` prevents a tag from being parsed.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    decorated: bool,
    styles: IndexMap<String, Style>,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl OutputFormatter {
    /// Formatter with the built-in `error`, `info`, `warning`, `comment` and
    /// `question` styles.
    pub fn new(decorated: bool) -> Self {
        let mut formatter = Self {
            decorated,
            styles: IndexMap::new(),
        };
        formatter.set_style(
            "error",
            Style::new()
                .with_foreground(Color::White)
                .with_background(Color::Red),
        );
        formatter.set_style("info", Style::new().with_foreground(Color::Green));
        formatter.set_style("warning", Style::new().with_foreground(Color::Yellow));
        formatter.set_style("comment", Style::new().with_foreground(Color::Yellow));
        formatter.set_style(
            "question",
            Style::new()
                .with_foreground(Color::Black)
                .with_background(Color::Cyan),
        );
        formatter
    }

    pub fn with_styles<I, S>(decorated: bool, styles: I) -> Self
    where
        I: IntoIterator<Item = (S, Style)>,
        S: AsRef<str>,
    {
        let mut formatter = Self::new(decorated);
        for (name, style) in styles {
            formatter.set_style(name.as_ref(), style);
        }
        formatter
    }

    /// Escape `<` so that `format` renders `text` literally.
    pub fn escape(text: &str) -> String {
        text.replace('<', "\\<")
    }

    pub fn set_decorated(&mut self, decorated: bool) {
        self.decorated = decorated;
    }

    pub fn is_decorated(&self) -> bool {
        self.decorated
    }

    /// Register or replace a style. Names are case-insensitive.
    pub fn set_style(&mut self, name: &str, style: Style) {
        self.styles.insert(name.to_lowercase(), style);
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(&name.to_lowercase())
    }

    pub fn style(&self, name: &str) -> StyleResult<&Style> {
        self.styles
            .get(&name.to_lowercase())
            .ok_or_else(|| StyleError::InvalidArgument(format!("Undefined style: {name}")))
    }

    pub fn styles(&self) -> impl Iterator<Item = (&str, &Style)> {
        self.styles.iter().map(|(name, style)| (name.as_str(), style))
    }

    /// Render markup. Never fails: anything that is not a registered tag is
    /// passed through.
    pub fn format(&self, message: &str) -> String {
        let mut stack = StyleStack::new();
        self.format_markup(message, &mut stack).replace("\\<", "<")
    }

    fn format_markup(&self, text: &str, stack: &mut StyleStack) -> String {
        let mut out = String::with_capacity(text.len());
        let mut emitted = 0;
        let mut search = 0;

        while let Some(rel) = text[search..].find('<') {
            let start = search + rel;
            let Some(tag) = scan_tag(text, start) else {
                search = start + 1;
                continue;
            };

            out.push_str(&text[emitted..start]);
            let span = &text[start..tag.end];
            let escaped = start > emitted && text[..start].ends_with('\\');

            match self.styles.get(&tag.name.to_lowercase()) {
                Some(style) if !escaped => {
                    tracing::trace!(tag = tag.name, depth = stack.len(), "style tag");
                    stack.push(style.clone());
                    let inner =
                        self.format_markup(&text[tag.content_start..tag.content_end], stack);
                    if self.decorated && !inner.is_empty() {
                        out.push_str(&style.apply_with_restore(&inner, stack.restore_codes()));
                    } else {
                        out.push_str(&inner);
                    }
                    stack.pop();
                }
                _ => out.push_str(span),
            }

            emitted = tag.end;
            search = tag.end;
        }

        out.push_str(&text[emitted..]);
        out
    }
}

/// Remove tag-shaped sequences (`<x...>`, `</x...>`) from `text`.
pub fn strip_tags(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut emitted = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        if bytes.get(j) == Some(&b'/') {
            j += 1;
        }
        if !bytes.get(j).is_some_and(u8::is_ascii_alphabetic) {
            i += 1;
            continue;
        }
        while bytes.get(j).is_some_and(|b| *b != b'<' && *b != b'>') {
            j += 1;
        }
        if bytes.get(j) == Some(&b'>') {
            out.push_str(&text[emitted..i]);
            emitted = j + 1;
            i = j + 1;
        } else {
            i += 1;
        }
    }

    out.push_str(&text[emitted..]);
    out
}
