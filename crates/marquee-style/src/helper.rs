//! Markup builders for common message shapes.

use crate::formatter::OutputFormatter;

/// `<style>[section]</style> message`
pub fn format_section(section: &str, message: &str, style: &str) -> String {
    format!("<{style}>[{section}]</{style}> {message}")
}

/// A block of lines padded to the same width, each wrapped in `style`.
///
/// Messages are escaped first, so markup inside them is shown as is. A
/// `large` block gets an empty padded line above and below and a two-space
/// margin.
pub fn format_block<S: AsRef<str>>(messages: &[S], style: &str, large: bool) -> String {
    let margin = if large { "  " } else { " " };
    let mut width = 0;
    let mut lines = Vec::with_capacity(messages.len());
    for message in messages {
        let escaped = OutputFormatter::escape(message.as_ref());
        let line = format!("{margin}{escaped}{margin}");
        width = width.max(line.chars().count());
        lines.push(line);
    }

    let mut block = Vec::with_capacity(lines.len() + 2);
    if large {
        block.push(" ".repeat(width));
    }
    for line in lines {
        let pad = width - line.chars().count();
        block.push(format!("{line}{}", " ".repeat(pad)));
    }
    if large {
        block.push(" ".repeat(width));
    }

    block
        .into_iter()
        .map(|line| format!("<{style}>{line}</{style}>"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `message` to `length` characters followed by `suffix`; messages that
/// fit are returned unchanged.
pub fn truncate(message: &str, length: usize, suffix: &str) -> String {
    if message.chars().count() <= length {
        return message.to_string();
    }
    let mut out: String = message.chars().take(length).collect();
    out.push_str(suffix);
    out
}
