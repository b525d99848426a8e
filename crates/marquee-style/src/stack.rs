use crate::style::Style;

#[derive(Debug, Clone)]
struct Frame {
    style: Style,
    restore: Vec<u8>,
}

/// Active styles of nested markup, innermost last.
///
/// Each pushed style records the codes that restore the style below it, so a
/// closing tag returns the terminal to its enclosing style. Styles themselves
/// are never modified.
#[derive(Debug, Clone, Default)]
pub struct StyleStack {
    frames: Vec<Frame>,
    empty_style: Style,
}

impl StyleStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack whose baseline (what an empty stack reports) is `empty_style`.
    pub fn with_empty_style(empty_style: Style) -> Self {
        Self {
            frames: Vec::new(),
            empty_style,
        }
    }

    pub fn reset(&mut self) {
        self.frames.clear();
    }

    pub fn push(&mut self, style: Style) -> &mut Self {
        let restore = style.restore_codes(self.current());
        self.frames.push(Frame { style, restore });
        self
    }

    /// Remove the innermost style. An empty stack yields the baseline style.
    pub fn pop(&mut self) -> Style {
        match self.frames.pop() {
            Some(frame) => frame.style,
            None => self.empty_style.clone(),
        }
    }

    pub fn current(&self) -> &Style {
        self.frames
            .last()
            .map_or(&self.empty_style, |frame| &frame.style)
    }

    /// Codes that close the innermost style; empty when nothing is pushed.
    pub fn restore_codes(&self) -> &[u8] {
        self.frames
            .last()
            .map_or(&[][..], |frame| frame.restore.as_slice())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn empty_style(&self) -> &Style {
        &self.empty_style
    }

    pub fn set_empty_style(&mut self, style: Style) -> &mut Self {
        self.empty_style = style;
        self
    }
}
