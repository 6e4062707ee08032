//! Single-line query input used by the select widgets.
//!
//! The input stores its value as a `String` and positions the cursor on
//! grapheme cluster boundaries, so editing keys never split a combining
//! sequence or an emoji. Display widths come from `unicode-width`.
//!
//! The input only reacts to keys while focused.
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_select::input::QueryInput;
//! use bubbletea_select::Component;
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let mut input = QueryInput::new().with_placeholder("Search...");
//! input.focus();
//!
//! let changed = input.update(&KeyMsg { key: KeyCode::Char('a'), modifiers: KeyModifiers::NONE });
//! assert!(changed);
//! assert_eq!(input.value(), "a");
//! ```

use crate::key::{self, Binding};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Editing key bindings.
#[derive(Debug, Clone)]
pub struct InputKeyMap {
    /// Move the cursor one grapheme right.
    pub character_forward: Binding,
    /// Move the cursor one grapheme left.
    pub character_backward: Binding,
    /// Delete the grapheme before the cursor.
    pub delete_character_backward: Binding,
    /// Delete the grapheme under the cursor.
    pub delete_character_forward: Binding,
    /// Delete everything before the cursor.
    pub delete_before_cursor: Binding,
    /// Move to the start of the line.
    pub line_start: Binding,
    /// Move to the end of the line.
    pub line_end: Binding,
}

impl Default for InputKeyMap {
    fn default() -> Self {
        Self {
            character_forward: Binding::new(vec![KeyCode::Right]).with_help("→", "right"),
            character_backward: Binding::new(vec![KeyCode::Left]).with_help("←", "left"),
            delete_character_backward: Binding::new(vec![KeyCode::Backspace])
                .with_help("backspace", "delete"),
            delete_character_forward: Binding::new(vec![KeyCode::Delete])
                .with_help("delete", "delete forward"),
            delete_before_cursor: Binding::new(vec![KeyCode::Char('u')])
                .with_modifiers(KeyModifiers::CONTROL)
                .with_help("ctrl+u", "clear"),
            line_start: Binding::new(vec![KeyCode::Home]).with_help("home", "start"),
            line_end: Binding::new(vec![KeyCode::End]).with_help("end", "end"),
        }
    }
}

impl key::KeyMap for InputKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.delete_character_backward, &self.delete_before_cursor]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![
                &self.character_backward,
                &self.character_forward,
                &self.line_start,
                &self.line_end,
            ],
            vec![
                &self.delete_character_backward,
                &self.delete_character_forward,
                &self.delete_before_cursor,
            ],
        ]
    }
}

/// Styles for the input's parts.
#[derive(Debug, Clone)]
pub struct InputStyles {
    /// The prompt.
    pub prompt: Style,
    /// The typed text.
    pub text: Style,
    /// The placeholder.
    pub placeholder: Style,
    /// The grapheme under the cursor.
    pub cursor: Style,
}

impl Default for InputStyles {
    fn default() -> Self {
        Self {
            prompt: Style::new(),
            text: Style::new(),
            placeholder: Style::new().foreground(AdaptiveColor {
                Light: "#9B9B9B",
                Dark: "#5C5C5C",
            }),
            cursor: Style::new().reverse(true),
        }
    }
}

/// A focusable single-line text input.
#[derive(Debug, Clone)]
pub struct QueryInput {
    value: String,
    /// Cursor position, in graphemes.
    pos: usize,
    focus: bool,
    /// Text rendered before the value.
    pub prompt: String,
    /// Text rendered while the value is empty.
    pub placeholder: String,
    /// Minimum display width of the value area. Zero disables padding.
    pub width: usize,
    /// Part styles.
    pub styles: InputStyles,
    /// Editing keys.
    pub keymap: InputKeyMap,
}

impl Default for QueryInput {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryInput {
    /// Creates an empty, blurred input with a `"> "` prompt.
    pub fn new() -> Self {
        Self {
            value: String::new(),
            pos: 0,
            focus: false,
            prompt: "> ".to_string(),
            placeholder: String::new(),
            width: 0,
            styles: InputStyles::default(),
            keymap: InputKeyMap::default(),
        }
    }

    /// Sets the placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Sets the prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Sets the minimum display width of the value area.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// The current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replaces the value and moves the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.pos = self.grapheme_count();
    }

    /// Clears the value.
    pub fn reset(&mut self) {
        self.value.clear();
        self.pos = 0;
    }

    /// Cursor position, in graphemes.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor, clamped to the value.
    pub fn set_cursor(&mut self, pos: usize) {
        self.pos = pos.min(self.grapheme_count());
    }

    /// Moves the cursor to the start.
    pub fn cursor_start(&mut self) {
        self.pos = 0;
    }

    /// Moves the cursor to the end.
    pub fn cursor_end(&mut self) {
        self.pos = self.grapheme_count();
    }

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    /// Byte offset of grapheme `index`, or the value length past the end.
    fn byte_offset(&self, index: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(index)
            .map_or(self.value.len(), |(offset, _)| offset)
    }

    /// Inserts `text` at the cursor.
    pub fn insert_str(&mut self, text: &str) {
        let offset = self.byte_offset(self.pos);
        let before = self.grapheme_count();
        self.value.insert_str(offset, text);
        // Inserted text can merge with a neighbouring cluster.
        self.pos += self.grapheme_count().saturating_sub(before);
    }

    /// Deletes the grapheme before the cursor. Returns whether anything was
    /// deleted.
    pub fn delete_backward(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        let start = self.byte_offset(self.pos - 1);
        let end = self.byte_offset(self.pos);
        self.value.replace_range(start..end, "");
        self.pos -= 1;
        true
    }

    /// Deletes the grapheme under the cursor. Returns whether anything was
    /// deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.pos >= self.grapheme_count() {
            return false;
        }
        let start = self.byte_offset(self.pos);
        let end = self.byte_offset(self.pos + 1);
        self.value.replace_range(start..end, "");
        true
    }

    /// Deletes everything before the cursor. Returns whether anything was
    /// deleted.
    pub fn delete_before_cursor(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        let end = self.byte_offset(self.pos);
        self.value.replace_range(..end, "");
        self.pos = 0;
        true
    }

    /// Applies an editing key. Returns whether the value changed.
    ///
    /// Keys are ignored while the input is blurred.
    pub fn update(&mut self, key_msg: &KeyMsg) -> bool {
        if !self.focus {
            return false;
        }

        if self.keymap.delete_before_cursor.matches(key_msg) {
            return self.delete_before_cursor();
        }
        if self.keymap.delete_character_backward.matches(key_msg) {
            return self.delete_backward();
        }
        if self.keymap.delete_character_forward.matches(key_msg) {
            return self.delete_forward();
        }
        if self.keymap.character_backward.matches(key_msg) {
            self.pos = self.pos.saturating_sub(1);
            return false;
        }
        if self.keymap.character_forward.matches(key_msg) {
            self.set_cursor(self.pos + 1);
            return false;
        }
        if self.keymap.line_start.matches(key_msg) {
            self.cursor_start();
            return false;
        }
        if self.keymap.line_end.matches(key_msg) {
            self.cursor_end();
            return false;
        }

        match key_msg.key {
            KeyCode::Char(ch)
                if !key_msg
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut buf = [0; 4];
                self.insert_str(ch.encode_utf8(&mut buf));
                true
            }
            _ => false,
        }
    }

    /// Renders the prompt, the value (or placeholder) and the cursor.
    pub fn view(&self) -> String {
        let mut out = self.styles.prompt.clone().render(&self.prompt);

        if self.value.is_empty() && !self.placeholder.is_empty() {
            let mut graphemes = self.placeholder.graphemes(true);
            if self.focus {
                if let Some(first) = graphemes.next() {
                    out.push_str(&self.styles.cursor.clone().render(first));
                }
            }
            let rest: String = graphemes.collect();
            out.push_str(&self.styles.placeholder.clone().render(&rest));
            out.push_str(&self.padding(self.placeholder.width()));
            return out;
        }

        let cursor_start = self.byte_offset(self.pos);
        let cursor_end = self.byte_offset(self.pos + 1);
        let before = &self.value[..cursor_start];
        let under = &self.value[cursor_start..cursor_end];
        let after = &self.value[cursor_end..];

        out.push_str(&self.styles.text.clone().render(before));
        if self.focus {
            let under = if under.is_empty() { " " } else { under };
            out.push_str(&self.styles.cursor.clone().render(under));
        } else {
            out.push_str(&self.styles.text.clone().render(under));
        }
        out.push_str(&self.styles.text.clone().render(after));

        let shown = self.value.width() + usize::from(self.focus && under.is_empty());
        out.push_str(&self.padding(shown));
        out
    }

    fn padding(&self, shown: usize) -> String {
        " ".repeat(self.width.saturating_sub(shown))
    }
}

impl Component for QueryInput {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
