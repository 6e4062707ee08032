//! A button-like picker that opens a filterable popover list.
//!
//! ```rust
//! use bubbletea_select::query_list::{DefaultItemRenderer, QueryList, QueryListEvent};
//! use bubbletea_select::{Component, Select};
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let list = QueryList::builder(vec!["red", "green", "blue"])
//!     .item_predicate(|query: &str, item: &&str, _index: usize| item.contains(query))
//!     .item_renderer(DefaultItemRenderer::new())
//!     .build();
//! let mut select = Select::new(list).with_label("Pick a colour");
//! select.focus();
//!
//! let press = |code| KeyMsg { key: code, modifiers: KeyModifiers::NONE };
//! select.handle_key(&press(KeyCode::Enter));
//! assert!(select.is_open());
//!
//! select.handle_key(&press(KeyCode::Down));
//! let events = select.handle_key(&press(KeyCode::Enter));
//! assert!(events.contains(&QueryListEvent::ItemSelected("green")));
//! assert!(!select.is_open());
//! ```

use crate::input::QueryInput;
use crate::popover::{PopoverKeyMap, SelectOptions};
use crate::query_list::{Item, QueryList, QueryListEvent, ScrollIntoViewMsg};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};

/// A closed target that opens a popover with a query input and a list.
pub struct Select<T: Item> {
    list: QueryList<T>,
    input: QueryInput,
    /// Behaviour switches.
    pub options: SelectOptions,
    /// Open and close keys.
    pub keymap: PopoverKeyMap,
    /// Text shown on the closed target.
    pub label: String,
    is_open: bool,
    focus: bool,
}

impl<T: Item> Select<T> {
    /// Wraps `list` in a closed, blurred select.
    pub fn new(list: QueryList<T>) -> Self {
        Self {
            input: QueryInput::new().with_placeholder("Filter..."),
            list,
            options: SelectOptions::default(),
            keymap: PopoverKeyMap::default(),
            label: String::new(),
            is_open: false,
            focus: false,
        }
    }

    /// Sets the behaviour switches.
    pub fn with_options(mut self, options: SelectOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the target text.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Replaces the query input, e.g. to change its placeholder.
    pub fn with_input(mut self, input: QueryInput) -> Self {
        self.input = input;
        self
    }

    /// The underlying list.
    pub fn list(&self) -> &QueryList<T> {
        &self.list
    }

    /// Mutable access to the underlying list.
    pub fn list_mut(&mut self) -> &mut QueryList<T> {
        &mut self.list
    }

    /// The query input.
    pub fn input(&self) -> &QueryInput {
        &self.input
    }

    /// Whether the popover is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Opens the popover and focuses the query input when filterable.
    pub fn open(&mut self) {
        if self.is_open || self.options.disabled {
            return;
        }
        self.is_open = true;
        if self.options.filterable {
            self.input.focus();
        }
    }

    /// Closes the popover. With `reset_on_close` the query is cleared.
    pub fn close(&mut self) -> Vec<QueryListEvent<T>> {
        if !self.is_open {
            return Vec::new();
        }
        self.is_open = false;
        self.input.blur();
        if !self.options.reset_on_close {
            return Vec::new();
        }
        self.input.reset();
        self.list.reset_query()
    }

    /// Handles one key press and returns the list events it caused.
    ///
    /// Keys are ignored while the select is blurred or disabled.
    pub fn handle_key(&mut self, key_msg: &KeyMsg) -> Vec<QueryListEvent<T>> {
        if !self.focus || self.options.disabled {
            return Vec::new();
        }
        if !self.is_open {
            if self.keymap.open.matches(key_msg) {
                self.open();
            }
            return Vec::new();
        }
        if self.keymap.close.matches(key_msg) {
            return self.close();
        }

        let mut events = if self.list.handles_key(key_msg) {
            self.list.handle_key(key_msg)
        } else if self.options.filterable && self.input.update(key_msg) {
            self.list.set_query(self.input.value().to_string())
        } else {
            Vec::new()
        };

        let selected = events
            .iter()
            .any(|event| matches!(event, QueryListEvent::ItemSelected(_)));
        if selected && self.options.close_on_select {
            events.extend(self.close());
        }
        if self.input.value() != self.list.query() {
            self.input.set_value(self.list.query());
        }
        events
    }

    /// Routes key presses and the list's scroll checks.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(scroll_msg) = msg.downcast_ref::<ScrollIntoViewMsg>() {
            self.list.handle_scroll_msg(scroll_msg);
            return None;
        }
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            self.handle_key(key_msg);
        }
        self.list.scroll_cmd()
    }

    /// Renders the target and, while open, the popover below it.
    pub fn view(&self) -> String {
        let marker = if self.is_open { "▴" } else { "▾" };
        let mut out = format!("[{} {marker}]", self.label);
        if self.is_open {
            if self.options.filterable {
                out.push('\n');
                out.push_str(&self.input.view());
            }
            let body = self.list.view();
            if !body.is_empty() {
                out.push('\n');
                out.push_str(&body);
            }
        }
        out
    }
}

impl<T: Item> Component for Select<T> {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    /// Blurring also closes the popover.
    fn blur(&mut self) {
        self.focus = false;
        self.close();
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
