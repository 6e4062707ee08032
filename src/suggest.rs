//! A text input that suggests items from a popover list.
//!
//! While closed, the input shows the selected item through the
//! `input_value_renderer`. Typing opens the popover with a fresh query and the
//! selected item as the placeholder.

use crate::input::QueryInput;
use crate::popover::{FocusCheck, PopoverFocusCheckMsg, PopoverKeyMap, SelectOptions};
use crate::query_list::{Item, QueryList, QueryListEvent, ScrollIntoViewMsg};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use std::sync::Arc;

/// Turns the selected item into the text shown in the closed input.
pub type InputValueRenderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// An input with a suggestion popover.
///
/// # Examples
///
/// ```rust
/// use bubbletea_select::query_list::QueryList;
/// use bubbletea_select::{Component, Suggest};
/// use bubbletea_rs::KeyMsg;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let list = QueryList::builder(vec!["Tokyo", "Toronto", "Oslo"])
///     .item_predicate(|query: &str, city: &&str, _index: usize| {
///         city.to_lowercase().contains(&query.to_lowercase())
///     })
///     .build();
/// let mut suggest = Suggest::new(list, |city: &&str| city.to_string());
/// suggest.focus();
///
/// let press = |code| KeyMsg { key: code, modifiers: KeyModifiers::NONE };
/// suggest.handle_key(&press(KeyCode::Char('o')));
/// suggest.handle_key(&press(KeyCode::Char('s')));
/// suggest.handle_key(&press(KeyCode::Enter));
///
/// assert_eq!(suggest.selected_item(), Some(&"Oslo"));
/// assert_eq!(suggest.input().value(), "Oslo");
/// ```
pub struct Suggest<T: Item> {
    list: QueryList<T>,
    input: QueryInput,
    input_value_renderer: InputValueRenderer<T>,
    /// Behaviour switches. `filterable` is ignored.
    pub options: SelectOptions,
    /// Open and close keys.
    pub keymap: PopoverKeyMap,
    selected_item: Option<T>,
    is_open: bool,
    focus_check: FocusCheck,
}

impl<T: Item> Suggest<T> {
    /// Wraps `list`, rendering the selected item with `input_value_renderer`.
    pub fn new<F>(list: QueryList<T>, input_value_renderer: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            list,
            input: QueryInput::new(),
            input_value_renderer: Arc::new(input_value_renderer),
            options: SelectOptions::default(),
            keymap: PopoverKeyMap::default(),
            selected_item: None,
            is_open: false,
            focus_check: FocusCheck::new(),
        }
    }

    /// Sets the behaviour switches.
    pub fn with_options(mut self, options: SelectOptions) -> Self {
        self.options = options;
        self
    }

    /// Starts with `item` selected.
    pub fn with_selected_item(mut self, item: T) -> Self {
        self.set_selected_item(Some(item));
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

    /// The input.
    pub fn input(&self) -> &QueryInput {
        &self.input
    }

    /// The selected item.
    pub fn selected_item(&self) -> Option<&T> {
        self.selected_item.as_ref()
    }

    /// Replaces the selected item and shows it in the closed input.
    pub fn set_selected_item(&mut self, item: Option<T>) {
        self.selected_item = item;
        if !self.is_open {
            self.input.set_value(self.rendered_selection());
        }
    }

    /// Whether the popover is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    fn rendered_selection(&self) -> String {
        self.selected_item
            .as_ref()
            .map(|item| (self.input_value_renderer)(item))
            .unwrap_or_default()
    }

    /// Opens the popover. The input switches to the query, with the selected
    /// item as its placeholder.
    pub fn open(&mut self) {
        if self.is_open || self.options.disabled {
            return;
        }
        self.is_open = true;
        self.input.placeholder = self.rendered_selection();
        self.input.set_value(self.list.query());
    }

    /// Closes the popover and shows the selected item again.
    pub fn close(&mut self) -> Vec<QueryListEvent<T>> {
        if !self.is_open {
            return Vec::new();
        }
        self.is_open = false;
        let events = if self.options.reset_on_close {
            self.list.reset_query()
        } else {
            Vec::new()
        };
        self.input.set_value(self.rendered_selection());
        events
    }

    /// Handles one key press and returns the list events it caused.
    ///
    /// Keys are ignored unless the input is focused.
    pub fn handle_key(&mut self, key_msg: &KeyMsg) -> Vec<QueryListEvent<T>> {
        if !self.input.focused() || self.options.disabled {
            return Vec::new();
        }
        if self.is_open && self.keymap.close.matches(key_msg) {
            return self.close();
        }
        if !self.is_open && self.keymap.open.matches(key_msg) {
            self.open();
            return Vec::new();
        }
        if self.is_open && self.list.handles_key(key_msg) {
            let events = self.list.handle_key(key_msg);
            return self.after_list_events(events);
        }

        let was_open = self.is_open;
        self.open();
        if !self.input.update(key_msg) {
            if !was_open && self.input.is_empty() {
                self.close();
            }
            return Vec::new();
        }
        self.list.set_query(self.input.value().to_string())
    }

    fn after_list_events(&mut self, mut events: Vec<QueryListEvent<T>>) -> Vec<QueryListEvent<T>> {
        let selected = events.iter().rev().find_map(|event| match event {
            QueryListEvent::ItemSelected(item) => Some(item.clone()),
            _ => None,
        });
        let Some(item) = selected else {
            return events;
        };

        self.selected_item = Some(item);
        events.extend(self.list.reset_query());
        if self.options.close_on_select {
            events.extend(self.close());
        } else {
            self.input.placeholder = self.rendered_selection();
            self.input.set_value(self.list.query());
        }
        events
    }

    /// Called when focus moves into or out of the popover.
    ///
    /// Focus is checked one frame later, once the host has settled it; the
    /// popover closes if the input is blurred by then.
    pub fn handle_popover_interaction(&mut self) -> Cmd {
        self.focus_check.schedule()
    }

    /// Routes key presses, focus checks and the list's scroll checks.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(check) = msg.downcast_ref::<PopoverFocusCheckMsg>() {
            if self.focus_check.accept(check) && !self.input.focused() && self.is_open {
                tracing::debug!(suggest = self.focus_check.id(), "input lost focus, closing popover");
                self.close();
            }
            return None;
        }
        if let Some(scroll_msg) = msg.downcast_ref::<ScrollIntoViewMsg>() {
            self.list.handle_scroll_msg(scroll_msg);
            return None;
        }
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            self.handle_key(key_msg);
        }
        self.list.scroll_cmd()
    }

    /// Renders the input and, while open, the list below it.
    pub fn view(&self) -> String {
        let mut out = self.input.view();
        if self.is_open {
            let body = self.list.view();
            if !body.is_empty() {
                out.push('\n');
                out.push_str(&body);
            }
        }
        out
    }

    /// Cancels pending focus and scroll checks.
    pub fn teardown(&self) {
        self.focus_check.teardown();
        self.list.teardown();
    }
}

impl<T: Item> Component for Suggest<T> {
    /// Focusing the input opens the popover.
    fn focus(&mut self) -> Option<Cmd> {
        self.input.focus();
        self.open();
        None
    }

    /// Blurs the input. The popover stays open until the next focus check.
    fn blur(&mut self) {
        self.input.blur();
    }

    fn focused(&self) -> bool {
        self.input.focused()
    }
}
