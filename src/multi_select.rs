//! Tag input backed by a popover list.
//!
//! Selecting an item toggles it in the selected tags. Items are matched with
//! the list's comparator, so a key-based [`ItemsEqual`](crate::query_list::ItemsEqual)
//! also decides tag membership.

use crate::input::QueryInput;
use crate::popover::{FocusCheck, PopoverFocusCheckMsg, PopoverKeyMap, SelectOptions};
use crate::query_list::{Item, QueryList, QueryListEvent, ScrollIntoViewMsg};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use lipgloss_extras::prelude::*;
use std::sync::Arc;

/// Turns a selected item into its tag text.
pub type TagRenderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// A tag input with a popover list of candidates.
pub struct MultiSelect<T: Item> {
    list: QueryList<T>,
    input: QueryInput,
    tag_renderer: TagRenderer<T>,
    /// Behaviour switches. `filterable` is ignored.
    pub options: SelectOptions,
    /// Open, close and tag removal keys.
    pub keymap: PopoverKeyMap,
    /// Style applied to each tag.
    pub tag_style: Style,
    selected_items: Vec<T>,
    is_open: bool,
    focus_check: FocusCheck,
}

impl<T: Item> MultiSelect<T> {
    /// Wraps `list`, labelling tags with `tag_renderer`.
    pub fn new<F>(list: QueryList<T>, tag_renderer: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            list,
            input: QueryInput::new().with_prompt(""),
            tag_renderer: Arc::new(tag_renderer),
            options: SelectOptions::default(),
            keymap: PopoverKeyMap::default(),
            tag_style: Style::new().reverse(true),
            selected_items: Vec::new(),
            is_open: false,
            focus_check: FocusCheck::new(),
        }
    }

    /// Sets the behaviour switches.
    pub fn with_options(mut self, options: SelectOptions) -> Self {
        self.options = options;
        self
    }

    /// Starts with `items` selected.
    pub fn with_selected_items(mut self, items: Vec<T>) -> Self {
        self.selected_items = items;
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

    /// The selected items, in selection order.
    pub fn selected_items(&self) -> &[T] {
        &self.selected_items
    }

    /// Whether `item` is among the selected items.
    pub fn is_selected(&self, item: &T) -> bool {
        self.position_of(item).is_some()
    }

    fn position_of(&self, item: &T) -> Option<usize> {
        self.selected_items
            .iter()
            .position(|selected| self.list.items_match(selected, item))
    }

    /// Adds `item` if it is not selected, removes it otherwise.
    pub fn toggle(&mut self, item: T) {
        match self.position_of(&item) {
            Some(index) => {
                self.selected_items.remove(index);
            }
            None => self.selected_items.push(item),
        }
    }

    /// Removes and returns the last tag.
    pub fn remove_last(&mut self) -> Option<T> {
        self.selected_items.pop()
    }

    /// Clears every tag.
    pub fn clear(&mut self) {
        self.selected_items.clear();
    }

    /// Whether the popover is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Opens the popover.
    pub fn open(&mut self) {
        if !self.options.disabled {
            self.is_open = true;
        }
    }

    /// Closes the popover. With `reset_on_close` the query is cleared.
    pub fn close(&mut self) -> Vec<QueryListEvent<T>> {
        if !self.is_open {
            return Vec::new();
        }
        self.is_open = false;
        if !self.options.reset_on_close {
            return Vec::new();
        }
        self.input.reset();
        self.list.reset_query()
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
        if self.input.is_empty() && self.keymap.remove_tag.matches(key_msg) {
            if self.remove_last().is_some() {
                tracing::trace!(tags = self.selected_items.len(), "removed last tag");
            }
            return Vec::new();
        }
        if !self.is_open && self.keymap.open.matches(key_msg) {
            self.open();
            return Vec::new();
        }
        if self.is_open && self.list.handles_key(key_msg) {
            let events = self.list.handle_key(key_msg);
            return self.after_list_events(events);
        }

        if !self.input.update(key_msg) {
            return Vec::new();
        }
        self.open();
        self.list.set_query(self.input.value().to_string())
    }

    fn after_list_events(&mut self, mut events: Vec<QueryListEvent<T>>) -> Vec<QueryListEvent<T>> {
        let selected: Vec<T> = events
            .iter()
            .filter_map(|event| match event {
                QueryListEvent::ItemSelected(item) => Some(item.clone()),
                _ => None,
            })
            .collect();
        if selected.is_empty() {
            return events;
        }
        for item in selected {
            self.toggle(item);
        }
        if self.options.close_on_select {
            events.extend(self.close());
        }
        if self.input.value() != self.list.query() {
            self.input.set_value(self.list.query());
        }
        events
    }

    /// Called when focus moves into or out of the popover.
    ///
    /// Focus is checked one frame later; the popover closes if the input is
    /// blurred by then.
    pub fn handle_popover_interaction(&mut self) -> Cmd {
        self.focus_check.schedule()
    }

    /// Routes key presses, focus checks and the list's scroll checks.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(check) = msg.downcast_ref::<PopoverFocusCheckMsg>() {
            if self.focus_check.accept(check) && !self.input.focused() && self.is_open {
                tracing::debug!(
                    multi_select = self.focus_check.id(),
                    "input lost focus, closing popover"
                );
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

    /// Renders the tags followed by the input, and the list while open.
    pub fn view(&self) -> String {
        let mut parts: Vec<String> = self
            .selected_items
            .iter()
            .map(|item| {
                let text = format!(" {} ", (self.tag_renderer)(item));
                self.tag_style.clone().render(&text)
            })
            .collect();
        parts.push(self.input.view());
        let mut out = parts.join(" ");

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

impl<T: Item> Component for MultiSelect<T> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_list::ItemsEqual;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        id: u32,
        name: &'static str,
    }

    fn press(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn tags() -> MultiSelect<Tag> {
        let list = QueryList::builder(vec![
            Tag { id: 1, name: "rust" },
            Tag { id: 2, name: "go" },
            Tag { id: 3, name: "zig" },
        ])
        .item_predicate(|query: &str, tag: &Tag, _index: usize| tag.name.contains(query))
        .items_equal(ItemsEqual::by_key(|tag: &Tag| tag.id))
        .build();
        let mut multi = MultiSelect::new(list, |tag: &Tag| tag.name.to_string());
        multi.focus();
        multi
    }

    fn names(multi: &MultiSelect<Tag>) -> Vec<&'static str> {
        multi.selected_items().iter().map(|tag| tag.name).collect()
    }

    fn normalize(s: &str) -> String {
        lipgloss_extras::lipgloss::strip_ansi(s)
    }

    #[test]
    fn test_select_adds_tag_and_closes() {
        let mut multi = tags();
        let events = multi.handle_key(&press(KeyCode::Enter));

        assert!(events.contains(&QueryListEvent::ItemSelected(Tag { id: 1, name: "rust" })));
        assert_eq!(names(&multi), vec!["rust"]);
        assert!(!multi.is_open());
    }

    #[test]
    fn test_selecting_again_removes_tag() {
        let mut multi = tags().with_options(SelectOptions {
            close_on_select: false,
            ..SelectOptions::default()
        });
        multi.handle_key(&press(KeyCode::Down));
        multi.handle_key(&press(KeyCode::Enter));
        assert_eq!(names(&multi), vec!["go"]);

        multi.handle_key(&press(KeyCode::Enter));
        assert!(names(&multi).is_empty());
    }

    #[test]
    fn test_membership_uses_comparator() {
        let mut multi = tags().with_selected_items(vec![Tag {
            id: 3,
            name: "renamed",
        }]);
        assert!(multi.is_selected(&Tag { id: 3, name: "zig" }));

        multi.toggle(Tag { id: 3, name: "zig" });
        assert!(multi.selected_items().is_empty());
    }

    #[test]
    fn test_backspace_on_empty_query_removes_last_tag() {
        let mut multi = tags().with_selected_items(vec![
            Tag { id: 1, name: "rust" },
            Tag { id: 2, name: "go" },
        ]);
        multi.handle_key(&press(KeyCode::Char('z')));
        multi.handle_key(&press(KeyCode::Backspace));
        assert_eq!(names(&multi), vec!["rust", "go"]);
        assert_eq!(multi.input().value(), "");

        multi.handle_key(&press(KeyCode::Backspace));
        assert_eq!(names(&multi), vec!["rust"]);
    }

    #[test]
    fn test_typing_opens_and_filters() {
        let mut multi = tags();
        multi.handle_key(&press(KeyCode::Esc));
        assert!(!multi.is_open());

        multi.handle_key(&press(KeyCode::Char('g')));
        assert!(multi.is_open());
        assert_eq!(multi.list().filtered_items(), &[Tag { id: 2, name: "go" }]);
    }

    #[test]
    fn test_view_renders_tags_before_input() {
        let mut multi = tags().with_selected_items(vec![Tag { id: 2, name: "go" }]);
        multi.blur();
        multi.close();
        assert_eq!(normalize(&multi.view()), " go  ");
    }

    #[tokio::test]
    async fn test_focus_check_closes_blurred_popover() {
        let mut multi = tags();
        let cmd = multi.handle_popover_interaction();
        multi.blur();

        let msg = cmd.await.expect("focus check while alive");
        multi.update(msg);
        assert!(!multi.is_open());
    }
}
