//! Keyboard navigation and selection.
//!
//! Arrow keys act on key-down and move the active item one row, clamped to
//! the rendered rows. Enter acts on key-up and selects the active item, so a
//! host that opens a popover on Enter key-down does not select in the same
//! keystroke.

use super::equality::items_equal;
use super::model::{ActiveReset, QueryList};
use super::types::{ActiveItem, Item, QueryListEvent};
use crate::key;
use bubbletea_rs::KeyMsg;

impl<T: Item> QueryList<T> {
    /// Handles a key-down event.
    ///
    /// `↑` and `↓` move the active item. Every other key is ignored, including
    /// Enter, which is handled on key-up.
    pub fn handle_key_down(&mut self, key_msg: &KeyMsg) -> Vec<QueryListEvent<T>> {
        if self.keymap.previous.matches(key_msg) {
            self.move_active_item(-1)
        } else if self.keymap.next.matches(key_msg) {
            self.move_active_item(1)
        } else {
            Vec::new()
        }
    }

    /// Handles a key-up event. Enter selects the active item.
    pub fn handle_key_up(&mut self, key_msg: &KeyMsg) -> Vec<QueryListEvent<T>> {
        if self.keymap.select.matches(key_msg) {
            self.select_active_item()
        } else {
            Vec::new()
        }
    }

    /// Whether `key_msg` is one of the navigation or selection keys.
    pub fn handles_key(&self, key_msg: &KeyMsg) -> bool {
        key::matches(
            key_msg,
            &[&self.keymap.previous, &self.keymap.next, &self.keymap.select],
        )
    }

    /// Moves the active item by `direction` rows, clamped to the first and
    /// last row.
    ///
    /// With no active row, moving down lands on the first row and moving up
    /// stays on it. Does nothing when no row is rendered.
    pub fn move_active_item(&mut self, direction: isize) -> Vec<QueryListEvent<T>> {
        let mut events = Vec::new();
        let count = self.row_count();
        if count == 0 {
            return events;
        }
        let current = self
            .active_index()
            .and_then(|index| isize::try_from(index).ok())
            .unwrap_or(-1);
        let last = isize::try_from(count - 1).unwrap_or(isize::MAX);
        let next = current.saturating_add(direction).clamp(0, last);
        // `next` is clamped to `0..count`.
        let next = self.row_at(next.unsigned_abs());

        tracing::trace!(list = self.id, direction, "moving active item");
        self.change_active_item(next, true, &mut events);
        self.mark_viewport_check();
        events
    }

    /// Selects whatever the active item points at.
    pub fn select_active_item(&mut self) -> Vec<QueryListEvent<T>> {
        match self.active_item().clone() {
            ActiveItem::Item(item) => self.handle_item_select(&item),
            ActiveItem::CreateNewItem if self.is_create_item_rendered() => {
                self.handle_item_create()
            }
            _ => Vec::new(),
        }
    }

    /// Selects the row at `index`, as a mouse click would.
    pub fn handle_row_click(&mut self, index: usize) -> Vec<QueryListEvent<T>> {
        match self.row_at(index) {
            ActiveItem::Item(item) => self.handle_item_select(&item),
            ActiveItem::CreateNewItem => self.handle_item_create(),
            ActiveItem::Unset | ActiveItem::NoItem => Vec::new(),
        }
    }

    /// Selects `item`.
    ///
    /// Disabled items are ignored. Otherwise `item` becomes the active item,
    /// `ItemSelected` is emitted, and with `reset_on_select` the query is
    /// cleared and the active item moves to the first row of the result.
    pub fn handle_item_select(&mut self, item: &T) -> Vec<QueryListEvent<T>> {
        let mut events = Vec::new();
        if self.is_item_disabled(item) {
            tracing::debug!(list = self.id, "ignoring selection of disabled item");
            return events;
        }

        self.change_active_item(ActiveItem::Item(item.clone()), true, &mut events);
        self.emit(QueryListEvent::ItemSelected(item.clone()), &mut events);

        if self.options.reset_on_select {
            events.extend(self.set_query_with_reset(String::new(), ActiveReset::FirstAnnounced));
        }
        events
    }

    /// Selects the item built from the query by the "create new item" row.
    pub fn handle_item_create(&mut self) -> Vec<QueryListEvent<T>> {
        let mut events = Vec::new();
        let Some(item) = self.create_new_item.clone() else {
            return events;
        };

        tracing::debug!(list = self.id, query = %self.query, "creating item from query");
        self.emit(QueryListEvent::ItemSelected(item), &mut events);

        if self.options.reset_on_select {
            events.extend(self.set_query_with_reset(String::new(), ActiveReset::FirstAnnounced));
        }
        events
    }

    /// Whether `item` is disabled at its position among the filtered items.
    pub(super) fn is_item_disabled(&self, item: &T) -> bool {
        let index = self
            .filtered_items()
            .iter()
            .position(|candidate| items_equal(&self.items_equal, candidate, item))
            .unwrap_or(0);
        self.item_disabled.is_disabled(item, index)
    }
}
