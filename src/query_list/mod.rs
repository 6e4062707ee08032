//! Filterable, keyboard-navigable list of items with a tracked active item.
//!
//! This module exposes a generic [`QueryList<T: Item>`] plus the supporting
//! types its callers plug in:
//! - `Item`: blanket bound, any `Clone + PartialEq + Send + Sync + 'static` type
//! - `Predicates`: per-item or whole-list filtering, the whole-list one wins
//! - `ItemsEqual`: how items are matched when the active item is tracked
//! - `ItemRenderer` / `ListRenderer`: row and list rendering
//!
//! ## Pipeline
//!
//! Every change to the items, the query or a predicate runs one ordered pass:
//!
//! 1. **Filter.** The filtered items are recomputed only when the items
//!    allocation, the query text or a predicate changed since the last pass.
//! 2. **Validate.** If the active item is no longer rendered it moves to the
//!    first row (or to `NoItem` when nothing is rendered). With
//!    `reset_on_query` a query change always moves it to the first row.
//! 3. **Scroll.** A scroll check is flagged and runs one frame later through
//!    the command returned by [`QueryList::scroll_cmd`].
//!
//! ## Events
//!
//! Mutating operations return the [`QueryListEvent`]s they produced and also
//! invoke the matching callbacks given to the builder. In a controlled list
//! `ActiveItemChanged` is a request: the caller decides whether to feed the
//! value back through [`QueryList::set_active_item`].
//!
//! ## Keys
//!
//! `↑`/`↓` move the active item on key-down, clamped to the first and last
//! row. `enter` selects it on key-up. The bubbletea runtime only reports key
//! presses, so [`QueryList::handle_key`] and the `Model` impl run both
//! phases for each `KeyMsg`.

mod equality;
mod keys;
mod model;
mod navigation;
mod predicate;
mod rendering;
mod scroll;
mod types;

#[cfg(test)]
mod tests;

pub use equality::{execute_items_equal, CompareFn, ItemsEqual};
pub use keys::QueryListKeyMap;
pub use model::{
    ActiveItemChangeFn, CreateNewItemFn, ItemSelectFn, QueryChangeFn, QueryList,
    QueryListBuilder,
};
pub use predicate::{
    filter_items, fuzzy_item_predicate, fuzzy_list_predicate, FilterMemo, FilterStrategy,
    ItemDisabled, ItemListPredicate, ItemPredicate, Predicates,
};
pub use rendering::{
    DefaultItemRenderer, DefaultItemStyles, DefaultListRenderer, ItemRenderer, ItemRendererProps,
    ListRenderer, QueryListRendererProps,
};
pub use scroll::{ItemsParent, ScrollIntoViewMsg};
pub use types::{
    ActiveItem, ActiveItemSource, CreateNewItemPosition, Item, ItemModifiers, QueryListEvent,
    QueryListOptions,
};

use crate::key;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};

impl<T: Item> QueryList<T> {
    /// Runs key-down and then key-up handling for one key press.
    pub fn handle_key(&mut self, key_msg: &KeyMsg) -> Vec<QueryListEvent<T>> {
        let mut events = self.handle_key_down(key_msg);
        events.extend(self.handle_key_up(key_msg));
        events
    }
}

impl<T: Item> key::KeyMap for QueryList<T> {
    fn short_help(&self) -> Vec<&key::Binding> {
        key::KeyMap::short_help(&self.keymap)
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        key::KeyMap::full_help(&self.keymap)
    }
}

impl<T: Item> BubbleTeaModel for QueryList<T> {
    /// An empty list with default options and no item renderer.
    fn init() -> (Self, Option<Cmd>) {
        (QueryList::builder(Vec::new()).build(), None)
    }

    /// Handles key presses and deferred scroll checks.
    ///
    /// Events are delivered through the builder callbacks. Returns the next
    /// scroll check when one is pending.
    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(scroll_msg) = msg.downcast_ref::<ScrollIntoViewMsg>() {
            self.handle_scroll_msg(scroll_msg);
            return None;
        }
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            self.handle_key(key_msg);
        }
        self.scroll_cmd()
    }

    fn view(&self) -> String {
        QueryList::view(self)
    }
}
