//! The `QueryList` struct, its builder, and the recomputation pipeline.
//!
//! Every input change runs the same strictly ordered pass:
//! 1. filter (memoized on items, query and predicate identity),
//! 2. validate the active item against the new rows,
//! 3. flag the viewport for a deferred scroll check.

use super::equality::{execute_items_equal, items_equal, ItemsEqual};
use super::keys::QueryListKeyMap;
use super::predicate::{
    FilterMemo, ItemDisabled, ItemListPredicate, ItemPredicate, Predicates,
};
use super::rendering::{DefaultListRenderer, ItemRenderer, ListRenderer};
use super::scroll::ItemsParent;
use super::types::{
    ActiveItem, ActiveItemSource, CreateNewItemPosition, Item, QueryListEvent, QueryListOptions,
};
use crate::deferred::{self, Lifetime};
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Called with the new active item.
pub type ActiveItemChangeFn<T> = Box<dyn FnMut(&ActiveItem<T>) + Send>;
/// Called with the selected item.
pub type ItemSelectFn<T> = Box<dyn FnMut(&T) + Send>;
/// Called with the new query text.
pub type QueryChangeFn = Box<dyn FnMut(&str) + Send>;
/// Builds a new item from the query for the "create new item" row.
pub type CreateNewItemFn<T> = Arc<dyn Fn(&str) -> T + Send + Sync>;

/// What a recomputation does with the active item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ActiveReset {
    /// Keep it while it is still rendered.
    Keep,
    /// Move to the first row.
    First,
    /// Move to the first row and announce it even if unchanged.
    FirstAnnounced,
}

/// Filtering, active-item tracking and selection for a list of items.
///
/// `QueryList` is the engine behind [`Select`](crate::Select),
/// [`MultiSelect`](crate::MultiSelect), [`Suggest`](crate::Suggest) and
/// [`Omnibar`](crate::Omnibar). It owns the items, the query and the filtered
/// items, and keeps the active (keyboard-highlighted) item valid as those
/// inputs change.
///
/// # Controlled and uncontrolled active item
///
/// Passing a value other than [`ActiveItem::Unset`] to
/// [`QueryListBuilder::active_item`] makes the list *controlled*: it never
/// changes the active item itself, it only reports the change it wants through
/// events and `on_active_item_change`, and reads back whatever the caller
/// feeds to [`set_active_item`](Self::set_active_item). Otherwise the list owns
/// the value. The choice is fixed for the lifetime of the list.
///
/// # Examples
///
/// ```
/// use bubbletea_select::query_list::{ActiveItem, QueryList, QueryListEvent};
///
/// let mut list = QueryList::builder(vec!["apple", "banana", "cherry"])
///     .item_predicate(|query: &str, item: &&str, _index: usize| item.contains(query))
///     .build();
/// assert_eq!(list.active_item(), &ActiveItem::Item("apple"));
///
/// let events = list.set_query("an");
/// assert_eq!(list.filtered_items(), &["banana"]);
/// assert_eq!(list.active_item(), &ActiveItem::Item("banana"));
/// assert!(events.contains(&QueryListEvent::QueryChanged("an".to_string())));
/// ```
pub struct QueryList<T: Item> {
    pub(super) id: usize,
    pub(super) lifetime: Lifetime,

    // Inputs
    pub(super) items: Arc<[T]>,
    pub(super) query: String,
    pub(super) predicates: Predicates<T>,
    pub(super) items_equal: ItemsEqual<T>,
    pub(super) item_disabled: ItemDisabled<T>,
    pub(super) create_new_item_from_query: Option<CreateNewItemFn<T>>,
    pub(super) options: QueryListOptions,

    // Derived
    pub(super) memo: FilterMemo<T>,
    pub(super) create_new_item: Option<T>,
    pub(super) active: ActiveItemSource<T>,

    // Presentation
    pub(super) keymap: QueryListKeyMap,
    pub(super) item_renderer: Option<Box<dyn ItemRenderer<T> + Send>>,
    pub(super) list_renderer: Box<dyn ListRenderer<T> + Send>,
    pub(super) items_parent: Option<ItemsParent>,
    pub(super) viewport_check_needed: bool,
    pub(super) scroll_tag: usize,

    // Notifications
    pub(super) on_active_item_change: Option<ActiveItemChangeFn<T>>,
    pub(super) on_item_select: Option<ItemSelectFn<T>>,
    pub(super) on_query_change: Option<QueryChangeFn>,

    warned_both_predicates: bool,
}

/// Builder for [`QueryList`].
///
/// The builder exists so that the initial filtered items and the initial
/// active item are computed exactly once, after every input is known.
pub struct QueryListBuilder<T: Item> {
    items: Arc<[T]>,
    query: String,
    predicates: Predicates<T>,
    items_equal: ItemsEqual<T>,
    item_disabled: ItemDisabled<T>,
    create_new_item_from_query: Option<CreateNewItemFn<T>>,
    active_item: ActiveItem<T>,
    initial_active_item: Option<T>,
    options: QueryListOptions,
    keymap: QueryListKeyMap,
    item_renderer: Option<Box<dyn ItemRenderer<T> + Send>>,
    list_renderer: Option<Box<dyn ListRenderer<T> + Send>>,
    on_active_item_change: Option<ActiveItemChangeFn<T>>,
    on_item_select: Option<ItemSelectFn<T>>,
    on_query_change: Option<QueryChangeFn>,
}

impl<T: Item> QueryListBuilder<T> {
    fn new(items: Arc<[T]>) -> Self {
        Self {
            items,
            query: String::new(),
            predicates: Predicates::default(),
            items_equal: ItemsEqual::Identity,
            item_disabled: ItemDisabled::Never,
            create_new_item_from_query: None,
            active_item: ActiveItem::Unset,
            initial_active_item: None,
            options: QueryListOptions::default(),
            keymap: QueryListKeyMap::default(),
            item_renderer: None,
            list_renderer: None,
            on_active_item_change: None,
            on_item_select: None,
            on_query_change: None,
        }
    }

    /// Initial query text.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Per-item predicate `(query, item, index) -> keep`.
    pub fn item_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &T, usize) -> bool + Send + Sync + 'static,
    {
        self.predicates.item = Some(Arc::new(predicate));
        self
    }

    /// Whole-list predicate `(query, items) -> filtered`. Takes priority over
    /// the per-item predicate.
    pub fn item_list_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, &[T]) -> Vec<T> + Send + Sync + 'static,
    {
        self.predicates.list = Some(Arc::new(predicate));
        self
    }

    /// Already-shared predicates, e.g. from [`fuzzy_item_predicate`](super::fuzzy_item_predicate).
    pub fn predicates(mut self, predicates: Predicates<T>) -> Self {
        self.predicates = predicates;
        self
    }

    /// How items are compared when tracking the active item.
    pub fn items_equal(mut self, items_equal: ItemsEqual<T>) -> Self {
        self.items_equal = items_equal;
        self
    }

    /// Which items are disabled.
    pub fn item_disabled(mut self, item_disabled: ItemDisabled<T>) -> Self {
        self.item_disabled = item_disabled;
        self
    }

    /// Enables the "create new item" row.
    pub fn create_new_item_from_query<F>(mut self, create: F) -> Self
    where
        F: Fn(&str) -> T + Send + Sync + 'static,
    {
        self.create_new_item_from_query = Some(Arc::new(create));
        self
    }

    /// Controlled active item. Anything but `Unset` makes the list controlled.
    pub fn active_item(mut self, active_item: ActiveItem<T>) -> Self {
        self.active_item = active_item;
        self
    }

    /// Initial active item for an uncontrolled list.
    pub fn initial_active_item(mut self, item: T) -> Self {
        self.initial_active_item = Some(item);
        self
    }

    /// Behaviour switches.
    pub fn options(mut self, options: QueryListOptions) -> Self {
        self.options = options;
        self
    }

    /// Key bindings.
    pub fn keymap(mut self, keymap: QueryListKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Per-item renderer. Rows render as nothing until one is set; items that
    /// implement `Display` can use [`DefaultItemRenderer`](super::DefaultItemRenderer).
    pub fn item_renderer<R>(mut self, renderer: R) -> Self
    where
        R: ItemRenderer<T> + Send + 'static,
    {
        self.item_renderer = Some(Box::new(renderer));
        self
    }

    /// Whole-list renderer.
    pub fn list_renderer<R>(mut self, renderer: R) -> Self
    where
        R: ListRenderer<T> + Send + 'static,
    {
        self.list_renderer = Some(Box::new(renderer));
        self
    }

    /// Called whenever the active item changes.
    pub fn on_active_item_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&ActiveItem<T>) + Send + 'static,
    {
        self.on_active_item_change = Some(Box::new(callback));
        self
    }

    /// Called whenever an item is selected.
    pub fn on_item_select<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.on_item_select = Some(Box::new(callback));
        self
    }

    /// Called whenever the query text changes.
    pub fn on_query_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.on_query_change = Some(Box::new(callback));
        self
    }

    /// Computes the initial filtered items and active item.
    pub fn build(self) -> QueryList<T> {
        let controlled = !self.active_item.is_unset();
        let active = if controlled {
            ActiveItemSource::External(self.active_item)
        } else {
            ActiveItemSource::Owned(ActiveItem::Unset)
        };

        let mut list = QueryList {
            id: deferred::next_id(),
            lifetime: Lifetime::new(),
            items: self.items,
            query: self.query,
            predicates: self.predicates,
            items_equal: self.items_equal,
            item_disabled: self.item_disabled,
            create_new_item_from_query: self.create_new_item_from_query,
            options: self.options,
            memo: FilterMemo::new(),
            create_new_item: None,
            active,
            keymap: self.keymap,
            item_renderer: self.item_renderer,
            list_renderer: self
                .list_renderer
                .unwrap_or_else(|| Box::new(DefaultListRenderer)),
            items_parent: None,
            viewport_check_needed: false,
            scroll_tag: 0,
            on_active_item_change: self.on_active_item_change,
            on_item_select: self.on_item_select,
            on_query_change: self.on_query_change,
            warned_both_predicates: false,
        };

        list.warn_on_both_predicates();
        list.memo.refresh(&list.items, &list.query, &list.predicates);
        list.create_new_item = list.compute_create_new_item();

        if !controlled {
            let initial = self
                .initial_active_item
                .map(ActiveItem::Item)
                .filter(|item| list.row_index_of(item).is_some())
                .unwrap_or_else(|| list.first_row());
            list.active = ActiveItemSource::Owned(initial);
        }
        list
    }
}

impl<T: Item> QueryList<T> {
    /// Starts building a list over `items`.
    pub fn builder(items: impl Into<Arc<[T]>>) -> QueryListBuilder<T> {
        QueryListBuilder::new(items.into())
    }

    /// All candidate items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The shared item set, for re-feeding without triggering a recompute.
    pub fn shared_items(&self) -> &Arc<[T]> {
        &self.items
    }

    /// Current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Items matching the current query, in display order.
    pub fn filtered_items(&self) -> &[T] {
        self.memo.filtered()
    }

    /// The active item.
    pub fn active_item(&self) -> &ActiveItem<T> {
        self.active.current()
    }

    /// Whether the caller owns the active item.
    pub fn is_controlled(&self) -> bool {
        self.active.is_controlled()
    }

    /// Behaviour switches.
    pub fn options(&self) -> &QueryListOptions {
        &self.options
    }

    /// Replaces the behaviour switches. Takes effect on the next operation.
    pub fn set_options(&mut self, options: QueryListOptions) {
        self.options = options;
    }

    /// The navigation keys.
    pub fn keymap(&self) -> &QueryListKeyMap {
        &self.keymap
    }

    /// Key bindings, for customisation.
    pub fn keymap_mut(&mut self) -> &mut QueryListKeyMap {
        &mut self.keymap
    }

    /// The configured predicates.
    pub fn predicates(&self) -> &Predicates<T> {
        &self.predicates
    }

    /// The item comparator.
    pub fn items_equal(&self) -> &ItemsEqual<T> {
        &self.items_equal
    }

    /// The item the "create new item" row would create, when that row is shown.
    pub fn create_new_item(&self) -> Option<&T> {
        self.create_new_item.as_ref()
    }

    /// Whether the "create new item" row is shown.
    pub fn is_create_item_rendered(&self) -> bool {
        self.create_new_item.is_some()
    }

    /// Whether no row matches the current query.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Instance id carried by this list's deferred messages.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Cancels every outstanding deferred command of this list.
    pub fn teardown(&self) {
        self.lifetime.teardown();
    }

    /// Replaces the item set. Recomputes unless it is the same allocation.
    pub fn set_items(&mut self, items: impl Into<Arc<[T]>>) -> Vec<QueryListEvent<T>> {
        self.items = items.into();
        let mut events = Vec::new();
        self.refresh(ActiveReset::Keep, &mut events);
        events
    }

    /// Replaces the query text.
    ///
    /// When the value changes the filtered items are recomputed, the active
    /// item is reset to the first row if `reset_on_query` is set (or whenever
    /// it no longer matches), and `QueryChanged` is emitted last.
    pub fn set_query(&mut self, query: impl Into<String>) -> Vec<QueryListEvent<T>> {
        let reset = if self.options.reset_on_query {
            ActiveReset::First
        } else {
            ActiveReset::Keep
        };
        self.set_query_with_reset(query.into(), reset)
    }

    /// Clears the query, moving the active item to the first row.
    pub fn reset_query(&mut self) -> Vec<QueryListEvent<T>> {
        self.set_query_with_reset(String::new(), ActiveReset::First)
    }

    pub(super) fn set_query_with_reset(
        &mut self,
        query: String,
        reset: ActiveReset,
    ) -> Vec<QueryListEvent<T>> {
        let mut events = Vec::new();
        if query == self.query {
            // A selection reset still moves to the first row.
            if reset == ActiveReset::FirstAnnounced {
                self.validate_active_item(reset, &mut events);
            }
            return events;
        }
        self.query = query;
        self.refresh(reset, &mut events);
        let query = self.query.clone();
        self.emit(QueryListEvent::QueryChanged(query), &mut events);
        events
    }

    /// Replaces the per-item predicate.
    pub fn set_item_predicate(
        &mut self,
        predicate: Option<ItemPredicate<T>>,
    ) -> Vec<QueryListEvent<T>> {
        self.predicates.item = predicate;
        self.warn_on_both_predicates();
        let mut events = Vec::new();
        self.refresh(ActiveReset::Keep, &mut events);
        events
    }

    /// Replaces the whole-list predicate.
    pub fn set_item_list_predicate(
        &mut self,
        predicate: Option<ItemListPredicate<T>>,
    ) -> Vec<QueryListEvent<T>> {
        self.predicates.list = predicate;
        self.warn_on_both_predicates();
        let mut events = Vec::new();
        self.refresh(ActiveReset::Keep, &mut events);
        events
    }

    /// Replaces the item comparator.
    pub fn set_items_equal(&mut self, items_equal: ItemsEqual<T>) {
        self.items_equal = items_equal;
        self.create_new_item = self.compute_create_new_item();
    }

    /// Replaces the disabled-item test.
    pub fn set_item_disabled(&mut self, item_disabled: ItemDisabled<T>) {
        self.item_disabled = item_disabled;
    }

    /// Whether `a` and `b` are the same item under the configured comparator.
    pub fn items_match(&self, a: &T, b: &T) -> bool {
        items_equal(&self.items_equal, a, b)
    }

    /// Enables, replaces or disables the "create new item" row.
    pub fn set_create_new_item_from_query(
        &mut self,
        create: Option<CreateNewItemFn<T>>,
    ) -> Vec<QueryListEvent<T>> {
        self.create_new_item_from_query = create;
        self.create_new_item = self.compute_create_new_item();
        let mut events = Vec::new();
        self.validate_active_item(ActiveReset::Keep, &mut events);
        events
    }

    /// Feeds the caller-owned active item of a controlled list.
    ///
    /// # Errors
    ///
    /// [`Error::ControlModeChange`] if the list is uncontrolled, or if `Unset`
    /// is fed to a controlled list.
    pub fn set_active_item(&mut self, active_item: ActiveItem<T>) -> Result<()> {
        let ActiveItemSource::External(current) = &mut self.active else {
            return Err(Error::ControlModeChange { controlled: false });
        };
        if active_item.is_unset() {
            return Err(Error::ControlModeChange { controlled: true });
        }
        if !execute_items_equal(&self.items_equal, current, &active_item) {
            *current = active_item;
            self.mark_viewport_check();
        }
        Ok(())
    }

    /// Reruns the pipeline if an input changed since the last pass.
    pub(super) fn refresh(&mut self, reset: ActiveReset, events: &mut Vec<QueryListEvent<T>>) {
        if !self.memo.refresh(&self.items, &self.query, &self.predicates) {
            return;
        }
        self.create_new_item = self.compute_create_new_item();
        self.mark_viewport_check();
        self.validate_active_item(reset, events);
    }

    /// Keeps the active item pointing at a rendered row.
    ///
    /// Nothing is emitted when there are no rows and nothing is active.
    pub(super) fn validate_active_item(
        &mut self,
        reset: ActiveReset,
        events: &mut Vec<QueryListEvent<T>>,
    ) {
        let current = self.active_item().clone();
        if self.row_count() == 0 && current.is_nothing() {
            return;
        }
        match reset {
            ActiveReset::Keep => {
                if self.row_index_of(&current).is_none() {
                    tracing::debug!(
                        list = self.id,
                        "active item no longer rendered, moving to first row"
                    );
                    let first = self.first_row();
                    self.change_active_item(first, false, events);
                }
            }
            ActiveReset::First => {
                let first = self.first_row();
                self.change_active_item(first, false, events);
            }
            ActiveReset::FirstAnnounced => {
                let first = self.first_row();
                self.change_active_item(first, true, events);
            }
        }
    }

    /// Moves the active item to `next` and notifies.
    ///
    /// Unchanged values are only re-announced when `force` is set and `next`
    /// is a real row.
    pub(super) fn change_active_item(
        &mut self,
        next: ActiveItem<T>,
        force: bool,
        events: &mut Vec<QueryListEvent<T>>,
    ) {
        let changed = !execute_items_equal(&self.items_equal, self.active_item(), &next);
        if !changed && !(force && !next.is_nothing()) {
            return;
        }
        if let ActiveItemSource::Owned(current) = &mut self.active {
            *current = next.clone();
        }
        if changed {
            self.mark_viewport_check();
        }
        self.emit(QueryListEvent::ActiveItemChanged(next), events);
    }

    /// Invokes the matching callback and records the event.
    pub(super) fn emit(&mut self, event: QueryListEvent<T>, events: &mut Vec<QueryListEvent<T>>) {
        match &event {
            QueryListEvent::ActiveItemChanged(item) => {
                if let Some(callback) = self.on_active_item_change.as_mut() {
                    callback(item);
                }
            }
            QueryListEvent::ItemSelected(item) => {
                if let Some(callback) = self.on_item_select.as_mut() {
                    callback(item);
                }
            }
            QueryListEvent::QueryChanged(query) => {
                if let Some(callback) = self.on_query_change.as_mut() {
                    callback(query);
                }
            }
        }
        events.push(event);
    }

    pub(super) fn mark_viewport_check(&mut self) {
        if self.options.scroll_to_active_item {
            self.viewport_check_needed = true;
        }
    }

    fn warn_on_both_predicates(&mut self) {
        if self.predicates.item.is_some()
            && self.predicates.list.is_some()
            && !self.warned_both_predicates
        {
            tracing::warn!(
                list = self.id,
                "both item_predicate and item_list_predicate are set; item_predicate is ignored"
            );
            self.warned_both_predicates = true;
        }
    }

    fn compute_create_new_item(&self) -> Option<T> {
        let create = self.create_new_item_from_query.as_ref()?;
        if self.query.is_empty() {
            return None;
        }
        let item = create(&self.query);
        let exists = self
            .memo
            .filtered()
            .iter()
            .any(|existing| items_equal(&self.items_equal, existing, &item));
        (!exists).then_some(item)
    }

    /// Offset of the first filtered item among the rows.
    fn filtered_offset(&self) -> usize {
        match (&self.create_new_item, self.options.create_new_item_position) {
            (Some(_), CreateNewItemPosition::First) => 1,
            _ => 0,
        }
    }

    /// Number of navigable rows: filtered items plus the create row.
    pub(super) fn row_count(&self) -> usize {
        self.memo.filtered().len() + usize::from(self.create_new_item.is_some())
    }

    /// Index of the create row, when shown.
    pub(super) fn create_row_index(&self) -> Option<usize> {
        self.create_new_item.as_ref()?;
        Some(match self.options.create_new_item_position {
            CreateNewItemPosition::First => 0,
            CreateNewItemPosition::Last => self.memo.filtered().len(),
        })
    }

    /// The row at `index`, or `NoItem` past the end.
    pub(super) fn row_at(&self, index: usize) -> ActiveItem<T> {
        if self.create_row_index() == Some(index) {
            return ActiveItem::CreateNewItem;
        }
        index
            .checked_sub(self.filtered_offset())
            .and_then(|index| self.memo.filtered().get(index))
            .map_or(ActiveItem::NoItem, |item| ActiveItem::Item(item.clone()))
    }

    /// First row, or `NoItem` when nothing is rendered.
    pub(super) fn first_row(&self) -> ActiveItem<T> {
        self.row_at(0)
    }

    /// Row index of `value`, if it is rendered.
    pub(super) fn row_index_of(&self, value: &ActiveItem<T>) -> Option<usize> {
        match value {
            ActiveItem::Item(item) => self
                .memo
                .filtered()
                .iter()
                .position(|candidate| items_equal(&self.items_equal, candidate, item))
                .map(|index| index + self.filtered_offset()),
            ActiveItem::CreateNewItem => self.create_row_index(),
            ActiveItem::Unset | ActiveItem::NoItem => None,
        }
    }

    /// Row index of the active item, if it is rendered.
    pub fn active_index(&self) -> Option<usize> {
        self.row_index_of(self.active_item())
    }
}

impl<T: Item + fmt::Debug> fmt::Debug for QueryList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryList")
            .field("id", &self.id)
            .field("items", &self.items.len())
            .field("query", &self.query)
            .field("filtered", &self.memo.filtered().len())
            .field("active", &self.active)
            .field("create_new_item", &self.create_new_item)
            .field("viewport_check_needed", &self.viewport_check_needed)
            .finish_non_exhaustive()
    }
}
