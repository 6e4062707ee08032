//! Core types for the query list.
//!
//! This module contains the value types that flow through the controller:
//! - `Item`: the blanket bound every list item satisfies
//! - `ActiveItem` and `ActiveItemSource`: the highlighted row and who owns it
//! - `ItemModifiers`: per-row render hints
//! - `QueryListEvent`: notifications emitted by mutating operations
//! - `QueryListOptions` and `CreateNewItemPosition`: serializable behaviour switches

use serde::{Deserialize, Serialize};

/// Bound satisfied by every type that can populate a query list.
///
/// Items are opaque to the controller; it only clones them into the filtered
/// list and compares them through the configured [`ItemsEqual`] comparator, whose
/// default falls back to `PartialEq`.
///
/// [`ItemsEqual`]: super::ItemsEqual
pub trait Item: Clone + PartialEq + Send + Sync + 'static {}

impl<T> Item for T where T: Clone + PartialEq + Send + Sync + 'static {}

/// The row currently highlighted for keyboard interaction.
///
/// `Unset` and `NoItem` are deliberately distinct: `Unset` means "not
/// established / uncontrolled", `NoItem` means "explicitly nothing active".
/// They never compare equal to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveItem<T> {
    /// Nothing has been established yet.
    Unset,
    /// Explicitly nothing active.
    NoItem,
    /// A concrete item.
    Item(T),
    /// The "create new item" row.
    CreateNewItem,
}

impl<T> Default for ActiveItem<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> ActiveItem<T> {
    /// Returns the concrete item, if any.
    pub fn item(&self) -> Option<&T> {
        match self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }

    /// True for `Unset` and `NoItem`.
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Unset | Self::NoItem)
    }

    /// True for `Unset`.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl<T> From<Option<T>> for ActiveItem<T> {
    fn from(item: Option<T>) -> Self {
        match item {
            Some(item) => Self::Item(item),
            None => Self::NoItem,
        }
    }
}

/// Who owns the active item. Chosen once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveItemSource<T> {
    /// The list owns the value and updates it itself.
    Owned(ActiveItem<T>),
    /// The caller owns the value; the list only reports desired changes and
    /// reads back whatever the caller feeds in.
    External(ActiveItem<T>),
}

impl<T> ActiveItemSource<T> {
    /// The current value, regardless of owner.
    pub fn current(&self) -> &ActiveItem<T> {
        match self {
            Self::Owned(item) | Self::External(item) => item,
        }
    }

    /// Whether the caller owns the value.
    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

/// Per-row render hints handed to item renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemModifiers {
    /// The row is the active item.
    pub active: bool,
    /// The row is disabled and cannot be selected.
    pub disabled: bool,
    /// The row is part of the filtered items.
    pub matches_predicate: bool,
}

/// Notifications emitted by query list operations.
///
/// Every mutating operation returns the events it produced, in the order the
/// matching callbacks were invoked.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryListEvent<T> {
    /// The active item changed (or, in controlled mode, should change).
    ActiveItemChanged(ActiveItem<T>),
    /// An item was selected by click or Enter.
    ItemSelected(T),
    /// The query text changed.
    QueryChanged(String),
}

/// Where the "create new item" row is placed relative to the filtered items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateNewItemPosition {
    /// Before the first filtered item.
    First,
    /// After the last filtered item.
    #[default]
    Last,
}

/// Behaviour switches for a query list.
///
/// All fields have defaults, so hosts can load partial option sets from
/// configuration files.
///
/// # Examples
///
/// ```
/// use bubbletea_select::query_list::QueryListOptions;
///
/// let options = QueryListOptions {
///     reset_on_select: true,
///     no_results: Some("No results.".to_string()),
///     ..QueryListOptions::default()
/// };
/// assert!(options.reset_on_query);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryListOptions {
    /// Reset the active item to the first row whenever the query changes.
    pub reset_on_query: bool,
    /// Clear the query after an item is selected.
    pub reset_on_select: bool,
    /// Keep the active row scrolled into view.
    pub scroll_to_active_item: bool,
    /// Placement of the "create new item" row.
    pub create_new_item_position: CreateNewItemPosition,
    /// Text shown by the default list renderer when nothing matches.
    pub no_results: Option<String>,
    /// Text shown by the default list renderer while the query is empty.
    pub initial_content: Option<String>,
}

impl Default for QueryListOptions {
    fn default() -> Self {
        Self {
            reset_on_query: true,
            reset_on_select: false,
            scroll_to_active_item: true,
            create_new_item_position: CreateNewItemPosition::Last,
            no_results: None,
            initial_content: None,
        }
    }
}
