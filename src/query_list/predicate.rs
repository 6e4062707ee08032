//! Predicate evaluation: turning `(query, items)` into the filtered items.
//!
//! Two mutually exclusive strategies exist:
//! - a whole-list predicate `(query, items) -> items'`, trusted verbatim and
//!   free to reorder, add or drop items;
//! - a per-item predicate `(query, item, index) -> bool`, called once per item
//!   in order, keeping the stable subsequence of matches.
//!
//! The whole-list predicate wins when both are supplied. With neither, the
//! items pass through unchanged.
//!
//! [`FilterMemo`] caches the last result keyed on the item set allocation,
//! the query text and the predicate allocations, so unrelated updates never
//! re-run an O(n) filter.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::fmt;
use std::sync::Arc;

/// Per-item predicate: `(query, item, index) -> keep`.
pub type ItemPredicate<T> = Arc<dyn Fn(&str, &T, usize) -> bool + Send + Sync>;

/// Whole-list predicate: `(query, items) -> filtered items`.
pub type ItemListPredicate<T> = Arc<dyn Fn(&str, &[T]) -> Vec<T> + Send + Sync>;

/// Which strategy produced the filtered items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStrategy {
    /// The whole-list predicate ran.
    WholeList,
    /// The per-item predicate ran.
    PerItem,
    /// No predicate; items passed through.
    Passthrough,
}

/// The predicates a list was configured with.
pub struct Predicates<T> {
    /// Per-item predicate, ignored while `list` is set.
    pub item: Option<ItemPredicate<T>>,
    /// Whole-list predicate.
    pub list: Option<ItemListPredicate<T>>,
}

impl<T> Predicates<T> {
    /// The strategy these predicates select.
    pub fn strategy(&self) -> FilterStrategy {
        if self.list.is_some() {
            FilterStrategy::WholeList
        } else if self.item.is_some() {
            FilterStrategy::PerItem
        } else {
            FilterStrategy::Passthrough
        }
    }
}

impl<T> Default for Predicates<T> {
    fn default() -> Self {
        Self {
            item: None,
            list: None,
        }
    }
}

impl<T> Clone for Predicates<T> {
    fn clone(&self) -> Self {
        Self {
            item: self.item.clone(),
            list: self.list.clone(),
        }
    }
}

impl<T> fmt::Debug for Predicates<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicates")
            .field("item", &self.item.is_some())
            .field("list", &self.list.is_some())
            .finish()
    }
}

/// Runs the configured strategy over `items`.
pub fn filter_items<T: Clone>(query: &str, items: &[T], predicates: &Predicates<T>) -> Vec<T> {
    if let Some(list) = &predicates.list {
        return list(query, items);
    }
    if let Some(predicate) = &predicates.item {
        return items
            .iter()
            .enumerate()
            .filter(|(index, item)| predicate(query, item, *index))
            .map(|(_, item)| item.clone())
            .collect();
    }
    items.to_vec()
}

fn same_arc<U: ?Sized>(a: &Arc<U>, b: &Arc<U>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn same_optional_arc<U: ?Sized>(a: &Option<Arc<U>>, b: &Option<Arc<U>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_arc(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Inputs that invalidate the filtered items.
///
/// Holding clones of the `Arc`s keeps their allocations alive, so a pointer
/// match really means "same value as last time".
struct FilterKey<T> {
    items: Arc<[T]>,
    query: String,
    predicates: Predicates<T>,
}

impl<T> FilterKey<T> {
    fn matches(&self, items: &Arc<[T]>, query: &str, predicates: &Predicates<T>) -> bool {
        same_arc(&self.items, items)
            && self.query == query
            && same_optional_arc(&self.predicates.item, &predicates.item)
            && same_optional_arc(&self.predicates.list, &predicates.list)
    }
}

/// Cached filter result keyed on its recomputation triggers.
pub struct FilterMemo<T> {
    key: Option<FilterKey<T>>,
    filtered: Vec<T>,
}

impl<T: Clone> FilterMemo<T> {
    /// Creates an empty memo; the first [`refresh`](Self::refresh) always computes.
    pub fn new() -> Self {
        Self {
            key: None,
            filtered: Vec::new(),
        }
    }

    /// Recomputes the filtered items if any trigger changed.
    ///
    /// Returns `true` when a recomputation happened.
    pub fn refresh(&mut self, items: &Arc<[T]>, query: &str, predicates: &Predicates<T>) -> bool {
        if let Some(key) = &self.key {
            if key.matches(items, query, predicates) {
                return false;
            }
        }

        self.filtered = filter_items(query, items, predicates);
        tracing::trace!(
            strategy = ?predicates.strategy(),
            items = items.len(),
            matches = self.filtered.len(),
            "recomputed filtered items"
        );
        self.key = Some(FilterKey {
            items: Arc::clone(items),
            query: query.to_string(),
            predicates: predicates.clone(),
        });
        true
    }

    /// The last computed filtered items.
    pub fn filtered(&self) -> &[T] {
        &self.filtered
    }
}

impl<T: Clone> Default for FilterMemo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FilterMemo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterMemo")
            .field("cached", &self.key.is_some())
            .field("filtered", &self.filtered.len())
            .finish()
    }
}

/// Disabled-item test.
pub enum ItemDisabled<T> {
    /// Nothing is disabled.
    Never,
    /// A boolean projection of the item, built with [`ItemDisabled::by_key`].
    Key(Arc<dyn Fn(&T) -> bool + Send + Sync>),
    /// A function of the item and its index.
    Predicate(Arc<dyn Fn(&T, usize) -> bool + Send + Sync>),
}

impl<T> ItemDisabled<T> {
    /// Disables items whose projected flag is true.
    pub fn by_key<F>(key: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::Key(Arc::new(key))
    }

    /// Disables items for which `predicate(item, index)` is true.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&T, usize) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Evaluates the test for one item.
    pub fn is_disabled(&self, item: &T, index: usize) -> bool {
        match self {
            Self::Never => false,
            Self::Key(key) => key(item),
            Self::Predicate(predicate) => predicate(item, index),
        }
    }
}

impl<T> Default for ItemDisabled<T> {
    fn default() -> Self {
        Self::Never
    }
}

impl<T> Clone for ItemDisabled<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Never => Self::Never,
            Self::Key(key) => Self::Key(Arc::clone(key)),
            Self::Predicate(predicate) => Self::Predicate(Arc::clone(predicate)),
        }
    }
}

impl<T> fmt::Debug for ItemDisabled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("Never"),
            Self::Key(_) => f.write_str("Key(..)"),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Per-item fuzzy predicate over the text returned by `text`.
///
/// An empty query keeps every item.
pub fn fuzzy_item_predicate<T, F>(text: F) -> ItemPredicate<T>
where
    T: 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    let matcher = SkimMatcherV2::default();
    Arc::new(move |query: &str, item: &T, _index: usize| {
        query.is_empty() || matcher.fuzzy_match(&text(item), query).is_some()
    })
}

/// Whole-list fuzzy predicate that orders matches by descending score.
///
/// Items with equal scores keep their original relative order. An empty
/// query returns the items unchanged.
pub fn fuzzy_list_predicate<T, F>(text: F) -> ItemListPredicate<T>
where
    T: Clone + 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    let matcher = SkimMatcherV2::default();
    Arc::new(move |query: &str, items: &[T]| {
        if query.is_empty() {
            return items.to_vec();
        }
        let mut scored: Vec<(i64, &T)> = items
            .iter()
            .filter_map(|item| {
                matcher
                    .fuzzy_match(&text(item), query)
                    .map(|score| (score, item))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, item)| item.clone()).collect()
    })
}
