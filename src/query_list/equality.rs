//! Item equality used to keep the active item stable across re-filtering.

use super::types::ActiveItem;
use std::fmt;
use std::sync::Arc;

/// Binary comparator over two present items.
pub type CompareFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// How two items are judged "the same".
///
/// `Identity` uses `PartialEq` on the items themselves. Everything else is a
/// `Comparator`, either built from a projected key with
/// [`ItemsEqual::by_key`] or from an arbitrary function with
/// [`ItemsEqual::comparator`].
///
/// Comparators are only ever called with two present items; see
/// [`execute_items_equal`].
pub enum ItemsEqual<T> {
    /// Compare the items directly.
    Identity,
    /// Compare with a function of two items.
    Comparator(CompareFn<T>),
}

impl<T> ItemsEqual<T> {
    /// Compares items by the key returned from `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bubbletea_select::query_list::{execute_items_equal, ActiveItem, ItemsEqual};
    ///
    /// #[derive(Clone, PartialEq)]
    /// struct Film { id: u32, title: String }
    ///
    /// let equal = ItemsEqual::by_key(|film: &Film| film.id);
    /// let a = ActiveItem::Item(Film { id: 1, title: "Alien".into() });
    /// let b = ActiveItem::Item(Film { id: 1, title: "Aliens".into() });
    /// assert!(execute_items_equal(&equal, &a, &b));
    /// ```
    pub fn by_key<K, F>(key: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
        K: PartialEq + 'static,
    {
        Self::Comparator(Arc::new(move |a: &T, b: &T| key(a) == key(b)))
    }

    /// Compares items with `compare`.
    pub fn comparator<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self::Comparator(Arc::new(compare))
    }
}

impl<T> Default for ItemsEqual<T> {
    fn default() -> Self {
        Self::Identity
    }
}

impl<T> Clone for ItemsEqual<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Identity => Self::Identity,
            Self::Comparator(f) => Self::Comparator(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for ItemsEqual<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::Comparator(_) => f.write_str("Comparator(..)"),
        }
    }
}

/// Decides whether two active-item values refer to the same item.
///
/// When either side is not a concrete item, the two values are compared by
/// variant alone, so `NoItem == NoItem` but `NoItem != Unset`. Key and
/// comparator functions are never invoked with a missing operand.
pub fn execute_items_equal<T: PartialEq>(
    equal: &ItemsEqual<T>,
    a: &ActiveItem<T>,
    b: &ActiveItem<T>,
) -> bool {
    match (a, b) {
        (ActiveItem::Item(a), ActiveItem::Item(b)) => items_equal(equal, a, b),
        (ActiveItem::Item(_), _) | (_, ActiveItem::Item(_)) => false,
        (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
    }
}

/// Compares two present items under `equal`.
pub(crate) fn items_equal<T: PartialEq>(equal: &ItemsEqual<T>, a: &T, b: &T) -> bool {
    match equal {
        ItemsEqual::Identity => a == b,
        ItemsEqual::Comparator(compare) => compare(a, b),
    }
}
