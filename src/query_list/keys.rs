//! Key bindings for query list navigation and selection.
//!
//! ## Navigation Keys
//!
//! - **Previous item**: `↑`
//! - **Next item**: `↓`
//! - **Select active item**: `enter`, on key-up
//!
//! Letter keys are left unbound so they can reach the query input.
//!
//! ## Example
//!
//! ```rust
//! use bubbletea_select::query_list::QueryListKeyMap;
//! use bubbletea_select::key::KeyMap;
//!
//! let keymap = QueryListKeyMap::default();
//! assert_eq!(keymap.short_help().len(), 3);
//! ```

use crate::key;
use crossterm::event::KeyCode;

/// Key bindings for moving the active item and selecting it.
#[derive(Debug, Clone)]
pub struct QueryListKeyMap {
    /// Move the active item up one row.
    pub previous: key::Binding,
    /// Move the active item down one row.
    pub next: key::Binding,
    /// Select the active item.
    pub select: key::Binding,
}

impl Default for QueryListKeyMap {
    fn default() -> Self {
        Self {
            previous: key::Binding::new(vec![KeyCode::Up]).with_help("↑", "previous"),
            next: key::Binding::new(vec![KeyCode::Down]).with_help("↓", "next"),
            select: key::Binding::new(vec![KeyCode::Enter]).with_help("enter", "select"),
        }
    }
}

impl key::KeyMap for QueryListKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.previous, &self.next, &self.select]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.previous, &self.next], vec![&self.select]]
    }
}
