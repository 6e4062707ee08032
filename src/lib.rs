#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-select/")]

//! # bubbletea-select
//!
//! Filterable, keyboard-driven item pickers for
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs) applications.
//!
//! ## Overview
//!
//! Everything is built on [`query_list::QueryList`], a controller that keeps
//! three things consistent while its inputs change:
//!
//! - the **filtered items**, computed from the items and the query by a
//!   per-item or whole-list predicate and memoized on their identity
//! - the **active item**, the keyboard-highlighted row, owned either by the
//!   list or by the caller
//! - the **scroll position** of an attached container, adjusted one frame
//!   after the active row moves
//!
//! The widgets are thin layers over it:
//!
//! | Widget | Description |
//! |--------|-------------|
//! | [`Select`] | Target that opens a filterable popover list |
//! | [`Suggest`] | Text input with a suggestion popover |
//! | [`MultiSelect`] | Tag input with a popover of candidates |
//! | [`Omnibar`] | Search overlay |
//!
//! ## Quick start
//!
//! ```rust
//! use bubbletea_select::prelude::*;
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let mut list = QueryList::builder(vec!["alpha", "beta", "gamma"])
//!     .item_predicate(|query: &str, item: &&str, _index: usize| item.contains(query))
//!     .item_renderer(DefaultItemRenderer::new())
//!     .build();
//!
//! list.set_query("a");
//! let down = KeyMsg { key: KeyCode::Down, modifiers: KeyModifiers::NONE };
//! list.handle_key(&down);
//! assert_eq!(list.active_item(), &ActiveItem::Item("beta"));
//! ```
//!
//! ## Integration with bubbletea-rs
//!
//! `QueryList` implements `bubbletea_rs::Model`. The widgets expose
//! `update(msg) -> Option<Cmd>` and `view()` so a host model can embed them
//! and forward messages:
//!
//! ```rust
//! use bubbletea_select::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//!
//! struct App {
//!     select: Select<&'static str>,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let list = QueryList::builder(vec!["small", "medium", "large"])
//!             .item_renderer(DefaultItemRenderer::new())
//!             .build();
//!         let mut select = Select::new(list).with_label("Size");
//!         let cmd = select.focus();
//!         (Self { select }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.select.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.select.view()
//!     }
//! }
//! ```

pub mod deferred;
pub mod error;
pub mod input;
pub mod key;
pub mod multi_select;
pub mod omnibar;
pub mod popover;
pub mod query_list;
pub mod select;
pub mod suggest;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// Focused components receive keyboard input; blurred ones ignore it. How a
/// widget reacts beyond that differs: [`Select`] and [`Omnibar`] close when
/// blurred, while [`Suggest`] and [`MultiSelect`] wait for a deferred focus
/// check (see [`Suggest::handle_popover_interaction`]).
///
/// ## Examples
///
/// ```rust
/// use bubbletea_select::prelude::*;
///
/// fn toggle<C: Component>(component: &mut C) {
///     if component.focused() {
///         component.blur();
///     } else {
///         let _ = component.focus();
///     }
/// }
///
/// let mut input = QueryInput::new();
/// toggle(&mut input);
/// assert!(input.focused());
/// toggle(&mut input);
/// assert!(!input.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state.
    ///
    /// May return a command for the runtime to execute.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred state.
    fn blur(&mut self);

    /// Returns the current focus state.
    fn focused(&self) -> bool;
}

pub use error::{Error, Result};
pub use input::QueryInput;
pub use key::{Binding, KeyMap};
pub use multi_select::MultiSelect;
pub use omnibar::Omnibar;
pub use popover::{PopoverKeyMap, SelectOptions};
pub use select::Select;
pub use suggest::Suggest;

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_select::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::input::QueryInput;
    pub use crate::key::{Binding, KeyMap};
    pub use crate::multi_select::MultiSelect;
    pub use crate::omnibar::Omnibar;
    pub use crate::popover::{PopoverKeyMap, SelectOptions};
    pub use crate::query_list::{
        ActiveItem, DefaultItemRenderer, DefaultListRenderer, ItemModifiers, ItemRenderer,
        ItemsEqual, ItemsParent, ListRenderer, QueryList, QueryListEvent, QueryListOptions,
    };
    pub use crate::select::Select;
    pub use crate::suggest::Suggest;
    pub use crate::Component;
}
