//! A full-width search overlay.
//!
//! The omnibar renders nothing while closed. While open it shows a focused
//! query input above the list. Selection is reported through the list's
//! events and callbacks; the host decides whether to close afterwards.

use crate::input::QueryInput;
use crate::popover::PopoverKeyMap;
use crate::query_list::{Item, QueryList, QueryListEvent, ScrollIntoViewMsg};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};

/// Called when the omnibar closes itself.
pub type CloseFn = Box<dyn FnMut() + Send>;

/// A searchable overlay over a [`QueryList`].
///
/// # Examples
///
/// ```rust
/// use bubbletea_select::query_list::{QueryList, QueryListEvent, QueryListOptions};
/// use bubbletea_select::Omnibar;
/// use bubbletea_rs::KeyMsg;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let list = QueryList::builder(vec!["open file", "close tab", "quit"])
///     .item_predicate(|query: &str, cmd: &&str, _index: usize| cmd.contains(query))
///     .options(QueryListOptions { reset_on_select: true, ..QueryListOptions::default() })
///     .build();
/// let mut omnibar = Omnibar::new(list);
/// omnibar.open();
///
/// let press = |code| KeyMsg { key: code, modifiers: KeyModifiers::NONE };
/// omnibar.handle_key(&press(KeyCode::Char('q')));
/// let events = omnibar.handle_key(&press(KeyCode::Enter));
///
/// assert!(events.contains(&QueryListEvent::ItemSelected("quit")));
/// assert_eq!(omnibar.list().query(), "");
/// ```
pub struct Omnibar<T: Item> {
    list: QueryList<T>,
    input: QueryInput,
    /// Close key. Only `close` is used.
    pub keymap: PopoverKeyMap,
    is_open: bool,
    on_close: Option<CloseFn>,
}

impl<T: Item> Omnibar<T> {
    /// Wraps `list` in a closed omnibar.
    pub fn new(list: QueryList<T>) -> Self {
        Self {
            list,
            input: QueryInput::new().with_placeholder("Search..."),
            keymap: PopoverKeyMap::default(),
            is_open: false,
            on_close: None,
        }
    }

    /// Registers the close callback.
    pub fn on_close<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Replaces the query input.
    pub fn with_input(mut self, input: QueryInput) -> Self {
        self.input = input;
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

    /// Whether the overlay is shown.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Shows the overlay and focuses its input.
    pub fn open(&mut self) {
        self.is_open = true;
        self.input.focus();
    }

    /// Hides the overlay and invokes the close callback.
    pub fn close(&mut self) {
        if !self.is_open {
            return;
        }
        self.is_open = false;
        self.input.blur();
        if let Some(callback) = self.on_close.as_mut() {
            callback();
        }
    }

    /// Handles one key press and returns the list events it caused.
    ///
    /// Keys are ignored while the overlay is closed.
    pub fn handle_key(&mut self, key_msg: &KeyMsg) -> Vec<QueryListEvent<T>> {
        if !self.is_open {
            return Vec::new();
        }
        if self.keymap.close.matches(key_msg) {
            self.close();
            return Vec::new();
        }

        let events = if self.list.handles_key(key_msg) {
            self.list.handle_key(key_msg)
        } else if self.input.update(key_msg) {
            self.list.set_query(self.input.value().to_string())
        } else {
            Vec::new()
        };
        if self.input.value() != self.list.query() {
            self.input.set_value(self.list.query());
        }
        events
    }

    /// Routes key presses and the list's scroll checks.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(scroll_msg) = msg.downcast_ref::<ScrollIntoViewMsg>() {
            self.list.handle_scroll_msg(scroll_msg);
            return None;
        }
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            self.handle_key(key_msg);
        }
        self.list.scroll_cmd()
    }

    /// Renders the input and the list, or nothing while closed.
    pub fn view(&self) -> String {
        if !self.is_open {
            return String::new();
        }
        let body = self.list.view();
        if body.is_empty() {
            self.input.view()
        } else {
            format!("{}\n{}", self.input.view(), body)
        }
    }
}

impl<T: Item> Component for Omnibar<T> {
    /// Focusing opens the overlay.
    fn focus(&mut self) -> Option<Cmd> {
        self.open();
        None
    }

    /// Blurring closes the overlay.
    fn blur(&mut self) {
        self.close();
    }

    fn focused(&self) -> bool {
        self.is_open && self.input.focused()
    }
}
