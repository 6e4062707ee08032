//! Pieces shared by the popover widgets: options, keys and the deferred focus
//! check.
//!
//! Clicking into a popover briefly moves focus away from the widget's input.
//! Instead of closing immediately, [`Suggest`](crate::Suggest) and
//! [`MultiSelect`](crate::MultiSelect) schedule a [`PopoverFocusCheckMsg`] for
//! the next frame and close only if the input is still blurred when it
//! arrives.

use crate::deferred::{self, Lifetime};
use crate::key::{self, Binding};
use bubbletea_rs::{Cmd, Msg};
use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

/// Behaviour switches shared by [`Select`](crate::Select),
/// [`Suggest`](crate::Suggest) and [`MultiSelect`](crate::MultiSelect).
///
/// Widgets ignore the fields that have no meaning for them.
///
/// # Examples
///
/// ```
/// use bubbletea_select::popover::SelectOptions;
///
/// let options: SelectOptions = serde_json::from_str(r#"{ "reset_on_close": true }"#).unwrap();
/// assert!(options.reset_on_close);
/// assert!(options.close_on_select);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOptions {
    /// Show a query input and filter as the user types.
    pub filterable: bool,
    /// Clear the query whenever the popover closes.
    pub reset_on_close: bool,
    /// Close the popover after an item is selected.
    pub close_on_select: bool,
    /// Ignore all input.
    pub disabled: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            filterable: true,
            reset_on_close: false,
            close_on_select: true,
            disabled: false,
        }
    }
}

/// Keys that open and close popovers.
#[derive(Debug, Clone)]
pub struct PopoverKeyMap {
    /// Open the popover while it is closed.
    pub open: Binding,
    /// Close the popover.
    pub close: Binding,
    /// Remove the last tag of a multi-select while the query is empty.
    pub remove_tag: Binding,
}

impl Default for PopoverKeyMap {
    fn default() -> Self {
        Self {
            open: Binding::new(vec![KeyCode::Enter, KeyCode::Down]).with_help("enter/↓", "open"),
            close: Binding::new(vec![KeyCode::Esc]).with_help("esc", "close"),
            remove_tag: Binding::new(vec![KeyCode::Backspace]).with_help("backspace", "remove tag"),
        }
    }
}

impl key::KeyMap for PopoverKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.open, &self.close]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![vec![&self.open, &self.close], vec![&self.remove_tag]]
    }
}

/// Delivered one frame after a popover interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopoverFocusCheckMsg {
    /// Instance id of the widget that scheduled the check.
    pub id: usize,
    /// Sequence number; only the latest check counts.
    pub tag: usize,
}

/// Schedules and validates focus checks for one widget.
#[derive(Debug)]
pub(crate) struct FocusCheck {
    id: usize,
    tag: usize,
    lifetime: Lifetime,
}

impl FocusCheck {
    pub(crate) fn new() -> Self {
        Self {
            id: deferred::next_id(),
            tag: 0,
            lifetime: Lifetime::new(),
        }
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    /// Schedules a check for the next frame, superseding any pending one.
    pub(crate) fn schedule(&mut self) -> Cmd {
        self.tag = self.tag.wrapping_add(1);
        let (id, tag) = (self.id, self.tag);
        deferred::next_frame(self.lifetime.token(), move || {
            Box::new(PopoverFocusCheckMsg { id, tag }) as Msg
        })
    }

    /// Whether `msg` is the latest check scheduled by this widget.
    pub(crate) fn accept(&self, msg: &PopoverFocusCheckMsg) -> bool {
        msg.id == self.id && msg.tag == self.tag
    }

    pub(crate) fn teardown(&self) {
        self.lifetime.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubbletea_rs::KeyMsg;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_default_options() {
        let options = SelectOptions::default();
        assert!(options.filterable);
        assert!(options.close_on_select);
        assert!(!options.reset_on_close);
        assert!(!options.disabled);
    }

    #[test]
    fn test_keymap_defaults() {
        let keymap = PopoverKeyMap::default();
        let esc = KeyMsg {
            key: KeyCode::Esc,
            modifiers: KeyModifiers::NONE,
        };
        assert!(keymap.close.matches(&esc));
        assert!(!keymap.open.matches(&esc));
        assert_eq!(key::KeyMap::short_help(&keymap).len(), 2);
    }

    #[tokio::test]
    async fn test_only_latest_check_is_accepted() {
        let mut check = FocusCheck::new();
        let first = check.schedule();
        let second = check.schedule();

        let stale = first.await.expect("message while alive");
        let stale = stale
            .downcast_ref::<PopoverFocusCheckMsg>()
            .copied()
            .expect("focus check message");
        assert!(!check.accept(&stale));

        let latest = second.await.expect("message while alive");
        let latest = latest
            .downcast_ref::<PopoverFocusCheckMsg>()
            .copied()
            .expect("focus check message");
        assert!(check.accept(&latest));
        assert_eq!(latest.id, check.id());
    }

    #[tokio::test]
    async fn test_teardown_cancels_check() {
        let mut check = FocusCheck::new();
        let cmd = check.schedule();
        check.teardown();
        assert!(cmd.await.is_none());
    }
}
