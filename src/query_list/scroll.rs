//! Keeping the active row inside the visible window.
//!
//! The list does not scroll on its own while inputs change. Operations that
//! may move the active row set a flag; [`QueryList::scroll_cmd`] turns the flag
//! into a command that fires one frame later, after the host has rendered the
//! new rows. Only the most recently scheduled message is honoured.

use super::model::QueryList;
use super::types::Item;
use crate::deferred;
use bubbletea_rs::{Cmd, Msg};

/// Geometry of the scrollable container that holds the rendered rows.
///
/// All values are in terminal lines. Rows are laid out after `padding_top`
/// lines, and `padding_bottom` blank lines follow the last row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemsParent {
    /// First visible line.
    pub scroll_top: usize,
    /// Number of visible lines.
    pub client_height: usize,
    /// Blank lines above the first row.
    pub padding_top: usize,
    /// Blank lines below the last row.
    pub padding_bottom: usize,
}

impl ItemsParent {
    /// A container showing `client_height` lines, scrolled to the top.
    pub fn new(client_height: usize) -> Self {
        Self {
            client_height,
            ..Self::default()
        }
    }

    /// Sets the vertical padding.
    pub fn with_padding(mut self, top: usize, bottom: usize) -> Self {
        self.padding_top = top;
        self.padding_bottom = bottom;
        self
    }

    /// Scrolls the minimum distance that makes `height` lines starting at
    /// content line `top` visible, together with the container padding.
    ///
    /// When the element does not fit, its top edge wins.
    pub fn scroll_into_view(&mut self, top: usize, height: usize) {
        let padded_top = top.saturating_sub(self.padding_top);
        let padded_bottom = top + height + self.padding_bottom;

        if padded_bottom > self.scroll_top + self.client_height {
            self.scroll_top = padded_bottom.saturating_sub(self.client_height);
        }
        if padded_top < self.scroll_top {
            self.scroll_top = padded_top;
        }
    }
}

/// Delivered one frame after a scroll check was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollIntoViewMsg {
    /// Instance id of the list that scheduled the check.
    pub id: usize,
    /// Sequence number; stale checks are ignored.
    pub tag: usize,
}

impl<T: Item> QueryList<T> {
    /// Attaches the container geometry used for scrolling and clipping.
    pub fn attach_items_parent(&mut self, parent: ItemsParent) {
        self.items_parent = Some(parent);
        self.mark_viewport_check();
    }

    /// Detaches the container; [`view`](Self::view) then renders every row.
    pub fn detach_items_parent(&mut self) {
        self.items_parent = None;
    }

    /// The attached container geometry.
    pub fn items_parent(&self) -> Option<&ItemsParent> {
        self.items_parent.as_ref()
    }

    /// Whether a scroll check is pending.
    pub fn needs_viewport_check(&self) -> bool {
        self.viewport_check_needed
    }

    /// Scrolls the attached container so the active row is visible.
    ///
    /// Does nothing without a container or an active row.
    pub fn scroll_active_item_into_view(&mut self) {
        let Some(index) = self.active_index() else {
            return;
        };
        let height = self.row_height();
        let Some(parent) = self.items_parent.as_mut() else {
            return;
        };
        let top = parent.padding_top + index * height;
        parent.scroll_into_view(top, height);
        tracing::trace!(list = self.id, index, scroll_top = parent.scroll_top, "scrolled active item into view");
    }

    /// Schedules the pending scroll check, if any, for the next frame.
    ///
    /// The command resolves to nothing once the list is dropped or torn down.
    pub fn scroll_cmd(&mut self) -> Option<Cmd> {
        if !self.viewport_check_needed {
            return None;
        }
        self.scroll_tag = self.scroll_tag.wrapping_add(1);
        let (id, tag) = (self.id, self.scroll_tag);
        Some(deferred::next_frame(self.lifetime.token(), move || {
            Box::new(ScrollIntoViewMsg { id, tag }) as Msg
        }))
    }

    /// Runs a delivered scroll check. Returns `false` for foreign or stale
    /// messages.
    pub fn handle_scroll_msg(&mut self, msg: &ScrollIntoViewMsg) -> bool {
        if msg.id != self.id || msg.tag != self.scroll_tag || !self.viewport_check_needed {
            return false;
        }
        if self.options.scroll_to_active_item {
            self.scroll_active_item_into_view();
        }
        self.viewport_check_needed = false;
        true
    }
}
