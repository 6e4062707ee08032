//! Rendering of rows and of the whole list.
//!
//! Rendering is split in two layers. An [`ItemRenderer`] turns one item plus
//! its [`ItemModifiers`] into text. A [`ListRenderer`] arranges the rendered
//! rows, the "create new item" row and the empty states. Both layers accept
//! plain closures.

use super::equality::items_equal;
use super::model::QueryList;
use super::types::{ActiveItem, CreateNewItemPosition, Item, ItemModifiers, QueryListOptions};
use lipgloss_extras::prelude::*;
use std::fmt::Display;

/// Everything an item renderer knows about the row it renders.
#[derive(Debug, Clone, Copy)]
pub struct ItemRendererProps<'a> {
    /// Position of the item among the filtered items.
    pub index: usize,
    /// Active, disabled and match state of the row.
    pub modifiers: ItemModifiers,
    /// Current query text.
    pub query: &'a str,
}

/// Renders a single row.
///
/// Returning `None` omits the row.
pub trait ItemRenderer<T> {
    /// Renders `item`.
    fn render(&self, item: &T, props: &ItemRendererProps<'_>) -> Option<String>;

    /// Renders the "create new item" row for `query`.
    fn render_create_item(&self, query: &str, active: bool) -> Option<String> {
        let marker = if active { "> " } else { "  " };
        Some(format!("{marker}+ Create \"{query}\""))
    }

    /// Lines taken by one row.
    fn height(&self) -> usize {
        1
    }
}

impl<T, F> ItemRenderer<T> for F
where
    F: Fn(&T, &ItemRendererProps<'_>) -> Option<String>,
{
    fn render(&self, item: &T, props: &ItemRendererProps<'_>) -> Option<String> {
        self(item, props)
    }
}

/// Styles used by [`DefaultItemRenderer`].
#[derive(Debug, Clone)]
pub struct DefaultItemStyles {
    /// An enabled, inactive row.
    pub normal: Style,
    /// The active row.
    pub active: Style,
    /// A disabled row.
    pub disabled: Style,
    /// A row rendered outside the filtered items.
    pub dimmed: Style,
}

impl Default for DefaultItemStyles {
    fn default() -> Self {
        Self {
            normal: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            active: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#EE6FF8",
                Dark: "#EE6FF8",
            }),
            disabled: Style::new().faint(true).foreground(AdaptiveColor {
                Light: "#9B9B9B",
                Dark: "#5C5C5C",
            }),
            dimmed: Style::new().foreground(AdaptiveColor {
                Light: "#A49FA5",
                Dark: "#777777",
            }),
        }
    }
}

/// Renders items through their `Display` text, marking the active row with
/// `>`.
#[derive(Debug, Clone, Default)]
pub struct DefaultItemRenderer {
    /// Row styles.
    pub styles: DefaultItemStyles,
}

impl DefaultItemRenderer {
    /// Creates a renderer with default styles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the row styles.
    pub fn with_styles(mut self, styles: DefaultItemStyles) -> Self {
        self.styles = styles;
        self
    }

    fn style_for(&self, modifiers: ItemModifiers) -> &Style {
        if modifiers.disabled {
            &self.styles.disabled
        } else if modifiers.active {
            &self.styles.active
        } else if !modifiers.matches_predicate {
            &self.styles.dimmed
        } else {
            &self.styles.normal
        }
    }
}

impl<T: Display> ItemRenderer<T> for DefaultItemRenderer {
    fn render(&self, item: &T, props: &ItemRendererProps<'_>) -> Option<String> {
        let marker = if props.modifiers.active { "> " } else { "  " };
        let text = format!("{marker}{item}");
        Some(self.style_for(props.modifiers).clone().render(&text))
    }

    fn render_create_item(&self, query: &str, active: bool) -> Option<String> {
        let marker = if active { "> " } else { "  " };
        let style = if active {
            &self.styles.active
        } else {
            &self.styles.normal
        };
        Some(style.clone().render(&format!("{marker}+ Create \"{query}\"")))
    }
}

/// What a list renderer receives: read access to the list plus helpers that
/// render single rows with the configured item renderer.
///
/// Keyboard handling stays on the list itself through
/// [`QueryList::handle_key_down`] and [`QueryList::handle_key_up`].
pub struct QueryListRendererProps<'a, T: Item> {
    list: &'a QueryList<T>,
}

impl<'a, T: Item> QueryListRendererProps<'a, T> {
    pub(super) fn new(list: &'a QueryList<T>) -> Self {
        Self { list }
    }

    /// All candidate items.
    pub fn items(&self) -> &'a [T] {
        self.list.items()
    }

    /// Items matching the query, in display order.
    pub fn filtered_items(&self) -> &'a [T] {
        self.list.filtered_items()
    }

    /// Current query text.
    pub fn query(&self) -> &'a str {
        self.list.query()
    }

    /// The active item.
    pub fn active_item(&self) -> &'a ActiveItem<T> {
        self.list.active_item()
    }

    /// Behaviour switches, including the empty-state texts.
    pub fn options(&self) -> &'a QueryListOptions {
        self.list.options()
    }

    /// Renders `item` at filtered position `index`.
    pub fn render_item(&self, item: &T, index: usize) -> Option<String> {
        self.list.render_item(item, index)
    }

    /// Renders the "create new item" row, when it is shown.
    pub fn render_create_item(&self) -> Option<String> {
        self.list.render_create_item()
    }

    /// Placement of the "create new item" row.
    pub fn create_new_item_position(&self) -> CreateNewItemPosition {
        self.list.options().create_new_item_position
    }
}

/// Arranges rendered rows into the list body.
pub trait ListRenderer<T: Item> {
    /// Renders the whole list.
    fn render(&self, props: &QueryListRendererProps<'_, T>) -> String;
}

impl<T, F> ListRenderer<T> for F
where
    T: Item,
    F: Fn(&QueryListRendererProps<'_, T>) -> String,
{
    fn render(&self, props: &QueryListRendererProps<'_, T>) -> String {
        self(props)
    }
}

/// One row per line, with `initial_content` while the query is empty and
/// `no_results` when nothing is rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultListRenderer;

impl<T: Item> ListRenderer<T> for DefaultListRenderer {
    fn render(&self, props: &QueryListRendererProps<'_, T>) -> String {
        let options = props.options();
        if props.query().is_empty() {
            if let Some(initial) = &options.initial_content {
                return initial.clone();
            }
        }

        let mut rows: Vec<String> = props
            .filtered_items()
            .iter()
            .enumerate()
            .filter_map(|(index, item)| props.render_item(item, index))
            .collect();

        if let Some(create) = props.render_create_item() {
            match props.create_new_item_position() {
                CreateNewItemPosition::First => rows.insert(0, create),
                CreateNewItemPosition::Last => rows.push(create),
            }
        }

        if rows.is_empty() {
            return options.no_results.clone().unwrap_or_default();
        }
        rows.join("\n")
    }
}

impl<T: Item> QueryList<T> {
    /// Replaces the item renderer.
    pub fn set_item_renderer<R>(&mut self, renderer: R)
    where
        R: ItemRenderer<T> + Send + 'static,
    {
        self.item_renderer = Some(Box::new(renderer));
    }

    /// Replaces the list renderer.
    pub fn set_list_renderer<R>(&mut self, renderer: R)
    where
        R: ListRenderer<T> + Send + 'static,
    {
        self.list_renderer = Box::new(renderer);
    }

    /// Render hints for `item` at filtered position `index`.
    pub fn item_modifiers(&self, item: &T, index: usize) -> ItemModifiers {
        ItemModifiers {
            active: self
                .active_item()
                .item()
                .is_some_and(|active| items_equal(&self.items_equal, active, item)),
            disabled: self.item_disabled.is_disabled(item, index),
            matches_predicate: self
                .filtered_items()
                .iter()
                .any(|candidate| items_equal(&self.items_equal, candidate, item)),
        }
    }

    /// Renders one item with the configured item renderer.
    pub fn render_item(&self, item: &T, index: usize) -> Option<String> {
        let renderer = self.item_renderer.as_ref()?;
        let props = ItemRendererProps {
            index,
            modifiers: self.item_modifiers(item, index),
            query: &self.query,
        };
        renderer.render(item, &props)
    }

    /// Renders the "create new item" row, when it is shown.
    pub fn render_create_item(&self) -> Option<String> {
        self.create_new_item.as_ref()?;
        let active = matches!(self.active_item(), ActiveItem::CreateNewItem);
        self.item_renderer
            .as_ref()?
            .render_create_item(&self.query, active)
    }

    /// Lines taken by one row.
    pub(super) fn row_height(&self) -> usize {
        self.item_renderer
            .as_ref()
            .map_or(1, |renderer| renderer.height())
            .max(1)
    }

    /// Renders the list, clipped to the attached container if there is one.
    pub fn view(&self) -> String {
        let body = self.list_renderer.render(&QueryListRendererProps::new(self));
        let Some(parent) = &self.items_parent else {
            return body;
        };

        let mut lines = vec![""; parent.padding_top];
        lines.extend(body.lines());
        lines.extend(std::iter::repeat("").take(parent.padding_bottom));
        lines
            .into_iter()
            .skip(parent.scroll_top)
            .take(parent.client_height)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
