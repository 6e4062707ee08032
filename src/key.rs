//! Key bindings shared by the query list and the select widgets.
//!
//! A [`Binding`] groups the key codes that trigger one action together with
//! the short help text shown for it. Components expose their bindings through
//! the [`KeyMap`] trait so hosts can render contextual help.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A set of keys bound to one action, plus help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Key codes that trigger the action.
    pub keys: Vec<KeyCode>,
    /// Modifiers that must be held. `KeyModifiers::NONE` accepts any state
    /// except Control and Alt.
    pub modifiers: KeyModifiers,
    /// Short key label, e.g. `"↑"`.
    pub help: String,
    /// What the binding does, e.g. `"previous item"`.
    pub description: String,
    /// Disabled bindings never match and are left out of help.
    pub enabled: bool,
}

impl Binding {
    /// Creates an enabled binding for the given key codes.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            modifiers: KeyModifiers::NONE,
            help: String::new(),
            description: String::new(),
            enabled: true,
        }
    }

    /// Sets the help label and description.
    pub fn with_help(mut self, help: impl Into<String>, description: impl Into<String>) -> Self {
        self.help = help.into();
        self.description = description.into();
        self
    }

    /// Requires the given modifiers to be held.
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Reports whether a key message triggers this binding.
    pub fn matches(&self, key_msg: &KeyMsg) -> bool {
        if !self.enabled || !self.keys.contains(&key_msg.key) {
            return false;
        }
        if self.modifiers.is_empty() {
            !key_msg
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        } else {
            key_msg.modifiers.contains(self.modifiers)
        }
    }
}

/// Components that can describe their key bindings for help views.
pub trait KeyMap {
    /// Bindings worth showing in a one-line help view.
    fn short_help(&self) -> Vec<&Binding>;

    /// All bindings, grouped into columns.
    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![self.short_help()]
    }
}

/// Reports whether a key message triggers any binding in `bindings`.
pub fn matches(key_msg: &KeyMsg, bindings: &[&Binding]) -> bool {
    bindings.iter().any(|binding| binding.matches(key_msg))
}
