//! Keyboard shortcuts
//!
//! A static registry of documented shortcuts plus the keybinding handler
//! that guards callbacks against repeats and text-field input.

pub mod keybind;
pub mod registry;

pub use keybind::{EventTarget, KeyCombo, KeyEvent, KeyHandler, Keybindings, Modifiers, Platform};
pub use registry::{all_shortcuts, find_shortcut, shortcut_groups, Shortcut, ShortcutGroup, SHORTCUTS};
