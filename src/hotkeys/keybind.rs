//! Keybinding dispatch
//!
//! Wraps user callbacks so that they never fire for auto-repeat, for keys
//! typed into text fields, or for events the rich-text editor already
//! consumed. Backspace is always swallowed.

use crate::errors::{BuddyError, Result};
use std::collections::HashMap;
use std::fmt;

/// Host platform, decides what `$mod` means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// A parsed key combination such as `$mod+Shift+O`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    /// Lowercased key name
    pub key: String,
}

impl KeyCombo {
    pub fn parse(text: &str, platform: Platform) -> Result<Self> {
        let (prefix, key) = match text.strip_suffix("++") {
            Some(prefix) => (prefix, "+"),
            None => text.rsplit_once('+').unwrap_or(("", text)),
        };

        if key.is_empty() {
            return Err(BuddyError::InvalidShortcut(text.to_string()));
        }

        let mut modifiers = Modifiers::default();
        for name in prefix.split('+').filter(|part| !part.is_empty()) {
            match name.to_ascii_lowercase().as_str() {
                "$mod" => match platform {
                    Platform::MacOs => modifiers.meta = true,
                    Platform::Windows | Platform::Linux => modifiers.ctrl = true,
                },
                "shift" => modifiers.shift = true,
                "control" | "ctrl" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "meta" | "cmd" | "command" => modifiers.meta = true,
                _ => return Err(BuddyError::InvalidShortcut(text.to_string())),
            }
        }

        Ok(Self {
            modifiers,
            key: key.to_lowercase(),
        })
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (on, name) in [(m.ctrl, "Ctrl"), (m.alt, "Alt"), (m.shift, "Shift"), (m.meta, "Meta")] {
            if on {
                write!(f, "{}+", name)?;
            }
        }
        f.write_str(&self.key)
    }
}

/// Element that had focus when the key was pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventTarget {
    Input,
    TextArea,
    #[default]
    Other,
}

/// A key press as delivered by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
    pub repeat: bool,
    pub target: EventTarget,
    /// Already consumed by the rich-text editor
    pub editor_handled: bool,
    pub default_prevented: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            ..Default::default()
        }
    }

    pub fn combo(&self) -> KeyCombo {
        KeyCombo {
            modifiers: self.modifiers,
            key: self.key.to_lowercase(),
        }
    }

    fn is_suppressed(&self) -> bool {
        self.repeat
            || matches!(self.target, EventTarget::Input | EventTarget::TextArea)
            || self.editor_handled
    }
}

pub type KeyHandler = Box<dyn FnMut(&KeyEvent) + Send>;

enum Binding {
    Ignore,
    Guarded(KeyHandler),
}

/// Dispatches key events to registered callbacks
pub struct Keybindings {
    bindings: HashMap<KeyCombo, Binding>,
}

impl Keybindings {
    /// Register `definitions` (combo text, callback)
    pub fn create<'a, I>(definitions: I, platform: Platform) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, KeyHandler)>,
    {
        let mut bindings = HashMap::new();
        bindings.insert(KeyCombo::parse("Backspace", platform)?, Binding::Ignore);

        for (combo, handler) in definitions {
            bindings.insert(KeyCombo::parse(combo, platform)?, Binding::Guarded(handler));
        }

        Ok(Self { bindings })
    }

    /// Dispatch one event; returns true if a callback ran
    pub fn handle(&mut self, event: &mut KeyEvent) -> bool {
        let Some(binding) = self.bindings.get_mut(&event.combo()) else {
            return false;
        };

        match binding {
            Binding::Ignore => false,
            Binding::Guarded(handler) => {
                if event.is_suppressed() {
                    return false;
                }
                event.default_prevented = true;
                handler(event);
                true
            }
        }
    }

    pub fn is_bound(&self, combo: &KeyCombo) -> bool {
        self.bindings.contains_key(combo)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
