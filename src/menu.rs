//! Application menu model
//!
//! Describes the native menu bar, maps menu item ids to the actions the
//! frontend understands, and carries them out through [`MenuEffects`].
//! Most items re-emit a shortcut on [`SHORTCUT_EVENT`], so menu and keyboard
//! reach the same handlers.

use crate::errors::{BuddyError, Result};
use crate::hotkeys::Platform;

/// Event channel for shortcut actions raised from the menu
pub const SHORTCUT_EVENT: &str = "menu://shortcut";

/// What selecting a menu item does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Undo,
    Redo,
    /// Emit the named shortcut on [`SHORTCUT_EVENT`]
    Shortcut(&'static str),
    ToggleDevtools,
    OpenLogsFolder,
    OpenConfigFolder,
    OpenUrl(&'static str),
    Unhandled,
}

/// Map a menu item id to its action
pub fn resolve_menu_event(id: &str) -> MenuAction {
    match id {
        "edit/undo" => MenuAction::Undo,
        "edit/redo" => MenuAction::Redo,
        "file/add-local-repo" => MenuAction::Shortcut("add-local-repo"),
        "file/clone-repo" => MenuAction::Shortcut("clone-repo"),
        "file/create-branch" => MenuAction::Shortcut("create-branch"),
        "file/create-dependent-branch" => MenuAction::Shortcut("create-dependent-branch"),
        "view/devtools" => MenuAction::ToggleDevtools,
        "view/switch-theme" => MenuAction::Shortcut("switch-theme"),
        "view/toggle-sidebar" => MenuAction::Shortcut("toggle-sidebar"),
        "view/reload" => MenuAction::Shortcut("reload"),
        "view/zoom-in" => MenuAction::Shortcut("zoom-in"),
        "view/zoom-out" => MenuAction::Shortcut("zoom-out"),
        "view/zoom-reset" => MenuAction::Shortcut("zoom-reset"),
        "help/share-debug-info" => MenuAction::Shortcut("share-debug-info"),
        "project/history" => MenuAction::Shortcut("history"),
        "project/open-in-vscode" => MenuAction::Shortcut("open-in-vscode"),
        "project/show-in-finder" => MenuAction::Shortcut("show-in-finder"),
        "project/settings" => MenuAction::Shortcut("project-settings"),
        "global/settings" => MenuAction::Shortcut("global-settings"),
        "global/update" => MenuAction::Shortcut("update"),
        "help/open-logs-folder" => MenuAction::OpenLogsFolder,
        "help/open-config-folder" => MenuAction::OpenConfigFolder,
        "help/documentation" => MenuAction::OpenUrl("https://docs.gitbutler.com"),
        "help/debugging-guide" => {
            MenuAction::OpenUrl("https://docs.gitbutler.com/development/debugging")
        }
        "help/github" => MenuAction::OpenUrl("https://github.com/gitbutlerapp/gitbutler"),
        "help/release-notes" => {
            MenuAction::OpenUrl("https://github.com/gitbutlerapp/gitbutler/releases")
        }
        "help/report-issue" => {
            MenuAction::OpenUrl("https://github.com/gitbutlerapp/gitbutler/issues/new/choose")
        }
        "help/discord" => MenuAction::OpenUrl("https://discord.com/invite/MmFkmaJ42D"),
        "help/youtube" => MenuAction::OpenUrl("https://www.youtube.com/@gitbutlerapp"),
        "help/bluesky" => MenuAction::OpenUrl("https://bsky.app/profile/gitbutler.com"),
        "help/x" => MenuAction::OpenUrl("https://x.com/gitbutler"),
        _ => MenuAction::Unhandled,
    }
}

/// Convert registry keys (`$mod+O`) to a native accelerator (`CmdOrCtrl+O`)
pub fn accelerator_from_keys(keys: &str) -> String {
    keys.replace("$mod", "CmdOrCtrl")
}

/// Items the platform provides itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedItem {
    About,
    Services,
    Hide,
    HideOthers,
    ShowAll,
    Quit,
    CloseWindow,
    Cut,
    Copy,
    Paste,
    Fullscreen,
    Minimize,
    Maximize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: &'static str,
    pub label: String,
    pub accelerator: Option<&'static str>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    Predefined(PredefinedItem),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submenu {
    pub title: String,
    pub entries: Vec<MenuEntry>,
}

/// Build-time switches for the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOptions {
    pub undo: bool,
    pub auto_updates: bool,
    pub devtools: bool,
    pub app_name: String,
    pub version: String,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            undo: false,
            auto_updates: true,
            devtools: cfg!(debug_assertions),
            app_name: "stackbuddy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

fn item(id: &'static str, label: &str, accelerator: Option<&'static str>) -> MenuEntry {
    MenuEntry::Item(MenuItem {
        id,
        label: label.to_string(),
        accelerator,
        enabled: true,
    })
}

/// The full menu bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub submenus: Vec<Submenu>,
}

impl Menu {
    pub fn build(platform: Platform, options: &MenuOptions) -> Self {
        let mac = platform == Platform::MacOs;
        let linux = platform == Platform::Linux;
        let mut submenus = Vec::new();

        if mac {
            let mut entries = vec![
                MenuEntry::Predefined(PredefinedItem::About),
                MenuEntry::Separator,
                item("global/settings", "Settings", Some("CmdOrCtrl+,")),
            ];
            if options.auto_updates {
                entries.push(item("global/update", "Check for updates…", None));
            }
            entries.extend([
                MenuEntry::Separator,
                MenuEntry::Predefined(PredefinedItem::Services),
                MenuEntry::Separator,
                MenuEntry::Predefined(PredefinedItem::Hide),
                MenuEntry::Predefined(PredefinedItem::HideOthers),
                MenuEntry::Predefined(PredefinedItem::ShowAll),
                MenuEntry::Separator,
                MenuEntry::Predefined(PredefinedItem::Quit),
            ]);
            submenus.push(Submenu {
                title: options.app_name.clone(),
                entries,
            });
        }

        let mut file = vec![
            item("file/add-local-repo", "Add local repository…", Some("CmdOrCtrl+O")),
            item("file/clone-repo", "Clone repository…", Some("CmdOrCtrl+Shift+O")),
            MenuEntry::Separator,
            item("file/create-branch", "Create branch…", Some("CmdOrCtrl+B")),
            item(
                "file/create-dependent-branch",
                "Create dependent branch…",
                Some("CmdOrCtrl+Shift+B"),
            ),
            MenuEntry::Separator,
        ];
        if mac {
            file.push(MenuEntry::Predefined(PredefinedItem::CloseWindow));
        } else {
            file.push(MenuEntry::Predefined(PredefinedItem::Quit));
            if options.auto_updates {
                file.push(item("global/update", "Check for updates…", None));
            }
        }
        submenus.push(Submenu {
            title: "File".to_string(),
            entries: file,
        });

        if !linux {
            let mut edit = Vec::new();
            // Undo/redo only exists on macOS for now
            if options.undo && mac {
                edit.extend([
                    item("edit/undo", "Undo", Some("CmdOrCtrl+Z")),
                    item("edit/redo", "Redo", Some("CmdOrCtrl+Shift+Z")),
                    MenuEntry::Separator,
                ]);
            }
            edit.extend([
                MenuEntry::Predefined(PredefinedItem::Cut),
                MenuEntry::Predefined(PredefinedItem::Copy),
                MenuEntry::Predefined(PredefinedItem::Paste),
            ]);
            submenus.push(Submenu {
                title: "Edit".to_string(),
                entries: edit,
            });
        }

        let mut view = Vec::new();
        if mac {
            view.push(MenuEntry::Predefined(PredefinedItem::Fullscreen));
        }
        view.extend([
            item("view/switch-theme", "Switch theme", Some("CmdOrCtrl+T")),
            item("view/toggle-sidebar", "Toggle unassigned panel", Some("CmdOrCtrl+\\")),
            MenuEntry::Separator,
            item("view/zoom-in", "Zoom in", Some("CmdOrCtrl+=")),
            item("view/zoom-out", "Zoom out", Some("CmdOrCtrl+-")),
            item("view/zoom-reset", "Reset zoom", Some("CmdOrCtrl+0")),
            MenuEntry::Separator,
        ]);
        if options.devtools {
            view.extend([
                item("view/devtools", "Developer tools", Some("CmdOrCtrl+Shift+C")),
                item("view/reload", "Reload view", Some("CmdOrCtrl+R")),
            ]);
        }
        submenus.push(Submenu {
            title: "View".to_string(),
            entries: view,
        });

        let finder_label = match platform {
            Platform::MacOs => "Show in Finder",
            Platform::Windows => "Show in Explorer",
            Platform::Linux => "Show in File Manager",
        };
        submenus.push(Submenu {
            title: "Project".to_string(),
            entries: vec![
                item("project/history", "Operations history", Some("CmdOrCtrl+Shift+H")),
                MenuEntry::Separator,
                item("project/open-in-vscode", "Open in editor", None),
                item("project/show-in-finder", finder_label, None),
                MenuEntry::Separator,
                item("project/settings", "Project settings", None),
            ],
        });

        if mac {
            submenus.push(Submenu {
                title: "Window".to_string(),
                entries: vec![
                    MenuEntry::Predefined(PredefinedItem::Minimize),
                    MenuEntry::Predefined(PredefinedItem::Maximize),
                    MenuEntry::Separator,
                    MenuEntry::Predefined(PredefinedItem::CloseWindow),
                ],
            });
        }

        let mut help = vec![
            item("help/documentation", "Documentation", None),
            item("help/debugging-guide", "Debugging guide", None),
            item("help/github", "Source code", None),
            item("help/release-notes", "Release notes", None),
            MenuEntry::Separator,
            item("help/share-debug-info", "Share debug info…", None),
            item("help/report-issue", "Report an issue", None),
            MenuEntry::Separator,
            item("help/open-logs-folder", "Open logs folder", None),
            item("help/open-config-folder", "Open config folder", None),
            MenuEntry::Separator,
            item("help/discord", "Discord", None),
            item("help/youtube", "YouTube", None),
            item("help/bluesky", "Bluesky", None),
            item("help/x", "X", None),
            MenuEntry::Separator,
        ];
        help.push(MenuEntry::Item(MenuItem {
            id: "help/version",
            label: format!("Version {}", options.version),
            accelerator: None,
            enabled: false,
        }));
        submenus.push(Submenu {
            title: "Help".to_string(),
            entries: help,
        });

        Self { submenus }
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.submenus.iter().flat_map(|submenu| {
            submenu.entries.iter().filter_map(|entry| match entry {
                MenuEntry::Item(item) => Some(item),
                _ => None,
            })
        })
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items().find(|item| item.id == id)
    }

    /// Enable or disable every item with `id`
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<()> {
        let mut found = false;
        for submenu in &mut self.submenus {
            for entry in &mut submenu.entries {
                if let MenuEntry::Item(item) = entry {
                    if item.id == id {
                        item.enabled = enabled;
                        found = true;
                    }
                }
            }
        }

        if found {
            Ok(())
        } else {
            Err(BuddyError::MenuItemNotFound(id.to_string()))
        }
    }
}

/// Side effects a menu action can trigger
pub trait MenuEffects {
    fn emit(&self, event: &str, payload: &str) -> Result<()>;
    fn open_url(&self, url: &str) -> Result<()>;
    fn open_logs_folder(&self) -> Result<()>;
    fn open_config_folder(&self) -> Result<()>;
    fn toggle_devtools(&self);
}

/// Carries out menu events; failures are logged, never returned
pub struct MenuDispatcher<E: MenuEffects> {
    effects: E,
}

impl<E: MenuEffects> MenuDispatcher<E> {
    pub fn new(effects: E) -> Self {
        Self { effects }
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Handle one menu event and return the action taken
    pub fn handle_event(&self, id: &str) -> MenuAction {
        let action = resolve_menu_event(id);

        match action {
            MenuAction::Undo | MenuAction::Redo => {
                tracing::info!(id, "undo queue handles this menu item");
            }
            MenuAction::Shortcut(shortcut) => {
                if let Err(e) = self.effects.emit(SHORTCUT_EVENT, shortcut) {
                    tracing::error!(error = %e, "failed to emit event");
                }
            }
            MenuAction::ToggleDevtools => self.effects.toggle_devtools(),
            MenuAction::OpenLogsFolder => {
                if let Err(e) = self.effects.open_logs_folder() {
                    tracing::error!(error = %e, "failed to open logs folder");
                }
            }
            MenuAction::OpenConfigFolder => {
                if let Err(e) = self.effects.open_config_folder() {
                    tracing::error!(error = %e, "failed to open config folder");
                }
            }
            MenuAction::OpenUrl(url) => {
                if let Err(e) = self.effects.open_url(url) {
                    tracing::error!(error = %e, "failed to open url for {}", id);
                }
            }
            MenuAction::Unhandled => {
                tracing::error!("unhandled menu event: {}", id);
            }
        }

        action
    }
}
