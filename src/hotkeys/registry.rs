//! Application-wide shortcut table
//!
//! `$mod` stands for Cmd on macOS and Ctrl elsewhere.

/// One documented keyboard shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub id: &'static str,
    pub title: &'static str,
    pub keys: &'static str,
    pub description: Option<&'static str>,
}

/// Shortcuts shown together under one heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutGroup {
    pub name: &'static str,
    pub shortcuts: &'static [Shortcut],
}

const fn shortcut(id: &'static str, title: &'static str, keys: &'static str) -> Shortcut {
    Shortcut {
        id,
        title,
        keys,
        description: None,
    }
}

pub static SHORTCUTS: &[ShortcutGroup] = &[
    ShortcutGroup {
        name: "global",
        shortcuts: &[
            shortcut("open_repository", "Add local repository…", "$mod+O"),
            shortcut("clone_repository", "Clone a repository", "$mod+Shift+O"),
            shortcut("create_branch", "Create a branch", "$mod+B"),
            shortcut("create_dependent_branch", "Create a dependent branch", "$mod+Shift+B"),
        ],
    },
    ShortcutGroup {
        name: "view",
        shortcuts: &[
            shortcut("switch_theme", "Switch theme", "$mod+T"),
            shortcut("toggle_sidebar", "Toggle unassigned panel", "$mod+\\"),
            shortcut("zoom_in", "Zoom in", "$mod+="),
            shortcut("zoom_out", "Zoom out", "$mod+-"),
            shortcut("reset_zoom", "Reset zoom", "$mod+0"),
            shortcut("reload_view", "Reload view", "$mod+R"),
        ],
    },
    ShortcutGroup {
        name: "project",
        shortcuts: &[Shortcut {
            id: "project_history",
            title: "Project history",
            keys: "$mod+Shift+H",
            description: Some("Opens the project history view. Revert changes, view commits and more."),
        }],
    },
];

pub fn shortcut_groups() -> &'static [ShortcutGroup] {
    SHORTCUTS
}

/// Look up a shortcut by group name and id
pub fn find_shortcut(group: &str, id: &str) -> Option<&'static Shortcut> {
    SHORTCUTS
        .iter()
        .find(|g| g.name == group)?
        .shortcuts
        .iter()
        .find(|s| s.id == id)
}

/// Every shortcut together with its group name
pub fn all_shortcuts() -> impl Iterator<Item = (&'static str, &'static Shortcut)> {
    SHORTCUTS
        .iter()
        .flat_map(|group| group.shortcuts.iter().map(move |s| (group.name, s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_find_shortcut() {
        let s = find_shortcut("global", "create_branch").unwrap();
        assert_eq!(s.keys, "$mod+B");
        assert!(s.description.is_none());

        let history = find_shortcut("project", "project_history").unwrap();
        assert!(history.description.is_some());

        assert!(find_shortcut("view", "create_branch").is_none());
        assert!(find_shortcut("missing", "zoom_in").is_none());
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: Vec<&str> = all_shortcuts().map(|(_, s)| s.keys).collect();
        let unique: HashSet<&str> = keys.iter().copied().collect();
        assert_eq!(keys.len(), unique.len());
        assert_eq!(keys.len(), 11);
    }
}
