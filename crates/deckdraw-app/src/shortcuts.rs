//! Keyboard shortcut registry and the editor actions the shortcuts trigger.

use deckdraw_core::{Editor, SceneModel};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Semantic action behind a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Delete,
    Undo,
    Redo,
    /// Cancel the active drag, or drop the selection.
    Cancel,
}

impl EditorAction {
    /// Run the action. Returns whether the scene changed.
    pub fn apply<S: SceneModel>(self, editor: &mut Editor<S>) -> bool {
        match self {
            EditorAction::Delete => editor.delete_selected(),
            EditorAction::Undo => editor.undo(),
            EditorAction::Redo => editor.redo(),
            EditorAction::Cancel => {
                editor.escape();
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid key chord: {0:?}")]
pub struct KeyChordError(String);

/// A key plus modifiers, e.g. `Ctrl+Shift+Z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
}

impl FromStr for KeyChord {
    type Err = KeyChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = KeyChord {
            key: String::new(),
            ctrl: false,
            shift: false,
        };
        let mut parts = s.split('+').map(str::trim).peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                chord.key = part.to_string();
            } else if part.eq_ignore_ascii_case("ctrl") || part.eq_ignore_ascii_case("cmd") {
                chord.ctrl = true;
            } else if part.eq_ignore_ascii_case("shift") {
                chord.shift = true;
            } else {
                return Err(KeyChordError(s.to_string()));
            }
        }
        if chord.key.is_empty() {
            return Err(KeyChordError(s.to_string()));
        }
        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        f.write_str(&self.key)
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: EditorAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: EditorAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, chord: &KeyChord) -> bool {
        self.key.eq_ignore_ascii_case(&chord.key)
            && self.ctrl == chord.ctrl
            && self.shift == chord.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, EditorAction::Undo, "Undo"),
            Shortcut::new("Z", true, true, EditorAction::Redo, "Redo"),
            Shortcut::new("Y", true, false, EditorAction::Redo, "Redo"),
            Shortcut::new(
                "Delete",
                false,
                false,
                EditorAction::Delete,
                "Delete selected object",
            ),
            Shortcut::new(
                "Backspace",
                false,
                false,
                EditorAction::Delete,
                "Delete selected object",
            ),
            Shortcut::new(
                "Escape",
                false,
                false,
                EditorAction::Cancel,
                "Cancel drag or clear selection",
            ),
        ]
    }

    /// Action bound to `chord`, if any.
    pub fn lookup(chord: &KeyChord) -> Option<EditorAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(chord))
            .map(|shortcut| shortcut.action)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckdraw_core::{EditorConfig, ShapeKind};

    fn action(chord: &str) -> Option<EditorAction> {
        ShortcutRegistry::lookup(&chord.parse().unwrap())
    }

    #[test]
    fn test_parse_chord() {
        let chord: KeyChord = "Ctrl+Shift+Z".parse().unwrap();
        assert_eq!(
            chord,
            KeyChord {
                key: "Z".to_string(),
                ctrl: true,
                shift: true
            }
        );
        assert_eq!(chord.to_string(), "Ctrl+Shift+Z");
        assert!("Alt+Z".parse::<KeyChord>().is_err());
        assert!("Ctrl+".parse::<KeyChord>().is_err());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(action("Ctrl+Z"), Some(EditorAction::Undo));
        assert_eq!(action("ctrl+z"), Some(EditorAction::Undo));
        assert_eq!(action("Ctrl+Shift+Z"), Some(EditorAction::Redo));
        assert_eq!(action("Ctrl+Y"), Some(EditorAction::Redo));
        assert_eq!(action("Delete"), Some(EditorAction::Delete));
        assert_eq!(action("Backspace"), Some(EditorAction::Delete));
        assert_eq!(action("Escape"), Some(EditorAction::Cancel));
        assert_eq!(action("Z"), None);
    }

    #[test]
    fn test_format() {
        let formatted: Vec<String> = ShortcutRegistry::all().iter().map(Shortcut::format).collect();
        assert!(formatted.contains(&"Ctrl+Shift+Z".to_string()));
        assert!(formatted.contains(&"Delete".to_string()));
    }

    #[test]
    fn test_apply_actions() {
        let mut editor = Editor::new(EditorConfig::default());
        editor.add_shape(ShapeKind::Square);

        assert!(EditorAction::Delete.apply(&mut editor));
        assert!(editor.scene().is_empty());
        assert!(EditorAction::Undo.apply(&mut editor));
        assert_eq!(editor.scene().len(), 1);
        assert!(EditorAction::Redo.apply(&mut editor));
        assert!(editor.scene().is_empty());
        assert!(!EditorAction::Cancel.apply(&mut editor));
    }
}
