//! Scripted input: a JSON list of editor events replayed against an [`Editor`].

use crate::shortcuts::{KeyChord, ShortcutRegistry};
use deckdraw_core::{Editor, SceneModel, SerializableColor, ShapeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

fn default_text() -> String {
    "Text".to_string()
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Toolbar shape. Centered on the canvas unless `x`/`y` give the top-left.
    AddShape {
        kind: ShapeKind,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    AddText {
        #[serde(default = "default_text")]
        text: String,
    },
    Click { x: f64, y: f64 },
    DragStart { x: f64, y: f64 },
    DragMove { x: f64, y: f64 },
    DragEnd,
    DragCancel,
    /// Key chord such as `Ctrl+Z` or `Delete`.
    Key { key: String },
    /// Fill for shapes created afterwards.
    SetColor { color: SerializableColor },
    SetBackground { color: SerializableColor },
    Undo,
    Redo,
    Delete,
}

/// Parse a script file's contents.
pub fn parse_script(json: &str) -> Result<Vec<ScriptEvent>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Counters collected while replaying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    /// Events that produced a history entry or restored one.
    pub changes: usize,
    /// Events that left the history alone, such as clicks and drag frames.
    pub ignored: usize,
}

/// Feed events to the editor in order.
pub fn replay<S: SceneModel>(editor: &mut Editor<S>, events: &[ScriptEvent]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for event in events {
        summary.events += 1;
        if apply_event(editor, event) {
            summary.changes += 1;
        } else {
            summary.ignored += 1;
        }
    }
    log::info!(
        "Replayed {} events ({} changes, {} ignored)",
        summary.events,
        summary.changes,
        summary.ignored
    );
    summary
}

fn apply_event<S: SceneModel>(editor: &mut Editor<S>, event: &ScriptEvent) -> bool {
    log::debug!("Event: {:?}", event);
    match event {
        ScriptEvent::AddShape { kind, x, y } => {
            match (x, y) {
                (Some(x), Some(y)) => editor.add_shape_at(*kind, Point::new(*x, *y)),
                (None, None) => editor.add_shape(*kind),
                _ => {
                    log::warn!("add_shape needs both x and y; centering instead");
                    editor.add_shape(*kind)
                }
            };
            true
        }
        ScriptEvent::AddText { text } => {
            editor.add_text(text.clone());
            true
        }
        ScriptEvent::Click { x, y } => {
            editor.select_at(Point::new(*x, *y));
            false
        }
        ScriptEvent::DragStart { x, y } => {
            editor.begin_drag(Point::new(*x, *y));
            false
        }
        ScriptEvent::DragMove { x, y } => {
            if let Some(outcome) = editor.drag_to(Point::new(*x, *y)) {
                log::debug!(
                    "Snapped to {:?} with {} guide(s)",
                    outcome.position,
                    outcome.guides.len()
                );
            }
            false
        }
        ScriptEvent::DragEnd => editor.commit_drag(),
        ScriptEvent::DragCancel => {
            editor.cancel_drag();
            false
        }
        ScriptEvent::Key { key } => match key.parse::<KeyChord>() {
            Ok(chord) => match ShortcutRegistry::lookup(&chord) {
                Some(action) => action.apply(editor),
                None => {
                    log::debug!("No shortcut bound to {}", chord);
                    false
                }
            },
            Err(err) => {
                log::warn!("{}", err);
                false
            }
        },
        ScriptEvent::SetColor { color } => {
            editor.set_current_color(*color);
            false
        }
        ScriptEvent::SetBackground { color } => editor.set_background_color(*color),
        ScriptEvent::Undo => editor.undo(),
        ScriptEvent::Redo => editor.redo(),
        ScriptEvent::Delete => editor.delete_selected(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckdraw_core::{EditorConfig, GuideLine};

    #[test]
    fn test_parse_events() {
        let events = parse_script(
            r##"[
                {"event": "add_shape", "kind": "circle"},
                {"event": "add_shape", "kind": "square", "x": 10, "y": 20},
                {"event": "add_text"},
                {"event": "drag_start", "x": 600, "y": 400},
                {"event": "drag_end"},
                {"event": "key", "key": "Ctrl+Z"},
                {"event": "set_color", "color": "#ff0000"}
            ]"##,
        )
        .unwrap();

        assert_eq!(events.len(), 7);
        assert_eq!(
            events[1],
            ScriptEvent::AddShape {
                kind: ShapeKind::Square,
                x: Some(10.0),
                y: Some(20.0)
            }
        );
        assert_eq!(
            events[2],
            ScriptEvent::AddText {
                text: "Text".to_string()
            }
        );
        assert_eq!(
            events[6],
            ScriptEvent::SetColor {
                color: SerializableColor::new(255, 0, 0, 255)
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_event() {
        assert!(parse_script(r#"[{"event": "explode"}]"#).is_err());
        assert!(parse_script(r#"[{"event": "add_shape", "kind": "hexagon"}]"#).is_err());
    }

    #[test]
    fn test_replay_drag_session() {
        let events = parse_script(
            r#"[
                {"event": "add_shape", "kind": "square", "x": 100, "y": 100},
                {"event": "add_shape", "kind": "rectangle", "x": 103, "y": 300},
                {"event": "drag_start", "x": 125, "y": 125},
                {"event": "drag_move", "x": 126, "y": 126},
                {"event": "drag_end"}
            ]"#,
        )
        .unwrap();

        let mut editor = Editor::new(EditorConfig::default());
        let summary = replay(&mut editor, &events);
        assert_eq!(summary.events, 5);
        assert_eq!(summary.changes, 3);
        assert_eq!(editor.history().len(), 4);
        assert!(editor.guides().is_empty());

        let moved = editor.selection().unwrap();
        let origin = editor.scene().bounds_of(moved).unwrap().origin();
        assert_eq!(origin, Point::new(103.0, 100.0));
    }

    #[test]
    fn test_replay_guides_visible_mid_drag() {
        let events = parse_script(
            r#"[
                {"event": "add_shape", "kind": "square"},
                {"event": "drag_start", "x": 600, "y": 400},
                {"event": "drag_move", "x": 703, "y": 402}
            ]"#,
        )
        .unwrap();

        let mut editor = Editor::new(EditorConfig::default());
        replay(&mut editor, &events);
        assert_eq!(editor.guides(), &[GuideLine::horizontal(400.0)]);
    }

    #[test]
    fn test_replay_keys_and_undo() {
        let events = parse_script(
            r##"[
                {"event": "add_shape", "kind": "triangle"},
                {"event": "set_background", "color": "#000000"},
                {"event": "key", "key": "Ctrl+Z"},
                {"event": "key", "key": "Ctrl+Y"},
                {"event": "key", "key": "Hyper+Q"},
                {"event": "delete"},
                {"event": "undo"}
            ]"##,
        )
        .unwrap();

        let mut editor = Editor::new(EditorConfig::default());
        let summary = replay(&mut editor, &events);
        assert_eq!(summary.ignored, 1);
        assert_eq!(editor.scene().len(), 1);
        assert_eq!(editor.scene().background_color(), SerializableColor::black());
    }
}
