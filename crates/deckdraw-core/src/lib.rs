//! DeckDraw Core Library
//!
//! Scene model, snapping, alignment guides and undo/redo history for the
//! DeckDraw slide editor. Rendering and UI live in the host.

pub mod config;
pub mod editor;
pub mod guides;
pub mod history;
pub mod scene;
pub mod shapes;
pub mod snap;
pub mod style;

pub use config::{ConfigError, EditorConfig};
pub use editor::Editor;
pub use guides::{GuideLine, GuideLineRegistry, Orientation};
pub use history::{HistoryManager, HistorySnapshot};
pub use scene::{SceneDocument, SceneError, SceneModel};
pub use shapes::{SerializableColor, Shape, ShapeId};
pub use snap::{
    GRID_SIZE, SNAP_THRESHOLD, SnapConfig, SnapEngine, SnapOutcome, SnapSource, snap_to_grid,
};
pub use style::{ShapeFactory, ShapeKind, StyleConfig};
