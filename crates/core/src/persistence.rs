//! Scene persistence
//!
//! Snapshots capture the marker list (in z-order) and the viewport
//! transform as plain serde values, so hosts can stash them wherever they
//! keep project state. Selection and in-flight gestures are deliberately
//! transient and never serialized.

use serde::{Deserialize, Serialize};

use viewer_core::ViewportController;

use crate::config::EditorConfig;
use crate::marker::Marker;
use crate::scene::SceneStore;

/// Persisted viewport transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRecord {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// A point-in-time capture of the scene and viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub markers: Vec<Marker>,
    pub viewport: ViewportRecord,
}

/// Serialization failures at the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to serialize snapshot: {0}")]
    Serialization(String),

    #[error("failed to deserialize snapshot: {0}")]
    Deserialization(String),
}

/// Capture the current scene and viewport.
pub fn snapshot(scene: &SceneStore, viewport: &ViewportController) -> SceneSnapshot {
    let (offset_x, offset_y) = viewport.offset();
    SceneSnapshot {
        markers: scene.markers().to_vec(),
        viewport: ViewportRecord {
            scale: viewport.scale(),
            offset_x,
            offset_y,
        },
    }
}

/// Rebuild a scene and viewport from a snapshot. The viewport keeps the
/// config's zoom bounds, so a snapshot from looser settings is clamped.
pub fn restore(
    snapshot: SceneSnapshot,
    config: &EditorConfig,
) -> (SceneStore, ViewportController) {
    let scene = SceneStore::from_markers(snapshot.markers);
    let mut viewport = config.viewport();
    viewport.set_scale(snapshot.viewport.scale);
    viewport.pan(snapshot.viewport.offset_x, snapshot.viewport.offset_y);
    (scene, viewport)
}

/// Serialize a snapshot to JSON.
pub fn to_json(snapshot: &SceneSnapshot) -> Result<String, PersistenceError> {
    serde_json::to_string_pretty(snapshot).map_err(|e| PersistenceError::Serialization(e.to_string()))
}

/// Deserialize a snapshot from JSON.
pub fn from_json(json: &str) -> Result<SceneSnapshot, PersistenceError> {
    serde_json::from_str(json).map_err(|e| PersistenceError::Deserialization(e.to_string()))
}
