//! Plan Editor Core Library
//!
//! Marker scene model and interaction state machine for the plan editor:
//! overlay markers (camera icons, comment notes, logo images) on a zoomable
//! rendering of a paginated document, with a scale-synchronized secondary
//! preview surface. Rendering, asset catalogs, and remote persistence live
//! behind the trait boundaries in [`boundary`].

pub mod boundary;
pub mod config;
pub mod document;
pub mod interaction;
pub mod marker;
pub mod persistence;
pub mod preview;
pub mod pulse;
pub mod scene;

pub use boundary::{
    resolve_logo_asset, AssetChoice, AssetPicker, AssetRequest, DocumentRenderer, LoadError,
    RenderedPage,
};
pub use config::EditorConfig;
pub use document::{Document, DocumentError, DocumentId, DocumentManager, DocumentResult, DocumentState};
pub use interaction::{
    generate_handles, Handle, HandleKind, InteractionController, InteractionEvent, ToolMode,
};
pub use marker::{AssetRef, Marker, MarkerId, MarkerKind, MarkerPatch};
pub use persistence::{
    from_json, restore, snapshot, to_json, PersistenceError, SceneSnapshot, ViewportRecord,
};
pub use preview::PreviewSyncBridge;
pub use pulse::PulseAnimator;
pub use scene::SceneStore;
