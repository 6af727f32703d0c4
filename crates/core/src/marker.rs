//! Marker data model
//!
//! The three overlay marker kinds and their invariants. All coordinates are
//! in document space; the viewport transform is applied only at render and
//! hit-test time. Marker kind is an explicit tagged sum so every mutation
//! and render site handles all kinds exhaustively, and adding a kind is a
//! compile-time-checked change.

use serde::{Deserialize, Serialize};
use viewer_core::{DocPoint, Size};

/// Stable unique identifier for a marker
///
/// Generated with UUID v4, persists in saved snapshots.
pub type MarkerId = uuid::Uuid;

/// Minimum width/height for a camera marker, in document units
pub const CAMERA_MIN_SIZE: f64 = 5.0;

/// Minimum width for a comment marker, in document units
pub const COMMENT_MIN_WIDTH: f64 = 100.0;

/// Minimum height for a comment marker, in document units
pub const COMMENT_MIN_HEIGHT: f64 = 30.0;

/// Minimum width/height for a logo marker, in document units
pub const LOGO_MIN_SIZE: f64 = 20.0;

/// Default size of a newly placed camera marker
pub const CAMERA_DEFAULT_SIZE: f64 = 40.0;

/// Default size of a newly placed comment marker
pub const COMMENT_DEFAULT_WIDTH: f64 = 160.0;
pub const COMMENT_DEFAULT_HEIGHT: f64 = 60.0;

/// Default size of a newly placed logo marker
pub const LOGO_DEFAULT_SIZE: f64 = 80.0;

/// Default field of view for a newly placed camera marker, in degrees
pub const CAMERA_DEFAULT_FOV_DEG: f64 = 90.0;

/// Default view distance for a newly placed camera marker, in document units
pub const CAMERA_DEFAULT_VIEW_DISTANCE: f64 = 100.0;

/// Reference to a logo image asset resolved by the hosting asset picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRef {
    /// Remote or data URL
    Url(String),
    /// Opaque handle to a binary blob owned by the host
    Binary(u64),
}

/// Per-kind marker payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerKind {
    /// Sensor icon with a field-of-view wedge
    Camera {
        /// Field-of-view angle in degrees, kept within [0, 360]
        fov_deg: f64,
        /// How far the view wedge extends, in document units
        view_distance: f64,
    },
    /// Sticky note anchored to a document point
    Comment {
        /// Note body text
        text: String,
        /// The document point the note points at
        anchor: DocPoint,
    },
    /// Brand image referencing an external asset
    Logo {
        /// The resolved image asset
        asset: AssetRef,
    },
}

impl MarkerKind {
    /// Minimum size for this kind. Resizes below this are clamped, never
    /// rejected, so mutation stays total.
    pub fn min_size(&self) -> Size {
        match self {
            MarkerKind::Camera { .. } => Size::new(CAMERA_MIN_SIZE, CAMERA_MIN_SIZE),
            MarkerKind::Comment { .. } => Size::new(COMMENT_MIN_WIDTH, COMMENT_MIN_HEIGHT),
            MarkerKind::Logo { .. } => Size::new(LOGO_MIN_SIZE, LOGO_MIN_SIZE),
        }
    }

    /// Clamp a candidate size to this kind's minimum
    pub fn clamp_size(&self, size: Size) -> Size {
        let min = self.min_size();
        Size::new(size.width.max(min.width), size.height.max(min.height))
    }

    /// Whether this is a comment marker (the only kind that idle-pulses)
    pub fn is_comment(&self) -> bool {
        matches!(self, MarkerKind::Comment { .. })
    }
}

/// A positioned overlay marker on the document canvas.
///
/// `position` is the top-left corner of the marker's bounding box in
/// document space; `rotation_deg` rotates around the box center. Z-order is
/// not stored here: it is the marker's position in the scene list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Stable unique identifier
    pub id: MarkerId,
    /// Top-left corner of the bounding box, in document space
    pub position: DocPoint,
    /// Bounding-box size, in document units
    pub size: Size,
    /// Clockwise rotation in degrees around the box center
    pub rotation_deg: f64,
    /// Kind-specific payload
    pub kind: MarkerKind,
}

impl Marker {
    /// Create a marker with a fresh id and the default size for its kind
    pub fn new(position: DocPoint, kind: MarkerKind) -> Self {
        let size = match &kind {
            MarkerKind::Camera { .. } => Size::new(CAMERA_DEFAULT_SIZE, CAMERA_DEFAULT_SIZE),
            MarkerKind::Comment { .. } => {
                Size::new(COMMENT_DEFAULT_WIDTH, COMMENT_DEFAULT_HEIGHT)
            }
            MarkerKind::Logo { .. } => Size::new(LOGO_DEFAULT_SIZE, LOGO_DEFAULT_SIZE),
        };
        Self {
            id: MarkerId::new_v4(),
            position,
            size,
            rotation_deg: 0.0,
            kind,
        }
    }

    /// Create a camera marker with default field of view and view distance
    pub fn new_camera(position: DocPoint) -> Self {
        Self::new(
            position,
            MarkerKind::Camera {
                fov_deg: CAMERA_DEFAULT_FOV_DEG,
                view_distance: CAMERA_DEFAULT_VIEW_DISTANCE,
            },
        )
    }

    /// Create a comment marker anchored at its own position with empty text
    pub fn new_comment(position: DocPoint) -> Self {
        Self::new(
            position,
            MarkerKind::Comment {
                text: String::new(),
                anchor: position,
            },
        )
    }

    /// Create a logo marker for a resolved asset
    pub fn new_logo(position: DocPoint, asset: AssetRef) -> Self {
        Self::new(position, MarkerKind::Logo { asset })
    }

    /// Bounding box as (min_x, min_y, max_x, max_y) in document space
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        (
            self.position.x,
            self.position.y,
            self.position.x + self.size.width,
            self.position.y + self.size.height,
        )
    }

    /// Center of the bounding box (the rotation pivot)
    pub fn center(&self) -> DocPoint {
        DocPoint::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }

    /// Whether a document-space point falls within the bounding box,
    /// expanded by `tolerance` on every side
    pub fn contains_point(&self, point: DocPoint, tolerance: f64) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bounding_box();
        point.x >= min_x - tolerance
            && point.x <= max_x + tolerance
            && point.y >= min_y - tolerance
            && point.y <= max_y + tolerance
    }

    /// Set the rotation. Camera markers keep their rotation within
    /// [0, 360) so the field-of-view wedge math stays well-defined;
    /// other kinds rotate freely.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation_deg = match self.kind {
            MarkerKind::Camera { .. } => degrees.rem_euclid(360.0),
            MarkerKind::Comment { .. } | MarkerKind::Logo { .. } => degrees,
        };
    }

    /// Apply a sparse update. Size is clamped to the kind minimum, camera
    /// rotation wraps, camera field of view is kept within [0, 360], and
    /// fields belonging to a different kind are ignored.
    pub fn apply_patch(&mut self, patch: &MarkerPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = self.kind.clamp_size(size);
        }
        if let Some(rotation) = patch.rotation_deg {
            self.set_rotation(rotation);
        }

        match &mut self.kind {
            MarkerKind::Camera {
                fov_deg,
                view_distance,
            } => {
                if let Some(fov) = patch.fov_deg {
                    *fov_deg = fov.clamp(0.0, 360.0);
                }
                if let Some(distance) = patch.view_distance {
                    *view_distance = distance.max(0.0);
                }
            }
            MarkerKind::Comment { text, anchor } => {
                if let Some(new_text) = &patch.text {
                    *text = new_text.clone();
                }
                if let Some(new_anchor) = patch.anchor {
                    *anchor = new_anchor;
                }
            }
            MarkerKind::Logo { asset } => {
                if let Some(new_asset) = &patch.asset {
                    *asset = new_asset.clone();
                }
            }
        }
    }
}

/// Sparse update for a marker. Only present fields are applied; fields for
/// a kind other than the target marker's are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerPatch {
    /// New top-left position, if being updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<DocPoint>,
    /// New size (clamped to the kind minimum), if being updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// New rotation in degrees, if being updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_deg: Option<f64>,
    /// New field of view (camera markers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fov_deg: Option<f64>,
    /// New view distance (camera markers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_distance: Option<f64>,
    /// New note text (comment markers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// New anchor point (comment markers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<DocPoint>,
    /// New asset reference (logo markers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetRef>,
}

impl MarkerPatch {
    /// A patch that only moves the marker
    pub fn move_to(position: DocPoint) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    /// A patch that only resizes the marker
    pub fn resize_to(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    /// A patch that only rotates the marker
    pub fn rotate_to(degrees: f64) -> Self {
        Self {
            rotation_deg: Some(degrees),
            ..Default::default()
        }
    }
}
