//! Interaction state machine
//!
//! Turns raw pointer events into scene and viewport mutations. The
//! controller owns the active tool mode and the in-flight gesture; the
//! scene store and viewport controller are passed into each handler, so
//! several independent editor instances can share nothing and unit tests
//! can drive gestures against plain values.
//!
//! Every handler is total: gestures that make no sense in the current state
//! are ignored, undersize resizes are clamped by the marker model, and no
//! pointer path ever returns an error.

use viewer_core::{DocPoint, ScreenPoint, Size, ViewportController};

use crate::config::EditorConfig;
use crate::marker::{AssetRef, Marker, MarkerId, MarkerPatch};
use crate::scene::SceneStore;

/// The current interaction intent.
///
/// Placement modes are single-shot: after one successful placement (or a
/// cancellation) the tool reverts to `Select`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Select, move, resize, and rotate existing markers
    #[default]
    Select,
    /// Place a camera marker on the next pointer-down
    PlaceCamera,
    /// Place a comment marker on the next pointer-down
    PlaceComment,
    /// Place a logo marker (defers creation until an asset is chosen)
    PlaceLogo,
}

impl ToolMode {
    /// Whether this tool places a new marker rather than editing existing ones
    pub fn is_placement(self) -> bool {
        !matches!(self, ToolMode::Select)
    }
}

/// Which manipulation handle of the selected marker is being referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    /// Rotation handle above the top edge
    Rotate,
}

/// A manipulation handle with its document-space position.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: DocPoint,
}

/// Generate the eight resize handles plus the rotate handle for a marker's
/// bounding box. `rotate_offset` is the document-space distance from the top
/// edge to the rotate handle (screen-constant, so callers convert it through
/// the current transform).
pub fn generate_handles(marker: &Marker, rotate_offset: f64) -> Vec<Handle> {
    let (min_x, min_y, max_x, max_y) = marker.bounding_box();
    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;

    vec![
        Handle { kind: HandleKind::NorthWest, position: DocPoint::new(min_x, min_y) },
        Handle { kind: HandleKind::North, position: DocPoint::new(center_x, min_y) },
        Handle { kind: HandleKind::NorthEast, position: DocPoint::new(max_x, min_y) },
        Handle { kind: HandleKind::East, position: DocPoint::new(max_x, center_y) },
        Handle { kind: HandleKind::SouthEast, position: DocPoint::new(max_x, max_y) },
        Handle { kind: HandleKind::South, position: DocPoint::new(center_x, max_y) },
        Handle { kind: HandleKind::SouthWest, position: DocPoint::new(min_x, max_y) },
        Handle { kind: HandleKind::West, position: DocPoint::new(min_x, center_y) },
        Handle {
            kind: HandleKind::Rotate,
            position: DocPoint::new(center_x, min_y - rotate_offset),
        },
    ]
}

/// The handle nearest to `point` within `tolerance`, if any
fn hit_handle(marker: &Marker, point: DocPoint, tolerance: f64, rotate_offset: f64) -> Option<HandleKind> {
    generate_handles(marker, rotate_offset)
        .into_iter()
        .map(|h| (h.kind, h.position.distance_to(&point)))
        .filter(|&(_, dist)| dist <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(kind, _)| kind)
}

/// The in-flight gesture between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, Default)]
enum GestureState {
    /// No gesture in progress
    #[default]
    Idle,
    /// Moving a marker; `grab_offset` keeps the marker from jumping to the
    /// pointer, `origin` lets a sub-epsilon gesture restore it untouched
    Dragging {
        id: MarkerId,
        grab_dx: f64,
        grab_dy: f64,
        origin: DocPoint,
        start_screen: ScreenPoint,
    },
    /// Resizing the selected marker from one of its eight handles
    Resizing {
        id: MarkerId,
        handle: HandleKind,
        orig_position: DocPoint,
        orig_size: Size,
    },
    /// Rotating the selected marker around its center
    Rotating { id: MarkerId, center: DocPoint },
    /// Select-tool press on empty canvas; becomes a pan once movement
    /// passes the threshold, otherwise resolves as a click on release
    Panning {
        start_screen: ScreenPoint,
        last_screen: ScreenPoint,
        engaged: bool,
    },
    /// Logo placement parked until the host resolves an asset choice
    AwaitingAsset { position: DocPoint },
}

/// What a pointer or key handler did, for the host to react to
/// (re-render, start/stop pulse animation, persist).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    MarkerCreated(MarkerId),
    MarkerUpdated(MarkerId),
    MarkerDeleted(MarkerId),
    SelectionChanged(Option<MarkerId>),
    ToolChanged(ToolMode),
    ViewChanged,
    /// Logo placement is waiting on the external asset picker
    AwaitingAsset,
    /// A placement mode was cancelled with the scene untouched
    PlacementCancelled,
}

/// Tool-mode state machine turning pointer gestures into scene and
/// viewport mutations.
#[derive(Debug)]
pub struct InteractionController {
    config: EditorConfig,
    tool: ToolMode,
    state: GestureState,
    document_ready: bool,
}

impl InteractionController {
    /// Create a controller with the given configuration. Placement stays
    /// blocked until [`set_document_ready`](Self::set_document_ready) is
    /// called with `true`.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            tool: ToolMode::Select,
            state: GestureState::Idle,
            document_ready: false,
        }
    }

    /// The active tool mode
    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    /// Set the active tool mode. Switching away from logo placement while
    /// an asset choice is pending drops the pending placement.
    pub fn set_tool(&mut self, tool: ToolMode) -> Vec<InteractionEvent> {
        if matches!(self.state, GestureState::AwaitingAsset { .. }) {
            self.state = GestureState::Idle;
        }
        if self.tool == tool {
            return Vec::new();
        }
        self.tool = tool;
        vec![InteractionEvent::ToolChanged(tool)]
    }

    /// Unblock or re-block placement as the document load state changes
    pub fn set_document_ready(&mut self, ready: bool) {
        self.document_ready = ready;
    }

    /// The parked logo placement position, while waiting on the asset picker
    pub fn pending_asset_position(&self) -> Option<DocPoint> {
        match self.state {
            GestureState::AwaitingAsset { position } => Some(position),
            _ => None,
        }
    }

    /// Handle pointer-down on the canvas.
    pub fn pointer_down(
        &mut self,
        screen: ScreenPoint,
        scene: &mut SceneStore,
        viewport: &mut ViewportController,
    ) -> Vec<InteractionEvent> {
        let doc = viewport.screen_to_doc(screen);

        match self.tool {
            ToolMode::PlaceCamera => self.place(Marker::new_camera(doc), scene),
            ToolMode::PlaceComment => self.place(Marker::new_comment(doc), scene),
            ToolMode::PlaceLogo => {
                // Creation is deferred until the host resolves an asset;
                // cancelling must leave the scene exactly as it was.
                if !self.document_ready {
                    return Vec::new();
                }
                self.state = GestureState::AwaitingAsset { position: doc };
                vec![InteractionEvent::AwaitingAsset]
            }
            ToolMode::Select => self.pointer_down_select(screen, doc, scene, viewport),
        }
    }

    fn place(&mut self, marker: Marker, scene: &mut SceneStore) -> Vec<InteractionEvent> {
        if !self.document_ready {
            return Vec::new();
        }
        let id = scene.add_marker(marker);
        scene.select(Some(id));
        self.tool = ToolMode::Select;
        self.state = GestureState::Idle;
        vec![
            InteractionEvent::MarkerCreated(id),
            InteractionEvent::SelectionChanged(Some(id)),
            InteractionEvent::ToolChanged(ToolMode::Select),
        ]
    }

    fn pointer_down_select(
        &mut self,
        screen: ScreenPoint,
        doc: DocPoint,
        scene: &mut SceneStore,
        viewport: &ViewportController,
    ) -> Vec<InteractionEvent> {
        let transform = viewport.transform();
        let handle_tolerance = transform.screen_dist_to_doc(self.config.handle_hit_tolerance_px);
        let rotate_offset = transform.screen_dist_to_doc(self.config.rotate_handle_offset_px);

        // Handles of the selected marker take precedence over body hits.
        if let Some(selected) = scene.selected_marker() {
            if let Some(handle) = hit_handle(selected, doc, handle_tolerance, rotate_offset) {
                let id = selected.id;
                self.state = match handle {
                    HandleKind::Rotate => GestureState::Rotating {
                        id,
                        center: selected.center(),
                    },
                    _ => GestureState::Resizing {
                        id,
                        handle,
                        orig_position: selected.position,
                        orig_size: selected.size,
                    },
                };
                return Vec::new();
            }
        }

        let body_tolerance = transform.screen_dist_to_doc(self.config.click_epsilon_px);
        if let Some(id) = scene.topmost_at(doc, body_tolerance) {
            let mut events = Vec::new();
            if scene.selected() != Some(id) {
                scene.select(Some(id));
                events.push(InteractionEvent::SelectionChanged(Some(id)));
            }
            // contains() above guarantees the marker exists
            if let Some(marker) = scene.get(id) {
                self.state = GestureState::Dragging {
                    id,
                    grab_dx: doc.x - marker.position.x,
                    grab_dy: doc.y - marker.position.y,
                    origin: marker.position,
                    start_screen: screen,
                };
            }
            return events;
        }

        // Empty canvas: pan candidate; resolves as a click on release if the
        // pointer never travels past the threshold.
        self.state = GestureState::Panning {
            start_screen: screen,
            last_screen: screen,
            engaged: false,
        };
        Vec::new()
    }

    /// Handle pointer movement. Drag, resize, and rotate commit directly to
    /// the scene on every move for immediate visual feedback.
    pub fn pointer_move(
        &mut self,
        screen: ScreenPoint,
        scene: &mut SceneStore,
        viewport: &mut ViewportController,
    ) -> Vec<InteractionEvent> {
        let doc = viewport.screen_to_doc(screen);

        match self.state {
            GestureState::Dragging {
                id, grab_dx, grab_dy, ..
            } => {
                let position = DocPoint::new(doc.x - grab_dx, doc.y - grab_dy);
                if scene.update_marker(id, &MarkerPatch::move_to(position)) {
                    vec![InteractionEvent::MarkerUpdated(id)]
                } else {
                    // Deleted mid-drag; the delete wins and the gesture dies.
                    self.state = GestureState::Idle;
                    Vec::new()
                }
            }
            GestureState::Resizing {
                id,
                handle,
                orig_position,
                orig_size,
            } => {
                let Some(min) = scene.get(id).map(|m| m.kind.min_size()) else {
                    self.state = GestureState::Idle;
                    return Vec::new();
                };
                let (position, size) = resize_bounds(orig_position, orig_size, handle, doc, min);
                let patch = MarkerPatch {
                    position: Some(position),
                    size: Some(size),
                    ..Default::default()
                };
                if scene.update_marker(id, &patch) {
                    vec![InteractionEvent::MarkerUpdated(id)]
                } else {
                    self.state = GestureState::Idle;
                    Vec::new()
                }
            }
            GestureState::Rotating { id, center } => {
                // The rotate handle rests above the center, so a pointer
                // straight up means zero rotation.
                let degrees =
                    (doc.y - center.y).atan2(doc.x - center.x).to_degrees() + 90.0;
                if scene.update_marker(id, &MarkerPatch::rotate_to(degrees)) {
                    vec![InteractionEvent::MarkerUpdated(id)]
                } else {
                    self.state = GestureState::Idle;
                    Vec::new()
                }
            }
            GestureState::Panning {
                start_screen,
                last_screen,
                engaged,
            } => {
                let now_engaged =
                    engaged || screen.distance_to(&start_screen) > self.config.pan_threshold_px;
                let mut events = Vec::new();
                if now_engaged {
                    viewport.pan(screen.x - last_screen.x, screen.y - last_screen.y);
                    events.push(InteractionEvent::ViewChanged);
                }
                self.state = GestureState::Panning {
                    start_screen,
                    last_screen: screen,
                    engaged: now_engaged,
                };
                events
            }
            GestureState::Idle | GestureState::AwaitingAsset { .. } => Vec::new(),
        }
    }

    /// Handle pointer-up, finalizing the gesture.
    pub fn pointer_up(
        &mut self,
        screen: ScreenPoint,
        scene: &mut SceneStore,
        _viewport: &mut ViewportController,
    ) -> Vec<InteractionEvent> {
        let state = std::mem::take(&mut self.state);
        match state {
            GestureState::Dragging {
                id,
                origin,
                start_screen,
                ..
            } => {
                // Sub-epsilon movement means the whole gesture was a
                // selection click; undo the incidental micro-moves.
                if screen.distance_to(&start_screen) < self.config.click_epsilon_px
                    && scene.update_marker(id, &MarkerPatch::move_to(origin))
                {
                    return vec![InteractionEvent::MarkerUpdated(id)];
                }
                Vec::new()
            }
            GestureState::Panning { engaged, .. } => {
                if !engaged && scene.selected().is_some() {
                    scene.select(None);
                    return vec![InteractionEvent::SelectionChanged(None)];
                }
                Vec::new()
            }
            GestureState::AwaitingAsset { position } => {
                // Still waiting on the picker; keep the gesture parked.
                self.state = GestureState::AwaitingAsset { position };
                Vec::new()
            }
            GestureState::Idle
            | GestureState::Resizing { .. }
            | GestureState::Rotating { .. } => Vec::new(),
        }
    }

    /// Complete a deferred logo placement with the chosen asset.
    pub fn asset_chosen(
        &mut self,
        asset: AssetRef,
        scene: &mut SceneStore,
    ) -> Vec<InteractionEvent> {
        let GestureState::AwaitingAsset { position } = self.state else {
            return Vec::new();
        };
        self.state = GestureState::Idle;
        self.place(Marker::new_logo(position, asset), scene)
    }

    /// Abandon a deferred logo placement; the scene is left untouched.
    pub fn asset_cancelled(&mut self) -> Vec<InteractionEvent> {
        if !matches!(self.state, GestureState::AwaitingAsset { .. }) {
            return Vec::new();
        }
        self.state = GestureState::Idle;
        let mut events = vec![InteractionEvent::PlacementCancelled];
        if self.tool != ToolMode::Select {
            self.tool = ToolMode::Select;
            events.push(InteractionEvent::ToolChanged(ToolMode::Select));
        }
        events
    }

    /// Delete the selected marker, if any.
    pub fn delete_selected(&mut self, scene: &mut SceneStore) -> Vec<InteractionEvent> {
        let Some(id) = scene.selected() else {
            return Vec::new();
        };
        if scene.delete_marker(id).is_none() {
            return Vec::new();
        }
        // Kill any gesture that was mutating the deleted marker.
        match self.state {
            GestureState::Dragging { id: gesture_id, .. }
            | GestureState::Resizing { id: gesture_id, .. }
            | GestureState::Rotating { id: gesture_id, .. }
                if gesture_id == id =>
            {
                self.state = GestureState::Idle;
            }
            _ => {}
        }
        vec![
            InteractionEvent::MarkerDeleted(id),
            InteractionEvent::SelectionChanged(None),
        ]
    }

    /// Handle a keyboard key by name (as reported by the host toolkit).
    pub fn key_down(&mut self, key: &str, scene: &mut SceneStore) -> Vec<InteractionEvent> {
        match key {
            "Delete" | "Backspace" => self.delete_selected(scene),
            "Escape" => {
                if matches!(self.state, GestureState::AwaitingAsset { .. }) {
                    return self.asset_cancelled();
                }
                if self.tool.is_placement() {
                    let mut events = vec![InteractionEvent::PlacementCancelled];
                    events.extend(self.set_tool(ToolMode::Select));
                    return events;
                }
                if scene.selected().is_some() {
                    scene.select(None);
                    return vec![InteractionEvent::SelectionChanged(None)];
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

/// Compute the new bounds for a resize gesture: the handle follows the
/// pointer while the opposite edge stays fixed, and the result never drops
/// below the per-kind minimum.
fn resize_bounds(
    orig_position: DocPoint,
    orig_size: Size,
    handle: HandleKind,
    pointer: DocPoint,
    min: Size,
) -> (DocPoint, Size) {
    let left = orig_position.x;
    let top = orig_position.y;
    let right = left + orig_size.width;
    let bottom = top + orig_size.height;

    let mut new_left = left;
    let mut new_top = top;
    let mut width = orig_size.width;
    let mut height = orig_size.height;

    let grows_east = matches!(
        handle,
        HandleKind::East | HandleKind::NorthEast | HandleKind::SouthEast
    );
    let grows_west = matches!(
        handle,
        HandleKind::West | HandleKind::NorthWest | HandleKind::SouthWest
    );
    let grows_south = matches!(
        handle,
        HandleKind::South | HandleKind::SouthEast | HandleKind::SouthWest
    );
    let grows_north = matches!(
        handle,
        HandleKind::North | HandleKind::NorthEast | HandleKind::NorthWest
    );

    if grows_east {
        width = (pointer.x - left).max(min.width);
    } else if grows_west {
        new_left = pointer.x.min(right - min.width);
        width = right - new_left;
    }

    if grows_south {
        height = (pointer.y - top).max(min.height);
    } else if grows_north {
        new_top = pointer.y.min(bottom - min.height);
        height = bottom - new_top;
    }

    (DocPoint::new(new_left, new_top), Size::new(width, height))
}
