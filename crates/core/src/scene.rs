//! Scene store: the ordered marker list and selection state
//!
//! Markers live in a plain ordered list; a marker's z-order is its index
//! (last = topmost), so stacking needs no separate field and stays
//! consistent by construction. Selection is a single optional id, which
//! makes exclusive selection across kinds structural rather than enforced.
//!
//! Every mutation entry point is total: a stale id is a logged no-op, an
//! undersize resize is clamped by the marker model, and nothing here ever
//! returns an error. A delete racing a late drag commit resolves in the
//! delete's favor because `update_marker` checks existence first and never
//! re-inserts.

use viewer_core::DocPoint;

use crate::marker::{Marker, MarkerId, MarkerPatch};

/// Ordered collection of markers plus single-selection state.
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    markers: Vec<Marker>,
    selected: Option<MarkerId>,
}

impl SceneStore {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a scene from an ordered marker list (snapshot restore).
    /// Selection starts cleared.
    pub fn from_markers(markers: Vec<Marker>) -> Self {
        Self {
            markers,
            selected: None,
        }
    }

    /// Append a marker to the end of the list (topmost) and return its id
    pub fn add_marker(&mut self, marker: Marker) -> MarkerId {
        let id = marker.id;
        self.markers.push(marker);
        id
    }

    /// Merge a sparse update into an existing marker.
    ///
    /// Returns `false` when the id is unknown — e.g. the marker was deleted
    /// while a drag update was still in flight. That case is a silent no-op:
    /// it never resurrects the marker and never errors.
    pub fn update_marker(&mut self, id: MarkerId, patch: &MarkerPatch) -> bool {
        match self.markers.iter_mut().find(|m| m.id == id) {
            Some(marker) => {
                marker.apply_patch(patch);
                true
            }
            None => {
                log::debug!("update for stale marker {id} ignored");
                false
            }
        }
    }

    /// Remove a marker, clearing selection if it was the selected one
    pub fn delete_marker(&mut self, id: MarkerId) -> Option<Marker> {
        let index = self.markers.iter().position(|m| m.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.markers.remove(index))
    }

    /// Set the selection. Selecting a marker deselects every other marker
    /// regardless of kind; selecting an unknown id clears the selection.
    pub fn select(&mut self, id: Option<MarkerId>) {
        self.selected = match id {
            Some(id) if self.contains(id) => Some(id),
            Some(id) => {
                log::debug!("select of stale marker {id} treated as clear");
                None
            }
            None => None,
        };
    }

    /// The currently selected marker id, if any
    pub fn selected(&self) -> Option<MarkerId> {
        self.selected
    }

    /// The selected marker itself, if any
    pub fn selected_marker(&self) -> Option<&Marker> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Whether a marker with this id exists
    pub fn contains(&self, id: MarkerId) -> bool {
        self.markers.iter().any(|m| m.id == id)
    }

    /// Look up a marker by id
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Look up a marker mutably by id
    pub fn get_mut(&mut self, id: MarkerId) -> Option<&mut Marker> {
        self.markers.iter_mut().find(|m| m.id == id)
    }

    /// All markers in z-order (first = bottommost, last = topmost)
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The topmost marker whose bounding box (expanded by `tolerance`)
    /// contains the point, scanning from the top of the stack down
    pub fn topmost_at(&self, point: DocPoint, tolerance: f64) -> Option<MarkerId> {
        self.markers
            .iter()
            .rev()
            .find(|m| m.contains_point(point, tolerance))
            .map(|m| m.id)
    }

    /// Number of markers in the scene
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the scene has no markers
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{AssetRef, MarkerKind};
    use viewer_core::Size;

    fn camera_at(x: f64, y: f64) -> Marker {
        Marker::new_camera(DocPoint::new(x, y))
    }

    #[test]
    fn test_add_appends_topmost() {
        let mut scene = SceneStore::new();
        let a = scene.add_marker(camera_at(0.0, 0.0));
        let b = scene.add_marker(camera_at(0.0, 0.0));

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.markers()[0].id, a);
        assert_eq!(scene.markers()[1].id, b);
    }

    #[test]
    fn test_topmost_wins_hit_test() {
        let mut scene = SceneStore::new();
        let _bottom = scene.add_marker(camera_at(10.0, 10.0));
        let top = scene.add_marker(camera_at(10.0, 10.0));

        assert_eq!(scene.topmost_at(DocPoint::new(20.0, 20.0), 0.0), Some(top));
    }

    #[test]
    fn test_selection_is_exclusive_across_kinds() {
        let mut scene = SceneStore::new();
        let camera = scene.add_marker(camera_at(0.0, 0.0));
        let comment = scene.add_marker(Marker::new_comment(DocPoint::new(50.0, 50.0)));

        scene.select(Some(camera));
        assert_eq!(scene.selected(), Some(camera));

        scene.select(Some(comment));
        assert_eq!(scene.selected(), Some(comment));
    }

    #[test]
    fn test_select_stale_id_clears() {
        let mut scene = SceneStore::new();
        let id = scene.add_marker(camera_at(0.0, 0.0));
        scene.select(Some(id));
        scene.delete_marker(id);

        scene.select(Some(id));
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut scene = SceneStore::new();
        let id = scene.add_marker(camera_at(0.0, 0.0));
        scene.select(Some(id));

        assert!(scene.delete_marker(id).is_some());
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn test_delete_other_keeps_selection() {
        let mut scene = SceneStore::new();
        let keep = scene.add_marker(camera_at(0.0, 0.0));
        let drop = scene.add_marker(camera_at(100.0, 100.0));
        scene.select(Some(keep));

        scene.delete_marker(drop);
        assert_eq!(scene.selected(), Some(keep));
    }

    #[test]
    fn test_update_stale_id_is_silent_noop() {
        let mut scene = SceneStore::new();
        let id = scene.add_marker(camera_at(0.0, 0.0));
        scene.delete_marker(id);

        let before = scene.clone();
        let applied = scene.update_marker(id, &MarkerPatch::move_to(DocPoint::new(9.0, 9.0)));

        assert!(!applied);
        assert_eq!(scene.len(), before.len());
        assert_eq!(scene.markers(), before.markers());
    }

    #[test]
    fn test_update_clamps_through_marker_model() {
        let mut scene = SceneStore::new();
        let id = scene.add_marker(camera_at(0.0, 0.0));

        scene.update_marker(id, &MarkerPatch::resize_to(Size::new(0.5, 0.5)));
        let marker = scene.get(id).unwrap();
        assert_eq!(marker.size, Size::new(5.0, 5.0));
    }

    #[test]
    fn test_update_logo_asset() {
        let mut scene = SceneStore::new();
        let id = scene.add_marker(Marker::new_logo(
            DocPoint::new(0.0, 0.0),
            AssetRef::Binary(1),
        ));

        scene.update_marker(
            id,
            &MarkerPatch {
                asset: Some(AssetRef::Url("logo.svg".into())),
                ..Default::default()
            },
        );
        match &scene.get(id).unwrap().kind {
            MarkerKind::Logo { asset } => assert_eq!(*asset, AssetRef::Url("logo.svg".into())),
            other => panic!("expected logo, got {other:?}"),
        }
    }
}
