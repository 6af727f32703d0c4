//! Host boundary traits
//!
//! The editor core never touches a rendering backend or a file dialog
//! directly. Hosts implement these traits and the core drives them, which
//! keeps the crate testable with plain in-memory fakes.

use viewer_core::{DocPoint, Size};

use crate::interaction::{InteractionController, InteractionEvent};
use crate::marker::AssetRef;
use crate::scene::SceneStore;

/// Failure to load a document, a page, or an external asset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load document '{resource}': {reason}")]
    Document { resource: String, reason: String },

    #[error("failed to render page {page}: {reason}")]
    Page { page: u16, reason: String },

    #[error("failed to load asset: {reason}")]
    Asset { reason: String },
}

/// A rendered page bitmap together with its natural (unscaled) size.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub pixels: Vec<u8>,
    pub natural_size: Size,
}

/// Renders plan documents page by page. Implemented by the host against
/// whatever backend it embeds.
pub trait DocumentRenderer {
    /// Number of pages in the document at `resource`
    fn page_count(&mut self, resource: &str) -> Result<u16, LoadError>;

    /// Render a single page at its natural size
    fn render_page(&mut self, resource: &str, page_index: u16) -> Result<RenderedPage, LoadError>;
}

/// What the user did with the asset picker dialog
#[derive(Debug, Clone, PartialEq)]
pub enum AssetChoice {
    Chosen(AssetRef),
    Cancelled,
}

/// Context handed to the picker when a logo placement needs an asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetRequest {
    /// Document position the logo will be placed at
    pub position: DocPoint,
}

/// Presents an asset picker to the user. Implemented by the host.
pub trait AssetPicker {
    fn pick_asset(&mut self, request: &AssetRequest) -> Result<AssetChoice, LoadError>;
}

/// Drive the asset picker for a pending logo placement and feed the outcome
/// back into the interaction controller. Cancellation and picker failure
/// both leave the scene untouched; failures are additionally surfaced to
/// the caller.
pub fn resolve_logo_asset<P: AssetPicker + ?Sized>(
    picker: &mut P,
    interaction: &mut InteractionController,
    scene: &mut SceneStore,
) -> Result<Vec<InteractionEvent>, LoadError> {
    let Some(position) = interaction.pending_asset_position() else {
        return Ok(Vec::new());
    };
    match picker.pick_asset(&AssetRequest { position }) {
        Ok(AssetChoice::Chosen(asset)) => Ok(interaction.asset_chosen(asset, scene)),
        Ok(AssetChoice::Cancelled) => Ok(interaction.asset_cancelled()),
        Err(err) => {
            log::warn!("asset picker failed: {err}");
            interaction.asset_cancelled();
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::interaction::ToolMode;
    use viewer_core::ScreenPoint;

    struct FixedPicker(Result<AssetChoice, &'static str>);

    impl AssetPicker for FixedPicker {
        fn pick_asset(&mut self, _request: &AssetRequest) -> Result<AssetChoice, LoadError> {
            match &self.0 {
                Ok(choice) => Ok(choice.clone()),
                Err(reason) => Err(LoadError::Asset {
                    reason: (*reason).to_string(),
                }),
            }
        }
    }

    fn pending_controller(scene: &mut SceneStore) -> InteractionController {
        let config = EditorConfig::default();
        let mut viewport = config.viewport();
        let mut controller = InteractionController::new(config);
        controller.set_document_ready(true);
        controller.set_tool(ToolMode::PlaceLogo);
        controller.pointer_down(ScreenPoint::new(30.0, 30.0), scene, &mut viewport);
        controller
    }

    #[test]
    fn test_chosen_asset_creates_logo() {
        let mut scene = SceneStore::new();
        let mut controller = pending_controller(&mut scene);
        let mut picker = FixedPicker(Ok(AssetChoice::Chosen(AssetRef::Url("logo.svg".into()))));

        let events = resolve_logo_asset(&mut picker, &mut controller, &mut scene).unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, InteractionEvent::MarkerCreated(_))));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_cancelled_picker_leaves_scene_untouched() {
        let mut scene = SceneStore::new();
        let mut controller = pending_controller(&mut scene);
        let mut picker = FixedPicker(Ok(AssetChoice::Cancelled));

        let events = resolve_logo_asset(&mut picker, &mut controller, &mut scene).unwrap();
        assert!(events.contains(&InteractionEvent::PlacementCancelled));
        assert!(scene.is_empty());
        assert_eq!(controller.pending_asset_position(), None);
    }

    #[test]
    fn test_picker_failure_cancels_and_surfaces() {
        let mut scene = SceneStore::new();
        let mut controller = pending_controller(&mut scene);
        let mut picker = FixedPicker(Err("dialog crashed"));

        let result = resolve_logo_asset(&mut picker, &mut controller, &mut scene);
        assert!(matches!(result, Err(LoadError::Asset { .. })));
        assert!(scene.is_empty());
        assert_eq!(controller.pending_asset_position(), None);
    }

    #[test]
    fn test_no_pending_placement_is_a_no_op() {
        let mut scene = SceneStore::new();
        let mut controller = InteractionController::new(EditorConfig::default());
        let mut picker = FixedPicker(Ok(AssetChoice::Cancelled));

        let events = resolve_logo_asset(&mut picker, &mut controller, &mut scene).unwrap();
        assert!(events.is_empty());
    }
}
