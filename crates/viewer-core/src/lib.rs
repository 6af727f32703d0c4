//! Viewport math for the plan editor
//!
//! Pure coordinate-transform and viewport state for the primary editing
//! surface. Converts between screen space (pointer pixels) and document
//! space, and owns the scale/offset pair with pivot-preserving zoom,
//! fit-to-screen, and panning. No rendering happens here; the hosting UI
//! reads the transform and draws.

/// A point in screen space (pointer pixels, origin at the viewport's top-left).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new screen point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another screen point
    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A point in document space (unscaled page units).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocPoint {
    pub x: f64,
    pub y: f64,
}

impl DocPoint {
    /// Create a new document-space point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another document point
    pub fn distance_to(&self, other: &DocPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A width/height pair, in whichever space the caller is working in.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The scale/offset transform mapping document space to screen space.
///
/// `screen = doc * scale + offset`. The transform itself has no failure
/// mode: [`ViewportController`] is responsible for keeping `scale` positive
/// and within bounds before any conversion happens.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewTransform {
    /// Create a transform from a scale and offset pair
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Convert a screen-space point to document space
    pub fn screen_to_doc(&self, screen: ScreenPoint) -> DocPoint {
        DocPoint {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Convert a document-space point to screen space
    pub fn doc_to_screen(&self, doc: DocPoint) -> ScreenPoint {
        ScreenPoint {
            x: doc.x * self.scale + self.offset_x,
            y: doc.y * self.scale + self.offset_y,
        }
    }

    /// Convert a screen-space distance (pixels) to document-space distance
    pub fn screen_dist_to_doc(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }
}

/// Default lower zoom bound
pub const DEFAULT_ZOOM_MIN: f64 = 0.1;

/// Default upper zoom bound
pub const DEFAULT_ZOOM_MAX: f64 = 5.0;

/// Default scale change applied by [`ViewportController::zoom_in`] / `zoom_out`
pub const DEFAULT_ZOOM_STEP: f64 = 0.1;

/// Default margin factor applied by fit-to-screen (content fills 90% of the viewport)
pub const DEFAULT_FIT_MARGIN: f64 = 0.9;

/// Viewport state for the primary editing surface.
///
/// Owns the scale/offset transform, the zoom bounds, and (once the document
/// has loaded) the natural content size used by fit-to-screen. All scale
/// changes go through [`clamp_scale`](Self::clamp_scale), so the transform
/// never carries a zero or out-of-range scale.
#[derive(Debug, Clone)]
pub struct ViewportController {
    transform: ViewTransform,
    zoom_min: f64,
    zoom_max: f64,
    zoom_step: f64,
    fit_margin: f64,
    content_size: Option<Size>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self {
            transform: ViewTransform::default(),
            zoom_min: DEFAULT_ZOOM_MIN,
            zoom_max: DEFAULT_ZOOM_MAX,
            zoom_step: DEFAULT_ZOOM_STEP,
            fit_margin: DEFAULT_FIT_MARGIN,
            content_size: None,
        }
    }
}

impl ViewportController {
    /// Create a viewport with the default zoom bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom zoom bounds. Values are sanitized so `min` stays positive
    /// and `max` never falls below `min`.
    pub fn with_zoom_bounds(mut self, min: f64, max: f64) -> Self {
        self.zoom_min = min.max(f64::MIN_POSITIVE);
        self.zoom_max = max.max(self.zoom_min);
        self.transform.scale = self.clamp_scale(self.transform.scale);
        self
    }

    /// Set the scale change applied by `zoom_in` / `zoom_out`
    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step;
        self
    }

    /// Set the fit-to-screen margin factor (1.0 = edge to edge)
    pub fn with_fit_margin(mut self, margin: f64) -> Self {
        self.fit_margin = margin;
        self
    }

    /// The current transform
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// The current scale factor
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    /// The current offset
    pub fn offset(&self) -> (f64, f64) {
        (self.transform.offset_x, self.transform.offset_y)
    }

    /// The lower zoom bound
    pub fn zoom_min(&self) -> f64 {
        self.zoom_min
    }

    /// The upper zoom bound
    pub fn zoom_max(&self) -> f64 {
        self.zoom_max
    }

    /// Natural content size, once known
    pub fn content_size(&self) -> Option<Size> {
        self.content_size
    }

    /// Record the natural (unscaled) content size after the document loads
    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = Some(size);
    }

    /// Clamp a candidate scale into the configured zoom bounds
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.zoom_min, self.zoom_max)
    }

    /// Set the scale directly (clamped), leaving the offset untouched.
    ///
    /// Used by the preview sync bridge, which pushes an absolute scale value
    /// rather than a delta.
    pub fn set_scale(&mut self, scale: f64) {
        self.transform.scale = self.clamp_scale(scale);
    }

    /// Convert a screen-space point to document space under the current transform
    pub fn screen_to_doc(&self, screen: ScreenPoint) -> DocPoint {
        self.transform.screen_to_doc(screen)
    }

    /// Convert a document-space point to screen space under the current transform
    pub fn doc_to_screen(&self, doc: DocPoint) -> ScreenPoint {
        self.transform.doc_to_screen(doc)
    }

    /// Change the scale by `delta`, optionally anchored at a screen pivot.
    ///
    /// With a pivot, the document point under the pivot is computed under the
    /// old transform and the offset is recomputed so that the same document
    /// point maps back to the same screen position under the new scale. The
    /// point under the cursor therefore does not move during zoom.
    pub fn zoom(&mut self, delta: f64, pivot: Option<ScreenPoint>) {
        let new_scale = self.clamp_scale(self.transform.scale + delta);

        match pivot {
            Some(pivot) => {
                let anchor = self.transform.screen_to_doc(pivot);
                self.transform.scale = new_scale;
                self.transform.offset_x = pivot.x - anchor.x * new_scale;
                self.transform.offset_y = pivot.y - anchor.y * new_scale;
            }
            None => {
                self.transform.scale = new_scale;
            }
        }
    }

    /// Zoom in by one step, centered on the given pivot if any
    pub fn zoom_in(&mut self, pivot: Option<ScreenPoint>) {
        self.zoom(self.zoom_step, pivot);
    }

    /// Zoom out by one step, centered on the given pivot if any
    pub fn zoom_out(&mut self, pivot: Option<ScreenPoint>) {
        self.zoom(-self.zoom_step, pivot);
    }

    /// Shift the offset by a screen-space delta
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.transform.offset_x += dx;
        self.transform.offset_y += dy;
    }

    /// Scale and center the content within the given viewport.
    ///
    /// Returns `false` without touching the transform when the content size
    /// is not yet known (document still loading) or the viewport is
    /// degenerate.
    pub fn fit_to_screen(&mut self, viewport: Size) -> bool {
        let Some(content) = self.content_size else {
            return false;
        };

        if viewport.width <= 0.0
            || viewport.height <= 0.0
            || content.width <= 0.0
            || content.height <= 0.0
        {
            return false;
        }

        let scale = (viewport.width / content.width).min(viewport.height / content.height)
            * self.fit_margin;
        let scale = self.clamp_scale(scale);

        self.transform.scale = scale;
        self.transform.offset_x = (viewport.width - content.width * scale) / 2.0;
        self.transform.offset_y = (viewport.height - content.height * scale) / 2.0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_screen_to_doc_basic() {
        let t = ViewTransform::new(2.0, 10.0, 10.0);
        let doc = t.screen_to_doc(ScreenPoint::new(100.0, 100.0));
        assert!(approx(doc.x, 45.0));
        assert!(approx(doc.y, 45.0));
    }

    #[test]
    fn test_round_trip_identity() {
        let scales = [0.1, 0.5, 1.0, 2.5, 5.0];
        let offsets = [(-50.0, 30.0), (0.0, 0.0), (123.4, -987.6)];

        for &scale in &scales {
            for &(ox, oy) in &offsets {
                let t = ViewTransform::new(scale, ox, oy);
                let original = ScreenPoint::new(73.2, -18.9);
                let back = t.doc_to_screen(t.screen_to_doc(original));
                assert!(approx(back.x, original.x), "scale={scale} ox={ox}");
                assert!(approx(back.y, original.y), "scale={scale} oy={oy}");
            }
        }
    }

    #[test]
    fn test_screen_dist_to_doc() {
        let t = ViewTransform::new(4.0, 0.0, 0.0);
        assert!(approx(t.screen_dist_to_doc(8.0), 2.0));
    }

    #[test]
    fn test_zoom_clamps_to_bounds() {
        let mut vp = ViewportController::new();
        vp.zoom(100.0, None);
        assert!(approx(vp.scale(), DEFAULT_ZOOM_MAX));

        vp.zoom(-100.0, None);
        assert!(approx(vp.scale(), DEFAULT_ZOOM_MIN));
    }

    #[test]
    fn test_zoom_pivot_is_fixed() {
        let mut vp = ViewportController::new();
        vp.pan(25.0, -40.0);
        let pivot = ScreenPoint::new(200.0, 150.0);
        let anchor = vp.screen_to_doc(pivot);

        vp.zoom(0.75, Some(pivot));

        let after = vp.doc_to_screen(anchor);
        assert!(approx(after.x, pivot.x));
        assert!(approx(after.y, pivot.y));
        assert!(approx(vp.scale(), 1.75));
    }

    #[test]
    fn test_zoom_pivot_fixed_at_bounds() {
        // The pivot must stay fixed even when the requested delta clamps.
        let mut vp = ViewportController::new();
        let pivot = ScreenPoint::new(64.0, 64.0);
        let anchor = vp.screen_to_doc(pivot);

        vp.zoom(99.0, Some(pivot));

        let after = vp.doc_to_screen(anchor);
        assert!(approx(after.x, pivot.x));
        assert!(approx(after.y, pivot.y));
        assert!(approx(vp.scale(), DEFAULT_ZOOM_MAX));
    }

    #[test]
    fn test_zoom_without_pivot_keeps_offset() {
        let mut vp = ViewportController::new();
        vp.pan(12.0, 34.0);
        vp.zoom(0.5, None);
        let (ox, oy) = vp.offset();
        assert!(approx(ox, 12.0));
        assert!(approx(oy, 34.0));
    }

    #[test]
    fn test_zoom_in_out_steps() {
        let mut vp = ViewportController::new();
        vp.zoom_in(None);
        assert!(approx(vp.scale(), 1.0 + DEFAULT_ZOOM_STEP));
        vp.zoom_out(None);
        vp.zoom_out(None);
        assert!(approx(vp.scale(), 1.0 - DEFAULT_ZOOM_STEP));
    }

    #[test]
    fn test_fit_to_screen_requires_content_size() {
        let mut vp = ViewportController::new();
        assert!(!vp.fit_to_screen(Size::new(800.0, 600.0)));
        assert!(approx(vp.scale(), 1.0));
    }

    #[test]
    fn test_fit_to_screen_centers_content() {
        let mut vp = ViewportController::new();
        vp.set_content_size(Size::new(1000.0, 500.0));
        assert!(vp.fit_to_screen(Size::new(800.0, 600.0)));

        // Width is the limiting dimension: 800/1000 * 0.9 = 0.72
        assert!(approx(vp.scale(), 0.72));
        let (ox, oy) = vp.offset();
        assert!(approx(ox, (800.0 - 1000.0 * 0.72) / 2.0));
        assert!(approx(oy, (600.0 - 500.0 * 0.72) / 2.0));
    }

    #[test]
    fn test_fit_to_screen_rejects_degenerate_viewport() {
        let mut vp = ViewportController::new();
        vp.set_content_size(Size::new(100.0, 100.0));
        assert!(!vp.fit_to_screen(Size::new(0.0, 600.0)));
    }

    #[test]
    fn test_set_scale_is_clamped() {
        let mut vp = ViewportController::new().with_zoom_bounds(0.25, 3.0);
        vp.set_scale(10.0);
        assert!(approx(vp.scale(), 3.0));
        vp.set_scale(0.01);
        assert!(approx(vp.scale(), 0.25));
    }

    #[test]
    fn test_pan_accumulates() {
        let mut vp = ViewportController::new();
        vp.pan(5.0, -3.0);
        vp.pan(5.0, -3.0);
        let (ox, oy) = vp.offset();
        assert!(approx(ox, 10.0));
        assert!(approx(oy, -6.0));
    }
}
