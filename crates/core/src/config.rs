//! Editor configuration
//!
//! Centralizes every tunable that would otherwise be an embedded literal:
//! zoom bounds, gesture thresholds, pulse animation shape, and the
//! preview-applied indicator duration. Defaults match the shipped editor
//! behavior; hosts override individual values through the builder methods.

use viewer_core::ViewportController;

/// Configuration for the interactive editor core.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Lower zoom bound for the primary viewport
    pub zoom_min: f64,
    /// Upper zoom bound for the primary viewport
    pub zoom_max: f64,
    /// Scale change applied by a single zoom-in/zoom-out step
    pub zoom_step: f64,
    /// Margin factor applied by fit-to-screen (0.9 = content fills 90%)
    pub fit_margin: f64,
    /// Screen-space movement (pixels) before a select-tool drag on empty
    /// canvas becomes a pan instead of a click
    pub pan_threshold_px: f64,
    /// Screen-space movement (pixels) below which a pointer-down/up pair on
    /// a marker counts as a selection click, not a drag
    pub click_epsilon_px: f64,
    /// Screen-space hit slop (pixels) for resize and rotate handles
    pub handle_hit_tolerance_px: f64,
    /// Distance (screen pixels) from the top edge of the selection box to
    /// the rotate handle
    pub rotate_handle_offset_px: f64,
    /// Lower bound of the idle pulse scale oscillation
    pub pulse_min: f64,
    /// Upper bound of the idle pulse scale oscillation
    pub pulse_max: f64,
    /// Scale increment applied per ~20ms tick of the pulse animation
    pub pulse_step: f64,
    /// How long the preview "just applied" indicator stays raised, in ticks
    /// (100 ticks at the nominal 20ms tick is ~2 seconds)
    pub applied_indicator_ticks: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.1,
            zoom_max: 5.0,
            zoom_step: 0.1,
            fit_margin: 0.9,
            pan_threshold_px: 4.0,
            click_epsilon_px: 2.0,
            handle_hit_tolerance_px: 8.0,
            rotate_handle_offset_px: 24.0,
            pulse_min: 0.95,
            pulse_max: 1.05,
            pulse_step: 0.005,
            applied_indicator_ticks: 100,
        }
    }
}

impl EditorConfig {
    /// Create a configuration with the default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zoom bounds
    pub fn with_zoom_bounds(mut self, min: f64, max: f64) -> Self {
        self.zoom_min = min;
        self.zoom_max = max;
        self
    }

    /// Set the zoom step
    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step;
        self
    }

    /// Set the fit-to-screen margin factor
    pub fn with_fit_margin(mut self, margin: f64) -> Self {
        self.fit_margin = margin;
        self
    }

    /// Set the pan-engage threshold in screen pixels
    pub fn with_pan_threshold_px(mut self, px: f64) -> Self {
        self.pan_threshold_px = px;
        self
    }

    /// Set the click-vs-drag epsilon in screen pixels
    pub fn with_click_epsilon_px(mut self, px: f64) -> Self {
        self.click_epsilon_px = px;
        self
    }

    /// Set the pulse oscillation shape
    pub fn with_pulse(mut self, min: f64, max: f64, step: f64) -> Self {
        self.pulse_min = min;
        self.pulse_max = max;
        self.pulse_step = step;
        self
    }

    /// Set the applied-indicator duration in ticks
    pub fn with_applied_indicator_ticks(mut self, ticks: u64) -> Self {
        self.applied_indicator_ticks = ticks;
        self
    }

    /// Build a primary-surface viewport controller from these settings
    pub fn viewport(&self) -> ViewportController {
        ViewportController::new()
            .with_zoom_bounds(self.zoom_min, self.zoom_max)
            .with_zoom_step(self.zoom_step)
            .with_fit_margin(self.fit_margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_behavior() {
        let config = EditorConfig::default();
        assert_eq!(config.zoom_min, 0.1);
        assert_eq!(config.zoom_max, 5.0);
        assert_eq!(config.fit_margin, 0.9);
        assert_eq!(config.pulse_min, 0.95);
        assert_eq!(config.pulse_max, 1.05);
        assert_eq!(config.applied_indicator_ticks, 100);
    }

    #[test]
    fn test_builders_override() {
        let config = EditorConfig::new()
            .with_zoom_bounds(0.5, 2.0)
            .with_pulse(0.9, 1.1, 0.01);
        assert_eq!(config.zoom_min, 0.5);
        assert_eq!(config.zoom_max, 2.0);
        assert_eq!(config.pulse_step, 0.01);
    }

    #[test]
    fn test_viewport_inherits_bounds() {
        let config = EditorConfig::new().with_zoom_bounds(0.5, 2.0);
        let mut vp = config.viewport();
        vp.zoom(100.0, None);
        assert!((vp.scale() - 2.0).abs() < 1e-9);
    }
}
