//! Preview scale synchronization
//!
//! A detached preview window mirrors the primary view's zoom scale. The
//! bridge keeps the two scales converged without feedback loops: every push
//! toward the primary view records its value, and the primary's echo of
//! that same value is consumed silently instead of being pushed back.
//!
//! The "applied" indicator is a short-lived flag backed by a one-shot
//! scheduler entry, so hosts clear it by ticking rather than by wall time.

use plan_editor_scheduler::{TaskId, TaskKind, TickScheduler};

/// Scales closer than this are treated as equal.
pub const SCALE_EPSILON: f64 = 1e-6;

/// Two-way zoom synchronization between the primary view and a detached
/// preview window.
#[derive(Debug)]
pub struct PreviewSyncBridge {
    sync_enabled: bool,
    preview_open: bool,
    preview_loaded: bool,
    preview_scale: f64,
    primary_scale: f64,
    /// Last scale pushed to the primary; its echo is consumed, not re-pushed
    last_pushed: Option<f64>,
    indicator_task: Option<TaskId>,
    indicator_ticks: u64,
    timers: TickScheduler,
}

impl PreviewSyncBridge {
    /// Create a bridge with sync enabled and no preview open.
    /// `indicator_ticks` is how long the applied indicator stays lit.
    pub fn new(indicator_ticks: u64) -> Self {
        Self {
            sync_enabled: true,
            preview_open: false,
            preview_loaded: false,
            preview_scale: 1.0,
            primary_scale: 1.0,
            last_pushed: None,
            indicator_task: None,
            indicator_ticks,
            timers: TickScheduler::new(),
        }
    }

    pub fn is_sync_enabled(&self) -> bool {
        self.sync_enabled
    }

    pub fn is_preview_open(&self) -> bool {
        self.preview_open
    }

    /// The scale the preview window should render at
    pub fn preview_scale(&self) -> f64 {
        self.preview_scale
    }

    /// The primary scale as last reported to the bridge
    pub fn primary_scale(&self) -> f64 {
        self.primary_scale
    }

    /// Whether the applied indicator is currently lit
    pub fn just_applied(&self) -> bool {
        self.indicator_task.is_some()
    }

    /// Toggle synchronization. Re-enabling does not retroactively resync;
    /// the scales reconverge on the next explicit change from either side.
    pub fn set_sync_enabled(&mut self, enabled: bool) {
        self.sync_enabled = enabled;
    }

    /// Open the preview window, seeding it from the current primary scale.
    /// Content is not loaded yet, so preview-originated changes are ignored
    /// until [`preview_load_complete`](Self::preview_load_complete).
    pub fn open_preview(&mut self, primary_scale: f64) {
        self.preview_open = true;
        self.preview_loaded = false;
        self.primary_scale = primary_scale;
        self.preview_scale = primary_scale;
        self.last_pushed = None;
    }

    /// Mark the preview content as loaded and ready to originate changes.
    pub fn preview_load_complete(&mut self) {
        if self.preview_open {
            self.preview_loaded = true;
        }
    }

    /// Close the preview window and drop any pending indicator.
    pub fn close_preview(&mut self) {
        self.preview_open = false;
        self.preview_loaded = false;
        self.last_pushed = None;
        self.indicator_task = None;
        self.timers.cancel_all();
    }

    /// The preview reports a user-driven scale change. Returns the scale to
    /// apply to the primary view, or `None` when nothing should happen
    /// (preview closed or still loading, sync off, or no effective change).
    pub fn preview_scale_changed(&mut self, new_scale: f64) -> Option<f64> {
        if !self.preview_open || !self.preview_loaded {
            return None;
        }
        self.preview_scale = new_scale;
        if !self.sync_enabled {
            return None;
        }
        if (new_scale - self.primary_scale).abs() < SCALE_EPSILON {
            return None;
        }
        self.primary_scale = new_scale;
        self.last_pushed = Some(new_scale);
        if let Some(task) = self.indicator_task.take() {
            self.timers.cancel(task);
        }
        let (task, _token) = self.timers.schedule(TaskKind::OneShot, self.indicator_ticks);
        self.indicator_task = Some(task);
        Some(new_scale)
    }

    /// The primary view reports a scale change. Echoes of our own pushes
    /// are consumed; genuine changes mirror into the preview while sync is
    /// enabled.
    pub fn primary_scale_changed(&mut self, new_scale: f64) {
        if let Some(pushed) = self.last_pushed {
            if (new_scale - pushed).abs() < SCALE_EPSILON {
                self.last_pushed = None;
                self.primary_scale = new_scale;
                return;
            }
            self.last_pushed = None;
        }
        self.primary_scale = new_scale;
        if self.preview_open && self.sync_enabled {
            self.preview_scale = new_scale;
        }
    }

    /// Advance one logical tick; expires the applied indicator when its
    /// one-shot entry fires.
    pub fn tick(&mut self) {
        let fired = self.timers.tick();
        if let Some(task) = self.indicator_task {
            if fired.contains(&task) {
                self.indicator_task = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_bridge() -> PreviewSyncBridge {
        let mut bridge = PreviewSyncBridge::new(3);
        bridge.open_preview(1.2);
        bridge.preview_load_complete();
        bridge
    }

    #[test]
    fn test_preview_change_pushes_to_primary() {
        let mut bridge = open_bridge();
        assert_eq!(bridge.preview_scale_changed(1.5), Some(1.5));
        assert_eq!(bridge.primary_scale(), 1.5);
        assert!(bridge.just_applied());
    }

    #[test]
    fn test_echo_does_not_loop() {
        let mut bridge = open_bridge();
        bridge.preview_scale_changed(1.5);

        // The primary applies 1.5 and reports it back; the echo must not
        // be mirrored into the preview as a fresh change.
        bridge.primary_scale_changed(1.5);
        assert_eq!(bridge.preview_scale(), 1.5);
        assert_eq!(bridge.primary_scale(), 1.5);

        // And a genuine primary change afterwards still mirrors.
        bridge.primary_scale_changed(0.8);
        assert_eq!(bridge.preview_scale(), 0.8);
    }

    #[test]
    fn test_sync_disabled_keeps_scales_independent() {
        let mut bridge = open_bridge();
        bridge.preview_scale_changed(1.5);
        bridge.set_sync_enabled(false);

        assert_eq!(bridge.preview_scale_changed(2.0), None);
        assert_eq!(bridge.preview_scale(), 2.0);
        assert_eq!(bridge.primary_scale(), 1.5);

        bridge.primary_scale_changed(0.5);
        assert_eq!(bridge.preview_scale(), 2.0);
    }

    #[test]
    fn test_reenable_waits_for_next_change() {
        let mut bridge = open_bridge();
        bridge.set_sync_enabled(false);
        bridge.preview_scale_changed(2.0);
        bridge.set_sync_enabled(true);

        // No retroactive resync on re-enable.
        assert_eq!(bridge.primary_scale(), 1.2);

        // The next explicit change reconverges both sides.
        assert_eq!(bridge.preview_scale_changed(1.8), Some(1.8));
        assert_eq!(bridge.primary_scale(), 1.8);
    }

    #[test]
    fn test_changes_ignored_until_loaded() {
        let mut bridge = PreviewSyncBridge::new(3);
        bridge.open_preview(1.0);

        assert_eq!(bridge.preview_scale_changed(2.0), None);
        assert_eq!(bridge.preview_scale(), 1.0);

        bridge.preview_load_complete();
        assert_eq!(bridge.preview_scale_changed(2.0), Some(2.0));
    }

    #[test]
    fn test_no_push_for_equal_scale() {
        let mut bridge = open_bridge();
        assert_eq!(bridge.preview_scale_changed(1.2), None);
        assert!(!bridge.just_applied());
    }

    #[test]
    fn test_indicator_expires_after_ticks() {
        let mut bridge = open_bridge();
        bridge.preview_scale_changed(1.5);
        assert!(bridge.just_applied());

        bridge.tick();
        bridge.tick();
        assert!(bridge.just_applied());
        bridge.tick();
        assert!(!bridge.just_applied());
    }

    #[test]
    fn test_rapid_changes_restart_indicator() {
        let mut bridge = open_bridge();
        bridge.preview_scale_changed(1.5);
        bridge.tick();
        bridge.tick();

        // A second push before expiry restarts the window.
        bridge.preview_scale_changed(1.7);
        bridge.tick();
        assert!(bridge.just_applied());
        bridge.tick();
        bridge.tick();
        assert!(!bridge.just_applied());
    }

    #[test]
    fn test_close_preview_resets_state() {
        let mut bridge = open_bridge();
        bridge.preview_scale_changed(1.5);
        bridge.close_preview();

        assert!(!bridge.is_preview_open());
        assert!(!bridge.just_applied());
        assert_eq!(bridge.preview_scale_changed(2.0), None);

        // Primary changes while closed are still tracked for the next open.
        bridge.primary_scale_changed(0.7);
        assert_eq!(bridge.primary_scale(), 0.7);
    }

    #[test]
    fn test_open_seeds_preview_from_primary() {
        let mut bridge = PreviewSyncBridge::new(3);
        bridge.open_preview(2.5);
        assert_eq!(bridge.preview_scale(), 2.5);
        assert!(bridge.is_preview_open());
    }
}
