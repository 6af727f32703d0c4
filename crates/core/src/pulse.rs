//! Idle pulse animation
//!
//! Unselected comment markers breathe so they stay discoverable on a busy
//! plan. Each tracked marker owns one repeating scheduler entry with its
//! own cancellation token; selection does not tear the entry down, it
//! renders the marker at rest and freezes the phase, which resumes where
//! it left off when the selection moves on.

use std::collections::HashMap;

use plan_editor_scheduler::{CancellationToken, TaskId, TaskKind, TickScheduler};

use crate::marker::MarkerId;

/// Pulse scale bounds and step. Callers normally pull these from
/// [`EditorConfig`](crate::config::EditorConfig).
#[derive(Debug)]
struct PulseEntry {
    task: TaskId,
    token: CancellationToken,
    scale: f64,
    rising: bool,
}

/// Drives a subtle scale oscillation for tracked markers off a logical
/// tick source.
#[derive(Debug)]
pub struct PulseAnimator {
    timers: TickScheduler,
    entries: HashMap<MarkerId, PulseEntry>,
    tasks: HashMap<TaskId, MarkerId>,
    selected: Option<MarkerId>,
    pulse_min: f64,
    pulse_max: f64,
    pulse_step: f64,
}

impl PulseAnimator {
    pub fn new(pulse_min: f64, pulse_max: f64, pulse_step: f64) -> Self {
        Self {
            timers: TickScheduler::new(),
            entries: HashMap::new(),
            tasks: HashMap::new(),
            selected: None,
            pulse_min,
            pulse_max,
            pulse_step,
        }
    }

    /// Start pulsing a marker. Tracking an already-tracked marker is a no-op
    /// so its phase is not reset.
    pub fn track(&mut self, id: MarkerId) {
        if self.entries.contains_key(&id) {
            return;
        }
        let (task, token) = self.timers.schedule(TaskKind::Repeating, 1);
        self.tasks.insert(task, id);
        self.entries.insert(
            id,
            PulseEntry {
                task,
                token,
                scale: 1.0,
                rising: true,
            },
        );
    }

    /// Stop pulsing a marker and release its scheduler entry.
    pub fn untrack(&mut self, id: MarkerId) {
        if let Some(entry) = self.entries.remove(&id) {
            entry.token.cancel();
            self.timers.cancel(entry.task);
            self.tasks.remove(&entry.task);
        }
    }

    /// Stop pulsing everything.
    pub fn untrack_all(&mut self) {
        self.timers.cancel_all();
        self.entries.clear();
        self.tasks.clear();
    }

    /// Tell the animator which marker is selected. The selected marker
    /// renders at rest with its phase frozen until deselection.
    pub fn set_selected(&mut self, selected: Option<MarkerId>) {
        self.selected = selected;
    }

    /// Whether the marker currently has a live pulse entry
    pub fn is_tracked(&self, id: MarkerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of live pulse entries
    pub fn tracked_count(&self) -> usize {
        self.entries.len()
    }

    /// Advance one logical tick, stepping every fired entry through its
    /// triangle wave between the configured bounds. The selected marker's
    /// phase is frozen, not reset.
    pub fn tick(&mut self) {
        for task in self.timers.tick() {
            let Some(id) = self.tasks.get(&task) else {
                continue;
            };
            if self.selected == Some(*id) {
                continue;
            }
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };
            if entry.rising {
                entry.scale += self.pulse_step;
                if entry.scale >= self.pulse_max {
                    entry.scale = self.pulse_max;
                    entry.rising = false;
                }
            } else {
                entry.scale -= self.pulse_step;
                if entry.scale <= self.pulse_min {
                    entry.scale = self.pulse_min;
                    entry.rising = true;
                }
            }
        }
    }

    /// The render scale for a marker: 1.0 when selected or untracked,
    /// otherwise the current pulse phase.
    pub fn scale_of(&self, id: MarkerId) -> f64 {
        if self.selected == Some(id) {
            return 1.0;
        }
        self.entries.get(&id).map_or(1.0, |e| e.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn animator() -> PulseAnimator {
        PulseAnimator::new(0.95, 1.05, 0.005)
    }

    #[test]
    fn test_untracked_marker_rests_at_unity() {
        let anim = animator();
        assert_eq!(anim.scale_of(Uuid::new_v4()), 1.0);
    }

    #[test]
    fn test_pulse_rises_then_falls() {
        let mut anim = animator();
        let id = Uuid::new_v4();
        anim.track(id);

        anim.tick();
        assert!((anim.scale_of(id) - 1.005).abs() < 1e-9);

        // 10 ticks up from 1.0 reaches the ceiling; the next tick reverses.
        for _ in 0..9 {
            anim.tick();
        }
        assert!((anim.scale_of(id) - 1.05).abs() < 1e-9);
        anim.tick();
        assert!(anim.scale_of(id) < 1.05);
    }

    #[test]
    fn test_reverses_at_lower_bound() {
        let mut anim = animator();
        let id = Uuid::new_v4();
        anim.track(id);

        // Full descent to the floor: 10 up, then 20 down.
        for _ in 0..30 {
            anim.tick();
        }
        assert!((anim.scale_of(id) - 0.95).abs() < 1e-9);
        anim.tick();
        assert!(anim.scale_of(id) > 0.95);
    }

    #[test]
    fn test_selection_pauses_and_resumes_phase() {
        let mut anim = animator();
        let id = Uuid::new_v4();
        anim.track(id);

        for _ in 0..5 {
            anim.tick();
        }
        let phase = anim.scale_of(id);
        assert!(phase > 1.0);

        anim.set_selected(Some(id));
        assert_eq!(anim.scale_of(id), 1.0);

        // Phase is frozen while selected, not reset.
        anim.tick();
        anim.tick();
        anim.set_selected(None);
        assert!((anim.scale_of(id) - phase).abs() < 1e-9);

        // And it resumes stepping from where it was.
        anim.tick();
        assert!((anim.scale_of(id) - (phase + 0.005)).abs() < 1e-9);
    }

    #[test]
    fn test_untrack_releases_scheduler_entry() {
        let mut anim = animator();
        let id = Uuid::new_v4();
        anim.track(id);
        assert!(anim.is_tracked(id));

        anim.untrack(id);
        assert!(!anim.is_tracked(id));
        assert_eq!(anim.scale_of(id), 1.0);
        assert_eq!(anim.tracked_count(), 0);

        // Ticking after untrack must not panic or resurrect the entry.
        anim.tick();
        assert_eq!(anim.scale_of(id), 1.0);
    }

    #[test]
    fn test_retracking_is_idempotent() {
        let mut anim = animator();
        let id = Uuid::new_v4();
        anim.track(id);
        for _ in 0..3 {
            anim.tick();
        }
        let phase = anim.scale_of(id);

        anim.track(id);
        assert!((anim.scale_of(id) - phase).abs() < 1e-9);
        assert_eq!(anim.tracked_count(), 1);
    }

    #[test]
    fn test_markers_pulse_independently() {
        let mut anim = animator();
        let a = Uuid::new_v4();
        anim.track(a);
        for _ in 0..4 {
            anim.tick();
        }

        let b = Uuid::new_v4();
        anim.track(b);
        for _ in 0..2 {
            anim.tick();
        }

        assert!((anim.scale_of(a) - 1.03).abs() < 1e-9);
        assert!((anim.scale_of(b) - 1.01).abs() < 1e-9);
    }
}
