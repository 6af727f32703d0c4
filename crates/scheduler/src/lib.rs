//! Plan Editor Scheduler Library
//!
//! Single-threaded tick scheduler with cancellable timer entries.
//!
//! The editor core is event-driven and cooperative: pulse animation and the
//! preview sync indicator both run off one nominal ~20ms tick. This crate
//! provides the shared [`TickScheduler`] that counts those ticks and reports
//! which entries came due, plus the [`CancellationToken`] that lets an owner
//! (a deleted marker, a closed preview) retire its entry before it fires.
//!
//! The scheduler never reads the wall clock; callers drive it by calling
//! `tick()` from their timer loop, and tests drive it directly.
//!
//! # Example
//!
//! ```
//! use plan_editor_scheduler::{TickScheduler, TaskKind};
//!
//! let mut scheduler = TickScheduler::new();
//! let (task, token) = scheduler.schedule(TaskKind::Repeating, 2);
//!
//! assert!(scheduler.tick().is_empty()); // 1 of 2
//! assert_eq!(scheduler.tick(), vec![task]); // due
//!
//! token.cancel();
//! assert!(scheduler.tick().is_empty()); // entry retired, never fires again
//! ```

mod cancel;
mod tick;

pub use cancel::CancellationToken;
pub use tick::{TaskId, TaskKind, TickScheduler, TickStats};
