//! Debounced re-analysis state machine
//!
//! The scheduler decides *when* to submit work; it never touches the worker
//! or the documents itself. Callers translate its decisions into commands.

use std::collections::HashSet;
use std::time::Duration;

use crate::model::DocumentId;

/// Default quiet period before a burst of edits is analysed
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    /// Timer armed for `generation`, nothing submitted yet
    Debouncing {
        document_id: DocumentId,
        generation: u64,
    },
    /// One request in flight
    Running { document_id: DocumentId },
    /// A request is in flight but the tracked document changed since it was
    /// submitted; resubmit as soon as it completes
    RunningStale { document_id: DocumentId },
}

/// What to do about a change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Start a debounce timer; only the latest generation may fire
    Arm { generation: u64, delay: Duration },
    /// Submit the active document now
    SubmitNow,
    /// The worker is busy; a follow-up is queued for when it finishes
    Deferred,
}

/// What to do with a result that just arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Apply the result to the current model
    pub apply: bool,
    /// Submit the active document again right away
    pub resubmit: bool,
}

#[derive(Debug)]
pub struct AnalysisScheduler {
    state: SchedulerState,
    generation: u64,
    /// Documents awaiting a result
    pending: HashSet<DocumentId>,
    debounce: Duration,
}

impl Default for AnalysisScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl AnalysisScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            generation: 0,
            pending: HashSet::new(),
            debounce,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            SchedulerState::Running { .. } | SchedulerState::RunningStale { .. }
        )
    }

    pub fn is_pending(&self, document_id: DocumentId) -> bool {
        self.pending.contains(&document_id)
    }

    /// A document changed (text edit, activation, content type).
    ///
    /// `immediate` bypasses the debounce, used when the active view switches.
    pub fn on_change(&mut self, document_id: DocumentId, immediate: bool) -> Schedule {
        match self.state {
            SchedulerState::Running { document_id: running }
            | SchedulerState::RunningStale {
                document_id: running,
            } => {
                self.state = SchedulerState::RunningStale {
                    document_id: running,
                };
                Schedule::Deferred
            }
            SchedulerState::Idle | SchedulerState::Debouncing { .. } => {
                // A new generation invalidates any armed timer
                self.generation += 1;
                if immediate {
                    self.state = SchedulerState::Idle;
                    Schedule::SubmitNow
                } else {
                    self.state = SchedulerState::Debouncing {
                        document_id,
                        generation: self.generation,
                    };
                    Schedule::Arm {
                        generation: self.generation,
                        delay: self.debounce,
                    }
                }
            }
        }
    }

    /// A debounce timer fired. Returns true if it is the current one and the
    /// active document should be submitted.
    pub fn on_timer(&mut self, generation: u64) -> bool {
        match self.state {
            SchedulerState::Debouncing {
                generation: armed, ..
            } if armed == generation => {
                self.state = SchedulerState::Idle;
                true
            }
            _ => {
                tracing::trace!("Ignoring superseded debounce timer {}", generation);
                false
            }
        }
    }

    /// A request for `document_id` was handed to the worker
    pub fn on_submitted(&mut self, document_id: DocumentId) {
        self.pending.insert(document_id);
        self.state = SchedulerState::Running { document_id };
    }

    /// The worker refused a request; forget it and fall back to a debounced
    /// retry.
    pub fn on_rejected(&mut self, document_id: DocumentId) -> Schedule {
        self.pending.remove(&document_id);
        self.state = SchedulerState::Idle;
        self.on_change(document_id, false)
    }

    /// Nothing to analyse (no active document or no analyzer). Drops any
    /// armed timer; an in-flight request is left to complete.
    pub fn cancel_pending_timer(&mut self) {
        if let SchedulerState::Debouncing { .. } = self.state {
            self.generation += 1;
            self.state = SchedulerState::Idle;
        }
    }

    /// A result arrived for `document_id`; `active` is the document shown now.
    ///
    /// A stale result for the active document is still applied, and
    /// `resubmit` asks for a fresh run on the latest text.
    pub fn on_completed(
        &mut self,
        document_id: DocumentId,
        active: Option<DocumentId>,
    ) -> Completion {
        self.pending.remove(&document_id);
        let apply = self.pending.is_empty() && active == Some(document_id);
        let resubmit = matches!(self.state, SchedulerState::RunningStale { .. });

        if self.is_running() {
            self.state = SchedulerState::Idle;
        }

        Completion { apply, resubmit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: DocumentId = DocumentId(1);
    const OTHER: DocumentId = DocumentId(2);

    fn scheduler() -> AnalysisScheduler {
        AnalysisScheduler::new(Duration::from_millis(1000))
    }

    #[test]
    fn test_change_arms_debounce() {
        let mut s = scheduler();
        let schedule = s.on_change(DOC, false);
        assert_eq!(
            schedule,
            Schedule::Arm {
                generation: 1,
                delay: Duration::from_millis(1000)
            }
        );
        assert_eq!(
            s.state(),
            SchedulerState::Debouncing {
                document_id: DOC,
                generation: 1
            }
        );
    }

    #[test]
    fn test_burst_only_latest_timer_fires() {
        let mut s = scheduler();
        for _ in 0..5 {
            s.on_change(DOC, false);
        }
        for generation in 1..5 {
            assert!(!s.on_timer(generation), "timer {} is superseded", generation);
        }
        assert!(s.on_timer(5));
        assert!(s.is_idle());
        // Firing twice is harmless
        assert!(!s.on_timer(5));
    }

    #[test]
    fn test_immediate_bypasses_timer() {
        let mut s = scheduler();
        s.on_change(DOC, false);
        assert_eq!(s.on_change(OTHER, true), Schedule::SubmitNow);
        // The armed timer is dead
        assert!(!s.on_timer(1));
    }

    #[test]
    fn test_change_while_running_marks_stale() {
        let mut s = scheduler();
        s.on_submitted(DOC);
        assert_eq!(s.on_change(DOC, false), Schedule::Deferred);
        assert_eq!(s.on_change(DOC, false), Schedule::Deferred);
        assert_eq!(s.state(), SchedulerState::RunningStale { document_id: DOC });

        // Shown now, replaced by the resubmitted run
        let completion = s.on_completed(DOC, Some(DOC));
        assert_eq!(
            completion,
            Completion {
                apply: true,
                resubmit: true
            }
        );
        assert!(s.is_idle());
    }

    #[test]
    fn test_result_for_inactive_document_is_discarded() {
        let mut s = scheduler();
        s.on_submitted(DOC);
        assert_eq!(s.on_change(OTHER, true), Schedule::Deferred);

        let completion = s.on_completed(DOC, Some(OTHER));
        assert!(!completion.apply);
        assert!(completion.resubmit);
        assert!(!s.is_pending(DOC));
    }

    #[test]
    fn test_result_applies_only_when_nothing_else_pending() {
        let mut s = scheduler();
        s.on_submitted(DOC);
        s.on_submitted(OTHER);
        assert!(!s.on_completed(DOC, Some(DOC)).apply);
        assert!(s.on_completed(OTHER, Some(OTHER)).apply);
    }

    #[test]
    fn test_rejected_submission_rearms() {
        let mut s = scheduler();
        s.on_submitted(DOC);
        let schedule = s.on_rejected(DOC);
        assert!(matches!(schedule, Schedule::Arm { .. }));
        assert!(!s.is_pending(DOC));
    }

    #[test]
    fn test_cancel_pending_timer() {
        let mut s = scheduler();
        s.on_change(DOC, false);
        s.cancel_pending_timer();
        assert!(s.is_idle());
        assert!(!s.on_timer(1));

        // Running requests are not affected
        s.on_submitted(DOC);
        s.cancel_pending_timer();
        assert!(s.is_running());
    }
}
