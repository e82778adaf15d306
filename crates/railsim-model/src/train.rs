//! The `Train` agent: an explicit state machine standing in for a
//! cooperative coroutine, since the run loop has no async executor.
//! `Model::resume` is the step function; this module only holds the
//! per-train state that step function reads and writes.

use railsim_core::{AgentId, Tick};
use railsim_route::ResolvedSegment;

/// What a dwelling train is waiting for next, set whenever
/// [`crate::Model`] hands a train's component a `DwellStep` with an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellWake {
    /// The pending timer, once it fires, finishes the dwell outright
    /// (component returned `DwellAction::Wait`).
    Finishing,
    /// The pending timer or notification, once it fires, must call
    /// `resume_dwell` again (component returned `DwellAction::Continue` or
    /// `DwellAction::WaitForClear`).
    Resuming,
}

/// Which suspension point a train is currently parked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainPhase {
    /// Waiting for `segments[pending_index].arrival`, or about to request
    /// entry immediately if unset.
    AwaitingArrival,
    /// Enqueued on `segments[pending_index]`'s resource, waiting to reach
    /// the head of the queue and pass the admission predicate. Not driven
    /// by the scheduler: retried whenever some other event calls
    /// `Model::drain_resource_queue` on this component.
    AwaitingEntry,
    /// Occupying `segments[current_index]`, dwelling. `dwell_wake` records
    /// what the next wake (timer or notify) should do.
    Dwelling,
    /// Dwell finished; waiting for `segments[current_index].departure`
    /// before releasing the slot and advancing.
    AwaitingDeparture,
    /// Released its final segment; no longer scheduled.
    Done,
}

#[derive(Debug)]
pub struct Train {
    pub uid: AgentId,
    pub name: String,
    pub max_speed: f64,
    pub segments: Vec<ResolvedSegment>,
    /// Index into `segments` of the component currently occupied, or
    /// `None` before the first admission / after the final release.
    pub current_index: Option<usize>,
    /// Index into `segments` of the component being requested or dwelt in.
    /// Equals `current_index` once admitted; the segment one past it while
    /// still queued to enter.
    pub pending_index: usize,
    pub phase: TrainPhase,
    pub dwell_wake: Option<DwellWake>,
    /// `tour.creation_time`, used as a floor on the first arrival hold (see
    /// `DESIGN.md`'s resolution of the creation/deletion_time open
    /// question).
    pub creation_time: Tick,
}

impl Train {
    pub fn new(uid: AgentId, name: String, max_speed: f64, segments: Vec<ResolvedSegment>, creation_time: Tick) -> Self {
        Self {
            uid,
            name,
            max_speed,
            segments,
            current_index: None,
            pending_index: 0,
            phase: TrainPhase::AwaitingArrival,
            dwell_wake: None,
            creation_time,
        }
    }

    pub fn pending_segment(&self) -> ResolvedSegment {
        self.segments[self.pending_index]
    }

    pub fn current_segment(&self) -> Option<ResolvedSegment> {
        self.current_index.map(|i| self.segments[i])
    }

    pub fn is_last_segment(&self, index: usize) -> bool {
        index + 1 == self.segments.len()
    }
}
