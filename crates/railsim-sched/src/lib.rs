//! `railsim-sched` — the virtual-time event scheduler.
//!
//! # Design
//!
//! Suspension is modeled as a "single worker consuming an event queue"
//! instead of building a custom `async` executor: every suspension a train
//! can perform reduces to "resume this train at tick `T`", pushed onto a
//! binary heap keyed by `(due_tick, insertion_sequence)`. `T == now` encodes
//! an immediate, FIFO-ordered resumption; `T == now + d` encodes a timed
//! wait. A train's own `TrainPhase` (owned by
//! `railsim-model`) records exactly where in its traversal it is, so the
//! scheduler itself only needs to know *who* to wake and *when* — it carries
//! no payload beyond an `AgentId`.
//!
//! This is a direct generalization of a sparse per-tick wake queue (a
//! `BTreeMap<Tick, Vec<AgentId>>`) to arbitrary future ticks with strict
//! insertion-order tie-breaking, which a fixed-tick-phase sweep wouldn't
//! need but a continuous-time simulator does.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use railsim_core::{AgentId, Tick};


#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct HeapEntry {
    due: Tick,
    seq: u64,
    agent: AgentId,
}

// `BinaryHeap` is a max-heap; reverse the comparison so the earliest
// `(due, seq)` pair is always on top.
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The virtual-time event scheduler.
#[derive(Default)]
pub struct Scheduler {
    now: Tick,
    seq: u64,
    heap: BinaryHeap<HeapEntry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current virtual time. Monotonically non-decreasing.
    pub fn now(&self) -> Tick {
        self.now
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Schedule `agent` to resume after `delay` ticks from now.
    pub fn schedule_after(&mut self, agent: AgentId, delay: u64) {
        let seq = self.next_seq();
        let due = self.now.offset(delay);
        tracing::trace!(?agent, ?due, "scheduling resumption");
        self.heap.push(HeapEntry { due, seq, agent });
    }

    /// Schedule `agent` to resume immediately (at the current tick), in
    /// FIFO order relative to any other immediate resumptions already
    /// scheduled this tick.
    pub fn schedule_now(&mut self, agent: AgentId) {
        self.schedule_after(agent, 0);
    }

    /// The due tick of the next pending resumption, without popping it.
    ///
    /// Intended for callers (e.g. `railsim-model::Model::run`) that need to
    /// drive their own loop around `pop_ready` because the resumption
    /// callback needs a mutable borrow of a container the `Scheduler` is
    /// itself a field of — using the bundled [`Scheduler::run`] there would
    /// require borrowing that container and its `scheduler` field mutably
    /// at once.
    pub fn peek_due(&self) -> Option<Tick> {
        self.heap.peek().map(|e| e.due)
    }

    /// Pop the next due `(tick, agent)` pair, if any, advancing `now` to its
    /// due tick. Returns `None` if the queue is empty.
    pub fn pop_ready(&mut self) -> Option<(Tick, AgentId)> {
        let entry = self.heap.pop()?;
        self.now = entry.due;
        Some((entry.due, entry.agent))
    }

    /// Advance `now` to `tick` without popping anything. No-op if `now` is
    /// already at or past `tick`. Lets a caller driving its own loop around
    /// `pop_ready` (because it can't use the bundled `run`, see
    /// `peek_due`'s doc) still match `run`'s "advance to `until` even if the
    /// queue drained early" behavior.
    pub fn advance_to(&mut self, tick: Tick) {
        if self.now < tick {
            self.now = tick;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drain the queue, calling `resume` for each `(tick, agent)` popped in
    /// due-order. If `until` is given, stops before popping any entry due
    /// after it and advances `now` to `until`; otherwise runs until the
    /// queue is empty.
    pub fn run(&mut self, until: Option<Tick>, mut resume: impl FnMut(&mut Scheduler, AgentId)) {
        loop {
            let Some(peek_due) = self.heap.peek().map(|e| e.due) else {
                break;
            };
            if let Some(bound) = until {
                if peek_due > bound {
                    break;
                }
            }
            let (_, agent) = self.pop_ready().expect("peeked non-empty heap");
            resume(self, agent);
        }
        if let Some(bound) = until {
            if self.now < bound {
                self.now = bound;
            }
        }
        tracing::debug!(now = ?self.now, "scheduler run halted");
    }
}
