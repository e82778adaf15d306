//! Small value types threaded between `Train`/`Model` and `Component` calls,
//! carrying exactly the outside information a component's admission or
//! dwell logic needs without giving components access to the train registry
//! or route graph directly.

use railsim_core::AgentId;

/// The direction an agent is travelling through a `MultiBlockTrack`, derived
/// by the caller from the agent's previous and next segments versus the
/// component's edge endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Travelling from the edge's `u` endpoint towards `v`.
    Forward,
    /// Travelling from `v` towards `u`.
    Reverse,
}

/// Context supplied by the caller at admission/acceptance time, carrying
/// the pieces of route state that only a couple of component variants need.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryContext {
    /// Needed by `MultiBlockTrack` to determine which tracks are eligible.
    pub direction: Option<Direction>,
    /// Needed by `MultiTrackStation`: true iff the route segment for this
    /// component has a non-null `departure`.
    pub stopping: bool,
    /// True iff the agent's previous component belongs to the same
    /// Collection as this one — an internal move, which every Collection
    /// must accept unconditionally. Only `railsim-model::Model` can compute
    /// this (it is the only thing holding both components), so it is
    /// threaded in here rather than guessed at by the component itself.
    pub same_zone: bool,
}

/// What a component wants to happen next after `begin_dwell`/`resume_dwell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellAction {
    /// Schedule the agent to resume after `0` delay ticks; once elapsed, the
    /// dwell is complete (used by every single-shot component).
    Wait(u64),
    /// Schedule the agent to resume after the given delay; once elapsed,
    /// call `resume_dwell` again rather than treating the dwell as done
    /// (used by `MultiBlockTrack`, which advances block-by-block).
    Continue(u64),
    /// The component itself will notify the caller (via a future `notify`
    /// list) when this agent should resume; the caller must not schedule
    /// anything for it now.
    WaitForClear,
    /// The in-component activity is finished right now.
    Done,
}

/// The full result of a `begin_dwell`/`resume_dwell` call: the action to
/// take for the calling agent, plus any other agents the component wants
/// woken as a side effect, plus whether the caller should re-run
/// `process_queue` on this component's resource.
#[derive(Debug, Clone, Default)]
pub struct DwellStep {
    pub action: Option<DwellAction>,
    pub notify: Vec<AgentId>,
    pub requeue: bool,
    /// An agent parked in some *other* component's entry queue (not
    /// necessarily this one) that a Collection release just made eligible.
    /// Distinct from `notify`: that agent is still waiting to be admitted,
    /// not mid-dwell, so it must be retried via its own resource queue
    /// rather than woken as if it were dwelling.
    pub requeue_agent: Option<AgentId>,
}

impl DwellStep {
    pub fn wait(delay: u64) -> Self {
        Self { action: Some(DwellAction::Wait(delay)), ..Default::default() }
    }

    pub fn continue_after(delay: u64) -> Self {
        Self { action: Some(DwellAction::Continue(delay)), ..Default::default() }
    }

    pub fn wait_for_clear() -> Self {
        Self { action: Some(DwellAction::WaitForClear), ..Default::default() }
    }

    pub fn done() -> Self {
        Self { action: Some(DwellAction::Done), ..Default::default() }
    }

    pub fn with_notify(mut self, agent: AgentId) -> Self {
        self.notify.push(agent);
        self
    }

    pub fn with_requeue(mut self, requeue: bool) -> Self {
        self.requeue = requeue;
        self
    }
}

/// Result of releasing an agent from a `Collection`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionReleaseOutcome {
    /// If set, the caller should look up this agent's intended next
    /// component (from its upcoming route segment) and retry admission on
    /// that component's resource queue.
    pub requeue_agent: Option<AgentId>,
}
