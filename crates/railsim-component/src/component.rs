//! The `Component` capability: the tagged-variant interface every track,
//! station, crossover, and yard implements. One capability trait with a
//! handful of concrete implementors, a context value threaded through
//! rather than global state.

use railsim_core::{AgentId, CollectionId, ComponentId, SimRng};
use railsim_resource::Resource;

use crate::collection::Collection;
use crate::context::{DwellStep, EntryContext};

/// A physical infrastructure element a train occupies for some duration.
///
/// `can_accept_agent`/`accept_agent`/`release_agent` take `collections` so
/// a component that belongs to one can defer to it, mirroring
/// `BaseComponent.accept_agent`/`release_agent`'s "acceptance into the
/// component means acceptance into the collection" behavior.
pub trait Component: std::fmt::Debug + 'static {
    fn uid(&self) -> ComponentId;

    /// Lets `railsim-model::Model` downcast to the couple of variants
    /// (`PhysicsTrack`, `DynamicHeadwayStation`) whose `begin_dwell` needs
    /// extra arguments the trait method has no room for.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    /// The type name used in CSV/log output and round-tripped config, e.g.
    /// `"TimedTrack"`.
    fn type_name(&self) -> &'static str;

    fn resource(&self) -> &Resource;
    fn resource_mut(&mut self) -> &mut Resource;

    fn collection(&self) -> Option<CollectionId>;

    /// Whether `agent` is eligible to enter, beyond raw resource capacity
    /// (already checked by the caller). Default: defer to the collection,
    /// if any; otherwise admit unconditionally.
    fn can_accept_agent(
        &self,
        agent: AgentId,
        ctx: &EntryContext,
        collections: &dyn Fn(CollectionId) -> Option<&dyn Collection>,
    ) -> bool {
        match self.collection() {
            None => true,
            Some(cid) => collections(cid).is_some_and(|c| c.can_accept_agent(agent, ctx.same_zone)),
        }
    }

    /// Called exactly once, at the moment admission is granted. Components
    /// with no collection and no extra bookkeeping can rely on the default,
    /// which does nothing; variants with internal state (e.g.
    /// `MultiBlockTrack`'s track assignment) override this.
    fn accept_agent(
        &mut self,
        agent: AgentId,
        ctx: &EntryContext,
        collections: &mut dyn FnMut(CollectionId) -> Option<&mut dyn Collection>,
    ) {
        if let Some(cid) = self.collection() {
            if let Some(c) = collections(cid) {
                c.accept_agent(agent, ctx.same_zone);
            }
        }
    }

    /// Called when the agent gives up its slot here, either because it is
    /// moving to `entering` (the component it is transferring into) or
    /// because it has finished its tour (`entering == None`).
    ///
    /// Resolves the Open Question around `current_segment.next` staleness:
    /// rather than read the entering component off the agent's own state
    /// (which the caller may not have updated yet), the caller resolves
    /// `same_zone` itself — it is the only thing holding both the departing
    /// and entering components — and passes the flag straight through.
    fn release_agent(
        &mut self,
        agent: AgentId,
        same_zone: bool,
        collections: &mut dyn FnMut(CollectionId) -> Option<&mut dyn Collection>,
    ) -> DwellStep {
        let mut step = DwellStep::default();
        if let Some(cid) = self.collection() {
            if let Some(c) = collections(cid) {
                step.requeue_agent = c.release_agent(agent, same_zone).requeue_agent;
            }
        }
        step
    }

    /// Start the in-component dwell for a freshly-accepted agent.
    fn begin_dwell(&mut self, agent: AgentId, rng: &mut SimRng) -> DwellStep;

    /// Resume a dwell in progress, called only when the previous
    /// `DwellAction` was `Continue` (timeout elapsed) or `WaitForClear`
    /// (woken by another agent's `notify`). Default panics: only
    /// components that ever return `Continue`/`WaitForClear` need this.
    fn resume_dwell(&mut self, agent: AgentId, rng: &mut SimRng) -> DwellStep {
        let _ = (agent, rng);
        unreachable!("{} never returns Continue/WaitForClear from begin_dwell", self.type_name())
    }
}
