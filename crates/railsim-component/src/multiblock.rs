//! `MultiBlockTrack`: a single edge modeled as `num_tracks` parallel tracks,
//! each divided into `num_blocks` sequential signal blocks. Trains advance
//! block-by-block, one train per block, maintaining a one-block headway
//! behind whatever is ahead of them on the same track.
//!
//! The block-advance algorithm below is exercised step-by-step in
//! `tests.rs` against a two-track, three-block scenario chosen to pin down
//! the exact semantics.

use railsim_core::{AgentId, CollectionId, ComponentId, RailError, RailResult, SimRng};
use railsim_resource::Resource;

use crate::collection::Collection;
use crate::component::Component;
use crate::context::{Direction, DwellStep, EntryContext};
use railsim_jitter::{Jitter, NoJitter};

#[derive(Debug, Clone, Copy)]
struct AgentState {
    track: usize,
    /// `None` until the agent has actually occupied block 0; `Some(p)` once
    /// it holds block `p`.
    position: Option<usize>,
    /// Set while the agent is parked on `resume_dwell`/`begin_dwell` waiting
    /// for the block ahead of it to clear.
    waiting: bool,
}

#[derive(Debug, Clone)]
struct TrackState {
    direction: Option<Direction>,
    blocks: Vec<Option<AgentId>>,
}

impl TrackState {
    fn occupant_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }

    fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_none())
    }
}

#[derive(Debug)]
pub struct MultiBlockTrack {
    uid: ComponentId,
    num_blocks: usize,
    block_traversal_time: u64,
    jitter: Box<dyn Jitter>,
    collection: Option<CollectionId>,
    resource: Resource,
    tracks: Vec<TrackState>,
    agents: std::collections::HashMap<AgentId, AgentState>,
}

impl MultiBlockTrack {
    pub fn new(
        uid: ComponentId,
        num_tracks: u32,
        num_blocks: u32,
        traversal_time: i64,
        jitter: Box<dyn Jitter>,
        collection: Option<CollectionId>,
    ) -> RailResult<Self> {
        if num_tracks == 0 {
            return Err(RailError::not_positive("num_tracks", num_tracks as f64));
        }
        if num_blocks == 0 {
            return Err(RailError::not_positive("num_blocks", num_blocks as f64));
        }
        if traversal_time < 0 {
            return Err(RailError::not_positive("traversal_time", traversal_time as f64));
        }
        let block_traversal_time = (traversal_time as u64).div_ceil(num_blocks as u64);
        let tracks = (0..num_tracks)
            .map(|_| TrackState { direction: None, blocks: vec![None; num_blocks as usize] })
            .collect();
        Ok(Self {
            uid,
            num_blocks: num_blocks as usize,
            block_traversal_time,
            jitter,
            collection,
            resource: Resource::new(num_tracks * num_blocks),
            tracks,
            agents: std::collections::HashMap::new(),
        })
    }

    pub fn with_defaults(uid: ComponentId, num_tracks: u32, num_blocks: u32, traversal_time: i64) -> RailResult<Self> {
        Self::new(uid, num_tracks, num_blocks, traversal_time, Box::new(NoJitter), None)
    }

    fn last_block(&self) -> usize {
        self.num_blocks - 1
    }

    /// A same-direction track remains joinable only while at least one full
    /// block's worth of headway is left beyond its current occupants — a
    /// train already queued behind `num_blocks - 1` others would have
    /// nowhere to advance into, so the next arrival must take a different
    /// track instead.
    fn same_direction_capacity(&self, track: &TrackState, direction: Direction) -> bool {
        track.direction == Some(direction) && track.occupant_count() < self.last_block()
    }

    fn select_track(&self, direction: Direction) -> Option<usize> {
        let best = self
            .tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| self.same_direction_capacity(t, direction))
            .min_by_key(|(_, t)| t.occupant_count());
        if let Some((i, _)) = best {
            return Some(i);
        }
        self.tracks.iter().position(|t| t.direction.is_none())
    }

    fn has_room(&self, direction: Direction) -> bool {
        self.tracks.iter().any(|t| self.same_direction_capacity(t, direction)) || self.tracks.iter().any(|t| t.direction.is_none())
    }

    fn block_delay(&self, rng: &mut SimRng) -> u64 {
        let jitter = self.jitter.sample(rng) / self.num_blocks as f64;
        (self.block_traversal_time as f64 + jitter).round().max(0.0) as u64
    }

    /// Shared by `begin_dwell` (`position == None`) and `resume_dwell`
    /// (`position == Some(_)`): try to advance one block, or report that the
    /// agent is finished once it has traversed the last one.
    fn step(&mut self, agent: AgentId, rng: &mut SimRng) -> DwellStep {
        let (track, position) = {
            let st = self.agents.get(&agent).expect("agent not registered on MultiBlockTrack");
            (st.track, st.position)
        };
        if let Some(p) = position {
            if p == self.last_block() {
                return DwellStep::done();
            }
        }
        let target = position.map_or(0, |p| p + 1);

        if self.tracks[track].blocks[target].is_some() {
            if let Some(st) = self.agents.get_mut(&agent) {
                st.waiting = true;
            }
            return DwellStep::wait_for_clear();
        }

        self.tracks[track].blocks[target] = Some(agent);
        if let Some(p) = position {
            self.tracks[track].blocks[p] = None;
        }
        if let Some(st) = self.agents.get_mut(&agent) {
            st.position = Some(target);
            st.waiting = false;
        }

        let mut step = DwellStep::continue_after(self.block_delay(rng));

        if let Some(p) = position {
            if p == 0 {
                step = step.with_requeue(true);
            }
            // Wake whichever agent (if any) was waiting specifically for
            // the block just vacated: either the occupant of the block
            // immediately behind it on the same track (trying to advance
            // into `p`), or — when `p == 0` — a brand-new entrant that
            // found the entry block occupied and is still waiting outside.
            let trailing = self
                .agents
                .iter()
                .find(|(&a, s)| a != agent && s.track == track && s.waiting && s.position.map_or(0, |q| q + 1) == p)
                .map(|(&a, _)| a);
            if let Some(trailing) = trailing {
                if let Some(s) = self.agents.get_mut(&trailing) {
                    s.waiting = false;
                }
                step = step.with_notify(trailing);
            }
        }
        step
    }
}

impl Component for MultiBlockTrack {
    fn uid(&self) -> ComponentId {
        self.uid
    }

    fn type_name(&self) -> &'static str {
        "MultiBlockTrack"
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    fn collection(&self) -> Option<CollectionId> {
        self.collection
    }

    fn can_accept_agent(
        &self,
        agent: AgentId,
        ctx: &EntryContext,
        collections: &dyn Fn(CollectionId) -> Option<&dyn Collection>,
    ) -> bool {
        let direction = ctx.direction.expect("MultiBlockTrack requires EntryContext::direction");
        if !self.has_room(direction) {
            return false;
        }
        match self.collection {
            None => true,
            Some(cid) => collections(cid).is_some_and(|c| c.can_accept_agent(agent, ctx.same_zone)),
        }
    }

    fn accept_agent(
        &mut self,
        agent: AgentId,
        ctx: &EntryContext,
        collections: &mut dyn FnMut(CollectionId) -> Option<&mut dyn Collection>,
    ) {
        let direction = ctx.direction.expect("MultiBlockTrack requires EntryContext::direction");
        let track = self.select_track(direction).expect("admission predicate passed but no track was selectable");
        self.tracks[track].direction = Some(direction);
        self.agents.insert(agent, AgentState { track, position: None, waiting: false });
        if let Some(cid) = self.collection {
            if let Some(c) = collections(cid) {
                c.accept_agent(agent, ctx.same_zone);
            }
        }
    }

    fn release_agent(
        &mut self,
        agent: AgentId,
        same_zone: bool,
        collections: &mut dyn FnMut(CollectionId) -> Option<&mut dyn Collection>,
    ) -> DwellStep {
        let st = self.agents.remove(&agent).expect("release_agent called for an unregistered MultiBlockTrack agent");
        let p = st.position.expect("release_agent called before the agent ever occupied a block");
        assert_eq!(p, self.last_block(), "release_agent called before the agent reached the last block");
        self.tracks[st.track].blocks[p] = None;
        if self.tracks[st.track].is_empty() {
            self.tracks[st.track].direction = None;
        }
        let mut step = DwellStep::default();
        if p == 0 {
            step = step.with_requeue(true);
        }
        // Same trailing-waiter handoff as `step()`: whichever agent on this
        // track was parked in `WaitForClear` immediately behind the block
        // just vacated can now advance into it.
        let trailing = self
            .agents
            .iter()
            .find(|(_, s)| s.track == st.track && s.waiting && s.position.map_or(0, |q| q + 1) == p)
            .map(|(&a, _)| a);
        if let Some(trailing) = trailing {
            if let Some(s) = self.agents.get_mut(&trailing) {
                s.waiting = false;
            }
            step = step.with_notify(trailing);
        }
        if let Some(cid) = self.collection {
            if let Some(c) = collections(cid) {
                step.requeue_agent = c.release_agent(agent, same_zone).requeue_agent;
            }
        }
        step
    }

    fn begin_dwell(&mut self, agent: AgentId, rng: &mut SimRng) -> DwellStep {
        self.step(agent, rng)
    }

    fn resume_dwell(&mut self, agent: AgentId, rng: &mut SimRng) -> DwellStep {
        self.step(agent, rng)
    }
}
