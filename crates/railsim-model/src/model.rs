//! The `Model`: owns every component, collection, route, tour and train,
//! plus the scheduler and RNG, and drives the run loop. Rather than a fixed
//! tick-phase loop, it steps one agent at a time off `railsim-sched`'s
//! priority queue — see `train.rs` for why (no async, an explicit
//! `TrainPhase` per agent).

use rustc_hash::FxHashMap;

use railsim_component::{Collection, Component, DwellAction, DwellStep, DynamicHeadwayStation, EntryContext, PhysicsModel, PhysicsTrack};
use railsim_core::{AgentId, CollectionId, ComponentId, RailResult, SimRng, Tick};
use railsim_sched::Scheduler;

use crate::observer::EventObserver;
use crate::train::{DwellWake, Train, TrainPhase};

#[derive(Debug, Clone)]
pub(crate) struct ComponentMeta {
    pub uid: String,
    pub u: String,
    pub v: String,
}

enum EventKind {
    Enter,
    Exit,
}

struct OutEvent {
    now: Tick,
    train_uid: String,
    component_uid: String,
    component_type: &'static str,
    kind: EventKind,
}

/// The whole simulated railway: infrastructure, agents, and the clock that
/// drives them. Build one with [`crate::ModelBuilder`].
pub struct Model {
    pub(crate) components: Vec<Box<dyn Component>>,
    pub(crate) meta: Vec<ComponentMeta>,
    pub(crate) component_index: FxHashMap<(String, String, u32), ComponentId>,
    pub(crate) collections: Vec<Box<dyn Collection>>,
    pub(crate) trains: Vec<Train>,
    pub(crate) train_index: FxHashMap<String, AgentId>,
    pub(crate) scheduler: Scheduler,
    pub(crate) rng: SimRng,
    pub(crate) physics_model: Box<dyn PhysicsModel>,
    events: Vec<OutEvent>,
}

impl Model {
    pub fn now(&self) -> Tick {
        self.scheduler.now()
    }

    pub fn train_by_name(&self, name: &str) -> Option<&Train> {
        self.train_index.get(name).map(|&agent| &self.trains[agent.index()])
    }

    pub fn component_by_uid(&self, u: &str, v: &str, key: u32) -> Option<ComponentId> {
        self.component_index.get(&(u.to_string(), v.to_string(), key)).copied()
    }

    /// Activate every train: each begins waiting on its first segment's
    /// arrival hold (or requests entry immediately if it has none).
    pub fn start(&mut self) {
        for index in 0..self.trains.len() {
            let agent = AgentId(index as u32);
            if self.trains[agent.index()].segments.is_empty() {
                continue;
            }
            self.begin_arrival_hold(agent);
        }
    }

    /// Advance the simulation. With `until: None`, drains every scheduled
    /// event; with `Some(tick)`, stops once the next due event exceeds
    /// `tick`, advancing the clock to `tick` regardless (matching
    /// `railsim_sched::Scheduler::run`'s behavior). Calling `run` again
    /// later resumes exactly where the previous call left off.
    pub fn run<O: EventObserver>(&mut self, until: Option<Tick>, observer: &mut O) -> RailResult<()> {
        tracing::debug!(until = ?until, "model run starting");
        loop {
            let Some(due) = self.scheduler.peek_due() else { break };
            if let Some(bound) = until {
                if due > bound {
                    break;
                }
            }
            let (_, agent) = self.scheduler.pop_ready().expect("peek_due just confirmed a ready entry");
            self.resume(agent)?;
            for event in self.events.drain(..) {
                match event.kind {
                    EventKind::Enter => observer.on_enter(event.now, &event.train_uid, &event.component_uid, event.component_type),
                    EventKind::Exit => observer.on_exit(event.now, &event.train_uid, &event.component_uid, event.component_type),
                }
            }
        }
        if let Some(bound) = until {
            self.scheduler.advance_to(bound);
        }
        tracing::debug!(now = ?self.scheduler.now(), "model run halted");
        observer.on_run_end(self.scheduler.now());
        Ok(())
    }

    // --- dispatch -----------------------------------------------------

    fn resume(&mut self, agent: AgentId) -> RailResult<()> {
        match self.trains[agent.index()].phase {
            TrainPhase::AwaitingArrival => self.begin_entry(agent),
            TrainPhase::Dwelling => self.continue_dwell(agent),
            TrainPhase::AwaitingDeparture => self.advance(agent),
            // Never scheduled directly: a queued request is retried only
            // from `drain_resource_queue`, triggered by some other event.
            TrainPhase::AwaitingEntry | TrainPhase::Done => Ok(()),
        }
    }

    fn begin_arrival_hold(&mut self, agent: AgentId) {
        let now = self.scheduler.now();
        let train = &self.trains[agent.index()];
        let segment = train.pending_segment();
        let floor = if train.current_index.is_none() { train.creation_time } else { Tick::ZERO };
        let earliest = match segment.arrival {
            Some(arrival) => std::cmp::max(arrival, floor),
            None => floor,
        };
        self.trains[agent.index()].phase = TrainPhase::AwaitingArrival;
        if earliest > now {
            self.scheduler.schedule_after(agent, earliest.since(now));
        } else {
            self.scheduler.schedule_now(agent);
        }
    }

    fn begin_entry(&mut self, agent: AgentId) -> RailResult<()> {
        let component = self.trains[agent.index()].pending_segment().component;
        self.trains[agent.index()].phase = TrainPhase::AwaitingEntry;
        self.components[component.index()].resource_mut().enqueue(agent);
        self.drain_resource_queue(component)
    }

    /// Admit agents off `component`'s resource queue for as long as the
    /// front of the queue keeps passing the admission predicate — stopping
    /// at the first refusal, never skipping ahead in the queue.
    fn drain_resource_queue(&mut self, component: ComponentId) -> RailResult<()> {
        loop {
            let Some(agent) = self.components[component.index()].resource().front() else { break };
            if !self.components[component.index()].resource().has_capacity() {
                break;
            }
            let segment_index = self.trains[agent.index()].pending_index;
            let ctx = self.entry_context(agent, component, segment_index);

            if !ctx.same_zone {
                if let Some(cid) = self.components[component.index()].collection() {
                    self.collections[cid.index()].enqueue_waiter(agent);
                }
            }

            let can_accept = {
                let collections = &self.collections;
                self.components[component.index()]
                    .can_accept_agent(agent, &ctx, &|cid: CollectionId| collections.get(cid.index()).map(|c| c.as_ref()))
            };
            if !can_accept {
                tracing::trace!(?agent, ?component, "admission refused, holding queue");
                break;
            }

            self.components[component.index()].resource_mut().admit_front();
            tracing::trace!(?agent, ?component, now = ?self.scheduler.now(), "admission granted");
            self.on_admitted(agent, component, ctx)?;
        }
        Ok(())
    }

    /// Accept into the new component before releasing the old one, then
    /// start the dwell. Acquire-before-release is a hard invariant —
    /// reversing this order would let a collection momentarily see neither
    /// component as occupying it.
    fn on_admitted(&mut self, agent: AgentId, new_component: ComponentId, ctx: EntryContext) -> RailResult<()> {
        {
            let collections = &mut self.collections;
            self.components[new_component.index()]
                .accept_agent(agent, &ctx, &mut |cid: CollectionId| collections.get_mut(cid.index()).map(|c| c.as_mut()));
        }
        self.emit_enter(new_component, agent);

        let prev_component = self.trains[agent.index()]
            .current_index
            .map(|index| self.trains[agent.index()].segments[index].component);

        if let Some(prev) = prev_component {
            let step = {
                let collections = &mut self.collections;
                self.components[prev.index()]
                    .release_agent(agent, ctx.same_zone, &mut |cid: CollectionId| collections.get_mut(cid.index()).map(|c| c.as_mut()))
            };
            self.components[prev.index()].resource_mut().remove_user(agent);
            self.emit_exit(prev, agent);
            self.apply_side_effects(prev, step)?;
            // Releasing a user frees a resource slot regardless of whether
            // the component itself asked for a requeue; always retry this
            // resource's own queue.
            self.drain_resource_queue(prev)?;
        }

        {
            let train = &mut self.trains[agent.index()];
            train.current_index = Some(train.pending_index);
            train.phase = TrainPhase::Dwelling;
        }

        let step = self.begin_dwell_for(new_component, agent)?;
        self.apply_dwell_result(new_component, agent, step)
    }

    fn continue_dwell(&mut self, agent: AgentId) -> RailResult<()> {
        let component = self.trains[agent.index()].current_segment().expect("dwelling train has no current segment").component;
        let wake = self.trains[agent.index()].dwell_wake.take().expect("dwelling train resumed without a pending wake");
        match wake {
            DwellWake::Finishing => {
                self.finish_dwell(agent);
                Ok(())
            }
            DwellWake::Resuming => {
                let step = self.components[component.index()].resume_dwell(agent, &mut self.rng);
                self.apply_dwell_result(component, agent, step)
            }
        }
    }

    fn begin_dwell_for(&mut self, component: ComponentId, agent: AgentId) -> RailResult<DwellStep> {
        let max_speed = self.trains[agent.index()].max_speed;
        let now = self.scheduler.now();
        let physics_model = self.physics_model.as_ref();
        let comp = &mut self.components[component.index()];
        if let Some(track) = comp.as_any_mut().downcast_mut::<PhysicsTrack>() {
            return track.begin_dwell_with(physics_model, max_speed, &mut self.rng);
        }
        if let Some(station) = comp.as_any_mut().downcast_mut::<DynamicHeadwayStation>() {
            return Ok(station.begin_dwell_at(now, &mut self.rng));
        }
        Ok(comp.begin_dwell(agent, &mut self.rng))
    }

    /// `step.notify` wakes agents already dwelling elsewhere; `step.requeue`
    /// retries `component`'s own entry queue; `step.requeue_agent` retries a
    /// specific agent's entry queue, which a `Collection` release may need
    /// to target a component other than the one just released (the waiter
    /// could be parked on any member of the collection).
    fn apply_side_effects(&mut self, component: ComponentId, step: DwellStep) -> RailResult<()> {
        for other in step.notify {
            self.trains[other.index()].dwell_wake = Some(DwellWake::Resuming);
            self.scheduler.schedule_now(other);
        }
        if step.requeue {
            self.drain_resource_queue(component)?;
        }
        if let Some(waiter) = step.requeue_agent {
            let waiting_component = self.trains[waiter.index()].pending_segment().component;
            self.drain_resource_queue(waiting_component)?;
        }
        Ok(())
    }

    fn apply_dwell_result(&mut self, component: ComponentId, agent: AgentId, step: DwellStep) -> RailResult<()> {
        let action = step.action;
        self.apply_side_effects(component, step)?;
        match action {
            Some(DwellAction::Wait(delay)) => {
                self.trains[agent.index()].dwell_wake = Some(DwellWake::Finishing);
                self.scheduler.schedule_after(agent, delay);
            }
            Some(DwellAction::Continue(delay)) => {
                self.trains[agent.index()].dwell_wake = Some(DwellWake::Resuming);
                self.scheduler.schedule_after(agent, delay);
            }
            Some(DwellAction::WaitForClear) => {
                self.trains[agent.index()].dwell_wake = None;
            }
            Some(DwellAction::Done) | None => {
                self.finish_dwell(agent);
            }
        }
        Ok(())
    }

    fn finish_dwell(&mut self, agent: AgentId) {
        let now = self.scheduler.now();
        let train = &mut self.trains[agent.index()];
        let segment = train.current_segment().expect("finish_dwell with no current segment");
        train.phase = TrainPhase::AwaitingDeparture;
        match segment.departure {
            Some(departure) if departure > now => self.scheduler.schedule_after(agent, departure.since(now)),
            _ => self.scheduler.schedule_now(agent),
        }
    }

    /// Release the slot just left behind and either enter the next
    /// segment's arrival hold, or (on the last segment) terminate.
    fn advance(&mut self, agent: AgentId) -> RailResult<()> {
        let current_index = self.trains[agent.index()].current_index.expect("advance called before occupying any segment");
        if self.trains[agent.index()].is_last_segment(current_index) {
            let component = self.trains[agent.index()].segments[current_index].component;
            let step = {
                let collections = &mut self.collections;
                self.components[component.index()]
                    .release_agent(agent, false, &mut |cid: CollectionId| collections.get_mut(cid.index()).map(|c| c.as_mut()))
            };
            self.components[component.index()].resource_mut().remove_user(agent);
            self.emit_exit(component, agent);
            self.apply_side_effects(component, step)?;
            self.drain_resource_queue(component)?;
            let train = &mut self.trains[agent.index()];
            train.current_index = None;
            train.phase = TrainPhase::Done;
        } else {
            let train = &mut self.trains[agent.index()];
            train.pending_index = current_index + 1;
            self.begin_arrival_hold(agent);
        }
        Ok(())
    }

    // --- entry context --------------------------------------------------

    fn entry_context(&self, agent: AgentId, component: ComponentId, segment_index: usize) -> EntryContext {
        let train = &self.trains[agent.index()];
        let segment = train.segments[segment_index];
        let stopping = segment.departure.is_some();
        let direction = Some(self.direction_for(train, segment_index));
        let same_zone = match (train.current_index, self.components[component.index()].collection()) {
            (Some(prev_index), Some(new_cid)) => {
                let prev_component = train.segments[prev_index].component;
                self.components[prev_component.index()].collection() == Some(new_cid)
            }
            _ => false,
        };
        EntryContext { direction, stopping, same_zone }
    }

    fn edge_touches(&self, component: ComponentId, node: &str) -> bool {
        let m = &self.meta[component.index()];
        m.u == node || m.v == node
    }

    /// Derives travel direction from whichever neighbouring segment exists
    /// (previous, then next). A lone segment with no neighbour on either
    /// side defaults to `Forward`.
    fn direction_for(&self, train: &Train, index: usize) -> railsim_component::Direction {
        use railsim_component::Direction;
        let m = self.meta[train.segments[index].component.index()].clone();
        if index > 0 {
            let prev = train.segments[index - 1].component;
            if self.edge_touches(prev, &m.u) {
                return Direction::Forward;
            }
            if self.edge_touches(prev, &m.v) {
                return Direction::Reverse;
            }
        }
        if index + 1 < train.segments.len() {
            let next = train.segments[index + 1].component;
            if self.edge_touches(next, &m.v) {
                return Direction::Forward;
            }
            if self.edge_touches(next, &m.u) {
                return Direction::Reverse;
            }
        }
        Direction::Forward
    }

    // --- events ---------------------------------------------------------

    fn emit_enter(&mut self, component: ComponentId, agent: AgentId) {
        let train_uid = self.trains[agent.index()].name.clone();
        let m = &self.meta[component.index()];
        let component_type = self.components[component.index()].type_name();
        self.events.push(OutEvent {
            now: self.scheduler.now(),
            train_uid,
            component_uid: m.uid.clone(),
            component_type,
            kind: EventKind::Enter,
        });
    }

    fn emit_exit(&mut self, component: ComponentId, agent: AgentId) {
        let train_uid = self.trains[agent.index()].name.clone();
        let m = &self.meta[component.index()];
        let component_type = self.components[component.index()].type_name();
        self.events.push(OutEvent {
            now: self.scheduler.now(),
            train_uid,
            component_uid: m.uid.clone(),
            component_type,
            kind: EventKind::Exit,
        });
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("now", &self.scheduler.now())
            .field("components", &self.components.len())
            .field("collections", &self.collections.len())
            .field("trains", &self.trains.len())
            .finish()
    }
}

