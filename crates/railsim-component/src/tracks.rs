//! Fixed-duration track components: `TimedTrack`, `SimpleCrossover`, and
//! the opaque-traversal `PhysicsTrack`.

use railsim_core::{AgentId, CollectionId, ComponentId, RailError, RailResult, SimRng};
use railsim_resource::Resource;

use crate::component::Component;
use crate::context::DwellStep;
use railsim_jitter::{Jitter, NoJitter};

/// A fixed `traversal_time` plus jitter, first-come-first-served.
#[derive(Debug)]
pub struct TimedTrack {
    uid: ComponentId,
    traversal_time: u64,
    jitter: Box<dyn Jitter>,
    collection: Option<CollectionId>,
    resource: Resource,
}

impl TimedTrack {
    pub fn new(
        uid: ComponentId,
        traversal_time: i64,
        capacity: u32,
        jitter: Box<dyn Jitter>,
        collection: Option<CollectionId>,
    ) -> RailResult<Self> {
        if traversal_time < 0 {
            return Err(RailError::not_positive("traversal_time", traversal_time as f64));
        }
        if capacity == 0 {
            return Err(RailError::not_positive("capacity", capacity as f64));
        }
        Ok(Self {
            uid,
            traversal_time: traversal_time as u64,
            jitter,
            collection,
            resource: Resource::new(capacity),
        })
    }

    pub fn with_defaults(uid: ComponentId, traversal_time: i64) -> RailResult<Self> {
        Self::new(uid, traversal_time, 1, Box::new(NoJitter), None)
    }

    pub fn traversal_time(&self) -> u64 {
        self.traversal_time
    }
}

impl Component for TimedTrack {
    fn uid(&self) -> ComponentId {
        self.uid
    }

    fn type_name(&self) -> &'static str {
        "TimedTrack"
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

    fn begin_dwell(&mut self, _agent: AgentId, rng: &mut SimRng) -> DwellStep {
        let delay = (self.traversal_time as f64 + self.jitter.sample(rng)).round().max(0.0) as u64;
        DwellStep::wait(delay)
    }
}

/// Identical shape to `TimedTrack`, fixed at capacity 1 — used for
/// switch/crossover infrastructure.
#[derive(Debug)]
pub struct SimpleCrossover {
    uid: ComponentId,
    traversal_time: u64,
    jitter: Box<dyn Jitter>,
    collection: Option<CollectionId>,
    resource: Resource,
}

impl SimpleCrossover {
    pub fn new(
        uid: ComponentId,
        traversal_time: i64,
        jitter: Box<dyn Jitter>,
        collection: Option<CollectionId>,
    ) -> RailResult<Self> {
        if traversal_time < 0 {
            return Err(RailError::not_positive("traversal_time", traversal_time as f64));
        }
        Ok(Self {
            uid,
            traversal_time: traversal_time as u64,
            jitter,
            collection,
            resource: Resource::new(1),
        })
    }
}

impl Component for SimpleCrossover {
    fn uid(&self) -> ComponentId {
        self.uid
    }

    fn type_name(&self) -> &'static str {
        "SimpleCrossover"
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

    fn begin_dwell(&mut self, _agent: AgentId, rng: &mut SimRng) -> DwellStep {
        let delay = (self.traversal_time as f64 + self.jitter.sample(rng)).round().max(0.0) as u64;
        DwellStep::wait(delay)
    }
}

/// Pluggable acceleration/deceleration model for `PhysicsTrack`, injected
/// into the `Model` at construction: an explicit extension point rather
/// than a guessed formula, since traversal physics are caller-specific.
pub trait PhysicsModel: std::fmt::Debug {
    /// Compute the traversal time, in ticks, for a train (identified by its
    /// current max speed) crossing a track of the given length at the
    /// given top speed.
    fn traversal_ticks(&self, length: f64, track_speed: f64, agent_max_speed: f64) -> RailResult<u64>;
}

/// Default `PhysicsModel`: no acceleration model is supplied, so any
/// attempt to traverse a `PhysicsTrack` fails with `RailError::Invariant`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedPhysicsModel;

impl PhysicsModel for UnimplementedPhysicsModel {
    fn traversal_ticks(&self, _length: f64, _track_speed: f64, _agent_max_speed: f64) -> RailResult<u64> {
        Err(RailError::Invariant(
            "PhysicsTrack traversal requires a PhysicsModel; none was supplied".into(),
        ))
    }
}

/// Capacity-1 track whose traversal time is delegated to an injected
/// `PhysicsModel` rather than computed from a fixed `traversal_time`.
#[derive(Debug)]
pub struct PhysicsTrack {
    uid: ComponentId,
    length: f64,
    track_speed: f64,
    jitter: Box<dyn Jitter>,
    collection: Option<CollectionId>,
    resource: Resource,
}

impl PhysicsTrack {
    pub fn new(
        uid: ComponentId,
        length: f64,
        track_speed: f64,
        jitter: Box<dyn Jitter>,
        collection: Option<CollectionId>,
    ) -> RailResult<Self> {
        if length <= 0.0 {
            return Err(RailError::not_positive("length", length));
        }
        if track_speed <= 0.0 {
            return Err(RailError::not_positive("track_speed", track_speed));
        }
        Ok(Self { uid, length, track_speed, jitter, collection, resource: Resource::new(1) })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn track_speed(&self) -> f64 {
        self.track_speed
    }

    /// Compute this dwell's duration using `model` (the `PhysicsModel`
    /// supplied to the owning `Model` at construction) and `agent_max_speed`
    /// (the requesting train's top speed).
    pub fn begin_dwell_with(
        &mut self,
        model: &dyn PhysicsModel,
        agent_max_speed: f64,
        rng: &mut SimRng,
    ) -> RailResult<DwellStep> {
        let base = model.traversal_ticks(self.length, self.track_speed, agent_max_speed)?;
        let delay = (base as f64 + self.jitter.sample(rng)).round().max(0.0) as u64;
        Ok(DwellStep::wait(delay))
    }
}

impl Component for PhysicsTrack {
    fn uid(&self) -> ComponentId {
        self.uid
    }

    fn type_name(&self) -> &'static str {
        "PhysicsTrack"
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

    /// `PhysicsTrack` cannot compute a dwell without a `PhysicsModel` and an
    /// agent's max speed, neither of which this trait method has access to;
    /// callers must use `begin_dwell_with` instead. `Model::resume_train`
    /// special-cases `PhysicsTrack` for exactly this reason.
    fn begin_dwell(&mut self, _agent: AgentId, _rng: &mut SimRng) -> DwellStep {
        unreachable!("PhysicsTrack dwell must go through begin_dwell_with")
    }
}
