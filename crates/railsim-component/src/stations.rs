//! Station and yard components.
//!
//! `SimpleStation`'s dwell is intentionally a stub — no holding logic beyond
//! immediate release. `TimedStation` and `DynamicHeadwayStation` implement
//! the fixed-dwell and demand-driven headway formulas respectively.

use railsim_core::{AgentId, CollectionId, ComponentId, RailError, RailResult, SimRng, Tick};
use railsim_resource::Resource;

use crate::component::Component;
use crate::context::DwellStep;
use railsim_jitter::{Jitter, NoJitter};

fn station_dwell(mean_boarding: f64, mean_alighting: f64, jitter: f64) -> u64 {
    (2.0 + 0.4 * mean_boarding + 0.4 * mean_alighting + jitter).round().max(0.0) as u64
}

/// Capacity 1; dwell = `round(2 + 0.4*mean_boarding + 0.4*mean_alighting + jitter)`.
#[derive(Debug)]
pub struct SimpleStation {
    uid: ComponentId,
    mean_boarding: f64,
    mean_alighting: f64,
    jitter: Box<dyn Jitter>,
    collection: Option<CollectionId>,
    resource: Resource,
}

impl SimpleStation {
    pub fn new(
        uid: ComponentId,
        mean_boarding: f64,
        mean_alighting: f64,
        jitter: Box<dyn Jitter>,
        collection: Option<CollectionId>,
    ) -> RailResult<Self> {
        if mean_boarding < 0.0 {
            return Err(RailError::not_positive("mean_boarding", mean_boarding));
        }
        if mean_alighting < 0.0 {
            return Err(RailError::not_positive("mean_alighting", mean_alighting));
        }
        Ok(Self { uid, mean_boarding, mean_alighting, jitter, collection, resource: Resource::new(1) })
    }

    pub fn with_defaults(uid: ComponentId, mean_boarding: f64, mean_alighting: f64) -> RailResult<Self> {
        Self::new(uid, mean_boarding, mean_alighting, Box::new(NoJitter), None)
    }
}

impl Component for SimpleStation {
    fn uid(&self) -> ComponentId {
        self.uid
    }

    fn type_name(&self) -> &'static str {
        "SimpleStation"
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
        let jitter = self.jitter.sample(rng);
        DwellStep::wait(station_dwell(self.mean_boarding, self.mean_alighting, jitter))
    }
}

/// Same dwell formula as `SimpleStation`. `traversal_time` is retained as
/// metadata only; it plays no role in the dwell computation.
#[derive(Debug)]
pub struct TimedStation {
    uid: ComponentId,
    mean_boarding: f64,
    mean_alighting: f64,
    traversal_time: u64,
    jitter: Box<dyn Jitter>,
    collection: Option<CollectionId>,
    resource: Resource,
}

impl TimedStation {
    pub fn new(
        uid: ComponentId,
        mean_boarding: f64,
        mean_alighting: f64,
        traversal_time: i64,
        jitter: Box<dyn Jitter>,
        collection: Option<CollectionId>,
    ) -> RailResult<Self> {
        if mean_boarding < 0.0 {
            return Err(RailError::not_positive("mean_boarding", mean_boarding));
        }
        if mean_alighting < 0.0 {
            return Err(RailError::not_positive("mean_alighting", mean_alighting));
        }
        if traversal_time < 0 {
            return Err(RailError::not_positive("traversal_time", traversal_time as f64));
        }
        Ok(Self {
            uid,
            mean_boarding,
            mean_alighting,
            traversal_time: traversal_time as u64,
            jitter,
            collection,
            resource: Resource::new(1),
        })
    }

    pub fn traversal_time(&self) -> u64 {
        self.traversal_time
    }
}

impl Component for TimedStation {
    fn uid(&self) -> ComponentId {
        self.uid
    }

    fn type_name(&self) -> &'static str {
        "TimedStation"
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
        let jitter = self.jitter.sample(rng);
        DwellStep::wait(station_dwell(self.mean_boarding, self.mean_alighting, jitter))
    }
}

/// Dwell depends on the elapsed time since the previous train's arrival:
/// the first train gets a configured flat `first_train_dwell`; every later
/// train's dwell scales with the boarding/alighting rates applied over that
/// elapsed interval.
#[derive(Debug)]
pub struct DynamicHeadwayStation {
    uid: ComponentId,
    boarding_rate: f64,
    alighting_rate: f64,
    intercept: f64,
    boarding_slope: f64,
    alighting_slope: f64,
    first_train_dwell: u64,
    last_arrival: Option<Tick>,
    jitter: Box<dyn Jitter>,
    collection: Option<CollectionId>,
    resource: Resource,
}

#[allow(clippy::too_many_arguments)]
impl DynamicHeadwayStation {
    pub fn new(
        uid: ComponentId,
        boarding_rate: f64,
        alighting_rate: f64,
        intercept: f64,
        boarding_slope: f64,
        alighting_slope: f64,
        first_train_dwell: i64,
        jitter: Box<dyn Jitter>,
        collection: Option<CollectionId>,
    ) -> RailResult<Self> {
        if boarding_rate < 0.0 {
            return Err(RailError::not_positive("boarding_rate", boarding_rate));
        }
        if alighting_rate < 0.0 {
            return Err(RailError::not_positive("alighting_rate", alighting_rate));
        }
        if first_train_dwell < 0 {
            return Err(RailError::not_positive("first_train_dwell", first_train_dwell as f64));
        }
        Ok(Self {
            uid,
            boarding_rate,
            alighting_rate,
            intercept,
            boarding_slope,
            alighting_slope,
            first_train_dwell: first_train_dwell as u64,
            last_arrival: None,
            jitter,
            collection,
            resource: Resource::new(1),
        })
    }

    /// The caller passes `now` (the simulation tick at which this dwell
    /// begins) explicitly, since the component has no access to the
    /// scheduler's clock on its own.
    pub fn begin_dwell_at(&mut self, now: Tick, rng: &mut SimRng) -> DwellStep {
        let jitter = self.jitter.sample(rng);
        let delay = match self.last_arrival {
            None => self.first_train_dwell,
            Some(prev) => {
                let dt = now.since(prev) as f64;
                let value = self.intercept
                    + self.boarding_slope * (dt * self.boarding_rate)
                    + self.alighting_slope * (dt * self.alighting_rate)
                    + jitter;
                value.round().max(0.0) as u64
            }
        };
        self.last_arrival = Some(now);
        DwellStep::wait(delay)
    }
}

impl Component for DynamicHeadwayStation {
    fn uid(&self) -> ComponentId {
        self.uid
    }

    fn type_name(&self) -> &'static str {
        "DynamicHeadwayStation"
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

    /// `DynamicHeadwayStation` needs `now`, which this trait method doesn't
    /// receive; callers must use `begin_dwell_at` instead, the same way
    /// `PhysicsTrack` requires `begin_dwell_with`.
    fn begin_dwell(&mut self, _agent: AgentId, _rng: &mut SimRng) -> DwellStep {
        unreachable!("DynamicHeadwayStation dwell must go through begin_dwell_at")
    }
}

/// Zero-duration pass-through with capacity `N`; serves as a source/sink.
#[derive(Debug)]
pub struct SimpleYard {
    uid: ComponentId,
    jitter: Box<dyn Jitter>,
    collection: Option<CollectionId>,
    resource: Resource,
}

impl SimpleYard {
    pub fn new(
        uid: ComponentId,
        capacity: u32,
        jitter: Box<dyn Jitter>,
        collection: Option<CollectionId>,
    ) -> RailResult<Self> {
        if capacity == 0 {
            return Err(RailError::not_positive("capacity", capacity as f64));
        }
        Ok(Self { uid, jitter, collection, resource: Resource::new(capacity) })
    }

    pub fn with_defaults(uid: ComponentId, capacity: u32) -> RailResult<Self> {
        Self::new(uid, capacity, Box::new(NoJitter), None)
    }
}

impl Component for SimpleYard {
    fn uid(&self) -> ComponentId {
        self.uid
    }

    fn type_name(&self) -> &'static str {
        "SimpleYard"
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
        // Zero traversal time, but jitter is still part of the component's
        // configured behavior, matching every other component's handling.
        let delay = self.jitter.sample(rng).round().max(0.0) as u64;
        DwellStep::wait(delay)
    }
}
