//! [`ModelBuilder`]: assembles a [`crate::model::Model`] from config records,
//! a fluent, validate-at-`build` shape. Everything that can go wrong with
//! wiring (unknown references, duplicate uids, mismatched route/tour
//! lengths) is caught here rather than left to surface as a runtime panic
//! once the simulation is running.

use std::collections::HashMap;

use rustc_hash::FxHashMap;

use railsim_component::{
    BlockExclusiveZone, Collection, Component, DynamicHeadwayStation, MultiBlockTrack, MultiTrackStation, PhysicsModel, PhysicsTrack,
    SimpleCrossover, SimpleStation, SimpleYard, TimedStation, TimedTrack, UnimplementedPhysicsModel,
};
use railsim_core::{AgentId, CollectionId, ComponentId, RailError, RouteId, Tick, TourId};
use railsim_jitter::{DisruptionJitter, GaussianJitter, Jitter, LognormalJitter, NoJitter, UniformJitter};
use railsim_route::{Route, ScheduleArgs, Tour, TourRouteRef};
use railsim_sched::Scheduler;

use crate::config::{ComponentKind, ComponentRecord, JitterRecord, RouteRecord, ScheduleArgsRecord, TourRecord, TrainRecord};
use crate::error::{ModelError, ModelResult};
use crate::model::{ComponentMeta, Model};
use crate::train::Train;

/// Builds a [`Model`] from typed config records. Required: a seed. Every
/// other input defaults to empty (a model with no components/trains is
/// legal, if useless).
pub struct ModelBuilder {
    seed: u64,
    physics_model: Option<Box<dyn PhysicsModel>>,
    components: Vec<ComponentRecord>,
    routes: Vec<RouteRecord>,
    tours: Vec<TourRecord>,
    trains: Vec<TrainRecord>,
}

impl ModelBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            physics_model: None,
            components: Vec::new(),
            routes: Vec::new(),
            tours: Vec::new(),
            trains: Vec::new(),
        }
    }

    pub fn physics_model(mut self, model: Box<dyn PhysicsModel>) -> Self {
        self.physics_model = Some(model);
        self
    }

    pub fn components(mut self, components: Vec<ComponentRecord>) -> Self {
        self.components = components;
        self
    }

    pub fn routes(mut self, routes: Vec<RouteRecord>) -> Self {
        self.routes = routes;
        self
    }

    pub fn tours(mut self, tours: Vec<TourRecord>) -> Self {
        self.tours = tours;
        self
    }

    pub fn trains(mut self, trains: Vec<TrainRecord>) -> Self {
        self.trains = trains;
        self
    }

    pub fn build(self) -> ModelResult<Model> {
        let mut uids: std::collections::HashSet<String> = std::collections::HashSet::new();

        let (components, meta, component_index, collections) = self.build_components()?;

        let mut route_index: HashMap<String, RouteId> = HashMap::new();
        let mut routes: Vec<Route> = Vec::new();
        for record in &self.routes {
            let segments = record
                .components
                .iter()
                .map(|r| {
                    component_index
                        .get(&(r.u.clone(), r.v.clone(), r.key))
                        .copied()
                        .ok_or_else(|| ModelError::UnknownComponentRef(record.name.clone(), r.u.clone(), r.v.clone(), r.key))
                })
                .collect::<ModelResult<Vec<_>>>()?;
            let route = Route::new(segments).map_err(ModelError::from)?;
            let id = RouteId(routes.len() as u32);
            routes.push(route);
            route_index.insert(record.name.clone(), id);
        }

        let mut tour_index: HashMap<String, TourId> = HashMap::new();
        let mut tours: Vec<Tour> = Vec::new();
        for record in &self.tours {
            if !uids.insert(record.name.clone()) {
                return Err(ModelError::Rail(RailError::NotUniqueId(record.name.clone())));
            }
            let tour_routes = record
                .routes
                .iter()
                .map(|r| {
                    let route_id = route_index
                        .get(&r.name)
                        .copied()
                        .ok_or_else(|| ModelError::UnknownRoute(record.name.clone(), r.name.clone()))?;
                    Ok(TourRouteRef { route: route_id, args: r.args.iter().map(|a| a.map(schedule_args)).collect() })
                })
                .collect::<ModelResult<Vec<_>>>()?;
            let id = TourId(tours.len() as u32);
            tours.push(Tour {
                routes: tour_routes,
                creation_time: Tick(record.creation_time.max(0) as u64),
                deletion_time: Tick(record.deletion_time.max(0) as u64),
            });
            tour_index.insert(record.name.clone(), id);
        }

        let mut trains: Vec<Train> = Vec::new();
        let mut train_index: FxHashMap<String, AgentId> = FxHashMap::default();
        for record in &self.trains {
            if !uids.insert(record.name.clone()) {
                return Err(ModelError::Rail(RailError::NotUniqueId(record.name.clone())));
            }
            let tour_id = tour_index
                .get(&record.tour)
                .copied()
                .ok_or_else(|| ModelError::UnknownTour(record.name.clone(), record.tour.clone()))?;
            let tour = &tours[tour_id.index()];
            let segments = tour
                .resolve(|route_id| routes.get(route_id.index()).cloned().ok_or_else(|| {
                    RailError::InputMismatch(format!("tour {:?} references unresolved route {route_id}", record.name))
                }))
                .map_err(ModelError::from)?;
            let agent = AgentId(trains.len() as u32);
            trains.push(Train::new(agent, record.name.clone(), record.max_speed, segments, tour.creation_time));
            train_index.insert(record.name.clone(), agent);
        }

        Ok(Model {
            components,
            meta,
            component_index,
            collections,
            trains,
            train_index,
            scheduler: Scheduler::new(),
            rng: railsim_core::SimRng::new(self.seed),
            physics_model: self.physics_model.unwrap_or_else(|| Box::new(UnimplementedPhysicsModel)),
            events: Vec::new(),
        })
    }

    #[allow(clippy::type_complexity)]
    fn build_components(
        &self,
    ) -> ModelResult<(
        Vec<Box<dyn Component>>,
        Vec<ComponentMeta>,
        FxHashMap<(String, String, u32), ComponentId>,
        Vec<Box<dyn Collection>>,
    )> {
        let mut components: Vec<Box<dyn Component>> = Vec::new();
        let mut meta: Vec<ComponentMeta> = Vec::new();
        let mut component_index: FxHashMap<(String, String, u32), ComponentId> = FxHashMap::default();
        let mut collections: Vec<Box<dyn Collection>> = Vec::new();
        let mut collection_index: HashMap<(String, String), CollectionId> = HashMap::new();

        for record in &self.components {
            let key = (record.u.clone(), record.v.clone(), record.key);
            if component_index.contains_key(&key) {
                return Err(ModelError::Rail(RailError::NotUniqueId(record.uid())));
            }
            let uid = ComponentId(components.len() as u32);
            let jitter = build_jitter(&record.jitter)?;
            let collection_id = match &record.collection {
                None => None,
                Some(rec) => Some(resolve_collection(rec, &mut collections, &mut collection_index)?),
            };
            let component = build_component(uid, &record.kind, jitter, collection_id)?;
            components.push(component);
            meta.push(ComponentMeta { uid: record.uid(), u: record.u.clone(), v: record.v.clone() });
            component_index.insert(key, uid);
        }

        Ok((components, meta, component_index, collections))
    }
}

fn schedule_args(record: ScheduleArgsRecord) -> ScheduleArgs {
    ScheduleArgs {
        arrival: record.arrival.map(|t| Tick(t.max(0) as u64)),
        departure: record.departure.map(|t| Tick(t.max(0) as u64)),
    }
}

fn build_jitter(record: &Option<JitterRecord>) -> ModelResult<Box<dyn Jitter>> {
    Ok(match record {
        None | Some(JitterRecord::NoJitter) => Box::new(NoJitter),
        Some(JitterRecord::UniformJitter { min, max }) => Box::new(UniformJitter::new(*min, *max).map_err(ModelError::from)?),
        Some(JitterRecord::GaussianJitter { mean, std_dev }) => Box::new(GaussianJitter::new(*mean, *std_dev).map_err(ModelError::from)?),
        Some(JitterRecord::LognormalJitter { mu, sigma }) => Box::new(LognormalJitter::new(*mu, *sigma).map_err(ModelError::from)?),
        Some(JitterRecord::DisruptionJitter { probability, extra_delay }) => {
            Box::new(DisruptionJitter::new(*probability, *extra_delay).map_err(ModelError::from)?)
        }
    })
}

/// First reference to a `(type, key)` pair creates the collection; later
/// references attach to the existing one.
fn resolve_collection(
    record: &crate::config::CollectionRecord,
    collections: &mut Vec<Box<dyn Collection>>,
    index: &mut HashMap<(String, String), CollectionId>,
) -> ModelResult<CollectionId> {
    let key = (record.r#type.clone(), record.key.clone());
    if let Some(&id) = index.get(&key) {
        return Ok(id);
    }
    if record.r#type != "BlockExclusiveZone" {
        return Err(ModelError::UnknownCollectionType(record.r#type.clone()));
    }
    let id = CollectionId(collections.len() as u32);
    collections.push(Box::new(BlockExclusiveZone::new(id)));
    index.insert(key, id);
    Ok(id)
}

#[allow(clippy::too_many_lines)]
fn build_component(
    uid: ComponentId,
    kind: &ComponentKind,
    jitter: Box<dyn Jitter>,
    collection: Option<CollectionId>,
) -> ModelResult<Box<dyn Component>> {
    Ok(match *kind {
        ComponentKind::TimedTrack { traversal_time, capacity } => {
            Box::new(TimedTrack::new(uid, traversal_time, capacity, jitter, collection).map_err(ModelError::from)?)
        }
        ComponentKind::SimpleCrossover { traversal_time } => {
            Box::new(SimpleCrossover::new(uid, traversal_time, jitter, collection).map_err(ModelError::from)?)
        }
        ComponentKind::PhysicsTrack { length, track_speed } => {
            Box::new(PhysicsTrack::new(uid, length, track_speed, jitter, collection).map_err(ModelError::from)?)
        }
        ComponentKind::SimpleYard { capacity } => Box::new(SimpleYard::new(uid, capacity, jitter, collection).map_err(ModelError::from)?),
        ComponentKind::SimpleStation { mean_boarding, mean_alighting } => {
            Box::new(SimpleStation::new(uid, mean_boarding, mean_alighting, jitter, collection).map_err(ModelError::from)?)
        }
        ComponentKind::TimedStation { mean_boarding, mean_alighting, traversal_time } => {
            Box::new(TimedStation::new(uid, mean_boarding, mean_alighting, traversal_time, jitter, collection).map_err(ModelError::from)?)
        }
        ComponentKind::DynamicHeadwayStation {
            boarding_rate,
            alighting_rate,
            intercept,
            boarding_slope,
            alighting_slope,
            first_train_dwell,
        } => Box::new(
            DynamicHeadwayStation::new(
                uid,
                boarding_rate,
                alighting_rate,
                intercept,
                boarding_slope,
                alighting_slope,
                first_train_dwell,
                jitter,
                collection,
            )
            .map_err(ModelError::from)?,
        ),
        ComponentKind::MultiBlockTrack { num_tracks, num_blocks, traversal_time } => {
            Box::new(MultiBlockTrack::new(uid, num_tracks, num_blocks, traversal_time, jitter, collection).map_err(ModelError::from)?)
        }
        ComponentKind::MultiTrackStation {
            num_stopping_tracks,
            num_bypass_tracks,
            bypass_time,
            burr_c,
            burr_d,
            burr_loc,
            burr_scale,
        } => Box::new(
            MultiTrackStation::new(
                uid,
                num_stopping_tracks,
                num_bypass_tracks,
                bypass_time,
                burr_c,
                burr_d,
                burr_loc,
                burr_scale,
                jitter,
                collection,
            )
            .map_err(ModelError::from)?,
        ),
    })
}
