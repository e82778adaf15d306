//! Typed configuration records, shaped directly from the external JSON
//! schemas (component/route/tour/train documents). Deserializing the JSON
//! itself is out of scope here — these are exactly the structs a `serde_json`
//! loader (or any other format) would decode into before handing them to
//! [`crate::ModelBuilder`].

use serde::Deserialize;

/// One endpoint reference into the component multigraph: `(u, v, key)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComponentRef {
    pub u: String,
    pub v: String,
    pub key: u32,
}

impl ComponentRef {
    pub fn uid(&self) -> String {
        format!("{}-{}-{}", self.u, self.v, self.key)
    }
}

/// The constructor arguments for one component variant. Tagged on `type`,
/// mirroring the external record's `{ "type": ..., "args": { ... } }` shape
/// flattened into one struct per variant.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", content = "args")]
pub enum ComponentKind {
    TimedTrack { traversal_time: i64, capacity: u32 },
    SimpleCrossover { traversal_time: i64 },
    PhysicsTrack { length: f64, track_speed: f64 },
    SimpleYard { capacity: u32 },
    SimpleStation { mean_boarding: f64, mean_alighting: f64 },
    TimedStation { mean_boarding: f64, mean_alighting: f64, traversal_time: i64 },
    DynamicHeadwayStation {
        boarding_rate: f64,
        alighting_rate: f64,
        intercept: f64,
        boarding_slope: f64,
        alighting_slope: f64,
        first_train_dwell: i64,
    },
    MultiBlockTrack { num_tracks: u32, num_blocks: u32, traversal_time: i64 },
    MultiTrackStation {
        num_stopping_tracks: u32,
        num_bypass_tracks: u32,
        bypass_time: i64,
        burr_c: f64,
        burr_d: f64,
        burr_loc: f64,
        burr_scale: f64,
    },
}

/// `{ "type": ..., "args": { ... } }` for a jitter strategy.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "args")]
pub enum JitterRecord {
    NoJitter,
    UniformJitter { min: i64, max: i64 },
    GaussianJitter { mean: f64, std_dev: f64 },
    LognormalJitter { mu: f64, sigma: f64 },
    DisruptionJitter { probability: f64, extra_delay: f64 },
}

/// `{ "type": "BlockExclusiveZone", "key": "..." }`. `type` is kept as a
/// string (rather than a unit enum) since it is only ever matched against
/// at load time and a second collection kind may be added later without
/// touching the wire shape.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRecord {
    pub r#type: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentRecord {
    pub u: String,
    pub v: String,
    pub key: u32,
    #[serde(flatten)]
    pub kind: ComponentKind,
    #[serde(default)]
    pub jitter: Option<JitterRecord>,
    #[serde(default)]
    pub collection: Option<CollectionRecord>,
}

impl ComponentRecord {
    pub fn uid(&self) -> String {
        format!("{}-{}-{}", self.u, self.v, self.key)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteRecord {
    pub name: String,
    pub components: Vec<ComponentRef>,
}

/// `null` or `{ "arrival"?: int, "departure"?: int }` for one segment of a
/// tour's use of a route.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScheduleArgsRecord {
    #[serde(default)]
    pub arrival: Option<i64>,
    #[serde(default)]
    pub departure: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TourRouteRecord {
    pub name: String,
    pub args: Vec<Option<ScheduleArgsRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TourRecord {
    pub name: String,
    pub creation_time: i64,
    pub deletion_time: i64,
    pub routes: Vec<TourRouteRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainRecord {
    pub name: String,
    pub max_speed: f64,
    pub tour: String,
}
