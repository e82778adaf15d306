//! `railsim-component` — the physical infrastructure elements a train
//! occupies, plus the cross-component occupancy rules (`Collection`) that
//! tie several of them together.
//!
//! # What lives here
//!
//! | Module                 | Contents                                                  |
//! |-------------------------|-----------------------------------------------------------|
//! | [`context`]             | `Direction`, `EntryContext`, `DwellAction`/`DwellStep`    |
//! | [`collection`]          | `Collection`, `BlockExclusiveZone`                         |
//! | [`component`]           | The `Component` trait                                      |
//! | [`tracks`]              | `TimedTrack`, `SimpleCrossover`, `PhysicsTrack`             |
//! | [`stations`]            | `SimpleStation`, `TimedStation`, `DynamicHeadwayStation`, `SimpleYard` |
//! | [`multiblock`]          | `MultiBlockTrack`                                           |
//! | [`multitrack_station`]  | `MultiTrackStation`                                         |
//!
//! No component ever drives the scheduler directly: `begin_dwell`/
//! `resume_dwell` return a [`context::DwellStep`] describing what should
//! happen next, and the caller (`railsim-model`'s `Model`) is the only thing
//! that ever touches `railsim-sched`.

pub mod collection;
pub mod component;
pub mod context;
pub mod multiblock;
pub mod multitrack_station;
pub mod stations;
pub mod tracks;


pub use collection::{BlockExclusiveZone, Collection};
pub use component::Component;
pub use context::{CollectionReleaseOutcome, Direction, DwellAction, DwellStep, EntryContext};
pub use multiblock::MultiBlockTrack;
pub use multitrack_station::MultiTrackStation;
pub use stations::{DynamicHeadwayStation, SimpleStation, SimpleYard, TimedStation};
pub use tracks::{PhysicsModel, PhysicsTrack, SimpleCrossover, TimedTrack, UnimplementedPhysicsModel};
