//! `railsim-core` — foundational types shared by every `railsim-*` crate.
//!
//! This crate is a dependency of every other crate in the workspace. It
//! intentionally has no `railsim-*` dependencies and minimal external ones
//! (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                |
//! |-----------|----------------------------------------------------------|
//! | [`ids`]   | `ComponentId`, `AgentId`, `CollectionId`, `RouteId`, `TourId` |
//! | [`time`]  | `Tick`                                                    |
//! | [`rng`]   | `SimRng`, the model-owned deterministic random source     |
//! | [`error`] | `RailError`, `RailResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the id and tick types. |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

pub use error::{RailError, RailResult};
pub use ids::{AgentId, CollectionId, ComponentId, RouteId, TourId};
pub use rng::SimRng;
pub use time::Tick;
