//! `railsim-model` — the component registry, train agent state machine, and
//! the run loop tying `railsim-sched`, `railsim-resource`, `railsim-route`,
//! and `railsim-component` together into a runnable simulation.
//!
//! # What lives here
//!
//! | Module        | Contents                                                     |
//! |----------------|---------------------------------------------------------------|
//! | [`config`]     | Deserializable component/route/tour/train records             |
//! | [`error`]      | [`error::ModelError`], construction-time failures              |
//! | [`observer`]   | [`observer::EventObserver`], the run loop's callback trait      |
//! | [`train`]      | [`train::Train`], the per-agent state machine                  |
//! | [`builder`]    | [`builder::ModelBuilder`], assembling a [`model::Model`] from records |
//! | [`model`]      | [`model::Model`] itself, and the run loop                       |

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod observer;
pub mod train;

#[cfg(test)]
mod tests;

pub use builder::ModelBuilder;
pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use observer::{EventObserver, NoopObserver};
pub use train::{DwellWake, Train, TrainPhase};
