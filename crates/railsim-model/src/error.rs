//! Construction-time errors raised while assembling a [`crate::Model`] from
//! typed config records. Runtime invariant violations use
//! `railsim_core::RailError` directly (propagated here via `#[from]`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Rail(#[from] railsim_core::RailError),

    #[error("unknown component type {0:?}")]
    UnknownComponentType(String),

    #[error("unknown jitter type {0:?}")]
    UnknownJitterType(String),

    #[error("unknown collection type {0:?}")]
    UnknownCollectionType(String),

    #[error("route {0:?} references unknown component ({1}, {2}, {3})")]
    UnknownComponentRef(String, String, String, u32),

    #[error("tour {0:?} references unknown route {1:?}")]
    UnknownRoute(String, String),

    #[error("train {0:?} references unknown tour {1:?}")]
    UnknownTour(String, String),
}

pub type ModelResult<T> = Result<T, ModelError>;
