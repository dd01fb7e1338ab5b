//! Status-transition rules linking equipment, maintenance records and
//! service orders.
//!
//! Everything here is pure: the functions mutate the entities they are handed
//! and take "now" as a parameter. Loading, persisting and committing belong to
//! the caller, which runs each status change inside one database transaction.

pub mod clock;
mod maintenance;
mod service_order;

use thiserror::Error;

use crate::error::AppError;

pub use clock::{Clock, FixedClock, SystemClock};
pub use maintenance::{apply_maintenance_status, MaintenanceTransition};
pub use service_order::{apply_service_order_status, record_satisfaction_rating};

/// Failure of a status-transition rule. The entity is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Value outside the enumerated status set
    #[error("{0}")]
    InvalidStatus(String),

    /// Entity not in the state the operation requires
    #[error("{0}")]
    InvalidState(String),

    /// Malformed argument
    #[error("{0}")]
    InvalidInput(String),
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::InvalidStatus(msg) => AppError::InvalidStatus(msg),
            TransitionError::InvalidState(msg) => AppError::InvalidState(msg),
            TransitionError::InvalidInput(msg) => AppError::InvalidInput(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_matching_app_error() {
        assert!(matches!(
            AppError::from(TransitionError::InvalidStatus("x".into())),
            AppError::InvalidStatus(_)
        ));
        assert!(matches!(
            AppError::from(TransitionError::InvalidState("x".into())),
            AppError::InvalidState(_)
        ));
        assert!(matches!(
            AppError::from(TransitionError::InvalidInput("x".into())),
            AppError::InvalidInput(_)
        ));
    }
}
