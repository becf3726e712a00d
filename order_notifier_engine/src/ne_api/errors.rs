use thiserror::Error;

use crate::{db::traits::RecordStoreError, traits::OrderSourceError, validation::RecordShapeError};

/// Failures that abort an entire intake run. Per-order failures never surface here; they are logged and counted in
/// the run's summary instead.
#[derive(Debug, Clone, Error)]
pub enum IntakeError {
    #[error("The order source is not healthy. {0}")]
    SourceUnavailable(String),
    #[error("Could not fetch orders from the order source. {0}")]
    SourceError(#[from] OrderSourceError),
}

/// Why a single order could not be recorded. Intake logs these and moves on to the next order.
#[derive(Debug, Clone, Error)]
pub enum OrderIntakeError {
    #[error("Could not fetch line items. {0}")]
    LineItems(#[from] OrderSourceError),
    #[error("Invalid order. {0}")]
    Shape(#[from] RecordShapeError),
    #[error("Could not store the order. {0}")]
    Store(#[from] RecordStoreError),
}
