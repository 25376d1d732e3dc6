use crate::ItemId;
use thiserror::Error;

/// Contract misuse on the drag path. The gesture recognizer is the normal
/// caller and never produces these when wired correctly.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DragError {
    #[error("a drag session is already active")]
    DragInProgress,
    #[error("unknown item {0:?}")]
    UnknownItem(ItemId),
    #[error("no active drag session")]
    NoActiveDrag,
}
