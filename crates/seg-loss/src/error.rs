//! Error types for the segmentation loss functions.

use thiserror::Error;

/// The error type for loss evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LossError {
    /// The inputs of a loss cannot be combined elementwise.
    #[error("Shape mismatch in {operation}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Name of the loss that rejected its inputs.
        operation: &'static str,
        /// The shape the loss required.
        expected: String,
        /// The shape it was given.
        actual: String,
    },

    /// A loss name that does not correspond to any [`LossKind`](crate::LossKind).
    #[error("Unknown loss function: {name}")]
    UnknownLoss {
        /// The unrecognized name.
        name: String,
    },
}

/// A specialized `Result` type for loss evaluation.
pub type LossResult<T> = Result<T, LossError>;

pub(crate) fn shape_mismatch(
    operation: &'static str,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> LossError {
    let (expected, actual) = (expected.into(), actual.into());
    tracing::debug!(operation, %expected, %actual, "rejecting loss inputs");
    LossError::ShapeMismatch {
        operation,
        expected,
        actual,
    }
}

/// Fails with [`LossError::ShapeMismatch`] unless both dims are equal.
pub(crate) fn ensure_same_dims<const D: usize>(
    operation: &'static str,
    y_true: [usize; D],
    y_pred: [usize; D],
) -> LossResult<()> {
    if y_true == y_pred {
        Ok(())
    } else {
        Err(shape_mismatch(
            operation,
            format!("{y_true:?}"),
            format!("{y_pred:?}"),
        ))
    }
}

/// Fails with [`LossError::ShapeMismatch`] when there is nothing to average over.
pub(crate) fn ensure_non_empty<const D: usize>(
    operation: &'static str,
    dims: [usize; D],
) -> LossResult<()> {
    if dims.iter().product::<usize>() > 0 {
        Ok(())
    } else {
        Err(shape_mismatch(
            operation,
            "non-empty tensor",
            format!("{dims:?}"),
        ))
    }
}
