//! Overlap-based loss functions for binary image segmentation.
//!
//! This crate provides the Dice similarity coefficient and the losses built on
//! it, together with the binary cross-entropy variants they are usually paired
//! with. Every loss is a stateless reduction over two tensors of the same
//! shape, the ground truth `y_true` and the predicted probabilities `y_pred`,
//! written with Burn tensor operations so any backend can evaluate it and
//! autodiff backends can differentiate it with respect to `y_pred`.
//!
//! ## Losses
//!
//! - **[`DiceCoefficient`]** / [`dice_coefficient`]: smoothed overlap ratio in `[0, 1]`
//! - **[`DiceLoss`]** / [`dice_loss`]: `1 - DSC`
//! - **[`CombinedLoss`]** / [`combined_loss`]: binary cross-entropy plus Dice loss
//! - **[`WeightedDiceLoss`]** / [`weighted_dice_loss`]: Dice loss with scalar or per-pixel weights
//! - **[`WeightedBceLoss`]** / [`weighted_bce`]: cross-entropy weighted `4 * y_true + 1`
//! - **[`BinaryCrossEntropy`]** / [`binary_cross_entropy`]: clamped log-loss
//!
//! Both inputs are cast to float first ([`IntoFloatTensor`]), so integer or
//! boolean masks can be passed as they come out of a data pipeline. Inputs
//! that cannot be combined elementwise are rejected with
//! [`LossError::ShapeMismatch`] before any arithmetic happens.
//!
//! ## Usage Example
//!
//! ```rust
//! use burn::prelude::*;
//! use seg_loss::{dice_loss, LossKind, LossResult, SegmentationLossConfig};
//!
//! fn segmentation_loss<B: Backend>(
//!     masks: Tensor<B, 4, Int>,
//!     probabilities: Tensor<B, 4>,
//! ) -> LossResult<Tensor<B, 1>> {
//!     let dice = dice_loss(masks.clone(), probabilities.clone())?;
//!     let combined = SegmentationLossConfig::new(LossKind::Combined)
//!         .init()
//!         .forward(masks, probabilities)?;
//!     Ok(dice + combined)
//! }
//! ```

mod bce;
mod cast;
mod combined;
mod dice;
mod error;
mod kind;
mod weighted_bce;
mod weighted_dice;

pub use bce::{binary_cross_entropy, BinaryCrossEntropy, BinaryCrossEntropyConfig};
pub use cast::IntoFloatTensor;
pub use combined::{combined_loss, CombinedLoss, CombinedLossConfig};
pub use dice::{
    dice_coefficient, dice_loss, DiceCoefficient, DiceCoefficientConfig, DiceLoss, DiceLossConfig,
};
pub use error::{LossError, LossResult};
pub use kind::{LossKind, SegmentationLoss, SegmentationLossConfig};
pub use weighted_bce::{weighted_bce, WeightedBceLoss, WeightedBceLossConfig};
pub use weighted_dice::{weighted_dice_loss, WeightedDiceLoss, WeightedDiceLossConfig};
