//! Selection of a segmentation loss by name.
//!
//! Training configurations refer to losses by their snake_case function name
//! (`"dice_loss"`, `"combined_loss"`, ...). [`LossKind`] parses those names and
//! [`SegmentationLossConfig`] builds the matching loss together with its
//! hyper-parameters.

use core::{fmt, str::FromStr};

use burn::{
    config::Config,
    tensor::{backend::Backend, Tensor},
};
use serde::{Deserialize, Serialize};

use crate::{
    bce::{BinaryCrossEntropy, BinaryCrossEntropyConfig},
    cast::IntoFloatTensor,
    combined::{CombinedLoss, CombinedLossConfig},
    dice::{DiceLoss, DiceLossConfig},
    error::{LossError, LossResult},
    weighted_bce::{WeightedBceLoss, WeightedBceLossConfig},
    weighted_dice::{WeightedDiceLoss, WeightedDiceLossConfig},
};

/// The available segmentation losses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossKind {
    /// `1 - DSC`.
    #[serde(rename = "dice_loss")]
    Dice,
    /// BCE plus Dice loss.
    #[serde(rename = "combined_loss")]
    Combined,
    /// Dice loss with a weight on the overlap terms.
    #[serde(rename = "weighted_dice_loss")]
    WeightedDice,
    /// BCE weighted towards foreground pixels.
    #[serde(rename = "weighted_bce")]
    WeightedBce,
    /// Plain binary cross-entropy.
    #[serde(rename = "binary_cross_entropy")]
    BinaryCrossEntropy,
}

impl LossKind {
    /// Every loss kind, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Dice,
        Self::Combined,
        Self::WeightedDice,
        Self::WeightedBce,
        Self::BinaryCrossEntropy,
    ];

    /// The snake_case name used in configuration files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dice => "dice_loss",
            Self::Combined => "combined_loss",
            Self::WeightedDice => "weighted_dice_loss",
            Self::WeightedBce => "weighted_bce",
            Self::BinaryCrossEntropy => "binary_cross_entropy",
        }
    }
}

impl fmt::Display for LossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LossKind {
    type Err = LossError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| LossError::UnknownLoss { name: s.to_owned() })
    }
}

/// Configuration for creating a [segmentation loss](SegmentationLoss).
///
/// Only the sub-configuration matching `kind` is used; the others keep their
/// defaults so a single file can switch losses by changing one field.
#[derive(Config, Debug)]
pub struct SegmentationLossConfig {
    /// Which loss to build.
    pub kind: LossKind,
    /// Settings used when `kind` is [`LossKind::Dice`].
    #[config(default = "DiceLossConfig::new()")]
    pub dice: DiceLossConfig,
    /// Settings used when `kind` is [`LossKind::Combined`].
    #[config(default = "CombinedLossConfig::new()")]
    pub combined: CombinedLossConfig,
    /// Settings used when `kind` is [`LossKind::WeightedDice`].
    #[config(default = "WeightedDiceLossConfig::new()")]
    pub weighted_dice: WeightedDiceLossConfig,
    /// Settings used when `kind` is [`LossKind::WeightedBce`].
    #[config(default = "WeightedBceLossConfig::new()")]
    pub weighted_bce: WeightedBceLossConfig,
    /// Settings used when `kind` is [`LossKind::BinaryCrossEntropy`].
    #[config(default = "BinaryCrossEntropyConfig::new()")]
    pub bce: BinaryCrossEntropyConfig,
}

impl SegmentationLossConfig {
    /// Initialize the selected [segmentation loss](SegmentationLoss).
    pub fn init(&self) -> SegmentationLoss {
        tracing::debug!(kind = %self.kind, "initializing segmentation loss");
        match self.kind {
            LossKind::Dice => SegmentationLoss::Dice(self.dice.init()),
            LossKind::Combined => SegmentationLoss::Combined(self.combined.init()),
            LossKind::WeightedDice => SegmentationLoss::WeightedDice(self.weighted_dice.init()),
            LossKind::WeightedBce => SegmentationLoss::WeightedBce(self.weighted_bce.init()),
            LossKind::BinaryCrossEntropy => {
                SegmentationLoss::BinaryCrossEntropy(self.bce.init())
            }
        }
    }
}

/// One of the segmentation losses, chosen at runtime.
#[derive(Clone, Debug)]
pub enum SegmentationLoss {
    /// A [Dice loss](DiceLoss).
    Dice(DiceLoss),
    /// A [BCE + Dice loss](CombinedLoss).
    Combined(CombinedLoss),
    /// A [weighted Dice loss](WeightedDiceLoss).
    WeightedDice(WeightedDiceLoss),
    /// A [foreground-weighted BCE loss](WeightedBceLoss).
    WeightedBce(WeightedBceLoss),
    /// A plain [binary cross-entropy](BinaryCrossEntropy).
    BinaryCrossEntropy(BinaryCrossEntropy),
}

impl SegmentationLoss {
    /// The kind of the wrapped loss.
    pub const fn kind(&self) -> LossKind {
        match self {
            Self::Dice(_) => LossKind::Dice,
            Self::Combined(_) => LossKind::Combined,
            Self::WeightedDice(_) => LossKind::WeightedDice,
            Self::WeightedBce(_) => LossKind::WeightedBce,
            Self::BinaryCrossEntropy(_) => LossKind::BinaryCrossEntropy,
        }
    }

    /// Evaluate the wrapped loss.
    ///
    /// # Shapes
    ///
    /// - y_true: `[...dims]` (`[...dims, 1]` for [`LossKind::WeightedBce`])
    /// - y_pred: `[...dims]` (same shape as `y_true`)
    /// - output: `[1]`
    pub fn forward<B: Backend, const D: usize>(
        &self,
        y_true: impl IntoFloatTensor<B, D>,
        y_pred: impl IntoFloatTensor<B, D>,
    ) -> LossResult<Tensor<B, 1>> {
        match self {
            Self::Dice(loss) => loss.forward(y_true, y_pred),
            Self::Combined(loss) => loss.forward(y_true, y_pred),
            Self::WeightedDice(loss) => loss.forward(y_true, y_pred),
            Self::WeightedBce(loss) => loss.forward(y_true, y_pred),
            Self::BinaryCrossEntropy(loss) => loss.forward(y_true, y_pred),
        }
    }
}
