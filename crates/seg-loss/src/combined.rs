//! Binary cross-entropy plus Dice loss.
//!
//! The two terms are added without weighting:
//! ```text
//! Loss = BCE(y_true, y_pred) + (1 - DSC(y_true, y_pred))
//! ```
//! BCE drives per-pixel calibration while the Dice term rewards region overlap,
//! which keeps small foreground objects from being drowned out by background.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    tensor::{backend::Backend, Tensor},
};

use crate::{
    bce::{BinaryCrossEntropy, BinaryCrossEntropyConfig},
    cast::IntoFloatTensor,
    dice::{DiceLoss, DiceLossConfig},
    error::{ensure_non_empty, ensure_same_dims, LossResult},
};

/// Configuration for creating a [combined loss](CombinedLoss).
#[derive(Config, Debug)]
pub struct CombinedLossConfig {
    /// Smoothing constant of the Dice term. Default: 1.0
    #[config(default = 1.0)]
    pub smooth: f64,
    /// Clamping margin of the BCE term. Default: 1e-7
    #[config(default = 1e-7)]
    pub epsilon: f64,
}

impl CombinedLossConfig {
    /// Initialize a new [combined loss](CombinedLoss).
    pub fn init(&self) -> CombinedLoss {
        CombinedLoss {
            bce: BinaryCrossEntropyConfig::new()
                .with_epsilon(self.epsilon)
                .init(),
            dice: DiceLossConfig::new().with_smooth(self.smooth).init(),
        }
    }
}

/// Sum of [binary cross-entropy](BinaryCrossEntropy) and [Dice loss](DiceLoss).
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct CombinedLoss {
    /// Cross-entropy term.
    pub bce: BinaryCrossEntropy,
    /// Overlap term.
    pub dice: DiceLoss,
}

impl Default for CombinedLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for CombinedLoss {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content
            .add("smooth", &self.dice.coefficient.smooth)
            .add("epsilon", &self.bce.epsilon)
            .optional()
    }
}

impl CombinedLoss {
    /// Create a new combined loss with default configuration.
    pub fn new() -> Self {
        CombinedLossConfig::new().init()
    }

    /// Compute `bce + dice_loss`.
    ///
    /// # Shapes
    ///
    /// - y_true: `[...dims]`
    /// - y_pred: `[...dims]` (same shape as `y_true`)
    /// - output: `[1]`
    pub fn forward<B: Backend, const D: usize>(
        &self,
        y_true: impl IntoFloatTensor<B, D>,
        y_pred: impl IntoFloatTensor<B, D>,
    ) -> LossResult<Tensor<B, 1>> {
        let y_true = y_true.into_float_tensor();
        let y_pred = y_pred.into_float_tensor();
        ensure_same_dims("combined_loss", y_true.dims(), y_pred.dims())?;
        ensure_non_empty("combined_loss", y_true.dims())?;

        let bce = self.bce.forward(y_true.clone(), y_pred.clone())?;
        let dice = self.dice.forward(y_true, y_pred)?;

        Ok(bce + dice)
    }
}

/// Unweighted BCE + Dice loss with default settings.
pub fn combined_loss<B: Backend, const D: usize>(
    y_true: impl IntoFloatTensor<B, D>,
    y_pred: impl IntoFloatTensor<B, D>,
) -> LossResult<Tensor<B, 1>> {
    CombinedLoss::new().forward(y_true, y_pred)
}
