//! Weighted Dice loss.
//!
//! The weight scales the ground truth in both the intersection and the
//! denominator, and a tiny epsilon replaces the unit smoothing term:
//! ```text
//! intersection = sum(w * y_true * y_pred)
//! denominator  = sum(w * y_true + y_pred)
//! Loss = 1 - (2 * intersection + eps) / (denominator + eps)
//! ```
//! Weights above one make missed foreground cost more than false positives.
//! The ratio can exceed one when `w > 1`, so the loss is not bounded below by 0.
//! The weight is either a scalar from the configuration or a per-element
//! tensor passed to [`WeightedDiceLoss::forward_with_weights`].

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    tensor::{backend::Backend, Tensor},
};

use crate::{
    cast::IntoFloatTensor,
    error::{ensure_same_dims, LossResult},
};

/// Configuration for creating a [weighted Dice loss](WeightedDiceLoss).
#[derive(Config, Debug)]
pub struct WeightedDiceLossConfig {
    /// Scalar weight applied to every element. Default: 2.0
    #[config(default = 2.0)]
    pub weight: f64,
    /// Smoothing epsilon of the ratio. Default: 1e-7
    #[config(default = 1e-7)]
    pub epsilon: f64,
}

impl WeightedDiceLossConfig {
    /// Initialize [weighted Dice loss](WeightedDiceLoss).
    pub fn init(&self) -> WeightedDiceLoss {
        self.assertions();
        WeightedDiceLoss {
            weight: self.weight,
            epsilon: self.epsilon,
        }
    }

    fn assertions(&self) {
        assert!(
            self.weight > 0.0,
            "Weight for WeightedDiceLoss must be positive, got {}",
            self.weight
        );
        assert!(
            self.epsilon > 0.0,
            "Epsilon for WeightedDiceLoss must be positive, got {}",
            self.epsilon
        );
    }
}

/// Dice loss with a multiplicative weight on the overlap terms.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct WeightedDiceLoss {
    /// Scalar weight applied to every element.
    pub weight: f64,
    /// Smoothing epsilon of the ratio.
    pub epsilon: f64,
}

impl Default for WeightedDiceLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for WeightedDiceLoss {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content
            .add("weight", &self.weight)
            .add("epsilon", &self.epsilon)
            .optional()
    }
}

impl WeightedDiceLoss {
    /// Create a new weighted Dice loss with default configuration.
    pub fn new() -> Self {
        WeightedDiceLossConfig::new().init()
    }

    /// Compute the loss with the configured scalar weight.
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
        ensure_same_dims("weighted_dice_loss", y_true.dims(), y_pred.dims())?;

        let weighted_true = y_true.mul_scalar(self.weight);
        let intersection = (weighted_true.clone() * y_pred.clone()).sum();
        let denominator = (weighted_true + y_pred).sum();

        Ok(self.ratio_loss(intersection, denominator))
    }

    /// Compute the loss with a per-element weight tensor.
    ///
    /// # Shapes
    ///
    /// - y_true: `[...dims]`
    /// - y_pred: `[...dims]` (same shape as `y_true`)
    /// - weights: `[...dims]` (same shape as `y_true`)
    /// - output: `[1]`
    pub fn forward_with_weights<B: Backend, const D: usize>(
        &self,
        y_true: impl IntoFloatTensor<B, D>,
        y_pred: impl IntoFloatTensor<B, D>,
        weights: impl IntoFloatTensor<B, D>,
    ) -> LossResult<Tensor<B, 1>> {
        let y_true = y_true.into_float_tensor();
        let y_pred = y_pred.into_float_tensor();
        let weights = weights.into_float_tensor();
        ensure_same_dims("weighted_dice_loss", y_true.dims(), y_pred.dims())?;
        ensure_same_dims("weighted_dice_loss", y_true.dims(), weights.dims())?;

        let weighted_true = weights * y_true;
        let intersection = (weighted_true.clone() * y_pred.clone()).sum();
        let denominator = (weighted_true + y_pred).sum();

        Ok(self.ratio_loss(intersection, denominator))
    }

    fn ratio_loss<B: Backend>(
        &self,
        intersection: Tensor<B, 1>,
        denominator: Tensor<B, 1>,
    ) -> Tensor<B, 1> {
        let ratio = intersection.mul_scalar(2.0).add_scalar(self.epsilon)
            / denominator.add_scalar(self.epsilon);
        Tensor::ones_like(&ratio) - ratio
    }
}

/// Weighted Dice loss with the given scalar weight.
pub fn weighted_dice_loss<B: Backend, const D: usize>(
    y_true: impl IntoFloatTensor<B, D>,
    y_pred: impl IntoFloatTensor<B, D>,
    weight: f64,
) -> LossResult<Tensor<B, 1>> {
    WeightedDiceLossConfig::new()
        .with_weight(weight)
        .init()
        .forward(y_true, y_pred)
}
