//! Dice similarity coefficient and Dice loss.
//!
//! Both tensors are flattened and cast to float before the overlap is measured:
//! ```text
//! intersection = sum(y_true * y_pred)
//! DSC  = (2 * intersection + smooth) / (sum(y_true) + sum(y_pred) + smooth)
//! Loss = 1 - DSC
//! ```
//! The additive `smooth` term keeps the ratio defined when both inputs are
//! all zeros, in which case the coefficient is exactly 1.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    tensor::{backend::Backend, Tensor},
};

use crate::{
    cast::IntoFloatTensor,
    error::{shape_mismatch, LossResult},
};

/// Configuration for creating a [Dice coefficient](DiceCoefficient).
#[derive(Config, Debug)]
pub struct DiceCoefficientConfig {
    /// Smoothing constant added to numerator and denominator. Default: 1.0
    #[config(default = 1.0)]
    pub smooth: f64,
}

impl DiceCoefficientConfig {
    /// Initialize [Dice coefficient](DiceCoefficient).
    pub fn init(&self) -> DiceCoefficient {
        self.assertions();
        DiceCoefficient {
            smooth: self.smooth,
        }
    }

    fn assertions(&self) {
        assert!(
            self.smooth > 0.0,
            "Smoothing constant for DiceCoefficient must be positive, got {}",
            self.smooth
        );
    }
}

/// Dice similarity coefficient between a ground truth and a prediction.
///
/// The result lies in `[0, 1]` for inputs in `[0, 1]`, with 1 meaning identical.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct DiceCoefficient {
    /// Smoothing constant added to numerator and denominator.
    pub smooth: f64,
}

impl Default for DiceCoefficient {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for DiceCoefficient {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content.add("smooth", &self.smooth).optional()
    }
}

impl DiceCoefficient {
    /// Create a new Dice coefficient with default configuration.
    pub fn new() -> Self {
        DiceCoefficientConfig::new().init()
    }

    /// Compute the coefficient over all elements of both tensors.
    ///
    /// The inputs may have different ranks as long as they hold the same
    /// number of elements.
    ///
    /// # Shapes
    ///
    /// - y_true: `[...dims]`
    /// - y_pred: `[...dims]` (same number of elements as `y_true`)
    /// - output: `[1]`
    pub fn forward<B: Backend, const D1: usize, const D2: usize>(
        &self,
        y_true: impl IntoFloatTensor<B, D1>,
        y_pred: impl IntoFloatTensor<B, D2>,
    ) -> LossResult<Tensor<B, 1>> {
        let y_true = flatten(y_true.into_float_tensor());
        let y_pred = flatten(y_pred.into_float_tensor());

        let [true_len] = y_true.dims();
        let [pred_len] = y_pred.dims();
        if true_len != pred_len {
            return Err(shape_mismatch(
                "dice_coefficient",
                format!("{true_len} elements"),
                format!("{pred_len} elements"),
            ));
        }

        let intersection = (y_true.clone() * y_pred.clone()).sum();
        let numerator = intersection.mul_scalar(2.0).add_scalar(self.smooth);
        let denominator = (y_true.sum() + y_pred.sum()).add_scalar(self.smooth);

        Ok(numerator / denominator)
    }
}

/// Configuration for creating a [Dice loss](DiceLoss).
#[derive(Config, Debug)]
pub struct DiceLossConfig {
    /// Smoothing constant of the underlying coefficient. Default: 1.0
    #[config(default = 1.0)]
    pub smooth: f64,
}

impl DiceLossConfig {
    /// Initialize [Dice loss](DiceLoss).
    pub fn init(&self) -> DiceLoss {
        DiceLoss {
            coefficient: DiceCoefficientConfig::new()
                .with_smooth(self.smooth)
                .init(),
        }
    }
}

/// Dice loss, `1 - DSC`.
///
/// Decreases monotonically as the overlap between prediction and ground
/// truth grows.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct DiceLoss {
    /// The coefficient this loss is derived from.
    pub coefficient: DiceCoefficient,
}

impl Default for DiceLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for DiceLoss {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content.add("smooth", &self.coefficient.smooth).optional()
    }
}

impl DiceLoss {
    /// Create a new Dice loss with default configuration.
    pub fn new() -> Self {
        DiceLossConfig::new().init()
    }

    /// Compute the loss.
    ///
    /// # Shapes
    ///
    /// - y_true: `[...dims]`
    /// - y_pred: `[...dims]` (same number of elements as `y_true`)
    /// - output: `[1]`
    pub fn forward<B: Backend, const D1: usize, const D2: usize>(
        &self,
        y_true: impl IntoFloatTensor<B, D1>,
        y_pred: impl IntoFloatTensor<B, D2>,
    ) -> LossResult<Tensor<B, 1>> {
        let dice = self.coefficient.forward(y_true, y_pred)?;
        Ok(Tensor::ones_like(&dice) - dice)
    }
}

/// Dice coefficient with the default smoothing constant of 1.
pub fn dice_coefficient<B: Backend, const D1: usize, const D2: usize>(
    y_true: impl IntoFloatTensor<B, D1>,
    y_pred: impl IntoFloatTensor<B, D2>,
) -> LossResult<Tensor<B, 1>> {
    DiceCoefficient::new().forward(y_true, y_pred)
}

/// Dice loss with the default smoothing constant of 1.
pub fn dice_loss<B: Backend, const D1: usize, const D2: usize>(
    y_true: impl IntoFloatTensor<B, D1>,
    y_pred: impl IntoFloatTensor<B, D2>,
) -> LossResult<Tensor<B, 1>> {
    DiceLoss::new().forward(y_true, y_pred)
}

fn flatten<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Tensor<B, 1> {
    let len = tensor.shape().num_elements();
    tensor.reshape([len])
}
