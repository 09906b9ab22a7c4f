//! Binary cross-entropy on probabilities.
//!
//! Predictions are clamped to `[eps, 1 - eps]` and shifted by `eps` inside
//! each logarithm, so a saturated prediction produces a large but finite loss:
//! ```text
//! p    = clamp(y_pred, eps, 1 - eps)
//! l_n  = -(y_n * ln(p_n + eps) + (1 - y_n) * ln(1 - p_n + eps))
//! Loss = mean(L)
//! ```
//! The mean is undefined for empty inputs, which are rejected.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    tensor::{backend::Backend, Tensor},
};

use crate::{
    cast::IntoFloatTensor,
    error::{ensure_non_empty, ensure_same_dims, LossResult},
};

/// Configuration for creating a [binary cross-entropy loss](BinaryCrossEntropy).
#[derive(Config, Debug)]
pub struct BinaryCrossEntropyConfig {
    /// Clamping margin for predicted probabilities. Default: 1e-7
    #[config(default = 1e-7)]
    pub epsilon: f64,
}

impl BinaryCrossEntropyConfig {
    /// Initialize [binary cross-entropy loss](BinaryCrossEntropy).
    pub fn init(&self) -> BinaryCrossEntropy {
        self.assertions();
        BinaryCrossEntropy {
            epsilon: self.epsilon,
        }
    }

    fn assertions(&self) {
        assert!(
            self.epsilon > 0.0 && self.epsilon < 0.5,
            "Epsilon for BinaryCrossEntropy must be in (0, 0.5), got {}",
            self.epsilon
        );
    }
}

/// Binary cross-entropy between ground truth labels and predicted probabilities.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct BinaryCrossEntropy {
    /// Clamping margin for predicted probabilities.
    pub epsilon: f64,
}

impl Default for BinaryCrossEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for BinaryCrossEntropy {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content.add("epsilon", &self.epsilon).optional()
    }
}

impl BinaryCrossEntropy {
    /// Create a new binary cross-entropy loss with default configuration.
    pub fn new() -> Self {
        BinaryCrossEntropyConfig::new().init()
    }

    /// Compute the mean loss over every element.
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
        let loss = self.forward_no_reduction(y_true, y_pred)?;
        ensure_non_empty("binary_cross_entropy", loss.dims())?;
        Ok(loss.mean())
    }

    /// Compute the elementwise loss.
    ///
    /// # Shapes
    ///
    /// - y_true: `[...dims]`
    /// - y_pred: `[...dims]` (same shape as `y_true`)
    /// - output: `[...dims]`
    pub fn forward_no_reduction<B: Backend, const D: usize>(
        &self,
        y_true: impl IntoFloatTensor<B, D>,
        y_pred: impl IntoFloatTensor<B, D>,
    ) -> LossResult<Tensor<B, D>> {
        let y_true = y_true.into_float_tensor();
        let y_pred = y_pred.into_float_tensor();
        ensure_same_dims("binary_cross_entropy", y_true.dims(), y_pred.dims())?;

        let y_pred = y_pred.clamp(self.epsilon, 1.0 - self.epsilon);
        let log_pred = y_pred.clone().add_scalar(self.epsilon).log();
        let log_one_minus_pred = y_pred.neg().add_scalar(1.0 + self.epsilon).log();
        let one_minus_true = y_true.clone().neg().add_scalar(1.0);

        Ok((y_true * log_pred + one_minus_true * log_one_minus_pred).neg())
    }
}

/// Mean binary cross-entropy with the default clamping margin.
pub fn binary_cross_entropy<B: Backend, const D: usize>(
    y_true: impl IntoFloatTensor<B, D>,
    y_pred: impl IntoFloatTensor<B, D>,
) -> LossResult<Tensor<B, 1>> {
    BinaryCrossEntropy::new().forward(y_true, y_pred)
}

#[cfg(test)]
mod tests {
    use burn::tensor::{cast::ToElement, TensorData, Tolerance};

    use super::*;
    use crate::{error::LossError, tests::TestBackend};

    #[test]
    fn bce_matches_log_loss_formula() {
        let device = Default::default();
        let y_true = Tensor::<TestBackend, 1>::from_floats([0.0, 1.0, 0.0, 1.0], &device);
        let y_pred = Tensor::<TestBackend, 1>::from_floats([0.1, 0.9, 0.3, 0.8], &device);

        let loss = binary_cross_entropy(y_true, y_pred).unwrap();

        let expected = -(0.9f64.ln() + 0.9f64.ln() + 0.7f64.ln() + 0.8f64.ln()) / 4.0;
        loss.into_data()
            .assert_approx_eq::<f32>(&TensorData::from([expected]), Tolerance::default());
    }

    #[test]
    fn bce_no_reduction_keeps_shape() {
        let device = Default::default();
        let y_true = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0], [1.0, 0.0]], &device);
        let y_pred = Tensor::<TestBackend, 2>::from_floats([[0.5, 0.5], [0.9, 0.1]], &device);

        let loss = BinaryCrossEntropy::new()
            .forward_no_reduction(y_true, y_pred)
            .unwrap();

        let half = -(0.5f64.ln());
        let confident = -(0.9f64.ln());
        loss.into_data().assert_approx_eq::<f32>(
            &TensorData::from([[half, half], [confident, confident]]),
            Tolerance::default(),
        );
    }

    #[test]
    fn bce_saturated_predictions_stay_finite() {
        let device = Default::default();
        let y_true = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0], &device);
        let y_pred = Tensor::<TestBackend, 1>::from_floats([0.0, 1.0], &device);

        let loss = binary_cross_entropy(y_true, y_pred)
            .unwrap()
            .into_scalar()
            .to_f64();

        assert!(loss.is_finite(), "got {loss}");
        assert!(loss > 10.0, "got {loss}");
    }

    #[test]
    fn bce_perfect_predictions_are_near_zero() {
        let device = Default::default();
        let labels = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0, 1.0], &device);

        let loss = binary_cross_entropy(labels.clone(), labels)
            .unwrap()
            .into_scalar()
            .to_f64();

        assert!(loss.abs() < 1e-5, "got {loss}");
    }

    #[test]
    fn bce_mismatched_shapes_fail() {
        let device = Default::default();
        let y_true = Tensor::<TestBackend, 2>::zeros([2, 3], &device);
        let y_pred = Tensor::<TestBackend, 2>::zeros([3, 2], &device);

        let result = binary_cross_entropy(y_true, y_pred);

        assert!(matches!(
            result,
            Err(LossError::ShapeMismatch {
                operation: "binary_cross_entropy",
                ..
            })
        ));
    }

    #[test]
    fn bce_empty_inputs_fail() {
        let device = Default::default();
        let empty = Tensor::<TestBackend, 1>::zeros([0], &device);

        let err = binary_cross_entropy(empty.clone(), empty).unwrap_err();

        assert_eq!(
            err,
            LossError::ShapeMismatch {
                operation: "binary_cross_entropy",
                expected: "non-empty tensor".to_owned(),
                actual: "[0]".to_owned(),
            }
        );
    }

    #[test]
    #[should_panic = "Epsilon for BinaryCrossEntropy must be in (0, 0.5)"]
    fn bce_config_oversized_epsilon_panics() {
        let _loss = BinaryCrossEntropyConfig::new().with_epsilon(0.5).init();
    }
}
