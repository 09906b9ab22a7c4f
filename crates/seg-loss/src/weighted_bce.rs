//! Foreground-weighted binary cross-entropy.
//!
//! Each pixel's cross-entropy is scaled by a weight derived from its label,
//! so foreground pixels count five times as much as background by default:
//! ```text
//! w_n  = foreground_weight * y_n + base_weight     (4 * y_n + 1)
//! Loss = mean(w * BCE(y_true, y_pred))
//! ```
//! Inputs are masks with a trailing channel axis of size one (`[..., 1]`).
//! The cross-entropy is averaged over that axis and the weights are taken
//! along it, which for a single channel is the plain elementwise product.

use burn::{
    config::Config,
    module::{Content, DisplaySettings, Module, ModuleDisplay},
    tensor::{backend::Backend, Tensor},
};

use crate::{
    bce::{BinaryCrossEntropy, BinaryCrossEntropyConfig},
    cast::IntoFloatTensor,
    error::{ensure_non_empty, ensure_same_dims, shape_mismatch, LossResult},
};

/// Configuration for creating a [weighted BCE loss](WeightedBceLoss).
#[derive(Config, Debug)]
pub struct WeightedBceLossConfig {
    /// Extra weight per unit of ground truth. Default: 4.0
    #[config(default = 4.0)]
    pub foreground_weight: f64,
    /// Weight of a background pixel. Default: 1.0
    #[config(default = 1.0)]
    pub base_weight: f64,
    /// Clamping margin for predicted probabilities. Default: 1e-7
    #[config(default = 1e-7)]
    pub epsilon: f64,
}

impl WeightedBceLossConfig {
    /// Initialize [weighted BCE loss](WeightedBceLoss).
    pub fn init(&self) -> WeightedBceLoss {
        self.assertions();
        WeightedBceLoss {
            foreground_weight: self.foreground_weight,
            base_weight: self.base_weight,
            bce: BinaryCrossEntropyConfig::new()
                .with_epsilon(self.epsilon)
                .init(),
        }
    }

    fn assertions(&self) {
        assert!(
            self.base_weight > 0.0,
            "Base weight for WeightedBceLoss must be positive, got {}",
            self.base_weight
        );
        assert!(
            self.foreground_weight >= 0.0,
            "Foreground weight for WeightedBceLoss must not be negative, got {}",
            self.foreground_weight
        );
    }
}

/// Binary cross-entropy weighted towards foreground pixels.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct WeightedBceLoss {
    /// Extra weight per unit of ground truth.
    pub foreground_weight: f64,
    /// Weight of a background pixel.
    pub base_weight: f64,
    /// Unweighted elementwise cross-entropy.
    pub bce: BinaryCrossEntropy,
}

impl Default for WeightedBceLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleDisplay for WeightedBceLoss {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content
            .add("foreground_weight", &self.foreground_weight)
            .add("base_weight", &self.base_weight)
            .add("epsilon", &self.bce.epsilon)
            .optional()
    }
}

impl WeightedBceLoss {
    /// Create a new weighted BCE loss with default configuration.
    pub fn new() -> Self {
        WeightedBceLossConfig::new().init()
    }

    /// Compute the weighted mean cross-entropy.
    ///
    /// # Shapes
    ///
    /// - y_true: `[...dims, 1]`
    /// - y_pred: `[...dims, 1]` (same shape as `y_true`)
    /// - output: `[1]`
    pub fn forward<B: Backend, const D: usize>(
        &self,
        y_true: impl IntoFloatTensor<B, D>,
        y_pred: impl IntoFloatTensor<B, D>,
    ) -> LossResult<Tensor<B, 1>> {
        let y_true = y_true.into_float_tensor();
        let y_pred = y_pred.into_float_tensor();

        let dims = y_true.dims();
        if dims.last() != Some(&1) {
            return Err(shape_mismatch(
                "weighted_bce",
                "[..., 1]",
                format!("{dims:?}"),
            ));
        }
        ensure_same_dims("weighted_bce", dims, y_pred.dims())?;
        ensure_non_empty("weighted_bce", dims)?;

        let channel_axis = D - 1;
        let bce = self
            .bce
            .forward_no_reduction(y_true.clone(), y_pred)?
            .mean_dim(channel_axis);
        let weights = y_true
            .mul_scalar(self.foreground_weight)
            .add_scalar(self.base_weight);

        Ok((weights * bce).mean())
    }
}

/// Weighted BCE with foreground weight `4 * y_true + 1`.
pub fn weighted_bce<B: Backend, const D: usize>(
    y_true: impl IntoFloatTensor<B, D>,
    y_pred: impl IntoFloatTensor<B, D>,
) -> LossResult<Tensor<B, 1>> {
    WeightedBceLoss::new().forward(y_true, y_pred)
}

#[cfg(test)]
mod tests {
    use burn::tensor::{Int, TensorData, Tolerance, Transaction};

    use super::*;
    use crate::{bce::binary_cross_entropy, error::LossError, tests::TestBackend};

    #[test]
    fn weighted_bce_emphasizes_foreground() {
        let device = Default::default();
        let y_true = Tensor::<TestBackend, 2>::from_floats([[1.0], [0.0]], &device);
        let y_pred = Tensor::<TestBackend, 2>::from_floats([[0.8], [0.3]], &device);

        let loss = weighted_bce(y_true, y_pred).unwrap();

        let expected = (5.0 * -(0.8f64.ln()) + -(0.7f64.ln())) / 2.0;
        loss.into_data()
            .assert_approx_eq::<f32>(&TensorData::from([expected]), Tolerance::default());
    }

    #[test]
    fn weighted_bce_background_only_equals_plain_bce() {
        let device = Default::default();
        let y_true = Tensor::<TestBackend, 4>::zeros([1, 2, 2, 1], &device);
        let y_pred = Tensor::<TestBackend, 4>::from_data(
            TensorData::from([[[[0.2], [0.4]], [[0.1], [0.7]]]]),
            &device,
        );

        let weighted = weighted_bce(y_true.clone(), y_pred.clone()).unwrap();
        let plain = binary_cross_entropy(y_true, y_pred).unwrap();

        let [weighted_data, plain_data] = Transaction::default()
            .register(weighted)
            .register(plain)
            .execute()
            .try_into()
            .expect("Correct amount of tensor data");

        weighted_data.assert_approx_eq::<f32>(&plain_data, Tolerance::default());
    }

    #[test]
    fn weighted_bce_casts_integer_masks() {
        let device = Default::default();
        let y_true_int = Tensor::<TestBackend, 2, Int>::from_data(
            TensorData::from([[1], [0], [1]]),
            &device,
        );
        let y_true_float = Tensor::<TestBackend, 2>::from_floats([[1.0], [0.0], [1.0]], &device);
        let y_pred = Tensor::<TestBackend, 2>::from_floats([[0.6], [0.2], [0.9]], &device);

        let from_int = weighted_bce(y_true_int, y_pred.clone()).unwrap();
        let from_float = weighted_bce(y_true_float, y_pred).unwrap();

        from_int
            .into_data()
            .assert_approx_eq::<f32>(&from_float.into_data(), Tolerance::default());
    }

    #[test]
    fn weighted_bce_custom_weights_are_applied() {
        let device = Default::default();
        let y_true = Tensor::<TestBackend, 2>::from_floats([[1.0], [0.0]], &device);
        let y_pred = Tensor::<TestBackend, 2>::from_floats([[0.5], [0.5]], &device);

        let loss = WeightedBceLossConfig::new()
            .with_foreground_weight(0.0)
            .with_base_weight(2.0)
            .init()
            .forward(y_true, y_pred)
            .unwrap();

        let expected = 2.0 * -(0.5f64.ln());
        loss.into_data()
            .assert_approx_eq::<f32>(&TensorData::from([expected]), Tolerance::default());
    }

    #[test]
    fn weighted_bce_requires_trailing_singleton_dimension() {
        let device = Default::default();
        let y_true = Tensor::<TestBackend, 2>::zeros([2, 2], &device);
        let y_pred = Tensor::<TestBackend, 2>::zeros([2, 2], &device);

        let err = weighted_bce(y_true, y_pred).unwrap_err();

        assert_eq!(
            err,
            LossError::ShapeMismatch {
                operation: "weighted_bce",
                expected: "[..., 1]".to_owned(),
                actual: "[2, 2]".to_owned(),
            }
        );
    }

    #[test]
    fn weighted_bce_mismatched_shapes_fail() {
        let device = Default::default();
        let y_true = Tensor::<TestBackend, 3>::zeros([2, 3, 1], &device);
        let y_pred = Tensor::<TestBackend, 3>::zeros([3, 2, 1], &device);

        let err = weighted_bce(y_true, y_pred).unwrap_err();

        assert_eq!(
            err,
            LossError::ShapeMismatch {
                operation: "weighted_bce",
                expected: "[2, 3, 1]".to_owned(),
                actual: "[3, 2, 1]".to_owned(),
            }
        );
    }

    #[test]
    fn weighted_bce_empty_inputs_fail() {
        let device = Default::default();
        let empty = Tensor::<TestBackend, 3>::zeros([2, 0, 1], &device);

        let err = weighted_bce(empty.clone(), empty).unwrap_err();

        assert_eq!(
            err,
            LossError::ShapeMismatch {
                operation: "weighted_bce",
                expected: "non-empty tensor".to_owned(),
                actual: "[2, 0, 1]".to_owned(),
            }
        );
    }

    #[test]
    #[should_panic = "Base weight for WeightedBceLoss must be positive"]
    fn weighted_bce_config_zero_base_weight_panics() {
        let _loss = WeightedBceLossConfig::new().with_base_weight(0.0).init();
    }
}
