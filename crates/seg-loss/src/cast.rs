//! Conversion of loss inputs to floating point tensors.
//!
//! Every loss casts both `y_true` and `y_pred` to the backend float element
//! before doing any arithmetic, so integer or boolean masks can be passed
//! directly as ground truth (or prediction).

use burn::tensor::{backend::Backend, Bool, Float, Int, Tensor};

/// A tensor that can be cast to a float tensor of the same rank.
pub trait IntoFloatTensor<B: Backend, const D: usize> {
    /// Cast into a float tensor, keeping the shape.
    fn into_float_tensor(self) -> Tensor<B, D>;
}

impl<B: Backend, const D: usize> IntoFloatTensor<B, D> for Tensor<B, D, Float> {
    fn into_float_tensor(self) -> Tensor<B, D> {
        self
    }
}

impl<B: Backend, const D: usize> IntoFloatTensor<B, D> for Tensor<B, D, Int> {
    fn into_float_tensor(self) -> Tensor<B, D> {
        self.float()
    }
}

impl<B: Backend, const D: usize> IntoFloatTensor<B, D> for Tensor<B, D, Bool> {
    fn into_float_tensor(self) -> Tensor<B, D> {
        self.float()
    }
}

#[cfg(test)]
mod tests {
    use burn::tensor::TensorData;

    use super::*;
    use crate::tests::TestBackend;

    #[test]
    fn int_and_bool_masks_cast_to_matching_floats() {
        let device = Default::default();
        let ints =
            Tensor::<TestBackend, 2, Int>::from_data(TensorData::from([[1, 0], [0, 1]]), &device);
        let bools = Tensor::<TestBackend, 2, Bool>::from_data(
            TensorData::from([[true, false], [false, true]]),
            &device,
        );

        let expected = TensorData::from([[1.0f32, 0.0], [0.0, 1.0]]);
        ints
            .into_float_tensor()
            .into_data()
            .assert_eq(&expected, false);
        bools
            .into_float_tensor()
            .into_data()
            .assert_eq(&expected, false);
    }
}
