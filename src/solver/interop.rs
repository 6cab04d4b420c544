//! Optional conversions from solver tables to numeric backends.
//! Gated behind feature flags so the core crate keeps plain `Vec` storage.

#[cfg(feature = "ndarray")]
pub mod ndarray_impl {
    use crate::solver::tables::{PolicyTable, ValueTable};
    use ndarray::Array2;

    impl ValueTable {
        /// Dense `rows x cols` array; wall cells become NaN.
        pub fn to_ndarray(&self) -> Array2<f64> {
            Array2::from_shape_fn((self.rows(), self.cols()), |(i, j)| self.get(i, j).unwrap_or(f64::NAN))
        }
    }

    impl PolicyTable {
        /// Action indices in `ACTION_ORDER`; -1 for walls and goals.
        pub fn to_ndarray(&self) -> Array2<i8> {
            Array2::from_shape_fn((self.rows(), self.cols()), |(i, j)| {
                self.action(i, j).map(|a| a.index() as i8).unwrap_or(-1)
            })
        }
    }

}
