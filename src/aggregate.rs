//! Temporal reduction of a distance tensor.

use crate::{
    condensed::CondensedDistances, series::DistanceTensor, syzygy_errors::SyzygyError,
};

/// Element-wise mean of the condensed vectors of `tensor`.
///
/// The mean is updated incrementally (`m += (x - m) / k`): identical samples give
/// back their exact value.
///
/// Return
/// ----------
/// * The mean vector, or [`SyzygyError::EmptyTensor`] for a tensor without samples.
pub fn aggregate(tensor: &DistanceTensor) -> Result<CondensedDistances, SyzygyError> {
    let mut samples = tensor.iter();
    let first = samples.next().ok_or(SyzygyError::EmptyTensor)?;

    let mut mean = first.distances.values().to_vec();
    for (k, sample) in samples.enumerate() {
        let count = (k + 2) as f64;
        for (m, x) in mean.iter_mut().zip(sample.distances.values()) {
            *m += (x - *m) / count;
        }
    }

    CondensedDistances::new(tensor.bodies().len(), mean)
}
