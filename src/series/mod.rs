//! Distance time series over a whole grid.
//!
//! [`assemble`] evaluates [`pairwise::compute`](crate::pairwise::compute) at every
//! instant of the grid, in order, and returns a [`DistanceTensor`] whose sample `i`
//! belongs to `grid[i]`. The first failing instant aborts the assembly: no partial
//! tensor is ever returned.
//!
//! With the `parallel` feature, [`assemble_parallel`] does the same work on the rayon
//! thread pool, one chunk of the grid at a time, and keeps the grid order.

pub mod progress;

use hifitime::Epoch;

use crate::{
    bodies::BodySet,
    condensed::CondensedDistances,
    constants::{Kilometer, DEFAULT_PROGRESS_CHUNKS},
    jpl_ephem::PositionOracle,
    pairwise,
    syzygy_errors::SyzygyError,
};

use progress::{Progress, ProgressObserver};

/// Condensed distances at one grid instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSample {
    pub instant: Epoch,
    pub distances: CondensedDistances,
}

/// All samples of a run, in grid order, with the bodies they index.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTensor {
    bodies: BodySet,
    samples: Vec<DistanceSample>,
}

impl DistanceTensor {
    /// Bundle samples computed for `bodies`.
    ///
    /// Every sample must hold the pairs of exactly `bodies.len()` bodies and instants
    /// must be strictly increasing.
    pub fn new(bodies: BodySet, samples: Vec<DistanceSample>) -> Result<Self, SyzygyError> {
        if let Some(bad) = samples
            .iter()
            .find(|s| s.distances.n_bodies() != bodies.len())
        {
            return Err(SyzygyError::InvalidParameters(format!(
                "sample at {} holds distances for {} bodies, expected {}",
                bad.instant,
                bad.distances.n_bodies(),
                bodies.len()
            )));
        }
        if let Some(w) = samples.windows(2).find(|w| w[0].instant >= w[1].instant) {
            return Err(SyzygyError::InvalidParameters(format!(
                "samples are not in increasing time order ({} then {})",
                w[0].instant, w[1].instant
            )));
        }
        Ok(DistanceTensor { bodies, samples })
    }

    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    pub fn samples(&self) -> &[DistanceSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DistanceSample> {
        self.samples.iter()
    }

    pub fn instants(&self) -> Vec<Epoch> {
        self.samples.iter().map(|s| s.instant).collect()
    }

    /// Distances from body `body` to every other body, one row per instant.
    ///
    /// Columns follow the body order with `body` itself left out.
    pub fn body_series(
        &self,
        body: usize,
    ) -> impl Iterator<Item = (Epoch, Vec<Kilometer>)> + '_ {
        self.samples
            .iter()
            .map(move |s| (s.instant, s.distances.distances_from(body)))
    }
}

impl<'a> IntoIterator for &'a DistanceTensor {
    type Item = &'a DistanceSample;
    type IntoIter = std::slice::Iter<'a, DistanceSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Number of instants between two progress observations.
///
/// `0` selects the default: a tenth of the grid, at least one instant.
pub fn progress_cadence(grid_len: usize, progress_every: usize) -> usize {
    if progress_every == 0 {
        (grid_len / DEFAULT_PROGRESS_CHUNKS).max(1)
    } else {
        progress_every
    }
}

/// Compute the condensed distances at every instant of `grid`.
///
/// Arguments
/// -----------------
/// * `oracle`: position source.
/// * `bodies`: bodies in output order.
/// * `grid`: sample instants, increasing.
/// * `progress_every`: instants between two observations, `0` for the default.
/// * `observer`: receives the observations and a final one on the last instant.
///
/// Return
/// ----------
/// * The tensor, or the first [`SyzygyError::OracleLookup`] met, carrying the grid
///   index of its instant.
pub fn assemble<O, P>(
    oracle: &O,
    bodies: &BodySet,
    grid: &[Epoch],
    progress_every: usize,
    observer: &mut P,
) -> Result<DistanceTensor, SyzygyError>
where
    O: PositionOracle + ?Sized,
    P: ProgressObserver + ?Sized,
{
    let every = progress_cadence(grid.len(), progress_every);
    let total = grid.len();

    let mut samples = Vec::with_capacity(total);
    for (index, &instant) in grid.iter().enumerate() {
        let distances = pairwise::compute(oracle, bodies, instant)
            .map_err(|e| e.at_grid_index(index))?;
        samples.push(DistanceSample { instant, distances });

        if (index + 1) % every == 0 || index + 1 == total {
            observer.observe(Progress::new(index, total));
        }
    }
    observer.finish();

    DistanceTensor::new(bodies.clone(), samples)
}

/// Number of instants evaluated together by [`assemble_parallel`].
///
/// At least one progress cadence, and never fewer instants than worker threads.
#[cfg(feature = "parallel")]
pub fn parallel_chunk_len(grid_len: usize, progress_every: usize) -> usize {
    progress_cadence(grid_len, progress_every).max(rayon::current_num_threads())
}

/// [`assemble`] on the rayon thread pool.
///
/// The grid is cut into chunks of [`parallel_chunk_len`] instants. A chunk is computed
/// in parallel and its results are kept in grid order. Once an instant fails, the
/// instants of the chunk after it are skipped, the failure with the lowest grid index
/// is returned and no later chunk is started. Observations are emitted at chunk ends.
#[cfg(feature = "parallel")]
pub fn assemble_parallel<O, P>(
    oracle: &O,
    bodies: &BodySet,
    grid: &[Epoch],
    progress_every: usize,
    observer: &mut P,
) -> Result<DistanceTensor, SyzygyError>
where
    O: PositionOracle + Sync + ?Sized,
    P: ProgressObserver + ?Sized,
{
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rayon::prelude::*;

    let chunk_len = parallel_chunk_len(grid.len(), progress_every);
    let total = grid.len();

    let mut samples = Vec::with_capacity(total);
    for (chunk_index, chunk) in grid.chunks(chunk_len).enumerate() {
        let offset = chunk_index * chunk_len;
        // lowest failing position inside the chunk
        let first_failure = AtomicUsize::new(usize::MAX);

        let results: Vec<Option<Result<DistanceSample, SyzygyError>>> = chunk
            .par_iter()
            .enumerate()
            .map(|(k, &instant)| {
                if k > first_failure.load(Ordering::Relaxed) {
                    return None;
                }
                let result = pairwise::compute(oracle, bodies, instant)
                    .map(|distances| DistanceSample { instant, distances })
                    .map_err(|e| e.at_grid_index(offset + k));
                if result.is_err() {
                    first_failure.fetch_min(k, Ordering::Relaxed);
                }
                Some(result)
            })
            .collect();

        // every instant before the first failure was computed
        for result in results.into_iter().flatten() {
            samples.push(result?);
        }
        observer.observe(Progress::new(offset + chunk.len() - 1, total));
    }
    observer.finish();

    DistanceTensor::new(bodies.clone(), samples)
}
