//! Run configuration and the end-to-end pipeline.
//!
//! A run chains the components in a fixed order and stops at the first error:
//!
//! ```text
//! generate grid -> resolve bodies -> validate boundaries -> assemble tensor -> aggregate
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use syzygy::jpl_ephem::naif::naif_data::NaifData;
//! use syzygy::run::{run, RunParams};
//! use syzygy::series::progress::LogProgress;
//!
//! let kernel = NaifData::read_naif_file(Utf8Path::new("de440.bsp")).unwrap();
//! let params = RunParams::builder()
//!     .duration_days(365.25)
//!     .step_hours(6.0)
//!     .build()
//!     .unwrap();
//! let result = run(&kernel, &params, &mut LogProgress::new()).unwrap();
//! println!("{} samples", result.tensor.len());
//! ```

use std::{
    cmp::Ordering::Greater,
    fmt,
    time::{Duration, Instant},
};

use hifitime::Epoch;
use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    aggregate::aggregate,
    bodies::BodySet,
    condensed::CondensedDistances,
    constants::{
        DEFAULT_NUM_DAYS, DEFAULT_START_DATE, DEFAULT_STEP_HOURS, SOLAR_SYSTEM_BODIES,
    },
    jpl_ephem::PositionOracle,
    range_check,
    series::{
        self,
        progress::{fmt_dur, ProgressObserver},
        DistanceTensor,
    },
    syzygy_errors::SyzygyError,
    time::format_utc,
    time_grid::{self, TimeGrid},
};

/// Parameters of a distance run.
///
/// `Default` is the reference run: the Sun and the nine planetary barycenters, from
/// 1550-01-01 over 248×365×4 days, one sample per day.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    /// Body identifiers, in output order.
    pub body_names: Vec<String>,
    pub start: Epoch,
    pub duration_days: f64,
    pub step_hours: f64,
    /// Instants between two progress observations, `None` for a tenth of the grid.
    pub progress_every: Option<usize>,
}

impl RunParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RunParamsBuilder {
        RunParamsBuilder::new()
    }

    /// Progress cadence as understood by the assembler (`0` = default).
    fn progress_every_or_default(&self) -> usize {
        self.progress_every.unwrap_or(0)
    }
}

impl Default for RunParams {
    fn default() -> Self {
        let (year, month, day) = DEFAULT_START_DATE;
        RunParams {
            body_names: SOLAR_SYSTEM_BODIES.iter().map(|s| s.to_string()).collect(),
            start: Epoch::from_gregorian_utc_at_midnight(year, month, day),
            duration_days: DEFAULT_NUM_DAYS,
            step_hours: DEFAULT_STEP_HOURS,
            progress_every: None,
        }
    }
}

impl fmt::Display for RunParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} objects [{}] from {} over {} days, one sample every {} hours",
            self.body_names.len(),
            self.body_names.iter().join(", "),
            format_utc(&self.start),
            self.duration_days,
            self.step_hours
        )
    }
}

/// Builder for [`RunParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct RunParamsBuilder {
    params: RunParams,
}

impl RunParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: RunParams::default(),
        }
    }

    pub fn bodies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.body_names = names.into_iter().map(Into::into).collect();
        self
    }
    pub fn start(mut self, v: Epoch) -> Self {
        self.params.start = v;
        self
    }
    pub fn duration_days(mut self, v: f64) -> Self {
        self.params.duration_days = v;
        self
    }
    pub fn step_hours(mut self, v: f64) -> Self {
        self.params.step_hours = v;
        self
    }
    pub fn progress_every(mut self, v: usize) -> Self {
        self.params.progress_every = (v > 0).then_some(v);
        self
    }

    /// Return true iff x > 0.0, finite and not NaN.
    #[inline]
    fn gt0(x: f64) -> bool {
        x.is_finite() && x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Validate and produce the parameters.
    ///
    /// Validation rules
    /// -----------------
    /// * `duration_days > 0`, `step_hours > 0`, both finite.
    /// * at least two bodies, no name listed twice, no empty name.
    pub fn build(self) -> Result<RunParams, SyzygyError> {
        let p = &self.params;

        if !Self::gt0(p.duration_days) {
            return Err(SyzygyError::InvalidParameters(format!(
                "duration_days must be > 0, got {}",
                p.duration_days
            )));
        }
        if !Self::gt0(p.step_hours) {
            return Err(SyzygyError::InvalidParameters(format!(
                "step_hours must be > 0, got {}",
                p.step_hours
            )));
        }
        if p.body_names.len() < 2 {
            return Err(SyzygyError::InvalidParameters(format!(
                "at least two bodies are required, got {}",
                p.body_names.len()
            )));
        }
        if p.body_names.iter().any(|name| name.trim().is_empty()) {
            return Err(SyzygyError::InvalidParameters(
                "body names must not be empty".into(),
            ));
        }
        if let Some(dup) = p.body_names.iter().duplicates().next() {
            return Err(SyzygyError::DuplicateBody(dup.clone()));
        }

        Ok(self.params)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct DistanceRun {
    pub tensor: DistanceTensor,
    pub mean: CondensedDistances,
    /// Wall-clock time of the assembly and the aggregation.
    pub elapsed: Duration,
}

impl DistanceRun {
    pub fn bodies(&self) -> &BodySet {
        self.tensor.bodies()
    }
}

/// Everything a run needs before the bulk computation: grid, bodies, checked boundaries.
fn prepare<O: PositionOracle + ?Sized>(
    oracle: &O,
    params: &RunParams,
) -> Result<(TimeGrid, BodySet), SyzygyError> {
    let grid = time_grid::generate(params.start, params.duration_days, params.step_hours)?;
    let bodies = BodySet::resolve(oracle, &params.body_names)?;

    info!("Number of objects: {}", bodies.len());
    info!("Start date: {}", format_utc(&params.start));
    info!("Number of days: {}", params.duration_days);
    info!("Step: {} hours ({} instants)", params.step_hours, grid.len());
    if let Some((start, end)) = oracle.coverage() {
        debug!("ephemeris coverage: {} to {}", format_utc(&start), format_utc(&end));
    }

    if let (Some(&first), Some(&last)) = (grid.first(), grid.last()) {
        range_check::validate(oracle, &bodies, first, last)?;
    }
    Ok((grid, bodies))
}

fn finish(tensor: DistanceTensor, started: Instant) -> Result<DistanceRun, SyzygyError> {
    let mean = aggregate(&tensor)?;
    let elapsed = started.elapsed();
    info!("Run time: {}", fmt_dur(elapsed));
    Ok(DistanceRun {
        tensor,
        mean,
        elapsed,
    })
}

/// Compute the distance tensor and its temporal mean.
///
/// Arguments
/// -----------------
/// * `oracle`: position source.
/// * `params`: run parameters.
/// * `observer`: progress sink for the assembly.
///
/// Return
/// ----------
/// * [`DistanceRun`], or the first error: [`SyzygyError::InvalidParameters`],
///   [`SyzygyError::BodyResolution`], [`SyzygyError::RangeError`],
///   [`SyzygyError::OracleLookup`] or [`SyzygyError::EmptyTensor`].
pub fn run<O, P>(oracle: &O, params: &RunParams, observer: &mut P) -> Result<DistanceRun, SyzygyError>
where
    O: PositionOracle + ?Sized,
    P: ProgressObserver + ?Sized,
{
    let (grid, bodies) = prepare(oracle, params)?;

    let started = Instant::now();
    let tensor = series::assemble(
        oracle,
        &bodies,
        &grid,
        params.progress_every_or_default(),
        observer,
    )?;
    finish(tensor, started)
}

/// [`run`] with the assembly spread over the rayon thread pool.
#[cfg(feature = "parallel")]
pub fn run_parallel<O, P>(
    oracle: &O,
    params: &RunParams,
    observer: &mut P,
) -> Result<DistanceRun, SyzygyError>
where
    O: PositionOracle + Sync + ?Sized,
    P: ProgressObserver + ?Sized,
{
    let (grid, bodies) = prepare(oracle, params)?;

    let started = Instant::now();
    let tensor = series::assemble_parallel(
        oracle,
        &bodies,
        &grid,
        params.progress_every_or_default(),
        observer,
    )?;
    finish(tensor, started)
}
