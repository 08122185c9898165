//! Regular sampling of a time span.

use hifitime::{Duration, Epoch};

use crate::{
    syzygy_errors::SyzygyError,
    time::{days, hours},
};

/// Ordered sample instants of a run.
pub type TimeGrid = Vec<Epoch>;

fn check_positive(name: &str, value: f64) -> Result<(), SyzygyError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SyzygyError::InvalidParameters(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

/// Sample instants from `start` until the nominal end `start + duration_days` is met.
///
/// The first instant is `start`. The step is added until the running instant reaches
/// or passes the nominal end, and that instant is kept: the grid overshoots the end by
/// less than one step. The step is accumulated as an exact [`Duration`], so the grid
/// does not drift over long spans.
///
/// Arguments
/// -----------------
/// * `start`: first instant of the grid.
/// * `duration_days`: nominal span, in days.
/// * `step_hours`: spacing between two instants, in hours.
///
/// Return
/// ----------
/// * The strictly increasing grid, or [`SyzygyError::InvalidParameters`] when the
///   duration or the step is not positive, or when the step is below one nanosecond.
pub fn generate(
    start: Epoch,
    duration_days: f64,
    step_hours: f64,
) -> Result<TimeGrid, SyzygyError> {
    check_positive("duration_days", duration_days)?;
    check_positive("step_hours", step_hours)?;

    let step = hours(step_hours);
    if step <= Duration::ZERO {
        return Err(SyzygyError::InvalidParameters(format!(
            "step of {step_hours} hours is below the one nanosecond resolution"
        )));
    }

    let end = start + days(duration_days);
    let expected = (duration_days * 24.0 / step_hours).ceil() as usize + 1;

    let mut grid = Vec::with_capacity(expected);
    let mut instant = start;
    grid.push(instant);
    while instant < end {
        instant = instant + step;
        grid.push(instant);
    }
    Ok(grid)
}
