//! CSV tables of a run.
//!
//! Two shapes are written:
//! * the mean table, a full symmetric matrix with the body names as header and first column,
//! * one time series per body, `DateTime` then the distance to every other body, in km.

use std::{fs, io::Write};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::{
    bodies::BodySet,
    condensed::CondensedDistances,
    constants::{BODY_SERIES_PREFIX, MEAN_TABLE_FILENAME},
    run::DistanceRun,
    series::DistanceTensor,
    syzygy_errors::SyzygyError,
    time::format_utc,
};

/// Write the mean distances as an `N × N` table.
///
/// Header `["", body_1, …, body_N]`, then one row per body starting with its name.
pub fn write_mean_table<W: Write>(
    writer: W,
    bodies: &BodySet,
    mean: &CondensedDistances,
) -> Result<(), SyzygyError> {
    if mean.n_bodies() != bodies.len() {
        return Err(SyzygyError::InvalidParameters(format!(
            "mean vector covers {} bodies, the set holds {}",
            mean.n_bodies(),
            bodies.len()
        )));
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(std::iter::once("").chain(bodies.iter().map(|b| b.name())))?;

    let square = mean.to_square();
    for (i, body) in bodies.iter().enumerate() {
        let row = square.row(i);
        wtr.write_record(
            std::iter::once(body.name().to_string()).chain(row.iter().map(|d| d.to_string())),
        )?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the distances from body `body` to the others, one row per instant.
pub fn write_body_series<W: Write>(
    writer: W,
    tensor: &DistanceTensor,
    body: usize,
) -> Result<(), SyzygyError> {
    let bodies = tensor.bodies();
    if body >= bodies.len() {
        return Err(SyzygyError::InvalidParameters(format!(
            "body index {body} out of range for {} bodies",
            bodies.len()
        )));
    }

    let mut wtr = csv::Writer::from_writer(writer);
    let header = std::iter::once("DateTime".to_string()).chain(
        bodies
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != body)
            .map(|(_, other)| format!("{} (km)", other.name())),
    );
    wtr.write_record(header)?;

    for (instant, distances) in tensor.body_series(body) {
        wtr.write_record(
            std::iter::once(format_utc(&instant)).chain(distances.iter().map(|d| d.to_string())),
        )?;
    }
    wtr.flush()?;
    Ok(())
}

/// File name of the time series of `body_name`.
pub fn body_series_filename(body_name: &str) -> String {
    format!("{BODY_SERIES_PREFIX}{body_name}.csv")
}

fn create(path: &Utf8Path) -> Result<fs::File, SyzygyError> {
    Ok(fs::File::create(path)?)
}

/// Write the mean table and every per-body series into `dir`, created when missing.
///
/// Return
/// ----------
/// * The written paths, mean table first, then the series in body order.
pub fn write_all(dir: &Utf8Path, run: &DistanceRun) -> Result<Vec<Utf8PathBuf>, SyzygyError> {
    fs::create_dir_all(dir)?;
    let bodies = run.bodies();

    let mut written = Vec::with_capacity(bodies.len() + 1);

    let mean_path = dir.join(MEAN_TABLE_FILENAME);
    write_mean_table(create(&mean_path)?, bodies, &run.mean)?;
    info!("Mean distances written to {mean_path}");
    written.push(mean_path);

    for (index, body) in bodies.iter().enumerate() {
        let path = dir.join(body_series_filename(body.name()));
        write_body_series(create(&path)?, &run.tensor, index)?;
        written.push(path);
    }
    info!("{} distance series written to {dir}", bodies.len());

    Ok(written)
}
