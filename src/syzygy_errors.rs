use std::fmt;

use hifitime::Epoch;
use thiserror::Error;

/// Failure reported by a [`PositionOracle`](crate::jpl_ephem::PositionOracle).
///
/// These errors never surface alone from the pipeline: they are wrapped into a
/// [`SyzygyError`] carrying the body, instant, or boundary they relate to.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Unknown body identifier: {0}")]
    UnknownBody(String),

    #[error("No ephemeris segment for NAIF id {0}")]
    MissingSegment(i32),

    #[error("Epoch {epoch} is outside of the ephemeris coverage [{start}, {end}]")]
    OutOfCoverage {
        epoch: Epoch,
        start: Epoch,
        end: Epoch,
    },

    #[error("Center chain of NAIF id {0} never reaches the Solar System Barycenter")]
    BrokenCenterChain(i32),

    #[error("Position unavailable: {0}")]
    Unavailable(String),
}

/// Which end of the time grid failed the range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Start => write!(f, "start"),
            Boundary::End => write!(f, "end"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SyzygyError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("{boundary} instant ({instant}) is outside of the allowed range: {cause}")]
    RangeError {
        boundary: Boundary,
        instant: Epoch,
        #[source]
        cause: OracleError,
    },

    #[error("Unable to resolve the position of {body} at {instant}: {cause}")]
    OracleLookup {
        body: String,
        instant: Epoch,
        /// Grid index of `instant`, filled in by the assembler.
        index: Option<usize>,
        #[source]
        cause: OracleError,
    },

    #[error("Cannot aggregate an empty distance tensor")]
    EmptyTensor,

    #[error("Unable to resolve body {name}: {cause}")]
    BodyResolution {
        name: String,
        #[source]
        cause: OracleError,
    },

    #[error("Body listed more than once: {0}")]
    DuplicateBody(String),

    #[error("Invalid JPL ephemeris file source: {0}")]
    InvalidEphemFileSource(String),

    #[error("Invalid NAIF ephemeris version: {0}")]
    InvalidNaifVersion(String),

    #[error("JPL file not found at: {0}")]
    JPLFileNotFound(String),

    #[error("Malformed SPK kernel: {0}")]
    EphemFileParse(String),

    #[error("Unsupported SPK data type: {0}")]
    UnsupportedSpkDataType(i32),

    #[error("Kernel download failed: {0}")]
    DownloadError(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl SyzygyError {
    /// Attach the grid index to an [`SyzygyError::OracleLookup`]; other variants pass through.
    pub(crate) fn at_grid_index(self, grid_index: usize) -> Self {
        match self {
            SyzygyError::OracleLookup {
                body,
                instant,
                cause,
                ..
            } => SyzygyError::OracleLookup {
                body,
                instant,
                index: Some(grid_index),
                cause,
            },
            other => other,
        }
    }
}

impl PartialEq for SyzygyError {
    fn eq(&self, other: &Self) -> bool {
        use SyzygyError::*;
        match (self, other) {
            (InvalidParameters(a), InvalidParameters(b)) => a == b,
            (
                RangeError {
                    boundary: b1,
                    instant: i1,
                    cause: c1,
                },
                RangeError {
                    boundary: b2,
                    instant: i2,
                    cause: c2,
                },
            ) => b1 == b2 && i1 == i2 && c1 == c2,
            (
                OracleLookup {
                    body: b1,
                    instant: i1,
                    index: x1,
                    cause: c1,
                },
                OracleLookup {
                    body: b2,
                    instant: i2,
                    index: x2,
                    cause: c2,
                },
            ) => b1 == b2 && i1 == i2 && x1 == x2 && c1 == c2,
            (EmptyTensor, EmptyTensor) => true,
            (
                BodyResolution {
                    name: n1,
                    cause: c1,
                },
                BodyResolution {
                    name: n2,
                    cause: c2,
                },
            ) => n1 == n2 && c1 == c2,
            (DuplicateBody(a), DuplicateBody(b)) => a == b,
            (InvalidEphemFileSource(a), InvalidEphemFileSource(b)) => a == b,
            (InvalidNaifVersion(a), InvalidNaifVersion(b)) => a == b,
            (JPLFileNotFound(a), JPLFileNotFound(b)) => a == b,
            (EphemFileParse(a), EphemFileParse(b)) => a == b,
            (UnsupportedSpkDataType(a), UnsupportedSpkDataType(b)) => a == b,
            (DownloadError(a), DownloadError(b)) => a == b,

            // Wrapped errors are not comparable: same variant means equal.
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
