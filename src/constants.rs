//! # Constants and type definitions for syzygy
//!
//! Unit conversions, the reference body list, and the defaults of the
//! reference run (roughly four Pluto orbits starting on 1550-01-01, sampled daily).

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Distance in kilometers
pub type Kilometer = f64;

/// Oracle-specific handle of a resolved body (a NAIF integer id for SPK kernels)
pub type BodyCode = i32;

// -------------------------------------------------------------------------------------------------
// Reference run
// -------------------------------------------------------------------------------------------------

/// Sun, the eight planetary barycenters and Pluto's barycenter, in output order.
pub const SOLAR_SYSTEM_BODIES: [&str; 10] = [
    "SUN",
    "MERCURY_BARYCENTER",
    "VENUS_BARYCENTER",
    "EARTH_BARYCENTER",
    "MARS_BARYCENTER",
    "JUPITER_BARYCENTER",
    "SATURN_BARYCENTER",
    "URANUS_BARYCENTER",
    "NEPTUNE_BARYCENTER",
    "PLUTO_BARYCENTER",
];

/// Four orbits of Pluto (248 Earth years each)
pub const DEFAULT_NUM_DAYS: f64 = (248 * 365 * 4) as f64;

pub const DEFAULT_STEP_HOURS: f64 = 24.0;

/// Start of the reference run, UTC calendar date (year, month, day)
pub const DEFAULT_START_DATE: (i32, u8, u8) = (1550, 1, 1);

/// Number of progress observations emitted by default over a whole grid
pub const DEFAULT_PROGRESS_CHUNKS: usize = 10;

// -------------------------------------------------------------------------------------------------
// Output files
// -------------------------------------------------------------------------------------------------

pub const MEAN_TABLE_FILENAME: &str = "mean_pairwise_distances.csv";

pub const BODY_SERIES_PREFIX: &str = "pairwise_distances-";
