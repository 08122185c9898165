//! # syzygy
//!
//! Time series of the pairwise distances between solar system bodies, sampled on a
//! regular grid from a JPL/NAIF SPK ephemeris, and their temporal mean.
//!
//! ## Pipeline
//! 1. [`time_grid::generate`] builds the sample instants,
//! 2. [`range_check::validate`] checks both ends of the grid against the ephemeris,
//! 3. [`series::assemble`] evaluates [`pairwise::compute`] at every instant,
//! 4. [`aggregate::aggregate`] reduces the tensor to a mean condensed vector,
//! 5. [`output`] writes the CSV tables.
//!
//! [`run::run`] chains steps 1 to 4. Positions come from any
//! [`jpl_ephem::PositionOracle`]; [`jpl_ephem::naif::naif_data::NaifData`] reads them
//! from a `.bsp` kernel.
//!
//! ## Cargo features
//! * `jpl-download`: fetch missing NAIF kernels into the user cache.
//! * `progress`: `indicatif` progress bar observer.
//! * `parallel`: rayon-backed [`series::assemble_parallel`] and [`run::run_parallel`].

pub mod aggregate;
pub mod bodies;
pub mod condensed;
pub mod constants;
pub mod jpl_ephem;
pub mod output;
pub mod pairwise;
pub mod range_check;
pub mod run;
pub mod series;
pub mod syzygy_errors;
pub mod time;
pub mod time_grid;
