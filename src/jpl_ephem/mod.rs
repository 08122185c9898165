//! Position sources for the distance pipeline.
//!
//! The pipeline only talks to ephemerides through the [`PositionOracle`] trait.
//! [`naif::naif_data::NaifData`] implements it on top of a JPL/NAIF SPK kernel,
//! tests implement it with analytic or constant positions.

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{bodies::Body, constants::Kilometer, syzygy_errors::OracleError};

pub mod download_jpl_file;
pub mod naif;

/// Opaque source of barycentric body positions.
///
/// Implementations must be deterministic for a given `(body, instant)` and must
/// fail (never guess) outside of their coverage.
pub trait PositionOracle {
    /// Resolve a user-facing identifier (e.g. `"SATURN_BARYCENTER"`) to a [`Body`].
    ///
    /// Called once per body before any position is requested.
    fn resolve(&self, name: &str) -> Result<Body, OracleError>;

    /// Position of `body` at `instant`, in kilometers.
    fn position_km(&self, body: &Body, instant: Epoch) -> Result<Vector3<Kilometer>, OracleError>;

    /// Time span over which positions can be resolved, when the source knows it.
    fn coverage(&self) -> Option<(Epoch, Epoch)> {
        None
    }
}

impl<T: PositionOracle + ?Sized> PositionOracle for &T {
    fn resolve(&self, name: &str) -> Result<Body, OracleError> {
        (**self).resolve(name)
    }

    fn position_km(&self, body: &Body, instant: Epoch) -> Result<Vector3<Kilometer>, OracleError> {
        (**self).position_km(body, instant)
    }

    fn coverage(&self) -> Option<(Epoch, Epoch)> {
        (**self).coverage()
    }
}
