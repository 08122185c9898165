//! Pairwise Euclidean distances between the bodies of a set at one instant.

use hifitime::Epoch;
use itertools::Itertools;
use nalgebra::Vector3;

use crate::{
    bodies::BodySet,
    condensed::CondensedDistances,
    constants::Kilometer,
    jpl_ephem::PositionOracle,
    syzygy_errors::SyzygyError,
};

/// Condense a list of positions, in the order of the list.
///
/// Pairs are visited `(0,1), (0,2), .., (1,2), ..`, which is the condensed layout.
pub fn condense_positions(positions: &[Vector3<Kilometer>]) -> CondensedDistances {
    let values = positions
        .iter()
        .tuple_combinations()
        .map(|(a, b)| (a - b).norm())
        .collect();
    CondensedDistances::from_parts(positions.len(), values)
}

/// Resolve every body at `instant` and condense their pairwise distances.
///
/// Arguments
/// -----------------
/// * `oracle`: position source.
/// * `bodies`: bodies in output order.
/// * `instant`: sample instant.
///
/// Return
/// ----------
/// * The condensed distances, or [`SyzygyError::OracleLookup`] for the first body
///   that cannot be resolved (no grid index attached).
pub fn compute<O: PositionOracle + ?Sized>(
    oracle: &O,
    bodies: &BodySet,
    instant: Epoch,
) -> Result<CondensedDistances, SyzygyError> {
    let positions = bodies
        .iter()
        .map(|body| {
            oracle
                .position_km(body, instant)
                .map_err(|cause| SyzygyError::OracleLookup {
                    body: body.name().to_string(),
                    instant,
                    index: None,
                    cause,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(condense_positions(&positions))
}
