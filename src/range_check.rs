//! Fail-fast check of the time span against the oracle coverage.

use hifitime::Epoch;

use crate::{
    bodies::BodySet,
    jpl_ephem::PositionOracle,
    syzygy_errors::{Boundary, SyzygyError},
};

/// Make sure the first body of the set resolves at both ends of the grid.
///
/// Only the two boundaries are checked. A gap in between is not detected here and
/// makes the assembly fail later on.
///
/// Return
/// ----------
/// * `Ok(())`, or [`SyzygyError::RangeError`] naming the failing boundary (start first).
pub fn validate<O: PositionOracle + ?Sized>(
    oracle: &O,
    bodies: &BodySet,
    first: Epoch,
    last: Epoch,
) -> Result<(), SyzygyError> {
    let reference = bodies.first();
    for (boundary, instant) in [(Boundary::Start, first), (Boundary::End, last)] {
        oracle
            .position_km(reference, instant)
            .map_err(|cause| SyzygyError::RangeError {
                boundary,
                instant,
                cause,
            })?;
    }
    Ok(())
}

#[cfg(test)]
mod range_check_test {
    use nalgebra::Vector3;

    use super::*;
    use crate::{bodies::Body, constants::Kilometer, syzygy_errors::OracleError};

    /// Covers [2000-01-01, 2001-01-01] for every body.
    struct Window;

    impl Window {
        fn span() -> (Epoch, Epoch) {
            (
                Epoch::from_gregorian_utc_at_midnight(2000, 1, 1),
                Epoch::from_gregorian_utc_at_midnight(2001, 1, 1),
            )
        }
    }

    impl PositionOracle for Window {
        fn resolve(&self, name: &str) -> Result<Body, OracleError> {
            Ok(Body::new(name, 0))
        }

        fn position_km(
            &self,
            _body: &Body,
            instant: Epoch,
        ) -> Result<Vector3<Kilometer>, OracleError> {
            let (start, end) = Window::span();
            if instant < start || instant > end {
                return Err(OracleError::OutOfCoverage {
                    epoch: instant,
                    start,
                    end,
                });
            }
            Ok(Vector3::zeros())
        }
    }

    fn bodies() -> BodySet {
        BodySet::resolve(&Window, &["A", "B"]).unwrap()
    }

    #[test]
    fn test_inside_coverage() {
        let (start, end) = Window::span();
        assert!(validate(&Window, &bodies(), start, end).is_ok());
    }

    #[test]
    fn test_start_before_coverage() {
        let (start, end) = Window::span();
        let first = Epoch::from_gregorian_utc_at_midnight(1999, 12, 31);
        let err = validate(&Window, &bodies(), first, end).unwrap_err();
        assert_eq!(
            err,
            SyzygyError::RangeError {
                boundary: Boundary::Start,
                instant: first,
                cause: OracleError::OutOfCoverage {
                    epoch: first,
                    start,
                    end
                },
            }
        );
    }

    #[test]
    fn test_end_after_coverage() {
        let (start, _) = Window::span();
        let last = Epoch::from_gregorian_utc_at_midnight(2001, 1, 2);
        let err = validate(&Window, &bodies(), start, last).unwrap_err();
        assert!(matches!(
            err,
            SyzygyError::RangeError {
                boundary: Boundary::End,
                ..
            }
        ));
    }

    #[test]
    fn test_both_outside_reports_start() {
        let first = Epoch::from_gregorian_utc_at_midnight(1990, 1, 1);
        let last = Epoch::from_gregorian_utc_at_midnight(2010, 1, 1);
        let err = validate(&Window, &bodies(), first, last).unwrap_err();
        assert!(matches!(
            err,
            SyzygyError::RangeError {
                boundary: Boundary::Start,
                ..
            }
        ));
    }
}
