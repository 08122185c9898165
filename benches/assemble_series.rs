use std::f64::consts::TAU;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hifitime::Epoch;
use nalgebra::Vector3;

use syzygy::{
    aggregate::aggregate,
    bodies::{Body, BodySet},
    constants::{Kilometer, AU, SOLAR_SYSTEM_BODIES},
    jpl_ephem::PositionOracle,
    series::{assemble, progress::NoProgress},
    syzygy_errors::OracleError,
    time_grid,
};

/// Circular, coplanar orbits around the origin: body `k` at `k` AU with a period of
/// `k^1.5` years.
struct CircularOrbits;

impl PositionOracle for CircularOrbits {
    fn resolve(&self, name: &str) -> Result<Body, OracleError> {
        SOLAR_SYSTEM_BODIES
            .iter()
            .position(|b| *b == name)
            .map(|k| Body::new(name, k as i32))
            .ok_or_else(|| OracleError::UnknownBody(name.into()))
    }

    fn position_km(&self, body: &Body, instant: Epoch) -> Result<Vector3<Kilometer>, OracleError> {
        let radius = body.code() as f64;
        if radius == 0.0 {
            return Ok(Vector3::zeros());
        }
        let period_days = 365.25 * radius.powf(1.5);
        let phase = TAU * instant.to_tdb_days_since_j2000() / period_days;
        Ok(Vector3::new(phase.cos(), phase.sin(), 0.0) * radius * AU)
    }
}

fn bench_assemble(c: &mut Criterion) {
    let start = Epoch::from_gregorian_utc_at_midnight(1550, 1, 1);
    let bodies = BodySet::resolve(&CircularOrbits, &SOLAR_SYSTEM_BODIES).unwrap();

    let mut group = c.benchmark_group("assemble_series");
    for n_days in [365.25, 3652.5] {
        let grid = time_grid::generate(start, n_days, 24.0).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(grid.len()), &grid, |b, grid| {
            b.iter(|| {
                let tensor = assemble(
                    &CircularOrbits,
                    black_box(&bodies),
                    black_box(grid),
                    0,
                    &mut NoProgress,
                )
                .unwrap();
                black_box(aggregate(&tensor).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
