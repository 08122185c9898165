#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use hifitime::Epoch;
use nalgebra::Vector3;
use syzygy::{bodies::Body, jpl_ephem::PositionOracle, syzygy_errors::OracleError};

// -------------------------------------------------------------------------------------------------
// Oracles
// -------------------------------------------------------------------------------------------------

/// `A` at the origin and `B` at (3, 4, 0) km, at every instant.
pub struct ConstantOracle;

impl PositionOracle for ConstantOracle {
    fn resolve(&self, name: &str) -> Result<Body, OracleError> {
        match name {
            "A" => Ok(Body::new("A", 0)),
            "B" => Ok(Body::new("B", 1)),
            _ => Err(OracleError::UnknownBody(name.into())),
        }
    }

    fn position_km(&self, body: &Body, _instant: Epoch) -> Result<Vector3<f64>, OracleError> {
        Ok(match body.code() {
            0 => Vector3::zeros(),
            _ => Vector3::new(3.0, 4.0, 0.0),
        })
    }
}

/// Bodies `A`, `B`, `C` on the x axis, 1000 km apart, inside a coverage window.
///
/// An instant listed in `fail_at` fails like a hole in the ephemeris.
pub struct WindowOracle {
    pub start: Epoch,
    pub end: Epoch,
    pub fail_at: Option<Epoch>,
    pub calls: AtomicUsize,
}

impl WindowOracle {
    pub fn new(start: Epoch, end: Epoch) -> Self {
        WindowOracle {
            start,
            end,
            fail_at: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_at(mut self, instant: Epoch) -> Self {
        self.fail_at = Some(instant);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PositionOracle for WindowOracle {
    fn resolve(&self, name: &str) -> Result<Body, OracleError> {
        match name {
            "A" => Ok(Body::new("A", 0)),
            "B" => Ok(Body::new("B", 1)),
            "C" => Ok(Body::new("C", 2)),
            _ => Err(OracleError::UnknownBody(name.into())),
        }
    }

    fn position_km(&self, body: &Body, instant: Epoch) -> Result<Vector3<f64>, OracleError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if instant < self.start || instant > self.end {
            return Err(OracleError::OutOfCoverage {
                epoch: instant,
                start: self.start,
                end: self.end,
            });
        }
        if self.fail_at == Some(instant) {
            return Err(OracleError::Unavailable("hole in the ephemeris".into()));
        }
        Ok(Vector3::new(1000.0 * body.code() as f64, 0.0, 0.0))
    }

    fn coverage(&self) -> Option<(Epoch, Epoch)> {
        Some((self.start, self.end))
    }
}

// -------------------------------------------------------------------------------------------------
// Synthetic SPK kernels
// -------------------------------------------------------------------------------------------------

const RECORD_BYTES: usize = 1024;

/// First DP-word after the file, summary and name records.
pub const DATA_START_WORD: usize = 3 * RECORD_BYTES / 8 + 1;

/// Half-width of the synthetic kernels coverage: ten days around J2000, in ET seconds.
pub const HALF_SPAN: f64 = 864_000.0;

/// One segment of a synthetic kernel.
///
/// `records[k]` holds the Chebyshev coefficients of record `k`, one `[c0, c1]` pair per
/// axis. Type 3 segments get zero velocity blocks.
pub struct SegmentSpec {
    pub target: i32,
    pub center: i32,
    pub data_type: i32,
    pub records: Vec<[[f64; 2]; 3]>,
}

impl SegmentSpec {
    pub fn constant(target: i32, center: i32, position: [f64; 3]) -> Self {
        let record = position.map(|c| [c, 0.0]);
        SegmentSpec {
            target,
            center,
            data_type: 2,
            records: vec![record, record],
        }
    }

    fn n_components(&self) -> usize {
        if self.data_type == 3 {
            6
        } else {
            3
        }
    }

    fn rsize(&self) -> usize {
        2 + 2 * self.n_components()
    }

    fn n_words(&self) -> usize {
        self.rsize() * self.records.len() + 4
    }
}

/// Earth-Moon barycenter moving along y: `(1.5e8, 500·et/HALF_SPAN, 0)` km.
pub fn moving_emb() -> SegmentSpec {
    SegmentSpec {
        target: 3,
        center: 0,
        data_type: 2,
        records: vec![
            [[1.5e8, 0.0], [-250.0, 250.0], [0.0, 0.0]],
            [[1.5e8, 0.0], [250.0, 250.0], [0.0, 0.0]],
        ],
    }
}

pub const SUN_POSITION: [f64; 3] = [1000.0, 2000.0, 3000.0];

pub const EARTH_WRT_EMB: [f64; 3] = [0.0, 4000.0, 0.0];

/// Sun and Earth-Moon barycenter w.r.t. the SSB, Earth (399) w.r.t. the Earth-Moon barycenter.
pub fn reference_segments() -> Vec<SegmentSpec> {
    vec![
        SegmentSpec::constant(10, 0, SUN_POSITION),
        moving_emb(),
        SegmentSpec::constant(399, 3, EARTH_WRT_EMB),
    ]
}

fn push_f64(buf: &mut Vec<u8>, value: f64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn push_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Bytes of a little-endian SPK kernel holding `segments`, all spanning
/// `[-HALF_SPAN, HALF_SPAN]` ET seconds with records of equal length.
pub fn build_kernel(segments: &[SegmentSpec]) -> Vec<u8> {
    let total_words: usize = segments.iter().map(SegmentSpec::n_words).sum();

    // file record
    let mut buf = Vec::new();
    buf.extend_from_slice(b"DAF/SPK ");
    push_i32(&mut buf, 2);
    push_i32(&mut buf, 6);
    buf.extend_from_slice(format!("{:<60}", "SYNTHETIC TEST KERNEL").as_bytes());
    push_i32(&mut buf, 2);
    push_i32(&mut buf, 2);
    push_i32(&mut buf, (DATA_START_WORD + total_words) as i32);
    buf.extend_from_slice(b"LTL-IEEE");
    buf.resize(RECORD_BYTES, 0);

    // summary record
    push_f64(&mut buf, 0.0);
    push_f64(&mut buf, 0.0);
    push_f64(&mut buf, segments.len() as f64);
    let mut address = DATA_START_WORD;
    for segment in segments {
        push_f64(&mut buf, -HALF_SPAN);
        push_f64(&mut buf, HALF_SPAN);
        push_i32(&mut buf, segment.target);
        push_i32(&mut buf, segment.center);
        push_i32(&mut buf, 1);
        push_i32(&mut buf, segment.data_type);
        push_i32(&mut buf, address as i32);
        push_i32(&mut buf, (address + segment.n_words() - 1) as i32);
        address += segment.n_words();
    }
    buf.resize(2 * RECORD_BYTES, 0);

    // name record
    for segment in segments {
        buf.extend_from_slice(format!("{:<40}", format!("SEGMENT {}", segment.target)).as_bytes());
    }
    buf.resize(3 * RECORD_BYTES, b' ');

    // segment data
    for segment in segments {
        let n = segment.records.len();
        let intlen = 2.0 * HALF_SPAN / n as f64;
        for (k, record) in segment.records.iter().enumerate() {
            push_f64(&mut buf, -HALF_SPAN + (k as f64 + 0.5) * intlen);
            push_f64(&mut buf, intlen / 2.0);
            for axis in record {
                axis.iter().for_each(|c| push_f64(&mut buf, *c));
            }
            if segment.data_type == 3 {
                (0..6).for_each(|_| push_f64(&mut buf, 0.0));
            }
        }
        push_f64(&mut buf, -HALF_SPAN);
        push_f64(&mut buf, intlen);
        push_f64(&mut buf, segment.rsize() as f64);
        push_f64(&mut buf, n as f64);
    }
    buf
}

/// Write `bytes` as `name` inside `dir`.
pub fn write_kernel(dir: &Utf8Path, name: &str, bytes: &[u8]) -> Utf8PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, path)
}
