//! Chebyshev records of type 2/3 SPK segments.
//!
//! Each record holds, as little-endian `f64`:
//! 1. `mid` (ET seconds from J2000),
//! 2. `radius` (half-width of the record span, seconds),
//! 3. `ncoeff` coefficients for X, then Y, then Z (km),
//! 4. for type 3 only, three more blocks for the velocity, which are skipped.
//!
//! Positions are evaluated with the normalized time `t = (et - mid) / radius`
//! clamped to `[-1, 1]`.

use std::io::{Read, Seek, SeekFrom};

use nalgebra::Vector3;

use crate::{constants::Kilometer, syzygy_errors::SyzygyError};

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    pub mid: f64,
    pub radius: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl EphemerisRecord {
    fn from_words(words: &[f64], ncoeff: usize) -> Self {
        let coeffs = &words[2..];
        EphemerisRecord {
            mid: words[0],
            radius: words[1],
            x: coeffs[..ncoeff].to_vec(),
            y: coeffs[ncoeff..2 * ncoeff].to_vec(),
            z: coeffs[2 * ncoeff..3 * ncoeff].to_vec(),
        }
    }

    /// Read the `n_records` contiguous records of a segment.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: kernel file.
    /// * `segment_start_addr`: first DP-word of the segment (1-based).
    /// * `rsize`: record size in DP-words.
    /// * `n_records`: number of records.
    /// * `n_components`: coefficient blocks per record (3 for type 2, 6 for type 3).
    ///
    /// Return
    /// ----------
    /// * The records in file order.
    pub fn parse<R: Read + Seek>(
        reader: &mut R,
        segment_start_addr: usize,
        rsize: usize,
        n_records: usize,
        n_components: usize,
    ) -> Result<Vec<Self>, SyzygyError> {
        if segment_start_addr == 0 || rsize < 2 + n_components || (rsize - 2) % n_components != 0
        {
            return Err(SyzygyError::EphemFileParse(format!(
                "record size {rsize} does not fit {n_components} coefficient blocks"
            )));
        }
        let ncoeff = (rsize - 2) / n_components;

        let n_bytes = rsize
            .checked_mul(n_records)
            .and_then(|words| words.checked_mul(8))
            .ok_or_else(|| {
                SyzygyError::EphemFileParse(format!(
                    "segment of {n_records} records of {rsize} words overflows"
                ))
            })?;

        // The whole segment is read at once, then split into records.
        let mut bytes = vec![0u8; n_bytes];
        reader.seek(SeekFrom::Start(((segment_start_addr - 1) * 8) as u64))?;
        reader.read_exact(&mut bytes)?;

        let words: Vec<f64> = bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                f64::from_le_bytes(word)
            })
            .collect();

        let records = words
            .chunks_exact(rsize)
            .map(|record| EphemerisRecord::from_words(record, ncoeff))
            .collect::<Vec<_>>();

        if let Some(bad) = records.iter().find(|r| r.radius <= 0.0) {
            return Err(SyzygyError::EphemFileParse(format!(
                "record centered at {} has a non-positive radius",
                bad.mid
            )));
        }

        Ok(records)
    }

    /// Position at `et_seconds`, in kilometers.
    pub fn position(&self, et_seconds: f64) -> Vector3<Kilometer> {
        let t = ((et_seconds - self.mid) / self.radius).clamp(-1.0, 1.0);

        // T_0 = 1, T_1 = t, T_n = 2t T_{n-1} - T_{n-2}
        let mut chebyshev = vec![0.0; self.x.len()];
        if let Some(first) = chebyshev.first_mut() {
            *first = 1.0;
        }
        if chebyshev.len() > 1 {
            chebyshev[1] = t;
        }
        for n in 2..chebyshev.len() {
            chebyshev[n] = 2.0 * t * chebyshev[n - 1] - chebyshev[n - 2];
        }

        let series = |coeffs: &[f64]| -> f64 {
            coeffs.iter().zip(&chebyshev).map(|(c, p)| c * p).sum()
        };

        Vector3::new(series(&self.x), series(&self.y), series(&self.z))
    }
}

#[cfg(test)]
mod test_ephemeris_record {
    use std::io::Cursor;

    use approx::assert_relative_eq;

    use super::*;

    fn record_words(mid: f64, radius: f64, blocks: &[&[f64]]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&mid.to_le_bytes());
        bytes.extend_from_slice(&radius.to_le_bytes());
        for block in blocks {
            for c in block.iter() {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        bytes
    }

    #[test]
    fn test_parse_type2_records() {
        let mut bytes = record_words(50.0, 50.0, &[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        bytes.extend(record_words(150.0, 50.0, &[&[7.0, 8.0], &[9.0, 10.0], &[11.0, 12.0]]));

        let records = EphemerisRecord::parse(&mut Cursor::new(bytes), 1, 8, 2, 3).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1],
            EphemerisRecord {
                mid: 150.0,
                radius: 50.0,
                x: vec![7.0, 8.0],
                y: vec![9.0, 10.0],
                z: vec![11.0, 12.0],
            }
        );
    }

    #[test]
    fn test_parse_type3_skips_velocity() {
        let bytes = record_words(
            0.0,
            10.0,
            &[&[1.0], &[2.0], &[3.0], &[-1.0], &[-2.0], &[-3.0]],
        );
        let records = EphemerisRecord::parse(&mut Cursor::new(bytes), 1, 8, 1, 6).unwrap();
        assert_eq!(records[0].x, vec![1.0]);
        assert_eq!(records[0].z, vec![3.0]);
    }

    #[test]
    fn test_parse_rejects_bad_layout() {
        let bytes = record_words(0.0, 10.0, &[&[1.0, 2.0, 3.0]]);
        assert!(EphemerisRecord::parse(&mut Cursor::new(bytes), 1, 6, 1, 3).is_err());
    }

    #[test]
    fn test_parse_rejects_overflowing_size() {
        let bytes = record_words(0.0, 10.0, &[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        assert!(matches!(
            EphemerisRecord::parse(&mut Cursor::new(bytes), 1, 8, usize::MAX, 3),
            Err(SyzygyError::EphemFileParse(_))
        ));
    }

    #[test]
    fn test_position_chebyshev_series() {
        let record = EphemerisRecord {
            mid: 100.0,
            radius: 50.0,
            x: vec![1.0, 2.0, 3.0],
            y: vec![-4.0, 0.0, 0.0],
            z: vec![0.0, 1.0],
        };

        // t = 0.5: T0 = 1, T1 = 0.5, T2 = 2 * 0.25 - 1 = -0.5
        let p = record.position(125.0);
        assert_relative_eq!(p.x, 1.0 + 2.0 * 0.5 - 3.0 * 0.5, epsilon = 1e-12);
        assert_relative_eq!(p.y, -4.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.5, epsilon = 1e-12);

        // beyond the record: clamped to t = 1
        let p = record.position(1000.0);
        assert_relative_eq!(p.x, 6.0, epsilon = 1e-12);
    }
}
