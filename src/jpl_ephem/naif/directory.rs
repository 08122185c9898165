//! Directory footer of a Chebyshev SPK segment.
//!
//! The last four DP-words of a type 2/3 segment are:
//!
//! * `init`: start epoch of the first record (ET seconds from J2000),
//! * `intlen`: time span covered by each record (seconds),
//! * `rsize`: record size in **DP-words**, not bytes,
//! * `n_records`: number of records in the segment.

use std::{
    fmt,
    io::{Read, Seek, SeekFrom},
};

use hifitime::{Duration, Epoch};
use nom::number::complete::le_f64;

use crate::syzygy_errors::SyzygyError;

#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    pub init: f64,
    pub intlen: f64,
    pub rsize: usize,
    pub n_records: usize,
}

/// Integral count in `[min, i32::MAX]`, as DAF addresses are 32-bit.
fn word_count(value: f64, min: f64) -> Option<usize> {
    (value.fract() == 0.0 && (min..=i32::MAX as f64).contains(&value)).then_some(value as usize)
}

impl DirectoryData {
    /// Read the footer of the segment ending at DP-word `end_addr` (1-based).
    pub fn parse<R: Read + Seek>(reader: &mut R, end_addr: usize) -> Result<Self, SyzygyError> {
        if end_addr < 4 {
            return Err(SyzygyError::EphemFileParse(format!(
                "segment end address {end_addr} is too small to hold a directory"
            )));
        }

        let mut buf = [0u8; 32];
        reader.seek(SeekFrom::Start(((end_addr - 4) * 8) as u64))?;
        reader.read_exact(&mut buf)?;

        let words = (|| {
            let (input, init) = le_f64::<_, nom::error::Error<&[u8]>>(buf.as_slice())?;
            let (input, intlen) = le_f64::<_, nom::error::Error<&[u8]>>(input)?;
            let (input, rsize) = le_f64::<_, nom::error::Error<&[u8]>>(input)?;
            let (_, n_records) = le_f64::<_, nom::error::Error<&[u8]>>(input)?;
            Ok::<_, nom::Err<nom::error::Error<&[u8]>>>((init, intlen, rsize, n_records))
        })()
        .map_err(|e| SyzygyError::EphemFileParse(format!("segment directory: {e}")))?;
        let (init, intlen, rsize, n_records) = words;

        let inconsistent = || {
            SyzygyError::EphemFileParse(format!(
                "inconsistent segment directory (intlen={intlen}, rsize={rsize}, n={n_records})"
            ))
        };
        if !init.is_finite() || !(intlen.is_finite() && intlen > 0.0) {
            return Err(inconsistent());
        }
        let rsize = word_count(rsize, 3.0).ok_or_else(inconsistent)?;
        let n_records = word_count(n_records, 1.0).ok_or_else(inconsistent)?;

        Ok(DirectoryData {
            init,
            intlen,
            rsize,
            n_records,
        })
    }

    /// Index of the record covering `et_seconds`, clamped to the last record so the
    /// segment's final epoch stays addressable.
    pub fn record_index(&self, et_seconds: f64) -> usize {
        let idx = ((et_seconds - self.init) / self.intlen).floor().max(0.0) as usize;
        idx.min(self.n_records - 1)
    }
}

impl fmt::Display for DirectoryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records of {} from {} ({} words each)",
            self.n_records,
            Duration::from_seconds(self.intlen),
            Epoch::from_et_seconds(self.init),
            self.rsize
        )
    }
}
