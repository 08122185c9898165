use std::fmt;

use hifitime::Epoch;
use nom::{
    number::complete::{le_f64, le_i32},
    IResult,
};

use crate::{jpl_ephem::naif::naif_ids::NaifIds, syzygy_errors::SyzygyError};

/// SPK segment data types understood by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SpkDataType {
    /// Chebyshev coefficients for position (x, y, z).
    ChebyshevPosition = 2,
    /// Chebyshev coefficients for position and velocity; velocity is ignored.
    ChebyshevState = 3,
}

impl SpkDataType {
    /// Number of coefficient blocks stored per record.
    pub fn n_components(self) -> usize {
        match self {
            SpkDataType::ChebyshevPosition => 3,
            SpkDataType::ChebyshevState => 6,
        }
    }
}

impl TryFrom<i32> for SpkDataType {
    type Error = SyzygyError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(SpkDataType::ChebyshevPosition),
            3 => Ok(SpkDataType::ChebyshevState),
            _ => Err(SyzygyError::UnsupportedSpkDataType(value)),
        }
    }
}

impl fmt::Display for SpkDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpkDataType::ChebyshevPosition => write!(f, "Chebyshev Position Only"),
            SpkDataType::ChebyshevState => write!(f, "Chebyshev Position/Velocity"),
        }
    }
}

/// Descriptor of one SPK segment, as stored in a DAF summary record.
///
/// Epochs are ET seconds from J2000, addresses are 1-based DP-words.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub start_epoch: f64,
    pub end_epoch: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    pub initial_addr: i32,
    pub final_addr: i32,
}

impl Summary {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, start_epoch) = le_f64(input)?;
        let (input, end_epoch) = le_f64(input)?;
        let (input, target) = le_i32(input)?;
        let (input, center) = le_i32(input)?;
        let (input, frame_id) = le_i32(input)?;
        let (input, data_type) = le_i32(input)?;
        let (input, initial_addr) = le_i32(input)?;
        let (input, final_addr) = le_i32(input)?;
        Ok((
            input,
            Summary {
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }

    pub fn covers(&self, et_seconds: f64) -> bool {
        (self.start_epoch..=self.end_epoch).contains(&et_seconds)
    }
}

fn naif_label(id: i32) -> String {
    NaifIds::from_id(id)
        .map(|naif| naif.to_string())
        .unwrap_or_else(|_| format!("NAIF {id}"))
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data_type = SpkDataType::try_from(self.data_type)
            .map(|t| t.to_string())
            .unwrap_or_else(|_| format!("type {}", self.data_type));

        write!(
            f,
            "{} wrt {}: {} .. {} ({}, frame {})",
            naif_label(self.target),
            naif_label(self.center),
            Epoch::from_et_seconds(self.start_epoch),
            Epoch::from_et_seconds(self.end_epoch),
            data_type,
            self.frame_id
        )
    }
}

#[cfg(test)]
mod test_summary {
    use super::*;

    fn earth_moon_summary() -> Summary {
        Summary {
            start_epoch: -14200747200.0,
            end_epoch: 20514081600.0,
            target: 3,
            center: 0,
            frame_id: 1,
            data_type: 2,
            initial_addr: 3021513,
            final_addr: 4051108,
        }
    }

    #[test]
    fn test_summary_parse() {
        let expected = earth_moon_summary();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&expected.start_epoch.to_le_bytes());
        bytes.extend_from_slice(&expected.end_epoch.to_le_bytes());
        for v in [3i32, 0, 1, 2, 3021513, 4051108] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }

        let (rest, summary) = Summary::parse(&bytes).unwrap();
        assert!(rest.is_empty());
        assert_eq!(summary, expected);
    }

    #[test]
    fn test_summary_covers() {
        let summary = earth_moon_summary();
        assert!(summary.covers(0.0));
        assert!(summary.covers(summary.start_epoch));
        assert!(summary.covers(summary.end_epoch));
        assert!(!summary.covers(summary.end_epoch + 1.0));
    }

    #[test]
    fn test_summary_display() {
        let output = earth_moon_summary().to_string();
        assert!(output.starts_with("Earth-Moon Barycenter wrt Solar System Barycenter: 1549-12-31T00:00:00 ET"));
        assert!(output.ends_with("(Chebyshev Position Only, frame 1)"));
    }

    #[test]
    fn test_spk_data_type() {
        assert_eq!(SpkDataType::try_from(2).unwrap(), SpkDataType::ChebyshevPosition);
        assert_eq!(SpkDataType::try_from(3).unwrap().n_components(), 6);
        assert_eq!(
            SpkDataType::try_from(13),
            Err(SyzygyError::UnsupportedSpkDataType(13))
        );
    }
}
