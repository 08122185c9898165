//! DAF (Double Precision Array File) file record.
//!
//! The first 1024-byte record of an SPK kernel describes the layout of the rest
//! of the file:
//!
//! * **`idword`**: format identifier, `"DAF/SPK"` for ephemeris kernels.
//! * **`nd`** / **`ni`**: number of double / integer components in each segment
//!   summary (`2` and `6` for SPK).
//! * **`fward`** / **`bward`**: 1-based record numbers of the first and last
//!   summary records.
//! * **`free`**: first free DP-word address.
//! * **`locfmt`**: numeric encoding of the file (`"LTL-IEEE"` or `"BIG-IEEE"`).
//!
//! Only little-endian kernels are read; [`DAFHeader::check_spk`] rejects anything else
//! before a single coefficient is decoded.

use std::fmt;

use nom::{bytes::complete::take, number::complete::le_i32, IResult};

use crate::syzygy_errors::SyzygyError;

/// Size of a DAF record in bytes.
pub(crate) const RECORD_BYTES: usize = 1024;

#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    pub idword: String,
    pub internal_filename: String,
    pub nd: i32,
    pub ni: i32,
    pub fward: i32,
    pub bward: i32,
    pub free: i32,
    pub locfmt: String,
}

impl DAFHeader {
    /// Decode the file record.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: bytes starting at offset 0 of the kernel, at least 1024 long.
    ///
    /// Return
    /// ----------
    /// * `(remaining, header)` with trailing blanks trimmed from the text fields.
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, idword) = take(8usize)(input)?;
        let (input, nd) = le_i32(input)?;
        let (input, ni) = le_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = le_i32(input)?;
        let (input, bward) = le_i32(input)?;
        let (input, free) = le_i32(input)?;
        let (input, locfmt) = take(8usize)(input)?;
        // reserved block + FTP validation string, neither is used
        let (input, _) = take(603usize + 28usize)(input)?;

        let text = |bytes: &[u8]| {
            String::from_utf8_lossy(bytes)
                .trim_matches(|c: char| c.is_whitespace() || c == '\0')
                .to_string()
        };

        Ok((
            input,
            DAFHeader {
                idword: text(idword),
                internal_filename: text(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: text(locfmt),
            },
        ))
    }

    /// Ensure the file is a little-endian SPK kernel with the standard summary layout.
    pub fn check_spk(&self) -> Result<(), SyzygyError> {
        if self.idword != "DAF/SPK" {
            return Err(SyzygyError::EphemFileParse(format!(
                "not an SPK kernel (id word '{}')",
                self.idword
            )));
        }
        if self.locfmt != "LTL-IEEE" {
            return Err(SyzygyError::EphemFileParse(format!(
                "unsupported binary format '{}', only LTL-IEEE kernels are read",
                self.locfmt
            )));
        }
        if self.nd != 2 || self.ni != 6 {
            return Err(SyzygyError::EphemFileParse(format!(
                "unexpected summary layout ND={} NI={}",
                self.nd, self.ni
            )));
        }
        if self.fward < 2 {
            return Err(SyzygyError::EphemFileParse(format!(
                "invalid first summary record {}",
                self.fward
            )));
        }
        Ok(())
    }

    /// Size of one segment summary in bytes: `ND + ceil(NI / 2)` DP-words.
    pub fn summary_bytes(&self) -> usize {
        (self.nd as usize + (self.ni as usize).div_ceil(2)) * 8
    }
}

impl fmt::Display for DAFHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' (ND={}, NI={}, summaries at record {}..{}, {})",
            self.idword,
            self.internal_filename,
            self.nd,
            self.ni,
            self.fward,
            self.bward,
            self.locfmt
        )
    }
}

#[cfg(test)]
mod test_daf_header {
    use super::*;

    fn raw_header(idword: &str, locfmt: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RECORD_BYTES);
        buf.extend_from_slice(format!("{idword:<8}").as_bytes());
        buf.extend_from_slice(&2i32.to_le_bytes());
        buf.extend_from_slice(&6i32.to_le_bytes());
        buf.extend_from_slice(format!("{:<60}", "NIO2SPK").as_bytes());
        buf.extend_from_slice(&4i32.to_le_bytes());
        buf.extend_from_slice(&4i32.to_le_bytes());
        buf.extend_from_slice(&14974889i32.to_le_bytes());
        buf.extend_from_slice(format!("{locfmt:<8}").as_bytes());
        buf.resize(RECORD_BYTES, 0);
        buf
    }

    #[test]
    fn test_parse_daf_header() {
        let buf = raw_header("DAF/SPK", "LTL-IEEE");
        let (rest, header) = DAFHeader::parse(&buf).unwrap();

        assert_eq!(
            header,
            DAFHeader {
                idword: "DAF/SPK".to_string(),
                internal_filename: "NIO2SPK".to_string(),
                nd: 2,
                ni: 6,
                fward: 4,
                bward: 4,
                free: 14974889,
                locfmt: "LTL-IEEE".to_string(),
            }
        );
        assert_eq!(rest.len(), RECORD_BYTES - 727);
        assert!(header.check_spk().is_ok());
        assert_eq!(header.summary_bytes(), 40);
    }

    #[test]
    fn test_check_spk_rejects_other_files() {
        let (_, header) = DAFHeader::parse(&raw_header("DAF/PCK", "LTL-IEEE")).unwrap();
        assert!(matches!(
            header.check_spk(),
            Err(SyzygyError::EphemFileParse(_))
        ));

        let (_, header) = DAFHeader::parse(&raw_header("DAF/SPK", "BIG-IEEE")).unwrap();
        assert!(matches!(
            header.check_spk(),
            Err(SyzygyError::EphemFileParse(_))
        ));
    }

    #[test]
    fn test_too_short_input() {
        assert!(DAFHeader::parse(&[0u8; 100]).is_err());
    }
}
