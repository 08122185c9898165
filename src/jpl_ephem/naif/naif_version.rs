//! JPL development ephemerides distributed as NAIF SPK kernels.
//!
//! A version is written the way NAIF names the kernel, without the extension:
//! `DE440`, `DE441_part-1`, ... (case-insensitive).

use std::{fmt, str::FromStr};

use crate::syzygy_errors::SyzygyError;

/// Base URL of the NAIF planetary kernels.
pub const NAIF_PLANETS_URL: &str = "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaifVersion {
    DE430,
    DE431p1,
    DE431p2,
    DE432,
    DE435,
    DE438,
    DE440,
    DE440s,
    DE441p1,
    DE441p2,
    DE442,
}

impl NaifVersion {
    const ALL: [NaifVersion; 11] = [
        NaifVersion::DE430,
        NaifVersion::DE431p1,
        NaifVersion::DE431p2,
        NaifVersion::DE432,
        NaifVersion::DE435,
        NaifVersion::DE438,
        NaifVersion::DE440,
        NaifVersion::DE440s,
        NaifVersion::DE441p1,
        NaifVersion::DE441p2,
        NaifVersion::DE442,
    ];

    /// Kernel file name, e.g. `de440.bsp`.
    pub fn get_filename(&self) -> &'static str {
        match self {
            NaifVersion::DE430 => "de430.bsp",
            NaifVersion::DE431p1 => "de431_part-1.bsp",
            NaifVersion::DE431p2 => "de431_part-2.bsp",
            NaifVersion::DE432 => "de432.bsp",
            NaifVersion::DE435 => "de435.bsp",
            NaifVersion::DE438 => "de438.bsp",
            NaifVersion::DE440 => "de440.bsp",
            NaifVersion::DE440s => "de440s.bsp",
            NaifVersion::DE441p1 => "de441_part-1.bsp",
            NaifVersion::DE441p2 => "de441_part-2.bsp",
            NaifVersion::DE442 => "de442.bsp",
        }
    }

    pub fn url(&self) -> String {
        format!("{NAIF_PLANETS_URL}/{}", self.get_filename())
    }
}

impl FromStr for NaifVersion {
    type Err = SyzygyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = format!("{}.bsp", s.trim().to_ascii_lowercase());
        NaifVersion::ALL
            .into_iter()
            .find(|v| v.get_filename() == wanted)
            .ok_or_else(|| SyzygyError::InvalidNaifVersion(s.to_string()))
    }
}

impl fmt::Display for NaifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stem = self.get_filename().trim_end_matches(".bsp");
        write!(f, "{}", stem.replacen("de", "DE", 1))
    }
}
