//! NAIF integer codes for the bodies a planetary kernel carries at the barycentric level.
//!
//! Names accepted by [`NaifIds::from_str`]:
//! * `SUN`, `SSB` / `SOLAR_SYSTEM_BARYCENTER`,
//! * `<PLANET>_BARYCENTER` for Mercury to Pluto (`EARTH_BARYCENTER` is the Earth-Moon barycenter),
//! * a raw integer code, resolved here when known and passed through otherwise.

pub mod planet_bary;
pub mod solar_system_bary;

use std::{fmt, str::FromStr};

use planet_bary::PlanetaryBary;
use solar_system_bary::SolarSystemBary;

use crate::syzygy_errors::OracleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaifIds {
    SSB(SolarSystemBary),
    PB(PlanetaryBary),
}

impl NaifIds {
    pub fn from_id(id: i32) -> Result<Self, OracleError> {
        match id {
            0 | 10 => SolarSystemBary::from_id(id).map(NaifIds::SSB),
            _ => PlanetaryBary::from_id(id).map(NaifIds::PB),
        }
    }

    pub fn to_id(&self) -> i32 {
        match self {
            NaifIds::SSB(solar_system_bary) => solar_system_bary.to_id(),
            NaifIds::PB(planetary_bary) => planetary_bary.to_id(),
        }
    }

    /// Upper-case identifier used on the command line and in output file names.
    pub fn name(&self) -> &'static str {
        match self {
            NaifIds::SSB(solar_system_bary) => solar_system_bary.name(),
            NaifIds::PB(planetary_bary) => planetary_bary.name(),
        }
    }
}

impl From<NaifIds> for i32 {
    fn from(naif_id: NaifIds) -> Self {
        naif_id.to_id()
    }
}

impl TryFrom<i32> for NaifIds {
    type Error = OracleError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        NaifIds::from_id(id)
    }
}

impl FromStr for NaifIds {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(ssb) = SolarSystemBary::from_name(s) {
            return Ok(NaifIds::SSB(ssb));
        }
        if let Some(planet) = PlanetaryBary::from_name(s) {
            return Ok(NaifIds::PB(planet));
        }
        match s.trim().parse::<i32>() {
            Ok(id) => NaifIds::from_id(id).map_err(|_| OracleError::UnknownBody(s.to_string())),
            Err(_) => Err(OracleError::UnknownBody(s.to_string())),
        }
    }
}

impl fmt::Display for NaifIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaifIds::SSB(solar_system_bary) => write!(f, "{solar_system_bary}"),
            NaifIds::PB(planetary_bary) => write!(f, "{planetary_bary}"),
        }
    }
}
