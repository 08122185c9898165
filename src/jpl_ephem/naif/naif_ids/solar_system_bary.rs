use std::fmt;

use crate::syzygy_errors::OracleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarSystemBary {
    SSB = 0,
    Sun = 10,
}

impl SolarSystemBary {
    pub fn from_id(id: i32) -> Result<Self, OracleError> {
        match id {
            0 => Ok(SolarSystemBary::SSB),
            10 => Ok(SolarSystemBary::Sun),
            _ => Err(OracleError::UnknownBody(id.to_string())),
        }
    }

    pub fn to_id(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            SolarSystemBary::SSB => "SOLAR_SYSTEM_BARYCENTER",
            SolarSystemBary::Sun => "SUN",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "SOLAR_SYSTEM_BARYCENTER" | "SSB" => Some(SolarSystemBary::SSB),
            "SUN" => Some(SolarSystemBary::Sun),
            _ => None,
        }
    }
}

impl From<SolarSystemBary> for i32 {
    fn from(solar_system_bary: SolarSystemBary) -> Self {
        solar_system_bary.to_id()
    }
}

impl TryFrom<i32> for SolarSystemBary {
    type Error = OracleError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        SolarSystemBary::from_id(id)
    }
}

impl fmt::Display for SolarSystemBary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolarSystemBary::SSB => write!(f, "Solar System Barycenter"),
            SolarSystemBary::Sun => write!(f, "Sun"),
        }
    }
}
