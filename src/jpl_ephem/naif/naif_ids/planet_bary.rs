use std::fmt;

use crate::syzygy_errors::OracleError;

/// Planetary system barycenters, NAIF ids 1 to 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetaryBary {
    Mercury = 1,
    Venus = 2,
    EarthMoon = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
}

impl PlanetaryBary {
    pub const ALL: [PlanetaryBary; 9] = [
        PlanetaryBary::Mercury,
        PlanetaryBary::Venus,
        PlanetaryBary::EarthMoon,
        PlanetaryBary::Mars,
        PlanetaryBary::Jupiter,
        PlanetaryBary::Saturn,
        PlanetaryBary::Uranus,
        PlanetaryBary::Neptune,
        PlanetaryBary::Pluto,
    ];

    pub fn from_id(id: i32) -> Result<Self, OracleError> {
        PlanetaryBary::ALL
            .into_iter()
            .find(|p| p.to_id() == id)
            .ok_or_else(|| OracleError::UnknownBody(id.to_string()))
    }

    pub fn to_id(self) -> i32 {
        self as i32
    }

    /// Kernel-style identifier, e.g. `EARTH_BARYCENTER` for the Earth-Moon barycenter.
    pub fn name(self) -> &'static str {
        match self {
            PlanetaryBary::Mercury => "MERCURY_BARYCENTER",
            PlanetaryBary::Venus => "VENUS_BARYCENTER",
            PlanetaryBary::EarthMoon => "EARTH_BARYCENTER",
            PlanetaryBary::Mars => "MARS_BARYCENTER",
            PlanetaryBary::Jupiter => "JUPITER_BARYCENTER",
            PlanetaryBary::Saturn => "SATURN_BARYCENTER",
            PlanetaryBary::Uranus => "URANUS_BARYCENTER",
            PlanetaryBary::Neptune => "NEPTUNE_BARYCENTER",
            PlanetaryBary::Pluto => "PLUTO_BARYCENTER",
        }
    }

    /// Case-insensitive lookup by kernel-style identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_uppercase();
        let name = if name == "EARTH_MOON_BARYCENTER" {
            "EARTH_BARYCENTER".to_string()
        } else {
            name
        };
        PlanetaryBary::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl From<PlanetaryBary> for i32 {
    fn from(planet: PlanetaryBary) -> Self {
        planet.to_id()
    }
}

impl TryFrom<i32> for PlanetaryBary {
    type Error = OracleError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        PlanetaryBary::from_id(id)
    }
}

impl fmt::Display for PlanetaryBary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanetaryBary::EarthMoon => "Earth-Moon Barycenter",
            PlanetaryBary::Mercury => "Mercury Barycenter",
            PlanetaryBary::Venus => "Venus Barycenter",
            PlanetaryBary::Mars => "Mars Barycenter",
            PlanetaryBary::Jupiter => "Jupiter Barycenter",
            PlanetaryBary::Saturn => "Saturn Barycenter",
            PlanetaryBary::Uranus => "Uranus Barycenter",
            PlanetaryBary::Neptune => "Neptune Barycenter",
            PlanetaryBary::Pluto => "Pluto Barycenter",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test_planet_bary {
    use super::*;

    #[test]
    fn test_planet_bary_ids() {
        for (k, planet) in PlanetaryBary::ALL.into_iter().enumerate() {
            assert_eq!(planet.to_id(), k as i32 + 1);
            assert_eq!(PlanetaryBary::from_id(k as i32 + 1).unwrap(), planet);
            assert_eq!(i32::from(planet), k as i32 + 1);
        }
        assert!(PlanetaryBary::from_id(0).is_err());
        assert!(PlanetaryBary::try_from(399).is_err());
    }

    #[test]
    fn test_planet_bary_names() {
        assert_eq!(
            PlanetaryBary::from_name("JUPITER_BARYCENTER"),
            Some(PlanetaryBary::Jupiter)
        );
        assert_eq!(
            PlanetaryBary::from_name("earth_barycenter"),
            Some(PlanetaryBary::EarthMoon)
        );
        assert_eq!(
            PlanetaryBary::from_name("EARTH_MOON_BARYCENTER"),
            Some(PlanetaryBary::EarthMoon)
        );
        assert_eq!(PlanetaryBary::from_name("JUPITER"), None);
        assert_eq!(PlanetaryBary::Pluto.name(), "PLUTO_BARYCENTER");
    }

    #[test]
    fn test_planet_bary_display() {
        assert_eq!(PlanetaryBary::EarthMoon.to_string(), "Earth-Moon Barycenter");
        assert_eq!(PlanetaryBary::Neptune.to_string(), "Neptune Barycenter");
    }
}
