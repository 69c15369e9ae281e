use std::sync::OnceLock;

use serde::Deserialize;
use tracing::error;

const BUNDLED_GEODATA: &str = include_str!("../data/geodata.json");

/// Placement and classification for one country on the world map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoCountry {
    pub iso2: String,
    pub iso3: String,
    pub name: String,
    pub continent: String,
    pub lat: f64,
    pub lon: f64,
    pub g20: bool,
}

impl GeoCountry {
    pub fn matches_code(&self, code: &str) -> bool {
        let code = code.trim();
        self.iso2.eq_ignore_ascii_case(code) || self.iso3.eq_ignore_ascii_case(code)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geodata {
    countries: Vec<GeoCountry>,
}

impl Geodata {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let countries = serde_json::from_str(json)?;
        Ok(Self { countries })
    }

    /// The table shipped with the crate.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(BUNDLED_GEODATA)
    }

    /// Process-wide copy of the bundled table. Empty if it failed to parse.
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<Geodata> = OnceLock::new();
        SHARED.get_or_init(|| {
            Self::bundled().unwrap_or_else(|err| {
                error!(error = %err, "bundled geodata is invalid");
                Self::default()
            })
        })
    }

    pub fn countries(&self) -> &[GeoCountry] {
        &self.countries
    }

    /// Looks up a country by ISO alpha-2 or alpha-3 code.
    pub fn lookup(&self, code: &str) -> Option<&GeoCountry> {
        self.countries
            .iter()
            .find(|country| country.matches_code(code))
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Geodata;

    #[test]
    fn bundled_table_parses_and_has_unique_codes() {
        let geodata = Geodata::bundled().expect("bundled geodata");
        assert!(geodata.len() > 50);

        let mut codes: Vec<&str> = geodata
            .countries()
            .iter()
            .map(|country| country.iso2.as_str())
            .collect();
        codes.sort_unstable();
        let total = codes.len();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }

    #[test]
    fn lookup_accepts_both_code_lengths() {
        let geodata = Geodata::shared();
        let by_iso2 = geodata.lookup("ca").map(|c| c.name.as_str());
        let by_iso3 = geodata.lookup("CAN").map(|c| c.name.as_str());
        assert_eq!(by_iso2, Some("Canada"));
        assert_eq!(by_iso3, Some("Canada"));
        assert!(geodata.lookup("XX").is_none());
    }

    #[test]
    fn coordinates_are_in_range() {
        for country in Geodata::shared().countries() {
            assert!((-90.0..=90.0).contains(&country.lat), "{}", country.name);
            assert!((-180.0..=180.0).contains(&country.lon), "{}", country.name);
        }
    }
}
