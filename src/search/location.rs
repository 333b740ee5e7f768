// src/search/location.rs
//! Coarse country inference from a free-text location.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Usa,
    Turkey,
    Netherlands,
    Germany,
    Uk,
    France,
    Canada,
    Australia,
    India,
    Spain,
    Italy,
    Brazil,
    Mexico,
}

/// Aliases checked in order, first hit wins.
const COUNTRY_ALIASES: &[(Country, &[&str])] = &[
    (Country::Turkey, &["turkey", "türkiye", "istanbul", "ankara", "izmir"]),
    (Country::Netherlands, &["netherlands", "holland", "amsterdam", "rotterdam"]),
    (Country::Germany, &["germany", "deutschland", "berlin", "munich", "frankfurt"]),
    (Country::Uk, &["united kingdom", "uk", "london", "manchester"]),
    (Country::France, &["france", "paris", "lyon", "marseille"]),
    (Country::Canada, &["canada", "toronto", "vancouver", "montreal"]),
    (Country::Australia, &["australia", "sydney", "melbourne"]),
    (Country::India, &["india", "mumbai", "bangalore", "delhi"]),
    (Country::Spain, &["spain", "madrid", "barcelona"]),
    (Country::Italy, &["italy", "rome", "milan"]),
    (Country::Brazil, &["brazil", "são paulo", "rio", "brasil"]),
    (Country::Mexico, &["mexico", "méxico", "mexico city"]),
];

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::Usa => "usa",
            Country::Turkey => "turkey",
            Country::Netherlands => "netherlands",
            Country::Germany => "germany",
            Country::Uk => "uk",
            Country::France => "france",
            Country::Canada => "canada",
            Country::Australia => "australia",
            Country::India => "india",
            Country::Spain => "spain",
            Country::Italy => "italy",
            Country::Brazil => "brazil",
            Country::Mexico => "mexico",
        }
    }

    /// Location sent when the user left it blank; some boards return nothing otherwise.
    pub fn default_location(&self) -> &'static str {
        match self {
            Country::Usa => "United States",
            Country::Turkey => "Turkey",
            Country::Netherlands => "Netherlands",
            Country::Germany => "Germany",
            Country::Uk => "United Kingdom",
            Country::France => "France",
            Country::Canada => "Canada",
            Country::Australia => "Australia",
            Country::India => "India",
            Country::Spain => "Spain",
            Country::Italy => "Italy",
            Country::Brazil => "Brazil",
            Country::Mexico => "Mexico",
        }
    }
}

pub fn infer_country(location: &str) -> Country {
    let lowered = location.trim().to_lowercase();
    if lowered.is_empty() {
        return Country::Usa;
    }

    COUNTRY_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| lowered.contains(alias)))
        .map(|(country, _)| *country)
        .unwrap_or(Country::Usa)
}

/// Infers the country and fills in a default location when none was given.
pub fn resolve_location(location: Option<&str>) -> (Country, String) {
    let given = location.map(str::trim).filter(|l| !l.is_empty());
    let country = infer_country(given.unwrap_or_default());
    let location = given
        .map(str::to_string)
        .unwrap_or_else(|| country.default_location().to_string());

    (country, location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_istanbul_any_case_is_turkey() {
        assert_eq!(infer_country("Istanbul"), Country::Turkey);
        assert_eq!(infer_country("ISTANBUL, TR"), Country::Turkey);
        assert_eq!(infer_country("kadıköy, istanbul"), Country::Turkey);
    }

    #[test]
    fn test_unknown_or_empty_is_usa() {
        assert_eq!(infer_country(""), Country::Usa);
        assert_eq!(infer_country("   "), Country::Usa);
        assert_eq!(infer_country("Reykjavik"), Country::Usa);
        assert_eq!(infer_country("San Francisco, CA"), Country::Usa);
    }

    #[test]
    fn test_first_match_in_table_order_wins() {
        // "berlin" (germany) is checked before "paris" (france)
        assert_eq!(infer_country("Paris or Berlin"), Country::Germany);
        assert_eq!(infer_country("London"), Country::Uk);
        assert_eq!(infer_country("Mexico City"), Country::Mexico);
        assert_eq!(infer_country("São Paulo"), Country::Brazil);
    }

    #[test]
    fn test_empty_location_gets_country_default() {
        let (country, location) = resolve_location(None);
        assert_eq!(country, Country::Usa);
        assert_eq!(location, "United States");

        let (country, location) = resolve_location(Some("  "));
        assert_eq!(country, Country::Usa);
        assert_eq!(location, "United States");
    }

    #[test]
    fn test_given_location_is_kept() {
        let (country, location) = resolve_location(Some(" Amsterdam "));
        assert_eq!(country, Country::Netherlands);
        assert_eq!(location, "Amsterdam");
    }

    #[test]
    fn test_country_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Country::Uk).unwrap(), "uk");
        assert_eq!(Country::Uk.default_location(), "United Kingdom");
    }
}
