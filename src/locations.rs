/// Location registry for the bias monitoring service.
///
/// Defines the canonical list of monitored locations along with their
/// NOAA grid office and the gridpoint block the collection jobs sample
/// around each one. This is the single source of truth for location
/// identifiers — other modules should reference locations from here
/// rather than hardcoding them.

// ---------------------------------------------------------------------------
// Location metadata
// ---------------------------------------------------------------------------

/// Metadata for a single monitored location.
pub struct Location {
    /// Short uppercase identifier used as the store key, e.g. "CHI".
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// NOAA grid office covering this location, e.g. "LOT".
    pub grid_office: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// How many gridpoints the collection jobs sample around this
    /// location. Must be at least the usable-consensus minimum, or no
    /// date here can ever produce a bias record.
    pub sampled_grid_count: u32,
}

/// All monitored locations.
///
/// Sources:
///   - Grid offices and cell coordinates: NOAA/NWS API (api.weather.gov)
pub static LOCATION_REGISTRY: &[Location] = &[
    Location {
        id: "CHI",
        name: "Chicago, IL",
        grid_office: "LOT",
        latitude: 41.8781,
        longitude: -87.6298,
        sampled_grid_count: 9,
    },
    Location {
        id: "NYC",
        name: "New York, NY",
        grid_office: "OKX",
        latitude: 40.7128,
        longitude: -74.0060,
        sampled_grid_count: 9,
    },
    Location {
        id: "DEN",
        name: "Denver, CO",
        grid_office: "BOU",
        latitude: 39.7392,
        longitude: -104.9903,
        sampled_grid_count: 9,
    },
    Location {
        id: "SEA",
        name: "Seattle, WA",
        grid_office: "SEW",
        latitude: 47.6062,
        longitude: -122.3321,
        sampled_grid_count: 9,
    },
    Location {
        id: "MIA",
        name: "Miami, FL",
        grid_office: "MFL",
        latitude: 25.7617,
        longitude: -80.1918,
        sampled_grid_count: 9,
    },
];

/// Returns the identifiers for all monitored locations.
pub fn all_location_ids() -> Vec<&'static str> {
    LOCATION_REGISTRY.iter().map(|l| l.id).collect()
}

/// Looks up a location by identifier. Returns `None` if not found.
pub fn find_location(id: &str) -> Option<&'static Location> {
    LOCATION_REGISTRY.iter().find(|l| l.id == id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MIN_GRID_COUNT;

    #[test]
    fn test_all_location_ids_are_short_uppercase_codes() {
        // Store keys; a lowercase or padded id would silently match
        // nothing in the forecast tables.
        for location in LOCATION_REGISTRY {
            assert_eq!(
                location.id.len(),
                3,
                "id for '{}' should be 3 characters, got '{}'",
                location.name,
                location.id
            );
            assert!(
                location.id.chars().all(|c| c.is_ascii_uppercase()),
                "id for '{}' should be uppercase ASCII, got '{}'",
                location.name,
                location.id
            );
        }
    }

    #[test]
    fn test_no_duplicate_location_ids() {
        let mut seen = std::collections::HashSet::new();
        for location in LOCATION_REGISTRY {
            assert!(
                seen.insert(location.id),
                "duplicate location id '{}' found in LOCATION_REGISTRY",
                location.id
            );
        }
    }

    #[test]
    fn test_grid_offices_are_three_letter_codes() {
        for location in LOCATION_REGISTRY {
            assert_eq!(
                location.grid_office.len(),
                3,
                "grid office for '{}' should be a 3-letter NOAA office code",
                location.name
            );
        }
    }

    #[test]
    fn test_sampled_grid_counts_reach_usable_minimum() {
        // A location sampling fewer gridpoints than the consensus minimum
        // can never produce a usable consensus on any date.
        for location in LOCATION_REGISTRY {
            assert!(
                location.sampled_grid_count >= DEFAULT_MIN_GRID_COUNT,
                "location '{}' samples {} gridpoints, below the usable minimum of {}",
                location.id,
                location.sampled_grid_count,
                DEFAULT_MIN_GRID_COUNT
            );
        }
    }

    #[test]
    fn test_find_location_returns_correct_entry() {
        let chicago = find_location("CHI").expect("Chicago should be in registry");
        assert_eq!(chicago.grid_office, "LOT");
        assert!(chicago.name.contains("Chicago"));
    }

    #[test]
    fn test_find_location_returns_none_for_unknown_id() {
        assert!(find_location("XXX").is_none());
    }

    #[test]
    fn test_all_location_ids_helper_matches_registry_length() {
        assert_eq!(all_location_ids().len(), LOCATION_REGISTRY.len());
    }
}
