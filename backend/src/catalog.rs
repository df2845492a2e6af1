//! Static per-city reference tables.
//!
//! Every lookup normalizes the city name (case, spaces, underscores and
//! dashes are ignored, so `"New York"`, `"new_york"` and `"NEWYORK"` resolve
//! to the same entry) and falls back to a default instead of failing. The
//! default city for pricing, growth and climate is Bangalore.

use crate::models::geometry::LngLat;
use crate::models::report::PriceBand;
use crate::models::zoning::ZoneType;

/// City used when a lookup misses.
pub const DEFAULT_CITY: &str = "bangalore";
/// Minimum "good" parcel size for cities without an explicit threshold.
pub const DEFAULT_AREA_THRESHOLD_SQM: f64 = 500.0;
/// Growth rate applied when a zone has no entry in a city's table.
pub const DEFAULT_GROWTH_RATE: f64 = 7.0;

/// `(min, max, average)` price per square meter.
type Band = (f64, f64, f64);

struct CityPricing {
    city: &'static str,
    currency: &'static str,
    /// Residential, commercial, industrial, mixed.
    bands: [Band; 4],
}

const PRICING: &[CityPricing] = &[
    CityPricing {
        city: "bangalore",
        currency: "₹",
        bands: [
            (6500.0, 12000.0, 9000.0),
            (8000.0, 15000.0, 11500.0),
            (4000.0, 7000.0, 5500.0),
            (7000.0, 13000.0, 10000.0),
        ],
    },
    CityPricing {
        city: "mumbai",
        currency: "₹",
        bands: [
            (15000.0, 35000.0, 25000.0),
            (20000.0, 50000.0, 35000.0),
            (8000.0, 15000.0, 11500.0),
            (18000.0, 40000.0, 29000.0),
        ],
    },
    CityPricing {
        city: "delhi",
        currency: "₹",
        bands: [
            (8000.0, 18000.0, 13000.0),
            (10000.0, 25000.0, 17500.0),
            (5000.0, 10000.0, 7500.0),
            (9000.0, 20000.0, 14500.0),
        ],
    },
    CityPricing {
        city: "hyderabad",
        currency: "₹",
        bands: [
            (5000.0, 10000.0, 7500.0),
            (7000.0, 13000.0, 10000.0),
            (3500.0, 6000.0, 4750.0),
            (6000.0, 11000.0, 8500.0),
        ],
    },
    CityPricing {
        city: "new_york",
        currency: "$",
        bands: [
            (3000.0, 8000.0, 5500.0),
            (4000.0, 12000.0, 8000.0),
            (1500.0, 3500.0, 2500.0),
            (3500.0, 10000.0, 6750.0),
        ],
    },
    CityPricing {
        city: "singapore",
        currency: "S$",
        bands: [
            (8000.0, 20000.0, 14000.0),
            (10000.0, 30000.0, 20000.0),
            (4000.0, 10000.0, 7000.0),
            (9000.0, 25000.0, 17000.0),
        ],
    },
];

/// Annual growth in percent: residential, commercial, industrial, mixed.
const GROWTH: &[(&str, [f64; 4])] = &[
    ("bangalore", [8.5, 10.2, 6.5, 9.0]),
    ("mumbai", [5.8, 7.5, 4.2, 6.5]),
    ("delhi", [7.2, 8.8, 5.5, 7.8]),
    ("hyderabad", [9.5, 11.2, 7.8, 10.0]),
    ("new_york", [3.5, 4.8, 2.5, 4.0]),
    ("singapore", [4.2, 5.5, 3.2, 4.8]),
];

const AREA_THRESHOLDS: &[(&str, f64)] = &[
    ("bangalore", 500.0),
    ("mumbai", 400.0),
    ("delhi", 450.0),
    ("hyderabad", 600.0),
    ("new_york", 300.0),
    ("singapore", 350.0),
];

/// Long-run climate averages used to build flood-model inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityClimate {
    pub city: &'static str,
    pub name: &'static str,
    /// mm per year.
    pub annual_rainfall: f64,
    /// mm per month during the wet season.
    pub monsoon_rainfall: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub elevation: f64,
    /// Inches.
    pub max_recorded_flood_depth: f64,
    /// Scales projected flood depths for local vulnerability.
    pub risk_multiplier: f64,
}

const CLIMATE: &[CityClimate] = &[
    CityClimate {
        city: "bangalore",
        name: "Bangalore",
        annual_rainfall: 970.0,
        monsoon_rainfall: 180.0,
        temperature: 24.0,
        humidity: 60.0,
        pressure: 916.0,
        elevation: 920.0,
        max_recorded_flood_depth: 36.0,
        risk_multiplier: 0.8,
    },
    CityClimate {
        city: "mumbai",
        name: "Mumbai",
        annual_rainfall: 2400.0,
        monsoon_rainfall: 650.0,
        temperature: 27.0,
        humidity: 75.0,
        pressure: 1013.0,
        elevation: 14.0,
        max_recorded_flood_depth: 72.0,
        risk_multiplier: 1.8,
    },
    CityClimate {
        city: "delhi",
        name: "Delhi",
        annual_rainfall: 790.0,
        monsoon_rainfall: 200.0,
        temperature: 25.0,
        humidity: 65.0,
        pressure: 1010.0,
        elevation: 216.0,
        max_recorded_flood_depth: 48.0,
        risk_multiplier: 1.2,
    },
    CityClimate {
        city: "hyderabad",
        name: "Hyderabad",
        annual_rainfall: 812.0,
        monsoon_rainfall: 170.0,
        temperature: 26.0,
        humidity: 58.0,
        pressure: 960.0,
        elevation: 505.0,
        max_recorded_flood_depth: 30.0,
        risk_multiplier: 1.0,
    },
    CityClimate {
        city: "chennai",
        name: "Chennai",
        annual_rainfall: 1400.0,
        monsoon_rainfall: 350.0,
        temperature: 29.0,
        humidity: 78.0,
        pressure: 1013.0,
        elevation: 7.0,
        max_recorded_flood_depth: 60.0,
        risk_multiplier: 1.6,
    },
    CityClimate {
        city: "new_york",
        name: "New York",
        annual_rainfall: 1200.0,
        monsoon_rainfall: 100.0,
        temperature: 13.0,
        humidity: 65.0,
        pressure: 1013.0,
        elevation: 10.0,
        max_recorded_flood_depth: 84.0,
        risk_multiplier: 1.4,
    },
    CityClimate {
        city: "singapore",
        name: "Singapore",
        annual_rainfall: 2400.0,
        monsoon_rainfall: 250.0,
        temperature: 27.0,
        humidity: 84.0,
        pressure: 1011.0,
        elevation: 15.0,
        max_recorded_flood_depth: 24.0,
        risk_multiplier: 0.7,
    },
];

/// Keywords that identify a city in regulatory text, in detection order.
const CITY_KEYWORDS: &[(&str, &[&str])] = &[
    ("bangalore", &["bangalore", "bengaluru", "bbmp", "bda", "karnataka"]),
    ("mumbai", &["mumbai", "bombay", "mcgm", "maharashtra"]),
    ("delhi", &["delhi", "new delhi", "dda", "ndmc"]),
    ("chennai", &["chennai", "madras", "cmda", "tamil nadu"]),
    ("hyderabad", &["hyderabad", "ghmc", "telangana"]),
    ("pune", &["pune", "pmc", "pcmc"]),
    ("kolkata", &["kolkata", "calcutta", "kmc", "west bengal"]),
    ("new_york", &["new york", "nyc", "manhattan"]),
    ("singapore", &["singapore"]),
];

/// City centers as `(lng, lat)`.
const CITY_CENTERS: &[(&str, f64, f64)] = &[
    ("bangalore", 77.5946, 12.9716),
    ("mumbai", 72.8777, 19.0760),
    ("delhi", 77.2090, 28.6139),
    ("chennai", 80.2707, 13.0827),
    ("hyderabad", 78.4867, 17.3850),
    ("pune", 73.8567, 18.5204),
    ("kolkata", 88.3639, 22.5726),
    ("new_york", -74.0060, 40.7128),
    ("singapore", 103.8198, 1.3521),
];

/// Cities that attract more lightning strikes than the baseline.
const LIGHTNING_PRONE: &[&str] = &["bangalore", "kolkata", "ranchi", "bhubaneswar"];

fn compact(city: &str) -> String {
    city.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn same_city(key: &str, city: &str) -> bool {
    compact(key) == compact(city)
}

fn zone_index(zone: ZoneType) -> usize {
    match zone {
        ZoneType::Residential => 0,
        ZoneType::Commercial => 1,
        ZoneType::Industrial => 2,
        ZoneType::Mixed => 3,
    }
}

/// Read-only lookups over the static city tables.
pub struct CityCatalog;

impl CityCatalog {
    /// Canonical key for a city name (`"New York"` → `"new_york"`); names
    /// without a catalog entry are lowercased and trimmed.
    pub fn canonical_key(city: &str) -> String {
        Self::known_cities()
            .find(|key| same_city(key, city))
            .map(str::to_string)
            .unwrap_or_else(|| city.trim().to_lowercase())
    }

    /// Every city key that appears in any table.
    pub fn known_cities() -> impl Iterator<Item = &'static str> {
        CITY_KEYWORDS
            .iter()
            .map(|(city, _)| *city)
            .chain(LIGHTNING_PRONE.iter().copied().filter(|c| {
                !CITY_KEYWORDS.iter().any(|(k, _)| k == c)
            }))
    }

    fn pricing(city: &str) -> &'static CityPricing {
        PRICING
            .iter()
            .find(|p| same_city(p.city, city))
            .unwrap_or(&PRICING[0])
    }

    /// City and zone price band per square meter.
    pub fn price_band(city: &str, zone: ZoneType) -> PriceBand {
        let pricing = Self::pricing(city);
        let (min, max, average) = pricing.bands[zone_index(zone)];
        PriceBand {
            min,
            max,
            average,
            currency: pricing.currency.to_string(),
        }
    }

    /// Annual growth rate in percent.
    pub fn growth_rate(city: &str, zone: ZoneType) -> f64 {
        GROWTH
            .iter()
            .find(|(key, _)| same_city(key, city))
            .or_else(|| GROWTH.iter().find(|(key, _)| *key == DEFAULT_CITY))
            .map(|(_, rates)| rates[zone_index(zone)])
            .unwrap_or(DEFAULT_GROWTH_RATE)
    }

    /// Minimum parcel size considered "good" for development.
    pub fn area_threshold_sqm(city: &str) -> f64 {
        AREA_THRESHOLDS
            .iter()
            .find(|(key, _)| same_city(key, city))
            .map(|(_, threshold)| *threshold)
            .unwrap_or(DEFAULT_AREA_THRESHOLD_SQM)
    }

    pub fn climate(city: &str) -> &'static CityClimate {
        CLIMATE
            .iter()
            .find(|c| same_city(c.city, city))
            .unwrap_or(&CLIMATE[0])
    }

    /// Rainfall multiplier for a calendar month (1 = January).
    pub fn season_adjustment(month: u32) -> f64 {
        match month {
            6..=9 => 1.5,
            11 | 12 | 1 | 2 => 0.5,
            3..=5 => 0.7,
            _ => 1.0,
        }
    }

    /// City detection keywords in priority order.
    pub fn city_keywords() -> &'static [(&'static str, &'static [&'static str])] {
        CITY_KEYWORDS
    }

    pub fn center(city: &str) -> Option<LngLat> {
        CITY_CENTERS
            .iter()
            .find(|(key, _, _)| same_city(key, city))
            .map(|(_, lng, lat)| LngLat::new(*lng, *lat))
    }

    pub fn is_lightning_prone(city: &str) -> bool {
        LIGHTNING_PRONE.iter().any(|key| same_city(key, city))
    }
}
