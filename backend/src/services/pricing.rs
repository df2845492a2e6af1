//! Pricing, market trend and traffic impact for a parcel.

use crate::catalog::CityCatalog;
use crate::models::{
    Congestion, MarketTrend, Outlook, PriceBand, Pricing, TrafficImpact, TrendDirection,
    ValueRange, ZoneType,
};

/// Local price bounds relative to the observed nearby average.
const LOCAL_LOW: f64 = 0.85;
const LOCAL_HIGH: f64 = 1.15;

/// Floor area represented by one traffic generation unit.
const SQM_PER_TRAFFIC_UNIT: f64 = 100.0;

/// City-zone price band, narrowed by the observed nearby average.
///
/// Both local bounds are clamped into the city band, so a single outlier
/// neighbour can never push the price outside it.
pub fn price_per_sqm(city: &str, zone: ZoneType, nearby_average: Option<f64>) -> PriceBand {
    let band = CityCatalog::price_band(city, zone);
    match nearby_average.filter(|v| v.is_finite() && *v > 0.0) {
        Some(value) => {
            let clamp = |v: f64| v.round().clamp(band.min, band.max);
            let min = clamp(value * LOCAL_LOW);
            let max = clamp(value * LOCAL_HIGH);
            PriceBand {
                min,
                max,
                average: ((min + max) / 2.0).round(),
                currency: band.currency,
            }
        }
        None => band,
    }
}

/// Parcel value range at the given per-square-meter prices.
pub fn estimated_value(area_sqm: f64, price: &PriceBand) -> ValueRange {
    ValueRange {
        min: (area_sqm * price.min).trunc(),
        max: (area_sqm * price.max).trunc(),
        average: (area_sqm * price.average).trunc(),
    }
}

/// Annual-growth based trend for a city and zone.
pub fn market_trend(city: &str, zone: ZoneType) -> MarketTrend {
    let growth = CityCatalog::growth_rate(city, zone);

    let trend = if growth > 5.0 {
        TrendDirection::Rising
    } else if growth > 2.0 {
        TrendDirection::Stable
    } else {
        TrendDirection::Slow
    };
    let outlook = if growth > 6.0 {
        Outlook::Positive
    } else if growth > 3.0 {
        Outlook::Stable
    } else {
        Outlook::Cautious
    };

    MarketTrend {
        trend,
        growth_rate: format!("{:.1}%", growth),
        outlook,
        description: format!(
            "Market showing {} trend with {} outlook",
            trend_label(trend),
            outlook_label(outlook)
        ),
    }
}

fn trend_label(trend: TrendDirection) -> &'static str {
    match trend {
        TrendDirection::Rising => "rising",
        TrendDirection::Stable => "stable",
        TrendDirection::Slow => "slow",
    }
}

fn outlook_label(outlook: Outlook) -> &'static str {
    match outlook {
        Outlook::Positive => "positive",
        Outlook::Stable => "stable",
        Outlook::Cautious => "cautious",
    }
}

/// Full pricing block for a report.
pub fn pricing(city: &str, zone: ZoneType, area_sqm: f64, nearby_average: Option<f64>) -> Pricing {
    let price = price_per_sqm(city, zone, nearby_average);
    Pricing {
        estimated_value: estimated_value(area_sqm, &price),
        price_per_sqm: price,
        market_trend: market_trend(city, zone),
    }
}

/// Trip generation rates `(daily, peak hour)` per unit and the unit label.
fn trip_rates(zone: ZoneType) -> (f64, f64, &'static str) {
    match zone {
        ZoneType::Residential => (8.0, 0.8, "Dwelling Units"),
        ZoneType::Commercial => (12.0, 1.2, "100 sqm GFA"),
        ZoneType::Industrial => (4.0, 0.5, "100 sqm GFA"),
        ZoneType::Mixed => (10.0, 1.0, "100 sqm GFA"),
    }
}

fn congestion(peak_hour_trips: u32) -> Congestion {
    let (level, description) = if peak_hour_trips < 50 {
        ("Low", "Minimal traffic impact")
    } else if peak_hour_trips < 100 {
        ("Moderate", "Manageable with mitigation")
    } else if peak_hour_trips < 200 {
        ("High", "Requires traffic management")
    } else {
        ("Very High", "Significant mitigation needed")
    };
    Congestion {
        level: level.to_string(),
        description: description.to_string(),
    }
}

/// Trip generation over the parcel area: one unit per 100 sqm.
pub fn traffic_impact(area_sqm: f64, zone: ZoneType) -> TrafficImpact {
    let (daily, peak, unit_type) = trip_rates(zone);
    let units = (area_sqm.max(0.0) / SQM_PER_TRAFFIC_UNIT).floor();
    let peak_hour_trips = (units * peak).floor() as u32;

    TrafficImpact {
        daily_trips: (units * daily).floor() as u32,
        peak_hour_trips,
        unit_count: units as u32,
        unit_type: unit_type.to_string(),
        congestion: congestion(peak_hour_trips),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_without_local_data_is_city_band() {
        let band = price_per_sqm("bangalore", ZoneType::Residential, None);
        assert_eq!(band, CityCatalog::price_band("bangalore", ZoneType::Residential));
    }

    #[test]
    fn test_local_average_narrows_band() {
        // 10000 -> 8500 .. 11500 inside the 6500 .. 12000 band.
        let band = price_per_sqm("bangalore", ZoneType::Residential, Some(10000.0));
        assert_eq!(band.min, 8500.0);
        assert_eq!(band.max, 11500.0);
        assert_eq!(band.average, 10000.0);
    }

    #[test]
    fn test_outlier_neighbour_is_clamped() {
        let city = CityCatalog::price_band("bangalore", ZoneType::Residential);

        let high = price_per_sqm("bangalore", ZoneType::Residential, Some(1_000_000.0));
        assert_eq!(high.min, city.max);
        assert_eq!(high.max, city.max);

        let low = price_per_sqm("bangalore", ZoneType::Residential, Some(10.0));
        assert_eq!(low.min, city.min);
        assert_eq!(low.max, city.min);
        assert!(low.min <= low.max);
    }

    #[test]
    fn test_estimated_value_scales_with_area() {
        let band = price_per_sqm("bangalore", ZoneType::Residential, Some(10000.0));
        let value = estimated_value(200.0, &band);
        assert_eq!(value.min, 1_700_000.0);
        assert_eq!(value.max, 2_300_000.0);
        assert_eq!(value.average, 2_000_000.0);
    }

    #[test]
    fn test_market_trend_thresholds() {
        let bangalore = market_trend("bangalore", ZoneType::Commercial);
        assert_eq!(bangalore.trend, TrendDirection::Rising);
        assert_eq!(bangalore.outlook, Outlook::Positive);
        assert_eq!(bangalore.growth_rate, "10.2%");
        assert_eq!(
            bangalore.description,
            "Market showing rising trend with positive outlook"
        );

        let ny = market_trend("new_york", ZoneType::Industrial);
        assert_eq!(ny.trend, TrendDirection::Stable);
        assert_eq!(ny.outlook, Outlook::Cautious);

        // Unknown city falls back to bangalore.
        assert_eq!(market_trend("atlantis", ZoneType::Residential).growth_rate, "8.5%");
    }

    #[test]
    fn test_traffic_impact() {
        let residential = traffic_impact(1250.0, ZoneType::Residential);
        assert_eq!(residential.unit_count, 12);
        assert_eq!(residential.daily_trips, 96);
        assert_eq!(residential.peak_hour_trips, 9);
        assert_eq!(residential.unit_type, "Dwelling Units");
        assert_eq!(residential.congestion.level, "Low");

        let commercial = traffic_impact(20_000.0, ZoneType::Commercial);
        assert_eq!(commercial.peak_hour_trips, 240);
        assert_eq!(commercial.congestion.level, "Very High");
        assert_eq!(commercial.unit_type, "100 sqm GFA");
    }
}
