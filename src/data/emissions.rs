use std::fmt;

use log::debug;

use super::geo::{FlightMap, RouteSegment};
use super::model::FlightDataset;
use crate::error::QueryError;

/// kg CO₂ per passenger-km for flights shorter than the threshold.
pub const SHORT_HAUL_KG_PER_KM: f64 = 0.15;
/// kg CO₂ per passenger-km for flights at or above the threshold.
pub const LONG_HAUL_KG_PER_KM: f64 = 0.11;

// ---------------------------------------------------------------------------
// Haul classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HaulClass {
    Short,
    Long,
}

impl HaulClass {
    /// `Short` when `distance_km < threshold_km`.
    pub fn classify(distance_km: f64, threshold_km: f64) -> Self {
        if distance_km < threshold_km {
            HaulClass::Short
        } else {
            HaulClass::Long
        }
    }

    pub fn kg_co2_per_km(self) -> f64 {
        match self {
            HaulClass::Short => SHORT_HAUL_KG_PER_KM,
            HaulClass::Long => LONG_HAUL_KG_PER_KM,
        }
    }
}

impl fmt::Display for HaulClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaulClass::Short => write!(f, "short-haul"),
            HaulClass::Long => write!(f, "long-haul"),
        }
    }
}

// ---------------------------------------------------------------------------
// Query result
// ---------------------------------------------------------------------------

/// CO₂ estimate for one route, kg per passenger.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEmission {
    pub source: String,
    pub destination: String,
    pub distance_km: f64,
    pub haul: HaulClass,
    pub kg_co2: f64,
}

/// Totals for one haul class.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HaulTotals {
    pub routes: usize,
    pub distance_km: f64,
    pub kg_co2: f64,
}

impl HaulTotals {
    fn add(&mut self, emission: &RouteEmission) {
        self.routes += 1;
        self.distance_km += emission.distance_km;
        self.kg_co2 += emission.kg_co2;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryEmissions {
    pub map: FlightMap,
    pub routes: Vec<RouteEmission>,
    pub short_haul: HaulTotals,
    pub long_haul: HaulTotals,
    /// Routes that matched but carry no distance, so cannot be classified.
    pub unclassified: usize,
}

impl CountryEmissions {
    pub fn total_kg_co2(&self) -> f64 {
        self.short_haul.kg_co2 + self.long_haul.kg_co2
    }
}

impl FlightDataset {
    /// Routes leaving `country`, classified by haul and priced in CO₂.
    ///
    /// With `internal_only` the destination must be in the same country.
    /// Unresolvable destinations are skipped.
    pub fn country_flights_and_emissions(
        &self,
        country: &str,
        threshold_km: f64,
        internal_only: bool,
    ) -> Result<CountryEmissions, QueryError> {
        if !self.is_known_country(country) {
            return Err(QueryError::Validation(format!("unknown country '{country}'")));
        }
        if !threshold_km.is_finite() || threshold_km <= 0.0 {
            return Err(QueryError::Validation(format!(
                "short-haul threshold must be a positive distance, got {threshold_km}"
            )));
        }

        let mut result = CountryEmissions::default();

        for route in &self.routes {
            let Some(from) = self.airport(&route.source) else {
                continue;
            };
            if from.country != country {
                continue;
            }
            let Some(to) = self.airport(&route.destination) else {
                continue;
            };
            if internal_only && to.country != country {
                continue;
            }

            result.map.add_marker(from);
            result.map.add_marker(to);
            let mut segment = RouteSegment::between(from, to, route.distance_km);

            match route.distance_km {
                Some(distance_km) => {
                    let haul = HaulClass::classify(distance_km, threshold_km);
                    let emission = RouteEmission {
                        source: segment.source.clone(),
                        destination: segment.destination.clone(),
                        distance_km,
                        haul,
                        kg_co2: distance_km * haul.kg_co2_per_km(),
                    };
                    match haul {
                        HaulClass::Short => result.short_haul.add(&emission),
                        HaulClass::Long => result.long_haul.add(&emission),
                    }
                    segment.haul = Some(haul);
                    result.routes.push(emission);
                }
                None => result.unclassified += 1,
            }
            result.map.segments.push(segment);
        }

        debug!(
            "Emissions for {country} (threshold {threshold_km} km, internal={internal_only}): \
             {} short, {} long, {} unclassified",
            result.short_haul.routes, result.long_haul.routes, result.unclassified
        );
        Ok(result)
    }
}
