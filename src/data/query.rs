use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use super::geo::{FlightMap, RouteSegment};
use super::model::{Airline, Airplane, Airport, FlightDataset, Route};
use crate::error::QueryError;

/// Width of each distance histogram bucket.
pub const DISTANCE_BUCKET_KM: f64 = 500.0;

// ---------------------------------------------------------------------------
// Query result types
// ---------------------------------------------------------------------------

/// One entry of the airplane model ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCount {
    pub model: String,
    pub count: usize,
}

/// Half-open bucket `[lower_km, upper_km)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceBucket {
    pub lower_km: f64,
    pub upper_km: f64,
    pub count: usize,
}

/// Histogram of route distances. `missing` routes are not in any bucket;
/// empty buckets are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceHistogram {
    pub bucket_width_km: f64,
    pub buckets: Vec<DistanceBucket>,
    pub missing: usize,
}

impl DistanceHistogram {
    /// Number of routes counted in buckets.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// First rows of every table, for the overview tab.
#[derive(Debug, Clone, Copy)]
pub struct TablePreview<'a> {
    pub airlines: &'a [Airline],
    pub airplanes: &'a [Airplane],
    pub airports: &'a [Airport],
    pub routes: &'a [Route],
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl FlightDataset {
    fn validate_country(&self, country: &str) -> Result<(), QueryError> {
        if self.is_known_country(country) {
            Ok(())
        } else {
            Err(QueryError::Validation(format!("unknown country '{country}'")))
        }
    }

    /// Airports whose country equals `country` exactly.
    ///
    /// A known country without airports gives an empty list; an unknown one
    /// is a [`QueryError::Validation`].
    pub fn airports_in_country(&self, country: &str) -> Result<Vec<&Airport>, QueryError> {
        self.validate_country(country)?;
        Ok(self
            .airports
            .iter()
            .filter(|a| a.country == country)
            .collect())
    }

    /// Map with one marker per airport in `country`.
    pub fn airports_map(&self, country: &str) -> Result<FlightMap, QueryError> {
        Ok(FlightMap::from_airports(self.airports_in_country(country)?))
    }

    /// Routes departing from the airport with the given code.
    ///
    /// Returns `Ok(None)` when the airport has no (matching) routes. Routes
    /// whose destination cannot be resolved are skipped.
    pub fn flights_from_airport(
        &self,
        code: &str,
        internal_only: bool,
    ) -> Result<Option<FlightMap>, QueryError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(QueryError::Validation("airport code is empty".to_string()));
        }
        let origin = self
            .airport(code)
            .ok_or_else(|| QueryError::NotFound(format!("no airport with code '{code}'")))?;

        let mut map = FlightMap::from_airports([origin]);
        for route in self.routes_from(origin) {
            let Some(dest) = self.airport(&route.destination) else {
                continue;
            };
            if internal_only && dest.country != origin.country {
                continue;
            }
            map.add_marker(dest);
            map.segments
                .push(RouteSegment::between(origin, dest, route.distance_km));
        }

        debug!(
            "{} routes from {code} (internal={internal_only})",
            map.segments.len()
        );
        if map.segments.is_empty() {
            return Ok(None);
        }
        Ok(Some(map))
    }

    /// Routes whose source code resolves to `origin`.
    fn routes_from<'a>(&'a self, origin: &'a Airport) -> impl Iterator<Item = &'a Route> + 'a {
        self.routes.iter().filter(move |r| {
            self.airport(&r.source)
                .is_some_and(|a| std::ptr::eq(a, origin))
        })
    }

    /// Most used airplane models on routes departing from `countries`
    /// (all countries when `None` or empty).
    ///
    /// Sorted by count descending, ties by model name ascending.
    pub fn top_airplane_models(
        &self,
        countries: Option<&BTreeSet<String>>,
        top_n: usize,
    ) -> Result<Vec<ModelCount>, QueryError> {
        if top_n == 0 {
            return Err(QueryError::Validation(
                "number of models must be at least 1".to_string(),
            ));
        }
        let countries = countries.filter(|c| !c.is_empty());
        if let Some(countries) = countries {
            for country in countries {
                self.validate_country(country)?;
            }
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for route in &self.routes {
            if let Some(countries) = countries {
                let in_scope = self
                    .airport(&route.source)
                    .is_some_and(|a| countries.contains(&a.country));
                if !in_scope {
                    continue;
                }
            }
            let models: BTreeSet<&str> = route
                .equipment
                .iter()
                .filter_map(|code| self.airplane_for_equipment(code))
                .map(|plane| plane.name.as_str())
                .collect();
            for model in models {
                *counts.entry(model).or_default() += 1;
            }
        }

        // BTreeMap iteration is name-ascending and the sort is stable.
        let mut ranked: Vec<ModelCount> = counts
            .into_iter()
            .map(|(model, count)| ModelCount {
                model: model.to_string(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(top_n);
        Ok(ranked)
    }

    /// Histogram of route distances in [`DISTANCE_BUCKET_KM`] buckets.
    /// Only non-empty buckets are returned, in ascending order.
    pub fn distance_distribution(&self) -> DistanceHistogram {
        let mut histogram = DistanceHistogram {
            bucket_width_km: DISTANCE_BUCKET_KM,
            ..Default::default()
        };

        let distances: Vec<f64> = self
            .routes
            .iter()
            .filter_map(|r| r.distance_km)
            .collect();
        histogram.missing = self.routes.len() - distances.len();

        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for d in distances {
            *counts.entry((d / DISTANCE_BUCKET_KM).floor() as usize).or_default() += 1;
        }
        histogram.buckets = counts
            .into_iter()
            .map(|(i, count)| DistanceBucket {
                lower_km: i as f64 * DISTANCE_BUCKET_KM,
                upper_km: (i as f64 + 1.0) * DISTANCE_BUCKET_KM,
                count,
            })
            .collect();
        histogram
    }

    /// Sorted, de-duplicated airplane model names.
    pub fn aircraft_models(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self.airplanes.iter().map(|p| p.name.as_str()).collect();
        names.into_iter().collect()
    }

    /// Sorted, de-duplicated airport display names.
    pub fn airport_names(&self) -> Vec<String> {
        let names: BTreeSet<String> = self.airports.iter().map(Airport::display_name).collect();
        names.into_iter().collect()
    }

    /// Sorted airport IATA codes, for the flights selector.
    pub fn airport_codes(&self) -> Vec<&str> {
        let codes: BTreeSet<&str> = self
            .airports
            .iter()
            .filter_map(|a| a.iata.as_deref())
            .collect();
        codes.into_iter().collect()
    }

    /// Up to `n` leading rows of each table.
    pub fn preview(&self, n: usize) -> TablePreview<'_> {
        TablePreview {
            airlines: &self.airlines[..n.min(self.airlines.len())],
            airplanes: &self.airplanes[..n.min(self.airplanes.len())],
            airports: &self.airports[..n.min(self.airports.len())],
            routes: &self.routes[..n.min(self.routes.len())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{airplane, route, sample_dataset};

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_airports_in_country_exact_match() {
        let ds = sample_dataset();
        for country in ds.countries() {
            let airports = ds.airports_in_country(country).unwrap();
            assert!(airports.iter().all(|a| &a.country == country));
        }
        let codes: Vec<&str> = ds
            .airports_in_country("Canada")
            .unwrap()
            .iter()
            .map(|a| a.code())
            .collect();
        assert_eq!(codes, ["YYZ", "YUL", "YVR"]);
    }

    #[test]
    fn test_airports_in_country_unknown_vs_empty() {
        let ds = sample_dataset();
        assert!(matches!(
            ds.airports_in_country("Atlantis"),
            Err(QueryError::Validation(_))
        ));
        // Case matters: labels are matched exactly.
        assert!(ds.airports_in_country("canada").is_err());
        // Known through the airline table only.
        assert_eq!(ds.airports_in_country("Iceland").unwrap().len(), 0);
    }

    #[test]
    fn test_airports_map_has_marker_per_airport() {
        let ds = sample_dataset();
        let map = ds.airports_map("United States").unwrap();
        assert_eq!(map.markers.len(), 2);
        assert!(map.segments.is_empty());
    }

    #[test]
    fn test_flights_from_airport_internal_is_subset() {
        let ds = sample_dataset();
        let all = ds.flights_from_airport("YYZ", false).unwrap().unwrap();
        let internal = ds.flights_from_airport("YYZ", true).unwrap().unwrap();

        let all_dest: BTreeSet<&str> = all.destinations().collect();
        let internal_dest: BTreeSet<&str> = internal.destinations().collect();
        assert_eq!(all_dest, BTreeSet::from(["JFK", "YUL", "YVR"]));
        assert_eq!(internal_dest, BTreeSet::from(["YUL", "YVR"]));
        assert!(internal_dest.is_subset(&all_dest));
        assert_eq!(all.markers[0].code, "YYZ");
    }

    #[test]
    fn test_flights_from_airport_skips_unresolved_and_empty() {
        let ds = sample_dataset();
        // JFK -> XXX does not resolve, JFK -> LAX does.
        let jfk = ds.flights_from_airport("JFK", false).unwrap().unwrap();
        assert_eq!(jfk.destinations().collect::<Vec<_>>(), ["LAX"]);
        // LAX has no departures at all.
        assert_eq!(ds.flights_from_airport("LAX", false).unwrap(), None);
        // FRA -> LIS is international only.
        assert_eq!(ds.flights_from_airport("FRA", true).unwrap(), None);
    }

    #[test]
    fn test_flights_from_airport_errors() {
        let ds = sample_dataset();
        assert!(matches!(
            ds.flights_from_airport("ZZZ", false),
            Err(QueryError::NotFound(_))
        ));
        assert!(matches!(
            ds.flights_from_airport("  ", false),
            Err(QueryError::Validation(_))
        ));
    }

    #[test]
    fn test_top_models_ties_broken_by_name() {
        let ds = sample_dataset();
        let top = ds.top_airplane_models(Some(&set(&["Canada"])), 3).unwrap();
        let ranked: Vec<(&str, usize)> = top.iter().map(|m| (m.model.as_str(), m.count)).collect();
        assert_eq!(ranked, [("A320", 5), ("B737", 5), ("A321", 2)]);
    }

    #[test]
    fn test_top_models_without_filter() {
        let ds = sample_dataset();
        let top = ds.top_airplane_models(None, 10).unwrap();
        let ranked: Vec<(&str, usize)> = top.iter().map(|m| (m.model.as_str(), m.count)).collect();
        assert_eq!(ranked, [("A320", 6), ("B737", 5), ("A321", 4), ("B777", 1)]);

        // An empty selection means no filter.
        assert_eq!(ds.top_airplane_models(Some(&BTreeSet::new()), 10).unwrap(), top);
    }

    #[test]
    fn test_top_models_length_and_monotonic() {
        let ds = sample_dataset();
        let mut previous: Vec<ModelCount> = Vec::new();
        for n in 1..=6 {
            let top = ds.top_airplane_models(None, n).unwrap();
            assert_eq!(top.len(), n.min(4));
            assert!(top.windows(2).all(|w| w[0].count > w[1].count
                || (w[0].count == w[1].count && w[0].model < w[1].model)));
            assert_eq!(&top[..previous.len()], &previous[..]);
            previous = top;
        }
    }

    #[test]
    fn test_top_models_validation() {
        let ds = sample_dataset();
        assert!(matches!(
            ds.top_airplane_models(None, 0),
            Err(QueryError::Validation(_))
        ));
        assert!(matches!(
            ds.top_airplane_models(Some(&set(&["Canada", "Atlantis"])), 3),
            Err(QueryError::Validation(_))
        ));
        assert!(ds.top_airplane_models(Some(&set(&["Iceland"])), 3).unwrap().is_empty());
    }

    #[test]
    fn test_distance_distribution_accounts_for_every_route() {
        let ds = sample_dataset();
        let hist = ds.distance_distribution();
        assert_eq!(hist.missing, 1);
        assert_eq!(hist.total(), 9);
        assert_eq!(hist.total() + hist.missing, ds.routes.len());
        let lowers: Vec<f64> = hist.buckets.iter().map(|b| b.lower_km).collect();
        assert_eq!(lowers, [0.0, 500.0, 1500.0, 3000.0, 3500.0]);
        assert_eq!(hist.buckets[1].count, 3);
        // 3980 km lands in [3500, 4000).
        assert_eq!(hist.buckets[4].count, 1);
        assert_eq!(hist.buckets[4].upper_km, 4000.0);
    }

    #[test]
    fn test_distance_distribution_with_huge_distance() {
        let ds = FlightDataset::new(
            vec![],
            vec![],
            vec![],
            vec![route("AAA", "BBB", &[], Some(1e21)), route("AAA", "CCC", &[], Some(120.0))],
        );
        let hist = ds.distance_distribution();
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.buckets.len(), 2);
        assert_eq!(hist.buckets[0].lower_km, 0.0);
    }

    #[test]
    fn test_top_models_counts_each_model_once_per_route() {
        let a320 = Airplane {
            name: "Airbus A320".into(),
            iata: Some("320".into()),
            icao: Some("A320".into()),
            manufacturer: "Airbus".into(),
        };
        let ds = FlightDataset::new(
            vec![],
            vec![a320, airplane("Boeing 737", "737")],
            vec![],
            vec![
                route("YYZ", "YUL", &["320", "A320", "737"], None),
                route("YUL", "YYZ", &["A320"], None),
            ],
        );
        let top = ds.top_airplane_models(None, 5).unwrap();
        let ranked: Vec<(&str, usize)> = top.iter().map(|m| (m.model.as_str(), m.count)).collect();
        assert_eq!(ranked, [("Airbus A320", 2), ("Boeing 737", 1)]);
    }

    #[test]
    fn test_empty_dataset_projections() {
        let ds = FlightDataset::default();
        assert!(ds.aircraft_models().is_empty());
        assert!(ds.airport_names().is_empty());
        let hist = ds.distance_distribution();
        assert!(hist.buckets.is_empty());
        assert_eq!(hist.missing, 0);
        assert_eq!(ds.preview(5).routes.len(), 0);
    }

    #[test]
    fn test_projections_sorted() {
        let ds = sample_dataset();
        assert_eq!(ds.aircraft_models(), ["A320", "A321", "B737", "B777"]);
        assert_eq!(ds.airport_names()[0], "Frankfurt Airport (FRA)");
        assert_eq!(ds.airport_codes(), ["FRA", "JFK", "LAX", "LIS", "YUL", "YVR", "YYZ"]);
        assert_eq!(ds.preview(3).airports.len(), 3);
        assert_eq!(ds.preview(50).airlines.len(), 3);
    }
}
