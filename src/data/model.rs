use std::collections::{BTreeSet, HashMap};

// ---------------------------------------------------------------------------
// Reference records – one struct per table
// ---------------------------------------------------------------------------

/// An airline from the `airlines` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Airline {
    pub id: u32,
    pub name: String,
    /// Free-text country label, may be empty.
    pub country: String,
    pub active: bool,
}

/// An aircraft type from the `airplanes` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Airplane {
    /// Model name, e.g. "Airbus A320". Unique key for aggregation.
    pub name: String,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub manufacturer: String,
}

/// An airport from the `airports` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub id: Option<u32>,
    pub name: String,
    pub city: String,
    pub country: String,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Airport {
    /// Preferred code: IATA when present, ICAO otherwise.
    pub fn code(&self) -> &str {
        self.iata
            .as_deref()
            .or(self.icao.as_deref())
            .unwrap_or_default()
    }

    /// Label used in selectors, e.g. "Toronto Pearson International Airport (YYZ)".
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.code())
    }
}

/// A route from the `routes` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Operating airline code as written in the source file.
    pub airline: String,
    pub airline_id: Option<u32>,
    /// Source airport code (IATA or ICAO).
    pub source: String,
    /// Destination airport code (IATA or ICAO).
    pub destination: String,
    /// Equipment codes, resolved against [`Airplane::iata`] / [`Airplane::icao`].
    pub equipment: Vec<String>,
    pub distance_km: Option<f64>,
}

// ---------------------------------------------------------------------------
// FlightDataset – the four joined tables
// ---------------------------------------------------------------------------

/// The loaded reference tables with pre-computed lookup indices.
///
/// Built once and never mutated afterwards; every query borrows it.
#[derive(Debug, Clone, Default)]
pub struct FlightDataset {
    pub airlines: Vec<Airline>,
    pub airplanes: Vec<Airplane>,
    pub airports: Vec<Airport>,
    pub routes: Vec<Route>,
    /// Non-empty country labels from airports and airlines.
    countries: BTreeSet<String>,
    /// Airport code (IATA and ICAO) → index into `airports`.
    airport_index: HashMap<String, usize>,
    /// Equipment code (IATA and ICAO) → index into `airplanes`.
    equipment_index: HashMap<String, usize>,
}

impl FlightDataset {
    /// Build lookup indices from the loaded tables.
    pub fn new(
        airlines: Vec<Airline>,
        airplanes: Vec<Airplane>,
        airports: Vec<Airport>,
        routes: Vec<Route>,
    ) -> Self {
        let countries = airports
            .iter()
            .map(|a| a.country.as_str())
            .chain(airlines.iter().map(|a| a.country.as_str()))
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        // IATA codes go in first so they win over a clashing ICAO code.
        let mut airport_index = HashMap::new();
        for (i, a) in airports.iter().enumerate() {
            if let Some(code) = &a.iata {
                airport_index.entry(code.clone()).or_insert(i);
            }
        }
        for (i, a) in airports.iter().enumerate() {
            if let Some(code) = &a.icao {
                airport_index.entry(code.clone()).or_insert(i);
            }
        }

        let mut equipment_index = HashMap::new();
        for (i, p) in airplanes.iter().enumerate() {
            if let Some(code) = &p.iata {
                equipment_index.entry(code.clone()).or_insert(i);
            }
        }
        for (i, p) in airplanes.iter().enumerate() {
            if let Some(code) = &p.icao {
                equipment_index.entry(code.clone()).or_insert(i);
            }
        }

        FlightDataset {
            airlines,
            airplanes,
            airports,
            routes,
            countries,
            airport_index,
            equipment_index,
        }
    }

    /// Resolve an airport code (IATA first, then ICAO).
    pub fn airport(&self, code: &str) -> Option<&Airport> {
        self.airport_index.get(code).map(|&i| &self.airports[i])
    }

    /// Resolve a route equipment code to its airplane model.
    pub fn airplane_for_equipment(&self, code: &str) -> Option<&Airplane> {
        self.equipment_index.get(code).map(|&i| &self.airplanes[i])
    }

    /// All known country labels, sorted.
    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    pub fn is_known_country(&self, country: &str) -> bool {
        self.countries.contains(country)
    }

    /// Fill in great-circle distances for routes that have none and whose
    /// endpoints both resolve. Returns how many routes were filled.
    pub fn fill_missing_distances(&mut self) -> usize {
        let mut filled = 0;
        for i in 0..self.routes.len() {
            if self.routes[i].distance_km.is_some() {
                continue;
            }
            let route = &self.routes[i];
            let distance = match (self.airport(&route.source), self.airport(&route.destination)) {
                (Some(from), Some(to)) => Some(super::geo::haversine_km(
                    from.latitude,
                    from.longitude,
                    to.latitude,
                    to.longitude,
                )),
                _ => None,
            };
            if distance.is_some() {
                self.routes[i].distance_km = distance;
                filled += 1;
            }
        }
        filled
    }
}
