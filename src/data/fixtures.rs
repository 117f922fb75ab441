//! Small hand-built dataset shared by the unit tests.

use super::model::{Airline, Airplane, Airport, FlightDataset, Route};

pub fn airport(code: &str, city: &str, country: &str, latitude: f64, longitude: f64) -> Airport {
    Airport {
        id: None,
        name: format!("{city} Airport"),
        city: city.to_string(),
        country: country.to_string(),
        iata: Some(code.to_string()),
        icao: None,
        latitude,
        longitude,
    }
}

pub fn airplane(name: &str, iata: &str) -> Airplane {
    Airplane {
        name: name.to_string(),
        iata: Some(iata.to_string()),
        icao: None,
        manufacturer: name.chars().take(1).collect(),
    }
}

pub fn route(source: &str, destination: &str, equipment: &[&str], distance_km: Option<f64>) -> Route {
    Route {
        airline: "AC".to_string(),
        airline_id: Some(330),
        source: source.to_string(),
        destination: destination.to_string(),
        equipment: equipment.iter().map(|e| e.to_string()).collect(),
        distance_km,
    }
}

/// Canadian routes use A320 ×5, B737 ×5, A321 ×2.
/// Across all routes: A320 ×6, B737 ×5, A321 ×4, B777 ×1.
/// Ten routes, one without a distance.
pub fn sample_dataset() -> FlightDataset {
    let airlines = vec![
        Airline {
            id: 330,
            name: "Air Canada".into(),
            country: "Canada".into(),
            active: true,
        },
        Airline {
            id: 3320,
            name: "Lufthansa".into(),
            country: "Germany".into(),
            active: true,
        },
        Airline {
            id: 9001,
            name: "Northern Lights Air".into(),
            country: "Iceland".into(),
            active: false,
        },
    ];
    let airplanes = vec![
        airplane("A320", "320"),
        airplane("B737", "737"),
        airplane("A321", "321"),
        airplane("B777", "777"),
    ];
    let airports = vec![
        airport("YYZ", "Toronto", "Canada", 43.6772, -79.6306),
        airport("YUL", "Montreal", "Canada", 45.4706, -73.7408),
        airport("YVR", "Vancouver", "Canada", 49.1939, -123.1840),
        airport("JFK", "New York", "United States", 40.6398, -73.7789),
        airport("LAX", "Los Angeles", "United States", 33.9425, -118.4080),
        airport("FRA", "Frankfurt", "Germany", 50.0333, 8.5706),
        airport("LIS", "Lisbon", "Portugal", 38.7813, -9.1359),
    ];
    let routes = vec![
        route("YYZ", "YUL", &["320"], Some(500.0)),
        route("YYZ", "JFK", &["320", "737"], Some(560.0)),
        route("YUL", "YYZ", &["320", "737"], Some(500.0)),
        route("YVR", "YYZ", &["320", "737", "321"], Some(3350.0)),
        route("YYZ", "YVR", &["320", "737", "321"], Some(3350.0)),
        route("YVR", "LAX", &["737"], Some(1750.0)),
        route("JFK", "LAX", &["777", "320"], Some(3980.0)),
        route("FRA", "LIS", &["321"], Some(1890.0)),
        route("LIS", "FRA", &["321"], None),
        route("JFK", "XXX", &["999"], Some(100.0)),
    ];
    FlightDataset::new(airlines, airplanes, airports, routes)
}
