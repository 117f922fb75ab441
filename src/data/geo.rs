use std::f64::consts::PI;

use super::emissions::HaulClass;
use super::model::Airport;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Half the equatorial circumference, rounded up. No route is longer.
pub const MAX_ROUTE_KM: f64 = 20_040.0;

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(origin_lat: f64, origin_lon: f64, dest_lat: f64, dest_lon: f64) -> f64 {
    let origin_lat_rad = origin_lat * PI / 180.0;
    let dest_lat_rad = dest_lat * PI / 180.0;
    let delta_lat = (dest_lat - origin_lat) * PI / 180.0;
    let delta_lon = (dest_lon - origin_lon) * PI / 180.0;

    let a = (delta_lat / 2.0).sin().powi(2)
        + origin_lat_rad.cos() * dest_lat_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

// ---------------------------------------------------------------------------
// FlightMap – what the map widget draws
// ---------------------------------------------------------------------------

/// A labelled point on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub code: String,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Airport> for MapMarker {
    fn from(airport: &Airport) -> Self {
        MapMarker {
            code: airport.code().to_string(),
            label: airport.display_name(),
            latitude: airport.latitude,
            longitude: airport.longitude,
        }
    }
}

/// A straight segment between two airports.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    pub source: String,
    pub destination: String,
    /// `[longitude, latitude]` of the source airport.
    pub from: [f64; 2],
    /// `[longitude, latitude]` of the destination airport.
    pub to: [f64; 2],
    pub distance_km: Option<f64>,
    /// Set only by the emissions query.
    pub haul: Option<HaulClass>,
}

impl RouteSegment {
    pub fn between(from: &Airport, to: &Airport, distance_km: Option<f64>) -> Self {
        RouteSegment {
            source: from.code().to_string(),
            destination: to.code().to_string(),
            from: [from.longitude, from.latitude],
            to: [to.longitude, to.latitude],
            distance_km,
            haul: None,
        }
    }
}

/// Map-renderable result of a query. The caller owns it; the dataset keeps
/// no reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightMap {
    pub markers: Vec<MapMarker>,
    pub segments: Vec<RouteSegment>,
}

impl FlightMap {
    pub fn from_airports<'a>(airports: impl IntoIterator<Item = &'a Airport>) -> Self {
        FlightMap {
            markers: airports.into_iter().map(MapMarker::from).collect(),
            segments: Vec::new(),
        }
    }

    /// Add a marker unless one with the same code is already present.
    pub fn add_marker(&mut self, airport: &Airport) {
        if !self.markers.iter().any(|m| m.code == airport.code()) {
            self.markers.push(MapMarker::from(airport));
        }
    }

    /// Destination codes of all segments.
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.destination.as_str())
    }

    /// `[[min_lon, min_lat], [max_lon, max_lat]]` over markers and segments.
    pub fn bounds(&self) -> Option<[[f64; 2]; 2]> {
        let points = self
            .markers
            .iter()
            .map(|m| [m.longitude, m.latitude])
            .chain(self.segments.iter().flat_map(|s| [s.from, s.to]));

        points.fold(None, |acc, [lon, lat]| {
            Some(match acc {
                None => [[lon, lat], [lon, lat]],
                Some([[x0, y0], [x1, y1]]) => [[x0.min(lon), y0.min(lat)], [x1.max(lon), y1.max(lat)]],
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // Toronto Pearson → Montréal Trudeau is roughly 505 km.
        let d = haversine_km(43.6772, -79.6306, 45.4706, -73.7408);
        assert!((d - 505.0).abs() < 10.0, "got {d}");
        assert_eq!(haversine_km(10.0, 20.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_bounds_cover_markers_and_segments() {
        let map = FlightMap {
            markers: vec![MapMarker {
                code: "AAA".into(),
                label: "A".into(),
                latitude: 10.0,
                longitude: -5.0,
            }],
            segments: vec![RouteSegment {
                source: "AAA".into(),
                destination: "BBB".into(),
                from: [-5.0, 10.0],
                to: [20.0, -3.0],
                distance_km: None,
                haul: None,
            }],
        };
        assert_eq!(map.bounds(), Some([[-5.0, -3.0], [20.0, 10.0]]));
        assert_eq!(FlightMap::default().bounds(), None);
    }
}
