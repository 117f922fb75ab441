/// Data layer: reference tables, loading, and queries.
///
/// Architecture:
/// ```text
///  airlines / airplanes / airports / routes  (.csv | .json)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate rows → FlightDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetStore  │  load once, share Arc<FlightDataset>
///   └──────────────┘
///        │
///        ▼
///   ┌───────────────────┐
///   │ query / emissions  │  read-only questions → maps, rankings, histograms
///   └───────────────────┘
/// ```

pub mod emissions;
pub mod geo;
pub mod loader;
pub mod model;
pub mod query;
pub mod store;

#[cfg(test)]
pub mod fixtures;
