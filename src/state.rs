use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use crate::data::model::FlightDataset;
use crate::data::store::DatasetStore;
use crate::describe::{ApiKey, Subject, TextGenerator};
use crate::error::DescribeError;

/// Countries pre-selected in the airplane model ranking, when present.
pub const DEFAULT_TOP_COUNTRIES: [&str; 4] = ["Canada", "United States", "Germany", "Portugal"];
pub const TOP_N_RANGE: std::ops::RangeInclusive<usize> = 5..=20;
pub const THRESHOLD_RANGE_KM: std::ops::RangeInclusive<f64> = 100.0..=2000.0;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    ApiSetup,
    Overview,
    AirportsMap,
    AirportFlights,
    TopModels,
    Distances,
    CountryEmissions,
    AircraftExplorer,
    AirportExplorer,
}

impl Tab {
    pub const ALL: [Tab; 9] = [
        Tab::ApiSetup,
        Tab::Overview,
        Tab::AirportsMap,
        Tab::AirportFlights,
        Tab::TopModels,
        Tab::Distances,
        Tab::CountryEmissions,
        Tab::AircraftExplorer,
        Tab::AirportExplorer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::ApiSetup => "🔑 API Setup",
            Tab::Overview => "Overview",
            Tab::AirportsMap => "Airports Map",
            Tab::AirportFlights => "Airport Flights",
            Tab::TopModels => "Top Airplane Models",
            Tab::Distances => "Flight Distance Analysis",
            Tab::CountryEmissions => "Country Flights & CO₂",
            Tab::AircraftExplorer => "🔒 Aircraft Explorer",
            Tab::AirportExplorer => "🔒 Airport Explorer",
        }
    }

    /// Tabs that need an API key.
    pub fn is_locked(self) -> bool {
        matches!(self, Tab::AircraftExplorer | Tab::AirportExplorer)
    }
}

// ---------------------------------------------------------------------------
// Widget selections
// ---------------------------------------------------------------------------

/// Values of the per-tab selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Selections {
    pub map_country: Option<String>,
    pub flights_code: Option<String>,
    pub flights_internal: bool,
    pub top_n: usize,
    pub top_countries: BTreeSet<String>,
    pub co2_country: Option<String>,
    pub co2_internal: bool,
    pub co2_threshold_km: f64,
    pub aircraft: Option<String>,
    pub airport: Option<String>,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            map_country: None,
            flights_code: None,
            flights_internal: false,
            top_n: 10,
            top_countries: BTreeSet::new(),
            co2_country: None,
            co2_internal: false,
            co2_threshold_km: 1000.0,
            aircraft: None,
            airport: None,
        }
    }
}

impl Selections {
    /// Initial selections for a freshly loaded dataset.
    pub fn for_dataset(dataset: &FlightDataset) -> Self {
        let first_country = dataset.countries().iter().next().cloned();
        Self {
            map_country: first_country.clone(),
            flights_code: dataset.airport_codes().first().map(|c| c.to_string()),
            top_countries: DEFAULT_TOP_COUNTRIES
                .iter()
                .filter(|c| dataset.is_known_country(c))
                .map(|c| c.to_string())
                .collect(),
            co2_country: first_country,
            aircraft: dataset.aircraft_models().first().map(|m| m.to_string()),
            airport: dataset.airport_names().into_iter().next(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Owns the one-time load of the current data directory.
    pub store: DatasetStore,

    /// Loaded dataset (None until loading succeeds).
    pub dataset: Option<Arc<FlightDataset>>,

    pub tab: Tab,
    pub selections: Selections,

    /// Text in the API key field.
    pub api_key_input: String,
    /// Session credential, never written to disk.
    pub api_key: Option<ApiKey>,

    /// None when the HTTP client could not be built.
    pub generator: Option<Box<dyn TextGenerator>>,

    /// Last outcome per described subject; redraws reuse it.
    pub descriptions: BTreeMap<Subject, Result<String, DescribeError>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(data_dir: impl Into<PathBuf>, generator: Option<Box<dyn TextGenerator>>) -> Self {
        Self {
            store: DatasetStore::new(data_dir),
            dataset: None,
            tab: Tab::Overview,
            selections: Selections::default(),
            api_key_input: String::new(),
            api_key: None,
            generator,
            descriptions: BTreeMap::new(),
            status_message: None,
        }
    }

    /// Load (or reuse) the dataset of the current store.
    pub fn load_dataset(&mut self) {
        match self.store.get_or_load() {
            Ok(dataset) => {
                if !self.dataset.as_ref().is_some_and(|d| Arc::ptr_eq(d, &dataset)) {
                    self.set_dataset(dataset);
                }
                self.status_message = self.store.report().and_then(|r| {
                    (r.rejected() > 0).then(|| format!("{} malformed rows skipped", r.rejected()))
                });
            }
            Err(e) => {
                log::error!("Failed to load flight data: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Switch to another data directory and load it.
    pub fn open_data_dir(&mut self, dir: PathBuf) {
        self.store = DatasetStore::new(dir);
        self.load_dataset();
    }

    /// Re-read the current data directory from disk.
    pub fn reload(&mut self) {
        let dir = self.store.data_dir().to_path_buf();
        self.open_data_dir(dir);
    }

    /// Ingest a newly loaded dataset and reset the selectors.
    pub fn set_dataset(&mut self, dataset: Arc<FlightDataset>) {
        self.selections = Selections::for_dataset(&dataset);
        self.descriptions.clear();
        self.dataset = Some(dataset);
    }

    /// Store the typed key for this session. Returns whether one is set.
    pub fn submit_api_key(&mut self) -> bool {
        let key = ApiKey::new(&self.api_key_input);
        if key.is_some() && key != self.api_key {
            self.descriptions.clear();
            self.api_key = key;
        }
        self.api_key.is_some()
    }

    /// Ask the generator about `subject` and remember the outcome.
    pub fn describe(&mut self, subject: Subject) {
        let (Some(dataset), Some(key)) = (&self.dataset, &self.api_key) else {
            return;
        };
        let outcome = match &self.generator {
            None => Err(DescribeError::Collaborator(
                "HTTP client is unavailable".to_string(),
            )),
            Some(generator) => match &subject {
                Subject::Aircraft(model) => dataset.describe_aircraft(generator.as_ref(), key, model),
                Subject::Airport(name) => dataset.describe_airport(generator.as_ref(), key, name),
            },
        };
        if let Err(e) = &outcome {
            log::error!("Describing {subject} failed: {e}");
        }
        self.descriptions.insert(subject, outcome);
    }
}

/// User-facing text for a failed description; credential and quota
/// problems are worded differently.
pub fn describe_error_message(error: &DescribeError) -> String {
    match error {
        DescribeError::RateLimited => {
            "❌ You've hit your OpenAI rate limit or quota. Please check your usage.".to_string()
        }
        DescribeError::Unauthenticated => {
            "❌ Authentication error. Please check your OpenAI API key.".to_string()
        }
        DescribeError::Query(e) => e.to_string(),
        DescribeError::Collaborator(msg) => format!("❌ Could not fetch a description: {msg}"),
    }
}
