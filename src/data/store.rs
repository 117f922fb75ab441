use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::Result;
use log::debug;

use super::loader::{LoadReport, load_dir};
use super::model::FlightDataset;

/// Owns the one-time load of a data directory.
///
/// The first successful [`DatasetStore::get_or_load`] reads the files; later
/// calls hand back the same `Arc` without touching the filesystem. A failed
/// load is not cached, so it can be retried.
#[derive(Debug)]
pub struct DatasetStore {
    data_dir: PathBuf,
    loaded: OnceLock<(Arc<FlightDataset>, LoadReport)>,
}

impl DatasetStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            loaded: OnceLock::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn get_or_load(&self) -> Result<Arc<FlightDataset>> {
        if let Some((dataset, _)) = self.loaded.get() {
            debug!("Reusing dataset loaded from {}", self.data_dir.display());
            return Ok(Arc::clone(dataset));
        }
        let (dataset, report) = load_dir(&self.data_dir)?;
        let (dataset, _) = self
            .loaded
            .get_or_init(|| (Arc::new(dataset), report));
        Ok(Arc::clone(dataset))
    }

    /// Report of the completed load, if any.
    pub fn report(&self) -> Option<&LoadReport> {
        self.loaded.get().map(|(_, report)| report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_minimal(dir: &Path) {
        fs::write(dir.join("airlines.csv"), "id,name,country,active\n1,Solo Air,Canada,Y\n").unwrap();
        fs::write(dir.join("airplanes.csv"), "name,iata,icao\nAirbus A320,320,A320\n").unwrap();
        fs::write(
            dir.join("airports.csv"),
            "id,name,city,country,iata,icao,latitude,longitude\n1,Pearson,Toronto,Canada,YYZ,CYYZ,43.68,-79.63\n",
        )
        .unwrap();
        fs::write(
            dir.join("routes.csv"),
            "airline,airline_id,source,destination,equipment,distance_km\n",
        )
        .unwrap();
    }

    #[test]
    fn test_second_load_reuses_instance_without_reading() {
        let tmp = tempfile::tempdir().unwrap();
        write_minimal(tmp.path());
        let store = DatasetStore::new(tmp.path());
        assert!(store.report().is_none());

        let first = store.get_or_load().unwrap();
        // Files are gone: a second read would fail.
        for table in ["airlines", "airplanes", "airports", "routes"] {
            fs::remove_file(tmp.path().join(format!("{table}.csv"))).unwrap();
        }
        let second = store.get_or_load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.report().map(|r| r.airports.loaded), Some(1));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(tmp.path());
        assert!(store.get_or_load().is_err());
        assert!(store.report().is_none());

        write_minimal(tmp.path());
        assert_eq!(store.get_or_load().unwrap().airports.len(), 1);
    }
}
