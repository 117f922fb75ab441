use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{info, warn};
use serde_json::Value as JsonValue;

use super::geo::MAX_ROUTE_KM;
use super::model::{Airline, Airplane, Airport, FlightDataset, Route};

/// One source row: column name → raw cell text.
type RawRow = BTreeMap<String, String>;

/// A table file read as text. Records that could not be read at all are
/// counted in `unreadable` and left out of `rows`.
#[derive(Debug, Default)]
struct RawTable {
    columns: Vec<String>,
    rows: Vec<RawRow>,
    unreadable: usize,
}

/// Null marker used by the OpenFlights dumps.
const NULL_MARKER: &str = "\\N";

// ---------------------------------------------------------------------------
// Table descriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Airlines,
    Airplanes,
    Airports,
    Routes,
}

impl Table {
    /// File stem inside the data directory.
    pub fn stem(self) -> &'static str {
        match self {
            Table::Airlines => "airlines",
            Table::Airplanes => "airplanes",
            Table::Airports => "airports",
            Table::Routes => "routes",
        }
    }

    fn required_columns(self) -> &'static [&'static str] {
        match self {
            Table::Airlines => &["id", "name"],
            Table::Airplanes => &["name"],
            Table::Airports => &["name", "country", "latitude", "longitude"],
            Table::Routes => &["source", "destination"],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

/// Accepted / rejected row counts for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableReport {
    pub loaded: usize,
    pub rejected: usize,
}

/// What happened while loading a data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub airlines: TableReport,
    pub airplanes: TableReport,
    pub airports: TableReport,
    pub routes: TableReport,
    /// Routes whose distance was computed from airport coordinates.
    pub distances_computed: usize,
}

impl LoadReport {
    pub fn rejected(&self) -> usize {
        self.airlines.rejected + self.airplanes.rejected + self.airports.rejected + self.routes.rejected
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the four reference tables from `dir`.
///
/// Each table is `<stem>.csv` or `<stem>.json`. Malformed rows are logged
/// and skipped; a missing file or missing required column fails the load.
pub fn load_dir(dir: &Path) -> Result<(FlightDataset, LoadReport)> {
    let mut report = LoadReport::default();

    let airlines = parse_table(dir, Table::Airlines, &mut report.airlines, parse_airline)?;
    let airplanes = parse_table(dir, Table::Airplanes, &mut report.airplanes, parse_airplane)?;
    let airports = parse_table(dir, Table::Airports, &mut report.airports, parse_airport)?;
    let routes = parse_table(dir, Table::Routes, &mut report.routes, parse_route)?;

    let mut dataset = FlightDataset::new(airlines, airplanes, airports, routes);
    report.distances_computed = dataset.fill_missing_distances();

    info!(
        "Loaded {} airlines, {} airplanes, {} airports, {} routes from {} \
         ({} rows rejected, {} distances computed)",
        report.airlines.loaded,
        report.airplanes.loaded,
        report.airports.loaded,
        report.routes.loaded,
        dir.display(),
        report.rejected(),
        report.distances_computed,
    );
    Ok((dataset, report))
}

/// Locate the file backing `table`, preferring CSV.
pub fn table_path(dir: &Path, table: Table) -> Result<PathBuf> {
    ["csv", "json"]
        .iter()
        .map(|ext| dir.join(format!("{}.{ext}", table.stem())))
        .find(|p| p.is_file())
        .with_context(|| format!("no {table}.csv or {table}.json in {}", dir.display()))
}

fn parse_table<T>(
    dir: &Path,
    table: Table,
    report: &mut TableReport,
    parse: fn(&RawRow) -> Result<T>,
) -> Result<Vec<T>> {
    let path = table_path(dir, table)?;
    let raw = load_file(&path).with_context(|| format!("loading {table} table"))?;

    for required in table.required_columns() {
        if !raw.columns.iter().any(|c| c == required) {
            bail!("{}: missing required column '{required}'", path.display());
        }
    }

    report.rejected = raw.unreadable;
    let mut records = Vec::with_capacity(raw.rows.len());
    for (row_no, row) in raw.rows.iter().enumerate() {
        match parse(row) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("{table} row {row_no} rejected: {e:#}");
                report.rejected += 1;
            }
        }
    }
    report.loaded = records.len();
    Ok(records)
}

/// Read a table file into raw rows. Dispatch by extension.
fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Header row with column names; cells are kept as text.
fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();

    let mut table = RawTable::default();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("{}: CSV row {row_no} unreadable: {e}", path.display());
                table.unreadable += 1;
                continue;
            }
        };
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, value)| !is_null(value))
            .map(|(col, value)| (col.clone(), value.to_string()))
            .collect();
        table.rows.push(row);
    }
    table.columns = headers;
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON:
///
/// ```json
/// [
///   { "id": 330, "name": "Air Canada", "country": "Canada", "active": "Y" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut table = RawTable {
        rows: Vec::with_capacity(records.len()),
        ..Default::default()
    };

    for (i, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            warn!("{}: row {i} is not a JSON object", path.display());
            table.unreadable += 1;
            continue;
        };

        let mut row = RawRow::new();
        for (key, val) in obj {
            let key = key.to_ascii_lowercase();
            if !table.columns.contains(&key) {
                table.columns.push(key.clone());
            }
            if let Some(text) = json_to_cell(val) {
                row.insert(key, text);
            }
        }
        table.rows.push(row);
    }
    Ok(table)
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    let text = match val {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => if *b { "Y" } else { "N" }.to_string(),
        JsonValue::Null => return None,
        other => other.to_string(),
    };
    (!is_null(&text)).then_some(text)
}

// ---------------------------------------------------------------------------
// Row validation
// ---------------------------------------------------------------------------

fn is_null(s: &str) -> bool {
    s.is_empty() || s == NULL_MARKER
}

fn cell<'a>(row: &'a RawRow, col: &str) -> Option<&'a str> {
    row.get(col).map(String::as_str)
}

fn required<'a>(row: &'a RawRow, col: &str) -> Result<&'a str> {
    cell(row, col).with_context(|| format!("'{col}' is empty"))
}

fn parse_number<T: std::str::FromStr>(row: &RawRow, col: &str) -> Result<Option<T>> {
    match cell(row, col) {
        None => Ok(None),
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("'{col}' = '{s}' is not a number")),
    }
}

fn parse_coordinate(row: &RawRow, col: &str, limit: f64) -> Result<f64> {
    let value: f64 = parse_number(row, col)?.with_context(|| format!("'{col}' is empty"))?;
    if !value.is_finite() || value.abs() > limit {
        bail!("'{col}' = {value} is out of range");
    }
    Ok(value)
}

fn parse_airline(row: &RawRow) -> Result<Airline> {
    let id = parse_number(row, "id")?.context("'id' is empty")?;
    let active = matches!(
        cell(row, "active").map(str::to_ascii_lowercase).as_deref(),
        Some("y" | "yes" | "true" | "1")
    );
    Ok(Airline {
        id,
        name: required(row, "name")?.to_string(),
        country: cell(row, "country").unwrap_or_default().to_string(),
        active,
    })
}

fn parse_airplane(row: &RawRow) -> Result<Airplane> {
    let name = required(row, "name")?;
    let manufacturer = cell(row, "manufacturer")
        .or_else(|| name.split_whitespace().next())
        .unwrap_or_default();
    Ok(Airplane {
        name: name.to_string(),
        iata: cell(row, "iata").map(str::to_string),
        icao: cell(row, "icao").map(str::to_string),
        manufacturer: manufacturer.to_string(),
    })
}

fn parse_airport(row: &RawRow) -> Result<Airport> {
    let iata = cell(row, "iata").map(str::to_string);
    let icao = cell(row, "icao").map(str::to_string);
    if iata.is_none() && icao.is_none() {
        bail!("airport has neither IATA nor ICAO code");
    }
    Ok(Airport {
        id: parse_number(row, "id")?,
        name: required(row, "name")?.to_string(),
        city: cell(row, "city").unwrap_or_default().to_string(),
        country: required(row, "country")?.to_string(),
        iata,
        icao,
        latitude: parse_coordinate(row, "latitude", 90.0)?,
        longitude: parse_coordinate(row, "longitude", 180.0)?,
    })
}

fn parse_route(row: &RawRow) -> Result<Route> {
    let distance_km: Option<f64> = parse_number(row, "distance_km")?;
    if let Some(d) = distance_km {
        if !d.is_finite() || !(0.0..=MAX_ROUTE_KM).contains(&d) {
            bail!("'distance_km' = {d} is not a valid distance");
        }
    }
    Ok(Route {
        airline: cell(row, "airline").unwrap_or_default().to_string(),
        airline_id: parse_number(row, "airline_id")?,
        source: required(row, "source")?.to_string(),
        destination: required(row, "destination")?.to_string(),
        equipment: cell(row, "equipment")
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect(),
        distance_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_tables(dir: &Path, routes_csv: &str) {
        fs::write(
            dir.join("airlines.csv"),
            "id,name,country,active\n330,Air Canada,Canada,Y\n3320,Lufthansa,Germany,N\nxx,Broken Air,Nowhere,Y\n",
        )
        .unwrap();
        fs::write(
            dir.join("airplanes.csv"),
            "name,iata,icao\nAirbus A320,320,A320\nBoeing 737-800,738,B738\n,\\N,ZZZZ\n",
        )
        .unwrap();
        fs::write(
            dir.join("airports.csv"),
            "id,name,city,country,iata,icao,latitude,longitude\n\
             193,Toronto Pearson,Toronto,Canada,YYZ,CYYZ,43.6772,-79.6306\n\
             146,Montreal Trudeau,Montreal,Canada,YUL,CYUL,45.4706,-73.7408\n\
             3797,John F Kennedy,New York,United States,JFK,KJFK,40.6398,-73.7789\n\
             9999,Nowhere Field,Nowhere,Canada,\\N,\\N,10,10\n\
             9998,Off The Map,Nowhere,Canada,OFF,\\N,95,10\n",
        )
        .unwrap();
        fs::write(dir.join("routes.csv"), routes_csv).unwrap();
    }

    #[test]
    fn test_load_csv_tables() {
        let tmp = tempfile::tempdir().unwrap();
        write_tables(
            tmp.path(),
            "airline,airline_id,source,destination,equipment,distance_km\n\
             AC,330,YYZ,YUL,320 738,\n\
             AC,330,CYYZ,KJFK,320,560\n\
             AC,\\N,YYZ,ZZZ,738,\n\
             AC,330,,YUL,320,\n\
             AC,330,YUL,YYZ,320,-5\n",
        );

        let (ds, report) = load_dir(tmp.path()).unwrap();

        assert_eq!(report.airlines, TableReport { loaded: 2, rejected: 1 });
        assert_eq!(report.airplanes, TableReport { loaded: 2, rejected: 1 });
        assert_eq!(report.airports, TableReport { loaded: 3, rejected: 2 });
        assert_eq!(report.routes, TableReport { loaded: 3, rejected: 2 });
        assert_eq!(report.distances_computed, 1);

        assert!(!ds.airlines[1].active);
        assert_eq!(ds.airplanes[0].manufacturer, "Airbus");
        assert_eq!(ds.routes[0].equipment, ["320", "738"]);
        let computed = ds.routes[0].distance_km.unwrap();
        assert!((computed - 505.0).abs() < 10.0, "got {computed}");
        // Explicit distance kept, ICAO endpoints resolve.
        assert_eq!(ds.routes[1].distance_km, Some(560.0));
        assert_eq!(ds.airport("KJFK").map(|a| a.code()), Some("JFK"));
        // Unresolvable destination leaves the distance missing.
        assert_eq!(ds.routes[2].airline_id, None);
        assert_eq!(ds.routes[2].distance_km, None);
    }

    #[test]
    fn test_load_json_table() {
        let tmp = tempfile::tempdir().unwrap();
        write_tables(
            tmp.path(),
            "airline,airline_id,source,destination,equipment,distance_km\n",
        );
        fs::remove_file(tmp.path().join("airlines.csv")).unwrap();
        fs::write(
            tmp.path().join("airlines.json"),
            r#"[{"id": 330, "name": "Air Canada", "country": "Canada", "active": true},
                {"id": 5, "name": "Quiet Air", "country": null, "active": "N"}]"#,
        )
        .unwrap();

        let (ds, report) = load_dir(tmp.path()).unwrap();
        assert_eq!(report.airlines.loaded, 2);
        assert!(ds.airlines[0].active);
        assert_eq!(ds.airlines[1].country, "");
        assert!(ds.routes.is_empty());
    }

    #[test]
    fn test_unreadable_records_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_tables(
            tmp.path(),
            "airline,airline_id,source,destination,equipment,distance_km\n\
             AC,330,YYZ,YUL,320,1e21\n\
             AC,330,YYZ,JFK,320,20041\n\
             AC,330,YUL,YYZ,320,20000\n",
        );
        let mut airports = b"id,name,city,country,iata,icao,latitude,longitude\n\
            193,Toronto Pearson,Toronto,Canada,YYZ,CYYZ,43.6772,-79.6306\n"
            .to_vec();
        airports.extend_from_slice(b"146,Montr\xff\xfeal,Montreal,Canada,YUL,CYUL,45.47,-73.74\n");
        fs::write(tmp.path().join("airports.csv"), airports).unwrap();
        fs::remove_file(tmp.path().join("airlines.csv")).unwrap();
        fs::write(
            tmp.path().join("airlines.json"),
            r#"[{"id": 330, "name": "Air Canada"}, ["not", "a", "row"], 17]"#,
        )
        .unwrap();

        let (ds, report) = load_dir(tmp.path()).unwrap();
        assert_eq!(report.airports, TableReport { loaded: 1, rejected: 1 });
        assert_eq!(report.airlines, TableReport { loaded: 1, rejected: 2 });
        // Longer than any great-circle route.
        assert_eq!(report.routes, TableReport { loaded: 1, rejected: 2 });
        assert_eq!(ds.routes[0].distance_km, Some(20000.0));
    }

    #[test]
    fn test_missing_table_or_column_fails() {
        let tmp = tempfile::tempdir().unwrap();
        write_tables(tmp.path(), "airline,source\nAC,YYZ\n");
        let err = load_dir(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("destination"), "{err:#}");

        fs::remove_file(tmp.path().join("routes.csv")).unwrap();
        let err = load_dir(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("routes.csv"), "{err:#}");
    }
}
