use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use clap::Parser;

/// Write a synthetic airlines/airplanes/airports/routes dataset.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output directory (created if missing).
    #[arg(long, default_value = "sample_data")]
    out: PathBuf,

    /// Airports generated per country.
    #[arg(long, default_value_t = 40)]
    airports_per_country: usize,

    /// Routes leaving each airport.
    #[arg(long, default_value_t = 12)]
    routes_per_airport: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Country name, centre latitude, centre longitude, spread in degrees.
const COUNTRIES: [(&str, f64, f64, f64); 8] = [
    ("Canada", 50.0, -95.0, 8.0),
    ("United States", 39.0, -98.0, 7.0),
    ("Germany", 51.0, 10.0, 1.5),
    ("Portugal", 39.5, -8.0, 1.0),
    ("Brazil", -12.0, -50.0, 7.0),
    ("Japan", 36.0, 138.0, 2.0),
    ("Australia", -27.0, 134.0, 7.0),
    ("Kenya", 0.5, 37.5, 1.5),
];

/// Name, IATA, ICAO.
const AIRPLANES: [(&str, &str, &str); 8] = [
    ("Airbus A320", "320", "A320"),
    ("Airbus A321", "321", "A321"),
    ("Airbus A330-300", "333", "A333"),
    ("Boeing 737-800", "738", "B738"),
    ("Boeing 777-300ER", "77W", "B77W"),
    ("Boeing 787-9", "789", "B789"),
    ("Embraer 190", "E90", "E190"),
    ("De Havilland Canada DHC-8-400", "DH4", "DH8D"),
];

/// Three-letter code from an index, "AAA", "AAB", …
fn code_for(index: usize) -> String {
    let letters = [index / 676 % 26, index / 26 % 26, index % 26];
    letters.iter().map(|&l| (b'A' + l as u8) as char).collect()
}

fn write_csv<const N: usize>(path: &Path, header: [&str; N], rows: &[[String; N]]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn check_args(args: &Args) -> Result<()> {
    ensure!(args.airports_per_country > 0, "--airports-per-country must be at least 1");
    // Three-letter codes run out at 26^3, and "ZZZ" marks unknown destinations.
    ensure!(
        COUNTRIES.len() * args.airports_per_country < 17_576,
        "--airports-per-country must be below {}",
        17_576 / COUNTRIES.len()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    check_args(&args)?;
    let mut rng = SimpleRng::new(args.seed);
    std::fs::create_dir_all(&args.out).context("creating output directory")?;

    // Airlines: one flag carrier per country plus an inactive one.
    let mut airlines = Vec::new();
    for (i, (country, ..)) in COUNTRIES.iter().enumerate() {
        airlines.push([
            (i + 1).to_string(),
            format!("{country} Airways"),
            country.to_string(),
            "Y".to_string(),
        ]);
    }
    airlines.push([
        "999".to_string(),
        "Defunct Charter".to_string(),
        "Iceland".to_string(),
        "N".to_string(),
    ]);

    let airplanes: Vec<[String; 3]> = AIRPLANES
        .iter()
        .map(|(name, iata, icao)| [name.to_string(), iata.to_string(), icao.to_string()])
        .collect();

    // Airports: scattered around each country centre.
    let mut airports = Vec::new();
    let mut airport_country = Vec::new();
    for (c, (country, lat, lon, spread)) in COUNTRIES.iter().enumerate() {
        for k in 0..args.airports_per_country {
            let index = airports.len();
            let code = code_for(index);
            let latitude = rng.gauss(*lat, *spread).clamp(-89.0, 89.0);
            let longitude = rng.gauss(*lon, *spread * 1.5).clamp(-179.0, 179.0);
            airports.push([
                (index + 1).to_string(),
                format!("{country} Regional {}", k + 1),
                format!("City {}", k + 1),
                country.to_string(),
                code.clone(),
                format!("X{code}"),
                format!("{latitude:.4}"),
                format!("{longitude:.4}"),
            ]);
            airport_country.push(c);
        }
    }

    // Routes: mostly domestic, some international. Distances are left blank
    // for the viewer to compute; one in twenty gets an unknown destination.
    let mut routes = Vec::new();
    for (src, &c) in airport_country.iter().enumerate() {
        for _ in 0..args.routes_per_airport {
            let dst = if rng.next_f64() < 0.7 {
                c * args.airports_per_country + rng.below(args.airports_per_country)
            } else {
                rng.below(airports.len())
            };
            if dst == src {
                continue;
            }
            let destination = if rng.next_f64() < 0.05 {
                "ZZZ".to_string()
            } else {
                airports[dst][4].clone()
            };
            let n_equipment = 1 + rng.below(2);
            let equipment: Vec<&str> = (0..n_equipment)
                .map(|_| AIRPLANES[rng.below(AIRPLANES.len())].1)
                .collect();
            routes.push([
                format!("C{}", c + 1),
                (c + 1).to_string(),
                airports[src][4].clone(),
                destination,
                equipment.join(" "),
                String::new(),
            ]);
        }
    }

    write_csv(&args.out.join("airlines.csv"), ["id", "name", "country", "active"], &airlines)?;
    write_csv(&args.out.join("airplanes.csv"), ["name", "iata", "icao"], &airplanes)?;
    write_csv(
        &args.out.join("airports.csv"),
        ["id", "name", "city", "country", "iata", "icao", "latitude", "longitude"],
        &airports,
    )?;
    write_csv(
        &args.out.join("routes.csv"),
        ["airline", "airline_id", "source", "destination", "equipment", "distance_km"],
        &routes,
    )?;

    println!(
        "Wrote {} airlines, {} airplanes, {} airports, {} routes to {}",
        airlines.len(),
        airplanes.len(),
        airports.len(),
        routes.len(),
        args.out.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_count_stays_within_code_space() {
        let args = |n: &str| Args::parse_from(["generate_sample", "--airports-per-country", n]);
        assert!(check_args(&args("2196")).is_ok());
        assert!(check_args(&args("2197")).is_err());
        assert!(check_args(&args("0")).is_err());
        assert_eq!(code_for(17_574), "ZZY");
    }
}
