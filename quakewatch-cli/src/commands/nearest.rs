//! Nearest command - list the cities closest to a coordinate.

use std::path::PathBuf;

use quakewatch::geo::GeoPoint;

use super::common::{load_index, resolve_neighbors, CommandContext};
use crate::error::CliError;
use crate::render;

/// Arguments for the nearest command.
pub struct NearestArgs {
    pub lat: f64,
    pub lon: f64,
    pub neighbors: Option<usize>,
    pub cities: Option<PathBuf>,
}

/// Run the nearest command.
pub fn run(args: NearestArgs) -> Result<(), CliError> {
    let location = GeoPoint::validated(args.lat, args.lon)?;

    let context = CommandContext::load()?;
    let config = &context.config;
    let k = resolve_neighbors(args.neighbors, config);
    let cities_path = args.cities.unwrap_or_else(|| config.cities.path.clone());
    let index = load_index(&cities_path, &config.city_columns())?;

    let neighbors = index.query(location, k);

    println!();
    println!("Nearest cities to {}", location);
    println!();
    if neighbors.is_empty() {
        println!("  (none requested)");
    }
    for (rank, neighbor) in neighbors.iter().enumerate() {
        println!("{}", render::neighbor_line(rank + 1, neighbor));
    }

    Ok(())
}
