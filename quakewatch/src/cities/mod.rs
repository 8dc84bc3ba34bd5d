//! Reference city set and nearest-neighbor lookup
//!
//! The reference set is loaded once at startup (see [`load_cities`]) and
//! wrapped in a [`NearestNeighborIndex`], which answers "k nearest cities to
//! this point" queries for every event in a feed snapshot.

mod index;
mod loader;
mod types;

pub use index::{IndexError, NearestNeighborIndex, DEFAULT_NEIGHBOR_COUNT};
pub use loader::{load_cities, load_cities_with_columns, read_cities, CitiesError, CityColumns};
pub use types::{NeighborResult, ReferencePoint};
