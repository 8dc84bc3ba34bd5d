//! Loading the reference city list from delimited text.
//!
//! The list is a CSV file with a header row, optionally gzip-compressed
//! (detected by the gzip magic bytes, not the file extension). Columns are
//! located by header name; the defaults match the `worldcities` data set.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::{debug, info};

use super::types::ReferencePoint;
use crate::geo::{GeoError, GeoPoint};

/// Gzip stream magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors that can occur while loading a city list.
#[derive(Debug, Error)]
pub enum CitiesError {
    /// The file could not be opened or read.
    #[error("I/O error reading city list: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid CSV.
    #[error("Malformed city list: {0}")]
    Csv(#[from] csv::Error),

    /// An expected header column was not found.
    #[error("City list has no '{0}' column")]
    MissingColumn(String),

    /// A latitude or longitude is not a number or lies outside its valid range.
    #[error("Invalid {field} '{value}' on line {line}")]
    InvalidCoordinate {
        field: &'static str,
        value: String,
        line: u64,
    },

    /// The file contained a header but no records.
    #[error("City list contains no entries")]
    Empty,
}

/// Header names of the columns the loader reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityColumns {
    /// Column holding the city label.
    pub name: String,
    /// Column holding latitude in degrees.
    pub latitude: String,
    /// Column holding longitude in degrees.
    pub longitude: String,
}

impl Default for CityColumns {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

/// Loads a city list from `path` using the default column names.
pub fn load_cities(path: &Path) -> Result<Vec<ReferencePoint>, CitiesError> {
    load_cities_with_columns(path, &CityColumns::default())
}

/// Loads a city list from `path`, reading the given columns.
pub fn load_cities_with_columns(
    path: &Path,
    columns: &CityColumns,
) -> Result<Vec<ReferencePoint>, CitiesError> {
    let file = File::open(path)?;
    let cities = read_cities(file, columns)?;
    info!(path = %path.display(), count = cities.len(), "Loaded city list");
    Ok(cities)
}

/// Reads a city list from any byte source, decompressing gzip input.
pub fn read_cities<R: Read>(
    source: R,
    columns: &CityColumns,
) -> Result<Vec<ReferencePoint>, CitiesError> {
    let mut buffered = BufReader::new(source);
    let is_gzip = buffered.fill_buf()?.starts_with(&GZIP_MAGIC);
    debug!(is_gzip, "Reading city list");

    if is_gzip {
        parse_csv(GzDecoder::new(buffered), columns)
    } else {
        parse_csv(buffered, columns)
    }
}

fn parse_csv<R: Read>(
    reader: R,
    columns: &CityColumns,
) -> Result<Vec<ReferencePoint>, CitiesError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| CitiesError::MissingColumn(name.to_string()))
    };
    let name_col = column(&columns.name)?;
    let lat_col = column(&columns.latitude)?;
    let lon_col = column(&columns.longitude)?;

    let mut cities = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let field = |idx: usize| record.get(idx).unwrap_or_default().trim();
        let coordinate = |idx: usize, field_name: &'static str| {
            field(idx)
                .parse::<f64>()
                .map_err(|_| CitiesError::InvalidCoordinate {
                    field: field_name,
                    value: field(idx).to_string(),
                    line,
                })
        };

        let latitude = coordinate(lat_col, "latitude")?;
        let longitude = coordinate(lon_col, "longitude")?;

        // Numbers that parse may still be NaN, infinite or out of range
        let location = GeoPoint::validated(latitude, longitude).map_err(|e| {
            let (field_name, idx) = match e {
                GeoError::InvalidLatitude(_) => ("latitude", lat_col),
                GeoError::InvalidLongitude(_) => ("longitude", lon_col),
            };
            CitiesError::InvalidCoordinate {
                field: field_name,
                value: field(idx).to_string(),
                line,
            }
        })?;

        cities.push(ReferencePoint {
            label: field(name_col).to_string(),
            location,
        });
    }

    if cities.is_empty() {
        return Err(CitiesError::Empty);
    }
    Ok(cities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const SAMPLE: &str = "\
city_ascii,country,language script,name,latitude,longitude
Tokyo,Japan,latin,Tokyo,35.6895,139.6917
Lima,Peru,latin,Lima,-12.0464,-77.0428
";

    #[test]
    fn test_reads_plain_csv() {
        let cities = read_cities(SAMPLE.as_bytes(), &CityColumns::default()).unwrap();

        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].label, "Tokyo");
        assert_eq!(cities[1].location.latitude, -12.0464);
        assert_eq!(cities[1].location.longitude, -77.0428);
    }

    #[test]
    fn test_reads_gzip_csv() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let cities = read_cities(compressed.as_slice(), &CityColumns::default()).unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].label, "Tokyo");
    }

    #[test]
    fn test_custom_columns() {
        let data = "city,lat,lng\nOslo,59.9139,10.7522\n";
        let columns = CityColumns {
            name: "city".to_string(),
            latitude: "lat".to_string(),
            longitude: "lng".to_string(),
        };

        let cities = read_cities(data.as_bytes(), &columns).unwrap();
        assert_eq!(cities, vec![ReferencePoint::new("Oslo", 59.9139, 10.7522)]);
    }

    #[test]
    fn test_missing_column() {
        let data = "name,lat,longitude\nOslo,59.9,10.7\n";
        let err = read_cities(data.as_bytes(), &CityColumns::default()).unwrap_err();
        assert!(matches!(err, CitiesError::MissingColumn(col) if col == "latitude"));
    }

    #[test]
    fn test_invalid_coordinate_reports_line() {
        let data = "name,latitude,longitude\nOslo,59.9,10.7\nNowhere,north,0\n";
        let err = read_cities(data.as_bytes(), &CityColumns::default()).unwrap_err();
        match err {
            CitiesError::InvalidCoordinate { field, value, line } => {
                assert_eq!(field, "latitude");
                assert_eq!(value, "north");
                assert_eq!(line, 3);
            }
            other => panic!("Expected InvalidCoordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_coordinate_is_rejected() {
        let data = "name,latitude,longitude\nA,0,0\nB,nan,0\n";
        let err = read_cities(data.as_bytes(), &CityColumns::default()).unwrap_err();
        match err {
            CitiesError::InvalidCoordinate { field, value, line } => {
                assert_eq!(field, "latitude");
                assert_eq!(value, "nan");
                assert_eq!(line, 3);
            }
            other => panic!("Expected InvalidCoordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_coordinate_is_rejected() {
        let data = "name,latitude,longitude\nA,0,0\nC,45,400\n";
        let err = read_cities(data.as_bytes(), &CityColumns::default()).unwrap_err();
        assert!(matches!(
            err,
            CitiesError::InvalidCoordinate { field: "longitude", line: 3, .. }
        ));

        let data = "name,latitude,longitude\nC,95,400\n";
        let err = read_cities(data.as_bytes(), &CityColumns::default()).unwrap_err();
        assert!(matches!(
            err,
            CitiesError::InvalidCoordinate { field: "latitude", line: 2, .. }
        ));
    }

    #[test]
    fn test_infinite_longitude_is_rejected() {
        let data = "name,latitude,longitude\nA,10,inf\n";
        let err = read_cities(data.as_bytes(), &CityColumns::default()).unwrap_err();
        assert!(matches!(
            err,
            CitiesError::InvalidCoordinate { field: "longitude", .. }
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = read_cities("name,latitude,longitude\n".as_bytes(), &CityColumns::default())
            .unwrap_err();
        assert!(matches!(err, CitiesError::Empty));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let cities = load_cities(&path).unwrap();
        assert_eq!(cities.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_cities(Path::new("/nonexistent/cities.csv")).unwrap_err();
        assert!(matches!(err, CitiesError::Io(_)));
    }
}
