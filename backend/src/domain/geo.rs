//! Geographic coordinates and great-circle distance.
//!
//! Distances use the haversine formula on a spherical Earth. The formula is
//! accurate to well under 0.5% for the short hops a carpool covers, which is
//! all the ranking needs.

use thiserror::Error;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude/longitude pair in decimal degrees.
///
/// ## Invariants
/// - Both components are finite.
/// - Latitude lies within `[-90, 90]` and longitude within `[-180, 180]`.
///
/// # Examples
/// ```
/// use carpool::domain::Coordinate;
///
/// let bengaluru = Coordinate::new(12.9715987, 77.5945627).expect("valid");
/// assert_eq!(bengaluru.latitude(), 12.9715987);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Which half of a coordinate failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Field name used in validation payloads.
    pub const fn field(self) -> &'static str {
        match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}

/// Validation failures raised while building a [`Coordinate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateValidationError {
    #[error("{axis} must be a number, got {value:?}")]
    NotANumber { axis: Axis, value: String },
    #[error("{axis} must be finite")]
    NonFinite { axis: Axis },
    #[error("{axis} {value} is outside [{min}, {max}]")]
    OutOfRange {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl CoordinateValidationError {
    /// The offending axis.
    pub fn axis(&self) -> Axis {
        match self {
            Self::NotANumber { axis, .. }
            | Self::NonFinite { axis }
            | Self::OutOfRange { axis, .. } => *axis,
        }
    }
}

fn check_axis(axis: Axis, value: f64, bound: f64) -> Result<f64, CoordinateValidationError> {
    if !value.is_finite() {
        return Err(CoordinateValidationError::NonFinite { axis });
    }
    if !(-bound..=bound).contains(&value) {
        return Err(CoordinateValidationError::OutOfRange {
            axis,
            value,
            min: -bound,
            max: bound,
        });
    }
    Ok(value)
}

fn parse_axis(axis: Axis, raw: &str) -> Result<f64, CoordinateValidationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CoordinateValidationError::NotANumber {
            axis,
            value: raw.to_owned(),
        })
}

impl Coordinate {
    /// Validate and build a coordinate from degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateValidationError> {
        Ok(Self {
            latitude: check_axis(Axis::Latitude, latitude, 90.0)?,
            longitude: check_axis(Axis::Longitude, longitude, 180.0)?,
        })
    }

    /// Coerce numeric strings (as stored by older clients) into a coordinate.
    ///
    /// # Examples
    /// ```
    /// use carpool::domain::Coordinate;
    ///
    /// let parsed = Coordinate::parse(" 12.5", "77.25 ").expect("numeric strings");
    /// assert_eq!(parsed, Coordinate::new(12.5, 77.25).expect("valid"));
    /// assert!(Coordinate::parse("north", "77").is_err());
    /// ```
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, CoordinateValidationError> {
        Self::new(
            parse_axis(Axis::Latitude, latitude)?,
            parse_axis(Axis::Longitude, longitude)?,
        )
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Haversine great-circle distance between two coordinates in kilometres.
///
/// Returns exactly `0.0` for identical points and is symmetric in its
/// arguments.
///
/// # Examples
/// ```
/// use carpool::domain::{Coordinate, distance_km};
///
/// let a = Coordinate::new(12.9715987, 77.5945627).expect("valid");
/// let b = Coordinate::new(13.9715987, 79.5945627).expect("valid");
/// assert!((distance_km(a, b) - 243.17).abs() < 0.1);
/// assert_eq!(distance_km(a, a), 0.0);
/// ```
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = lat_b - lat_a;
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * central_angle
}
