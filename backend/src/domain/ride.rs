//! Rides offered by drivers and their lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Coordinate, Email};

/// Validation errors raised while building rides or parsing ride input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RideValidationError {
    #[error("a ride must offer at least one seat")]
    NoSeats,
    #[error("destination must not be empty")]
    EmptyDestination,
    #[error("{value:?} is not an RFC 3339 timestamp")]
    InvalidDate { value: String },
    #[error("date {value:?} is too close to the representable range")]
    DateOutOfRange { value: String },
    #[error("{value:?} is not a ride status")]
    UnknownStatus { value: String },
    #[error("{value:?} is not a ride id")]
    InvalidRideId { value: String },
}

impl RideValidationError {
    /// Field name used in validation payloads.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NoSeats => "seatsOffered",
            Self::EmptyDestination => "destination",
            Self::InvalidDate { .. } | Self::DateOutOfRange { .. } => "date",
            Self::UnknownStatus { .. } => "status",
            Self::InvalidRideId { .. } => "rideId",
        }
    }
}

/// Parse a departure timestamp.
///
/// Accepts any RFC 3339 timestamp, including the
/// `YYYY-MM-DDTHH:MM:SS.ffffffZ` shape clients send, and normalises to UTC.
///
/// # Examples
/// ```
/// use carpool::domain::{format_departure, parse_departure};
///
/// let at = parse_departure("2024-03-01T08:30:00.000000Z").expect("timestamp");
/// assert_eq!(format_departure(at), "2024-03-01T08:30:00.000000Z");
/// assert!(parse_departure("tomorrow").is_err());
/// ```
pub fn parse_departure(raw: &str) -> Result<DateTime<Utc>, RideValidationError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| RideValidationError::InvalidDate {
            value: raw.to_owned(),
        })
}

/// Render a departure in the wire format, microsecond precision with `Z`.
pub fn format_departure(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Stable ride identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RideId(Uuid);

impl RideId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for RideId {
    type Err = RideValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| RideValidationError::InvalidRideId {
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a ride.
///
/// Legal transitions are `scheduled -> completed`, `scheduled -> cancelled`
/// and any state to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether riders may still join or find the ride.
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Scheduled)
    }

    /// Whether a ride in this state may move to `next`.
    ///
    /// # Examples
    /// ```
    /// use carpool::domain::RideStatus;
    ///
    /// assert!(RideStatus::Scheduled.can_transition_to(RideStatus::Completed));
    /// assert!(RideStatus::Completed.can_transition_to(RideStatus::Completed));
    /// assert!(!RideStatus::Completed.can_transition_to(RideStatus::Scheduled));
    /// ```
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next
            || matches!(
                (self, next),
                (Self::Scheduled, Self::Completed) | (Self::Scheduled, Self::Cancelled)
            )
    }
}

impl FromStr for RideStatus {
    type Err = RideValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(RideValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a rider could not be added to a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JoinRejection {
    #[error("ride is {0} and no longer accepts riders")]
    NotOpen(RideStatus),
    #[error("ride has no free seats")]
    Full,
}

/// Details a driver supplies when offering a ride.
#[derive(Debug, Clone)]
pub struct NewRide {
    pub driver_email: Email,
    pub origin: Coordinate,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub seats_offered: u32,
    pub vehicle_type: Option<String>,
}

/// Every stored field of a ride, used by adapters to rebuild one.
#[derive(Debug, Clone)]
pub struct RideParts {
    pub id: RideId,
    pub driver_email: Email,
    pub origin: Coordinate,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub seats_offered: u32,
    pub riders: Vec<Email>,
    pub status: RideStatus,
    pub vehicle_type: Option<String>,
}

/// A ride offered by a driver.
///
/// ## Invariants
/// - `origin` is the driver's home at the moment the ride was offered and is
///   not re-synced when the driver moves.
/// - `riders` only grows, and only while the ride is scheduled with free
///   seats.
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    id: RideId,
    driver_email: Email,
    origin: Coordinate,
    destination: String,
    departure: DateTime<Utc>,
    seats_offered: u32,
    riders: Vec<Email>,
    status: RideStatus,
    vehicle_type: Option<String>,
}

impl Ride {
    /// Schedule a new ride with a fresh identifier and no riders.
    pub fn schedule(new_ride: NewRide) -> Result<Self, RideValidationError> {
        let NewRide {
            driver_email,
            origin,
            destination,
            departure,
            seats_offered,
            vehicle_type,
        } = new_ride;
        if seats_offered == 0 {
            return Err(RideValidationError::NoSeats);
        }
        if destination.trim().is_empty() {
            return Err(RideValidationError::EmptyDestination);
        }
        Ok(Self {
            id: RideId::random(),
            driver_email,
            origin,
            destination,
            departure,
            seats_offered,
            riders: Vec::new(),
            status: RideStatus::Scheduled,
            vehicle_type,
        })
    }

    /// Rebuild a ride from stored parts.
    pub fn from_parts(parts: RideParts) -> Self {
        let RideParts {
            id,
            driver_email,
            origin,
            destination,
            departure,
            seats_offered,
            riders,
            status,
            vehicle_type,
        } = parts;
        Self {
            id,
            driver_email,
            origin,
            destination,
            departure,
            seats_offered,
            riders,
            status,
            vehicle_type,
        }
    }

    pub fn id(&self) -> RideId {
        self.id
    }

    pub fn driver_email(&self) -> &Email {
        &self.driver_email
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn departure(&self) -> DateTime<Utc> {
        self.departure
    }

    pub fn seats_offered(&self) -> u32 {
        self.seats_offered
    }

    pub fn riders(&self) -> &[Email] {
        &self.riders
    }

    pub fn status(&self) -> RideStatus {
        self.status
    }

    pub fn vehicle_type(&self) -> Option<&str> {
        self.vehicle_type.as_deref()
    }

    /// Seats still free; negative when stored data is overbooked.
    ///
    /// # Examples
    /// ```
    /// use carpool::domain::{Coordinate, Email, NewRide, Ride};
    ///
    /// let ride = Ride::schedule(NewRide {
    ///     driver_email: Email::new("driver@example.com").expect("email"),
    ///     origin: Coordinate::new(12.97, 77.59).expect("coordinate"),
    ///     destination: "Airport".into(),
    ///     departure: chrono::Utc::now(),
    ///     seats_offered: 3,
    ///     vehicle_type: None,
    /// })
    /// .expect("valid ride");
    /// assert_eq!(ride.available_seats(), 3);
    /// ```
    pub fn available_seats(&self) -> i64 {
        i64::from(self.seats_offered) - i64::try_from(self.riders.len()).unwrap_or(i64::MAX)
    }

    /// Whether `email` drives or rides in this ride.
    pub fn involves(&self, email: &Email) -> bool {
        &self.driver_email == email || self.riders.contains(email)
    }

    /// Append a rider when the ride is open and has a free seat.
    pub fn add_rider(&mut self, rider: Email) -> Result<(), JoinRejection> {
        if !self.status.is_open() {
            return Err(JoinRejection::NotOpen(self.status));
        }
        if self.available_seats() <= 0 {
            return Err(JoinRejection::Full);
        }
        self.riders.push(rider);
        Ok(())
    }

    /// Replace the status without checking the transition table.
    pub fn set_status(&mut self, status: RideStatus) {
        self.status = status;
    }
}
