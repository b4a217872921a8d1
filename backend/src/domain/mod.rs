//! Carpool domain: users, rides and the ride-matching engine.
//!
//! Purpose: keep business rules free of transport and storage concerns.
//! Inbound adapters call the driving ports in [`ports`]; outbound adapters
//! implement the repository ports.
//!
//! Public surface:
//! - `Coordinate`, `distance_km`: geographic primitives.
//! - `Email`, `User`, `Vehicle`: registered participants.
//! - `Ride`, `RideId`, `RideStatus`: offered rides and their lifecycle.
//! - `RideMatcher`, `RideMatch`, `Candidate`, `MatchWindow`: matching.
//! - `UserService`, `RideService`: driving-port implementations.
//! - `Error`, `ErrorCode`: transport-agnostic failures.

pub mod error;
pub mod geo;
pub mod ports;
mod repository_errors;
pub mod ride;
pub mod ride_matching;
pub mod ride_service;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::geo::{Axis, Coordinate, CoordinateValidationError, EARTH_RADIUS_KM, distance_km};
pub use self::ride::{
    JoinRejection, NewRide, Ride, RideId, RideParts, RideStatus, RideValidationError,
    format_departure, parse_departure,
};
pub use self::ride_matching::{
    Candidate, MATCH_WINDOW_MINUTES, MatchWindow, NEARBY_RADIUS_KM, RideMatch, RideMatcher,
    rank_candidates,
};
pub use self::ride_service::RideService;
pub use self::trace_id::TraceId;
pub use self::user::{Email, User, UserDraft, UserValidationError, Vehicle};
pub use self::user_service::UserService;
