//! Driving port for ride mutations: offering, joining and status changes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, Error, Ride, RideId, RideStatus};

/// A driver's request to offer a ride from their home location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRideRequest {
    pub driver_email: Email,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub seats_offered: u32,
    pub vehicle_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRideRequest {
    pub ride_id: RideId,
    pub rider_email: Email,
}

/// Result of a join attempt.
///
/// `modified_count` is 0 and `ride` is `None` when no ride has the
/// requested id.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinRideResponse {
    pub modified_count: u64,
    pub ride: Option<Ride>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRideStatusRequest {
    pub ride_id: RideId,
    pub status: RideStatus,
}

/// Result of a status change; `modified_count` is 0 for unknown rides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRideStatusResponse {
    pub modified_count: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideCommand: Send + Sync {
    /// Schedule a ride for a registered driver.
    async fn offer(&self, request: OfferRideRequest) -> Result<Ride, Error>;

    /// Claim a seat on a ride for a rider.
    async fn join(&self, request: JoinRideRequest) -> Result<JoinRideResponse, Error>;

    /// Move a ride through its lifecycle.
    async fn set_status(
        &self,
        request: UpdateRideStatusRequest,
    ) -> Result<UpdateRideStatusResponse, Error>;
}
