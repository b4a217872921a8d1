//! Driving port for ride lookups and rider matching.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, Error, Ride, RideMatch, RideStatus};

/// A ride seen from one participant's point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRide {
    pub ride: Ride,
    /// True when the participant rides in, rather than drives, the ride.
    pub is_rider: bool,
}

/// A registered rider looking for a ride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindRideRequest {
    pub rider_email: Email,
    pub destination: String,
    pub requested_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideQuery: Send + Sync {
    /// Rides with `status` that `email` drives or rides in.
    async fn rides_for_participant(
        &self,
        email: &Email,
        status: RideStatus,
    ) -> Result<Vec<ParticipantRide>, Error>;

    /// Best ride for the rider starting from their home location, plus
    /// nearby alternatives. `None` when nothing matches.
    async fn find_ride(&self, request: FindRideRequest) -> Result<Option<RideMatch>, Error>;
}
