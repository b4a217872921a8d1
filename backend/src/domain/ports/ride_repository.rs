//! Driven port for ride persistence, including the atomic seat claim used
//! by joins.
use async_trait::async_trait;

use crate::domain::{Email, MatchWindow, Ride, RideId, RideStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ride repository adapters.
    pub enum RideRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ride repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ride repository query failed: {message}",
    }
}

/// Conjunctive predicates selecting rides a rider could join.
///
/// A ride matches when it is still open (neither completed nor cancelled),
/// offers at least one seat, is not driven by the rider, heads to exactly
/// `destination` and departs inside `window`.
#[derive(Debug, Clone, PartialEq)]
pub struct RideSearchFilter {
    pub rider_email: Email,
    pub destination: String,
    pub window: MatchWindow,
}

impl RideSearchFilter {
    /// Evaluate the filter against a ride held in memory.
    pub fn matches(&self, ride: &Ride) -> bool {
        ride.status().is_open()
            && ride.seats_offered() > 0
            && ride.driver_email() != &self.rider_email
            && ride.destination() == self.destination
            && self.window.contains(ride.departure())
    }
}

/// Outcome of [`RideRepository::append_rider`].
#[derive(Debug, Clone, PartialEq)]
pub struct RiderAppend {
    /// 1 when the rider was appended, otherwise 0.
    pub modified_count: u64,
    /// The ride as stored after the attempt; `None` when the id is unknown.
    pub ride: Option<Ride>,
}

/// Store of rides offered by drivers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideRepository: Send + Sync {
    /// Store a newly scheduled ride.
    async fn insert(&self, ride: &Ride) -> Result<(), RideRepositoryError>;

    /// Fetch a ride by identifier.
    async fn find_by_id(&self, id: &RideId) -> Result<Option<Ride>, RideRepositoryError>;

    /// Rides satisfying every predicate of `filter`.
    async fn find_candidates(
        &self,
        filter: &RideSearchFilter,
    ) -> Result<Vec<Ride>, RideRepositoryError>;

    /// Rides with `status` that `email` drives or rides in.
    async fn find_for_participant(
        &self,
        email: &Email,
        status: RideStatus,
    ) -> Result<Vec<Ride>, RideRepositoryError>;

    /// Append `rider` in a single atomic step, only while the ride is
    /// scheduled and has fewer riders than seats.
    async fn append_rider(
        &self,
        id: &RideId,
        rider: &Email,
    ) -> Result<RiderAppend, RideRepositoryError>;

    /// Set the status to `next` only when it currently equals `expected`.
    ///
    /// Returns the number of matched records.
    async fn update_status(
        &self,
        id: &RideId,
        expected: RideStatus,
        next: RideStatus,
    ) -> Result<u64, RideRepositoryError>;
}
