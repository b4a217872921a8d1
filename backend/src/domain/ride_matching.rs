//! Ride matching: find the closest compatible ride for a rider.
//!
//! A rider asks for rides to a destination around a point in time. Rides
//! that are open, not full, not driven by the rider, heading to exactly that
//! destination and departing within an hour either side are candidates.
//! Candidates are ranked by great-circle distance between the rider and the
//! ride's origin; the nearest becomes the primary match and every other
//! candidate within [`NEARBY_RADIUS_KM`] is offered alongside it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::ports::{RideRepository, RideSearchFilter, UserRepository};
use super::repository_errors::{map_ride_repository_error, map_user_repository_error};
use super::{Coordinate, Email, Error, Ride, RideValidationError, distance_km};

/// Half-width of the departure window around the requested time.
pub const MATCH_WINDOW_MINUTES: i64 = 60;

/// Radius around the rider within which secondary matches are offered.
pub const NEARBY_RADIUS_KM: f64 = 5.0;

/// Inclusive departure window `[requested - 1h, requested + 1h]`.
///
/// # Examples
/// ```
/// use carpool::domain::{MatchWindow, parse_departure};
///
/// let requested = parse_departure("2024-03-01T09:00:00.000000Z").expect("timestamp");
/// let window = MatchWindow::around(requested).expect("in range");
/// assert!(window.contains(parse_departure("2024-03-01T08:00:00Z").expect("timestamp")));
/// assert!(!window.contains(parse_departure("2024-03-01T10:00:01Z").expect("timestamp")));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl MatchWindow {
    pub fn around(requested: DateTime<Utc>) -> Result<Self, RideValidationError> {
        let half = Duration::minutes(MATCH_WINDOW_MINUTES);
        let out_of_range = || RideValidationError::DateOutOfRange {
            value: requested.to_rfc3339(),
        };
        Ok(Self {
            start: requested.checked_sub_signed(half).ok_or_else(out_of_range)?,
            end: requested.checked_add_signed(half).ok_or_else(out_of_range)?,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// A ride under consideration, annotated for the rider.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub ride: Ride,
    /// Driver's registered address; `None` when the driver profile is gone.
    pub driver_address: Option<String>,
    pub distance_km: f64,
}

/// Ranked matching result.
#[derive(Debug, Clone, PartialEq)]
pub struct RideMatch {
    pub primary: Candidate,
    /// Other candidates within [`NEARBY_RADIUS_KM`], nearest first.
    pub nearby: Vec<Candidate>,
}

impl RideMatch {
    /// Primary match followed by the nearby alternatives.
    pub fn into_ranked(self) -> Vec<Candidate> {
        let mut ranked = Vec::with_capacity(self.nearby.len() + 1);
        ranked.push(self.primary);
        ranked.extend(self.nearby);
        ranked
    }
}

/// Rank rides by distance from `rider`.
///
/// Ties on distance fall back to ascending ride id so the primary match does
/// not depend on store iteration order. Returns `None` for no rides.
pub fn rank_candidates(
    rider: Coordinate,
    rides: impl IntoIterator<Item = (Ride, Option<String>)>,
) -> Option<RideMatch> {
    let mut scored: Vec<Candidate> = rides
        .into_iter()
        .map(|(ride, driver_address)| Candidate {
            distance_km: distance_km(rider, ride.origin()),
            ride,
            driver_address,
        })
        .collect();
    scored.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.ride.id().cmp(&b.ride.id()))
    });

    let mut ranked = scored.into_iter();
    let primary = ranked.next()?;
    let nearby = ranked
        .filter(|candidate| candidate.distance_km <= NEARBY_RADIUS_KM)
        .collect();
    Some(RideMatch { primary, nearby })
}

/// Matching service over the ride and user stores.
#[derive(Clone)]
pub struct RideMatcher<R, U> {
    rides: Arc<R>,
    users: Arc<U>,
}

impl<R, U> RideMatcher<R, U>
where
    R: RideRepository,
    U: UserRepository,
{
    pub fn new(rides: Arc<R>, users: Arc<U>) -> Self {
        Self { rides, users }
    }

    /// Find the nearest joinable ride for a rider at `rider`.
    ///
    /// Returns `Ok(None)` when no ride survives filtering. Store failures and
    /// a requested time at the edge of the representable range are errors.
    pub async fn find_ride(
        &self,
        rider: Coordinate,
        rider_email: &Email,
        destination: &str,
        requested: DateTime<Utc>,
    ) -> Result<Option<RideMatch>, Error> {
        let window = MatchWindow::around(requested)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let filter = RideSearchFilter {
            rider_email: rider_email.clone(),
            destination: destination.to_owned(),
            window,
        };

        let rides = self
            .rides
            .find_candidates(&filter)
            .await
            .map_err(map_ride_repository_error)?;
        let fetched = rides.len();
        let open: Vec<Ride> = rides
            .into_iter()
            .filter(|ride| ride.available_seats() > 0)
            .collect();
        debug!(
            fetched,
            open = open.len(),
            destination,
            "ride candidates filtered"
        );
        if open.is_empty() {
            return Ok(None);
        }

        let mut addresses: HashMap<Email, Option<String>> = HashMap::new();
        let mut annotated = Vec::with_capacity(open.len());
        for ride in open {
            let driver = ride.driver_email().clone();
            let address = match addresses.get(&driver) {
                Some(address) => address.clone(),
                None => {
                    let address = self.driver_address(&driver).await?;
                    addresses.insert(driver, address.clone());
                    address
                }
            };
            annotated.push((ride, address));
        }

        Ok(rank_candidates(rider, annotated))
    }

    async fn driver_address(&self, driver: &Email) -> Result<Option<String>, Error> {
        let user = self
            .users
            .find_by_email(driver)
            .await
            .map_err(map_user_repository_error)?;
        if user.is_none() {
            warn!(driver = %driver, "ride driver has no user profile");
        }
        Ok(user.map(|user| user.address().to_owned()))
    }
}

#[cfg(test)]
#[path = "ride_matching_tests.rs"]
mod tests;
