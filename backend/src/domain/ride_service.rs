//! Ride service implementing the ride driving ports.
//!
//! Offering copies the driver's home onto the ride as its origin. Joining
//! relies on the repository's atomic seat claim, so two riders racing for
//! the last seat cannot both win.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::ports::{
    FindRideRequest, JoinRideRequest, JoinRideResponse, OfferRideRequest, ParticipantRide,
    RideCommand, RideQuery, RideRepository, RiderAppend, UpdateRideStatusRequest,
    UpdateRideStatusResponse, UserRepository,
};
use super::repository_errors::{map_ride_repository_error, map_user_repository_error};
use super::{
    Email, Error, JoinRejection, NewRide, Ride, RideMatch, RideMatcher, RideStatus,
    RideValidationError, User,
};

fn invalid_ride(err: &RideValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": "invalid_ride",
    }))
}

/// Ride lifecycle and matching backed by ride and user repositories.
#[derive(Clone)]
pub struct RideService<R, U> {
    rides: Arc<R>,
    users: Arc<U>,
    matcher: RideMatcher<R, U>,
}

impl<R, U> RideService<R, U>
where
    R: RideRepository,
    U: UserRepository,
{
    pub fn new(rides: Arc<R>, users: Arc<U>) -> Self {
        let matcher = RideMatcher::new(Arc::clone(&rides), Arc::clone(&users));
        Self {
            rides,
            users,
            matcher,
        }
    }

    async fn registered_user(&self, email: &Email, role: &str) -> Result<User, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("{role} {email} is not registered")))
    }
}

#[async_trait]
impl<R, U> RideCommand for RideService<R, U>
where
    R: RideRepository,
    U: UserRepository,
{
    async fn offer(&self, request: OfferRideRequest) -> Result<Ride, Error> {
        let OfferRideRequest {
            driver_email,
            destination,
            departure,
            seats_offered,
            vehicle_type,
        } = request;
        let driver = self.registered_user(&driver_email, "driver").await?;
        let ride = Ride::schedule(NewRide {
            driver_email,
            origin: driver.home(),
            destination,
            departure,
            seats_offered,
            vehicle_type,
        })
        .map_err(|err| invalid_ride(&err))?;

        self.rides
            .insert(&ride)
            .await
            .map_err(map_ride_repository_error)?;
        info!(
            ride_id = %ride.id(),
            driver = %ride.driver_email(),
            destination = ride.destination(),
            "ride offered"
        );
        Ok(ride)
    }

    async fn join(&self, request: JoinRideRequest) -> Result<JoinRideResponse, Error> {
        let RiderAppend {
            modified_count,
            ride,
        } = self
            .rides
            .append_rider(&request.ride_id, &request.rider_email)
            .await
            .map_err(map_ride_repository_error)?;

        match (modified_count, ride) {
            (0, Some(ride)) => {
                let rejection = if ride.status().is_open() {
                    JoinRejection::Full
                } else {
                    JoinRejection::NotOpen(ride.status())
                };
                Err(Error::conflict(rejection.to_string()))
            }
            (modified_count, ride) => {
                if modified_count > 0 {
                    info!(
                        ride_id = %request.ride_id,
                        rider = %request.rider_email,
                        "rider joined ride"
                    );
                }
                Ok(JoinRideResponse {
                    modified_count,
                    ride,
                })
            }
        }
    }

    async fn set_status(
        &self,
        request: UpdateRideStatusRequest,
    ) -> Result<UpdateRideStatusResponse, Error> {
        let UpdateRideStatusRequest { ride_id, status } = request;
        let Some(current) = self
            .rides
            .find_by_id(&ride_id)
            .await
            .map_err(map_ride_repository_error)?
        else {
            return Ok(UpdateRideStatusResponse { modified_count: 0 });
        };

        let from = current.status();
        if !from.can_transition_to(status) {
            return Err(Error::conflict(format!(
                "ride {ride_id} cannot move from {from} to {status}"
            )));
        }

        let modified_count = self
            .rides
            .update_status(&ride_id, from, status)
            .await
            .map_err(map_ride_repository_error)?;
        if modified_count == 0 {
            return Err(Error::conflict(format!(
                "ride {ride_id} changed status concurrently"
            )));
        }
        info!(%ride_id, %from, to = %status, "ride status updated");
        Ok(UpdateRideStatusResponse { modified_count })
    }
}

#[async_trait]
impl<R, U> RideQuery for RideService<R, U>
where
    R: RideRepository,
    U: UserRepository,
{
    async fn rides_for_participant(
        &self,
        email: &Email,
        status: RideStatus,
    ) -> Result<Vec<ParticipantRide>, Error> {
        let rides = self
            .rides
            .find_for_participant(email, status)
            .await
            .map_err(map_ride_repository_error)?;
        Ok(rides
            .into_iter()
            .map(|ride| ParticipantRide {
                is_rider: ride.driver_email() != email,
                ride,
            })
            .collect())
    }

    async fn find_ride(&self, request: FindRideRequest) -> Result<Option<RideMatch>, Error> {
        let rider = self.registered_user(&request.rider_email, "rider").await?;
        self.matcher
            .find_ride(
                rider.home(),
                &request.rider_email,
                &request.destination,
                request.requested_at,
            )
            .await
    }
}

#[cfg(test)]
#[path = "ride_service_tests.rs"]
mod tests;
