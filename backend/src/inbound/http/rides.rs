//! Rides API handlers: offering, participant listings, matching, joining
//! and status changes.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    FindRideRequest, JoinRideRequest, OfferRideRequest, ParticipantRide,
    UpdateRideStatusRequest,
};
use crate::domain::{Candidate, Error, Ride, RideStatus, format_departure};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, NumberOrString, parse_date, parse_email, parse_ride_id, parse_seats, parse_status,
};

/// Request body for `POST /api/v1/rides`.
///
/// The ride starts from the driver's registered home location.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferRideRequestBody {
    #[schema(example = "driver@example.com")]
    pub driver_email: String,
    #[schema(example = "Airport")]
    pub destination: String,
    /// RFC 3339 departure time.
    #[schema(example = "2024-03-01T08:30:00.000000Z")]
    pub date: String,
    #[schema(value_type = u32, example = 3)]
    pub seats_offered: NumberOrString,
    #[serde(default)]
    pub vehicle_type: Option<String>,
}

/// Request body for `POST /api/v1/rides/join`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinRideRequestBody {
    pub ride_id: String,
    pub rider_email: String,
}

/// Request body for `PUT /api/v1/rides/status`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRideStatusRequestBody {
    pub ride_id: String,
    #[schema(example = "completed")]
    pub status: String,
}

/// Ride as returned by the API.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RideResponse {
    pub id: String,
    pub driver_email: String,
    /// Origin latitude, copied from the driver's home when offered.
    pub latitude: f64,
    pub longitude: f64,
    pub destination: String,
    #[schema(example = "2024-03-01T08:30:00.000000Z")]
    pub date: String,
    pub seats_offered: u32,
    pub available_seats: i64,
    pub riders: Vec<String>,
    pub status: RideStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
}

impl From<&Ride> for RideResponse {
    fn from(ride: &Ride) -> Self {
        Self {
            id: ride.id().to_string(),
            driver_email: ride.driver_email().to_string(),
            latitude: ride.origin().latitude(),
            longitude: ride.origin().longitude(),
            destination: ride.destination().to_owned(),
            date: format_departure(ride.departure()),
            seats_offered: ride.seats_offered(),
            available_seats: ride.available_seats(),
            riders: ride.riders().iter().map(ToString::to_string).collect(),
            status: ride.status(),
            vehicle_type: ride.vehicle_type().map(str::to_owned),
        }
    }
}

/// Ride seen by one participant.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRideResponse {
    #[serde(flatten)]
    pub ride: RideResponse,
    /// True when the participant is a rider rather than the driver.
    pub is_rider: bool,
}

impl From<&ParticipantRide> for ParticipantRideResponse {
    fn from(value: &ParticipantRide) -> Self {
        Self {
            ride: RideResponse::from(&value.ride),
            is_rider: value.is_rider,
        }
    }
}

/// A matched ride annotated for the rider.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    #[serde(flatten)]
    pub ride: RideResponse,
    /// Driver's registered address, absent when the driver has gone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_address: Option<String>,
    pub distance_km: f64,
}

impl From<&Candidate> for CandidateResponse {
    fn from(candidate: &Candidate) -> Self {
        Self {
            ride: RideResponse::from(&candidate.ride),
            driver_address: candidate.driver_address.clone(),
            distance_km: candidate.distance_km,
        }
    }
}

/// Result of a join attempt.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinRideResponseBody {
    pub message: String,
    pub modified_count: u64,
    pub ride: RideResponse,
}

/// Result of a status change.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRideStatusResponseBody {
    pub message: String,
    pub modified_count: u64,
}

fn ride_not_found() -> Error {
    Error::not_found("Ride not found")
}

/// Offer a ride from the driver's home.
#[utoipa::path(
    post,
    path = "/api/v1/rides",
    request_body = OfferRideRequestBody,
    responses(
        (status = 201, description = "Ride scheduled", body = RideResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Driver not registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rides"],
    operation_id = "offerRide"
)]
#[post("/rides")]
pub async fn offer_ride(
    state: web::Data<HttpState>,
    payload: web::Json<OfferRideRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = OfferRideRequest {
        driver_email: parse_email(&body.driver_email, FieldName::new("driverEmail"))?,
        destination: body.destination,
        departure: parse_date(&body.date)?,
        seats_offered: parse_seats(&body.seats_offered, FieldName::new("seatsOffered"))?,
        vehicle_type: body.vehicle_type.filter(|value| !value.trim().is_empty()),
    };
    let ride = state.rides.offer(request).await?;
    Ok(HttpResponse::Created().json(RideResponse::from(&ride)))
}

/// List rides with a status that the user drives or rides in.
#[utoipa::path(
    get,
    path = "/api/v1/rides/{email}/{status}",
    params(
        ("email" = String, Path, description = "Participant email"),
        ("status" = String, Path, description = "scheduled, completed or cancelled")
    ),
    responses(
        (status = 200, description = "Rides", body = [ParticipantRideResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rides"],
    operation_id = "ridesForParticipant"
)]
#[get("/rides/{email}/{status}")]
pub async fn rides_for_participant(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Vec<ParticipantRideResponse>>> {
    let (raw_email, raw_status) = path.into_inner();
    let email = parse_email(&raw_email, FieldName::new("email"))?;
    let status = parse_status(&raw_status)?;
    let rides = state.rides_query.rides_for_participant(&email, status).await?;
    Ok(web::Json(
        rides.iter().map(ParticipantRideResponse::from).collect(),
    ))
}

/// Find the nearest joinable ride for a rider, followed by rides starting
/// within 5 km of the rider's home.
#[utoipa::path(
    get,
    path = "/api/v1/rides/find/{email}/{destination}/{date}",
    params(
        ("email" = String, Path, description = "Registered rider email"),
        ("destination" = String, Path, description = "Exact destination name"),
        ("date" = String, Path, description = "RFC 3339 time; rides within one hour either side match")
    ),
    responses(
        (status = 200, description = "Nearest ride first", body = [CandidateResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Rider unknown or no ride matches", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rides"],
    operation_id = "findRide"
)]
#[get("/rides/find/{email}/{destination}/{date}")]
pub async fn find_ride(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
) -> ApiResult<web::Json<Vec<CandidateResponse>>> {
    let (raw_email, destination, raw_date) = path.into_inner();
    let request = FindRideRequest {
        rider_email: parse_email(&raw_email, FieldName::new("email"))?,
        destination,
        requested_at: parse_date(&raw_date)?,
    };
    let found = state
        .rides_query
        .find_ride(request)
        .await?
        .ok_or_else(ride_not_found)?;
    Ok(web::Json(
        found.into_ranked().iter().map(CandidateResponse::from).collect(),
    ))
}

/// Claim a seat on a ride.
#[utoipa::path(
    post,
    path = "/api/v1/rides/join",
    request_body = JoinRideRequestBody,
    responses(
        (status = 200, description = "Ride joined", body = JoinRideResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Ride not found", body = Error),
        (status = 409, description = "Ride full or no longer scheduled", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rides"],
    operation_id = "joinRide"
)]
#[post("/rides/join")]
pub async fn join_ride(
    state: web::Data<HttpState>,
    payload: web::Json<JoinRideRequestBody>,
) -> ApiResult<web::Json<JoinRideResponseBody>> {
    let body = payload.into_inner();
    let request = JoinRideRequest {
        ride_id: parse_ride_id(&body.ride_id)?,
        rider_email: parse_email(&body.rider_email, FieldName::new("riderEmail"))?,
    };
    let outcome = state.rides.join(request).await?;
    match outcome.ride {
        Some(ride) if outcome.modified_count > 0 => Ok(web::Json(JoinRideResponseBody {
            message: "Ride joined successfully".to_owned(),
            modified_count: outcome.modified_count,
            ride: RideResponse::from(&ride),
        })),
        _ => Err(ride_not_found()),
    }
}

/// Move a ride to a new status.
#[utoipa::path(
    put,
    path = "/api/v1/rides/status",
    request_body = UpdateRideStatusRequestBody,
    responses(
        (status = 200, description = "Status updated", body = UpdateRideStatusResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Ride not found", body = Error),
        (status = 409, description = "Transition not allowed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rides"],
    operation_id = "updateRideStatus"
)]
#[put("/rides/status")]
pub async fn update_ride_status(
    state: web::Data<HttpState>,
    payload: web::Json<UpdateRideStatusRequestBody>,
) -> ApiResult<web::Json<UpdateRideStatusResponseBody>> {
    let body = payload.into_inner();
    let request = UpdateRideStatusRequest {
        ride_id: parse_ride_id(&body.ride_id)?,
        status: parse_status(&body.status)?,
    };
    let outcome = state.rides.set_status(request).await?;
    if outcome.modified_count == 0 {
        return Err(ride_not_found());
    }
    Ok(web::Json(UpdateRideStatusResponseBody {
        message: "Ride status updated successfully".to_owned(),
        modified_count: outcome.modified_count,
    }))
}

#[cfg(test)]
#[path = "rides_tests.rs"]
mod tests;
