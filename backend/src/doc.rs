//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint from the inbound layer (users,
//! rides, health) together with the request, response and error schemas.
//! Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, RideStatus};
use crate::inbound::http::rides::{
    CandidateResponse, JoinRideRequestBody, JoinRideResponseBody, OfferRideRequestBody,
    ParticipantRideResponse, RideResponse, UpdateRideStatusRequestBody,
    UpdateRideStatusResponseBody,
};
use crate::inbound::http::users::{UserRequest, UserResponse, VehiclePayload, VehicleResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Carpool backend API",
        description = "Users, ride offers, ride matching and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::rides::offer_ride,
        crate::inbound::http::rides::rides_for_participant,
        crate::inbound::http::rides::find_ride,
        crate::inbound::http::rides::join_ride,
        crate::inbound::http::rides::update_ride_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RideStatus,
        UserRequest,
        UserResponse,
        VehiclePayload,
        VehicleResponse,
        OfferRideRequestBody,
        RideResponse,
        ParticipantRideResponse,
        CandidateResponse,
        JoinRideRequestBody,
        JoinRideResponseBody,
        UpdateRideStatusRequestBody,
        UpdateRideStatusResponseBody,
    )),
    tags(
        (name = "users", description = "User registration and profiles"),
        (name = "rides", description = "Ride offers, matching and lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
