//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"email":"ana@example.com","firstName":"Ana",...}
//! GET /api/v1/users/ana@example.com
//! PUT /api/v1/users {...}
//! DELETE /api/v1/users/ana@example.com
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, User, UserDraft, Vehicle};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, NumberOrString, parse_coordinate, parse_email, parse_seats, user_validation_error,
};

/// Vehicle entry in a user payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePayload {
    #[serde(rename = "type")]
    #[schema(example = "sedan")]
    pub vehicle_type: String,
    /// Whole number; numeric strings are accepted.
    #[schema(value_type = u32, example = 3)]
    pub seats_offered: NumberOrString,
}

/// Request body for `POST /api/v1/users` and `PUT /api/v1/users`.
///
/// Coordinates accept JSON numbers or numeric strings.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub address: String,
    #[schema(value_type = f64, example = 12.9715987)]
    pub latitude: NumberOrString,
    #[schema(value_type = f64, example = 77.5945627)]
    pub longitude: NumberOrString,
    #[serde(default)]
    pub vehicles: Vec<VehiclePayload>,
}

impl TryFrom<UserRequest> for User {
    type Error = Error;

    fn try_from(value: UserRequest) -> Result<Self, Self::Error> {
        let email = parse_email(&value.email, FieldName::new("email"))?;
        let home = parse_coordinate(&value.latitude, &value.longitude)?;
        let vehicles = value
            .vehicles
            .iter()
            .map(|vehicle| {
                let seats = parse_seats(&vehicle.seats_offered, FieldName::new("seatsOffered"))?;
                Vehicle::new(vehicle.vehicle_type.clone(), seats).map_err(user_validation_error)
            })
            .collect::<Result<Vec<_>, Error>>()?;
        User::try_new(UserDraft {
            email,
            first_name: value.first_name,
            last_name: value.last_name,
            mobile: value.mobile,
            address: value.address,
            home,
            vehicles,
        })
        .map_err(user_validation_error)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub seats_offered: u32,
}

/// User profile as returned by the API.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub vehicles: Vec<VehicleResponse>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().to_string(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            mobile: user.mobile().to_owned(),
            address: user.address().to_owned(),
            latitude: user.home().latitude(),
            longitude: user.home().longitude(),
            vehicles: user
                .vehicles()
                .iter()
                .map(|vehicle| VehicleResponse {
                    vehicle_type: vehicle.vehicle_type().to_owned(),
                    seats_offered: vehicle.seats_offered(),
                })
                .collect(),
        }
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let user = User::try_from(payload.into_inner())?;
    let created = state.users.register(user).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&created)))
}

/// Fetch a user by email.
#[utoipa::path(
    get,
    path = "/api/v1/users/{email}",
    params(("email" = String, Path, description = "Registered email address")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{email}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let email = parse_email(&path.into_inner(), FieldName::new("email"))?;
    let user = state.users_query.get(&email).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Replace a user's profile in full.
#[utoipa::path(
    put,
    path = "/api/v1/users",
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users")]
pub async fn update_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = User::try_from(payload.into_inner())?;
    let updated = state.users.update(user).await?;
    Ok(web::Json(UserResponse::from(&updated)))
}

/// Delete a user by email.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{email}",
    params(("email" = String, Path, description = "Registered email address")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{email}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(&path.into_inner(), FieldName::new("email"))?;
    state.users.delete(&email).await?;
    Ok(HttpResponse::NoContent().finish())
}
