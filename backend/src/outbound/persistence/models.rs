//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it. Conversions into domain types re-run domain validation so that
//! hand-edited rows cannot smuggle invalid values into the service layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Coordinate, Email, Ride, RideId, RideParts, RideStatus, User, UserDraft, Vehicle,
};

use super::schema::{rides, users};

/// JSON shape of one entry in `users.vehicles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VehicleRecord {
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub seats_offered: u32,
}

pub(crate) fn vehicles_to_json(vehicles: &[Vehicle]) -> Result<serde_json::Value, String> {
    let records: Vec<VehicleRecord> = vehicles
        .iter()
        .map(|vehicle| VehicleRecord {
            vehicle_type: vehicle.vehicle_type().to_owned(),
            seats_offered: vehicle.seats_offered(),
        })
        .collect();
    serde_json::to_value(records).map_err(|err| format!("vehicles not serialisable: {err}"))
}

fn vehicles_from_json(value: serde_json::Value) -> Result<Vec<Vehicle>, String> {
    let records: Vec<VehicleRecord> =
        serde_json::from_value(value).map_err(|err| format!("malformed vehicles: {err}"))?;
    records
        .into_iter()
        .map(|record| {
            Vehicle::new(record.vehicle_type, record.seats_offered).map_err(|err| err.to_string())
        })
        .collect()
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub vehicles: serde_json::Value,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, String> {
        let email = Email::new(&self.email).map_err(|err| err.to_string())?;
        let home = Coordinate::new(self.latitude, self.longitude).map_err(|err| err.to_string())?;
        User::try_new(UserDraft {
            email,
            first_name: self.first_name,
            last_name: self.last_name,
            mobile: self.mobile,
            address: self.address,
            home,
            vehicles: vehicles_from_json(self.vehicles)?,
        })
        .map_err(|err| err.to_string())
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub mobile: &'a str,
    pub address: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub vehicles: serde_json::Value,
}

/// Changeset replacing every mutable user column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub mobile: &'a str,
    pub address: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub vehicles: serde_json::Value,
}

/// Row struct for reading from the rides table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rides)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RideRow {
    pub id: Uuid,
    pub driver_email: String,
    pub latitude: f64,
    pub longitude: f64,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub seats_offered: i32,
    pub riders: Vec<String>,
    pub status: String,
    pub vehicle_type: Option<String>,
}

impl RideRow {
    pub(crate) fn into_domain(self) -> Result<Ride, String> {
        let riders = self
            .riders
            .iter()
            .map(Email::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.to_string())?;
        Ok(Ride::from_parts(RideParts {
            id: RideId::from_uuid(self.id),
            driver_email: Email::new(&self.driver_email).map_err(|err| err.to_string())?,
            origin: Coordinate::new(self.latitude, self.longitude)
                .map_err(|err| err.to_string())?,
            destination: self.destination,
            departure: self.departure,
            seats_offered: u32::try_from(self.seats_offered)
                .map_err(|_| format!("negative seat count {}", self.seats_offered))?,
            riders,
            status: self
                .status
                .parse::<RideStatus>()
                .map_err(|err| err.to_string())?,
            vehicle_type: self.vehicle_type,
        }))
    }
}

/// Insertable struct for creating new ride records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rides)]
pub(crate) struct NewRideRow<'a> {
    pub id: Uuid,
    pub driver_email: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub destination: &'a str,
    pub departure: DateTime<Utc>,
    pub seats_offered: i32,
    pub riders: Vec<String>,
    pub status: &'static str,
    pub vehicle_type: Option<&'a str>,
}

impl<'a> NewRideRow<'a> {
    pub(crate) fn from_domain(ride: &'a Ride) -> Result<Self, String> {
        Ok(Self {
            id: *ride.id().as_uuid(),
            driver_email: ride.driver_email().as_ref(),
            latitude: ride.origin().latitude(),
            longitude: ride.origin().longitude(),
            destination: ride.destination(),
            departure: ride.departure(),
            seats_offered: i32::try_from(ride.seats_offered())
                .map_err(|_| format!("seat count {} too large", ride.seats_offered()))?,
            riders: ride.riders().iter().map(ToString::to_string).collect(),
            status: ride.status().as_str(),
            vehicle_type: ride.vehicle_type(),
        })
    }
}
