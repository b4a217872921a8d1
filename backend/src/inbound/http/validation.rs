//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes an `invalid_request` error whose
//! `details` carry `{ field, value?, code }`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Coordinate, CoordinateValidationError, Email, Error, RideId, RideStatus,
    RideValidationError, UserValidationError, parse_departure,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidEmail,
    InvalidUser,
    InvalidRide,
    InvalidCoordinate,
    InvalidNumber,
    InvalidDate,
    InvalidRideId,
    InvalidStatus,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidUser => "invalid_user",
            ErrorCode::InvalidRide => "invalid_ride",
            ErrorCode::InvalidCoordinate => "invalid_coordinate",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidRideId => "invalid_ride_id",
            ErrorCode::InvalidStatus => "invalid_status",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

/// A JSON number that older clients sometimes send as a string.
///
/// Accepts `12.97` and `"12.97"` alike; conversion happens in the
/// `parse_*` helpers so the offending raw value can be echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for NumberOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for NumberOrString {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Self::Number)
            .unwrap_or_else(|| Self::Text(value.to_string()))
    }
}

impl From<u32> for NumberOrString {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

pub(crate) fn parse_email(value: &str, field: FieldName) -> Result<Email, Error> {
    Email::new(value).map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(ErrorCode::InvalidEmail, value)
    })
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    let code = match err {
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => {
            ErrorCode::InvalidEmail
        }
        UserValidationError::EmptyField { .. } | UserValidationError::EmptyVehicleType => {
            ErrorCode::InvalidUser
        }
    };
    ValidationError::new(err.field(), err.to_string()).with_code(code)
}

fn coordinate_error(err: CoordinateValidationError, raw: &NumberOrString) -> Error {
    ValidationError::new(err.axis().field(), err.to_string())
        .with_value(ErrorCode::InvalidCoordinate, raw.to_string())
}

/// Coerce a latitude/longitude pair, numbers or numeric strings.
pub(crate) fn parse_coordinate(
    latitude: &NumberOrString,
    longitude: &NumberOrString,
) -> Result<Coordinate, Error> {
    Coordinate::parse(&latitude.to_string(), &longitude.to_string()).map_err(|err| {
        let raw = match err.axis() {
            crate::domain::Axis::Latitude => latitude,
            crate::domain::Axis::Longitude => longitude,
        };
        coordinate_error(err, raw)
    })
}

/// Coerce a non-negative seat count, numbers or numeric strings.
pub(crate) fn parse_seats(value: &NumberOrString, field: FieldName) -> Result<u32, Error> {
    let parsed = match value {
        NumberOrString::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        NumberOrString::Text(text) => text.trim().parse::<u32>().ok(),
    };
    parsed.ok_or_else(|| {
        let field = field.as_str();
        ValidationError::new(field, format!("{field} must be a non-negative whole number"))
            .with_value(ErrorCode::InvalidNumber, value.to_string())
    })
}

pub(crate) fn ride_validation_error(err: RideValidationError) -> Error {
    let (code, value) = match &err {
        RideValidationError::InvalidDate { value }
        | RideValidationError::DateOutOfRange { value } => (ErrorCode::InvalidDate, value.clone()),
        RideValidationError::UnknownStatus { value } => (ErrorCode::InvalidStatus, value.clone()),
        RideValidationError::InvalidRideId { value } => (ErrorCode::InvalidRideId, value.clone()),
        RideValidationError::NoSeats | RideValidationError::EmptyDestination => {
            return ValidationError::new(err.field(), err.to_string())
                .with_code(ErrorCode::InvalidRide);
        }
    };
    ValidationError::new(err.field(), err.to_string()).with_value(code, value)
}

pub(crate) fn parse_date(value: &str) -> Result<DateTime<Utc>, Error> {
    parse_departure(value).map_err(ride_validation_error)
}

pub(crate) fn parse_ride_id(value: &str) -> Result<RideId, Error> {
    value.parse::<RideId>().map_err(ride_validation_error)
}

pub(crate) fn parse_status(value: &str) -> Result<RideStatus, Error> {
    value.parse::<RideStatus>().map_err(ride_validation_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    #[case(json!(12.5), "12.5")]
    #[case(json!("12.5"), "12.5")]
    #[case(json!(3), "3")]
    fn number_or_string_accepts_both_shapes(#[case] raw: Value, #[case] rendered: &str) {
        let parsed: NumberOrString = serde_json::from_value(raw).expect("lenient number");
        assert_eq!(parsed.to_string(), rendered);
    }

    #[rstest]
    fn coordinates_coerce_numeric_strings() {
        let coordinate = parse_coordinate(
            &NumberOrString::Text("12.9715987".into()),
            &NumberOrString::from(77.5945627_f64),
        )
        .expect("coordinate");
        assert_eq!(coordinate, Coordinate::new(12.9715987, 77.5945627).expect("valid"));
    }

    #[rstest]
    fn bad_longitude_reports_field_and_value() {
        let err = parse_coordinate(
            &NumberOrString::from(12.0_f64),
            &NumberOrString::Text("east".into()),
        )
        .expect_err("non-numeric longitude");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some(&json!("longitude")));
        assert_eq!(detail(&err, "value"), Some(&json!("east")));
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_coordinate")));
    }

    #[rstest]
    #[case(NumberOrString::from(3_u32), Some(3))]
    #[case(NumberOrString::Text(" 4 ".into()), Some(4))]
    #[case(NumberOrString::Text("-1".into()), None)]
    #[case(NumberOrString::from(2.5_f64), None)]
    fn seats_parse_whole_numbers(#[case] raw: NumberOrString, #[case] expected: Option<u32>) {
        let parsed = parse_seats(&raw, FieldName::new("seatsOffered")).ok();
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn invalid_email_echoes_value() {
        let err = parse_email("not-an-email", FieldName::new("email")).expect_err("invalid");
        assert_eq!(detail(&err, "value"), Some(&json!("not-an-email")));
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_email")));
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        let err = parse_status("archived").expect_err("unknown status");
        assert_eq!(detail(&err, "field"), Some(&json!("status")));
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_status")));
    }

    #[rstest]
    fn malformed_dates_are_rejected() {
        let err = parse_date("next tuesday").expect_err("not RFC 3339");
        assert_eq!(detail(&err, "field"), Some(&json!("date")));
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_date")));
    }
}
