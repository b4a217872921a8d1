//! Translation of driven-port failures into domain errors.
//!
//! Connection failures surface as `service_unavailable`; everything else is
//! an internal error.

use tracing::error;

use super::Error;
use super::ports::{RideRepositoryError, UserRepositoryError};

pub(crate) fn map_user_repository_error(err: UserRepositoryError) -> Error {
    match err {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::Duplicate { email } => {
            Error::conflict(format!("user {email} already exists"))
        }
    }
}

pub(crate) fn map_ride_repository_error(err: RideRepositoryError) -> Error {
    match err {
        RideRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ride repository unavailable: {message}"))
        }
        RideRepositoryError::Query { message } => {
            error!(%message, "ride repository query failed");
            Error::internal(format!("ride repository error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(UserRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UserRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(UserRepositoryError::duplicate("a@example.com"), ErrorCode::Conflict)]
    fn user_errors_map_to_codes(#[case] err: UserRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_user_repository_error(err).code(), code);
    }

    #[rstest]
    #[case(RideRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(RideRepositoryError::query("syntax"), ErrorCode::InternalError)]
    fn ride_errors_map_to_codes(#[case] err: RideRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_ride_repository_error(err).code(), code);
    }
}
