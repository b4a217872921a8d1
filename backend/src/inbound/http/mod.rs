//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod rides;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::{Scope, web};

/// Versioned API scope with every carpool endpoint registered.
///
/// Body and path extraction failures are reported with the shared error
/// envelope rather than Actix's plain-text defaults.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use carpool::inbound::http::api_scope;
///
/// let _app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(users::register_user)
        .service(users::update_user)
        .service(users::get_user)
        .service(users::delete_user)
        .service(rides::offer_ride)
        .service(rides::find_ride)
        .service(rides::join_ride)
        .service(rides::update_ride_status)
        .service(rides::rides_for_participant)
}
