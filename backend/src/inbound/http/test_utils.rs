//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::{App, web};

use crate::domain::ports::{MockRideCommand, MockRideQuery, MockUsersCommand, MockUsersQuery};
use crate::domain::{Coordinate, Email, User, UserDraft, Vehicle};
use crate::inbound::http::api_scope;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Mocked driving ports; set expectations before calling [`MockPorts::app`].
#[derive(Default)]
pub(crate) struct MockPorts {
    pub users: MockUsersCommand,
    pub users_query: MockUsersQuery,
    pub rides: MockRideCommand,
    pub rides_query: MockRideQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
            rides: Arc::new(self.rides),
            rides_query: Arc::new(self.rides_query),
        })
    }

    /// Application serving the versioned API over these mocks.
    pub(crate) fn app(
        self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.into_state()))
            .service(api_scope())
    }
}

pub(crate) fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

pub(crate) fn sample_user(raw_email: &str, latitude: f64, longitude: f64) -> User {
    User::try_new(UserDraft {
        email: email(raw_email),
        first_name: "Ana".into(),
        last_name: "Silva".into(),
        mobile: "+91 98450 00000".into(),
        address: "MG Road, Bengaluru".into(),
        home: Coordinate::new(latitude, longitude).expect("valid coordinate"),
        vehicles: vec![Vehicle::new("sedan", 3).expect("vehicle")],
    })
    .expect("valid user")
}
