//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters;
//! driving ports (`*Command`, `*Query`) are implemented by domain services
//! and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod ride_command;
mod ride_query;
mod ride_repository;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use ride_command::MockRideCommand;
pub use ride_command::{
    JoinRideRequest, JoinRideResponse, OfferRideRequest, RideCommand, UpdateRideStatusRequest,
    UpdateRideStatusResponse,
};
#[cfg(test)]
pub use ride_query::MockRideQuery;
pub use ride_query::{FindRideRequest, ParticipantRide, RideQuery};
#[cfg(test)]
pub use ride_repository::MockRideRepository;
pub use ride_repository::{RideRepository, RideRepositoryError, RideSearchFilter, RiderAppend};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
