//! In-process repositories.
//!
//! Used when the server starts without a database URL and by tests that
//! exercise the full HTTP stack. State lives for the lifetime of the
//! process.

mod rides;
mod users;

pub use rides::InMemoryRideRepository;
pub use users::InMemoryUserRepository;
