//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//! - **memory**: process-local repositories for database-less runs and tests.
//!
//! Adapters convert between domain types and storage representations and
//! contain no business rules beyond the atomic seat claim they must honour.

pub mod memory;
pub mod persistence;
