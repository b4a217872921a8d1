//! PostgreSQL-backed `RideRepository` implementation using Diesel ORM.
//!
//! Seat claims are a single `UPDATE ... RETURNING` guarded by the ride's
//! status and `cardinality(riders) < seats_offered`, so concurrent joins are
//! serialised by PostgreSQL row locking and can never overbook a ride.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Array, Text};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{RideRepository, RideRepositoryError, RideSearchFilter, RiderAppend};
use crate::domain::{Email, Ride, RideId, RideStatus};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewRideRow, RideRow};
use super::pool::{DbPool, PoolError};
use super::schema::rides;

diesel::define_sql_function! {
    /// PostgreSQL `cardinality(anyarray)`: total number of elements.
    fn cardinality(array: Array<Text>) -> diesel::sql_types::Integer;
}

diesel::define_sql_function! {
    /// PostgreSQL `array_append(anyarray, anyelement)`.
    fn array_append(array: Array<Text>, element: Text) -> Array<Text>;
}

/// Diesel-backed implementation of the ride repository port.
#[derive(Clone)]
pub struct DieselRideRepository {
    pool: DbPool,
}

impl DieselRideRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RideRepositoryError {
    map_basic_pool_error(error, RideRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RideRepositoryError {
    map_basic_diesel_error(
        error,
        RideRepositoryError::query,
        RideRepositoryError::connection,
    )
}

fn row_to_ride(row: RideRow) -> Result<Ride, RideRepositoryError> {
    row.into_domain()
        .map_err(|message| RideRepositoryError::query(format!("corrupt ride row: {message}")))
}

fn rows_to_rides(rows: Vec<RideRow>) -> Result<Vec<Ride>, RideRepositoryError> {
    rows.into_iter().map(row_to_ride).collect()
}

#[async_trait]
impl RideRepository for DieselRideRepository {
    async fn insert(&self, ride: &Ride) -> Result<(), RideRepositoryError> {
        let row = NewRideRow::from_domain(ride).map_err(RideRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(rides::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &RideId) -> Result<Option<Ride>, RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RideRow> = rides::table
            .find(id.as_uuid())
            .select(RideRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_ride).transpose()
    }

    async fn find_candidates(
        &self,
        filter: &RideSearchFilter,
    ) -> Result<Vec<Ride>, RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RideRow> = rides::table
            .filter(rides::status.eq(RideStatus::Scheduled.as_str()))
            .filter(rides::seats_offered.gt(0))
            .filter(rides::driver_email.ne(filter.rider_email.as_ref()))
            .filter(rides::destination.eq(&filter.destination))
            .filter(
                rides::departure.between(filter.window.start(), filter.window.end()),
            )
            .order((rides::departure.asc(), rides::id.asc()))
            .select(RideRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(count = rows.len(), "ride candidates loaded");

        rows_to_rides(rows)
    }

    async fn find_for_participant(
        &self,
        email: &Email,
        status: RideStatus,
    ) -> Result<Vec<Ride>, RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let member = vec![email.as_ref().to_owned()];

        let rows: Vec<RideRow> = rides::table
            .filter(rides::status.eq(status.as_str()))
            .filter(
                rides::driver_email
                    .eq(email.as_ref())
                    .or(rides::riders.contains(member)),
            )
            .order((rides::departure.asc(), rides::id.asc()))
            .select(RideRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_rides(rows)
    }

    async fn append_rider(
        &self,
        id: &RideId,
        rider: &Email,
    ) -> Result<RiderAppend, RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let claimed: Option<RideRow> = diesel::update(
            rides::table
                .find(id.as_uuid())
                .filter(rides::status.eq(RideStatus::Scheduled.as_str()))
                .filter(cardinality(rides::riders).lt(rides::seats_offered)),
        )
        .set(rides::riders.eq(array_append(rides::riders, rider.as_ref())))
        .returning(RideRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = claimed {
            return Ok(RiderAppend {
                modified_count: 1,
                ride: Some(row_to_ride(row)?),
            });
        }

        // Nothing claimed: tell an unknown ride apart from a full or closed one.
        let current: Option<RideRow> = rides::table
            .find(id.as_uuid())
            .select(RideRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(RiderAppend {
            modified_count: 0,
            ride: current.map(row_to_ride).transpose()?,
        })
    }

    async fn update_status(
        &self,
        id: &RideId,
        expected: RideStatus,
        next: RideStatus,
    ) -> Result<u64, RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let matched = diesel::update(
            rides::table
                .find(id.as_uuid())
                .filter(rides::status.eq(expected.as_str())),
        )
        .set(rides::status.eq(next.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(matched as u64)
    }
}
