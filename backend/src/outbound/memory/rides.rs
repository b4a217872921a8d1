//! In-memory ride repository.
//!
//! Rides are kept in insertion order. Seat claims check capacity and append
//! under one write lock, matching the single-statement update used by the
//! PostgreSQL adapter.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{RideRepository, RideRepositoryError, RideSearchFilter, RiderAppend};
use crate::domain::{Email, Ride, RideId, RideStatus};

#[derive(Debug, Default)]
pub struct InMemoryRideRepository {
    rides: RwLock<Vec<Ride>>,
}

impl InMemoryRideRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RideRepository for InMemoryRideRepository {
    async fn insert(&self, ride: &Ride) -> Result<(), RideRepositoryError> {
        self.rides.write().await.push(ride.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &RideId) -> Result<Option<Ride>, RideRepositoryError> {
        let rides = self.rides.read().await;
        Ok(rides.iter().find(|ride| ride.id() == *id).cloned())
    }

    async fn find_candidates(
        &self,
        filter: &RideSearchFilter,
    ) -> Result<Vec<Ride>, RideRepositoryError> {
        let rides = self.rides.read().await;
        Ok(rides
            .iter()
            .filter(|ride| filter.matches(ride))
            .cloned()
            .collect())
    }

    async fn find_for_participant(
        &self,
        email: &Email,
        status: RideStatus,
    ) -> Result<Vec<Ride>, RideRepositoryError> {
        let rides = self.rides.read().await;
        Ok(rides
            .iter()
            .filter(|ride| ride.status() == status && ride.involves(email))
            .cloned()
            .collect())
    }

    async fn append_rider(
        &self,
        id: &RideId,
        rider: &Email,
    ) -> Result<RiderAppend, RideRepositoryError> {
        let mut rides = self.rides.write().await;
        let Some(ride) = rides.iter_mut().find(|ride| ride.id() == *id) else {
            return Ok(RiderAppend {
                modified_count: 0,
                ride: None,
            });
        };
        let modified_count = u64::from(ride.add_rider(rider.clone()).is_ok());
        Ok(RiderAppend {
            modified_count,
            ride: Some(ride.clone()),
        })
    }

    async fn update_status(
        &self,
        id: &RideId,
        expected: RideStatus,
        next: RideStatus,
    ) -> Result<u64, RideRepositoryError> {
        let mut rides = self.rides.write().await;
        match rides
            .iter_mut()
            .find(|ride| ride.id() == *id && ride.status() == expected)
        {
            Some(ride) => {
                ride.set_status(next);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
