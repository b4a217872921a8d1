//! Regression coverage for this module.

use chrono::TimeZone;
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    MockRideRepository, MockUserRepository, RideRepositoryError,
};
use crate::domain::{ErrorCode, RideId, RideParts, RideStatus, User, UserDraft};

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn departure() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .expect("valid instant")
}

fn ride_at(id: u128, driver: &str, lat: f64, lon: f64, seats: u32, riders: usize) -> Ride {
    Ride::from_parts(RideParts {
        id: RideId::from_uuid(Uuid::from_u128(id)),
        driver_email: email(driver),
        origin: Coordinate::new(lat, lon).expect("valid origin"),
        destination: "Whitefield".into(),
        departure: departure(),
        seats_offered: seats,
        riders: (0..riders)
            .map(|n| email(&format!("rider{n}@example.com")))
            .collect(),
        status: RideStatus::Scheduled,
        vehicle_type: None,
    })
}

fn driver(raw: &str, address: &str) -> User {
    User::try_new(UserDraft {
        email: email(raw),
        first_name: "Dev".into(),
        last_name: "Rao".into(),
        mobile: "9000000000".into(),
        address: address.into(),
        home: Coordinate::new(13.0, 77.6).expect("valid home"),
        vehicles: Vec::new(),
    })
    .expect("valid driver")
}

#[fixture]
fn rider() -> Coordinate {
    Coordinate::new(12.9715987, 77.5945627).expect("valid rider")
}

fn ids(candidates: &[Candidate]) -> Vec<u128> {
    candidates
        .iter()
        .map(|candidate| candidate.ride.id().as_uuid().as_u128())
        .collect()
}

#[rstest]
fn nearest_of_reference_points_is_primary(rider: Coordinate) {
    let rides = vec![
        (ride_at(1, "a@example.com", 13.9715987, 79.5945627, 3, 0), None),
        (ride_at(2, "b@example.com", 11.9715987, 96.5945627, 3, 0), None),
        (ride_at(3, "c@example.com", 14.9715987, 77.5945627, 3, 0), None),
    ];

    let result = rank_candidates(rider, rides).expect("a match");

    assert_eq!(result.primary.ride.id().as_uuid().as_u128(), 3);
    assert!((result.primary.distance_km - 222.39).abs() < 0.1);
    assert!(result.nearby.is_empty());
}

#[rstest]
fn nearby_keeps_only_candidates_within_radius(rider: Coordinate) {
    let rides = vec![
        (ride_at(1, "a@example.com", 13.0, 77.62, 3, 0), None),
        (ride_at(2, "b@example.com", 13.9715987, 79.5945627, 3, 0), None),
        (ride_at(3, "c@example.com", 12.98, 77.60, 3, 0), None),
        (ride_at(4, "d@example.com", 12.99, 77.60, 3, 0), None),
    ];

    let ranked = rank_candidates(rider, rides)
        .expect("a match")
        .into_ranked();

    assert_eq!(ids(&ranked), vec![3, 4, 1]);
    assert!(ranked.iter().skip(1).all(|c| c.distance_km <= NEARBY_RADIUS_KM));
}

#[rstest]
fn equidistant_rides_break_ties_by_id(rider: Coordinate) {
    let rides = vec![
        (ride_at(9, "a@example.com", 12.98, 77.60, 3, 0), None),
        (ride_at(4, "b@example.com", 12.98, 77.60, 3, 0), None),
    ];

    let result = rank_candidates(rider, rides).expect("a match");

    assert_eq!(result.primary.ride.id().as_uuid().as_u128(), 4);
    assert_eq!(ids(&result.nearby), vec![9]);
}

#[rstest]
fn no_rides_rank_to_none(rider: Coordinate) {
    assert!(rank_candidates(rider, Vec::new()).is_none());
}

#[rstest]
fn window_is_inclusive_at_both_ends() {
    let window = MatchWindow::around(departure()).expect("in range");
    assert!(window.contains(departure() - Duration::minutes(60)));
    assert!(window.contains(departure() + Duration::minutes(60)));
    assert!(!window.contains(departure() - Duration::minutes(61)));
    assert!(!window.contains(departure() + Duration::seconds(3601)));
}

#[rstest]
fn window_rejects_instants_at_the_range_edge() {
    let err = MatchWindow::around(DateTime::<Utc>::MAX_UTC).expect_err("overflow");
    assert!(matches!(err, RideValidationError::DateOutOfRange { .. }));
}

fn matcher(rides: MockRideRepository, users: MockUserRepository) -> RideMatcher<MockRideRepository, MockUserRepository> {
    RideMatcher::new(Arc::new(rides), Arc::new(users))
}

#[rstest]
#[tokio::test]
async fn find_ride_builds_filter_and_annotates_driver_address(rider: Coordinate) {
    let mut rides = MockRideRepository::new();
    rides
        .expect_find_candidates()
        .withf(|filter| {
            filter.rider_email.as_ref() == "rider@example.com"
                && filter.destination == "Whitefield"
                && filter.window == MatchWindow::around(departure()).expect("in range")
        })
        .times(1)
        .return_once(|_| Ok(vec![ride_at(1, "driver@example.com", 12.98, 77.60, 2, 1)]));
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email.as_ref() == "driver@example.com")
        .times(1)
        .return_once(|_| Ok(Some(driver("driver@example.com", "Indiranagar"))));

    let result = matcher(rides, users)
        .find_ride(rider, &email("rider@example.com"), "Whitefield", departure())
        .await
        .expect("matching succeeds")
        .expect("a match");

    assert_eq!(result.primary.driver_address.as_deref(), Some("Indiranagar"));
    assert_eq!(result.primary.ride.origin(), Coordinate::new(12.98, 77.60).expect("valid"));
}

#[rstest]
#[tokio::test]
async fn find_ride_returns_none_when_every_candidate_is_full(rider: Coordinate) {
    let mut rides = MockRideRepository::new();
    rides.expect_find_candidates().return_once(|_| {
        Ok(vec![
            ride_at(1, "a@example.com", 12.98, 77.60, 2, 2),
            ride_at(2, "b@example.com", 12.99, 77.60, 1, 1),
        ])
    });
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().times(0);

    let result = matcher(rides, users)
        .find_ride(rider, &email("rider@example.com"), "Whitefield", departure())
        .await
        .expect("matching succeeds");

    assert!(result.is_none());
}

#[rstest]
#[tokio::test]
async fn find_ride_returns_none_without_candidates(rider: Coordinate) {
    let mut rides = MockRideRepository::new();
    rides.expect_find_candidates().return_once(|_| Ok(Vec::new()));

    let result = matcher(rides, MockUserRepository::new())
        .find_ride(rider, &email("rider@example.com"), "Nowhere", departure())
        .await
        .expect("matching succeeds");

    assert!(result.is_none());
}

#[rstest]
#[tokio::test]
async fn find_ride_skips_full_rides_and_tolerates_missing_drivers(rider: Coordinate) {
    let mut rides = MockRideRepository::new();
    rides.expect_find_candidates().return_once(|_| {
        Ok(vec![
            ride_at(1, "full@example.com", 12.9715987, 77.5945627, 1, 1),
            ride_at(2, "ghost@example.com", 12.99, 77.60, 3, 0),
        ])
    });
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email.as_ref() == "ghost@example.com")
        .times(1)
        .return_once(|_| Ok(None));

    let result = matcher(rides, users)
        .find_ride(rider, &email("rider@example.com"), "Whitefield", departure())
        .await
        .expect("matching succeeds")
        .expect("a match");

    assert_eq!(result.primary.ride.id().as_uuid().as_u128(), 2);
    assert!(result.primary.driver_address.is_none());
    assert!(result.nearby.is_empty());
}

#[rstest]
#[tokio::test]
async fn find_ride_looks_up_each_driver_once(rider: Coordinate) {
    let mut rides = MockRideRepository::new();
    rides.expect_find_candidates().return_once(|_| {
        Ok(vec![
            ride_at(1, "driver@example.com", 12.98, 77.60, 3, 0),
            ride_at(2, "driver@example.com", 12.99, 77.60, 3, 0),
        ])
    });
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(Some(driver("driver@example.com", "Koramangala"))));

    let ranked = matcher(rides, users)
        .find_ride(rider, &email("rider@example.com"), "Whitefield", departure())
        .await
        .expect("matching succeeds")
        .expect("a match")
        .into_ranked();

    assert_eq!(ids(&ranked), vec![1, 2]);
    assert!(ranked
        .iter()
        .all(|c| c.driver_address.as_deref() == Some("Koramangala")));
}

#[rstest]
#[tokio::test]
async fn find_ride_surfaces_store_outages(rider: Coordinate) {
    let mut rides = MockRideRepository::new();
    rides
        .expect_find_candidates()
        .return_once(|_| Err(RideRepositoryError::connection("pool exhausted")));

    let err = matcher(rides, MockUserRepository::new())
        .find_ride(rider, &email("rider@example.com"), "Whitefield", departure())
        .await
        .expect_err("store outage");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn find_ride_rejects_unrepresentable_windows(rider: Coordinate) {
    let mut rides = MockRideRepository::new();
    rides.expect_find_candidates().times(0);

    let err = matcher(rides, MockUserRepository::new())
        .find_ride(
            rider,
            &email("rider@example.com"),
            "Whitefield",
            DateTime::<Utc>::MIN_UTC,
        )
        .await
        .expect_err("window overflow");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
