//! End-to-end HTTP flow over the in-memory repositories: register users,
//! offer rides, match, join and complete.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use carpool::Trace;
use carpool::inbound::http::api_scope;
use carpool::inbound::http::state::HttpState;
use carpool::outbound::memory::{InMemoryRideRepository, InMemoryUserRepository};

const DESTINATION: &str = "Airport";
const DEPARTURE: &str = "2024-03-01T08:30:00.000000Z";

fn user_body(email: &str, latitude: f64, longitude: f64) -> Value {
    json!({
        "email": email,
        "firstName": "Test",
        "lastName": "User",
        "mobile": "+91 98450 00000",
        "address": format!("{email} home"),
        "latitude": latitude.to_string(),
        "longitude": longitude,
        "vehicles": [{ "type": "hatchback", "seatsOffered": 3 }]
    })
}

async fn send<S>(app: &S, request: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(app, request).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

async fn register<S>(app: &S, email: &str, latitude: f64, longitude: f64)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(user_body(email, latitude, longitude))
        .to_request();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "registering {email}");
}

async fn offer<S>(app: &S, driver: &str, seats: u32) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/rides")
        .set_json(json!({
            "driverEmail": driver,
            "destination": DESTINATION,
            "date": DEPARTURE,
            "seatsOffered": seats,
        }))
        .to_request();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "offering ride for {driver}");
    body["id"].as_str().expect("ride id").to_owned()
}

async fn find<S>(app: &S, rider: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/rides/find/{rider}/{DESTINATION}/2024-03-01T08:00:00Z"
        ))
        .to_request();
    send(app, request).await
}

async fn join<S>(app: &S, ride_id: &str, rider: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/rides/join")
        .set_json(json!({ "rideId": ride_id, "riderEmail": rider }))
        .to_request();
    send(app, request).await
}

async fn set_status<S>(app: &S, ride_id: &str, status: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::put()
        .uri("/api/v1/rides/status")
        .set_json(json!({ "rideId": ride_id, "status": status }))
        .to_request();
    send(app, request).await
}

fn ride_ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .expect("array of candidates")
        .iter()
        .map(|candidate| candidate["id"].as_str().expect("id"))
        .collect()
}

#[actix_web::test]
async fn riders_find_join_and_complete_rides() {
    let state = HttpState::from_repositories(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryRideRepository::new()),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await;

    register(&app, "near@example.com", 12.9715987, 77.5945627).await;
    register(&app, "close@example.com", 12.99, 77.60).await;
    register(&app, "far@example.com", 12.2958104, 76.6393805).await;
    register(&app, "rider@example.com", 12.9716, 77.5946).await;
    register(&app, "late@example.com", 12.9716, 77.5946).await;

    let near = offer(&app, "near@example.com", 1).await;
    let close = offer(&app, "close@example.com", 2).await;
    let far = offer(&app, "far@example.com", 2).await;

    // Nearest first; rides further than 5 km only ever appear as primary.
    let (status, list) = find(&app, "rider@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ride_ids(&list), vec![near.as_str(), close.as_str()]);
    assert!(!ride_ids(&list).contains(&far.as_str()));
    assert!(list[0]["distanceKm"].as_f64().expect("distance") < 0.1);
    assert_eq!(list[0]["driverAddress"], json!("near@example.com home"));

    let (status, body) = join(&app, &near, "rider@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modifiedCount"], json!(1));
    assert_eq!(body["ride"]["availableSeats"], json!(0));

    // The only seat is taken.
    let (status, body) = join(&app, &near, "late@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("conflict"));

    let (status, list) = find(&app, "late@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ride_ids(&list).first().copied(), Some(close.as_str()));

    let (status, rides) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/rides/rider@example.com/scheduled")
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rides[0]["id"], json!(near));
    assert_eq!(rides[0]["isRider"], json!(true));

    for _ in 0..2 {
        let (status, body) = set_status(&app, &near, "completed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["modifiedCount"], json!(1));
    }
    let (status, _) = set_status(&app, &near, "scheduled").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, completed) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/rides/near@example.com/completed")
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed[0]["isRider"], json!(false));
}

#[actix_web::test]
async fn unknown_rides_and_riders_are_not_found() {
    let state = HttpState::from_repositories(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryRideRepository::new()),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await;

    let missing = "7d0f3a2e-5b1c-4a8e-9f6d-2c3b4a5d6e7f";
    let (status, body) = join(&app, missing, "rider@example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Ride not found"));

    let (status, _) = set_status(&app, missing, "cancelled").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = find(&app, "ghost@example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["traceId"].is_string());

    register(&app, "rider@example.com", 12.9716, 77.5946).await;
    let (status, body) = find(&app, "rider@example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("not_found"));
}
