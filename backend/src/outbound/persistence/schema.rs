//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Registered users keyed by email.
    users (email) {
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        mobile -> Varchar,
        address -> Text,
        /// Home latitude in degrees.
        latitude -> Float8,
        /// Home longitude in degrees.
        longitude -> Float8,
        /// JSON array of `{ "type": ..., "seatsOffered": ... }` objects.
        vehicles -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rides offered by drivers.
    ///
    /// `latitude`/`longitude` hold the origin copied from the driver's home
    /// when the ride was offered.
    rides (id) {
        id -> Uuid,
        driver_email -> Varchar,
        latitude -> Float8,
        longitude -> Float8,
        destination -> Text,
        departure -> Timestamptz,
        seats_offered -> Int4,
        /// Rider emails in join order.
        riders -> Array<Text>,
        /// One of `scheduled`, `completed`, `cancelled`.
        status -> Varchar,
        vehicle_type -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}
