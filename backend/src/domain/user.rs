//! User profiles: identity, contact details, home location and vehicles.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::Coordinate;

/// Validation errors raised while building users and their parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmptyField { field: &'static str },
    EmptyVehicleType,
}

impl UserValidationError {
    /// Field name used in validation payloads.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyField { field } => field,
            Self::EmptyVehicleType => "vehicleType",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::EmptyVehicleType => write!(f, "vehicle type must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address identifying a user.
///
/// Surrounding whitespace is trimmed; case is preserved so that lookups
/// match exactly what the user registered with.
///
/// # Examples
/// ```
/// use carpool::domain::Email;
///
/// let email = Email::new(" driver@example.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "driver@example.com");
/// assert!(Email::new("nobody").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vehicle a user can drive, with the seats it offers to riders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    vehicle_type: String,
    seats_offered: u32,
}

impl Vehicle {
    pub fn new(
        vehicle_type: impl Into<String>,
        seats_offered: u32,
    ) -> Result<Self, UserValidationError> {
        let vehicle_type = vehicle_type.into();
        if vehicle_type.trim().is_empty() {
            return Err(UserValidationError::EmptyVehicleType);
        }
        Ok(Self {
            vehicle_type,
            seats_offered,
        })
    }

    pub fn vehicle_type(&self) -> &str {
        &self.vehicle_type
    }

    pub fn seats_offered(&self) -> u32 {
        self.seats_offered
    }
}

/// Unvalidated user input, checked by [`User::try_new`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub address: String,
    pub home: Coordinate,
    pub vehicles: Vec<Vehicle>,
}

/// Registered carpool participant.
///
/// ## Invariants
/// - `first_name` and `mobile` are non-empty once trimmed.
/// - `home` is the origin copied onto every ride the user offers.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    email: Email,
    first_name: String,
    last_name: String,
    mobile: String,
    address: String,
    home: Coordinate,
    vehicles: Vec<Vehicle>,
}

fn require(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::EmptyField { field });
    }
    Ok(())
}

impl User {
    /// Validate a draft into a user.
    ///
    /// # Examples
    /// ```
    /// use carpool::domain::{Coordinate, Email, User, UserDraft};
    ///
    /// let user = User::try_new(UserDraft {
    ///     email: Email::new("ana@example.com").expect("email"),
    ///     first_name: "Ana".into(),
    ///     last_name: "Silva".into(),
    ///     mobile: "+351 900 000 000".into(),
    ///     address: "Rua Augusta 1, Lisboa".into(),
    ///     home: Coordinate::new(38.71, -9.14).expect("coordinate"),
    ///     vehicles: Vec::new(),
    /// })
    /// .expect("valid user");
    /// assert_eq!(user.first_name(), "Ana");
    /// ```
    pub fn try_new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let UserDraft {
            email,
            first_name,
            last_name,
            mobile,
            address,
            home,
            vehicles,
        } = draft;
        require("firstName", &first_name)?;
        require("mobile", &mobile)?;
        Ok(Self {
            email,
            first_name,
            last_name,
            mobile,
            address,
            home,
            vehicles,
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn home(&self) -> Coordinate {
        self.home
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }
}
