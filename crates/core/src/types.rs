/// Internal tables (users, sessions, games, events) use PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Registrations and players are keyed by UUID: the registration id travels
/// through the payment processor as the checkout `client_reference_id`, so
/// the key must not be guessable or enumerable.
pub type RegistrationId = uuid::Uuid;

/// Player roster records share the UUID key shape of their source registration.
pub type PlayerId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
