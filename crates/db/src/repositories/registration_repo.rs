//! Repository for the `registrations` table.

use sqlx::PgPool;
use touchline_core::types::{DbId, RegistrationId};
use uuid::Uuid;

use crate::models::registration::{CreateRegistration, Registration, UpdateRegistration};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, parent_id, first_name, last_name, dob, gender, position, jersey_size, \
    medical_notes, birth_cert_path, photo_url, waiver_signed_at, waiver_signature, \
    status, payment_status, stripe_subscription_id, coach_id, age_group, \
    manual_parent_name, manual_phone, created_at, updated_at";

/// Provides CRUD and settlement operations for registrations.
pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Insert a new registration, returning the created row.
    ///
    /// The id is generated application-side so callers can correlate it with
    /// the checkout session they create next.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRegistration,
    ) -> Result<Registration, sqlx::Error> {
        let query = format!(
            "INSERT INTO registrations (id, parent_id, first_name, last_name, dob, gender, \
                 position, jersey_size, medical_notes, birth_cert_path, photo_url, \
                 waiver_signed_at, waiver_signature, status, payment_status, age_group, \
                 manual_parent_name, manual_phone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(Uuid::new_v4())
            .bind(input.parent_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.dob)
            .bind(&input.gender)
            .bind(&input.position)
            .bind(&input.jersey_size)
            .bind(&input.medical_notes)
            .bind(&input.birth_cert_path)
            .bind(&input.photo_url)
            .bind(input.waiver_signed_at)
            .bind(&input.waiver_signature)
            .bind(&input.status)
            .bind(&input.payment_status)
            .bind(&input.age_group)
            .bind(&input.manual_parent_name)
            .bind(&input.manual_phone)
            .fetch_one(pool)
            .await
    }

    /// Find a registration by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: RegistrationId,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registrations WHERE id = $1");
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all registrations, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Registration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM registrations ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List registrations submitted by one guardian, newest first.
    pub async fn list_for_parent(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<Registration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM registrations WHERE parent_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Count all registration rows. Used by tests and dashboard widgets.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
            .fetch_one(pool)
            .await
    }

    /// Apply a staff edit of cosmetic fields. Only non-`None` fields are
    /// applied. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: RegistrationId,
        input: &UpdateRegistration,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!(
            "UPDATE registrations SET \
                 first_name = COALESCE($2, first_name), \
                 last_name = COALESCE($3, last_name), \
                 dob = COALESCE($4, dob), \
                 gender = COALESCE($5, gender), \
                 position = COALESCE($6, position), \
                 jersey_size = COALESCE($7, jersey_size), \
                 medical_notes = COALESCE($8, medical_notes), \
                 photo_url = COALESCE($9, photo_url), \
                 age_group = COALESCE($10, age_group), \
                 manual_parent_name = COALESCE($11, manual_parent_name), \
                 manual_phone = COALESCE($12, manual_phone), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.dob)
            .bind(&input.gender)
            .bind(&input.position)
            .bind(&input.jersey_size)
            .bind(&input.medical_notes)
            .bind(&input.photo_url)
            .bind(&input.age_group)
            .bind(&input.manual_parent_name)
            .bind(&input.manual_phone)
            .fetch_optional(pool)
            .await
    }

    /// Settle a registration: set `status = active`, `payment_status = paid`
    /// and store the processor's subscription id, all in one single-row
    /// update so the paid-implies-active invariant cannot be observed
    /// half-applied.
    ///
    /// The update matches on id alone (no status guard), so re-applying the
    /// same settlement writes the same values again -- naturally idempotent
    /// for this row.
    pub async fn mark_settled(
        pool: &PgPool,
        id: RegistrationId,
        subscription_id: Option<&str>,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!(
            "UPDATE registrations SET \
                 status = 'active', \
                 payment_status = 'paid', \
                 stripe_subscription_id = $2, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .bind(subscription_id)
            .fetch_optional(pool)
            .await
    }

    /// Staff approval: activate without payment. Returns `None` if the row
    /// does not exist.
    pub async fn approve(
        pool: &PgPool,
        id: RegistrationId,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!(
            "UPDATE registrations SET status = 'active', updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Assign (or clear) the responsible coach.
    pub async fn assign_coach(
        pool: &PgPool,
        id: RegistrationId,
        coach_id: Option<DbId>,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!(
            "UPDATE registrations SET coach_id = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .bind(coach_id)
            .fetch_optional(pool)
            .await
    }

    /// Staff override of the payment status (e.g. recording an offline
    /// payment). The value must already be validated against the closed set.
    pub async fn set_payment_status(
        pool: &PgPool,
        id: RegistrationId,
        payment_status: &str,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!(
            "UPDATE registrations SET payment_status = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .bind(payment_status)
            .fetch_optional(pool)
            .await
    }
}
