//! PostgreSQL implementation of MembershipRepository.
//!
//! Provides persistent storage for memberships and their billing periods.
//! Periods are removed with their membership by the `ON DELETE CASCADE`
//! foreign key.

use crate::domain::foundation::{
    DomainError, ErrorCode, MembershipId, MembershipPeriodId, Timestamp,
};
use crate::domain::membership::{
    BillingInterval, Membership, MembershipChanges, MembershipPeriod, MembershipState,
    NewMembership, NewMembershipPeriod, PaymentMethod,
};
use crate::ports::MembershipRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the MembershipRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    /// Creates a new PostgresMembershipRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MEMBERSHIP_COLUMNS: &str = "id, uuid, name, user_id, recurring_price, valid_from, \
     valid_until, state, assigned_by, payment_method, billing_interval, billing_periods";

const PERIOD_COLUMNS: &str = "id, uuid, membership_id, period_start, period_end, state";

/// Database row representation of a membership.
#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    id: i32,
    uuid: Uuid,
    name: String,
    user_id: i32,
    recurring_price: Decimal,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    state: String,
    assigned_by: String,
    payment_method: Option<String>,
    billing_interval: String,
    billing_periods: i32,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = DomainError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Membership {
            id: MembershipId::new(row.id),
            uuid: row.uuid,
            name: row.name,
            user_id: row.user_id,
            recurring_price: row.recurring_price,
            valid_from: Timestamp::from_datetime(row.valid_from),
            valid_until: Timestamp::from_datetime(row.valid_until),
            state: parse_state(&row.state)?,
            assigned_by: row.assigned_by,
            payment_method: row.payment_method.as_deref().map(parse_payment_method).transpose()?,
            billing_interval: parse_billing_interval(&row.billing_interval)?,
            billing_periods: row.billing_periods,
        })
    }
}

/// Database row representation of a membership period.
#[derive(Debug, sqlx::FromRow)]
struct PeriodRow {
    id: i32,
    uuid: Uuid,
    membership_id: i32,
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
    state: String,
}

impl From<PeriodRow> for MembershipPeriod {
    fn from(row: PeriodRow) -> Self {
        MembershipPeriod {
            id: MembershipPeriodId::new(row.id),
            uuid: row.uuid,
            membership_id: MembershipId::new(row.membership_id),
            start: Timestamp::from_datetime(row.period_start),
            end: Timestamp::from_datetime(row.period_end),
            state: row.state,
        }
    }
}

fn invalid_stored(field: &str, value: &str) -> DomainError {
    DomainError::new(
        ErrorCode::InvalidStoredValue,
        format!("Invalid {} value: {}", field, value),
    )
}

fn parse_state(s: &str) -> Result<MembershipState, DomainError> {
    s.to_lowercase()
        .parse()
        .map_err(|_| invalid_stored("state", s))
}

fn parse_payment_method(s: &str) -> Result<PaymentMethod, DomainError> {
    s.to_lowercase()
        .parse()
        .map_err(|_| invalid_stored("payment_method", s))
}

fn parse_billing_interval(s: &str) -> Result<BillingInterval, DomainError> {
    s.to_lowercase()
        .parse()
        .map_err(|_| invalid_stored("billing_interval", s))
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn list_memberships(&self) -> Result<Vec<Membership>, DomainError> {
        let rows: Vec<MembershipRow> = sqlx::query_as(&format!(
            "SELECT {} FROM memberships ORDER BY id ASC",
            MEMBERSHIP_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list memberships: {}", e)))?;

        rows.into_iter().map(Membership::try_from).collect()
    }

    async fn get_membership(&self, id: MembershipId) -> Result<Option<Membership>, DomainError> {
        let row: Option<MembershipRow> = sqlx::query_as(&format!(
            "SELECT {} FROM memberships WHERE id = $1",
            MEMBERSHIP_COLUMNS
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find membership: {}", e)))?;

        row.map(Membership::try_from).transpose()
    }

    async fn create_membership(
        &self,
        membership: &NewMembership,
    ) -> Result<Membership, DomainError> {
        let row: MembershipRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO memberships (
                uuid, name, user_id, recurring_price, valid_from, valid_until, state,
                assigned_by, payment_method, billing_interval, billing_periods
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            MEMBERSHIP_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&membership.name)
        .bind(membership.user_id)
        .bind(membership.recurring_price)
        .bind(membership.valid_from.as_datetime())
        .bind(membership.valid_until.as_datetime())
        .bind(membership.state.as_str())
        .bind(&membership.assigned_by)
        .bind(membership.payment_method.map(|m| m.as_str()))
        .bind(membership.billing_interval.as_str())
        .bind(membership.billing_periods)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save membership: {}", e)))?;

        Membership::try_from(row)
    }

    async fn update_membership(
        &self,
        id: MembershipId,
        changes: &MembershipChanges,
    ) -> Result<Option<Membership>, DomainError> {
        // $9 distinguishes "leave payment_method alone" from "clear it".
        let row: Option<MembershipRow> = sqlx::query_as(&format!(
            r#"
            UPDATE memberships SET
                name = COALESCE($2, name),
                user_id = COALESCE($3, user_id),
                recurring_price = COALESCE($4, recurring_price),
                valid_from = COALESCE($5, valid_from),
                valid_until = COALESCE($6, valid_until),
                state = COALESCE($7, state),
                assigned_by = COALESCE($8, assigned_by),
                payment_method = CASE WHEN $9 THEN $10 ELSE payment_method END,
                billing_interval = COALESCE($11, billing_interval),
                billing_periods = COALESCE($12, billing_periods)
            WHERE id = $1
            RETURNING {}
            "#,
            MEMBERSHIP_COLUMNS
        ))
        .bind(id.as_i32())
        .bind(changes.name.as_deref())
        .bind(changes.user_id)
        .bind(changes.recurring_price)
        .bind(changes.valid_from.map(|t| *t.as_datetime()))
        .bind(changes.valid_until.map(|t| *t.as_datetime()))
        .bind(changes.state.map(|s| s.as_str()))
        .bind(changes.assigned_by.as_deref())
        .bind(changes.payment_method.is_some())
        .bind(changes.payment_method.flatten().map(|m| m.as_str()))
        .bind(changes.billing_interval.map(|i| i.as_str()))
        .bind(changes.billing_periods)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update membership: {}", e)))?;

        row.map(Membership::try_from).transpose()
    }

    async fn delete_membership(&self, id: MembershipId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM memberships WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete membership: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_periods(
        &self,
        membership_id: MembershipId,
    ) -> Result<Vec<MembershipPeriod>, DomainError> {
        let rows: Vec<PeriodRow> = sqlx::query_as(&format!(
            "SELECT {} FROM membership_periods WHERE membership_id = $1 ORDER BY period_start ASC",
            PERIOD_COLUMNS
        ))
        .bind(membership_id.as_i32())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to list membership periods: {}", e))
        })?;

        Ok(rows.into_iter().map(MembershipPeriod::from).collect())
    }

    async fn create_period(
        &self,
        period: &NewMembershipPeriod,
    ) -> Result<MembershipPeriod, DomainError> {
        let row: PeriodRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO membership_periods (uuid, membership_id, period_start, period_end, state)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            PERIOD_COLUMNS
        ))
        .bind(period.uuid)
        .bind(period.membership_id.as_i32())
        .bind(period.start.as_datetime())
        .bind(period.end.as_datetime())
        .bind(&period.state)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return DomainError::new(
                        ErrorCode::ConstraintViolation,
                        format!("Membership {} does not exist", period.membership_id),
                    );
                }
            }
            DomainError::database(format!("Failed to save membership period: {}", e))
        })?;

        Ok(MembershipPeriod::from(row))
    }
}
