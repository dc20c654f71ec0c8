use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{
    Application, ApplicationStatus, Category, NewApplication, NewOpportunity, Opportunity,
};

#[derive(Debug, FromRow)]
struct OpportunityRow {
    id: Uuid,
    title: String,
    ngo: String,
    description: String,
    long_description: String,
    location: String,
    event_date: String,
    time_commitment: String,
    category: String,
    image_url: String,
    image_hint: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OpportunityRow> for Opportunity {
    type Error = StoreError;

    fn try_from(row: OpportunityRow) -> Result<Self, Self::Error> {
        let category = Category::parse(&row.category).ok_or_else(|| {
            StoreError::Corrupt(format!(
                "opportunity {} has unknown category '{}'",
                row.id, row.category
            ))
        })?;
        Ok(Opportunity {
            id: row.id,
            title: row.title,
            ngo: row.ngo,
            description: row.description,
            long_description: row.long_description,
            location: row.location,
            date: row.event_date,
            time_commitment: row.time_commitment,
            category,
            image_url: row.image_url,
            image_hint: row.image_hint,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: Uuid,
    volunteer_name: String,
    volunteer_email: String,
    status: String,
    applied_date: DateTime<Utc>,
    opportunity_id: Uuid,
    opportunity_title: String,
    opportunity_ngo: String,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = StoreError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = ApplicationStatus::parse(&row.status).ok_or_else(|| {
            StoreError::Corrupt(format!(
                "application {} has unknown status '{}'",
                row.id, row.status
            ))
        })?;
        Ok(Application {
            id: row.id,
            volunteer_name: row.volunteer_name,
            volunteer_email: row.volunteer_email,
            status,
            applied_date: row.applied_date,
            opportunity_id: row.opportunity_id,
            opportunity_title: row.opportunity_title,
            opportunity_ngo: row.opportunity_ngo,
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn is_available(&self) -> bool {
        !self.pool.is_closed() && sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn list_opportunities(&self) -> Result<Vec<Opportunity>, StoreError> {
        let rows = sqlx::query_as::<_, OpportunityRow>(
            "SELECT * FROM opportunities ORDER BY event_date DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn get_opportunity(&self, id: Uuid) -> Result<Option<Opportunity>, StoreError> {
        sqlx::query_as::<_, OpportunityRow>("SELECT * FROM opportunities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Opportunity::try_from)
            .transpose()
    }

    async fn create_opportunity(
        &self,
        id: Uuid,
        new: NewOpportunity,
    ) -> Result<Opportunity, StoreError> {
        let row = sqlx::query_as::<_, OpportunityRow>(
            r#"
            INSERT INTO opportunities
                (id, title, ngo, description, long_description, location,
                 event_date, time_commitment, category, image_url, image_hint)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&new.title)
        .bind(&new.ngo)
        .bind(&new.description)
        .bind(&new.long_description)
        .bind(&new.location)
        .bind(&new.date)
        .bind(&new.time_commitment)
        .bind(new.category.as_str())
        .bind(&new.image_url)
        .bind(&new.image_hint)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted opportunity {id}");
        row.try_into()
    }

    async fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications ORDER BY applied_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn applications_for_opportunity(
        &self,
        opportunity_id: Uuid,
    ) -> Result<Vec<Application>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE opportunity_id = $1 ORDER BY applied_date DESC",
        )
        .bind(opportunity_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn applications_by_email(&self, email: &str) -> Result<Vec<Application>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE volunteer_email = $1 ORDER BY applied_date DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn create_application(&self, new: NewApplication) -> Result<Application, StoreError> {
        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications
                (id, volunteer_name, volunteer_email, status,
                 opportunity_id, opportunity_title, opportunity_ngo)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&new.volunteer_name)
        .bind(&new.volunteer_email)
        .bind(ApplicationStatus::Pending.as_str())
        .bind(new.opportunity_id)
        .bind(&new.opportunity_title)
        .bind(&new.opportunity_ngo)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Inserted application {id} for opportunity {}",
            new.opportunity_id
        );
        row.try_into()
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        // The WHERE clause is the state machine: only Pending rows move, and
        // re-applying the current status matches as a no-op.
        let updated = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications
            SET status = $1
            WHERE id = $2 AND (status = 'Pending' OR status = $1)
            RETURNING *
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = updated {
            return row.try_into();
        }

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match current.as_deref().map(ApplicationStatus::parse) {
            None => Err(StoreError::NotFound {
                entity: "application",
                id,
            }),
            Some(Some(from)) => Err(StoreError::IllegalTransition { from, to: status }),
            Some(None) => Err(StoreError::Corrupt(format!(
                "application {id} has unknown status"
            ))),
        }
    }
}
