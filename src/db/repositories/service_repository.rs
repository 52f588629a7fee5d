use sqlx::PgPool;
use uuid::Uuid;

use crate::db::error::DatabaseError;
use crate::db::models::{NewService, Service, UpdateServicePayload};

pub struct ServiceRepository;

impl ServiceRepository {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Service>, DatabaseError> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, title, duration_minutes, price, created_at, updated_at
            FROM services
            ORDER BY created_at
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(services)
    }

    pub async fn create(pool: &PgPool, new_service: &NewService) -> Result<Service, DatabaseError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (title, duration_minutes, price)
            VALUES ($1, $2, $3)
            RETURNING id, title, duration_minutes, price, created_at, updated_at
            "#,
        )
        .bind(&new_service.title)
        .bind(new_service.duration_minutes)
        .bind(new_service.price)
        .fetch_one(pool)
        .await?;

        Ok(service)
    }

    pub async fn update(
        pool: &PgPool,
        service_id: Uuid,
        update: &UpdateServicePayload,
    ) -> Result<Service, DatabaseError> {
        sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET
                title = COALESCE($1, title),
                duration_minutes = COALESCE($2, duration_minutes),
                price = COALESCE($3, price),
                updated_at = NOW()
            WHERE id = $4
            RETURNING id, title, duration_minutes, price, created_at, updated_at
            "#,
        )
        .bind(&update.title)
        .bind(update.duration_minutes)
        .bind(update.price)
        .bind(service_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DatabaseError::NotFound)
    }

    pub async fn delete(pool: &PgPool, service_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(service_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
