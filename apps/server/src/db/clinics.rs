//! Clinic repository

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    models::{Clinic, ClinicSummary, CreateClinicDto, UpdateClinicDto},
    Result,
};

#[derive(Clone)]
pub struct ClinicRepository {
    pool: PgPool,
}

impl ClinicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, dto: &CreateClinicDto) -> Result<Clinic> {
        let clinic = sqlx::query_as::<_, Clinic>(
            r#"
            INSERT INTO clinics (name, address, phone, email, logo, description, operating_hours)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.address)
        .bind(&dto.phone)
        .bind(&dto.email)
        .bind(&dto.logo)
        .bind(&dto.description)
        .bind(dto.operating_hours.as_ref().map(sqlx::types::Json))
        .fetch_one(&self.pool)
        .await?;
        Ok(clinic)
    }

    pub async fn find_all(&self) -> Result<Vec<Clinic>> {
        let clinics =
            sqlx::query_as::<_, Clinic>("SELECT * FROM clinics ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(clinics)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Clinic>> {
        let clinic = sqlx::query_as::<_, Clinic>("SELECT * FROM clinics WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(clinic)
    }

    pub async fn summaries_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ClinicSummary>> {
        let summaries = sqlx::query_as::<_, ClinicSummary>(
            "SELECT id, name, address FROM clinics WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }

    pub async fn update(&self, id: Uuid, dto: &UpdateClinicDto) -> Result<Option<Clinic>> {
        let clinic = sqlx::query_as::<_, Clinic>(
            r#"
            UPDATE clinics SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                logo = COALESCE($6, logo),
                description = COALESCE($7, description),
                operating_hours = COALESCE($8, operating_hours),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.address)
        .bind(&dto.phone)
        .bind(&dto.email)
        .bind(&dto.logo)
        .bind(&dto.description)
        .bind(dto.operating_hours.as_ref().map(sqlx::types::Json))
        .fetch_optional(&self.pool)
        .await?;
        Ok(clinic)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clinics WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clinics")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Admin clinic listing with ILIKE search over name/address.
    pub async fn search_page(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Clinic>, i64)> {
        fn apply_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, search: Option<&'a str>) {
            if let Some(search) = search {
                let pattern = format!("%{search}%");
                builder
                    .push(" AND (name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR address ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
        }

        let mut count_builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM clinics WHERE 1=1");
        apply_filters(&mut count_builder, search);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM clinics WHERE 1=1");
        apply_filters(&mut builder, search);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let clinics = builder
            .build_query_as::<Clinic>()
            .fetch_all(&self.pool)
            .await?;

        Ok((clinics, total))
    }

    /// Doctors attached to each of the given clinics.
    pub async fn doctor_counts(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>> {
        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            r#"
            SELECT clinic_id, COUNT(*) FROM users
            WHERE role = 'doctor' AND clinic_id = ANY($1)
            GROUP BY clinic_id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn doctors_of(&self, clinic_id: Uuid) -> Result<Vec<crate::models::UserSummary>> {
        let doctors = sqlx::query_as::<_, crate::models::UserSummary>(
            r#"
            SELECT id, full_name, email, phone_number, avatar, specialty,
                   date_of_birth, gender, created_at
            FROM users
            WHERE role = 'doctor' AND clinic_id = $1
            ORDER BY full_name
            "#,
        )
        .bind(clinic_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(doctors)
    }
}
