//! Assistant shift repository

use chrono::NaiveDate;
use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::appointments::user_summary_from_prefixed_row;
use crate::{
    models::{AssistantShift, Clinic, CreateShiftDto, ShiftDetail, UpdateShiftDto},
    Error, Result,
};

const DETAIL_SELECT: &str = r#"
    SELECT
        s.id, s.assistant_id, s.date, s.start_time, s.end_time, s.clinic_id,
        s.associated_resources, s.status, s.notes, s.created_at, s.updated_at,
        a.id AS assistant_user_id, a.full_name AS assistant_full_name, a.email AS assistant_email,
        a.phone_number AS assistant_phone_number, a.avatar AS assistant_avatar,
        a.specialty AS assistant_specialty, a.date_of_birth AS assistant_date_of_birth,
        a.gender AS assistant_gender, a.created_at AS assistant_created_at,
        c.id AS c_id, c.name AS c_name, c.address AS c_address, c.phone AS c_phone,
        c.email AS c_email, c.logo AS c_logo, c.description AS c_description,
        c.operating_hours AS c_operating_hours, c.created_at AS c_created_at,
        c.updated_at AS c_updated_at
    FROM assistant_shifts s
    LEFT JOIN users a ON a.id = s.assistant_id
    LEFT JOIN clinics c ON c.id = s.clinic_id
"#;

fn clinic_from_row(row: &PgRow) -> std::result::Result<Option<Clinic>, sqlx::Error> {
    use sqlx::Row;
    let id: Option<Uuid> = row.try_get("c_id")?;
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(Clinic {
        id,
        name: row.try_get("c_name")?,
        address: row.try_get("c_address")?,
        phone: row.try_get("c_phone")?,
        email: row.try_get("c_email")?,
        logo: row.try_get("c_logo")?,
        description: row.try_get("c_description")?,
        operating_hours: row.try_get("c_operating_hours")?,
        created_at: row.try_get("c_created_at")?,
        updated_at: row.try_get("c_updated_at")?,
    }))
}

fn detail_from_row(row: &PgRow) -> std::result::Result<ShiftDetail, sqlx::Error> {
    let clinic = clinic_from_row(row)?;
    let clinic_location = clinic
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "Unknown Location".to_string());
    Ok(ShiftDetail {
        shift: AssistantShift::from_row(row)?,
        assistant: user_summary_from_prefixed_row(row, "assistant")?,
        clinic_location,
        clinic,
    })
}

#[derive(Debug, Clone, Default)]
pub struct ShiftFilter {
    pub assistant_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Matches the clinic name or address.
    pub clinic_location: Option<String>,
}

#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, assistant_id: Uuid, dto: &CreateShiftDto) -> Result<AssistantShift> {
        let shift = sqlx::query_as::<_, AssistantShift>(
            r#"
            INSERT INTO assistant_shifts
                (assistant_id, date, start_time, end_time, clinic_id,
                 associated_resources, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'scheduled'), $8)
            RETURNING *
            "#,
        )
        .bind(assistant_id)
        .bind(dto.date)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(dto.clinic_id)
        .bind(&dto.associated_resources)
        .bind(dto.status)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(shift)
    }

    pub async fn find_by_id_detailed(&self, id: Uuid) -> Result<Option<ShiftDetail>> {
        let row = sqlx::query(&format!("{DETAIL_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref()
            .map(|row| detail_from_row(row).map_err(Error::from))
            .transpose()
    }

    pub async fn find_detailed(&self, filter: &ShiftFilter) -> Result<Vec<ShiftDetail>> {
        let mut builder = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        builder.push(" WHERE 1=1");
        if let Some(assistant_id) = filter.assistant_id {
            builder.push(" AND s.assistant_id = ").push_bind(assistant_id);
        }
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            builder
                .push(" AND s.date >= ")
                .push_bind(start)
                .push(" AND s.date <= ")
                .push_bind(end);
        }
        if let Some(location) = &filter.clinic_location {
            builder
                .push(" AND (c.name = ")
                .push_bind(location.clone())
                .push(" OR c.address = ")
                .push_bind(location.clone())
                .push(")");
        }
        builder.push(" ORDER BY s.date ASC, s.start_time ASC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| detail_from_row(row).map_err(Error::from))
            .collect()
    }

    pub async fn update(&self, id: Uuid, dto: &UpdateShiftDto) -> Result<Option<AssistantShift>> {
        let shift = sqlx::query_as::<_, AssistantShift>(
            r#"
            UPDATE assistant_shifts SET
                date = COALESCE($2, date),
                start_time = COALESCE($3, start_time),
                end_time = COALESCE($4, end_time),
                clinic_id = COALESCE($5, clinic_id),
                associated_resources = COALESCE($6, associated_resources),
                status = COALESCE($7, status),
                notes = COALESCE($8, notes),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.date)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(dto.clinic_id)
        .bind(&dto.associated_resources)
        .bind(dto.status)
        .bind(&dto.notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(shift)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM assistant_shifts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
