//! Lab result repository

use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use super::appointments::user_summary_from_prefixed_row;
use crate::{
    models::{CreateLabResultDto, LabResult, LabResultDetail, UpdateLabResultDto},
    Error, Result,
};

const DETAIL_SELECT: &str = r#"
    SELECT
        l.id, l.patient_id, l.doctor_id, l.test_name, l.test_date, l.results,
        l.doctor_notes, l.created_at, l.updated_at,
        p.id AS patient_user_id, p.full_name AS patient_full_name, p.email AS patient_email,
        p.phone_number AS patient_phone_number, p.avatar AS patient_avatar,
        p.specialty AS patient_specialty, p.date_of_birth AS patient_date_of_birth,
        p.gender AS patient_gender, p.created_at AS patient_created_at,
        d.id AS doctor_user_id, d.full_name AS doctor_full_name, d.email AS doctor_email,
        d.phone_number AS doctor_phone_number, d.avatar AS doctor_avatar,
        d.specialty AS doctor_specialty, d.date_of_birth AS doctor_date_of_birth,
        d.gender AS doctor_gender, d.created_at AS doctor_created_at
    FROM lab_results l
    LEFT JOIN users p ON p.id = l.patient_id
    LEFT JOIN users d ON d.id = l.doctor_id
"#;

fn detail_from_row(row: &PgRow) -> std::result::Result<LabResultDetail, sqlx::Error> {
    Ok(LabResultDetail {
        result: LabResult::from_row(row)?,
        patient: user_summary_from_prefixed_row(row, "patient")?,
        doctor: user_summary_from_prefixed_row(row, "doctor")?,
    })
}

#[derive(Clone)]
pub struct LabResultRepository {
    pool: PgPool,
}

impl LabResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        dto: &CreateLabResultDto,
    ) -> Result<LabResult> {
        let result = sqlx::query_as::<_, LabResult>(
            r#"
            INSERT INTO lab_results
                (patient_id, doctor_id, test_name, test_date, results, doctor_notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(patient_id)
        .bind(doctor_id)
        .bind(&dto.test_name)
        .bind(dto.test_date)
        .bind(sqlx::types::Json(&dto.results))
        .bind(&dto.doctor_notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(result)
    }

    pub async fn find_all_detailed(&self) -> Result<Vec<LabResultDetail>> {
        let rows = sqlx::query(&format!("{DETAIL_SELECT} ORDER BY l.test_date DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| detail_from_row(row).map_err(Error::from))
            .collect()
    }

    pub async fn find_by_id_detailed(&self, id: Uuid) -> Result<Option<LabResultDetail>> {
        let row = sqlx::query(&format!("{DETAIL_SELECT} WHERE l.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref()
            .map(|row| detail_from_row(row).map_err(Error::from))
            .transpose()
    }

    pub async fn find_by_patient_detailed(&self, patient_id: Uuid) -> Result<Vec<LabResultDetail>> {
        let rows = sqlx::query(&format!(
            "{DETAIL_SELECT} WHERE l.patient_id = $1 ORDER BY l.test_date DESC"
        ))
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| detail_from_row(row).map_err(Error::from))
            .collect()
    }

    pub async fn count_by_patient(&self, patient_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM lab_results WHERE patient_id = $1")
                .bind(patient_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn update(&self, id: Uuid, dto: &UpdateLabResultDto) -> Result<Option<LabResult>> {
        let result = sqlx::query_as::<_, LabResult>(
            r#"
            UPDATE lab_results SET
                test_name = COALESCE($2, test_name),
                test_date = COALESCE($3, test_date),
                results = COALESCE($4, results),
                doctor_notes = COALESCE($5, doctor_notes),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.test_name)
        .bind(dto.test_date)
        .bind(dto.results.as_ref().map(sqlx::types::Json))
        .bind(&dto.doctor_notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(result)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM lab_results WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
