//! Medical record repository

use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use super::appointments::user_summary_from_prefixed_row;
use crate::{
    models::{
        CreateMedicalRecordDto, MedicalRecord, MedicalRecordDetail, UpdateMedicalRecordDto,
    },
    Error, Result,
};

const DETAIL_SELECT: &str = r#"
    SELECT
        r.id, r.patient_id, r.doctor_id, r.category, r.title, r.description,
        r.date, r.attachments, r.created_at, r.updated_at,
        p.id AS patient_user_id, p.full_name AS patient_full_name, p.email AS patient_email,
        p.phone_number AS patient_phone_number, p.avatar AS patient_avatar,
        p.specialty AS patient_specialty, p.date_of_birth AS patient_date_of_birth,
        p.gender AS patient_gender, p.created_at AS patient_created_at,
        d.id AS doctor_user_id, d.full_name AS doctor_full_name, d.email AS doctor_email,
        d.phone_number AS doctor_phone_number, d.avatar AS doctor_avatar,
        d.specialty AS doctor_specialty, d.date_of_birth AS doctor_date_of_birth,
        d.gender AS doctor_gender, d.created_at AS doctor_created_at
    FROM medical_records r
    LEFT JOIN users p ON p.id = r.patient_id
    LEFT JOIN users d ON d.id = r.doctor_id
"#;

fn detail_from_row(row: &PgRow) -> std::result::Result<MedicalRecordDetail, sqlx::Error> {
    Ok(MedicalRecordDetail {
        record: MedicalRecord::from_row(row)?,
        patient: user_summary_from_prefixed_row(row, "patient")?,
        doctor: user_summary_from_prefixed_row(row, "doctor")?,
    })
}

#[derive(Clone)]
pub struct MedicalRecordRepository {
    pool: PgPool,
}

impl MedicalRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        dto: &CreateMedicalRecordDto,
    ) -> Result<MedicalRecord> {
        let record = sqlx::query_as::<_, MedicalRecord>(
            r#"
            INSERT INTO medical_records
                (patient_id, doctor_id, category, title, description, date, attachments)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(patient_id)
        .bind(doctor_id)
        .bind(dto.category)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.date)
        .bind(&dto.attachments)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    pub async fn find_all_detailed(&self) -> Result<Vec<MedicalRecordDetail>> {
        let rows = sqlx::query(&format!("{DETAIL_SELECT} ORDER BY r.date DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| detail_from_row(row).map_err(Error::from))
            .collect()
    }

    pub async fn find_by_id_detailed(&self, id: Uuid) -> Result<Option<MedicalRecordDetail>> {
        let row = sqlx::query(&format!("{DETAIL_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref()
            .map(|row| detail_from_row(row).map_err(Error::from))
            .transpose()
    }

    pub async fn find_by_patient_detailed(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<MedicalRecordDetail>> {
        let rows = sqlx::query(&format!(
            "{DETAIL_SELECT} WHERE r.patient_id = $1 ORDER BY r.date DESC"
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
            sqlx::query_scalar("SELECT COUNT(*) FROM medical_records WHERE patient_id = $1")
                .bind(patient_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: &UpdateMedicalRecordDto,
    ) -> Result<Option<MedicalRecord>> {
        let record = sqlx::query_as::<_, MedicalRecord>(
            r#"
            UPDATE medical_records SET
                category = COALESCE($2, category),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                date = COALESCE($5, date),
                attachments = COALESCE($6, attachments),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.category)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.date)
        .bind(&dto.attachments)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM medical_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
