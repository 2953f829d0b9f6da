//! Prescription repository

use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use super::appointments::user_summary_from_prefixed_row;
use crate::{
    models::{
        CreatePrescriptionDto, Prescription, PrescriptionDetail, PrescriptionStatus,
        UpdatePrescriptionDto,
    },
    Error, Result,
};

const DETAIL_SELECT: &str = r#"
    SELECT
        x.id, x.patient_id, x.doctor_id, x.medications, x.status, x.prescribed_date,
        x.expiry_date, x.refills_remaining, x.created_at, x.updated_at,
        p.id AS patient_user_id, p.full_name AS patient_full_name, p.email AS patient_email,
        p.phone_number AS patient_phone_number, p.avatar AS patient_avatar,
        p.specialty AS patient_specialty, p.date_of_birth AS patient_date_of_birth,
        p.gender AS patient_gender, p.created_at AS patient_created_at,
        d.id AS doctor_user_id, d.full_name AS doctor_full_name, d.email AS doctor_email,
        d.phone_number AS doctor_phone_number, d.avatar AS doctor_avatar,
        d.specialty AS doctor_specialty, d.date_of_birth AS doctor_date_of_birth,
        d.gender AS doctor_gender, d.created_at AS doctor_created_at
    FROM prescriptions x
    LEFT JOIN users p ON p.id = x.patient_id
    LEFT JOIN users d ON d.id = x.doctor_id
"#;

fn detail_from_row(row: &PgRow) -> std::result::Result<PrescriptionDetail, sqlx::Error> {
    Ok(PrescriptionDetail {
        prescription: Prescription::from_row(row)?,
        patient: user_summary_from_prefixed_row(row, "patient")?,
        doctor: user_summary_from_prefixed_row(row, "doctor")?,
    })
}

#[derive(Clone)]
pub struct PrescriptionRepository {
    pool: PgPool,
}

impl PrescriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        dto: &CreatePrescriptionDto,
    ) -> Result<Prescription> {
        let prescription = sqlx::query_as::<_, Prescription>(
            r#"
            INSERT INTO prescriptions
                (patient_id, doctor_id, medications, status, prescribed_date,
                 expiry_date, refills_remaining)
            VALUES ($1, $2, $3, COALESCE($4, 'active'), $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(patient_id)
        .bind(doctor_id)
        .bind(sqlx::types::Json(&dto.medications))
        .bind(dto.status)
        .bind(dto.prescribed_date)
        .bind(dto.expiry_date)
        .bind(dto.refills_remaining)
        .fetch_one(&self.pool)
        .await?;
        Ok(prescription)
    }

    pub async fn find_all_detailed(&self) -> Result<Vec<PrescriptionDetail>> {
        let rows = sqlx::query(&format!("{DETAIL_SELECT} ORDER BY x.prescribed_date DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| detail_from_row(row).map_err(Error::from))
            .collect()
    }

    pub async fn find_by_id_detailed(&self, id: Uuid) -> Result<Option<PrescriptionDetail>> {
        let row = sqlx::query(&format!("{DETAIL_SELECT} WHERE x.id = $1"))
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
    ) -> Result<Vec<PrescriptionDetail>> {
        let rows = sqlx::query(&format!(
            "{DETAIL_SELECT} WHERE x.patient_id = $1 ORDER BY x.prescribed_date DESC"
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
            sqlx::query_scalar("SELECT COUNT(*) FROM prescriptions WHERE patient_id = $1")
                .bind(patient_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: &UpdatePrescriptionDto,
    ) -> Result<Option<Prescription>> {
        let prescription = sqlx::query_as::<_, Prescription>(
            r#"
            UPDATE prescriptions SET
                medications = COALESCE($2, medications),
                status = COALESCE($3, status),
                prescribed_date = COALESCE($4, prescribed_date),
                expiry_date = COALESCE($5, expiry_date),
                refills_remaining = COALESCE($6, refills_remaining),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.medications.as_ref().map(sqlx::types::Json))
        .bind(dto.status)
        .bind(dto.prescribed_date)
        .bind(dto.expiry_date)
        .bind(dto.refills_remaining)
        .fetch_optional(&self.pool)
        .await?;
        Ok(prescription)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: PrescriptionStatus,
    ) -> Result<Option<Prescription>> {
        let prescription = sqlx::query_as::<_, Prescription>(
            "UPDATE prescriptions SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(prescription)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM prescriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
