//! Appointment and appointment-slot repositories

use chrono::{NaiveDate, NaiveTime};
use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::{
    models::{
        Appointment, AppointmentDetail, AppointmentSlot, AppointmentStatus, ClinicSummary,
        CreateAppointmentDto, UpdateAppointmentDto, UserSummary,
    },
    Result,
};

/// Joined select used by all detail queries. Patient/doctor/clinic columns are
/// prefixed so `Appointment::from_row` still sees its own column names.
const DETAIL_SELECT: &str = r#"
    SELECT
        a.id, a.patient_id, a.doctor_id, a.clinic_id, a.date, a.time, a.duration,
        a.status, a.appointment_type, a.reason, a.notes, a.created_at, a.updated_at,
        p.id AS patient_user_id, p.full_name AS patient_full_name, p.email AS patient_email,
        p.phone_number AS patient_phone_number, p.avatar AS patient_avatar,
        p.specialty AS patient_specialty, p.date_of_birth AS patient_date_of_birth,
        p.gender AS patient_gender, p.created_at AS patient_created_at,
        d.id AS doctor_user_id, d.full_name AS doctor_full_name, d.email AS doctor_email,
        d.phone_number AS doctor_phone_number, d.avatar AS doctor_avatar,
        d.specialty AS doctor_specialty, d.date_of_birth AS doctor_date_of_birth,
        d.gender AS doctor_gender, d.created_at AS doctor_created_at,
        c.id AS clinic_row_id, c.name AS clinic_name, c.address AS clinic_address
    FROM appointments a
    LEFT JOIN users p ON p.id = a.patient_id
    LEFT JOIN users d ON d.id = a.doctor_id
    LEFT JOIN clinics c ON c.id = a.clinic_id
"#;

pub(crate) fn user_summary_from_prefixed_row(
    row: &PgRow,
    prefix: &str,
) -> std::result::Result<Option<UserSummary>, sqlx::Error> {
    let id: Option<Uuid> = row.try_get(format!("{prefix}_user_id").as_str())?;
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(UserSummary {
        id,
        full_name: row.try_get(format!("{prefix}_full_name").as_str())?,
        email: row.try_get(format!("{prefix}_email").as_str())?,
        phone_number: row.try_get(format!("{prefix}_phone_number").as_str())?,
        avatar: row.try_get(format!("{prefix}_avatar").as_str())?,
        specialty: row.try_get(format!("{prefix}_specialty").as_str())?,
        date_of_birth: row.try_get(format!("{prefix}_date_of_birth").as_str())?,
        gender: row.try_get(format!("{prefix}_gender").as_str())?,
        created_at: row.try_get(format!("{prefix}_created_at").as_str())?,
    }))
}

pub(crate) fn clinic_summary_from_row(
    row: &PgRow,
) -> std::result::Result<Option<ClinicSummary>, sqlx::Error> {
    let id: Option<Uuid> = row.try_get("clinic_row_id")?;
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(ClinicSummary {
        id,
        name: row.try_get("clinic_name")?,
        address: row.try_get("clinic_address")?,
    }))
}

fn detail_from_row(row: &PgRow) -> std::result::Result<AppointmentDetail, sqlx::Error> {
    Ok(AppointmentDetail {
        appointment: Appointment::from_row(row)?,
        patient: user_summary_from_prefixed_row(row, "patient")?,
        doctor: user_summary_from_prefixed_row(row, "doctor")?,
        clinic: clinic_summary_from_row(row)?,
    })
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, dto: &CreateAppointmentDto) -> Result<Appointment> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                patient_id, doctor_id, clinic_id, date, time, duration,
                status, appointment_type, reason, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6,
                    COALESCE($7, 'pending'), COALESCE($8, 'consultation'), $9, $10)
            RETURNING *
            "#,
        )
        .bind(dto.patient_id)
        .bind(dto.doctor_id)
        .bind(dto.clinic_id)
        .bind(dto.date)
        .bind(dto.time)
        .bind(dto.duration)
        .bind(dto.status)
        .bind(dto.appointment_type)
        .bind(&dto.reason)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(appointment)
    }

    pub async fn find_all_detailed(&self) -> Result<Vec<AppointmentDetail>> {
        let rows = sqlx::query(&format!("{DETAIL_SELECT} ORDER BY a.date ASC, a.time ASC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| detail_from_row(row).map_err(Into::into))
            .collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(appointment)
    }

    pub async fn find_by_id_detailed(&self, id: Uuid) -> Result<Option<AppointmentDetail>> {
        let row = sqlx::query(&format!("{DETAIL_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref()
            .map(|row| detail_from_row(row).map_err(Into::into))
            .transpose()
    }

    pub async fn find_by_patient_detailed(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<AppointmentDetail>> {
        let rows = sqlx::query(&format!(
            "{DETAIL_SELECT} WHERE a.patient_id = $1 ORDER BY a.date ASC, a.time ASC"
        ))
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| detail_from_row(row).map_err(Into::into))
            .collect()
    }

    pub async fn find_by_doctor_detailed(&self, doctor_id: Uuid) -> Result<Vec<AppointmentDetail>> {
        let rows = sqlx::query(&format!(
            "{DETAIL_SELECT} WHERE a.doctor_id = $1 ORDER BY a.date ASC, a.time ASC"
        ))
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| detail_from_row(row).map_err(Into::into))
            .collect()
    }

    pub async fn update(&self, id: Uuid, dto: &UpdateAppointmentDto) -> Result<Option<Appointment>> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments SET
                date = COALESCE($2, date),
                time = COALESCE($3, time),
                duration = COALESCE($4, duration),
                status = COALESCE($5, status),
                appointment_type = COALESCE($6, appointment_type),
                reason = COALESCE($7, reason),
                notes = COALESCE($8, notes),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.date)
        .bind(dto.time)
        .bind(dto.duration)
        .bind(dto.status)
        .bind(dto.appointment_type)
        .bind(&dto.reason)
        .bind(&dto.notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(appointment)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_status(&self, status: AppointmentStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_on(&self, date: NaiveDate) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE date = $1")
            .bind(date)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_between(&self, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE date >= $1 AND date <= $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn count_between_with_status(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        status: AppointmentStatus,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE date >= $1 AND date <= $2 AND status = $3",
        )
        .bind(start)
        .bind(end)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Appointment dates in a range, for day-bucketed charts.
    pub async fn dates_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            "SELECT date FROM appointments WHERE date >= $1 AND date <= $2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(dates)
    }

    pub async fn recent_detailed(&self, limit: i64) -> Result<Vec<AppointmentDetail>> {
        let rows = sqlx::query(&format!(
            "{DETAIL_SELECT} ORDER BY a.created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| detail_from_row(row).map_err(Into::into))
            .collect()
    }

    /// Admin appointment listing: optional filters, newest first, SQL
    /// pagination.
    pub async fn search_page(
        &self,
        filter: &AppointmentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AppointmentDetail>, i64)> {
        fn apply_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &AppointmentFilter) {
            if let Some(status) = filter.status {
                builder.push(" AND a.status = ").push_bind(status);
            }
            if let Some(doctor_id) = filter.doctor_id {
                builder.push(" AND a.doctor_id = ").push_bind(doctor_id);
            }
            if let Some(patient_id) = filter.patient_id {
                builder.push(" AND a.patient_id = ").push_bind(patient_id);
            }
            if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
                builder
                    .push(" AND a.date BETWEEN ")
                    .push_bind(start)
                    .push(" AND ")
                    .push_bind(end);
            }
        }

        let mut count_builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM appointments a WHERE 1=1");
        apply_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        builder.push(" WHERE 1=1");
        apply_filters(&mut builder, filter);
        builder
            .push(" ORDER BY a.date DESC, a.time DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder.build().fetch_all(&self.pool).await?;
        let appointments = rows
            .iter()
            .map(|row| detail_from_row(row).map_err(crate::Error::from))
            .collect::<Result<Vec<_>>>()?;

        Ok((appointments, total))
    }
}

#[derive(Clone)]
pub struct SlotRepository {
    pool: PgPool,
}

impl SlotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_available(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Option<AppointmentSlot>> {
        let slot = sqlx::query_as::<_, AppointmentSlot>(
            r#"
            SELECT * FROM appointment_slots
            WHERE doctor_id = $1 AND date = $2 AND time = $3 AND status = 'available'
            LIMIT 1
            "#,
        )
        .bind(doctor_id)
        .bind(date)
        .bind(time)
        .fetch_optional(&self.pool)
        .await?;
        Ok(slot)
    }

    pub async fn find_by_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Option<AppointmentSlot>> {
        let slot = sqlx::query_as::<_, AppointmentSlot>(
            "SELECT * FROM appointment_slots WHERE appointment_id = $1 LIMIT 1",
        )
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(slot)
    }

    pub async fn mark_booked(&self, slot_id: Uuid, appointment_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE appointment_slots
            SET status = 'booked', appointment_id = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(slot_id)
        .bind(appointment_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn release(&self, slot_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE appointment_slots
            SET status = 'available', appointment_id = NULL, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(slot_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        duration: i32,
        clinic_id: Option<Uuid>,
        associated_resources: &[String],
    ) -> Result<AppointmentSlot> {
        let slot = sqlx::query_as::<_, AppointmentSlot>(
            r#"
            INSERT INTO appointment_slots
                (doctor_id, date, time, duration, clinic_id, associated_resources, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'available')
            RETURNING *
            "#,
        )
        .bind(doctor_id)
        .bind(date)
        .bind(time)
        .bind(duration)
        .bind(clinic_id)
        .bind(sqlx::types::Json(associated_resources))
        .fetch_one(&self.pool)
        .await?;
        Ok(slot)
    }

    pub async fn find_available_by_doctor(
        &self,
        doctor_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<AppointmentSlot>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT * FROM appointment_slots WHERE status = 'available' AND doctor_id = ",
        );
        builder.push_bind(doctor_id);
        if let (Some(start), Some(end)) = (start_date, end_date) {
            builder
                .push(" AND date >= ")
                .push_bind(start)
                .push(" AND date <= ")
                .push_bind(end);
        }
        builder.push(" ORDER BY date ASC, time ASC");

        let slots = builder
            .build_query_as::<AppointmentSlot>()
            .fetch_all(&self.pool)
            .await?;
        Ok(slots)
    }
}
