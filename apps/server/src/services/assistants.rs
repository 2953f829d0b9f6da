//! Assistant-facing views. Assistants work the schedule of the doctor they
//! are assigned to: appointments, patients, shifts, and reports all derive
//! from that doctor's calendar.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use super::{
    fmt, AppointmentsService, ClinicsService, LabResultsService, MedicalRecordsService,
    MessagesService, PrescriptionsService,
};
use crate::{
    auth::hash_password,
    db::{shifts::ShiftFilter, users::NewUser, ShiftRepository, UserRepository},
    models::{
        AppointmentDetail, AppointmentStatus, AppointmentType, Clinic, ConversationDetail,
        CreateShiftDto, MessageDetail, NotificationPreferences, Pagination, ShiftDetail,
        UpdateShiftDto, UpdateUserDto, User, UserRole,
    },
    Error, Result,
};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssistantDto {
    #[validate(email)]
    pub email: String,
    pub phone_number: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub full_name: String,
    pub permissions: Option<Vec<String>>,
    pub doctor_id: Option<Uuid>,
    pub clinic_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssistantDto {
    #[validate(email)]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[validate(length(min = 6))]
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub avatar: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_verified: Option<bool>,
    pub clinic_id: Option<Uuid>,
}

/// upcoming / past / all filter on appointment lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentListFilter {
    Upcoming,
    Past,
    All,
}

#[derive(Clone)]
pub struct AssistantsService {
    users: UserRepository,
    shifts: ShiftRepository,
    appointments: Arc<AppointmentsService>,
    medical_records: Arc<MedicalRecordsService>,
    lab_results: Arc<LabResultsService>,
    prescriptions: Arc<PrescriptionsService>,
    messages: Arc<MessagesService>,
    clinics: Arc<ClinicsService>,
}

impl AssistantsService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: UserRepository,
        shifts: ShiftRepository,
        appointments: Arc<AppointmentsService>,
        medical_records: Arc<MedicalRecordsService>,
        lab_results: Arc<LabResultsService>,
        prescriptions: Arc<PrescriptionsService>,
        messages: Arc<MessagesService>,
        clinics: Arc<ClinicsService>,
    ) -> Self {
        Self {
            users,
            shifts,
            appointments,
            medical_records,
            lab_results,
            prescriptions,
            messages,
            clinics,
        }
    }

    async fn format_assistant(&self, assistant: &User) -> Value {
        let clinic: Option<Clinic> = match assistant.clinic_id {
            Some(clinic_id) => self.clinics.find_row(clinic_id).await.ok(),
            None => None,
        };
        json!({
            "id": assistant.id,
            "name": assistant.full_name,
            "email": assistant.email,
            "phone": assistant.phone_number,
            "role": "assistant",
            "avatar": assistant.avatar,
            "isActive": assistant.is_verified,
            "clinic": clinic,
            "permissions": assistant.permissions,
            "createdAt": assistant.created_at,
            "updatedAt": assistant.updated_at,
        })
    }

    pub async fn find_all(&self) -> Result<Vec<Value>> {
        let assistants = self.users.find_by_role(UserRole::Assistant).await?;
        let mut formatted = Vec::with_capacity(assistants.len());
        for assistant in &assistants {
            formatted.push(self.format_assistant(assistant).await);
        }
        Ok(formatted)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<User> {
        self.users
            .find_by_id_and_role(id, UserRole::Assistant)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Assistant with ID {id} not found")))
    }

    pub async fn find_one_formatted(&self, id: Uuid) -> Result<Value> {
        let assistant = self.find_one(id).await?;
        Ok(self.format_assistant(&assistant).await)
    }

    pub async fn create(&self, dto: CreateAssistantDto) -> Result<Value> {
        dto.validate()?;

        if self
            .users
            .find_by_email_or_phone(&dto.email, &dto.phone_number)
            .await?
            .is_some()
        {
            return Err(Error::BadRequest(
                "User with this email or phone number already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&dto.password)?;
        let assistant = self
            .users
            .insert(NewUser {
                email: dto.email,
                phone_number: dto.phone_number,
                full_name: dto.full_name,
                role: Some(UserRole::Assistant),
                password_hash,
                permissions: dto.permissions,
                doctor_id: dto.doctor_id,
                clinic_id: dto.clinic_id,
                ..NewUser::default()
            })
            .await?;

        Ok(self.format_assistant(&assistant).await)
    }

    pub async fn update(&self, id: Uuid, dto: UpdateAssistantDto) -> Result<Value> {
        dto.validate()?;
        let assistant = self.find_one(id).await?;

        if let Some(password) = &dto.password {
            let password_hash = hash_password(password)?;
            self.users.update_password(id, &password_hash).await?;
        }
        if let Some(permissions) = &dto.permissions {
            self.users.update_permissions(id, permissions).await?;
        }

        let updated = self
            .users
            .update(
                id,
                &UpdateUserDto {
                    email: dto.email,
                    phone_number: dto.phone_number,
                    full_name: dto.full_name,
                    avatar: dto.avatar,
                    is_verified: dto.is_verified,
                    clinic_id: dto.clinic_id,
                    ..UpdateUserDto::default()
                },
            )
            .await?
            .unwrap_or(assistant);

        Ok(self.format_assistant(&updated).await)
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        self.find_one(id).await?;
        self.users.delete(id).await?;
        Ok(())
    }

    // Shift management

    pub async fn get_shifts(&self, filter: ShiftFilter) -> Result<Vec<ShiftDetail>> {
        self.shifts.find_detailed(&filter).await
    }

    pub async fn create_shift(
        &self,
        assistant_id: Uuid,
        dto: CreateShiftDto,
    ) -> Result<ShiftDetail> {
        let shift = self.shifts.insert(assistant_id, &dto).await?;
        self.find_shift(shift.id).await
    }

    pub async fn find_shift(&self, id: Uuid) -> Result<ShiftDetail> {
        self.shifts
            .find_by_id_detailed(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Shift with ID {id} not found")))
    }

    pub async fn update_shift(&self, id: Uuid, dto: UpdateShiftDto) -> Result<ShiftDetail> {
        self.shifts
            .update(id, &dto)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Shift with ID {id} not found")))?;
        self.find_shift(id).await
    }

    pub async fn delete_shift(&self, id: Uuid) -> Result<()> {
        if !self.shifts.delete(id).await? {
            return Err(Error::NotFound(format!("Shift with ID {id} not found")));
        }
        Ok(())
    }

    // Doctor calendar views

    async fn doctor_appointments(&self, assistant: &User) -> Result<Vec<AppointmentDetail>> {
        match assistant.doctor_id {
            Some(doctor_id) => self.appointments.find_by_doctor(doctor_id).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn get_dashboard(&self, assistant_id: Uuid) -> Result<Value> {
        let assistant = self.find_one(assistant_id).await?;
        let appointments = self.doctor_appointments(&assistant).await?;

        let today = Utc::now().date_naive();
        let yesterday = today - Days::new(1);
        let week_start = today - Days::new(7);

        let mut today_appointments: Vec<&AppointmentDetail> = appointments
            .iter()
            .filter(|apt| apt.appointment.date == today)
            .collect();
        today_appointments.sort_by_key(|apt| apt.appointment.time);

        let formatted_today: Vec<Value> = today_appointments
            .iter()
            .take(10)
            .map(|apt| {
                json!({
                    "id": apt.appointment.id,
                    "time": apt.appointment.time.format("%H:%M").to_string(),
                    "patientName": apt.patient_name(),
                    "patientInitial": apt.patient.as_ref().map(|p| p.initial())
                        .unwrap_or_else(|| "?".to_string()),
                    "reason": apt.appointment.display_reason(),
                    "status": apt.appointment.status,
                    "patient": apt.patient,
                })
            })
            .collect();

        let weekly: Vec<&AppointmentDetail> = appointments
            .iter()
            .filter(|apt| apt.appointment.date >= week_start && apt.appointment.date <= today)
            .collect();
        let weekly_chart: Vec<Value> = (0..7u32)
            .map(|weekday_index| {
                let count = weekly
                    .iter()
                    .filter(|apt| {
                        apt.appointment.date.weekday().num_days_from_monday() == weekday_index
                    })
                    .count();
                let day = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
                    [weekday_index as usize];
                json!({ "day": day, "count": count })
            })
            .collect();

        let completed_today = today_appointments
            .iter()
            .filter(|apt| apt.appointment.status == AppointmentStatus::Completed)
            .count();
        let yesterday_count = appointments
            .iter()
            .filter(|apt| apt.appointment.date == yesterday)
            .count();
        let appointments_change = if yesterday_count > 0 {
            ((today_appointments.len() as f64 - yesterday_count as f64) / yesterday_count as f64
                * 1000.0)
                .round()
                / 10.0
        } else {
            0.0
        };

        let clinic: Option<Clinic> = match assistant.clinic_id {
            Some(clinic_id) => self.clinics.find_row(clinic_id).await.ok(),
            None => None,
        };

        Ok(json!({
            "profile": {
                "id": assistant.id,
                "fullName": assistant.full_name,
                "email": assistant.email,
                "phoneNumber": assistant.phone_number,
                "avatar": assistant.avatar,
                "clinic": clinic,
            },
            "statistics": {
                "appointmentsToday": today_appointments.len(),
                "appointmentsChange": appointments_change,
                "completedToday": completed_today,
            },
            "todayAppointments": formatted_today,
            "weeklyChart": weekly_chart,
        }))
    }

    pub async fn get_appointments(
        &self,
        assistant_id: Uuid,
        status: Option<AppointmentStatus>,
        filter: Option<AppointmentListFilter>,
    ) -> Result<Vec<Value>> {
        let assistant = self.find_one(assistant_id).await?;
        let mut appointments = self.doctor_appointments(&assistant).await?;

        if let Some(status) = status {
            appointments.retain(|apt| apt.appointment.status == status);
        }

        let today = Utc::now().date_naive();
        match filter {
            Some(AppointmentListFilter::Upcoming) => appointments.retain(|apt| {
                apt.appointment.date >= today
                    && matches!(
                        apt.appointment.status,
                        AppointmentStatus::Confirmed | AppointmentStatus::Pending
                    )
            }),
            Some(AppointmentListFilter::Past) => appointments.retain(|apt| {
                apt.appointment.date < today
                    || matches!(
                        apt.appointment.status,
                        AppointmentStatus::Completed | AppointmentStatus::Cancelled
                    )
            }),
            Some(AppointmentListFilter::All) | None => {}
        }

        appointments.sort_by(|a, b| {
            (a.appointment.date, a.appointment.time).cmp(&(b.appointment.date, b.appointment.time))
        });

        Ok(appointments
            .iter()
            .map(|apt| {
                json!({
                    "id": apt.appointment.id,
                    "patientName": apt.patient_name(),
                    "date": fmt::medium_date(apt.appointment.date),
                    "time": apt.appointment.time.format("%H:%M").to_string(),
                    "assignedTo": apt.doctor.as_ref().map(|d| d.full_name.clone())
                        .unwrap_or_else(|| "Unassigned".to_string()),
                    "type": apt.appointment.appointment_type,
                    "status": apt.appointment.status,
                    "reason": apt.appointment.reason,
                    "notes": apt.appointment.notes,
                    "patient": apt.patient.as_ref().map(|p| json!({
                        "id": p.id,
                        "name": p.full_name,
                        "email": p.email,
                        "phoneNumber": p.phone_number,
                        "avatar": p.avatar,
                    })),
                    "doctor": apt.doctor.as_ref().map(|d| json!({
                        "id": d.id,
                        "name": d.full_name,
                        "specialty": d.specialty,
                    })),
                    "clinic": apt.clinic,
                })
            })
            .collect())
    }

    pub async fn get_appointment_statistics(&self, assistant_id: Uuid) -> Result<Value> {
        let assistant = self.find_one(assistant_id).await?;
        let appointments = self.doctor_appointments(&assistant).await?;

        let today = Utc::now().date_naive();
        let week_ago = today - Days::new(7);

        let today_appointments: Vec<&AppointmentDetail> = appointments
            .iter()
            .filter(|apt| apt.appointment.date == today)
            .collect();
        let upcoming = appointments
            .iter()
            .filter(|apt| {
                apt.appointment.date >= today
                    && matches!(
                        apt.appointment.status,
                        AppointmentStatus::Confirmed | AppointmentStatus::Pending
                    )
            })
            .count();
        let completed_today = today_appointments
            .iter()
            .filter(|apt| apt.appointment.status == AppointmentStatus::Completed)
            .count();

        let last_week = appointments
            .iter()
            .filter(|apt| apt.appointment.date >= week_ago && apt.appointment.date < today)
            .count();
        let week_change = if last_week > 0 {
            ((today_appointments.len() as f64 - last_week as f64) / last_week as f64 * 1000.0)
                .round()
                / 10.0
        } else {
            0.0
        };

        Ok(json!({
            "upcomingAppointments": upcoming,
            "completedToday": completed_today,
            "totalToday": today_appointments.len(),
            "weekChange": week_change,
        }))
    }

    pub async fn get_appointments_by_range(
        &self,
        assistant_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Value>> {
        let assistant = self.find_one(assistant_id).await?;
        let appointments = self.doctor_appointments(&assistant).await?;

        Ok(appointments
            .iter()
            .filter(|apt| apt.appointment.date >= start && apt.appointment.date <= end)
            .map(|apt| {
                json!({
                    "id": apt.appointment.id,
                    "date": apt.appointment.date,
                    "time": apt.appointment.time.format("%H:%M").to_string(),
                    "patientName": apt.patient_name(),
                    "patientInitial": apt.patient.as_ref().map(|p| p.initial().to_uppercase())
                        .unwrap_or_else(|| "U".to_string()),
                    "type": apt.appointment.appointment_type,
                    "reason": apt.appointment.reason.clone()
                        .or_else(|| apt.appointment.notes.clone())
                        .unwrap_or_default(),
                    "status": apt.appointment.status,
                    "doctor": apt.doctor.as_ref().map(|d| d.full_name.clone())
                        .unwrap_or_else(|| "Unassigned".to_string()),
                    "patient": apt.patient.as_ref().map(|p| json!({
                        "id": p.id,
                        "name": p.full_name,
                        "email": p.email,
                        "phoneNumber": p.phone_number,
                        "avatar": p.avatar,
                    })),
                })
            })
            .collect())
    }

    pub async fn get_today_appointments(&self, assistant_id: Uuid) -> Result<Vec<Value>> {
        let assistant = self.find_one(assistant_id).await?;
        let appointments = self.doctor_appointments(&assistant).await?;

        let today = Utc::now().date_naive();
        let mut today_appointments: Vec<&AppointmentDetail> = appointments
            .iter()
            .filter(|apt| apt.appointment.date == today)
            .collect();
        today_appointments.sort_by_key(|apt| apt.appointment.time);

        Ok(today_appointments
            .iter()
            .map(|apt| {
                json!({
                    "id": apt.appointment.id,
                    "time": apt.appointment.time.format("%H:%M").to_string(),
                    "patientName": apt.patient_name(),
                    "type": apt.appointment.appointment_type,
                    "status": apt.appointment.status,
                    "reason": apt.appointment.reason.clone()
                        .or_else(|| apt.appointment.notes.clone())
                        .unwrap_or_default(),
                    "duration": format!("{} min", apt.appointment.duration),
                    "patient": apt.patient.as_ref().map(|p| json!({
                        "id": p.id,
                        "name": p.full_name,
                        "avatar": p.avatar,
                    })),
                })
            })
            .collect())
    }

    // Patient roster

    pub async fn get_patients(
        &self,
        assistant_id: Uuid,
        search: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<Value> {
        let assistant = self.find_one(assistant_id).await?;
        let appointments = self.doctor_appointments(&assistant).await?;

        let mut patient_ids: Vec<Uuid> = appointments
            .iter()
            .map(|apt| apt.appointment.patient_id)
            .collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();

        let mut patients: Vec<User> = self
            .users
            .find_by_role(UserRole::Patient)
            .await?
            .into_iter()
            .filter(|patient| patient_ids.contains(&patient.id))
            .collect();

        if let Some(search) = search {
            let needle = search.to_lowercase();
            patients.retain(|patient| {
                patient.full_name.to_lowercase().contains(&needle)
                    || patient.email.to_lowercase().contains(&needle)
                    || patient.phone_number.to_lowercase().contains(&needle)
                    || patient.id.to_string().to_lowercase().contains(&needle)
            });
        }

        let mut detailed = Vec::with_capacity(patients.len());
        for patient in &patients {
            let mut patient_appointments: Vec<&AppointmentDetail> = appointments
                .iter()
                .filter(|apt| apt.appointment.patient_id == patient.id)
                .collect();
            patient_appointments.sort_by_key(|apt| std::cmp::Reverse(apt.appointment.date));
            let last_appointment = patient_appointments.first();

            let records = self.medical_records.find_by_patient(patient.id).await?;
            let diagnosis = records
                .first()
                .map(|record| record.record.title.clone())
                .unwrap_or_else(|| "No diagnosis".to_string());

            let mut status = match last_appointment.map(|apt| apt.appointment.status) {
                Some(AppointmentStatus::Completed) => "stable",
                Some(AppointmentStatus::Cancelled) => "discharged",
                Some(_) => "monitoring",
                None => "stable",
            };
            let has_emergency = patient_appointments.iter().any(|apt| {
                apt.appointment.appointment_type == AppointmentType::Emergency
                    || apt
                        .appointment
                        .reason
                        .as_deref()
                        .map(|r| r.to_lowercase().contains("emergency"))
                        .unwrap_or(false)
            });
            if has_emergency {
                status = "at-risk";
            }

            detailed.push(json!({
                "id": patient.id,
                "name": patient.full_name,
                "image": patient.avatar,
                "lastVisit": last_appointment
                    .map(|apt| fmt::medium_date(apt.appointment.date))
                    .unwrap_or_else(|| "N/A".to_string()),
                "lastVisitDate": last_appointment.map(|apt| apt.appointment.date),
                "diagnosis": diagnosis,
                "status": status,
                "dob": patient.date_of_birth.map(|d| d.format("%m/%d/%Y").to_string()),
                "email": patient.email,
                "phoneNumber": patient.phone_number,
                "gender": patient.gender,
            }));
        }

        detailed.sort_by(|a, b| {
            let key = |p: &Value| {
                p.get("lastVisitDate")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_default()
            };
            key(b).cmp(&key(a))
        });

        let total = detailed.len() as i64;
        let start = ((page - 1) * limit).max(0) as usize;
        let paginated: Vec<Value> = detailed
            .into_iter()
            .skip(start)
            .take(limit.max(0) as usize)
            .collect();

        Ok(json!({
            "patients": paginated,
            "pagination": Pagination::new(total, page, limit),
        }))
    }

    pub async fn get_patient_statistics(&self, assistant_id: Uuid) -> Result<Value> {
        let assistant = self.find_one(assistant_id).await?;
        let appointments = self.doctor_appointments(&assistant).await?;

        let mut patient_ids: Vec<Uuid> = appointments
            .iter()
            .map(|apt| apt.appointment.patient_id)
            .collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();
        let total_patients = patient_ids.len();

        let today = Utc::now().date_naive();
        let appointments_today = appointments
            .iter()
            .filter(|apt| apt.appointment.date == today)
            .count();

        let last_month = today.checked_sub_months(Months::new(1)).unwrap_or(today);
        let mut last_month_patients: Vec<Uuid> = appointments
            .iter()
            .filter(|apt| apt.appointment.date >= last_month && apt.appointment.date < today)
            .map(|apt| apt.appointment.patient_id)
            .collect();
        last_month_patients.sort_unstable();
        last_month_patients.dedup();

        let month_change = if !last_month_patients.is_empty() {
            ((total_patients as f64 - last_month_patients.len() as f64)
                / last_month_patients.len() as f64
                * 1000.0)
                .round()
                / 10.0
        } else {
            0.0
        };

        Ok(json!({
            "totalPatients": total_patients,
            "appointmentsToday": appointments_today,
            "monthChange": month_change,
        }))
    }

    pub async fn get_patient_details(&self, assistant_id: Uuid, patient_id: Uuid) -> Result<Value> {
        let assistant = self.find_one(assistant_id).await?;

        let patient = self
            .users
            .find_by_id_and_role(patient_id, UserRole::Patient)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Patient with ID {patient_id} not found")))?;

        let appointments: Vec<AppointmentDetail> = self
            .doctor_appointments(&assistant)
            .await?
            .into_iter()
            .filter(|apt| apt.appointment.patient_id == patient_id)
            .collect();
        let medical_records = self.medical_records.find_by_patient(patient_id).await?;
        let lab_results = self.lab_results.find_by_patient(patient_id).await?;
        let prescriptions = self.prescriptions.find_by_patient(patient_id).await?;

        // Merge appointments and notes into a newest-first timeline.
        let mut timeline: Vec<(NaiveDate, Value)> = Vec::new();
        for apt in &appointments {
            timeline.push((
                apt.appointment.date,
                json!({
                    "type": "appointment",
                    "date": apt.appointment.date,
                    "title": format!(
                        "{} - {}",
                        apt.appointment.appointment_type.as_str(),
                        apt.doctor_name()
                    ),
                    "description": apt.appointment.reason.clone()
                        .or_else(|| apt.appointment.notes.clone())
                        .unwrap_or_else(|| "No notes".to_string()),
                    "doctor": apt.doctor_name(),
                }),
            ));
        }
        for record in &medical_records {
            timeline.push((
                record.record.date,
                json!({
                    "type": "note",
                    "date": record.record.date,
                    "title": format!("{} - {}", record.record.title, record.doctor_name()),
                    "description": record.record.description,
                    "doctor": record.doctor_name(),
                }),
            ));
        }
        timeline.sort_by_key(|(date, _)| std::cmp::Reverse(*date));

        Ok(json!({
            "patient": {
                "id": patient.id,
                "name": patient.full_name,
                "email": patient.email,
                "phoneNumber": patient.phone_number,
                "avatar": patient.avatar,
                "dateOfBirth": patient.date_of_birth,
                "gender": patient.gender,
                "address": patient.address,
            },
            "appointments": appointments.iter().map(|apt| json!({
                "id": apt.appointment.id,
                "date": apt.appointment.date,
                "time": apt.appointment.time.format("%H:%M").to_string(),
                "doctor": apt.doctor_name(),
                "type": apt.appointment.appointment_type,
                "status": apt.appointment.status,
                "reason": apt.appointment.reason,
                "notes": apt.appointment.notes,
            })).collect::<Vec<_>>(),
            "medicalRecords": medical_records.iter().map(|record| json!({
                "id": record.record.id,
                "title": record.record.title,
                "description": record.record.description,
                "date": record.record.date,
                "category": record.record.category,
                "doctor": record.doctor_name(),
            })).collect::<Vec<_>>(),
            "labResults": lab_results.iter().map(|result| json!({
                "id": result.result.id,
                "testName": result.result.test_name,
                "testDate": result.result.test_date,
                "results": result.result.results,
            })).collect::<Vec<_>>(),
            "prescriptions": prescriptions.iter().map(|prescription| json!({
                "id": prescription.prescription.id,
                "medications": prescription.prescription.medications,
                "prescribedDate": prescription.prescription.prescribed_date,
                "status": prescription.prescription.status,
            })).collect::<Vec<_>>(),
            "timeline": timeline.into_iter().map(|(_, item)| item).collect::<Vec<_>>(),
        }))
    }

    pub async fn get_reports(
        &self,
        assistant_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Value> {
        let assistant = self.find_one(assistant_id).await?;
        let all_appointments = self.doctor_appointments(&assistant).await?;

        let today = Utc::now().date_naive();
        let start = start_date.unwrap_or_else(|| {
            today.checked_sub_months(Months::new(1)).unwrap_or(today)
        });
        let end = end_date.unwrap_or(today);

        let filtered: Vec<&AppointmentDetail> = all_appointments
            .iter()
            .filter(|apt| apt.appointment.date >= start && apt.appointment.date <= end)
            .collect();

        let completed = filtered
            .iter()
            .filter(|apt| apt.appointment.status == AppointmentStatus::Completed)
            .count();
        let missed_cancelled = filtered
            .iter()
            .filter(|apt| apt.appointment.status == AppointmentStatus::Cancelled)
            .count();

        let mut by_status: HashMap<&str, i64> = HashMap::new();
        let mut by_type: HashMap<&str, i64> = HashMap::new();
        let mut by_date: HashMap<String, i64> = HashMap::new();
        for apt in &filtered {
            *by_status.entry(apt.appointment.status.as_str()).or_insert(0) += 1;
            *by_type
                .entry(apt.appointment.appointment_type.as_str())
                .or_insert(0) += 1;
            *by_date
                .entry(apt.appointment.date.to_string())
                .or_insert(0) += 1;
        }

        let completion_rate = if filtered.is_empty() {
            0.0
        } else {
            (completed as f64 / filtered.len() as f64 * 1000.0).round() / 10.0
        };
        let revenue = completed as i64 * 150;
        let avg_revenue = if completed == 0 {
            0.0
        } else {
            revenue as f64 / completed as f64
        };

        let previous_start = start.checked_sub_months(Months::new(1)).unwrap_or(start);
        let previous_end = start - Days::new(1);
        let previous: Vec<&AppointmentDetail> = all_appointments
            .iter()
            .filter(|apt| {
                apt.appointment.date >= previous_start && apt.appointment.date <= previous_end
            })
            .collect();
        let percent_change = |current: i64, previous: i64| {
            if previous > 0 {
                ((current - previous) as f64 / previous as f64 * 1000.0).round() / 10.0
            } else {
                0.0
            }
        };
        let total_change = percent_change(filtered.len() as i64, previous.len() as i64);
        let previous_completed = previous
            .iter()
            .filter(|apt| apt.appointment.status == AppointmentStatus::Completed)
            .count() as i64;
        let previous_cancelled = previous
            .iter()
            .filter(|apt| apt.appointment.status == AppointmentStatus::Cancelled)
            .count() as i64;

        // Demographics as percentages of the roster in the period.
        let mut patient_ids: Vec<Uuid> = filtered
            .iter()
            .map(|apt| apt.appointment.patient_id)
            .collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();

        let mut age_groups: HashMap<&str, i64> =
            HashMap::from([("0-18", 0), ("19-45", 0), ("46+", 0)]);
        let mut with_dob = 0i64;
        for apt in &filtered {
            let Some(patient) = &apt.patient else { continue };
            if !patient_ids.contains(&patient.id) {
                continue;
            }
            patient_ids.retain(|id| *id != patient.id);
            let Some(dob) = patient.date_of_birth else {
                continue;
            };
            with_dob += 1;
            let age = fmt::age_on(dob, today);
            let bracket = if age <= 18 {
                "0-18"
            } else if age <= 45 {
                "19-45"
            } else {
                "46+"
            };
            *age_groups.entry(bracket).or_insert(0) += 1;
        }
        let as_percent = |count: i64| {
            if with_dob > 0 {
                (count as f64 / with_dob as f64 * 1000.0).round() / 10.0
            } else {
                0.0
            }
        };
        let demographics = json!({
            "0-18": as_percent(age_groups["0-18"]),
            "19-45": as_percent(age_groups["19-45"]),
            "46+": as_percent(age_groups["46+"]),
        });

        Ok(json!({
            "keyMetrics": {
                "totalAppointments": filtered.len(),
                "totalChange": total_change,
                "completed": completed,
                "completedChangePercent": percent_change(completed as i64, previous_completed),
                "completionRate": completion_rate,
                "missedCancelled": missed_cancelled,
                "missedCancelledChangePercent":
                    percent_change(missed_cancelled as i64, previous_cancelled),
                "revenue": revenue,
                "avgRevenuePerAppointment": avg_revenue,
            },
            "appointmentVolume": by_date,
            "appointmentsByStatus": by_status,
            "appointmentsByType": by_type,
            "patientDemographics": demographics,
        }))
    }

    // Messaging

    pub async fn get_messages(&self, assistant_id: Uuid) -> Result<Vec<ConversationDetail>> {
        self.messages.get_conversations(assistant_id).await
    }

    pub async fn get_conversation_messages(
        &self,
        assistant_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<Vec<MessageDetail>> {
        let conversations = self.messages.get_conversations(assistant_id).await?;
        if !conversations
            .iter()
            .any(|c| c.conversation.id == conversation_id)
        {
            return Err(Error::NotFound(
                "Conversation not found or access denied".to_string(),
            ));
        }
        self.messages.find_by_conversation(conversation_id).await
    }

    // Profile

    pub async fn update_profile(&self, assistant_id: Uuid, dto: UpdateUserDto) -> Result<Value> {
        self.find_one(assistant_id).await?;
        let updated = self
            .users
            .update(assistant_id, &dto)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("Assistant with ID {assistant_id} not found"))
            })?;
        Ok(self.format_assistant(&updated).await)
    }

    pub async fn get_notification_preferences(
        &self,
        assistant_id: Uuid,
    ) -> Result<NotificationPreferences> {
        let assistant = self.find_one(assistant_id).await?;
        Ok(assistant
            .notification_preferences
            .map(|prefs| prefs.0)
            .unwrap_or_default())
    }

    pub async fn update_notification_preferences(
        &self,
        assistant_id: Uuid,
        preferences: NotificationPreferences,
    ) -> Result<NotificationPreferences> {
        self.find_one(assistant_id).await?;
        self.users
            .update_notification_preferences(assistant_id, &preferences)
            .await?;
        Ok(preferences)
    }

    pub async fn get_clinic_info(&self, assistant_id: Uuid) -> Result<Option<Clinic>> {
        let assistant = self.find_one(assistant_id).await?;
        match assistant.clinic_id {
            Some(clinic_id) => Ok(self.clinics.find_row(clinic_id).await.ok()),
            None => Ok(None),
        }
    }

}
