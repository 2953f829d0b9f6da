//! Admin dashboards: counts, listings, and analytics over the whole clinic.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Days, Months, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{
    AppointmentsService, LabResultsService, MedicalRecordsService, MessagesService,
    PrescriptionsService,
};
use crate::{
    db::{appointments::AppointmentFilter, AppointmentRepository, ClinicRepository, UserRepository},
    models::{AppointmentStatus, Pagination, UserRole},
    Error, Result,
};

#[derive(Debug, Clone, Default)]
pub struct UserListParams {
    pub role: Option<UserRole>,
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentListParams {
    pub status: Option<AppointmentStatus>,
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Clone)]
pub struct AdminService {
    users: UserRepository,
    appointments_repo: AppointmentRepository,
    clinics: ClinicRepository,
    appointments: Arc<AppointmentsService>,
    medical_records: Arc<MedicalRecordsService>,
    lab_results: Arc<LabResultsService>,
    prescriptions: Arc<PrescriptionsService>,
    messages: Arc<MessagesService>,
}

impl AdminService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: UserRepository,
        appointments_repo: AppointmentRepository,
        clinics: ClinicRepository,
        appointments: Arc<AppointmentsService>,
        medical_records: Arc<MedicalRecordsService>,
        lab_results: Arc<LabResultsService>,
        prescriptions: Arc<PrescriptionsService>,
        messages: Arc<MessagesService>,
    ) -> Self {
        Self {
            users,
            appointments_repo,
            clinics,
            appointments,
            medical_records,
            lab_results,
            prescriptions,
            messages,
        }
    }

    pub async fn get_dashboard_stats(&self) -> Result<Value> {
        let today = Utc::now().date_naive();

        let total_users = self.users.count_all().await?;
        let total_doctors = self.users.count_by_role(UserRole::Doctor).await?;
        let total_patients = self.users.count_by_role(UserRole::Patient).await?;
        let total_assistants = self.users.count_by_role(UserRole::Assistant).await?;
        let total_appointments = self.appointments_repo.count_all().await?;
        let today_appointments = self.appointments_repo.count_on(today).await?;
        let pending_appointments = self
            .appointments_repo
            .count_by_status(AppointmentStatus::Pending)
            .await?;
        let completed_appointments = self
            .appointments_repo
            .count_by_status(AppointmentStatus::Completed)
            .await?;
        let total_clinics = self.clinics.count_all().await?;

        let recent_users: Vec<Value> = self
            .users
            .recent(5)
            .await?
            .into_iter()
            .map(|user| {
                json!({
                    "id": user.id,
                    "name": user.full_name,
                    "email": user.email,
                    "role": user.role,
                    "createdAt": user.created_at,
                    "avatar": user.avatar,
                })
            })
            .collect();

        let recent_appointments: Vec<Value> = self
            .appointments_repo
            .recent_detailed(5)
            .await?
            .into_iter()
            .map(|apt| {
                json!({
                    "id": apt.appointment.id,
                    "patientName": apt.patient_name(),
                    "doctorName": apt.doctor_name(),
                    "date": apt.appointment.date,
                    "time": apt.appointment.time.format("%H:%M").to_string(),
                    "status": apt.appointment.status,
                })
            })
            .collect();

        Ok(json!({
            "totalUsers": total_users,
            "totalDoctors": total_doctors,
            "totalPatients": total_patients,
            "totalAssistants": total_assistants,
            "totalAppointments": total_appointments,
            "pendingAppointments": pending_appointments,
            "completedAppointments": completed_appointments,
            "todayAppointments": today_appointments,
            "totalClinics": total_clinics,
            // Placeholders until historical snapshots exist.
            "userGrowth": 12.5,
            "appointmentGrowth": 8.3,
            "recentUsers": recent_users,
            "recentAppointments": recent_appointments,
        }))
    }

    pub async fn get_all_users(&self, params: UserListParams) -> Result<Value> {
        let page = params.page.max(1);
        let limit = params.limit.max(1);
        let offset = (page - 1) * limit;

        let (users, total) = self
            .users
            .search_page(params.role, params.search.as_deref(), limit, offset)
            .await?;

        let clinic_ids: Vec<Uuid> = users.iter().filter_map(|u| u.clinic_id).collect();
        let clinics = if clinic_ids.is_empty() {
            Vec::new()
        } else {
            self.clinics.summaries_by_ids(&clinic_ids).await?
        };

        let users: Vec<Value> = users
            .into_iter()
            .map(|user| {
                let clinic = user
                    .clinic_id
                    .and_then(|id| clinics.iter().find(|c| c.id == id))
                    .map(|c| json!({ "id": c.id, "name": c.name }));
                json!({
                    "id": user.id,
                    "fullName": user.full_name,
                    "email": user.email,
                    "phoneNumber": user.phone_number,
                    "role": user.role,
                    "avatar": user.avatar,
                    "isVerified": user.is_verified,
                    "specialty": user.specialty,
                    "clinic": clinic,
                    "createdAt": user.created_at,
                })
            })
            .collect();

        Ok(json!({
            "users": users,
            "pagination": Pagination::new(total, page, limit),
        }))
    }

    pub async fn get_user_details(&self, user_id: Uuid) -> Result<Value> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        let additional_data = match user.role {
            UserRole::Patient => {
                let appointments = self.appointments.find_by_patient(user_id).await?;
                let medical_records = self.medical_records.count_by_patient(user_id).await?;
                let lab_results = self.lab_results.count_by_patient(user_id).await?;
                let prescriptions = self.prescriptions.count_by_patient(user_id).await?;
                json!({
                    "appointments": appointments.len(),
                    "medicalRecords": medical_records,
                    "labResults": lab_results,
                    "prescriptions": prescriptions,
                })
            }
            UserRole::Doctor => {
                let appointments = self.appointments.find_by_doctor(user_id).await?;
                let mut patients: Vec<Uuid> = appointments
                    .iter()
                    .map(|apt| apt.appointment.patient_id)
                    .collect();
                patients.sort_unstable();
                patients.dedup();
                json!({
                    "appointments": appointments.len(),
                    "totalPatients": patients.len(),
                })
            }
            UserRole::Assistant => {
                let conversations = self.messages.count_conversations(user_id).await?;
                json!({ "conversations": conversations })
            }
            UserRole::Admin => json!({}),
        };

        Ok(super::merge_json(
            serde_json::to_value(&user).unwrap_or_default(),
            json!({ "additionalData": additional_data }),
        ))
    }

    pub async fn get_all_appointments(&self, params: AppointmentListParams) -> Result<Value> {
        let page = params.page.max(1);
        let limit = params.limit.max(1);
        let offset = (page - 1) * limit;

        let filter = AppointmentFilter {
            status: params.status,
            doctor_id: params.doctor_id,
            patient_id: params.patient_id,
            start_date: params.start_date,
            end_date: params.end_date,
        };
        let (appointments, total) = self
            .appointments_repo
            .search_page(&filter, limit, offset)
            .await?;

        let appointments: Vec<Value> = appointments
            .into_iter()
            .map(|apt| {
                json!({
                    "id": apt.appointment.id,
                    "patientName": apt.patient_name(),
                    "patientId": apt.appointment.patient_id,
                    "doctorName": apt.doctor_name(),
                    "doctorId": apt.appointment.doctor_id,
                    "clinicName": apt.clinic.as_ref().map(|c| c.name.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    "date": apt.appointment.date,
                    "time": apt.appointment.time.format("%H:%M").to_string(),
                    "status": apt.appointment.status,
                    "type": apt.appointment.appointment_type,
                    "reason": apt.appointment.reason,
                    "createdAt": apt.appointment.created_at,
                })
            })
            .collect();

        Ok(json!({
            "appointments": appointments,
            "pagination": Pagination::new(total, page, limit),
        }))
    }

    pub async fn get_analytics(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Value> {
        let today = Utc::now().date_naive();
        let start = start_date.unwrap_or_else(|| {
            today.checked_sub_months(Months::new(1)).unwrap_or(today)
        });
        let end = end_date.unwrap_or(today);

        let total_users = self.users.count_all().await?;
        let total_doctors = self.users.count_by_role(UserRole::Doctor).await?;
        let total_patients = self.users.count_by_role(UserRole::Patient).await?;
        let total_assistants = self.users.count_by_role(UserRole::Assistant).await?;
        let total_appointments = self.appointments_repo.count_between(start, end).await?;

        let mut appointments_by_status: HashMap<&str, i64> = HashMap::new();
        for status in AppointmentStatus::ALL {
            let count = self
                .appointments_repo
                .count_between_with_status(start, end, status)
                .await?;
            appointments_by_status.insert(status.as_str(), count);
        }

        let mut appointments_by_date: HashMap<String, i64> = HashMap::new();
        for date in self.appointments_repo.dates_between(start, end).await? {
            *appointments_by_date.entry(date.to_string()).or_insert(0) += 1;
        }

        // User signups bucketed by month over the trailing six months.
        let mut user_growth = Vec::with_capacity(6);
        for months_back in (0..6).rev() {
            let month_anchor = today
                .checked_sub_months(Months::new(months_back))
                .unwrap_or(today);
            let month_start =
                NaiveDate::from_ymd_opt(month_anchor.year(), month_anchor.month(), 1)
                    .unwrap_or(month_anchor);
            let month_end = month_start
                .checked_add_months(Months::new(1))
                .map(|next| next - Days::new(1))
                .unwrap_or(month_start);

            let start_ts = Utc
                .from_utc_datetime(&month_start.and_hms_opt(0, 0, 0).unwrap_or_default());
            let end_ts = Utc
                .from_utc_datetime(&month_end.and_hms_opt(23, 59, 59).unwrap_or_default());

            let count = self.users.count_created_between(start_ts, end_ts).await?;
            user_growth.push(json!({
                "month": month_start.format("%b %Y").to_string(),
                "count": count,
            }));
        }

        // Appointments bucketed by week across the period.
        let mut appointment_trends = Vec::new();
        let mut week_start = start;
        while week_start <= end {
            let week_end = (week_start + Days::new(6)).min(end);
            let count = self
                .appointments_repo
                .count_between(week_start, week_end)
                .await?;
            appointment_trends.push(json!({
                "week": super::fmt::short_month_day(week_start),
                "count": count,
            }));
            week_start = week_start + Days::new(7);
        }

        Ok(json!({
            "overview": {
                "totalUsers": total_users,
                "totalDoctors": total_doctors,
                "totalPatients": total_patients,
                "totalAssistants": total_assistants,
                "totalAppointments": total_appointments,
            },
            "appointmentsByStatus": appointments_by_status,
            "appointmentsByDate": appointments_by_date,
            "userGrowth": user_growth,
            "appointmentTrends": appointment_trends,
            "period": { "start": start, "end": end },
        }))
    }

    pub async fn get_all_clinics(
        &self,
        search: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<Value> {
        let page = page.max(1);
        let limit = limit.max(1);
        let offset = (page - 1) * limit;

        let (clinics, total) = self.clinics.search_page(search, limit, offset).await?;

        let ids: Vec<Uuid> = clinics.iter().map(|c| c.id).collect();
        let doctor_counts: HashMap<Uuid, i64> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.clinics.doctor_counts(&ids).await?.into_iter().collect()
        };

        let clinics: Vec<Value> = clinics
            .into_iter()
            .map(|clinic| {
                json!({
                    "id": clinic.id,
                    "name": clinic.name,
                    "address": clinic.address,
                    "phone": clinic.phone,
                    "email": clinic.email,
                    "description": clinic.description,
                    "logo": clinic.logo,
                    "operatingHours": clinic.operating_hours,
                    "totalDoctors": doctor_counts.get(&clinic.id).copied().unwrap_or(0),
                    "createdAt": clinic.created_at,
                })
            })
            .collect();

        Ok(json!({
            "clinics": clinics,
            "pagination": Pagination::new(total, page, limit),
        }))
    }
}
