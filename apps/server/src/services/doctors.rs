//! Doctor-facing views: schedule management, patient roster, dashboard,
//! reports, and slot publishing.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveTime, Utc, Weekday};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use super::{
    fmt, AppointmentsService, ClinicsService, LabResultsService, MedicalRecordsService,
    MessagesService, PrescriptionsService,
};
use crate::{
    db::{SlotRepository, UserRepository},
    models::{
        clinic::default_operating_hours, AppointmentDetail, AppointmentStatus, Clinic,
        ConversationDetail, CreateAppointmentSlotDto, CreateClinicDto, CreateLabResultDto,
        CreateMedicalRecordDto, CreatePrescriptionDto, NotificationPreferences, Pagination,
        PrescriptionStatus, RecurrenceType, UpdateAppointmentDto, UpdateClinicDto, UpdateUserDto,
        User, UserRole,
    },
    Error, Result,
};

/// Expand `[start_time, end_time)` into slot start times `duration` minutes
/// apart on the given date.
pub fn generate_time_slots(
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_minutes: i32,
) -> Vec<(NaiveDate, NaiveTime)> {
    let mut slots = Vec::new();
    if duration_minutes <= 0 {
        return slots;
    }

    let step = Duration::minutes(duration_minutes as i64);
    let mut current = start_time;
    while current < end_time {
        slots.push((date, current));
        let (next, wrapped) = current.overflowing_add_signed(step);
        if wrapped > 0 {
            break;
        }
        current = next;
    }
    slots
}

/// Expand a recurrence pattern into slot start times on the dates after
/// `start_date` up to and including `end_date`.
pub fn generate_recurring_slots(
    start_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_minutes: i32,
    recurrence: RecurrenceType,
    end_date: NaiveDate,
) -> Vec<(NaiveDate, NaiveTime)> {
    let mut slots = Vec::new();

    match recurrence {
        RecurrenceType::None => {}
        RecurrenceType::Daily => {
            let mut current = start_date + Days::new(1);
            while current <= end_date {
                slots.extend(generate_time_slots(
                    current,
                    start_time,
                    end_time,
                    duration_minutes,
                ));
                current = current + Days::new(1);
            }
        }
        RecurrenceType::Weekly => {
            let weekday: Weekday = start_date.weekday();
            let mut current = start_date + Days::new(1);
            while current <= end_date {
                if current.weekday() == weekday {
                    slots.extend(generate_time_slots(
                        current,
                        start_time,
                        end_time,
                        duration_minutes,
                    ));
                }
                current = current + Days::new(1);
            }
        }
        RecurrenceType::Monthly => {
            let mut months = 1;
            loop {
                let Some(current) = start_date.checked_add_months(Months::new(months)) else {
                    break;
                };
                if current > end_date {
                    break;
                }
                months += 1;
                // Months without the anchor day (e.g. the 31st in February)
                // clamp to the month end; skip those to keep a
                // same-day-of-month cadence.
                if current.day() != start_date.day() {
                    continue;
                }
                slots.extend(generate_time_slots(
                    current,
                    start_time,
                    end_time,
                    duration_minutes,
                ));
            }
        }
    }

    slots
}

#[derive(Clone)]
pub struct DoctorsService {
    users: UserRepository,
    slots: SlotRepository,
    appointments: Arc<AppointmentsService>,
    medical_records: Arc<MedicalRecordsService>,
    lab_results: Arc<LabResultsService>,
    prescriptions: Arc<PrescriptionsService>,
    messages: Arc<MessagesService>,
    clinics: Arc<ClinicsService>,
}

impl DoctorsService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: UserRepository,
        slots: SlotRepository,
        appointments: Arc<AppointmentsService>,
        medical_records: Arc<MedicalRecordsService>,
        lab_results: Arc<LabResultsService>,
        prescriptions: Arc<PrescriptionsService>,
        messages: Arc<MessagesService>,
        clinics: Arc<ClinicsService>,
    ) -> Self {
        Self {
            users,
            slots,
            appointments,
            medical_records,
            lab_results,
            prescriptions,
            messages,
            clinics,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Value>> {
        let doctors = self.users.find_by_role(UserRole::Doctor).await?;
        self.with_clinics(doctors).await
    }

    async fn with_clinics(&self, doctors: Vec<User>) -> Result<Vec<Value>> {
        let mut result = Vec::with_capacity(doctors.len());
        for doctor in doctors {
            let clinic = match doctor.clinic_id {
                Some(clinic_id) => self.clinics.find_row(clinic_id).await.ok(),
                None => None,
            };
            result.push(super::merge_json(
                serde_json::to_value(&doctor).unwrap_or_default(),
                json!({ "clinic": clinic }),
            ));
        }
        Ok(result)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<User> {
        self.users
            .find_by_id_and_role(id, UserRole::Doctor)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Doctor with ID {id} not found")))
    }

    pub async fn find_one_with_clinic(&self, id: Uuid) -> Result<Value> {
        let doctor = self.find_one(id).await?;
        let mut values = self.with_clinics(vec![doctor]).await?;
        Ok(values.remove(0))
    }

    pub async fn update_profile(&self, doctor_id: Uuid, dto: UpdateUserDto) -> Result<User> {
        self.find_one(doctor_id).await?;
        self.users
            .update(doctor_id, &dto)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Doctor with ID {doctor_id} not found")))
    }

    pub async fn get_appointments(
        &self,
        doctor_id: Uuid,
        status: Option<AppointmentStatus>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AppointmentDetail>> {
        let appointments = self.appointments.find_by_doctor(doctor_id).await?;
        Ok(appointments
            .into_iter()
            .filter(|apt| status.map_or(true, |s| apt.appointment.status == s))
            .filter(|apt| date.map_or(true, |d| apt.appointment.date == d))
            .collect())
    }

    pub async fn get_today_appointments(&self, doctor_id: Uuid) -> Result<Vec<AppointmentDetail>> {
        self.get_appointments(doctor_id, None, Some(Utc::now().date_naive()))
            .await
    }

    pub async fn get_upcoming_appointments(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<AppointmentDetail>> {
        let today = Utc::now().date_naive();
        let appointments = self.appointments.find_by_doctor(doctor_id).await?;
        Ok(appointments
            .into_iter()
            .filter(|apt| {
                apt.appointment.date >= today
                    && matches!(
                        apt.appointment.status,
                        AppointmentStatus::Confirmed | AppointmentStatus::Pending
                    )
            })
            .collect())
    }

    pub async fn get_appointments_by_range(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AppointmentDetail>> {
        let appointments = self.appointments.find_by_doctor(doctor_id).await?;
        Ok(appointments
            .into_iter()
            .filter(|apt| apt.appointment.date >= start && apt.appointment.date <= end)
            .collect())
    }

    pub async fn update_appointment_status(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<crate::models::Appointment> {
        let appointment = self.appointments.find_one(appointment_id).await?;
        if appointment.appointment.doctor_id != doctor_id {
            return Err(Error::NotFound("Appointment not found".to_string()));
        }
        self.appointments
            .update(
                appointment_id,
                UpdateAppointmentDto {
                    status: Some(status),
                    ..UpdateAppointmentDto::default()
                },
            )
            .await
    }

    pub async fn confirm_appointment(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<crate::models::Appointment> {
        self.update_appointment_status(doctor_id, appointment_id, AppointmentStatus::Confirmed)
            .await
    }

    pub async fn cancel_appointment(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<crate::models::Appointment> {
        self.update_appointment_status(doctor_id, appointment_id, AppointmentStatus::Cancelled)
            .await
    }

    /// Unique patients derived from the doctor's appointment history.
    pub async fn get_patients(
        &self,
        doctor_id: Uuid,
        search: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<Value> {
        let appointments = self.appointments.find_by_doctor(doctor_id).await?;

        struct Roster {
            value: Value,
            last_appointment: NaiveDate,
            total: i64,
        }

        let mut unique: HashMap<Uuid, Roster> = HashMap::new();
        for apt in &appointments {
            let Some(patient) = &apt.patient else {
                continue;
            };
            let entry = unique.entry(patient.id).or_insert_with(|| Roster {
                value: json!({
                    "id": patient.id,
                    "name": patient.full_name,
                    "avatar": patient.initial(),
                    "phone": patient.phone_number,
                    "email": patient.email,
                    "dob": patient.date_of_birth,
                }),
                last_appointment: apt.appointment.date,
                total: 0,
            });
            entry.total += 1;
            if apt.appointment.date > entry.last_appointment {
                entry.last_appointment = apt.appointment.date;
            }
        }

        let mut patients: Vec<Value> = unique
            .into_values()
            .map(|roster| {
                super::merge_json(
                    roster.value,
                    json!({
                        "lastAppointment": roster.last_appointment,
                        "lastVisit": fmt::medium_date(roster.last_appointment),
                        "totalAppointments": roster.total,
                    }),
                )
            })
            .collect();

        if let Some(search) = search {
            let needle = search.to_lowercase();
            patients.retain(|p| {
                let get = |key: &str| {
                    p.get(key)
                        .and_then(Value::as_str)
                        .map(str::to_lowercase)
                        .unwrap_or_default()
                };
                get("name").contains(&needle)
                    || get("email").contains(&needle)
                    || get("phone").contains(search)
                    || get("id").contains(&needle)
            });
        }

        patients.sort_by(|a, b| {
            let key = |p: &Value| {
                p.get("lastAppointment")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_default()
            };
            key(b).cmp(&key(a))
        });

        let total = patients.len() as i64;
        let start = ((page - 1) * limit).max(0) as usize;
        let paginated: Vec<Value> = patients
            .into_iter()
            .skip(start)
            .take(limit.max(0) as usize)
            .collect();

        Ok(json!({
            "patients": paginated,
            "pagination": Pagination::new(total, page, limit),
        }))
    }

    pub async fn get_patient_details(&self, doctor_id: Uuid, patient_id: Uuid) -> Result<Value> {
        let patient = self
            .users
            .find_by_id_and_role(patient_id, UserRole::Patient)
            .await?
            .ok_or_else(|| Error::NotFound("Patient not found".to_string()))?;

        let appointments: Vec<AppointmentDetail> = self
            .appointments
            .find_by_doctor(doctor_id)
            .await?
            .into_iter()
            .filter(|apt| apt.appointment.patient_id == patient_id)
            .collect();
        let medical_records = self.medical_records.find_by_patient(patient_id).await?;
        let lab_results = self.lab_results.find_by_patient(patient_id).await?;
        let prescriptions = self.prescriptions.find_by_patient(patient_id).await?;

        Ok(json!({
            "patient": patient,
            "appointments": appointments,
            "medicalRecords": medical_records,
            "labResults": lab_results,
            "prescriptions": prescriptions,
        }))
    }

    pub async fn get_dashboard(&self, doctor_id: Uuid) -> Result<Value> {
        let today = Utc::now().date_naive();
        let yesterday = today - Days::new(1);

        // Week runs Sunday through Saturday.
        let start_of_week = today - Days::new(today.weekday().num_days_from_sunday() as u64);
        let end_of_week = start_of_week + Days::new(6);

        let all_appointments = self.appointments.find_by_doctor(doctor_id).await?;

        let today_appointments: Vec<Value> = all_appointments
            .iter()
            .filter(|apt| apt.appointment.date == today)
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

        let upcoming: Vec<&AppointmentDetail> = all_appointments
            .iter()
            .filter(|apt| {
                apt.appointment.date >= today
                    && matches!(
                        apt.appointment.status,
                        AppointmentStatus::Confirmed | AppointmentStatus::Pending
                    )
            })
            .take(5)
            .collect();

        let weekly: Vec<&AppointmentDetail> = all_appointments
            .iter()
            .filter(|apt| {
                apt.appointment.date >= start_of_week && apt.appointment.date <= end_of_week
            })
            .collect();

        let weekly_chart_data: Vec<Value> = (0..7)
            .map(|offset| {
                let day_date = start_of_week + Days::new(offset);
                let count = weekly
                    .iter()
                    .filter(|apt| apt.appointment.date == day_date)
                    .count();
                json!({
                    "day": day_date.format("%a").to_string(),
                    "count": count,
                })
            })
            .collect();

        let total_patients = {
            let mut ids: Vec<Uuid> = all_appointments
                .iter()
                .map(|apt| apt.appointment.patient_id)
                .collect();
            ids.sort_unstable();
            ids.dedup();
            ids.len()
        };

        let pending = all_appointments
            .iter()
            .filter(|apt| apt.appointment.status == AppointmentStatus::Pending)
            .count();
        let completed = all_appointments
            .iter()
            .filter(|apt| apt.appointment.status == AppointmentStatus::Completed)
            .count();
        let yesterday_count = all_appointments
            .iter()
            .filter(|apt| apt.appointment.date == yesterday)
            .count();

        let conversations = self.messages.get_conversations(doctor_id).await?;
        let unread_messages: i32 = conversations
            .iter()
            .map(|c| c.conversation.unread_count)
            .sum();

        let appointment_change = today_appointments.len() as i64 - yesterday_count as i64;
        let appointment_change_percent = if yesterday_count > 0 {
            (appointment_change as f64 / yesterday_count as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        Ok(json!({
            "todayAppointments": today_appointments,
            "upcomingAppointments": upcoming,
            "weeklyChartData": weekly_chart_data,
            "statistics": {
                "totalPatients": total_patients,
                "totalAppointments": all_appointments.len(),
                "pendingAppointments": pending,
                "completedAppointments": completed,
                "unreadMessages": unread_messages,
                "appointmentsToday": today_appointments.len(),
                // Placeholder until historical snapshots exist.
                "patientGrowth": 1.5,
                "appointmentChangePercent": appointment_change_percent,
            },
        }))
    }

    pub async fn get_reports(
        &self,
        doctor_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Value> {
        let today = Utc::now().date_naive();
        let start = start_date.unwrap_or_else(|| {
            today
                .checked_sub_months(Months::new(1))
                .unwrap_or(today)
        });
        let end = end_date.unwrap_or(today);

        let appointments = self.get_appointments_by_range(doctor_id, start, end).await?;
        let roster = self.get_patients(doctor_id, None, 1, i64::MAX).await?;

        let completed: Vec<_> = appointments
            .iter()
            .filter(|apt| apt.appointment.status == AppointmentStatus::Completed)
            .collect();
        let missed_cancelled = appointments
            .iter()
            .filter(|apt| apt.appointment.status == AppointmentStatus::Cancelled)
            .count();

        let mut by_status: HashMap<&str, i64> = HashMap::new();
        let mut by_type: HashMap<&str, i64> = HashMap::new();
        let mut by_date: HashMap<String, i64> = HashMap::new();
        for apt in &appointments {
            *by_status.entry(apt.appointment.status.as_str()).or_insert(0) += 1;
            *by_type
                .entry(apt.appointment.appointment_type.as_str())
                .or_insert(0) += 1;
            *by_date
                .entry(apt.appointment.date.to_string())
                .or_insert(0) += 1;
        }

        let completion_rate = if appointments.is_empty() {
            0.0
        } else {
            (completed.len() as f64 / appointments.len() as f64 * 1000.0).round() / 10.0
        };

        // Flat consultation fee until billing is modeled.
        let revenue = completed.len() as i64 * 150;
        let avg_revenue = if completed.is_empty() {
            0.0
        } else {
            revenue as f64 / completed.len() as f64
        };

        // Period-over-period comparison against the preceding month.
        let previous_start = start.checked_sub_months(Months::new(1)).unwrap_or(start);
        let previous_end = start - Days::new(1);
        let previous = self
            .get_appointments_by_range(doctor_id, previous_start, previous_end)
            .await?;
        let appointment_change = appointments.len() as i64 - previous.len() as i64;
        let appointment_change_percent = if previous.is_empty() {
            0.0
        } else {
            (appointment_change as f64 / previous.len() as f64 * 1000.0).round() / 10.0
        };

        let mut demographics: HashMap<&str, i64> =
            HashMap::from([("0-18", 0), ("19-45", 0), ("46+", 0)]);
        if let Some(patients) = roster.get("patients").and_then(Value::as_array) {
            for patient in patients {
                let Some(dob) = patient
                    .get("dob")
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse::<NaiveDate>().ok())
                else {
                    continue;
                };
                let age = fmt::age_on(dob, today);
                let bracket = if (0..=18).contains(&age) {
                    "0-18"
                } else if (19..=45).contains(&age) {
                    "19-45"
                } else if age >= 46 {
                    "46+"
                } else {
                    continue;
                };
                *demographics.entry(bracket).or_insert(0) += 1;
            }
        }

        Ok(json!({
            "period": { "start": start, "end": end },
            "keyMetrics": {
                "totalAppointments": appointments.len(),
                "completed": completed.len(),
                "missedCancelled": missed_cancelled,
                "revenue": revenue,
                "completionRate": completion_rate,
                "avgRevenuePerAppointment": avg_revenue,
                "appointmentChangePercent": appointment_change_percent,
            },
            "appointmentsByStatus": by_status,
            "appointmentsByType": by_type,
            "appointmentsByDate": by_date,
            "patientDemographics": demographics,
        }))
    }

    pub async fn get_messages(&self, doctor_id: Uuid) -> Result<Vec<ConversationDetail>> {
        self.messages.get_conversations(doctor_id).await
    }

    pub async fn create_appointment_slots(
        &self,
        doctor_id: Uuid,
        dto: CreateAppointmentSlotDto,
    ) -> Result<Value> {
        dto.validate()?;

        let mut all_slots =
            generate_time_slots(dto.date, dto.start_time, dto.end_time, dto.slot_duration);

        if let Some(recurrence) = dto.recurrence {
            let end_date = dto
                .recurrence_end_date
                .and_then(chrono::DateTime::from_timestamp_millis)
                .map(|dt| dt.date_naive())
                .unwrap_or_else(|| dto.date + Days::new(30));
            all_slots.extend(generate_recurring_slots(
                dto.date,
                dto.start_time,
                dto.end_time,
                dto.slot_duration,
                recurrence,
                end_date,
            ));
        }

        let resources = dto.associated_resources.clone().unwrap_or_default();
        let mut saved = Vec::with_capacity(all_slots.len());
        for (date, time) in all_slots {
            saved.push(
                self.slots
                    .insert(
                        doctor_id,
                        date,
                        time,
                        dto.slot_duration,
                        dto.clinic_id,
                        &resources,
                    )
                    .await?,
            );
        }

        tracing::info!(doctor_id = %doctor_id, count = saved.len(), "Appointment slots created");

        Ok(json!({
            "message": format!("Successfully created {} appointment slots", saved.len()),
            "slots": saved,
            "totalSlots": saved.len(),
        }))
    }

    /// Available slots grouped by date.
    pub async fn get_appointment_slots(
        &self,
        doctor_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Value>> {
        let slots = self
            .slots
            .find_available_by_doctor(doctor_id, start_date, end_date)
            .await?;

        let mut by_date: Vec<(NaiveDate, Vec<Value>)> = Vec::new();
        for slot in slots {
            let entry = json!({
                "id": slot.id,
                "time": slot.time.format("%H:%M").to_string(),
                "duration": slot.duration,
                "status": slot.status,
                "clinicId": slot.clinic_id,
                "associatedResources": slot.associated_resources,
            });
            match by_date.last_mut() {
                Some((date, list)) if *date == slot.date => list.push(entry),
                _ => by_date.push((slot.date, vec![entry])),
            }
        }

        Ok(by_date
            .into_iter()
            .map(|(date, list)| {
                json!({
                    "date": date,
                    "totalSlots": list.len(),
                    "availableSlots": list.len(),
                    "slots": list,
                })
            })
            .collect())
    }

    pub async fn create_medical_record(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        mut dto: CreateMedicalRecordDto,
    ) -> Result<crate::models::MedicalRecord> {
        dto.patient_id = Some(patient_id);
        dto.doctor_id = Some(doctor_id);
        self.medical_records.create(dto).await
    }

    pub async fn create_lab_result(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        mut dto: CreateLabResultDto,
    ) -> Result<crate::models::LabResult> {
        dto.patient_id = Some(patient_id);
        dto.doctor_id = Some(doctor_id);
        self.lab_results.create(dto).await
    }

    pub async fn create_prescription(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        mut dto: CreatePrescriptionDto,
    ) -> Result<crate::models::Prescription> {
        dto.patient_id = Some(patient_id);
        dto.doctor_id = Some(doctor_id);
        dto.status = Some(PrescriptionStatus::Active);
        self.prescriptions.create(dto).await
    }

    pub async fn get_notification_preferences(
        &self,
        doctor_id: Uuid,
    ) -> Result<NotificationPreferences> {
        let doctor = self.find_one(doctor_id).await?;
        Ok(doctor
            .notification_preferences
            .map(|prefs| prefs.0)
            .unwrap_or_default())
    }

    pub async fn update_notification_preferences(
        &self,
        doctor_id: Uuid,
        preferences: NotificationPreferences,
    ) -> Result<User> {
        self.find_one(doctor_id).await?;
        self.users
            .update_notification_preferences(doctor_id, &preferences)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Doctor with ID {doctor_id} not found")))
    }

    pub async fn get_clinic_info(&self, doctor_id: Uuid) -> Result<Option<Clinic>> {
        let doctor = self.find_one(doctor_id).await?;
        match doctor.clinic_id {
            Some(clinic_id) => Ok(Some(self.clinics.find_row(clinic_id).await?)),
            None => Ok(None),
        }
    }

    /// Update the doctor's clinic, creating one when the doctor has none yet.
    pub async fn update_clinic_info(&self, doctor_id: Uuid, dto: UpdateClinicDto) -> Result<Clinic> {
        let doctor = self.find_one(doctor_id).await?;

        match doctor.clinic_id {
            Some(clinic_id) => self.clinics.update(clinic_id, dto).await,
            None => {
                let create = CreateClinicDto {
                    name: dto.name.unwrap_or_default(),
                    address: dto.address.unwrap_or_default(),
                    phone: dto.phone.unwrap_or_default(),
                    email: dto.email.unwrap_or_default(),
                    logo: dto.logo,
                    description: dto.description,
                    operating_hours: Some(
                        dto.operating_hours.unwrap_or_else(default_operating_hours),
                    ),
                };
                let clinic = self.clinics.create(create).await?;
                self.users.set_clinic(doctor_id, clinic.id).await?;
                Ok(clinic)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn time_slots_cover_half_open_range() {
        let slots = generate_time_slots(date(2024, 12, 16), time(9, 0), time(11, 0), 30);
        let times: Vec<String> = slots
            .iter()
            .map(|(_, t)| t.format("%H:%M").to_string())
            .collect();
        assert_eq!(times, vec!["09:00", "09:30", "10:00", "10:30"]);
    }

    #[test]
    fn time_slots_handle_non_hour_durations() {
        let slots = generate_time_slots(date(2024, 12, 16), time(9, 0), time(10, 0), 45);
        let times: Vec<String> = slots
            .iter()
            .map(|(_, t)| t.format("%H:%M").to_string())
            .collect();
        assert_eq!(times, vec!["09:00", "09:45"]);
    }

    #[test]
    fn zero_duration_yields_nothing() {
        assert!(generate_time_slots(date(2024, 12, 16), time(9, 0), time(10, 0), 0).is_empty());
    }

    #[test]
    fn daily_recurrence_fills_every_following_day() {
        let slots = generate_recurring_slots(
            date(2024, 12, 16),
            time(9, 0),
            time(10, 0),
            30,
            RecurrenceType::Daily,
            date(2024, 12, 18),
        );
        let dates: Vec<NaiveDate> = slots.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 12, 17),
                date(2024, 12, 17),
                date(2024, 12, 18),
                date(2024, 12, 18),
            ]
        );
    }

    #[test]
    fn weekly_recurrence_matches_weekday() {
        // 2024-12-16 is a Monday.
        let slots = generate_recurring_slots(
            date(2024, 12, 16),
            time(9, 0),
            time(9, 30),
            30,
            RecurrenceType::Weekly,
            date(2025, 1, 1),
        );
        let dates: Vec<NaiveDate> = slots.iter().map(|(d, _)| *d).collect();
        assert_eq!(dates, vec![date(2024, 12, 23), date(2024, 12, 30)]);
    }

    #[test]
    fn monthly_recurrence_keeps_day_of_month() {
        let slots = generate_recurring_slots(
            date(2024, 10, 15),
            time(9, 0),
            time(9, 30),
            30,
            RecurrenceType::Monthly,
            date(2025, 1, 31),
        );
        let dates: Vec<NaiveDate> = slots.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            dates,
            vec![date(2024, 11, 15), date(2024, 12, 15), date(2025, 1, 15)]
        );
    }

    #[test]
    fn monthly_recurrence_skips_short_months() {
        let slots = generate_recurring_slots(
            date(2024, 12, 31),
            time(9, 0),
            time(9, 30),
            30,
            RecurrenceType::Monthly,
            date(2025, 3, 31),
        );
        let dates: Vec<NaiveDate> = slots.iter().map(|(d, _)| *d).collect();
        // January and March have a 31st; February clamps and is skipped.
        assert_eq!(dates, vec![date(2025, 1, 31), date(2025, 3, 31)]);
    }
}
