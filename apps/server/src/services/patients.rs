//! Patient-facing views: profile, dashboard, appointments, records, results,
//! prescriptions, and messages, shaped for the patient frontend.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{
    fmt, merge_json, AppointmentsService, LabResultsService, MedicalRecordsService,
    MessagesService, PrescriptionsService,
};
use crate::{
    db::{SlotRepository, UserRepository},
    models::{
        hhmm, AppointmentDetail, AppointmentStatus, ConversationDetail, CreateAppointmentDto,
        MedicalRecordCategory, Pagination, PrescriptionStatus, UpdateAppointmentDto,
        UpdateUserDto, User, UserRole,
    },
    Error, Result,
};

/// Booking payload used by `POST /patients/:id/appointments`; the patient id
/// comes from the route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentDto {
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: i32,
    #[serde(rename = "type")]
    pub appointment_type: Option<crate::models::AppointmentType>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleDto {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

#[derive(Clone)]
pub struct PatientsService {
    users: UserRepository,
    slots: SlotRepository,
    appointments: Arc<AppointmentsService>,
    medical_records: Arc<MedicalRecordsService>,
    lab_results: Arc<LabResultsService>,
    prescriptions: Arc<PrescriptionsService>,
    messages: Arc<MessagesService>,
}

impl PatientsService {
    pub fn new(
        users: UserRepository,
        slots: SlotRepository,
        appointments: Arc<AppointmentsService>,
        medical_records: Arc<MedicalRecordsService>,
        lab_results: Arc<LabResultsService>,
        prescriptions: Arc<PrescriptionsService>,
        messages: Arc<MessagesService>,
    ) -> Self {
        Self {
            users,
            slots,
            appointments,
            medical_records,
            lab_results,
            prescriptions,
            messages,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<User>> {
        self.users.find_by_role(UserRole::Patient).await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<User> {
        self.users
            .find_by_id_and_role(id, UserRole::Patient)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Patient with ID {id} not found")))
    }

    pub async fn update_profile(&self, patient_id: Uuid, dto: UpdateUserDto) -> Result<User> {
        self.find_one(patient_id).await?;
        self.users
            .update(patient_id, &dto)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Patient with ID {patient_id} not found")))
    }

    pub async fn get_appointments(
        &self,
        patient_id: Uuid,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Value>> {
        let appointments = self.appointments.find_by_patient(patient_id).await?;

        let filtered = appointments
            .into_iter()
            .filter(|apt| status.map_or(true, |s| apt.appointment.status == s));

        Ok(filtered
            .map(|apt| {
                let formatted_date = fmt::weekday_medium_date(apt.appointment.date);
                let formatted_time = apt.appointment.time.format("%H:%M").to_string();
                json!({
                    "id": apt.appointment.id,
                    "doctorId": apt.appointment.doctor_id,
                    "doctorName": apt.doctor_name(),
                    "doctorInitial": apt.doctor_initial(),
                    "specialty": apt.doctor_specialty(),
                    "clinicName": apt.clinic_name(),
                    "date": apt.appointment.date,
                    "formattedDate": formatted_date,
                    "time": formatted_time,
                    "formattedDateTime": format!("{formatted_date} at {formatted_time}"),
                    "status": apt.appointment.status,
                    "reason": apt.appointment.display_reason(),
                    "type": apt.appointment.appointment_type,
                })
            })
            .collect())
    }

    fn upcoming_of(appointments: Vec<AppointmentDetail>) -> Vec<AppointmentDetail> {
        let today = Utc::now().date_naive();
        appointments
            .into_iter()
            .filter(|apt| {
                apt.appointment.date >= today
                    && matches!(
                        apt.appointment.status,
                        AppointmentStatus::Confirmed | AppointmentStatus::Pending
                    )
            })
            .collect()
    }

    fn decorate_upcoming(apt: &AppointmentDetail) -> Value {
        let date = apt.appointment.date;
        merge_json(
            serde_json::to_value(apt).unwrap_or_default(),
            json!({
                "month": fmt::month_upper(date),
                "day": date.day(),
                "weekday": fmt::weekday_long(date),
                "doctorName": apt.doctor_name(),
                "doctorInitial": apt.doctor_initial(),
                "specialty": apt.doctor_specialty(),
                "clinicName": apt.clinic_name(),
            }),
        )
    }

    pub async fn get_upcoming_appointments(&self, patient_id: Uuid) -> Result<Vec<Value>> {
        let appointments = self.appointments.find_by_patient(patient_id).await?;
        Ok(Self::upcoming_of(appointments)
            .iter()
            .map(Self::decorate_upcoming)
            .collect())
    }

    pub async fn get_medical_records(
        &self,
        patient_id: Uuid,
        category: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<Value> {
        let records = self.medical_records.find_by_patient(patient_id).await?;

        let mapped_category = category
            .map(|c| MedicalRecordCategory::from_query(c).unwrap_or("all"))
            .unwrap_or("all");

        let filtered: Vec<_> = records
            .into_iter()
            .filter(|record| {
                mapped_category == "all" || record.record.category.as_str() == mapped_category
            })
            .collect();

        let formatted: Vec<Value> = filtered
            .iter()
            .map(|record| {
                // Display status derived from the category, as the frontend
                // expects.
                let status = match record.record.category {
                    MedicalRecordCategory::Diagnosis => "Resolved",
                    MedicalRecordCategory::Allergy => "Confirmed",
                    _ => "Active",
                };

                json!({
                    "id": record.record.id,
                    "title": record.record.title,
                    "category": record.record.category,
                    "categoryDisplay": record.record.category.display_name(),
                    "description": record.record.description,
                    "date": record.record.date,
                    "formattedDate": fmt::long_date(record.record.date),
                    "providerName": record.doctor_name(),
                    "status": status,
                    "attachments": record.record.attachments.clone().unwrap_or_default(),
                })
            })
            .collect();

        let total = formatted.len() as i64;
        let start = ((page - 1) * limit).max(0) as usize;
        let paginated: Vec<Value> = formatted
            .into_iter()
            .skip(start)
            .take(limit.max(0) as usize)
            .collect();

        Ok(json!({
            "records": paginated,
            "pagination": Pagination::new(total, page, limit),
        }))
    }

    pub async fn get_lab_results(
        &self,
        patient_id: Uuid,
        test_type: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Value> {
        let mut results = self.lab_results.find_by_patient(patient_id).await?;

        if let Some(test_type) = test_type {
            if test_type != "All Test Types" {
                let needle = test_type.to_lowercase();
                results.retain(|r| r.result.test_name.to_lowercase().contains(&needle));
            }
        }
        if let Some(start) = start_date {
            results.retain(|r| r.result.test_date >= start);
        }
        if let Some(end) = end_date {
            results.retain(|r| r.result.test_date <= end);
        }

        let mut rows = Vec::new();
        for result in &results {
            let formatted_date = fmt::medium_date(result.result.test_date);
            let items = &result.result.results.0;

            if !items.is_empty() {
                for (index, item) in items.iter().enumerate() {
                    let display_value = match &item.value {
                        Value::Number(n) => format!("{} {}", n, item.unit),
                        other => other.as_str().map(str::to_string).unwrap_or_default(),
                    };
                    rows.push(json!({
                        "id": format!("{}-{index}", result.result.id),
                        "testName": (if index == 0 { result.result.test_name.clone() } else { String::new() }),
                        "testDate": formatted_date,
                        "result": display_value,
                        "value": item.value,
                        "unit": item.unit,
                        "referenceRange": item.reference_range,
                        "status": item.status,
                        "statusDisplay": item.status.display_name(),
                        "labResultId": result.result.id,
                        "doctorNotes": (if index == 0 { result.result.doctor_notes.clone() } else { None }),
                        "doctorName": result.doctor_name(),
                    }));
                }
            } else {
                rows.push(json!({
                    "id": result.result.id,
                    "testName": result.result.test_name,
                    "testDate": formatted_date,
                    "result": "See Details",
                    "referenceRange": "Varies by component",
                    "status": "normal",
                    "statusDisplay": "Normal",
                    "labResultId": result.result.id,
                    "doctorNotes": result.result.doctor_notes,
                    "doctorName": result.doctor_name(),
                }));
            }
        }

        // Results are sorted newest-first, so the first carries the latest
        // doctor notes.
        let doctor_notes = results.first().and_then(|latest| {
            latest.result.doctor_notes.as_ref().map(|content| {
                json!({
                    "date": latest.result.test_date,
                    "formattedDate": fmt::medium_date(latest.result.test_date),
                    "doctorName": latest.doctor_name(),
                    "content": content,
                })
            })
        });

        Ok(json!({
            "results": rows,
            "doctorNotes": doctor_notes,
        }))
    }

    pub async fn get_prescriptions(
        &self,
        patient_id: Uuid,
        status: Option<PrescriptionStatus>,
    ) -> Result<Vec<Value>> {
        let prescriptions = self.prescriptions.find_by_patient(patient_id).await?;

        Ok(prescriptions
            .into_iter()
            .filter(|p| status.map_or(true, |s| p.prescription.status == s))
            .map(|prescription| {
                let medications = &prescription.prescription.medications.0;
                let first = medications.first();
                let refills = prescription.prescription.refills_remaining.unwrap_or(0);

                json!({
                    "id": prescription.prescription.id,
                    "medicationName": first.map(|m| m.name.clone())
                        .unwrap_or_else(|| "Unknown Medication".to_string()),
                    "dosage": first.map(|m| m.dosage.clone()).unwrap_or_default(),
                    "frequency": first.map(|m| m.frequency.clone()).unwrap_or_default(),
                    "duration": first.map(|m| m.duration.clone()).unwrap_or_default(),
                    "instructions": first.and_then(|m| m.instructions.clone()).unwrap_or_default(),
                    "status": prescription.prescription.status,
                    "statusDisplay": prescription.prescription.status.display_name(),
                    "prescribedDate": prescription.prescription.prescribed_date,
                    "formattedDate": fmt::long_date(prescription.prescription.prescribed_date),
                    "expiryDate": prescription.prescription.expiry_date,
                    "refillsRemaining": refills,
                    "hasRefills": refills > 0,
                    "doctorName": prescription.doctor_name(),
                    "doctorSpecialty": prescription.doctor_specialty(),
                    "medications": medications,
                })
            })
            .collect())
    }

    pub async fn get_active_prescriptions(&self, patient_id: Uuid) -> Result<Vec<Value>> {
        self.get_prescriptions(patient_id, Some(PrescriptionStatus::Active))
            .await
    }

    fn decorate_conversation(conv: &ConversationDetail, patient_id: Uuid) -> Value {
        let other = conv.other_participant(patient_id);
        let last_message = conv.last_message();
        let last_at = last_message
            .map(|m| m.created_at)
            .unwrap_or(conv.conversation.updated_at);
        let now = Utc::now();

        json!({
            "id": conv.conversation.id,
            "name": other.map(|p| p.full_name.clone()).unwrap_or_else(|| "Unknown".to_string()),
            "avatar": other.map(|p| p.initial()).unwrap_or_else(|| "?".to_string()),
            "lastMessage": last_message.map(|m| m.content.clone())
                .unwrap_or_else(|| "No messages".to_string()),
            "snippet": last_message.map(|m| fmt::snippet(&m.content, 50)).unwrap_or_default(),
            "time": fmt::relative_time(last_at, now),
            "unread": conv.conversation.unread_count > 0,
            "unreadCount": conv.conversation.unread_count,
            // Presence is not tracked.
            "online": false,
        })
    }

    pub async fn get_messages(
        &self,
        patient_id: Uuid,
        conversation_id: Option<Uuid>,
    ) -> Result<Value> {
        let conversations = self.messages.get_conversations(patient_id).await?;

        let formatted: Vec<Value> = conversations
            .iter()
            .map(|conv| Self::decorate_conversation(conv, patient_id))
            .collect();

        if let Some(conversation_id) = conversation_id {
            if let Some(conversation) = conversations
                .iter()
                .find(|c| c.conversation.id == conversation_id)
            {
                let messages = self.messages.find_by_conversation(conversation_id).await?;
                let formatted_messages: Vec<Value> = messages
                    .iter()
                    .map(|msg| {
                        json!({
                            "id": msg.message.id,
                            "senderId": msg.message.sender_id,
                            "senderName": msg.sender.as_ref().map(|s| s.full_name.clone())
                                .unwrap_or_else(|| "Unknown".to_string()),
                            "senderInitial": msg.sender.as_ref().map(|s| s.initial())
                                .unwrap_or_else(|| "?".to_string()),
                            "receiverId": msg.message.receiver_id,
                            "content": msg.message.content,
                            "read": msg.message.read,
                            "createdAt": msg.message.created_at,
                            "formattedTime": fmt::time_ampm(msg.message.created_at.time()),
                            "formattedDate": fmt::medium_date(msg.message.created_at.date_naive()),
                            "isPatient": msg.message.sender_id == patient_id,
                        })
                    })
                    .collect();

                return Ok(json!({
                    "conversations": formatted,
                    "currentConversation": {
                        "id": conversation.conversation.id,
                        "participants": conversation.participants,
                        "messages": formatted_messages,
                    },
                }));
            }
        }

        Ok(json!({ "conversations": formatted }))
    }

    pub async fn get_dashboard(&self, patient_id: Uuid) -> Result<Value> {
        let patient = self.find_one(patient_id).await?;
        let all_appointments = self.appointments.find_by_patient(patient_id).await?;
        let lab_results = self.lab_results.find_by_patient(patient_id).await?;
        let active_prescriptions = self.get_active_prescriptions(patient_id).await?;
        let conversations = self.messages.get_conversations(patient_id).await?;
        let total_records = self.medical_records.count_by_patient(patient_id).await?;

        let upcoming: Vec<Value> = Self::upcoming_of(all_appointments.clone())
            .iter()
            .take(5)
            .map(|apt| {
                let date = apt.appointment.date;
                json!({
                    "id": apt.appointment.id,
                    "doctorId": apt.appointment.doctor_id,
                    "date": date,
                    "month": fmt::month_upper(date),
                    "day": date.day(),
                    "weekday": fmt::weekday_long(date),
                    "time": apt.appointment.time.format("%H:%M").to_string(),
                    "doctorName": apt.doctor_name(),
                    "doctorInitial": apt.doctor_initial(),
                    "specialty": apt.doctor_specialty(),
                    "clinicName": apt.clinic_name(),
                    "reason": apt.appointment.display_reason(),
                    "status": apt.appointment.status,
                })
            })
            .collect();

        let now = Utc::now();
        let secure_messages: Vec<Value> = conversations
            .iter()
            .take(3)
            .map(|conv| {
                let other = conv.other_participant(patient_id);
                let last_message = conv.last_message();
                json!({
                    "id": conv.conversation.id,
                    "name": other.map(|p| p.full_name.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    "avatar": other.map(|p| p.initial()).unwrap_or_else(|| "?".to_string()),
                    "lastMessage": last_message.map(|m| m.content.clone())
                        .unwrap_or_else(|| "No messages".to_string()),
                    "snippet": last_message.map(|m| fmt::snippet(&m.content, 30))
                        .unwrap_or_default(),
                    "time": last_message.map(|m| fmt::time_ampm(m.created_at.time()))
                        .unwrap_or_default(),
                    "unread": conv.conversation.unread_count > 0,
                    "unreadCount": conv.conversation.unread_count,
                })
            })
            .collect();

        let recent_lab_results: Vec<_> = lab_results.iter().take(3).collect();
        let has_new_lab_results = recent_lab_results.iter().any(|result| {
            (now.date_naive() - result.result.test_date).num_days() <= 7
        });

        let unread_total: i32 = conversations
            .iter()
            .map(|c| c.conversation.unread_count)
            .sum();

        Ok(json!({
            "patientName": patient.full_name,
            "upcomingAppointments": upcoming,
            "secureMessages": secure_messages,
            "recentLabResults": recent_lab_results.iter().map(|result| json!({
                "id": result.result.id,
                "testName": result.result.test_name,
                "testDate": result.result.test_date,
                "status": result.result.results.0.first().map(|i| i.status.as_str())
                    .unwrap_or("normal"),
            })).collect::<Vec<_>>(),
            "activePrescriptions": active_prescriptions.iter().take(3).map(|p| json!({
                "id": p.get("id"),
                "medicationName": p.get("medicationName"),
                "dosage": p.get("dosage"),
                "frequency": p.get("frequency"),
            })).collect::<Vec<_>>(),
            "unreadMessagesCount": unread_total,
            "hasNewLabResults": has_new_lab_results,
            "totalAppointments": all_appointments.len(),
            "totalMedicalRecords": total_records,
        }))
    }

    pub async fn book_appointment(
        &self,
        patient_id: Uuid,
        dto: BookAppointmentDto,
    ) -> Result<crate::models::Appointment> {
        self.appointments
            .create(CreateAppointmentDto {
                patient_id,
                doctor_id: dto.doctor_id,
                clinic_id: dto.clinic_id,
                date: dto.date,
                time: dto.time,
                duration: dto.duration,
                status: Some(AppointmentStatus::Pending),
                appointment_type: dto.appointment_type,
                reason: dto.reason,
                notes: dto.notes,
            })
            .await
    }

    pub async fn cancel_appointment(
        &self,
        patient_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<crate::models::Appointment> {
        let appointment = self.appointments.find_one(appointment_id).await?;
        if appointment.appointment.patient_id != patient_id {
            return Err(Error::NotFound("Appointment not found".to_string()));
        }

        self.appointments.release_slot(appointment_id).await?;

        self.appointments
            .update(
                appointment_id,
                UpdateAppointmentDto {
                    status: Some(AppointmentStatus::Cancelled),
                    ..UpdateAppointmentDto::default()
                },
            )
            .await
    }

    pub async fn reschedule_appointment(
        &self,
        patient_id: Uuid,
        appointment_id: Uuid,
        dto: RescheduleDto,
    ) -> Result<crate::models::Appointment> {
        let appointment = self.appointments.find_one(appointment_id).await?;
        if appointment.appointment.patient_id != patient_id {
            return Err(Error::NotFound("Appointment not found".to_string()));
        }

        // Find the new slot before releasing the old one so a failed
        // reschedule leaves the booking untouched.
        let new_slot = self
            .slots
            .find_available(appointment.appointment.doctor_id, dto.date, dto.time)
            .await?
            .ok_or_else(|| {
                Error::BadRequest(
                    "No available slot found for the selected date and time".to_string(),
                )
            })?;

        self.appointments.release_slot(appointment_id).await?;

        let updated = self
            .appointments
            .update(
                appointment_id,
                UpdateAppointmentDto {
                    date: Some(dto.date),
                    time: Some(dto.time),
                    status: Some(AppointmentStatus::Rescheduled),
                    ..UpdateAppointmentDto::default()
                },
            )
            .await?;

        self.slots.mark_booked(new_slot.id, appointment_id).await?;

        Ok(updated)
    }

    pub async fn request_prescription_refill(
        &self,
        patient_id: Uuid,
        prescription_id: Uuid,
    ) -> Result<crate::models::Prescription> {
        let prescription = self.prescriptions.find_one(prescription_id).await?;
        if prescription.prescription.patient_id != patient_id {
            return Err(Error::NotFound("Prescription not found".to_string()));
        }
        self.prescriptions
            .update_status(prescription_id, PrescriptionStatus::RefillRequested)
            .await
    }
}
