//! Appointment booking and lifecycle.
//!
//! Creating an appointment requires an available slot for the requested
//! doctor/date/time; booking marks that slot booked, and cancelling or
//! rescheduling (in the patient service) returns it to available.

use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{AppointmentRepository, SlotRepository},
    models::{
        Appointment, AppointmentDetail, CreateAppointmentDto, UpdateAppointmentDto,
    },
    Error, Result,
};

#[derive(Clone)]
pub struct AppointmentsService {
    appointments: AppointmentRepository,
    slots: SlotRepository,
}

impl AppointmentsService {
    pub fn new(appointments: AppointmentRepository, slots: SlotRepository) -> Self {
        Self {
            appointments,
            slots,
        }
    }

    pub async fn create(&self, dto: CreateAppointmentDto) -> Result<Appointment> {
        dto.validate()?;

        let slot = self
            .slots
            .find_available(dto.doctor_id, dto.date, dto.time)
            .await?
            .ok_or_else(|| {
                Error::BadRequest(
                    "No available slot found for the selected date and time".to_string(),
                )
            })?;

        let appointment = self.appointments.insert(&dto).await?;
        self.slots.mark_booked(slot.id, appointment.id).await?;

        tracing::info!(
            appointment_id = %appointment.id,
            doctor_id = %dto.doctor_id,
            patient_id = %dto.patient_id,
            "Appointment booked"
        );

        Ok(appointment)
    }

    pub async fn find_all(&self) -> Result<Vec<AppointmentDetail>> {
        self.appointments.find_all_detailed().await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<AppointmentDetail> {
        self.appointments
            .find_by_id_detailed(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Appointment with ID {id} not found")))
    }

    pub async fn find_by_patient(&self, patient_id: Uuid) -> Result<Vec<AppointmentDetail>> {
        self.appointments.find_by_patient_detailed(patient_id).await
    }

    pub async fn find_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<AppointmentDetail>> {
        self.appointments.find_by_doctor_detailed(doctor_id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateAppointmentDto) -> Result<Appointment> {
        self.appointments
            .update(id, &dto)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Appointment with ID {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        if !self.appointments.delete(id).await? {
            return Err(Error::NotFound(format!(
                "Appointment with ID {id} not found"
            )));
        }
        Ok(())
    }

    /// Free the slot currently held by an appointment, if any.
    pub async fn release_slot(&self, appointment_id: Uuid) -> Result<()> {
        if let Some(slot) = self.slots.find_by_appointment(appointment_id).await? {
            self.slots.release(slot.id).await?;
        }
        Ok(())
    }
}
