//! Prescription CRUD; consumed by the patient, doctor, and admin modules.

use uuid::Uuid;

use crate::{
    db::PrescriptionRepository,
    models::{
        CreatePrescriptionDto, Prescription, PrescriptionDetail, PrescriptionStatus,
        UpdatePrescriptionDto,
    },
    Error, Result,
};

#[derive(Clone)]
pub struct PrescriptionsService {
    prescriptions: PrescriptionRepository,
}

impl PrescriptionsService {
    pub fn new(prescriptions: PrescriptionRepository) -> Self {
        Self { prescriptions }
    }

    pub async fn create(&self, dto: CreatePrescriptionDto) -> Result<Prescription> {
        let patient_id = dto
            .patient_id
            .ok_or_else(|| Error::BadRequest("patientId is required".to_string()))?;
        let doctor_id = dto
            .doctor_id
            .ok_or_else(|| Error::BadRequest("doctorId is required".to_string()))?;
        self.prescriptions.insert(patient_id, doctor_id, &dto).await
    }

    pub async fn find_all(&self) -> Result<Vec<PrescriptionDetail>> {
        self.prescriptions.find_all_detailed().await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<PrescriptionDetail> {
        self.prescriptions
            .find_by_id_detailed(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Prescription with ID {id} not found")))
    }

    pub async fn find_by_patient(&self, patient_id: Uuid) -> Result<Vec<PrescriptionDetail>> {
        self.prescriptions.find_by_patient_detailed(patient_id).await
    }

    pub async fn count_by_patient(&self, patient_id: Uuid) -> Result<i64> {
        self.prescriptions.count_by_patient(patient_id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdatePrescriptionDto) -> Result<Prescription> {
        self.prescriptions
            .update(id, &dto)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Prescription with ID {id} not found")))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: PrescriptionStatus,
    ) -> Result<Prescription> {
        self.prescriptions
            .update_status(id, status)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Prescription with ID {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        if !self.prescriptions.delete(id).await? {
            return Err(Error::NotFound(format!(
                "Prescription with ID {id} not found"
            )));
        }
        Ok(())
    }
}
