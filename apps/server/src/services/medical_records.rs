//! Medical record CRUD

use uuid::Uuid;

use crate::{
    db::MedicalRecordRepository,
    models::{CreateMedicalRecordDto, MedicalRecord, MedicalRecordDetail, UpdateMedicalRecordDto},
    Error, Result,
};

#[derive(Clone)]
pub struct MedicalRecordsService {
    records: MedicalRecordRepository,
}

impl MedicalRecordsService {
    pub fn new(records: MedicalRecordRepository) -> Self {
        Self { records }
    }

    pub async fn create(&self, dto: CreateMedicalRecordDto) -> Result<MedicalRecord> {
        let patient_id = dto
            .patient_id
            .ok_or_else(|| Error::BadRequest("patientId is required".to_string()))?;
        let doctor_id = dto
            .doctor_id
            .ok_or_else(|| Error::BadRequest("doctorId is required".to_string()))?;
        self.records.insert(patient_id, doctor_id, &dto).await
    }

    pub async fn find_all(&self) -> Result<Vec<MedicalRecordDetail>> {
        self.records.find_all_detailed().await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<MedicalRecordDetail> {
        self.records
            .find_by_id_detailed(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Medical record with ID {id} not found")))
    }

    pub async fn find_by_patient(&self, patient_id: Uuid) -> Result<Vec<MedicalRecordDetail>> {
        self.records.find_by_patient_detailed(patient_id).await
    }

    pub async fn count_by_patient(&self, patient_id: Uuid) -> Result<i64> {
        self.records.count_by_patient(patient_id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateMedicalRecordDto) -> Result<MedicalRecord> {
        self.records
            .update(id, &dto)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Medical record with ID {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        if !self.records.delete(id).await? {
            return Err(Error::NotFound(format!(
                "Medical record with ID {id} not found"
            )));
        }
        Ok(())
    }
}
