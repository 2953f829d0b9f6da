//! Lab result CRUD

use uuid::Uuid;

use crate::{
    db::LabResultRepository,
    models::{CreateLabResultDto, LabResult, LabResultDetail, UpdateLabResultDto},
    Error, Result,
};

#[derive(Clone)]
pub struct LabResultsService {
    results: LabResultRepository,
}

impl LabResultsService {
    pub fn new(results: LabResultRepository) -> Self {
        Self { results }
    }

    pub async fn create(&self, dto: CreateLabResultDto) -> Result<LabResult> {
        let patient_id = dto
            .patient_id
            .ok_or_else(|| Error::BadRequest("patientId is required".to_string()))?;
        let doctor_id = dto
            .doctor_id
            .ok_or_else(|| Error::BadRequest("doctorId is required".to_string()))?;
        self.results.insert(patient_id, doctor_id, &dto).await
    }

    pub async fn find_all(&self) -> Result<Vec<LabResultDetail>> {
        self.results.find_all_detailed().await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<LabResultDetail> {
        self.results
            .find_by_id_detailed(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Lab result with ID {id} not found")))
    }

    pub async fn find_by_patient(&self, patient_id: Uuid) -> Result<Vec<LabResultDetail>> {
        self.results.find_by_patient_detailed(patient_id).await
    }

    pub async fn count_by_patient(&self, patient_id: Uuid) -> Result<i64> {
        self.results.count_by_patient(patient_id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateLabResultDto) -> Result<LabResult> {
        self.results
            .update(id, &dto)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Lab result with ID {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        if !self.results.delete(id).await? {
            return Err(Error::NotFound(format!(
                "Lab result with ID {id} not found"
            )));
        }
        Ok(())
    }
}
