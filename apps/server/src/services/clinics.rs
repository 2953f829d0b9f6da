//! Clinic CRUD

use uuid::Uuid;
use validator::Validate;

use crate::{
    db::ClinicRepository,
    models::{
        clinic::ClinicWithDoctors, Clinic, CreateClinicDto, UpdateClinicDto,
    },
    Error, Result,
};

#[derive(Clone)]
pub struct ClinicsService {
    clinics: ClinicRepository,
}

impl ClinicsService {
    pub fn new(clinics: ClinicRepository) -> Self {
        Self { clinics }
    }

    pub async fn create(&self, dto: CreateClinicDto) -> Result<Clinic> {
        dto.validate()?;
        self.clinics.insert(&dto).await
    }

    pub async fn find_all(&self) -> Result<Vec<ClinicWithDoctors>> {
        let clinics = self.clinics.find_all().await?;
        let mut result = Vec::with_capacity(clinics.len());
        for clinic in clinics {
            let doctors = self.clinics.doctors_of(clinic.id).await?;
            result.push(ClinicWithDoctors { clinic, doctors });
        }
        Ok(result)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<ClinicWithDoctors> {
        let clinic = self
            .clinics
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Clinic with ID {id} not found")))?;
        let doctors = self.clinics.doctors_of(id).await?;
        Ok(ClinicWithDoctors { clinic, doctors })
    }

    pub async fn find_row(&self, id: Uuid) -> Result<Clinic> {
        self.clinics
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Clinic with ID {id} not found")))
    }

    pub async fn update(&self, id: Uuid, dto: UpdateClinicDto) -> Result<Clinic> {
        dto.validate()?;
        self.clinics
            .update(id, &dto)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Clinic with ID {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        if !self.clinics.delete(id).await? {
            return Err(Error::NotFound(format!("Clinic with ID {id} not found")));
        }
        Ok(())
    }
}
