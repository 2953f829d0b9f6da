//! Shared application state: configuration, database pool, and services.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::AuthManager,
    config::Config,
    db::{
        AppointmentRepository, ClinicRepository, HomePageRepository, LabResultRepository,
        MedicalRecordRepository, MessageRepository, PrescriptionRepository, ShiftRepository,
        SlotRepository, UserRepository,
    },
    services::{
        AdminService, AppointmentsService, AssistantsService, AuthService, ClinicsService,
        DoctorsService, HomePageService, LabResultsService, MedicalRecordsService,
        MessagesService, PatientsService, PrescriptionsService, UsersService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: PgPool,
    pub auth: AuthManager,
    pub auth_service: Arc<AuthService>,
    pub users_service: Arc<UsersService>,
    pub patients_service: Arc<PatientsService>,
    pub doctors_service: Arc<DoctorsService>,
    pub assistants_service: Arc<AssistantsService>,
    pub appointments_service: Arc<AppointmentsService>,
    pub medical_records_service: Arc<MedicalRecordsService>,
    pub lab_results_service: Arc<LabResultsService>,
    pub prescriptions_service: Arc<PrescriptionsService>,
    pub messages_service: Arc<MessagesService>,
    pub clinics_service: Arc<ClinicsService>,
    pub home_page_service: Arc<HomePageService>,
    pub admin_service: Arc<AdminService>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = connect_pool(&config).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self::with_pool(config, pool))
    }

    /// Wire repositories and services onto an existing pool.
    pub fn with_pool(config: Config, pool: PgPool) -> Self {
        let config = Arc::new(config);
        let auth = AuthManager::new(&config);

        let users_repo = UserRepository::new(pool.clone());
        let clinics_repo = ClinicRepository::new(pool.clone());
        let appointments_repo = AppointmentRepository::new(pool.clone());
        let slots_repo = SlotRepository::new(pool.clone());
        let records_repo = MedicalRecordRepository::new(pool.clone());
        let labs_repo = LabResultRepository::new(pool.clone());
        let prescriptions_repo = PrescriptionRepository::new(pool.clone());
        let messages_repo = MessageRepository::new(pool.clone());
        let shifts_repo = ShiftRepository::new(pool.clone());
        let home_page_repo = HomePageRepository::new(pool.clone());

        let appointments_service = Arc::new(AppointmentsService::new(
            appointments_repo.clone(),
            slots_repo.clone(),
        ));
        let medical_records_service = Arc::new(MedicalRecordsService::new(records_repo));
        let lab_results_service = Arc::new(LabResultsService::new(labs_repo));
        let prescriptions_service = Arc::new(PrescriptionsService::new(prescriptions_repo));
        let messages_service = Arc::new(MessagesService::new(messages_repo));
        let clinics_service = Arc::new(ClinicsService::new(clinics_repo.clone()));
        let home_page_service = Arc::new(HomePageService::new(home_page_repo));
        let users_service = Arc::new(UsersService::new(users_repo.clone()));
        let auth_service = Arc::new(AuthService::new(users_repo.clone(), auth.clone()));

        let patients_service = Arc::new(PatientsService::new(
            users_repo.clone(),
            slots_repo.clone(),
            appointments_service.clone(),
            medical_records_service.clone(),
            lab_results_service.clone(),
            prescriptions_service.clone(),
            messages_service.clone(),
        ));
        let doctors_service = Arc::new(DoctorsService::new(
            users_repo.clone(),
            slots_repo,
            appointments_service.clone(),
            medical_records_service.clone(),
            lab_results_service.clone(),
            prescriptions_service.clone(),
            messages_service.clone(),
            clinics_service.clone(),
        ));
        let assistants_service = Arc::new(AssistantsService::new(
            users_repo.clone(),
            shifts_repo,
            appointments_service.clone(),
            medical_records_service.clone(),
            lab_results_service.clone(),
            prescriptions_service.clone(),
            messages_service.clone(),
            clinics_service.clone(),
        ));
        let admin_service = Arc::new(AdminService::new(
            users_repo,
            appointments_repo,
            clinics_repo,
            appointments_service.clone(),
            medical_records_service.clone(),
            lab_results_service.clone(),
            prescriptions_service.clone(),
            messages_service.clone(),
        ));

        Self {
            config,
            pool,
            auth,
            auth_service,
            users_service,
            patients_service,
            doctors_service,
            assistants_service,
            appointments_service,
            medical_records_service,
            lab_results_service,
            prescriptions_service,
            messages_service,
            clinics_service,
            home_page_service,
            admin_service,
        }
    }
}

async fn connect_pool(config: &Config) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to PostgreSQL")
}
