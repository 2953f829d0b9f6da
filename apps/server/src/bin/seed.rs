//! Demo data seeder
//!
//! Idempotently creates the two clinic locations, one user per role, and two
//! weeks of appointment slots for the demo doctor. Safe to run repeatedly.

use anyhow::Context;
use chrono::{Days, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use sakura::{auth::hash_password, config::Config, logging, models::UserRole};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Starting database seeding");

    let bakshiganj = ensure_clinic(
        &pool,
        "Sakura Healthcare - Bakshiganj",
        "Bakshiganj, Jamalpur",
        "+8801234567891",
        "bakshiganj@sakura.com",
        "Main clinic location in Bakshiganj, Jamalpur. Providing comprehensive ENT care services.",
    )
    .await?;

    ensure_clinic(
        &pool,
        "Sakura Healthcare - Sherpur",
        "Sherpur, Jamalpur",
        "+8801234567892",
        "sherpur@sakura.com",
        "Branch clinic in Sherpur, Jamalpur. Providing comprehensive ENT care services.",
    )
    .await?;

    ensure_user(
        &pool,
        SeedUser {
            email: "admin@sakura.com",
            phone_number: "+8801234567890",
            full_name: "Admin User",
            password: "admin123",
            role: Some(UserRole::Admin),
            ..SeedUser::default()
        },
    )
    .await?;

    let doctor_id = ensure_user(
        &pool,
        SeedUser {
            email: "doctor@sakura.com",
            phone_number: "+8801234567891",
            full_name: "Dr. Ashraful Islam Razib",
            password: "doctor123",
            role: Some(UserRole::Doctor),
            specialty: Some("ENT"),
            license_number: Some("DOC-ENT-001"),
            bio: Some(
                "Experienced ENT specialist providing comprehensive ear, nose, and throat care \
                 at Sakura Healthcare, Bakshiganj, Jamalpur.",
            ),
            years_of_experience: Some(10),
            clinic_id: Some(bakshiganj),
            ..SeedUser::default()
        },
    )
    .await?;

    ensure_user(
        &pool,
        SeedUser {
            email: "patient@sakura.com",
            phone_number: "+8801234567892",
            full_name: "John Doe",
            password: "patient123",
            role: Some(UserRole::Patient),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15),
            gender: Some("male"),
            ..SeedUser::default()
        },
    )
    .await?;

    ensure_user(
        &pool,
        SeedUser {
            email: "assistant@sakura.com",
            phone_number: "+8801234567893",
            full_name: "Assistant User",
            password: "assistant123",
            role: Some(UserRole::Assistant),
            doctor_id: Some(doctor_id),
            clinic_id: Some(bakshiganj),
            ..SeedUser::default()
        },
    )
    .await?;

    seed_slots(&pool, doctor_id, bakshiganj).await?;

    tracing::info!("Database seeding complete");
    Ok(())
}

async fn ensure_clinic(
    pool: &PgPool,
    name: &str,
    address: &str,
    phone: &str,
    email: &str,
    description: &str,
) -> anyhow::Result<Uuid> {
    if let Some(id) =
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM clinics WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?
    {
        tracing::info!(clinic = name, "Clinic already exists");
        return Ok(id);
    }

    let operating_hours = serde_json::json!({
        "monday": { "open": "09:00", "close": "17:00", "closed": false },
        "tuesday": { "open": "09:00", "close": "17:00", "closed": false },
        "wednesday": { "open": "09:00", "close": "17:00", "closed": false },
        "thursday": { "open": "09:00", "close": "17:00", "closed": false },
        "friday": { "open": "09:00", "close": "17:00", "closed": false },
        "saturday": { "open": "09:00", "close": "13:00", "closed": false },
        "sunday": { "open": "09:00", "close": "13:00", "closed": false },
    });

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO clinics (name, address, phone, email, description, operating_hours)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(address)
    .bind(phone)
    .bind(email)
    .bind(description)
    .bind(operating_hours)
    .fetch_one(pool)
    .await?;

    tracing::info!(clinic = name, "Clinic created");
    Ok(id)
}

#[derive(Default)]
struct SeedUser<'a> {
    email: &'a str,
    phone_number: &'a str,
    full_name: &'a str,
    password: &'a str,
    role: Option<UserRole>,
    specialty: Option<&'a str>,
    license_number: Option<&'a str>,
    bio: Option<&'a str>,
    years_of_experience: Option<i32>,
    date_of_birth: Option<NaiveDate>,
    gender: Option<&'a str>,
    doctor_id: Option<Uuid>,
    clinic_id: Option<Uuid>,
}

async fn ensure_user(pool: &PgPool, user: SeedUser<'_>) -> anyhow::Result<Uuid> {
    if let Some(id) = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(user.email)
        .fetch_optional(pool)
        .await?
    {
        tracing::info!(email = user.email, "User already exists");
        return Ok(id);
    }

    let password_hash =
        hash_password(user.password).map_err(|e| anyhow::anyhow!("password hash: {e}"))?;

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO users (
            email, phone_number, full_name, role, password_hash, is_verified,
            specialty, license_number, bio, years_of_experience,
            date_of_birth, gender, doctor_id, clinic_id
        )
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING id
        "#,
    )
    .bind(user.email)
    .bind(user.phone_number)
    .bind(user.full_name)
    .bind(user.role.unwrap_or(UserRole::Patient))
    .bind(password_hash)
    .bind(user.specialty)
    .bind(user.license_number)
    .bind(user.bio)
    .bind(user.years_of_experience)
    .bind(user.date_of_birth)
    .bind(user.gender)
    .bind(user.doctor_id)
    .bind(user.clinic_id)
    .fetch_one(pool)
    .await?;

    tracing::info!(email = user.email, "User created");
    Ok(id)
}

/// Two weeks of 30-minute morning slots, skipping days that already have any.
async fn seed_slots(pool: &PgPool, doctor_id: Uuid, clinic_id: Uuid) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let mut created = 0u32;

    for day_offset in 0..14u64 {
        let date = today + Days::new(day_offset);

        let existing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointment_slots WHERE doctor_id = $1 AND date = $2",
        )
        .bind(doctor_id)
        .bind(date)
        .fetch_one(pool)
        .await?;
        if existing > 0 {
            continue;
        }

        for half_hour in 0..6u32 {
            let time = NaiveTime::from_hms_opt(9 + half_hour / 2, (half_hour % 2) * 30, 0)
                .expect("valid seed slot time");
            sqlx::query(
                r#"
                INSERT INTO appointment_slots (doctor_id, date, time, duration, clinic_id, status)
                VALUES ($1, $2, $3, 30, $4, 'available')
                "#,
            )
            .bind(doctor_id)
            .bind(date)
            .bind(time)
            .bind(clinic_id)
            .execute(pool)
            .await?;
            created += 1;
        }
    }

    tracing::info!(slots = created, "Appointment slots seeded");
    Ok(())
}
