//! User repository - queries over the role-tagged users table

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    models::{NotificationPreferences, UpdateUserDto, User, UserRole},
    Result,
};

/// Insert payload for a new user row.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub phone_number: String,
    pub full_name: String,
    pub role: Option<UserRole>,
    pub password_hash: String,
    pub is_verified: bool,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub specialty: Option<String>,
    pub license_number: Option<String>,
    pub bio: Option<String>,
    pub years_of_experience: Option<i32>,
    pub permissions: Option<Vec<String>>,
    pub doctor_id: Option<Uuid>,
    pub clinic_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                email, phone_number, full_name, role, password_hash, is_verified,
                date_of_birth, gender, specialty, license_number, bio,
                years_of_experience, permissions, doctor_id, clinic_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(&new.email)
        .bind(&new.phone_number)
        .bind(&new.full_name)
        .bind(new.role.unwrap_or(UserRole::Patient))
        .bind(&new.password_hash)
        .bind(new.is_verified)
        .bind(new.date_of_birth)
        .bind(&new.gender)
        .bind(&new.specialty)
        .bind(&new.license_number)
        .bind(&new.bio)
        .bind(new.years_of_experience)
        .bind(&new.permissions)
        .bind(new.doctor_id)
        .bind(new.clinic_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id_and_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND role = $2")
            .bind(id)
            .bind(role)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        let users =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 ORDER BY created_at DESC")
                .bind(role)
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    pub async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone_number = $1")
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone_number: &str,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 OR phone_number = $2 LIMIT 1",
        )
        .bind(email)
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, dto: &UpdateUserDto) -> Result<Option<User>> {
        let emergency_contact = dto
            .emergency_contact
            .as_ref()
            .map(sqlx::types::Json);

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                phone_number = COALESCE($3, phone_number),
                full_name = COALESCE($4, full_name),
                avatar = COALESCE($5, avatar),
                date_of_birth = COALESCE($6, date_of_birth),
                gender = COALESCE($7, gender),
                address = COALESCE($8, address),
                emergency_contact = COALESCE($9, emergency_contact),
                specialty = COALESCE($10, specialty),
                license_number = COALESCE($11, license_number),
                bio = COALESCE($12, bio),
                years_of_experience = COALESCE($13, years_of_experience),
                is_verified = COALESCE($14, is_verified),
                clinic_id = COALESCE($15, clinic_id),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.email)
        .bind(&dto.phone_number)
        .bind(&dto.full_name)
        .bind(&dto.avatar)
        .bind(dto.date_of_birth)
        .bind(&dto.gender)
        .bind(&dto.address)
        .bind(emergency_contact)
        .bind(&dto.specialty)
        .bind(&dto.license_number)
        .bind(&dto.bio)
        .bind(dto.years_of_experience)
        .bind(dto.is_verified)
        .bind(dto.clinic_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_permissions(&self, id: Uuid, permissions: &[String]) -> Result<bool> {
        let result =
            sqlx::query("UPDATE users SET permissions = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(permissions)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_notification_preferences(
        &self,
        id: Uuid,
        preferences: &NotificationPreferences,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET notification_preferences = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(sqlx::types::Json(preferences))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn set_clinic(&self, id: Uuid, clinic_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("UPDATE users SET clinic_id = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(clinic_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_role(&self, role: UserRole) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE created_at >= $1 AND created_at <= $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<User>> {
        let users =
            sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC LIMIT $1")
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    /// Admin user listing: optional role filter and ILIKE search over
    /// name/email/phone, newest first, SQL pagination.
    pub async fn search_page(
        &self,
        role: Option<UserRole>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64)> {
        fn apply_filters<'a>(
            builder: &mut QueryBuilder<'a, Postgres>,
            role: Option<UserRole>,
            search: Option<&'a str>,
        ) {
            if let Some(role) = role {
                builder.push(" AND role = ").push_bind(role);
            }
            if let Some(search) = search {
                let pattern = format!("%{search}%");
                builder
                    .push(" AND (full_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR email ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR phone_number ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
        }

        let mut count_builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE 1=1");
        apply_filters(&mut count_builder, role, search);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE 1=1");
        apply_filters(&mut builder, role, search);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let users = builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok((users, total))
    }
}
