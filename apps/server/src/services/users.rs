//! User management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::hash_password,
    db::{users::NewUser, UserRepository},
    models::{CreateUserDto, UpdateUserDto, User},
    Error, Result,
};

#[derive(Clone)]
pub struct UsersService {
    users: UserRepository,
}

impl UsersService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    pub async fn create(&self, dto: CreateUserDto) -> Result<User> {
        dto.validate()?;

        if self
            .users
            .find_by_email_or_phone(&dto.email, &dto.phone_number)
            .await?
            .is_some()
        {
            return Err(Error::BadRequest(
                "User with this email or phone number already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&dto.password)?;
        self.users
            .insert(NewUser {
                email: dto.email,
                phone_number: dto.phone_number,
                full_name: dto.full_name,
                role: Some(dto.role),
                password_hash,
                date_of_birth: dto.date_of_birth,
                gender: dto.gender,
                specialty: dto.specialty,
                license_number: dto.license_number,
                ..NewUser::default()
            })
            .await
    }

    pub async fn find_all(&self) -> Result<Vec<User>> {
        self.users.find_all().await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User with ID {id} not found")))
    }

    pub async fn update(&self, id: Uuid, dto: UpdateUserDto) -> Result<User> {
        dto.validate()?;
        self.users
            .update(id, &dto)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User with ID {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        if !self.users.delete(id).await? {
            return Err(Error::NotFound(format!("User with ID {id} not found")));
        }
        Ok(())
    }
}
