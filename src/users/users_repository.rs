use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result, ValidationError};
use crate::schema::users;

use super::users_model::{NewUser, User, UserDB};
use super::users_traits::UserRepositoryTrait;

/// Repository for managing user data in the database
pub struct UserRepository {
    pool: Arc<DbPool>,
}

impl UserRepository {
    /// Creates a new UserRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl UserRepositoryTrait for UserRepository {
    /// Registers a new user, rejecting duplicate emails
    fn create(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;

        if self.exists_by_email(new_user.email.trim())? {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Email is already in use".to_string(),
            )));
        }

        let mut user_db: UserDB = new_user.into();
        user_db.id = Uuid::new_v4().to_string();

        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(users::table)
            .values(&user_db)
            .execute(&mut conn)?;

        Ok(user_db.into())
    }

    /// Resolves a user by email (case-sensitive exact match)
    fn find_by_email(&self, email: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;

        users::table
            .filter(users::email.eq(email))
            .first::<UserDB>(&mut conn)
            .map(User::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => Error::NotFound("User not found".to_string()),
                other => other.into(),
            })
    }

    /// Resolves a user by id
    fn find_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;

        users::table
            .find(user_id)
            .first::<UserDB>(&mut conn)
            .map(User::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => Error::NotFound("User not found".to_string()),
                other => other.into(),
            })
    }

    fn exists_by_email(&self, email: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;

        let found = users::table
            .filter(users::email.eq(email))
            .select(users::id)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(found.is_some())
    }
}
