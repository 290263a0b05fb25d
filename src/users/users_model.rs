use chrono::NaiveDateTime;
use diesel::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[\w\-\.]+@([\w-]+\.)+[\w-]{2,4}$").unwrap();
}

/// Domain model representing a user in the system.
///
/// Users are the identity anchor for ownership checks: every account and
/// transaction belongs to exactly one user, and the ledger resolves the
/// caller by email before every operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: NaiveDateTime,
}

/// Input model for registering a new user.
///
/// The credential arrives already hashed; hashing itself happens at the
/// transport boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "email".to_string(),
            )));
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Invalid email format".to_string(),
            )));
        }
        if self.password_hash.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "password".to_string(),
            )));
        }
        if self.first_name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "firstName".to_string(),
            )));
        }
        if self.last_name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "lastName".to_string(),
            )));
        }
        Ok(())
    }
}

/// Database model for users
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            email: db.email,
            password_hash: db.password_hash,
            first_name: db.first_name,
            last_name: db.last_name,
            created_at: db.created_at,
        }
    }
}

impl From<NewUser> for UserDB {
    fn from(domain: NewUser) -> Self {
        Self {
            id: String::new(), // assigned by the repository on insert
            email: domain.email.trim().to_string(),
            password_hash: domain.password_hash,
            first_name: domain.first_name.trim().to_string(),
            last_name: domain.last_name.trim().to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
