use super::users_model::{NewUser, User};
use crate::errors::Result;

/// Trait defining the contract for User repository operations.
pub trait UserRepositoryTrait: Send + Sync {
    fn create(&self, new_user: NewUser) -> Result<User>;
    fn find_by_email(&self, email: &str) -> Result<User>;
    fn find_by_id(&self, user_id: &str) -> Result<User>;
    fn exists_by_email(&self, email: &str) -> Result<bool>;
}
