use diesel::sqlite::SqliteConnection;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
pub trait AccountRepositoryTrait: Send + Sync {
    fn create(&self, owner_id: &str, new_account: NewAccount) -> Result<Account>;
    fn update(&self, account_id: &str, update: AccountUpdate) -> Result<Account>;
    fn set_balance(&self, account_id: &str, balance: f64) -> Result<Account>;
    fn apply_balance_delta(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        delta: f64,
    ) -> Result<()>;
    fn get_by_id(&self, account_id: &str) -> Result<Account>;
    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Account>>;
    fn delete(&self, account_id: &str) -> Result<usize>;
}

/// Trait defining the contract for Account service operations.
pub trait AccountServiceTrait: Send + Sync {
    fn create_account(&self, owner_email: &str, new_account: NewAccount) -> Result<Account>;
    fn update_account(
        &self,
        owner_email: &str,
        account_id: &str,
        update: AccountUpdate,
    ) -> Result<Account>;
    fn set_account_balance(
        &self,
        owner_email: &str,
        account_id: &str,
        balance: f64,
    ) -> Result<Account>;
    fn delete_account(&self, owner_email: &str, account_id: &str) -> Result<()>;
    fn get_account(&self, owner_email: &str, account_id: &str) -> Result<Account>;
    fn list_accounts(&self, owner_email: &str) -> Result<Vec<Account>>;
}
