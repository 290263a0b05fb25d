use log::{debug, warn};
use std::sync::Arc;

use crate::errors::{Error, Result, ValidationError};
use crate::transactions::TransactionRepositoryTrait;
use crate::users::{User, UserRepositoryTrait};

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};

/// Service for managing the account lifecycle.
///
/// Every operation resolves the calling owner by email and enforces that the
/// touched account belongs to them.
pub struct AccountService {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl AccountService {
    /// Creates a new AccountService instance with injected dependencies
    pub fn new(
        account_repository: Arc<dyn AccountRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            account_repository,
            user_repository,
            transaction_repository,
        }
    }

    /// Resolves an account and checks it belongs to the given user
    fn owned_account(&self, user: &User, account_id: &str) -> Result<Account> {
        let account = self.account_repository.get_by_id(account_id)?;
        if account.user_id != user.id {
            return Err(Error::Forbidden(
                "You can only manage your own accounts".to_string(),
            ));
        }
        Ok(account)
    }
}

impl AccountServiceTrait for AccountService {
    /// Creates a new account bound to the resolved owner
    fn create_account(&self, owner_email: &str, new_account: NewAccount) -> Result<Account> {
        debug!("Creating account '{}'", new_account.name.trim());
        let user = self.user_repository.find_by_email(owner_email)?;
        self.account_repository.create(&user.id, new_account)
    }

    /// Updates an account's name and type
    fn update_account(
        &self,
        owner_email: &str,
        account_id: &str,
        update: AccountUpdate,
    ) -> Result<Account> {
        let user = self.user_repository.find_by_email(owner_email)?;
        self.owned_account(&user, account_id)?;
        self.account_repository.update(account_id, update)
    }

    /// Manual balance override. This deliberately bypasses the ledger and
    /// breaks the balance/transactions invariant until the caller reconciles;
    /// it exists as a separately named operation so that is visible.
    fn set_account_balance(
        &self,
        owner_email: &str,
        account_id: &str,
        balance: f64,
    ) -> Result<Account> {
        let user = self.user_repository.find_by_email(owner_email)?;
        let account = self.owned_account(&user, account_id)?;
        warn!(
            "Manual balance override on account {}: {} -> {}",
            account_id, account.balance, balance
        );
        self.account_repository.set_balance(account_id, balance)
    }

    /// Deletes an account. Accounts with linked transactions cannot be
    /// deleted; the transactions must be removed or moved first.
    fn delete_account(&self, owner_email: &str, account_id: &str) -> Result<()> {
        let user = self.user_repository.find_by_email(owner_email)?;
        self.owned_account(&user, account_id)?;

        let linked = self.transaction_repository.count_by_account(account_id)?;
        if linked > 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Account has {} linked transaction(s); delete or move them first",
                linked
            ))));
        }

        self.account_repository.delete(account_id)?;
        Ok(())
    }

    /// Retrieves one of the owner's accounts by ID
    fn get_account(&self, owner_email: &str, account_id: &str) -> Result<Account> {
        let user = self.user_repository.find_by_email(owner_email)?;
        self.owned_account(&user, account_id)
    }

    /// Lists all of the owner's accounts
    fn list_accounts(&self, owner_email: &str) -> Result<Vec<Account>> {
        let user = self.user_repository.find_by_email(owner_email)?;
        self.account_repository.list_by_owner(&user.id)
    }
}
