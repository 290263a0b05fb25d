use diesel::Connection;
use log::debug;
use std::sync::Arc;

use crate::accounts::{Account, AccountRepositoryTrait};
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::transactions::{
    Transaction, TransactionDB, TransactionPayload, TransactionRepositoryTrait,
    TransactionSearchResponse, TransactionSort, TransactionType,
};
use crate::users::{User, UserRepositoryTrait};

/// The balance-consistency core.
///
/// Each account's `balance` column is a materialized aggregate of the signed
/// amounts of its transactions, maintained imperatively on every mutation so
/// balance reads stay O(1). The one rule that keeps it from drifting: on
/// update, the old delta is reverted before the new one is applied. The
/// balance write and the transaction write always commit in a single
/// database transaction.
pub struct LedgerService {
    pool: Arc<DbPool>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
}

impl LedgerService {
    /// Creates a new LedgerService instance with injected dependencies
    pub fn new(
        pool: Arc<DbPool>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            pool,
            account_repository,
            transaction_repository,
            user_repository,
        }
    }

    /// Resolves an account and checks it belongs to the given user
    fn owned_account(&self, user: &User, account_id: &str, action: &str) -> Result<Account> {
        let account = self.account_repository.get_by_id(account_id)?;
        if account.user_id != user.id {
            return Err(Error::Forbidden(format!(
                "You can only {} your own accounts",
                action
            )));
        }
        Ok(account)
    }

    /// Resolves a transaction and checks it belongs to the given user
    fn owned_transaction(&self, user: &User, transaction_id: &str) -> Result<Transaction> {
        let transaction = self.transaction_repository.get_by_id(transaction_id)?;
        if transaction.user_id != user.id {
            return Err(Error::Forbidden(
                "You can only manage your own transactions".to_string(),
            ));
        }
        Ok(transaction)
    }

    /// Records a new transaction and applies its delta to the owning
    /// account's balance, atomically.
    pub fn create_transaction(
        &self,
        owner_email: &str,
        payload: TransactionPayload,
    ) -> Result<Transaction> {
        let user = self.user_repository.find_by_email(owner_email)?;
        let input = payload.validate_for_create()?;
        let account = self.owned_account(&user, &input.account_id, "add transactions to")?;

        let delta = input.txn_type.signed(input.amount);
        debug!(
            "Creating {} transaction of {} on account {} (delta {})",
            input.txn_type.as_str(),
            input.amount,
            account.id,
            delta
        );

        let mut conn = get_connection(&self.pool)?;
        conn.transaction(|conn| {
            self.account_repository
                .apply_balance_delta(conn, &account.id, delta)?;
            self.transaction_repository.insert(conn, &user.id, input)
        })
    }

    /// Updates a transaction in place, keeping its account's balance (or the
    /// balances of both accounts, when the transaction moves) consistent.
    ///
    /// The stored delta is always reverted before the new one is applied;
    /// applying the new delta on top of the old one is exactly the drift bug
    /// this service exists to prevent.
    pub fn update_transaction(
        &self,
        owner_email: &str,
        transaction_id: &str,
        payload: TransactionPayload,
    ) -> Result<Transaction> {
        let user = self.user_repository.find_by_email(owner_email)?;
        let existing = self.owned_transaction(&user, transaction_id)?;
        let changes = payload.validate_for_update()?;

        let old_delta = existing.delta()?;
        let old_account_id = existing.account_id.clone();

        // Resolve the target account up front so a Forbidden/NotFound on a
        // reassignment aborts before any balance is touched.
        let target_account_id = match changes.account_id.as_deref() {
            Some(requested) if requested != existing.account_id => {
                let target = self.owned_account(&user, requested, "move transactions to")?;
                target.id
            }
            _ => existing.account_id.clone(),
        };

        let mut updated: TransactionDB = existing.into();
        updated.account_id = target_account_id.clone();
        if let Some(amount) = changes.amount {
            updated.amount = amount;
        }
        if let Some(txn_type) = changes.txn_type {
            updated.txn_type = txn_type.as_str().to_string();
        }
        if let Some(category) = changes.category {
            updated.category = category;
        }
        if let Some(txn_date) = changes.txn_date {
            updated.txn_date = txn_date;
        }
        if let Some(description) = changes.description {
            updated.description = Some(description);
        }

        let new_delta = TransactionType::parse(&updated.txn_type)?.signed(updated.amount);
        debug!(
            "Updating transaction {}: reverting {} from account {}, applying {} to account {}",
            updated.id, old_delta, old_account_id, new_delta, target_account_id
        );

        let mut conn = get_connection(&self.pool)?;
        conn.transaction(|conn| {
            // Revert first, then apply. With an unchanged account the two
            // updates land on the same row and net to new_delta - old_delta.
            self.account_repository
                .apply_balance_delta(conn, &old_account_id, -old_delta)?;
            self.account_repository
                .apply_balance_delta(conn, &target_account_id, new_delta)?;
            self.transaction_repository.update(conn, &updated)
        })
    }

    /// Deletes a transaction and reverts its delta from its account's
    /// balance, atomically.
    pub fn delete_transaction(&self, owner_email: &str, transaction_id: &str) -> Result<()> {
        let user = self.user_repository.find_by_email(owner_email)?;
        let existing = self.owned_transaction(&user, transaction_id)?;

        let delta = existing.delta()?;
        debug!(
            "Deleting transaction {}: reverting {} from account {}",
            existing.id, delta, existing.account_id
        );

        let mut conn = get_connection(&self.pool)?;
        conn.transaction(|conn| {
            self.account_repository
                .apply_balance_delta(conn, &existing.account_id, -delta)?;
            self.transaction_repository.delete(conn, &existing.id)
        })
    }

    /// Lists the owner's transactions with optional category filtering,
    /// sorting and pagination
    pub fn search_transactions(
        &self,
        owner_email: &str,
        category_filter: Option<&str>,
        sort_by: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionSearchResponse> {
        let user = self.user_repository.find_by_email(owner_email)?;
        self.transaction_repository.search(
            &user.id,
            category_filter,
            TransactionSort::parse_lossy(sort_by),
            page,
            page_size,
        )
    }

    /// Retrieves one of the owner's transactions by ID
    pub fn get_transaction(&self, owner_email: &str, transaction_id: &str) -> Result<Transaction> {
        let user = self.user_repository.find_by_email(owner_email)?;
        self.owned_transaction(&user, transaction_id)
    }
}
