use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::accounts;

use super::accounts_model::{Account, AccountDB, AccountType, AccountUpdate, NewAccount};
use super::accounts_traits::AccountRepositoryTrait;

/// Repository for managing account data in the database
pub struct AccountRepository {
    pool: Arc<DbPool>,
}

impl AccountRepository {
    /// Creates a new AccountRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn not_found(account_id: &str) -> Error {
        Error::NotFound(format!("Account with id {} not found", account_id))
    }
}

impl AccountRepositoryTrait for AccountRepository {
    /// Creates a new account bound to the given owner
    fn create(&self, owner_id: &str, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        let mut account_db: AccountDB = new_account.into();
        account_db.id = Uuid::new_v4().to_string();
        account_db.user_id = owner_id.to_string();

        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(accounts::table)
            .values(&account_db)
            .execute(&mut conn)?;

        Ok(account_db.into())
    }

    /// Updates an account's name and type. The balance column is never
    /// touched here; that is either the ledger's job or an explicit
    /// `set_balance` override.
    fn update(&self, account_id: &str, update: AccountUpdate) -> Result<Account> {
        update.validate()?;

        let mut conn = get_connection(&self.pool)?;

        let mut existing = accounts::table
            .find(account_id)
            .first::<AccountDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => Self::not_found(account_id),
                other => other.into(),
            })?;

        if let Some(name) = update.name {
            existing.name = name.trim().to_string();
        }
        if let Some(account_type) = update.account_type {
            existing.account_type = AccountType::parse_lossy(&account_type).as_str().to_string();
        }
        existing.updated_at = chrono::Utc::now().naive_utc();

        diesel::update(accounts::table.find(account_id))
            .set(&existing)
            .execute(&mut conn)?;

        Ok(existing.into())
    }

    /// Overwrites the cached balance, bypassing the ledger
    fn set_balance(&self, account_id: &str, balance: f64) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(accounts::table.find(account_id))
            .set((
                accounts::balance.eq(balance),
                accounts::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<AccountDB>(&mut conn)
            .map(Account::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => Self::not_found(account_id),
                other => other.into(),
            })
    }

    /// Shifts the cached balance by `delta` inside the caller's transaction.
    /// The addition happens in SQL so concurrent ledger operations cannot
    /// lose updates.
    fn apply_balance_delta(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        delta: f64,
    ) -> Result<()> {
        let affected = diesel::update(accounts::table.find(account_id))
            .set((
                accounts::balance.eq(accounts::balance + delta),
                accounts::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        if affected == 0 {
            return Err(Self::not_found(account_id));
        }

        Ok(())
    }

    /// Retrieves an account by its ID
    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;

        accounts::table
            .find(account_id)
            .first::<AccountDB>(&mut conn)
            .map(Account::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => Self::not_found(account_id),
                other => other.into(),
            })
    }

    /// Lists all accounts belonging to the given owner
    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        accounts::table
            .filter(accounts::user_id.eq(owner_id))
            .order(accounts::name.asc())
            .load::<AccountDB>(&mut conn)
            .map(|results| results.into_iter().map(Account::from).collect())
            .map_err(Error::from)
    }

    /// Deletes an account by its ID
    fn delete(&self, account_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;

        let affected = diesel::delete(accounts::table.find(account_id)).execute(&mut conn)?;

        if affected == 0 {
            return Err(Self::not_found(account_id));
        }

        Ok(affected)
    }
}
