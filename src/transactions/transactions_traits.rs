use chrono::NaiveDateTime;
use diesel::sqlite::SqliteConnection;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionDB, TransactionSearchResponse, TransactionSort,
};
use crate::errors::Result;

/// Trait defining the contract for Transaction repository operations.
pub trait TransactionRepositoryTrait: Send + Sync {
    fn insert(
        &self,
        conn: &mut SqliteConnection,
        owner_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;
    fn update(
        &self,
        conn: &mut SqliteConnection,
        transaction_db: &TransactionDB,
    ) -> Result<Transaction>;
    fn delete(&self, conn: &mut SqliteConnection, transaction_id: &str) -> Result<()>;
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;
    fn count_by_account(&self, account_id: &str) -> Result<i64>;
    fn search(
        &self,
        owner_id: &str,
        category_filter: Option<&str>,
        sort: TransactionSort,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionSearchResponse>;
    fn list_recent_with_account(
        &self,
        owner_id: &str,
        limit: i64,
    ) -> Result<Vec<(Transaction, String)>>;
    fn list_by_owner_since(
        &self,
        owner_id: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<Transaction>>;
    fn list_by_account(&self, account_id: &str) -> Result<Vec<Transaction>>;
}
