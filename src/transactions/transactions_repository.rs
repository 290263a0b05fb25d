use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::{accounts, transactions};

use super::transactions_model::{
    NewTransaction, Transaction, TransactionDB, TransactionSearchResponse,
    TransactionSearchResponseMeta, TransactionSort,
};
use super::transactions_traits::TransactionRepositoryTrait;

/// Repository for managing transaction data in the database.
///
/// The mutating methods take an explicit connection so the ledger can run
/// them inside the same database transaction as the balance write.
pub struct TransactionRepository {
    pool: Arc<DbPool>,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn not_found(transaction_id: &str) -> Error {
        Error::NotFound(format!("Transaction with id {} not found", transaction_id))
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    /// Inserts a new transaction inside the caller's database transaction
    fn insert(
        &self,
        conn: &mut SqliteConnection,
        owner_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        let now = chrono::Utc::now().naive_utc();
        let transaction_db = TransactionDB {
            id: Uuid::new_v4().to_string(),
            account_id: new_transaction.account_id,
            user_id: owner_id.to_string(),
            amount: new_transaction.amount,
            txn_type: new_transaction.txn_type.as_str().to_string(),
            category: new_transaction.category,
            txn_date: new_transaction.txn_date,
            description: new_transaction.description,
            created_at: now,
        };

        diesel::insert_into(transactions::table)
            .values(&transaction_db)
            .get_result::<TransactionDB>(conn)
            .map(Transaction::from)
            .map_err(Error::from)
    }

    /// Rewrites a transaction row inside the caller's database transaction.
    /// `created_at` is immutable and must already carry the original value.
    fn update(
        &self,
        conn: &mut SqliteConnection,
        transaction_db: &TransactionDB,
    ) -> Result<Transaction> {
        diesel::update(transactions::table.find(&transaction_db.id))
            .set(transaction_db)
            .get_result::<TransactionDB>(conn)
            .map(Transaction::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => Self::not_found(&transaction_db.id),
                other => other.into(),
            })
    }

    /// Deletes a transaction row inside the caller's database transaction
    fn delete(&self, conn: &mut SqliteConnection, transaction_id: &str) -> Result<()> {
        let affected =
            diesel::delete(transactions::table.find(transaction_id)).execute(conn)?;

        if affected == 0 {
            return Err(Self::not_found(transaction_id));
        }

        Ok(())
    }

    /// Retrieves a transaction by its ID
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;

        transactions::table
            .find(transaction_id)
            .first::<TransactionDB>(&mut conn)
            .map(Transaction::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => Self::not_found(transaction_id),
                other => other.into(),
            })
    }

    /// Counts the transactions linked to an account
    fn count_by_account(&self, account_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;

        transactions::table
            .filter(transactions::account_id.eq(account_id))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(Error::from)
    }

    /// Lists an owner's transactions with optional category filtering,
    /// sorting and offset pagination (0-based page)
    fn search(
        &self,
        owner_id: &str,
        category_filter: Option<&str>,
        sort: TransactionSort,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionSearchResponse> {
        let mut conn = get_connection(&self.pool)?;

        let offset = page * page_size;

        let create_base_query = || {
            let mut query = transactions::table
                .filter(transactions::user_id.eq(owner_id))
                .into_boxed();

            if let Some(keyword) = category_filter.map(str::trim).filter(|k| !k.is_empty()) {
                // SQLite LIKE is case-insensitive for ASCII
                query = query.filter(transactions::category.like(format!("%{}%", keyword)));
            }

            match sort {
                TransactionSort::DateDesc => query = query.order(transactions::txn_date.desc()),
                TransactionSort::DateAsc => query = query.order(transactions::txn_date.asc()),
                TransactionSort::AmountDesc => query = query.order(transactions::amount.desc()),
                TransactionSort::AmountAsc => query = query.order(transactions::amount.asc()),
            }

            query
        };

        let total_row_count = create_base_query().count().get_result::<i64>(&mut conn)?;

        let results = create_base_query()
            .select(TransactionDB::as_select())
            .limit(page_size)
            .offset(offset)
            .load::<TransactionDB>(&mut conn)?;

        Ok(TransactionSearchResponse {
            data: results.into_iter().map(Transaction::from).collect(),
            meta: TransactionSearchResponseMeta { total_row_count },
        })
    }

    /// Most recent transactions for an owner, newest first, with the name
    /// of the account each one belongs to
    fn list_recent_with_account(
        &self,
        owner_id: &str,
        limit: i64,
    ) -> Result<Vec<(Transaction, String)>> {
        let mut conn = get_connection(&self.pool)?;

        transactions::table
            .inner_join(accounts::table.on(accounts::id.eq(transactions::account_id)))
            .filter(transactions::user_id.eq(owner_id))
            .order(transactions::txn_date.desc())
            .limit(limit)
            .select((TransactionDB::as_select(), accounts::name))
            .load::<(TransactionDB, String)>(&mut conn)
            .map(|rows| {
                rows.into_iter()
                    .map(|(t, name)| (Transaction::from(t), name))
                    .collect()
            })
            .map_err(Error::from)
    }

    /// All of an owner's transactions dated on or after `since`
    fn list_by_owner_since(
        &self,
        owner_id: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        transactions::table
            .filter(transactions::user_id.eq(owner_id))
            .filter(transactions::txn_date.ge(since))
            .order(transactions::txn_date.asc())
            .load::<TransactionDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(Error::from)
    }

    /// All transactions linked to an account, newest first
    fn list_by_account(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        transactions::table
            .filter(transactions::account_id.eq(account_id))
            .order(transactions::txn_date.desc())
            .load::<TransactionDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(Error::from)
    }
}
