use std::sync::Arc;

use tempfile::TempDir;

use fintrack_core::accounts::{
    Account, AccountRepository, AccountService, AccountServiceTrait, NewAccount,
};
use fintrack_core::dashboard::DashboardService;
use fintrack_core::db;
use fintrack_core::ledger::LedgerService;
use fintrack_core::transactions::{TransactionPayload, TransactionRepository};
use fintrack_core::users::{NewUser, User, UserRepository, UserRepositoryTrait};

/// Everything a test needs, wired against a throwaway on-disk database.
/// The temp dir is dropped (and the database deleted) with the context.
pub struct TestContext {
    pub user_repository: Arc<UserRepository>,
    pub account_service: AccountService,
    pub ledger: LedgerService,
    pub dashboard: DashboardService,
    _data_dir: TempDir,
}

pub fn setup() -> TestContext {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path =
        db::init(data_dir.path().to_str().unwrap()).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    let user_repository = Arc::new(UserRepository::new(pool.clone()));
    let account_repository = Arc::new(AccountRepository::new(pool.clone()));
    let transaction_repository = Arc::new(TransactionRepository::new(pool.clone()));

    TestContext {
        account_service: AccountService::new(
            account_repository.clone(),
            user_repository.clone(),
            transaction_repository.clone(),
        ),
        ledger: LedgerService::new(
            pool.clone(),
            account_repository.clone(),
            transaction_repository.clone(),
            user_repository.clone(),
        ),
        dashboard: DashboardService::new(
            account_repository,
            transaction_repository,
            user_repository.clone(),
        ),
        user_repository,
        _data_dir: data_dir,
    }
}

pub fn seed_user(ctx: &TestContext, email: &str) -> User {
    ctx.user_repository
        .create(NewUser {
            email: email.to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        })
        .expect("Failed to seed user")
}

pub fn seed_account(ctx: &TestContext, email: &str, name: &str, balance: Option<f64>) -> Account {
    ctx.account_service
        .create_account(
            email,
            NewAccount {
                name: name.to_string(),
                account_type: "checking".to_string(),
                balance,
            },
        )
        .expect("Failed to seed account")
}

pub fn txn_payload(
    account_id: &str,
    amount: f64,
    txn_type: &str,
    category: &str,
    date: &str,
) -> TransactionPayload {
    TransactionPayload {
        account_id: Some(account_id.to_string()),
        amount: Some(amount),
        txn_type: Some(txn_type.to_string()),
        category: Some(category.to_string()),
        date: Some(date.to_string()),
        description: None,
    }
}
