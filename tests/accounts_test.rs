mod common;

use fintrack_core::accounts::{AccountServiceTrait, AccountUpdate, NewAccount};
use fintrack_core::users::{NewUser, UserRepositoryTrait};
use fintrack_core::Error;

const OWNER: &str = "owner@example.com";
const INTRUDER: &str = "intruder@example.com";

#[test]
fn create_account_defaults_balance_to_zero() {
    let ctx = common::setup();
    common::seed_user(&ctx, OWNER);

    let account = ctx
        .account_service
        .create_account(
            OWNER,
            NewAccount {
                name: "  Everyday  ".to_string(),
                account_type: "checking".to_string(),
                balance: None,
            },
        )
        .unwrap();

    assert_eq!(account.name, "Everyday");
    assert_eq!(account.account_type, "checking");
    assert_eq!(account.balance, 0.0);

    let funded = ctx
        .account_service
        .create_account(
            OWNER,
            NewAccount {
                name: "Emergency fund".to_string(),
                account_type: "savings".to_string(),
                balance: Some(2500.0),
            },
        )
        .unwrap();
    assert_eq!(funded.balance, 2500.0);
}

#[test]
fn unrecognized_account_types_normalize_to_other() {
    let ctx = common::setup();
    common::seed_user(&ctx, OWNER);

    let account = ctx
        .account_service
        .create_account(
            OWNER,
            NewAccount {
                name: "Brokerage".to_string(),
                account_type: "Brokerage".to_string(),
                balance: None,
            },
        )
        .unwrap();
    assert_eq!(account.account_type, "other");

    let updated = ctx
        .account_service
        .update_account(
            OWNER,
            &account.id,
            AccountUpdate {
                account_type: Some("SAVINGS".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.account_type, "savings");
}

#[test]
fn create_account_requires_name_and_type() {
    let ctx = common::setup();
    common::seed_user(&ctx, OWNER);

    let err = ctx
        .account_service
        .create_account(
            OWNER,
            NewAccount {
                name: "   ".to_string(),
                account_type: "checking".to_string(),
                balance: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = ctx
        .account_service
        .create_account(
            OWNER,
            NewAccount {
                name: "Everyday".to_string(),
                account_type: String::new(),
                balance: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn update_renames_without_touching_the_balance() {
    let ctx = common::setup();
    common::seed_user(&ctx, OWNER);
    let account = common::seed_account(&ctx, OWNER, "Everyday", Some(320.0));

    let updated = ctx
        .account_service
        .update_account(
            OWNER,
            &account.id,
            AccountUpdate {
                name: Some("  Daily spending  ".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.name, "Daily spending");
    assert_eq!(updated.balance, 320.0);
}

#[test]
fn foreign_accounts_cannot_be_updated_or_deleted() {
    let ctx = common::setup();
    common::seed_user(&ctx, OWNER);
    common::seed_user(&ctx, INTRUDER);
    let account = common::seed_account(&ctx, OWNER, "Everyday", None);

    let err = ctx
        .account_service
        .update_account(
            INTRUDER,
            &account.id,
            AccountUpdate {
                name: Some("Mine now".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    let err = ctx
        .account_service
        .delete_account(INTRUDER, &account.id)
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));
}

#[test]
fn manual_balance_override_is_explicit_and_ownership_checked() {
    let ctx = common::setup();
    common::seed_user(&ctx, OWNER);
    common::seed_user(&ctx, INTRUDER);
    let account = common::seed_account(&ctx, OWNER, "Everyday", Some(100.0));

    let overridden = ctx
        .account_service
        .set_account_balance(OWNER, &account.id, 75.5)
        .unwrap();
    assert_eq!(overridden.balance, 75.5);

    let err = ctx
        .account_service
        .set_account_balance(INTRUDER, &account.id, 0.0)
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));
}

#[test]
fn accounts_with_linked_transactions_cannot_be_deleted() {
    let ctx = common::setup();
    common::seed_user(&ctx, OWNER);
    let account = common::seed_account(&ctx, OWNER, "Everyday", None);

    let transaction = ctx
        .ledger
        .create_transaction(
            OWNER,
            common::txn_payload(&account.id, 20.0, "expense", "Groceries", "2025-03-01"),
        )
        .unwrap();

    let err = ctx
        .account_service
        .delete_account(OWNER, &account.id)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // After the transaction is gone the account can be deleted.
    ctx.ledger.delete_transaction(OWNER, &transaction.id).unwrap();
    ctx.account_service.delete_account(OWNER, &account.id).unwrap();

    let err = ctx
        .account_service
        .get_account(OWNER, &account.id)
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn list_accounts_is_scoped_to_the_owner() {
    let ctx = common::setup();
    common::seed_user(&ctx, OWNER);
    common::seed_user(&ctx, INTRUDER);
    common::seed_account(&ctx, OWNER, "Everyday", None);
    common::seed_account(&ctx, OWNER, "Savings", None);
    common::seed_account(&ctx, INTRUDER, "Theirs", None);

    let accounts = ctx.account_service.list_accounts(OWNER).unwrap();
    let names: Vec<&str> = accounts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Everyday", "Savings"]);
}

#[test]
fn registration_rejects_duplicate_emails() {
    let ctx = common::setup();
    common::seed_user(&ctx, OWNER);

    let err = ctx
        .user_repository
        .create(NewUser {
            email: OWNER.to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            first_name: "Second".to_string(),
            last_name: "User".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
