use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::users::UserDB;

/// Recognized account types. Unrecognized free-form input collapses to
/// `Other` instead of failing; this lossy normalization is deliberate and
/// must stay a non-error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
    Other,
}

impl AccountType {
    /// Normalizes a free-form type string, case-insensitively.
    pub fn parse_lossy(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "checking" => AccountType::Checking,
            "savings" => AccountType::Savings,
            "credit" => AccountType::Credit,
            _ => AccountType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Credit => "credit",
            AccountType::Other => "other",
        }
    }
}

/// Domain model representing an account in the system.
///
/// `balance` is a materialized aggregate: it always equals the signed sum of
/// the amounts of the transactions currently linked to this account. Only
/// the ledger (and the explicit manual override) may change it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub account_type: String,
    pub balance: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: Option<f64>,
}

impl NewAccount {
    /// Validates the new account data
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name is required".to_string(),
            )));
        }
        if self.account_type.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account type is required".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for updating an existing account. Absent fields keep their
/// prior values; balance is deliberately not part of this payload.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

impl AccountUpdate {
    /// Validates the account update data
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Account name cannot be empty".to_string(),
                )));
            }
        }
        Ok(())
    }
}

/// Database model for accounts
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    Associations,
    PartialEq,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(UserDB, foreign_key = user_id))]
pub struct AccountDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub account_type: String,
    pub balance: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            account_type: db.account_type,
            balance: db.balance,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: String::new(),      // assigned by the repository on insert
            user_id: String::new(), // bound to the resolved owner by the service
            name: domain.name.trim().to_string(),
            account_type: AccountType::parse_lossy(&domain.account_type)
                .as_str()
                .to_string(),
            balance: domain.balance.unwrap_or(0.0),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types_case_insensitively() {
        assert_eq!(AccountType::parse_lossy("Checking"), AccountType::Checking);
        assert_eq!(AccountType::parse_lossy("SAVINGS"), AccountType::Savings);
        assert_eq!(AccountType::parse_lossy(" credit "), AccountType::Credit);
    }

    #[test]
    fn unrecognized_types_collapse_to_other() {
        assert_eq!(AccountType::parse_lossy("brokerage"), AccountType::Other);
        assert_eq!(AccountType::parse_lossy("123"), AccountType::Other);
    }

    #[test]
    fn new_account_requires_name_and_type() {
        let missing_name = NewAccount {
            name: "  ".to_string(),
            account_type: "checking".to_string(),
            balance: None,
        };
        assert!(missing_name.validate().is_err());

        let missing_type = NewAccount {
            name: "Everyday".to_string(),
            account_type: String::new(),
            balance: None,
        };
        assert!(missing_type.validate().is_err());
    }

    #[test]
    fn update_rejects_blank_name_but_allows_absent_fields() {
        let blank = AccountUpdate {
            name: Some("   ".to_string()),
            account_type: None,
        };
        assert!(blank.validate().is_err());
        assert!(AccountUpdate::default().validate().is_ok());
    }
}
