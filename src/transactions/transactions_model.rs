use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountDB;
use crate::errors::{Error, Result, ValidationError};

/// Transaction kind. The stored amount is always a positive magnitude; the
/// sign of its contribution to the account balance comes from this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Parses a boundary value, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::Validation(ValidationError::InvalidInput(
                "Type must be 'income' or 'expense'".to_string(),
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The signed contribution of `amount` to an account balance.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense => -amount,
        }
    }
}

/// Parses a boundary date (`YYYY-MM-DD`) into the midnight timestamp stored
/// in the database.
pub fn parse_txn_date(raw: &str) -> Result<NaiveDateTime> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| {
            Error::Validation(ValidationError::InvalidInput(
                "Invalid date format. Use YYYY-MM-DD".to_string(),
            ))
        })
}

/// Domain model representing a transaction in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub user_id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub txn_type: String,
    pub category: String,
    #[serde(rename = "date")]
    pub txn_date: NaiveDateTime,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// The signed contribution this transaction currently makes to its
    /// account's balance.
    pub fn delta(&self) -> Result<f64> {
        Ok(TransactionType::parse(&self.txn_type)?.signed(self.amount))
    }
}

/// Database model for transactions
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    Insertable,
    AsChangeset,
    PartialEq,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(AccountDB, foreign_key = account_id))]
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    pub id: String,
    pub account_id: String,
    pub user_id: String,
    pub amount: f64,
    pub txn_type: String,
    pub category: String,
    pub txn_date: NaiveDateTime,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            user_id: db.user_id,
            amount: db.amount,
            txn_type: db.txn_type,
            category: db.category,
            txn_date: db.txn_date,
            description: db.description,
            created_at: db.created_at,
        }
    }
}

impl From<Transaction> for TransactionDB {
    fn from(domain: Transaction) -> Self {
        Self {
            id: domain.id,
            account_id: domain.account_id,
            user_id: domain.user_id,
            amount: domain.amount,
            txn_type: domain.txn_type,
            category: domain.category,
            txn_date: domain.txn_date,
            description: domain.description,
            created_at: domain.created_at,
        }
    }
}

/// Boundary payload for transaction create and update. Every field is
/// optional so the same shape serves full creates and partial updates;
/// `validate_for_create` enforces presence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub account_id: Option<String>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub txn_type: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// A fully validated create payload
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: String,
    pub amount: f64,
    pub txn_type: TransactionType,
    pub category: String,
    pub txn_date: NaiveDateTime,
    pub description: Option<String>,
}

/// The validated, provided-fields-only form of an update payload
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub account_id: Option<String>,
    pub amount: Option<f64>,
    pub txn_type: Option<TransactionType>,
    pub category: Option<String>,
    pub txn_date: Option<NaiveDateTime>,
    pub description: Option<String>,
}

impl TransactionPayload {
    /// Validates all fields as required, short-circuiting on the first
    /// violated rule: accountId, amount, type, category, date.
    pub fn validate_for_create(&self) -> Result<NewTransaction> {
        let account_id = self
            .account_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::MissingField("accountId".to_string()))?
            .to_string();

        let amount = self
            .amount
            .ok_or_else(|| ValidationError::MissingField("amount".to_string()))?;
        Self::validate_amount(amount)?;

        let txn_type = TransactionType::parse(
            self.txn_type
                .as_deref()
                .ok_or_else(|| ValidationError::MissingField("type".to_string()))?,
        )?;

        let category = Self::validate_category(
            self.category
                .as_deref()
                .ok_or_else(|| ValidationError::MissingField("category".to_string()))?,
        )?;

        let txn_date = parse_txn_date(
            self.date
                .as_deref()
                .ok_or_else(|| ValidationError::MissingField("date".to_string()))?,
        )?;

        Ok(NewTransaction {
            account_id,
            amount,
            txn_type,
            category,
            txn_date,
            description: self.description.as_deref().map(|d| d.trim().to_string()),
        })
    }

    /// Validates only the fields that were provided; absent fields keep
    /// their prior values on the stored transaction.
    pub fn validate_for_update(&self) -> Result<TransactionChanges> {
        let mut changes = TransactionChanges::default();

        if let Some(account_id) = self.account_id.as_deref() {
            let trimmed = account_id.trim();
            if trimmed.is_empty() {
                return Err(Error::Validation(ValidationError::MissingField(
                    "accountId".to_string(),
                )));
            }
            changes.account_id = Some(trimmed.to_string());
        }
        if let Some(amount) = self.amount {
            Self::validate_amount(amount)?;
            changes.amount = Some(amount);
        }
        if let Some(txn_type) = self.txn_type.as_deref() {
            changes.txn_type = Some(TransactionType::parse(txn_type)?);
        }
        if let Some(category) = self.category.as_deref() {
            changes.category = Some(Self::validate_category(category)?);
        }
        if let Some(date) = self.date.as_deref() {
            changes.txn_date = Some(parse_txn_date(date)?);
        }
        if let Some(description) = self.description.as_deref() {
            changes.description = Some(description.trim().to_string());
        }

        Ok(changes)
    }

    fn validate_amount(amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Amount must be greater than zero".to_string(),
            )));
        }
        Ok(())
    }

    fn validate_category(category: &str) -> Result<String> {
        let trimmed = category.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Category cannot be empty".to_string(),
            )));
        }
        Ok(trimmed.to_string())
    }
}

/// Sort order accepted by the transaction listing. Unrecognized values fall
/// back to the default, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionSort {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl TransactionSort {
    pub fn parse_lossy(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("date_asc") => TransactionSort::DateAsc,
            Some("amount_desc") => TransactionSort::AmountDesc,
            Some("amount_asc") => TransactionSort::AmountAsc,
            _ => TransactionSort::DateDesc,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSearchResponse {
    pub data: Vec<Transaction>,
    pub meta: TransactionSearchResponseMeta,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSearchResponseMeta {
    pub total_row_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> TransactionPayload {
        TransactionPayload {
            account_id: Some("acc-1".to_string()),
            amount: Some(100.0),
            txn_type: Some("Income".to_string()),
            category: Some(" Salary ".to_string()),
            date: Some("2025-03-15".to_string()),
            description: Some("  March pay  ".to_string()),
        }
    }

    #[test]
    fn parses_type_case_insensitively() {
        assert_eq!(
            TransactionType::parse("INCOME").unwrap(),
            TransactionType::Income
        );
        assert_eq!(
            TransactionType::parse(" expense ").unwrap(),
            TransactionType::Expense
        );
        assert!(TransactionType::parse("transfer").is_err());
    }

    #[test]
    fn signed_amounts_follow_type() {
        assert_eq!(TransactionType::Income.signed(25.0), 25.0);
        assert_eq!(TransactionType::Expense.signed(25.0), -25.0);
    }

    #[test]
    fn create_validation_accepts_full_payload() {
        let validated = full_payload().validate_for_create().unwrap();
        assert_eq!(validated.category, "Salary");
        assert_eq!(validated.description.as_deref(), Some("March pay"));
        assert_eq!(validated.txn_date.to_string(), "2025-03-15 00:00:00");
    }

    #[test]
    fn create_validation_short_circuits_in_field_order() {
        // Everything missing: accountId is reported first.
        let err = TransactionPayload::default()
            .validate_for_create()
            .unwrap_err();
        assert!(err.to_string().contains("accountId"));

        let mut payload = full_payload();
        payload.amount = Some(0.0);
        payload.txn_type = Some("bogus".to_string());
        let err = payload.validate_for_create().unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn create_validation_rejects_bad_dates() {
        let mut payload = full_payload();
        payload.date = Some("15/03/2025".to_string());
        assert!(payload.validate_for_create().is_err());
        payload.date = Some("2025-02-30".to_string());
        assert!(payload.validate_for_create().is_err());
    }

    #[test]
    fn update_validation_only_checks_provided_fields() {
        let partial = TransactionPayload {
            amount: Some(12.5),
            ..Default::default()
        };
        let changes = partial.validate_for_update().unwrap();
        assert_eq!(changes.amount, Some(12.5));
        assert!(changes.txn_type.is_none());

        let negative = TransactionPayload {
            amount: Some(-3.0),
            ..Default::default()
        };
        assert!(negative.validate_for_update().is_err());
    }

    #[test]
    fn sort_parsing_defaults_to_date_desc() {
        assert_eq!(
            TransactionSort::parse_lossy(Some("amount_asc")),
            TransactionSort::AmountAsc
        );
        assert_eq!(
            TransactionSort::parse_lossy(Some("whatever")),
            TransactionSort::DateDesc
        );
        assert_eq!(TransactionSort::parse_lossy(None), TransactionSort::DateDesc);
    }
}
