use rust_decimal::Decimal;
use serde::Serialize;

/// Aggregated view of an owner's finances, computed on demand from
/// already-consistent store data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_balance: Decimal,
    pub recent_transactions: Vec<TransactionSummary>,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub category_spending: Vec<CategorySpending>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub id: String,
    pub account_name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub txn_type: String,
    pub category: String,
    pub date: String,
}

/// Income and expense totals for one calendar month (`YYYY-MM`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    pub category: String,
    pub total_spent: Decimal,
}
