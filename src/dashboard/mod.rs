// Module declarations
pub(crate) mod dashboard_model;
pub(crate) mod dashboard_service;

// Re-export the public interface
pub use dashboard_model::{CategorySpending, DashboardSummary, MonthlyTotal, TransactionSummary};
pub use dashboard_service::DashboardService;
