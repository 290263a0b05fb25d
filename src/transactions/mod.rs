// Module declarations
pub(crate) mod transactions_model;
pub(crate) mod transactions_repository;
pub(crate) mod transactions_traits;

// Re-export the public interface
pub use transactions_model::{
    parse_txn_date, NewTransaction, Transaction, TransactionChanges, TransactionDB,
    TransactionPayload, TransactionSearchResponse, TransactionSearchResponseMeta, TransactionSort,
    TransactionType,
};
pub use transactions_repository::TransactionRepository;
pub use transactions_traits::TransactionRepositoryTrait;
