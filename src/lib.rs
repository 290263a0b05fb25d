pub mod db;

pub mod accounts;
pub mod dashboard;
pub mod ledger;
pub mod transactions;
pub mod users;

pub mod errors;
pub mod schema;

pub use errors::{Error, Result};
