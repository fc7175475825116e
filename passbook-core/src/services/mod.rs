//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions.

mod bank_account;

pub use bank_account::BankAccount;
