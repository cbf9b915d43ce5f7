//! Shop running costs and payments made to workers.

pub mod expense;

pub use expense::{DailyExpense, WorkerExpense};
