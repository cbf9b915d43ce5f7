//! Garment orders as read from the shop's order table.
//!
//! Records only: orders are created and edited by the order screens and the
//! storage layer. Reporting treats them as an immutable snapshot.

pub mod order;

pub use order::{Order, PaymentStatus};
