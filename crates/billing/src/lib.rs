//! Customer bills (invoices aggregating one or more garment orders).

pub mod bill;

pub use bill::Bill;
