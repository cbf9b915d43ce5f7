//! `tailorshop-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, money, lenient field types for records coming from the
//! data-access layer, and the fixed-offset calendar used to bucket them.

pub mod calendar;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use calendar::{
    DateRange, DayBucketer, DayKey, ResolvedDay, TimestampCandidate, TimestampField,
    local_date_key, parse_timestamp, parse_utc_offset, today_key,
};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BillId, ExpenseId, OrderId, WorkerId};
pub use money::{AmountField, Money};
