//! Types that represent the core data model, such as `Cell` and `TransactionRecord`.
mod amount;
mod cell;
mod keywords;
mod period;
mod record;

pub use amount::{Amount, AmountError};
pub use cell::Cell;
pub(crate) use keywords::contains_any;
pub use keywords::{Field, KeywordTable};
pub use period::{Month, Period};
pub use record::{StoredTransaction, TransactionRecord};
