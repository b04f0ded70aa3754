use crate::args::HistoryArgs;
use crate::commands::{Out, Rows};
use crate::error::{ErrorType, IntoResult};
use crate::model::Period;
use crate::{Config, Result};
use serde::Serialize;

/// One page of saved transactions.
#[derive(Debug, Clone, Serialize)]
pub struct History {
    /// The number of saved transactions that match the filter, across all pages.
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub rows: Rows,
}

/// Lists saved transactions newest first, filtered by month, year or date range and paginated.
pub async fn history(config: Config, args: &HistoryArgs) -> Result<Out<History>> {
    let period = period(args).pub_result(ErrorType::Config)?;
    let db = config.db();
    let total = db
        .count_transactions(period.as_ref())
        .await
        .pub_result(ErrorType::Database)?;
    let transactions = db
        .query_transactions(period.as_ref(), args.page(), args.page_size())
        .await
        .pub_result(ErrorType::Database)?;

    let first = u64::from(args.page()) * u64::from(args.page_size());
    let message = match (transactions.len(), &period) {
        (0, _) => format!("No transactions on page {} ({total} in total)", args.page()),
        (n, Some(p)) => format!(
            "Showing {}-{} of {total} transactions from {p}",
            first + 1,
            first + n as u64
        ),
        (n, None) => format!(
            "Showing {}-{} of {total} transactions",
            first + 1,
            first + n as u64
        ),
    };

    Ok(Out::new(
        message,
        History {
            total,
            page: args.page(),
            page_size: args.page_size(),
            rows: Rows::render(&transactions, args.format())?,
        },
    ))
}

fn period(args: &HistoryArgs) -> Result<Option<Period>> {
    if let Some(month) = args.month() {
        return month.period().map(Some);
    }
    if let Some(year) = args.year() {
        return Period::year(year).map(Some);
    }
    if let Some((from, to)) = args.range() {
        return Period::days(from, to).map(Some);
    }
    Ok(None)
}
