use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A half-open span of time, `[start, end)`, used to filter stored transactions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Period {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Period {
    /// The calendar month `month` of `year`.
    pub fn month(year: i32, month: u32) -> crate::Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .with_context(|| format!("Invalid month {month:02}-{year}"))?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .with_context(|| format!("Month {month:02}-{year} is out of range"))?;
        Ok(Self::from_days(first, next))
    }

    /// The calendar year `year`.
    pub fn year(year: i32) -> crate::Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .with_context(|| format!("Invalid year {year}"))?;
        let next = NaiveDate::from_ymd_opt(year + 1, 1, 1)
            .with_context(|| format!("Year {year} is out of range"))?;
        Ok(Self::from_days(first, next))
    }

    /// Every day from `from` through `to`, both included.
    pub fn days(from: NaiveDate, to: NaiveDate) -> crate::Result<Self> {
        if to < from {
            bail!("The range end {to} is before its start {from}")
        }
        let after = to
            .succ_opt()
            .with_context(|| format!("Date {to} is out of range"))?;
        Ok(Self::from_days(from, after))
    }

    fn from_days(first: NaiveDate, after: NaiveDate) -> Self {
        Self {
            start: first.and_time(NaiveTime::MIN).and_utc(),
            end: after.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let last = self.end.date_naive().pred_opt().unwrap_or(self.end.date_naive());
        write!(f, "{} to {}", self.start.date_naive(), last)
    }
}

/// A calendar month written as `MM-YYYY`, the way the history filter takes it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn period(&self) -> crate::Result<Period> {
        Period::month(self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (m, y) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("Expected a month as MM-YYYY, got '{s}'"))?;
        let month: u32 = m
            .parse()
            .with_context(|| format!("Invalid month number in '{s}'"))?;
        let year: i32 = y.parse().with_context(|| format!("Invalid year in '{s}'"))?;
        if !(1..=12).contains(&month) {
            bail!("Month must be between 01 and 12, got '{s}'")
        }
        Ok(Self { year, month })
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{}", self.month, self.year)
    }
}

impl From<NaiveDate> for Month {
    fn from(d: NaiveDate) -> Self {
        Self {
            year: d.year(),
            month: d.month(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    #[test]
    fn test_month_bounds() {
        let p = Period::month(2023, 6).unwrap();
        assert_eq!(p.start(), at(2023, 6, 1));
        assert_eq!(p.end(), at(2023, 7, 1));
        assert!(p.contains(at(2023, 6, 30)));
        assert!(!p.contains(at(2023, 7, 1)));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let p = Period::month(2023, 12).unwrap();
        assert_eq!(p.end(), at(2024, 1, 1));
    }

    #[test]
    fn test_year_bounds() {
        let p = Period::year(2024).unwrap();
        assert_eq!(p.start(), at(2024, 1, 1));
        assert_eq!(p.end(), at(2025, 1, 1));
    }

    #[test]
    fn test_days_include_the_last_day() {
        let from = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2023, 6, 3).unwrap();
        let p = Period::days(from, to).unwrap();
        assert!(p.contains(at(2023, 6, 3) + chrono::Duration::seconds(86_399)));
        assert!(!p.contains(at(2023, 6, 4)));
        assert_eq!(p.to_string(), "2023-06-01 to 2023-06-03");
        assert!(Period::days(to, from).is_err());
    }

    #[test]
    fn test_month_from_str() {
        let m = Month::from_str("06-2023").unwrap();
        assert_eq!(m, Month { year: 2023, month: 6 });
        assert_eq!(m.to_string(), "06-2023");
        assert!(Month::from_str("13-2023").is_err());
        assert!(Month::from_str("2023").is_err());
        assert!(Month::from_str("ab-2023").is_err());
    }
}
