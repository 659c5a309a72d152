//! # Report Module
//!
//! Report windows and in-process aggregation over committed transactions.
//!
//! ## Window Semantics
//! ```text
//! start_date=2026-02-01  end_date=2026-02-03
//!
//!   Feb 01 00:00 UTC                               Feb 04 00:00 UTC
//!        │◄────────────── window ─────────────────────►│
//!        [ included                                     ) excluded
//!
//! A transaction at Feb 03 23:59:59.999 is in the window.
//! A transaction at Feb 04 00:00:00.000 is not.
//! ```
//!
//! The SQL store computes the same figures with `COUNT`/`SUM`/`GROUP BY`;
//! [`summarize`] is the reference used by the in-memory store and tests.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{AggregateReport, BestSellingProduct, Transaction};
use crate::validation::{parse_calendar_date, ValidationResult};

// =============================================================================
// Report Window
// =============================================================================

/// A half-open UTC time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReportWindow {
    /// Creates a window from explicit bounds. `end` must be after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ValidationResult<Self> {
        if end <= start {
            return Err(ValidationError::OutOfOrder {
                start_field: "start".to_string(),
                end_field: "end".to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Covers whole calendar days, `end_date` inclusive.
    ///
    /// `from_dates(d, d)` is the single day `d`.
    pub fn from_dates(start_date: NaiveDate, end_date: NaiveDate) -> ValidationResult<Self> {
        if end_date < start_date {
            return Err(ValidationError::OutOfOrder {
                start_field: "start_date".to_string(),
                end_field: "end_date".to_string(),
            });
        }

        let day_after = end_date.succ_opt().ok_or_else(|| ValidationError::Overflow {
            field: "end_date".to_string(),
        })?;

        Ok(Self {
            start: midnight_utc(start_date),
            end: midnight_utc(day_after),
        })
    }

    /// Parses `YYYY-MM-DD` bounds as sent on the report endpoint.
    pub fn parse(start_date: &str, end_date: &str) -> ValidationResult<Self> {
        let start = parse_calendar_date("start_date", start_date)?;
        let end = parse_calendar_date("end_date", end_date)?;
        Self::from_dates(start, end)
    }

    /// The UTC calendar day containing `now`.
    pub fn day_of(now: DateTime<Utc>) -> ValidationResult<Self> {
        let today = now.date_naive();
        Self::from_dates(today, today)
    }

    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Checks `start <= ts < end`.
    #[inline]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

// =============================================================================
// Window Summary
// =============================================================================

/// Aggregate figures for a window, without the transaction listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowSummary {
    pub total_transactions: i64,
    pub total_revenue: i64,
    pub best_selling_product: Option<BestSellingProduct>,
}

impl WindowSummary {
    /// Attaches the listing the summary was computed over.
    pub fn into_report(self, transactions: Vec<Transaction>) -> AggregateReport {
        AggregateReport {
            transactions,
            total_transactions: self.total_transactions,
            total_revenue: self.total_revenue,
            best_selling_product: self.best_selling_product,
        }
    }
}

/// Computes count, revenue and best seller over already-filtered transactions.
///
/// Revenue or a per-product quantity that no longer fits in `i64` is an
/// [`ValidationError::Overflow`], the same error checkout raises.
///
/// ## Example
/// ```rust
/// use cashier_core::report::summarize;
///
/// let summary = summarize(&[]).unwrap();
/// assert_eq!(summary.total_transactions, 0);
/// assert_eq!(summary.total_revenue, 0);
/// assert!(summary.best_selling_product.is_none());
/// ```
pub fn summarize(transactions: &[Transaction]) -> ValidationResult<WindowSummary> {
    let revenue = transactions
        .iter()
        .try_fold(Money::zero(), |acc, tx| acc.checked_add(tx.total()))
        .ok_or_else(|| ValidationError::Overflow {
            field: "total_revenue".to_string(),
        })?;

    Ok(WindowSummary {
        total_transactions: transactions.len() as i64,
        total_revenue: revenue.minor(),
        best_selling_product: best_selling_product(transactions)?,
    })
}

/// Picks the product with the largest total quantity.
///
/// ## Rules
/// - Ties go to the lowest product id
/// - The reported name is the snapshot on the most recent detail line for
///   that product (latest `created_at`, then transaction id, then detail id)
pub fn best_selling_product(
    transactions: &[Transaction],
) -> ValidationResult<Option<BestSellingProduct>> {
    struct Tally<'a> {
        total: i64,
        name: &'a str,
        seen_at: (DateTime<Utc>, i64, i64),
    }

    let mut tallies: BTreeMap<i64, Tally<'_>> = BTreeMap::new();

    for tx in transactions {
        for detail in &tx.details {
            let seen_at = (tx.created_at, tx.id, detail.id);
            let tally = tallies.entry(detail.product_id).or_insert(Tally {
                total: 0,
                name: &detail.product_name,
                seen_at,
            });
            tally.total = tally
                .total
                .checked_add(detail.quantity)
                .ok_or_else(|| ValidationError::Overflow {
                    field: "total_sold".to_string(),
                })?;
            if seen_at > tally.seen_at {
                tally.name = &detail.product_name;
                tally.seen_at = seen_at;
            }
        }
    }

    let mut best: Option<(i64, &Tally<'_>)> = None;
    for (product_id, tally) in &tallies {
        match best {
            Some((_, current)) if tally.total <= current.total => {}
            _ => best = Some((*product_id, tally)),
        }
    }

    Ok(best.map(|(id, tally)| BestSellingProduct {
        id,
        name: tally.name.to_string(),
        total_sold: tally.total,
    }))
}

/// Orders a listing newest first, ties broken by descending id.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

// =============================================================================
// Unit Tests
// =============================================================================
