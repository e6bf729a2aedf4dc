use std::collections::{BTreeMap, BTreeSet};

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};

use crate::models::TrainingInvoice;

/// Optional year/month restriction on the effective invoice date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevenueQuery {
    pub year: Option<i32>,
    /// 1-based calendar month.
    pub month: Option<u32>,
}

impl RevenueQuery {
    fn matches(&self, date: Option<NaiveDate>) -> bool {
        if self.year.is_none() && self.month.is_none() {
            return true;
        }
        // With any filter set, an invoice without a date cannot match.
        let Some(date) = date else {
            return false;
        };
        self.year.is_none_or(|year| date.year() == year) && self.month.is_none_or(|month| date.month() == month)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueReport {
    /// Keyed by `YYYY-MM`.
    pub by_month: BTreeMap<String, BigDecimal>,
    /// Keyed by `YYYY`.
    pub by_year: BTreeMap<String, BigDecimal>,
    pub total_revenue: BigDecimal,
    pub total_invoices: usize,
    /// Years and months present across all invoices, ignoring the query,
    /// to populate the dashboard's filter choices.
    pub available_years: Vec<i32>,
    pub available_months: Vec<u32>,
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn year_key(date: NaiveDate) -> String {
    format!("{:04}", date.year())
}

/// Sums stored invoice totals per month and per year.
///
/// Invoices without any usable date are left out of the monthly and yearly
/// buckets but still count towards `total_revenue` and `total_invoices`, so
/// the buckets may add up to less than the scalar total.
pub fn aggregate_revenue(invoices: &[TrainingInvoice], query: RevenueQuery) -> RevenueReport {
    let mut by_month: BTreeMap<String, BigDecimal> = BTreeMap::new();
    let mut by_year: BTreeMap<String, BigDecimal> = BTreeMap::new();
    let mut total_revenue = BigDecimal::from(0);
    let mut total_invoices = 0;

    for invoice in invoices {
        let date = invoice.effective_date();
        if !query.matches(date) {
            continue;
        }

        total_revenue += &invoice.total_invoice_amount;
        total_invoices += 1;

        if let Some(date) = date {
            *by_month.entry(month_key(date)).or_insert_with(|| BigDecimal::from(0)) +=
                &invoice.total_invoice_amount;
            *by_year.entry(year_key(date)).or_insert_with(|| BigDecimal::from(0)) +=
                &invoice.total_invoice_amount;
        }
    }

    let dates: Vec<NaiveDate> = invoices.iter().filter_map(TrainingInvoice::effective_date).collect();
    let available_years = dates.iter().map(Datelike::year).collect::<BTreeSet<_>>();
    let available_months = dates.iter().map(Datelike::month).collect::<BTreeSet<_>>();

    RevenueReport {
        by_month,
        by_year,
        total_revenue,
        total_invoices,
        available_years: available_years.into_iter().collect(),
        available_months: available_months.into_iter().collect(),
    }
}
