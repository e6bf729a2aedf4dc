use std::collections::BTreeSet;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::models::TrainingInvoice;

/// Criteria of the invoice list. Empty fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub search: Option<String>,
    pub customer: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<BigDecimal>,
    pub max_amount: Option<BigDecimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Completed,
    Pending,
}

/// Criteria of the admin checklist view.
#[derive(Debug, Clone, Default)]
pub struct AdminTaskFilter {
    pub search: Option<String>,
    pub customer: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub task_status: Option<TaskStatus>,
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Inclusive range check. A missing date passes, matching how the list
/// treats invoices that have not been dated yet.
fn within(date: Option<NaiveDate>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    let Some(date) = date else {
        return true;
    };
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &TrainingInvoice) -> bool {
        if let Some(search) = non_empty(&self.search) {
            let search = search.to_lowercase();
            let found = contains_ignore_case(&invoice.training_name, &search)
                || contains_ignore_case(&invoice.invoice_number, &search)
                || contains_ignore_case(&invoice.customer, &search);
            if !found {
                return false;
            }
        }

        if let Some(customer) = non_empty(&self.customer) {
            if invoice.customer != customer {
                return false;
            }
        }

        if !within(invoice.invoice_date, self.date_from, self.date_to) {
            return false;
        }

        if let Some(min) = &self.min_amount {
            if invoice.total_invoice_amount < *min {
                return false;
            }
        }
        if let Some(max) = &self.max_amount {
            if invoice.total_invoice_amount > *max {
                return false;
            }
        }

        true
    }
}

impl AdminTaskFilter {
    pub fn matches(&self, invoice: &TrainingInvoice) -> bool {
        if let Some(search) = non_empty(&self.search) {
            let search = search.to_lowercase();
            let found = contains_ignore_case(&invoice.training_name, &search)
                || contains_ignore_case(&invoice.customer, &search);
            if !found {
                return false;
            }
        }

        if let Some(customer) = non_empty(&self.customer) {
            if invoice.customer != customer {
                return false;
            }
        }

        // The checklist is scheduled around the first listed training day.
        let first_day = invoice.training_dates.first().and_then(|day| day.date);
        if !within(first_day, self.date_from, self.date_to) {
            return false;
        }

        match self.task_status {
            Some(TaskStatus::Completed) => invoice.tasks.is_complete(),
            Some(TaskStatus::Pending) => !invoice.tasks.is_complete(),
            None => true,
        }
    }
}

pub fn filter_invoices<'a>(invoices: &'a [TrainingInvoice], filter: &InvoiceFilter) -> Vec<&'a TrainingInvoice> {
    invoices.iter().filter(|invoice| filter.matches(invoice)).collect()
}

pub fn filter_admin_tasks<'a>(invoices: &'a [TrainingInvoice], filter: &AdminTaskFilter) -> Vec<&'a TrainingInvoice> {
    invoices.iter().filter(|invoice| filter.matches(invoice)).collect()
}

/// Sorted customer names without duplicates.
pub fn unique_customers(invoices: &[TrainingInvoice]) -> Vec<String> {
    invoices
        .iter()
        .map(|invoice| invoice.customer.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
