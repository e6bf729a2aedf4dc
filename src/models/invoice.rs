use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::LedgerError;
use crate::models::{TrainingDay, validate_non_negative};

/// The back-office checklist tracked for every training.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminTasks {
    pub trainer_availability_emailed: bool,
    pub masterclass_planning_added: bool,
    pub lms_updated: bool,
    pub navara_event_agenda_updated: bool,
    pub catering_ordered: bool,
    pub trainer_invoice_received: bool,
}

impl AdminTasks {
    pub fn all_done() -> Self {
        Self {
            trainer_availability_emailed: true,
            masterclass_planning_added: true,
            lms_updated: true,
            navara_event_agenda_updated: true,
            catering_ordered: true,
            trainer_invoice_received: true,
        }
    }

    fn as_array(&self) -> [bool; 6] {
        [
            self.trainer_availability_emailed,
            self.masterclass_planning_added,
            self.lms_updated,
            self.navara_event_agenda_updated,
            self.catering_ordered,
            self.trainer_invoice_received,
        ]
    }

    pub fn completed_count(&self) -> usize {
        self.as_array().iter().filter(|done| **done).count()
    }

    pub fn total_count(&self) -> usize {
        self.as_array().len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed_count() == self.total_count()
    }
}

#[derive(Debug, Clone)]
pub struct TrainingInvoice {
    pub id: i32,
    pub invoice_number: String,
    pub invoice_date: Option<NaiveDate>,
    pub customer: String,
    pub training_name: String,
    pub training_dates: Vec<TrainingDay>,
    pub duration_days: i32,
    pub trainer_costs: BigDecimal,
    pub office_costs: BigDecimal,
    pub margin_percentage: BigDecimal,
    pub total_invoice_amount: BigDecimal,
    pub tasks: AdminTasks,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrainingInvoice {
    /// The date revenue is booked on: the invoice date when set, otherwise
    /// the day the record was created.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.invoice_date
            .or_else(|| self.created_at.map(|created| created.date_naive()))
    }
}

/// Input for creating an invoice. Office costs, duration and total are
/// derived, so they are not part of it.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub customer: String,
    pub training_name: String,
    pub training_dates: Vec<TrainingDay>,
    pub trainer_costs: BigDecimal,
    pub margin_percentage: BigDecimal,
    pub tasks: AdminTasks,
}

impl NewInvoice {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.customer.trim().is_empty() {
            return Err(LedgerError::validation("customer", "Customer is required"));
        }
        if self.training_name.trim().is_empty() {
            return Err(LedgerError::validation("training_name", "Training name is required"));
        }
        validate_training_dates(&self.training_dates)?;
        validate_non_negative("trainer_costs", &self.trainer_costs)?;
        validate_non_negative("margin_percentage", &self.margin_percentage)?;

        Ok(())
    }
}

/// Partial edit of an existing invoice. `None` leaves a field untouched.
/// Office costs, duration and total are derived and cannot be edited.
#[derive(Debug, Clone, Default)]
pub struct InvoiceUpdate {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub customer: Option<String>,
    pub training_name: Option<String>,
    pub training_dates: Option<Vec<TrainingDay>>,
    pub trainer_costs: Option<BigDecimal>,
    pub margin_percentage: Option<BigDecimal>,
    pub tasks: Option<AdminTasks>,
}

impl InvoiceUpdate {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if let Some(name) = &self.training_name {
            if name.trim().is_empty() {
                return Err(LedgerError::validation("training_name", "Training name is required"));
            }
        }
        if let Some(days) = &self.training_dates {
            validate_training_dates(days)?;
        }
        if let Some(value) = &self.trainer_costs {
            validate_non_negative("trainer_costs", value)?;
        }
        if let Some(value) = &self.margin_percentage {
            validate_non_negative("margin_percentage", value)?;
        }

        Ok(())
    }

    pub fn touches_costs(&self) -> bool {
        self.trainer_costs.is_some() || self.margin_percentage.is_some()
    }
}

fn validate_training_dates(days: &[TrainingDay]) -> Result<(), LedgerError> {
    if days.is_empty() {
        return Err(LedgerError::validation("training_dates", "At least one date is required"));
    }
    for day in days {
        if day.date.is_none() {
            return Err(LedgerError::validation("date", "Date is required"));
        }
        if day.start_time.trim().is_empty() {
            return Err(LedgerError::validation("start_time", "Start time is required"));
        }
        if day.end_time.trim().is_empty() {
            return Err(LedgerError::validation("end_time", "End time is required"));
        }
    }

    Ok(())
}
