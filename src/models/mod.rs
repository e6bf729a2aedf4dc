mod training_day;
mod room_rent_option;
mod catering_option;
mod invoice;
mod participant;

use bigdecimal::BigDecimal;

use crate::error::LedgerError;

pub use training_day::TrainingDay;
pub use room_rent_option::{NewRoomRentOption, RoomRentOption, RoomRentOptionUpdate};
pub use catering_option::{CateringOption, CateringOptionUpdate, NewCateringOption};
pub use invoice::{AdminTasks, InvoiceUpdate, NewInvoice, TrainingInvoice};
pub use participant::{NewParticipant, Participant};

pub(crate) fn validate_non_negative(field: &'static str, value: &BigDecimal) -> Result<(), LedgerError> {
    if *value < BigDecimal::from(0) {
        return Err(LedgerError::validation(field, "must be non-negative"));
    }

    Ok(())
}

pub(crate) fn validate_required(field: &'static str, value: &str, message: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::validation(field, message));
    }

    Ok(())
}
