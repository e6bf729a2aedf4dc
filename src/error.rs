use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("training invoice {0} not found")]
    InvoiceNotFound(i32),

    #[error("participant {0} not found")]
    ParticipantNotFound(i32),

    #[error("{kind} option {id} not found")]
    OptionNotFound { kind: &'static str, id: i32 },

    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl LedgerError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
