use crate::error::LedgerError;
use crate::models::validate_required;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Participant {
    pub id: i32,
    pub training_invoice_id: i32,
    pub name: String,
    pub email: String,
    pub company: String,
}

#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub training_invoice_id: i32,
    pub name: String,
    pub email: String,
    pub company: String,
}

impl NewParticipant {
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_required("name", &self.name, "Name is required")?;
        if !looks_like_email(&self.email) {
            return Err(LedgerError::validation("email", "Invalid email address"));
        }
        validate_required("company", &self.company, "Company is required")
    }
}

/// `local@domain.tld` with no whitespace. Deliverability is not checked.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(email: &str) -> NewParticipant {
        NewParticipant {
            training_invoice_id: 1,
            name: "Ada".to_string(),
            email: email.to_string(),
            company: "Acme".to_string(),
        }
    }

    #[test]
    fn accepts_plain_address() {
        assert!(participant("ada@example.com").validate().is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "ada", "ada@", "@example.com", "ada@example", "a da@example.com", "a@b@c.com"] {
            let err = participant(email).validate().unwrap_err();
            assert!(matches!(err, LedgerError::Validation { field: "email", .. }), "{email}");
        }
    }

    #[test]
    fn company_is_required() {
        let mut new = participant("ada@example.com");
        new.company = String::new();
        assert!(matches!(new.validate().unwrap_err(), LedgerError::Validation { field: "company", .. }));
    }
}
