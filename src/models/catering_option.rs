use bigdecimal::BigDecimal;

use crate::error::LedgerError;
use crate::models::{validate_non_negative, validate_required};

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CateringOption {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub lunch_price_per_participant: BigDecimal,
    pub dinner_price_per_participant: BigDecimal,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewCateringOption {
    pub name: String,
    pub description: Option<String>,
    pub lunch_price_per_participant: BigDecimal,
    pub dinner_price_per_participant: BigDecimal,
    pub is_active: bool,
}

impl NewCateringOption {
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_required("name", &self.name, "Name is required")?;
        validate_non_negative("lunch_price_per_participant", &self.lunch_price_per_participant)?;
        validate_non_negative("dinner_price_per_participant", &self.dinner_price_per_participant)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CateringOptionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub lunch_price_per_participant: Option<BigDecimal>,
    pub dinner_price_per_participant: Option<BigDecimal>,
    pub is_active: Option<bool>,
}

impl CateringOptionUpdate {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if let Some(name) = &self.name {
            validate_required("name", name, "Name is required")?;
        }
        if let Some(price) = &self.lunch_price_per_participant {
            validate_non_negative("lunch_price_per_participant", price)?;
        }
        if let Some(price) = &self.dinner_price_per_participant {
            validate_non_negative("dinner_price_per_participant", price)?;
        }

        Ok(())
    }

    pub fn changes_price(&self) -> bool {
        self.lunch_price_per_participant.is_some() || self.dinner_price_per_participant.is_some()
    }

    pub fn apply(self, option: &mut CateringOption) {
        if let Some(name) = self.name {
            option.name = name;
        }
        if let Some(description) = self.description {
            option.description = Some(description);
        }
        if let Some(price) = self.lunch_price_per_participant {
            option.lunch_price_per_participant = price;
        }
        if let Some(price) = self.dinner_price_per_participant {
            option.dinner_price_per_participant = price;
        }
        if let Some(is_active) = self.is_active {
            option.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_menu_prices_are_rejected() {
        let new = NewCateringOption {
            name: "Buffet".to_string(),
            description: None,
            lunch_price_per_participant: BigDecimal::from(12),
            dinner_price_per_participant: BigDecimal::from(-1),
            is_active: true,
        };
        let err = new.validate().unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "dinner_price_per_participant", .. }));

        let update = CateringOptionUpdate {
            lunch_price_per_participant: Some(BigDecimal::from(-3)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn free_menu_is_allowed() {
        let new = NewCateringOption {
            name: "Coffee only".to_string(),
            description: Some("No meals".to_string()),
            lunch_price_per_participant: BigDecimal::from(0),
            dinner_price_per_participant: BigDecimal::from(0),
            is_active: true,
        };
        assert!(new.validate().is_ok());
    }

    #[test]
    fn dinner_price_edit_counts_as_price_change() {
        let update = CateringOptionUpdate {
            dinner_price_per_participant: Some(BigDecimal::from(30)),
            ..Default::default()
        };
        assert!(update.changes_price());

        let rename = CateringOptionUpdate {
            name: Some("Deluxe".to_string()),
            ..Default::default()
        };
        assert!(!rename.changes_price());
    }
}
