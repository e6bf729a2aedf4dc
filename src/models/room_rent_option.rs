use bigdecimal::BigDecimal;

use crate::error::LedgerError;
use crate::models::{validate_non_negative, validate_required};

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RoomRentOption {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub rent_per_hour: BigDecimal,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewRoomRentOption {
    pub name: String,
    pub description: Option<String>,
    pub rent_per_hour: BigDecimal,
    pub is_active: bool,
}

impl NewRoomRentOption {
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_required("name", &self.name, "Name is required")?;
        validate_non_negative("rent_per_hour", &self.rent_per_hour)
    }
}

/// Partial edit of a room option. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct RoomRentOptionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rent_per_hour: Option<BigDecimal>,
    pub is_active: Option<bool>,
}

impl RoomRentOptionUpdate {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if let Some(name) = &self.name {
            validate_required("name", name, "Name is required")?;
        }
        if let Some(rent) = &self.rent_per_hour {
            validate_non_negative("rent_per_hour", rent)?;
        }

        Ok(())
    }

    /// Whether the edit changes what the option costs.
    pub fn changes_price(&self) -> bool {
        self.rent_per_hour.is_some()
    }

    pub fn apply(self, option: &mut RoomRentOption) {
        if let Some(name) = self.name {
            option.name = name;
        }
        if let Some(description) = self.description {
            option.description = Some(description);
        }
        if let Some(rent) = self.rent_per_hour {
            option.rent_per_hour = rent;
        }
        if let Some(is_active) = self.is_active {
            option.is_active = is_active;
        }
    }
}
