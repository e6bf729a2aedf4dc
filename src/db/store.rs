use crate::error::LedgerError;
use crate::models::{
    CateringOption, NewCateringOption, NewParticipant, NewRoomRentOption, Participant, RoomRentOption, TrainingInvoice,
};

/// Persistence used by the invoice service.
///
/// Implemented by [`crate::db::Database`] for PostgreSQL; tests supply an
/// in-memory version.
#[allow(async_fn_in_trait)]
pub trait InvoiceStore {
    async fn list_invoices(&self) -> Result<Vec<TrainingInvoice>, LedgerError>;

    async fn get_invoice(&self, id: i32) -> Result<Option<TrainingInvoice>, LedgerError>;

    /// Inserts the invoice and returns its new id. `invoice.id` is ignored.
    async fn create_invoice(&self, invoice: &TrainingInvoice) -> Result<i32, LedgerError>;

    /// Overwrites every stored field of the invoice. Returns `false` when no
    /// such invoice exists.
    async fn update_invoice(&self, invoice: &TrainingInvoice) -> Result<bool, LedgerError>;

    async fn room_rent_options(&self) -> Result<Vec<RoomRentOption>, LedgerError>;

    async fn catering_options(&self) -> Result<Vec<CateringOption>, LedgerError>;

    async fn create_room_rent_option(&self, option: &NewRoomRentOption) -> Result<RoomRentOption, LedgerError>;

    /// Overwrites the stored option. Returns `false` when it does not exist.
    async fn update_room_rent_option(&self, option: &RoomRentOption) -> Result<bool, LedgerError>;

    async fn create_catering_option(&self, option: &NewCateringOption) -> Result<CateringOption, LedgerError>;

    async fn update_catering_option(&self, option: &CateringOption) -> Result<bool, LedgerError>;

    /// Roster of one invoice, ordered by name.
    async fn list_participants(&self, invoice_id: i32) -> Result<Vec<Participant>, LedgerError>;

    async fn participant_count(&self, invoice_id: i32) -> Result<i64, LedgerError>;

    async fn add_participant(&self, participant: &NewParticipant) -> Result<Participant, LedgerError>;

    /// Removes a participant and returns the deleted row, if it existed.
    async fn delete_participant(&self, id: i32) -> Result<Option<Participant>, LedgerError>;
}
