use bigdecimal::BigDecimal;
use tracing::{debug, info, instrument};

use crate::billing::{self, OptionCatalog, RevenueQuery, RevenueReport};
use crate::db::InvoiceStore;
use crate::error::LedgerError;
use crate::models::{
    CateringOption, CateringOptionUpdate, InvoiceUpdate, NewCateringOption, NewInvoice, NewParticipant,
    NewRoomRentOption, Participant, RoomRentOption, RoomRentOptionUpdate, TrainingDay, TrainingInvoice,
};

/// Recomputes office costs, duration and total from the current schedule,
/// option prices and the given participant count.
async fn price_invoice<S: InvoiceStore>(
    store: &S,
    invoice: &mut TrainingInvoice,
    participant_count: i64,
) -> Result<(), LedgerError> {
    let rooms = store.room_rent_options().await?;
    let catering = store.catering_options().await?;
    let catalog = OptionCatalog::new(&rooms, &catering);

    invoice.office_costs = billing::resolve_with_catalog(&invoice.training_dates, participant_count, &catalog);
    invoice.duration_days = billing::duration_days(&invoice.training_dates);
    billing::refresh_total(invoice);

    debug!(
        invoice_id = invoice.id,
        participant_count,
        office_costs = %invoice.office_costs,
        total = %invoice.total_invoice_amount,
        "priced invoice"
    );

    Ok(())
}

async fn load_invoice<S: InvoiceStore>(store: &S, id: i32) -> Result<TrainingInvoice, LedgerError> {
    store.get_invoice(id).await?.ok_or(LedgerError::InvoiceNotFound(id))
}

async fn store_invoice<S: InvoiceStore>(store: &S, invoice: &TrainingInvoice) -> Result<(), LedgerError> {
    if !store.update_invoice(invoice).await? {
        return Err(LedgerError::InvoiceNotFound(invoice.id));
    }
    Ok(())
}

/// Validates and inserts a new invoice with its derived amounts filled in.
/// A fresh invoice has no participants yet, so catering is priced at zero.
#[instrument(skip_all, fields(customer = %new.customer))]
pub async fn create_invoice<S: InvoiceStore>(store: &S, new: NewInvoice) -> Result<TrainingInvoice, LedgerError> {
    new.validate()?;

    let mut invoice = TrainingInvoice {
        id: 0,
        invoice_number: new.invoice_number.unwrap_or_default(),
        invoice_date: new.invoice_date,
        customer: new.customer,
        training_name: new.training_name,
        training_dates: new.training_dates,
        duration_days: 0,
        trainer_costs: new.trainer_costs,
        office_costs: BigDecimal::from(0),
        margin_percentage: new.margin_percentage,
        total_invoice_amount: BigDecimal::from(0),
        tasks: new.tasks,
        created_at: None,
        updated_at: None,
    };
    price_invoice(store, &mut invoice, 0).await?;

    let id = store.create_invoice(&invoice).await?;
    load_invoice(store, id).await
}

/// Applies a partial edit and persists it. Every edit is re-priced against
/// the option catalogs and the current roster, so the stored office costs
/// always match the schedule.
#[instrument(skip(store, update))]
pub async fn update_invoice<S: InvoiceStore>(
    store: &S,
    id: i32,
    update: InvoiceUpdate,
) -> Result<TrainingInvoice, LedgerError> {
    update.validate()?;

    let mut invoice = load_invoice(store, id).await?;
    billing::apply_update(&mut invoice, update);

    let participants = store.participant_count(id).await?;
    price_invoice(store, &mut invoice, participants).await?;

    store_invoice(store, &invoice).await?;
    info!(invoice_id = id, total = %invoice.total_invoice_amount, "updated training invoice");

    load_invoice(store, id).await
}

/// Re-derives office costs and total from the stored schedule, current
/// option prices and participant count, and persists the result.
#[instrument(skip(store))]
pub async fn recalculate_invoice<S: InvoiceStore>(store: &S, id: i32) -> Result<TrainingInvoice, LedgerError> {
    let mut invoice = load_invoice(store, id).await?;
    let participants = store.participant_count(id).await?;
    let previous = invoice.total_invoice_amount.clone();

    price_invoice(store, &mut invoice, participants).await?;
    store_invoice(store, &invoice).await?;

    if previous != invoice.total_invoice_amount {
        info!(
            invoice_id = id,
            previous = %previous,
            total = %invoice.total_invoice_amount,
            "invoice total changed"
        );
    }

    load_invoice(store, id).await
}

/// Adds someone to the roster. Catering is charged per participant, so the
/// invoice is recalculated straight away.
#[instrument(skip_all, fields(invoice_id = participant.training_invoice_id))]
pub async fn add_participant<S: InvoiceStore>(
    store: &S,
    participant: NewParticipant,
) -> Result<(Participant, TrainingInvoice), LedgerError> {
    participant.validate()?;
    let invoice_id = participant.training_invoice_id;
    load_invoice(store, invoice_id).await?;

    let created = store.add_participant(&participant).await?;
    let invoice = recalculate_invoice(store, invoice_id).await?;

    Ok((created, invoice))
}

/// Removes someone from the roster and recalculates the invoice they
/// belonged to.
#[instrument(skip(store))]
pub async fn remove_participant<S: InvoiceStore>(
    store: &S,
    participant_id: i32,
) -> Result<TrainingInvoice, LedgerError> {
    let removed = store
        .delete_participant(participant_id)
        .await?
        .ok_or(LedgerError::ParticipantNotFound(participant_id))?;

    recalculate_invoice(store, removed.training_invoice_id).await
}

pub async fn list_participants<S: InvoiceStore>(store: &S, invoice_id: i32) -> Result<Vec<Participant>, LedgerError> {
    load_invoice(store, invoice_id).await?;
    store.list_participants(invoice_id).await
}

/// Re-prices every invoice with at least one training day matching `uses`.
async fn recalculate_referencing<S, F>(store: &S, uses: F) -> Result<Vec<TrainingInvoice>, LedgerError>
where
    S: InvoiceStore,
    F: Fn(&TrainingDay) -> bool,
{
    let invoices = store.list_invoices().await?;
    let mut repriced = Vec::new();

    for invoice in invoices.iter().filter(|invoice| invoice.training_dates.iter().any(|day| uses(day))) {
        repriced.push(recalculate_invoice(store, invoice.id).await?);
    }

    Ok(repriced)
}

#[instrument(skip_all, fields(name = %new.name))]
pub async fn create_room_rent_option<S: InvoiceStore>(
    store: &S,
    new: NewRoomRentOption,
) -> Result<RoomRentOption, LedgerError> {
    new.validate()?;
    store.create_room_rent_option(&new).await
}

/// Edits a room option. When the hourly rent changes, every invoice that
/// books the room is recalculated and returned.
#[instrument(skip(store, update))]
pub async fn update_room_rent_option<S: InvoiceStore>(
    store: &S,
    id: i32,
    update: RoomRentOptionUpdate,
) -> Result<(RoomRentOption, Vec<TrainingInvoice>), LedgerError> {
    update.validate()?;

    let mut option = store
        .room_rent_options()
        .await?
        .into_iter()
        .find(|option| option.id == id)
        .ok_or(LedgerError::OptionNotFound { kind: "room rent", id })?;

    let reprice = update.changes_price();
    update.apply(&mut option);
    if !store.update_room_rent_option(&option).await? {
        return Err(LedgerError::OptionNotFound { kind: "room rent", id });
    }

    let repriced = if reprice {
        recalculate_referencing(store, |day| day.uses_room(id)).await?
    } else {
        Vec::new()
    };
    info!(option_id = id, rent_per_hour = %option.rent_per_hour, repriced = repriced.len(), "updated room rent option");

    Ok((option, repriced))
}

#[instrument(skip_all, fields(name = %new.name))]
pub async fn create_catering_option<S: InvoiceStore>(
    store: &S,
    new: NewCateringOption,
) -> Result<CateringOption, LedgerError> {
    new.validate()?;
    store.create_catering_option(&new).await
}

/// Edits a catering option. A price change recalculates every invoice that
/// serves lunch or dinner from it.
#[instrument(skip(store, update))]
pub async fn update_catering_option<S: InvoiceStore>(
    store: &S,
    id: i32,
    update: CateringOptionUpdate,
) -> Result<(CateringOption, Vec<TrainingInvoice>), LedgerError> {
    update.validate()?;

    let mut option = store
        .catering_options()
        .await?
        .into_iter()
        .find(|option| option.id == id)
        .ok_or(LedgerError::OptionNotFound { kind: "catering", id })?;

    let reprice = update.changes_price();
    update.apply(&mut option);
    if !store.update_catering_option(&option).await? {
        return Err(LedgerError::OptionNotFound { kind: "catering", id });
    }

    let repriced = if reprice {
        recalculate_referencing(store, |day| day.uses_catering(id)).await?
    } else {
        Vec::new()
    };
    info!(option_id = id, repriced = repriced.len(), "updated catering option");

    Ok((option, repriced))
}

pub async fn revenue_report<S: InvoiceStore>(store: &S, query: RevenueQuery) -> Result<RevenueReport, LedgerError> {
    let invoices = store.list_invoices().await?;
    Ok(billing::aggregate_revenue(&invoices, query))
}
