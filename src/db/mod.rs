mod store;

pub use store::InvoiceStore;

use anyhow::Result;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::LedgerError;
use crate::models::{
    AdminTasks, CateringOption, NewCateringOption, NewParticipant, NewRoomRentOption, Participant, RoomRentOption,
    TrainingDay, TrainingInvoice,
};

const INVOICE_COLUMNS: &str = r#"
    id,
    invoice_number,
    invoice_date,
    customer,
    training_name,
    training_dates,
    duration_days,
    trainer_costs,
    office_costs,
    margin_percentage,
    total_invoice_amount,
    trainer_availability_emailed,
    masterclass_planning_added,
    lms_updated,
    navara_event_agenda_updated,
    catering_ordered,
    trainer_invoice_received,
    created_at,
    updated_at
"#;

/// Row shape of `training_invoices`; the schedule lives in a JSONB column.
#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: i32,
    invoice_number: String,
    invoice_date: Option<NaiveDate>,
    customer: String,
    training_name: String,
    training_dates: Json<Vec<TrainingDay>>,
    duration_days: i32,
    trainer_costs: BigDecimal,
    office_costs: BigDecimal,
    margin_percentage: BigDecimal,
    total_invoice_amount: BigDecimal,
    trainer_availability_emailed: bool,
    masterclass_planning_added: bool,
    lms_updated: bool,
    navara_event_agenda_updated: bool,
    catering_ordered: bool,
    trainer_invoice_received: bool,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<InvoiceRow> for TrainingInvoice {
    fn from(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            invoice_number: row.invoice_number,
            invoice_date: row.invoice_date,
            customer: row.customer,
            training_name: row.training_name,
            training_dates: row.training_dates.0,
            duration_days: row.duration_days,
            trainer_costs: row.trainer_costs,
            office_costs: row.office_costs,
            margin_percentage: row.margin_percentage,
            total_invoice_amount: row.total_invoice_amount,
            tasks: AdminTasks {
                trainer_availability_emailed: row.trainer_availability_emailed,
                masterclass_planning_added: row.masterclass_planning_added,
                lms_updated: row.lms_updated,
                navara_event_agenda_updated: row.navara_event_agenda_updated,
                catering_ordered: row.catering_ordered,
                trainer_invoice_received: row.trainer_invoice_received,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(config.database_url())
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

impl InvoiceStore for Database {
    async fn list_invoices(&self) -> Result<Vec<TrainingInvoice>, LedgerError> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM training_invoices ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, InvoiceRow>(&sql)
            .fetch_all(self.get_pool())
            .await?;

        debug!(count = rows.len(), "loaded training invoices");
        Ok(rows.into_iter().map(TrainingInvoice::from).collect())
    }

    async fn get_invoice(&self, id: i32) -> Result<Option<TrainingInvoice>, LedgerError> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM training_invoices WHERE id = $1");
        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?;

        Ok(row.map(TrainingInvoice::from))
    }

    async fn create_invoice(&self, invoice: &TrainingInvoice) -> Result<i32, LedgerError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO training_invoices
                (invoice_number, invoice_date, customer, training_name, training_dates, duration_days,
                 trainer_costs, office_costs, margin_percentage, total_invoice_amount,
                 trainer_availability_emailed, masterclass_planning_added, lms_updated,
                 navara_event_agenda_updated, catering_ordered, trainer_invoice_received)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(&invoice.invoice_number)
        .bind(invoice.invoice_date)
        .bind(&invoice.customer)
        .bind(&invoice.training_name)
        .bind(Json(&invoice.training_dates))
        .bind(invoice.duration_days)
        .bind(&invoice.trainer_costs)
        .bind(&invoice.office_costs)
        .bind(&invoice.margin_percentage)
        .bind(&invoice.total_invoice_amount)
        .bind(invoice.tasks.trainer_availability_emailed)
        .bind(invoice.tasks.masterclass_planning_added)
        .bind(invoice.tasks.lms_updated)
        .bind(invoice.tasks.navara_event_agenda_updated)
        .bind(invoice.tasks.catering_ordered)
        .bind(invoice.tasks.trainer_invoice_received)
        .fetch_one(self.get_pool())
        .await?;

        info!(invoice_id = id, customer = %invoice.customer, "created training invoice");
        Ok(id)
    }

    async fn update_invoice(&self, invoice: &TrainingInvoice) -> Result<bool, LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE training_invoices
            SET invoice_number = $1,
                invoice_date = $2,
                customer = $3,
                training_name = $4,
                training_dates = $5,
                duration_days = $6,
                trainer_costs = $7,
                office_costs = $8,
                margin_percentage = $9,
                total_invoice_amount = $10,
                trainer_availability_emailed = $11,
                masterclass_planning_added = $12,
                lms_updated = $13,
                navara_event_agenda_updated = $14,
                catering_ordered = $15,
                trainer_invoice_received = $16,
                updated_at = NOW()
            WHERE id = $17
            "#,
        )
        .bind(&invoice.invoice_number)
        .bind(invoice.invoice_date)
        .bind(&invoice.customer)
        .bind(&invoice.training_name)
        .bind(Json(&invoice.training_dates))
        .bind(invoice.duration_days)
        .bind(&invoice.trainer_costs)
        .bind(&invoice.office_costs)
        .bind(&invoice.margin_percentage)
        .bind(&invoice.total_invoice_amount)
        .bind(invoice.tasks.trainer_availability_emailed)
        .bind(invoice.tasks.masterclass_planning_added)
        .bind(invoice.tasks.lms_updated)
        .bind(invoice.tasks.navara_event_agenda_updated)
        .bind(invoice.tasks.catering_ordered)
        .bind(invoice.tasks.trainer_invoice_received)
        .bind(invoice.id)
        .execute(self.get_pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn room_rent_options(&self) -> Result<Vec<RoomRentOption>, LedgerError> {
        let options = sqlx::query_as::<_, RoomRentOption>(
            r#"
            SELECT id, name, description, rent_per_hour, is_active
            FROM training_room_rent_options
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(options)
    }

    async fn catering_options(&self) -> Result<Vec<CateringOption>, LedgerError> {
        let options = sqlx::query_as::<_, CateringOption>(
            r#"
            SELECT id, name, description, lunch_price_per_participant, dinner_price_per_participant, is_active
            FROM catering_options
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(options)
    }

    async fn create_room_rent_option(&self, option: &NewRoomRentOption) -> Result<RoomRentOption, LedgerError> {
        let created = sqlx::query_as::<_, RoomRentOption>(
            r#"
            INSERT INTO training_room_rent_options (name, description, rent_per_hour, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, rent_per_hour, is_active
            "#,
        )
        .bind(&option.name)
        .bind(&option.description)
        .bind(&option.rent_per_hour)
        .bind(option.is_active)
        .fetch_one(self.get_pool())
        .await?;

        info!(option_id = created.id, name = %created.name, "created room rent option");
        Ok(created)
    }

    async fn update_room_rent_option(&self, option: &RoomRentOption) -> Result<bool, LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE training_room_rent_options
            SET name = $1,
                description = $2,
                rent_per_hour = $3,
                is_active = $4,
                updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(&option.name)
        .bind(&option.description)
        .bind(&option.rent_per_hour)
        .bind(option.is_active)
        .bind(option.id)
        .execute(self.get_pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_catering_option(&self, option: &NewCateringOption) -> Result<CateringOption, LedgerError> {
        let created = sqlx::query_as::<_, CateringOption>(
            r#"
            INSERT INTO catering_options
                (name, description, lunch_price_per_participant, dinner_price_per_participant, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, lunch_price_per_participant, dinner_price_per_participant, is_active
            "#,
        )
        .bind(&option.name)
        .bind(&option.description)
        .bind(&option.lunch_price_per_participant)
        .bind(&option.dinner_price_per_participant)
        .bind(option.is_active)
        .fetch_one(self.get_pool())
        .await?;

        info!(option_id = created.id, name = %created.name, "created catering option");
        Ok(created)
    }

    async fn update_catering_option(&self, option: &CateringOption) -> Result<bool, LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE catering_options
            SET name = $1,
                description = $2,
                lunch_price_per_participant = $3,
                dinner_price_per_participant = $4,
                is_active = $5,
                updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(&option.name)
        .bind(&option.description)
        .bind(&option.lunch_price_per_participant)
        .bind(&option.dinner_price_per_participant)
        .bind(option.is_active)
        .bind(option.id)
        .execute(self.get_pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_participants(&self, invoice_id: i32) -> Result<Vec<Participant>, LedgerError> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"
            SELECT id, training_invoice_id, name, email, company
            FROM participants
            WHERE training_invoice_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(invoice_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(participants)
    }

    async fn participant_count(&self, invoice_id: i32) -> Result<i64, LedgerError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM participants WHERE training_invoice_id = $1",
        )
        .bind(invoice_id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(count)
    }

    async fn add_participant(&self, participant: &NewParticipant) -> Result<Participant, LedgerError> {
        let created = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (training_invoice_id, name, email, company)
            VALUES ($1, $2, $3, $4)
            RETURNING id, training_invoice_id, name, email, company
            "#,
        )
        .bind(participant.training_invoice_id)
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(&participant.company)
        .fetch_one(self.get_pool())
        .await?;

        Ok(created)
    }

    async fn delete_participant(&self, id: i32) -> Result<Option<Participant>, LedgerError> {
        let deleted = sqlx::query_as::<_, Participant>(
            r#"
            DELETE FROM participants
            WHERE id = $1
            RETURNING id, training_invoice_id, name, email, company
            "#,
        )
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(deleted)
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;

    if config.run_migrations {
        sqlx::migrate!().run(db.get_pool()).await?;
        info!("database migrations applied");
    }

    Ok(db)
}
