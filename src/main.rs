use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use training_ledger::billing::{self, OptionCatalog, RevenueQuery};
use training_ledger::config;
use training_ledger::db::{self, Database, InvoiceStore};
use training_ledger::error::LedgerError;
use training_ledger::filters;
use training_ledger::invoice_service;
use training_ledger::models::{CateringOptionUpdate, RoomRentOptionUpdate, TrainingInvoice};

#[derive(Parser)]
#[command(name = "ledger", version, about = "Training invoice back office")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Revenue grouped by month and year
    Revenue {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Recalculate office costs and total of one invoice
    Recalc { id: i32 },
    /// Recalculate every invoice, e.g. after option prices changed
    RecalcAll,
    /// Show an invoice with its per-day office costs
    Show { id: i32 },
    /// List customers
    Customers,
    /// List the participants of an invoice
    Participants { invoice_id: i32 },
    /// Change the hourly rent of a room and reprice invoices booking it
    SetRoomRate { id: i32, rent_per_hour: BigDecimal },
    /// Change catering prices and reprice invoices serving from the option
    SetCateringPrice {
        id: i32,
        #[arg(long)]
        lunch: Option<BigDecimal>,
        #[arg(long)]
        dinner: Option<BigDecimal>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize database connection
    let db = db::init(&config).await?;
    info!("database connection established");

    match cli.command {
        Command::Revenue { year, month } => print_revenue(&db, RevenueQuery { year, month }).await?,
        Command::Recalc { id } => {
            let invoice = invoice_service::recalculate_invoice(&db, id).await?;
            println!(
                "Invoice {}: office costs {}, total {}",
                invoice.id,
                format_amount(&invoice.office_costs),
                format_amount(&invoice.total_invoice_amount)
            );
        }
        Command::RecalcAll => recalculate_all(&db).await?,
        Command::Show { id } => print_invoice(&db, id).await?,
        Command::Customers => {
            let invoices = db.list_invoices().await?;
            for customer in filters::unique_customers(&invoices) {
                println!("{customer}");
            }
        }
        Command::Participants { invoice_id } => {
            let roster = invoice_service::list_participants(&db, invoice_id).await?;
            for participant in &roster {
                println!("{:>5}  {}  <{}>  {}", participant.id, participant.name, participant.email, participant.company);
            }
            println!("{} participant(s)", roster.len());
        }
        Command::SetRoomRate { id, rent_per_hour } => {
            let update = RoomRentOptionUpdate {
                rent_per_hour: Some(rent_per_hour),
                ..Default::default()
            };
            let (room, repriced) = invoice_service::update_room_rent_option(&db, id, update).await?;
            println!("{}: {} per hour", room.name, format_amount(&room.rent_per_hour));
            print_repriced(&repriced);
        }
        Command::SetCateringPrice { id, lunch, dinner } => {
            let update = CateringOptionUpdate {
                lunch_price_per_participant: lunch,
                dinner_price_per_participant: dinner,
                ..Default::default()
            };
            let (option, repriced) = invoice_service::update_catering_option(&db, id, update).await?;
            println!(
                "{}: lunch {}, dinner {} per participant",
                option.name,
                format_amount(&option.lunch_price_per_participant),
                format_amount(&option.dinner_price_per_participant)
            );
            print_repriced(&repriced);
        }
    }

    Ok(())
}

/// Two decimals for display. Stored amounts keep their full precision.
fn format_amount(value: &BigDecimal) -> String {
    format!("€{}", value.round(2).with_scale(2))
}

fn print_repriced(invoices: &[TrainingInvoice]) {
    for invoice in invoices {
        println!(
            "  {} {}: total {}",
            invoice.invoice_number,
            invoice.customer,
            format_amount(&invoice.total_invoice_amount)
        );
    }
    println!("Repriced {} invoice(s)", invoices.len());
}

async fn print_revenue(db: &Database, query: RevenueQuery) -> Result<()> {
    let report = invoice_service::revenue_report(db, query).await?;

    println!("Revenue by month");
    for (month, amount) in &report.by_month {
        println!("  {month}  {:>14}", format_amount(amount));
    }

    println!("Revenue by year");
    for (year, amount) in &report.by_year {
        println!("  {year}     {:>14}", format_amount(amount));
    }

    println!();
    println!("Total revenue:  {}", format_amount(&report.total_revenue));
    println!("Invoices:       {}", report.total_invoices);

    let years: Vec<String> = report.available_years.iter().map(ToString::to_string).collect();
    println!("Available years: {}", years.join(", "));

    Ok(())
}

async fn recalculate_all(db: &Database) -> Result<()> {
    let invoices = db.list_invoices().await?;
    let mut failed = 0;

    for invoice in &invoices {
        if let Err(err) = invoice_service::recalculate_invoice(db, invoice.id).await {
            error!(invoice_id = invoice.id, error = %err, "recalculation failed");
            failed += 1;
        }
    }

    println!("Recalculated {} of {} invoices", invoices.len() - failed, invoices.len());
    Ok(())
}

async fn print_invoice(db: &Database, id: i32) -> Result<()> {
    let invoice = db.get_invoice(id).await?.ok_or(LedgerError::InvoiceNotFound(id))?;
    let rooms = db.room_rent_options().await?;
    let catering = db.catering_options().await?;
    let participants = db.participant_count(id).await?;
    let catalog = OptionCatalog::new(&rooms, &catering);

    println!("{} - {} ({})", invoice.invoice_number, invoice.training_name, invoice.customer);
    match invoice.invoice_date {
        Some(date) => println!("Invoice date: {}", date.format("%d-%m-%Y")),
        None => println!("Invoice date: -"),
    }
    println!("Participants: {participants}");
    println!("Duration:     {} day(s)", invoice.duration_days);
    println!();

    for day in &invoice.training_dates {
        let cost = billing::resolve_day_cost(day, participants, &catalog);
        let date = match day.date {
            Some(date) => date.format("%d-%m-%Y").to_string(),
            None => "??-??-????".to_string(),
        };
        println!(
            "  {} {}-{}  room {}  lunch {}  dinner {}",
            date,
            day.start_time,
            day.end_time,
            format_amount(&cost.room),
            format_amount(&cost.lunch),
            format_amount(&cost.dinner)
        );
    }

    println!();
    println!("Trainer costs: {}", format_amount(&invoice.trainer_costs));
    println!("Office costs:  {}", format_amount(&invoice.office_costs));
    println!("Margin:        {}%", invoice.margin_percentage);
    println!("Total:         {}", format_amount(&invoice.total_invoice_amount));
    println!(
        "Admin tasks:   {}/{} done",
        invoice.tasks.completed_count(),
        invoice.tasks.total_count()
    );

    Ok(())
}
