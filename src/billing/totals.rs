use std::collections::HashSet;

use bigdecimal::BigDecimal;

use crate::models::{InvoiceUpdate, TrainingDay, TrainingInvoice};

/// Invoice total. The margin is a markup on trainer costs only; office
/// costs are passed through at cost.
pub fn compute_total(trainer_costs: &BigDecimal, office_costs: &BigDecimal, margin_percentage: &BigDecimal) -> BigDecimal {
    let margin_amount = (trainer_costs * margin_percentage) / BigDecimal::from(100);
    &(trainer_costs + office_costs) + &margin_amount
}

/// Number of distinct calendar dates. A date listed twice (e.g. a morning
/// and an evening session) counts once; days without a usable date are not
/// counted.
pub fn duration(days: &[TrainingDay]) -> usize {
    days.iter().filter_map(|day| day.date).collect::<HashSet<_>>().len()
}

pub fn duration_days(days: &[TrainingDay]) -> i32 {
    i32::try_from(duration(days)).unwrap_or(i32::MAX)
}

/// Recomputes the derived total from the invoice's current cost fields.
pub fn refresh_total(invoice: &mut TrainingInvoice) {
    invoice.total_invoice_amount =
        compute_total(&invoice.trainer_costs, &invoice.office_costs, &invoice.margin_percentage);
}

/// Applies a partial edit.
///
/// Duration follows a new schedule; the total is recalculated whenever the
/// trainer costs or the margin are part of the edit. Office costs are never
/// taken from an edit, they are re-derived by the invoice service.
pub fn apply_update(invoice: &mut TrainingInvoice, update: InvoiceUpdate) {
    let recompute_total = update.touches_costs();

    if let Some(number) = update.invoice_number {
        invoice.invoice_number = number;
    }
    if let Some(date) = update.invoice_date {
        invoice.invoice_date = Some(date);
    }
    if let Some(customer) = update.customer {
        invoice.customer = customer;
    }
    if let Some(name) = update.training_name {
        invoice.training_name = name;
    }
    if let Some(days) = update.training_dates {
        invoice.duration_days = duration_days(&days);
        invoice.training_dates = days;
    }
    if let Some(trainer_costs) = update.trainer_costs {
        invoice.trainer_costs = trainer_costs;
    }
    if let Some(margin) = update.margin_percentage {
        invoice.margin_percentage = margin;
    }
    if let Some(tasks) = update.tasks {
        invoice.tasks = tasks;
    }

    if recompute_total {
        refresh_total(invoice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdminTasks;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn invoice() -> TrainingInvoice {
        TrainingInvoice {
            id: 1,
            invoice_number: "INV-001".to_string(),
            invoice_date: Some(date(5)),
            customer: "Acme".to_string(),
            training_name: "Async Rust".to_string(),
            training_dates: vec![TrainingDay::new(date(8), "09:00", "17:00")],
            duration_days: 1,
            trainer_costs: dec("100"),
            office_costs: dec("50"),
            margin_percentage: dec("25"),
            total_invoice_amount: dec("175"),
            tasks: AdminTasks::default(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn total_adds_margin_on_trainer_costs_only() {
        assert_eq!(compute_total(&dec("100"), &dec("50"), &dec("25")), dec("175"));
        assert_eq!(compute_total(&dec("0"), &dec("50"), &dec("25")), dec("50"));
        assert_eq!(compute_total(&dec("100"), &dec("0"), &dec("0")), dec("100"));
    }

    #[test]
    fn total_keeps_cents_exact() {
        assert_eq!(compute_total(&dec("1234.56"), &dec("0.10"), &dec("12.5")), dec("1388.98"));
    }

    #[test]
    fn total_is_linear_in_costs() {
        let margin = dec("17.5");
        for (trainer, office) in [("100", "50"), ("1999.99", "0.01"), ("0", "12.34")] {
            let (trainer, office) = (dec(trainer), dec(office));
            let doubled = compute_total(&(&trainer * &dec("2")), &(&office * &dec("2")), &margin);
            assert_eq!(doubled, &compute_total(&trainer, &office, &margin) * &dec("2"));
        }
    }

    #[test]
    fn duration_counts_distinct_dates() {
        let days = vec![
            TrainingDay::new(date(1), "09:00", "12:00"),
            TrainingDay::new(date(1), "13:00", "17:00"),
            TrainingDay::new(date(2), "09:00", "17:00"),
        ];
        assert_eq!(duration(&days), 2);
        assert_eq!(duration(&[]), 0);
    }

    #[test]
    fn duration_ignores_ordering() {
        let days = vec![
            TrainingDay::new(date(3), "09:00", "17:00"),
            TrainingDay::new(date(1), "09:00", "17:00"),
            TrainingDay::new(date(3), "18:00", "20:00"),
        ];
        assert_eq!(duration_days(&days), 2);
    }

    #[test]
    fn duration_skips_undated_days() {
        let mut undated = TrainingDay::new(date(4), "09:00", "17:00");
        undated.date = None;
        let days = vec![undated.clone(), undated, TrainingDay::new(date(5), "09:00", "17:00")];
        assert_eq!(duration(&days), 1);
    }

    #[test]
    fn update_of_margin_recomputes_total() {
        let mut invoice = invoice();
        apply_update(
            &mut invoice,
            InvoiceUpdate {
                margin_percentage: Some(dec("50")),
                ..Default::default()
            },
        );

        assert_eq!(invoice.total_invoice_amount, dec("200"));
        assert_eq!(invoice.office_costs, dec("50"));
    }

    #[test]
    fn update_without_costs_keeps_stored_total() {
        let mut invoice = invoice();
        invoice.total_invoice_amount = dec("999");
        apply_update(
            &mut invoice,
            InvoiceUpdate {
                customer: Some("Globex".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(invoice.customer, "Globex");
        assert_eq!(invoice.total_invoice_amount, dec("999"));
    }

    #[test]
    fn update_of_schedule_recomputes_duration() {
        let mut invoice = invoice();
        apply_update(
            &mut invoice,
            InvoiceUpdate {
                training_dates: Some(vec![
                    TrainingDay::new(date(10), "09:00", "17:00"),
                    TrainingDay::new(date(11), "09:00", "17:00"),
                    TrainingDay::new(date(12), "09:00", "17:00"),
                ]),
                ..Default::default()
            },
        );

        assert_eq!(invoice.duration_days, 3);
        assert_eq!(invoice.training_dates.len(), 3);
    }
}
