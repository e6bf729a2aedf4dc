//! Invoice arithmetic: office costs from per-day selections, invoice
//! totals, and revenue aggregation for the dashboard.
//!
//! Everything here works on data the caller already fetched and performs no
//! I/O.

mod office_costs;
mod revenue;
mod totals;

pub use office_costs::{DayCost, OptionCatalog, resolve_day_cost, resolve_office_costs, resolve_with_catalog};
pub use revenue::{RevenueQuery, RevenueReport, aggregate_revenue, month_key, year_key};
pub use totals::{apply_update, compute_total, duration, duration_days, refresh_total};
