use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveTime;

use crate::models::{CateringOption, RoomRentOption, TrainingDay};

const SECONDS_PER_HOUR: i64 = 3600;

/// Room and catering options indexed by id.
///
/// Inactive options stay in the catalog: they only hide an option from new
/// selections, historical invoices are still priced with them.
#[derive(Debug, Default)]
pub struct OptionCatalog<'a> {
    rooms: HashMap<i32, &'a RoomRentOption>,
    catering: HashMap<i32, &'a CateringOption>,
}

impl<'a> OptionCatalog<'a> {
    pub fn new(rooms: &'a [RoomRentOption], catering: &'a [CateringOption]) -> Self {
        Self {
            rooms: rooms.iter().map(|option| (option.id, option)).collect(),
            catering: catering.iter().map(|option| (option.id, option)).collect(),
        }
    }

    pub fn room(&self, id: Option<i32>) -> Option<&'a RoomRentOption> {
        id.and_then(|id| self.rooms.get(&id).copied())
    }

    pub fn catering(&self, id: Option<i32>) -> Option<&'a CateringOption> {
        id.and_then(|id| self.catering.get(&id).copied())
    }
}

/// Office costs of a single training day, split by charge.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCost {
    pub room: BigDecimal,
    pub lunch: BigDecimal,
    pub dinner: BigDecimal,
}

impl DayCost {
    pub fn total(&self) -> BigDecimal {
        &(&self.room + &self.lunch) + &self.dinner
    }
}

/// Prices one training day against the catalog. Unknown option ids and
/// unusable times contribute nothing.
pub fn resolve_day_cost(day: &TrainingDay, participant_count: i64, catalog: &OptionCatalog<'_>) -> DayCost {
    let participants = BigDecimal::from(participant_count);

    let room = match catalog.room(day.room_rent_option_id) {
        Some(option) => {
            let seconds = BigDecimal::from(booked_seconds(&day.start_time, &day.end_time));
            (&option.rent_per_hour * &seconds) / BigDecimal::from(SECONDS_PER_HOUR)
        }
        None => BigDecimal::from(0),
    };

    let lunch = match catalog.catering(day.lunch_catering_option_id) {
        Some(option) => &participants * &option.lunch_price_per_participant,
        None => BigDecimal::from(0),
    };

    let dinner = match catalog.catering(day.dinner_catering_option_id) {
        Some(option) => &participants * &option.dinner_price_per_participant,
        None => BigDecimal::from(0),
    };

    DayCost { room, lunch, dinner }
}

/// Sums room rental and catering charges over every training day.
///
/// The result is exact; rounding to cents is left to whoever displays it.
pub fn resolve_office_costs(
    days: &[TrainingDay],
    participant_count: i64,
    room_options: &[RoomRentOption],
    catering_options: &[CateringOption],
) -> BigDecimal {
    let catalog = OptionCatalog::new(room_options, catering_options);
    resolve_with_catalog(days, participant_count, &catalog)
}

pub fn resolve_with_catalog(days: &[TrainingDay], participant_count: i64, catalog: &OptionCatalog<'_>) -> BigDecimal {
    let mut total = BigDecimal::from(0);
    for day in days {
        total += &resolve_day_cost(day, participant_count, catalog).total();
    }
    total
}

/// Length of a same-day booking in seconds, or zero when either time does
/// not parse or the end is not after the start.
fn booked_seconds(start: &str, end: &str) -> i64 {
    match (parse_time(start), parse_time(end)) {
        (Some(start), Some(end)) => (end - start).num_seconds().max(0),
        _ => 0,
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn room(id: i32, rent: &str) -> RoomRentOption {
        RoomRentOption {
            id,
            name: format!("Room {id}"),
            description: None,
            rent_per_hour: BigDecimal::from_str(rent).unwrap(),
            is_active: true,
        }
    }

    fn catering(id: i32, lunch: &str, dinner: &str) -> CateringOption {
        CateringOption {
            id,
            name: format!("Menu {id}"),
            description: None,
            lunch_price_per_participant: BigDecimal::from_str(lunch).unwrap(),
            dinner_price_per_participant: BigDecimal::from_str(dinner).unwrap(),
            is_active: true,
        }
    }

    fn day(start: &str, end: &str) -> TrainingDay {
        TrainingDay::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), start, end)
    }

    #[test]
    fn no_selections_cost_nothing() {
        let rooms = vec![room(1, "10")];
        let menus = vec![catering(1, "15", "25")];
        let days = vec![day("09:00", "17:00"), day("09:00", "12:00")];

        for participants in [0, 1, 40] {
            assert_eq!(
                resolve_office_costs(&days, participants, &rooms, &menus),
                BigDecimal::from(0)
            );
        }
    }

    #[test]
    fn room_rent_is_charged_per_hour() {
        let rooms = vec![room(1, "10")];
        let days = vec![day("09:00", "17:00").with_room(1)];

        assert_eq!(resolve_office_costs(&days, 5, &rooms, &[]), BigDecimal::from(80));
    }

    #[test]
    fn partial_hours_are_exact() {
        let rooms = vec![room(1, "12.50")];
        let days = vec![day("09:00", "12:30").with_room(1)];

        assert_eq!(
            resolve_office_costs(&days, 0, &rooms, &[]),
            BigDecimal::from_str("43.75").unwrap()
        );
    }

    #[test]
    fn catering_scales_with_participants() {
        let menus = vec![catering(3, "15", "25")];
        let days = vec![day("09:00", "17:00").with_lunch(3).with_dinner(3)];

        assert_eq!(resolve_office_costs(&days, 4, &[], &menus), BigDecimal::from(160));
    }

    #[test]
    fn lunch_and_dinner_can_use_different_menus() {
        let menus = vec![catering(1, "10", "99"), catering(2, "99", "30")];
        let days = vec![day("09:00", "17:00").with_lunch(1).with_dinner(2)];

        assert_eq!(resolve_office_costs(&days, 2, &[], &menus), BigDecimal::from(80));
    }

    #[test]
    fn stale_option_ids_are_ignored() {
        let rooms = vec![room(1, "10")];
        let menus = vec![catering(1, "15", "25")];
        let days = vec![day("09:00", "17:00").with_room(7).with_lunch(8).with_dinner(9)];

        assert_eq!(resolve_office_costs(&days, 4, &rooms, &menus), BigDecimal::from(0));
    }

    #[test]
    fn inactive_options_are_still_priced() {
        let mut retired = room(1, "10");
        retired.is_active = false;
        let days = vec![day("10:00", "12:00").with_room(1)];

        assert_eq!(resolve_office_costs(&days, 0, &[retired], &[]), BigDecimal::from(20));
    }

    #[test]
    fn unusable_times_contribute_zero_room_cost() {
        let rooms = vec![room(1, "10")];
        let days = vec![
            day("17:00", "09:00").with_room(1),
            day("09:00", "09:00").with_room(1),
            day("nine", "17:00").with_room(1),
            day("", "").with_room(1),
        ];

        assert_eq!(resolve_office_costs(&days, 3, &rooms, &[]), BigDecimal::from(0));
    }

    #[test]
    fn accepts_times_with_seconds() {
        let rooms = vec![room(1, "10")];
        let days = vec![day("09:00:00", "11:00:00").with_room(1)];

        assert_eq!(resolve_office_costs(&days, 0, &rooms, &[]), BigDecimal::from(20));
    }

    #[test]
    fn sums_every_day_including_repeated_dates() {
        let rooms = vec![room(1, "10")];
        let menus = vec![catering(1, "15", "25")];
        let days = vec![
            day("09:00", "17:00").with_room(1).with_lunch(1),
            day("18:00", "20:00").with_room(1).with_dinner(1),
        ];

        // 80 + 2*15 + 20 + 2*25
        assert_eq!(resolve_office_costs(&days, 2, &rooms, &menus), BigDecimal::from(180));
    }

    #[test]
    fn day_cost_breakdown() {
        let rooms = vec![room(1, "10")];
        let menus = vec![catering(1, "15", "25")];
        let catalog = OptionCatalog::new(&rooms, &menus);
        let cost = resolve_day_cost(&day("09:00", "13:00").with_room(1).with_lunch(1), 3, &catalog);

        assert_eq!(cost.room, BigDecimal::from(40));
        assert_eq!(cost.lunch, BigDecimal::from(45));
        assert_eq!(cost.dinner, BigDecimal::from(0));
        assert_eq!(cost.total(), BigDecimal::from(85));
    }

    #[test]
    fn resolving_twice_gives_the_same_result() {
        let rooms = vec![room(1, "17.35")];
        let menus = vec![catering(1, "12.10", "27.45")];
        let days = vec![
            day("08:15", "16:40").with_room(1).with_lunch(1),
            day("09:00", "21:00").with_room(1).with_dinner(1),
        ];

        let first = resolve_office_costs(&days, 11, &rooms, &menus);
        let second = resolve_office_costs(&days, 11, &rooms, &menus);
        assert_eq!(first, second);
    }
}
