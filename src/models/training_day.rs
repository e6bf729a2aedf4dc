use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One scheduled day of a training, stored as part of the invoice's
/// `training_dates` JSON column.
///
/// Times are kept as entered (`HH:MM`); they are only parsed when office
/// costs are resolved, so a malformed value never blocks loading an invoice.
/// The same holds for the date: a value that is not a calendar date decodes
/// as `None` instead of failing the whole row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrainingDay {
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub room_rent_option_id: Option<i32>,
    #[serde(default)]
    pub lunch_catering_option_id: Option<i32>,
    #[serde(default)]
    pub dinner_catering_option_id: Option<i32>,
}

impl TrainingDay {
    pub fn new(date: NaiveDate, start_time: &str, end_time: &str) -> Self {
        Self {
            date: Some(date),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            room_rent_option_id: None,
            lunch_catering_option_id: None,
            dinner_catering_option_id: None,
        }
    }

    pub fn with_room(mut self, option_id: i32) -> Self {
        self.room_rent_option_id = Some(option_id);
        self
    }

    pub fn with_lunch(mut self, option_id: i32) -> Self {
        self.lunch_catering_option_id = Some(option_id);
        self
    }

    pub fn with_dinner(mut self, option_id: i32) -> Self {
        self.dinner_catering_option_id = Some(option_id);
        self
    }

    pub fn uses_room(&self, option_id: i32) -> bool {
        self.room_rent_option_id == Some(option_id)
    }

    /// True when either meal of the day is served from the given option.
    pub fn uses_catering(&self, option_id: i32) -> bool {
        self.lunch_catering_option_id == Some(option_id) || self.dinner_catering_option_id == Some(option_id)
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part as written by
/// older clients (`2024-01-08T00:00:00.000Z`).
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let day_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_stored_schedule() {
        let json = r#"[
            {"date": "2024-01-01", "start_time": "09:00", "end_time": "17:00",
             "room_rent_option_id": 2, "lunch_catering_option_id": null, "dinner_catering_option_id": 4},
            {"date": "2024-01-02", "start_time": "09:00", "end_time": "12:00"}
        ]"#;

        let days: Vec<TrainingDay> = serde_json::from_str(json).unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].room_rent_option_id, Some(2));
        assert_eq!(days[0].lunch_catering_option_id, None);
        assert_eq!(days[0].dinner_catering_option_id, Some(4));
        // Older rows were saved before option selections existed.
        assert_eq!(days[1], TrainingDay::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), "09:00", "12:00"));
    }

    #[test]
    fn malformed_dates_do_not_fail_the_schedule() {
        let json = r#"[
            {"date": "next tuesday", "start_time": "09:00", "end_time": "17:00", "room_rent_option_id": 1},
            {"date": "", "start_time": "09:00", "end_time": "17:00"},
            {"date": null, "start_time": "09:00", "end_time": "17:00"},
            {"start_time": "09:00", "end_time": "17:00"},
            {"date": "2024-01-08T00:00:00.000Z", "start_time": "09:00", "end_time": "17:00"}
        ]"#;

        let days: Vec<TrainingDay> = serde_json::from_str(json).unwrap();

        assert_eq!(days.len(), 5);
        assert!(days[..4].iter().all(|day| day.date.is_none()));
        assert_eq!(days[0].room_rent_option_id, Some(1));
        assert_eq!(days[4].date, NaiveDate::from_ymd_opt(2024, 1, 8));
    }

    #[test]
    fn encodes_unselected_options_as_null() {
        let day = TrainingDay::new(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(), "10:00", "16:00").with_lunch(3);

        let value = serde_json::to_value(&day).unwrap();

        assert_eq!(value["date"], "2024-05-06");
        assert_eq!(value["lunch_catering_option_id"], 3);
        assert!(value["room_rent_option_id"].is_null());
    }
}
