use serde::{Deserialize, Serialize};
use time::Time;
use validator::{Validate, ValidationError};

time::serde::format_description!(hhmm, Time, "[hour]:[minute]");

/// Opening hours for one ISO weekday (1 = Monday .. 7 = Sunday). Both
/// bounds NULL means the day is closed; a single NULL bound is invalid.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct WorkingHours {
    pub day_of_week: i16,
    #[serde(with = "hhmm::option")]
    pub open_time: Option<Time>,
    #[serde(with = "hhmm::option")]
    pub close_time: Option<Time>,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_bounds"))]
pub struct UpsertWorkingHours {
    #[validate(range(min = 1, max = 7, message = "Weekday must be 1 (Monday) to 7 (Sunday)"))]
    pub day_of_week: i16,
    #[serde(default, with = "hhmm::option")]
    pub open_time: Option<Time>,
    #[serde(default, with = "hhmm::option")]
    pub close_time: Option<Time>,
}

fn validate_bounds(payload: &UpsertWorkingHours) -> Result<(), ValidationError> {
    match (payload.open_time, payload.close_time) {
        (None, None) => Ok(()),
        (Some(open), Some(close)) if close > open => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::new("closing_not_after_opening")),
        _ => Err(ValidationError::new("one_sided_hours")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::time;

    #[test]
    fn accepts_a_closed_day_and_a_regular_day() {
        let closed = UpsertWorkingHours {
            day_of_week: 7,
            open_time: None,
            close_time: None,
        };
        assert!(closed.validate().is_ok());

        let open = UpsertWorkingHours {
            day_of_week: 1,
            open_time: Some(time!(9:00)),
            close_time: Some(time!(18:00)),
        };
        assert!(open.validate().is_ok());
    }

    #[test]
    fn rejects_one_sided_hours() {
        let payload = UpsertWorkingHours {
            day_of_week: 2,
            open_time: Some(time!(9:00)),
            close_time: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn rejects_closing_before_opening() {
        let payload = UpsertWorkingHours {
            day_of_week: 2,
            open_time: Some(time!(18:00)),
            close_time: Some(time!(9:00)),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_weekdays() {
        let payload = UpsertWorkingHours {
            day_of_week: 8,
            open_time: None,
            close_time: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn wall_clock_times_deserialize_from_hh_mm() {
        let payload: UpsertWorkingHours = serde_json::from_str(
            r#"{"day_of_week": 3, "open_time": "09:00", "close_time": "17:30"}"#,
        )
        .unwrap();
        assert_eq!(payload.open_time, Some(time!(9:00)));
        assert_eq!(payload.close_time, Some(time!(17:30)));
    }
}
