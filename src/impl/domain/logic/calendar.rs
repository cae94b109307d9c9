use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// America/Lima. Peru observes no daylight saving time.
const PERU_SECS_WEST_OF_UTC: i32 = 5 * 3600;

fn peru_offset() -> FixedOffset {
    FixedOffset::west_opt(PERU_SECS_WEST_OF_UTC).expect("UTC-5 is within offset bounds")
}

pub fn peru_now() -> DateTime<FixedOffset> {
    to_peru(Utc::now())
}

/// Calendar date in Peru right now; the default date of every screen.
pub fn peru_today() -> NaiveDate {
    peru_now().date_naive()
}

pub(crate) fn to_peru(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&peru_offset())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn late_evening_utc_is_still_the_previous_day_in_lima() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 2, 3, 30, 0).unwrap();
        let local = to_peru(instant);
        assert_eq!(local.date_naive().to_string(), "2024-05-01");
        assert_eq!(local.format("%H:%M").to_string(), "22:30");
    }
}
