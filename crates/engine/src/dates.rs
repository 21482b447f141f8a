#![forbid(unsafe_code)]

use time::format_description::well_known::Rfc3339;
use time::{Date, Month, OffsetDateTime};

/// Bucket value for dates that cannot be read: no history at all, or a
/// token the parser does not understand. Both count as overdue for every
/// time-bucket threshold.
pub const DAYS_OVERDUE_UNKNOWN: i64 = 9999;

/// Days elapsed since a last-count display token, relative to `today`.
///
/// Recognized tokens: `hoje` (0), `ontem` (1), and `DD/MM` assumed to fall
/// within the current year. A cross-year date therefore measures as the
/// absolute distance to this year's date, which is shipped behavior.
/// Anything else yields `DAYS_OVERDUE_UNKNOWN`.
pub fn days_since(token: &str, today: Date) -> i64 {
    let lowered = token.trim().to_lowercase();
    if lowered.contains("hoje") {
        return 0;
    }
    if lowered.contains("ontem") {
        return 1;
    }

    let parts: Vec<&str> = lowered.split('/').collect();
    if parts.len() != 2 {
        return DAYS_OVERDUE_UNKNOWN;
    }
    let (Ok(day), Ok(month)) = (parts[0].trim().parse::<u8>(), parts[1].trim().parse::<u8>())
    else {
        return DAYS_OVERDUE_UNKNOWN;
    };
    let Ok(month) = Month::try_from(month) else {
        return DAYS_OVERDUE_UNKNOWN;
    };
    let Ok(date) = Date::from_calendar_date(today.year(), month, day) else {
        return DAYS_OVERDUE_UNKNOWN;
    };
    (today - date).whole_days().abs()
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn now_ms_i64() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    let ms = nanos / 1_000_000i128;
    if ms <= 0 {
        0
    } else if ms >= i64::MAX as i128 {
        i64::MAX
    } else {
        ms as i64
    }
}

/// Display timestamp for a stored epoch-ms value (settings history rows).
pub fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> Date {
        Date::from_calendar_date(2023, Month::October, 25).expect("valid date")
    }

    #[test]
    fn relative_tokens_resolve_case_insensitively() {
        assert_eq!(days_since("Hoje", today()), 0);
        assert_eq!(days_since("hoje", today()), 0);
        assert_eq!(days_since("Ontem, 16:30", today()), 1);
    }

    #[test]
    fn day_month_tokens_assume_the_current_year() {
        assert_eq!(days_since("20/10", today()), 5);
        assert_eq!(days_since("01/09", today()), 54);
        assert_eq!(days_since("25/10", today()), 0);
    }

    #[test]
    fn future_dates_measure_as_absolute_distance() {
        // Current-year assumption: a December token seen in October reads
        // as days *until* that date, kept as a positive distance.
        assert_eq!(days_since("05/11", today()), 11);
    }

    #[test]
    fn unreadable_tokens_are_infinitely_overdue() {
        assert_eq!(days_since("", today()), DAYS_OVERDUE_UNKNOWN);
        assert_eq!(days_since("Agora", today()), DAYS_OVERDUE_UNKNOWN);
        assert_eq!(days_since("2023-10-25", today()), DAYS_OVERDUE_UNKNOWN);
        assert_eq!(days_since("31/02", today()), DAYS_OVERDUE_UNKNOWN);
        assert_eq!(days_since("x/10", today()), DAYS_OVERDUE_UNKNOWN);
    }

    #[test]
    fn epoch_ms_formats_as_rfc3339() {
        assert_eq!(ts_ms_to_rfc3339(0), "1970-01-01T00:00:00Z");
        assert_eq!(ts_ms_to_rfc3339(1_698_192_000_000), "2023-10-25T00:00:00Z");
    }
}
