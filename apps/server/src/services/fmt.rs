//! Display formatting helpers shared by the dashboard and list endpoints.
//!
//! The frontend expects US-style display strings alongside the raw values.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

/// "December 15, 2024"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// "Dec 15, 2024"
pub fn medium_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "Mon, Dec 15, 2024"
pub fn weekday_medium_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

/// "DEC"
pub fn month_upper(date: NaiveDate) -> String {
    date.format("%b").to_string().to_uppercase()
}

/// "Monday"
pub fn weekday_long(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// "Dec 15"
pub fn short_month_day(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// "9:05 AM"
pub fn time_ampm(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Conversation-list style timestamp: today -> clock time, yesterday ->
/// "Yesterday", within a week -> weekday, otherwise "Dec 15".
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_days = (now - timestamp).num_days();
    if diff_days <= 0 {
        time_ampm(timestamp.time())
    } else if diff_days == 1 {
        "Yesterday".to_string()
    } else if diff_days < 7 {
        timestamp.format("%a").to_string()
    } else {
        short_month_day(timestamp.date_naive())
    }
}

/// Truncated message preview with a trailing ellipsis.
pub fn snippet(content: &str, max_chars: usize) -> String {
    let truncated: String = content.chars().take(max_chars).collect();
    format!("{truncated}...")
}

/// Whole years between the birth date and `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_formats() {
        let d = date(2024, 12, 15);
        assert_eq!(long_date(d), "December 15, 2024");
        assert_eq!(medium_date(d), "Dec 15, 2024");
        assert_eq!(weekday_medium_date(d), "Sun, Dec 15, 2024");
        assert_eq!(month_upper(d), "DEC");
        assert_eq!(weekday_long(d), "Sunday");
        assert_eq!(short_month_day(d), "Dec 15");
    }

    #[test]
    fn single_digit_day_has_no_padding() {
        assert_eq!(medium_date(date(2024, 3, 5)), "Mar 5, 2024");
    }

    #[test]
    fn time_format() {
        assert_eq!(time_ampm(NaiveTime::from_hms_opt(9, 5, 0).unwrap()), "9:05 AM");
        assert_eq!(time_ampm(NaiveTime::from_hms_opt(14, 30, 0).unwrap()), "2:30 PM");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 12, 15, 12, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2024, 12, 15, 9, 5, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 12, 14, 9, 0, 0).unwrap();
        let this_week = Utc.with_ymd_and_hms(2024, 12, 11, 9, 0, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2024, 11, 1, 9, 0, 0).unwrap();

        assert_eq!(relative_time(today, now), "9:05 AM");
        assert_eq!(relative_time(yesterday, now), "Yesterday");
        assert_eq!(relative_time(this_week, now), "Wed");
        assert_eq!(relative_time(older, now), "Nov 1");
    }

    #[test]
    fn age_respects_birthday_not_yet_reached() {
        let today = date(2024, 6, 1);
        assert_eq!(age_on(date(1990, 1, 15), today), 34);
        assert_eq!(age_on(date(1990, 7, 15), today), 33);
    }
}
