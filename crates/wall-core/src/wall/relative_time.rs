//! "5 minutes ago" style timestamps.

use chrono::{DateTime, Utc};

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_YEAR: i64 = 525_600;

/// Distance between `then` and `now` in words, with an "ago"/"in" marker.
pub fn distance_in_words(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let seconds = delta.num_seconds().abs();
    let words = words_for(seconds);

    if delta.num_seconds() < 0 {
        format!("in {words}")
    } else {
        format!("{words} ago")
    }
}

fn words_for(seconds: i64) -> String {
    // Whole minutes, rounded half up.
    let minutes = (seconds + 30) / 60;

    if minutes < 1 && seconds < 30 {
        return "less than a minute".to_string();
    }
    if minutes < 2 {
        return "1 minute".to_string();
    }
    if minutes < 45 {
        return format!("{minutes} minutes");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes + 30) / 60;
        return format!("about {hours} hours");
    }
    if minutes < 2_520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes + MINUTES_IN_DAY / 2) / MINUTES_IN_DAY;
        return format!("{days} days");
    }
    if minutes < MINUTES_IN_MONTH * 2 {
        let months = (minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH;
        return plural(months, "about", "month");
    }

    if minutes < MINUTES_IN_YEAR {
        let months = (minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH;
        return plural(months, "", "month");
    }

    let months = minutes / MINUTES_IN_MONTH;
    let years = months / 12;
    match months % 12 {
        0..3 => plural(years, "about", "year"),
        3..9 => plural(years, "over", "year"),
        _ => plural(years + 1, "almost", "year"),
    }
}

fn plural(n: i64, qualifier: &str, unit: &str) -> String {
    let s = if n == 1 { "" } else { "s" };
    if qualifier.is_empty() {
        format!("{n} {unit}{s}")
    } else {
        format!("{qualifier} {n} {unit}{s}")
    }
}
