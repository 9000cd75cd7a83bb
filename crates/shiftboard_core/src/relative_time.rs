use chrono::{DateTime, Utc};

/// Humanized distance between `time` and `now`, e.g. "5 minutes ago" or
/// "in a day". Pure; callers recompute it on their own tick.
pub fn from_now(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (now - time).num_milliseconds() as f64 / 1000.0;
    let phrase = humanize(delta.abs());
    if delta < 0.0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn humanize(seconds: f64) -> String {
    let minutes = (seconds / 60.0).round();
    let hours = (seconds / 3_600.0).round();
    let days_exact = seconds / 86_400.0;
    let days = days_exact.round();
    let months = (days_exact / 30.436_875).round();
    let years = (days_exact / 365.25).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{months} months")
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}
