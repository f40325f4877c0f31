//! Display formatting for upstream values: ISO-8601 durations, view counts,
//! post bodies and epoch timestamps.

use chrono::DateTime;

/// Placeholder for a value the upstream did not provide.
pub const UNKNOWN: &str = "Unknown";

pub const ELLIPSIS: &str = "...";

/// Convert an ISO-8601 duration such as `PT1H2M10S` into `1:02:10`, or
/// `MM:SS` when there are no hours. Minutes and seconds are always two digits
/// and a missing component counts as zero. Days fold into hours.
///
/// Returns `None` for anything that is not a day/time duration, including the
/// `P0D` YouTube reports for live streams.
pub fn format_duration(iso: &str) -> Option<String> {
    let rest = iso.trim().strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut days = 0u64;
    for (value, unit) in components(date_part)? {
        match unit {
            'D' => days = value,
            _ => return None,
        }
    }

    let (mut hours, mut minutes, mut seconds) = (0u64, 0u64, 0u64);
    match time_part {
        Some(time) => {
            let parts = components(time)?;
            if parts.is_empty() {
                return None;
            }
            for (value, unit) in parts {
                match unit {
                    'H' => hours = value,
                    'M' => minutes = value,
                    'S' => seconds = value,
                    _ => return None,
                }
            }
        }
        None if days == 0 => return None,
        None => {}
    }

    let hours = days.checked_mul(24)?.checked_add(hours)?;
    if hours > 0 {
        Some(format!("{hours}:{minutes:02}:{seconds:02}"))
    } else {
        Some(format!("{minutes:02}:{seconds:02}"))
    }
}

/// Split `1H2M` into `[(1, 'H'), (2, 'M')]`. A unit without digits, or
/// digits without a unit, makes the whole thing invalid.
fn components(s: &str) -> Option<Vec<(u64, char)>> {
    let mut out = Vec::new();
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if digits.is_empty() {
                return None;
            }
            out.push((digits.parse().ok()?, c.to_ascii_uppercase()));
            digits.clear();
        }
    }
    if !digits.is_empty() {
        return None;
    }
    Some(out)
}

/// `"12345"` becomes `"12,345"`. Missing, zero or non-numeric counts become
/// [`UNKNOWN`].
pub fn format_view_count(raw: Option<&str>) -> String {
    match raw.and_then(|r| r.trim().parse::<u64>().ok()) {
        Some(n) if n > 0 => group_thousands(n),
        _ => UNKNOWN.to_string(),
    }
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// First `max_chars` characters of `body` followed by [`ELLIPSIS`], cut
/// without regard for word boundaries. A blank body has no description.
pub fn truncate_description(body: &str, max_chars: usize) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    let mut out: String = body.chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    Some(out)
}

/// Epoch seconds to a `M/D/YYYY` date in UTC.
pub fn format_created(epoch_secs: f64) -> String {
    if !epoch_secs.is_finite() {
        return UNKNOWN.to_string();
    }
    match DateTime::from_timestamp(epoch_secs.trunc() as i64, 0) {
        Some(dt) => dt.format("%-m/%-d/%Y").to_string(),
        None => UNKNOWN.to_string(),
    }
}
