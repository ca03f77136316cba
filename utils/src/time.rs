//! Duration formatting and parsing, in clock units (seconds or blocks).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration component: {0}")]
    InvalidComponent(String),
    #[error("duration overflows")]
    Overflow,
}

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Parse `"90"`, `"2d"`, `"1h30m"` or `"1d 12h"` into seconds.
///
/// A bare number is taken as-is, so block counts parse too.
pub fn parse_duration(input: &str) -> Result<u64, DurationParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if let Ok(plain) = input.parse::<u64>() {
        return Ok(plain);
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for ch in input.chars().filter(|c| !c.is_whitespace()) {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let unit = match ch {
            'd' => 86_400,
            'h' => 3_600,
            'm' => 60,
            's' => 1,
            _ => return Err(DurationParseError::InvalidComponent(format!("{digits}{ch}"))),
        };
        let amount: u64 = digits
            .parse()
            .map_err(|_| DurationParseError::InvalidComponent(format!("{digits}{ch}")))?;
        total = amount
            .checked_mul(unit)
            .and_then(|v| total.checked_add(v))
            .ok_or(DurationParseError::Overflow)?;
        digits.clear();
    }
    if !digits.is_empty() {
        return Err(DurationParseError::InvalidComponent(digits));
    }
    Ok(total)
}
