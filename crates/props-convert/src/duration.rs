//! Duration parsing

use props_meta::DurationUnit;
use std::time::Duration;

/// Parse a duration such as `10 s`, `1h 30m` or a bare amount.
///
/// Suffixed forms follow [`humantime::parse_duration`]. A bare non-negative
/// integer is read in `default_unit`.
///
/// ```
/// use props_convert::parse_duration;
/// use props_meta::DurationUnit;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("10 s", DurationUnit::Millis), Ok(Duration::from_secs(10)));
/// assert_eq!(parse_duration("250", DurationUnit::Millis), Ok(Duration::from_millis(250)));
/// ```
pub fn parse_duration(text: &str, default_unit: DurationUnit) -> Result<Duration, String> {
    let text = text.trim();
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        let amount: u64 = text.parse().map_err(|e| format!("invalid amount: {}", e))?;
        return default_unit
            .duration(amount)
            .ok_or_else(|| format!("{} {:?} overflows a duration", amount, default_unit));
    }

    humantime::parse_duration(text).map_err(|e| format!("invalid duration '{}': {}", text, e))
}
