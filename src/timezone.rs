//! Time-zone rule used to turn commit timestamps into local hours.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, Offset, Timelike, Utc};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneRule {
    /// The machine's local zone.
    #[default]
    Local,
    /// A fixed UTC offset (`utc` is `Fixed(+00:00)`).
    Fixed(FixedOffset),
}

impl TimeZoneRule {
    /// Local hour (0-23) of a Unix timestamp, `None` if out of range.
    pub fn hour(&self, epoch: i64) -> Option<u32> {
        let utc = DateTime::from_timestamp(epoch, 0)?;
        Some(match self {
            TimeZoneRule::Local => utc.with_timezone(&Local).hour(),
            TimeZoneRule::Fixed(offset) => utc.with_timezone(offset).hour(),
        })
    }
}

impl FromStr for TimeZoneRule {
    type Err = ConfigError;

    /// Accepts `local`, `utc`/`z`, and offsets `+H`, `-HH`, `+HH:MM`, `+HHMM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "" | "local" => return Ok(TimeZoneRule::Local),
            "utc" | "z" | "gmt" => return Ok(TimeZoneRule::Fixed(Utc.fix())),
            _ => {}
        }

        let (sign, rest) = match value.as_bytes()[0] {
            b'+' => (1, &value[1..]),
            b'-' => (-1, &value[1..]),
            _ => return Err(ConfigError::time_zone(value, "expected local, utc or ±HH[:MM]")),
        };

        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
            None => (rest, "0"),
        };
        let hours =
            offset_digits(hours).ok_or_else(|| ConfigError::time_zone(value, "bad hours"))?;
        let minutes =
            offset_digits(minutes).ok_or_else(|| ConfigError::time_zone(value, "bad minutes"))?;
        if hours > 14 || minutes > 59 {
            return Err(ConfigError::time_zone(value, "offset out of range"));
        }

        let seconds = (hours * 3600 + minutes * 60) as i32;
        FixedOffset::east_opt(sign * seconds)
            .map(TimeZoneRule::Fixed)
            .ok_or_else(|| ConfigError::time_zone(value, "offset out of range"))
    }
}

/// Unsigned decimal field of an offset. Only the leading sign is allowed,
/// so `+` and `-` are rejected here.
fn offset_digits(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

impl fmt::Display for TimeZoneRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneRule::Local => f.write_str("local"),
            TimeZoneRule::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_zones() {
        assert_eq!("local".parse::<TimeZoneRule>().unwrap(), TimeZoneRule::Local);
        assert_eq!("".parse::<TimeZoneRule>().unwrap(), TimeZoneRule::Local);
        assert_eq!(
            "UTC".parse::<TimeZoneRule>().unwrap(),
            TimeZoneRule::Fixed(FixedOffset::east_opt(0).unwrap())
        );
    }

    #[test]
    fn parse_offsets() {
        let east = |s| FixedOffset::east_opt(s).unwrap();
        assert_eq!("+9".parse::<TimeZoneRule>().unwrap(), TimeZoneRule::Fixed(east(9 * 3600)));
        assert_eq!("-05".parse::<TimeZoneRule>().unwrap(), TimeZoneRule::Fixed(east(-5 * 3600)));
        assert_eq!(
            "+05:30".parse::<TimeZoneRule>().unwrap(),
            TimeZoneRule::Fixed(east(5 * 3600 + 1800))
        );
        assert_eq!(
            "-0330".parse::<TimeZoneRule>().unwrap(),
            TimeZoneRule::Fixed(east(-(3 * 3600 + 1800)))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("Europe/Paris".parse::<TimeZoneRule>().is_err());
        assert!("+xx".parse::<TimeZoneRule>().is_err());
        assert!("+25".parse::<TimeZoneRule>().is_err());
        assert!("+05:75".parse::<TimeZoneRule>().is_err());
    }

    #[test]
    fn parse_rejects_inner_signs() {
        for bad in ["+-5", "-05:-30", "++3", "+05:+30", "-+0530", "+", "+05:"] {
            assert!(bad.parse::<TimeZoneRule>().is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn hour_in_fixed_offset() {
        // 2023-11-14T22:13:20Z
        let epoch = 1_700_000_000;
        let utc: TimeZoneRule = "utc".parse().unwrap();
        assert_eq!(utc.hour(epoch), Some(22));
        let tokyo: TimeZoneRule = "+09:00".parse().unwrap();
        assert_eq!(tokyo.hour(epoch), Some(7));
        let ny: TimeZoneRule = "-05:00".parse().unwrap();
        assert_eq!(ny.hour(epoch), Some(17));
    }

    #[test]
    fn hour_in_local_zone_is_valid() {
        let hour = TimeZoneRule::Local.hour(1_700_000_000).unwrap();
        assert!(hour < 24);
    }

    #[test]
    fn display_round_trips_fixed() {
        let rule: TimeZoneRule = "+05:30".parse().unwrap();
        assert_eq!(rule.to_string(), "+05:30");
        assert_eq!(TimeZoneRule::Local.to_string(), "local");
    }
}
