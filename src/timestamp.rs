use std::any::Any;
use std::fmt;

use chrono::format::{Item, ParseErrorKind, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

use crate::error::FlagvarError;
use crate::value::Value;

/// Layout selecting RFC 3339, used when a `DateTime<Utc>` field is bound
/// without an explicit layout.
///
/// Passed to [`Timestamp::new`] it parses any RFC 3339 timestamp (`Z` or a
/// numeric offset, any fraction) and renders UTC with `Z` and only as many
/// fractional digits as needed.
pub const RFC3339: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

const NAME: &str = "DateTime";

/// Adapter for a `chrono::DateTime<Utc>` read and written with a strftime
/// layout.
///
/// Layouts with an offset (`%z`, `%:z`) are converted to UTC. Layouts without
/// one are taken as UTC, and date-only layouts as midnight.
pub struct Timestamp<'a> {
    slot: Option<&'a mut DateTime<Utc>>,
    layout: String,
}

impl<'a> Timestamp<'a> {
    /// Fails with [`InvalidArgument`](FlagvarError::InvalidArgument) if
    /// `layout` has a specifier chrono does not know.
    pub fn new(slot: &'a mut DateTime<Utc>, layout: &str) -> Result<Self, FlagvarError> {
        Ok(Self {
            slot: Some(slot),
            layout: checked_layout(layout)?,
        })
    }

    pub fn rfc3339(slot: &'a mut DateTime<Utc>) -> Self {
        Self {
            slot: Some(slot),
            layout: RFC3339.to_string(),
        }
    }

    /// A timestamp adapter with no variable behind it. Renders the zero
    /// timestamp under `layout`.
    pub fn unbound(layout: &str) -> Result<Self, FlagvarError> {
        Ok(Self {
            slot: None,
            layout: checked_layout(layout)?,
        })
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    fn is_rfc3339(&self) -> bool {
        self.layout == RFC3339
    }

    fn parse(&self, text: &str) -> Result<DateTime<Utc>, FlagvarError> {
        if self.is_rfc3339() {
            return DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| FlagvarError::parse(text, NAME, e));
        }
        match DateTime::parse_from_str(text, &self.layout) {
            Ok(dt) => return Ok(dt.with_timezone(&Utc)),
            Err(e) if !matches!(e.kind(), ParseErrorKind::NotEnough) => {
                return Err(FlagvarError::parse(text, NAME, e));
            }
            Err(_) => {}
        }
        match NaiveDateTime::parse_from_str(text, &self.layout) {
            Ok(naive) => return Ok(naive.and_utc()),
            Err(e) if !matches!(e.kind(), ParseErrorKind::NotEnough) => {
                return Err(FlagvarError::parse(text, NAME, e));
            }
            Err(_) => {}
        }
        NaiveDate::parse_from_str(text, &self.layout)
            .map(|date| date.and_time(NaiveTime::default()).and_utc())
            .map_err(|e| FlagvarError::parse(text, NAME, e))
    }
}

fn checked_layout(layout: &str) -> Result<String, FlagvarError> {
    if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
        return Err(FlagvarError::InvalidArgument(format!(
            "invalid timestamp layout \"{layout}\""
        )));
    }
    Ok(layout.to_string())
}

/// 0001-01-01T00:00:00Z, rendered by unbound timestamp adapters.
pub fn zero_timestamp() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::default())
        .and_utc()
}

impl Value for Timestamp<'_> {
    fn set(&mut self, text: &str) -> Result<(), FlagvarError> {
        let parsed = self.parse(text)?;
        let slot = self
            .slot
            .as_deref_mut()
            .ok_or(FlagvarError::Unbound { type_name: NAME })?;
        *slot = parsed;
        Ok(())
    }

    fn get(&self) -> Option<&dyn Any> {
        self.slot.as_deref().map(|v| v as &dyn Any)
    }
}

impl fmt::Display for Timestamp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.slot.as_deref().copied().unwrap_or_else(zero_timestamp);
        if self.is_rfc3339() {
            f.write_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        } else {
            write!(f, "{}", value.format(&self.layout))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rfc3339_reads_back() {
        let at = Utc.with_ymd_and_hms(2024, 2, 29, 13, 45, 10).unwrap();
        let mut slot = at;
        let text = Timestamp::rfc3339(&mut slot).to_string();
        assert_eq!(text, "2024-02-29T13:45:10Z");

        let mut parsed = zero_timestamp();
        Timestamp::rfc3339(&mut parsed).set(&text).unwrap();
        assert_eq!(parsed, at);
    }

    #[test]
    fn offset_is_converted_to_utc() {
        let mut slot = zero_timestamp();
        Timestamp::rfc3339(&mut slot)
            .set("2024-01-01T02:00:00+02:00")
            .unwrap();
        assert_eq!(slot, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn layout_without_offset_is_utc() {
        let mut slot = zero_timestamp();
        let mut value = Timestamp::new(&mut slot, "%Y-%m-%d %H:%M").unwrap();
        value.set("2023-07-04 09:30").unwrap();
        assert_eq!(value.to_string(), "2023-07-04 09:30");
        assert_eq!(slot, Utc.with_ymd_and_hms(2023, 7, 4, 9, 30, 0).unwrap());
    }

    #[test]
    fn date_only_layout_is_midnight() {
        let mut slot = zero_timestamp();
        Timestamp::new(&mut slot, "%Y-%m-%d")
            .unwrap()
            .set("2023-07-04")
            .unwrap();
        assert_eq!(slot, Utc.with_ymd_and_hms(2023, 7, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn mismatch_is_a_parse_error_and_keeps_value() {
        let before = Utc.with_ymd_and_hms(2020, 5, 5, 5, 5, 5).unwrap();
        let mut slot = before;
        let err = Timestamp::new(&mut slot, "%Y-%m-%d")
            .unwrap()
            .set("05/05/2020")
            .unwrap_err();
        assert!(matches!(err, FlagvarError::Parse { .. }));
        assert_eq!(slot, before);
    }

    #[test]
    fn unbound_renders_zero_timestamp() {
        assert_eq!(
            Timestamp::unbound("%Y-%m-%d").unwrap().to_string(),
            "0001-01-01"
        );
        assert_eq!(
            Timestamp::unbound(RFC3339).unwrap().to_string(),
            "0001-01-01T00:00:00Z"
        );
    }

    #[test]
    fn rfc3339_accepts_zulu_and_keeps_fractions() {
        let mut slot = zero_timestamp();
        let mut value = Timestamp::rfc3339(&mut slot);
        value.set("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(value.to_string(), "2024-01-01T00:00:00Z");
        value.set("2024-01-01T00:00:00.25Z").unwrap();
        assert_eq!(value.to_string(), "2024-01-01T00:00:00.250Z");
        drop(value);
        assert_eq!(slot.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn unknown_layout_specifier_is_rejected() {
        let mut slot = zero_timestamp();
        let err = Timestamp::new(&mut slot, "%Y-%Q").err().unwrap();
        assert!(matches!(err, FlagvarError::InvalidArgument(ref m) if m.contains("%Y-%Q")));
        assert!(Timestamp::unbound("%Y-%Q").is_err());
    }
}
