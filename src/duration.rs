//! Text form of durations: a signed sequence of decimal numbers, each with an
//! optional fraction and a unit suffix, such as `1h2m3s`, `-1.5h` or `300ms`.
//!
//! Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. Values are
//! carried as nanoseconds in an `i128` so any `chrono::TimeDelta` or
//! `std::time::Duration` fits.

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parse a duration string into nanoseconds.
pub fn parse_nanos(text: &str) -> Result<i128, String> {
    let (negative, mut rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err("empty duration".into());
    }

    let mut total: i128 = 0;
    while !rest.is_empty() {
        let (whole, after) = split_digits(rest);
        let (fraction, after) = match after.strip_prefix('.') {
            Some(after) => split_digits(after),
            None => ("", after),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err("expected a number".into());
        }

        let unit_len = after
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_len);
        let scale = unit_scale(unit)?;

        let mut value = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i128>()
                .ok()
                .and_then(|w| w.checked_mul(scale))
                .ok_or("duration out of range")?
        };
        if !fraction.is_empty() {
            // Digits past 24 cannot change the result at nanosecond precision.
            let digits = &fraction[..fraction.len().min(24)];
            let numerator: i128 = digits.parse().map_err(|_| "invalid fraction")?;
            let part = numerator
                .checked_mul(scale)
                .map(|n| n / 10i128.pow(digits.len() as u32))
                .ok_or("duration out of range")?;
            value = value.checked_add(part).ok_or("duration out of range")?;
        }
        total = total.checked_add(value).ok_or("duration out of range")?;
        rest = after;
    }

    Ok(if negative { -total } else { total })
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn unit_scale(unit: &str) -> Result<i128, String> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => NANOS_PER_MICRO,
        "ms" => NANOS_PER_MILLI,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3600 * NANOS_PER_SEC,
        "" => return Err("missing unit".into()),
        other => return Err(format!("unknown unit \"{other}\"")),
    };
    Ok(nanos as i128)
}

/// Format nanoseconds the way [`parse_nanos`] reads them.
///
/// Durations of a second or more use hours, minutes and fractional seconds
/// (`1h0m0.5s`); shorter ones use the largest sub-second unit that keeps the
/// integer part non-zero (`1.5ms`). Zero is `0s`.
pub fn format_nanos(nanos: i128) -> String {
    if nanos == 0 {
        return "0s".into();
    }
    let abs = nanos.unsigned_abs();
    let mut out = String::new();
    if nanos < 0 {
        out.push('-');
    }

    if abs < NANOS_PER_SEC {
        let (scale, unit) = if abs < NANOS_PER_MICRO {
            (1, "ns")
        } else if abs < NANOS_PER_MILLI {
            (NANOS_PER_MICRO, "µs")
        } else {
            (NANOS_PER_MILLI, "ms")
        };
        out.push_str(&decimal(abs, scale));
        out.push_str(unit);
        return out;
    }

    let secs = abs / NANOS_PER_SEC;
    let hours = secs / 3600;
    let minutes = secs / 60 % 60;
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    let rem = abs % (60 * NANOS_PER_SEC);
    out.push_str(&decimal(rem, NANOS_PER_SEC));
    out.push('s');
    out
}

fn decimal(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let fraction = value % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let width = scale.ilog10() as usize;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
