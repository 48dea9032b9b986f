use chrono::TimeDelta;

use crate::ParseError;

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Magnitude of `i64::MIN` in nanoseconds, the largest duration we can hold.
const LIMIT: u64 = 1 << 63;

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        // micro sign U+00B5 and greek mu U+03BC
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Parses a duration such as `300ms`, `-1.5h` or `2h45m`.
///
/// The text is an optional sign followed by one or more decimal numbers,
/// each with an optional fraction and a mandatory unit suffix. A lone `0` is
/// accepted without a unit. The result has nanosecond precision and must fit
/// in an `i64` count of nanoseconds.
pub fn parse_duration(s: &str) -> Result<TimeDelta, ParseError> {
    let orig = s;
    let invalid = || ParseError::InvalidDuration(orig.to_string());

    let (neg, mut s) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };
    if s == "0" {
        return Ok(TimeDelta::zero());
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !s.is_empty() {
        if !s.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (mut v, rest) = leading_int(s).ok_or_else(invalid)?;
        let pre = rest.len() != s.len();
        s = rest;

        let mut post = false;
        let mut frac: u64 = 0;
        let mut scale: f64 = 1.0;
        if let Some(rest) = s.strip_prefix('.') {
            let (f, sc, rest_after) = leading_fraction(rest);
            post = rest_after.len() != rest.len();
            frac = f;
            scale = sc;
            s = rest_after;
        }
        if !pre && !post {
            return Err(invalid());
        }

        let unit_end = s
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(s.len());
        if unit_end == 0 {
            return Err(ParseError::MissingUnit(orig.to_string()));
        }
        let unit = &s[..unit_end];
        s = &s[unit_end..];
        let nanos = unit_nanos(unit).ok_or_else(|| ParseError::UnknownUnit {
            unit: unit.to_string(),
            input: orig.to_string(),
        })?;

        if v > LIMIT / nanos {
            return Err(invalid());
        }
        v *= nanos;
        if frac > 0 {
            v += (frac as f64 * (nanos as f64 / scale)) as u64;
            if v > LIMIT {
                return Err(invalid());
            }
        }
        total = total.checked_add(v).filter(|t| *t <= LIMIT).ok_or_else(invalid)?;
    }

    let nanos = if neg {
        // LIMIT itself is i64::MIN
        (total as i64).wrapping_neg()
    } else if total > LIMIT - 1 {
        return Err(invalid());
    } else {
        total as i64
    };
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Consumes leading ASCII digits; `None` on overflow.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    for b in s[..end].bytes() {
        x = x
            .checked_mul(10)
            .and_then(|x| x.checked_add(u64::from(b - b'0')))
            .filter(|x| *x <= LIMIT)?;
    }
    Some((x, &s[end..]))
}

/// Consumes fraction digits. Digits past what fits in an `i64` are dropped
/// from the value but still consumed.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    let mut scale: f64 = 1.0;
    let mut overflow = false;
    for b in s[..end].bytes() {
        if overflow {
            continue;
        }
        if x > (LIMIT - 1) / 10 {
            overflow = true;
            continue;
        }
        let y = x * 10 + u64::from(b - b'0');
        if y > LIMIT {
            overflow = true;
            continue;
        }
        x = y;
        scale *= 10.0;
    }
    (x, scale, &s[end..])
}

/// Renders a duration the way [`parse_duration`] reads it back: `1h30m0s`,
/// `1.5s`, `250ms`, `1µs`, `0s`.
pub fn format_duration(d: TimeDelta) -> String {
    let nanos = d.num_nanoseconds().unwrap_or(if d < TimeDelta::zero() {
        i64::MIN
    } else {
        i64::MAX
    });
    let sign = if nanos < 0 { "-" } else { "" };
    let mut u = nanos.unsigned_abs();

    if u < SECOND {
        let text = match u {
            0 => return "0s".to_string(),
            u if u < MICROSECOND => format!("{u}ns"),
            u if u < MILLISECOND => format!("{}µs", fmt_frac(u, 3)),
            u => format!("{}ms", fmt_frac(u, 6)),
        };
        return format!("{sign}{text}");
    }

    let mut text = format!("{}s", fmt_frac(u % MINUTE, 9));
    u /= MINUTE;
    if u > 0 {
        text = format!("{}m{text}", u % 60);
        u /= 60;
        if u > 0 {
            text = format!("{u}h{text}");
        }
    }
    format!("{sign}{text}")
}

/// `v / 10^prec` in decimal, without trailing zeros in the fraction.
fn fmt_frac(v: u64, prec: u32) -> String {
    let div = 10u64.pow(prec);
    let (int, frac) = (v / div, v % div);
    if frac == 0 {
        return int.to_string();
    }
    let digits = format!("{frac:0width$}", width = prec as usize);
    format!("{int}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("2h"), Ok(TimeDelta::seconds(7200)));
        assert_eq!(parse_duration("1h30m"), Ok(TimeDelta::minutes(90)));
        assert_eq!(parse_duration("300ms"), Ok(TimeDelta::milliseconds(300)));
        assert_eq!(parse_duration("10us"), Ok(TimeDelta::microseconds(10)));
        assert_eq!(parse_duration("10µs"), Ok(TimeDelta::microseconds(10)));
        assert_eq!(parse_duration("10μs"), Ok(TimeDelta::microseconds(10)));
        assert_eq!(parse_duration("7ns"), Ok(TimeDelta::nanoseconds(7)));
        assert_eq!(parse_duration("0"), Ok(TimeDelta::zero()));
        assert_eq!(parse_duration("-0"), Ok(TimeDelta::zero()));
        assert_eq!(parse_duration("+5s"), Ok(TimeDelta::seconds(5)));
    }

    #[test]
    fn test_parse_duration_fractions_and_sign() {
        assert_eq!(parse_duration("1.5h"), Ok(TimeDelta::minutes(90)));
        assert_eq!(parse_duration("-1.5h"), Ok(TimeDelta::minutes(-90)));
        assert_eq!(parse_duration(".5s"), Ok(TimeDelta::milliseconds(500)));
        assert_eq!(parse_duration("5.s"), Ok(TimeDelta::seconds(5)));
        assert_eq!(parse_duration("1h1.5m"), Ok(TimeDelta::seconds(3690)));
        assert_eq!(
            parse_duration("-9223372036854775808ns"),
            Ok(TimeDelta::nanoseconds(i64::MIN))
        );
        assert_eq!(
            parse_duration("9223372036854775807ns"),
            Ok(TimeDelta::nanoseconds(i64::MAX))
        );
    }

    #[test]
    fn test_parse_duration_rejections() {
        for bad in ["", "-", "s", ".s", "1", "1.5", "3x", "1hh", "h1", " 1s", "1 s"] {
            assert!(parse_duration(bad).is_err(), "{bad}");
        }
        assert_eq!(
            parse_duration("5"),
            Err(ParseError::MissingUnit("5".to_string()))
        );
        assert_eq!(
            parse_duration("5d"),
            Err(ParseError::UnknownUnit {
                unit: "d".to_string(),
                input: "5d".to_string()
            })
        );
        assert!(parse_duration("9223372036854775808ns").is_err());
        assert!(parse_duration("3000000h").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::zero()), "0s");
        assert_eq!(format_duration(TimeDelta::nanoseconds(7)), "7ns");
        assert_eq!(format_duration(TimeDelta::microseconds(1)), "1µs");
        assert_eq!(format_duration(TimeDelta::nanoseconds(1_500)), "1.5µs");
        assert_eq!(format_duration(TimeDelta::milliseconds(250)), "250ms");
        assert_eq!(format_duration(TimeDelta::milliseconds(1500)), "1.5s");
        assert_eq!(format_duration(TimeDelta::seconds(90)), "1m30s");
        assert_eq!(format_duration(TimeDelta::hours(1)), "1h0m0s");
        assert_eq!(format_duration(TimeDelta::minutes(-90)), "-1h30m0s");
        assert_eq!(format_duration(TimeDelta::seconds(7200)), "2h0m0s");
    }

    #[test]
    fn test_formatted_durations_parse_back() {
        for d in [
            TimeDelta::milliseconds(1500),
            TimeDelta::minutes(-90),
            TimeDelta::nanoseconds(123_456_789),
        ] {
            assert_eq!(parse_duration(&format_duration(d)), Ok(d));
        }
    }
}
