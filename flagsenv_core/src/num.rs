use crate::ParseError;

/// Parses the boolean tokens a flag accepts.
///
/// Only `1 t T TRUE true True` and `0 f F FALSE false False` are recognised.
pub fn parse_bool(s: &str) -> Result<bool, ParseError> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseError::syntax("parse_bool", s)),
    }
}

/// Parses an unsigned integer in the given base that fits in `bit_size` bits.
///
/// With `base == 0` the base is taken from the prefix: `0b` binary, `0o` or a
/// bare leading `0` octal, `0x` hexadecimal, otherwise decimal. Only in that
/// mode may underscores separate digits. A `bit_size` of 0 means the platform
/// width. No sign is accepted.
pub fn parse_uint(s: &str, base: u32, bit_size: u32) -> Result<u64, ParseError> {
    const FUNC: &str = "parse_uint";
    if s.is_empty() {
        return Err(ParseError::syntax(FUNC, s));
    }
    let base0 = base == 0;
    let (base, digits) = match base {
        0 => detect_base(s),
        2..=36 => (base, s),
        _ => {
            return Err(ParseError::InvalidBase {
                func: FUNC,
                input: s.to_string(),
                base,
            });
        }
    };
    let bits = effective_bits(bit_size);
    let max_val = if bits == 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    };

    let mut n: u64 = 0;
    let mut underscores = false;
    for c in digits.chars() {
        if c == '_' && base0 {
            underscores = true;
            continue;
        }
        let d = c
            .to_digit(36)
            .filter(|d| *d < base)
            .ok_or_else(|| ParseError::syntax(FUNC, s))?;
        n = n
            .checked_mul(u64::from(base))
            .and_then(|n| n.checked_add(u64::from(d)))
            .filter(|n| *n <= max_val)
            .ok_or_else(|| ParseError::range(FUNC, s))?;
    }
    if underscores && !underscore_ok(s) {
        return Err(ParseError::syntax(FUNC, s));
    }
    Ok(n)
}

/// Parses a signed integer; prefixes and widths work as in [`parse_uint`],
/// with an optional leading `+` or `-`.
pub fn parse_int(s: &str, base: u32, bit_size: u32) -> Result<i64, ParseError> {
    const FUNC: &str = "parse_int";
    if s.is_empty() {
        return Err(ParseError::syntax(FUNC, s));
    }
    let (neg, body) = split_sign(s);
    let un = parse_uint(body, base, bit_size).map_err(|e| e.within(FUNC, s))?;

    let cutoff = 1u64 << (effective_bits(bit_size) - 1);
    if (!neg && un >= cutoff) || (neg && un > cutoff) {
        return Err(ParseError::range(FUNC, s));
    }
    let n = un as i64;
    Ok(if neg { n.wrapping_neg() } else { n })
}

/// Decimal-only parse into the platform integer.
pub fn atoi(s: &str) -> Result<isize, ParseError> {
    let n = parse_int(s, 10, 0).map_err(|e| e.within("atoi", s))?;
    isize::try_from(n).map_err(|_| ParseError::range("atoi", s))
}

/// Parses a 64-bit float.
///
/// Accepts decimal and scientific notation, `inf`, `infinity` and `nan` in
/// any case with an optional sign, and hexadecimal mantissas with a binary
/// exponent (`0x1.8p3`). Finite text whose value overflows is a range error
/// rather than an infinity.
pub fn parse_float(s: &str) -> Result<f64, ParseError> {
    const FUNC: &str = "parse_float";
    let (neg, body) = split_sign(s);
    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        if s.contains('_') && !underscore_ok(s) {
            return Err(ParseError::syntax(FUNC, s));
        }
        let v = parse_hex_float(hex).ok_or_else(|| ParseError::syntax(FUNC, s))?;
        if v.is_infinite() {
            return Err(ParseError::range(FUNC, s));
        }
        return Ok(if neg { -v } else { v });
    }

    let v: f64 = s.parse().map_err(|_| ParseError::syntax(FUNC, s))?;
    if v.is_infinite() && !is_inf_token(body) {
        return Err(ParseError::range(FUNC, s));
    }
    Ok(v)
}

fn effective_bits(bit_size: u32) -> u32 {
    match bit_size {
        0 => usize::BITS,
        b => b.min(64),
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

fn detect_base(s: &str) -> (u32, &str) {
    let b = s.as_bytes();
    if b[0] != b'0' {
        return (10, s);
    }
    if b.len() >= 3 {
        match b[1].to_ascii_lowercase() {
            b'b' => return (2, &s[2..]),
            b'o' => return (8, &s[2..]),
            b'x' => return (16, &s[2..]),
            _ => {}
        }
    }
    (8, &s[1..])
}

/// Underscores must sit between digits, or right after a base prefix.
fn underscore_ok(s: &str) -> bool {
    // '^' start, '0' digit or prefix, '_' underscore, '!' anything else
    let mut saw = '^';
    let (_, s) = split_sign(s);
    let b = s.as_bytes();
    let mut i = 0;
    let mut hex = false;
    if b.len() >= 2 && b[0] == b'0' && matches!(b[1].to_ascii_lowercase(), b'b' | b'o' | b'x') {
        i = 2;
        saw = '0';
        hex = b[1].to_ascii_lowercase() == b'x';
    }
    for &c in &b[i..] {
        if c.is_ascii_digit() || (hex && c.is_ascii_hexdigit()) {
            saw = '0';
            continue;
        }
        if c == b'_' {
            if saw != '0' {
                return false;
            }
            saw = '_';
            continue;
        }
        if saw == '_' {
            return false;
        }
        saw = '!';
    }
    saw != '_'
}

fn is_inf_token(s: &str) -> bool {
    s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("infinity")
}

/// `hex` is everything after the `0x`; the `p` exponent is mandatory.
fn parse_hex_float(hex: &str) -> Option<f64> {
    let (mantissa, exp) = hex.split_once(['p', 'P'])?;
    let exp: i32 = exp.parse().ok()?;

    let mut mant: u64 = 0;
    let mut shift: i32 = 0;
    let mut seen_dot = false;
    let mut digits = 0;
    for c in mantissa.chars() {
        match c {
            '.' if !seen_dot => seen_dot = true,
            '_' => {}
            _ => {
                let d = c.to_digit(16)?;
                digits += 1;
                if mant >> 60 == 0 {
                    mant = (mant << 4) | u64::from(d);
                    if seen_dot {
                        shift -= 4;
                    }
                } else if !seen_dot {
                    shift += 4;
                }
            }
        }
    }
    if digits == 0 {
        return None;
    }
    if mant == 0 {
        return Some(0.0);
    }
    let e = exp.saturating_add(shift);
    // split the scaling so subnormal results are not flushed to zero early
    let half = e / 2;
    Some(mant as f64 * 2f64.powi(half) * 2f64.powi(e - half))
}
