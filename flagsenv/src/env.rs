use chrono::TimeDelta;
use flagsenv_core::{atoi, parse_bool, parse_duration, parse_float, parse_int, parse_uint};

use crate::{Registrar, Slot};

/// One environment variable's value, ready to stand in for flag defaults.
///
/// Every method mirrors the [`Registrar`] method of the same name. When the
/// captured value is non-empty and parses as the flag's type, it replaces
/// `value` as the default; otherwise `value` is used unchanged. Parse errors
/// never reach the caller.
pub struct Env<'a> {
    registrar: &'a dyn Registrar,
    val: String,
}

impl<'a> Env<'a> {
    pub(crate) fn new(registrar: &'a dyn Registrar, val: String) -> Self {
        Env { registrar, val }
    }

    /// The raw value captured from the environment, empty when unset.
    pub fn value(&self) -> &str {
        &self.val
    }

    fn resolve<T, E>(&self, fallback: T, parse: impl FnOnce(&str) -> Result<T, E>) -> T {
        if self.val.is_empty() {
            return fallback;
        }
        parse(self.val.as_str()).unwrap_or(fallback)
    }

    /// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
    pub fn bool_var(&self, slot: &Slot<bool>, name: &str, value: bool, usage: &str) {
        let value = self.resolve(value, parse_bool);
        self.registrar.bool_var(slot, name, value, usage);
    }

    /// Accepts durations such as `90s` or `1h30m`.
    pub fn duration_var(&self, slot: &Slot<TimeDelta>, name: &str, value: TimeDelta, usage: &str) {
        let value = self.resolve(value, parse_duration);
        self.registrar.duration_var(slot, name, value, usage);
    }

    pub fn float64_var(&self, slot: &Slot<f64>, name: &str, value: f64, usage: &str) {
        let value = self.resolve(value, parse_float);
        self.registrar.float64_var(slot, name, value, usage);
    }

    /// Accepts `0x`, `0o`, `0b` and leading-`0` prefixes.
    pub fn int64_var(&self, slot: &Slot<i64>, name: &str, value: i64, usage: &str) {
        let value = self.resolve(value, |s| parse_int(s, 0, 64));
        self.registrar.int64_var(slot, name, value, usage);
    }

    /// Decimal only.
    pub fn int_var(&self, slot: &Slot<isize>, name: &str, value: isize, usage: &str) {
        let value = self.resolve(value, atoi);
        self.registrar.int_var(slot, name, value, usage);
    }

    /// An empty variable is the same as an unset one.
    pub fn string_var(&self, slot: &Slot<String>, name: &str, value: &str, usage: &str) {
        let value = if self.val.is_empty() { value } else { self.val.as_str() };
        self.registrar.string_var(slot, name, value, usage);
    }

    pub fn uint64_var(&self, slot: &Slot<u64>, name: &str, value: u64, usage: &str) {
        let value = self.resolve(value, |s| parse_uint(s, 0, 64));
        self.registrar.uint64_var(slot, name, value, usage);
    }

    /// Parsed at the platform width, so the accepted range follows `usize`.
    pub fn uint_var(&self, slot: &Slot<usize>, name: &str, value: usize, usage: &str) {
        let value = self.resolve(value, |s| parse_uint(s, 0, usize::BITS).map(|n| n as usize));
        self.registrar.uint_var(slot, name, value, usage);
    }
}
