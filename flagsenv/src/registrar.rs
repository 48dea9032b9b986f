use chrono::TimeDelta;

use crate::{Env, FlagSet, Slot, command_line};

/// Something flags can be registered with, one method per supported type.
///
/// Each method records a flag called `name` with default `value` and help
/// text `usage`, storing into `slot`. Failures such as a duplicate name are
/// the implementor's business; callers get nothing back.
pub trait Registrar {
    fn bool_var(&self, slot: &Slot<bool>, name: &str, value: bool, usage: &str);
    fn duration_var(&self, slot: &Slot<TimeDelta>, name: &str, value: TimeDelta, usage: &str);
    fn float64_var(&self, slot: &Slot<f64>, name: &str, value: f64, usage: &str);
    fn int64_var(&self, slot: &Slot<i64>, name: &str, value: i64, usage: &str);
    fn int_var(&self, slot: &Slot<isize>, name: &str, value: isize, usage: &str);
    fn string_var(&self, slot: &Slot<String>, name: &str, value: &str, usage: &str);
    fn uint64_var(&self, slot: &Slot<u64>, name: &str, value: u64, usage: &str);
    fn uint_var(&self, slot: &Slot<usize>, name: &str, value: usize, usage: &str);
}

/// Entry point: hands out an [`Env`] per environment variable, all
/// registering into the same target.
#[derive(Clone, Copy)]
pub struct FlagsEnv<'a> {
    registrar: &'a dyn Registrar,
}

impl<'a> FlagsEnv<'a> {
    /// Binds to `flag_set`, or to the process-wide [`command_line`] set
    /// when `None`.
    pub fn new(flag_set: Option<&'a FlagSet>) -> Self {
        let registrar: &'a dyn Registrar = match flag_set {
            Some(set) => set,
            None => command_line(),
        };
        FlagsEnv { registrar }
    }

    pub fn with_registrar(registrar: &'a dyn Registrar) -> Self {
        FlagsEnv { registrar }
    }

    /// Reads `key` from the environment now. The returned [`Env`] keeps that
    /// value; later changes to the variable are not seen through it.
    pub fn env(&self, key: &str) -> Env<'a> {
        // a value that is not valid unicode counts as unset
        let val = std::env::var(key).unwrap_or_default();
        tracing::trace!(env = key, set = !val.is_empty(), "captured environment override");
        Env::new(self.registrar, val)
    }
}
