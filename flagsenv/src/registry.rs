use std::{
    collections::BTreeMap,
    ffi::OsString,
    fmt,
    path::Path,
    sync::{LazyLock, Mutex, MutexGuard, PoisonError},
};

use chrono::TimeDelta;
use clap::{Arg, ArgMatches, Command, error::ErrorKind, parser::ValueSource};
use flagsenv_core::{
    ParseError, format_duration, parse_bool, parse_duration, parse_float, parse_int, parse_uint,
};

use crate::{Error, Registrar, Slot};

const REST_ID: &str = "flagsenv::args";

static COMMAND_LINE: LazyLock<FlagSet> = LazyLock::new(|| FlagSet::new(program_name()));

/// The process-wide flag set, named after the running program.
pub fn command_line() -> &'static FlagSet {
    &COMMAND_LINE
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "command-line".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum FlagKind {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "duration")]
    Duration,
    #[serde(rename = "f64")]
    Float64,
    #[serde(rename = "i64")]
    Int64,
    #[serde(rename = "isize")]
    Int,
    #[serde(rename = "String")]
    String,
    #[serde(rename = "u64")]
    Uint64,
    #[serde(rename = "usize")]
    Uint,
}

impl FlagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagKind::Bool => "bool",
            FlagKind::Duration => "duration",
            FlagKind::Float64 => "f64",
            FlagKind::Int64 => "i64",
            FlagKind::Int => "isize",
            FlagKind::String => "String",
            FlagKind::Uint64 => "u64",
            FlagKind::Uint => "usize",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type a [`FlagSet`] can hold.
///
/// `parse_arg` is how a value given on the command line is read, `render`
/// is how the default is shown in help and descriptions. The two agree:
/// every rendered value parses back.
pub trait FlagValue: Clone + Send + Sync + 'static {
    const KIND: FlagKind;
    fn parse_arg(s: &str) -> Result<Self, ParseError>;
    fn render(&self) -> String;
}

impl FlagValue for bool {
    const KIND: FlagKind = FlagKind::Bool;
    fn parse_arg(s: &str) -> Result<Self, ParseError> {
        parse_bool(s)
    }
    fn render(&self) -> String {
        self.to_string()
    }
}

impl FlagValue for TimeDelta {
    const KIND: FlagKind = FlagKind::Duration;
    fn parse_arg(s: &str) -> Result<Self, ParseError> {
        parse_duration(s)
    }
    fn render(&self) -> String {
        format_duration(*self)
    }
}

impl FlagValue for f64 {
    const KIND: FlagKind = FlagKind::Float64;
    fn parse_arg(s: &str) -> Result<Self, ParseError> {
        parse_float(s)
    }
    fn render(&self) -> String {
        self.to_string()
    }
}

impl FlagValue for i64 {
    const KIND: FlagKind = FlagKind::Int64;
    fn parse_arg(s: &str) -> Result<Self, ParseError> {
        parse_int(s, 0, 64)
    }
    fn render(&self) -> String {
        self.to_string()
    }
}

impl FlagValue for isize {
    const KIND: FlagKind = FlagKind::Int;
    fn parse_arg(s: &str) -> Result<Self, ParseError> {
        // width 0 is the platform width, so the cast is lossless
        parse_int(s, 0, 0).map(|n| n as isize)
    }
    fn render(&self) -> String {
        self.to_string()
    }
}

impl FlagValue for String {
    const KIND: FlagKind = FlagKind::String;
    fn parse_arg(s: &str) -> Result<Self, ParseError> {
        Ok(s.to_string())
    }
    fn render(&self) -> String {
        self.clone()
    }
}

impl FlagValue for u64 {
    const KIND: FlagKind = FlagKind::Uint64;
    fn parse_arg(s: &str) -> Result<Self, ParseError> {
        parse_uint(s, 0, 64)
    }
    fn render(&self) -> String {
        self.to_string()
    }
}

impl FlagValue for usize {
    const KIND: FlagKind = FlagKind::Uint;
    fn parse_arg(s: &str) -> Result<Self, ParseError> {
        parse_uint(s, 0, 0).map(|n| n as usize)
    }
    fn render(&self) -> String {
        self.to_string()
    }
}

/// What is known about one registered flag.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FlagInfo {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlagKind,
    pub default: String,
    #[serde(rename = "doc", skip_serializing_if = "String::is_empty")]
    pub usage: String,
}

trait Entry: Send {
    fn arg(&self, name: &str) -> Arg;
    fn store(&self, matches: &ArgMatches, name: &str);
}

struct Typed<T>(Slot<T>);

impl<T: FlagValue> Entry for Typed<T> {
    fn arg(&self, name: &str) -> Arg {
        let arg = Arg::new(name.to_string())
            .long(name.to_string())
            .value_parser(T::parse_arg);
        if T::KIND == FlagKind::Bool {
            arg.num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
        } else {
            // the next token is the value, even when it starts with '-'
            arg.allow_hyphen_values(true)
        }
    }

    fn store(&self, matches: &ArgMatches, name: &str) {
        if matches.value_source(name) != Some(ValueSource::CommandLine) {
            return;
        }
        if let Some(value) = matches.get_one::<T>(name) {
            self.0.set(value.clone());
        }
    }
}

struct Flag {
    kind: FlagKind,
    default: String,
    usage: String,
    entry: Box<dyn Entry>,
}

impl Flag {
    fn info(&self, name: &str) -> FlagInfo {
        FlagInfo {
            name: name.to_string(),
            kind: self.kind,
            default: self.default.clone(),
            usage: self.usage.clone(),
        }
    }
}

#[derive(Default)]
struct State {
    flags: BTreeMap<String, Flag>,
    redefined: Vec<String>,
}

/// A named set of flags, parsed from the command line with clap.
///
/// Flags are registered through the [`Registrar`] methods, usually via a
/// [`FlagsEnv`](crate::FlagsEnv) so their defaults can come from the
/// environment.
pub struct FlagSet {
    name: String,
    state: Mutex<State>,
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("flags", &self.flags())
            .finish()
    }
}

impl FlagSet {
    pub fn new(name: impl Into<String>) -> Self {
        FlagSet {
            name: name.into(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn define<T: FlagValue>(&self, slot: &Slot<T>, name: &str, value: T, usage: &str) {
        let default = value.render();
        slot.set(value);

        let mut state = self.lock();
        if state.flags.contains_key(name) {
            tracing::warn!(set = %self.name, flag = name, "flag redefined");
            state.redefined.push(name.to_string());
            return;
        }
        tracing::debug!(set = %self.name, flag = name, kind = %T::KIND, default = %default, "registered flag");
        state.flags.insert(
            name.to_string(),
            Flag {
                kind: T::KIND,
                default,
                usage: usage.to_string(),
                entry: Box::new(Typed(slot.clone())),
            },
        );
    }

    pub fn lookup(&self, name: &str) -> Option<FlagInfo> {
        self.lock().flags.get(name).map(|f| f.info(name))
    }

    /// All registered flags, sorted by name.
    pub fn flags(&self) -> Vec<FlagInfo> {
        self.lock()
            .flags
            .iter()
            .map(|(name, f)| f.info(name))
            .collect()
    }

    /// The clap command these flags parse with; useful for rendering help.
    pub fn command(&self) -> Command {
        build_command(&self.name, &self.lock())
    }

    /// Parses `itr` (program name first), stores every flag given on the
    /// command line into its slot and returns the remaining positional
    /// arguments.
    pub fn try_parse_from<I, T>(&self, itr: I) -> Result<Vec<String>, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let state = self.lock();
        if let Some(name) = state.redefined.first() {
            return Err(Error::Redefined(name.clone()));
        }
        let matches = build_command(&self.name, &state).try_get_matches_from(itr)?;
        for (name, flag) in &state.flags {
            flag.entry.store(&matches, name);
        }
        Ok(matches
            .get_many::<String>(REST_ID)
            .map(|rest| rest.cloned().collect())
            .unwrap_or_default())
    }

    /// Parses the process arguments, exiting with a usage message on error.
    pub fn parse(&self) -> Vec<String> {
        match self.try_parse_from(std::env::args_os()) {
            Ok(rest) => rest,
            Err(Error::Cli(e)) => e.exit(),
            Err(e) => clap::Error::raw(ErrorKind::ArgumentConflict, format!("{e}\n")).exit(),
        }
    }

    /// Describes the registered flags as TOML tables keyed by flag name,
    /// e.g. `port = { type = "isize", default = "8080", doc = "listen port" }`.
    pub fn to_toml(&self) -> Result<String, Error> {
        let table: BTreeMap<String, FlagInfo> = self
            .flags()
            .into_iter()
            .map(|info| (info.name.clone(), info))
            .collect();
        Ok(toml::to_string(&table)?)
    }
}

fn build_command(name: &str, state: &State) -> Command {
    let args = state.flags.iter().map(|(flag_name, flag)| {
        let arg = flag.entry.arg(flag_name).help(flag.usage.clone());
        if flag.default.is_empty() {
            arg
        } else {
            arg.default_value(flag.default.clone())
        }
    });
    Command::new(name.to_string())
        .args_override_self(true)
        // a user flag named `help` replaces clap's own
        .disable_help_flag(state.flags.contains_key("help"))
        .args(args)
        .arg(
        Arg::new(REST_ID)
            .value_name("ARGS")
            .num_args(1..)
            .trailing_var_arg(true),
    )
}

impl Registrar for FlagSet {
    fn bool_var(&self, slot: &Slot<bool>, name: &str, value: bool, usage: &str) {
        self.define(slot, name, value, usage);
    }

    fn duration_var(&self, slot: &Slot<TimeDelta>, name: &str, value: TimeDelta, usage: &str) {
        self.define(slot, name, value, usage);
    }

    fn float64_var(&self, slot: &Slot<f64>, name: &str, value: f64, usage: &str) {
        self.define(slot, name, value, usage);
    }

    fn int64_var(&self, slot: &Slot<i64>, name: &str, value: i64, usage: &str) {
        self.define(slot, name, value, usage);
    }

    fn int_var(&self, slot: &Slot<isize>, name: &str, value: isize, usage: &str) {
        self.define(slot, name, value, usage);
    }

    fn string_var(&self, slot: &Slot<String>, name: &str, value: &str, usage: &str) {
        self.define(slot, name, value.to_string(), usage);
    }

    fn uint64_var(&self, slot: &Slot<u64>, name: &str, value: u64, usage: &str) {
        self.define(slot, name, value, usage);
    }

    fn uint_var(&self, slot: &Slot<usize>, name: &str, value: usize, usage: &str) {
        self.define(slot, name, value, usage);
    }
}
