// Licensed under the MIT license
// (see LICENSE or <http://opensource.org/licenses/MIT>) All files in the project carrying such
//! > flagsenv lets an environment variable override the default of a command-line flag before the flag is registered. The command line still has the last word; the environment only decides what "not given" means.
//!
//! # How it works
//!
//! 1- Bind a [`FlagsEnv`] to a flag set: an explicit [`FlagSet`], or `None` for the process-wide [`command_line`] set.
//!
//! 2- For every flag, ask for the environment variable that may override its default, then register the flag exactly as you would on the flag set itself.
//!
//! ```
//! use flagsenv::{FlagSet, FlagsEnv, Slot};
//!
//! let set = FlagSet::new("server");
//! let fe = FlagsEnv::new(Some(&set));
//!
//! let port = Slot::new(0isize);
//! fe.env("PORT").int_var(&port, "port", 80, "listen port");
//! ```
//!
//! 3- Parse. With `PORT=8080` in the environment and no `--port` on the command line, `port` holds 8080. With `PORT=eighty` it holds 80: a value that does not parse as the flag's type is ignored, silently.
//!
//! ```
//! # use flagsenv::{FlagSet, FlagsEnv, Slot};
//! # let set = FlagSet::new("server");
//! # let port = Slot::new(0isize);
//! # FlagsEnv::new(Some(&set)).env("FLAGSENV_DOC_PORT").int_var(&port, "port", 80, "listen port");
//! let rest = set.try_parse_from(["server", "--port", "9090"]).unwrap();
//! assert_eq!(port.get(), 9090);
//! assert!(rest.is_empty());
//! ```
//!
//! The help message shows the resolved default:
//!
//! ```text
//!
//! Usage: server [OPTIONS] [ARGS]...
//!
//! Options:
//!       --port <port>  listen port [default: 8080]
//!   -h, --help         Print help
//! ```
mod env;
mod error;
mod registrar;
mod registry;
mod slot;

pub use chrono::TimeDelta;
pub use env::Env;
pub use error::Error;
pub use flagsenv_core::{
    ParseError, atoi, format_duration, parse_bool, parse_duration, parse_float, parse_int,
    parse_uint,
};
pub use registrar::{FlagsEnv, Registrar};
pub use registry::{FlagInfo, FlagKind, FlagSet, FlagValue, command_line};
pub use slot::Slot;

/// Parses the process arguments into the [`command_line`] flag set.
pub fn parse() -> Vec<String> {
    command_line().parse()
}
