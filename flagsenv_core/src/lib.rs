//! Textual parsing rules for flag values.
//!
//! These are the rules a flag value, or the environment variable standing in
//! for its default, is read with. They are deliberately strict: surrounding
//! whitespace, unknown boolean spellings and trailing garbage are errors.
mod duration;
mod error;
mod num;

pub use duration::{format_duration, parse_duration};
pub use error::ParseError;
pub use num::{atoi, parse_bool, parse_float, parse_int, parse_uint};
