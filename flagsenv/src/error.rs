/// Failures surfaced by a [`FlagSet`](crate::FlagSet).
///
/// Resolving a default from the environment never fails; these only come
/// out of parsing the command line or describing the registered flags.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("flag redefined: {0}")]
    Redefined(String),
    #[error(transparent)]
    Cli(#[from] clap::Error),
    #[error("failed to describe flags as TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}
