use flagsenv::{FlagsEnv, Registrar, Slot, TimeDelta, command_line};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), flagsenv::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let port = Slot::new(0isize);
    let ip = Slot::default();
    let debug = Slot::default();
    let timeout = Slot::new(TimeDelta::zero());
    let pool_size = Slot::default();
    let max_body = Slot::default();
    let ratio = Slot::default();
    let offset = Slot::default();
    let describe = Slot::default();

    let fe = FlagsEnv::new(None);
    fe.env("PORT").int_var(&port, "port", 8080, "Server port number");
    fe.env("IP").string_var(&ip, "ip", "localhost", "Address to listen on");
    fe.env("DEBUG").bool_var(&debug, "debug", false, "Verbose responses");
    fe.env("TIMEOUT")
        .duration_var(&timeout, "timeout", TimeDelta::seconds(30), "Request timeout");
    fe.env("POOL_SIZE")
        .uint_var(&pool_size, "pool-size", 10, "Connection pool size");
    fe.env("MAX_BODY")
        .uint64_var(&max_body, "max-body", 1 << 20, "Largest accepted body in bytes");
    fe.env("SAMPLE_RATIO")
        .float64_var(&ratio, "sample-ratio", 0.1, "Share of requests traced");
    fe.env("CLOCK_OFFSET")
        .int64_var(&offset, "clock-offset", 0, "Clock skew in nanoseconds");
    command_line().bool_var(&describe, "describe", false, "Print the flags as TOML and exit");

    let rest = flagsenv::parse();
    tracing::debug!(args = ?rest, "parsed command line");

    if describe.get() {
        print!("{}", command_line().to_toml()?);
        return Ok(());
    }

    println!("listening on {}:{}", ip.get(), port.get());
    println!("debug: {}", debug.get());
    println!("timeout: {}", flagsenv::format_duration(timeout.get()));
    println!("pool size: {}", pool_size.get());
    println!("max body: {}", max_body.get());
    println!("sample ratio: {}", ratio.get());
    println!("clock offset: {}", offset.get());
    Ok(())
}
