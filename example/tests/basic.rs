use flagsenv::{FlagSet, FlagsEnv, Slot, TimeDelta};
use serial_test::serial;

fn server_flags(set: &FlagSet) -> (Slot<isize>, Slot<String>, Slot<TimeDelta>) {
    let port = Slot::new(0);
    let ip = Slot::default();
    let timeout = Slot::new(TimeDelta::zero());
    let fe = FlagsEnv::new(Some(set));
    fe.env("PORT").int_var(&port, "port", 80, "Server port number");
    fe.env("IP").string_var(&ip, "ip", "localhost", "connection URL");
    fe.env("TIMEOUT")
        .duration_var(&timeout, "timeout", TimeDelta::seconds(30), "Request timeout");
    (port, ip, timeout)
}

#[test]
#[serial]
fn test_defaults_without_env() {
    let set = FlagSet::new("example");
    let (port, ip, timeout) = server_flags(&set);
    set.try_parse_from(["example"]).unwrap();
    assert_eq!(port.get(), 80);
    assert_eq!(ip.get(), "localhost".to_string());
    assert_eq!(timeout.get(), TimeDelta::seconds(30));
}

#[test]
#[serial]
fn test_port_from_env() {
    unsafe {
        std::env::set_var("PORT", "8080");
    }
    let set = FlagSet::new("example");
    let (port, _, _) = server_flags(&set);
    set.try_parse_from(["example"]).unwrap();
    assert_eq!(port.get(), 8080);
    unsafe {
        std::env::remove_var("PORT");
    }
}

#[test]
#[serial]
fn test_unparseable_port_falls_back() {
    unsafe {
        std::env::set_var("PORT", "eighty");
    }
    let set = FlagSet::new("example");
    let (port, _, _) = server_flags(&set);
    set.try_parse_from(["example"]).unwrap();
    assert_eq!(port.get(), 80);
    unsafe {
        std::env::remove_var("PORT");
    }
}

#[test]
#[serial]
fn test_command_line_beats_env() {
    unsafe {
        std::env::set_var("PORT", "8080");
        std::env::set_var("IP", "127.0.0.1");
        std::env::set_var("TIMEOUT", "2h");
    }
    let set = FlagSet::new("example");
    let (port, ip, timeout) = server_flags(&set);
    assert_eq!(timeout.get(), TimeDelta::seconds(7200));

    let rest = set
        .try_parse_from(["example", "--port=9090", "serve"])
        .unwrap();
    assert_eq!(rest, ["serve"]);
    assert_eq!(port.get(), 9090);
    assert_eq!(ip.get(), "127.0.0.1".to_string());
    assert_eq!(timeout.get(), TimeDelta::seconds(7200));
    unsafe {
        std::env::remove_var("PORT");
        std::env::remove_var("IP");
        std::env::remove_var("TIMEOUT");
    }
}

#[test]
#[serial]
fn test_empty_env_is_unset() {
    unsafe {
        std::env::set_var("IP", "");
    }
    let set = FlagSet::new("example");
    let (_, ip, _) = server_flags(&set);
    assert_eq!(ip.get(), "localhost".to_string());
    unsafe {
        std::env::remove_var("IP");
    }
}

#[test]
#[serial]
fn test_help_shows_env_defaults() {
    unsafe {
        std::env::set_var("PORT", "5432");
    }
    let set = FlagSet::new("example");
    server_flags(&set);
    let help = set.command().render_help().to_string();
    assert!(help.contains("Server port number [default: 5432]"));
    assert!(help.contains("[default: 30s]"));
    unsafe {
        std::env::remove_var("PORT");
    }
}

#[test]
#[serial]
fn test_describe_as_toml() {
    unsafe {
        std::env::set_var("TIMEOUT", "90s");
    }
    let set = FlagSet::new("example");
    server_flags(&set);
    let described = set.to_toml().unwrap();
    let table: toml::Table = toml::from_str(&described).unwrap();
    let timeout = table.get("timeout").and_then(|v| v.as_table()).unwrap();
    assert_eq!(timeout.get("default").and_then(|v| v.as_str()), Some("1m30s"));
    assert_eq!(timeout.get("type").and_then(|v| v.as_str()), Some("duration"));
    assert_eq!(table.len(), 3);
    unsafe {
        std::env::remove_var("TIMEOUT");
    }
}
