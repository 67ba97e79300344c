use chrono::TimeZone;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["birdday-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(cli.at.is_none());
}

#[test]
fn parses_resolve_with_signals() {
    let cli = Cli::try_parse_from([
        "birdday-cli",
        "resolve",
        "--ip",
        "8.8.8.8",
        "--timezone",
        "Asia/Tokyo",
        "--scheduled",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Resolve {
            ip: Some(_),
            timezone: Some(ref tz),
            scheduled: true,
        }) if tz == "Asia/Tokyo"
    ));
}

#[test]
fn resolve_rejects_invalid_ip() {
    assert!(Cli::try_parse_from(["birdday-cli", "resolve", "--ip", "not-an-ip"]).is_err());
}

#[test]
fn parses_refresh_with_card_override() {
    let cli = Cli::try_parse_from(["birdday-cli", "refresh", "--card-id", "card-9"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Refresh {
            card_id: Some(ref id),
            timezone: None,
            ip: None,
        }) if id == "card-9"
    ));
}

#[test]
fn parses_purge_days() {
    let cli = Cli::try_parse_from(["birdday-cli", "purge", "--days", "7"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Purge { days: Some(7) })));
}

#[test]
fn global_at_flag_parses_rfc3339() {
    let cli = Cli::try_parse_from([
        "birdday-cli",
        "resolve",
        "--at",
        "2025-06-01T23:30:00+09:00",
    ])
    .expect("expected valid cli args");
    assert_eq!(
        cli.at,
        Some(Utc.with_ymd_and_hms(2025, 6, 1, 14, 30, 0).unwrap())
    );
}

#[test]
fn at_flag_rejects_garbage() {
    assert!(Cli::try_parse_from(["birdday-cli", "purge", "--at", "yesterday"]).is_err());
}

#[test]
fn manual_clock_is_used_when_at_is_given() {
    let instant = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(build_clock(Some(instant)).now(), instant);
}
