use super::*;

#[test]
fn parses_init_db_command() {
    let cli = Cli::try_parse_from(["adscout", "init-db"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::InitDb));
}

#[test]
fn parses_score_command() {
    let cli = Cli::try_parse_from(["adscout", "score"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Score));
}

#[test]
fn command_is_required() {
    assert!(Cli::try_parse_from(["adscout"]).is_err());
}

#[test]
fn fetch_splits_countries_and_defaults_to_active() {
    let cli = Cli::try_parse_from(["adscout", "fetch", "--countries", "BE,NL,DE"]).unwrap();
    match cli.command {
        Commands::Fetch {
            countries,
            terms,
            since,
            until,
            status,
        } => {
            assert_eq!(countries, vec!["BE", "NL", "DE"]);
            assert!(terms.is_none());
            assert!(since.is_none());
            assert!(until.is_none());
            assert_eq!(status, ActiveStatus::Active);
        }
        other => panic!("expected fetch, got {other:?}"),
    }
}

#[test]
fn fetch_accepts_terms_dates_and_status() {
    let cli = Cli::try_parse_from([
        "adscout",
        "fetch",
        "--countries",
        "BE",
        "--terms",
        "dumbbell",
        "--since",
        "2024-01-01",
        "--until",
        "2024-03-31",
        "--status",
        "all",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Commands::Fetch {
            terms: Some(ref t),
            since: Some(_),
            until: Some(_),
            status: ActiveStatus::All,
            ..
        } if t == "dumbbell"
    ));
}

#[test]
fn fetch_requires_countries() {
    assert!(Cli::try_parse_from(["adscout", "fetch"]).is_err());
}

#[test]
fn fetch_rejects_unknown_status() {
    assert!(
        Cli::try_parse_from(["adscout", "fetch", "--countries", "BE", "--status", "PAUSED"])
            .is_err()
    );
}

#[test]
fn fetch_rejects_malformed_date() {
    assert!(
        Cli::try_parse_from(["adscout", "fetch", "--countries", "BE", "--since", "01/02/2024"])
            .is_err()
    );
}

#[test]
fn export_defaults_to_out_ads_csv() {
    let cli = Cli::try_parse_from(["adscout", "export"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Export { ref out } if out == &PathBuf::from("out/ads.csv")
    ));
}

#[test]
fn export_accepts_custom_path() {
    let cli = Cli::try_parse_from(["adscout", "export", "--out", "/tmp/report.csv"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Export { ref out } if out == &PathBuf::from("/tmp/report.csv")
    ));
}
