use chrono::{Duration, TimeZone, Utc};
use tracing_subscriber::filter::LevelFilter;
use tchmusic::{
    Error, cli,
    config::{Config, ConfigStore, DEFAULT_FEED_URL, DEFAULT_LOG_LEVEL, Overrides, parse_log_level},
    types::Token,
};

// Helper function to create a config with credentials only
fn create_test_config() -> Config {
    Config {
        client_id: "client-123".to_string(),
        secret_key: "secret-456".to_string(),
        ..Default::default()
    }
}

fn create_test_token() -> Token {
    Token {
        access_token: "BQC-access".to_string(),
        refresh_token: "AQD-refresh".to_string(),
        expiry: Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap(),
    }
}

#[tokio::test]
async fn test_open_creates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tchmusic.yaml");

    let store = ConfigStore::open(&path).await.unwrap();

    assert!(path.exists());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    assert_eq!(store.config(), &Config::default());
}

#[tokio::test]
async fn test_missing_client_id_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tchmusic.yaml");
    std::fs::write(&path, "secret_key: secret-456\n").unwrap();

    let store = ConfigStore::open(&path).await.unwrap();

    match store.config().validate() {
        Err(Error::MissingFields(fields)) => assert_eq!(fields, vec!["client_id"]),
        other => panic!("expected missing client_id, got {:?}", other),
    }
}

#[test]
fn test_validate_reports_all_missing_fields() {
    match Config::default().validate() {
        Err(Error::MissingFields(fields)) => assert_eq!(fields, vec!["client_id", "secret_key"]),
        other => panic!("expected missing fields, got {:?}", other),
    }

    assert!(create_test_config().validate().is_ok());
}

#[tokio::test]
async fn test_credentials_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tchmusic.yaml");
    let token = create_test_token();

    let mut store = ConfigStore::open(&path).await.unwrap();
    *store.config_mut() = create_test_config();
    store.save_token(&token).await.unwrap();

    let reloaded = ConfigStore::open(&path).await.unwrap();
    let config = reloaded.config();
    assert_eq!(config.client_id, "client-123");
    assert_eq!(config.secret_key, "secret-456");
    assert_eq!(config.access_token, "BQC-access");
    assert_eq!(config.refresh_token, "AQD-refresh");
    assert_eq!(config.access_token_expiry, Some(token.expiry));
    assert_eq!(config.token(), Some(token));
}

#[tokio::test]
async fn test_optional_keys_not_written_when_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tchmusic.yaml");

    let mut store = ConfigStore::open(&path).await.unwrap();
    *store.config_mut() = create_test_config();
    store.persist().await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("client_id: client-123"));
    assert!(!content.contains("feed_url"));
    assert!(!content.contains("login_timeout"));
}

#[test]
fn test_env_overrides_file_values() {
    let mut config = create_test_config();
    config
        .apply_env(vec![
            ("TCH_CLIENT_ID", "from-env"),
            ("TCH_ACCESS_TOKEN_EXPIRY", "2030-01-02T10:04:05+07:00"),
            ("TCH_LOGIN_TIMEOUT", "90"),
            ("OTHER_CLIENT_ID", "ignored"),
            ("TCH_SECRET_KEY", ""),
        ])
        .unwrap();

    assert_eq!(config.client_id, "from-env");
    // empty variables count as unset
    assert_eq!(config.secret_key, "secret-456");
    assert_eq!(
        config.access_token_expiry,
        Some(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap())
    );
    assert_eq!(config.login_timeout(), Some(std::time::Duration::from_secs(90)));
}

#[test]
fn test_env_rejects_bad_values() {
    let mut config = create_test_config();
    let err = config
        .apply_env(vec![("TCH_ACCESS_TOKEN_EXPIRY", "tomorrow")])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidValue {
            key: "access_token_expiry",
            ..
        }
    ));

    let err = config
        .apply_env(vec![("TCH_LOGIN_TIMEOUT", "soon")])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { key: "login_timeout", .. }));
}

#[test]
fn test_flags_override_env() {
    let mut config = Config::default();
    config
        .apply_env(vec![
            ("TCH_CLIENT_ID", "from-env"),
            ("TCH_SECRET_KEY", "secret-env"),
            ("TCH_LOG_LEVEL", "warn"),
        ])
        .unwrap();
    config.apply_overrides(&Overrides {
        client_id: Some("from-flag".to_string()),
        log_level: Some("debug".to_string()),
        ..Default::default()
    });

    assert_eq!(config.client_id, "from-flag");
    assert_eq!(config.secret_key, "secret-env");
    assert_eq!(config.log_level(), "debug");
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.log_level(), "error");
    assert_eq!(config.market(), "VN");
    assert_eq!(config.feed_url(), DEFAULT_FEED_URL);
    assert_eq!(config.login_timeout(), None);
}

#[test]
fn test_parse_log_level_ignores_case_and_whitespace() {
    assert_eq!(parse_log_level("warn").unwrap(), LevelFilter::WARN);
    assert_eq!(parse_log_level(" Info ").unwrap(), LevelFilter::INFO);
    assert_eq!(parse_log_level("TRACE").unwrap(), LevelFilter::TRACE);
    assert_eq!(parse_log_level(DEFAULT_LOG_LEVEL).unwrap(), LevelFilter::ERROR);
}

#[test]
fn test_parse_log_level_rejects_unknown_names() {
    for level in ["warning", "verbose", "tchmusic"] {
        let err = parse_log_level(level).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { key: "log_level", .. }));
    }
}

#[test]
fn test_unknown_log_level_falls_back_to_error() {
    let mut config = create_test_config();
    config.apply_env(vec![("TCH_LOG_LEVEL", "verbose")]).unwrap();
    assert_eq!(config.level_filter(), LevelFilter::ERROR);

    config.apply_overrides(&Overrides {
        log_level: Some("Debug ".to_string()),
        ..Default::default()
    });
    assert_eq!(config.level_filter(), LevelFilter::DEBUG);
}

#[test]
fn test_cached_token_reused_when_not_expired() {
    let now = Utc::now();
    let mut config = create_test_config();
    let token = Token {
        expiry: now + Duration::hours(1),
        ..create_test_token()
    };
    config.set_token(&token);

    assert_eq!(cli::cached_token(&config, now), Some(token));
}

#[test]
fn test_cached_token_rejected_when_expired_or_missing() {
    let now = Utc::now();
    let mut config = create_test_config();
    assert_eq!(cli::cached_token(&config, now), None);

    config.set_token(&Token {
        expiry: now - Duration::seconds(1),
        ..create_test_token()
    });
    assert_eq!(cli::cached_token(&config, now), None);

    // an access token without an expiry is treated as expired
    config.access_token_expiry = None;
    assert_eq!(cli::cached_token(&config, now), None);
}

#[tokio::test]
async fn test_ensure_token_skips_login_for_valid_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".tchmusic.yaml");
    let token = create_test_token();

    let mut store = ConfigStore::open(&path).await.unwrap();
    *store.config_mut() = create_test_config();
    store.config_mut().set_token(&token);

    let authenticator = std::sync::Arc::new(
        tchmusic::spotify::auth::Authenticator::new("client-123", "secret-456")
            .with_endpoints("http://127.0.0.1:9/authorize", "http://127.0.0.1:9/token"),
    );
    let reused = cli::ensure_token(&mut store, authenticator, false)
        .await
        .unwrap();

    assert_eq!(reused, token);
}
