use finboard_config::{
    manager::apply_overrides, Config, ConfigError, ConfigManager, Preferences, Theme,
    STORE_KEY_ENV, STORE_URL_ENV,
};
use tempfile::tempdir;
use uuid::Uuid;

#[test]
fn default_config_has_expected_windows() {
    let cfg = Config::default();

    assert_eq!(cfg.trend_months, 6);
    assert_eq!(cfg.upcoming_days, 7);
    assert!(!cfg.currency.is_empty());
    assert!(cfg.owner_id.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.owner_id = Some(Uuid::new_v4());
    cfg.store.endpoint_url = Some("https://db.example.com".into());
    cfg.preferences.theme = Theme::Dark;

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(manager.config_path().ends_with("config/config.json"));
    assert!(!manager.config_path().with_extension("json.tmp").exists());
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("absent.json"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").expect("write");
    let err = ConfigManager::new(path).load().unwrap_err();
    assert!(matches!(err, ConfigError::Serde(_)));
}

#[test]
fn environment_overrides_store_settings() {
    let mut cfg = Config::default();
    cfg.store.endpoint_url = Some("https://file.example.com".into());
    cfg.store.api_key = Some("file-key".into());

    apply_overrides(&mut cfg, |key| match key {
        k if k == STORE_URL_ENV => Some("https://env.example.com/".into()),
        k if k == STORE_KEY_ENV => Some("   ".into()),
        _ => None,
    });

    assert_eq!(cfg.store.endpoint().unwrap(), "https://env.example.com");
    assert_eq!(cfg.store.key().unwrap(), "file-key");
}

#[test]
fn validate_requires_owner() {
    let mut cfg = Config::default();
    assert!(matches!(cfg.validate(), Err(ConfigError::Missing("owner_id"))));
    cfg.owner_id = Some(Uuid::new_v4());
    assert!(cfg.validate().is_ok());
    cfg.trend_months = 0;
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { .. })));
}

#[test]
fn preferences_accept_partial_documents() {
    let prefs: Preferences =
        serde_json::from_str(r#"{ "displayName": "Ana", "theme": "neon" }"#).expect("parse");
    assert_eq!(prefs.display_name, "Ana");
    assert_eq!(prefs.theme, Theme::Light);
    assert_eq!(prefs.due_alert_days, 3);
    assert!(prefs.notifications.enabled);
}
