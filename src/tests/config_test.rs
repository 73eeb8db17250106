use uuid::Uuid;

use crate::config::{AppConfig, DEFAULT_API_URL};
use crate::data::Theme;
use crate::error::{ErrorHandler, LevelError};

#[test]
fn test_default_config_is_valid_offline() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.quote.base_url, DEFAULT_API_URL);
    assert_eq!(config.quote.timeout_secs, None);
    assert_eq!(config.ui.theme, Theme::Dark);
    // no key yet, so quote commands refuse to run
    assert!(matches!(
        config.validate_for_quotes(),
        Err(LevelError::Configuration(_))
    ));
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = AppConfig::default();
    config.logging.level = "loud".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.quote.base_url = "ftp://example.com".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.quote.base_url = "not a url".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.quote.timeout_secs = Some(0);
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.quote.model = " ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_partial_toml_uses_defaults() {
    let config = AppConfig::from_toml(
        r#"
[ui]
theme = "light"
"#,
    )
    .unwrap();
    assert_eq!(config.ui.theme, Theme::Light);
    assert_eq!(config.quote.model, "sonar");
    assert_eq!(config.logging.level, "info");

    let config = AppConfig::from_toml("[quote]\napi_key = \"k\"\n").unwrap();
    assert_eq!(config.quote.api_key, "k");
    assert_eq!(config.quote.base_url, DEFAULT_API_URL);
    assert_eq!(config.quote.model, "sonar");
    assert!(config.quote.web_search);
    assert!(config.validate().is_ok());
    assert!(config.validate_for_quotes().is_ok());

    let config = AppConfig::from_toml("[logging]\n[ui]\n").unwrap();
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.ui.theme, Theme::Dark);
}

fn temp_config_path() -> String {
    let path = std::env::temp_dir().join(format!("pine_levels_{}.toml", Uuid::new_v4()));
    path.to_str().unwrap().to_string()
}

#[test]
fn test_save_theme_only_touches_theme() {
    let path = temp_config_path();
    std::fs::write(
        &path,
        "[quote]\nmodel = \"sonar-pro\"\nweb_search = false\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    let saved = AppConfig::save_theme(&path, Theme::Light).unwrap();
    assert_eq!(saved.ui.theme, Theme::Light);

    let loaded = AppConfig::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded.ui.theme, Theme::Light);
    assert_eq!(loaded.quote.model, "sonar-pro");
    assert!(!loaded.quote.web_search);
    assert_eq!(loaded.logging.level, "warn");
    assert_eq!(loaded.quote.base_url, DEFAULT_API_URL);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_save_theme_creates_missing_file() {
    let path = temp_config_path();

    AppConfig::save_theme(&path, Theme::Light).unwrap();
    let loaded = AppConfig::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded.ui.theme, Theme::Light);
    assert_eq!(loaded.logging.level, "info");

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_save_persists_theme_without_key() {
    let path = temp_config_path();

    let mut config = AppConfig::default();
    config.quote.api_key = "secret".to_string();
    config.ui.theme = config.ui.theme.toggled();
    config.quote.timeout_secs = Some(30);
    config.save_to_file(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(!content.contains("secret"));

    let loaded = AppConfig::from_toml(&content).unwrap();
    assert_eq!(loaded.ui.theme, Theme::Light);
    assert_eq!(loaded.quote.timeout_secs, Some(30));
    assert!(loaded.quote.api_key.is_empty());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_theme_parsing() {
    assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
    assert_eq!(" light ".parse::<Theme>().unwrap(), Theme::Light);
    assert!("sepia".parse::<Theme>().is_err());
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.to_string(), "dark");
}

#[test]
fn test_nothing_is_retryable() {
    let errors = [
        LevelError::PriceTooLow {
            symbol: "A".to_string(),
        },
        LevelError::Network("x".to_string()),
        LevelError::Api("x".to_string()),
        LevelError::EmptySymbol,
    ];
    for e in &errors {
        assert!(!ErrorHandler::is_retryable(e));
    }
}
