use shared_calendar_bot::calendar::ActorId;
use shared_calendar_bot::config::{Config, DEFAULT_DATABASE_URL};
use std::env;
use std::sync::Mutex;
use std::time::Duration;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const VARS: [&str; 5] = [
    "TELEGRAM_BOT_TOKEN",
    "DATABASE_URL",
    "HTTP_PORT",
    "MODERATORS",
    "STORE_TIMEOUT_SECS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("MODERATORS", "111, 222");
    env::set_var("STORE_TIMEOUT_SECS", "3");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.moderators, vec![ActorId::new("111"), ActorId::new("222")]);
    assert_eq!(config.store_timeout, Duration::from_secs(3));

    clear_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    // Only set required token, let others use defaults
    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "required_token");
    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.http_port, 3000);
    assert!(config.moderators.is_empty());
    assert_eq!(config.store_timeout, Duration::from_secs(10));

    clear_env();
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    let result = Config::from_env();
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(error_msg.contains("TELEGRAM_BOT_TOKEN must be set"));
}

#[test]
fn test_config_invalid_port() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("HTTP_PORT", "invalid_port");

    let result = Config::from_env();
    assert!(result.unwrap_err().to_string().contains("Invalid HTTP_PORT"));

    env::set_var("HTTP_PORT", "-1");
    assert!(Config::from_env().is_err());

    clear_env();
}

#[test]
fn test_config_store_timeout_must_be_positive() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("STORE_TIMEOUT_SECS", "0");
    assert!(Config::from_env().is_err());

    env::set_var("STORE_TIMEOUT_SECS", "soon");
    assert!(Config::from_env().is_err());

    clear_env();
}

#[test]
fn test_config_empty_values() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    // Test empty token (should fail)
    env::set_var("TELEGRAM_BOT_TOKEN", "   ");
    assert!(Config::from_env().is_err());

    // Blank database URL and moderator list fall back to defaults
    env::set_var("TELEGRAM_BOT_TOKEN", "valid_token");
    env::set_var("DATABASE_URL", "");
    env::set_var("MODERATORS", " , ,");
    let config = Config::from_env().unwrap();
    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert!(config.moderators.is_empty());

    clear_env();
}

#[test]
fn test_config_whitespace_handling() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "  token_with_spaces  ");
    env::set_var("HTTP_PORT", "  3000  ");
    env::set_var("STORE_TIMEOUT_SECS", " 5 ");

    let config = Config::from_env().unwrap();

    // Environment variables should preserve whitespace as-is
    assert_eq!(config.telegram_bot_token, "  token_with_spaces  ");
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.store_timeout, Duration::from_secs(5));

    clear_env();
}
