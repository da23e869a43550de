use hopeon_portal::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic, time::Duration};

const CONFIG_VARS: [&str; 5] = [
    "APP_ENV",
    "BACKEND_URL",
    "BACKEND_TIMEOUT_SECS",
    "BIND_ADDR",
    "COOKIE_SECURE",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with a clean configuration environment and restores the original
/// values afterward, even if the test panics.
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(key, val);
            } else {
                env::remove_var(key);
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
            }
            // BACKEND_URL is missing
            AppConfig::load()
        })
    });

    assert!(
        result.is_err(),
        "Production config loading should panic without BACKEND_URL"
    );
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "local");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.backend_url, "http://localhost:3001");
    assert_eq!(config.backend_timeout, Duration::from_secs(10));
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert!(!config.cookie_secure);
}

#[test]
#[serial]
fn test_app_config_production_values() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("BACKEND_URL", "https://api.hopeon.example/");
            env::set_var("BACKEND_TIMEOUT_SECS", "30");
            env::set_var("BIND_ADDR", "127.0.0.1:8080");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Production);
    // Trailing slash is dropped so paths can be appended directly.
    assert_eq!(config.backend_url, "https://api.hopeon.example");
    assert_eq!(config.backend_timeout, Duration::from_secs(30));
    assert_eq!(config.bind_addr, "127.0.0.1:8080");
    // Secure cookies are the production default.
    assert!(config.cookie_secure);
}

#[test]
#[serial]
fn test_app_config_overrides_and_invalid_values() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("BACKEND_URL", "https://api.hopeon.example");
            env::set_var("COOKIE_SECURE", "off");
            env::set_var("BACKEND_TIMEOUT_SECS", "0");
        }
        AppConfig::load()
    });

    assert!(!config.cookie_secure);
    assert_eq!(config.backend_timeout, Duration::from_secs(10));
}

#[test]
#[serial]
fn test_unknown_app_env_falls_back_to_local() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "staging");
            env::set_var("COOKIE_SECURE", "not-a-bool");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert!(!config.cookie_secure);
}
