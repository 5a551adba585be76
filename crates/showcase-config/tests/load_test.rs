#![allow(clippy::unwrap_used)]
// Config loading: file, environment overrides and credential chain.

use std::path::Path;
use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use showcase_config::{Config, ConfigError, load_config_from, mail_setup, save_config_to};

#[test]
fn missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let cfg = load_config_from(Path::new("does-not-exist.toml")).map_err(|e| e.to_string())?;
        assert_eq!(cfg, Config::default());
        Ok(())
    });
}

#[test]
fn file_values_override_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [carousel]
            interval_ms = 3000
            autoplay = false

            [theme]
            name = "green"
            autoplay = true
            "#,
        )?;
        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
        assert_eq!(cfg.carousel.interval(), Duration::from_secs(3));
        assert!(!cfg.carousel.autoplay);
        assert_eq!(cfg.theme.name, "green");
        assert!(cfg.theme.autoplay);
        assert_eq!(cfg.theme.interval_ms, 5_000);
        Ok(())
    });
}

#[test]
fn env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[carousel]\ninterval_ms = 3000\n")?;
        jail.set_env("SHOWCASE_CAROUSEL__INTERVAL_MS", "1500");
        jail.set_env("SHOWCASE_CONTACT__SERVICE_ID", "service_env");
        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
        assert_eq!(cfg.carousel.interval_ms, 1_500);
        assert_eq!(cfg.contact.service_id.as_deref(), Some("service_env"));
        Ok(())
    });
}

#[test]
fn invalid_values_fail_validation() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[theme]\ninterval_ms = 0\n")?;
        let err = load_config_from(Path::new("config.toml")).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation { ref field, .. } if field == "theme.interval_ms"),
            "got: {err}"
        );
        Ok(())
    });
}

#[test]
fn malformed_toml_is_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[carousel\n")?;
        let err = load_config_from(Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)), "got: {err}");
        Ok(())
    });
}

#[test]
fn public_key_env_beats_plaintext() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [contact]
            service_id = "service_site"
            template_id = "template_contact"
            public_key = "from-file"
            public_key_env = "MY_EMAILJS_KEY"
            "#,
        )?;
        jail.set_env("MY_EMAILJS_KEY", "from-env");
        jail.set_env("SHOWCASE_EMAILJS_ACCESS_TOKEN", "token");

        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
        let setup = mail_setup(&cfg.contact).map_err(|e| e.to_string())?;
        assert_eq!(setup.credentials.public_key.expose_secret(), "from-env");
        assert_eq!(
            setup.credentials.access_token.as_ref().map(|t| t.expose_secret().to_owned()),
            Some("token".to_owned())
        );
        assert_eq!(setup.endpoint.as_str(), "https://api.emailjs.com/");
        assert_eq!(setup.timeout, Duration::from_secs(15));
        Ok(())
    });
}

#[test]
fn no_public_key_is_no_credentials() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            "[contact]\nservice_id = \"s\"\ntemplate_id = \"t\"\npublic_key_env = \"SHOWCASE_TEST_EMPTY_KEY\"\n",
        )?;
        let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
        let err = mail_setup(&cfg.contact).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }), "got: {err}");
        Ok(())
    });
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.theme.name = "orange".into();
    cfg.content.path = Some(dir.path().join("catalog.toml"));
    save_config_to(&cfg, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("orange"));
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed, cfg);
}
