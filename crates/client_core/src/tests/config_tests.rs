use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn normalizes_host_without_scheme() {
    assert_eq!(
        normalize_backend_url(" api.example.com/ ").expect("url"),
        "http://api.example.com"
    );
}

#[test]
fn keeps_https_and_strips_trailing_slashes() {
    assert_eq!(
        normalize_backend_url("https://api.example.com//").expect("url"),
        "https://api.example.com"
    );
}

#[test]
fn empty_backend_url_falls_back_to_default() {
    assert_eq!(
        normalize_backend_url("   ").expect("url"),
        ClientSettings::default().backend_url
    );
}

#[test]
fn rejects_non_http_scheme() {
    let err = normalize_backend_url("ftp://files.example.com").expect_err("scheme");
    assert!(matches!(err, ClientError::Config(_)));
}

#[test]
fn env_overrides_file_values_and_drops_blank_token() {
    let mut settings = ClientSettings::default();
    let file_cfg: HashMap<String, toml::Value> = toml::from_str(
        r#"
backend_url = "http://from-file:8000"
token = "file-token"
request_timeout_secs = 5
"#,
    )
    .expect("toml");
    apply_file_settings(&mut settings, &file_cfg);
    assert_eq!(settings.backend_url, "http://from-file:8000");
    assert_eq!(settings.token.as_deref(), Some("file-token"));
    assert_eq!(settings.request_timeout_secs, 5);

    apply_env_settings(&mut settings, |key| match key {
        "APP__BACKEND_URL" => Some("http://from-env:9000".to_string()),
        "DECK_TOKEN" => Some("  ".to_string()),
        "APP__REQUEST_TIMEOUT_SECS" => Some("not-a-number".to_string()),
        _ => None,
    });
    assert_eq!(settings.backend_url, "http://from-env:9000");
    assert_eq!(settings.token, None);
    assert_eq!(settings.request_timeout_secs, 5);
}

#[test]
fn missing_settings_file_is_not_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("deck_missing_{suffix}.toml"));
    assert!(read_settings_file(&path).expect("read").is_none());
}

#[test]
fn malformed_settings_file_reports_path() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("deck_bad_{suffix}.toml"));
    fs::write(&path, "backend_url = ").expect("write");

    let err = read_settings_file(&path).expect_err("parse error");
    assert!(format!("{err:#}").contains("deck_bad_"), "{err:#}");

    fs::remove_file(path).expect("cleanup");
}
