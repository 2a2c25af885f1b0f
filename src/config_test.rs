use super::*;
use std::collections::HashMap;

fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = config_from(&[]).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.auth.username, "admin");
    assert_eq!(cfg.auth.password, "admin123");
    assert!(cfg.webhook.is_none());
    assert!(!cfg.debug);
    assert!(cfg.embed_url.is_none());
    assert!(cfg.static_dir.is_none());
}

#[test]
fn empty_values_count_as_unset() {
    let cfg = config_from(&[
        ("CHAT_AUTH_USERNAME", ""),
        ("CHAT_AUTH_PASSWORD", "   "),
        ("N8N_CHAT_WEBHOOK_URL", ""),
        ("PORT", ""),
    ])
    .unwrap();
    assert_eq!(cfg.auth.username, DEFAULT_AUTH_USERNAME);
    assert_eq!(cfg.auth.password, DEFAULT_AUTH_PASSWORD);
    assert!(cfg.webhook.is_none());
    assert_eq!(cfg.port, DEFAULT_PORT);
}

#[test]
fn webhook_with_both_credentials_gets_basic_auth() {
    let cfg = config_from(&[
        ("N8N_CHAT_WEBHOOK_URL", "https://n8n.example.test/webhook/chat"),
        ("N8N_CHAT_AUTH_USERNAME", "bot"),
        ("N8N_CHAT_AUTH_PASSWORD", "s3cret"),
    ])
    .unwrap();
    let webhook = cfg.webhook.unwrap();
    assert_eq!(webhook.url, "https://n8n.example.test/webhook/chat");
    assert_eq!(webhook.basic_auth, Some(BasicAuth { username: "bot".into(), password: "s3cret".into() }));
}

#[test]
fn webhook_with_one_credential_has_no_basic_auth() {
    let cfg = config_from(&[
        ("N8N_CHAT_WEBHOOK_URL", "https://n8n.example.test/webhook/chat"),
        ("N8N_CHAT_AUTH_USERNAME", "bot"),
    ])
    .unwrap();
    assert!(cfg.webhook.unwrap().basic_auth.is_none());
}

#[test]
fn overrides_are_applied() {
    let cfg = config_from(&[
        ("PORT", "8080"),
        ("CHAT_AUTH_USERNAME", "alice"),
        ("CHAT_AUTH_PASSWORD", "wonderland"),
        ("DEBUG_MODE", "true"),
        ("NOTION_EMBED_URL", "https://notion.example.test/db"),
        ("STATIC_DIR", "./public"),
    ])
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.auth.username, "alice");
    assert_eq!(cfg.auth.password, "wonderland");
    assert!(cfg.debug);
    assert_eq!(cfg.embed_url.as_deref(), Some("https://notion.example.test/db"));
    assert_eq!(cfg.static_dir, Some(PathBuf::from("./public")));
}

#[test]
fn invalid_port_errors() {
    let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
    assert!(err.to_string().contains("invalid PORT"));
}

#[test]
fn unrecognized_debug_value_is_off() {
    let cfg = config_from(&[("DEBUG_MODE", "maybe")]).unwrap();
    assert!(!cfg.debug);
}

#[test]
fn parse_bool_variants() {
    for val in ["1", "true", "YES", " On "] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
    for val in ["0", "false", "No", "off"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
    assert_eq!(parse_bool(""), None);
}

#[test]
fn debug_output_hides_secrets() {
    let cfg = config_from(&[
        ("CHAT_AUTH_PASSWORD", "gate-secret"),
        ("N8N_CHAT_WEBHOOK_URL", "https://n8n.example.test/hook"),
        ("N8N_CHAT_AUTH_USERNAME", "bot"),
        ("N8N_CHAT_AUTH_PASSWORD", "hook-secret"),
    ])
    .unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("gate-secret"));
    assert!(!rendered.contains("hook-secret"));
    assert!(rendered.contains("[HIDDEN]"));
}
