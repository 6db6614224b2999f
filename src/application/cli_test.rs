use anyhow::Result;

use super::build;
use super::format_setting;
use super::format_settings;
use super::format_settings_summary;
use super::mask_secret;
use super::unknown_setting_message;
use crate::domain::models::SettingValue;
use crate::domain::models::SettingsKey;
use crate::domain::services::Settings;
use crate::domain::services::SettingsWriter;
use crate::domain::services::Translations;

fn unstarted_settings() -> Settings {
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    return Settings::new(SettingsWriter::new(tx));
}

#[test]
fn it_masks_secrets() {
    assert_eq!(mask_secret(""), "");
    assert_eq!(mask_secret("abc"), "***");
    assert_eq!(mask_secret("sk-1234567"), "******4567");
}

#[test]
fn it_masks_only_the_api_key() {
    let value = SettingValue::Text("sk-1234567".to_string());
    assert_eq!(format_setting(SettingsKey::ApiKey, &value), "******4567");
    assert_eq!(format_setting(SettingsKey::ModelName, &value), "sk-1234567");
}

#[test]
fn it_formats_every_setting() {
    let settings = unstarted_settings();
    settings.api_key.set("sk-1234567".to_string());

    insta::assert_snapshot!(format_settings(&settings), @r###"
    api_key = ******4567
    api_url = https://api.openai.com/v1/chat/completions
    api_type = openai
    model_name = gpt-4o-mini
    shortcut = Alt+Space
    system_prompt = You are a helpful assistant. Please answer questions as concisely and effectively as possible.
    clear_chat_shortcut = Ctrl+Q
    selectedSystemPromptPreset = default
    borderless = false
    borderless_shortcut = Alt+B
    "###);
}

#[test]
fn it_parses_settings_set() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "promptbar",
        "settings",
        "set",
        "model_name",
        "gpt-4o",
    ])?;

    let (_, settings_matches) = matches.subcommand().unwrap();
    let (name, set_matches) = settings_matches.subcommand().unwrap();
    assert_eq!(name, "set");
    assert_eq!(
        set_matches.get_one::<String>("key"),
        Some(&"model_name".to_string())
    );
    assert_eq!(
        set_matches.get_one::<String>("value"),
        Some(&"gpt-4o".to_string())
    );
    return Ok(());
}

#[test]
fn it_rejects_unknown_setting_keys() {
    let res = build().try_get_matches_from(vec!["promptbar", "settings", "get", "api_secret"]);
    assert!(res.is_err());
}

#[test]
fn it_rejects_unknown_theme_preferences() {
    let res = build().try_get_matches_from(vec!["promptbar", "theme", "set", "sepia"]);
    assert!(res.is_err());
}

#[test]
fn it_accepts_global_args_after_subcommands() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "promptbar",
        "theme",
        "show",
        "--appearance",
        "dark",
    ])?;

    let (_, theme_matches) = matches.subcommand().unwrap();
    assert_eq!(
        theme_matches.get_one::<String>("appearance"),
        Some(&"dark".to_string())
    );
    return Ok(());
}

#[test]
fn it_summarizes_derived_settings() {
    let settings = unstarted_settings();
    insta::assert_snapshot!(format_settings_summary(&settings), @r###"
    effective system prompt = You are a helpful assistant.
    api key configured = false
    "###);

    settings.api_key.set("sk-1234567".to_string());
    settings
        .selected_system_prompt_preset
        .set("custom".to_string());
    settings.system_prompt.set("Be brief.".to_string());
    insta::assert_snapshot!(format_settings_summary(&settings), @r###"
    effective system prompt = Be brief.
    api key configured = true
    "###);
}

#[test]
fn it_translates_unknown_setting_errors() -> Result<()> {
    let translations = Translations::default();
    translations.load("zh")?;

    let message = unknown_setting_message(&translations, "api_secret");
    assert!(message.starts_with("未知设置项 'api_secret'. Possible values are: api_key, api_url"));
    return Ok(());
}

#[test]
fn it_falls_back_for_unknown_setting_errors_before_loading() {
    let message = unknown_setting_message(&Translations::default(), "api_secret");
    assert!(message.starts_with("Unknown setting 'api_secret'."));
}
