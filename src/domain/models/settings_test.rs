use strum::VariantNames;
use test_utils::settings_bundle_fixture;

use super::SettingType;
use super::SettingValue;
use super::SettingsBundle;
use super::SettingsKey;
use super::SystemPromptPreset;

#[test]
fn it_uses_persisted_key_names() {
    insta::assert_snapshot!(SettingsKey::VARIANTS.join("\n"), @r###"
    api_key
    api_url
    api_type
    model_name
    shortcut
    system_prompt
    clear_chat_shortcut
    selectedSystemPromptPreset
    borderless
    borderless_shortcut
    "###);
}

#[test]
fn it_parses_keys() {
    assert_eq!(
        SettingsKey::parse("selectedSystemPromptPreset"),
        Some(SettingsKey::SelectedSystemPromptPreset)
    );
    assert_eq!(SettingsKey::parse("api_key"), Some(SettingsKey::ApiKey));
    assert_eq!(SettingsKey::parse("apiKey"), None);
}

#[test]
fn it_has_defaults() {
    assert_eq!(
        SettingsKey::ApiKey.default_value(),
        SettingValue::Text("".to_string())
    );
    assert_eq!(
        SettingsKey::ClearChatShortcut.default_value(),
        SettingValue::Text("Ctrl+Q".to_string())
    );
    assert_eq!(
        SettingsKey::Borderless.default_value(),
        SettingValue::Flag(false)
    );
}

#[test]
fn it_deserializes_a_bundle_with_foreign_values() {
    let bundle: SettingsBundle = serde_json::from_str(settings_bundle_fixture()).unwrap();

    assert_eq!(bundle.len(), 8);
    assert_eq!(
        bundle.get(SettingsKey::ApiKey),
        Some(&SettingValue::Text("sk-fixture".to_string()))
    );
    assert_eq!(
        bundle.get(SettingsKey::Borderless),
        Some(&SettingValue::Flag(true))
    );
    assert_eq!(bundle.get(SettingsKey::ClearChatShortcut), None);
}

#[test]
fn it_keeps_foreign_values_when_serializing() {
    let mut bundle: SettingsBundle = serde_json::from_str(settings_bundle_fixture()).unwrap();
    bundle.insert(
        SettingsKey::ModelName,
        SettingValue::Text("gpt-4o".to_string()),
    );

    insta::assert_snapshot!(serde_json::to_string(&bundle).unwrap(), @r###"{"api_key":"sk-fixture","api_type":"openai-compatible","api_url":"https://llm.example.com/v1/chat/completions","borderless":true,"model_name":"gpt-4o","shortcut":"","system_prompt":"","window_width":720}"###);
}

#[test]
fn it_merges_bundles() {
    let mut base = SettingsBundle::default();
    base.insert(SettingsKey::ApiKey, SettingValue::Text("a".to_string()));
    base.insert(SettingsKey::ModelName, SettingValue::Text("m".to_string()));

    let mut overlay = SettingsBundle::default();
    overlay.insert(SettingsKey::ApiKey, SettingValue::Text("b".to_string()));

    base.merge(&overlay);

    assert_eq!(
        base.get(SettingsKey::ApiKey),
        Some(&SettingValue::Text("b".to_string()))
    );
    assert_eq!(
        base.get(SettingsKey::ModelName),
        Some(&SettingValue::Text("m".to_string()))
    );
}

#[test]
fn it_converts_setting_types() {
    let text = SettingValue::Text("x".to_string());
    let flag = SettingValue::Flag(true);

    assert_eq!(String::from_setting(&text), Some("x".to_string()));
    assert_eq!(String::from_setting(&flag), None);
    assert_eq!(bool::from_setting(&flag), Some(true));
    assert_eq!(bool::from_setting(&text), None);
    assert!("".to_string().is_blank());
    assert!(!false.is_blank());
}

#[test]
fn it_resolves_presets() {
    assert_eq!(
        SystemPromptPreset::parse("default").unwrap().text(),
        Some("You are a helpful assistant.")
    );
    assert!(SystemPromptPreset::parse("minimal")
        .unwrap()
        .text()
        .unwrap()
        .starts_with("Your function is to distill"));
    assert_eq!(SystemPromptPreset::Custom.text(), None);
    assert_eq!(SystemPromptPreset::parse("verbose"), None);
}
