/// A settings bundle as the desktop app writes it, including a key the stores
/// don't know about.
pub fn settings_bundle_fixture() -> &'static str {
    return r#"
{
  "api_key": "sk-fixture",
  "api_url": "https://llm.example.com/v1/chat/completions",
  "api_type": "openai-compatible",
  "model_name": "llama3",
  "shortcut": "",
  "system_prompt": "",
  "borderless": true,
  "window_width": 720
}
"#
    .trim();
}

pub fn settings_bundle_value() -> serde_json::Value {
    return serde_json::from_str(settings_bundle_fixture()).unwrap();
}
