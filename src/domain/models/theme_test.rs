use super::ResolvedTheme;
use super::ThemePreference;

#[test]
fn it_defaults_to_auto() {
    assert_eq!(ThemePreference::default(), ThemePreference::Auto);
}

#[test]
fn it_parses_preferences() {
    assert_eq!(ThemePreference::parse("light"), Some(ThemePreference::Light));
    assert_eq!(ThemePreference::parse("dark\n"), Some(ThemePreference::Dark));
    assert_eq!(ThemePreference::parse("auto"), Some(ThemePreference::Auto));
    assert_eq!(ThemePreference::parse("Dark"), None);
    assert_eq!(ThemePreference::parse(""), None);
}

#[test]
fn it_resolves_from_signal() {
    assert_eq!(ResolvedTheme::from_prefers_dark(true), ResolvedTheme::Dark);
    assert_eq!(ResolvedTheme::from_prefers_dark(false), ResolvedTheme::Light);
    assert_eq!(ResolvedTheme::Dark.to_string(), "dark");
}
