#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use strum::IntoEnumIterator;
use strum::VariantNames;

use super::context::AppContext;
use super::repl;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AppearanceName;
use crate::domain::models::PersistenceName;
use crate::domain::models::SettingValue;
use crate::domain::models::SettingsKey;
use crate::domain::models::ThemePreference;
use crate::domain::services::Settings;
use crate::domain::services::Translations;
use crate::infrastructure::persistence::json_file::JsonFileBackend;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Keeps the last four characters of secrets visible.
pub fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    if count == 0 {
        return "".to_string();
    }
    if count <= 4 {
        return "*".repeat(count);
    }

    let visible = value.chars().skip(count - 4).collect::<String>();
    return format!("{}{visible}", "*".repeat(count - 4));
}

pub fn format_setting(key: SettingsKey, value: &SettingValue) -> String {
    if key == SettingsKey::ApiKey {
        return mask_secret(&value.to_string());
    }
    return value.to_string();
}

pub fn format_settings(settings: &Settings) -> String {
    return SettingsKey::iter()
        .map(|key| {
            let value = format_setting(key, &settings.get(key));
            return format!("{key} = {value}");
        })
        .collect::<Vec<String>>()
        .join("\n");
}

/// Values derived from several settings at once.
pub fn format_settings_summary(settings: &Settings) -> String {
    return [
        format!("effective system prompt = {}", settings.effective_system_prompt()),
        format!("api key configured = {}", settings.api_key_configured()),
    ]
    .join("\n");
}

pub fn unknown_setting_message(translations: &Translations, raw: &str) -> String {
    let prefix = translations
        .translate("settings.unknown_key")
        .or("Unknown setting");
    return format!(
        "{prefix} '{raw}'. Possible values are: {}",
        SettingsKey::VARIANTS.join(", ")
    );
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Process configuration.")
        .subcommand(Command::new("path").about("Returns the directory holding settings.json."))
        .subcommand(Command::new("show").about("Prints the resolved process configuration."));
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for promptbar")
        .hide(true)
        .subcommand(Command::new("log-path").about("Output path to debug log file generated when running promptbar with environment variable RUST_LOG=promptbar"))
        .subcommand(Command::new("enum-config").about("List all config keys as strings."))
        .subcommand(Command::new("locales").about("List all embedded locales."));
}

fn arg_settings_key() -> Arg {
    return Arg::new("key")
        .help("Setting name as stored in settings.json.")
        .required(true)
        .value_parser(PossibleValuesParser::new(SettingsKey::VARIANTS));
}

fn subcommand_settings() -> Command {
    return Command::new("settings")
        .about("Read and write persisted settings.")
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("Lists every setting with its current value."))
        .subcommand(
            Command::new("get")
                .about("Prints a single setting.")
                .arg(arg_settings_key()),
        )
        .subcommand(
            Command::new("set")
                .about("Updates a single setting and saves it.")
                .arg(arg_settings_key())
                .arg(Arg::new("value").help("New value.").required(true)),
        )
        .subcommand(Command::new("path").about("Print the settings file path."));
}

fn subcommand_theme() -> Command {
    return Command::new("theme")
        .about("Show or change the theme preference.")
        .arg_required_else_help(true)
        .subcommand(Command::new("show").about("Prints the stored preference and what it resolves to."))
        .subcommand(
            Command::new("set").about("Stores and applies a preference.").arg(
                Arg::new("preference")
                    .required(true)
                    .value_parser(PossibleValuesParser::new(ThemePreference::VARIANTS)),
            ),
        );
}

pub fn build() -> Command {
    let commands_text = repl::help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return format!("CHAT {line}").underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("promptbar")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start a chat session in the terminal."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_settings())
        .subcommand(subcommand_theme())
        .arg(
            Arg::new(ConfigKey::ConfigDir.to_string())
                .long(ConfigKey::ConfigDir.to_string())
                .env("PROMPTBAR_CONFIG_DIR")
                .num_args(1)
                .help(format!("Directory holding settings.json. [default: {}]", Config::default(ConfigKey::ConfigDir)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::CacheDir.to_string())
                .long(ConfigKey::CacheDir.to_string())
                .env("PROMPTBAR_CACHE_DIR")
                .num_args(1)
                .help("Directory holding the cached theme preference and debug log.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Locale.to_string())
                .short('l')
                .long(ConfigKey::Locale.to_string())
                .env("PROMPTBAR_LOCALE")
                .num_args(1)
                .help("Locale for display strings, such as en or zh-CN. Defaults to $LANG.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Persistence.to_string())
                .long(ConfigKey::Persistence.to_string())
                .env("PROMPTBAR_PERSISTENCE")
                .num_args(1)
                .help(format!("Where settings are saved. [default: {}]", Config::default(ConfigKey::Persistence)))
                .value_parser(PossibleValuesParser::new(PersistenceName::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Appearance.to_string())
                .long(ConfigKey::Appearance.to_string())
                .env("PROMPTBAR_APPEARANCE")
                .num_args(1)
                .help(format!("Source of the light/dark signal used by the auto theme. [default: {}]", Config::default(ConfigKey::Appearance)))
                .value_parser(PossibleValuesParser::new(AppearanceName::VARIANTS))
                .global(true),
        );
}

async fn run_settings(matches: &ArgMatches) -> Result<()> {
    if let Some(("path", _)) = matches.subcommand() {
        let backend = JsonFileBackend::new(path::PathBuf::from(Config::get(ConfigKey::ConfigDir)));
        println!("{}", backend.file_path().to_string_lossy());
        return Ok(());
    }

    let ctx = AppContext::from_config()?;
    ctx.settle().await?;

    match matches.subcommand() {
        Some(("list", _)) => {
            println!("{}", format_settings(&ctx.settings));
            println!("\n{}", format_settings_summary(&ctx.settings));
        }
        Some(("get", get_matches)) => {
            let key = parse_settings_key(get_matches, &ctx.translations)?;
            println!("{}", format_setting(key, &ctx.settings.get(key)));
        }
        Some(("set", set_matches)) => {
            let key = parse_settings_key(set_matches, &ctx.translations)?;
            let value = set_matches
                .get_one::<String>("value")
                .map(|value| return value.to_string())
                .unwrap_or_default();

            ctx.settings.set(key, &value)?;
            ctx.settle().await?;

            let saved = ctx.translations.translate("settings.saved").or("Saved");
            println!("{saved}: {key} = {}", format_setting(key, &ctx.settings.get(key)));
        }
        _ => {
            subcommand_settings().print_long_help()?;
        }
    }

    return Ok(());
}

fn parse_settings_key(matches: &ArgMatches, translations: &Translations) -> Result<SettingsKey> {
    let raw = matches
        .get_one::<String>("key")
        .map(|key| return key.to_string())
        .unwrap_or_default();

    if let Some(key) = SettingsKey::parse(&raw) {
        return Ok(key);
    }

    bail!(unknown_setting_message(translations, &raw))
}

async fn run_theme(matches: &ArgMatches) -> Result<()> {
    let ctx = AppContext::from_config()?;

    match matches.subcommand() {
        Some(("show", _)) => {
            let preference = ctx.theme.get();
            let resolved = ctx.theme.resolve(preference);
            let label = ctx.translations.translate(&format!("theme.{preference}"));
            if label.is_ready() {
                println!("{preference} ({}) -> {resolved}", label.or(""));
            } else {
                println!("{preference} -> {resolved}");
            }
        }
        Some(("set", set_matches)) => {
            let raw = set_matches
                .get_one::<String>("preference")
                .map(|value| return value.to_string())
                .unwrap_or_default();
            let preference = match ThemePreference::parse(&raw) {
                Some(preference) => preference,
                None => bail!(format!("'{raw}' is not a theme preference")),
            };

            let resolved = ctx.theme.set(preference);
            println!("{preference} -> {resolved}");
        }
        _ => {
            subcommand_theme().print_long_help()?;
        }
    }

    ctx.settle().await?;
    return Ok(());
}

pub async fn parse() -> Result<()> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => match debug_matches.subcommand() {
            Some(("log-path", _)) => {
                println!("{}", Config::log_path().to_string_lossy());
            }
            Some(("enum-config", _)) => {
                println!("{}", ConfigKey::VARIANTS.join("\n"));
            }
            Some(("locales", _)) => {
                println!("{}", Translations::list().join("\n"));
            }
            _ => {
                subcommand_debug().print_long_help()?;
            }
        },
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches])?;
            match subcmd_matches.subcommand() {
                Some(("path", _)) => {
                    println!("{}", Config::get(ConfigKey::ConfigDir));
                }
                Some(("show", _)) => {
                    for key in ConfigKey::iter() {
                        println!("{key} = {}", Config::get(key));
                    }
                }
                _ => {
                    subcommand_config().print_long_help()?;
                }
            }
        }
        Some(("settings", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches])?;
            run_settings(subcmd_matches).await?;
        }
        Some(("theme", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches])?;
            run_theme(subcmd_matches).await?;
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches])?;
            let ctx = AppContext::from_config()?;
            repl::start(&ctx).await?;
        }
        _ => {
            Config::load(vec![&matches])?;
            let ctx = AppContext::from_config()?;
            repl::start(&ctx).await?;
        }
    }

    return Ok(());
}
