#[cfg(test)]
#[path = "repl_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;
use owo_colors::Stream;
use tokio::fs;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::watch;
use tokio::time;

use super::context::AppContext;
use crate::domain::models::Attachment;
use crate::domain::models::Message;
use crate::domain::models::ResolvedTheme;
use crate::domain::models::Role;
use crate::domain::models::ThemePreference;

const TRANSLATIONS_WAIT: Duration = Duration::from_millis(500);

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- TEXT - Adds TEXT as your message. The first message replaces the greeting.
- /reply TEXT - Adds TEXT as an assistant reply.
- /attach PATH [TEXT] - Adds a message with the file at PATH attached.
- /clear - Clears the chat back to the greeting.
- /theme light|dark|auto - Switches the theme.
- /status - Shows the conversation, settings and theme state.
- /export - Prints the conversation as JSON, ready for a model backend.
- /quit (/q) - Exit.
- /help (/h) - Provides this help menu.
        "#;

    return text.trim().to_string();
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Say(String),
    Reply(String),
    Attach(String, String),
    Clear,
    Theme(ThemePreference),
    Status,
    Export,
    Help,
    Quit,
    Invalid(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> ReplCommand {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }

        if !line.starts_with('/') {
            return ReplCommand::Say(line.to_string());
        }

        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "/q" | "/quit" | "/exit" => return ReplCommand::Quit,
            "/h" | "/help" => return ReplCommand::Help,
            "/clear" => return ReplCommand::Clear,
            "/status" => return ReplCommand::Status,
            "/export" => return ReplCommand::Export,
            "/reply" => {
                if rest.is_empty() {
                    return ReplCommand::Invalid("/reply needs some text".to_string());
                }
                return ReplCommand::Reply(rest.to_string());
            }
            "/attach" => {
                let (path, text) = match rest.split_once(' ') {
                    Some((path, text)) => (path, text.trim()),
                    None => (rest, ""),
                };
                if path.is_empty() {
                    return ReplCommand::Invalid("/attach needs a file path".to_string());
                }
                return ReplCommand::Attach(path.to_string(), text.to_string());
            }
            "/theme" => match ThemePreference::parse(rest) {
                Some(preference) => return ReplCommand::Theme(preference),
                None => {
                    return ReplCommand::Invalid(format!(
                        "'{rest}' is not a theme, use light, dark or auto"
                    ))
                }
            },
            _ => return ReplCommand::Invalid(format!("Unknown command {command}, try /help")),
        }
    }
}

pub fn format_message(message: &Message) -> String {
    let mut res = format!("{}: {}", message.role, message.content);
    if let Some(attachment) = &message.attachment {
        res = format!(
            "{res}\n  [attached {} ({} bytes)]",
            attachment.name,
            attachment.content.len()
        );
    }

    return res;
}

pub fn format_status(ctx: &AppContext) -> String {
    let locale = ctx.translations.locale().unwrap_or_else(|| return "none".to_string());
    let readiness = if ctx.translations.is_ready() {
        "ready"
    } else {
        "pending"
    };
    let preference = ctx.theme.get();

    return [
        format!("conversation: {} ({} messages)", ctx.chat.phase(), ctx.chat.len()),
        format!("model: {}", ctx.settings.model_name.get()),
        format!("api key configured: {}", ctx.settings.api_key_configured()),
        format!("system prompt: {}", ctx.settings.effective_system_prompt()),
        format!("locale: {locale} ({readiness})"),
        format!("theme: {preference} ({})", ctx.theme.resolve(preference)),
    ]
    .join("\n");
}

/// The conversation as pretty JSON, or `None` when there is nothing to send.
pub fn format_export(ctx: &AppContext) -> Result<Option<String>> {
    if ctx.chat.is_empty() {
        return Ok(None);
    }

    return Ok(Some(serde_json::to_string_pretty(&ctx.chat.conversation())?));
}

fn print_message(message: &Message, theme: Option<ResolvedTheme>) {
    let text = format_message(message);
    let theme = theme.unwrap_or(ResolvedTheme::Dark);

    let painted = match (message.role, theme) {
        (Role::User, _) => text
            .if_supports_color(Stream::Stdout, |t| return t.bold())
            .to_string(),
        (_, ResolvedTheme::Dark) => text
            .if_supports_color(Stream::Stdout, |t| return t.bright_cyan())
            .to_string(),
        (_, ResolvedTheme::Light) => text
            .if_supports_color(Stream::Stdout, |t| return t.blue())
            .to_string(),
    };

    println!("{painted}");
}

fn print_notice(text: &str) {
    println!(
        "{}",
        text.if_supports_color(Stream::Stdout, |t| return t.yellow())
    );
}

async fn read_attachment(path: &str) -> Result<Attachment> {
    let content = fs::read_to_string(path).await?;
    let name = std::path::Path::new(path)
        .file_name()
        .map(|name| return name.to_string_lossy().to_string())
        .unwrap_or_else(|| return path.to_string());

    return Ok(Attachment::new(&name, &content));
}

/// Applies one command to the stores. Returns false once the user asked to
/// leave.
pub async fn handle_command(ctx: &AppContext, command: ReplCommand) -> Result<bool> {
    match command {
        ReplCommand::Empty => {}
        ReplCommand::Quit => return Ok(false),
        ReplCommand::Help => print_notice(&help_text()),
        ReplCommand::Invalid(reason) => print_notice(&reason),
        ReplCommand::Say(text) => ctx.chat.add_user_message(&text, None),
        ReplCommand::Reply(text) => ctx.chat.add_assistant_message(&text),
        ReplCommand::Clear => {
            let cleared = ctx
                .translations
                .translate("chat.cleared")
                .or(&ctx.greeting());
            ctx.chat.clear(&cleared);
        }
        ReplCommand::Attach(path, text) => match read_attachment(&path).await {
            Ok(attachment) => ctx.chat.add_user_message(&text, Some(attachment)),
            Err(err) => {
                let prefix = ctx
                    .translations
                    .translate("chat.attachment_missing")
                    .or("Couldn't read the attachment");
                print_notice(&format!("{prefix}: {err}"));
            }
        },
        ReplCommand::Theme(preference) => {
            ctx.theme.set(preference);
        }
        ReplCommand::Status => print_notice(&format_status(ctx)),
        ReplCommand::Export => match format_export(ctx)? {
            Some(json) => println!("{json}"),
            None => print_notice("Nothing to export yet"),
        },
    }

    return Ok(true);
}

/// Prints the preference and what it paints as, and marks both receivers as
/// seen so one change is announced once.
fn announce_theme(
    ctx: &AppContext,
    theme_rx: &mut watch::Receiver<ThemePreference>,
    marker_rx: &mut watch::Receiver<Option<ResolvedTheme>>,
) {
    let preference = *theme_rx.borrow_and_update();
    let painted = *marker_rx.borrow_and_update();
    let painted = painted.unwrap_or_else(|| return ctx.theme.resolve(preference));

    print_notice(&format!("theme: {preference} ({painted})"));
}

async fn wait_for_translations(ctx: &AppContext) {
    let mut ready_rx = ctx.translations.subscribe_ready();
    let ready = time::timeout(TRANSLATIONS_WAIT, ready_rx.wait_for(|ready| return *ready))
        .await
        .map(|res| return res.is_ok())
        .unwrap_or(false);

    if !ready {
        tracing::warn!("Translations not ready, greeting with the default text");
    }
}

pub async fn start(ctx: &AppContext) -> Result<()> {
    ctx.theme.apply(ctx.theme.get());
    let system_watch = ctx.theme.watch_system_change();

    wait_for_translations(ctx).await;
    ctx.chat.seed_if_empty(&ctx.greeting());

    let mut chat_rx = ctx.chat.subscribe();
    let mut theme_rx = ctx.theme.subscribe();
    let mut marker_rx = ctx.theme_marker.subscribe();
    let mut model_rx = ctx.settings.model_name.subscribe();
    chat_rx.borrow_and_update();
    theme_rx.borrow_and_update();
    marker_rx.borrow_and_update();
    model_rx.borrow_and_update();

    let messages = ctx.chat.messages();
    for message in messages.iter() {
        print_message(message, ctx.theme_marker.current());
    }
    let mut printed = messages.len();
    print_notice(&format!("model: {}", ctx.settings.model_name.get()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line? {
                    Some(line) => line,
                    None => break,
                };
                if !handle_command(ctx, ReplCommand::parse(&line)).await? {
                    break;
                }
            }
            Ok(()) = theme_rx.changed() => {
                announce_theme(ctx, &mut theme_rx, &mut marker_rx);
            }
            Ok(()) = marker_rx.changed() => {
                announce_theme(ctx, &mut theme_rx, &mut marker_rx);
            }
            // The persisted settings usually land after the prompt is shown.
            Ok(()) = model_rx.changed() => {
                let model = model_rx.borrow_and_update().clone();
                print_notice(&format!("model: {model}"));
            }
        }

        if !chat_rx.has_changed()? {
            continue;
        }

        let messages = chat_rx.borrow_and_update().clone();
        // Replacements and clears shrink or rewrite the list, so reprint it.
        if messages.len() <= printed {
            printed = 0;
        }
        for message in messages.iter().skip(printed) {
            print_message(message, ctx.theme_marker.current());
        }
        printed = messages.len();
    }

    tracing::debug!(active = system_watch.is_active(), "Stopping system appearance watch");
    system_watch.stop();
    ctx.settle().await?;

    return Ok(());
}
