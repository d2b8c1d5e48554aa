//! Terminal rendering for the chat surface: navigation line, sign-in gate,
//! message list, and composer state.

use chrono::{DateTime, Local, TimeZone};
use colored::Colorize;

use rill_channel::{ChannelState, EMOJI_PALETTE};
use rill_types::Message;

/// Presentation palette. Toggled from the navigation bar; affects nothing
/// but rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn name_color(self, s: &str) -> colored::ColoredString {
        match self {
            Self::Light => s.blue().bold(),
            Self::Dark => s.cyan().bold(),
        }
    }
}

pub fn print_banner() {
    println!();
    println!("{}", "rill — a small shared channel".cyan().bold());
    println!();
}

pub fn print_loading() {
    println!("{}", "Loading...".dimmed());
}

pub fn print_nav(signed_in_as: Option<&str>, theme: Theme) {
    match signed_in_as {
        Some(name) => println!(
            "{}  {}  {}",
            theme.name_color("rill"),
            format!("signed in as {}", name).dimmed(),
            "/signout · /theme · /help".dimmed()
        ),
        None => println!("{}", theme.name_color("rill")),
    }
}

pub fn print_sign_in_gate() {
    println!("{}", "You are not signed in.".yellow());
    println!("  {}  start the sign-in challenge", "/signin".cyan());
    println!("  {}    leave", "/quit".cyan());
}

pub fn print_channel_help() {
    println!("{}", "Commands:".yellow().bold());
    println!("  {}        send a message (or queue it with /emoji first)", "<text>".cyan());
    println!("  {}         submit the current draft", "/send".cyan());
    println!("  {}     reply to message n", "/reply <n>".cyan());
    println!("  {}        drop the reply annotation", "/cancel".cyan());
    println!("  {}  react to message n with palette emoji k", "/react <n> <k>".cyan());
    println!("  {}       open or close the emoji palette", "/picker".cyan());
    println!("  {}    append palette emoji k to the draft", "/emoji <k>".cyan());
    println!("  {}        toggle dark mode", "/theme".cyan());
    println!("  {}      sign out", "/signout".cyan());
    println!("  {}         leave", "/quit".cyan());
}

pub fn print_info(msg: &str) {
    println!("{}", msg.dimmed());
}

/// `DD/MM/YYYY/HH:MM`, the absolute-format revision.
pub fn format_timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format("%d/%m/%Y/%H:%M").to_string()
}

/// One rendered message item. Avatar marker, display name and timestamp
/// are each omitted when absent; the reply quote line appears only when
/// the message carries one.
pub fn format_message(index: usize, message: &Message, theme: Theme) -> String {
    let mut line = format!("{:>3} ", index);

    if !message.author_avatar.is_empty() {
        line.push_str("◉ ");
    }
    if !message.author_name.is_empty() {
        line.push_str(&format!("{} ", theme.name_color(&message.author_name)));
    }
    let local: DateTime<Local> = message.created_at.with_timezone(&Local);
    line.push_str(&format!("{}", format_timestamp(&local).dimmed()));

    if let Some(reply) = &message.reply_to {
        line.push_str(&format!("\n      {}", format!("↳ {}", reply.text).dimmed()));
    }
    line.push_str(&format!("\n      {}", message.text));
    line
}

/// Full re-render of the channel: the window is replaced wholesale on
/// every update, and the view ends scrolled at the newest entry.
pub fn render_channel(state: &ChannelState, theme: Theme) {
    println!();
    println!("{}", "— this is the beginning of the chat —".dimmed());
    for (i, message) in state.messages.iter().enumerate() {
        println!("{}", format_message(i + 1, message, theme));
    }
    if let Some(reply) = &state.replying_to {
        println!("{}", format!("replying to: {} (/cancel to drop)", reply.text).yellow());
    }
    if state.emoji_picker_open {
        print_palette();
    }
    if !state.draft.is_empty() {
        println!("{}", format!("draft: {}", state.draft).dimmed());
    }
}

pub fn print_palette() {
    let numbered: Vec<String> = EMOJI_PALETTE
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}:{}", i + 1, e))
        .collect();
    println!("{}", numbered.join("  "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rill_types::{MessageId, ReplyRef};

    fn plain() {
        colored::control::set_override(false);
    }

    fn message() -> Message {
        Message {
            id: MessageId::from("m1"),
            text: "hello".into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 12, 14, 30, 0).unwrap(),
            author_id: "u1".into(),
            author_name: "Ann".into(),
            author_avatar: String::new(),
            reply_to: None,
        }
    }

    #[test]
    fn timestamp_uses_the_absolute_format() {
        let t = Utc.with_ymd_and_hms(2024, 5, 12, 14, 30, 0).unwrap();
        assert_eq!(format_timestamp(&t), "12/05/2024/14:30");
    }

    #[test]
    fn name_is_rendered_when_present() {
        plain();
        let rendered = format_message(1, &message(), Theme::Light);
        assert!(rendered.contains("Ann"));
        assert!(rendered.contains("hello"));
    }

    #[test]
    fn empty_name_and_avatar_are_omitted() {
        plain();
        let mut msg = message();
        msg.author_name = String::new();
        let rendered = format_message(1, &msg, Theme::Light);
        assert!(!rendered.contains("Ann"));
        assert!(!rendered.contains('◉'));
    }

    #[test]
    fn avatar_marker_appears_when_a_url_is_present() {
        plain();
        let mut msg = message();
        msg.author_avatar = "https://example.com/a.png".into();
        assert!(format_message(1, &msg, Theme::Light).contains('◉'));
    }

    #[test]
    fn reply_quote_line_is_included() {
        plain();
        let mut msg = message();
        msg.reply_to = Some(ReplyRef {
            message_id: MessageId::from("m0"),
            text: "earlier".into(),
        });
        assert!(format_message(1, &msg, Theme::Light).contains("↳ earlier"));
    }

    #[test]
    fn theme_toggles_both_ways() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
