//! Sign-in gate and composer input parsing.

use rill_channel::EMOJI_PALETTE;
use rill_session::SessionState;

/// Which surface the shell renders, derived from live session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Session state not yet resolved; rendering is withheld.
    Loading,
    SignIn,
    Channel,
}

pub fn surface_for(state: &SessionState) -> Surface {
    match state {
        SessionState::Initializing => Surface::Loading,
        SessionState::Anonymous => Surface::SignIn,
        SessionState::Authenticated(_) => Surface::Channel,
    }
}

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Plain text: set the draft to this and submit.
    Text(String),
    /// Submit whatever the draft currently holds.
    Send,
    SignIn,
    SignOut,
    /// Reply to the nth listed message (1-based).
    Reply(usize),
    CancelReply,
    /// React to the nth listed message with a palette glyph.
    React(usize, String),
    TogglePicker,
    /// Append a palette glyph to the draft.
    Emoji(String),
    ToggleTheme,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim_end();
    if !line.starts_with('/') {
        return Input::Text(line.to_string());
    }

    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    match command {
        "/send" => Input::Send,
        "/signin" => Input::SignIn,
        "/signout" => Input::SignOut,
        "/cancel" => Input::CancelReply,
        "/picker" => Input::TogglePicker,
        "/theme" => Input::ToggleTheme,
        "/help" => Input::Help,
        "/quit" => Input::Quit,
        "/reply" => match parts.next().and_then(|n| n.parse().ok()) {
            Some(n) => Input::Reply(n),
            None => Input::Unknown(line.to_string()),
        },
        "/react" => {
            let index = parts.next().and_then(|n| n.parse().ok());
            let glyph = parts.next().and_then(palette_glyph);
            match (index, glyph) {
                (Some(n), Some(glyph)) => Input::React(n, glyph),
                _ => Input::Unknown(line.to_string()),
            }
        }
        "/emoji" => match parts.next().and_then(palette_glyph) {
            Some(glyph) => Input::Emoji(glyph),
            None => Input::Unknown(line.to_string()),
        },
        _ => Input::Unknown(line.to_string()),
    }
}

/// Resolve a palette argument: a 1-based index, or the glyph itself.
fn palette_glyph(arg: &str) -> Option<String> {
    if let Ok(k) = arg.parse::<usize>() {
        return EMOJI_PALETTE
            .get(k.checked_sub(1)?)
            .map(|g| g.to_string());
    }
    EMOJI_PALETTE
        .iter()
        .find(|g| **g == arg)
        .map(|g| g.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_types::UserIdentity;

    #[test]
    fn gate_follows_session_state() {
        assert_eq!(surface_for(&SessionState::Initializing), Surface::Loading);
        assert_eq!(surface_for(&SessionState::Anonymous), Surface::SignIn);
        assert_eq!(
            surface_for(&SessionState::Authenticated(UserIdentity {
                id: "u1".into(),
                display_name: "Ann".into(),
                avatar_url: String::new(),
            })),
            Surface::Channel
        );
    }

    #[test]
    fn plain_text_is_a_draft_submission() {
        assert_eq!(parse_input("hello there"), Input::Text("hello there".into()));
    }

    #[test]
    fn commands_parse() {
        assert_eq!(parse_input("/signin"), Input::SignIn);
        assert_eq!(parse_input("/reply 3"), Input::Reply(3));
        assert_eq!(parse_input("/react 2 5"), Input::React(2, "🔥".into()));
        assert_eq!(parse_input("/react 2 🔥"), Input::React(2, "🔥".into()));
        assert_eq!(parse_input("/emoji 6"), Input::Emoji("🎉".into()));
        assert_eq!(parse_input("/theme"), Input::ToggleTheme);
    }

    #[test]
    fn malformed_commands_are_unknown() {
        assert_eq!(parse_input("/reply"), Input::Unknown("/reply".into()));
        assert_eq!(
            parse_input("/react 2 99"),
            Input::Unknown("/react 2 99".into())
        );
        assert_eq!(parse_input("/frob"), Input::Unknown("/frob".into()));
    }

    #[test]
    fn palette_accepts_index_or_glyph() {
        assert_eq!(palette_glyph("1"), Some("😀".to_string()));
        assert_eq!(palette_glyph("👍"), Some("👍".to_string()));
        assert_eq!(palette_glyph("0"), None);
        assert_eq!(palette_glyph("7"), None);
        assert_eq!(palette_glyph("x"), None);
    }
}
