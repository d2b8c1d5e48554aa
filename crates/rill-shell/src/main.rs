//! rill shell: composes the session provider with the channel controller
//! behind a sign-in gate, over an in-process identity backend and store.

mod display;
mod shell;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::watch;

use rill_channel::ChannelController;
use rill_session::{IdentityBackend, LocalIdentity, SessionProvider, SessionState};
use rill_store::MemoryStore;
use rill_types::{ReportSink, TracingSink, UserIdentity};

use display::Theme;
use shell::{Input, Surface, parse_input, surface_for};

enum Flow {
    Continue,
    Quit,
}

enum Event {
    Update(bool),
    Session(bool),
    Line(Option<String>),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rill=info".into()),
        )
        .init();

    // Config
    let display_name =
        std::env::var("RILL_DISPLAY_NAME").unwrap_or_else(|_| "Anonymous".into());
    let avatar_url = std::env::var("RILL_AVATAR_URL").unwrap_or_default();

    // Collaborators are constructed here and passed down; nothing is global.
    let sink: Arc<dyn ReportSink> = Arc::new(TracingSink);
    let backend = Arc::new(match std::env::var("RILL_USER_ID") {
        Ok(id) => LocalIdentity::new(UserIdentity {
            id,
            display_name,
            avatar_url,
        }),
        Err(_) => LocalIdentity::with_profile(&display_name, &avatar_url),
    });
    let session = SessionProvider::new(backend.clone(), sink.clone());
    let mut state_rx = backend.watch();
    let store = Arc::new(MemoryStore::new(sink.clone()));

    display::print_banner();
    backend.start();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut theme = Theme::default();

    loop {
        match surface_for(&session.state()) {
            Surface::Loading => {
                display::print_loading();
                if state_rx.changed().await.is_err() {
                    break;
                }
            }
            Surface::SignIn => {
                display::print_nav(None, theme);
                display::print_sign_in_gate();
                if let Flow::Quit = gate_loop(&session, &mut state_rx, &mut lines).await? {
                    break;
                }
            }
            Surface::Channel => {
                let user = session.current_user();
                let name = user
                    .as_ref()
                    .map(|u| u.display_name.clone())
                    .unwrap_or_default();
                display::print_nav(Some(&name), theme);

                let mut controller =
                    ChannelController::mount(store.clone(), user, sink.clone()).await;
                let flow =
                    channel_loop(&mut controller, &session, &mut state_rx, &mut lines, &mut theme)
                        .await?;
                controller.unmount();
                if let Flow::Quit = flow {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Unauthenticated surface: only the sign-in call to action works.
async fn gate_loop(
    session: &SessionProvider<LocalIdentity>,
    state_rx: &mut watch::Receiver<SessionState>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<Flow> {
    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                return Ok(if changed.is_ok() { Flow::Continue } else { Flow::Quit });
            }
            line = lines.next_line() => {
                let Some(line) = line? else { return Ok(Flow::Quit) };
                match parse_input(&line) {
                    Input::SignIn => session.sign_in().await,
                    Input::Quit => return Ok(Flow::Quit),
                    Input::Help => display::print_sign_in_gate(),
                    _ => display::print_info("not signed in — /signin to join the channel"),
                }
            }
        }
    }
}

/// Authenticated surface: live message list plus the composer.
async fn channel_loop(
    controller: &mut ChannelController<MemoryStore>,
    session: &SessionProvider<LocalIdentity>,
    state_rx: &mut watch::Receiver<SessionState>,
    lines: &mut Lines<BufReader<Stdin>>,
    theme: &mut Theme,
) -> Result<Flow> {
    display::print_channel_help();

    loop {
        let event = tokio::select! {
            live = controller.next_update() => Event::Update(live),
            changed = state_rx.changed() => Event::Session(changed.is_ok()),
            line = lines.next_line() => Event::Line(line?),
        };

        match event {
            // Auto-scroll: every update re-renders with the newest entry
            // at the bottom.
            Event::Update(true) => display::render_channel(controller.state(), *theme),
            Event::Update(false) => return Ok(Flow::Continue),
            Event::Session(false) => return Ok(Flow::Quit),
            Event::Session(true) => {
                if session.current_user().is_none() {
                    // Signed out: the caller unmounts and shows the gate.
                    return Ok(Flow::Continue);
                }
            }
            Event::Line(None) => return Ok(Flow::Quit),
            Event::Line(Some(line)) => {
                if let Flow::Quit =
                    handle_channel_input(controller, session, theme, &line).await
                {
                    return Ok(Flow::Quit);
                }
            }
        }
    }
}

async fn handle_channel_input(
    controller: &mut ChannelController<MemoryStore>,
    session: &SessionProvider<LocalIdentity>,
    theme: &mut Theme,
    line: &str,
) -> Flow {
    match parse_input(line) {
        Input::Text(text) => {
            controller.set_draft(text);
            // Outcomes are deliberately invisible: a failed or guarded
            // submit leaves the draft as it was.
            let _ = controller.submit().await;
        }
        Input::Send => {
            let _ = controller.submit().await;
        }
        Input::SignIn => display::print_info("already signed in"),
        Input::SignOut => session.sign_out().await,
        Input::Reply(n) => {
            let target = n
                .checked_sub(1)
                .and_then(|i| controller.state().messages.get(i))
                .map(|m| (m.id.clone(), m.text.clone()));
            match target {
                Some((id, text)) => {
                    display::print_info(&format!("replying to: {}", text));
                    controller.begin_reply(id, text);
                }
                None => display::print_info("no such message"),
            }
        }
        Input::CancelReply => controller.cancel_reply(),
        Input::React(n, glyph) => {
            let target = n
                .checked_sub(1)
                .and_then(|i| controller.state().messages.get(i))
                .map(|m| m.id.clone());
            match target {
                Some(id) => controller.select_reaction(id, &glyph),
                None => display::print_info("no such message"),
            }
        }
        Input::TogglePicker => {
            controller.toggle_emoji_picker();
            if controller.state().emoji_picker_open {
                display::print_palette();
            }
        }
        Input::Emoji(glyph) => {
            controller.insert_emoji(&glyph);
            display::print_info(&format!("draft: {}", controller.draft()));
        }
        Input::ToggleTheme => {
            *theme = theme.toggled();
            display::render_channel(controller.state(), *theme);
        }
        Input::Help => display::print_channel_help(),
        Input::Quit => return Flow::Quit,
        Input::Unknown(command) => display::print_info(&format!("unrecognized: {}", command)),
    }
    Flow::Continue
}
