use std::io;
use std::sync::Arc;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;

mod bridge;
mod config;
mod editor;
mod input;
mod knowledge;
mod language;
mod logging;
mod render;
mod scripting;
mod service;
mod shell;
mod syntax;
mod theme;

use bridge::FzfDialogs;
use language::{LanguageRegistry, dsl};
use render::{Renderer, ViewOptions};
use scripting::ScriptEngine;
use service::ServiceClient;
use shell::{OutputPanel, Services, Shell, ShellAction};

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    // Config first; the log level comes from it
    let mut script = ScriptEngine::new();
    let config_result = script.load_default();
    let settings = script.settings().with_env_overrides();

    if let Some(dir) = ScriptEngine::config_dir() {
        if let Err(e) = logging::init(&dir, settings.log_level) {
            eprintln!("logging disabled: {}", e);
        }
    }
    if let Err(e) = &config_result {
        tracing::warn!(error = %e, "config not applied, using defaults");
    }
    tracing::info!(service = %settings.service_url, "starting ocide");

    let mut registry = LanguageRegistry::new();
    dsl::register(&mut registry).map_err(io::Error::other)?;

    let client = Arc::new(
        ServiceClient::new(&settings.service_url, settings.run_timeout())
            .map_err(io::Error::other)?,
    );
    let services = Services {
        executor: client.clone(),
        directory: client.clone(),
        bridge: bridge::host::spawn(FzfDialogs::in_current_dir()),
    };

    let (mut shell, mut shell_events) = Shell::new(services, registry, &settings.theme);
    if let Err(e) = config_result {
        shell.output = OutputPanel::Error(e.to_string());
    }
    shell.load_functions();

    let pinger = Arc::clone(&client);
    let mut ping = tokio::spawn(async move { pinger.ping().await });
    let mut pinged = false;

    // Set up terminal
    Renderer::setup()?;
    let mut renderer = Renderer::new(ViewOptions::from(&settings))?;
    draw(&mut shell, &renderer)?;

    // Event stream for async key reading
    let mut event_stream = EventStream::new();

    while shell.is_running() {
        tokio::select! {
            maybe_event = event_stream.next() => match maybe_event {
                Some(Ok(Event::Resize(width, height))) => renderer.resize(width, height),
                Some(Ok(event)) => {
                    if let Some(action) = input::handle_event(&mut shell, event) {
                        if perform(&mut shell, action).await? {
                            // The picker owned the tty; start reading afresh
                            event_stream = EventStream::new();
                        }
                    }
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "terminal input failed");
                    break;
                }
                None => break,
            },
            Some(event) = shell_events.recv() => shell.handle_event(event),
            joined = &mut ping, if !pinged => {
                pinged = true;
                match joined {
                    Ok(result) => shell.apply_ping(client.base_url(), result),
                    Err(e) => tracing::warn!(error = %e, "health check task failed"),
                }
            }
        }
        draw(&mut shell, &renderer)?;
    }

    // Cleanup
    Renderer::teardown()?;
    tracing::info!("ocide stopped");

    Ok(())
}

/// Run a shell action, handing the terminal over when it may show a picker.
/// Returns whether the terminal was suspended.
async fn perform(shell: &mut Shell, action: ShellAction) -> io::Result<bool> {
    if !shell.needs_terminal(action) {
        shell.perform(action).await;
        return Ok(false);
    }

    Renderer::suspend()?;
    shell.perform(action).await;
    Renderer::resume()?;
    Ok(true)
}

fn draw(shell: &mut Shell, renderer: &Renderer) -> io::Result<()> {
    shell.editor.adjust_scroll(renderer.editor_height());
    renderer.render(shell)
}
