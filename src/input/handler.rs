use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::editor::Mode;
use crate::shell::{OutputPanel, Shell, ShellAction};

/// Apply a terminal event to the shell. Editing happens in place;
/// anything that crosses a boundary comes back as an action.
pub fn handle_event(shell: &mut Shell, event: Event) -> Option<ShellAction> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(shell, key),
        // Resize is handled by the renderer
        _ => None,
    }
}

fn ctrl(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c) && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn handle_key(shell: &mut Shell, key: KeyEvent) -> Option<ShellAction> {
    if let Some(action) = global_action(&key) {
        return Some(action);
    }

    // Ctrl-G moves focus between the editor and the functions sidebar
    if ctrl(&key, 'g') {
        let editor = &mut shell.editor;
        if editor.mode == Mode::Functions {
            editor.mode = Mode::Normal;
        } else {
            editor.close_popups();
            editor.mode = Mode::Functions;
        }
        return None;
    }

    match shell.editor.mode {
        Mode::Normal => handle_normal_mode(shell, key),
        Mode::Insert => handle_insert_mode(shell, key),
        Mode::Command => handle_command_mode(shell, key),
        Mode::Functions => handle_functions_mode(shell, key),
    }
}

/// Toolbar shortcuts, available in every mode
fn global_action(key: &KeyEvent) -> Option<ShellAction> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('r') => Some(ShellAction::Run),
        KeyCode::Char('n') => Some(ShellAction::NewFile),
        KeyCode::Char('o') => Some(ShellAction::Open),
        KeyCode::Char('s') => Some(ShellAction::Save),
        KeyCode::Char('t') => Some(ShellAction::ToggleTheme),
        KeyCode::Char('c') | KeyCode::Char('q') => Some(ShellAction::Quit),
        _ => None,
    }
}

fn handle_normal_mode(shell: &mut Shell, key: KeyEvent) -> Option<ShellAction> {
    let editor = &mut shell.editor;
    match key.code {
        KeyCode::Esc => editor.close_popups(),

        // Basic movement
        KeyCode::Char('h') | KeyCode::Left => editor.move_left(),
        KeyCode::Char('j') | KeyCode::Down => editor.move_down(),
        KeyCode::Char('k') | KeyCode::Up => editor.move_up(),
        KeyCode::Char('l') | KeyCode::Right => editor.move_right(),

        // Line motions
        KeyCode::Char('0') | KeyCode::Home => editor.move_to_line_start(),
        KeyCode::Char('$') | KeyCode::End => editor.move_to_line_end(),
        KeyCode::Char('g') => editor.move_to_first_line(),
        KeyCode::Char('G') => editor.move_to_last_line(),

        // Insert mode entry
        KeyCode::Char('i') => editor.enter_insert_mode(),
        KeyCode::Char('A') => editor.append_end_of_line(),
        KeyCode::Char('o') => editor.open_line_below(),

        // Documentation for the word under the cursor
        KeyCode::Char('K') => {
            editor.show_hover(&shell.registry);
        }

        KeyCode::Char(':') => editor.enter_command_mode(),

        _ => {}
    }
    None
}

fn handle_insert_mode(shell: &mut Shell, key: KeyEvent) -> Option<ShellAction> {
    let editor = &mut shell.editor;

    if let Some(popup) = editor.completion.as_mut() {
        match key.code {
            KeyCode::Up => {
                popup.select_prev();
                return None;
            }
            KeyCode::Down => {
                popup.select_next();
                return None;
            }
            KeyCode::Enter | KeyCode::Tab => {
                editor.accept_completion();
                return None;
            }
            KeyCode::Esc => {
                editor.completion = None;
                return None;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Esc => editor.enter_normal_mode(),

        KeyCode::Char(' ') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            editor.trigger_completion(&shell.registry);
        }
        KeyCode::Tab => {
            editor.trigger_completion(&shell.registry);
        }

        KeyCode::Char(c) => {
            editor.insert_char(c);
            refresh_completion(shell);
        }

        KeyCode::Backspace => {
            editor.delete_char_backward();
            refresh_completion(shell);
        }

        KeyCode::Enter => editor.insert_newline(),

        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Up => editor.move_up(),
        KeyCode::Down => editor.move_down(),

        _ => {}
    }
    None
}

/// Re-filter an open completion list after the prefix changed
fn refresh_completion(shell: &mut Shell) {
    if shell.editor.completion.is_some() {
        shell.editor.trigger_completion(&shell.registry);
    }
}

fn handle_command_mode(shell: &mut Shell, key: KeyEvent) -> Option<ShellAction> {
    let editor = &mut shell.editor;
    match key.code {
        KeyCode::Esc => editor.enter_normal_mode(),

        KeyCode::Enter => {
            let command = editor.command_buffer.trim().to_string();
            editor.enter_normal_mode();
            return match parse_command(&command) {
                Ok(action) => action,
                Err(unknown) => {
                    shell.output = OutputPanel::Notice(format!("Unknown command: {}", unknown));
                    None
                }
            };
        }

        KeyCode::Backspace => {
            editor.command_buffer.pop();
            if editor.command_buffer.is_empty() {
                editor.enter_normal_mode();
            }
        }

        KeyCode::Char(c) => editor.command_buffer.push(c),

        _ => {}
    }
    None
}

fn handle_functions_mode(shell: &mut Shell, key: KeyEvent) -> Option<ShellAction> {
    match key.code {
        KeyCode::Esc => shell.editor.mode = Mode::Normal,
        KeyCode::Char('j') | KeyCode::Down => shell.functions.select_next(),
        KeyCode::Char('k') | KeyCode::Up => shell.functions.select_prev(),
        KeyCode::Enter => {
            shell.editor.mode = Mode::Insert;
            return Some(ShellAction::InsertFunction);
        }
        _ => {}
    }
    None
}

/// `:` commands. `Ok(None)` for an empty line, `Err` echoes an unknown command.
pub fn parse_command(command: &str) -> Result<Option<ShellAction>, String> {
    let action = match command {
        "" => return Ok(None),
        "q" | "quit" => ShellAction::Quit,
        "w" | "write" => ShellAction::Save,
        "saveas" | "sav" => ShellAction::SaveAs,
        "e" | "edit" | "open" => ShellAction::Open,
        "new" | "enew" => ShellAction::NewFile,
        "run" | "r" => ShellAction::Run,
        "theme" => ShellAction::ToggleTheme,
        other => return Err(other.to_string()),
    };
    Ok(Some(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeClient;
    use crate::language::{LanguageRegistry, dsl};
    use crate::service::{Executor, FunctionDirectory, RunResult, ServiceError};
    use crate::shell::{FunctionPanel, Services};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Offline;

    #[async_trait]
    impl Executor for Offline {
        async fn run(&self, _code: &str) -> RunResult {
            Err(ServiceError::Malformed("offline".into()))
        }
    }

    #[async_trait]
    impl FunctionDirectory for Offline {
        async fn list_functions(&self) -> Result<Vec<String>, ServiceError> {
            Ok(Vec::new())
        }
    }

    fn shell() -> Shell {
        let mut registry = LanguageRegistry::new();
        dsl::register(&mut registry).unwrap();
        let (bridge, _calls) = BridgeClient::channel(1);
        let services = Services {
            executor: Arc::new(Offline),
            directory: Arc::new(Offline),
            bridge,
        };
        let (mut shell, _events) = Shell::new(services, registry, crate::theme::DARK);
        shell.editor.set_document("", None, Some(dsl::LANGUAGE_ID.to_string()));
        shell
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl_key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_str(shell: &mut Shell, s: &str) {
        for c in s.chars() {
            handle_event(shell, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn toolbar_shortcuts_become_actions() {
        let mut shell = shell();
        assert_eq!(handle_event(&mut shell, ctrl_key('r')), Some(ShellAction::Run));
        assert_eq!(handle_event(&mut shell, ctrl_key('s')), Some(ShellAction::Save));
        assert_eq!(handle_event(&mut shell, ctrl_key('o')), Some(ShellAction::Open));
        assert_eq!(handle_event(&mut shell, ctrl_key('n')), Some(ShellAction::NewFile));
        assert_eq!(handle_event(&mut shell, ctrl_key('t')), Some(ShellAction::ToggleTheme));
    }

    #[test]
    fn typing_in_insert_mode_edits_buffer() {
        let mut shell = shell();
        handle_event(&mut shell, key(KeyCode::Char('i')));
        type_str(&mut shell, "add 5 6");
        handle_event(&mut shell, key(KeyCode::Esc));
        assert_eq!(shell.editor.text(), "add 5 6");
        assert_eq!(shell.editor.mode, Mode::Normal);
    }

    #[test]
    fn tab_completes_keyword() {
        let mut shell = shell();
        handle_event(&mut shell, key(KeyCode::Char('i')));
        type_str(&mut shell, "upp");
        handle_event(&mut shell, key(KeyCode::Tab));
        assert!(shell.editor.completion.is_some());
        handle_event(&mut shell, key(KeyCode::Enter));
        assert_eq!(shell.editor.text(), "uppercase ");
    }

    #[test]
    fn typing_refilters_open_completion() {
        let mut shell = shell();
        handle_event(&mut shell, key(KeyCode::Char('i')));
        handle_event(
            &mut shell,
            Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::CONTROL)),
        );
        assert_eq!(shell.editor.completion.as_ref().map(|p| p.items.len()), Some(6));

        type_str(&mut shell, "ge");
        let labels: Vec<String> = shell
            .editor
            .completion
            .as_ref()
            .unwrap()
            .items
            .iter()
            .map(|i| i.label.clone())
            .collect();
        assert_eq!(labels, ["get"]);
    }

    #[test]
    fn shift_k_shows_hover() {
        let mut shell = shell();
        shell.editor.set_document("repeat hi 3", None, Some(dsl::LANGUAGE_ID.to_string()));
        handle_event(&mut shell, key(KeyCode::Char('K')));
        assert!(shell.editor.hover.is_some());
    }

    #[test]
    fn command_line_maps_to_actions() {
        let mut shell = shell();
        handle_event(&mut shell, key(KeyCode::Char(':')));
        type_str(&mut shell, "saveas");
        assert_eq!(
            handle_event(&mut shell, key(KeyCode::Enter)),
            Some(ShellAction::SaveAs)
        );
        assert_eq!(shell.editor.mode, Mode::Normal);
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut shell = shell();
        handle_event(&mut shell, key(KeyCode::Char(':')));
        type_str(&mut shell, "bogus");
        assert_eq!(handle_event(&mut shell, key(KeyCode::Enter)), None);
        assert_eq!(shell.output.text(), "Unknown command: bogus");
    }

    #[test]
    fn functions_sidebar_selects_and_inserts() {
        let mut shell = shell();
        shell.functions = FunctionPanel::loaded(vec!["greet".into(), "sum".into()]);

        handle_event(&mut shell, ctrl_key('g'));
        assert_eq!(shell.editor.mode, Mode::Functions);
        handle_event(&mut shell, key(KeyCode::Char('j')));
        assert_eq!(shell.functions.selected_name(), Some("sum"));
        assert_eq!(
            handle_event(&mut shell, key(KeyCode::Enter)),
            Some(ShellAction::InsertFunction)
        );
    }

    #[test]
    fn parse_command_table() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("q"), Ok(Some(ShellAction::Quit)));
        assert_eq!(parse_command("w"), Ok(Some(ShellAction::Save)));
        assert_eq!(parse_command("run"), Ok(Some(ShellAction::Run)));
        assert_eq!(parse_command("x"), Err("x".to_string()));
    }
}
