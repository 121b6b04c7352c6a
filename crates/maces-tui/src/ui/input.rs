//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use maces_core::display::Section;

use crate::app::{
    can_add_credit_char, can_add_date_char, can_add_link_char, can_add_password_char,
    can_add_username_char, App, AppState, ClassFocus, CreditFocus, LoginFocus, ParkDateFocus,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    if matches!(app.state, AppState::EditingEventLink) {
        handle_event_link_input(app, key);
        return Ok(false);
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('e') {
        app.start_editing_event_link();
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Tab => {
            app.cycle_focus(true);
            return Ok(false);
        }
        KeyCode::BackTab => {
            app.cycle_focus(false);
            return Ok(false);
        }
        _ => {}
    }

    // Letters are typed into text fields, so these only apply elsewhere
    if !in_text_field(app) {
        match key.code {
            KeyCode::Char('?') => {
                app.state = AppState::ShowingHelp;
                return Ok(false);
            }
            KeyCode::Char('q') => {
                app.state = AppState::ConfirmingQuit;
                return Ok(false);
            }
            KeyCode::Char('e') => {
                app.start_editing_event_link();
                return Ok(false);
            }
            KeyCode::Char('o') if app.generated_url.is_some() => {
                app.open_generated_url();
                return Ok(false);
            }
            _ => {}
        }
    }

    if !app.visibility.is_visible(app.focus) {
        return Ok(false);
    }

    match app.focus {
        Section::LoginForm => handle_login_input(app, key).await,
        Section::ClassSection => handle_class_input(app, key).await,
        Section::ParkDateSelection => handle_park_date_input(app, key),
        Section::AdminOptions => handle_credit_input(app, key).await,
    }
    Ok(false)
}

/// Handle a bracketed paste, which only matters while typing a link or field
pub fn handle_paste(app: &mut App, text: &str) {
    if matches!(app.state, AppState::EditingEventLink) {
        for c in text.trim().chars() {
            if can_add_link_char(app.event_link_input.len(), c) {
                app.event_link_input.push(c);
            }
        }
        return;
    }
    if matches!(app.state, AppState::Normal) && app.focus == Section::LoginForm {
        for c in text.chars() {
            match app.login_focus {
                LoginFocus::Username if can_add_username_char(app.login_username.len(), c) => {
                    app.login_username.push(c)
                }
                LoginFocus::Password if can_add_password_char(app.login_password.len(), c) => {
                    app.login_password.push(c)
                }
                _ => {}
            }
        }
    }
}

/// Whether the focused widget takes typed characters
fn in_text_field(app: &App) -> bool {
    if !app.visibility.is_visible(app.focus) {
        return false;
    }
    match app.focus {
        Section::LoginForm => app.login_focus != LoginFocus::Button,
        Section::ParkDateSelection => app.park_date_focus == ParkDateFocus::Date,
        Section::AdminOptions => matches!(app.credit_focus, CreditFocus::Input(_)),
        Section::ClassSection => false,
    }
}

fn handle_event_link_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.event_link_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            let link = std::mem::take(&mut app.event_link_input);
            app.state = AppState::Normal;
            app.set_event_link(&link);
        }
        KeyCode::Backspace => {
            app.event_link_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_link_char(app.event_link_input.len(), c) {
                app.event_link_input.push(c);
            }
        }
        _ => {}
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => {
                app.login_focus = LoginFocus::Button;
                app.handle_login().await;
                if !app.session.is_logged_in() {
                    app.login_focus = LoginFocus::Password;
                }
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.len(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
}

async fn handle_class_input(app: &mut App, key: KeyEvent) {
    let last_class = app.classes.len().saturating_sub(1);

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => match app.class_focus {
            ClassFocus::Class => app.class_selection = app.class_selection.saturating_sub(1),
            ClassFocus::Attending => app.class_focus = ClassFocus::Class,
            ClassFocus::Button => app.class_focus = ClassFocus::Attending,
        },
        KeyCode::Down | KeyCode::Char('j') => match app.class_focus {
            ClassFocus::Class if app.class_selection < last_class => app.class_selection += 1,
            ClassFocus::Class => app.class_focus = ClassFocus::Attending,
            ClassFocus::Attending => app.class_focus = ClassFocus::Button,
            ClassFocus::Button => {}
        },
        KeyCode::Home => app.class_selection = 0,
        KeyCode::End => app.class_selection = last_class,
        KeyCode::Char(' ') => app.attending_in_person = !app.attending_in_person,
        KeyCode::Enter => match app.class_focus {
            ClassFocus::Class => app.class_focus = ClassFocus::Attending,
            ClassFocus::Attending => app.attending_in_person = !app.attending_in_person,
            ClassFocus::Button => app.submit_class().await,
        },
        _ => {}
    }
}

fn handle_park_date_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Down => {
            app.park_date_focus = match app.park_date_focus {
                ParkDateFocus::Date => ParkDateFocus::Button,
                ParkDateFocus::Button => ParkDateFocus::Date,
            };
        }
        KeyCode::Enter => match app.park_date_focus {
            ParkDateFocus::Date => app.park_date_focus = ParkDateFocus::Button,
            ParkDateFocus::Button => app.generate_url(),
        },
        KeyCode::Backspace if app.park_date_focus == ParkDateFocus::Date => {
            app.park_date.pop();
        }
        KeyCode::Char(c) if app.park_date_focus == ParkDateFocus::Date => {
            if can_add_date_char(app.park_date.len(), c) {
                app.park_date.push(c);
            }
        }
        _ => {}
    }
}

async fn handle_credit_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.credit_focus = app.credit_focus.prev(),
        KeyCode::Down => app.credit_focus = app.credit_focus.next(),
        KeyCode::Enter => match app.credit_focus {
            CreditFocus::Input(_) => app.credit_focus = app.credit_focus.next(),
            CreditFocus::Submit => app.submit_credits().await,
            CreditFocus::Preview => app.preview_attendance().await,
        },
        KeyCode::Backspace => {
            if let CreditFocus::Input(i) = app.credit_focus {
                if let Some(input) = app.credit_inputs.get_mut(i) {
                    input.pop();
                }
            }
        }
        KeyCode::Char(c) => {
            if let CreditFocus::Input(i) = app.credit_focus {
                if let Some(input) = app.credit_inputs.get_mut(i) {
                    // A lone zero is a placeholder, typing replaces it
                    if input == "0" {
                        input.clear();
                    }
                    if can_add_credit_char(input.len(), c) {
                        input.push(c);
                    }
                }
            }
        }
        _ => {}
    }
}
