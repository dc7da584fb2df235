//! Keyboard input handling for the TUI.
//!
//! This module translates keyboard events into application state changes.
//! Overlay states (login, register, help, quit confirmation) are handled
//! before per-screen keys; screens with an open text input consume
//! character keys before global shortcuts apply.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use taskdeck_core::models::Plan;
use taskdeck_core::validate;

use crate::app::{
    can_push_char, App, AppState, LoginFocus, MembersFocus, ProjectsFocus, RegisterFocus,
    Screen, TasksFocus,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::LoggingIn => return handle_login_input(app, key).await,
        AppState::Registering => return handle_register_input(app, key).await,
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
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
        AppState::Quitting => return Ok(true),
        AppState::Normal => {}
    }

    // Screens with an open text input get the raw key stream
    if in_text_entry(app) {
        return handle_screen_input(app, key).await;
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('L') => {
            app.logout();
            return Ok(false);
        }
        KeyCode::Char('u') => {
            match app.screen {
                Screen::Projects | Screen::Subscription => app.refresh_dashboard_background(),
                Screen::Tasks => {
                    if let Some((id, _)) = app.active_project {
                        app.refresh_tasks_background(id);
                    }
                }
                Screen::Members => {
                    if let Some((id, _)) = app.active_project {
                        app.refresh_members_background(id);
                    }
                }
            }
            return Ok(false);
        }
        _ => {}
    }

    handle_screen_input(app, key).await
}

/// Whether the current screen has a text input focused
fn in_text_entry(app: &App) -> bool {
    match app.screen {
        Screen::Projects => app.projects_focus != ProjectsFocus::List,
        Screen::Tasks => app.tasks_focus != TasksFocus::List,
        Screen::Members => app.members_focus == MembersFocus::Search,
        Screen::Subscription => false,
    }
}

fn push_char(field: &mut String, c: char) {
    if can_push_char(field) {
        field.push(c);
    }
}

// ============================================================================
// Login / Register overlays
// ============================================================================

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Ctrl+R switches to the register form
    if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.start_register();
        return Ok(false);
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            validate_login_field(app);
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            validate_login_field(app);
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => {
                validate_login_field(app);
                app.login_focus = LoginFocus::Password;
            }
            LoginFocus::Password | LoginFocus::Button => {
                let _ = app.attempt_login().await;
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
                app.login_email_error = None;
            }
            LoginFocus::Password => {
                app.login_password.pop();
                app.login_password_error = None;
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                push_char(&mut app.login_email, c);
                app.login_email_error = None;
            }
            LoginFocus::Password => {
                push_char(&mut app.login_password, c);
                app.login_password_error = None;
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

/// Validate the login field that currently has focus
fn validate_login_field(app: &mut App) {
    match app.login_focus {
        LoginFocus::Email => {
            app.login_email_error = validate::validate_email(app.login_email.trim());
        }
        LoginFocus::Password => {
            app.login_password_error = validate::validate_password(&app.login_password);
        }
        LoginFocus::Button => {}
    }
}

async fn handle_register_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.start_login();
        }
        KeyCode::Tab | KeyCode::Down => {
            validate_register_field(app);
            app.reg_focus = match app.reg_focus {
                RegisterFocus::Username => RegisterFocus::Email,
                RegisterFocus::Email => RegisterFocus::Password,
                RegisterFocus::Password => RegisterFocus::Button,
                RegisterFocus::Button => RegisterFocus::Username,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            validate_register_field(app);
            app.reg_focus = match app.reg_focus {
                RegisterFocus::Username => RegisterFocus::Button,
                RegisterFocus::Email => RegisterFocus::Username,
                RegisterFocus::Password => RegisterFocus::Email,
                RegisterFocus::Button => RegisterFocus::Password,
            };
        }
        KeyCode::Enter => match app.reg_focus {
            RegisterFocus::Username => {
                validate_register_field(app);
                app.reg_focus = RegisterFocus::Email;
            }
            RegisterFocus::Email => {
                validate_register_field(app);
                app.reg_focus = RegisterFocus::Password;
            }
            RegisterFocus::Password | RegisterFocus::Button => {
                let _ = app.attempt_register().await;
            }
        },
        KeyCode::Backspace => match app.reg_focus {
            RegisterFocus::Username => {
                app.reg_username.pop();
                app.reg_username_error = None;
            }
            RegisterFocus::Email => {
                app.reg_email.pop();
                app.reg_email_error = None;
            }
            RegisterFocus::Password => {
                app.reg_password.pop();
                app.reg_password_error = None;
            }
            RegisterFocus::Button => {}
        },
        KeyCode::Char(c) => match app.reg_focus {
            RegisterFocus::Username => {
                push_char(&mut app.reg_username, c);
                app.reg_username_error = None;
            }
            RegisterFocus::Email => {
                push_char(&mut app.reg_email, c);
                app.reg_email_error = None;
            }
            RegisterFocus::Password => {
                push_char(&mut app.reg_password, c);
                app.reg_password_error = None;
            }
            RegisterFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

/// Validate the register field that currently has focus
fn validate_register_field(app: &mut App) {
    match app.reg_focus {
        RegisterFocus::Username => {
            app.reg_username_error = validate::validate_username(app.reg_username.trim());
        }
        RegisterFocus::Email => {
            app.reg_email_error = validate::validate_email(app.reg_email.trim());
        }
        RegisterFocus::Password => {
            app.reg_password_error = validate::validate_password(&app.reg_password);
        }
        RegisterFocus::Button => {}
    }
}

// ============================================================================
// Main screens
// ============================================================================

async fn handle_screen_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.screen {
        Screen::Projects => handle_projects_input(app, key).await,
        Screen::Tasks => handle_tasks_input(app, key).await,
        Screen::Members => handle_members_input(app, key).await,
        Screen::Subscription => handle_subscription_input(app, key).await,
    }
    Ok(false)
}

async fn handle_projects_input(app: &mut App, key: KeyEvent) {
    match app.projects_focus {
        ProjectsFocus::List => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                app.project_selection = app.project_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.project_selection + 1 < app.projects.len() {
                    app.project_selection += 1;
                }
            }
            KeyCode::Enter => app.open_tasks(),
            KeyCode::Char('i') => app.open_members(),
            KeyCode::Char('s') => {
                app.screen = Screen::Subscription;
            }
            KeyCode::Char('n') => {
                if app.is_subscribed() {
                    app.projects_focus = ProjectsFocus::FormTitle;
                } else {
                    app.status_message = Some(
                        "An active subscription is required to create projects.".to_string(),
                    );
                }
            }
            KeyCode::Char('d') => app.delete_selected_project().await,
            _ => {}
        },
        ProjectsFocus::FormTitle | ProjectsFocus::FormDescription => match key.code {
            KeyCode::Esc => {
                app.new_project_title.clear();
                app.new_project_description.clear();
                app.projects_focus = ProjectsFocus::List;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                app.projects_focus = match app.projects_focus {
                    ProjectsFocus::FormTitle => ProjectsFocus::FormDescription,
                    _ => ProjectsFocus::FormTitle,
                };
            }
            KeyCode::Enter => app.create_project().await,
            KeyCode::Backspace => {
                match app.projects_focus {
                    ProjectsFocus::FormTitle => app.new_project_title.pop(),
                    _ => app.new_project_description.pop(),
                };
            }
            KeyCode::Char(c) => match app.projects_focus {
                ProjectsFocus::FormTitle => push_char(&mut app.new_project_title, c),
                _ => push_char(&mut app.new_project_description, c),
            },
            _ => {}
        },
    }
}

async fn handle_tasks_input(app: &mut App, key: KeyEvent) {
    match app.tasks_focus {
        TasksFocus::List => match key.code {
            KeyCode::Esc => app.back_to_projects(),
            KeyCode::Up | KeyCode::Char('k') => {
                app.task_selection = app.task_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.task_selection + 1 < app.tasks.len() {
                    app.task_selection += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected_task().await,
            KeyCode::Char('a') => {
                app.tasks_focus = TasksFocus::FormTitle;
            }
            KeyCode::Char('d') => app.delete_selected_task().await,
            _ => {}
        },
        TasksFocus::FormTitle | TasksFocus::FormDescription => match key.code {
            KeyCode::Esc => {
                app.new_task_title.clear();
                app.new_task_description.clear();
                app.tasks_focus = TasksFocus::List;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                app.tasks_focus = match app.tasks_focus {
                    TasksFocus::FormTitle => TasksFocus::FormDescription,
                    _ => TasksFocus::FormTitle,
                };
            }
            KeyCode::Enter => app.create_task().await,
            KeyCode::Backspace => {
                match app.tasks_focus {
                    TasksFocus::FormTitle => app.new_task_title.pop(),
                    _ => app.new_task_description.pop(),
                };
            }
            KeyCode::Char(c) => match app.tasks_focus {
                TasksFocus::FormTitle => push_char(&mut app.new_task_title, c),
                _ => push_char(&mut app.new_task_description, c),
            },
            _ => {}
        },
    }
}

async fn handle_members_input(app: &mut App, key: KeyEvent) {
    match app.members_focus {
        MembersFocus::Search => match key.code {
            KeyCode::Esc => app.back_to_projects(),
            KeyCode::Tab => app.members_focus = MembersFocus::Results,
            KeyCode::Enter => app.search_members().await,
            KeyCode::Backspace => {
                app.member_search_query.pop();
            }
            KeyCode::Char(c) => push_char(&mut app.member_search_query, c),
            _ => {}
        },
        MembersFocus::Results => match key.code {
            KeyCode::Esc => app.members_focus = MembersFocus::Search,
            KeyCode::Tab => app.members_focus = MembersFocus::Participants,
            KeyCode::Up | KeyCode::Char('k') => {
                app.member_selection = app.member_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.member_selection + 1 < app.member_results.len() {
                    app.member_selection += 1;
                }
            }
            KeyCode::Enter => app.invite_selected_user().await,
            _ => {}
        },
        MembersFocus::Participants => match key.code {
            KeyCode::Esc => app.members_focus = MembersFocus::Search,
            KeyCode::Tab => app.members_focus = MembersFocus::Search,
            KeyCode::Up | KeyCode::Char('k') => {
                app.participant_selection = app.participant_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.participant_selection + 1 < app.members.len() {
                    app.participant_selection += 1;
                }
            }
            KeyCode::Char('r') | KeyCode::Delete => app.remove_selected_member().await,
            _ => {}
        },
    }
}

async fn handle_subscription_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.back_to_projects(),
        KeyCode::Up | KeyCode::Down | KeyCode::Char('m') | KeyCode::Char('y') => {
            app.selected_plan = match key.code {
                KeyCode::Char('m') => Plan::Monthly,
                KeyCode::Char('y') => Plan::Yearly,
                _ => app.selected_plan.toggle(),
            };
        }
        KeyCode::Enter => {
            if !app.is_subscribed() {
                app.subscribe().await;
            }
        }
        KeyCode::Char('c') => {
            if app.is_subscribed() {
                app.unsubscribe().await;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn test_app() -> App {
        // App::new touches only local config/data paths
        App::new().expect("app construction")
    }

    #[tokio::test]
    async fn quit_requires_confirmation() {
        let mut app = test_app();
        app.state = AppState::Normal;

        let quit = handle_input(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        assert!(!quit);
        assert_eq!(app.state, AppState::ConfirmingQuit);

        let quit = handle_input(&mut app, key(KeyCode::Char('n'))).await.unwrap();
        assert!(!quit);
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        let quit = handle_input(&mut app, key(KeyCode::Char('y'))).await.unwrap();
        assert!(quit);
    }

    #[tokio::test]
    async fn login_form_collects_input_and_validates_on_blur() {
        let mut app = test_app();
        app.state = AppState::LoggingIn;
        app.login_email.clear();
        app.login_password.clear();
        app.login_focus = LoginFocus::Email;

        for c in "bad-email".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        assert_eq!(app.login_email, "bad-email");

        // leaving the field surfaces the inline error
        handle_input(&mut app, key(KeyCode::Tab)).await.unwrap();
        assert!(app.login_email_error.is_some());
        assert_eq!(app.login_focus, LoginFocus::Password);

        // editing the field clears it again
        app.login_focus = LoginFocus::Email;
        handle_input(&mut app, key(KeyCode::Backspace)).await.unwrap();
        assert!(app.login_email_error.is_none());
    }

    #[tokio::test]
    async fn register_overlay_is_reachable_from_login() {
        let mut app = test_app();
        app.state = AppState::LoggingIn;

        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        handle_input(&mut app, ctrl_r).await.unwrap();
        assert_eq!(app.state, AppState::Registering);

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state, AppState::LoggingIn);
    }

    #[tokio::test]
    async fn project_form_keys_are_not_global_shortcuts() {
        let mut app = test_app();
        app.state = AppState::Normal;
        app.screen = Screen::Projects;
        app.projects_focus = ProjectsFocus::FormTitle;

        // 'q' lands in the form instead of opening the quit prompt
        let quit = handle_input(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        assert!(!quit);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.new_project_title, "q");

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.projects_focus, ProjectsFocus::List);
        assert!(app.new_project_title.is_empty());
    }

    #[tokio::test]
    async fn subscription_plan_selection() {
        let mut app = test_app();
        app.state = AppState::Normal;
        app.screen = Screen::Subscription;

        assert_eq!(app.selected_plan, Plan::Monthly);
        handle_input(&mut app, key(KeyCode::Char('y'))).await.unwrap();
        assert_eq!(app.selected_plan, Plan::Yearly);
        handle_input(&mut app, key(KeyCode::Down)).await.unwrap();
        assert_eq!(app.selected_plan, Plan::Monthly);
    }
}
