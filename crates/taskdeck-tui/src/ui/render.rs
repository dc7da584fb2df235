//! Frame rendering for the taskdeck TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus, RegisterFocus, Screen};

use super::screens::{members, projects, subscription, tasks};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::Registering => render_register_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  taskdeck - {}", app.screen.title());
    let right = match app.session.user() {
        Some(user) => {
            let badge = if app.is_subscribed() {
                "subscribed"
            } else {
                "free"
            };
            format!("{} ({})  [?] Help", user, badge)
        }
        None => "not signed in  [?] Help".to_string(),
    };

    let padding = (area.width as usize)
        .saturating_sub(title.len())
        .saturating_sub(right.len())
        .saturating_sub(2);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.screen {
        Screen::Projects => projects::render(frame, app, area),
        Screen::Tasks => tasks::render(frame, app, area),
        Screen::Members => members::render(frame, app, area),
        Screen::Subscription => subscription::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.screen {
        Screen::Projects => "[enter] tasks | [i]nvite | [n]ew | [d]elete | [s]ubscription | [q]uit",
        Screen::Tasks => "[space] toggle | [a]dd | [d]elete | [esc] back | [q]uit",
        Screen::Members => "[tab] switch pane | [enter] search/invite | [r]emove | [esc] back",
        Screen::Subscription => "[m]/[y] plan | [enter] subscribe | [c]ancel | [esc] back",
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        String::from(" ")
    };
    let right_text = format!(" {} ", shortcuts);

    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::highlight_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

// ============================================================================
// Overlays
// ============================================================================

/// Render a labelled single-line input with optional inline error.
/// Password fields are masked.
fn form_field_lines<'a>(
    label: &'a str,
    value: &'a str,
    focused: bool,
    masked: bool,
    error: Option<&'a str>,
) -> Vec<Line<'a>> {
    let marker = if focused { "> " } else { "  " };
    let shown = if masked {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "_" } else { "" };

    let mut lines = vec![Line::from(vec![
        Span::styled(marker, styles::highlight_style()),
        Span::styled(format!("{:<10}", label), styles::muted_style()),
        Span::raw(shown),
        Span::styled(cursor, styles::highlight_style()),
    ])];

    if let Some(err) = error {
        lines.push(Line::from(Span::styled(
            format!("            {}", err),
            styles::error_style(),
        )));
    }
    lines
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(56, 14, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];

    if let Some(ref notice) = app.login_notice {
        lines.push(Line::from(Span::styled(
            format!("  {}", notice),
            styles::success_style(),
        )));
        lines.push(Line::from(""));
    }
    if let Some(ref err) = app.login_error {
        lines.push(Line::from(Span::styled(
            format!("  {}", err),
            styles::error_style(),
        )));
        lines.push(Line::from(""));
    }

    lines.extend(form_field_lines(
        "Email",
        &app.login_email,
        app.login_focus == LoginFocus::Email,
        false,
        app.login_email_error.as_deref(),
    ));
    lines.extend(form_field_lines(
        "Password",
        &app.login_password,
        app.login_focus == LoginFocus::Password,
        true,
        app.login_password_error.as_deref(),
    ));

    lines.push(Line::from(""));
    let button = if app.login_focus == LoginFocus::Button {
        Span::styled("  [ Login ]", styles::title_style())
    } else {
        Span::styled("  [ Login ]", styles::muted_style())
    };
    lines.push(Line::from(button));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  No account? Ctrl+R to register",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(" Sign in ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_register_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(56, 15, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];

    if let Some(ref err) = app.reg_error {
        lines.push(Line::from(Span::styled(
            format!("  {}", err),
            styles::error_style(),
        )));
        lines.push(Line::from(""));
    }

    lines.extend(form_field_lines(
        "Username",
        &app.reg_username,
        app.reg_focus == RegisterFocus::Username,
        false,
        app.reg_username_error.as_deref(),
    ));
    lines.extend(form_field_lines(
        "Email",
        &app.reg_email,
        app.reg_focus == RegisterFocus::Email,
        false,
        app.reg_email_error.as_deref(),
    ));
    lines.extend(form_field_lines(
        "Password",
        &app.reg_password,
        app.reg_focus == RegisterFocus::Password,
        true,
        app.reg_password_error.as_deref(),
    ));

    lines.push(Line::from(""));
    let button = if app.reg_focus == RegisterFocus::Button {
        Span::styled("  [ Register ]", styles::title_style())
    } else {
        Span::styled("  [ Register ]", styles::muted_style())
    };
    lines.push(Line::from(button));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Esc to return to login",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(" Create account ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 20, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = styles::help_key_style;
    let desc = styles::help_desc_style;

    let help_text = vec![
        Line::from(Span::styled("  taskdeck", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Projects", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  Enter     ", key()),
            Span::styled("Open tasks for project", desc()),
        ]),
        Line::from(vec![
            Span::styled("  n         ", key()),
            Span::styled("New project (subscribers)", desc()),
        ]),
        Line::from(vec![
            Span::styled("  i         ", key()),
            Span::styled("Invite / manage members", desc()),
        ]),
        Line::from(vec![
            Span::styled("  d         ", key()),
            Span::styled("Delete project", desc()),
        ]),
        Line::from(vec![
            Span::styled("  s         ", key()),
            Span::styled("Subscription management", desc()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Global", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  u         ", key()),
            Span::styled("Refresh data", desc()),
        ]),
        Line::from(vec![
            Span::styled("  L         ", key()),
            Span::styled("Log out", desc()),
        ]),
        Line::from(vec![
            Span::styled("  q         ", key()),
            Span::styled("Quit", desc()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Esc to close",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(36, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Quit taskdeck? [y/n]",
            styles::help_desc_style(),
        )),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// A fixed-size rect centered in `r`, clamped to its bounds.
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
