use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use taskdeck_core::models::Plan;

use crate::app::App;
use crate::ui::styles;

/// Render the Subscription screen - current status and plan selection
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(area);

    render_status(frame, app, chunks[0]);
    render_plans(frame, app, chunks[1]);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.subscription {
        Some(ref status) => {
            let (text, style) = if status.is_subscribed {
                ("Your subscription is active!", styles::success_style())
            } else {
                ("Your subscription has expired.", styles::error_style())
            };
            vec![
                Line::from(""),
                Line::from(Span::styled(format!("  {}", text), style)),
                Line::from(vec![
                    Span::styled("  Ends on: ", styles::muted_style()),
                    Span::raw(status.end_date_display()),
                ]),
            ]
        }
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Loading subscription status...",
                styles::muted_style(),
            )),
        ],
    };

    let block = Block::default()
        .title(" Subscription management ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_plans(frame: &mut Frame, app: &App, area: Rect) {
    let subscribed = app.is_subscribed();

    let plan_line = |plan: Plan| {
        let marker = if app.selected_plan == plan { "(x)" } else { "( )" };
        let style = if app.selected_plan == plan {
            styles::highlight_style()
        } else {
            styles::list_item_style()
        };
        Line::from(Span::styled(
            format!("  {} {}", marker, plan.label()),
            style,
        ))
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Select a plan", styles::title_style())),
        Line::from(""),
        plan_line(Plan::Monthly),
        plan_line(Plan::Yearly),
        Line::from(""),
    ];

    if subscribed {
        lines.push(Line::from(Span::styled(
            "  [c] Cancel subscription",
            styles::help_key_style(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  [Enter] Subscribe now",
            styles::help_key_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
