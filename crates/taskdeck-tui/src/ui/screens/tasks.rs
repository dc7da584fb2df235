use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, TasksFocus};
use crate::ui::styles;

/// Render the Tasks screen - add-task form on top, task table below
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(area);

    render_add_form(frame, app, chunks[0]);
    render_task_table(frame, app, chunks[1]);
}

fn render_add_form(frame: &mut Frame, app: &App, area: Rect) {
    let title_focused = app.tasks_focus == TasksFocus::FormTitle;
    let desc_focused = app.tasks_focus == TasksFocus::FormDescription;
    let form_open = title_focused || desc_focused;

    let field = |label: &str, value: &str, focused: bool| {
        let marker = if focused { "> " } else { "  " };
        let cursor = if focused { "_" } else { "" };
        Line::from(vec![
            Span::styled(marker.to_string(), styles::highlight_style()),
            Span::styled(format!("{:<13}", label), styles::muted_style()),
            Span::raw(value.to_string()),
            Span::styled(cursor.to_string(), styles::highlight_style()),
        ])
    };

    let hint = if !app.is_subscribed() {
        Line::from(Span::styled(
            "  You need an active subscription to add tasks.",
            styles::error_style(),
        ))
    } else if form_open {
        Line::from(Span::styled(
            "  Enter to add, Tab to switch field, Esc to cancel",
            styles::muted_style(),
        ))
    } else {
        Line::from(Span::styled(
            "  Press [a] to add a task",
            styles::muted_style(),
        ))
    };

    let lines = vec![
        field("Title", &app.new_task_title, title_focused),
        field("Description", &app.new_task_description, desc_focused),
        hint,
    ];

    let block = Block::default()
        .title(" Add a new task ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(form_open));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_task_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.tasks_focus == TasksFocus::List;

    let header = Row::new([Cell::from(""), Cell::from("Title"), Cell::from("Description")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = app
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let style = if i == app.task_selection {
                styles::selected_style()
            } else if task.is_completed {
                styles::muted_style()
            } else {
                styles::list_item_style()
            };
            let mark = if task.is_completed { "[x]" } else { "[ ]" };
            Row::new([
                Cell::from(mark),
                Cell::from(task.title.clone()),
                Cell::from(task.description_display().to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(40),
        Constraint::Percentage(55),
    ];

    let project = app
        .active_project
        .as_ref()
        .map(|(_, title)| title.as_str())
        .unwrap_or("-");
    let done = app.tasks.iter().filter(|t| t.is_completed).count();
    let title = format!(" {} - tasks ({}/{} done) ", project, done, app.tasks.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.task_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
