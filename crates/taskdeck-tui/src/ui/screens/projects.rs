use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, ProjectsFocus};
use crate::ui::styles;

/// Render the Projects screen - list with detail pane, plus the
/// create-project form when it is open
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form_open = app.projects_focus != ProjectsFocus::List;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if form_open {
            vec![Constraint::Min(8), Constraint::Length(5)]
        } else {
            vec![Constraint::Min(8)]
        })
        .split(area);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);

    render_project_table(frame, app, panes[0]);
    render_project_detail(frame, app, panes[1]);

    if form_open {
        render_create_form(frame, app, chunks[1]);
    }
}

fn render_project_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.projects_focus == ProjectsFocus::List;

    let header = Row::new([
        Cell::from("Title"),
        Cell::from("Progress"),
        Cell::from("Tasks"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .projects
        .iter()
        .enumerate()
        .map(|(i, (project, progress))| {
            let style = if i == app.project_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new([
                Cell::from(project.title.clone()),
                Cell::from(format!("{:>5.1}%", progress)),
                Cell::from(format!("{:>3}", project.tasks.len())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(60),
        Constraint::Length(9),
        Constraint::Length(6),
    ];

    let title = format!(" Projects ({}) ", app.projects.len());
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
    state.select(Some(app.project_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_project_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let Some((project, progress)) = app.projects.get(app.project_selection) else {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No projects yet. Press [n] to create one.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(inner);

    let completed = project.tasks.iter().filter(|t| t.is_completed).count();
    let lines = vec![
        Line::from(Span::styled(project.title.clone(), styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Description: ", styles::muted_style()),
            Span::raw(project.description_display().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Tasks:       ", styles::muted_style()),
            Span::raw(format!("{} ({} done)", project.tasks.len(), completed)),
        ]),
        Line::from(vec![
            Span::styled("Members:     ", styles::muted_style()),
            Span::raw(project.participants.len().to_string()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(styles::gauge_style())
        .ratio((progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%", progress));
    frame.render_widget(gauge, chunks[1]);
}

fn render_create_form(frame: &mut Frame, app: &App, area: Rect) {
    let title_focused = app.projects_focus == ProjectsFocus::FormTitle;
    let desc_focused = app.projects_focus == ProjectsFocus::FormDescription;

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

    let lines = vec![
        field("Title", &app.new_project_title, title_focused),
        field("Description", &app.new_project_description, desc_focused),
        Line::from(Span::styled(
            "  Enter to create, Tab to switch field, Esc to cancel",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(" New project ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
