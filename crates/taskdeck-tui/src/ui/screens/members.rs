use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, MembersFocus};
use crate::ui::styles;

/// Render the Members screen - search bar on top, search results and
/// current participants side by side
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(area);

    render_search_bar(frame, app, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_results(frame, app, panes[0]);
    render_participants(frame, app, panes[1]);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.members_focus == MembersFocus::Search;
    let cursor = if focused { "_" } else { "" };

    let line = Line::from(vec![
        Span::styled("Search: ", styles::muted_style()),
        Span::raw(app.member_search_query.clone()),
        Span::styled(cursor, styles::highlight_style()),
    ]);

    let project = app
        .active_project
        .as_ref()
        .map(|(_, title)| title.as_str())
        .unwrap_or("-");
    let block = Block::default()
        .title(format!(" {} - invite users (name or email) ", project))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.members_focus == MembersFocus::Results;

    let items: Vec<ListItem> = app
        .member_results
        .iter()
        .map(|user| ListItem::new(user.display()))
        .collect();

    let title = format!(" Matches ({}) - Enter invites ", app.member_results.len());
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .style(styles::list_item_style())
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    if !app.member_results.is_empty() {
        state.select(Some(app.member_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_participants(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.members_focus == MembersFocus::Participants;

    let items: Vec<ListItem> = app
        .members
        .iter()
        .map(|user| ListItem::new(format!("{} <{}>", user.username, user.email)))
        .collect();

    let title = format!(" Participants ({}) - [r] removes ", app.members.len());
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .style(styles::list_item_style())
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    if !app.members.is_empty() {
        state.select(Some(app.participant_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
