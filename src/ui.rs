use ratatui::{
    Frame,
    layout::{Layout, Direction, Constraint, Rect, Alignment},
    widgets::{Block, Borders, BorderType, List, ListItem, ListState, Paragraph, Wrap, Clear},
    style::{Style, Modifier},
    text::{Line, Span},
};
use crate::app::{App, InputMode};
use crate::router::Route;
use crate::stats::generation_label;
use crate::theme::category_color;
use crate::types::Creature;

// ===============================
// Top-level draw
// ===============================
pub fn draw(f:&mut Frame, app:&App){
    let show_filter = *app.route() == Route::Home;

    let mut constraints: Vec<Constraint> = Vec::with_capacity(4);
    constraints.push(Constraint::Length(2));                                // header
    if show_filter { constraints.push(Constraint::Length(3)); }             // filter bar
    constraints.push(Constraint::Min(0));                                   // body
    constraints.push(Constraint::Length(1));                                // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0usize;
    header(f, chunks[idx], app); idx += 1;
    if show_filter {
        filter_bar(f, chunks[idx], app); idx += 1;
    }
    body(f, chunks[idx], app); idx += 1;
    footer(f, chunks[idx], app);

    // Overlays render last
    match app.input_mode() {
        InputMode::Search => draw_search_overlay(f, app),
        InputMode::ConfirmClear => draw_confirm_overlay(f, app),
        _ => {}
    }
    if app.toast_message().is_some() {
        draw_toast_modal(f, app);
    }
}

// ===============================
// Header / Filter
// ===============================
fn header(f:&mut Frame, area:Rect, app:&App){
    let favorites = format!("Favorites ({})", app.favorites().count());
    let titles = ["Home", "Types", favorites.as_str()];
    let selected = match app.route() {
        Route::Home => Some(0),
        Route::Types | Route::TypeDetail { .. } => Some(1),
        Route::Favorites => Some(2),
        Route::Creature { .. } => None,
    };

    let mut spans = vec![Span::styled(" dexterm ", Style::default().fg(app.theme().focus_border).add_modifier(Modifier::BOLD))];
    for (i, title) in titles.iter().enumerate() {
        spans.push(Span::raw(if i == 0 { "┌─" } else { "┬─" }));
        spans.push(Span::styled(format!("{} {title}", i + 1), if Some(i) == selected {
            Style::default().fg(app.theme().focus_border).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme().text)
        }));
        spans.push(Span::raw("─"));
    }
    spans.push(Span::raw("┐ "));
    spans.push(Span::styled(app.route().to_link(), Style::default().fg(app.theme().text_dim)));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM).border_type(BorderType::Plain));
    f.render_widget(paragraph, area);
}

fn filter_bar(f:&mut Frame, area:Rect, app:&App){
    let focused = app.input_mode() == InputMode::Filter;
    let border_color = if focused { app.theme().focus_border } else { app.theme().unfocused_border };

    let line = if focused {
        Line::from(Span::styled(app.filter_input(), Style::default().fg(app.theme().focus_border)))
    } else {
        let filter = app.home_filter();
        let category = filter.category.as_deref().unwrap_or("all");
        let generation = match filter.generation {
            Some(g) => format!("{g} ({})", generation_label(g).unwrap_or("?")),
            None => "all".to_string(),
        };
        Line::from(vec![
            Span::styled("type ", Style::default().fg(app.theme().text_dim)),
            Span::styled(category.to_string(), Style::default().fg(category_color(category))),
            Span::styled("  gen ", Style::default().fg(app.theme().text_dim)),
            Span::raw(generation),
            Span::styled(format!("  │ {} matches │ sort: {}", app.home_matches(), app.sort_key().label()), Style::default().fg(app.theme().text_dim)),
            Span::styled("  (/ edit, t type, g gen, c clear)", Style::default().fg(app.theme().text_dim)),
        ])
    };

    let paragraph = Paragraph::new(line)
        .block(Block::default()
            .title(" Filter ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color)));
    f.render_widget(paragraph, area);

    if focused && area.width > 2 {
        let x = area.x + 1 + (app.filter_input().len().min(area.width.saturating_sub(2) as usize) as u16);
        f.set_cursor_position((x, area.y + 1));
    }
}

// ===============================
// Body
// ===============================
fn body(f:&mut Frame, area:Rect, app:&App){
    const MIN_WIDTH: u16 = 50;
    const MIN_HEIGHT: u16 = 8;

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let warning = Paragraph::new(format!(
            "Terminal too small!\n\nMinimum size: {MIN_WIDTH}×{MIN_HEIGHT}\nCurrent size: {}×{}",
            area.width, area.height
        ))
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme().error).add_modifier(Modifier::BOLD));
        f.render_widget(warning, area);
        return;
    }

    match app.route() {
        Route::Home => render_home(f, area, app),
        Route::Types => render_types(f, area, app),
        Route::TypeDetail { name } => {
            let title = format!(" Type {name} ({}) │ sort: {} ", app.screen_creatures().len(), app.sort_key().label());
            render_creature_list(f, area, app, &title, "No creature carries this type.");
        }
        Route::Favorites => {
            let title = format!(" Favorites ({}) │ sort: {} ", app.favorites().count(), app.sort_key().label());
            render_creature_list(f, area, app, &title, "No favorites yet. Press * on a creature to add it.");
        }
        Route::Creature { name } => render_detail(f, area, app, name),
    }
}

fn render_home(f:&mut Frame, area:Rect, app:&App){
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let summary = app.home_summary();
    let counts = app.home_counts();
    let mut spans = vec![
        Span::styled(format!("{}", summary.creatures), Style::default().fg(app.theme().focus_border).add_modifier(Modifier::BOLD)),
        Span::raw(" creatures │ "),
        Span::styled(format!("{}", summary.categories), Style::default().fg(app.theme().focus_border).add_modifier(Modifier::BOLD)),
        Span::raw(" types │ "),
        Span::styled(format!("{}", summary.generations), Style::default().fg(app.theme().focus_border).add_modifier(Modifier::BOLD)),
        Span::raw(" generations │ top:"),
    ];
    for row in counts.top(5) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(row.name.clone(), Style::default().fg(category_color(&row.name))));
        spans.push(Span::styled(format!(" {}", row.count), Style::default().fg(app.theme().text_dim)));
    }
    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).border_style(Style::default().fg(app.theme().unfocused_border)));
    f.render_widget(header, rows[0]);

    let view = app.home_view();
    let shown = app.screen_creatures().len();
    let more = if view.has_more() { " │ m: load more" } else { "" };
    let title = format!(" Creatures {shown}/{}{more} ", app.home_matches());
    render_creature_list(f, rows[1], app, &title, "No creature matches this filter.");
}

fn render_types(f:&mut Frame, area:Rect, app:&App){
    let counts = app.type_counts();
    let max = counts.max().max(1);
    let bar_width = area.width.saturating_sub(30) as usize;

    let items: Vec<ListItem> = counts.rows.iter().map(|row| {
        let filled = row.count * bar_width / max;
        ListItem::new(Line::from(vec![
            Span::styled(format!("{:<12}", row.name), Style::default().fg(category_color(&row.name))),
            Span::styled(format!("{:>5} ", row.count), Style::default().fg(app.theme().text)),
            Span::styled("█".repeat(filled), Style::default().fg(category_color(&row.name))),
        ]))
    }).collect();

    let title = format!(" Types ({}) │ max {} │ avg {} ", counts.rows.len(), counts.max(), counts.average());
    if items.is_empty() {
        render_placeholder(f, area, app, &title, "No types loaded.");
        return;
    }
    let mut st = ListState::default();
    st.select(Some(app.selection().min(items.len().saturating_sub(1))));
    let list = List::new(items)
        .highlight_style(Style::default().bg(app.theme().selection_bg).fg(app.theme().selection_fg))
        .block(Block::default().borders(Borders::ALL).title(title).border_type(BorderType::Rounded).border_style(Style::default().fg(app.theme().focus_border)));
    f.render_stateful_widget(list, area, &mut st);
}

fn creature_line<'a>(c:&'a Creature, app:&App) -> Line<'a> {
    let fav = if app.favorites().contains(c.pokedex_id) { "★ " } else { "  " };
    let mut spans = vec![
        Span::styled(fav, Style::default().fg(app.theme().favorite)),
        Span::styled(format!("#{:04} ", c.pokedex_id), Style::default().fg(app.theme().text_dim)),
        Span::styled(format!("{:<14}", c.name), Style::default().fg(app.theme().text)),
    ];
    for tag in &c.categories {
        spans.push(Span::styled(format!("[{}]", tag.name), Style::default().fg(category_color(&tag.name))));
    }
    spans.push(Span::styled(format!("  gen {} │ total {}", c.generation, c.total_stats()), Style::default().fg(app.theme().text_dim)));
    Line::from(spans)
}

fn render_creature_list(f:&mut Frame, area:Rect, app:&App, title:&str, empty:&str){
    let creatures = app.screen_creatures();
    if creatures.is_empty() {
        render_placeholder(f, area, app, title, empty);
        return;
    }
    let items: Vec<ListItem> = creatures.iter().map(|c| ListItem::new(creature_line(c, app))).collect();
    let mut st = ListState::default();
    st.select(Some(app.selection().min(items.len().saturating_sub(1))));
    let list = List::new(items)
        .highlight_style(Style::default().bg(app.theme().selection_bg).fg(app.theme().selection_fg))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()).border_type(BorderType::Rounded).border_style(Style::default().fg(app.theme().focus_border)));
    f.render_stateful_widget(list, area, &mut st);
}

// Empty list: loading spinner text, the error, or the empty message.
fn render_placeholder(f:&mut Frame, area:Rect, app:&App, title:&str, empty:&str){
    let (text, color) = if app.screen_loading() {
        ("Loading…".to_string(), app.theme().text_dim)
    } else if let Some(err) = app.screen_error() {
        (format!("{err}\n\nPress r to retry."), app.theme().error)
    } else {
        (empty.to_string(), app.theme().text_dim)
    };
    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()).border_type(BorderType::Rounded).border_style(Style::default().fg(app.theme().unfocused_border)));
    f.render_widget(p, area);
}

fn render_detail(f:&mut Frame, area:Rect, app:&App, name:&str){
    let title = format!(" {name} ");
    let Some(c) = app.detail().data() else {
        let empty = format!("No creature named {name}.");
        render_placeholder(f, area, app, &title, &empty);
        return;
    };

    let dim = Style::default().fg(app.theme().text_dim);
    let mut lines: Vec<Line> = Vec::new();
    let fav = if app.favorites().contains(c.pokedex_id) { "★ favorite" } else { "" };
    lines.push(Line::from(vec![
        Span::styled(format!("#{:04} {}", c.pokedex_id, c.name), Style::default().fg(app.theme().focus_border).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  generation {} ({})  ", c.generation, generation_label(c.generation).unwrap_or("?")), dim),
        Span::styled(fav, Style::default().fg(app.theme().favorite)),
    ]));

    let mut tags = vec![Span::styled("Types: ", dim)];
    for tag in &c.categories {
        tags.push(Span::styled(format!("[{}] ", tag.name), Style::default().fg(category_color(&tag.name))));
    }
    lines.push(Line::from(tags));
    lines.push(Line::from(""));

    // Base stats are capped at 255 in every generation
    let bar_width = area.width.saturating_sub(24) as u32;
    for (label, value) in c.stats.entries() {
        let filled = (value.min(255) * bar_width / 255) as usize;
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<8}"), dim),
            Span::styled(format!("{value:>4} "), Style::default().fg(app.theme().text)),
            Span::styled("█".repeat(filled), Style::default().fg(app.theme().focus_border)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled(format!("{:<8}", "Total"), dim),
        Span::styled(format!("{:>4}", c.total_stats()), Style::default().fg(app.theme().text).add_modifier(Modifier::BOLD)),
    ]));
    lines.push(Line::from(""));

    if let Some(pre) = &c.pre_evolution {
        lines.push(Line::from(vec![Span::styled("Evolves from: ", dim), Span::raw(format!("{} (#{})", pre.name, pre.pokedex_id))]));
    }
    if !c.evolutions.is_empty() {
        let names: Vec<String> = c.evolutions.iter().map(|e| format!("{} (#{})", e.name, e.pokedex_id)).collect();
        lines.push(Line::from(vec![Span::styled("Evolves to: ", dim), Span::raw(names.join(", "))]));
    }

    let weak: Vec<&str> = c.resistances.iter().filter(|r| r.damage_multiplier > 1.0).map(|r| r.name.as_str()).collect();
    let strong: Vec<&str> = c.resistances.iter().filter(|r| r.damage_multiplier < 1.0).map(|r| r.name.as_str()).collect();
    if !weak.is_empty() {
        lines.push(Line::from(vec![Span::styled("Weak to: ", dim), Span::styled(weak.join(", "), Style::default().fg(app.theme().error))]));
    }
    if !strong.is_empty() {
        lines.push(Line::from(vec![Span::styled("Resists: ", dim), Span::raw(strong.join(", "))]));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title).border_type(BorderType::Rounded).border_style(Style::default().fg(app.theme().focus_border)));
    f.render_widget(p, area);
}

// ===============================
// Footer
// ===============================
fn footer(f:&mut Frame, area:Rect, app:&App){
    let key = Style::default().fg(app.theme().focus_border);
    let mut spans: Vec<Span> = Vec::with_capacity(24);

    spans.push(Span::styled("1-3", key));
    spans.push(Span::raw(" screens │ "));
    spans.push(Span::styled("Enter", key));
    spans.push(Span::raw(" open │ "));
    spans.push(Span::styled("Esc", key));
    spans.push(Span::raw(" back │ "));
    spans.push(Span::styled("*", key));
    spans.push(Span::raw(" favorite │ "));
    spans.push(Span::styled("s", key));
    spans.push(Span::raw(" sort │ "));
    spans.push(Span::styled("Ctrl+F", key));
    spans.push(Span::raw(" search │ "));
    if *app.route() == Route::Favorites {
        spans.push(Span::styled("X", key));
        spans.push(Span::raw(" clear │ "));
    }
    spans.push(Span::styled("r", key));
    spans.push(Span::raw(" retry │ "));
    spans.push(Span::styled("q", key));
    spans.push(Span::raw(" quit"));

    if app.screen_loading() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("loading…", Style::default().fg(app.theme().text_dim)));
    } else if let Some(err) = app.screen_error() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(err, Style::default().fg(app.theme().error).add_modifier(Modifier::BOLD)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ===============================
// Overlays
// ===============================
fn centered(area:Rect, width_pct:u16, height:u16) -> Rect {
    let width = (area.width * width_pct) / 100;
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect { x, y, width, height }
}

fn draw_search_overlay(f:&mut Frame, app:&App){
    let query = app.search_input();
    let results = app.search_results();

    // 70% width, 60% height
    let overlay = centered(f.area(), 70, (f.area().height * 6) / 10);
    f.render_widget(Clear, overlay);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(overlay);

    let q = Paragraph::new(query)
        .style(Style::default().fg(app.theme().focus_border))
        .block(Block::default().title(" Search by name ").borders(Borders::ALL).border_type(BorderType::Rounded).border_style(Style::default().fg(app.theme().focus_border)));
    f.render_widget(q, chunks[0]);

    if chunks[0].width > 2 {
        let x = chunks[0].x + 1 + (query.len().min(chunks[0].width.saturating_sub(2) as usize) as u16);
        f.set_cursor_position((x, chunks[0].y + 1));
    }

    let title = if app.search_loading() {
        " Results (searching…) ".to_string()
    } else if let Some(err) = app.search_error() {
        format!(" Results: {err} ")
    } else {
        format!(" Results ({}) │ Enter open │ Esc close ", results.len())
    };

    let items: Vec<ListItem> = results.iter().map(|c| ListItem::new(creature_line(c, app))).collect();
    let mut st = ListState::default();
    if !results.is_empty() {
        st.select(Some(app.search_selection().min(results.len().saturating_sub(1))));
    }
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL).title(title).border_type(BorderType::Rounded).border_style(Style::default().fg(app.theme().focus_border)));
    f.render_stateful_widget(list, chunks[1], &mut st);
}

fn draw_confirm_overlay(f:&mut Frame, app:&App){
    let overlay = centered(f.area(), 50, 5);
    f.render_widget(Clear, overlay);

    let text = vec![
        Line::from(format!("Remove all {} favorites?", app.favorites().count())),
        Line::from(vec![
            Span::styled("y", Style::default().fg(app.theme().focus_border)), Span::raw(" confirm  "),
            Span::styled("n/Esc", Style::default().fg(app.theme().focus_border)), Span::raw(" cancel"),
        ]),
    ];
    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().title(" Clear favorites ").borders(Borders::ALL).border_type(BorderType::Double).border_style(Style::default().fg(app.theme().error)));
    f.render_widget(p, overlay);
}

fn draw_toast_modal(f: &mut Frame, app: &App) {
    let message = app.toast_message().unwrap_or("");

    // Small centered box (40% width, 3 lines height)
    let overlay = centered(f.area(), 40, 3);
    f.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme().toast));

    let text = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme().toast).add_modifier(Modifier::BOLD))
        .block(block);

    f.render_widget(text, overlay);
}
