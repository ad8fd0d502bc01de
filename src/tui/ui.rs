use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ComposeField, InputMode, Screen, SignInField};
use crate::media::{parse_content, ContentBlock};
use crate::models::Article;

pub fn draw<S, O>(frame: &mut Frame, app: &App<S, O>) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Notice line
        ])
        .split(frame.area());

    match app.screen {
        Screen::Listing => draw_listing(frame, app, outer[0]),
        Screen::Detail => draw_detail(frame, app, outer[0]),
        Screen::Admin => draw_admin(frame, app, outer[0]),
    }
    render_notice(frame, app, outer[1]);

    match app.mode {
        InputMode::SignIn => render_sign_in(frame, app),
        InputMode::UploadPath => render_upload_prompt(frame, app),
        _ => {}
    }

    if app.show_help {
        render_help(frame);
    }
}

fn draw_listing<S, O>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    // 1/3 cards, 2/3 preview of the selected card
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(0),    // Cards
            Constraint::Length(1), // Key hints
        ])
        .split(columns[0]);

    render_search_box(frame, app, left[0]);
    render_cards(frame, app, left[1]);
    render_hints(
        frame,
        left[2],
        "j/k:nav  Enter:read  /:search  a:admin  ?:help  q:quit",
    );

    render_preview(frame, app.selected_article(), app.placeholder_image(), columns[1]);
}

fn render_search_box<S, O>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    let searching = app.mode == InputMode::Search;
    let text = if searching {
        format!("{}_", app.search_query)
    } else if app.search_query.is_empty() {
        "Press / to search".to_string()
    } else {
        app.search_query.clone()
    };

    let shown = app.visible_articles().len();
    let block = Block::default()
        .title(format!(" Newsroom | {} of {} stories ", shown, app.articles.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if searching { Color::Yellow } else { Color::Cyan }));

    let style = if searching || !app.search_query.is_empty() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    frame.render_widget(Paragraph::new(text).style(style).block(block), area);
}

fn card_item(article: &Article) -> ListItem<'static> {
    let lines = vec![
        Line::from(Span::styled(
            article.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("[{}] ", article.category), Style::default().fg(Color::Blue)),
            Span::styled(article.display_date(), Style::default().fg(Color::DarkGray)),
        ]),
    ];
    ListItem::new(Text::from(lines))
}

fn render_cards<S, O>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    let articles = app.visible_articles();

    let items: Vec<ListItem> = articles.iter().map(|article| card_item(article)).collect();

    let title = if articles.is_empty() && !app.search_query.is_empty() {
        " No matching stories "
    } else {
        ""
    };

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !articles.is_empty() {
        state.select(Some(app.selected_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_preview(frame: &mut Frame, article: Option<&Article>, placeholder: &str, area: Rect) {
    let block = Block::default()
        .title(" Story ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let Some(article) = article else {
        let paragraph = Paragraph::new("No story selected")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let lines = vec![
        Line::from(Span::styled(
            article.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        meta_line(article),
        Line::from(Span::styled(
            format!("Cover: {}", article.cover_image(placeholder)),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(article.excerpt.clone()),
    ];

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn meta_line(article: &Article) -> Line<'static> {
    Line::from(vec![
        Span::styled(article.category.clone(), Style::default().fg(Color::Blue)),
        Span::raw("  "),
        Span::styled(article.display_date(), Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_detail<S, O>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Headline
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    let Some(article) = app.current_article.as_ref() else {
        render_hints(frame, rows[2], "Esc:back  q:quit");
        return;
    };

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            article.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        meta_line(article),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(header, rows[0]);

    let mut body = vec![Line::from(Span::styled(
        format!("[cover: {}]", article.cover_image(app.placeholder_image())),
        Style::default().fg(Color::Magenta),
    ))];
    for block in parse_content(&article.content) {
        body.push(Line::from(""));
        match block {
            ContentBlock::Paragraph(text) => {
                body.extend(text.lines().map(|l| Line::from(l.to_string())));
            }
            ContentBlock::Image { alt, url } => body.push(Line::from(Span::styled(
                format!("[{alt}: {url}]"),
                Style::default().fg(Color::Magenta),
            ))),
        }
    }

    let paragraph = Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, rows[1]);

    render_hints(frame, rows[2], "Esc:back  r:refresh  q:quit");
}

fn draw_admin<S, O>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(columns[0]);

    let who = app
        .session
        .as_ref()
        .map(|s| s.display_name().to_string())
        .unwrap_or_else(|| "not signed in".to_string());

    let items: Vec<ListItem> = app
        .admin_articles
        .iter()
        .map(|article| {
            let marker = if article.published { "● " } else { "○ " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(format!("[{}] ", article.category), Style::default().fg(Color::Blue)),
                Span::raw(article.title.clone()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Admin | {} ", who))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.admin_articles.is_empty() {
        state.select(Some(app.admin_index));
    }
    frame.render_stateful_widget(list, left[0], &mut state);

    match app.mode {
        InputMode::Compose | InputMode::UploadPath => {
            render_hints(
                frame,
                left[1],
                "Tab:field  ^U:image  ^S:publish  Esc:close",
            );
            render_compose(frame, app, columns[1]);
        }
        _ => {
            render_hints(
                frame,
                left[1],
                "Enter:open  n:new  d:delete  L:sign out  Esc:back",
            );
            render_preview(
                frame,
                app.selected_admin_article(),
                app.placeholder_image(),
                columns[1],
            );
        }
    }
}

fn render_compose<S, O>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Category
            Constraint::Length(3), // Cover image
            Constraint::Min(0),    // Content
        ])
        .split(area);

    let form = &app.compose;
    let fields = [
        (ComposeField::Title, " Title ", &form.title),
        (ComposeField::Category, " Category ", &form.category),
        (ComposeField::Image, " Cover image URL (optional) ", &form.image),
        (ComposeField::Content, " Content ", &form.content),
    ];

    for (area, (field, label, buffer)) in rows.iter().zip(fields) {
        let focused = form.field == field;
        let text = if focused {
            buffer.with_caret('|')
        } else {
            buffer.text().to_string()
        };
        let border = if focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, *area);
    }
}

fn render_notice<S, O>(frame: &mut Frame, app: &App<S, O>, area: Rect) {
    if let Some(label) = app.busy_label() {
        let paragraph =
            Paragraph::new(format!("{label}...")).style(Style::default().fg(Color::Yellow));
        frame.render_widget(paragraph, area);
        return;
    }

    let Some(notice) = app.notice.as_ref() else {
        return;
    };
    let color = if notice.is_error { Color::Red } else { Color::Green };
    let paragraph = Paragraph::new(notice.text.clone()).style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
}

fn render_hints(frame: &mut Frame, area: Rect, hints: &str) {
    let paragraph = Paragraph::new(hints.to_string()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_sign_in<S, O>(frame: &mut Frame, app: &App<S, O>) {
    let area = centered_rect(50, 30, frame.area());
    let form = &app.sign_in;

    let title = if form.sign_up {
        " Create account (Ctrl-T: sign in instead) "
    } else {
        " Sign in (Ctrl-T: create account) "
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let cursor = |field: SignInField| if form.field == field { "_" } else { "" };
    let masked = "*".repeat(form.password.chars().count());
    let text = vec![
        Line::from(format!("Email:    {}{}", form.email, cursor(SignInField::Email))),
        Line::from(format!("Password: {}{}", masked, cursor(SignInField::Password))),
        Line::from(""),
        Line::from(Span::styled(
            "Tab:switch field  Enter:submit  Esc:cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_upload_prompt<S, O>(frame: &mut Frame, app: &App<S, O>) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(" Insert image at cursor - path to file (max 5 MB) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    // Clear the area first
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", app.upload_path);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Reading:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   Enter    Read story",
        "   /        Search title, content, category",
        "   Esc      Back",
        "   r        Refresh",
        "",
        " Admin (a):",
        "   n        New article",
        "   d        Delete article",
        "   Ctrl-U   Insert image at cursor",
        "   Ctrl-S   Publish",
        "   L        Sign out",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
