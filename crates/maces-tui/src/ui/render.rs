use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use maces_core::display::Section;
use maces_core::models::CreditLabel;

use crate::app::{App, AppState, ClassFocus, CreditFocus, LoginFocus, ParkDateFocus};

use super::styles;

/// Rows of class list shown at once
const CLASS_LIST_ROWS: usize = 8;

/// Widest a toast box gets
const MAX_TOAST_WIDTH: u16 = 60;

const LOGO: [&str; 3] = [
    "    ╔╦╗╔═╗╔═╗╔═╗╔═╗",
    "    ║║║╠═╣║  ║╣ ╚═╗",
    "    ╩ ╩╩ ╩╚═╝╚═╝╚═╝",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Event link bar
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_event_bar(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
    render_toasts(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::EditingEventLink => render_event_link_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  M.A.C.E.S";
    let help_hint = "[?] Help";

    let user = match (app.session.user_park_id(), app.session.is_officer()) {
        (Some(park), true) => format!("Officer, park {}", park),
        (Some(park), false) => format!("Player, park {}", park),
        (None, _) => "Not logged in".to_string(),
    };

    let used = title.len() + user.len() + help_hint.len() + 6;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(user, styles::muted_style()),
        Span::raw("   "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_event_bar(frame: &mut Frame, app: &App, area: Rect) {
    let params = &app.event_params;
    let line = if params.is_populated() {
        Line::from(vec![
            Span::styled("  Event: ", styles::muted_style()),
            Span::styled(
                format!("park {}", params.park_id.as_deref().unwrap_or_default()),
                styles::highlight_style(),
            ),
            Span::styled(" on ", styles::muted_style()),
            Span::styled(params.date.clone().unwrap_or_default(), styles::highlight_style()),
        ])
    } else {
        Line::from(Span::styled("  No event selected", styles::muted_style()))
    };

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.visibility.visible();

    if visible.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Nothing to do here without an event.",
                styles::highlight_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Press ", styles::muted_style()),
                Span::styled("Ctrl+E", styles::help_key_style()),
                Span::styled(" and paste the event link your park officer shared.", styles::muted_style()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }

    if visible == [Section::LoginForm] {
        render_login(frame, app, centered_rect_fixed(46, 12, area));
        return;
    }

    let constraints: Vec<Constraint> = visible
        .iter()
        .map(|_| Constraint::Ratio(1, visible.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (section, chunk) in visible.iter().zip(chunks.iter()) {
        match section {
            Section::LoginForm => render_login(frame, app, *chunk),
            Section::ClassSection => render_class_section(frame, app, *chunk),
            Section::ParkDateSelection => render_park_date_section(frame, app, *chunk),
            Section::AdminOptions => render_admin_section(frame, app, *chunk),
        }
    }
}

fn section_block(app: &App, section: Section) -> Block<'static> {
    let focused = app.focus == section;
    Block::default()
        .title(Span::styled(format!(" {} ", section.title()), styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused))
}

fn button_line(label: &str, focused: bool) -> Line<'static> {
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("  ["),
        Span::styled(text, styles::field_style(focused)),
        Span::raw("]"),
    ])
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Section::LoginForm;
    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect();
    lines.push(Line::from(""));

    let username_focused = focused && app.login_focus == LoginFocus::Username;
    let cursor = if username_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("Username: [", styles::muted_style()),
        Span::styled(
            format!("{:<20}{}", app.login_username, cursor),
            styles::field_style(username_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    let password_focused = focused && app.login_focus == LoginFocus::Password;
    let cursor = if password_focused { "▌" } else { "" };
    let masked = "*".repeat(app.login_password.chars().count().min(20));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{:<20}{}", masked, cursor), styles::field_style(password_focused)),
        Span::styled("]", styles::muted_style()),
    ]));

    lines.push(Line::from(""));
    lines.push(button_line("Login", focused && app.login_focus == LoginFocus::Button));

    let paragraph = Paragraph::new(lines).block(section_block(app, Section::LoginForm));
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_class_section(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Section::ClassSection;
    let mut lines = vec![Line::from(Span::styled("  Class", styles::highlight_style()))];

    if app.classes.is_empty() {
        lines.push(Line::from(Span::styled("   (no classes loaded)", styles::muted_style())));
    } else {
        // Keep the selection in view
        let start = app
            .class_selection
            .saturating_sub(CLASS_LIST_ROWS.saturating_sub(1));
        for (i, class) in app.classes.iter().enumerate().skip(start).take(CLASS_LIST_ROWS) {
            let selected = i == app.class_selection;
            let marker = if selected { "●" } else { "○" };
            let style = if selected && focused && app.class_focus == ClassFocus::Class {
                styles::selected_style()
            } else if selected {
                styles::highlight_style()
            } else {
                styles::list_item_style()
            };
            lines.push(Line::from(vec![
                Span::raw("   "),
                Span::styled(format!("{} {}", marker, class.class_name), style),
            ]));
        }
    }

    lines.push(Line::from(""));
    let attending_focused = focused && app.class_focus == ClassFocus::Attending;
    let check = if app.attending_in_person { "x" } else { " " };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("[{}] Attending in person", check),
            styles::field_style(attending_focused),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(button_line("Submit", focused && app.class_focus == ClassFocus::Button));

    let paragraph = Paragraph::new(lines).block(section_block(app, Section::ClassSection));
    frame.render_widget(paragraph, area);
}

fn render_park_date_section(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Section::ParkDateSelection;
    let date_focused = focused && app.park_date_focus == ParkDateFocus::Date;
    let cursor = if date_focused { "▌" } else { "" };

    let mut lines = vec![
        Line::from(Span::styled(
            "  Pick the event date, then share the link.",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Date: [", styles::muted_style()),
            Span::styled(format!("{:<10}{}", app.park_date, cursor), styles::field_style(date_focused)),
            Span::styled("]", styles::muted_style()),
            Span::styled("  YYYY-MM-DD", styles::muted_style()),
        ]),
        Line::from(""),
        button_line(
            "Generate link",
            focused && app.park_date_focus == ParkDateFocus::Button,
        ),
    ];

    if let Some(ref url) = app.generated_url {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", url), styles::success_style())));
        lines.push(Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("o", styles::help_key_style()),
            Span::styled(" to open this event here", styles::muted_style()),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(section_block(app, Section::ParkDateSelection));
    frame.render_widget(paragraph, area);
}

fn render_admin_section(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Section::AdminOptions;
    let mut lines = vec![Line::from(Span::styled(
        "  Credits per player",
        styles::highlight_style(),
    ))];

    let counts = app.preview_counts();
    let have_preview = !app.attendance_preview.is_empty();

    for (i, label) in CreditLabel::ALL.iter().enumerate() {
        let field_focused = focused && app.credit_focus == CreditFocus::Input(i);
        let cursor = if field_focused { "▌" } else { "" };
        let input = app.credit_inputs.get(i).map(String::as_str).unwrap_or_default();
        let mut spans = vec![
            Span::styled(format!("  {:<24}", label.display_name()), styles::list_item_style()),
            Span::styled("[", styles::muted_style()),
            Span::styled(format!("{:>4}{}", input, cursor), styles::field_style(field_focused)),
            Span::styled("]", styles::muted_style()),
        ];
        if have_preview {
            let count = counts.get(label).copied().unwrap_or(0);
            spans.push(Span::styled(format!("  {} signed in", count), styles::muted_style()));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(button_line("Submit credits", focused && app.credit_focus == CreditFocus::Submit));
    lines.push(button_line("Show sign-ins", focused && app.credit_focus == CreditFocus::Preview));

    if have_preview {
        lines.push(Line::from(""));
        for record in &app.attendance_preview {
            let (mark, style) = if record.is_submitted() {
                ("✓", styles::success_style())
            } else {
                ("·", styles::list_item_style())
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", mark), style),
                Span::styled(record.player.persona.clone(), style),
                Span::styled(format!("  {}", record.class_name), styles::muted_style()),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines).block(section_block(app, Section::AdminOptions));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.display_mode {
        Some(mode) => format!(" {:?} ", mode),
        None if app.session.is_logged_in() => " No event ".to_string(),
        None => " Log in to continue ".to_string(),
    };
    let right_text = " [Tab] section | [Ctrl+E] event link | [Esc] quit ";

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(styles::status_bar_style()), area);
}

/// Stack current messages in the bottom-right corner of `area`, newest last
fn render_toasts(frame: &mut Frame, app: &App, area: Rect) {
    if app.toasts.is_empty() {
        return;
    }
    let messages: Vec<&str> = app.toasts.messages().collect();

    let width = messages
        .iter()
        .map(|m| m.chars().count() as u16 + 4)
        .max()
        .unwrap_or(0)
        .min(MAX_TOAST_WIDTH)
        .min(area.width);
    let height = (messages.len() as u16 + 2).min(area.height);
    let toast_area = Rect::new(
        area.x + area.width.saturating_sub(width),
        area.y + area.height.saturating_sub(height),
        width,
        height,
    );

    // Only the newest messages fit if there are more than rows
    let rows = height.saturating_sub(2) as usize;
    let lines: Vec<Line> = messages
        .iter()
        .skip(messages.len().saturating_sub(rows))
        .map(|m| {
            let style = if m.contains("failed") || m.contains("rejected") {
                styles::error_style()
            } else {
                styles::toast_style()
            };
            Line::from(Span::styled(format!(" {}", m), style))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::muted_style())
        .style(styles::toast_style());

    frame.render_widget(Clear, toast_area);
    frame.render_widget(Paragraph::new(lines).block(block), toast_area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 22, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", k), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let mut help_text: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect();
    help_text.push(Line::from(Span::styled(
        format!("              version {}", version),
        styles::muted_style(),
    )));
    help_text.extend([
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        key("Tab", "Next section"),
        key("Shift+Tab", "Previous section"),
        key("↑/↓", "Move between fields / pick a class"),
        key("Enter", "Press button / toggle"),
        key("Space", "Toggle attending in person"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        key("Ctrl+E", "Enter or replace the event link"),
        key("o", "Open the generated link"),
        key("Esc", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_event_link_overlay(frame: &mut Frame, app: &App) {
    let width = frame.area().width.saturating_sub(8).clamp(20, 90);
    let area = centered_rect_fixed(width, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            " Paste the event link (…?parkId=…&date=…):",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("{}▌", app.event_link_input), styles::selected_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" [Enter]", styles::help_key_style()),
            Span::styled(" load   ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(Span::styled(" Event Link ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 9, frame.area());
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
