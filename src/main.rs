mod analysis;
mod app;
mod config;
mod event;
mod identity;
mod scoring;
mod session;
mod store;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use app::{App, AppScreen, StatusLevel};
use config::Config;
use event::{AppEvent, EventHandler};
use identity::Identity;
use store::json_store::JsonStore;
use ui::components::highlight;
use ui::components::history_list::HistoryList;
use ui::components::reference_panel::ReferencePanel;
use ui::layout::{centered_rect, screen_rows};

#[derive(Parser)]
#[command(
    name = "typewise",
    version,
    about = "Terminal typing practice against transcribed audio or text files"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Record the signed-in identity that scopes practice history
    Login {
        /// Display name of the user
        name: String,
    },
    /// Clear the signed-in identity
    Logout,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        return run_command(command);
    }

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_command(command: Command) -> Result<()> {
    let store = JsonStore::new().context("could not open the data directory")?;
    match command {
        Command::Login { name } => {
            let identity = Identity::from_name(&name);
            store.save_identity(&identity)?;
            println!("Signed in as {} (id: {})", identity.name, identity.id);
        }
        Command::Logout => {
            store.clear_identity()?;
            println!("Signed out.");
        }
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            // Ticks just trigger a redraw; the elapsed clock and live WPM are
            // resampled from the session timer on every frame.
            AppEvent::Tick => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
        AppScreen::HistoryDetail => handle_history_detail_key(app, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            if app.path_input.is_empty() {
                app.should_quit = true;
            } else {
                app.path_input.clear();
            }
        }
        KeyCode::Enter => app.select_file(),
        KeyCode::Tab => app.open_history(),
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(ch) => app.path_input.push(ch),
        _ => {}
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
        app.show_result();
        return;
    }
    match key.code {
        KeyCode::Esc => app.reset(),
        KeyCode::Enter => app.type_char('\n'),
        KeyCode::Tab => app.type_char('\t'),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Esc => app.reset(),
        KeyCode::Char('h') => app.open_history(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.screen = AppScreen::Home,
        KeyCode::Down | KeyCode::Char('j') => app.history_next(),
        KeyCode::Up | KeyCode::Char('k') => app.history_prev(),
        KeyCode::Enter => {
            if app.selected_entry().is_some() {
                app.screen = AppScreen::HistoryDetail;
            }
        }
        _ => {}
    }
}

fn handle_history_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => {
            app.screen = AppScreen::History;
        }
        _ => {}
    }
}

fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::Practice => render_practice(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::History => render_history(frame, app),
        AppScreen::HistoryDetail => render_history_detail(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, info: &str) {
    let colors = &app.theme.colors;
    let user = match &app.identity {
        Some(identity) => format!(" {} ", identity.name),
        None => " signed out ".to_string(),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " typewise ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info.to_string(),
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
        Span::styled(
            user,
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, hints: &str) {
    let colors = &app.theme.colors;
    let line = match &app.status {
        Some(status) => {
            let color = match status.level {
                StatusLevel::Info => colors.accent(),
                StatusLevel::Warning => colors.warning(),
                StatusLevel::Error => colors.error(),
            };
            Line::from(Span::styled(
                format!(" {}", status.text),
                Style::default().fg(color),
            ))
        }
        None => Line::from(Span::styled(
            hints.to_string(),
            Style::default().fg(colors.text_pending()),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let (header, main, footer) = screen_rows(frame.area());
    render_header(frame, app, header, " load a file to practice ");

    let center = centered_rect(70, 50, main);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(center);

    let welcome = match &app.identity {
        Some(_) => "Enter the path of an audio or text file, then press Enter.",
        None => "You are signed out. Run `typewise login <name>` to start a test.",
    };
    frame.render_widget(
        Paragraph::new(welcome).style(Style::default().fg(colors.fg())),
        rows[0],
    );

    let input = Paragraph::new(Line::from(vec![
        Span::styled(app.path_input.clone(), Style::default().fg(colors.fg())),
        Span::styled("\u{2588}", Style::default().fg(colors.accent())),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border()))
            .title(" File path "),
    );
    frame.render_widget(input, rows[1]);

    render_footer(
        frame,
        app,
        footer,
        " [Enter] Load file  [Tab] History  [Esc] Quit ",
    );
}

fn render_practice(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let (header, main, footer) = screen_rows(frame.area());

    let now = std::time::Instant::now();
    let elapsed = app.session.elapsed_secs(now);
    let wpm = app.session.live_wpm(now);
    let word_count = app.session.reference_text.split_whitespace().count();
    let info = format!(
        " {} | {} words | {} | {:.0} wpm ",
        app.session.source_name,
        word_count,
        format_elapsed(elapsed),
        wpm,
    );
    render_header(frame, app, header, &info);

    let panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main);

    frame.render_widget(
        ReferencePanel::new(
            &app.session.reference_text,
            &app.session.typed_text,
            &app.theme,
        ),
        panes[0],
    );

    let typed = Paragraph::new(app.session.typed_text.clone())
        .style(Style::default().fg(colors.fg()))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border()))
                .title(" Your typing "),
        );
    frame.render_widget(typed, panes[1]);

    render_footer(
        frame,
        app,
        footer,
        " [Ctrl+S] Show result  [Esc] Abandon session ",
    );
}

fn metric_lines<'a>(app: &'a App, entry_elapsed: u64, record: &'a session::ResultRecord) -> Vec<Line<'a>> {
    let colors = &app.theme.colors;
    let label = Style::default().fg(colors.text_pending());
    let value = Style::default()
        .fg(colors.accent())
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Typing speed  ", label),
            Span::styled(format!("{:.1} wpm", record.typing_speed_wpm), value),
        ]),
        Line::from(vec![
            Span::styled("Accuracy      ", label),
            Span::styled(format!("{:.0}%", record.accuracy), value),
        ]),
        Line::from(vec![
            Span::styled("Time taken    ", label),
            Span::styled(format_elapsed(entry_elapsed), value),
        ]),
        Line::from(vec![
            Span::styled("Consistency   ", label),
            Span::styled(record.timing_label.clone(), value),
        ]),
    ];

    if !record.error_summary.is_empty() {
        let summary = record
            .error_summary
            .iter()
            .map(|(category, count)| format!("{category}: {count}"))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(Line::from(vec![
            Span::styled("Errors        ", label),
            Span::styled(summary, Style::default().fg(colors.warning())),
        ]));
    }
    if !record.overall_remarks.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            record.overall_remarks.clone(),
            Style::default().fg(colors.fg()),
        )));
    }
    lines
}

fn render_record(
    frame: &mut ratatui::Frame,
    app: &App,
    area: ratatui::layout::Rect,
    record: &session::ResultRecord,
    reference: &str,
    typed: &str,
    elapsed: u64,
) {
    let colors = &app.theme.colors;
    let panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(area);

    let metrics = Paragraph::new(metric_lines(app, elapsed, record))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border()))
                .title(" Result "),
        );
    frame.render_widget(metrics, panes[0]);

    // The service highlight when present, otherwise local positional
    // coloring of the reference against the final transcript.
    if record.highlighted_reference_html.trim().is_empty() {
        frame.render_widget(ReferencePanel::new(reference, typed, &app.theme), panes[1]);
    } else {
        let lines = highlight::lines_from_html(&record.highlighted_reference_html, &app.theme);
        let analysis = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border()))
                .title(" Highlighted analysis "),
        );
        frame.render_widget(analysis, panes[1]);
    }
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let (header, main, footer) = screen_rows(frame.area());
    render_header(frame, app, header, " session complete ");

    if let Some(record) = app.session.record.as_ref() {
        let elapsed = app.session.elapsed_secs(std::time::Instant::now());
        render_record(
            frame,
            app,
            main,
            record,
            &app.session.reference_text,
            &app.session.typed_text,
            elapsed,
        );
    }

    render_footer(
        frame,
        app,
        footer,
        " [r] New session  [h] History  [q] Quit ",
    );
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let (header, main, footer) = screen_rows(frame.area());
    render_header(frame, app, header, " your past results ");

    frame.render_widget(
        HistoryList::new(&app.history, app.history_selected, &app.theme),
        main,
    );

    render_footer(
        frame,
        app,
        footer,
        " [j/k] Navigate  [Enter] Details  [Esc] Back ",
    );
}

fn render_history_detail(frame: &mut ratatui::Frame, app: &App) {
    let (header, main, footer) = screen_rows(frame.area());

    if let Some(entry) = app.selected_entry() {
        let info = format!(
            " {} | {} ",
            entry.source_file_name,
            entry.created_at.format("%Y-%m-%d %H:%M"),
        );
        render_header(frame, app, header, &info);
        render_record(
            frame,
            app,
            main,
            &entry.record,
            &entry.reference_text,
            &entry.typed_text,
            entry.elapsed_seconds,
        );
    } else {
        render_header(frame, app, header, " no entry selected ");
    }

    render_footer(frame, app, footer, " [Esc] Back to history ");
}
