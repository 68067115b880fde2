use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use inplay_terminal::config::ModelConfig;
use inplay_terminal::demo_feed;
use inplay_terminal::staking::AdviceKind;
use inplay_terminal::state::{apply_delta, AppState, Delta, DemoCommand, InputField, trim_float};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<DemoCommand>>,
    demo: bool,
}

impl App {
    fn new(config: ModelConfig, cmd_tx: Option<mpsc::Sender<DemoCommand>>) -> Self {
        let demo = cmd_tx.is_some();
        Self {
            state: AppState::new(config),
            should_quit: false,
            cmd_tx,
            demo,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.editing.is_some() {
            match key.code {
                KeyCode::Enter => self.state.commit_edit(),
                KeyCode::Esc => self.state.cancel_edit(),
                KeyCode::Backspace => self.state.backspace_edit(),
                KeyCode::Char(c) => self.state.push_edit_char(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter | KeyCode::Char('e') => self.state.begin_edit(),
            KeyCode::Char('c') => self.state.evaluate(),
            KeyCode::Char('r') => {
                self.state.reset();
                if let Some(tx) = &self.cmd_tx {
                    if tx.send(DemoCommand::Restart).is_err() {
                        self.state.push_log("[WARN] Demo feed unreachable");
                    }
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = ModelConfig::from_env();

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("enter alt screen")?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend).context("create terminal")?;

    let (tx, rx) = mpsc::channel();
    let cmd_tx = if demo_feed::enabled() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        demo_feed::spawn_demo_provider(tx, cmd_rx);
        Some(cmd_tx)
    } else {
        drop(tx);
        None
    };

    let mut app = App::new(config, cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("leave alt screen")?;
    terminal.show_cursor().context("show cursor")?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(1)])
        .split(chunks[1]);

    render_form(frame, body[0], &app.state);
    render_outputs(frame, body[1], &app.state);

    let footer = Paragraph::new(
        "j/k/↑/↓ Move | Enter Edit | c Calculate | r Reset | ? Help | q Quit",
    )
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    format!(
        "EDGE TERMINAL | in-play odds model | evaluations: {} | demo feed: {}",
        app.state.evaluations,
        if app.demo { "on" } else { "off" }
    )
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::RIGHT).title("Inputs");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = inner.height as usize;
    if visible == 0 {
        return;
    }
    let (start, end) = visible_range(state.selected, InputField::COUNT, visible);

    for (row, idx) in (start..end).enumerate() {
        let field = InputField::ALL[idx];
        let selected = idx == state.selected;
        let row_area = Rect {
            x: inner.x,
            y: inner.y + row as u16,
            width: inner.width,
            height: 1,
        };

        let value_text = if selected && state.editing.is_some() {
            format!("{}_", state.editing.as_deref().unwrap_or(""))
        } else {
            trim_float(state.value(field))
        };
        let line = format!("{:<28} {:>12}", field.label(), value_text);

        let style = if selected && state.editing.is_some() {
            Style::default().fg(Color::Yellow).bg(Color::DarkGray)
        } else if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(line).style(style), row_area);
    }
}

fn render_outputs(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(8),
        ])
        .split(area);

    render_advice(frame, sections[0], state);
    render_fair_odds(frame, sections[1], state);
    render_insights(frame, sections[2], state);
    render_log(frame, sections[3], state);
}

fn render_advice(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::BOTTOM).title("Next goal");
    let (text, style) = match &state.evaluation {
        Some(eval) => {
            let style = match eval.advice.kind {
                AdviceKind::Lay => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                AdviceKind::Back => Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
                AdviceKind::None => Style::default(),
            };
            (eval.advice_text.clone(), style)
        }
        None => (
            "Enter match stats, then press c to evaluate".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(
        Paragraph::new(text).style(style).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_fair_odds(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::BOTTOM).title("Match odds");
    let text = match &state.evaluation {
        Some(eval) => format!(
            "Model: H {:.1}%  D {:.1}%  A {:.1}%\nFair:  H {:.2}  D {:.2}  A {:.2}",
            eval.outcome.home * 100.0,
            eval.outcome.draw * 100.0,
            eval.outcome.away * 100.0,
            eval.fair_match_odds.home,
            eval.fair_match_odds.draw,
            eval.fair_match_odds.away,
        ),
        None => "No evaluation yet".to_string(),
    };
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_insights(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::BOTTOM).title("Insights");
    let text = match &state.evaluation {
        Some(eval) if !eval.insights.is_empty() => eval.insights.join("\n"),
        Some(_) => "No signals firing".to_string(),
        None => String::new(),
    };
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_log(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Log");
    let keep = area.height.saturating_sub(1) as usize;
    let lines: Vec<&str> = state
        .logs
        .iter()
        .rev()
        .take(keep.max(1))
        .map(String::as_str)
        .collect();
    let text = lines
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n");
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = area.width.min(54);
    let height = area.height.min(13);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);

    let text = "Keys\n\
        j/k or arrows  select input field\n\
        Enter / e      edit the selected field\n\
        Esc            cancel the edit\n\
        c              run the model on current inputs\n\
        r              zero all fields and trend history\n\
        ?              toggle this help\n\
        q              quit\n\
        \n\
        Green = lay the next goal, red = back it.\n\
        Set DEMO_FEED=1 for a simulated match.";
    let help = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    frame.render_widget(help, popup);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total <= visible {
        return (0, total);
    }
    let half = visible / 2;
    let start = selected.saturating_sub(half).min(total - visible);
    (start, start + visible)
}
