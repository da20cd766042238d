use std::io;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use marquee_core::AppConfig;
use marquee_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    widgets::{HeadlineListWidget, StatusBarWidget},
    App,
};

pub fn run(config: &AppConfig) -> Result<()> {
    let keymap = Keymap::from_config(&config.keymap);
    let event_handler = EventHandler::new(config.ui.tick_rate_ms);
    let mut app = App::new(config);
    info!(rows = app.rows.len(), "Starting TUI");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Marquee"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &keymap, &event_handler);

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("TUI exited");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    keymap: &Keymap,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        app.tick();

        // Draw UI
        terminal.draw(|frame| {
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            HeadlineListWidget::render(frame, main_layout[0], app);
            StatusBarWidget::render(frame, main_layout[1], app);
        })?;

        // Row areas are known only after drawing
        app.measure_rows();

        let timeout = app.poll_timeout(event_handler.tick_rate());
        if let Some(event) = event_handler.next(timeout)? {
            // Pointer events schedule relative to the marquee clock, so catch it up first
            app.tick();
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, keymap);
                    app.apply_action(action);
                }
                AppEvent::Mouse(mouse) => {
                    if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                        app.on_mouse_move(mouse.column, mouse.row);
                    }
                }
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
