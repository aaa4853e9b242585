use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{error, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::enhance::{EnhanceClient, EnhanceWorker};
use crate::io::link::{EngineLink, LinkEvent};
use crate::model::{ConnectionStatus, DirectorConfig, EditorSession, EventKind};
use crate::ops::director::{Applied, Director};
use crate::ops::hit_test::HitTarget;

use super::editor::EditorState;
use super::input;
use super::render;
use super::theme::Theme;

/// How long a status message stays up
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Input poll timeout; also the link/enhancement polling cadence
const TICK: Duration = Duration::from_millis(50);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Editor,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub at: Instant,
}

/// Main application state
pub struct App {
    pub director: Director<EngineLink>,
    pub config: DirectorConfig,
    pub theme: Theme,
    pub mode: Mode,
    /// Keyboard cursor on the timeline
    pub cursor_frame: u32,
    /// Frame under the mouse, while it is over the track
    pub hover_frame: Option<u32>,
    pub editor: Option<EditorState>,
    pub enhancer: EnhanceWorker,
    pub status: Option<StatusMessage>,
    /// Where the track was last drawn, for mouse hit testing
    pub track_area: Option<Rect>,
    pub should_quit: bool,
    dirty: bool,
}

impl App {
    pub fn new(config: DirectorConfig) -> Self {
        let link = EngineLink::new(config.engine.url.clone());
        let director = Director::new(link, config.timeline);
        let enhancer = EnhanceWorker::new(EnhanceClient::new(&config.enhance));
        App {
            director,
            theme: Theme::from_config(&config.ui),
            config,
            mode: Mode::Navigate,
            cursor_frame: 0,
            hover_frame: None,
            editor: None,
            enhancer,
            status: None,
            track_area: None,
            should_quit: false,
            dirty: true,
        }
    }

    pub fn max_frames(&self) -> u32 {
        self.director.timeline().max_frames
    }

    pub fn is_connected(&self) -> bool {
        self.director.is_connected()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.push_status(text.into(), StatusKind::Info);
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.push_status(text.into(), StatusKind::Error);
    }

    fn push_status(&mut self, text: String, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text,
            kind,
            at: Instant::now(),
        });
        self.dirty = true;
    }

    pub fn move_cursor_to(&mut self, frame: u32) {
        self.cursor_frame = frame.min(self.max_frames().saturating_sub(1));
        self.dirty = true;
    }

    /// Open the dialog for whatever `frame` hits: the nearby marker within
    /// tolerance, or a new prompt at `frame` itself.
    pub fn open_editor_at(&mut self, frame: u32) {
        if !self.is_connected() {
            self.set_error("Connect to the engine first (c)");
            return;
        }
        let session = match self.director.classify(frame) {
            HitTarget::Edit(f) => {
                let text = self.director.schedule().get(f).unwrap_or_default();
                EditorSession::edit(f, text)
            }
            HitTarget::Create(f) => EditorSession::create(f),
        };
        self.cursor_frame = session.frame;
        self.editor = Some(EditorState::new(session));
        self.mode = Mode::Editor;
        self.dirty = true;
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
        self.mode = Mode::Navigate;
        self.dirty = true;
    }

    /// `c`: connect, or drop the connection (also cancels a pending one)
    pub fn toggle_connection(&mut self) {
        let link = self.director.sink_mut();
        if link.status() == ConnectionStatus::Disconnected {
            link.connect();
            self.set_status(format!("Connecting to {}", self.config.engine.url));
        } else {
            link.disconnect();
        }
    }

    /// Drain link events and finished enhancements. Called every tick.
    pub fn pump(&mut self) {
        let events = self.director.sink_mut().poll();
        for evt in events {
            self.on_link_event(evt);
        }
        for outcome in self.enhancer.poll() {
            let result = outcome.result.map_err(|e| e.to_string());
            if let Some(ed) = &mut self.editor
                && ed.finish_enhance(outcome.ticket, result)
            {
                self.dirty = true;
            }
        }
    }

    pub fn on_link_event(&mut self, evt: LinkEvent) {
        match evt {
            LinkEvent::Status(status) => {
                if let Some(t) = self.director.set_connection(status) {
                    if t.is_disconnect() {
                        // Nothing can be scheduled without a connection.
                        if self.editor.is_some() {
                            self.close_editor();
                        }
                        self.set_error("Disconnected from engine");
                    } else if status.is_ready() {
                        self.set_status("Connected");
                    }
                }
            }
            LinkEvent::Message(message) => {
                let applied = self.director.apply_message(message);
                if applied == Applied::Event(EventKind::Error) {
                    let err = self
                        .director
                        .last_engine_error()
                        .unwrap_or("engine error")
                        .to_string();
                    self.set_error(err);
                }
            }
            LinkEvent::CommandFailed { command, error } => {
                self.set_error(format!("{} failed: {}", command, error));
            }
        }
    }

    /// Expire the status message. Returns whether anything changed.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        if self
            .status
            .as_ref()
            .is_some_and(|s| now.duration_since(s.at) >= STATUS_TTL)
        {
            self.status = None;
            return true;
        }
        false
    }

    /// Read and lower the redraw flag (app and controller)
    pub fn take_dirty(&mut self) -> bool {
        let director_dirty = self.director.take_dirty();
        std::mem::take(&mut self.dirty) | director_dirty
    }
}

/// Run the TUI application
pub fn run(config: DirectorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config);
    if app.config.engine.connect_on_start {
        app.toggle_connection();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal before the panic message prints
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    info!("tui started");
    let result = run_event_loop(&mut terminal, &mut app);
    if let Err(e) = &result {
        error!("tui stopped: {}", e);
    }
    app.director.sink_mut().disconnect();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if app.take_dirty() {
            terminal.draw(|frame| render::render(frame, app))?;
        }

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                Event::Resize(..) => app.mark_dirty(),
                _ => {}
            }
        }

        app.pump();
        if app.expire_status(Instant::now()) {
            app.mark_dirty();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
