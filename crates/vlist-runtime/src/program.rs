#![forbid(unsafe_code)]

//! Elm-style runtime for terminal applications.
//!
//! State lives in a [`Model`]; `update` turns a message into a state change
//! plus a [`Cmd`], and `view` draws the current state into a [`Frame`].
//! [`Program`] drives a model against the real terminal.
//!
//! # Example
//!
//! ```ignore
//! use vlist_runtime::{Cmd, Event, Model};
//! use vlist_widgets::Frame;
//!
//! struct Counter {
//!     count: i32,
//! }
//!
//! enum Msg {
//!     Increment,
//!     Quit,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(event: Event) -> Self {
//!         match event {
//!             Event::Key(k) if k.is_char('q') => Msg::Quit,
//!             _ => Msg::Increment,
//!         }
//!     }
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => { self.count += 1; Cmd::none() }
//!             Msg::Quit => Cmd::quit(),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         frame.print(0, 0, &self.count.to_string(), frame.width());
//!     }
//! }
//! ```

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{cursor, queue, style, terminal};
use tracing::{debug, debug_span, info};
use vlist_widgets::Frame;

use crate::event::Event;
use crate::terminal_session::{SessionOptions, TerminalSession};

/// Upper bound on how long the loop blocks waiting for input.
const MAX_POLL: Duration = Duration::from_millis(100);

/// Application state and behavior.
pub trait Model: Sized {
    /// Messages the model handles. Terminal events convert into them.
    type Message: From<Event>;

    /// Startup command, run once before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Apply `msg` and say what should happen next.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Draw the current state.
    fn view(&self, frame: &mut Frame);
}

/// What the runtime does after an `update`.
///
/// A [`Cmd::Msg`] is fed straight back into `update` on the same thread
/// before the next event is read or the next frame drawn. That makes it the
/// way to run a continuation after a state commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd<M> {
    /// Nothing further.
    None,
    /// Stop the program.
    Quit,
    /// Deliver a follow-up message.
    Msg(M),
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Stable name for tracing fields.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Msg(_) => "Msg",
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Terminal modes to enable.
    pub session: SessionOptions,
    /// Quit automatically after this long (smoke runs).
    pub exit_after: Option<Duration>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self::fullscreen()
    }
}

impl ProgramConfig {
    /// Alternate screen, no mouse.
    pub fn fullscreen() -> Self {
        Self {
            session: SessionOptions {
                alternate_screen: true,
                mouse_capture: false,
            },
            exit_after: None,
        }
    }

    /// Enable mouse capture (wheel scrolling).
    pub fn with_mouse(mut self) -> Self {
        self.session.mouse_capture = true;
        self
    }

    /// Quit automatically after `duration`.
    pub fn with_exit_after(mut self, duration: Duration) -> Self {
        self.exit_after = Some(duration);
        self
    }
}

/// Runs a [`Model`] against the real terminal.
pub struct Program<M: Model> {
    model: M,
    session: TerminalSession,
    out: Stdout,
    config: ProgramConfig,
    running: bool,
    size: (u16, u16),
    /// Lines on screen from the previous frame; `None` forces a full redraw.
    screen: Option<Vec<String>>,
}

impl<M: Model> Program<M> {
    /// Create a program with the default configuration.
    pub fn new(model: M) -> io::Result<Self> {
        Self::with_config(model, ProgramConfig::default())
    }

    /// Create a program, entering the terminal session immediately.
    pub fn with_config(model: M, config: ProgramConfig) -> io::Result<Self> {
        let session = TerminalSession::new(config.session.clone())?;
        let (width, height) = session.size()?;
        info!(width, height, "program created");
        Ok(Self {
            model,
            session,
            out: io::stdout(),
            config,
            running: true,
            size: (width.max(1), height.max(1)),
            screen: None,
        })
    }

    /// Run the event loop until the model quits or the exit deadline passes.
    pub fn run(&mut self) -> io::Result<()> {
        let deadline = self.config.exit_after.map(|d| Instant::now() + d);

        let cmd = self.model.init();
        self.follow(cmd, "init");
        self.draw()?;

        while self.running {
            let timeout = deadline.map_or(MAX_POLL, |d| {
                MAX_POLL.min(d.saturating_duration_since(Instant::now()))
            });
            if deadline.is_some_and(|d| Instant::now() >= d) {
                info!("exit-after deadline reached");
                break;
            }

            // Drain everything queued before drawing once.
            let mut handled = false;
            let mut wait = timeout;
            while self.running && self.session.poll_event(wait)? {
                if let Some(event) = self.session.read_event()? {
                    self.handle_event(event)?;
                    handled = true;
                }
                wait = Duration::ZERO;
            }

            if handled && self.running {
                self.draw()?;
            }
        }
        Ok(())
    }

    /// Read access to the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Whether the program is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        if let Event::Resize { width, height } = event {
            debug!(width, height, "resize event received");
            self.size = (width.max(1), height.max(1));
            self.screen = None;
            queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
        }
        self.dispatch(M::Message::from(event), "event");
        Ok(())
    }

    fn dispatch(&mut self, msg: M::Message, source: &'static str) {
        let cmd = {
            let _span = debug_span!(
                "vlist.program.update",
                msg_type = source,
                duration_us = tracing::field::Empty,
                cmd_type = tracing::field::Empty
            )
            .entered();
            let start = Instant::now();
            let cmd = self.model.update(msg);
            tracing::Span::current().record("duration_us", start.elapsed().as_micros() as u64);
            tracing::Span::current().record("cmd_type", cmd.type_name());
            cmd
        };
        self.follow(cmd, source);
    }

    /// Execute `cmd`, looping through `Cmd::Msg` continuations.
    fn follow(&mut self, mut cmd: Cmd<M::Message>, source: &'static str) {
        loop {
            match cmd {
                Cmd::None => return,
                Cmd::Quit => {
                    debug!(source, "quit requested");
                    self.running = false;
                    return;
                }
                Cmd::Msg(msg) => cmd = self.model.update(msg),
            }
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let (width, height) = self.size;
        let _span = debug_span!("vlist.program.render", width, height).entered();
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        let lines = frame.lines();

        let previous = self.screen.take().unwrap_or_default();
        for (y, line) in lines.iter().enumerate() {
            if previous.get(y) == Some(line) {
                continue;
            }
            queue!(
                self.out,
                cursor::MoveTo(0, y as u16),
                style::Print(line),
                terminal::Clear(terminal::ClearType::UntilNewLine)
            )?;
        }
        self.out.flush()?;
        self.screen = Some(lines);
        Ok(())
    }
}
