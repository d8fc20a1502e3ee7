#![forbid(unsafe_code)]

//! RAII ownership of the terminal.
//!
//! [`TerminalSession`] records every mode it switches on and switches them
//! off again, newest first, when dropped. Panics and (on Unix) SIGINT or
//! SIGTERM skip `Drop`, so a panic hook and a signal thread run the same
//! restore for every mode regardless of what was enabled.

use std::io::{self, Write};
use std::sync::Once;
use std::time::Duration;

use crate::event::Event;

/// Which optional modes a session enables. Raw mode and the hidden cursor
/// are always on.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Draw on the alternate screen buffer.
    pub alternate_screen: bool,
    /// Report mouse wheel events.
    pub mouse_capture: bool,
}

/// A terminal mode the session switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Raw,
    AlternateScreen,
    MouseCapture,
    HiddenCursor,
}

impl Mode {
    /// Every mode, in the order a session enables them.
    const ALL: [Mode; 4] = [
        Mode::Raw,
        Mode::AlternateScreen,
        Mode::MouseCapture,
        Mode::HiddenCursor,
    ];

    fn wanted(self, options: &SessionOptions) -> bool {
        match self {
            Mode::Raw | Mode::HiddenCursor => true,
            Mode::AlternateScreen => options.alternate_screen,
            Mode::MouseCapture => options.mouse_capture,
        }
    }

    fn enable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Mode::Raw => crossterm::terminal::enable_raw_mode(),
            Mode::AlternateScreen => {
                crossterm::execute!(out, crossterm::terminal::EnterAlternateScreen)
            }
            Mode::MouseCapture => crossterm::execute!(out, crossterm::event::EnableMouseCapture),
            Mode::HiddenCursor => crossterm::execute!(out, crossterm::cursor::Hide),
        }
    }

    fn disable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Mode::Raw => crossterm::terminal::disable_raw_mode(),
            Mode::AlternateScreen => {
                crossterm::execute!(out, crossterm::terminal::LeaveAlternateScreen)
            }
            Mode::MouseCapture => crossterm::execute!(out, crossterm::event::DisableMouseCapture),
            Mode::HiddenCursor => crossterm::execute!(out, crossterm::cursor::Show),
        }
    }
}

/// Restore every mode, ignoring failures. Used where no session is at hand.
fn restore_all() {
    let mut out = io::stdout();
    for mode in Mode::ALL.into_iter().rev() {
        let _ = mode.disable(&mut out);
    }
    let _ = out.flush();
}

/// Owns raw mode and the other enabled modes until dropped.
///
/// Only one session should exist at a time.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    enabled: Vec<Mode>,
    #[cfg(unix)]
    _signals: Option<signals::SignalGuard>,
}

impl TerminalSession {
    /// Enable raw mode plus whatever `options` asks for.
    ///
    /// # Errors
    ///
    /// Returns the first mode switch that fails; modes already enabled are
    /// restored before returning.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        let mut session = Self {
            options,
            enabled: Vec::with_capacity(Mode::ALL.len()),
            #[cfg(unix)]
            _signals: None,
        };
        let mut out = io::stdout();
        for mode in Mode::ALL {
            if mode.wanted(&session.options) {
                mode.enable(&mut out)?;
                tracing::info!(?mode, "terminal mode enabled");
                session.enabled.push(mode);
            }
        }
        #[cfg(unix)]
        {
            session._signals = Some(signals::SignalGuard::spawn()?);
        }
        Ok(session)
    }

    /// Terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Wait up to `timeout` for input; `Ok(true)` when an event is ready.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Read the next event, blocking. `Ok(None)` for input the list ignores.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        crossterm::event::read().map(Event::from_crossterm)
    }

    /// The options this session was created with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        #[cfg(unix)]
        drop(self._signals.take());

        let mut out = io::stdout();
        while let Some(mode) = self.enabled.pop() {
            if let Err(err) = mode.disable(&mut out) {
                tracing::warn!(?mode, %err, "failed to restore terminal mode");
            }
        }
        let _ = out.flush();
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_all();
            previous(info);
        }));
    });
}

#[cfg(unix)]
mod signals {
    use std::io;
    use std::thread::JoinHandle;

    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::{Handle, Signals};

    /// Restores the terminal and exits with `128 + signal` on SIGINT/SIGTERM.
    #[derive(Debug)]
    pub(super) struct SignalGuard {
        handle: Handle,
        thread: Option<JoinHandle<()>>,
    }

    impl SignalGuard {
        pub(super) fn spawn() -> io::Result<Self> {
            let mut signals = Signals::new([SIGINT, SIGTERM])?;
            let handle = signals.handle();
            let thread = std::thread::Builder::new()
                .name("vlist-signals".into())
                .spawn(move || {
                    if let Some(signal) = signals.forever().next() {
                        tracing::warn!(signal, "termination signal, restoring terminal");
                        super::restore_all();
                        std::process::exit(128 + signal);
                    }
                })?;
            Ok(Self {
                handle,
                thread: Some(thread),
            })
        }
    }

    impl Drop for SignalGuard {
        fn drop(&mut self) {
            self.handle.close();
            if let Some(thread) = self.thread.take() {
                let _ = thread.join();
            }
        }
    }
}
