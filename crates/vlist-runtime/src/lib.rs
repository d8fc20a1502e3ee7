#![forbid(unsafe_code)]

//! Runtime for vlist: the `Model`/`Cmd` update loop, a crossterm-backed
//! terminal program, and a deterministic simulator for tests.

pub mod event;
pub mod program;
pub mod simulator;
pub mod terminal_session;

pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, Wheel};
pub use program::{Cmd, Model, Program, ProgramConfig};
pub use simulator::{CmdRecord, ProgramSimulator};
pub use terminal_session::{SessionOptions, TerminalSession};
