#![forbid(unsafe_code)]

//! Headless driver for [`Model`]s.
//!
//! `ProgramSimulator` runs the same update and continuation rules as
//! [`Program`](crate::program::Program) without a terminal: events and
//! messages go in, frames of any size come out, and every executed command
//! is recorded.
//!
//! ```ignore
//! let mut sim = ProgramSimulator::new(app);
//! sim.init();
//! sim.inject_event(Event::char('s'));
//! let frame = sim.capture_frame(80, 24);
//! assert!(frame.line(0).starts_with("[x] sort"));
//! ```

use vlist_widgets::Frame;

use crate::event::Event;
use crate::program::{Cmd, Model};

/// A command the simulator executed, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdRecord {
    None,
    Quit,
    /// A continuation message, fed back into `update`.
    Msg,
}

/// Deterministic stand-in for [`Program`](crate::program::Program).
pub struct ProgramSimulator<M: Model> {
    model: M,
    frames: Vec<Frame>,
    command_log: Vec<CmdRecord>,
    running: bool,
}

impl<M: Model> ProgramSimulator<M> {
    /// Wrap `model`. Nothing runs until [`init`](Self::init) or the first
    /// event.
    pub fn new(model: M) -> Self {
        Self {
            model,
            frames: Vec::new(),
            command_log: Vec::new(),
            running: true,
        }
    }

    /// Run `Model::init` and its command.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.follow(cmd);
    }

    /// Feed `events` in order, stopping once the model quits.
    pub fn inject_events(&mut self, events: &[Event]) {
        for &event in events {
            self.send(M::Message::from(event));
        }
    }

    /// Feed one event.
    pub fn inject_event(&mut self, event: Event) {
        self.send(M::Message::from(event));
    }

    /// Deliver `msg` directly. Ignored after quit.
    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        let cmd = self.model.update(msg);
        self.follow(cmd);
    }

    /// Render into a fresh `width` x `height` frame and keep it.
    pub fn capture_frame(&mut self, width: u16, height: u16) -> &Frame {
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        self.frames.push(frame);
        &self.frames[self.frames.len() - 1]
    }

    /// Every captured frame, oldest first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// `false` once a `Cmd::Quit` ran.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Commands executed so far.
    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    pub fn clear_command_log(&mut self) {
        self.command_log.clear();
    }

    fn follow(&mut self, mut cmd: Cmd<M::Message>) {
        loop {
            match cmd {
                Cmd::None => {
                    self.command_log.push(CmdRecord::None);
                    return;
                }
                Cmd::Quit => {
                    self.command_log.push(CmdRecord::Quit);
                    self.running = false;
                    return;
                }
                Cmd::Msg(msg) => {
                    self.command_log.push(CmdRecord::Msg);
                    cmd = self.model.update(msg);
                }
            }
        }
    }
}
