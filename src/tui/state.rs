//! Runtime state algebra: the model contract and the values that flow
//! through the event loop.
//!
//! A model never touches the terminal. It receives messages, mutates
//! itself, and describes follow-up work as a [`Cmd`]. The effects layer
//! (`run`) interprets commands and draws whatever [`Model::view`] returns.

use std::fmt;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::text::Text;

// ============================================================================
// TERMINAL EVENTS
// ============================================================================

/// Input the runtime itself produces, converted into the model's message
/// type before delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A key press from the input reader thread.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize { width: u16, height: u16 },
}

// ============================================================================
// MODEL
// ============================================================================

/// The data and behavior driving one interactive view.
pub trait Model {
    /// Application messages. Terminal events are converted with `From`.
    type Message: From<TerminalEvent> + Send + 'static;

    /// Called once before the first render.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Apply one message.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Current renderable state.
    fn view(&self) -> Text<'static>;
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Side effect requested by `init` or `update`.
///
/// Models only describe these; the run loop executes them.
#[derive(Default)]
pub enum Cmd<M> {
    #[default]
    None,
    /// Render one final frame and leave the loop.
    Quit,
    /// Enqueue a message behind everything already queued.
    Msg(M),
    /// Enqueue a message once the duration has elapsed.
    Tick(Duration, M),
    /// Run several commands.
    Batch(Vec<Cmd<M>>),
}

impl<M> Cmd<M> {
    pub fn none() -> Self {
        Cmd::None
    }

    pub fn quit() -> Self {
        Cmd::Quit
    }

    pub fn msg(msg: M) -> Self {
        Cmd::Msg(msg)
    }

    pub fn tick(after: Duration, msg: M) -> Self {
        Cmd::Tick(after, msg)
    }

    /// Combine commands, dropping no-ops.
    pub fn batch(cmds: impl IntoIterator<Item = Cmd<M>>) -> Self {
        let mut cmds: Vec<Cmd<M>> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// True if executing this command ends the loop.
    pub fn is_quit(&self) -> bool {
        match self {
            Cmd::Quit => true,
            Cmd::Batch(cmds) => cmds.iter().any(Cmd::is_quit),
            _ => false,
        }
    }
}

impl<M: fmt::Debug> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cmd::None => write!(f, "None"),
            Cmd::Quit => write!(f, "Quit"),
            Cmd::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Cmd::Tick(d, m) => f.debug_tuple("Tick").field(d).field(m).finish(),
            Cmd::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
        }
    }
}

// ============================================================================
// LOOP ENVELOPE
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Producers (caller threads via `ProgramHandle`, the key reader thread,
/// tick timers) all feed one mpsc channel, so messages from a single
/// producer arrive in the order they were sent.
pub(crate) enum Envelope<M> {
    Msg(M),
    /// Wake-up after the kill flag was raised.
    Kill,
}

// ============================================================================
// TESTS
// ============================================================================
