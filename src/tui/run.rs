//! Effects boundary: event loop, terminal lifecycle, key reader.
//!
//! This is the only module with side effects. It wires a [`Model`] to the
//! real terminal via crossterm and ratatui, or to an in-memory buffer when
//! the program is headless.
//!
//! Architecture: producers feed a single mpsc channel.
//! - Caller threads send through a [`ProgramHandle`]
//! - The key reader thread forwards crossterm key and resize events
//! - Tick timers deliver delayed messages requested with `Cmd::Tick`
//!
//! The loop renders, blocks on the channel, drains whatever is pending
//! through `Model::update`, and renders again.

use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Once};
use std::thread;
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::{Backend, CrosstermBackend, TestBackend};
use ratatui::layout::Position;
use ratatui::{Terminal, TerminalOptions, Viewport};
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::options::{InputSource, ProgramOptions};
use super::state::{Cmd, Envelope, Model, TerminalEvent};
use super::view;

/// How long the key reader waits for input before re-checking its stop flag.
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// HANDLE
// ============================================================================

/// Thread-safe remote control for a running program.
pub struct ProgramHandle<M> {
    tx: Sender<Envelope<M>>,
    killed: Arc<AtomicBool>,
}

impl<M> Clone for ProgramHandle<M> {
    fn clone(&self) -> Self {
        ProgramHandle {
            tx: self.tx.clone(),
            killed: Arc::clone(&self.killed),
        }
    }
}

impl<M> ProgramHandle<M> {
    /// Enqueue a message for `Model::update`. Dropped if the loop has exited.
    pub fn send(&self, msg: M) {
        if self.tx.send(Envelope::Msg(msg)).is_err() {
            debug!("program has exited, dropping message");
        }
    }

    /// Stop the loop before it handles another message. No final render.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
        // Wake the loop if it is blocked on an empty queue.
        let _ = self.tx.send(Envelope::Kill);
    }

    pub fn is_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }
}

// ============================================================================
// PROGRAM
// ============================================================================

/// A model bound to a message queue, ready to run.
pub struct Program<M: Model> {
    model: M,
    options: ProgramOptions,
    tx: Sender<Envelope<M::Message>>,
    rx: Receiver<Envelope<M::Message>>,
    killed: Arc<AtomicBool>,
}

impl<M: Model> Program<M> {
    /// Bind a model to a fresh queue. Nothing touches the terminal until
    /// [`run`](Self::run).
    pub fn new(model: M, options: ProgramOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        Program {
            model,
            options,
            tx,
            rx,
            killed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A handle that can send to and kill this program from any thread.
    pub fn handle(&self) -> ProgramHandle<M::Message> {
        ProgramHandle {
            tx: self.tx.clone(),
            killed: Arc::clone(&self.killed),
        }
    }

    /// Run until the model quits or the program is killed.
    ///
    /// Blocks the calling thread. The model is always handed back, together
    /// with the loop's result: `Ok` after `Cmd::Quit`, `Error::Killed` after
    /// a kill, `Error::Io` when the terminal could not be set up or drawn.
    pub fn run(self) -> (M, Result<()>) {
        let Program {
            mut model,
            options,
            tx,
            rx,
            killed,
        } = self;

        let result = match options.headless {
            Some((width, height)) => run_headless(&mut model, width, height, &tx, &rx, &killed),
            None => run_interactive(&mut model, &options, &tx, &rx, &killed),
        };

        match &result {
            Ok(()) => debug!("program finished"),
            Err(e) => debug!(error = %e, "program ended with error"),
        }
        (model, result)
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

fn run_headless<M: Model>(
    model: &mut M,
    width: u16,
    height: u16,
    tx: &Sender<Envelope<M::Message>>,
    rx: &Receiver<Envelope<M::Message>>,
    killed: &AtomicBool,
) -> Result<()> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    drive(model, &mut terminal, tx, rx, killed)
}

fn run_interactive<M: Model>(
    model: &mut M,
    options: &ProgramOptions,
    tx: &Sender<Envelope<M::Message>>,
    rx: &Receiver<Envelope<M::Message>>,
    killed: &AtomicBool,
) -> Result<()> {
    install_panic_hook();

    let viewport = if options.alt_screen {
        Viewport::Fullscreen
    } else {
        let height = options
            .inline_height
            .unwrap_or_else(|| view::height(&model.view()));
        Viewport::Inline(height)
    };

    let mut terminal = setup_terminal(options.alt_screen, viewport)?;

    let stop = Arc::new(AtomicBool::new(false));
    if options.input == InputSource::Stdin {
        spawn_key_reader(tx.clone(), Arc::clone(&stop));
    }

    let result = drive(model, &mut terminal, tx, rx, killed);
    stop.store(true, Ordering::Relaxed);

    if !options.alt_screen {
        // Leave the last frame on screen and put the cursor below it.
        let bottom = terminal.get_frame().area().bottom();
        let _ = terminal.set_cursor_position(Position::new(0, bottom.saturating_sub(1)));
    }
    let _ = terminal.show_cursor();

    let restored = restore_terminal(options.alt_screen);
    if let Err(e) = &restored {
        warn!(error = %e, "failed to restore terminal");
    }
    if !options.alt_screen {
        println!();
    }

    result.and(restored.map_err(Error::from))
}

/// Set up the terminal for TUI mode.
fn setup_terminal(
    alt_screen: bool,
    viewport: Viewport,
) -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    if alt_screen {
        io::stdout().execute(EnterAlternateScreen)?;
        ALT_SCREEN_ACTIVE.store(true, Ordering::SeqCst);
    }
    let backend = CrosstermBackend::new(io::stdout());
    match Terminal::with_options(backend, TerminalOptions { viewport }) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = restore_terminal(alt_screen);
            Err(e)
        }
    }
}

/// Set while some program has entered the alternate screen.
static ALT_SCREEN_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Restore the terminal to normal mode.
fn restore_terminal(alt_screen: bool) -> io::Result<()> {
    disable_raw_mode()?;
    if alt_screen {
        leave_alternate_screen(&mut io::stdout())?;
    }
    Ok(())
}

/// Leave the alternate screen if a program entered it. At most once per entry.
fn leave_alternate_screen<W: Write>(out: &mut W) -> io::Result<()> {
    if ALT_SCREEN_ACTIVE.swap(false, Ordering::SeqCst) {
        out.execute(LeaveAlternateScreen)?;
    }
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            // Best-effort terminal restoration
            let _ = disable_raw_mode();
            let _ = leave_alternate_screen(&mut io::stdout());
            original_hook(panic_info);
        }));
    });
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that polls crossterm and forwards key and resize events.
fn spawn_key_reader<Msg>(tx: Sender<Envelope<Msg>>, stop: Arc<AtomicBool>)
where
    Msg: From<TerminalEvent> + Send + 'static,
{
    thread::spawn(move || forward_events(&tx, &stop, event::poll, event::read));
}

/// Forward terminal events until `stop` is set, reading fails or the
/// program is gone.
fn forward_events<Msg>(
    tx: &Sender<Envelope<Msg>>,
    stop: &AtomicBool,
    mut poll: impl FnMut(Duration) -> io::Result<bool>,
    mut read: impl FnMut() -> io::Result<Event>,
) where
    Msg: From<TerminalEvent>,
{
    while !stop.load(Ordering::Relaxed) {
        match poll(KEY_POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(_) => break,
        }
        // The program may have stopped while we were polling; leave the
        // key for whoever reads next.
        if stop.load(Ordering::Relaxed) {
            break;
        }
        let terminal_event = match read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => TerminalEvent::Key(key),
            Ok(Event::Resize(width, height)) => TerminalEvent::Resize { width, height },
            Ok(_) => continue, // ignore mouse, focus, paste, key release
            Err(_) => break,
        };
        if tx.send(Envelope::Msg(Msg::from(terminal_event))).is_err() {
            break; // receiver dropped, program is shutting down
        }
    }
}

/// Deliver a message after a delay.
fn spawn_tick<Msg: Send + 'static>(tx: Sender<Envelope<Msg>>, after: Duration, msg: Msg) {
    thread::spawn(move || {
        thread::sleep(after);
        // The program may be gone by now.
        let _ = tx.send(Envelope::Msg(msg));
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// The backend-independent loop: init, then render → wait → update.
fn drive<M, B>(
    model: &mut M,
    terminal: &mut Terminal<B>,
    tx: &Sender<Envelope<M::Message>>,
    rx: &Receiver<Envelope<M::Message>>,
    killed: &AtomicBool,
) -> Result<()>
where
    M: Model,
    B: Backend,
    Error: From<B::Error>,
{
    let mut quitting = execute(model.init(), tx);

    loop {
        if killed.load(Ordering::SeqCst) {
            debug!("program killed");
            return Err(Error::Killed);
        }

        let frame = model.view();
        terminal.draw(|f| view::render(&frame, f))?;

        if quitting {
            return Ok(());
        }

        // Block on the next envelope, then drain anything already queued
        // so a burst of messages costs one render.
        let mut next = match rx.recv() {
            Ok(envelope) => Some(envelope),
            Err(_) => return Ok(()), // all senders dropped
        };

        while let Some(envelope) = next.take() {
            if killed.load(Ordering::SeqCst) {
                break;
            }
            if let Envelope::Msg(msg) = envelope {
                quitting |= execute(model.update(msg), tx);
            }
            if quitting {
                break;
            }
            next = rx.try_recv().ok();
        }
    }
}

/// Interpret a command. Returns true if it asked the loop to quit.
fn execute<Msg: Send + 'static>(cmd: Cmd<Msg>, tx: &Sender<Envelope<Msg>>) -> bool {
    match cmd {
        Cmd::None => false,
        Cmd::Quit => true,
        Cmd::Msg(msg) => {
            let _ = tx.send(Envelope::Msg(msg));
            false
        }
        Cmd::Tick(after, msg) => {
            spawn_tick(tx.clone(), after, msg);
            false
        }
        Cmd::Batch(cmds) => cmds
            .into_iter()
            .fold(false, |quit, cmd| execute(cmd, tx) || quit),
    }
}

// ============================================================================
// TESTS
// ============================================================================
