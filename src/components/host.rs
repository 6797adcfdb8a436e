//! Component host: owns the lifecycle of one running program.
//!
//! The host keeps the model while idle and the program handle while
//! running, both behind one mutex. Started ⇔ a handle is present. The
//! model moves into the program on start and comes back when the run loop
//! returns, so callers can read the final state.
//!
//! `send` and `kill` never fail: on a host that is not started they do
//! nothing, so callers can use them without checking state first.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::error::{Error, Result};
use crate::tui::{Model, Program, ProgramHandle, ProgramOptions};

struct Slot<M: Model> {
    /// Present while no program owns the model.
    model: Option<M>,
    /// Present while started.
    handle: Option<ProgramHandle<M::Message>>,
}

/// Drives exactly one program at a time for a model.
pub struct Host<M: Model> {
    slot: Mutex<Slot<M>>,
}

impl<M: Model> Host<M> {
    fn lock(&self) -> MutexGuard<'_, Slot<M>> {
        // A panic while holding the lock cannot leave the slot half-written.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M> Host<M>
where
    M: Model + Send + 'static,
{
    pub fn new(model: M) -> Self {
        Host {
            slot: Mutex::new(Slot {
                model: Some(model),
                handle: None,
            }),
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Run the model and block until its loop returns.
    ///
    /// Returns whatever the loop produced. A host runs one program at a
    /// time: calling this while started (or while a killed program is
    /// still winding down) fails with [`Error::AlreadyStarted`].
    pub fn start(&self, options: ProgramOptions) -> Result<()> {
        let program = self.launch(options)?;
        self.complete(program)
    }

    /// Like [`start`](Self::start) but runs the loop on a new thread.
    ///
    /// The program is registered before this returns, so `send` and `kill`
    /// issued right after already reach it.
    pub fn start_background(self: &Arc<Self>, options: ProgramOptions) -> Result<RunHandle> {
        let program = self.launch(options)?;
        let host = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("component-run-loop".to_string())
            .spawn(move || host.complete(program));

        match spawned {
            Ok(thread) => Ok(RunHandle { thread }),
            Err(e) => {
                self.lock().handle = None;
                Err(Error::Io(e))
            }
        }
    }

    /// Stop the running program immediately, without a final render.
    /// No-op when not started.
    pub fn kill(&self) {
        if let Some(handle) = self.lock().handle.take() {
            handle.kill();
            debug!("component killed");
        }
    }

    /// Queue a message for the running program. Dropped when not started.
    pub fn send(&self, msg: M::Message) {
        match &self.lock().handle {
            Some(handle) => handle.send(msg),
            None => debug!("component not started, dropping message"),
        }
    }

    /// Queue a message if started, otherwise apply `f` to the idle model.
    ///
    /// The check and the delivery happen under one lock, so the change is
    /// never lost to a concurrent start or stop.
    pub fn send_or_apply(&self, msg: M::Message, f: impl FnOnce(&mut M)) {
        let mut slot = self.lock();
        if let Some(handle) = &slot.handle {
            handle.send(msg);
        } else if let Some(model) = slot.model.as_mut() {
            f(model);
        }
    }

    pub fn is_started(&self) -> bool {
        self.lock().handle.is_some()
    }

    // ========================================================================
    // MODEL ACCESS
    // ========================================================================

    /// Read the idle model. `None` while a program owns it.
    pub fn with_model<R>(&self, f: impl FnOnce(&M) -> R) -> Option<R> {
        self.lock().model.as_ref().map(f)
    }

    /// Mutate the idle model. `None` while a program owns it.
    pub fn with_model_mut<R>(&self, f: impl FnOnce(&mut M) -> R) -> Option<R> {
        self.lock().model.as_mut().map(f)
    }

    /// Take the model back. `None` if it was lost with its run thread.
    pub fn into_model(self) -> Option<M> {
        self.slot
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .model
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn launch(&self, options: ProgramOptions) -> Result<Program<M>> {
        let mut slot = self.lock();
        if slot.handle.is_some() {
            return Err(Error::AlreadyStarted);
        }
        let model = slot.model.take().ok_or(Error::AlreadyStarted)?;
        let program = Program::new(model, options);
        slot.handle = Some(program.handle());
        debug!("component started");
        Ok(program)
    }

    fn complete(&self, program: Program<M>) -> Result<()> {
        let release = Release(self);
        let (model, result) = program.run();
        {
            // One critical section, so a concurrent start sees either the
            // running program or the returned model.
            let mut slot = self.lock();
            slot.model = Some(model);
            slot.handle = None;
        }
        std::mem::forget(release);
        result
    }
}

/// Clears the started flag when the run loop ends, even by panic.
struct Release<'a, M: Model>(&'a Host<M>);

impl<M: Model> Drop for Release<'_, M> {
    fn drop(&mut self) {
        self.0.lock().handle = None;
    }
}

// ============================================================================
// RUN HANDLE
// ============================================================================

/// The eventual result of a loop started with `start_background`.
#[derive(Debug)]
pub struct RunHandle {
    thread: JoinHandle<Result<()>>,
}

impl RunHandle {
    /// Block until the loop returns and yield its result.
    pub fn wait(self) -> Result<()> {
        self.thread
            .join()
            .unwrap_or_else(|payload| Err(Error::Panicked(panic_message(payload.as_ref()))))
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::{Cmd, TerminalEvent};
    use proptest::prelude::*;
    use ratatui::text::Text;
    use std::time::Duration;

    #[derive(Debug)]
    enum Signal {
        Record(u32),
        Stop,
        Explode,
        Terminal,
    }

    impl From<TerminalEvent> for Signal {
        fn from(_: TerminalEvent) -> Self {
            Signal::Terminal
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<u32>,
    }

    impl Model for Recorder {
        type Message = Signal;

        fn update(&mut self, msg: Signal) -> Cmd<Signal> {
            match msg {
                Signal::Record(n) => {
                    self.seen.push(n);
                    Cmd::none()
                }
                Signal::Stop => Cmd::quit(),
                Signal::Explode => panic!("boom"),
                Signal::Terminal => Cmd::none(),
            }
        }

        fn view(&self) -> Text<'static> {
            Text::raw(self.seen.len().to_string())
        }
    }

    fn headless() -> ProgramOptions {
        ProgramOptions::headless(10, 1)
    }

    fn seen(host: &Host<Recorder>) -> Vec<u32> {
        host.with_model(|m| m.seen.clone()).unwrap()
    }

    #[test]
    fn send_before_start_is_dropped() {
        let host = Host::new(Recorder::default());
        host.send(Signal::Record(1));
        assert!(!host.is_started());
        assert!(seen(&host).is_empty());
    }

    #[test]
    fn kill_twice_on_idle_host_is_noop() {
        let host = Host::new(Recorder::default());
        host.kill();
        host.kill();
        assert!(!host.is_started());
        assert!(host.with_model(|_| ()).is_some());
    }

    #[test]
    fn background_start_delivers_messages_in_order() {
        let host = Arc::new(Host::new(Recorder::default()));
        let run = host.start_background(headless()).unwrap();
        assert!(host.is_started());

        for n in 0..10 {
            host.send(Signal::Record(n));
        }
        host.send(Signal::Stop);

        run.wait().unwrap();
        assert!(!host.is_started());
        assert_eq!(seen(&host), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn second_start_while_running_is_rejected() {
        let host = Arc::new(Host::new(Recorder::default()));
        let run = host.start_background(headless()).unwrap();

        assert!(matches!(host.start(headless()), Err(Error::AlreadyStarted)));

        host.send(Signal::Stop);
        run.wait().unwrap();
    }

    #[test]
    fn kill_ends_loop_and_later_calls_are_noops() {
        let host = Arc::new(Host::new(Recorder::default()));
        let run = host.start_background(headless()).unwrap();

        host.kill();
        assert!(!host.is_started());
        host.kill();
        host.send(Signal::Record(5));
        host.send_or_apply(Signal::Record(6), |_| {});

        assert!(run.wait().unwrap_err().is_killed());
        assert!(!host.is_started());
        assert!(seen(&host).is_empty());
    }

    #[test]
    fn send_or_apply_patches_idle_model() {
        let host = Host::new(Recorder::default());
        host.send_or_apply(Signal::Record(1), |m| m.seen.push(42));
        assert_eq!(seen(&host), vec![42]);
    }

    #[test]
    fn blocking_start_returns_model_to_host() {
        let host = Arc::new(Host::new(Recorder::default()));
        let sender = Arc::clone(&host);
        let feeder = thread::spawn(move || {
            while !sender.is_started() {
                thread::sleep(Duration::from_millis(1));
            }
            sender.send(Signal::Record(7));
            sender.send(Signal::Stop);
        });

        host.start(headless()).unwrap();
        feeder.join().unwrap();
        assert_eq!(seen(&host), vec![7]);
    }

    #[test]
    fn panicking_model_surfaces_as_error() {
        let host = Arc::new(Host::new(Recorder::default()));
        let run = host.start_background(headless()).unwrap();
        host.send(Signal::Explode);

        match run.wait() {
            Err(Error::Panicked(message)) => assert_eq!(message, "boom"),
            other => panic!("expected panic error, got {other:?}"),
        }
        // The model went down with the thread.
        assert!(!host.is_started());
        assert!(host.with_model(|_| ()).is_none());
        host.send(Signal::Record(1));
    }

    proptest! {
        #[test]
        fn sends_arrive_in_submission_order(values in prop::collection::vec(any::<u32>(), 0..50)) {
            let host = Arc::new(Host::new(Recorder::default()));
            let run = host.start_background(headless()).unwrap();
            for v in &values {
                host.send(Signal::Record(*v));
            }
            host.send(Signal::Stop);
            run.wait().unwrap();
            prop_assert_eq!(seen(&host), values);
        }
    }
}
