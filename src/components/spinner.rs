//! Background spinner with a live status line.
//!
//! Lifecycle: `Created → Showing → Finished`.
//!
//! `show` registers the program synchronously and runs its loop on another
//! thread. Every prompt change while showing travels through the program's
//! message queue, so the loop is the only writer of the model and `finish`
//! is ordered after every earlier `refresh`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::text::{Line, Span, Text};
use tracing::debug;

use crate::error::{Error, Result};
use crate::shape::Shape;
use crate::tui::{Cmd, Model, ProgramOptions, TerminalEvent, theme};

use super::host::{Host, RunHandle};

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug)]
pub enum SpinnerMsg {
    /// Advance one frame.
    Tick,
    /// Replace the prompt.
    Refresh(String),
    /// Mark quited and leave the loop after one last render.
    Quit,
    /// Set the final prompt, if any, then quit. One message so nothing
    /// queued by another thread can land between the two.
    Finish(Option<String>),
    Terminal(TerminalEvent),
}

impl From<TerminalEvent> for SpinnerMsg {
    fn from(event: TerminalEvent) -> Self {
        SpinnerMsg::Terminal(event)
    }
}

/// The spinner's render state, owned by the run loop while showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerModel {
    pub shape: Shape,
    pub step: usize,
    pub prompt: String,
    pub quited: bool,
}

impl Default for SpinnerModel {
    fn default() -> Self {
        SpinnerModel {
            shape: Shape::default(),
            step: 0,
            prompt: "Loading...".to_string(),
            quited: false,
        }
    }
}

impl Model for SpinnerModel {
    type Message = SpinnerMsg;

    fn init(&mut self) -> Cmd<SpinnerMsg> {
        Cmd::tick(self.shape.interval, SpinnerMsg::Tick)
    }

    fn update(&mut self, msg: SpinnerMsg) -> Cmd<SpinnerMsg> {
        match msg {
            SpinnerMsg::Tick => {
                if self.quited {
                    return Cmd::none();
                }
                self.step = self.step.wrapping_add(1);
                Cmd::tick(self.shape.interval, SpinnerMsg::Tick)
            }
            SpinnerMsg::Refresh(prompt) => {
                self.prompt = prompt;
                Cmd::none()
            }
            SpinnerMsg::Quit => {
                self.quited = true;
                Cmd::quit()
            }
            SpinnerMsg::Finish(prompt) => {
                if let Some(prompt) = prompt {
                    self.prompt = prompt;
                }
                self.quited = true;
                Cmd::quit()
            }
            SpinnerMsg::Terminal(TerminalEvent::Key(key))
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c') =>
            {
                debug!("spinner interrupted");
                self.quited = true;
                Cmd::quit()
            }
            SpinnerMsg::Terminal(_) => Cmd::none(),
        }
    }

    fn view(&self) -> Text<'static> {
        let frame = self.shape.frame(self.step).trim_end();
        Text::from(Line::from(vec![
            Span::styled(frame.to_string(), theme::STYLE_SPINNER),
            Span::raw(" "),
            Span::raw(self.prompt.clone()),
        ]))
    }
}

// ============================================================================
// SPINNER
// ============================================================================

/// Construction-time options, applied in order.
#[derive(Debug, Clone)]
pub enum SpinnerOption {
    Shape(Shape),
    Prompt(String),
    Program(ProgramOptions),
}

enum Phase {
    Created,
    Showing(RunHandle),
    /// `show` could not launch the loop; reported by `finish`.
    Failed(Error),
    Finished,
}

pub struct Spinner {
    host: Arc<Host<SpinnerModel>>,
    options: ProgramOptions,
    phase: Mutex<Phase>,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    pub fn new() -> Self {
        Spinner {
            host: Arc::new(Host::new(SpinnerModel::default())),
            options: ProgramOptions::default(),
            phase: Mutex::new(Phase::Created),
        }
    }

    /// Apply options. Shape and prompt changes only take effect before `show`.
    pub fn apply(&mut self, ops: impl IntoIterator<Item = SpinnerOption>) -> &mut Self {
        for op in ops {
            match op {
                SpinnerOption::Shape(shape) => {
                    self.host.with_model_mut(|m| m.shape = shape);
                }
                SpinnerOption::Prompt(prompt) => {
                    self.host.with_model_mut(|m| m.prompt = prompt);
                }
                SpinnerOption::Program(options) => self.options = options,
            }
        }
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.apply([SpinnerOption::Shape(shape)]);
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.apply([SpinnerOption::Prompt(prompt.into())]);
        self
    }

    pub fn with_options(mut self, options: ProgramOptions) -> Self {
        self.apply([SpinnerOption::Program(options)]);
        self
    }

    fn phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Start animating on a background thread and return immediately.
    ///
    /// Only the first call has an effect. A launch failure is kept and
    /// returned by [`finish`](Self::finish).
    pub fn show(&self) -> &Self {
        let mut phase = self.phase();
        if !matches!(*phase, Phase::Created) {
            debug!("spinner already shown");
            return self;
        }
        *phase = match self.host.start_background(self.options.clone()) {
            Ok(run) => Phase::Showing(run),
            Err(e) => Phase::Failed(e),
        };
        self
    }

    /// Set the final prompt (if any), stop the animation and wait for the
    /// loop to exit. Returns the loop's error, if it produced one.
    ///
    /// The last rendered frame shows exactly the final prompt.
    pub fn finish(&self, prompt: Option<&str>) -> Result<()> {
        let prompt = prompt.map(str::to_string);
        let fallback = prompt.clone();
        self.host.send_or_apply(SpinnerMsg::Finish(prompt), move |m| {
            if let Some(prompt) = fallback {
                m.prompt = prompt;
            }
            m.quited = true;
        });

        let phase = std::mem::replace(&mut *self.phase(), Phase::Finished);
        match phase {
            Phase::Created | Phase::Finished => Ok(()),
            Phase::Showing(run) => run.wait(),
            Phase::Failed(e) => Err(e),
        }
    }

    /// Abort the animation without a final render.
    pub fn kill(&self) {
        self.host.kill();
    }

    // ========================================================================
    // PROMPT
    // ========================================================================

    /// Replace the status line. Safe from any thread.
    pub fn refresh(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        let fallback = prompt.clone();
        self.host
            .send_or_apply(SpinnerMsg::Refresh(prompt), move |m| m.prompt = fallback);
    }

    /// Format then replace the status line: `refreshf(format_args!("{} items", n))`.
    pub fn refreshf(&self, args: fmt::Arguments<'_>) {
        self.refresh(args.to_string());
    }

    /// The current prompt. `None` while the loop owns the model.
    pub fn prompt(&self) -> Option<String> {
        self.host.with_model(|m| m.prompt.clone())
    }

    /// Snapshot of the model once the loop has let go of it.
    pub fn model(&self) -> Option<SpinnerModel> {
        self.host.with_model(SpinnerModel::clone)
    }

    /// True while the loop is running. A killed or interrupted loop is not
    /// showing even before `finish` collects it.
    pub fn is_showing(&self) -> bool {
        matches!(*self.phase(), Phase::Showing(_)) && self.host.is_started()
    }

    pub fn is_finished(&self) -> bool {
        matches!(*self.phase(), Phase::Finished)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{DOT, LINE};
    use crate::tui::view::plain;
    use crossterm::event::KeyEvent;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn headless_spinner() -> Spinner {
        Spinner::new()
            .with_shape(DOT)
            .with_options(ProgramOptions::headless(40, 1))
    }

    #[test]
    fn show_refresh_finish_ends_with_final_prompt() {
        let spinner = headless_spinner();
        spinner.show();
        assert!(spinner.is_showing());
        spinner.refresh("loading");

        assert!(spinner.finish(Some("done")).is_ok());
        assert!(spinner.is_finished());

        let model = spinner.model().unwrap();
        assert!(model.quited);
        assert_eq!(model.prompt, "done");
        assert!(plain(&model.view()).ends_with(" done"));
    }

    #[test]
    fn refreshf_formats_prompt() {
        let spinner = Spinner::new();
        spinner.refreshf(format_args!("{} items", 3));
        assert_eq!(spinner.prompt().as_deref(), Some("3 items"));
    }

    #[test]
    fn refreshf_while_showing_reaches_loop() {
        let spinner = headless_spinner();
        spinner.show();
        spinner.refreshf(format_args!("{} items", 3));
        spinner.finish(None).unwrap();
        assert_eq!(spinner.prompt().as_deref(), Some("3 items"));
    }

    #[test]
    fn finish_without_show_applies_prompt() {
        let spinner = Spinner::new();
        assert!(spinner.finish(Some("skipped")).is_ok());
        let model = spinner.model().unwrap();
        assert_eq!(model.prompt, "skipped");
        assert!(model.quited);
    }

    #[test]
    fn refreshes_from_many_threads_all_land_before_finish() {
        let spinner = Arc::new(headless_spinner());
        spinner.show();

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let spinner = Arc::clone(&spinner);
                thread::spawn(move || {
                    for j in 0..25 {
                        spinner.refresh(format!("worker {i} step {j}"));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        spinner.finish(Some("all done")).unwrap();
        assert_eq!(spinner.prompt().as_deref(), Some("all done"));
    }

    #[test]
    fn concurrent_refreshes_cannot_displace_final_prompt() {
        for _ in 0..100 {
            let spinner = Arc::new(headless_spinner());
            spinner.show();

            let stop = Arc::new(AtomicBool::new(false));
            let ready = Arc::new(Barrier::new(5));
            let workers: Vec<_> = (0..4)
                .map(|_| {
                    let spinner = Arc::clone(&spinner);
                    let stop = Arc::clone(&stop);
                    let ready = Arc::clone(&ready);
                    thread::spawn(move || {
                        ready.wait();
                        // Queue-only sends: dropped once the loop is gone, so
                        // the model after `finish` is what the loop quit with.
                        while !stop.load(Ordering::Relaxed) {
                            spinner.host.send(SpinnerMsg::Refresh("worker".to_string()));
                        }
                    })
                })
                .collect();

            ready.wait();
            spinner.finish(Some("done")).unwrap();
            stop.store(true, Ordering::Relaxed);
            for worker in workers {
                worker.join().unwrap();
            }

            assert_eq!(spinner.prompt().as_deref(), Some("done"));
        }
    }

    #[test]
    fn finish_message_wins_over_later_refreshes() {
        let host = Arc::new(Host::new(SpinnerModel::default()));
        let run = host.start_background(ProgramOptions::headless(40, 1)).unwrap();
        host.send(SpinnerMsg::Finish(Some("done".to_string())));
        host.send(SpinnerMsg::Refresh("too late".to_string()));
        run.wait().unwrap();

        let model = host.with_model(SpinnerModel::clone).unwrap();
        assert!(model.quited);
        assert_eq!(model.prompt, "done");
    }

    #[test]
    fn killed_spinner_is_not_showing() {
        let spinner = headless_spinner();
        spinner.show();
        assert!(spinner.is_showing());
        spinner.kill();
        assert!(!spinner.is_showing());
        assert!(!spinner.is_finished());
        assert!(spinner.finish(None).unwrap_err().is_killed());
    }

    #[test]
    fn kill_then_refresh_never_restarts() {
        let spinner = headless_spinner();
        spinner.show();
        spinner.kill();
        spinner.refresh("ignored by loop");

        let result = spinner.finish(Some("after kill"));
        assert!(result.unwrap_err().is_killed());
        spinner.refresh("still fine");
        spinner.kill();
        assert!(!spinner.is_showing());
    }

    #[test]
    fn second_show_is_ignored() {
        let spinner = headless_spinner();
        spinner.show();
        spinner.show();
        assert!(spinner.finish(None).is_ok());
        spinner.show();
        assert!(spinner.is_finished());
    }

    #[test]
    fn animation_advances_while_showing() {
        let spinner = Spinner::new()
            .with_shape(LINE)
            .with_options(ProgramOptions::headless(20, 1));
        spinner.show();
        thread::sleep(LINE.interval * 4);
        spinner.finish(None).unwrap();
        assert!(spinner.model().unwrap().step > 0);
    }

    #[test]
    fn ticks_after_quit_do_not_reschedule() {
        let mut model = SpinnerModel::default();
        model.quited = true;
        assert!(model.update(SpinnerMsg::Tick).is_none());
        assert_eq!(model.step, 0);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut model = SpinnerModel::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let cmd = model.update(SpinnerMsg::Terminal(TerminalEvent::Key(key)));
        assert!(cmd.is_quit());
        assert!(model.quited);
    }

    #[test]
    fn view_trims_padded_frames() {
        let model = SpinnerModel {
            shape: DOT,
            step: 0,
            prompt: "working".to_string(),
            quited: false,
        };
        assert_eq!(plain(&model.view()), "⣾ working");
    }

    #[test]
    fn options_apply_in_order() {
        let mut spinner = Spinner::new();
        spinner.apply([
            SpinnerOption::Prompt("first".to_string()),
            SpinnerOption::Prompt("second".to_string()),
            SpinnerOption::Shape(DOT),
        ]);
        let model = spinner.model().unwrap();
        assert_eq!(model.prompt, "second");
        assert_eq!(model.shape, DOT);
    }
}
