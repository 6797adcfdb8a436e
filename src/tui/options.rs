//! Runtime configuration applied when a program is constructed.

/// Where key events come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSource {
    /// Read keys from the controlling terminal on a background thread.
    #[default]
    Stdin,
    /// No key reader; the program only sees messages sent to it.
    None,
}

/// Options for [`Program::new`](super::run::Program::new).
///
/// The default renders inline below the cursor, sized to the model's
/// first view, and reads keys from the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgramOptions {
    /// Draw on the alternate screen instead of inline.
    pub alt_screen: bool,
    pub input: InputSource,
    /// Render into an in-memory buffer of this size. No raw mode, no
    /// key reader. Used for tests and non-interactive embedding.
    pub headless: Option<(u16, u16)>,
    /// Fixed height for the inline viewport.
    pub inline_height: Option<u16>,
}

impl ProgramOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for an in-memory program with no terminal attached.
    pub fn headless(width: u16, height: u16) -> Self {
        ProgramOptions {
            input: InputSource::None,
            headless: Some((width.max(1), height.max(1))),
            ..Default::default()
        }
    }

    pub fn with_alt_screen(mut self, enabled: bool) -> Self {
        self.alt_screen = enabled;
        self
    }

    pub fn without_input(mut self) -> Self {
        self.input = InputSource::None;
        self
    }

    pub fn with_inline_height(mut self, height: u16) -> Self {
        self.inline_height = Some(height.max(1));
        self
    }

    pub fn is_headless(&self) -> bool {
        self.headless.is_some()
    }
}
