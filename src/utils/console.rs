//! User-facing progress output on stdout

/// Prints progress lines unless silenced (e.g. when a JSON report owns stdout)
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// A console that prints nothing
    pub fn silent() -> Self {
        Self { quiet: true }
    }

    pub fn line(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }

    pub fn blank(&self) {
        self.line("");
    }

    /// Horizontal rule, e.g. `=` x 50
    pub fn rule(&self, ch: char, width: usize) {
        self.line(ch.to_string().repeat(width));
    }

    /// Title followed by a rule of the same family the scripts used
    pub fn section(&self, title: impl AsRef<str>, width: usize) {
        self.line(title);
        self.rule('=', width);
    }
}
