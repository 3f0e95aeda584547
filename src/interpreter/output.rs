use crate::interpreter::error::Diagnostic;

/// Where a running program sends its `print` output and where every pass
/// reports its diagnostics.
pub trait Output {
    fn print(&mut self, text: &str);
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Prints to stdout, reports to stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct Console;

impl Output for Console {
    fn print(&mut self, text: &str) {
        println!("{}", text);
    }

    fn report(&mut self, diagnostic: &Diagnostic) {
        eprintln!("{}", diagnostic);
    }
}

/// Keeps everything in memory.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub printed: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Recorder {
    pub fn new() -> Recorder {
        Recorder::default()
    }

    pub fn reported(&self) -> Vec<String> {
        self.diagnostics.iter().map(|diagnostic| diagnostic.to_string()).collect()
    }

    pub fn clear(&mut self) {
        self.printed.clear();
        self.diagnostics.clear();
    }
}

impl Output for Recorder {
    fn print(&mut self, text: &str) {
        self.printed.push(text.to_owned());
    }

    fn report(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}
