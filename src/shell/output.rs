/// What the output panel currently shows. Each update replaces the last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputPanel {
    #[default]
    Empty,
    /// Shell notice such as `Opened: <path>`
    Notice(String),
    Running,
    /// Program output returned by the execution service
    Program(String),
    Error(String),
}

impl OutputPanel {
    pub fn text(&self) -> String {
        match self {
            OutputPanel::Empty => String::new(),
            OutputPanel::Notice(msg) => msg.clone(),
            OutputPanel::Running => "Running...".to_string(),
            OutputPanel::Program(output) if output.is_empty() => "[No output]".to_string(),
            OutputPanel::Program(output) => output.clone(),
            OutputPanel::Error(msg) => format!("[Error] {}", msg),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OutputPanel::Error(_))
    }
}
