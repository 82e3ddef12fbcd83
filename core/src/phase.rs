use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PortSelection,
    Bound,
    Serving,
    Shutdown,
}

impl Phase {
    /// The only phase reachable from `self`, or `None` once shut down.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::PortSelection),
            Phase::PortSelection => Some(Phase::Bound),
            Phase::Bound => Some(Phase::Serving),
            Phase::Serving => Some(Phase::Shutdown),
            Phase::Shutdown => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::PortSelection => "port selection",
            Phase::Bound => "bound",
            Phase::Serving => "serving",
            Phase::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
