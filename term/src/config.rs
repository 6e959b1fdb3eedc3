use std::time::Duration;

pub trait TerminalConfiguration: std::fmt::Debug {
    /// Maximum number of lines of scrollback kept by the primary screen.
    fn scrollback_size(&self) -> usize {
        500
    }

    /// Decides whether the text in `s` continues a word for the purposes
    /// of double-click selection.
    fn is_double_click_word(&self, s: &str) -> bool {
        if s.len() > 1 {
            true
        } else if s.len() == 1 {
            match s.chars().next().unwrap() {
                ' ' | '\t' | '\n' | '{' | '[' | '}' | ']' | '(' | ')' | '"' | '\'' => false,
                _ => true,
            }
        } else {
            false
        }
    }

    /// How long the stream must stay quiet before a pending dispatch
    /// fires.
    fn dispatch_idle_interval(&self) -> Duration {
        Duration::from_millis(3)
    }

    /// Upper bound on how long a pending dispatch may be deferred while
    /// the stream keeps arriving.
    fn dispatch_watchdog_interval(&self) -> Duration {
        Duration::from_millis(25)
    }
}

/// Configuration with the stock settings; used by tests and embedders
/// that have nothing to override.
#[derive(Debug, Default)]
pub struct DefaultConfiguration;

impl TerminalConfiguration for DefaultConfiguration {}
