use std::time::Instant;
use tracing::info;

/// Logs how long a CLI command ran, once it goes out of scope.
pub struct CommandTimer {
    command: String,
    started: Instant,
}

impl CommandTimer {
    pub fn start(command: impl Into<String>) -> Self {
        let command = command.into();
        info!(command = %command, "started");
        Self {
            command,
            started: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        info!(command = %self.command, elapsed = ?self.started.elapsed(), "finished");
    }
}

/// Row and episode counts with thousands separators: 1234567 → "1,234,567".
pub fn fmt_count(n: usize) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
