//! Destinations for finished log lines

use parking_lot::Mutex;

/// Receives fully formatted log lines
pub trait LineSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes each line to stdout, where the Lambda runtime ships it to the log backend
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps lines in memory, for tests and buffering
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// The most recent line
    pub fn last(&self) -> Option<String> {
        self.lines.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl LineSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.write_line("one");
        sink.write_line("two");
        assert_eq!(sink.lines(), vec!["one".to_string(), "two".to_string()]);
        assert_eq!(sink.last().as_deref(), Some("two"));

        sink.clear();
        assert!(sink.is_empty());
        assert_eq!(sink.last(), None);
    }
}
