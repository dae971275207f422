/// Text captured since the last save.
///
/// Append-only until `clear`; entries are joined with `\n` when written.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    entries: Vec<String>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) {
        self.entries.push(text.to_string());
    }

    /// The buffered text as it will be written to disk.
    pub fn contents(&self) -> String {
        self.entries.join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
