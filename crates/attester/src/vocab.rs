use std::collections::BTreeSet;

/// Tag names and values entered during a session, used for suggestions only.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    items: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, item: &str) {
        if !item.is_empty() && !self.items.contains(item) {
            self.items.insert(item.to_string());
        }
    }

    /// Recorded items starting with `prefix`, sorted.
    pub fn suggest(&self, prefix: &str) -> Vec<&str> {
        self.items
            .range(prefix.to_string()..)
            .take_while(|item| item.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: AsRef<str>> Extend<S> for Vocabulary {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for item in iter {
            self.record(item.as_ref());
        }
    }
}
