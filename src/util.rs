use std::collections::HashMap;

/// Insertion-ordered counter. Ranking is a stable sort on the count, so
/// equal counts keep the order in which their keys were first seen.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    /// Entries by descending count, ties in first-seen order.
    pub fn ranked(&self) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl<'a> FromIterator<&'a str> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

/// Unix timestamp `days` days before `now`.
pub fn days_before(now: i64, days: u32) -> i64 {
    now - i64::from(days) * 86_400
}

#[cfg(test)]
#[path = "util_test.rs"]
mod tests;
