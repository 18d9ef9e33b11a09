use std::collections::HashSet;

/// Drops previews already seen in the current pass.
///
/// Two keys per preview: the lower-cased first `prefix_chars` characters and
/// the lower-cased full text. A collision on either key is a duplicate, which
/// catches mirrored DOM copies that differ only past the prefix.
#[derive(Debug, Default)]
pub struct PreviewDeduper {
    prefix_chars: usize,
    prefixes: HashSet<String>,
    full: HashSet<String>,
}

impl PreviewDeduper {
    pub fn new(prefix_chars: usize) -> Self {
        Self {
            prefix_chars,
            ..Self::default()
        }
    }

    /// Records `preview` and returns true when it was not seen before.
    pub fn admit(&mut self, preview: &str) -> bool {
        let full = preview.to_lowercase();
        let prefix: String = full.chars().take(self.prefix_chars).collect();
        if self.prefixes.contains(&prefix) || self.full.contains(&full) {
            return false;
        }
        self.prefixes.insert(prefix);
        self.full.insert(full);
        true
    }
}
