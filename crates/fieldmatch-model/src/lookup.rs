use std::collections::BTreeMap;

/// Compares two names ignoring case, with full Unicode case folding.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Case-insensitive set of field names that remembers the first spelling seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet {
    names: BTreeMap<String, String>,
}

impl NameSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for name in names {
            set.insert(name.as_ref());
        }
        set
    }

    /// Adds a name; returns false if an equal name (ignoring case) was present.
    pub fn insert(&mut self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        if key.is_empty() || self.names.contains_key(&key) {
            return false;
        }
        self.names.insert(key, name.trim().to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(&name.trim().to_lowercase())
    }

    /// Returns the stored spelling of a name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.names
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
