//! Query parameters
//!
//! The Lens API follows the Feathers query syntax: `$limit` and `$skip` for
//! pagination, `$sort[field]=1|-1` for ordering and plain `field=value`
//! filters. Boolean-looking filters such as `publicInfo=true` are sent as
//! strings.

/// Default page size for list operations
pub const DEFAULT_LIMIT: u32 = 50;

/// Ordered set of query parameters with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Creates an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Pagination defaults applied to every list operation
    pub fn paginated() -> Self {
        Self::new()
            .with("$limit", DEFAULT_LIMIT)
            .with("$skip", 0)
    }

    /// `publicInfo=true`, asking the server for the public view of a record
    pub fn public_info() -> Self {
        Self::new().with("publicInfo", "true")
    }

    /// Sets a parameter and returns the set, replacing any previous value
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a parameter, replacing any previous value for the key
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Removes a parameter, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(index).1)
    }

    /// Returns the value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Applies these parameters on top of `defaults`; keys set here win
    pub fn over(self, defaults: Params) -> Params {
        let mut merged = defaults;
        for (key, value) in self.pairs {
            merged.set(key, value);
        }
        merged
    }

    /// Returns true if no parameter is set
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The parameters as key/value pairs, in insertion order
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}
