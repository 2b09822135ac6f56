//! Normalized view over the text parts of an application submission.

use std::collections::BTreeMap;

/// Named string fields of one submission.
///
/// Keys are canonicalized to lowercase ASCII alphanumerics so `fullName`,
/// `full_name` and `Full Name` address the same entry. Values are trimmed and
/// empty values are treated as absent. A repeated key keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPayload {
    fields: BTreeMap<String, String>,
}

impl ApplicationPayload {
    /// Build a payload from raw `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut payload = Self::default();
        for (name, value) in pairs {
            payload.insert(name.as_ref(), value.as_ref());
        }
        payload
    }

    /// Insert one raw field.
    pub fn insert(&mut self, name: &str, value: &str) {
        let key = canonical_key(name);
        let value = value.trim();
        if key.is_empty() {
            return;
        }
        if value.is_empty() {
            self.fields.remove(&key);
        } else {
            self.fields.insert(key, value.to_string());
        }
    }

    /// Value of the first present key among `keys`.
    ///
    /// `keys` may be given in any spelling; they are canonicalized first.
    #[must_use]
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|key| self.fields.get(&canonical_key(key)))
            .map(String::as_str)
    }

    /// Value of a single key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_any(&[key])
    }

    /// Applicant name from `full_name` / `name`, or first and last name.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        if let Some(name) = self.get_any(&["fullname", "name", "applicantname"]) {
            return Some(name.to_string());
        }
        let parts: Vec<&str> = [self.get("firstname"), self.get("lastname")]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// All entries in canonical key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of non-empty fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the submission carried no usable text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn canonical_key(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}
