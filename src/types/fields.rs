//! Key/value entities: merge data, metadata and custom headers.

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Lower-cased keys that appear more than once, in order of first repetition.
pub(crate) fn duplicate_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut duplicates: Vec<String> = Vec::new();

    for key in keys {
        let key = key.to_lowercase();
        if seen.contains(&key) {
            if !duplicates.contains(&key) {
                duplicates.push(key);
            }
        } else {
            seen.push(key);
        }
    }

    duplicates
}

/// A merge field substituted into `%%Key%%` placeholders by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeData {
    /// Placeholder name, without the `%%` delimiters.
    pub key: String,
    /// Substituted value.
    pub value: String,
}

impl MergeData {
    /// Create a merge data pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Valid when at least one of key or value carries text.
    pub fn is_valid(&self) -> bool {
        !is_blank(&self.key) || !is_blank(&self.value)
    }
}

/// Metadata attached to a bulk message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Metadata key.
    pub key: String,
    /// Metadata value.
    pub value: String,
}

impl Metadata {
    /// Create a metadata pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Valid when at least one of key or value carries text.
    pub fn is_valid(&self) -> bool {
        !is_blank(&self.key) || !is_blank(&self.value)
    }
}

/// A custom header added to a message or an attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomHeader {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl CustomHeader {
    /// Create a custom header.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Valid when at least one of name or value carries text.
    pub fn is_valid(&self) -> bool {
        !is_blank(&self.name) || !is_blank(&self.value)
    }
}
