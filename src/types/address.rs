//! Email address and bulk recipient types.

use std::fmt;

use super::fields::{duplicate_keys, MergeData};

/// Longest address accepted by the syntactic check.
pub const MAX_ADDRESS_LENGTH: usize = 320;

const BANNED_ADDRESS_CHARACTERS: [char; 3] = [',', ' ', ';'];

/// Syntactic address check shared by every recipient type.
///
/// An address is valid when it is at most [`MAX_ADDRESS_LENGTH`] characters,
/// contains exactly one `@` separating two parts that are non-empty once
/// trimmed, and contains none of `,`, ` ` or `;`. Mailbox existence is not
/// checked.
pub fn is_valid_address(address: &str) -> bool {
    if address.is_empty() || address.chars().count() > MAX_ADDRESS_LENGTH {
        return false;
    }

    let mut parts = address.split('@');
    let well_formed = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.trim().is_empty() && !domain.trim().is_empty()
        }
        _ => false,
    };

    well_formed && !address.contains(&BANNED_ADDRESS_CHARACTERS[..])
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// An email address with an optional friendly name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    /// The address (e.g. "user@example.com").
    pub email_address: String,
    /// Display name (e.g. "Jane Doe").
    pub friendly_name: Option<String>,
}

impl EmailAddress {
    /// Create an address without a friendly name.
    pub fn new(email_address: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            friendly_name: None,
        }
    }

    /// Create an address with a friendly name. An empty name is dropped.
    pub fn with_name(email_address: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            friendly_name: non_blank(Some(friendly_name.into())),
        }
    }

    /// Create an address from an optional friendly name.
    pub fn with_optional_name(email_address: impl Into<String>, friendly_name: Option<String>) -> Self {
        Self {
            email_address: email_address.into(),
            friendly_name: non_blank(friendly_name),
        }
    }

    /// Whether the address passes the syntactic check.
    pub fn is_valid(&self) -> bool {
        is_valid_address(&self.email_address)
    }

    /// True when neither the address nor the name carries any text.
    pub fn is_blank(&self) -> bool {
        self.email_address.is_empty()
            && self.friendly_name.as_deref().map_or(true, str::is_empty)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.friendly_name {
            Some(name) => write!(f, "{} <{}>", name, self.email_address),
            None => f.write_str(&self.email_address),
        }
    }
}

/// A recipient of a bulk message with its own merge data.
///
/// Merge data keys must be unique within the recipient, compared
/// case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkRecipient {
    /// The delivery address.
    pub email_address: String,
    /// Display name, merged into `%%RecipientName%%`.
    pub friendly_name: Option<String>,
    /// Merge data used only for this recipient.
    pub merge_data: Vec<MergeData>,
}

impl BulkRecipient {
    /// Create a recipient with no friendly name and no merge data.
    pub fn new(email_address: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            friendly_name: None,
            merge_data: Vec::new(),
        }
    }

    /// Create a recipient with a friendly name. An empty name is dropped.
    pub fn with_name(email_address: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            friendly_name: non_blank(Some(friendly_name.into())),
            merge_data: Vec::new(),
        }
    }

    /// Replace the recipient's merge data.
    pub fn with_merge_data(mut self, merge_data: Vec<MergeData>) -> Self {
        self.merge_data = merge_data;
        self
    }

    /// Append a merge data pair.
    pub fn add_merge_data(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.merge_data.push(MergeData::new(key, value));
        self
    }

    /// Whether the delivery address passes the syntactic check.
    pub fn is_valid(&self) -> bool {
        is_valid_address(&self.email_address)
    }

    /// Lower-cased merge keys that occur more than once.
    pub fn duplicate_merge_keys(&self) -> Vec<String> {
        duplicate_keys(self.merge_data.iter().map(|m| m.key.as_str()))
    }
}

impl fmt::Display for BulkRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.friendly_name {
            Some(name) => write!(f, "{} <{}>", name, self.email_address),
            None => f.write_str(&self.email_address),
        }
    }
}

impl From<EmailAddress> for BulkRecipient {
    fn from(address: EmailAddress) -> Self {
        Self {
            email_address: address.email_address,
            friendly_name: address.friendly_name,
            merge_data: Vec::new(),
        }
    }
}
