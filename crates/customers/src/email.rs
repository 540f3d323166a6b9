use serde::{Deserialize, Serialize};

use keelcrm_core::{Error, Outcome, Rule, ValueObject, rules};

/// RFC 5321 caps the whole address at 254 octets in practice.
pub const MAX_EMAIL_LEN: usize = 254;

/// Normalized email address: trimmed, lowercased, structurally valid.
///
/// Construction goes through [`EmailAddress::parse`] only; there is no
/// conversion from a bare string that could silently hold an invalid value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Outcome<EmailAddress> {
        let normalized = raw.trim().to_ascii_lowercase();
        Rule::new()
            .must(
                || rules::not_empty(&normalized),
                Error::validation("email must not be empty").with_field("email"),
            )
            .must(
                || rules::max_len(&normalized, MAX_EMAIL_LEN),
                Error::validation("email is too long").with_field("email"),
            )
            .must(
                || rules::valid_email(&normalized),
                Error::validation("email is not a valid address").with_field("email"),
            )
            .check()
            .map(|()| EmailAddress(normalized))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl ValueObject for EmailAddress {}

impl core::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
