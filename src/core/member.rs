use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a member of an expense group.
///
/// Members are identified by name only. Uniqueness is enforced per group,
/// there is no global member registry.
///
/// # Examples
///
/// ```
/// use fairsplit::core::member::MemberId;
///
/// let alice = MemberId::new("Alice");
/// let bob = MemberId::new(" Bob ");
/// assert_ne!(alice, bob);
/// assert_eq!(bob.as_str(), "Bob");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Create a member identifier. Surrounding whitespace is trimmed.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.len() == name.len() {
            Self(name)
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Split a comma-separated list of names, dropping blanks.
pub fn parse_member_list(input: &str) -> Vec<MemberId> {
    input
        .split(',')
        .map(MemberId::new)
        .filter(|m| !m.is_empty())
        .collect()
}
