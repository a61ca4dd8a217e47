use serde::{Deserialize, Serialize};

/// The locally visible signed-in identity. Credential handling itself is an
/// external concern; the app only reads this record to scope history and to
/// enforce the signed-in guard on file selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

impl Identity {
    /// Derives a stable owner id from a display name. Good enough for a
    /// single-machine identity record; a real provider supplies opaque ids.
    pub fn from_name(name: &str) -> Self {
        let id: String = name
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        Self {
            id,
            name: name.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_lowercased_and_sanitized() {
        let identity = Identity::from_name("Ada Lovelace");
        assert_eq!(identity.id, "ada-lovelace");
        assert_eq!(identity.name, "Ada Lovelace");
    }

    #[test]
    fn same_name_same_id() {
        assert_eq!(Identity::from_name("Sam").id, Identity::from_name("Sam").id);
    }
}
