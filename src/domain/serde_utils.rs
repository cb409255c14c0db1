//! Serde utilities for upstream payloads.

use serde::de::{self, Visitor};
use serde::Deserializer;
use std::fmt;

/// Deserializes identifiers that may arrive as strings or as numbers.
pub mod string_or_number {
    use super::{de, fmt, Deserializer, Visitor};

    /// Deserializes a string id from a string or integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a string nor an integer.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrIntVisitor;

        impl Visitor<'_> for StringOrIntVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer identifier")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }
        }

        deserializer.deserialize_any(StringOrIntVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Record {
        #[serde(with = "super::string_or_number")]
        id: String,
    }

    #[test]
    fn test_accepts_string_and_number() {
        let a: Record = serde_json::from_str(r#"{"id":"237"}"#).expect("string id");
        let b: Record = serde_json::from_str(r#"{"id":237}"#).expect("numeric id");
        assert_eq!(a.id, "237");
        assert_eq!(b.id, "237");
    }

    #[test]
    fn test_rejects_other_types() {
        assert!(serde_json::from_str::<Record>(r#"{"id":true}"#).is_err());
    }
}
