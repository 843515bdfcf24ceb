use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::core::error::StoreError;

/// Length of an object identifier in bytes
pub const OBJECT_ID_LEN: usize = 12;

/// 12-byte user identifier, written as 24 hexadecimal characters
///
/// Both upper- and lower-case digits are accepted on input; the canonical
/// textual form (and therefore the storage key) is lower-case.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// Parse a 24-character hex string
    pub fn parse_hex(s: &str) -> Result<Self, StoreError> {
        if s.len() != OBJECT_ID_LEN * 2 {
            return Err(StoreError::InvalidIdentifier(s.to_string()));
        }

        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| StoreError::InvalidIdentifier(s.to_string()))?;

        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ObjectId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ObjectId::parse_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_id() {
        let id = ObjectId::parse_hex("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(id.0[0], 0x50);
        assert_eq!(id.0[11], 0x11);
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_parse_normalizes_case() {
        let id: ObjectId = "507F1F77BCF86CD799439011".parse().unwrap();
        assert_eq!(id.to_hex(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_parse_invalid_ids() {
        let cases = [
            "",
            "507f1f77bcf86cd79943901",   // 23 chars
            "507f1f77bcf86cd7994390111", // 25 chars
            "507f1f77bcf86cd79943901g",  // non-hex
            "zzzzzzzzzzzzzzzzzzzzzzzz",
            "507f1f77-cf86-d799-9011xx",
            "ééééééééééää",               // 24 bytes of multibyte chars
        ];

        for case in cases {
            match ObjectId::parse_hex(case) {
                Err(StoreError::InvalidIdentifier(s)) => assert_eq!(s, case),
                other => panic!("expected InvalidIdentifier for {:?}, got {:?}", case, other),
            }
        }
    }

    #[test]
    fn test_serde_as_hex_string() {
        let id = ObjectId([0xab; OBJECT_ID_LEN]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abababababababababababab\"");

        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<ObjectId>("\"not-an-id\"").is_err());
    }
}
