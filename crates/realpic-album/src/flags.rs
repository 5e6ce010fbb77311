//! Serde adapters for boolean flags stored as words
//!
//! Records written by the mobile client keep `demoMode` as `"yes"`/`"no"` and
//! the feature flags as `"on"`/`"off"`. Plain JSON booleans are accepted too.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Word(String),
}

fn decode<'de, D>(deserializer: D, truthy: &str, falsy: &str) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(value) => Ok(value),
        RawFlag::Word(word) if word == truthy => Ok(true),
        RawFlag::Word(word) if word == falsy => Ok(false),
        RawFlag::Word(other) => Err(D::Error::custom(format!(
            "expected \"{truthy}\" or \"{falsy}\", found \"{other}\""
        ))),
    }
}

pub(crate) mod yes_no {
    use super::{decode, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(crate) fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "yes" } else { "no" })
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        decode(deserializer, "yes", "no")
    }
}

pub(crate) mod on_off {
    use super::{decode, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(crate) fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "on" } else { "off" })
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        decode(deserializer, "on", "off")
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Flags {
        #[serde(with = "super::yes_no")]
        demo: bool,
        #[serde(with = "super::on_off")]
        plus: bool,
    }

    #[test]
    fn encodes_words() {
        let json = serde_json::to_value(Flags { demo: true, plus: false }).unwrap();
        assert_eq!(json, serde_json::json!({ "demo": "yes", "plus": "off" }));
    }

    #[test]
    fn decodes_words_and_booleans() {
        let flags: Flags = serde_json::from_str(r#"{"demo":"no","plus":true}"#).unwrap();
        assert_eq!(flags, Flags { demo: false, plus: true });
        assert!(serde_json::from_str::<Flags>(r#"{"demo":"maybe","plus":"on"}"#).is_err());
    }
}
