use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One annotation outcome.
///
/// The dataset document encodes labels as `null` (unlabeled), `true` (toxic),
/// `false` (non-toxic) or the string `"/"` (unknown). The closed enum keeps
/// downstream code off sentinel comparisons while the custom serde impls pin
/// the wire format exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Label {
    #[default]
    Unlabeled,
    Toxic,
    NonToxic,
    Unknown,
}

impl Label {
    pub fn is_labeled(self) -> bool {
        self != Label::Unlabeled
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Unlabeled => "unlabeled",
            Label::Toxic => "toxic",
            Label::NonToxic => "non-toxic",
            Label::Unknown => "unknown",
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Label::Unlabeled => serializer.serialize_unit(),
            Label::Toxic => serializer.serialize_bool(true),
            Label::NonToxic => serializer.serialize_bool(false),
            Label::Unknown => serializer.serialize_str("/"),
        }
    }
}

struct LabelVisitor;

impl<'de> Visitor<'de> for LabelVisitor {
    type Value = Label;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("null, a boolean, or the string \"/\"")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Label, E> {
        Ok(Label::Unlabeled)
    }

    fn visit_none<E: de::Error>(self) -> Result<Label, E> {
        Ok(Label::Unlabeled)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Label, D::Error> {
        d.deserialize_any(LabelVisitor)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Label, E> {
        Ok(if v { Label::Toxic } else { Label::NonToxic })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Label, E> {
        if v == "/" {
            Ok(Label::Unknown)
        } else {
            Err(de::Error::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Label, D::Error> {
        deserializer.deserialize_any(LabelVisitor)
    }
}

/// One unit of text awaiting a label, identified by its position in the
/// dataset sequence.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub text: String,
    #[serde(default)]
    pub label: Label,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_wire_format_round_trips() {
        let doc = r#"[
            {"text":"a","label":null},
            {"text":"b","label":true},
            {"text":"c","label":false},
            {"text":"d","label":"/"}
        ]"#;

        let items: Vec<Item> = serde_json::from_str(doc).unwrap();
        assert_eq!(items[0].label, Label::Unlabeled);
        assert_eq!(items[1].label, Label::Toxic);
        assert_eq!(items[2].label, Label::NonToxic);
        assert_eq!(items[3].label, Label::Unknown);

        let out = serde_json::to_string(&items).unwrap();
        assert_eq!(
            out,
            r#"[{"text":"a","label":null},{"text":"b","label":true},{"text":"c","label":false},{"text":"d","label":"/"}]"#
        );
    }

    #[test]
    fn missing_label_field_defaults_to_unlabeled() {
        let item: Item = serde_json::from_str(r#"{"text":"x"}"#).unwrap();
        assert_eq!(item.label, Label::Unlabeled);
    }

    #[test]
    fn unexpected_label_string_is_rejected() {
        let res: Result<Item, _> = serde_json::from_str(r#"{"text":"x","label":"yes"}"#);
        assert!(res.is_err());
    }
}
