// src/cards.rs

use crate::constants::{MATCHED_COLUMNS_KEY, TITLE_KEYS};
use crate::models::{Icd11Matches, Record};
use serde_json::Value;

/// A backend record flattened into displayable rows. Built without knowing the
/// record's schema: every key becomes a row, in the order the backend sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub matched_on: Vec<String>,
}

impl Card {
    pub fn from_record(record: &Record, fallback_title: &str) -> Self {
        let title = TITLE_KEYS
            .iter()
            .filter_map(|key| record.get(*key))
            .find_map(format_value)
            .unwrap_or_else(|| fallback_title.to_string());

        let fields = record
            .iter()
            .filter(|(key, _)| key.as_str() != MATCHED_COLUMNS_KEY)
            .filter_map(|(key, value)| format_value(value).map(|v| (key.clone(), v)))
            .collect();

        let matched_on = match record.get(MATCHED_COLUMNS_KEY) {
            Some(Value::Array(cols)) => cols
                .iter()
                .filter_map(|c| c.as_str())
                .map(|c| c.to_string())
                .collect(),
            _ => Vec::new(),
        };

        Card {
            title,
            fields,
            matched_on,
        }
    }

    /// Width of the widest key, used to align values in a column.
    pub fn key_width(&self) -> usize {
        self.fields
            .iter()
            .map(|(k, _)| unicode_width::UnicodeWidthStr::width(k.as_str()))
            .max()
            .unwrap_or(0)
    }
}

pub fn cards_from_records(records: &[Record], prefix: &str) -> Vec<Card> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| Card::from_record(record, &format!("{} {}", prefix, i + 1)))
        .collect()
}

/// How the ICD-11 part of a response should be drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum IcdSection {
    Cards(Vec<Card>),
    Text(Vec<String>),
    Empty,
}

impl From<&Icd11Matches> for IcdSection {
    fn from(matches: &Icd11Matches) -> Self {
        if matches.is_empty() {
            return IcdSection::Empty;
        }
        match matches {
            Icd11Matches::List(items) => IcdSection::Cards(cards_from_records(items, "ICD-11 match")),
            Icd11Matches::Text(text) => IcdSection::Text(
                text.lines()
                    .map(str::trim_end)
                    .filter(|l| !l.trim().is_empty())
                    .map(|l| l.to_string())
                    .collect(),
            ),
        }
    }
}

/// Renders a JSON value as a single display string. Nulls and blank strings
/// yield `None` so the row is skipped.
pub fn format_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(format_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_format_value_scalars() {
        assert_eq!(format_value(&json!(null)), None);
        assert_eq!(format_value(&json!("  ")), None);
        assert_eq!(format_value(&json!(" Jvara ")), Some("Jvara".to_string()));
        assert_eq!(format_value(&json!(42)), Some("42".to_string()));
        assert_eq!(format_value(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(format_value(&json!(false)), Some("false".to_string()));
    }

    #[test]
    fn test_format_value_collections() {
        assert_eq!(
            format_value(&json!(["a", null, 2])),
            Some("a, 2".to_string())
        );
        assert_eq!(format_value(&json!([])), None);
        assert_eq!(format_value(&json!({})), None);
        assert_eq!(
            format_value(&json!({"k": 1})),
            Some(r#"{"k":1}"#.to_string())
        );
    }

    #[test]
    fn test_card_title_preference_and_field_order() {
        let card = Card::from_record(
            &record(json!({
                "Sr_No": 3,
                "NAMC_CODE": "AAE-16",
                "NAMC_TERM": "jvaraH",
                "Short_definition": "",
                "Reference": null,
                "Source_Database": "AYURVEDA",
                "matched_columns": ["NAMC_TERM", "Long_definition"]
            })),
            "Match 1",
        );

        assert_eq!(card.title, "jvaraH");
        let keys: Vec<&str> = card.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Sr_No", "NAMC_CODE", "NAMC_TERM", "Source_Database"]);
        assert_eq!(card.matched_on, vec!["NAMC_TERM", "Long_definition"]);
        assert_eq!(card.key_width(), "Source_Database".len());
    }

    #[test]
    fn test_card_falls_back_to_code_then_index() {
        let card = Card::from_record(&record(json!({"NAMC_CODE": "SR11"})), "Match 2");
        assert_eq!(card.title, "SR11");

        let card = Card::from_record(&record(json!({"foo": "bar"})), "Match 2");
        assert_eq!(card.title, "Match 2");
        assert!(card.matched_on.is_empty());
    }

    #[test]
    fn test_icd_section_from_list_and_text() {
        let list = Icd11Matches::List(vec![record(json!({"title": "Fever", "theCode": "MG26"}))]);
        match IcdSection::from(&list) {
            IcdSection::Cards(cards) => {
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].title, "Fever");
            }
            other => panic!("unexpected section {:?}", other),
        }

        let text = Icd11Matches::Text("- Fever → Code: MG26\n\n- Chills → Code: MG24\n".to_string());
        assert_eq!(
            IcdSection::from(&text),
            IcdSection::Text(vec![
                "- Fever → Code: MG26".to_string(),
                "- Chills → Code: MG24".to_string()
            ])
        );

        assert_eq!(IcdSection::from(&Icd11Matches::default()), IcdSection::Empty);
    }
}
