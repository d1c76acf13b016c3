//! Transaction models

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned transaction identifier.
///
/// The remote service may hand out either integer or string keys; both are
/// kept in their textual form and never interpreted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Integer(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// Amount exactly as the remote service sent it.
///
/// Decimal columns often arrive as JSON strings, and a corrupt record may
/// carry anything at all. The raw value is kept so it can still be displayed;
/// [`Amount::sanitized`] is the single place where it becomes a number.
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Number(f64),
    Text(String),
    Invalid(String),
}

impl Amount {
    /// Numeric value used for aggregation. Anything that is not a finite
    /// number counts as 0.
    pub fn sanitized(&self) -> f64 {
        let value = match self {
            Amount::Number(n) => *n,
            Amount::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(0.0)
                }
            }
            Amount::Invalid(_) => 0.0,
        };

        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

/// A record without any amount
impl Default for Amount {
    fn default() -> Self {
        Amount::Invalid(String::new())
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) | Amount::Invalid(s) => f.write_str(s),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Amount::Number(n) => serializer.serialize_f64(*n),
            Amount::Text(s) | Amount::Invalid(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Amount::Number(f),
                None => Amount::Invalid(n.to_string()),
            },
            serde_json::Value::String(s) => Amount::Text(s),
            other => Amount::Invalid(other.to_string()),
        })
    }
}

/// A transaction record as held by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default)]
    pub amount: Amount,
    #[serde(
        rename = "created_at",
        alias = "createdAt",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub created_at: String,
}

impl Transaction {
    pub fn new(
        id: impl Into<TransactionId>,
        text: impl Into<String>,
        amount: impl Into<Amount>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            amount: amount.into(),
            created_at: created_at.into(),
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_snake_and_camel_case_timestamps() {
        let snake: Transaction = serde_json::from_str(
            r#"{"id": 1, "text": "Salary", "amount": 100, "created_at": "2025-08-05T13:45:00Z"}"#,
        )
        .unwrap();
        let camel: Transaction = serde_json::from_str(
            r#"{"id": "1", "text": "Salary", "amount": 100, "createdAt": "2025-08-05T13:45:00Z"}"#,
        )
        .unwrap();

        assert_eq!(snake, camel);
        assert_eq!(snake.id.as_str(), "1");
    }

    #[test]
    fn test_missing_or_null_timestamp_is_empty() {
        let missing: Transaction =
            serde_json::from_str(r#"{"id": "a", "text": "x", "amount": 1}"#).unwrap();
        let null: Transaction =
            serde_json::from_str(r#"{"id": "a", "text": "x", "amount": 1, "created_at": null}"#)
                .unwrap();

        assert_eq!(missing.created_at, "");
        assert_eq!(null.created_at, "");
    }

    #[test]
    fn test_null_or_missing_text_does_not_break_the_list() {
        let transactions: Vec<Transaction> = serde_json::from_str(
            r#"[
                {"id": 1, "text": "ok", "amount": 5, "created_at": "2025-08-05T13:45:00Z"},
                {"id": 2, "text": null, "amount": 3, "created_at": "2025-08-05T13:45:00Z"},
                {"id": 3, "amount": 4}
            ]"#,
        )
        .unwrap();

        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].text, "ok");
        assert_eq!(transactions[1].text, "");
        assert_eq!(transactions[2].text, "");
        assert_eq!(transactions[2].amount, Amount::Number(4.0));
    }

    #[test]
    fn test_missing_amount_counts_as_zero() {
        let transaction: Transaction =
            serde_json::from_str(r#"{"id": 4, "text": "No amount"}"#).unwrap();

        assert_eq!(transaction.amount, Amount::Invalid(String::new()));
        assert_eq!(transaction.amount.sanitized(), 0.0);
    }

    #[test]
    fn test_amount_keeps_raw_wire_form() {
        let decimal: Transaction =
            serde_json::from_str(r#"{"id": 7, "text": "Rent", "amount": "-450.50"}"#).unwrap();
        let broken: Transaction =
            serde_json::from_str(r#"{"id": 8, "text": "Oops", "amount": null}"#).unwrap();

        assert_eq!(decimal.amount, Amount::Text("-450.50".to_string()));
        assert_eq!(decimal.amount.sanitized(), -450.5);
        assert_eq!(broken.amount, Amount::Invalid("null".to_string()));
        assert_eq!(broken.amount.sanitized(), 0.0);
    }

    #[test]
    fn test_sanitized_rejects_garbage_and_non_finite() {
        assert_eq!(Amount::Text("twelve".into()).sanitized(), 0.0);
        assert_eq!(Amount::Text("".into()).sanitized(), 0.0);
        assert_eq!(Amount::Text(" 12.5 ".into()).sanitized(), 12.5);
        assert_eq!(Amount::Text("inf".into()).sanitized(), 0.0);
        assert_eq!(Amount::Number(f64::NAN).sanitized(), 0.0);
        assert_eq!(Amount::Number(-3.0).sanitized(), -3.0);
    }
}
