//! Typed documents at the secondary-store ingestion boundary.
//!
//! The secondary store holds dynamically shaped documents; older clients
//! wrote numeric fields as numbers or as numeric strings interchangeably.
//! These DTOs pin the shape down at the boundary: numeric fields accept
//! both forms, everything else must match, and documents that fail to
//! parse are logged and skipped by the store layer instead of propagating
//! loosely typed data inward.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A document paired with its opaque store id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<T> {
    pub id:   String,
    pub data: T,
}

/// A record of the `utilisateurs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDoc {
    #[serde(rename = "nomUtilisateur")]
    pub username: String,

    pub email: String,

    #[serde(rename = "motDePasse", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(rename = "sourceAuth", default, skip_serializing_if = "Option::is_none")]
    pub source_auth: Option<String>,

    #[serde(rename = "dateCreation", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A record of the `signalements` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDoc {
    #[serde(deserialize_with = "lenient::decimal")]
    pub latitude: Decimal,

    #[serde(deserialize_with = "lenient::decimal")]
    pub longitude: Decimal,

    #[serde(rename = "Id_User", default, skip_serializing_if = "Option::is_none")]
    pub reporter_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::decimal_opt", skip_serializing_if = "Option::is_none")]
    pub surface: Option<Decimal>,

    #[serde(rename = "type_probleme", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "statut")]
    pub status: String,

    #[serde(rename = "date_ajoute", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A record of the `travaux` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderDoc {
    #[serde(rename = "id_signalement")]
    pub report_doc_id: String,

    #[serde(rename = "id_entreprise", default, deserialize_with = "lenient::int_opt", skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i32>,

    #[serde(default, deserialize_with = "lenient::decimal_opt", skip_serializing_if = "Option::is_none")]
    pub budget: Option<Decimal>,

    #[serde(rename = "date_debut_travaux", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(rename = "date_fin_travaux", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(rename = "avancement", default, deserialize_with = "lenient::decimal_opt", skip_serializing_if = "Option::is_none")]
    pub progress: Option<Decimal>,
}

/// A record of the `historiques_travaux` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntryDoc {
    #[serde(rename = "id_travaux")]
    pub work_order_doc_id: String,

    #[serde(rename = "date_modification")]
    pub modified_at: DateTime<Utc>,

    #[serde(rename = "avancement", deserialize_with = "lenient::decimal")]
    pub progress: Decimal,

    #[serde(rename = "commentaire")]
    pub comment: String,
}

/// Deserializers tolerating number-or-string numeric fields.
mod lenient {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{de::Error, Deserialize, Deserializer};
    use serde_json::Value;

    fn decimal_from_value<E: Error>(value: &Value) -> Result<Decimal, E> {
        match value {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .map_err(|e| E::custom(format!("invalid decimal {}: {}", n, e))),
            Value::String(s) => Decimal::from_str(s.trim())
                .map_err(|e| E::custom(format!("invalid decimal {:?}: {}", s, e))),
            other => Err(E::custom(format!("expected number or string, got {}", other))),
        }
    }

    pub fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decimal_from_value(&value)
    }

    pub fn decimal_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(None),
            other => decimal_from_value(&other).map(Some),
        }
    }

    pub fn int_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => {
                n.as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid integer {}", n)))
            },
            Value::String(s) => {
                s.trim()
                    .parse::<i32>()
                    .map(Some)
                    .map_err(|e| D::Error::custom(format!("invalid integer {:?}: {}", s, e)))
            },
            other => Err(D::Error::custom(format!(
                "expected number or string, got {}",
                other
            ))),
        }
    }
}
