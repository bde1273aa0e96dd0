// Competitor data model for one DMA. Records arrive from the intelligence
// backend in ranking order and are immutable for the duration of a render.

pub mod metrics;
pub mod normalize;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A price field as reported by the backend: a verified dollar amount or
/// the `TBD` sentinel for anything the backend could not confirm.
///
/// The variant is fixed at the deserialization boundary so view logic never
/// has to string-compare sentinels. Negative numbers (the backend emits
/// `-1` for unverified prices) and unparseable values collapse to
/// `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Price {
    Known(f64),
    #[default]
    Unknown,
}

impl Price {
    pub fn from_raw(raw: &serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) if v >= 0.0 => Self::Known(v),
                _ => Self::Unknown,
            },
            serde_json::Value::String(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Self::Known(v),
                _ => Self::Unknown,
            },
            _ => Self::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Numeric value for arithmetic and charting. Never used for display.
    pub fn normalized(&self) -> f64 {
        match self {
            Self::Known(v) => *v,
            Self::Unknown => 0.0,
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{}", format_currency(*v)),
            Self::Unknown => write!(f, "TBD"),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(v) => serializer.serialize_f64(*v),
            Self::Unknown => serializer.serialize_str("TBD"),
        }
    }
}

/// One DSO/practice in one market's result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorRecord {
    pub dso_name: String,
    #[serde(default)]
    pub clinic_count: u32,
    #[serde(default)]
    pub dentist_count: u32,
    #[serde(default)]
    pub surgeon_count: u32,
    #[serde(default)]
    pub price_denture: Price,
    #[serde(default)]
    pub price_tier1_low: Price,
    #[serde(default)]
    pub price_tier1_high: Price,
}

/// Personnel and evidence for one competitor, fetched on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorDetail {
    pub dso_name: String,
    #[serde(default)]
    pub dentist_names: Vec<String>,
    #[serde(default)]
    pub surgeon_names: Vec<String>,
    #[serde(default)]
    pub evidence_source: Option<String>,
}

/// Whole-dollar rendering with thousands separators: `$1,200`.
pub fn format_currency(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_parses_numbers_and_sentinels() {
        assert_eq!(Price::from_raw(&json!(650)), Price::Known(650.0));
        assert_eq!(Price::from_raw(&json!(0)), Price::Known(0.0));
        assert_eq!(Price::from_raw(&json!("1500")), Price::Known(1500.0));
        assert_eq!(Price::from_raw(&json!("TBD")), Price::Unknown);
        assert_eq!(Price::from_raw(&json!(-1)), Price::Unknown);
        assert_eq!(Price::from_raw(&json!(null)), Price::Unknown);
        assert_eq!(Price::from_raw(&json!({"v": 1})), Price::Unknown);
    }

    #[test]
    fn price_displays_verbatim_sentinel_and_whole_dollars() {
        assert_eq!(Price::Known(1200.0).to_string(), "$1,200");
        assert_eq!(Price::Known(650.4).to_string(), "$650");
        assert_eq!(Price::Unknown.to_string(), "TBD");
    }

    #[test]
    fn record_deserializes_backend_wire_format() {
        let raw = json!({
            "dsoName": "Archpoint ID",
            "clinicCount": 3,
            "dentistCount": 5,
            "surgeonCount": 2,
            "priceDenture": "TBD",
            "priceTier1Low": 1500,
            "priceTier1High": 3000
        });
        let record: CompetitorRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.dso_name, "Archpoint ID");
        assert_eq!(record.price_denture, Price::Unknown);
        assert_eq!(record.price_tier1_low, Price::Known(1500.0));
    }

    #[test]
    fn record_tolerates_missing_prices() {
        let record: CompetitorRecord =
            serde_json::from_value(json!({"dsoName": "ClearChoice"})).unwrap();
        assert_eq!(record.price_denture, Price::Unknown);
        assert_eq!(record.clinic_count, 0);
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1000.0), "$1,000");
        assert_eq!(format_currency(1234567.0), "$1,234,567");
    }
}
