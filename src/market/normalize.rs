use super::CompetitorRecord;

/// Read-only numeric projection of a [`CompetitorRecord`] for arithmetic
/// and charting. Unknown prices become 0.0; display always goes through
/// the original record instead.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub dso_name: String,
    pub clinic_count: u32,
    pub dentist_count: u32,
    pub surgeon_count: u32,
    pub price_denture: f64,
    pub price_tier1_low: f64,
    pub price_tier1_high: f64,
}

impl NormalizedRecord {
    fn from_record(record: &CompetitorRecord) -> Self {
        Self {
            dso_name: record.dso_name.clone(),
            clinic_count: record.clinic_count,
            dentist_count: record.dentist_count,
            surgeon_count: record.surgeon_count,
            price_denture: record.price_denture.normalized(),
            price_tier1_low: record.price_tier1_low.normalized(),
            price_tier1_high: record.price_tier1_high.normalized(),
        }
    }
}

/// Parallel sequence of zero-filled records, preserving record order and
/// every non-price field. A tier1_low > tier1_high violation passes through
/// untouched; charting tolerates it.
pub fn normalize(records: &[CompetitorRecord]) -> Vec<NormalizedRecord> {
    records.iter().map(NormalizedRecord::from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Price;

    fn record(name: &str, denture: Price, low: Price, high: Price) -> CompetitorRecord {
        CompetitorRecord {
            dso_name: name.into(),
            clinic_count: 3,
            dentist_count: 5,
            surgeon_count: 2,
            price_denture: denture,
            price_tier1_low: low,
            price_tier1_high: high,
        }
    }

    #[test]
    fn unknown_prices_become_zero() {
        let records = vec![record(
            "ClearChoice",
            Price::Unknown,
            Price::Unknown,
            Price::Known(3000.0),
        )];
        let normalized = normalize(&records);
        assert_eq!(normalized[0].price_denture, 0.0);
        assert_eq!(normalized[0].price_tier1_low, 0.0);
        assert_eq!(normalized[0].price_tier1_high, 3000.0);
    }

    #[test]
    fn order_and_non_price_fields_survive() {
        let records = vec![
            record("B", Price::Known(1.0), Price::Unknown, Price::Unknown),
            record("A", Price::Unknown, Price::Known(2.0), Price::Known(3.0)),
        ];
        let normalized = normalize(&records);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].dso_name, "B");
        assert_eq!(normalized[1].dso_name, "A");
        assert_eq!(normalized[1].clinic_count, 3);
        assert_eq!(normalized[1].dentist_count, 5);
        assert_eq!(normalized[1].surgeon_count, 2);
    }

    #[test]
    fn inverted_tier_band_does_not_panic() {
        let records = vec![record(
            "X",
            Price::Known(500.0),
            Price::Known(2000.0),
            Price::Known(1000.0),
        )];
        let normalized = normalize(&records);
        assert_eq!(normalized[0].price_tier1_low, 2000.0);
        assert_eq!(normalized[0].price_tier1_high, 1000.0);
    }
}
