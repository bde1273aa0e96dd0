use crate::market::{CompetitorRecord, Price};

// Level-1 locked intelligence: analyst-verified records served without a
// backend round-trip. Lock data is absolute truth in the data hierarchy.

fn seed(
    name: &str,
    clinics: u32,
    dentists: u32,
    surgeons: u32,
    denture: Price,
    tier1_low: Price,
    tier1_high: Price,
) -> CompetitorRecord {
    CompetitorRecord {
        dso_name: name.into(),
        clinic_count: clinics,
        dentist_count: dentists,
        surgeon_count: surgeons,
        price_denture: denture,
        price_tier1_low: tier1_low,
        price_tier1_high: tier1_high,
    }
}

/// Locked competitor set for a market, ranked by footprint. `None` when the
/// market has no lock table and must be resolved live.
pub fn locked_records(market: &str) -> Option<Vec<CompetitorRecord>> {
    use crate::market::Price::{Known, Unknown};
    match market {
        "Dallas-Fort Worth" => Some(vec![
            seed("Ideal Dental (DECA)", 65, 136, 12, Known(650.0), Known(1000.0), Known(1500.0)),
            seed("Smile Brands", 51, 50, 8, Known(650.0), Known(950.0), Known(1350.0)),
            seed("Jefferson Dental", 35, 40, 6, Known(550.0), Known(699.0), Known(1100.0)),
            seed("Pacific Dental (PDS)", 35, 38, 10, Known(700.0), Known(1100.0), Known(1600.0)),
            seed("Heartland Dental", 30, 45, 8, Known(1100.0), Known(1100.0), Known(1600.0)),
            seed("AD&I/DDS", 22, 45, 6, Known(599.0), Known(800.0), Known(1200.0)),
            seed("Aspen Dental", 20, 19, 4, Known(499.0), Known(1100.0), Known(1400.0)),
            seed("Great Expressions", 8, 8, 2, Known(850.0), Known(850.0), Known(1250.0)),
            seed("Sage Dental", 6, 6, 1, Known(800.0), Known(900.0), Known(1350.0)),
            seed("Archpoint ID", 3, 5, 2, Unknown, Known(1500.0), Known(3000.0)),
            seed("ClearChoice", 3, 3, 3, Unknown, Unknown, Unknown),
            seed("Texas Implant & Dental", 2, 4, 1, Known(895.0), Known(895.0), Known(1700.0)),
            seed("Fast New Smile", 2, 3, 3, Unknown, Unknown, Unknown),
            seed("Nuvia", 2, 4, 4, Unknown, Known(2500.0), Known(3000.0)),
            seed("New Choice Dentures", 1, 3, 1, Known(550.0), Known(795.0), Known(1500.0)),
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dfw_lock_table_is_ranked_and_complete() {
        let records = locked_records("Dallas-Fort Worth").unwrap();
        assert_eq!(records.len(), 15);
        assert_eq!(records[0].dso_name, "Ideal Dental (DECA)");
        // Ranking order is footprint-descending.
        for pair in records.windows(2) {
            assert!(pair[0].clinic_count >= pair[1].clinic_count);
        }
    }

    #[test]
    fn unverified_prices_are_unknown() {
        let records = locked_records("Dallas-Fort Worth").unwrap();
        let clearchoice = records.iter().find(|r| r.dso_name == "ClearChoice").unwrap();
        assert!(!clearchoice.price_denture.is_known());
        assert!(!clearchoice.price_tier1_low.is_known());
        assert!(!clearchoice.price_tier1_high.is_known());
    }

    #[test]
    fn unlocked_markets_resolve_live() {
        assert!(locked_records("Houston").is_none());
    }
}
