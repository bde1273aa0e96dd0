use super::{CompetitorRecord, format_currency};

/// Market-level rollups for the matrix headline row.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketMetrics {
    pub competitor_count: usize,
    /// Mean clinic count, rounded to one decimal place.
    pub avg_clinic_count: f64,
    pub total_surgeon_count: u64,
    /// Mean economy-denture price over records with a known positive price.
    /// `None` when no record qualifies.
    pub avg_economy_denture_price: Option<f64>,
}

impl MarketMetrics {
    pub fn avg_clinic_label(&self) -> String {
        format!("{:.1}", self.avg_clinic_count)
    }

    /// Render-safe label: `$1,200` or `N/A` when undefined.
    pub fn avg_denture_label(&self) -> String {
        match self.avg_economy_denture_price {
            Some(p) => format_currency(p),
            None => "N/A".into(),
        }
    }
}

pub fn summarize(records: &[CompetitorRecord]) -> MarketMetrics {
    let competitor_count = records.len();
    let total_surgeon_count = records.iter().map(|r| u64::from(r.surgeon_count)).sum();

    let avg_clinic_count = if records.is_empty() {
        0.0
    } else {
        let total: u64 = records.iter().map(|r| u64::from(r.clinic_count)).sum();
        let mean = total as f64 / competitor_count as f64;
        (mean * 10.0).round() / 10.0
    };

    // Unknown prices normalize to 0 and drop out of both numerator and
    // denominator here.
    let known: Vec<f64> = records
        .iter()
        .map(|r| r.price_denture.normalized())
        .filter(|p| *p > 0.0)
        .collect();
    let avg_economy_denture_price = if known.is_empty() {
        None
    } else {
        Some(known.iter().sum::<f64>() / known.len() as f64)
    };

    MarketMetrics {
        competitor_count,
        avg_clinic_count,
        total_surgeon_count,
        avg_economy_denture_price,
    }
}
