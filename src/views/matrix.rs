use super::{BarSeries, GroupedBarChart, PRICE_TIERS};
use crate::market::CompetitorRecord;
use crate::market::metrics::{self, MarketMetrics};
use crate::market::normalize::normalize;

/// Presentation labels for the competitive scan table, distinct from the
/// wire field names.
pub const MATRIX_COLUMNS: [&str; 7] = [
    "DSO / Practice",
    "Clinics",
    "Dentists",
    "Surgeons",
    "Econ Denture",
    "Tier 1 (Low)",
    "Tier 1 (High)",
];

/// One table row, already formatted for display: currency cells carry the
/// `$` prefix, unverified prices show the literal `TBD`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub dso_name: String,
    pub clinics: String,
    pub dentists: String,
    pub surgeons: String,
    pub econ_denture: String,
    pub tier1_low: String,
    pub tier1_high: String,
}

impl MatrixRow {
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.dso_name,
            &self.clinics,
            &self.dentists,
            &self.surgeons,
            &self.econ_denture,
            &self.tier1_low,
            &self.tier1_high,
        ]
    }
}

/// The market-matrix view: headline metrics, scan table, and the grouped
/// price-positioning chart. An empty record set builds the explicit
/// no-data state instead of an empty table.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixView {
    NoData {
        market: String,
    },
    Populated {
        market: String,
        metrics: MarketMetrics,
        rows: Vec<MatrixRow>,
        chart: GroupedBarChart,
    },
}

impl MatrixView {
    pub fn build(market: &str, records: &[CompetitorRecord]) -> Self {
        if records.is_empty() {
            return Self::NoData {
                market: market.to_string(),
            };
        }

        let metrics = metrics::summarize(records);
        let normalized = normalize(records);

        let rows = records
            .iter()
            .map(|r| MatrixRow {
                dso_name: r.dso_name.clone(),
                clinics: r.clinic_count.to_string(),
                dentists: r.dentist_count.to_string(),
                surgeons: r.surgeon_count.to_string(),
                econ_denture: r.price_denture.to_string(),
                tier1_low: r.price_tier1_low.to_string(),
                tier1_high: r.price_tier1_high.to_string(),
            })
            .collect();

        let tier_values: [Vec<f64>; 3] = [
            normalized.iter().map(|n| n.price_denture).collect(),
            normalized.iter().map(|n| n.price_tier1_low).collect(),
            normalized.iter().map(|n| n.price_tier1_high).collect(),
        ];
        let series = PRICE_TIERS
            .iter()
            .zip(tier_values)
            .map(|(tier, values)| BarSeries {
                label: tier.label,
                color: tier.color,
                values,
            })
            .collect();

        let chart = GroupedBarChart {
            title: "Competitor Pricing Architecture".into(),
            groups: normalized.into_iter().map(|n| n.dso_name).collect(),
            series,
        };

        Self::Populated {
            market: market.to_string(),
            metrics,
            rows,
            chart,
        }
    }

    pub fn market(&self) -> &str {
        match self {
            Self::NoData { market } | Self::Populated { market, .. } => market,
        }
    }

    pub fn has_data(&self) -> bool {
        matches!(self, Self::Populated { .. })
    }
}
