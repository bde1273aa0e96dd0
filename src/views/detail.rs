use super::{Bar, HorizontalBarChart, PRICE_TIERS};
use crate::market::{CompetitorDetail, CompetitorRecord};

/// A named personnel listing. Empty listings render an explicit
/// placeholder line, never a silent blank.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonnelList {
    pub heading: &'static str,
    pub names: Vec<String>,
    placeholder: &'static str,
}

impl PersonnelList {
    fn new(heading: &'static str, names: &[String], placeholder: &'static str) -> Self {
        Self {
            heading,
            names: names.to_vec(),
            placeholder,
        }
    }

    pub fn bullet_lines(&self) -> Vec<String> {
        if self.names.is_empty() {
            vec![self.placeholder.to_string()]
        } else {
            self.names.iter().map(|n| format!("• {n}")).collect()
        }
    }
}

/// At-a-glance pricing sidebar: raw display values, `TBD` verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickPricing {
    pub denture: String,
    pub tier1_range: String,
}

/// Deep-dive view for one competitor in one market.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub market: String,
    pub dso_name: String,
    pub quick_pricing: QuickPricing,
    pub chart: HorizontalBarChart,
    pub dentists: PersonnelList,
    pub surgeons: PersonnelList,
    pub evidence_source: String,
}

impl DetailView {
    pub fn build(market: &str, record: &CompetitorRecord, detail: &CompetitorDetail) -> Self {
        let prices = [
            record.price_denture,
            record.price_tier1_low,
            record.price_tier1_high,
        ];
        let bars = PRICE_TIERS
            .iter()
            .zip(prices)
            .map(|(tier, price)| Bar {
                label: tier.label,
                value: price.normalized(),
            })
            .collect();

        Self {
            market: market.to_string(),
            dso_name: record.dso_name.clone(),
            quick_pricing: QuickPricing {
                denture: record.price_denture.to_string(),
                tier1_range: format!(
                    "{} - {}",
                    record.price_tier1_low, record.price_tier1_high
                ),
            },
            chart: HorizontalBarChart {
                title: format!("{} Pricing Structure", record.dso_name),
                bars,
            },
            dentists: PersonnelList::new(
                "Identified Dentists",
                &detail.dentist_names,
                "No specific names identified.",
            ),
            surgeons: PersonnelList::new(
                "Surgeons (Implant/Oral)",
                &detail.surgeon_names,
                "No specific surgeons identified.",
            ),
            evidence_source: detail
                .evidence_source
                .clone()
                .unwrap_or_else(|| "N/A".into()),
        }
    }
}

/// Resolve a possibly-stale selection against the current market's set.
/// A previous selection survives only if it names a competitor in the new
/// set; otherwise selection falls back to the first competitor. `None` only
/// when the market is empty.
pub fn resolve_selection<'a>(
    previous: Option<&str>,
    records: &'a [CompetitorRecord],
) -> Option<&'a CompetitorRecord> {
    previous
        .and_then(|name| records.iter().find(|r| r.dso_name == name))
        .or_else(|| records.first())
}
