// Pure view builders. Each view is a function of its inputs only; building
// twice from the same records yields identical output.

pub mod detail;
pub mod matrix;

/// Fixed presentation style for one price tier. The color assignment is
/// stable across renders and shared by every chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierStyle {
    pub label: &'static str,
    pub color: &'static str,
}

pub const PRICE_TIERS: [TierStyle; 3] = [
    TierStyle {
        label: "Econ Denture",
        color: "#3b82f6",
    },
    TierStyle {
        label: "Tier 1 (Low)",
        color: "#10b981",
    },
    TierStyle {
        label: "Tier 1 (High)",
        color: "#f59e0b",
    },
];

/// One series of a grouped bar chart: a value per group, one fixed color.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub label: &'static str,
    pub color: &'static str,
    pub values: Vec<f64>,
}

/// Price-positioning chart data: one category group per competitor, one bar
/// per tier. Values are zero-filled, never the display sentinels.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub title: String,
    pub groups: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl GroupedBarChart {
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    pub value: f64,
}

/// Single-competitor horizontal chart: exactly one bar per tier.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalBarChart {
    pub title: String,
    pub bars: Vec<Bar>,
}

impl HorizontalBarChart {
    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }
}
