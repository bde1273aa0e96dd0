use crate::market::format_currency;
use crate::views::detail::DetailView;
use crate::views::matrix::{MATRIX_COLUMNS, MatrixView};
use crate::views::{GroupedBarChart, PRICE_TIERS};
use askama::Template;
use chrono::Utc;

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage {
    market: String,
    generated_at: String,
    has_data: bool,
    metric_cards: Vec<MetricCard>,
    columns: Vec<&'static str>,
    rows: Vec<Vec<String>>,
    chart_title: String,
    legend: Vec<LegendEntry>,
    chart_groups: Vec<ChartGroup>,
    detail: Option<DetailSection>,
}

#[allow(dead_code)] // fields used by Askama template
struct MetricCard {
    label: &'static str,
    value: String,
}

#[allow(dead_code)] // fields used by Askama template
struct LegendEntry {
    label: &'static str,
    color: &'static str,
}

#[allow(dead_code)] // fields used by Askama template
struct ChartGroup {
    name: String,
    bars: Vec<ChartBar>,
}

#[allow(dead_code)] // fields used by Askama template
struct ChartBar {
    color: &'static str,
    pct: u32,
    label: String,
}

#[allow(dead_code)] // fields used by Askama template
struct DetailSection {
    dso_name: String,
    denture: String,
    tier1_range: String,
    bars: Vec<ChartBar>,
    dentist_heading: &'static str,
    dentist_lines: Vec<String>,
    surgeon_heading: &'static str,
    surgeon_lines: Vec<String>,
    evidence_source: String,
}

fn bar_pct(value: f64, max: f64) -> u32 {
    if max <= 0.0 {
        0
    } else {
        ((value / max) * 100.0).round() as u32
    }
}

fn chart_groups(chart: &GroupedBarChart) -> Vec<ChartGroup> {
    let max = chart.max_value();
    chart
        .groups
        .iter()
        .enumerate()
        .map(|(i, name)| ChartGroup {
            name: name.clone(),
            bars: chart
                .series
                .iter()
                .map(|s| {
                    let value = s.values.get(i).copied().unwrap_or(0.0);
                    ChartBar {
                        color: s.color,
                        pct: bar_pct(value, max),
                        label: format_currency(value),
                    }
                })
                .collect(),
        })
        .collect()
}

fn detail_section(view: &DetailView) -> DetailSection {
    let max = view.chart.max_value();
    DetailSection {
        dso_name: view.dso_name.clone(),
        denture: view.quick_pricing.denture.clone(),
        tier1_range: view.quick_pricing.tier1_range.clone(),
        bars: view
            .chart
            .bars
            .iter()
            .zip(PRICE_TIERS)
            .map(|(bar, tier)| ChartBar {
                color: tier.color,
                pct: bar_pct(bar.value, max),
                label: format!("{}: {}", bar.label, format_currency(bar.value)),
            })
            .collect(),
        dentist_heading: view.dentists.heading,
        dentist_lines: view.dentists.bullet_lines(),
        surgeon_heading: view.surgeons.heading,
        surgeon_lines: view.surgeons.bullet_lines(),
        evidence_source: view.evidence_source.clone(),
    }
}

/// Render the dashboard for one market: headline metrics, the competitive
/// scan table, the price-positioning chart, and optionally one competitor
/// deep dive. An empty market renders the explicit no-data panel.
pub fn render_dashboard(matrix: &MatrixView, detail: Option<&DetailView>) -> anyhow::Result<String> {
    let page = match matrix {
        MatrixView::NoData { market } => DashboardPage {
            market: market.clone(),
            generated_at: Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            has_data: false,
            metric_cards: Vec::new(),
            columns: MATRIX_COLUMNS.to_vec(),
            rows: Vec::new(),
            chart_title: String::new(),
            legend: Vec::new(),
            chart_groups: Vec::new(),
            detail: None,
        },
        MatrixView::Populated {
            market,
            metrics,
            rows,
            chart,
        } => DashboardPage {
            market: market.clone(),
            generated_at: Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            has_data: true,
            metric_cards: vec![
                MetricCard {
                    label: "Total Competitors",
                    value: metrics.competitor_count.to_string(),
                },
                MetricCard {
                    label: "Avg Clinics",
                    value: metrics.avg_clinic_label(),
                },
                MetricCard {
                    label: "Total Surgeons",
                    value: metrics.total_surgeon_count.to_string(),
                },
                MetricCard {
                    label: "Avg Econ Denture",
                    value: metrics.avg_denture_label(),
                },
            ],
            columns: MATRIX_COLUMNS.to_vec(),
            rows: rows
                .iter()
                .map(|r| r.cells().iter().map(|c| c.to_string()).collect())
                .collect(),
            chart_title: chart.title.clone(),
            legend: PRICE_TIERS
                .iter()
                .map(|t| LegendEntry {
                    label: t.label,
                    color: t.color,
                })
                .collect(),
            chart_groups: chart_groups(chart),
            detail: detail.map(detail_section),
        },
    };

    page.render()
        .map_err(|e| anyhow::anyhow!("template render: {e}"))
}
