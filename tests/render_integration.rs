use dso_scope::market::{CompetitorDetail, CompetitorRecord, Price};
use dso_scope::output;
use dso_scope::views::detail::DetailView;
use dso_scope::views::matrix::MatrixView;

fn record(name: &str, denture: Price) -> CompetitorRecord {
    CompetitorRecord {
        dso_name: name.into(),
        clinic_count: 22,
        dentist_count: 45,
        surgeon_count: 6,
        price_denture: denture,
        price_tier1_low: Price::Known(800.0),
        price_tier1_high: Price::Known(1200.0),
    }
}

#[test]
fn dashboard_contains_metrics_table_and_chart() {
    let records = vec![
        record("AD&I/DDS", Price::Known(599.0)),
        record("ClearChoice", Price::Unknown),
    ];
    let matrix = MatrixView::build("Dallas-Fort Worth", &records);
    let html = output::render_dashboard(&matrix, None).unwrap();

    assert!(html.contains("Dallas-Fort Worth"));
    assert!(html.contains("DSO / Practice"));
    assert!(html.contains("Total Competitors"));
    // Escaped by the template engine.
    assert!(html.contains("AD&amp;I/DDS"));
    assert!(html.contains("ClearChoice"));
    // Display stays verbatim for unknown prices; the chart zero-fills.
    assert!(html.contains("TBD"));
    assert!(html.contains("$599"));
    assert!(html.contains("#3b82f6"));
    assert!(html.contains("#10b981"));
    assert!(html.contains("#f59e0b"));
}

#[test]
fn empty_market_renders_no_data_panel() {
    let matrix = MatrixView::build("Austin", &[]);
    let html = output::render_dashboard(&matrix, None).unwrap();
    assert!(html.contains("No data available for this market."));
    assert!(!html.contains("<td>"));
}

#[test]
fn detail_section_renders_personnel_and_evidence_defaults() {
    let records = vec![record("Fast New Smile", Price::Unknown)];
    let matrix = MatrixView::build("Dallas-Fort Worth", &records);
    let detail = CompetitorDetail {
        dso_name: "Fast New Smile".into(),
        dentist_names: vec!["Dr. Reyes".into()],
        surgeon_names: vec![],
        evidence_source: None,
    };
    let view = DetailView::build("Dallas-Fort Worth", &records[0], &detail);
    let html = output::render_dashboard(&matrix, Some(&view)).unwrap();

    assert!(html.contains("Intelligence Report: Fast New Smile"));
    assert!(html.contains("Dr. Reyes"));
    assert!(html.contains("No specific surgeons identified."));
    assert!(html.contains("Evidence Source:"));
    assert!(html.contains("N/A"));
}

#[test]
fn rendering_twice_from_same_input_is_stable() {
    let records = vec![record("Sage Dental", Price::Known(800.0))];
    let matrix = MatrixView::build("Houston", &records);
    let first = output::render_dashboard(&matrix, None).unwrap();
    let second = output::render_dashboard(&matrix, None).unwrap();
    // Identical except for the generation timestamp line.
    let strip = |s: &str| {
        s.lines()
            .filter(|l| !l.contains("Generated"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(strip(&first), strip(&second));
}
