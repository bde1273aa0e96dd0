// Interactive navigation: one session, one logical thread of control.
// State is replaced, never mutated in place, on each user action.

use crate::brain::Brain;
use crate::config::Config;
use crate::error::Error;
use crate::market::CompetitorRecord;
use crate::session::{ChatMessage, ResearchSession};
use crate::views::detail::{DetailView, resolve_selection};
use crate::views::matrix::{MATRIX_COLUMNS, MatrixView};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Matrix,
    Details,
    Lab,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matrix => write!(f, "matrix"),
            Self::Details => write!(f, "details"),
            Self::Lab => write!(f, "lab"),
        }
    }
}

/// Navigation state for one session. Every action produces a successor
/// value with a bumped sequence number; in-flight fetch results from an
/// older sequence are discarded instead of overwriting newer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub view: View,
    pub market: String,
    pub selected: Option<String>,
    pub seq: u64,
}

impl NavState {
    pub fn new(market: String) -> Self {
        Self {
            view: View::Matrix,
            market,
            selected: None,
            seq: 0,
        }
    }

    pub fn with_view(&self, view: View) -> Self {
        Self {
            view,
            seq: self.seq + 1,
            ..self.clone()
        }
    }

    pub fn with_market(&self, market: String) -> Self {
        Self {
            market,
            seq: self.seq + 1,
            ..self.clone()
        }
    }

    pub fn with_selection(&self, selected: Option<String>) -> Self {
        Self {
            selected,
            seq: self.seq + 1,
            ..self.clone()
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    ShowView(View),
    Market(String),
    Select(String),
    Refresh,
    Say(String),
    Help,
    Quit,
    Unknown(String),
    Noop,
}

fn parse_command(input: &str, view: View) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::Noop;
    }
    if let Some(rest) = input.strip_prefix("market ") {
        return Command::Market(rest.trim().to_string());
    }
    if let Some(rest) = input.strip_prefix("select ") {
        return Command::Select(rest.trim().to_string());
    }
    match input {
        "matrix" => Command::ShowView(View::Matrix),
        "details" => Command::ShowView(View::Details),
        "lab" => Command::ShowView(View::Lab),
        "refresh" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other if view == View::Lab => Command::Say(other.to_string()),
        other => Command::Unknown(other.to_string()),
    }
}

/// Run the interactive console against a brain. Blocks on stdin; every
/// backend call is already bounded by the brain's own deadline, so a slow
/// fetch degrades to a visible error instead of hanging the session.
pub async fn run<B: Brain>(brain: &B, config: &Config) -> Result<()> {
    let mut state = NavState::new(config.markets.default.clone());
    let mut session = ResearchSession::new();

    print_banner(&config.markets.available);
    state = render(brain, state).await;
    print_prompt(&state);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line, state.view) {
            Command::Quit => break,
            Command::Noop => {}
            Command::Help => print_banner(&config.markets.available),
            Command::ShowView(view) => {
                state = state.with_view(view);
                state = render(brain, state).await;
            }
            Command::Market(name) => match canonical_market(&name, &config.markets.available) {
                Some(market) => {
                    println!("Context locked: {market}");
                    state = state.with_market(market);
                    state = render(brain, state).await;
                }
                None => println!(
                    "Unknown market \"{name}\". Available: {}",
                    config.markets.available.join(", ")
                ),
            },
            Command::Select(choice) => {
                state = state.with_selection(Some(choice)).with_view(View::Details);
                state = render(brain, state).await;
            }
            Command::Refresh => {
                state = render(brain, state).await;
            }
            Command::Say(text) => {
                session
                    .submit(brain, &text, |transcript| print_latest(transcript))
                    .await;
            }
            Command::Unknown(cmd) => {
                println!("Unknown command \"{cmd}\". Try \"help\".");
            }
        }
        print_prompt(&state);
    }

    Ok(())
}

fn canonical_market(input: &str, available: &[String]) -> Option<String> {
    available
        .iter()
        .find(|m| m.eq_ignore_ascii_case(input))
        .cloned()
}

/// Render the current view and return the (possibly updated) state: a
/// details render materializes the resolved competitor selection.
async fn render<B: Brain>(brain: &B, state: NavState) -> NavState {
    match state.view {
        View::Matrix => {
            show_matrix(brain, &state).await;
            state
        }
        View::Details => {
            let resolved = show_details(brain, &state).await;
            if resolved != state.selected {
                state.with_selection(resolved)
            } else {
                state
            }
        }
        View::Lab => {
            println!("── Field Research Lab ──");
            println!("Type a question for the research agent; \"matrix\" or \"details\" to navigate away.");
            state
        }
    }
}

async fn show_matrix<B: Brain>(brain: &B, state: &NavState) {
    println!("Retrieving market intelligence for {}...", state.market);
    let issued = state.seq;
    let outcome = brain.market_matrix(&state.market).await;
    if issued != state.seq {
        debug!(issued, current = state.seq, "discarding stale matrix result");
        return;
    }
    match outcome {
        Ok(records) => print_matrix(&MatrixView::build(&state.market, &records)),
        Err(e) => print_error_panel(&e),
    }
}

/// Fetch, resolve the selection against the current market's set (stale
/// selections fall back to the first competitor), and render. Returns the
/// resolved competitor name.
async fn show_details<B: Brain>(brain: &B, state: &NavState) -> Option<String> {
    let issued = state.seq;
    let records = match brain.market_matrix(&state.market).await {
        Ok(records) => records,
        Err(e) => {
            print_error_panel(&e);
            return state.selected.clone();
        }
    };
    if issued != state.seq {
        debug!(issued, current = state.seq, "discarding stale matrix result");
        return state.selected.clone();
    }

    let Some(record) = interpret_selection(state.selected.as_deref(), &records) else {
        println!("No competitors available in {}.", state.market);
        return None;
    };
    let resolved = record.dso_name.clone();

    print_competitor_roster(&records, &resolved);

    println!("Accessing public records & evidence for {resolved}...");
    match brain.competitor_details(&state.market, &resolved).await {
        Ok(detail) => print_detail(&DetailView::build(&state.market, record, &detail)),
        Err(e) => print_error_panel(&e),
    }

    Some(resolved)
}

/// A `select N` index (1-based) wins over name matching; anything else goes
/// through the stale-selection fallback rule.
fn interpret_selection<'a>(
    selected: Option<&str>,
    records: &'a [CompetitorRecord],
) -> Option<&'a CompetitorRecord> {
    if let Some(s) = selected
        && let Ok(idx) = s.parse::<usize>()
        && (1..=records.len()).contains(&idx)
    {
        return Some(&records[idx - 1]);
    }
    resolve_selection(selected, records)
}

// ── text rendering ──

fn print_banner(markets: &[String]) {
    println!("DSO Market Intelligence Console");
    println!("Views: matrix | details | lab");
    println!("Commands: market <name> | select <name-or-#> | refresh | help | quit");
    println!("Markets: {}", markets.join(", "));
    println!();
}

fn print_prompt(state: &NavState) {
    println!("[{} @ {}]>", state.view, state.market);
}

fn print_error_panel(e: &Error) {
    println!("┌─ unavailable ─────");
    println!("│ {e}");
    println!("└───────────────────");
}

pub fn print_matrix(view: &MatrixView) {
    match view {
        MatrixView::NoData { market } => {
            println!("No data available for this market ({market}).");
        }
        MatrixView::Populated {
            market,
            metrics,
            rows,
            chart,
        } => {
            println!("── Competitive Market Matrix: {market} ──");
            println!(
                "Total Competitors: {}   Avg Clinics: {}   Total Surgeons: {}   Avg Econ Denture: {}",
                metrics.competitor_count,
                metrics.avg_clinic_label(),
                metrics.total_surgeon_count,
                metrics.avg_denture_label(),
            );
            println!();
            print_table(rows.iter().map(|r| r.cells()));
            println!();
            println!("{} (see the HTML report for the grouped chart)", chart.title);
        }
    }
}

fn print_table<'a>(rows: impl Iterator<Item = [&'a str; 7]> + Clone) {
    let mut widths: Vec<usize> = MATRIX_COLUMNS.iter().map(|c| c.len()).collect();
    for row in rows.clone() {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }
    let header = MATRIX_COLUMNS
        .iter()
        .zip(widths.iter().copied())
        .map(|(c, w)| format!("{c:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{header}");
    println!("{}", "─".repeat(header.len()));
    for row in rows {
        let line = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(c, w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{line}");
    }
}

fn print_competitor_roster(records: &[CompetitorRecord], selected: &str) {
    println!("Competitors:");
    for (i, r) in records.iter().enumerate() {
        let marker = if r.dso_name == selected { ">" } else { " " };
        println!("{marker} {}. {}", i + 1, r.dso_name);
    }
    println!();
}

pub fn print_detail(view: &DetailView) {
    println!("── Intelligence Report: {} ({}) ──", view.dso_name, view.market);
    println!(
        "Denture: {}   Tier 1: {}",
        view.quick_pricing.denture, view.quick_pricing.tier1_range
    );
    println!();
    for bar in &view.chart.bars {
        println!("  {:<14} {}", bar.label, crate::market::format_currency(bar.value));
    }
    println!();
    println!("{}", view.dentists.heading);
    for line in view.dentists.bullet_lines() {
        println!("  {line}");
    }
    println!("{}", view.surgeons.heading);
    for line in view.surgeons.bullet_lines() {
        println!("  {line}");
    }
    println!();
    println!("Evidence Source: {}", view.evidence_source);
}

fn print_latest(transcript: &[ChatMessage]) {
    if let Some(message) = transcript.last() {
        println!("{}: {}", message.role, message.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_transitions_bump_sequence() {
        let state = NavState::new("Houston".into());
        assert_eq!(state.seq, 0);
        let state = state.with_view(View::Lab);
        assert_eq!(state.seq, 1);
        let state = state.with_market("Austin".into());
        assert_eq!(state.seq, 2);
        assert_eq!(state.view, View::Lab);
        assert_eq!(state.market, "Austin");
        let state = state.with_selection(Some("Nuvia".into()));
        assert_eq!(state.seq, 3);
        assert_eq!(state.selected.as_deref(), Some("Nuvia"));
    }

    #[test]
    fn commands_parse_per_view() {
        assert_eq!(
            parse_command("market Houston", View::Matrix),
            Command::Market("Houston".into())
        );
        assert_eq!(
            parse_command("select 3", View::Details),
            Command::Select("3".into())
        );
        assert_eq!(parse_command("  ", View::Matrix), Command::Noop);
        assert_eq!(
            parse_command("what about implant trends?", View::Lab),
            Command::Say("what about implant trends?".into())
        );
        assert_eq!(
            parse_command("what about implant trends?", View::Matrix),
            Command::Unknown("what about implant trends?".into())
        );
    }

    #[test]
    fn market_lookup_is_case_insensitive_but_canonical() {
        let available = vec!["Dallas-Fort Worth".to_string(), "Houston".to_string()];
        assert_eq!(
            canonical_market("houston", &available).as_deref(),
            Some("Houston")
        );
        assert_eq!(canonical_market("El Paso", &available), None);
    }
}
