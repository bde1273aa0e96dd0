// The intelligence boundary. Everything behind `Brain` is external to the
// presentation pipeline: record retrieval, lock handling, chat inference.

pub mod locks;

use crate::error::{Error, Result};
use crate::llm::LlmClient;
use crate::market::{CompetitorDetail, CompetitorRecord};
use std::time::Duration;
use tracing::{debug, info};

const ANALYST_PERSONA: &str = r#"You are the lead market research analyst for a consolidated affordable dentures-and-implants operator, producing competitive intelligence for dental service organizations (DSOs) across US metro markets (DMAs).

Operating rules:
- Data hierarchy: Level-1 locked records are absolute truth, internal knowledge second, live discovery third. Never contradict locked data.
- Pricing standards: Tier 0 is the economy denture-only price point; Tier 1 is the EconomyPlus band, reported as a low/high range. Higher tiers exist but are out of scope.
- Comparisons must be apples-to-apples on published fee schedules, not promotional teasers.
- If a price cannot be verified, report the literal string "TBD". Never estimate below a plausible market floor.
- When asked for structured data, return STRICT JSON with no prose outside the JSON block."#;

/// External intelligence backend consumed by the views and the research
/// session. Stateless from the caller's perspective; any caching or lock
/// management is the implementation's own concern.
#[allow(async_fn_in_trait)]
pub trait Brain {
    /// Competitor records for one market, in ranking order. Fails with
    /// [`Error::DataUnavailable`] for an unknown market or unreachable
    /// backend; a valid market with no competitors yields an empty vec.
    async fn market_matrix(&self, market: &str) -> Result<Vec<CompetitorRecord>>;

    /// Personnel and evidence for one competitor. Fails with
    /// [`Error::NotFound`] when the competitor is absent from that market.
    async fn competitor_details(
        &self,
        market: &str,
        competitor: &str,
    ) -> Result<CompetitorDetail>;

    /// Free-text research chat. Only the latest prompt is supplied;
    /// conversation continuity is the backend's own concern.
    async fn chat(&self, prompt: &str) -> Result<String>;
}

/// Production brain: serves Level-1 locked markets from the embedded seed
/// table and resolves everything else through the configured LLM with
/// strict-JSON prompts. Every call runs under a bounded deadline.
pub struct IntelBrain {
    markets: Vec<String>,
    llm: LlmClient,
    deadline: Duration,
}

impl IntelBrain {
    pub fn new(markets: Vec<String>, llm: LlmClient, deadline: Duration) -> Self {
        Self {
            markets,
            llm,
            deadline,
        }
    }

    fn knows(&self, market: &str) -> bool {
        self.markets.iter().any(|m| m == market)
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::http(format!(
                "backend call exceeded {}s deadline",
                self.deadline.as_secs()
            ))),
        }
    }
}

impl Brain for IntelBrain {
    async fn market_matrix(&self, market: &str) -> Result<Vec<CompetitorRecord>> {
        if !self.knows(market) {
            return Err(Error::unavailable(market, "not a tracked DMA"));
        }

        if let Some(records) = locks::locked_records(market) {
            debug!(market, count = records.len(), "serving level-1 locked records");
            return Ok(records);
        }

        info!(market, "resolving market matrix live");
        let prompt = matrix_prompt(market);
        self.bounded(self.llm.complete_json(ANALYST_PERSONA, &prompt))
            .await
            .map_err(|e| match e {
                e @ Error::DataUnavailable { .. } => e,
                e => Error::unavailable(market, e.to_string()),
            })
    }

    async fn competitor_details(
        &self,
        market: &str,
        competitor: &str,
    ) -> Result<CompetitorDetail> {
        if !self.knows(market) {
            return Err(Error::unavailable(market, "not a tracked DMA"));
        }
        // Locked markets carry an authoritative competitor set; reject
        // lookups outside it before spending a backend call.
        if let Some(records) = locks::locked_records(market)
            && !records.iter().any(|r| r.dso_name == competitor)
        {
            return Err(Error::not_found(market, competitor));
        }

        info!(market, competitor, "fetching competitor details");
        let prompt = detail_prompt(market, competitor);
        self.bounded(self.llm.complete_json(ANALYST_PERSONA, &prompt))
            .await
            .map_err(|e| match e {
                e @ (Error::DataUnavailable { .. } | Error::NotFound { .. }) => e,
                e => Error::unavailable(market, e.to_string()),
            })
    }

    async fn chat(&self, prompt: &str) -> Result<String> {
        self.bounded(self.llm.complete(ANALYST_PERSONA, prompt))
            .await
            .map_err(|e| Error::chat(e.to_string()))
    }
}

fn matrix_prompt(market: &str) -> String {
    format!(
        r#"Analyze the {market} DMA and identify the competitive DSOs.
Return a STRICT JSON ARRAY with no text outside the JSON block.

Each element must have these keys:
- "dsoName" (string)
- "clinicCount" (number)
- "dentistCount" (number)
- "surgeonCount" (number)
- "priceDenture" (number or "TBD")
- "priceTier1Low" (number or "TBD")
- "priceTier1High" (number or "TBD")

Order the array by market footprint, largest first. Use "TBD" for any price you cannot verify."#
    )
}

fn detail_prompt(market: &str, competitor: &str) -> String {
    format!(
        r#"For the DSO "{competitor}" in the {market} DMA, list key clinical personnel and the evidence behind them.
Return a STRICT JSON OBJECT with keys: "dsoName" (string), "dentistNames" (array of strings), "surgeonNames" (array of strings), "evidenceSource" (string)."#
    )
}
