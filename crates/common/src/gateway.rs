//! Typed client for the chain read gateway.
//!
//! The gateway exposes the factory and per-debate read interfaces as JSON
//! endpoints. This client does one HTTP request per upstream read and
//! converts wire payloads into domain types. It never retries and never
//! substitutes defaults: any transport, status, or decode failure surfaces
//! to the caller, which aborts the enclosing batch operation.

use crate::error::DecodeError;
use crate::types::{
    Address, AgentStats, Amount, Argument, DebateInfo, DebateStatus, PlatformStats, Side,
    SignedAmount,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build gateway HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn factory_counts_url(&self, factory: &Address) -> String {
        format!("{}/factory/{factory}/counts", self.base_url)
    }

    pub fn all_debates_url(&self, factory: &Address) -> String {
        format!("{}/factory/{factory}/debates", self.base_url)
    }

    pub fn active_debates_url(&self, factory: &Address) -> String {
        format!("{}/factory/{factory}/debates/active", self.base_url)
    }

    pub fn user_stats_url(&self, factory: &Address, user: &Address) -> String {
        format!("{}/factory/{factory}/users/{user}/stats", self.base_url)
    }

    pub fn debate_info_url(&self, debate: &Address) -> String {
        format!("{}/debate/{debate}/info", self.base_url)
    }

    pub fn debate_status_url(&self, debate: &Address) -> String {
        format!("{}/debate/{debate}/status", self.base_url)
    }

    pub fn debate_arguments_url(&self, debate: &Address, side: Side) -> String {
        format!("{}/debate/{debate}/arguments/{}", self.base_url, side.as_str())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T> {
        let body = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("gateway request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("gateway returned error status: {url}"))?
            .text()
            .await
            .with_context(|| format!("gateway body read failed: {url}"))?;
        serde_json::from_str(&body).with_context(|| format!("gateway payload decode failed: {url}"))
    }

    pub async fn fetch_factory_counts(&self, factory: &Address) -> Result<PlatformStats> {
        let dto: FactoryCountsDto = self.get_json(self.factory_counts_url(factory)).await?;
        Ok(dto.into())
    }

    pub async fn fetch_all_debates(&self, factory: &Address) -> Result<Vec<Address>> {
        let dto: Vec<String> = self.get_json(self.all_debates_url(factory)).await?;
        parse_address_list(&dto)
    }

    pub async fn fetch_active_debates(&self, factory: &Address) -> Result<Vec<Address>> {
        let dto: Vec<String> = self.get_json(self.active_debates_url(factory)).await?;
        parse_address_list(&dto)
    }

    pub async fn fetch_user_stats(&self, factory: &Address, user: &Address) -> Result<AgentStats> {
        let dto: UserStatsDto = self.get_json(self.user_stats_url(factory, user)).await?;
        dto.into_domain(*user)
    }

    pub async fn fetch_debate_info(&self, debate: &Address) -> Result<DebateInfo> {
        let dto: DebateInfoDto = self.get_json(self.debate_info_url(debate)).await?;
        dto.into_domain()
    }

    pub async fn fetch_debate_status(&self, debate: &Address) -> Result<DebateStatus> {
        let dto: StatusDto = self.get_json(self.debate_status_url(debate)).await?;
        Ok(DebateStatus::from_code(dto.status)?)
    }

    pub async fn fetch_debate_arguments(
        &self,
        debate: &Address,
        side: Side,
    ) -> Result<Vec<Argument>> {
        let dtos: Vec<ArgumentDto> = self.get_json(self.debate_arguments_url(debate, side)).await?;
        dtos.into_iter().map(ArgumentDto::into_domain).collect()
    }
}

fn parse_address_list(raw: &[String]) -> Result<Vec<Address>> {
    raw.iter()
        .map(|s| s.parse::<Address>().map_err(anyhow::Error::from))
        .collect()
}

fn parse_amount(s: &str) -> Result<Amount, DecodeError> {
    s.parse().map_err(|_| DecodeError::InvalidAmount(s.to_string()))
}

fn parse_signed_amount(s: &str) -> Result<SignedAmount, DecodeError> {
    s.parse().map_err(|_| DecodeError::InvalidAmount(s.to_string()))
}

/// Factory lifecycle counters.
#[derive(Debug, Clone, Deserialize)]
pub struct FactoryCountsDto {
    #[serde(rename = "debateCount")]
    pub debate_count: u64,
    #[serde(rename = "activeCount")]
    pub active_count: u64,
    #[serde(rename = "resolvingCount")]
    pub resolving_count: u64,
    #[serde(rename = "resolvedCount")]
    pub resolved_count: u64,
    #[serde(rename = "undeterminedCount")]
    pub undetermined_count: u64,
}

impl From<FactoryCountsDto> for PlatformStats {
    fn from(dto: FactoryCountsDto) -> Self {
        Self {
            total_debates: dto.debate_count,
            active_debates: dto.active_count,
            resolving_debates: dto.resolving_count,
            resolved_debates: dto.resolved_count,
            undetermined_debates: dto.undetermined_count,
        }
    }
}

/// Per-user ledger row from the factory. Amounts are decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct UserStatsDto {
    #[serde(rename = "totalWinnings")]
    pub total_winnings: String,
    #[serde(rename = "totalBets")]
    pub total_bets: String,
    #[serde(rename = "debatesParticipated")]
    pub debates_participated: u64,
    #[serde(rename = "debatesWon")]
    pub debates_won: u64,
    #[serde(rename = "totalClaimed")]
    pub total_claimed: String,
    #[serde(rename = "netProfit")]
    pub net_profit: String,
    #[serde(rename = "winRateBps")]
    pub win_rate_bps: u32,
}

impl UserStatsDto {
    fn into_domain(self, address: Address) -> Result<AgentStats> {
        Ok(AgentStats {
            address,
            total_winnings: parse_amount(&self.total_winnings)?,
            total_bets: parse_amount(&self.total_bets)?,
            debates_participated: self.debates_participated,
            debates_won: self.debates_won,
            total_claimed: parse_amount(&self.total_claimed)?,
            net_profit: parse_signed_amount(&self.net_profit)?,
            win_rate_bps: self.win_rate_bps,
        })
    }
}

/// Debate metadata tuple.
#[derive(Debug, Clone, Deserialize)]
pub struct DebateInfoDto {
    pub creator: String,
    pub statement: String,
    pub description: String,
    #[serde(rename = "sideAName")]
    pub side_a_name: String,
    #[serde(rename = "sideBName")]
    pub side_b_name: String,
    #[serde(rename = "creationDate")]
    pub creation_date: u64,
    #[serde(rename = "endDate")]
    pub end_date: u64,
    #[serde(rename = "isResolved")]
    pub is_resolved: bool,
    #[serde(rename = "isSideAWinner")]
    pub is_side_a_winner: bool,
    #[serde(rename = "lockedA")]
    pub locked_a: String,
    #[serde(rename = "unlockedA")]
    pub unlocked_a: String,
    #[serde(rename = "lockedB")]
    pub locked_b: String,
    #[serde(rename = "unlockedB")]
    pub unlocked_b: String,
    #[serde(rename = "winnerReasoning")]
    pub winner_reasoning: String,
    #[serde(rename = "contentBytes")]
    pub content_bytes: u64,
    #[serde(rename = "maxContentBytes")]
    pub max_content_bytes: u64,
    pub bounty: String,
}

impl DebateInfoDto {
    fn into_domain(self) -> Result<DebateInfo> {
        Ok(DebateInfo {
            creator: self.creator.parse()?,
            statement: self.statement,
            description: self.description,
            side_a_name: self.side_a_name,
            side_b_name: self.side_b_name,
            creation_date: self.creation_date,
            end_date: self.end_date,
            is_resolved: self.is_resolved,
            is_side_a_winner: self.is_side_a_winner,
            locked_a: parse_amount(&self.locked_a)?,
            unlocked_a: parse_amount(&self.unlocked_a)?,
            locked_b: parse_amount(&self.locked_b)?,
            unlocked_b: parse_amount(&self.unlocked_b)?,
            winner_reasoning: self.winner_reasoning,
            content_bytes: self.content_bytes,
            max_content_bytes: self.max_content_bytes,
            bounty: parse_amount(&self.bounty)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusDto {
    pub status: u8,
}

/// One argument row from a side's argument list.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgumentDto {
    pub author: String,
    pub content: String,
    pub timestamp: u64,
    pub amount: String,
}

impl ArgumentDto {
    fn into_domain(self) -> Result<Argument> {
        Ok(Argument {
            author: self.author.parse()?,
            content: self.content,
            timestamp: self.timestamp,
            amount: parse_amount(&self.amount)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACTORY: &str = "0x00000000000000000000000000000000000000aa";
    const DEBATE: &str = "0x00000000000000000000000000000000000000d1";

    fn client() -> GatewayClient {
        GatewayClient::new("http://gateway.local/read/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_builders_trim_trailing_slash() {
        let c = client();
        let factory: Address = FACTORY.parse().unwrap();
        let debate: Address = DEBATE.parse().unwrap();
        assert_eq!(
            c.factory_counts_url(&factory),
            format!("http://gateway.local/read/factory/{FACTORY}/counts")
        );
        assert_eq!(
            c.debate_arguments_url(&debate, Side::B),
            format!("http://gateway.local/read/debate/{DEBATE}/arguments/b")
        );
        assert_eq!(
            c.debate_status_url(&debate),
            format!("http://gateway.local/read/debate/{DEBATE}/status")
        );
    }

    #[test]
    fn test_user_stats_url_includes_both_addresses() {
        let c = client();
        let factory: Address = FACTORY.parse().unwrap();
        let user: Address = "0x00000000000000000000000000000000000000cc".parse().unwrap();
        let url = c.user_stats_url(&factory, &user);
        assert!(url.contains(FACTORY));
        assert!(url.ends_with("/users/0x00000000000000000000000000000000000000cc/stats"));
    }

    #[test]
    fn test_parse_factory_counts() {
        let json = r#"{"debateCount":12,"activeCount":5,"resolvingCount":2,"resolvedCount":4,"undeterminedCount":1}"#;
        let dto: FactoryCountsDto = serde_json::from_str(json).unwrap();
        let stats = PlatformStats::from(dto);
        assert_eq!(stats.total_debates, 12);
        assert_eq!(stats.undetermined_debates, 1);
    }

    #[test]
    fn test_parse_debate_info_sums_pools() {
        let json = format!(
            r#"{{"creator":"{FACTORY}","statement":"s","description":"d",
                "sideAName":"Yes","sideBName":"No",
                "creationDate":1700000000,"endDate":1700600000,
                "isResolved":false,"isSideAWinner":false,
                "lockedA":"1000000000000000000","unlockedA":"500000000000000000",
                "lockedB":"0","unlockedB":"250000000000000000",
                "winnerReasoning":"","contentBytes":120,"maxContentBytes":4096,
                "bounty":"42"}}"#
        );
        let dto: DebateInfoDto = serde_json::from_str(&json).unwrap();
        let info = dto.into_domain().unwrap();
        assert_eq!(info.total_side_a(), 1_500_000_000_000_000_000);
        assert_eq!(info.total_side_b(), 250_000_000_000_000_000);
        assert_eq!(info.bounty, 42);
    }

    #[test]
    fn test_parse_argument_rejects_bad_amount() {
        let json = format!(
            r#"{{"author":"{FACTORY}","content":"because","timestamp":1,"amount":"not-a-number"}}"#
        );
        let dto: ArgumentDto = serde_json::from_str(&json).unwrap();
        assert!(dto.into_domain().is_err());
    }

    #[test]
    fn test_parse_user_stats_signed_profit() {
        let json = r#"{"totalWinnings":"10","totalBets":"25","debatesParticipated":4,
            "debatesWon":1,"totalClaimed":"10","netProfit":"-15","winRateBps":2500}"#;
        let dto: UserStatsDto = serde_json::from_str(json).unwrap();
        let user: Address = FACTORY.parse().unwrap();
        let stats = dto.into_domain(user).unwrap();
        assert_eq!(stats.net_profit, -15);
        assert_eq!(stats.win_rate_bps, 2500);
    }

    #[test]
    fn test_parse_address_list_fails_whole_batch_on_bad_entry() {
        let good = vec![FACTORY.to_string(), DEBATE.to_string()];
        assert_eq!(parse_address_list(&good).unwrap().len(), 2);

        let bad = vec![FACTORY.to_string(), "0xnope".to_string()];
        assert!(parse_address_list(&bad).is_err());
    }

    #[test]
    fn test_parse_status_payload() {
        let dto: StatusDto = serde_json::from_str(r#"{"status":2}"#).unwrap();
        assert_eq!(DebateStatus::from_code(dto.status).unwrap(), DebateStatus::Resolved);
    }
}
