//! Request and response shapes for the JSON query surface.
//! No aggregation logic here: handlers call the batch reader and wrap its
//! output; amounts stay raw base-unit strings (formatting is the caller's).

use common::types::{
    Address, AgentStats, DebateSummary, ParticipantRecord, PlatformAggregate, PlatformStats,
};
use serde::{Deserialize, Serialize};

/// Body for every batch endpoint: the debate (or agent) address list, plus
/// the distinct-address cap where the operation takes one. When
/// `max_results` is omitted the server's configured default applies.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PlatformStatsResponse {
    #[serde(flatten)]
    pub stats: PlatformStats,
}

#[derive(Debug, Serialize)]
pub struct DebateListResponse {
    pub debates: Vec<Address>,
}

#[derive(Debug, Serialize)]
pub struct SummariesResponse {
    pub summaries: Vec<DebateSummary>,
}

#[derive(Debug, Serialize)]
pub struct AuthorsResponse {
    pub authors: Vec<Address>,
}

#[derive(Debug, Serialize)]
pub struct ParticipantsResponse {
    pub participants: Vec<ParticipantRecord>,
}

#[derive(Debug, Serialize)]
pub struct CreatorsResponse {
    pub creators: Vec<Address>,
}

#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    #[serde(flatten)]
    pub aggregate: PlatformAggregate,
}

#[derive(Debug, Serialize)]
pub struct AgentStatsResponse {
    pub agents: Vec<AgentStats>,
}
