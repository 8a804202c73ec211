//! Read-source traits over the factory and debate interfaces.
//!
//! The batch reader is generic over these so tests can substitute in-memory
//! fakes (including fakes that record read order, which is observable
//! behavior for the early-terminating scans).

use anyhow::Result;
use common::gateway::GatewayClient;
use common::types::{
    Address, AgentStats, Argument, DebateInfo, DebateStatus, PlatformStats, Side,
};

/// Factory registry reads: lifecycle counters, debate listings, and the
/// per-user ledger.
pub trait FactoryReads {
    fn factory_counts(
        &self,
        factory: &Address,
    ) -> impl std::future::Future<Output = Result<PlatformStats>> + Send;

    fn all_debates(
        &self,
        factory: &Address,
    ) -> impl std::future::Future<Output = Result<Vec<Address>>> + Send;

    fn active_debates(
        &self,
        factory: &Address,
    ) -> impl std::future::Future<Output = Result<Vec<Address>>> + Send;

    fn user_stats(
        &self,
        factory: &Address,
        user: &Address,
    ) -> impl std::future::Future<Output = Result<AgentStats>> + Send;
}

/// Per-debate instance reads.
pub trait DebateReads {
    fn debate_info(
        &self,
        debate: &Address,
    ) -> impl std::future::Future<Output = Result<DebateInfo>> + Send;

    fn debate_status(
        &self,
        debate: &Address,
    ) -> impl std::future::Future<Output = Result<DebateStatus>> + Send;

    fn debate_arguments(
        &self,
        debate: &Address,
        side: Side,
    ) -> impl std::future::Future<Output = Result<Vec<Argument>>> + Send;
}

impl FactoryReads for GatewayClient {
    async fn factory_counts(&self, factory: &Address) -> Result<PlatformStats> {
        self.fetch_factory_counts(factory).await
    }

    async fn all_debates(&self, factory: &Address) -> Result<Vec<Address>> {
        self.fetch_all_debates(factory).await
    }

    async fn active_debates(&self, factory: &Address) -> Result<Vec<Address>> {
        self.fetch_active_debates(factory).await
    }

    async fn user_stats(&self, factory: &Address, user: &Address) -> Result<AgentStats> {
        self.fetch_user_stats(factory, user).await
    }
}

impl DebateReads for GatewayClient {
    async fn debate_info(&self, debate: &Address) -> Result<DebateInfo> {
        self.fetch_debate_info(debate).await
    }

    async fn debate_status(&self, debate: &Address) -> Result<DebateStatus> {
        self.fetch_debate_status(debate).await
    }

    async fn debate_arguments(&self, debate: &Address, side: Side) -> Result<Vec<Argument>> {
        self.fetch_debate_arguments(debate, side).await
    }
}
