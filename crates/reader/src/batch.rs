//! The seven batch read operations.

use crate::roster::{AddressSet, ParticipantLedger};
use crate::sources::{DebateReads, FactoryReads};
use anyhow::Result;
use common::types::{
    Address, AgentStats, Amount, DebateSummary, ParticipantRecord, PlatformAggregate,
    PlatformStats, Side,
};

/// Stateless batch reader bound to one factory.
///
/// The factory address is fixed at construction and never mutated. Each
/// operation recomputes from the source's current answers; there is no
/// cross-call state. Scan order for every multi-debate operation is
/// "debates in input order, side A before side B, arguments in list order",
/// which fixes the first-seen output order of all de-duplicated results.
pub struct BatchReader<S> {
    source: S,
    factory: Address,
}

impl<S> BatchReader<S>
where
    S: FactoryReads + DebateReads,
{
    pub fn new(source: S, factory: Address) -> Self {
        Self { source, factory }
    }

    pub fn factory(&self) -> Address {
        self.factory
    }

    /// Passthrough of the factory's five lifecycle counters in one round
    /// trip. No aggregation; failures surface as-is.
    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        self.source.factory_counts(&self.factory).await
    }

    /// All debate addresses known to the factory, in registry order.
    pub async fn all_debates(&self) -> Result<Vec<Address>> {
        self.source.all_debates(&self.factory).await
    }

    /// Currently active debate addresses, in registry order.
    pub async fn active_debates(&self) -> Result<Vec<Address>> {
        self.source.active_debates(&self.factory).await
    }

    /// One summary row per input address, input order preserved. Duplicate
    /// inputs yield duplicate rows. Argument counts require reading both
    /// full argument lists, so cost is linear in total argument count.
    pub async fn debate_summaries(&self, debates: &[Address]) -> Result<Vec<DebateSummary>> {
        let mut out = Vec::with_capacity(debates.len());
        for debate in debates {
            let info = self.source.debate_info(debate).await?;
            let status = self.source.debate_status(debate).await?;
            let args_a = self.source.debate_arguments(debate, Side::A).await?;
            let args_b = self.source.debate_arguments(debate, Side::B).await?;
            metrics::counter!("reader_debates_scanned_total").increment(1);
            metrics::counter!("reader_arguments_scanned_total")
                .increment((args_a.len() + args_b.len()) as u64);
            out.push(DebateSummary {
                address: *debate,
                creator: info.creator,
                end_date: info.end_date,
                status,
                total_side_a: info.total_side_a(),
                total_side_b: info.total_side_b(),
                total_bounty: info.bounty,
                argument_count_a: args_a.len() as u64,
                argument_count_b: args_b.len() as u64,
            });
        }
        tracing::debug!(requested = debates.len(), "debate summaries assembled");
        Ok(out)
    }

    /// One factory ledger lookup per input address, output order matching
    /// input order. Duplicates are fetched independently; dedup here is the
    /// caller's responsibility, unlike the roster operations.
    pub async fn agent_stats_batch(&self, agents: &[Address]) -> Result<Vec<AgentStats>> {
        let mut out = Vec::with_capacity(agents.len());
        for agent in agents {
            out.push(self.source.user_stats(&self.factory, agent).await?);
        }
        Ok(out)
    }

    /// Distinct argument authors in first-seen order, stopping the moment
    /// `max_results` distinct authors are collected. Early termination, not
    /// truncation: once the cap is hit, remaining sides and debates are
    /// never fetched at all.
    pub async fn argument_authors(
        &self,
        debates: &[Address],
        max_results: usize,
    ) -> Result<Vec<Address>> {
        let mut authors = AddressSet::with_cap(max_results);
        if authors.is_full() {
            return Ok(authors.into_vec());
        }
        'scan: for debate in debates {
            for side in [Side::A, Side::B] {
                let args = self.source.debate_arguments(debate, side).await?;
                metrics::counter!("reader_arguments_scanned_total").increment(args.len() as u64);
                for arg in args {
                    authors.insert(arg.author);
                    if authors.is_full() {
                        break 'scan;
                    }
                }
            }
            metrics::counter!("reader_debates_scanned_total").increment(1);
        }
        Ok(authors.into_vec())
    }

    /// Per-author argument counts and stake totals, first-seen order. The
    /// admission cap applies to *new* authors only: after `max_results`
    /// distinct authors are admitted, the scan still continues to the end so
    /// admitted rows keep accruing. Totals can therefore keep growing after
    /// the roster is full.
    pub async fn participant_details(
        &self,
        debates: &[Address],
        max_results: usize,
    ) -> Result<Vec<ParticipantRecord>> {
        if max_results == 0 {
            // Nothing can ever be admitted, so no accrual is possible either;
            // skip the scan entirely.
            return Ok(Vec::new());
        }
        let mut ledger = ParticipantLedger::with_cap(max_results);
        for debate in debates {
            for side in [Side::A, Side::B] {
                let args = self.source.debate_arguments(debate, side).await?;
                metrics::counter!("reader_arguments_scanned_total").increment(args.len() as u64);
                for arg in args {
                    ledger.record(arg.author, arg.amount);
                }
            }
            metrics::counter!("reader_debates_scanned_total").increment(1);
        }
        tracing::debug!(
            distinct = ledger.distinct(),
            cap = max_results,
            "participant roster assembled"
        );
        Ok(ledger.into_records())
    }

    /// De-duplicated creator addresses, first-seen order. Creators cannot
    /// outnumber the input debates, so the input length is the natural
    /// capacity bound and no cap parameter exists.
    pub async fn debate_creators(&self, debates: &[Address]) -> Result<Vec<Address>> {
        let mut creators = AddressSet::new();
        for debate in debates {
            let info = self.source.debate_info(debate).await?;
            creators.insert(info.creator);
        }
        Ok(creators.into_vec())
    }

    /// Platform-wide sums in a single pass: volume (all four sub-balances),
    /// bounties, argument count, and distinct authors across both sides of
    /// every listed debate. The author set is dynamically sized, so unique
    /// participant counting has no capacity limit.
    pub async fn aggregate_stats(&self, debates: &[Address]) -> Result<PlatformAggregate> {
        let mut total_volume: Amount = 0;
        let mut total_bounties: Amount = 0;
        let mut total_arguments: u64 = 0;
        let mut authors = AddressSet::new();

        for debate in debates {
            let info = self.source.debate_info(debate).await?;
            total_volume += info.total_side_a() + info.total_side_b();
            total_bounties += info.bounty;
            for side in [Side::A, Side::B] {
                let args = self.source.debate_arguments(debate, side).await?;
                total_arguments += args.len() as u64;
                metrics::counter!("reader_arguments_scanned_total").increment(args.len() as u64);
                for arg in args {
                    authors.insert(arg.author);
                }
            }
            metrics::counter!("reader_debates_scanned_total").increment(1);
        }

        Ok(PlatformAggregate {
            total_volume,
            total_bounties,
            total_arguments,
            unique_participants: authors.len() as u64,
        })
    }
}
