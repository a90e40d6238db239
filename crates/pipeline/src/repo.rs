//! Repo ticket batch conversion.
//!
//! Rows are parsed, grouped, and each group is converted independently on a
//! rayon pool. Results are collected in group order, so output follows the
//! first appearance of each group key regardless of scheduling.

use ledger_convert::{classify, AccountMap, ClassificationStats, RepoTradeDeriver};
use ledger_core::{
    CanonicalRepoTrade, Config, Error, ErrorKind, RepoEvent, RepoTicket, Result, TicketRow,
};
use ledger_ingestion::{select_representative, TicketGroup, TicketGrouper};
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info, warn};

/// A group (or unparseable row) that could not be converted.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFailure {
    /// Group key, or `row N` when the row never reached grouping.
    pub group_key: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of an isolated-failure conversion.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Converted trades in group order.
    pub trades: Vec<CanonicalRepoTrade>,
    /// Failures in group order.
    pub failures: Vec<GroupFailure>,
    /// Event counts over the converted trades.
    pub stats: ClassificationStats,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn push_failure(&mut self, group_key: String, error: &Error) {
        warn!(group_key = %group_key, error = %error, "skipping failed group");
        self.failures.push(GroupFailure {
            group_key,
            kind: error.kind(),
            message: error.to_string(),
        });
    }
}

/// Converts repo ticket rows to canonical repo trades.
pub struct RepoPipeline {
    deriver: RepoTradeDeriver,
    pool: ThreadPool,
    abort_on_error: bool,
}

impl RepoPipeline {
    /// Build a pipeline from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.pipeline.workers as usize)
            .thread_name(|i| format!("repo-convert-{}", i))
            .build()
            .map_err(|e| Error::config(format!("failed to build worker pool: {}", e)))?;

        Ok(Self {
            deriver: RepoTradeDeriver::new(AccountMap::from_config(&config.accounts)),
            pool,
            abort_on_error: config.pipeline.abort_on_error,
        })
    }

    /// Convert a batch, failing on the first bad row or group.
    pub fn convert(&self, rows: &[TicketRow]) -> Result<Vec<CanonicalRepoTrade>> {
        self.convert_counted(rows).map(|(trades, _)| trades)
    }

    /// Convert a batch, collecting failures instead of aborting.
    pub fn convert_isolated(&self, rows: &[TicketRow]) -> BatchReport {
        let mut report = BatchReport::default();

        let mut tickets = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            match RepoTicket::from_row(row) {
                Ok(ticket) => tickets.push(ticket),
                Err(e) => report.push_failure(format!("row {}", i), &e),
            }
        }
        let groups = TicketGrouper::group(tickets);

        for (group, result) in groups.iter().zip(self.convert_groups(&groups)) {
            match result {
                Ok((event, trade)) => {
                    report.stats.record(event);
                    report.trades.push(trade);
                }
                Err(e) => report.push_failure(group.key().to_string(), &e),
            }
        }

        info!(
            tickets = rows.len(),
            groups = groups.len(),
            trades = report.trades.len(),
            failures = report.failures.len(),
            "converted repo batch with isolated failures"
        );
        report
    }

    /// Convert according to the configured failure policy.
    pub fn run(&self, rows: &[TicketRow]) -> Result<BatchReport> {
        if !self.abort_on_error {
            return Ok(self.convert_isolated(rows));
        }

        let (trades, stats) = self.convert_counted(rows)?;
        Ok(BatchReport {
            trades,
            failures: Vec::new(),
            stats,
        })
    }

    fn convert_counted(
        &self,
        rows: &[TicketRow],
    ) -> Result<(Vec<CanonicalRepoTrade>, ClassificationStats)> {
        let tickets = rows
            .iter()
            .map(RepoTicket::from_row)
            .collect::<Result<Vec<_>>>()?;
        let groups = TicketGrouper::group(tickets);

        let mut stats = ClassificationStats::default();
        let mut trades = Vec::with_capacity(groups.len());
        for (group, result) in groups.iter().zip(self.convert_groups(&groups)) {
            let (event, trade) = result.inspect_err(|e| {
                warn!(group_key = %group.key(), error = %e, "aborting batch");
            })?;
            stats.record(event);
            trades.push(trade);
        }

        info!(
            tickets = rows.len(),
            groups = groups.len(),
            open = stats.open,
            close = stats.close,
            change_rate = stats.change_rate,
            "converted repo batch"
        );
        Ok((trades, stats))
    }

    fn convert_groups(
        &self,
        groups: &[TicketGroup],
    ) -> Vec<Result<(RepoEvent, CanonicalRepoTrade)>> {
        self.pool.install(|| {
            groups
                .par_iter()
                .map(|group| {
                    let representative = select_representative(group)?;
                    let event = classify(&representative.ticket);
                    let trade = self.deriver.derive_event(event, &representative.ticket)?;
                    debug!(
                        group_key = %representative.group_key,
                        event = %event,
                        cust_ref = %trade.cust_ref,
                        "derived repo trade"
                    );
                    Ok((event, trade))
                })
                .collect()
        })
    }
}
