// Use case: consume_quota.

use crate::application::context::AppContext;
use crate::domain::entities::api_key::ApiKeyRecord;
use crate::domain::services::quota_enforcer::QuotaDecision;
use metrics::counter;
use time::Date;
use tracing::debug;

/// Evaluates one request against a key's daily quota and persists the counters.
///
/// Counters are written with a compare-and-set on the previously read values, so two
/// concurrent requests cannot both take the last slot of the day. A lost race re-reads
/// the record and decides again; running out of attempts fails closed.
pub struct ConsumeQuotaUseCase;

/// Input for quota evaluation: the resolved record and the request's UTC day.
#[derive(Debug, Clone)]
pub struct ConsumeQuotaCommand {
    pub record: ApiKeyRecord,
    pub today: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaOutcome {
    pub decision: QuotaDecision,
    pub limit: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaError {
    /// The key disappeared (revoked or regenerated) while being evaluated.
    NotFound,
    /// Every compare-and-set attempt lost to a concurrent writer.
    Contended,
    Storage(String),
}

impl ConsumeQuotaUseCase {
    /// Decide admit/reject and persist the resulting counters.
    pub async fn execute(
        ctx: &AppContext,
        cmd: ConsumeQuotaCommand,
    ) -> Result<QuotaOutcome, QuotaError> {
        let repo = &ctx.repos.api_key;
        let mut current = cmd.record;

        for attempt in 1..=ctx.quota_update_attempts {
            // Step 1: Decide against the counters as last read.
            let decision = ctx.quota.evaluate(&current, cmd.today);
            let next = decision.record().usage();

            // Step 2: A same-day reject leaves the record untouched; skip the write.
            if next == current.usage() {
                return Ok(Self::outcome(ctx, decision, cmd.today));
            }

            // Step 3: Persist only if nobody else changed the counters meanwhile.
            let stored = repo
                .compare_and_set_usage(&current, next)
                .await
                .map_err(|e| QuotaError::Storage(format!("{e:?}")))?;
            if let Some(stored) = stored {
                let decision = match decision {
                    QuotaDecision::Admit { .. } => QuotaDecision::Admit { record: stored },
                    QuotaDecision::Reject { .. } => QuotaDecision::Reject { record: stored },
                };
                return Ok(Self::outcome(ctx, decision, cmd.today));
            }

            // Step 4: Lost the race; reload and decide again.
            debug!(
                key_prefix = %current.key_prefix,
                attempt,
                "quota counter changed concurrently"
            );
            current = repo
                .get(&current.key_hash)
                .await
                .map_err(|e| QuotaError::Storage(format!("{e:?}")))?
                .ok_or(QuotaError::NotFound)?;
        }

        Err(QuotaError::Contended)
    }

    fn outcome(ctx: &AppContext, decision: QuotaDecision, today: Date) -> QuotaOutcome {
        let label = if decision.is_admitted() {
            "admit"
        } else {
            "reject"
        };
        counter!("quota_decisions_total", "outcome" => label).increment(1);
        QuotaOutcome {
            remaining: ctx.quota.remaining(decision.record(), today),
            limit: ctx.quota.daily_limit(),
            decision,
        }
    }
}
