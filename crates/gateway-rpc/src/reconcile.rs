//! # Reconciliation Policies
//!
//! Pure reduction functions that collapse N replica answers into one
//! answer. Three distinct policies over the same fan-out shape:
//!
//! - **worst of N**: lowest block height wins (conservative chain view);
//! - **first success of N**: node-local data, availability only;
//! - **merge with override**: per-transaction verdict agreement, with
//!   disagreement forced to an invalid entry reading `"Mixed results"`.
//!
//! Disagreement among honest-but-unsynchronized replicas is an expected
//! outcome, so these functions return values, never errors.

use crate::responses::{RpcBlockchainInfo, RpcRawTransaction, RpcSendTransactions};
use serde::{Deserialize, Serialize};
use std::mem::discriminant;

/// Reject reason reported when replicas disagree on a transaction verdict.
pub const MIXED_RESULTS: &str = "Mixed results";

/// One invalid transaction in a merged broadcast result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidTx {
    /// The rejected transaction id.
    pub txid: String,
    /// Agreed rejection reason, or [`MIXED_RESULTS`].
    pub reject_reason: Option<String>,
    /// Agreed rejection code; always `None` for mixed results.
    pub reject_code: Option<i32>,
}

/// Merged outcome of broadcasting a batch to every replica.
///
/// Mirrors the per-replica wire shape: a transaction id appears in at most
/// one list, and absence from all lists means the transaction was accepted
/// everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendReconciliation {
    /// Transactions every responding replica already knew.
    pub known: Vec<String>,
    /// Transactions every responding replica had evicted.
    pub evicted: Vec<String>,
    /// Transactions rejected (by agreement, or by disagreement as
    /// [`MIXED_RESULTS`]).
    pub invalid: Vec<InvalidTx>,
    /// Transactions accepted everywhere but with unconfirmed ancestors.
    pub unconfirmed: Vec<String>,
}

impl SendReconciliation {
    /// True when every submitted transaction was accepted everywhere.
    #[must_use]
    pub fn all_accepted(&self) -> bool {
        self.known.is_empty()
            && self.evicted.is_empty()
            && self.invalid.is_empty()
            && self.unconfirmed.is_empty()
    }
}

/// Outcome of querying a raw transaction across replicas.
///
/// `transaction` is populated only when every responding replica reported
/// the same containing block; `(None, false)` means "status currently
/// indeterminate, retry later" and must not be treated as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTxQueryResult {
    /// The transaction, when all responding replicas agree.
    pub transaction: Option<RpcRawTransaction>,
    /// Whether all responding replicas agreed.
    pub all_replicas_agree: bool,
}

/// Select the least-advanced chain view: the response with the lowest
/// reported height, first one winning ties. Any fact true of the
/// worst-informed replica is true network-wide.
#[must_use]
pub fn worst_chain_info(responses: &[RpcBlockchainInfo]) -> Option<RpcBlockchainInfo> {
    let mut worst: Option<&RpcBlockchainInfo> = None;
    for response in responses {
        match worst {
            Some(current) if response.blocks >= current.blocks => {}
            _ => worst = Some(response),
        }
    }
    worst.cloned()
}

/// Per-replica verdict on one submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verdict {
    Accepted,
    Known,
    Evicted,
    Invalid {
        reason: Option<String>,
        code: Option<i32>,
    },
    Unconfirmed,
}

fn classify(txid: &str, response: &RpcSendTransactions) -> Verdict {
    if let Some(entry) = response.invalid.iter().find(|i| i.txid == txid) {
        return Verdict::Invalid {
            reason: entry.reject_reason.clone(),
            code: entry.reject_code,
        };
    }
    if response.evicted.iter().any(|t| t == txid) {
        return Verdict::Evicted;
    }
    if response.known.iter().any(|t| t == txid) {
        return Verdict::Known;
    }
    if response.unconfirmed.iter().any(|u| u.txid == txid) {
        return Verdict::Unconfirmed;
    }
    Verdict::Accepted
}

fn mixed(txid: &str) -> InvalidTx {
    InvalidTx {
        txid: txid.to_string(),
        reject_reason: Some(MIXED_RESULTS.to_string()),
        reject_code: None,
    }
}

/// Merge the per-replica broadcast responses into one verdict per
/// transaction id.
///
/// A responding replica that does not list a transaction is taken to have
/// accepted it. Replicas agreeing on the verdict kind propagate that
/// verdict; for invalid verdicts the most detailed agreeing reason/code
/// survives, while two conflicting detailed entries - or any disagreement
/// in kind - collapse to an invalid entry reading [`MIXED_RESULTS`] with
/// the individual reasons discarded.
#[must_use]
pub fn merge_send_results<'a, I>(txids: I, responses: &[RpcSendTransactions]) -> SendReconciliation
where
    I: IntoIterator<Item = &'a str>,
{
    let mut merged = SendReconciliation::default();

    for txid in txids {
        let verdicts: Vec<Verdict> = responses.iter().map(|r| classify(txid, r)).collect();
        let Some(first) = verdicts.first() else {
            continue;
        };

        if verdicts
            .iter()
            .any(|v| discriminant(v) != discriminant(first))
        {
            merged.invalid.push(mixed(txid));
            continue;
        }

        match first {
            Verdict::Accepted => {}
            Verdict::Known => merged.known.push(txid.to_string()),
            Verdict::Evicted => merged.evicted.push(txid.to_string()),
            Verdict::Unconfirmed => merged.unconfirmed.push(txid.to_string()),
            Verdict::Invalid { .. } => {
                // An entry without reason/code carries no opinion; two
                // different detailed entries are a disagreement.
                let mut detailed: Option<(Option<String>, Option<i32>)> = None;
                let mut conflicting = false;
                for verdict in &verdicts {
                    // Kind agreement was checked above
                    let Verdict::Invalid { reason, code } = verdict else {
                        continue;
                    };
                    if reason.is_none() && code.is_none() {
                        continue;
                    }
                    match &detailed {
                        None => detailed = Some((reason.clone(), *code)),
                        Some((r, c)) if r == reason && c == code => {}
                        Some(_) => {
                            conflicting = true;
                            break;
                        }
                    }
                }

                if conflicting {
                    merged.invalid.push(mixed(txid));
                } else {
                    let (reason, code) = detailed.unwrap_or((None, None));
                    merged.invalid.push(InvalidTx {
                        txid: txid.to_string(),
                        reject_reason: reason,
                        reject_code: code,
                    });
                }
            }
        }
    }

    merged
}

/// Check agreement of raw-transaction responses on the containing block.
///
/// `None` block hashes (unconfirmed) are comparable values: all replicas
/// reporting "unconfirmed" is agreement.
#[must_use]
pub fn reconcile_raw_transactions(responses: Vec<RpcRawTransaction>) -> RawTxQueryResult {
    let Some(first) = responses.first() else {
        return RawTxQueryResult {
            transaction: None,
            all_replicas_agree: false,
        };
    };

    if responses.iter().any(|r| r.blockhash != first.blockhash) {
        return RawTxQueryResult {
            transaction: None,
            all_replicas_agree: false,
        };
    }

    RawTxQueryResult {
        transaction: Some(first.clone()),
        all_replicas_agree: true,
    }
}
