#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gating and bookkeeping around the external kill claim.
//!
//! The ledger itself is an external collaborator reached through
//! [`ClaimSubmitter`]. This crate decides whether a claim may start, remembers
//! the amount read when it started, and settles the pending queue only when
//! the ledger confirms.

mod ledger;
mod wallet;

pub use ledger::OfflineLedger;
pub use wallet::{FixedNetwork, WalletPreference};

use coin_shooter_core::{ClaimReceipt, Event, StatField, Timestamp, MIN_KILLS_FOR_CLAIM};
use coin_shooter_storage::KeyValueStore;
use coin_shooter_system_kill_queue::KillQueue;
use coin_shooter_system_stats::StatsStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chain the reward contract lives on.
pub const DEFAULT_CHAIN_ID: u64 = 5_042_002;
/// Address of the reward contract.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x3B65d74cdB9626D8A793438acA2C88698AAdfBf3";
/// Public RPC endpoint of the chain.
pub const DEFAULT_RPC_URL: &str = "https://rpc.testnet.arc.network";
/// Prefix of transaction links in the block explorer.
pub const DEFAULT_EXPLORER_URL: &str = "https://testnet.arcscan.app/tx/";

/// Reasons a claim was refused or failed. `Display` is the player-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// Another claim has not completed yet.
    #[error("a claim is already in progress")]
    InFlight,
    /// The pending queue is empty.
    #[error("no kills to claim")]
    NothingToClaim,
    /// The pending queue is below the claim minimum.
    #[error("at least {required} kills are needed to claim ({pending} pending)")]
    BelowMinimum {
        /// Kills waiting to be claimed.
        pending: u64,
        /// Minimum accepted by the contract.
        required: u64,
    },
    /// The external wallet is connected to another chain.
    #[error("switch your wallet to chain {expected} before claiming")]
    WrongNetwork {
        /// Chain the contract lives on.
        expected: u64,
    },
    /// The contract's daily cap was already reached.
    #[error("the daily cap was already claimed, try again tomorrow")]
    DailyCapReached,
    /// Gas estimation rejected the call.
    #[error("gas estimation failed: {0}")]
    Estimation(String),
    /// The transaction was mined but reverted.
    #[error("transaction reverted by the contract")]
    Reverted,
    /// The ledger could not be reached.
    #[error("network error: {0}")]
    Network(String),
    /// The ticket does not belong to the claim in progress.
    #[error("claim ticket {0} is not in progress")]
    UnknownTicket(u64),
}

impl ClaimError {
    /// Classifies a gas estimation failure message.
    #[must_use]
    pub fn from_estimation_failure(message: &str) -> Self {
        if message.contains("Daily cap") || message.contains("cap already") {
            Self::DailyCapReached
        } else {
            Self::Estimation(message.to_owned())
        }
    }
}

/// Static description of the reward contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimConfig {
    /// Chain the contract lives on.
    pub chain_id: u64,
    /// Address of the contract.
    pub contract_address: String,
    /// RPC endpoint.
    pub rpc_url: String,
    /// Prefix of transaction links.
    pub explorer_url: String,
    /// Minimum kills per claim.
    pub min_kills: u64,
}

impl ClaimConfig {
    /// Explorer link for `transaction`.
    #[must_use]
    pub fn transaction_url(&self, transaction: &str) -> String {
        format!("{}{transaction}", self.explorer_url)
    }
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_owned(),
            rpc_url: DEFAULT_RPC_URL.to_owned(),
            explorer_url: DEFAULT_EXPLORER_URL.to_owned(),
            min_kills: MIN_KILLS_FOR_CLAIM,
        }
    }
}

/// Submits an already computed kill count to the remote ledger.
pub trait ClaimSubmitter {
    /// Converts `kills` into a reward, returning the ledger's receipt.
    fn submit(&mut self, kills: u64) -> Result<ClaimReceipt, ClaimError>;
}

/// Reports whether the connected external signer uses the expected chain.
pub trait NetworkValidator {
    /// Returns `true` when the signer is connected to `chain_id`.
    fn is_expected_network(&self, chain_id: u64) -> bool;
}

/// Proof that a claim started, carrying the amount read at that instant.
#[derive(Debug, PartialEq, Eq)]
pub struct ClaimTicket {
    id: u64,
    kills: u64,
}

impl ClaimTicket {
    /// Kills covered by the claim.
    #[must_use]
    pub const fn kills(&self) -> u64 {
        self.kills
    }

    /// Sequence number of the claim.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// Allows at most one claim in flight and settles the queue on confirmation.
#[derive(Debug, Default)]
pub struct ClaimCoordinator {
    config: ClaimConfig,
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl ClaimCoordinator {
    /// Creates a coordinator for the provided contract.
    #[must_use]
    pub fn new(config: ClaimConfig) -> Self {
        Self {
            config,
            in_flight: None,
            next_ticket: 0,
        }
    }

    /// Contract the coordinator claims against.
    #[must_use]
    pub fn config(&self) -> &ClaimConfig {
        &self.config
    }

    /// Reports whether a claim awaits completion.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Reports whether `queue` holds enough kills for the configured contract.
    #[must_use]
    pub fn can_claim(&self, queue: &KillQueue) -> bool {
        queue.meets_minimum(self.config.min_kills)
    }

    /// Starts a claim for every kill currently pending.
    ///
    /// The network is only checked for external wallets; the local wallet is
    /// always bound to the configured chain.
    pub fn begin(
        &mut self,
        queue: &KillQueue,
        preference: WalletPreference,
        validator: &dyn NetworkValidator,
    ) -> Result<ClaimTicket, ClaimError> {
        if self.in_flight.is_some() {
            return Err(ClaimError::InFlight);
        }
        let pending = queue.pending_kills();
        if pending == 0 {
            return Err(ClaimError::NothingToClaim);
        }
        if !self.can_claim(queue) {
            return Err(ClaimError::BelowMinimum {
                pending,
                required: self.config.min_kills,
            });
        }
        if preference == WalletPreference::External
            && !validator.is_expected_network(self.config.chain_id)
        {
            return Err(ClaimError::WrongNetwork {
                expected: self.config.chain_id,
            });
        }

        let id = self.next_ticket;
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.in_flight = Some(id);
        log::info!("claim {id} started for {pending} kills");
        Ok(ClaimTicket { id, kills: pending })
    }

    /// Records the ledger's answer for `ticket`.
    ///
    /// A confirmed claim removes exactly the ticket's kills from the queue and
    /// counts the claim. Any failure leaves the queue untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn complete(
        &mut self,
        ticket: ClaimTicket,
        outcome: Result<ClaimReceipt, ClaimError>,
        queue: &mut KillQueue,
        stats: &mut StatsStore,
        store: &mut dyn KeyValueStore,
        now: Timestamp,
        out: &mut Vec<Event>,
    ) -> Result<ClaimReceipt, ClaimError> {
        if self.in_flight != Some(ticket.id) {
            return Err(ClaimError::UnknownTicket(ticket.id));
        }
        self.in_flight = None;

        match outcome {
            Ok(receipt) => {
                let pending = queue.settle(ticket.kills, now, store);
                let _ = stats.increment(StatField::TotalClaims, 1, store);
                log::info!(
                    "claim {} confirmed in block {} ({})",
                    ticket.id,
                    receipt.block_number,
                    self.config.transaction_url(&receipt.transaction)
                );
                out.push(Event::PendingKillsChanged { pending });
                out.push(Event::ClaimSucceeded {
                    receipt: receipt.clone(),
                });
                Ok(receipt)
            }
            Err(error) => {
                log::warn!("claim {} failed: {error}", ticket.id);
                out.push(Event::ClaimFailed {
                    reason: error.to_string(),
                });
                Err(error)
            }
        }
    }
}
