use std::collections::BTreeMap;

use coin_shooter_core::ClaimReceipt;
use serde::{Deserialize, Serialize};

use crate::{ClaimError, ClaimSubmitter};

const CLAIM_GAS: u64 = 46_000;
const GAS_PER_KILL: u64 = 120;

/// In-process stand-in for the reward contract.
///
/// Claimed kills accumulate per player. An optional daily cap limits how many
/// kills may be claimed per day across all players.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineLedger {
    player: String,
    balances: BTreeMap<String, u64>,
    daily_cap: Option<u64>,
    day: u64,
    claimed_today: u64,
    block_number: u64,
}

impl OfflineLedger {
    /// Creates a ledger submitting on behalf of `player`.
    #[must_use]
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            ..Self::default()
        }
    }

    /// Limits the kills claimable per day.
    #[must_use]
    pub fn with_daily_cap(mut self, cap: u64) -> Self {
        self.daily_cap = Some(cap);
        self
    }

    /// Player future claims are credited to.
    #[must_use]
    pub fn player(&self) -> &str {
        &self.player
    }

    /// Switches the player future claims are credited to.
    pub fn set_player(&mut self, player: impl Into<String>) {
        self.player = player.into();
    }

    /// Moves the ledger to `day`, resetting the daily allowance when the day changed.
    pub fn begin_day(&mut self, day: u64) {
        if day != self.day {
            self.day = day;
            self.claimed_today = 0;
        }
    }

    /// Kills credited to `player` so far.
    #[must_use]
    pub fn player_kills(&self, player: &str) -> u64 {
        self.balances.get(player).copied().unwrap_or(0)
    }

    /// Number of confirmed claims.
    #[must_use]
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    fn estimate(&self, kills: u64) -> Result<u64, ClaimError> {
        if kills == 0 {
            return Err(ClaimError::from_estimation_failure(
                "execution reverted: count must be positive",
            ));
        }
        if let Some(cap) = self.daily_cap {
            if self.claimed_today.saturating_add(kills) > cap {
                return Err(ClaimError::from_estimation_failure(
                    "execution reverted: Daily cap exceeded",
                ));
            }
        }
        Ok(CLAIM_GAS.saturating_add(kills.saturating_mul(GAS_PER_KILL)))
    }
}

impl ClaimSubmitter for OfflineLedger {
    fn submit(&mut self, kills: u64) -> Result<ClaimReceipt, ClaimError> {
        let gas_used = self.estimate(kills)?;

        let balance = self.balances.entry(self.player.clone()).or_insert(0);
        *balance = balance.saturating_add(kills);
        self.claimed_today = self.claimed_today.saturating_add(kills);
        self.block_number = self.block_number.saturating_add(1);

        Ok(ClaimReceipt {
            transaction: format!("0x{:016x}{:016x}", self.day, self.block_number),
            gas_used,
            block_number: self.block_number,
            kills,
        })
    }
}
