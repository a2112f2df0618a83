use std::{fmt, str::FromStr};

use coin_shooter_storage::{KeyValueStore, WALLET_PREFERENCE_KEY};

use crate::NetworkValidator;

/// Which signer submits claims.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WalletPreference {
    /// Wallet generated and kept by the game.
    #[default]
    Local,
    /// Browser or hardware wallet connected by the player.
    External,
}

impl WalletPreference {
    /// Persisted form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::External => "external",
        }
    }

    /// Reads the stored preference. Missing or unreadable values mean [`WalletPreference::Local`].
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.read(WALLET_PREFERENCE_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                log::warn!("unknown wallet preference \"{raw}\", using local");
                Self::Local
            }),
            Ok(None) => Self::Local,
            Err(error) => {
                log::error!("could not read wallet preference: {error}");
                Self::Local
            }
        }
    }

    /// Stores the preference as a plain string.
    pub fn save(self, store: &mut dyn KeyValueStore) {
        if let Err(error) = store.write(WALLET_PREFERENCE_KEY, self.as_str()) {
            log::error!("could not save wallet preference: {error}");
        }
    }
}

impl fmt::Display for WalletPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletPreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Self::Local),
            "external" => Ok(Self::External),
            other => Err(format!("expected \"local\" or \"external\", got \"{other}\"")),
        }
    }
}

/// Validator for a signer known to sit on a fixed chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedNetwork(pub u64);

impl NetworkValidator for FixedNetwork {
    fn is_expected_network(&self, chain_id: u64) -> bool {
        self.0 == chain_id
    }
}
