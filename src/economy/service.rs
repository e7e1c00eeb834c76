//! Reconciliation service.
//!
//! Hooks into the registered economy provider at startup (when enabled in
//! settings) and moves a player's provider balance to whatever the loaded
//! profile says it should be. The provider only offers deposit and withdraw,
//! so reconciliation works on the signed delta between target and current.

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{EconomyProvider, ServiceRegistry, SettingsProvider};
use crate::types::{Activation, BalanceChange, EconomyError, PlayerId, TransactionResponse};

// ---------------------------------------------------------------------------
// EconomyService
// ---------------------------------------------------------------------------

pub struct EconomyService {
    settings: Arc<dyn SettingsProvider>,
    registry: Arc<dyn ServiceRegistry>,
    /// Set at most once, by `activate`. Never reassigned afterwards.
    economy: Option<Arc<dyn EconomyProvider>>,
}

impl EconomyService {
    pub fn new(settings: Arc<dyn SettingsProvider>, registry: Arc<dyn ServiceRegistry>) -> Self {
        Self {
            settings,
            registry,
            economy: None,
        }
    }

    /// Try to hook into an economy provider.
    ///
    /// Settings are read first; when synchronisation is disabled the registry
    /// is never consulted. A missing provider leaves the service inactive and
    /// is not an error. Calling this on an active service changes nothing.
    pub fn activate(&mut self) -> Activation {
        if let Some(economy) = &self.economy {
            let provider = economy.name();
            debug!(provider = %provider, "Economy already hooked, skipping lookup");
            return Activation::AlreadyActive { provider };
        }

        if !self.settings.economy_sync_enabled() {
            debug!("Economy sync disabled in settings");
            return Activation::Disabled;
        }

        match self.registry.lookup_provider() {
            Some(economy) => {
                let provider = economy.name();
                info!(provider = %provider, "Hooked into economy provider");
                self.economy = Some(economy);
                Activation::Hooked { provider }
            }
            None => {
                warn!("Economy sync is enabled but no economy provider is registered");
                Activation::ProviderUnavailable
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.economy.is_some()
    }

    /// The cached provider, if activation found one.
    pub fn provider(&self) -> Option<&Arc<dyn EconomyProvider>> {
        self.economy.as_ref()
    }

    /// Current provider balance, or `None` when inactive.
    pub fn current_balance(&self, player: PlayerId) -> Option<Decimal> {
        self.economy.as_ref().map(|economy| economy.balance(player))
    }

    /// Withdraw a player's entire balance.
    ///
    /// One balance read, then at most one withdraw of exactly that amount.
    /// A non-positive balance issues no withdraw.
    pub fn withdraw(&self, player: PlayerId) -> BalanceChange {
        let Some(economy) = self.economy.as_ref() else {
            debug!(%player, "Economy inactive, not withdrawing");
            return BalanceChange::Skipped;
        };

        let balance = economy.balance(player);
        if balance <= Decimal::ZERO {
            debug!(%player, %balance, "Nothing to withdraw");
            return BalanceChange::Unchanged { balance };
        }

        let response = economy.withdraw(player, balance);
        log_response("withdraw", player, &response);
        BalanceChange::Withdrew(response)
    }

    /// Move the provider balance to `target` using the smallest single
    /// transaction: a deposit when short, a withdraw when over, nothing when
    /// already equal.
    pub fn reconcile_balance(
        &self,
        player: PlayerId,
        target: Decimal,
    ) -> Result<BalanceChange, EconomyError> {
        let Some(economy) = self.economy.as_ref() else {
            debug!(%player, "Economy inactive, not reconciling");
            return Ok(BalanceChange::Skipped);
        };

        if target < Decimal::ZERO {
            return Err(EconomyError::NegativeTarget(target));
        }

        let current = economy.balance(player);
        let Some(delta) = target.checked_sub(current) else {
            warn!(%player, %target, %current, "Balance delta out of range, not reconciling");
            return Err(EconomyError::DeltaOverflow { target, current });
        };

        let change = match delta.cmp(&Decimal::ZERO) {
            Ordering::Greater => {
                let response = economy.deposit(player, delta);
                log_response("deposit", player, &response);
                BalanceChange::Deposited(response)
            }
            Ordering::Less => {
                let response = economy.withdraw(player, -delta);
                log_response("withdraw", player, &response);
                BalanceChange::Withdrew(response)
            }
            Ordering::Equal => {
                debug!(%player, balance = %current, "Balance already in sync");
                BalanceChange::Unchanged { balance: current }
            }
        };

        Ok(change)
    }
}

fn log_response(operation: &str, player: PlayerId, response: &TransactionResponse) {
    if response.transaction_succeeded() {
        debug!(
            %player,
            operation,
            amount = %response.amount,
            balance = %response.balance,
            "Economy transaction applied"
        );
    } else {
        warn!(
            %player,
            operation,
            amount = %response.amount,
            balance = %response.balance,
            kind = %response.kind,
            message = %response.message,
            "Economy transaction failed, balance may be out of sync"
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
