//! Profile swap workflow.
//!
//! What the host does when a player crosses into a different world group:
//! the outgoing profile captures the live provider balance, the balance is
//! emptied, then the incoming profile's balance is applied. Failures are
//! logged and reported; nothing here aborts the swap or persists profiles.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::economy::EconomyService;
use crate::types::{BalanceChange, EconomyError, PlayerId, PlayerProfile};

/// Both halves of a swap.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapReport {
    pub stashed: BalanceChange,
    pub restored: BalanceChange,
}

impl SwapReport {
    pub fn succeeded(&self) -> bool {
        self.stashed.succeeded() && self.restored.succeeded()
    }
}

/// Snapshot the provider balance into `outgoing`, then withdraw it all.
///
/// When the service is inactive the profile keeps whatever it had.
pub fn stash(service: &EconomyService, player: PlayerId, outgoing: &mut PlayerProfile) -> BalanceChange {
    if let Some(balance) = service.current_balance(player) {
        outgoing.balance = balance;
    }

    let change = service.withdraw(player);
    if !change.succeeded() {
        warn!(%player, group = %outgoing.group, %change, "Could not empty balance when leaving group");
    }
    change
}

/// Apply the incoming profile's balance.
pub fn restore(
    service: &EconomyService,
    player: PlayerId,
    incoming: &PlayerProfile,
) -> Result<BalanceChange, EconomyError> {
    let change = service.reconcile_balance(player, incoming.balance)?;
    if !change.succeeded() {
        warn!(
            %player,
            group = %incoming.group,
            target = %incoming.balance,
            %change,
            "Balance left out of sync with profile"
        );
    }
    Ok(change)
}

/// Stash into `outgoing`, then restore from `incoming`.
///
/// An invalid incoming balance is rejected before anything is withdrawn.
pub fn switch(
    service: &EconomyService,
    player: PlayerId,
    outgoing: &mut PlayerProfile,
    incoming: &PlayerProfile,
) -> Result<SwapReport, EconomyError> {
    if service.is_active() && incoming.balance < Decimal::ZERO {
        return Err(EconomyError::NegativeTarget(incoming.balance));
    }

    let stashed = stash(service, player, outgoing);
    let restored = restore(service, player, incoming)?;

    info!(
        %player,
        from = %outgoing.group,
        to = %incoming.group,
        saved = %outgoing.balance,
        applied = %incoming.balance,
        "Swapped economy profile"
    );

    Ok(SwapReport { stashed, restored })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
