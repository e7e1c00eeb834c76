//! Shared types for economy synchronisation.
//!
//! Player identities, profiles, provider transaction responses and the
//! outcome values returned by the reconciliation service. Kept free of any
//! provider or registry logic so every module can depend on them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Player identity
// ---------------------------------------------------------------------------

/// Opaque player handle. Passed through to the economy provider untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// A fresh random identity. Mostly useful for tests and the demo driver.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PlayerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Player profile
// ---------------------------------------------------------------------------

/// The slice of a per-world player profile this crate cares about.
///
/// Profiles are owned and persisted by the surrounding layer; the
/// reconciliation service only ever reads `balance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player: PlayerId,
    /// World group the profile belongs to.
    pub group: String,
    /// Balance to apply when this profile is loaded.
    pub balance: Decimal,
}

impl PlayerProfile {
    pub fn new(player: PlayerId, group: impl Into<String>, balance: Decimal) -> Self {
        Self {
            player,
            group: group.into(),
            balance,
        }
    }
}

impl fmt::Display for PlayerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} (balance={})", self.player, self.group, self.balance)
    }
}

// ---------------------------------------------------------------------------
// Provider transaction response
// ---------------------------------------------------------------------------

/// How the provider classified a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseKind {
    Success,
    Failure,
    NotImplemented,
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseKind::Success => write!(f, "SUCCESS"),
            ResponseKind::Failure => write!(f, "FAILURE"),
            ResponseKind::NotImplemented => write!(f, "NOT_IMPLEMENTED"),
        }
    }
}

/// Result of a single deposit or withdraw call, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// Amount the transaction was asked to move.
    pub amount: Decimal,
    /// Balance the provider reports after the call.
    pub balance: Decimal,
    pub kind: ResponseKind,
    /// Provider-supplied detail, empty on success for most providers.
    pub message: String,
}

impl TransactionResponse {
    pub fn success(amount: Decimal, balance: Decimal) -> Self {
        Self {
            amount,
            balance,
            kind: ResponseKind::Success,
            message: String::new(),
        }
    }

    pub fn failure(amount: Decimal, balance: Decimal, message: impl Into<String>) -> Self {
        Self {
            amount,
            balance,
            kind: ResponseKind::Failure,
            message: message.into(),
        }
    }

    pub fn transaction_succeeded(&self) -> bool {
        self.kind == ResponseKind::Success
    }
}

impl fmt::Display for TransactionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} amount={} balance={}", self.kind, self.amount, self.balance)?;
        if !self.message.is_empty() {
            write!(f, " ({})", self.message)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Service outcomes
// ---------------------------------------------------------------------------

/// Terminal state reached by [`crate::economy::EconomyService::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Synchronisation is switched off in settings. The registry was not consulted.
    Disabled,
    /// Enabled, but no provider is registered. The service stays inactive.
    ProviderUnavailable,
    /// A provider was found and cached.
    Hooked { provider: String },
    /// The service already held a provider; nothing was queried.
    AlreadyActive { provider: String },
}

impl Activation {
    pub fn is_active(&self) -> bool {
        matches!(self, Activation::Hooked { .. } | Activation::AlreadyActive { .. })
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Disabled => write!(f, "economy sync disabled"),
            Activation::ProviderUnavailable => write!(f, "no economy provider registered"),
            Activation::Hooked { provider } => write!(f, "hooked into {provider}"),
            Activation::AlreadyActive { provider } => write!(f, "already hooked into {provider}"),
        }
    }
}

/// What a withdraw or reconcile call did to the provider balance.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceChange {
    /// Service inactive; the provider was not touched.
    Skipped,
    /// Nothing to move. Carries the balance that was read.
    Unchanged { balance: Decimal },
    Deposited(TransactionResponse),
    Withdrew(TransactionResponse),
}

impl BalanceChange {
    /// False only when the provider reported a failed transaction.
    pub fn succeeded(&self) -> bool {
        self.response()
            .map_or(true, TransactionResponse::transaction_succeeded)
    }

    /// The provider response, if a transaction was issued.
    pub fn response(&self) -> Option<&TransactionResponse> {
        match self {
            BalanceChange::Deposited(r) | BalanceChange::Withdrew(r) => Some(r),
            BalanceChange::Skipped | BalanceChange::Unchanged { .. } => None,
        }
    }

    /// The balance the provider holds after this change, when known.
    pub fn resulting_balance(&self) -> Option<Decimal> {
        match self {
            BalanceChange::Skipped => None,
            BalanceChange::Unchanged { balance } => Some(*balance),
            BalanceChange::Deposited(r) | BalanceChange::Withdrew(r) => Some(r.balance),
        }
    }
}

impl fmt::Display for BalanceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceChange::Skipped => write!(f, "skipped (inactive)"),
            BalanceChange::Unchanged { balance } => write!(f, "unchanged at {balance}"),
            BalanceChange::Deposited(r) => write!(f, "deposit {r}"),
            BalanceChange::Withdrew(r) => write!(f, "withdraw {r}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Inputs the reconciliation service refuses to act on.
///
/// Disabled settings, a missing provider and failed transactions are not
/// errors; they are reported through [`Activation`] and [`BalanceChange`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EconomyError {
    #[error("Target balance must not be negative, got {0}")]
    NegativeTarget(Decimal),

    #[error("Cannot move balance from {current} to {target}: difference out of range")]
    DeltaOverflow { target: Decimal, current: Decimal },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
