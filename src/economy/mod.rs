//! Economy provider integration.
//!
//! Defines the capabilities the reconciliation service consumes and
//! provides implementations for:
//! - `HostServices` — in-process service registry with companion-plugin gating
//! - `InMemoryEconomy` — reference provider backed by a mutex-guarded ledger
//! - `EconomyService` — the reconciliation service itself

pub mod ledger;
pub mod registry;
pub mod service;

pub use service::EconomyService;

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::types::{PlayerId, TransactionResponse};

/// Abstraction over an external economy plugin.
///
/// Only relative operations are available; there is no absolute "set
/// balance". Calls are synchronous and a failed transaction is reported in
/// the returned [`TransactionResponse`], not as an error.
#[cfg_attr(test, mockall::automock)]
pub trait EconomyProvider: Send + Sync {
    /// Provider name for logging and identification.
    fn name(&self) -> String;

    /// Current balance held by the provider for this player.
    fn balance(&self, player: PlayerId) -> Decimal;

    fn deposit(&self, player: PlayerId, amount: Decimal) -> TransactionResponse;

    fn withdraw(&self, player: PlayerId, amount: Decimal) -> TransactionResponse;
}

/// Host facility for discovering a registered economy provider.
#[cfg_attr(test, mockall::automock)]
pub trait ServiceRegistry: Send + Sync {
    fn lookup_provider(&self) -> Option<Arc<dyn EconomyProvider>>;
}

/// Read access to the plugin settings that gate synchronisation.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsProvider: Send + Sync {
    fn economy_sync_enabled(&self) -> bool;
}
