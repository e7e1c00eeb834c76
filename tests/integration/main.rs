//! End-to-end tests: config-driven activation through the host registry,
//! reconciliation against a recording provider, and world-group swaps.


use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use economy_sync::config::AppConfig;
use economy_sync::economy::registry::HostServices;
use economy_sync::economy::{EconomyProvider, EconomyService};
use economy_sync::swap;
use economy_sync::types::{Activation, BalanceChange, PlayerId, PlayerProfile};

use recording_provider::RecordingEconomy;

const ENABLED: &str = r#"
[economy]
sync_enabled = true
companion_plugin = "Vault"
"#;

const DISABLED: &str = r#"
[economy]
sync_enabled = false
"#;

/// Build a service from TOML with the recording provider registered and
/// the companion plugin loaded.
fn boot(toml: &str) -> (EconomyService, Arc<RecordingEconomy>, Arc<HostServices>) {
    let cfg = AppConfig::from_toml(toml).unwrap();
    let economy = Arc::new(RecordingEconomy::new());

    let mut services = HostServices::new();
    if let Some(companion) = &cfg.economy.companion_plugin {
        services = services.require_companion(companion.clone());
        services.register_plugin(companion.clone());
    }
    services.register_provider(economy.clone());
    let services = Arc::new(services);

    let mut service = EconomyService::new(Arc::new(cfg.economy), services.clone());
    service.activate();
    (service, economy, services)
}

#[test]
fn disabled_config_never_touches_registry_or_provider() {
    let (service, economy, services) = boot(DISABLED);
    let player = PlayerId::random();

    assert!(!service.is_active());
    assert_eq!(services.lookups(), 0);

    assert_eq!(service.withdraw(player), BalanceChange::Skipped);
    assert_eq!(service.reconcile_balance(player, dec!(10)).unwrap(), BalanceChange::Skipped);
    assert_eq!(service.current_balance(player), None);
    assert_eq!(economy.calls(), (0, 0, 0));
}

#[test]
fn enabled_config_hooks_provider_with_single_lookup() {
    let (mut service, _economy, services) = boot(ENABLED);

    assert!(service.is_active());
    assert_eq!(services.lookups(), 1);

    let again = service.activate();
    assert_eq!(again, Activation::AlreadyActive { provider: "Recording".into() });
    assert_eq!(services.lookups(), 1);
}

#[test]
fn missing_companion_plugin_leaves_service_inactive() {
    let cfg = AppConfig::from_toml(ENABLED).unwrap();
    let services = HostServices::new().require_companion("Vault");
    services.register_provider(Arc::new(RecordingEconomy::new()));

    let mut service = EconomyService::new(Arc::new(cfg.economy), Arc::new(services));

    assert_eq!(service.activate(), Activation::ProviderUnavailable);
    assert!(!service.is_active());
}

#[test]
fn withdraw_empties_balance_with_one_call() {
    let (service, economy, _) = boot(ENABLED);
    let player = PlayerId::random();
    economy.seed(player, dec!(320.0));

    let change = service.withdraw(player);

    assert!(change.succeeded());
    assert_eq!(economy.balance(player), Decimal::ZERO);
    // one read from the service, one from the assertion above
    assert_eq!(economy.calls(), (2, 0, 1));
    assert_eq!(economy.amounts(), vec![dec!(320.0)]);
}

#[test]
fn reconcile_up_deposits_exact_delta() {
    let (service, economy, _) = boot(ENABLED);
    let player = PlayerId::random();
    economy.seed(player, dec!(2.81));

    let change = service.reconcile_balance(player, dec!(1332.49)).unwrap();

    assert!(matches!(change, BalanceChange::Deposited(_)));
    assert_eq!(change.resulting_balance(), Some(dec!(1332.49)));
    assert_eq!(economy.calls(), (1, 1, 0));
    assert_eq!(economy.amounts(), vec![dec!(1329.68)]);
}

#[test]
fn reconcile_down_withdraws_exact_delta() {
    let (service, economy, _) = boot(ENABLED);
    let player = PlayerId::random();
    economy.seed(player, dec!(1332.49));

    let change = service.reconcile_balance(player, dec!(2.81)).unwrap();

    assert!(matches!(change, BalanceChange::Withdrew(_)));
    assert_eq!(change.resulting_balance(), Some(dec!(2.81)));
    assert_eq!(economy.calls(), (1, 0, 1));
    assert_eq!(economy.amounts(), vec![dec!(1329.68)]);
}

#[test]
fn reconcile_equal_balance_is_silent() {
    let (service, economy, _) = boot(ENABLED);
    let player = PlayerId::random();
    economy.seed(player, dec!(1332.49));

    let change = service.reconcile_balance(player, dec!(1332.49)).unwrap();

    assert_eq!(change, BalanceChange::Unchanged { balance: dec!(1332.49) });
    assert_eq!(economy.calls(), (1, 0, 0));
    assert!(economy.amounts().is_empty());
}

#[test]
fn provider_failure_is_reported_and_balance_untouched() {
    let (service, economy, _) = boot(ENABLED);
    let player = PlayerId::random();
    economy.seed(player, dec!(100));
    economy.set_error("Account frozen");

    let change = service.reconcile_balance(player, dec!(40)).unwrap();

    assert!(!change.succeeded());
    assert_eq!(change.response().map(|r| r.message.clone()), Some("Account frozen".to_string()));
    assert_eq!(change.resulting_balance(), Some(dec!(100)));
    // no retry
    assert_eq!(economy.calls(), (1, 0, 1));
}

#[test]
fn world_swap_round_trip_restores_original_balance() {
    let (service, economy, _) = boot(ENABLED);
    let player = PlayerId::random();
    economy.seed(player, dec!(320));

    let mut survival = PlayerProfile::new(player, "survival", Decimal::ZERO);
    let mut creative = PlayerProfile::new(player, "creative", dec!(5));

    let there = swap::switch(&service, player, &mut survival, &creative).unwrap();
    assert!(there.succeeded());
    assert_eq!(survival.balance, dec!(320));
    assert_eq!(economy.balance(player), dec!(5));

    economy.seed(player, dec!(7.5));
    let back = swap::switch(&service, player, &mut creative, &survival).unwrap();
    assert!(back.succeeded());
    assert_eq!(creative.balance, dec!(7.5));
    assert_eq!(economy.balance(player), dec!(320));
}
