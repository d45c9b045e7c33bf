use agora::core::config::EconomyConfig;
use agora::core::db::initialize_economy_db;
use agora::core::error::AgoraError;
use agora::engine::{gamble, ledger};
use std::path::PathBuf;
use tempfile::tempdir;

fn setup(cfg: &EconomyConfig) -> (tempfile::TempDir, PathBuf) {
    let tmp = tempdir().unwrap();
    let root = tmp.path().to_path_buf();
    initialize_economy_db(&root, cfg).unwrap();
    (tmp, root)
}

#[test]
fn test_settle_win_pays_double() {
    let cfg = EconomyConfig::default();
    let (_tmp, root) = setup(&cfg);
    ledger::credit(&root, 1, 10, "alice", 100, &cfg).unwrap();

    let outcome = gamble::settle(&root, 1, 10, "alice", 40, true, &cfg).unwrap();
    assert!(outcome.won);
    assert_eq!(outcome.payout, 80);
    assert_eq!(outcome.balance, 140);
}

#[test]
fn test_settle_loss_forfeits_wager() {
    let cfg = EconomyConfig::default();
    let (_tmp, root) = setup(&cfg);
    ledger::credit(&root, 1, 10, "alice", 100, &cfg).unwrap();

    let outcome = gamble::settle(&root, 1, 10, "alice", 40, false, &cfg).unwrap();
    assert!(!outcome.won);
    assert_eq!(outcome.payout, 0);
    assert_eq!(outcome.balance, 60);
}

#[test]
fn test_wager_beyond_balance_rejected() {
    let cfg = EconomyConfig::default();
    let (_tmp, root) = setup(&cfg);
    ledger::credit(&root, 1, 10, "alice", 30, &cfg).unwrap();

    let err = gamble::settle(&root, 1, 10, "alice", 40, true, &cfg).unwrap_err();
    assert!(matches!(
        err,
        AgoraError::InsufficientFunds { balance: 30, needed: 40 }
    ));
    assert_eq!(ledger::balance(&root, 1, 10, "alice", &cfg).unwrap(), 30);
}

#[test]
fn test_non_positive_wager_rejected() {
    let cfg = EconomyConfig::default();
    let (_tmp, root) = setup(&cfg);

    assert!(matches!(
        gamble::settle(&root, 1, 10, "", 0, true, &cfg).unwrap_err(),
        AgoraError::InvalidQuantity(0)
    ));
    assert!(matches!(
        gamble::gamble(&root, 1, 10, "", -5, &cfg).unwrap_err(),
        AgoraError::InvalidQuantity(-5)
    ));
}

#[test]
fn test_gamble_moves_balance_by_exactly_the_wager() {
    let cfg = EconomyConfig::default();
    let (_tmp, root) = setup(&cfg);
    ledger::credit(&root, 1, 10, "alice", 100, &cfg).unwrap();

    let outcome = gamble::gamble(&root, 1, 10, "alice", 25, &cfg).unwrap();
    if outcome.won {
        assert_eq!(outcome.balance, 125);
    } else {
        assert_eq!(outcome.balance, 75);
    }
}
