use std::time::Duration;

use deploy_vanity::{
    Address, LegacyNonce, Limits, Prefix, SearchError, SearchMode, SearchTask, Searcher,
    StopReason,
};

fn create2_task(prefix: &str, iterations: u64) -> SearchTask {
    SearchTask {
        mode: SearchMode::Create2 {
            deployer: "0x4e59b44847b379578588920cA78FbF26c0B4956C".parse().unwrap(),
            init_code_hash: [0x3b; 32],
        },
        prefix: Prefix::parse(prefix).unwrap(),
        iterations,
    }
}

#[test]
fn test_empty_prefix_finishes_in_one_round() {
    let searcher = Searcher::new(create2_task("0x", 50_000), 3).unwrap();
    let found = searcher.run(|_| panic!("no progress before the match")).unwrap();

    assert_eq!(found.stats.rounds, 1);
    assert_eq!(found.stats.iterations, 150_000);
}

#[test]
fn test_create_mode_empty_prefix() {
    let task = SearchTask {
        mode: SearchMode::Create {
            nonce: LegacyNonce::ZERO,
        },
        prefix: Prefix::parse("").unwrap(),
        iterations: 10,
    };
    let found = Searcher::new(task, 2).unwrap().run(|_| {}).unwrap();
    assert_eq!(found.stats.rounds, 1);
    assert!(found.result.sender.is_some());
}

#[test]
fn test_found_contract_has_prefix() {
    let searcher = Searcher::new(create2_task("0xA", 100_000), 2).unwrap();
    let found = searcher.run(|_| {}).unwrap();
    assert!(found.result.contract.to_checksum().starts_with("0xA"));
}

#[test]
fn test_iteration_accounting_at_every_report() {
    let per_worker = 100;
    let workers = 3;
    let rounds = 4;

    let mut reports = Vec::new();
    let result = Searcher::new(create2_task(&"f".repeat(40), per_worker), workers)
        .unwrap()
        .with_report_interval(Duration::ZERO)
        .with_limits(Limits {
            max_time: None,
            max_attempts: Some(rounds * per_worker * workers as u64),
        })
        .run(|stats| reports.push(*stats));

    match result {
        Err(SearchError::Stopped { reason, stats }) => {
            assert_eq!(reason, StopReason::AttemptLimit);
            assert_eq!(stats.rounds, rounds);
            assert_eq!(stats.iterations, rounds * per_worker * workers as u64);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(reports.len(), rounds as usize);
    for (i, stats) in reports.iter().enumerate() {
        assert_eq!(stats.rounds, i as u64 + 1);
        assert_eq!(stats.iterations, stats.rounds * per_worker * workers as u64);
    }
}

#[test]
fn test_progress_is_throttled() {
    let mut calls = 0;
    let result = Searcher::new(create2_task(&"f".repeat(40), 10), 1)
        .unwrap()
        .with_report_interval(Duration::from_secs(3600))
        .with_limits(Limits {
            max_time: None,
            max_attempts: Some(50),
        })
        .run(|_| calls += 1);

    assert!(matches!(result, Err(SearchError::Stopped { .. })));
    assert_eq!(calls, 0);
}

#[test]
fn test_zero_workers_is_an_error() {
    assert!(Searcher::new(create2_task("0x", 1), 0).is_err());
}

#[test]
fn test_result_address_is_checksummed_on_display() {
    let found = Searcher::new(create2_task("0x", 1), 1).unwrap().run(|_| {}).unwrap();
    let shown = found.result.contract.to_string();
    let parsed: Address = shown.parse().unwrap();
    assert_eq!(parsed, found.result.contract);
    assert_eq!(shown, found.result.contract.to_checksum());
}
