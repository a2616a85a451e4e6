//! Generators and simplifiers shared across concurrent checks

use falsify::{CheckConfig, ForAll, check_for_all_with_config, int_simplifier, ints, vecs};

fn draws_with_seed(seed: u64) -> Vec<i64> {
    let mut log = Vec::new();
    check_for_all_with_config(
        ints(i64::MIN, i64::MAX),
        CheckConfig::default().with_iterations(100).with_seed(seed),
        |x: i64| log.push(x),
    )
    .unwrap();
    log
}

#[test]
fn test_concurrent_checks_with_same_seed_agree() {
    let expected = draws_with_seed(2024);

    let logs = crossbeam::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|_| draws_with_seed(2024))).collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    })
    .unwrap();

    for log in logs {
        assert_eq!(log, expected);
    }
}

#[test]
fn test_shared_generator_and_simplifier() {
    let generator = vecs(ints(0i32, 1000), 16);
    let simplifier = vecs(int_simplifier::<i32>(), 16);

    let minimals = crossbeam::scope(|s| {
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let generator = &generator;
                let simplifier = &simplifier;
                s.spawn(move |_| {
                    ForAll::new(generator)
                        .simplifier(simplifier)
                        .seed(seed)
                        .check(|v: Vec<i32>| v.iter().sum::<i32>() < 500)
                        .unwrap_err()
                        .falsification()
                        .map(|falsification| falsification.minimal.clone())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    })
    .unwrap();

    for minimal in minimals {
        let minimal = minimal.unwrap();
        assert_eq!(minimal.iter().sum::<i32>(), 500);
    }
}
