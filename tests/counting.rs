use bdd_count::bdd::Bdd;
use bdd_count::config::{CounterConfig, Traversal};
use bdd_count::cube::{build_cube, build_models};
use bdd_count::observation::ObservationSet;
use bdd_count::reference::Ref;
use bdd_count::sat::ModelCounter;
use num_bigint::BigUint;
use quickcheck_macros::quickcheck;
use test_log::test;

const NUM_VARS: u32 = 6;

fn big(n: u64) -> BigUint {
    BigUint::from(n)
}

fn assignments(num_vars: u32) -> impl Iterator<Item = Vec<bool>> {
    let n = num_vars as usize;
    (0..1u64 << n).map(move |bits| (0..n).map(|i| bits >> i & 1 == 1).collect())
}

fn brute_force(bdd: &Bdd, f: Ref, num_vars: u32, observations: &ObservationSet) -> BigUint {
    let count = assignments(num_vars)
        .filter(|a| observations.matches(a) && bdd.eval(f, a))
        .count();
    big(count as u64)
}

/// CNF over the first `NUM_VARS` variables; literals are `(variable, polarity)`.
fn build_cnf(bdd: &Bdd, clauses: &[Vec<(u8, bool)>]) -> Ref {
    bdd.apply_and_many(clauses.iter().take(8).map(|clause| {
        bdd.apply_or_many(clause.iter().take(4).map(|&(v, positive)| {
            let var = bdd.mk_var(u32::from(v) % NUM_VARS);
            if positive {
                var
            } else {
                -var
            }
        }))
    }))
}

fn observations_from_masks(mask: u8, values: u8) -> ObservationSet {
    let pairs = (0..NUM_VARS)
        .filter(|&i| mask >> i & 1 == 1)
        .map(|i| (i, values >> i & 1 == 1));
    ObservationSet::from_pairs(pairs, NUM_VARS).unwrap()
}

#[quickcheck]
fn count_matches_brute_force(clauses: Vec<Vec<(u8, bool)>>) -> bool {
    let bdd = Bdd::default();
    let f = build_cnf(&bdd, &clauses);
    let mut counter = ModelCounter::new(&bdd, NUM_VARS);
    counter.count(f).unwrap() == brute_force(&bdd, f, NUM_VARS, &ObservationSet::empty())
}

#[quickcheck]
fn observed_count_matches_brute_force(
    clauses: Vec<Vec<(u8, bool)>>,
    mask: u8,
    values: u8,
) -> bool {
    let bdd = Bdd::default();
    let f = build_cnf(&bdd, &clauses);
    let observations = observations_from_masks(mask, values);

    let mut counter = ModelCounter::new(&bdd, NUM_VARS);
    counter.count(f).unwrap();
    let expected = brute_force(&bdd, f, NUM_VARS, &observations);
    counter.count_observed(f, &observations).unwrap() == expected
}

#[quickcheck]
fn traversals_agree(clauses: Vec<Vec<(u8, bool)>>, mask: u8, values: u8) -> bool {
    let bdd = Bdd::default();
    let f = build_cnf(&bdd, &clauses);
    let observations = observations_from_masks(mask, values);

    let counts: Vec<(BigUint, BigUint)> = [Traversal::Recursive, Traversal::Iterative]
        .into_iter()
        .map(|traversal| {
            let config = CounterConfig::default().with_traversal(traversal);
            let mut counter = ModelCounter::with_config(&bdd, NUM_VARS, config);
            let total = counter.count(f).unwrap();
            let observed = counter.count_observed(f, &observations).unwrap();
            (total, observed)
        })
        .collect();
    counts[0] == counts[1]
}

#[quickcheck]
fn observations_partition_models(clauses: Vec<Vec<(u8, bool)>>, variable: u8) -> bool {
    let bdd = Bdd::default();
    let f = build_cnf(&bdd, &clauses);
    let v = u32::from(variable) % NUM_VARS;

    let mut counter = ModelCounter::new(&bdd, NUM_VARS);
    let total = counter.count(f).unwrap();
    let pos = ObservationSet::from_pairs([(v, true)], NUM_VARS).unwrap();
    let neg = ObservationSet::from_pairs([(v, false)], NUM_VARS).unwrap();
    counter.count_observed(f, &pos).unwrap() + counter.count_observed(f, &neg).unwrap() == total
}

#[quickcheck]
fn cube_has_exactly_its_assignment(bits: u8) -> bool {
    let bdd = Bdd::default();
    let assignment: Vec<bool> = (0..NUM_VARS).map(|i| bits >> i & 1 == 1).collect();
    let cube = build_cube(&bdd, &assignment);

    let mut counter = ModelCounter::new(&bdd, NUM_VARS);
    counter.count(cube).unwrap() == big(1)
        && assignments(NUM_VARS).all(|a| bdd.eval(cube, &a) == (a == assignment))
}

#[test]
fn test_or_of_and_with_x2() {
    let bdd = Bdd::default();
    let x0 = bdd.mk_var(0);
    let x1 = bdd.mk_var(1);
    let x2 = bdd.mk_var(2);
    let f = bdd.apply_or(bdd.apply_and(x0, x1), x2);

    let mut counter = ModelCounter::new(&bdd, 3);
    assert_eq!(counter.count(f).unwrap(), big(5));

    let obs = ObservationSet::new(vec![2], vec![true], 3).unwrap();
    assert_eq!(counter.count_observed(f, &obs).unwrap(), big(4));

    let obs = ObservationSet::new(vec![0, 1], vec![true, true], 3).unwrap();
    assert_eq!(counter.count_observed(f, &obs).unwrap(), big(2));
}

#[test]
fn test_xor_chain_over_seven_variables() {
    let bdd = Bdd::default();
    let x: Vec<Ref> = (0..7).map(|v| bdd.mk_var(v)).collect();

    let f = bdd.apply_xor(bdd.apply_and(x[1], x[3]), bdd.apply_and(x[1], -x[2]));
    let f = bdd.apply_xor(f, bdd.apply_and(x[2], x[4]));
    let f = bdd.apply_xor(f, x[5]);

    let mut counter = ModelCounter::new(&bdd, 7);
    // XOR with a fresh variable halves the assignments.
    assert_eq!(counter.count(f).unwrap(), big(64));

    let obs = ObservationSet::new(vec![0, 2, 4], vec![true, false, true], 7).unwrap();
    assert_eq!(counter.count_observed(f, &obs).unwrap(), big(8));
    assert_eq!(
        counter.count_observed(f, &obs).unwrap(),
        brute_force(&bdd, f, 7, &obs)
    );

    let obs = ObservationSet::new(vec![4], vec![true], 7).unwrap();
    assert_eq!(counter.count_observed(f, &obs).unwrap(), big(32));
}

#[test]
fn test_two_of_five_models() {
    let models = [
        [false, false, false, true, true],
        [false, false, true, false, true],
        [false, true, false, false, true],
        [true, false, false, false, true],
        [false, false, true, true, false],
        [false, true, false, true, false],
        [true, false, false, true, false],
        [false, true, true, false, false],
        [true, false, true, false, false],
        [true, true, false, false, false],
    ];

    let bdd = Bdd::default();
    let f = build_models(&bdd, &models).unwrap();

    let mut counter = ModelCounter::new(&bdd, 5);
    assert_eq!(counter.count(f).unwrap(), big(10));

    let obs = ObservationSet::new(vec![0, 2], vec![false, true], 5).unwrap();
    assert_eq!(counter.count_observed(f, &obs).unwrap(), big(3));

    for model in &models {
        let obs = ObservationSet::from_pairs((0..5).map(|v| (v, model[v as usize])), 5).unwrap();
        assert_eq!(counter.count_observed(f, &obs).unwrap(), big(1));
    }
}

#[test]
fn test_conditioned_queries_share_one_table() {
    let bdd = Bdd::default();
    let x: Vec<Ref> = (0..NUM_VARS).map(|v| bdd.mk_var(v)).collect();
    let f = bdd.apply_or(bdd.apply_and(x[0], x[3]), bdd.apply_xor(x[2], x[5]));

    let mut counter = ModelCounter::new(&bdd, NUM_VARS);
    counter.count(f).unwrap();
    let len = counter.table().len();

    let conditioned = counter.conditioned();
    for mask in 0..1u8 << NUM_VARS {
        let obs = observations_from_masks(mask, !mask);
        assert_eq!(
            conditioned.count(f, &obs).unwrap(),
            brute_force(&bdd, f, NUM_VARS, &obs)
        );
    }
    assert_eq!(counter.table().len(), len);
}

#[test]
fn test_large_variable_count() {
    let bdd = Bdd::default();
    let f = bdd.apply_and(bdd.mk_var(10), bdd.mk_var(150));

    assert_eq!(
        bdd.sat_count(f, 200).unwrap(),
        BigUint::from(1u32) << 198usize
    );

    let mut counter = ModelCounter::new(&bdd, 200);
    counter.count(f).unwrap();
    let obs = ObservationSet::new(vec![0, 10, 199], vec![true, true, false], 200).unwrap();
    assert_eq!(
        counter.count_observed(f, &obs).unwrap(),
        BigUint::from(1u32) << 196usize
    );
}
