use num_bigint::BigUint;
use test_log::test;

use vds_bdd::reachability::{Reachability, ReachabilityError};
use vds_bdd::reference::BddId;

fn two_bits() -> Reachability {
    Reachability::new(2, 2).unwrap()
}

#[test]
fn toggling_bits() {
    let mut fsm = two_bits();
    let (s0, s1) = (fsm.states()[0], fsm.states()[1]);

    let bdd = fsm.manager();
    let deltas = [bdd.neg(s0), bdd.neg(s1)];
    fsm.set_transition_functions(&deltas).unwrap();
    fsm.set_init_state(&[false, false]).unwrap();

    assert!(fsm.is_reachable(&[false, false]).unwrap());
    assert!(!fsm.is_reachable(&[false, true]).unwrap());
    assert!(!fsm.is_reachable(&[true, false]).unwrap());
    assert!(fsm.is_reachable(&[true, true]).unwrap());
}

/// Counter 00 -> 01 -> 10 -> 00, advancing only while `i0` is set.
fn counter_with_input(fsm: &mut Reachability) {
    let (s0, s1) = (fsm.states()[0], fsm.states()[1]);
    let i0 = fsm.inputs()[0];

    let bdd = fsm.manager();
    let deltas = [
        bdd.and2(i0, bdd.ite(s1, BddId::FALSE, bdd.neg(s0))),
        bdd.and2(i0, bdd.and2(s0, bdd.neg(s1))),
    ];
    fsm.set_transition_functions(&deltas).unwrap();
    fsm.set_init_state(&[false, false]).unwrap();
}

#[test]
fn inputs() {
    let mut fsm = two_bits();
    counter_with_input(&mut fsm);

    assert!(fsm.is_reachable(&[false, false]).unwrap());
    assert!(fsm.is_reachable(&[false, true]).unwrap());
    assert!(fsm.is_reachable(&[true, false]).unwrap());
    assert!(!fsm.is_reachable(&[true, true]).unwrap());
    assert_eq!(fsm.reachable_state_count(), BigUint::from(3u32));
}

#[test]
fn state_distance() {
    let mut fsm = two_bits();
    let (s0, s1) = (fsm.states()[0], fsm.states()[1]);

    let bdd = fsm.manager();
    let deltas = [bdd.neg(s0), bdd.ite(s0, bdd.neg(s1), s1)];
    fsm.set_transition_functions(&deltas).unwrap();
    fsm.set_init_state(&[false, false]).unwrap();

    assert_eq!(fsm.state_distance(&[false, false]).unwrap(), Some(0));
    assert_eq!(fsm.state_distance(&[true, false]).unwrap(), Some(1));
    assert_eq!(fsm.state_distance(&[false, true]).unwrap(), Some(2));
    assert_eq!(fsm.state_distance(&[true, true]).unwrap(), Some(3));
}

#[test]
fn state_distance_with_input() {
    let mut fsm = two_bits();
    counter_with_input(&mut fsm);

    assert_eq!(fsm.state_distance(&[false, false]).unwrap(), Some(0));
    assert_eq!(fsm.state_distance(&[true, false]).unwrap(), Some(1));
    assert_eq!(fsm.state_distance(&[false, true]).unwrap(), Some(2));
    assert_eq!(fsm.state_distance(&[true, true]).unwrap(), None);
}

#[test]
fn errors() {
    let mut fsm = two_bits();
    let (s0, s1) = (fsm.states()[0], fsm.states()[1]);

    let bdd = fsm.manager();
    let deltas = [bdd.neg(s0), bdd.neg(s0), bdd.ite(s0, bdd.neg(s1), s1)];

    assert_eq!(
        fsm.set_transition_functions(&deltas),
        Err(ReachabilityError::TransitionCount { expected: 2, got: 3 })
    );
    assert!(matches!(
        fsm.set_init_state(&[false, false, true]),
        Err(ReachabilityError::StateVectorSize { expected: 2, got: 3 })
    ));
    assert!(fsm.is_reachable(&[true, true, true]).is_err());
    assert!(fsm.state_distance(&[true, true, true]).is_err());
}

#[test]
fn three_bit_counter_distances() {
    let mut fsm = Reachability::new(3, 0).unwrap();
    let (s0, s1, s2) = (fsm.states()[0], fsm.states()[1], fsm.states()[2]);
    assert!(fsm.inputs().is_empty());

    let bdd = fsm.manager();
    let deltas = [
        bdd.neg(s0),
        bdd.ite(s0, bdd.neg(s1), s1),
        bdd.ite(bdd.and2(s1, s0), bdd.neg(s2), s2),
    ];
    fsm.set_transition_functions(&deltas).unwrap();
    fsm.set_init_state(&[false, false, false]).unwrap();

    for value in 0..8usize {
        let state = [value & 1 != 0, value & 2 != 0, value & 4 != 0];
        assert_eq!(fsm.state_distance(&state).unwrap(), Some(value), "state {:03b}", value);
    }
}
