mod common;

use common::*;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use repool::*;
use std::{cell::Cell, collections::HashSet, rc::Rc};

#[derive(Debug, Clone)]
enum Op {
    Collect,
    Release(usize),
    ReleaseNone,
    Grow(bool),
    Initialize(u8, bool),
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 8 {
            0..=2 => Op::Collect,
            3 | 4 => Op::Release(usize::arbitrary(g)),
            5 => Op::ReleaseNone,
            6 => Op::Grow(bool::arbitrary(g)),
            _ => Op::Initialize(u8::arbitrary(g) % 6, bool::arbitrary(g)),
        }
    }
}

/// Replays `ops` and checks the pool against a simple model after each step.
fn replay(ops: &[Op]) -> bool {
    let built = Rc::new(Cell::new(0));
    let observed = Rc::new(Cell::new(0));
    let mut pool = sprite_pool(built.clone());
    let counter = observed.clone();
    pool.on_created(move |_: &mut Sprite| counter.set(counter.get() + 1));

    let mut expected_len = 0;
    for op in ops {
        match *op {
            Op::Collect => {
                let had_inactive = pool.with_state(false).next().is_some();
                let before = built.get();
                match pool.collect(Placement::new()).unwrap() {
                    Some(key) => {
                        if !pool.get(key).is_some_and(|sprite| sprite.is_active()) {
                            return false;
                        }
                        if had_inactive {
                            if built.get() != before {
                                return false;
                            }
                        } else {
                            expected_len += 1;
                        }
                    }
                    None => {
                        if had_inactive || pool.grows_if_exhausted() {
                            return false;
                        }
                    }
                }
            }
            Op::Release(n) => {
                if !pool.is_empty() {
                    let key = pool.iter().nth(n % pool.len()).map(|(key, _)| key);
                    pool.release(key);
                }
            }
            Op::ReleaseNone => pool.release(None),
            Op::Grow(grow) => pool.set_grow_if_exhausted(grow),
            Op::Initialize(count, start_active) => {
                let config = PoolConfig::new("sprite", "root")
                    .count(count as usize)
                    .start_active(start_active);
                pool.initialize(config).unwrap();
                expected_len = count as usize;
                if pool.with_state(start_active).count() != expected_len {
                    return false;
                }
            }
        }

        if pool.len() != expected_len || observed.get() != built.get() {
            return false;
        }
        let active: HashSet<_> = pool.with_state(true).map(|(key, _)| key).collect();
        let inactive: HashSet<_> = pool.with_state(false).map(|(key, _)| key).collect();
        let all: HashSet<_> = pool.iter().map(|(key, _)| key).collect();
        if !active.is_disjoint(&inactive) || active.len() + inactive.len() != all.len() {
            return false;
        }
    }
    true
}

#[quickcheck]
fn states_partition_the_pool(ops: Vec<Op>) -> bool {
    replay(&ops)
}

#[test]
fn test_replay_scripted_sequence() {
    let ops = [
        Op::Initialize(3, false),
        Op::Collect,
        Op::Collect,
        Op::Collect,
        Op::Grow(false),
        Op::Collect,
        Op::Grow(true),
        Op::Collect,
        Op::Release(0),
        Op::Collect,
        Op::ReleaseNone,
        Op::Initialize(2, true),
        Op::Collect,
    ];
    assert!(replay(&ops));
}
