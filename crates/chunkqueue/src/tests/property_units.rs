use alloc::{vec, vec::Vec};

use quickcheck::{QuickCheck, TestResult};

use super::{chunked, quickcheck_tests};
use crate::{CodeUnitQueue, Cursor, MAX_UNIT_LENGTH, collect_values};

fn pack(bytes: &[u8], unit_length: usize) -> Vec<u64> {
    bytes
        .chunks_exact(unit_length)
        .map(|unit| unit.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
        .collect()
}

/// Property: unit values equal the unconsumed bytes grouped by
/// `unit_length` and packed most-significant byte first, however the bytes
/// were chunked and wherever earlier drains stopped. A drain may stop inside
/// a partial unit; the grid restarts at the new begin. A trailing partial
/// unit is never stepped over.
#[test]
fn unit_packing_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(data: Vec<u8>, width: u8, splits: Vec<usize>, drains: Vec<u8>) -> TestResult {
        let unit_length = 1 + usize::from(width) % MAX_UNIT_LENGTH;
        let mut queue = CodeUnitQueue::with_unit_length(unit_length).unwrap();
        let mut drains = drains.into_iter();
        let mut pending: Vec<u8> = Vec::new();
        let mut consumed = 0;

        for chunk in chunked(&data, &splits) {
            pending.extend_from_slice(&chunk);
            queue.push(chunk);
            if collect_values(queue.begin(), &queue).unwrap() != pack(&pending, unit_length) {
                return TestResult::failed();
            }

            let drain = drains.next().unwrap_or_default();
            match drain % 3 {
                1 => {
                    let mut cursor = queue.begin();
                    for _ in 0..drain / 3 {
                        if !cursor.step(&queue).unwrap() {
                            break;
                        }
                    }
                    let taken = cursor.offset() - consumed;
                    let popped = queue.pop_to(&mut cursor).unwrap().concat();
                    if popped != pending[..taken] || !cursor.is_begin(&queue).unwrap() {
                        return TestResult::failed();
                    }
                    pending = pending.split_off(taken);
                    consumed += taken;
                }
                2 => {
                    if queue.pop().concat() != pending {
                        return TestResult::failed();
                    }
                    consumed += pending.len();
                    pending.clear();
                }
                _ => {}
            }
        }

        let complete = pending.len() - pending.len() % unit_length;
        let mut cursor = queue.begin();
        let mut values = Vec::new();
        while cursor.offset() - consumed < complete {
            values.push(cursor.value(&queue).unwrap().unwrap_or_default());
            if !cursor.step(&queue).unwrap() {
                return TestResult::failed();
            }
        }
        if cursor.step(&queue).unwrap() || cursor.offset() - consumed != complete {
            return TestResult::failed();
        }
        let trailing_ok = if complete == pending.len() {
            cursor.is_end(&queue).unwrap()
        } else {
            cursor.value(&queue).is_err_and(|err| err.is_recoverable())
        };

        TestResult::from_bool(values == pack(&pending, unit_length) && trailing_ok)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, u8, Vec<usize>, Vec<u8>) -> TestResult);
}

/// Property: `step_back` from the end lands on the same unit boundaries as
/// `step` from begin.
#[test]
fn unit_boundaries_are_symmetric_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(data: Vec<u8>, width: u8, splits: Vec<usize>) -> bool {
        let unit_length = 1 + usize::from(width) % MAX_UNIT_LENGTH;
        let mut queue = CodeUnitQueue::with_unit_length(unit_length).unwrap();
        for chunk in chunked(&data, &splits) {
            queue.push(chunk);
        }

        let mut forward = Vec::new();
        let mut cursor = queue.begin();
        loop {
            forward.push(cursor.offset());
            if !cursor.step(&queue).unwrap() {
                break;
            }
        }

        let mut backward = Vec::new();
        let mut cursor = queue.end();
        while cursor.step_back(&queue).unwrap() {
            backward.push(cursor.offset());
        }
        backward.reverse();

        let complete = data.len() - data.len() % unit_length;
        let expected_back: Vec<usize> = forward
            .iter()
            .copied()
            .filter(|&offset| offset != data.len())
            .collect();
        forward.last() == Some(&complete) && backward == expected_back
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, u8, Vec<usize>) -> bool);
}

#[test]
fn drain_inside_partial_unit_restarts_the_grid() {
    let mut queue = CodeUnitQueue::with_unit_length(2).unwrap();
    queue.push(vec![0x00_u8, 0x01, 0x00]);
    let mut end = queue.end();
    queue.pop_to(&mut end).unwrap();
    queue.push(vec![0x00_u8, 0x05]);
    queue.push(vec![0x00_u8, 0x06, 0x07]);
    assert_eq!(collect_values(queue.begin(), &queue).unwrap(), [5, 6]);

    queue.pop();
    queue.push(vec![0x08_u8, 0x09]);
    assert_eq!(collect_values(queue.begin(), &queue).unwrap(), [0x0809]);
}

#[test]
fn collect_stops_before_trailing_partial_unit() {
    let mut queue = CodeUnitQueue::with_unit_length(3).unwrap();
    queue.push(vec![1_u8, 2, 3, 4]);
    queue.push(vec![5_u8, 6, 7]);
    assert_eq!(
        collect_values(queue.begin(), &queue).unwrap(),
        [0x01_0203, 0x04_0506]
    );
}
