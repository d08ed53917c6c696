use alloc::vec;

use rstest::rstest;

use super::policies::Utf16Be;
use crate::{
    ByteQueue, ChunkQueue, CodePointQueue, CodeUnitQueue, Cursor, ErrorKind, QueueError,
};

/// Runs every cursor operation and asserts each one reports a stale cursor.
fn assert_stale<C, Q>(mut cursor: C, queue: &Q)
where
    C: Cursor<Q>,
    C::Value: core::fmt::Debug,
{
    assert_eq!(cursor.is_begin(queue), Err(QueueError::StaleCursor));
    assert_eq!(cursor.is_end(queue), Err(QueueError::StaleCursor));
    assert_eq!(cursor.value(queue).err(), Some(QueueError::StaleCursor));
    assert_eq!(cursor.step(queue), Err(QueueError::StaleCursor));
    assert_eq!(cursor.step_back(queue), Err(QueueError::StaleCursor));
}

#[test]
fn chunk_cursor_orphaned_by_pop() {
    let mut queue = ChunkQueue::new();
    let cursor = queue.begin();
    queue.push(&b"data"[..]);
    queue.pop();
    assert_stale(cursor, &queue);
}

#[test]
fn byte_cursor_orphaned_by_pop() {
    let mut queue = ByteQueue::new();
    let cursor = queue.begin();
    queue.push(&b"data"[..]);
    queue.pop();
    assert_stale(cursor, &queue);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
fn unit_cursor_orphaned_by_pop(#[case] unit_length: usize) {
    let mut queue = CodeUnitQueue::with_unit_length(unit_length).unwrap();
    let cursor = queue.begin();
    queue.push(vec![0u8; 8]);
    queue.pop();
    assert_stale(cursor, &queue);
}

#[test]
fn point_cursor_orphaned_by_read() {
    let mut queue = CodePointQueue::with_unit_length(2, Utf16Be).unwrap();
    let cursor = queue.begin();
    queue.push(vec![0x00_u8, 0x61]);
    assert_eq!(queue.read().unwrap(), "a");
    assert_stale(cursor, &queue);
}

#[test]
fn pushes_do_not_invalidate() {
    let mut queue = ByteQueue::new();
    let mut cursor = queue.begin();
    for chunk in [&b"a"[..], &b"b"[..], &b"c"[..]] {
        queue.push(chunk);
        assert_eq!(cursor.value(&queue).unwrap(), Some(b'a'));
    }
    assert!(cursor.step(&queue).unwrap());
}

#[test]
fn second_consumer_sees_stale_cursor() {
    let mut queue = ByteQueue::new();
    queue.push(&b"abcdef"[..]);
    let mut first = queue.begin();
    let mut second = queue.begin();
    first.step(&queue).unwrap();
    second.step(&queue).unwrap();
    second.step(&queue).unwrap();

    queue.pop_to(&mut first).unwrap();
    let err = queue.pop_to(&mut second).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Stale);
    assert_eq!(queue.count(), 5);
}

#[test]
fn cursor_from_another_queue_is_a_precondition_violation() {
    let mut one = CodeUnitQueue::new();
    let other = CodeUnitQueue::new();
    let mut foreign = other.begin();
    assert_eq!(one.pop_to(&mut foreign), Err(QueueError::ForeignCursor));
    assert_eq!(
        foreign.step(&one).unwrap_err().kind(),
        ErrorKind::Precondition
    );
}

#[test]
fn clone_independence() {
    let mut queue = CodeUnitQueue::with_unit_length(2).unwrap();
    queue.push(vec![0x00_u8, 0x01, 0x00, 0x02]);
    let original = queue.begin();
    let mut copy = original.clone();
    assert_eq!(copy, original);

    assert!(copy.step(&queue).unwrap());
    assert_ne!(copy, original);
    assert_eq!(original.value(&queue).unwrap(), Some(1));
    assert_eq!(copy.value(&queue).unwrap(), Some(2));

    assert!(copy.step_back(&queue).unwrap());
    assert_eq!(copy, original);
}
