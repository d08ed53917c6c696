#![no_main]

use arbitrary::Arbitrary;
use chunkqueue::{ByteQueue, Cursor, QueueError};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Push(Vec<u8>),
    Step,
    StepBack,
    Rewind,
    PopTo,
    Pop,
}

/// Flat reference model: every byte ever pushed, how many were consumed and
/// where the cursor sits, all as absolute offsets.
#[derive(Default)]
struct Model {
    stream: Vec<u8>,
    consumed: usize,
    cursor: usize,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut queue = ByteQueue::new();
    let mut cursor = queue.begin();
    let mut model = Model::default();

    for op in ops {
        match op {
            Op::Push(chunk) => {
                model.stream.extend_from_slice(&chunk);
                queue.push(chunk);
            }
            Op::Step => {
                let moved = cursor.step(&queue).unwrap();
                assert_eq!(moved, model.cursor < model.stream.len());
                if moved {
                    model.cursor += 1;
                }
            }
            Op::StepBack => {
                let moved = cursor.step_back(&queue).unwrap();
                assert_eq!(moved, model.cursor > model.consumed);
                if moved {
                    model.cursor -= 1;
                }
            }
            Op::Rewind => {
                cursor = queue.begin();
                model.cursor = model.consumed;
            }
            Op::PopTo => {
                let popped: Vec<u8> = queue.pop_to(&mut cursor).unwrap().concat();
                assert_eq!(popped, model.stream[model.consumed..model.cursor]);
                model.consumed = model.cursor;
                assert!(cursor.is_begin(&queue).unwrap());
            }
            Op::Pop => {
                let stale = cursor.clone();
                let popped: Vec<u8> = queue.pop().concat();
                assert_eq!(popped, model.stream[model.consumed..]);
                assert_eq!(stale.value(&queue), Err(QueueError::StaleCursor));
                model.consumed = model.stream.len();
                cursor = queue.begin();
                model.cursor = model.consumed;
            }
        }

        assert_eq!(queue.count(), model.stream.len() - model.consumed);
        assert_eq!(cursor.offset(), model.cursor);
        assert_eq!(cursor.value(&queue).unwrap(), model.stream.get(model.cursor).copied());
        assert_eq!(cursor.is_end(&queue).unwrap(), model.cursor == model.stream.len());
    }
});
