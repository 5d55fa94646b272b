use std::collections::VecDeque;

use cxq::{Cxq, CxqError, FullPolicy};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(u32),
    PushFront(u32),
    Pop,
    Peek,
    Flush,
    Overwrite(bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u32>().prop_map(Op::Push),
        2 => any::<u32>().prop_map(Op::PushFront),
        3 => Just(Op::Pop),
        1 => Just(Op::Peek),
        1 => Just(Op::Flush),
        1 => any::<bool>().prop_map(Op::Overwrite),
    ]
}

fn contents(q: &Cxq<'_>) -> Vec<u32> {
    let mut values = Vec::new();
    q.traverse(|bytes| values.push(u32::from_ne_bytes(bytes.try_into().unwrap())));
    values
}

fn pop(q: &Cxq<'_>, remove: bool) -> Result<u32, CxqError> {
    let mut out = [0u8; 4];
    q.dequeue(Some(&mut out), remove)?;
    Ok(u32::from_ne_bytes(out))
}

proptest! {
    #[test]
    fn matches_deque_model(capacity in 1usize..8, ops in prop::collection::vec(op(), 0..64)) {
        let q = Cxq::new(capacity, 4).unwrap();
        let mut model = VecDeque::new();
        let mut overwrite = false;

        for op in ops {
            match op {
                Op::Push(v) => {
                    let result = q.enqueue(&v.to_ne_bytes());
                    if model.len() == capacity && !overwrite {
                        prop_assert_eq!(result, Err(CxqError::Full));
                    } else {
                        prop_assert!(result.is_ok());
                        if model.len() == capacity {
                            model.pop_front();
                        }
                        model.push_back(v);
                    }
                }
                Op::PushFront(v) => {
                    let result = q.enqueue_front(&v.to_ne_bytes());
                    if model.len() == capacity && !overwrite {
                        prop_assert_eq!(result, Err(CxqError::Full));
                    } else {
                        prop_assert!(result.is_ok());
                        if model.len() == capacity {
                            model.pop_front();
                        }
                        model.push_front(v);
                    }
                }
                Op::Pop => {
                    prop_assert_eq!(pop(&q, true).ok(), model.pop_front());
                }
                Op::Peek => {
                    prop_assert_eq!(pop(&q, false).ok(), model.front().copied());
                }
                Op::Flush => {
                    q.flush();
                    model.clear();
                }
                Op::Overwrite(on) => {
                    q.set_overwrite_on_full(on);
                    overwrite = on;
                }
            }

            prop_assert!(q.len() <= q.capacity());
            prop_assert_eq!(q.len(), model.len());
            prop_assert_eq!(q.free(), capacity - model.len());
            prop_assert_eq!(q.is_empty(), model.is_empty());
            prop_assert_eq!(q.is_full(), model.len() == capacity);
            prop_assert!(q.first() < capacity);
            prop_assert_eq!(contents(&q), Vec::from(model.clone()));

            match q.last() {
                None => prop_assert!(model.is_empty()),
                Some(last) => prop_assert_eq!(last, (q.first() + q.len() - 1) % capacity),
            }
        }
    }

    #[test]
    fn reject_keeps_every_slot(capacity in 1usize..8, values in prop::collection::vec(any::<u32>(), 8)) {
        let mut q = Cxq::new(capacity, 4).unwrap();
        for v in &values[..capacity] {
            q.enqueue(&v.to_ne_bytes()).unwrap();
        }

        let before: Vec<Vec<u8>> = (0..capacity).map(|i| q.slot(i).unwrap().to_vec()).collect();

        prop_assert_eq!(q.enqueue(&values[7].to_ne_bytes()), Err(CxqError::Full));
        prop_assert_eq!(q.enqueue_front(&values[7].to_ne_bytes()), Err(CxqError::Full));

        let after: Vec<Vec<u8>> = (0..capacity).map(|i| q.slot(i).unwrap().to_vec()).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(q.len(), capacity);
    }

    #[test]
    fn overwrite_evicts_oldest(capacity in 2usize..8, values in prop::collection::vec(any::<u32>(), 8), extra: u32) {
        let q = Cxq::new(capacity, 4).unwrap();
        q.set_policy(FullPolicy::Overwrite);
        for v in &values[..capacity] {
            q.enqueue(&v.to_ne_bytes()).unwrap();
        }

        prop_assert!(q.enqueue(&extra.to_ne_bytes()).is_ok());
        prop_assert_eq!(pop(&q, false), Ok(values[1]));
        prop_assert_eq!(q.len(), capacity);
    }

    #[test]
    fn fifo_order(capacity in 1usize..16, values in prop::collection::vec(any::<u32>(), 16)) {
        let q = Cxq::new(capacity, 4).unwrap();
        for v in &values[..capacity] {
            q.enqueue(&v.to_ne_bytes()).unwrap();
        }

        let drained: Vec<u32> = (0..capacity).map(|_| pop(&q, true).unwrap()).collect();
        prop_assert_eq!(&drained[..], &values[..capacity]);
        prop_assert!(q.is_empty());
    }

    #[test]
    fn front_insert_is_next_out(capacity in 1usize..8, fill in 0usize..8, value: u32, overwrite: bool) {
        let q = Cxq::new(capacity, 4).unwrap();
        q.set_overwrite_on_full(overwrite);
        for i in 0..fill.min(if overwrite { fill } else { capacity - 1 }) {
            q.enqueue(&(i as u32).to_ne_bytes()).unwrap();
        }

        q.enqueue_front(&value.to_ne_bytes()).unwrap();
        prop_assert_eq!(pop(&q, true), Ok(value));
    }

    #[test]
    fn flush_is_idempotent(capacity in 1usize..8, fill in 0usize..8) {
        let q = Cxq::new(capacity, 4).unwrap();
        for i in 0..fill.min(capacity) {
            q.enqueue(&(i as u32).to_ne_bytes()).unwrap();
        }

        q.flush();
        let first = q.first();
        prop_assert_eq!(q.len(), 0);

        q.flush();
        prop_assert_eq!(q.len(), 0);
        prop_assert_eq!(q.first(), first);
    }

    #[test]
    fn bytes_round_trip(element in prop::collection::vec(any::<u8>(), 1..64)) {
        let q = Cxq::new(3, element.len()).unwrap();
        q.enqueue(&element).unwrap();

        let mut out = vec![0u8; element.len()];
        q.dequeue(Some(&mut out), true).unwrap();
        prop_assert_eq!(out, element);
    }
}
