//! A queue of `i32` on the heap with the default flat-copy strategy.

use cxq::{Cxq, CxqError};

fn main() -> Result<(), CxqError> {
    let q = Cxq::new(10, core::mem::size_of::<i32>())?;

    for i in 0i32..8 {
        match q.enqueue(&i.to_ne_bytes()) {
            Ok(_) => println!("enqueue: {i}"),
            Err(CxqError::Full) => println!("queue full!"),
            Err(e) => return Err(e),
        }
    }

    let i = 101i32;
    match q.enqueue_front(&i.to_ne_bytes()) {
        Ok(_) => println!("enqueue_front: {i}"),
        Err(CxqError::Full) => println!("queue full!!"),
        Err(e) => return Err(e),
    }

    println!("is_empty = {}", q.is_empty());
    println!("is_full = {}", q.is_full());
    println!("len = {}", q.len());
    println!("free = {}", q.free());

    q.traverse(|bytes| println!("peek: {}", i32::from_ne_bytes(bytes.try_into().unwrap())));

    let mut out = [0u8; 4];
    while q.dequeue(Some(&mut out), true).is_ok() {
        println!("dequeue: {}", i32::from_ne_bytes(out));
    }

    for i in 0i32..8 {
        q.enqueue(&i.to_ne_bytes())?;
    }

    println!("before flush: len = {}", q.len());
    q.flush();
    println!("after flush: len = {}", q.len());

    q.finish();
    Ok(())
}
