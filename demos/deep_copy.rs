//! Elements that own heap data outside of their slot bytes.
//!
//! Each element is `[name handle: u32, age: u32]`. The names live in a pool
//! owned by the strategy: allocation gives every slot its own name buffer, a
//! copy moves the name text between buffers instead of the handle, and release
//! frees the slot buffers again.

use std::cell::RefCell;

use cxq::{Cxq, CxqError, Strategy};

const PERSON_LEN: usize = 8;

#[derive(Default)]
struct NamePool {
    names: RefCell<Vec<String>>,
}

impl NamePool {
    fn new_person(&self, name: &str, age: u32) -> [u8; PERSON_LEN] {
        let mut names = self.names.borrow_mut();
        names.push(name.to_string());

        let mut bytes = [0u8; PERSON_LEN];
        bytes[..4].copy_from_slice(&(names.len() as u32 - 1).to_ne_bytes());
        bytes[4..].copy_from_slice(&age.to_ne_bytes());
        bytes
    }

    fn describe(&self, bytes: &[u8]) -> String {
        format!("name: {}, age: {}", self.names.borrow()[handle(bytes)], age(bytes))
    }
}

fn handle(bytes: &[u8]) -> usize {
    u32::from_ne_bytes(bytes[..4].try_into().unwrap()) as usize
}

fn age(bytes: &[u8]) -> u32 {
    u32::from_ne_bytes(bytes[4..].try_into().unwrap())
}

impl Strategy for NamePool {
    fn allocate(&self, len: usize) -> Result<Option<Box<[u8]>>, CxqError> {
        let mut storage = vec![0u8; len].into_boxed_slice();
        let mut names = self.names.borrow_mut();

        for slot in storage.chunks_exact_mut(PERSON_LEN) {
            names.push(String::with_capacity(32));
            slot[..4].copy_from_slice(&(names.len() as u32 - 1).to_ne_bytes());
        }

        Ok(Some(storage))
    }

    fn release(&self, storage: Box<[u8]>) {
        let mut names = self.names.borrow_mut();
        for slot in storage.chunks_exact(PERSON_LEN) {
            names[handle(slot)] = String::new();
        }
    }

    fn copy<'d>(&self, dst: &'d mut [u8], src: &[u8]) -> &'d mut [u8] {
        let mut names = self.names.borrow_mut();
        let name = names[handle(src)].clone();

        let target = &mut names[handle(dst)];
        target.clear();
        target.push_str(&name);

        dst[4..].copy_from_slice(&src[4..]);
        dst
    }
}

fn main() -> Result<(), CxqError> {
    let pool = NamePool::default();
    let q = Cxq::<&NamePool>::with_strategy(10, PERSON_LEN, &pool)?;

    for (i, name) in ["aaa", "bbb", "ccc", "ddd", "eee", "fff", "ggg", "hhh"]
        .into_iter()
        .enumerate()
    {
        let person = pool.new_person(name, i as u32 * 10);
        if let Err(CxqError::Full) = q.enqueue(&person) {
            println!("queue full!");
        }
    }

    let person = pool.new_person("farrell aultman", 101);
    if let Err(CxqError::Full) = q.enqueue_front(&person) {
        println!("queue full!!");
    }

    println!("is_empty = {}", q.is_empty());
    println!("is_full = {}", q.is_full());
    println!("len = {}", q.len());
    println!("free = {}", q.free());

    println!("peek:");
    q.traverse(|bytes| println!("{}", pool.describe(bytes)));

    println!("dequeue:");
    let mut out = pool.new_person("", 0);
    while q.dequeue(Some(&mut out), true).is_ok() {
        println!("{}", pool.describe(&out));
    }

    q.finish();
    Ok(())
}
