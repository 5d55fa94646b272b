//! Fixed-layout records stored in a caller-provided array.

use cxq::{Cxq, CxqError};

const NAME_LEN: usize = 16;
const PERSON_LEN: usize = 2 * NAME_LEN + 4;
const SLOTS: usize = 10;

struct Person {
    first_name: String,
    last_name: String,
    age: u32,
}

impl Person {
    fn encode(&self) -> [u8; PERSON_LEN] {
        let mut bytes = [0u8; PERSON_LEN];
        put_name(&mut bytes[..NAME_LEN], &self.first_name);
        put_name(&mut bytes[NAME_LEN..2 * NAME_LEN], &self.last_name);
        bytes[2 * NAME_LEN..].copy_from_slice(&self.age.to_le_bytes());
        bytes
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            first_name: get_name(&bytes[..NAME_LEN]),
            last_name: get_name(&bytes[NAME_LEN..2 * NAME_LEN]),
            age: u32::from_le_bytes(bytes[2 * NAME_LEN..].try_into().unwrap()),
        }
    }
}

fn put_name(field: &mut [u8], name: &str) {
    let len = name.len().min(field.len() - 1);
    field[..len].copy_from_slice(&name.as_bytes()[..len]);
}

fn get_name(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

fn main() -> Result<(), CxqError> {
    let mut storage = [0u8; SLOTS * PERSON_LEN];
    let q = Cxq::with_storage(SLOTS, PERSON_LEN, &mut storage)?;

    for (i, name) in ["aaa", "bbb", "ccc", "ddd", "eee", "fff", "ggg", "hhh"]
        .into_iter()
        .enumerate()
    {
        let person = Person {
            first_name: name.to_string(),
            last_name: name.to_uppercase(),
            age: i as u32 * 10,
        };
        if let Err(CxqError::Full) = q.enqueue(&person.encode()) {
            println!("queue full!");
        }
    }

    let person = Person {
        first_name: "farrell".to_string(),
        last_name: "aultman".to_string(),
        age: 101,
    };
    if let Err(CxqError::Full) = q.enqueue_front(&person.encode()) {
        println!("queue full!!");
    }

    println!("is_empty = {}", q.is_empty());
    println!("is_full = {}", q.is_full());
    println!("len = {}", q.len());
    println!("free = {}", q.free());

    println!("peek:");
    q.traverse(|bytes| {
        let p = Person::decode(bytes);
        println!(
            "first_name: {}, last_name: {}, age {}",
            p.first_name, p.last_name, p.age
        );
    });

    println!("dequeue:");
    let mut out = [0u8; PERSON_LEN];
    while q.dequeue(Some(&mut out), true).is_ok() {
        let p = Person::decode(&out);
        println!(
            "first_name = {}, last_name = {}, age = {}",
            p.first_name, p.last_name, p.age
        );
    }

    q.finish();
    Ok(())
}
