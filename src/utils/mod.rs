//! Helpers shared across the crate: the worker thread pool, builder-style
//! setter macros and graph traversal.

use std::hash::Hash;

use hashbrown::HashSet;
use once_cell::sync::Lazy;
use rayon::{ThreadPool, ThreadPoolBuilder};

pub static THREAD_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    let num_threads: Option<usize> = std::env::var("SVLOCUS_NUM_THREADS")
        .ok()
        .and_then(|str| str.parse::<usize>().ok());
    ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or(0))
        .build()
        .expect("Failed to create thread pool")
});

pub fn n_threads() -> usize {
    THREAD_POOL.current_num_threads()
}

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
                self.$field_name = value;
                self
            }
        }
    };
}

/// Counts the nodes reachable from `start`, `start` included.
pub(crate) fn reachable_count<K, F, I>(
    start: K,
    mut neighbours: F,
) -> usize
where
    K: Copy + Eq + Hash,
    F: FnMut(K) -> I,
    I: IntoIterator<Item = K>, {
    let mut seen = HashSet::new();
    seen.insert(start);
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        for next in neighbours(current) {
            if seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen.len()
}
