// src/quiz/shuffle.rs

use rand::Rng;

/// Returns a uniformly random permutation of `items`. The input is untouched.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_owned(items.to_vec())
}

/// Shuffles an owned vector using the thread-local generator.
pub fn shuffle_owned<T>(items: Vec<T>) -> Vec<T> {
    shuffle_with(items, &mut rand::rng())
}

/// Fisher-Yates: walk from the last index down to 1, swapping each slot with
/// a uniformly chosen index in `0..=i`.
pub fn shuffle_with<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
    items
}
