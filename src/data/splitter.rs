// ============================================================
// Layer 4 — Train/Eval Splitter
// ============================================================
// Shuffles tokenised examples and splits them into a training set
// and a held-out evaluation set (90/10 by default).
//
// The corpus is written genre by genre and artist by artist, so
// an unshuffled split would put whole artists in the eval set.
// A fixed seed makes the split reproducible between runs.
//
// Reference: rand crate documentation (SliceRandom, SeedableRng)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` and split into (train, eval).
///
/// `train_fraction` is clamped to `[0, 1]`. With `seed` set the
/// shuffle is deterministic.
pub fn split_train_val<T>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    seed:           Option<u64>,
) -> (Vec<T>, Vec<T>) {
    match seed {
        Some(seed) => samples.shuffle(&mut StdRng::seed_from_u64(seed)),
        None       => samples.shuffle(&mut rand::thread_rng()),
    }

    let total    = samples.len();
    let fraction = train_fraction.clamp(0.0, 1.0);
    let split_at = ((total as f64) * fraction).round() as usize;
    let eval     = samples.split_off(split_at.min(total));

    tracing::debug!(
        "Dataset split: {} train, {} eval",
        samples.len(),
        eval.len(),
    );

    (samples, eval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, eval)     = split_train_val(items, 0.9, None);
        assert_eq!(train.len(), 90);
        assert_eq!(eval.len(), 10);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, eval)     = split_train_val(items, 0.7, Some(1));
        let mut all: Vec<usize> = train.into_iter().chain(eval).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_split_is_reproducible() {
        let a = split_train_val((0..30).collect::<Vec<u32>>(), 0.5, Some(42));
        let b = split_train_val((0..30).collect::<Vec<u32>>(), 0.5, Some(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let (train, eval) = split_train_val(Vec::<usize>::new(), 0.9, None);
        assert!(train.is_empty());
        assert!(eval.is_empty());
    }

    #[test]
    fn test_fraction_is_clamped() {
        let (train, eval) = split_train_val((0..10).collect::<Vec<u8>>(), 1.5, Some(0));
        assert_eq!(train.len(), 10);
        assert!(eval.is_empty());
    }
}
