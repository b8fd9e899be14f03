//! Cartesian product of candidate buckets.
//!
//! Built iteratively, one bucket at a time. The first bucket varies slowest.

/// Number of combinations of `slots` buckets with `choices` items each, or
/// `None` on overflow.
pub fn product_len(choices: usize, slots: usize) -> Option<usize> {
    let slots = u32::try_from(slots).ok()?;
    choices.checked_pow(slots)
}

/// Every combination taking one item from each bucket, in lexicographic
/// bucket order. No buckets yields a single empty combination; an empty
/// bucket yields none.
pub fn cartesian_product<T: Clone>(buckets: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut combinations: Vec<Vec<T>> = vec![Vec::with_capacity(buckets.len())];

    for bucket in buckets {
        let mut extended = Vec::with_capacity(combinations.len() * bucket.len());
        for prefix in &combinations {
            for item in bucket {
                let mut combination = Vec::with_capacity(buckets.len());
                combination.extend_from_slice(prefix);
                combination.push(item.clone());
                extended.push(combination);
            }
        }
        combinations = extended;
    }

    combinations
}
