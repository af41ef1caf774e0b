//! Non-recursive subset enumeration for conditioning sets.
//!
//! Both generators yield strictly increasing index vectors, lexicographic
//! within a size. [`DepthChoiceGenerator`] walks sizes in increasing order,
//! which is what makes "smallest conditioning set first" hold for the
//! adjacency search.

mod choice;
mod depth_choice;

pub use choice::ChoiceGenerator;
pub use depth_choice::DepthChoiceGenerator;

/// `n choose k`, saturating at `u64::MAX`.
pub fn choose(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    acc as u64
}

#[cfg(test)]
mod tests {
    use super::choose;

    #[test]
    fn binomials() {
        assert_eq!(choose(0, 0), 1);
        assert_eq!(choose(5, 0), 1);
        assert_eq!(choose(5, 2), 10);
        assert_eq!(choose(5, 5), 1);
        assert_eq!(choose(3, 4), 0);
        assert_eq!(choose(52, 5), 2_598_960);
    }
}
