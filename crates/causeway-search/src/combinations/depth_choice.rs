use super::choice::ChoiceGenerator;
use crate::error::{SearchError, SearchResult};

/// All subsets of `0..n` of size `0..=min(depth, n)`, sizes ascending.
///
/// `depth = -1` means unbounded.
#[derive(Debug, Clone)]
pub struct DepthChoiceGenerator {
    n: usize,
    max_size: usize,
    size: usize,
    inner: ChoiceGenerator,
}

impl DepthChoiceGenerator {
    pub fn new(n: i64, depth: i64) -> SearchResult<Self> {
        if n < 0 {
            return Err(SearchError::invalid("n", format!("must be >= 0, got {n}")));
        }
        if depth < -1 {
            return Err(SearchError::invalid(
                "depth",
                format!("must be >= -1, got {depth}"),
            ));
        }
        let n = n as usize;
        let max_size = if depth == -1 { n } else { (depth as usize).min(n) };
        Ok(Self {
            n,
            max_size,
            size: 0,
            inner: ChoiceGenerator::new(n, 0),
        })
    }

    /// Largest subset size this generator emits.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn reset(&mut self) {
        self.size = 0;
        self.inner = ChoiceGenerator::new(self.n, 0);
    }
}

impl Iterator for DepthChoiceGenerator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        loop {
            if let Some(subset) = self.inner.next() {
                return Some(subset);
            }
            if self.size >= self.max_size {
                return None;
            }
            self.size += 1;
            self.inner = ChoiceGenerator::new(self.n, self.size);
        }
    }
}
