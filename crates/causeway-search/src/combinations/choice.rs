/// All `k`-subsets of `0..n` in lexicographic order.
///
/// `k = 0` yields the empty subset once; `k > n` yields nothing.
#[derive(Debug, Clone)]
pub struct ChoiceGenerator {
    n: usize,
    k: usize,
    current: Vec<usize>,
    started: bool,
    done: bool,
}

impl ChoiceGenerator {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            current: Vec::with_capacity(k),
            started: false,
            done: k > n,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Rewind to the first subset.
    pub fn reset(&mut self) {
        self.current.clear();
        self.started = false;
        self.done = self.k > self.n;
    }

    /// Advance `current` to its lexicographic successor. Returns `false` when
    /// `current` was the last subset.
    fn advance(&mut self) -> bool {
        let (n, k) = (self.n, self.k);
        // Rightmost position that can still move right.
        let Some(i) = (0..k).rev().find(|&i| self.current[i] < n - k + i) else {
            return false;
        };
        self.current[i] += 1;
        for j in i + 1..k {
            self.current[j] = self.current[j - 1] + 1;
        }
        true
    }
}

impl Iterator for ChoiceGenerator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.current = (0..self.k).collect();
            return Some(self.current.clone());
        }
        if self.advance() {
            Some(self.current.clone())
        } else {
            self.done = true;
            None
        }
    }
}
