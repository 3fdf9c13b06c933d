use heapless::{Deque, Vec};

/// Running median over the most recent `capacity` samples, at most `N`.
#[derive(Debug, Clone)]
pub struct RunningMedianBuffer<const N: usize> {
    buffer: Deque<f32, N>,
    capacity: usize,
}

impl<const N: usize> RunningMedianBuffer<N> {
    const NON_EMPTY: () = assert!(N > 0, "RunningMedianBuffer needs room for one sample");

    /// `capacity` is clamped to `1..=N`.
    pub fn new(capacity: usize) -> Self {
        let () = Self::NON_EMPTY;
        Self {
            buffer: Deque::new(),
            capacity: capacity.clamp(1, N),
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        // N > 0 and capacity <= N, so the pop above always leaves room
        let _ = self.buffer.push_back(value);
    }

    pub fn median(&self) -> Option<f32> {
        if self.buffer.is_empty() {
            return None;
        }

        let mut sorted: Vec<f32, N> = self.buffer.iter().copied().collect();
        sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));

        let len = sorted.len();
        if len % 2 == 0 {
            Some((sorted[len / 2 - 1] + sorted[len / 2]) / 2.0)
        } else {
            Some(sorted[len / 2])
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.capacity
    }
}
