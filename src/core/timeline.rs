//! Delayed cue queue with generation-based invalidation.
//!
//! Scripted beats ("play this line in 8 seconds") are scheduled here instead
//! of as free-standing callbacks. Every entry remembers the generation it was
//! scheduled in; bumping the generation drops all pending entries at once, so
//! nothing scheduled before a teardown can fire afterwards.

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due: f32,
    seq: u64,
    generation: u32,
    payload: T,
}

/// A clock plus the cues waiting on it.
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    now: f32,
    generation: u32,
    next_seq: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            generation: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed since the timeline was created.
    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Schedule `payload` to fire `delay` seconds from now.
    pub fn schedule(&mut self, delay: f32, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due: self.now + delay.max(0.0),
            seq,
            generation: self.generation,
            payload,
        });
    }

    /// Number of live cues still waiting.
    pub fn pending(&self) -> usize {
        self.pending
            .iter()
            .filter(|entry| entry.generation == self.generation)
            .count()
    }

    /// Advance the clock and return every live cue that came due, ordered by
    /// due time and then by scheduling order.
    pub fn advance(&mut self, delta: f32) -> Vec<T> {
        self.now += delta.max(0.0);

        let generation = self.generation;
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .filter(|entry| entry.generation == generation)
            .partition(|entry| entry.due <= now);
        self.pending = rest;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|entry| entry.payload).collect()
    }

    /// Invalidate every pending cue. Returns how many were live.
    pub fn invalidate(&mut self) -> usize {
        let live = self.pending();
        self.generation = self.generation.wrapping_add(1);
        live
    }
}
