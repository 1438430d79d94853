use tenfoot_core::NodeId;

/// Circular buffer of slot nodes. Pool position `p` is `slots[(head + p) % n]`;
/// scrolling only moves `head`.
#[derive(Clone, Debug, Default)]
pub struct SlotRing {
    slots: Vec<NodeId>,
    head: usize,
}

impl SlotRing {
    pub fn new(slots: Vec<NodeId>) -> Self {
        Self { slots, head: 0 }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<NodeId> {
        if self.slots.is_empty() {
            return None;
        }
        self.slots.get((self.head + position) % self.slots.len()).copied()
    }

    pub fn position_of(&self, slot: NodeId) -> Option<usize> {
        let n = self.slots.len();
        let raw = self.slots.iter().position(|s| *s == slot)?;
        Some((raw + n - self.head) % n)
    }

    /// The first `by` positions wrap around to the end.
    pub fn rotate_forward(&mut self, by: usize) {
        if !self.slots.is_empty() {
            self.head = (self.head + by) % self.slots.len();
        }
    }

    /// The last `by` positions wrap around to the front.
    pub fn rotate_backward(&mut self, by: usize) {
        let n = self.slots.len();
        if n > 0 {
            self.head = (self.head + n - by % n) % n;
        }
    }

    /// Slots in pool order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.slots.len()).filter_map(|p| self.get(p))
    }

    pub fn take(&mut self) -> Vec<NodeId> {
        self.head = 0;
        std::mem::take(&mut self.slots)
    }
}
