use crate::models::HistoryItem;

/// Session history of completed generations, newest first. Unbounded and
/// never persisted.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    items: Vec<HistoryItem>,
    last_id: i64,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an id for an item created at `now_ms`. Ids are strictly
    /// increasing within the store even when two generations finish in the
    /// same millisecond.
    pub fn next_id(&mut self, now_ms: i64) -> i64 {
        let id = now_ms.max(self.last_id + 1);
        self.last_id = id;
        id
    }

    pub fn push(&mut self, item: HistoryItem) {
        self.last_id = self.last_id.max(item.id);
        self.items.insert(0, item);
    }

    pub fn get(&self, id: i64) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn latest(&self) -> Option<&HistoryItem> {
        self.items.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
