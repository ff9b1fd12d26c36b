// Vettable Item - a domain object paired with its review status

use super::status::VettingStatus;

/// Wraps one Source or Reading with a [`VettingStatus`].
///
/// The wrapped value is reachable through [`VettableItem::item`]; only the
/// status ever changes after construction.
#[derive(Debug, Clone)]
pub struct VettableItem<T> {
    status: VettingStatus,
    item: T,
}

impl<T> VettableItem<T> {
    pub fn new(item: T) -> Self {
        Self {
            status: VettingStatus::Unprocessed,
            item,
        }
    }

    pub fn status(&self) -> VettingStatus {
        self.status
    }

    pub fn is_processed(&self) -> bool {
        self.status.is_processed()
    }

    pub fn is_accepted(&self) -> bool {
        self.status == VettingStatus::Accepted
    }

    pub fn is_rejected(&self) -> bool {
        self.status == VettingStatus::Rejected
    }

    pub fn accept(&mut self) {
        self.status = VettingStatus::Accepted;
    }

    pub fn reject(&mut self) {
        self.status = VettingStatus::Rejected;
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    pub(crate) fn item_mut(&mut self) -> &mut T {
        &mut self.item
    }

    pub fn into_inner(self) -> T {
        self.item
    }
}
