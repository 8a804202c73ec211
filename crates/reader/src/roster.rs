//! Insertion-ordered dedup and accrual primitives.
//!
//! Emission order is normative everywhere a roster is returned: first-seen
//! order under the scan "debates in input order, side A before side B,
//! arguments in list order". Membership is hash-backed; the order vector is
//! the single source of output ordering.

use common::types::{Address, Amount, ParticipantRecord};
use std::collections::{HashMap, HashSet};

/// First-seen-ordered set of addresses with an optional admission cap.
///
/// Once the cap is reached no further address is admitted; inserting an
/// already-present address is always a no-op.
#[derive(Debug, Default)]
pub struct AddressSet {
    order: Vec<Address>,
    seen: HashSet<Address>,
    cap: Option<usize>,
}

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            order: Vec::new(),
            seen: HashSet::new(),
            cap: Some(cap),
        }
    }

    /// Returns true when the address was newly admitted.
    pub fn insert(&mut self, addr: Address) -> bool {
        if self.seen.contains(&addr) {
            return false;
        }
        if self.cap.is_some_and(|cap| self.order.len() >= cap) {
            return false;
        }
        self.seen.insert(addr);
        self.order.push(addr);
        true
    }

    pub fn contains(&self, addr: &Address) -> bool {
        self.seen.contains(addr)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cap.is_some_and(|cap| self.order.len() >= cap)
    }

    pub fn into_vec(self) -> Vec<Address> {
        self.order
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    arguments_written: u64,
    amount_staked: Amount,
}

/// Per-author accumulator with an admission cap on *new* authors only.
///
/// Once `cap` distinct authors are admitted, unseen authors are dropped but
/// admitted ones keep accruing counts and stake for the rest of the scan.
/// An author is therefore either fully tracked from its first appearance or
/// absent entirely.
#[derive(Debug)]
pub struct ParticipantLedger {
    order: Vec<Address>,
    slots: HashMap<Address, Slot>,
    cap: usize,
}

impl ParticipantLedger {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            order: Vec::new(),
            slots: HashMap::new(),
            cap,
        }
    }

    pub fn record(&mut self, author: Address, amount: Amount) {
        if let Some(slot) = self.slots.get_mut(&author) {
            slot.arguments_written += 1;
            slot.amount_staked += amount;
            return;
        }
        if self.order.len() >= self.cap {
            return;
        }
        self.order.push(author);
        self.slots.insert(
            author,
            Slot {
                arguments_written: 1,
                amount_staked: amount,
            },
        );
    }

    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// Rows in first-seen order.
    pub fn into_records(self) -> Vec<ParticipantRecord> {
        let slots = self.slots;
        self.order
            .into_iter()
            .map(|address| {
                let slot = slots.get(&address).copied().unwrap_or_default();
                ParticipantRecord {
                    address,
                    arguments_written: slot.arguments_written,
                    amount_staked: slot.amount_staked,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        let mut bytes = [0_u8; 20];
        bytes[19] = n;
        Address::from_bytes(bytes)
    }

    #[test]
    fn test_address_set_preserves_first_seen_order() {
        let mut set = AddressSet::new();
        assert!(set.insert(addr(3)));
        assert!(set.insert(addr(1)));
        assert!(!set.insert(addr(3)));
        assert!(set.insert(addr(2)));
        assert_eq!(set.into_vec(), vec![addr(3), addr(1), addr(2)]);
    }

    #[test]
    fn test_address_set_cap_blocks_new_entries() {
        let mut set = AddressSet::with_cap(2);
        assert!(set.insert(addr(1)));
        assert!(set.insert(addr(2)));
        assert!(set.is_full());
        assert!(!set.insert(addr(3)));
        // Re-inserting an admitted address is still a no-op, not an error.
        assert!(!set.insert(addr(1)));
        assert_eq!(set.into_vec(), vec![addr(1), addr(2)]);
    }

    #[test]
    fn test_address_set_zero_cap_admits_nothing() {
        let mut set = AddressSet::with_cap(0);
        assert!(set.is_full());
        assert!(!set.insert(addr(1)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_ledger_accrues_across_repeat_appearances() {
        let mut ledger = ParticipantLedger::with_cap(10);
        ledger.record(addr(1), 5);
        ledger.record(addr(2), 3);
        ledger.record(addr(1), 2);
        let rows = ledger.into_records();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].address, addr(1));
        assert_eq!(rows[0].arguments_written, 2);
        assert_eq!(rows[0].amount_staked, 7);
        assert_eq!(rows[1].address, addr(2));
        assert_eq!(rows[1].arguments_written, 1);
        assert_eq!(rows[1].amount_staked, 3);
    }

    #[test]
    fn test_ledger_cap_is_asymmetric() {
        let mut ledger = ParticipantLedger::with_cap(1);
        ledger.record(addr(1), 5);
        // Roster is full: a new author is dropped entirely...
        ledger.record(addr(2), 100);
        // ...but the admitted author keeps accruing.
        ledger.record(addr(1), 4);
        assert_eq!(ledger.distinct(), 1);
        let rows = ledger.into_records();
        assert_eq!(rows, vec![ParticipantRecord {
            address: addr(1),
            arguments_written: 2,
            amount_staked: 9,
        }]);
    }
}
