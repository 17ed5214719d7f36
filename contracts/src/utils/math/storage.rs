//! Checked math on storage values that panics on overflow.
use alloy_primitives::U256;
use stylus_sdk::storage::StorageU256;

/// Add-and-store for [`StorageU256`] slots that must never wrap.
pub(crate) trait AddAssignChecked {
    /// Adds `rhs` to the stored value, panicking with `msg` on overflow.
    fn add_assign_checked(&mut self, rhs: U256, msg: &str);
}

impl AddAssignChecked for StorageU256 {
    fn add_assign_checked(&mut self, rhs: U256, msg: &str) {
        let updated = self.get().checked_add(rhs).expect(msg);
        self.set(updated);
    }
}

#[cfg(test)]
mod tests {
    use motsu::prelude::*;
    use stylus_sdk::{
        alloy_primitives::{Address, U256},
        prelude::*,
        storage::StorageU256,
    };

    use super::AddAssignChecked;

    #[storage]
    struct Accumulator {
        total: StorageU256,
    }

    #[public]
    impl Accumulator {
        fn add(&mut self, value: U256) {
            self.total.add_assign_checked(value, "should not overflow");
        }

        fn total(&self) -> U256 {
            self.total.get()
        }
    }

    unsafe impl TopLevelStorage for Accumulator {}

    #[motsu::test]
    fn accumulates_values(contract: Contract<Accumulator>, alice: Address) {
        contract.sender(alice).add(U256::from(3));
        contract.sender(alice).add(U256::from(39));
        assert_eq!(U256::from(42), contract.sender(alice).total());
    }
}
