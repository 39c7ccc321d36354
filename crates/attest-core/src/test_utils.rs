//! Test fixtures shared by the attest crates.

use crate::{Address, AttributeTypeId};

/// Whitehat attribute type used throughout the tests.
pub const WHITEHAT: AttributeTypeId = AttributeTypeId(8008);

/// Blackhat attribute type used throughout the tests.
pub const BLACKHAT: AttributeTypeId = AttributeTypeId(1337);

/// Deterministic test address.
pub fn test_address(seed: u8) -> Address {
    Address::from_seed(seed)
}

/// An address no test account owns.
pub fn unowned_address() -> Address {
    Address::from_seed(0x10)
}
