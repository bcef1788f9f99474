use std::fmt;
use std::ops::Shr;

/// size in bytes
pub type ByteSize = usize;

/// Address is the simulated base address of a block, or of an object slot inside a block.
/// Nothing is ever loaded from or stored to it: it only positions things when a frame is drawn
/// and shows up in logs.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, Hash, PartialOrd, Ord, PartialEq, Default)]
pub struct Address(u64);

/// Address >> shift (get a page-like index)
impl Shr<usize> for Address {
    type Output = u64;
    fn shr(self, shift: usize) -> u64 {
        self.0 >> shift
    }
}

impl Address {
    /// creates an Address from a raw value. Simulated addresses are always safe to create.
    pub const fn from_raw(raw: u64) -> Address {
        Address(raw)
    }

    /// returns the address `index` elements of `elem_size` bytes past this one
    pub const fn nth(self, elem_size: ByteSize, index: usize) -> Address {
        Address(self.0 + (elem_size * index) as u64)
    }
}

/// allows print Address as upper-case hex value
impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

/// allows Display format the Address (as lower-case hex value with 0x prefix)
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nth_element() {
        let base = Address::from_raw(0xb000);
        assert_eq!(base.nth(32, 0), base);
        assert_eq!(base.nth(32, 2), Address::from_raw(0xb040));
        assert_eq!(base.nth(8, 3), Address::from_raw(0xb018));
    }

    #[test]
    fn block_label() {
        // Frames label a block by its address with the low 12 bits dropped.
        assert_eq!(format!("{:X}", Address::from_raw(0xc000) >> 12), "C");
        assert_eq!(format!("{}", Address::from_raw(0xc000)), "0xc000");
        assert_eq!(format!("{:X}", Address::from_raw(0xc000)), "C000");
    }
}
