use crate::types::AddressFamily;

//------------ PrefixId ------------------------------------------------------

// The type that identifies a node in the tree, and acts as the internal
// prefix type. It's cut to size for an AF, unlike the inetnum Prefix, as
// not to waste memory. We use the latter on the public API.

#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone)]
pub struct PrefixId<AF: AddressFamily> {
    bits: AF,
    len: u8,
}

impl<AF: AddressFamily> PrefixId<AF> {
    pub(crate) fn new(bits: AF, len: u8) -> Self {
        PrefixId { bits, len }
    }

    pub(crate) fn bits(&self) -> AF {
        self.bits
    }

    pub(crate) fn len(&self) -> u8 {
        self.len
    }

    /// Whether the bit at `position` of the underlying address is set.
    pub(crate) fn is_bit_set(&self, position: u8) -> bool {
        self.bits.is_bit_set(position)
    }

    /// Whether this prefix covers `other`: our length does not exceed the
    /// other's, and both share our first `len` bits.
    pub(crate) fn covers(&self, other: Self) -> bool {
        self.len <= other.len
            && self.bits.truncate_to_len(self.len)
                == other.bits.truncate_to_len(self.len)
    }
}

// There is no reasonable way for this to panic, PrefixId and inetnum's
// Prefix represent the same data in slightly different ways. The relaxed
// constructor keeps host bits as they were stored.
#[allow(clippy::unwrap_used)]
impl<AF: AddressFamily> From<PrefixId<AF>> for inetnum::addr::Prefix {
    fn from(value: PrefixId<AF>) -> Self {
        Self::new_relaxed(value.bits().into_ipaddr(), value.len()).unwrap()
    }
}

impl<AF: AddressFamily> std::fmt::Display for PrefixId<AF> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", AF::fmt_net(self.bits), self.len)
    }
}
