use std::fmt;

use inetnum::addr::Prefix;
use inetnum::asn::Asn;

use crate::types::{AddressFamily, PrefixId};

//------------ SourceId ------------------------------------------------------

/// Identifies the upstream feed a record arrived from.
///
/// The store only ever compares source ids; their numbering scheme is owned
/// by the caller, typically one id per RTR session. A whole source can be
/// withdrawn as a unit when its session drops.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SourceId(u32);

impl From<u32> for SourceId {
    fn from(value: u32) -> Self {
        SourceId(value)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source {}", self.0)
    }
}

//------------ PfxRecord -----------------------------------------------------

/// One Route Origin Authorization as fed into the store.
///
/// The length of `prefix` is the minimum length of the authorization;
/// `max_len` bounds how specific an announcement may be while still being
/// authorized. The caller guarantees `prefix.len() <= max_len <= width` and
/// that no host bits are set; the store does not revalidate this.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PfxRecord {
    pub prefix: Prefix,
    pub asn: Asn,
    pub max_len: u8,
    pub source: SourceId,
}

impl PfxRecord {
    pub fn new(prefix: Prefix, asn: Asn, max_len: u8, source: SourceId) -> Self {
        Self {
            prefix,
            asn,
            max_len,
            source,
        }
    }

    pub(crate) fn from_parts<AF: AddressFamily>(
        prefix: PrefixId<AF>,
        asn: Asn,
        max_len: u8,
        source: SourceId,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            asn,
            max_len,
            source,
        }
    }
}

impl fmt::Display for PfxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {} ({})",
            self.prefix, self.max_len, self.asn, self.source
        )
    }
}

//------------ OriginValidity ------------------------------------------------

/// The outcome of validating one announcement against the stored ROAs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OriginValidity {
    /// A covering ROA authorizes the announced origin up to at least the
    /// announced length.
    Valid,
    /// At least one ROA covers the announced prefix, but none authorizes
    /// this origin at this length.
    Invalid,
    /// No stored ROA covers the announced prefix.
    NotFound,
}

impl fmt::Display for OriginValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginValidity::Valid => write!(f, "valid"),
            OriginValidity::Invalid => write!(f, "invalid"),
            OriginValidity::NotFound => write!(f, "not-found"),
        }
    }
}
