mod prefix_id;


pub(crate) mod af;
pub mod errors;
pub mod pfx_record;

pub(crate) use af::AddressFamily;
pub(crate) use prefix_id::PrefixId;

pub use af::{IPv4, IPv6};
pub use errors::PfxStoreError;
pub use pfx_record::{OriginValidity, PfxRecord, SourceId};
