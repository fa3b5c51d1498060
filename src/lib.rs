//! An in-memory store of Route Origin Authorizations for BGP Route Origin
//! Validation.
//!
//! A [`PfxStore`] holds the ROAs fed to it by one or more upstream (RTR)
//! sources and answers, for any announcement `(origin, prefix)`, whether
//! that announcement is [`Valid`], [`Invalid`] or [`NotFound`] against the
//! stored set. Records come and go at runtime; validation runs concurrently
//! with those mutations behind a reader/writer lock.
//!
//! ```
//! use std::str::FromStr;
//! use inetnum::{addr::Prefix, asn::Asn};
//! use rov_store::{OriginValidity, PfxRecord, PfxStore, SourceId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PfxStore::new();
//! store.insert(PfxRecord::new(
//!     Prefix::from_str("192.0.2.0/24")?,
//!     Asn::from_u32(64512),
//!     24,
//!     SourceId::from(1),
//! ))?;
//!
//! assert_eq!(
//!     store.validate(Asn::from_u32(64512), Prefix::from_str("192.0.2.0/24")?),
//!     OriginValidity::Valid
//! );
//! assert_eq!(
//!     store.validate(Asn::from_u32(64666), Prefix::from_str("192.0.2.0/24")?),
//!     OriginValidity::Invalid
//! );
//! # Ok(())
//! # }
//! ```
//!
//! [`Valid`]: OriginValidity::Valid
//! [`Invalid`]: OriginValidity::Invalid
//! [`NotFound`]: OriginValidity::NotFound

mod lpfst;

pub mod store;
pub mod types;

pub use store::{PfxStore, UpdateCallback};
pub use types::{OriginValidity, PfxRecord, PfxStoreError, SourceId};
