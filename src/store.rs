use std::net::IpAddr;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use inetnum::addr::Prefix;
use inetnum::asn::Asn;
use log::{debug, trace};

use crate::lpfst::record_list::DataElem;
use crate::lpfst::Lpfst;
use crate::types::{
    AddressFamily, IPv4, IPv6, OriginValidity, PfxRecord, PfxStoreError,
    PrefixId, SourceId,
};

//------------ UpdateCallback ------------------------------------------------

/// The hook through which a store announces every effective change.
///
/// Called with the record involved and `true` for an addition, `false` for
/// a removal: once per successful [`PfxStore::insert`] and
/// [`PfxStore::remove`], once per record purged by
/// [`PfxStore::remove_source`] and once per record drained when the store
/// is cleared or dropped. Rejected duplicates and misses are not announced.
pub type UpdateCallback = Box<dyn Fn(&PfxRecord, bool) + Send + Sync>;

//------------ PfxStore ------------------------------------------------------

struct Tries {
    v4: Lpfst<IPv4>,
    v6: Lpfst<IPv6>,
}

/// An in-memory store of Route Origin Authorizations.
///
/// The store keeps one longest-prefix-first tree per address family behind
/// a single reader/writer lock, so any number of [`validate`] calls can
/// run concurrently while mutations serialize. All state is ephemeral: a
/// store starts empty and is rebuilt by its RTR sources after a restart.
///
/// [`validate`]: PfxStore::validate
pub struct PfxStore {
    tries: RwLock<Tries>,
    notifier: Option<UpdateCallback>,
}

impl PfxStore {
    /// Create an empty store without an update notifier.
    pub fn new() -> Self {
        Self::init(None)
    }

    /// Create an empty store that reports every effective change to
    /// `notifier`.
    ///
    /// For `insert` and `remove` the notifier runs after the write lock
    /// has been released. For `remove_source` and `clear` the lock is
    /// still held: those sweeps are atomic, so the notifier MUST NOT call
    /// back into the store or it will deadlock.
    pub fn with_notifier(notifier: UpdateCallback) -> Self {
        Self::init(Some(notifier))
    }

    fn init(notifier: Option<UpdateCallback>) -> Self {
        PfxStore {
            tries: RwLock::new(Tries {
                v4: Lpfst::new(),
                v6: Lpfst::new(),
            }),
            notifier,
        }
    }

    /// Add one record to the store.
    ///
    /// Returns [`PfxStoreError::DuplicateRecord`], without touching the
    /// store, if the exact record is already present. Records that share a
    /// prefix and minimum length but differ in origin, maximum length or
    /// source coexist on one node.
    pub fn insert(&self, record: PfxRecord) -> Result<(), PfxStoreError> {
        let res = {
            let mut tries = self.write_tries();
            match record.prefix.addr() {
                IpAddr::V4(addr) => tries.v4.insert(
                    PrefixId::new(addr.into(), record.prefix.len()),
                    DataElem::from(&record),
                ),
                IpAddr::V6(addr) => tries.v6.insert(
                    PrefixId::new(addr.into(), record.prefix.len()),
                    DataElem::from(&record),
                ),
            }
        };
        if res.is_ok() {
            trace!("inserted {}", record);
            self.notify(&record, true);
        }
        res
    }

    /// Remove one record from the store.
    ///
    /// Returns [`PfxStoreError::RecordNotFound`] if no stored record
    /// equals `record` on the whole five-tuple of prefix, minimum length,
    /// origin, maximum length and source.
    pub fn remove(&self, record: PfxRecord) -> Result<(), PfxStoreError> {
        let res = {
            let mut tries = self.write_tries();
            match record.prefix.addr() {
                IpAddr::V4(addr) => tries.v4.remove(
                    PrefixId::new(addr.into(), record.prefix.len()),
                    &DataElem::from(&record),
                ),
                IpAddr::V6(addr) => tries.v6.remove(
                    PrefixId::new(addr.into(), record.prefix.len()),
                    &DataElem::from(&record),
                ),
            }
        };
        if res.is_ok() {
            trace!("removed {}", record);
            self.notify(&record, false);
        }
        res
    }

    /// Validate the announcement of `announcement` by `asn`.
    ///
    /// The length of `announcement` is the announced prefix length. The
    /// result reflects all mutations that completed before this call.
    pub fn validate(
        &self,
        asn: Asn,
        announcement: Prefix,
    ) -> OriginValidity {
        let tries = self.read_tries();
        match announcement.addr() {
            IpAddr::V4(addr) => tries.v4.validate(
                asn,
                PrefixId::new(addr.into(), announcement.len()),
            ),
            IpAddr::V6(addr) => tries.v6.validate(
                asn,
                PrefixId::new(addr.into(), announcement.len()),
            ),
        }
    }

    /// Remove every record that arrived from `source`, e.g. because its
    /// RTR session ended.
    ///
    /// Each address family is swept under one write lock acquisition, and
    /// removal notifications for it are delivered while that lock is held.
    pub fn remove_source(&self, source: SourceId) {
        debug!("withdrawing all records from {}", source);
        {
            let mut tries = self.write_tries();
            tries.v4.purge_source(source, &mut |prefix, elem| {
                self.notify(&record_of(prefix, elem), false);
            });
        }
        {
            let mut tries = self.write_tries();
            tries.v6.purge_source(source, &mut |prefix, elem| {
                self.notify(&record_of(prefix, elem), false);
            });
        }
    }

    /// Empty the store, delivering one removal notification per stored
    /// record while the write lock is held. Dropping the store does the
    /// same.
    pub fn clear(&self) {
        let mut tries = self.write_tries();
        tries.v4.drain(|prefix, elem| {
            self.notify(&record_of(prefix, elem), false);
        });
        tries.v6.drain(|prefix, elem| {
            self.notify(&record_of(prefix, elem), false);
        });
    }

    /// A snapshot of every record in the store, in no particular order.
    pub fn records(&self) -> Vec<PfxRecord> {
        let tries = self.read_tries();
        let mut records = Vec::new();
        tries
            .v4
            .for_each(|prefix, elem| records.push(record_of(prefix, elem)));
        tries
            .v6
            .for_each(|prefix, elem| records.push(record_of(prefix, elem)));
        records
    }

    fn notify(&self, record: &PfxRecord, added: bool) {
        if let Some(notifier) = &self.notifier {
            notifier(record, added);
        }
    }

    fn read_tries(&self) -> RwLockReadGuard<'_, Tries> {
        match self.tries.read() {
            Ok(tries) => tries,
            // If the lock is poisoned we still work with the trees: no
            // mutation leaves them half-applied, so the value behind a
            // poisoned lock is as consistent as any other.
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_tries(&self) -> RwLockWriteGuard<'_, Tries> {
        match self.tries.write() {
            Ok(tries) => tries,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for PfxStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PfxStore {
    fn drop(&mut self) {
        self.clear();
    }
}

fn record_of<AF: AddressFamily>(
    prefix: PrefixId<AF>,
    elem: DataElem,
) -> PfxRecord {
    PfxRecord::from_parts(prefix, elem.asn, elem.max_len, elem.source)
}
