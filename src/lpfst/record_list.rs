use inetnum::asn::Asn;

use crate::types::{PfxRecord, SourceId};

//------------ DataElem ------------------------------------------------------

// The stored form of an authorization. The prefix bits and the minimum
// length live on the node that owns the list, so an elem only carries what
// varies between authorizations for the same prefix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DataElem {
    pub asn: Asn,
    pub max_len: u8,
    pub source: SourceId,
}

impl From<&PfxRecord> for DataElem {
    fn from(record: &PfxRecord) -> Self {
        DataElem {
            asn: record.asn,
            max_len: record.max_len,
            source: record.source,
        }
    }
}

//------------ RecordList ----------------------------------------------------

// The authorizations attached to one node. Ordered, but the order carries
// no meaning; it is only kept stable so that lookups and walks observe the
// same sequence between mutations.
#[derive(Debug, Default)]
pub(crate) struct RecordList(Vec<DataElem>);

impl RecordList {
    pub(crate) fn new(elem: DataElem) -> Self {
        RecordList(vec![elem])
    }

    pub(crate) fn append(&mut self, elem: DataElem) {
        self.0.push(elem);
    }

    // First match on the whole (asn, max_len, source) triple.
    pub(crate) fn find(&self, elem: &DataElem) -> Option<usize> {
        self.0.iter().position(|e| e == elem)
    }

    // Remove at index, shifting the tail down. Relative order of the
    // remaining elems is preserved.
    pub(crate) fn erase(&mut self, index: usize) {
        self.0.remove(index);
    }

    /// Whether any elem authorizes `asn` to announce at `query_len`.
    ///
    /// AS0 authorizations never match: an AS0 ROA exists to state that a
    /// prefix should not be originated at all, so it can render an
    /// announcement invalid but never valid.
    pub(crate) fn any_covers(&self, asn: Asn, query_len: u8) -> bool {
        self.0.iter().any(|e| {
            e.asn != Asn::from_u32(0)
                && e.asn == asn
                && query_len <= e.max_len
        })
    }

    // Remove every elem tagged with `source`, front to back, handing each
    // removed elem to `f`. Equivalent to repeated `erase` at the matching
    // indices.
    pub(crate) fn drain_source(
        &mut self,
        source: SourceId,
        f: &mut impl FnMut(DataElem),
    ) {
        self.0.retain(|e| {
            if e.source == source {
                f(*e);
                false
            } else {
                true
            }
        });
    }

    pub(crate) fn take(&mut self) -> Vec<DataElem> {
        std::mem::take(&mut self.0)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, DataElem> {
        self.0.iter()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}
