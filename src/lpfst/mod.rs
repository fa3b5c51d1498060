//! A longest-prefix-first search tree over IP prefixes.
//!
//! The tree is a binary search trie over prefix bits, augmented with a heap
//! ordering that keeps longer prefixes closer to the root: a parent's
//! prefix length is never smaller than a child's. A validation walk along
//! an announcement's bits therefore meets the most specific covering
//! authorization first and works outward to less specific candidates,
//! which is what keeps origin validation short.
//!
//! Branching at depth `d` is on bit `d` of a payload's own address, so
//! every payload sits on the path spelled by its own bits. Rotations move
//! payloads between nodes, never nodes between links.

use inetnum::asn::Asn;

use crate::types::{
    AddressFamily, OriginValidity, PfxStoreError, PrefixId, SourceId,
};

pub(crate) mod record_list;


use record_list::{DataElem, RecordList};

//------------ Node ----------------------------------------------------------

#[derive(Debug)]
struct Node<AF: AddressFamily> {
    prefix: PrefixId<AF>,
    records: RecordList,
    left: Option<Box<Node<AF>>>,
    right: Option<Box<Node<AF>>>,
}

impl<AF: AddressFamily> Node<AF> {
    fn new(prefix: PrefixId<AF>, elem: DataElem) -> Self {
        Node {
            prefix,
            records: RecordList::new(elem),
            left: None,
            right: None,
        }
    }

    fn child(&self, right: bool) -> &Option<Box<Node<AF>>> {
        if right {
            &self.right
        } else {
            &self.left
        }
    }

    fn child_mut(&mut self, right: bool) -> &mut Option<Box<Node<AF>>> {
        if right {
            &mut self.right
        } else {
            &mut self.left
        }
    }
}

//------------ Lpfst ---------------------------------------------------------

/// One tree, for one address family.
#[derive(Debug)]
pub(crate) struct Lpfst<AF: AddressFamily> {
    root: Option<Box<Node<AF>>>,
}

impl<AF: AddressFamily> Lpfst<AF> {
    pub(crate) fn new() -> Self {
        Lpfst { root: None }
    }

    /// Store `elem` under `pfx`, creating a node if the prefix is new to
    /// the tree.
    pub(crate) fn insert(
        &mut self,
        pfx: PrefixId<AF>,
        elem: DataElem,
    ) -> Result<(), PfxStoreError> {
        match self.root.as_deref_mut() {
            Some(root) => Self::insert_rec(root, pfx, elem, 0),
            None => {
                self.root = Some(Box::new(Node::new(pfx, elem)));
                Ok(())
            }
        }
    }

    // Exact search along the query's own bits. A node shorter than the
    // query ends the search: everything below it is shorter still, so an
    // exact match cannot exist and the new node belongs in this subtree.
    fn insert_rec(
        node: &mut Node<AF>,
        pfx: PrefixId<AF>,
        elem: DataElem,
        level: u8,
    ) -> Result<(), PfxStoreError> {
        if node.prefix == pfx {
            if node.records.find(&elem).is_some() {
                return Err(PfxStoreError::DuplicateRecord);
            }
            node.records.append(elem);
            return Ok(());
        }
        if pfx.len() <= node.prefix.len() {
            if let Some(child) =
                node.child_mut(pfx.is_bit_set(level)).as_deref_mut()
            {
                return Self::insert_rec(
                    child,
                    pfx,
                    elem,
                    level.saturating_add(1),
                );
            }
        }
        Self::attach(node, Box::new(Node::new(pfx, elem)), level);
        Ok(())
    }

    // Top-down rotation: the longer prefix wins each node on the way down
    // and the losing payload keeps descending along its own bits until an
    // empty link takes it. Only payloads move, so the links around the
    // rotation stay valid as they are.
    fn attach(node: &mut Node<AF>, mut new: Box<Node<AF>>, level: u8) {
        if new.prefix.len() > node.prefix.len() {
            std::mem::swap(&mut node.prefix, &mut new.prefix);
            std::mem::swap(&mut node.records, &mut new.records);
        }
        let link = node.child_mut(new.prefix.is_bit_set(level));
        if let Some(child) = link.as_deref_mut() {
            Self::attach(child, new, level.saturating_add(1));
        } else {
            *link = Some(new);
        }
    }

    /// Remove the elem stored under `pfx`. Nodes whose record list empties
    /// are removed from the tree.
    pub(crate) fn remove(
        &mut self,
        pfx: PrefixId<AF>,
        elem: &DataElem,
    ) -> Result<(), PfxStoreError> {
        Self::remove_rec(&mut self.root, pfx, elem, 0)
    }

    fn remove_rec(
        link: &mut Option<Box<Node<AF>>>,
        pfx: PrefixId<AF>,
        elem: &DataElem,
        level: u8,
    ) -> Result<(), PfxStoreError> {
        let Some(node) = link.as_deref_mut() else {
            return Err(PfxStoreError::RecordNotFound);
        };
        if node.prefix == pfx {
            let index = node
                .records
                .find(elem)
                .ok_or(PfxStoreError::RecordNotFound)?;
            node.records.erase(index);
            if node.records.is_empty() {
                Self::pull_up(link);
            }
            return Ok(());
        }
        if pfx.len() > node.prefix.len() {
            return Err(PfxStoreError::RecordNotFound);
        }
        Self::remove_rec(
            node.child_mut(pfx.is_bit_set(level)),
            pfx,
            elem,
            level.saturating_add(1),
        )
    }

    // Remove the payload at `link` and fill the hole from below. A leaf is
    // unlinked; an interior hole takes the payload of the child with the
    // longer prefix, keeping the heap ordering, and the hole moves into
    // that child until it reaches a leaf.
    fn pull_up(link: &mut Option<Box<Node<AF>>>) {
        debug_assert!(link
            .as_deref()
            .is_none_or(|n| n.records.is_empty()));
        if link
            .as_deref()
            .is_some_and(|n| n.left.is_none() && n.right.is_none())
        {
            *link = None;
            return;
        }
        let Some(node) = link.as_deref_mut() else {
            return;
        };
        let from_right = match (node.left.as_deref(), node.right.as_deref())
        {
            (Some(left), Some(right)) => {
                right.prefix.len() > left.prefix.len()
            }
            (left, _) => left.is_none(),
        };
        let Node {
            prefix,
            records,
            left,
            right,
        } = &mut *node;
        let donor = if from_right { right } else { left };
        if let Some(child) = donor.as_deref_mut() {
            *prefix = child.prefix;
            *records = std::mem::take(&mut child.records);
        }
        Self::pull_up(donor);
    }

    /// Walk the tree for the announcement `(asn, pfx)`, where the length
    /// of `pfx` is the announced prefix length.
    pub(crate) fn validate(
        &self,
        asn: Asn,
        pfx: PrefixId<AF>,
    ) -> OriginValidity {
        let mut level = 0;
        let mut node =
            match Self::lookup_covering(self.root.as_deref(), pfx, &mut level)
            {
                Some(node) => node,
                None => return OriginValidity::NotFound,
            };
        loop {
            if node.records.any_covers(asn, pfx.len()) {
                return OriginValidity::Valid;
            }
            // Covered, but not authorized by this node. Any less specific
            // covering prefix lives further down the announcement's path.
            let next = node.child(pfx.is_bit_set(level)).as_deref();
            level = level.saturating_add(1);
            node = match Self::lookup_covering(next, pfx, &mut level) {
                Some(node) => node,
                None => return OriginValidity::Invalid,
            };
        }
    }

    // The first node, walking from `node` along the query's bits, whose
    // prefix covers the query. With longer prefixes closer to the root
    // that is also the longest cover on this walk. `level` tracks the
    // depth of the returned node.
    fn lookup_covering<'a>(
        mut node: Option<&'a Node<AF>>,
        pfx: PrefixId<AF>,
        level: &mut u8,
    ) -> Option<&'a Node<AF>> {
        while let Some(n) = node {
            if n.prefix.covers(pfx) {
                return Some(n);
            }
            node = n.child(pfx.is_bit_set(*level)).as_deref();
            *level = level.saturating_add(1);
        }
        None
    }

    /// Remove every elem tagged with `source`, handing each one together
    /// with its prefix to `f`. Nodes that empty are removed on the spot.
    pub(crate) fn purge_source(
        &mut self,
        source: SourceId,
        f: &mut impl FnMut(PrefixId<AF>, DataElem),
    ) {
        Self::purge_rec(&mut self.root, source, f);
    }

    fn purge_rec(
        link: &mut Option<Box<Node<AF>>>,
        source: SourceId,
        f: &mut impl FnMut(PrefixId<AF>, DataElem),
    ) {
        loop {
            let Some(node) = link.as_deref_mut() else {
                return;
            };
            let prefix = node.prefix;
            node.records.drain_source(source, &mut |elem| f(prefix, elem));
            if !node.records.is_empty() {
                break;
            }
            // Removing the node promotes a payload from below into this
            // position; that payload has not been scanned yet, so the
            // position must be examined again before any child is.
            Self::pull_up(link);
        }
        let Some(node) = link.as_deref_mut() else {
            return;
        };
        Self::purge_rec(&mut node.left, source, f);
        Self::purge_rec(&mut node.right, source, f);
    }

    /// Empty the tree, handing every stored elem to `f`.
    pub(crate) fn drain(&mut self, mut f: impl FnMut(PrefixId<AF>, DataElem)) {
        while let Some(node) = self.root.as_deref_mut() {
            let prefix = node.prefix;
            for elem in node.records.take() {
                f(prefix, elem);
            }
            Self::pull_up(&mut self.root);
        }
    }

    /// Visit every stored elem, in no particular order.
    pub(crate) fn for_each(
        &self,
        mut f: impl FnMut(PrefixId<AF>, DataElem),
    ) {
        Self::walk(self.root.as_deref(), &mut f);
    }

    fn walk(
        node: Option<&Node<AF>>,
        f: &mut impl FnMut(PrefixId<AF>, DataElem),
    ) {
        let Some(node) = node else {
            return;
        };
        for elem in node.records.iter() {
            f(node.prefix, *elem);
        }
        Self::walk(node.left.as_deref(), f);
        Self::walk(node.right.as_deref(), f);
    }
}
