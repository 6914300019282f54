//! The encoder's dictionary, a ternary search trie.
//!
//! Every node holds one byte and branches three ways: to the `left` for smaller bytes at the same
//! position, to the `right` for larger ones, and to the `mid` for the byte following it. A node
//! optionally carries the code of the sequence ending there. This gives longest prefix queries in
//! time proportional to the sequence length, independent of the number of entries.
//!
//! Nodes live in one arena and link to each other by index. Resetting the dictionary to its seeds
//! truncates the arena instead of walking the structure.
use crate::{Code, ALPHABET};

pub(crate) type NodeId = u32;

/// A map from non-empty byte sequences to codes.
#[derive(Clone, Debug, Default)]
pub struct Tst {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    /// The number of sequences with a code.
    len: usize,
    /// Arena length right after seeding, `reset` truncates back to it.
    seed_nodes: usize,
    /// Number of sequences right after seeding.
    seed_len: usize,
}

#[derive(Clone, Copy, Debug)]
struct Node {
    byte: u8,
    code: Option<Code>,
    left: Option<NodeId>,
    mid: Option<NodeId>,
    right: Option<NodeId>,
}

/// Where a node is linked from.
#[derive(Clone, Copy)]
enum Slot {
    Root,
    Left(NodeId),
    Mid(NodeId),
    Right(NodeId),
}

impl Tst {
    /// An empty trie.
    pub fn new() -> Self {
        Tst::default()
    }

    /// A trie holding every single byte sequence, mapped to the byte value itself.
    pub fn seeded() -> Self {
        let mut tst = Tst {
            nodes: Vec::with_capacity(crate::MAX_ENTRIES),
            ..Tst::default()
        };
        // Bytes are inserted median first so the top level is a balanced tree, not a list.
        tst.seed_range(0, ALPHABET);
        tst.seed_nodes = tst.nodes.len();
        tst.seed_len = tst.len;
        tst
    }

    fn seed_range(&mut self, low: usize, high: usize) {
        if low >= high {
            return;
        }
        let mid = low + (high - low) / 2;
        self.insert(&[mid as u8], mid as Code);
        self.seed_range(low, mid);
        self.seed_range(mid + 1, high);
    }

    /// The number of sequences with an associated code.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop everything inserted after seeding.
    pub fn reset(&mut self) {
        self.nodes.truncate(self.seed_nodes);
        // Seeds only link to later nodes through their middle child.
        for node in &mut self.nodes {
            node.mid = None;
        }
        if self.seed_nodes == 0 {
            self.root = None;
        }
        self.len = self.seed_len;
    }

    /// Associate `key` with `code`, replacing any previous code of `key`.
    ///
    /// # Panics
    ///
    /// When `key` is empty.
    pub fn insert(&mut self, key: &[u8], code: Code) {
        assert!(!key.is_empty(), "the empty sequence can not be inserted");
        self.insert_at(Slot::Root, key, code);
    }

    /// Exact lookup of a sequence.
    pub fn get(&self, key: &[u8]) -> Option<Code> {
        self.node_of(key).and_then(|id| self.node(id).code)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Find the longest prefix of `key` that has a code.
    ///
    /// Returns the length of that prefix and its code, or `None` if not even the first byte of
    /// `key` is in the trie.
    pub fn longest_prefix_of(&self, key: &[u8]) -> Option<(usize, Code)> {
        let mut found = None;
        let mut link = self.root;
        let mut depth = 0;
        while let (Some(id), Some(&byte)) = (link, key.get(depth)) {
            let node = self.node(id);
            if byte < node.byte {
                link = node.left;
            } else if byte > node.byte {
                link = node.right;
            } else {
                depth += 1;
                if let Some(code) = node.code {
                    found = Some((depth, code));
                }
                link = node.mid;
            }
        }
        found
    }

    /// The node of a single byte sequence, and its code.
    pub(crate) fn start(&self, byte: u8) -> Option<(NodeId, Code)> {
        let id = self.find(self.root, byte)?;
        Some((id, self.node(id).code?))
    }

    /// Extend the sequence ending at `node` by one byte, if the result has a code.
    pub(crate) fn successor(&self, node: NodeId, byte: u8) -> Option<(NodeId, Code)> {
        let id = self.find(self.node(node).mid, byte)?;
        Some((id, self.node(id).code?))
    }

    /// Insert the sequence ending at `node` extended by `byte`.
    pub(crate) fn append(&mut self, node: NodeId, byte: u8, code: Code) {
        self.insert_at(Slot::Mid(node), &[byte], code);
    }

    /// Search one level of the trie, following only left and right links.
    fn find(&self, mut link: Option<NodeId>, byte: u8) -> Option<NodeId> {
        while let Some(id) = link {
            let node = self.node(id);
            if byte < node.byte {
                link = node.left;
            } else if byte > node.byte {
                link = node.right;
            } else {
                return Some(id);
            }
        }
        None
    }

    fn node_of(&self, key: &[u8]) -> Option<NodeId> {
        let (&first, rest) = key.split_first()?;
        let mut id = self.find(self.root, first)?;
        for &byte in rest {
            id = self.find(self.node(id).mid, byte)?;
        }
        Some(id)
    }

    fn insert_at(&mut self, mut slot: Slot, key: &[u8], code: Code) {
        let mut depth = 0;
        loop {
            let byte = key[depth];
            let id = match self.link(slot) {
                Some(id) => id,
                None => {
                    let id = self.nodes.len() as NodeId;
                    self.nodes.push(Node::new(byte));
                    self.set_link(slot, id);
                    id
                }
            };

            let node = self.node(id);
            if byte < node.byte {
                slot = Slot::Left(id);
            } else if byte > node.byte {
                slot = Slot::Right(id);
            } else if depth + 1 < key.len() {
                depth += 1;
                slot = Slot::Mid(id);
            } else {
                let node = &mut self.nodes[id as usize];
                if node.code.replace(code).is_none() {
                    self.len += 1;
                }
                return;
            }
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    fn link(&self, slot: Slot) -> Option<NodeId> {
        match slot {
            Slot::Root => self.root,
            Slot::Left(id) => self.node(id).left,
            Slot::Mid(id) => self.node(id).mid,
            Slot::Right(id) => self.node(id).right,
        }
    }

    fn set_link(&mut self, slot: Slot, to: NodeId) {
        let link = match slot {
            Slot::Root => &mut self.root,
            Slot::Left(id) => &mut self.nodes[id as usize].left,
            Slot::Mid(id) => &mut self.nodes[id as usize].mid,
            Slot::Right(id) => &mut self.nodes[id as usize].right,
        };
        *link = Some(to);
    }
}

impl Node {
    fn new(byte: u8) -> Self {
        Node {
            byte,
            code: None,
            left: None,
            mid: None,
            right: None,
        }
    }
}
