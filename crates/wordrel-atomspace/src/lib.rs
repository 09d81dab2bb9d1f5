//! AtomSpace: arena-backed typed hypergraph store for dependency parses
//!
//! Every element is an [`Atom`]: either a named **node** or a **link** over an
//! ordered list of other atoms. Atoms live in an append-only arena and are
//! addressed by [`Handle`] (a `u32` index), never by pointer.
//!
//! Key properties:
//! 1. **Deduplication**: adding an equal node (same type + name) or link (same
//!    type + outgoing sequence) returns the existing handle.
//! 2. **Incoming index**: every atom knows which links point at it, in
//!    creation order; the query layer chases `LemmaLink`/`InheritanceLink`
//!    conventions through it.
//! 3. **Type index**: Roaring bitmaps of handles per [`AtomType`], used by the
//!    pattern matcher to enumerate candidate links.
//! 4. **Snapshots**: `to_bytes`/`from_bytes` (`WRAS` header + bincode payload);
//!    indexes are rebuilt on load.
//!
//! ## Module Organization
//!
//! - `atom_type`: the closed element-type vocabulary shared with the parser
//! - `follow`: binary-link chasing helpers
//! - `text`: import from / render to atom notation (`wordrel-dsl`)

pub mod atom_type;
mod follow;
mod text;

use anyhow::Result;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub use atom_type::{AtomKind, AtomType, UnknownAtomType};

// ============================================================================
// Handles and atoms
// ============================================================================

/// Opaque reference to one atom in one `AtomSpace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Handle(u32);

impl Handle {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A graph element. Immutable once added.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Atom {
    Node { atom_type: AtomType, name: String },
    Link { atom_type: AtomType, outgoing: Vec<Handle> },
}

impl Atom {
    pub fn atom_type(&self) -> AtomType {
        match self {
            Atom::Node { atom_type, .. } | Atom::Link { atom_type, .. } => *atom_type,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Atom::Node { .. })
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Atom::Link { .. })
    }

    /// Node name; `None` for links.
    pub fn name(&self) -> Option<&str> {
        match self {
            Atom::Node { name, .. } => Some(name),
            Atom::Link { .. } => None,
        }
    }

    /// Outgoing set; empty for nodes.
    pub fn outgoing(&self) -> &[Handle] {
        match self {
            Atom::Node { .. } => &[],
            Atom::Link { outgoing, .. } => outgoing,
        }
    }

    pub fn arity(&self) -> usize {
        self.outgoing().len()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AtomSpaceError {
    /// A handle did not name any atom in this space.
    #[error("handle {0} does not resolve to an atom")]
    UnresolvedHandle(Handle),

    /// A node type was used to build a link, or vice versa.
    #[error("`{atom_type}` is a {actual:?} type, cannot build a {expected:?}")]
    KindMismatch {
        atom_type: AtomType,
        expected: AtomKind,
        actual: AtomKind,
    },

    #[error(transparent)]
    UnknownType(#[from] UnknownAtomType),

    #[error(transparent)]
    Parse(#[from] wordrel_dsl::AtomParseError),
}

// ============================================================================
// AtomSpace
// ============================================================================

/// Append-only atom store.
#[derive(Debug, Default)]
pub struct AtomSpace {
    /// Arena: handle -> atom
    atoms: Vec<Atom>,
    /// Node dedup index: (type, name) -> handle
    node_index: HashMap<(AtomType, String), Handle>,
    /// Link dedup index: (type, outgoing) -> handle
    link_index: HashMap<(AtomType, Vec<Handle>), Handle>,
    /// Incoming index: handle -> links containing it (creation order, no dups)
    incoming: Vec<Vec<Handle>>,
    /// Type index: type -> handles
    type_index: HashMap<AtomType, RoaringBitmap>,
}

impl AtomSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of atoms stored.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Add a node, or return the existing one with the same type and name.
    pub fn add_node(&mut self, atom_type: AtomType, name: &str) -> Result<Handle, AtomSpaceError> {
        expect_kind(atom_type, AtomKind::Node)?;
        if let Some(&h) = self.node_index.get(&(atom_type, name.to_string())) {
            return Ok(h);
        }
        let h = self.push(Atom::Node {
            atom_type,
            name: name.to_string(),
        });
        self.node_index.insert((atom_type, name.to_string()), h);
        Ok(h)
    }

    /// Add a link, or return the existing one with the same type and outgoing set.
    pub fn add_link(
        &mut self,
        atom_type: AtomType,
        outgoing: Vec<Handle>,
    ) -> Result<Handle, AtomSpaceError> {
        expect_kind(atom_type, AtomKind::Link)?;
        for &h in &outgoing {
            self.resolve(h)?;
        }
        let key = (atom_type, outgoing);
        if let Some(&h) = self.link_index.get(&key) {
            return Ok(h);
        }
        let (atom_type, outgoing) = key;
        let h = self.push(Atom::Link {
            atom_type,
            outgoing: outgoing.clone(),
        });
        self.link_index.insert((atom_type, outgoing), h);
        Ok(h)
    }

    /// Look up an existing node without inserting.
    pub fn get_node(&self, atom_type: AtomType, name: &str) -> Option<Handle> {
        self.node_index.get(&(atom_type, name.to_string())).copied()
    }

    /// Look up an existing link without inserting.
    pub fn get_link(&self, atom_type: AtomType, outgoing: &[Handle]) -> Option<Handle> {
        self.link_index
            .get(&(atom_type, outgoing.to_vec()))
            .copied()
    }

    /// Resolve a handle. An unknown handle is a caller bug: propagate it.
    pub fn resolve(&self, h: Handle) -> Result<&Atom, AtomSpaceError> {
        self.atoms
            .get(h.0 as usize)
            .ok_or(AtomSpaceError::UnresolvedHandle(h))
    }

    pub fn contains(&self, h: Handle) -> bool {
        (h.0 as usize) < self.atoms.len()
    }

    pub fn atom_type(&self, h: Handle) -> Result<AtomType, AtomSpaceError> {
        Ok(self.resolve(h)?.atom_type())
    }

    /// Node name, or `None` if the atom is a link.
    pub fn node_name(&self, h: Handle) -> Result<Option<&str>, AtomSpaceError> {
        Ok(self.resolve(h)?.name())
    }

    pub fn outgoing(&self, h: Handle) -> Result<&[Handle], AtomSpaceError> {
        Ok(self.resolve(h)?.outgoing())
    }

    /// Links whose outgoing set contains `h`, in creation order.
    pub fn incoming(&self, h: Handle) -> Result<&[Handle], AtomSpaceError> {
        self.resolve(h)?;
        Ok(self
            .incoming
            .get(h.0 as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[]))
    }

    /// All atoms of a given type.
    pub fn atoms_of_type(&self, atom_type: AtomType) -> RoaringBitmap {
        self.type_index
            .get(&atom_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of atoms of a given type.
    pub fn type_count(&self, atom_type: AtomType) -> usize {
        self.type_index
            .get(&atom_type)
            .map(|ids| ids.len() as usize)
            .unwrap_or(0)
    }

    /// Iterate `(handle, atom)` in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Atom)> {
        self.atoms
            .iter()
            .enumerate()
            .map(|(i, a)| (Handle(i as u32), a))
    }

    fn push(&mut self, atom: Atom) -> Handle {
        let h = Handle(self.atoms.len() as u32);
        self.index_atom(h, &atom);
        self.atoms.push(atom);
        h
    }

    fn index_atom(&mut self, h: Handle, atom: &Atom) {
        self.type_index
            .entry(atom.atom_type())
            .or_insert_with(RoaringBitmap::new)
            .insert(h.0);

        if self.incoming.len() <= h.0 as usize {
            self.incoming.resize(h.0 as usize + 1, Vec::new());
        }
        for &target in atom.outgoing() {
            let list = &mut self.incoming[target.0 as usize];
            // A link may mention the same atom twice; index it once.
            if list.last() != Some(&h) {
                list.push(h);
            }
        }
    }

    /// Rebuild every index from the arena (after deserialization).
    fn rebuild_indexes(&mut self) {
        self.node_index.clear();
        self.link_index.clear();
        self.incoming.clear();
        self.type_index.clear();

        let atoms = std::mem::take(&mut self.atoms);
        for (i, atom) in atoms.iter().enumerate() {
            let h = Handle(i as u32);
            self.index_atom(h, atom);
            match atom {
                Atom::Node { atom_type, name } => {
                    self.node_index.insert((*atom_type, name.clone()), h);
                }
                Atom::Link {
                    atom_type,
                    outgoing,
                } => {
                    self.link_index.insert((*atom_type, outgoing.clone()), h);
                }
            }
        }
        self.atoms = atoms;
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serialize to binary snapshot format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let body = bincode::serialize(&self.atoms)?;

        let mut result = Vec::with_capacity(16 + body.len());
        // Header: magic number + version
        result.extend_from_slice(SNAPSHOT_MAGIC);
        result.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        result.extend_from_slice(&(body.len() as u64).to_le_bytes());
        result.extend_from_slice(&body);
        Ok(result)
    }

    /// Deserialize from binary snapshot format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 16 || &bytes[0..4] != SNAPSHOT_MAGIC {
            return Err(anyhow::anyhow!("Invalid AtomSpace snapshot"));
        }

        let version = u32::from_le_bytes(bytes[4..8].try_into()?);
        if version != SNAPSHOT_VERSION {
            return Err(anyhow::anyhow!(
                "Unsupported AtomSpace snapshot version: {}",
                version
            ));
        }

        let body_len = u64::from_le_bytes(bytes[8..16].try_into()?) as usize;
        let body = bytes
            .get(16..16usize.saturating_add(body_len))
            .ok_or_else(|| anyhow::anyhow!("Truncated AtomSpace snapshot"))?;
        let atoms: Vec<Atom> = bincode::deserialize(body)?;

        // Links may only point backwards in the arena.
        for (i, atom) in atoms.iter().enumerate() {
            if atom.atom_type().kind() != kind_of(atom) {
                return Err(anyhow::anyhow!(
                    "Corrupt AtomSpace snapshot: atom #{i} has mismatched kind"
                ));
            }
            if let Some(bad) = atom.outgoing().iter().find(|h| h.0 as usize >= i) {
                return Err(anyhow::anyhow!(
                    "Corrupt AtomSpace snapshot: atom #{i} refers forward to {bad}"
                ));
            }
        }

        let mut space = Self {
            atoms,
            ..Self::default()
        };
        space.rebuild_indexes();
        Ok(space)
    }
}

pub const SNAPSHOT_MAGIC: &[u8; 4] = b"WRAS";
pub const SNAPSHOT_VERSION: u32 = 1;

fn kind_of(atom: &Atom) -> AtomKind {
    if atom.is_node() {
        AtomKind::Node
    } else {
        AtomKind::Link
    }
}

fn expect_kind(atom_type: AtomType, expected: AtomKind) -> Result<(), AtomSpaceError> {
    let actual = atom_type.kind();
    if actual != expected {
        return Err(AtomSpaceError::KindMismatch {
            atom_type,
            expected,
            actual,
        });
    }
    Ok(())
}
