//! Binary-link chasing.
//!
//! The parser encodes word-level facts as binary links hanging off a word
//! instance, e.g.
//!
//! ```text
//! (LemmaLink (WordInstanceNode "threw@e5649eb8") (WordNode "throw"))
//! (InheritanceLink (WordInstanceNode "what@1") (DefinedLinguisticConceptNode "what"))
//! ```
//!
//! These helpers walk the incoming index to find the far end of such links.

use crate::{AtomSpace, AtomSpaceError, AtomType, Handle};

impl AtomSpace {
    /// Far end of the first incoming binary `link_type` link that has `atom`
    /// in first position.
    ///
    /// Returns `Ok(None)` when no such link exists.
    pub fn follow_binary_link(
        &self,
        atom: Handle,
        link_type: AtomType,
    ) -> Result<Option<Handle>, AtomSpaceError> {
        for &link in self.incoming(atom)? {
            let l = self.resolve(link)?;
            if l.atom_type() != link_type {
                continue;
            }
            if let [first, second] = l.outgoing() {
                if *first == atom {
                    return Ok(Some(*second));
                }
            }
        }
        Ok(None)
    }

    /// True iff some incoming binary `link_type` link has an *other* endpoint
    /// (in either position) satisfying `pred`. Stops at the first hit.
    pub fn any_binary_link_peer<F>(
        &self,
        atom: Handle,
        link_type: AtomType,
        mut pred: F,
    ) -> Result<bool, AtomSpaceError>
    where
        F: FnMut(&AtomSpace, Handle) -> Result<bool, AtomSpaceError>,
    {
        for &link in self.incoming(atom)? {
            let l = self.resolve(link)?;
            if l.atom_type() != link_type {
                continue;
            }
            let [first, second] = l.outgoing() else {
                continue;
            };
            let peer = if *first == atom { *second } else { *first };
            if pred(self, peer)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
