//! Import from and render to atom notation.

use crate::{Atom, AtomSpace, AtomSpaceError, AtomType, Handle};
use wordrel_dsl::{format_atom_expr, parse_atoms, AtomExpr};

impl AtomSpace {
    /// Parse atom notation and add every expression; returns the top-level
    /// handles in source order (duplicates included, as written).
    pub fn import_text(&mut self, text: &str) -> Result<Vec<Handle>, AtomSpaceError> {
        let exprs = parse_atoms(text)?;
        exprs.iter().map(|e| self.add_expr(e)).collect()
    }

    /// Add a parsed expression tree bottom-up.
    pub fn add_expr(&mut self, expr: &AtomExpr) -> Result<Handle, AtomSpaceError> {
        match expr {
            AtomExpr::Node { type_name, name } => {
                let atom_type: AtomType = type_name.parse()?;
                self.add_node(atom_type, name)
            }
            AtomExpr::Link {
                type_name,
                outgoing,
            } => {
                let atom_type: AtomType = type_name.parse()?;
                let children = outgoing
                    .iter()
                    .map(|c| self.add_expr(c))
                    .collect::<Result<Vec<_>, _>>()?;
                self.add_link(atom_type, children)
            }
        }
    }

    /// Expression tree for an atom.
    pub fn to_expr(&self, h: Handle) -> Result<AtomExpr, AtomSpaceError> {
        Ok(match self.resolve(h)? {
            Atom::Node { atom_type, name } => AtomExpr::node(atom_type.as_str(), name.clone()),
            Atom::Link {
                atom_type,
                outgoing,
            } => AtomExpr::link(
                atom_type.as_str(),
                outgoing
                    .iter()
                    .map(|&c| self.to_expr(c))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }

    /// Render an atom in atom notation.
    pub fn render(&self, h: Handle) -> Result<String, AtomSpaceError> {
        Ok(format_atom_expr(&self.to_expr(h)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::{AtomSpace, AtomSpaceError, AtomType};

    #[test]
    fn import_dedups_shared_nodes() {
        let mut space = AtomSpace::new();
        let roots = space
            .import_text(
                r#"
                (LemmaLink (WordInstanceNode "ate@1") (WordNode "eat"))
                (ReferenceLink (WordInstanceNode "ate@1") (WordNode "ate"))
                "#,
            )
            .unwrap();

        assert_eq!(roots.len(), 2);
        // ate@1, eat, LemmaLink, ate, ReferenceLink
        assert_eq!(space.len(), 5);
        let inst = space.get_node(AtomType::WordInstanceNode, "ate@1").unwrap();
        assert_eq!(space.incoming(inst).unwrap(), roots.as_slice());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut space = AtomSpace::new();
        let err = space.import_text(r#"(FrobNode "x")"#).unwrap_err();
        assert!(matches!(err, AtomSpaceError::UnknownType(_)));
    }

    #[test]
    fn render_matches_import() {
        let mut space = AtomSpace::new();
        let text = "(ListLink\n  (AnchorNode \"# QUERY SOLUTION\")\n  (SemeNode \"cake\"))";
        let roots = space.import_text(text).unwrap();
        assert_eq!(space.render(roots[0]).unwrap(), text);
    }
}
