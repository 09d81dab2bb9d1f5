use proptest::prelude::*;
use wordrel_dsl::{format_atom_expr, parse_atoms, AtomExpr};

fn node_strategy() -> impl Strategy<Value = AtomExpr> {
    (
        prop::sample::select(vec!["WordNode", "WordInstanceNode", "SemeNode", "ConceptNode"]),
        "[a-z@_#\\- \"\\\\]{0,12}",
    )
        .prop_map(|(t, name)| AtomExpr::node(t, name))
}

fn expr_strategy() -> impl Strategy<Value = AtomExpr> {
    node_strategy().prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(vec!["ListLink", "EvaluationLink", "InheritanceLink"]),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(t, outgoing)| AtomExpr::link(t, outgoing))
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn formatted_exprs_parse_back(exprs in prop::collection::vec(expr_strategy(), 1..4)) {
        let text = exprs
            .iter()
            .map(format_atom_expr)
            .collect::<Vec<_>>()
            .join("\n\n");
        let parsed = parse_atoms(&text).unwrap();
        prop_assert_eq!(parsed, exprs);
    }
}
