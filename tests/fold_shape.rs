use ipam_search::filter::{BoolOp, FilterNode, Interpretation, Operator, Value};
use ipam_search::grammar::Atom;
use ipam_search::profile::Entity;
use ipam_search::search::{Engine, Parsed};

fn compiled(engine: &Engine, entity: Entity, raw: &str) -> FilterNode {
    match engine.parse(entity, raw) {
        Parsed::Compiled { success: true, filter } => filter,
        other => panic!("{raw} did not compile: {other:?}"),
    }
}

fn word(engine: &Engine, entity: Entity, w: &str) -> FilterNode {
    engine.interpreter(entity).interpret(&Atom::Word(w.to_string()))
}

fn join(op: BoolOp, left: FilterNode, right: FilterNode) -> FilterNode {
    FilterNode::branch(op, left, right).with_interpretation(Interpretation::boolean(op))
}

#[test]
fn single_word_is_the_free_text_chain() {
    let engine = Engine::default();
    let filter = compiled(&engine, Entity::Prefix, "foo");
    let columns: Vec<&str> = filter
        .leaves()
        .into_iter()
        .map(|leaf| match leaf {
            FilterNode::Leaf { operator, val1, val2, .. } => {
                assert_eq!(*operator, Operator::RegexMatch);
                assert_eq!(*val2, Value::from("foo"));
                val1.as_str()
            }
            FilterNode::Branch { .. } => unreachable!(),
        })
        .collect();
    assert_eq!(columns, ["comment", "description", "node", "order_id", "customer_id"]);
    let interpretation = filter.interpretation().expect("interpreted");
    assert_eq!(interpretation.interpretation, "text");
    assert_eq!(
        interpretation.attribute.as_deref(),
        Some("description or comment or node or order_id or customer_id")
    );
    assert_eq!(interpretation.operator.as_deref(), Some("regex"));
    // the chain itself folds from the left
    match &filter {
        FilterNode::Branch { operator: BoolOp::Or, right, .. } => match right.as_ref() {
            FilterNode::Leaf { val1, .. } => assert_eq!(val1, "customer_id"),
            other => panic!("unexpected right side {other:?}"),
        },
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn and_chain_folds_left() {
    let engine = Engine::default();
    let e = Entity::Pool;
    let expected = join(
        BoolOp::And,
        join(BoolOp::And, word(&engine, e, "a"), word(&engine, e, "b")),
        word(&engine, e, "c"),
    );
    assert_eq!(compiled(&engine, e, "a and b and c"), expected);
}

#[test]
fn implicit_and_is_explicit_and() {
    let engine = Engine::default();
    for entity in [Entity::Prefix, Entity::Pool, Entity::Vrf] {
        assert_eq!(compiled(&engine, entity, "a b"), compiled(&engine, entity, "a and b"));
        assert_eq!(compiled(&engine, entity, "a b or c"), compiled(&engine, entity, "a AND b OR c"));
    }
}

#[test]
fn mixed_operators_have_no_precedence() {
    let engine = Engine::default();
    let e = Entity::Vrf;
    let expected = join(
        BoolOp::And,
        join(BoolOp::Or, word(&engine, e, "a"), word(&engine, e, "b")),
        word(&engine, e, "c"),
    );
    assert_eq!(compiled(&engine, e, "a or b and c"), expected);
}

#[test]
fn groups_fold_on_their_own() {
    let engine = Engine::default();
    let e = Entity::Pool;
    let expected = join(
        BoolOp::And,
        word(&engine, e, "a"),
        join(BoolOp::Or, word(&engine, e, "b"), word(&engine, e, "c")),
    );
    assert_eq!(compiled(&engine, e, "a (b or c)"), expected);
    // a group of one is just its content
    assert_eq!(compiled(&engine, e, "((a))"), word(&engine, e, "a"));
}

#[test]
fn empty_query_matches_everything() {
    let engine = Engine::default();
    assert_eq!(compiled(&engine, Entity::Pool, ""), word(&engine, Entity::Pool, ""));
}
