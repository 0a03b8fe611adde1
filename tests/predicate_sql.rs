use ipam_search::error::SearchError;
use ipam_search::filter::{BoolOp, ErrorKind, FilterNode, Operator, Value};
use ipam_search::predicate::compile_query;
use ipam_search::profile::Entity;
use ipam_search::search::{Engine, Parsed};

#[test]
fn nested_tree_is_parenthesized_in_order() {
    let tree = FilterNode::branch(
        BoolOp::And,
        FilterNode::branch(
            BoolOp::Or,
            FilterNode::leaf(Operator::Equals, "vlan", "1"),
            FilterNode::leaf(Operator::Equals, "node", "x"),
        ),
        FilterNode::leaf(Operator::RegexMatch, "description", "y"),
    );
    let predicate = compile_query(Entity::Prefix.profile(), &tree).expect("compiles");
    assert_eq!(
        predicate.sql,
        "((inp.vlan = $1 OR inp.node = $2) AND COALESCE(inp.description, '') ~* $3)"
    );
    assert_eq!(predicate.params, vec![Value::from("1"), Value::from("x"), Value::from("y")]);
}

#[test]
fn right_nested_tree_keeps_traversal_order() {
    let tree = FilterNode::branch(
        BoolOp::Or,
        FilterNode::leaf(Operator::Less, "vlan", 10i64),
        FilterNode::branch(
            BoolOp::And,
            FilterNode::leaf(Operator::Greater, "vlan", 20i64),
            FilterNode::leaf(Operator::NotEquals, "country", "SE"),
        ),
    );
    let predicate = compile_query(Entity::Prefix.profile(), &tree).expect("compiles");
    assert_eq!(predicate.sql, "(inp.vlan < $1 OR (inp.vlan > $2 AND inp.country != $3))");
    assert_eq!(predicate.params, vec![Value::Integer(10), Value::Integer(20), Value::from("SE")]);
}

#[test]
fn parsed_query_to_sql() {
    let engine = Engine::default();
    let Parsed::Compiled { success: true, filter } = engine.parse(Entity::Prefix, "10/8 #core") else {
        panic!("did not compile");
    };
    let predicate = engine.compile_query(Entity::Prefix, &filter).expect("compiles");
    assert_eq!(
        predicate.sql,
        "(iprange(inp.prefix) <<= $1 AND ($2 = ANY (inp.tags::citext[]) OR $3 = ANY (inp.inherited_tags::citext[])))"
    );
    assert_eq!(
        predicate.params,
        vec![Value::from("10.0.0.0/8"), Value::from("core"), Value::from("core")]
    );
}

#[test]
fn null_comparisons_are_inline() {
    let profile = Entity::Prefix.profile();
    let predicate = compile_query(profile, &FilterNode::leaf(Operator::Equals, "vlan", Value::Null)).expect("compiles");
    assert_eq!(predicate.sql, "inp.vlan IS NULL");
    assert!(predicate.params.is_empty());

    let tree = FilterNode::branch(
        BoolOp::And,
        FilterNode::leaf(Operator::NotEquals, "vlan", Value::Null),
        FilterNode::leaf(Operator::Equals, "node", "a"),
    );
    let predicate = compile_query(profile, &tree).expect("compiles");
    assert_eq!(predicate.sql, "(inp.vlan IS NOT NULL AND inp.node = $1)");
    assert_eq!(predicate.params, vec![Value::from("a")]);
}

#[test]
fn columns_come_from_the_entity() {
    let leaf = FilterNode::leaf(Operator::Equals, "vrf_rt", "65000:1");
    assert_eq!(compile_query(Entity::Pool.profile(), &leaf).expect("compiles").sql, "vrf.rt = $1");
    let leaf = FilterNode::leaf(Operator::Equals, "name", "x");
    assert_eq!(compile_query(Entity::Pool.profile(), &leaf).expect("compiles").sql, "po.name = $1");
    assert_eq!(compile_query(Entity::Vrf.profile(), &leaf).expect("compiles").sql, "name = $1");
    let leaf = FilterNode::leaf(Operator::LessOrEqual, "prefix_length", "24");
    assert_eq!(
        compile_query(Entity::Prefix.profile(), &leaf).expect("compiles").sql,
        "masklen(inp.prefix) <= $1"
    );
}

#[test]
fn operator_rendering() {
    let profile = Entity::Prefix.profile();
    let cases = [
        (Operator::CaseRegexNotMatch, "COALESCE(inp.node, '') !~ $1"),
        (Operator::Like, "COALESCE(inp.node, '') LIKE $1"),
        (Operator::Contains, "iprange(inp.node) >> $1"),
        (Operator::ContainedWithin, "iprange(inp.node) << $1"),
        (Operator::GreaterOrEqual, "inp.node >= $1"),
        (Operator::IsNot, "inp.node IS NOT $1"),
    ];
    for (operator, sql) in cases {
        let leaf = FilterNode::leaf(operator, "node", "x");
        assert_eq!(compile_query(profile, &leaf).expect("compiles").sql, sql, "{operator}");
    }
}

#[test]
fn unknown_column_is_an_internal_error() {
    let leaf = FilterNode::leaf(Operator::Equals, "no_such_thing", "x");
    let err = compile_query(Entity::Vrf.profile(), &leaf).unwrap_err();
    assert!(matches!(err, SearchError::Invariant(_)));
}

#[test]
fn long_queries_are_rejected_before_compiling() {
    let engine = Engine::default();
    let query = vec!["w"; 10_000].join(" ");
    match engine.parse(Entity::Vrf, &query) {
        Parsed::Rejected(i) => {
            assert!(i.error);
            assert_eq!(i.error_message, Some(ErrorKind::TooManyTerms));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn longest_allowed_query_compiles() {
    let engine = Engine::default();
    let terms = engine.settings().parser.max_terms;
    let query = vec!["w"; terms].join(" ");
    let Parsed::Compiled { success: true, filter } = engine.parse(Entity::Vrf, &query) else {
        panic!("did not compile");
    };
    let predicate = engine.compile_query(Entity::Vrf, &filter).expect("compiles");
    // three free text columns per word
    assert_eq!(predicate.params.len(), terms * 3);
    assert!(serde_json::to_string(&filter).is_ok());
}
