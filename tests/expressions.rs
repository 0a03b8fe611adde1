use ipam_search::filter::{ErrorKind, FilterNode, Operator, Value};
use ipam_search::grammar::MatchOp;
use ipam_search::profile::Entity;
use ipam_search::search::{Engine, Parsed};
use ipam_search::validate::validate;

#[test]
fn unknown_attribute_is_reported_not_raised() {
    let engine = Engine::default();
    match engine.parse(Entity::Prefix, "foo=bar") {
        Parsed::Compiled { success, filter } => {
            assert!(!success);
            let i = filter.interpretation().expect("interpreted");
            assert!(i.error);
            assert_eq!(i.error_message, Some(ErrorKind::UnknownAttribute));
            assert_eq!(i.interpretation, "expression");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn closed_value_sets_are_checked() {
    let profile = Entity::Prefix.profile();
    let (ok, leaf) = validate("status", MatchOp::Equals, "bogus", profile);
    assert!(!ok);
    assert_eq!(
        leaf.interpretation().and_then(|i| i.error_message),
        Some(ErrorKind::InvalidValue)
    );

    let (ok, leaf) = validate("status", MatchOp::Equals, "assigned", profile);
    assert!(ok);
    let i = leaf.interpretation().expect("interpreted");
    assert!(!i.error);
    assert_eq!(i.string.as_deref(), Some("status=assigned"));
    assert_eq!(i.attribute.as_deref(), Some("status"));
    assert_eq!(i.operator.as_deref(), Some("="));
}

#[test]
fn the_leaf_keeps_the_expression() {
    let engine = Engine::default();
    let Parsed::Compiled { success: true, filter } = engine.parse(Entity::Prefix, "vlan > 100") else {
        panic!("did not compile");
    };
    match &filter {
        FilterNode::Leaf { operator, val1, val2, interpretation } => {
            assert_eq!(*operator, Operator::Greater);
            assert_eq!(val1, "vlan");
            assert_eq!(*val2, Value::from("100"));
            assert_eq!(interpretation.as_ref().and_then(|i| i.string.as_deref()), Some("vlan>100"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn regex_glyphs_map_to_operators() {
    assert_eq!(MatchOp::Regex.operator(), Operator::RegexMatch);
    assert_eq!(MatchOp::NotRegex.operator(), Operator::RegexNotMatch);
    assert_eq!(MatchOp::CaseRegex.operator(), Operator::CaseRegexMatch);
    assert_eq!(MatchOp::CaseNotRegex.operator(), Operator::CaseRegexNotMatch);
    assert_eq!(MatchOp::from_glyph(">>="), Some(MatchOp::ContainsEquals));
    assert_eq!(MatchOp::from_glyph("=="), None);
}

#[test]
fn failures_do_not_stop_compilation() {
    let engine = Engine::default();
    let Parsed::Compiled { success, filter } = engine.parse(Entity::Prefix, "foo=bar 10/8 type=host") else {
        panic!("did not tokenize");
    };
    assert!(!success);
    assert!(filter.has_error());
    let flagged: Vec<bool> = filter
        .leaves()
        .into_iter()
        .map(|leaf| leaf.interpretation().is_some_and(|i| i.error))
        .collect();
    assert_eq!(flagged, [true, false, false]);
}

#[test]
fn attributes_differ_per_entity() {
    let engine = Engine::default();
    assert!(engine.parse(Entity::Vrf, "rt=65000:1").success());
    assert!(!engine.parse(Entity::Pool, "rt=65000:1").success());
    assert!(engine.parse(Entity::Pool, "vrf_rt=65000:1").success());
    // only prefixes restrict their type, a pool default type is free form
    assert!(!engine.parse(Entity::Prefix, "type=foo").success());
    assert!(engine.parse(Entity::Pool, "default_type=foo").success());
}

#[test]
fn unclosed_quote_rejects_the_whole_query() {
    let engine = Engine::default();
    match engine.parse(Entity::Prefix, "\"") {
        Parsed::Rejected(i) => {
            assert!(i.error);
            assert_eq!(i.error_message, Some(ErrorKind::UnclosedQuote));
            assert_eq!(i.string.as_deref(), Some("\""));
            assert_eq!(i.attribute.as_deref(), Some("text"));
        }
        other => panic!("unexpected {other:?}"),
    }
}
