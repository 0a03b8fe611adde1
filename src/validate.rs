use tracing::debug;

use crate::filter::{ErrorKind, FilterNode, Interpretation};
use crate::grammar::MatchOp;
use crate::profile::EntityProfile;

/// Checks a `key<op>value` expression against the attributes of a profile.
///
/// The leaf is built the same way whether or not the expression is valid, a
/// failure only marks its interpretation and clears the returned flag.
pub fn validate(key: &str, op: MatchOp, value: &str, profile: &EntityProfile) -> (bool, FilterNode) {
    let mut interpretation = Interpretation::new(
        format!("{}{}{}", key, op.glyph(), value),
        "expression",
        key,
        op.glyph(),
    );
    let failure = match profile.attribute(key) {
        None => Some(ErrorKind::UnknownAttribute),
        Some(values) if !values.admits(value) => Some(ErrorKind::InvalidValue),
        Some(_) => None,
    };
    if let Some(kind) = failure {
        debug!(key, value, error = %kind, "expression rejected");
        interpretation.fail(kind);
    }
    let leaf = FilterNode::leaf(op.operator(), key, value).with_interpretation(interpretation);
    (failure.is_none(), leaf)
}
