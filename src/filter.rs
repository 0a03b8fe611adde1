//! The filter tree: the entity-agnostic form of a smart search query that sits
//! between parsed tokens and the generated SQL predicate.
//!
//! A [`FilterNode`] is either a leaf comparing one attribute with one value, or
//! a binary `and`/`or` branch. Nodes created from a piece of the query string
//! carry an [`Interpretation`] telling the user how that piece was understood.
//! Serialized, the tree keeps the `{operator, val1, val2, interpretation}`
//! shape clients already consume.

use serde::Serialize;
use std::fmt;

// ------------- Operators -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
    pub fn sql(&self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract leaf operators. How each one renders is decided per entity by the
/// predicate compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Is,
    IsNot,
    Like,
    /// Case-insensitive regular expression match.
    RegexMatch,
    RegexNotMatch,
    /// Case-sensitive regular expression match.
    CaseRegexMatch,
    CaseRegexNotMatch,
    /// Network is wider than the value.
    Contains,
    ContainsEquals,
    /// Network is narrower than the value.
    ContainedWithin,
    ContainedWithinEquals,
    /// Value is one of the elements of an array column.
    EqualsAny,
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Less => "less",
            Operator::LessOrEqual => "less_or_equal",
            Operator::Greater => "greater",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::Is => "is",
            Operator::IsNot => "is_not",
            Operator::Like => "like",
            Operator::RegexMatch => "regex_match",
            Operator::RegexNotMatch => "regex_not_match",
            Operator::CaseRegexMatch => "case_regex_match",
            Operator::CaseRegexNotMatch => "case_regex_not_match",
            Operator::Contains => "contains",
            Operator::ContainsEquals => "contains_equals",
            Operator::ContainedWithin => "contained_within",
            Operator::ContainedWithinEquals => "contained_within_equals",
            Operator::EqualsAny => "equals_any",
        }
    }
    pub fn is_containment(&self) -> bool {
        matches!(
            self,
            Operator::Contains
                | Operator::ContainsEquals
                | Operator::ContainedWithin
                | Operator::ContainedWithinEquals
        )
    }
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Operator::Like
                | Operator::RegexMatch
                | Operator::RegexNotMatch
                | Operator::CaseRegexMatch
                | Operator::CaseRegexNotMatch
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ------------- Values -------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(s.to_string()) }
}
impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(s) }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Integer(i) }
}

// ------------- Interpretation -------------
/// What went wrong with a token, or with the query as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "unknown attribute")]
    UnknownAttribute,
    #[serde(rename = "invalid value")]
    InvalidValue,
    #[serde(rename = "unclosed quote")]
    UnclosedQuote,
    #[serde(rename = "unclosed parentheses")]
    UnclosedParentheses,
    #[serde(rename = "unparsed input")]
    UnparsedInput,
    #[serde(rename = "nesting too deep")]
    NestingTooDeep,
    #[serde(rename = "too many terms")]
    TooManyTerms,
}

impl ErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::UnknownAttribute => "unknown attribute",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::UnclosedQuote => "unclosed quote",
            ErrorKind::UnclosedParentheses => "unclosed parentheses",
            ErrorKind::UnparsedInput => "unparsed input",
            ErrorKind::NestingTooDeep => "nesting too deep",
            ErrorKind::TooManyTerms => "too many terms",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Interpretation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    pub interpretation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<ErrorKind>,
    /// An abbreviated IPv4 prefix padded out to four octets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<String>,
    /// The network form of a prefix written with host bits set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_prefix: Option<String>,
}

impl Interpretation {
    pub fn new(
        string: impl Into<String>,
        interpretation: impl Into<String>,
        attribute: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            string: Some(string.into()),
            interpretation: interpretation.into(),
            attribute: Some(attribute.into()),
            operator: Some(operator.into()),
            ..Self::default()
        }
    }
    pub fn boolean(op: BoolOp) -> Self {
        Self {
            interpretation: op.as_str().to_string(),
            operator: Some(op.as_str().to_string()),
            ..Self::default()
        }
    }
    /// Explanation for a query that could not be tokenized at all.
    pub fn syntax_error(query: &str, kind: ErrorKind) -> Self {
        Self {
            string: Some(query.to_string()),
            interpretation: kind.message().to_string(),
            attribute: Some("text".to_string()),
            error: true,
            error_message: Some(kind),
            ..Self::default()
        }
    }
    pub fn fail(&mut self, kind: ErrorKind) {
        self.error = true;
        self.error_message = Some(kind);
    }
}

// ------------- Filter tree -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterNode {
    Leaf {
        operator: Operator,
        val1: String,
        val2: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        interpretation: Option<Interpretation>,
    },
    Branch {
        operator: BoolOp,
        #[serde(rename = "val1")]
        left: Box<FilterNode>,
        #[serde(rename = "val2")]
        right: Box<FilterNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        interpretation: Option<Interpretation>,
    },
}

impl FilterNode {
    pub fn leaf(operator: Operator, val1: impl Into<String>, val2: impl Into<Value>) -> Self {
        FilterNode::Leaf {
            operator,
            val1: val1.into(),
            val2: val2.into(),
            interpretation: None,
        }
    }
    pub fn branch(operator: BoolOp, left: FilterNode, right: FilterNode) -> Self {
        FilterNode::Branch {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            interpretation: None,
        }
    }
    /// Left-folds `nodes` with `operator`, so `[a, b, c]` becomes
    /// `op(op(a, b), c)`. Returns `None` for an empty input.
    pub fn fold(operator: BoolOp, nodes: impl IntoIterator<Item = FilterNode>) -> Option<FilterNode> {
        nodes
            .into_iter()
            .reduce(|left, right| FilterNode::branch(operator, left, right))
    }
    pub fn with_interpretation(mut self, new: Interpretation) -> Self {
        match &mut self {
            FilterNode::Leaf { interpretation, .. } | FilterNode::Branch { interpretation, .. } => {
                *interpretation = Some(new);
            }
        }
        self
    }
    pub fn interpretation(&self) -> Option<&Interpretation> {
        match self {
            FilterNode::Leaf { interpretation, .. } | FilterNode::Branch { interpretation, .. } => {
                interpretation.as_ref()
            }
        }
    }
    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<&FilterNode> {
        match self {
            FilterNode::Leaf { .. } => vec![self],
            FilterNode::Branch { left, right, .. } => {
                let mut leaves = left.leaves();
                leaves.extend(right.leaves());
                leaves
            }
        }
    }
    /// True when this node or any node below it carries an error.
    pub fn has_error(&self) -> bool {
        let own = self.interpretation().is_some_and(|i| i.error);
        match self {
            FilterNode::Leaf { .. } => own,
            FilterNode::Branch { left, right, .. } => own || left.has_error() || right.has_error(),
        }
    }
}
