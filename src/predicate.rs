//! Renders a filter tree as a PostgreSQL `WHERE` predicate with `$n`
//! placeholders, numbered in the order the leaves appear in the tree.

use serde::Serialize;

use crate::error::{Result, SearchError};
use crate::filter::{FilterNode, Operator, Value};
use crate::profile::EntityProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
    pub sql: String,
    pub params: Vec<Value>,
}

pub fn compile_query(profile: &EntityProfile, node: &FilterNode) -> Result<Predicate> {
    let mut params = Vec::new();
    let sql = render(profile, node, &mut params)?;
    Ok(Predicate { sql, params })
}

fn sql_operator(operator: Operator) -> &'static str {
    match operator {
        Operator::Equals => "=",
        Operator::NotEquals => "!=",
        Operator::Less => "<",
        Operator::LessOrEqual => "<=",
        Operator::Greater => ">",
        Operator::GreaterOrEqual => ">=",
        Operator::Is => "IS",
        Operator::IsNot => "IS NOT",
        Operator::Like => "LIKE",
        Operator::RegexMatch => "~*",
        Operator::RegexNotMatch => "!~*",
        Operator::CaseRegexMatch => "~",
        Operator::CaseRegexNotMatch => "!~",
        Operator::Contains => ">>",
        Operator::ContainsEquals => ">>=",
        Operator::ContainedWithin => "<<",
        Operator::ContainedWithinEquals => "<<=",
        Operator::EqualsAny => "= ANY",
    }
}

fn render(profile: &EntityProfile, node: &FilterNode, params: &mut Vec<Value>) -> Result<String> {
    match node {
        FilterNode::Branch { operator, left, right, .. } => {
            let left = render(profile, left, params)?;
            let right = render(profile, right, params)?;
            Ok(format!("({} {} {})", left, operator.sql(), right))
        }
        FilterNode::Leaf { operator, val1, val2, .. } => {
            let column = profile.column(val1).ok_or_else(|| {
                SearchError::Invariant(format!("no column for '{}' on {}", val1, profile.entity))
            })?;
            // placeholders cannot follow IS, so null comparisons are written out
            if *val2 == Value::Null {
                match operator {
                    Operator::Equals | Operator::Is => return Ok(format!("{} IS NULL", column)),
                    Operator::NotEquals | Operator::IsNot => return Ok(format!("{} IS NOT NULL", column)),
                    _ => (),
                }
            }
            params.push(val2.clone());
            let n = params.len();
            let op = sql_operator(*operator);
            Ok(match operator {
                Operator::EqualsAny => format!("${} = ANY ({}::citext[])", n, column),
                o if o.is_pattern() => format!("COALESCE({}, '') {} ${}", column, op, n),
                o if o.is_containment() => format!("iprange({}) {} ${}", column, op, n),
                _ => format!("{} {} ${}", column, op, n),
            })
        }
    }
}
