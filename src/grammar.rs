//! Tokenizer for smart search strings.
//!
//! The heavy lifting is done by the pest grammar in `smart.pest`. Tokenizing
//! runs in three steps, each one able to reject the whole query:
//! a nesting depth scan, a balance pass over quotes and parentheses, and the
//! full parse into [`Token`]s.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use tracing::debug;

use crate::filter::{BoolOp, ErrorKind, Operator};

#[derive(Parser)]
#[grammar = "smart.pest"]
pub struct SmartGrammar;

/// Literal tokens that are handed to an entity interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Word(String),
    /// Contents of a quoted string with escapes removed.
    QuotedString(String),
    /// Tag name without the leading `#`.
    Tag(String),
    RoutingId(String),
    Ipv6Address(String),
    Ipv6Prefix(String),
}

impl Atom {
    pub fn text(&self) -> &str {
        match self {
            Atom::Word(s)
            | Atom::QuotedString(s)
            | Atom::Tag(s)
            | Atom::RoutingId(s)
            | Atom::Ipv6Address(s)
            | Atom::Ipv6Prefix(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(Atom),
    Expression { key: String, op: MatchOp, value: String },
    Boolean(BoolOp),
    Group(Vec<Token>),
}

impl Token {
    pub fn word(text: &str) -> Self {
        Token::Atom(Atom::Word(text.to_string()))
    }
}

/// Comparison glyphs allowed in `key<op>value` expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOp {
    Equals,
    NotEquals,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    ContainedWithin,
    ContainedWithinEquals,
    Contains,
    ContainsEquals,
    CaseRegex,
    Regex,
    CaseNotRegex,
    NotRegex,
}

impl MatchOp {
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Some(match glyph {
            "=" => MatchOp::Equals,
            "!=" => MatchOp::NotEquals,
            "<" => MatchOp::Less,
            "<=" => MatchOp::LessOrEqual,
            ">" => MatchOp::Greater,
            ">=" => MatchOp::GreaterOrEqual,
            "<<" => MatchOp::ContainedWithin,
            "<<=" => MatchOp::ContainedWithinEquals,
            ">>" => MatchOp::Contains,
            ">>=" => MatchOp::ContainsEquals,
            "~" => MatchOp::CaseRegex,
            "~*" => MatchOp::Regex,
            "!~" => MatchOp::CaseNotRegex,
            "!~*" => MatchOp::NotRegex,
            _ => return None,
        })
    }
    pub fn glyph(&self) -> &'static str {
        match self {
            MatchOp::Equals => "=",
            MatchOp::NotEquals => "!=",
            MatchOp::Less => "<",
            MatchOp::LessOrEqual => "<=",
            MatchOp::Greater => ">",
            MatchOp::GreaterOrEqual => ">=",
            MatchOp::ContainedWithin => "<<",
            MatchOp::ContainedWithinEquals => "<<=",
            MatchOp::Contains => ">>",
            MatchOp::ContainsEquals => ">>=",
            MatchOp::CaseRegex => "~",
            MatchOp::Regex => "~*",
            MatchOp::CaseNotRegex => "!~",
            MatchOp::NotRegex => "!~*",
        }
    }
    pub fn operator(&self) -> Operator {
        match self {
            MatchOp::Equals => Operator::Equals,
            MatchOp::NotEquals => Operator::NotEquals,
            MatchOp::Less => Operator::Less,
            MatchOp::LessOrEqual => Operator::LessOrEqual,
            MatchOp::Greater => Operator::Greater,
            MatchOp::GreaterOrEqual => Operator::GreaterOrEqual,
            MatchOp::ContainedWithin => Operator::ContainedWithin,
            MatchOp::ContainedWithinEquals => Operator::ContainedWithinEquals,
            MatchOp::Contains => Operator::Contains,
            MatchOp::ContainsEquals => Operator::ContainsEquals,
            MatchOp::CaseRegex => Operator::CaseRegexMatch,
            MatchOp::Regex => Operator::RegexMatch,
            MatchOp::CaseNotRegex => Operator::CaseRegexNotMatch,
            MatchOp::NotRegex => Operator::RegexNotMatch,
        }
    }
}

// ------------- tokenize -------------
/// Tokenizes `raw`, rejecting it whole when parentheses nest deeper than
/// `max_depth` or when it holds more than `max_terms` operands.
pub fn tokenize(raw: &str, max_depth: usize, max_terms: usize) -> Result<Vec<Token>, ErrorKind> {
    if nesting_depth(raw) > max_depth {
        return Err(ErrorKind::NestingTooDeep);
    }
    check_balance(raw)?;
    let mut pairs = SmartGrammar::parse(Rule::query, raw).map_err(|e| {
        debug!(error = %e, "query did not parse");
        ErrorKind::UnparsedInput
    })?;
    let tokens = match pairs.next() {
        Some(query) => tokens_of(query),
        None => return Err(ErrorKind::UnparsedInput),
    };
    // the filter tree grows one level per operand
    let terms = term_count(&tokens);
    if terms > max_terms {
        debug!(terms, max_terms, "query has too many terms");
        return Err(ErrorKind::TooManyTerms);
    }
    Ok(tokens)
}

/// Operands in a token list, groups included. Recursion is bounded by the
/// nesting check.
fn term_count(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .map(|token| match token {
            Token::Boolean(_) => 0,
            // an empty group still becomes an operand
            Token::Group(children) => term_count(children).max(1),
            Token::Atom(_) | Token::Expression { .. } => 1,
        })
        .sum()
}

/// Deepest parenthesis nesting outside of quoted spans.
fn nesting_depth(raw: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in raw.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => (),
        }
    }
    deepest
}

fn check_balance(raw: &str) -> Result<(), ErrorKind> {
    let pairs = SmartGrammar::parse(Rule::balance, raw).map_err(|_| ErrorKind::UnparsedInput)?;
    let strays: Vec<&str> = pairs
        .flatten()
        .filter(|p| p.as_rule() == Rule::stray)
        .map(|p| p.as_str())
        .collect();
    if strays.iter().any(|s| *s == "\"" || *s == "'") {
        return Err(ErrorKind::UnclosedQuote);
    }
    if !strays.is_empty() {
        return Err(ErrorKind::UnclosedParentheses);
    }
    Ok(())
}

fn tokens_of(pair: Pair<Rule>) -> Vec<Token> {
    pair.into_inner().filter_map(token_of).collect()
}

fn token_of(pair: Pair<Rule>) -> Option<Token> {
    let token = match pair.as_rule() {
        Rule::group => Token::Group(tokens_of(pair)),
        Rule::ipv6_prefix => Token::Atom(Atom::Ipv6Prefix(pair.as_str().to_string())),
        Rule::ipv6_address => Token::Atom(Atom::Ipv6Address(pair.as_str().to_string())),
        Rule::quoted => Token::Atom(Atom::QuotedString(unquote(pair))),
        Rule::expression => expression_of(pair)?,
        Rule::tag => Token::Atom(Atom::Tag(pair.as_str().trim_start_matches('#').to_string())),
        Rule::routing_id => Token::Atom(Atom::RoutingId(pair.as_str().to_string())),
        Rule::boolean => Token::Boolean(if pair.as_str().eq_ignore_ascii_case("and") {
            BoolOp::And
        } else {
            BoolOp::Or
        }),
        Rule::word => Token::word(pair.as_str()),
        _ => return None, // EOI
    };
    Some(token)
}

fn expression_of(pair: Pair<Rule>) -> Option<Token> {
    let mut inner = pair.into_inner();
    let key = inner.next()?.as_str().to_string();
    let op = MatchOp::from_glyph(inner.next()?.as_str())?;
    let value = inner.next()?;
    let value = match value.as_rule() {
        Rule::quoted => unquote(value),
        _ => value.as_str().to_string(),
    };
    Some(Token::Expression { key, op, value })
}

/// Body of a quoted string, a backslash keeps the character after it.
fn unquote(pair: Pair<Rule>) -> String {
    let body = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
