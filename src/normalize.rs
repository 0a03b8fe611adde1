use crate::filter::BoolOp;
use crate::grammar::{Atom, Token};

/// Rewrites a token list so operands and boolean keywords alternate,
/// starting and ending with an operand.
///
/// Missing keywords between operands become `and`, a run of keywords keeps
/// only its last one, and keywords without an operand on both sides are
/// dropped. Groups are normalized recursively. An empty list turns into a
/// single empty word, which matches everything.
pub fn normalize(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    let mut pending: Option<BoolOp> = None;
    for token in tokens {
        let operand = match token {
            Token::Boolean(op) => {
                pending = Some(*op);
                continue;
            }
            Token::Group(children) => Token::Group(normalize(children)),
            other => other.clone(),
        };
        if !out.is_empty() {
            out.push(Token::Boolean(pending.unwrap_or(BoolOp::And)));
        }
        pending = None;
        out.push(operand);
    }
    if out.is_empty() {
        out.push(Token::Atom(Atom::Word(String::new())));
    }
    out
}
