use crate::filter::{BoolOp, FilterNode, Interpretation};
use crate::grammar::{Atom, Token};
use crate::interpret::Interpreter;
use crate::normalize::normalize;
use crate::validate::validate;

/// Compiles a token list into one filter tree.
///
/// Operands are folded from the left, so `a and b or c` becomes
/// `or(and(a, b), c)`. The flag is false if any token failed, but every token
/// is still compiled so the interpretation covers the whole query.
pub fn compile(tokens: &[Token], interpreter: &Interpreter) -> (bool, FilterNode) {
    fold(&normalize(tokens), interpreter)
}

fn fold(tokens: &[Token], interpreter: &Interpreter) -> (bool, FilterNode) {
    let mut ok = true;
    let mut tree: Option<FilterNode> = None;
    let mut pending = BoolOp::And;
    for token in tokens {
        let (good, node) = match token {
            Token::Boolean(op) => {
                pending = *op;
                continue;
            }
            Token::Expression { key, op, value } => validate(key, *op, value, interpreter.profile),
            Token::Group(children) => fold(children, interpreter),
            Token::Atom(atom) => (true, interpreter.interpret(atom)),
        };
        ok &= good;
        tree = Some(match tree.take() {
            None => node,
            Some(left) => {
                FilterNode::branch(pending, left, node).with_interpretation(Interpretation::boolean(pending))
            }
        });
    }
    let tree = tree.unwrap_or_else(|| interpreter.interpret(&Atom::Word(String::new())));
    (ok, tree)
}
