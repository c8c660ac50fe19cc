//! Boolean query compiler.
//!
//! Query text is lexed into operands, operators and parentheses, then folded
//! into an [`Expr`] tree with an operator-precedence (shunting-yard) pass.
//! `NOT` binds tightest, then `AND`, then `OR`.

use crate::error::QueryError;
use crate::tokenizer::Analyzer;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Not,
    And,
    Or,
}

impl Operator {
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Not => 3,
            Operator::And => 2,
            Operator::Or => 1,
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word {
            "NOT" | "~" => Some(Operator::Not),
            "AND" | "&" => Some(Operator::And),
            "OR" | "|" => Some(Operator::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Not => "NOT",
            Operator::And => "AND",
            Operator::Or => "OR",
        };
        f.write_str(s)
    }
}

/// Compiled Boolean query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A normalized term looked up in the postings.
    Term(String),
    /// An operand reduced to nothing by normalization; matches no document.
    Ignored,
    /// The whole query was empty.
    Empty,
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn term(t: &str) -> Self {
        Expr::Term(t.to_string())
    }

    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    pub fn and(l: Expr, r: Expr) -> Self {
        Expr::And(Box::new(l), Box::new(r))
    }

    pub fn or(l: Expr, r: Expr) -> Self {
        Expr::Or(Box::new(l), Box::new(r))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    /// Terms of one query word; more than one when the tokenizer splits it.
    Terms(Vec<String>),
    /// No word characters at all.
    Ignored,
    /// Only stopwords the index does not store.
    Stopword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Op(Operator),
    Open,
    Close,
    Word(Operand),
}

impl Token {
    fn ends_operand(&self) -> bool {
        matches!(self, Token::Word(_) | Token::Close)
    }

    fn starts_operand(&self) -> bool {
        matches!(self, Token::Word(_) | Token::Open | Token::Op(Operator::Not))
    }
}

// dropped outright
const STRIPPED: &[char] = &[':', ','];

fn operand(word: &str, analyzer: &Analyzer) -> Operand {
    let parts = analyzer.split(word);
    if parts.is_empty() {
        return Operand::Ignored;
    }
    let terms: Vec<String> = parts.into_iter().flatten().collect();
    if terms.is_empty() {
        Operand::Stopword
    } else {
        Operand::Terms(terms)
    }
}

/// Split the query into tokens, making every implicit `AND` explicit.
fn lex(query: &str, analyzer: &Analyzer) -> Vec<Token> {
    let mut spaced = String::with_capacity(query.len() + 8);
    for c in query.chars() {
        if matches!(c, '(' | ')' | '&' | '|' | '~') {
            spaced.push(' ');
            spaced.push(c);
            spaced.push(' ');
        } else {
            spaced.push(c);
        }
    }

    let mut tokens: Vec<Token> = Vec::new();
    for raw in spaced.split_whitespace() {
        let token = match raw {
            "(" => Token::Open,
            ")" => Token::Close,
            _ => match Operator::from_word(raw) {
                Some(op) => Token::Op(op),
                None => {
                    let word: String = raw.chars().filter(|c| !STRIPPED.contains(c)).collect();
                    if word.is_empty() {
                        continue;
                    }
                    Token::Word(operand(&word, analyzer))
                }
            },
        };
        if token.starts_operand() && tokens.last().is_some_and(Token::ends_operand) {
            tokens.push(Token::Op(Operator::And));
        }
        tokens.push(token);
    }
    tokens
}

enum Pending {
    Op(Operator),
    Open,
}

// `None` marks a stopword operand; it drops out of whatever operator consumes it.
type Slot = Option<Expr>;

fn emit(output: &mut Vec<Slot>, operator: Operator) -> Result<(), QueryError> {
    let missing = || QueryError::MissingOperand { operator };
    let node = match operator {
        Operator::Not => output.pop().ok_or_else(missing)?.map(Expr::not),
        Operator::And | Operator::Or => {
            let right = output.pop().ok_or_else(missing)?;
            let left = output.pop().ok_or_else(missing)?;
            match (left, right) {
                (Some(l), Some(r)) if operator == Operator::And => Some(Expr::and(l, r)),
                (Some(l), Some(r)) => Some(Expr::or(l, r)),
                (Some(side), None) | (None, Some(side)) => Some(side),
                (None, None) => None,
            }
        }
    };
    output.push(node);
    Ok(())
}

fn leaf(operand: Operand) -> Slot {
    match operand {
        Operand::Terms(terms) => terms.into_iter().map(Expr::Term).reduce(Expr::and),
        Operand::Ignored => Some(Expr::Ignored),
        Operand::Stopword => None,
    }
}

/// Compile a Boolean query into an expression tree, normalizing operands with `analyzer`.
///
/// Operands are split and normalized exactly like document text, so a word the
/// tokenizer breaks apart (`e-mail`) becomes the conjunction of its parts.
/// Operands side by side without an operator are joined with `AND` at `AND`
/// precedence. A stopword the index dropped is removed from the query; a
/// word with no word characters matches nothing.
pub fn compile(query: &str, analyzer: &Analyzer) -> Result<Expr, QueryError> {
    let mut output: Vec<Slot> = Vec::new();
    let mut stack: Vec<Pending> = Vec::new();
    for token in lex(query, analyzer) {
        match token {
            Token::Word(operand) => output.push(leaf(operand)),
            Token::Open => stack.push(Pending::Open),
            Token::Close => loop {
                match stack.pop() {
                    Some(Pending::Open) => break,
                    Some(Pending::Op(op)) => emit(&mut output, op)?,
                    None => return Err(QueryError::MismatchedParenthesis),
                }
            },
            Token::Op(op) => {
                // a prefix NOT never reduces what is already on the stack
                if op != Operator::Not {
                    while let Some(Pending::Op(top)) = stack.last() {
                        if top.precedence() < op.precedence() {
                            break;
                        }
                        let top = *top;
                        stack.pop();
                        emit(&mut output, top)?;
                    }
                }
                stack.push(Pending::Op(op));
            }
        }
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Open => return Err(QueryError::UnexpectedParenthesis),
            Pending::Op(op) => emit(&mut output, op)?,
        }
    }

    // every operand after the first is consumed by an operator, so at most one slot is left
    debug_assert!(output.len() <= 1);
    Ok(output.pop().flatten().unwrap_or(Expr::Empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::AnalyzerConfig;

    fn plain() -> Analyzer {
        Analyzer::new(AnalyzerConfig { stem: false, stopwords: false })
    }

    fn c(q: &str) -> Result<Expr, QueryError> {
        compile(q, &plain())
    }

    #[test]
    fn precedence_not_and_or() {
        let expr = c("a AND (b OR NOT c)").unwrap();
        assert_eq!(
            expr,
            Expr::and(Expr::term("a"), Expr::or(Expr::term("b"), Expr::not(Expr::term("c"))))
        );
        let expr = c("a OR b AND NOT c").unwrap();
        assert_eq!(
            expr,
            Expr::or(Expr::term("a"), Expr::and(Expr::term("b"), Expr::not(Expr::term("c"))))
        );
    }

    #[test]
    fn equal_precedence_is_left_associative() {
        assert_eq!(
            c("a AND b AND c").unwrap(),
            Expr::and(Expr::and(Expr::term("a"), Expr::term("b")), Expr::term("c"))
        );
    }

    #[test]
    fn not_binds_tighter_than_and() {
        assert_eq!(c("NOT a AND b").unwrap(), Expr::and(Expr::not(Expr::term("a")), Expr::term("b")));
        assert_eq!(c("NOT NOT a").unwrap(), Expr::not(Expr::not(Expr::term("a"))));
    }

    #[test]
    fn unbalanced_parentheses_fail() {
        assert_eq!(c("(a AND b"), Err(QueryError::UnexpectedParenthesis));
        assert_eq!(c("a AND b)"), Err(QueryError::MismatchedParenthesis));
    }

    #[test]
    fn dangling_operator_fails() {
        assert_eq!(c("a AND"), Err(QueryError::MissingOperand { operator: Operator::And }));
        assert_eq!(c("NOT"), Err(QueryError::MissingOperand { operator: Operator::Not }));
    }

    #[test]
    fn empty_query_is_sentinel() {
        assert_eq!(c(""), Ok(Expr::Empty));
        assert_eq!(c("   ,: "), Ok(Expr::Empty));
    }

    #[test]
    fn punctuation_only_operand_is_ignored() {
        assert_eq!(c("a AND ?!"), Ok(Expr::and(Expr::term("a"), Expr::Ignored)));
        assert_eq!(c("NOT ?!"), Ok(Expr::not(Expr::Ignored)));
    }

    #[test]
    fn operands_split_like_document_text() {
        assert_eq!(c("e-mail"), Ok(Expr::and(Expr::term("e"), Expr::term("mail"))));
        assert_eq!(
            c("e-mail OR post"),
            Ok(Expr::or(Expr::and(Expr::term("e"), Expr::term("mail")), Expr::term("post")))
        );
    }

    #[test]
    fn symbols_need_no_spacing() {
        assert_eq!(
            c("(a|b)&~c").unwrap(),
            Expr::and(Expr::or(Expr::term("a"), Expr::term("b")), Expr::not(Expr::term("c")))
        );
    }

    #[test]
    fn adjacent_operands_are_conjunctive() {
        assert_eq!(c("a b").unwrap(), Expr::and(Expr::term("a"), Expr::term("b")));
    }

    #[test]
    fn implicit_and_keeps_precedence() {
        assert_eq!(c("NOT a b").unwrap(), Expr::and(Expr::not(Expr::term("a")), Expr::term("b")));
        assert_eq!(
            c("(a b) OR c").unwrap(),
            Expr::or(Expr::and(Expr::term("a"), Expr::term("b")), Expr::term("c"))
        );
        assert_eq!(
            c("a OR b c").unwrap(),
            Expr::or(Expr::term("a"), Expr::and(Expr::term("b"), Expr::term("c")))
        );
        assert_eq!(
            c("(a) (b)").unwrap(),
            Expr::and(Expr::term("a"), Expr::term("b"))
        );
        assert_eq!(c("a NOT b").unwrap(), Expr::and(Expr::term("a"), Expr::not(Expr::term("b"))));
    }

    #[test]
    fn operands_are_normalized() {
        let expr = compile("Running AND cats", &Analyzer::default()).unwrap();
        assert_eq!(expr, Expr::and(Expr::term("run"), Expr::term("cat")));
    }

    #[test]
    fn dropped_stopwords_leave_the_query() {
        let a = Analyzer::default();
        assert_eq!(compile("the AND cat", &a), Ok(Expr::term("cat")));
        assert_eq!(compile("cat OR (the AND a)", &a), Ok(Expr::term("cat")));
        assert_eq!(compile("cat AND NOT the", &a), Ok(Expr::term("cat")));
        assert_eq!(compile("the", &a), Ok(Expr::Empty));
        // a dangling operator is still an error
        assert_eq!(compile("the AND", &a), Err(QueryError::MissingOperand { operator: Operator::And }));
    }
}
