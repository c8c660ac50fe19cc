use super::merge;
use super::parser::Expr;
use crate::skiplist::SkipList;
use crate::DocId;
use anyhow::Result;
use std::collections::HashMap;

/// Where the evaluator reads posting lists from.
pub trait PostingSource {
    /// Document IDs containing `term`; empty when the term is unknown.
    fn doc_ids(&mut self, term: &str) -> Result<SkipList>;

    /// Every indexed document ID.
    fn universe(&mut self) -> Result<SkipList>;
}

/// In-memory source, keyed by term. The universe is the union of all lists.
impl PostingSource for HashMap<String, SkipList> {
    fn doc_ids(&mut self, term: &str) -> Result<SkipList> {
        Ok(self.get(term).cloned().unwrap_or_default())
    }

    fn universe(&mut self) -> Result<SkipList> {
        Ok(SkipList::new(self.values().flat_map(|l| l.as_slice().iter().copied())))
    }
}

/// Algebraic shortcut chosen for an `AND`/`OR` node before any list is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite<'e> {
    /// `¬a ∧ ¬b` as the complement of `a ∨ b`.
    ComplementOfUnion(&'e Expr, &'e Expr),
    /// `¬a ∨ ¬b` as the complement of `a ∧ b`.
    ComplementOfIntersection(&'e Expr, &'e Expr),
    /// `keep ∧ ¬drop` as a direct difference.
    Difference { keep: &'e Expr, drop: &'e Expr },
}

/// Shortcut for `left ∧ right`, if either side is negated.
pub fn rewrite_and<'e>(left: &'e Expr, right: &'e Expr) -> Option<Rewrite<'e>> {
    match (left, right) {
        (Expr::Not(a), Expr::Not(b)) => Some(Rewrite::ComplementOfUnion(a, b)),
        (Expr::Not(drop), keep) | (keep, Expr::Not(drop)) => Some(Rewrite::Difference { keep, drop }),
        _ => None,
    }
}

/// Shortcut for `left ∨ right`, if both sides are negated.
pub fn rewrite_or<'e>(left: &'e Expr, right: &'e Expr) -> Option<Rewrite<'e>> {
    match (left, right) {
        (Expr::Not(a), Expr::Not(b)) => Some(Rewrite::ComplementOfIntersection(a, b)),
        _ => None,
    }
}

/// Recursive tree evaluator. The universe is fetched at most once per evaluator.
pub struct Evaluator<'s, S: PostingSource> {
    source: &'s mut S,
    universe: Option<SkipList>,
}

impl<'s, S: PostingSource> Evaluator<'s, S> {
    pub fn new(source: &'s mut S) -> Self {
        Self { source, universe: None }
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<SkipList> {
        match expr {
            Expr::Empty | Expr::Ignored => Ok(SkipList::default()),
            Expr::Term(term) => self.source.doc_ids(term),
            Expr::Not(inner) => {
                let inner = self.eval(inner)?;
                self.complement(&inner)
            }
            Expr::And(l, r) => match rewrite_and(l, r) {
                Some(rewrite) => self.apply(rewrite),
                None => {
                    let (a, b) = (self.eval(l)?, self.eval(r)?);
                    Ok(merge::and(&a, &b))
                }
            },
            Expr::Or(l, r) => match rewrite_or(l, r) {
                Some(rewrite) => self.apply(rewrite),
                None => {
                    let (a, b) = (self.eval(l)?, self.eval(r)?);
                    Ok(merge::or(&a, &b))
                }
            },
        }
    }

    fn apply(&mut self, rewrite: Rewrite<'_>) -> Result<SkipList> {
        match rewrite {
            Rewrite::ComplementOfUnion(a, b) => {
                let union = merge::or(&self.eval(a)?, &self.eval(b)?);
                self.complement(&union)
            }
            Rewrite::ComplementOfIntersection(a, b) => {
                let both = merge::and(&self.eval(a)?, &self.eval(b)?);
                self.complement(&both)
            }
            Rewrite::Difference { keep, drop } => {
                Ok(merge::and_not(&self.eval(keep)?, &self.eval(drop)?))
            }
        }
    }

    fn complement(&mut self, list: &SkipList) -> Result<SkipList> {
        if self.universe.is_none() {
            self.universe = Some(self.source.universe()?);
        }
        let universe = self.universe.as_ref().map(|u| merge::not(list, u));
        Ok(universe.unwrap_or_default())
    }
}

/// Evaluate `expr` against `source`, returning ascending document IDs.
pub fn evaluate<S: PostingSource>(expr: &Expr, source: &mut S) -> Result<Vec<DocId>> {
    Ok(Evaluator::new(source).eval(expr)?.into_vec())
}
