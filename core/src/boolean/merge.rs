use crate::skiplist::SkipList;
use std::cmp::Ordering;

/// `a ∧ b`. The lagging side advances with skip pointers toward the other side's value.
pub fn and(a: &SkipList, b: &SkipList) -> SkipList {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut ca, mut cb) = (a.cursor(), b.cursor());
    let (mut x, mut y) = (ca.next_doc(), cb.next_doc());
    while let (Some(u), Some(v)) = (x, y) {
        match u.cmp(&v) {
            Ordering::Equal => {
                out.push(u);
                x = ca.next_doc();
                y = cb.next_doc();
            }
            Ordering::Less => x = ca.next_toward(v),
            Ordering::Greater => y = cb.next_toward(u),
        }
    }
    SkipList::from_sorted(out)
}

/// `a ∧ ¬b`, without materialising `¬b`.
pub fn and_not(a: &SkipList, b: &SkipList) -> SkipList {
    let (a, b) = (a.as_slice(), b.as_slice());
    let mut out = Vec::with_capacity(a.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => j += 1,
        }
    }
    out.extend_from_slice(&a[i..]);
    SkipList::from_sorted(out)
}

/// `a ∨ b`.
pub fn or(a: &SkipList, b: &SkipList) -> SkipList {
    let (a, b) = (a.as_slice(), b.as_slice());
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    SkipList::from_sorted(out)
}

/// `¬a` relative to `universe`. Entries of `a` outside the universe are ignored.
pub fn not(a: &SkipList, universe: &SkipList) -> SkipList {
    let (a, u) = (a.as_slice(), universe.as_slice());
    let mut out = Vec::with_capacity(u.len().saturating_sub(a.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < u.len() {
        match a[i].cmp(&u[j]) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => {
                out.push(u[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&u[j..]);
    SkipList::from_sorted(out)
}
