//! Phrase candidates: cheapest-first intersection, then positional verification.

use crate::boolean::merge;
use crate::skiplist::SkipList;

/// Intersect posting lists, shortest first so the running result shrinks fastest.
pub fn intersect_cheapest_first(mut lists: Vec<SkipList>) -> SkipList {
    lists.sort_by_key(SkipList::len);
    let mut lists = lists.into_iter();
    let Some(mut result) = lists.next() else {
        return SkipList::default();
    };
    for list in lists {
        if result.is_empty() {
            break;
        }
        result = merge::and(&result, &list);
    }
    result
}

/// Whether the tokens occur side by side in order.
///
/// `positions[i]` holds the ascending positions of the `i`-th query token in
/// one document. The phrase matches when some position `p` of the first
/// token has token `i` at `p + i` for every `i`.
pub fn is_adjacent_sequence(positions: &[&[u32]]) -> bool {
    let Some((first, rest)) = positions.split_first() else {
        return false;
    };
    first.iter().any(|&p| {
        rest.iter()
            .enumerate()
            .all(|(i, later)| later.binary_search(&(p + i as u32 + 1)).is_ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersects_all_lists() {
        let lists = vec![
            SkipList::new(0..50),
            SkipList::new([3, 7, 40]),
            SkipList::new((0..50).filter(|d| d % 2 == 1)),
        ];
        assert_eq!(intersect_cheapest_first(lists).as_slice(), &[3, 7]);
        assert!(intersect_cheapest_first(Vec::new()).is_empty());
    }

    #[test]
    fn adjacency_in_order_only() {
        // quick brown fox
        let quick: &[u32] = &[0];
        let brown: &[u32] = &[1];
        let fox: &[u32] = &[2];
        assert!(is_adjacent_sequence(&[quick, brown]));
        assert!(is_adjacent_sequence(&[quick, brown, fox]));
        assert!(!is_adjacent_sequence(&[brown, quick]));
        assert!(!is_adjacent_sequence(&[quick, fox]));
    }

    #[test]
    fn any_start_position_may_match() {
        let a: &[u32] = &[2, 9, 20];
        let b: &[u32] = &[5, 10];
        assert!(is_adjacent_sequence(&[a, b]));
        assert!(is_adjacent_sequence(&[a]));
        assert!(!is_adjacent_sequence(&[]));
    }
}
