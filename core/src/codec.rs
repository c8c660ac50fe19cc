//! Term codec: turns one document's ordered term list into its term table.

use std::collections::HashMap;

/// Occurrences of one term inside one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermOccurrence {
    pub tf: u32,
    /// Ascending indices into the document's term sequence.
    pub positions: Vec<u32>,
}

/// Map each distinct term to its frequency and positions. Position `i` is the
/// index of the term in `terms`.
pub fn term_table<S: AsRef<str>>(terms: &[S]) -> HashMap<String, TermOccurrence> {
    let mut table: HashMap<String, TermOccurrence> = HashMap::new();
    for (pos, term) in terms.iter().enumerate() {
        let occ = table.entry(term.as_ref().to_string()).or_default();
        occ.tf += 1;
        occ.positions.push(pos as u32);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_positions() {
        let table = term_table(&["to", "be", "or", "not", "to", "be"]);
        assert_eq!(table.len(), 4);
        assert_eq!(table["to"], TermOccurrence { tf: 2, positions: vec![0, 4] });
        assert_eq!(table["not"].positions, vec![3]);
    }

    #[test]
    fn empty_document() {
        assert!(term_table::<&str>(&[]).is_empty());
    }
}
