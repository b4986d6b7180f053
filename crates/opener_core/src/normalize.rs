use std::collections::{BTreeSet, HashMap};

/// Identifiers parsed from raw input, plus the indices of repeated values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedInput {
    pub identifiers: Vec<String>,
    pub duplicates: BTreeSet<usize>,
}

impl NormalizedInput {
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

/// Split raw text into trimmed, non-empty lines and flag repeated values.
///
/// Order is preserved and duplicates are kept; every index whose value occurs
/// more than once ends up in `duplicates`.
pub fn normalize(raw: &str) -> NormalizedInput {
    let identifiers: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    let duplicates = find_duplicates(&identifiers);
    NormalizedInput {
        identifiers,
        duplicates,
    }
}

fn find_duplicates(identifiers: &[String]) -> BTreeSet<usize> {
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::with_capacity(identifiers.len());
    for (index, value) in identifiers.iter().enumerate() {
        groups.entry(value.as_str()).or_default().push(index);
    }
    groups
        .into_values()
        .filter(|indices| indices.len() > 1)
        .flatten()
        .collect()
}
