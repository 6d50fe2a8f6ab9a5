//! Partitioning of basis functions into atom groups.

use std::fmt;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::population::PopulationAnalysisError;

#[cfg(test)]
#[path = "groups_tests.rs"]
mod groups_tests;

/// Structure containing an ordered partition of basis-function indices into labelled atom
/// groups.
///
/// The order of the groups is the order in which their labels were first encountered. Within
/// each group, the basis-function indices are kept in the order in which they were added.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomGroups {
    groups: IndexMap<String, Vec<usize>>,
}

impl AtomGroups {
    /// Derives atom groups from a sequence of orbital names.
    ///
    /// Each name is split on its first `_`; the part before it is the label of the atom owning
    /// the orbital. Names without `_` are their own labels.
    ///
    /// # Arguments
    ///
    /// * `names` - The orbital names, ordered by basis-function index.
    ///
    /// # Errors
    ///
    /// Errors if `names` is empty.
    pub fn from_orbital_names<S: AsRef<str>>(
        names: &[S],
    ) -> Result<Self, PopulationAnalysisError> {
        if names.is_empty() {
            return Err(PopulationAnalysisError::MissingRequiredInput(
                "the orbital-name sequence is empty".to_string(),
            ));
        }
        let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
        names.iter().enumerate().for_each(|(i, name)| {
            let label = atom_label(name.as_ref());
            groups.entry(label.to_string()).or_default().push(i);
        });
        Ok(Self { groups })
    }

    /// Constructs atom groups from an explicit partition of basis-function indices. The groups
    /// are labelled by their one-based positions.
    ///
    /// # Arguments
    ///
    /// * `indices` - A sequence of groups, each a list of basis-function indices.
    pub fn from_indices(indices: &[Vec<usize>]) -> Self {
        let groups = indices
            .iter()
            .enumerate()
            .map(|(i, group)| ((i + 1).to_string(), group.clone()))
            .collect::<IndexMap<_, _>>();
        Self { groups }
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the group labels in group order.
    pub fn labels(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect_vec()
    }

    /// Returns the basis-function indices of the group with the given label, if any.
    pub fn get(&self, label: &str) -> Option<&[usize]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    /// Returns the basis-function indices of the `i`th group.
    pub fn indices(&self, i: usize) -> Option<&[usize]> {
        self.groups.get_index(i).map(|(_, group)| group.as_slice())
    }

    /// Iterates over the groups in order, yielding labels and basis-function indices.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.groups
            .iter()
            .map(|(label, group)| (label.as_str(), group.as_slice()))
    }

    /// Returns the largest basis-function index in any group, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.groups.values().flatten().max().copied()
    }

    /// Returns the number of unordered pairs of distinct groups, $`n(n - 1)/2`$.
    pub fn n_pairs(&self) -> usize {
        let n = self.len();
        n * n.saturating_sub(1) / 2
    }
}

impl fmt::Display for AtomGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .groups
            .keys()
            .map(|label| label.chars().count())
            .max()
            .unwrap_or(5)
            .max(5);
        writeln!(f, "{:>label_width$}  Basis functions", "Group")?;
        for (label, group) in self.groups.iter() {
            writeln!(f, "{label:>label_width$}  {}", group.iter().join(", "))?;
        }
        Ok(())
    }
}

/// Returns the atom label of an orbital name, *i.e.* the part before the first `_`.
pub fn atom_label(name: &str) -> &str {
    name.split_once('_').map_or(name, |(label, _)| label)
}
