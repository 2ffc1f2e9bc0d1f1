#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure eligibility predicate deciding which entities contribute occupancy.

use std::collections::BTreeSet;

use afk_spot_core::{AttackRule, Capability, EntitySnapshot};

const DELIMITERS: [char; 3] = [',', ';', '\n'];

/// Lower-cased, trimmed entity names accepted by the filter.
///
/// An empty set places no restriction on names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSet {
    names: BTreeSet<String>,
}

impl FilterSet {
    /// Reports whether the set places no restriction on names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of distinct names in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Iterates the names in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Reports whether the provided display name passes the filter.
    #[must_use]
    pub fn admits(&self, name: Option<&str>) -> bool {
        if self.names.is_empty() {
            return true;
        }
        name.is_some_and(|name| self.names.contains(&name.trim().to_lowercase()))
    }
}

/// Parses a delimiter-separated list of names into a fresh [`FilterSet`].
///
/// Names are split on commas, semicolons and newlines. Blank segments are
/// discarded and duplicates collapse.
#[must_use]
pub fn parse_filters(raw: &str) -> FilterSet {
    let names = raw
        .split(DELIMITERS)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_lowercase)
        .collect();
    FilterSet { names }
}

/// Predicate combining liveness, attack capability and the name filter.
#[derive(Clone, Copy, Debug)]
pub struct EntityFilter<'a> {
    names: &'a FilterSet,
    rule: AttackRule,
}

impl<'a> EntityFilter<'a> {
    /// Creates a predicate over the provided names and attack rule.
    #[must_use]
    pub const fn new(names: &'a FilterSet, rule: AttackRule) -> Self {
        Self { names, rule }
    }

    /// Reports whether the entity contributes occupancy this tick.
    #[must_use]
    pub fn is_eligible(&self, entity: &EntitySnapshot) -> bool {
        if !entity.alive {
            return false;
        }

        let attackable = entity.composition.as_ref().is_some_and(|composition| {
            composition
                .capabilities(self.rule)
                .contains(&Capability::Attack)
        });
        if !attackable {
            return false;
        }

        self.names.admits(entity.name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::parse_filters;

    #[test]
    fn splits_on_every_delimiter() {
        let filters = parse_filters("Goblin, giant rat;Cow\nImp");
        assert_eq!(
            filters.iter().collect::<Vec<_>>(),
            vec!["cow", "giant rat", "goblin", "imp"]
        );
    }

    #[test]
    fn blank_segments_are_discarded() {
        let filters = parse_filters(" ,;\n ;goblin;;  ");
        assert_eq!(filters.len(), 1);
    }

    #[test]
    fn duplicates_collapse_ignoring_case() {
        let filters = parse_filters("Goblin,GOBLIN, goblin ");
        assert_eq!(filters.len(), 1);
    }

    #[test]
    fn empty_string_yields_accept_all() {
        let filters = parse_filters("");
        assert!(filters.is_empty());
        assert!(filters.admits(None));
        assert!(filters.admits(Some("Anything")));
    }

    #[test]
    fn non_empty_set_rejects_unnamed_entities() {
        let filters = parse_filters("goblin");
        assert!(!filters.admits(None));
        assert!(filters.admits(Some("  GoBlIn ")));
    }
}
