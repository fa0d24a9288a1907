//! Attribution of transactions to parties.

use fluxo_shared::{EngineConfig, PartyConfig};

/// Who a responsibility label attributes a transaction to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    /// Split 50/50 between the two partners.
    Shared,
    /// Wholly attributed to the party at this index of [`ResponsibilityRules::parties`].
    Party(usize),
    /// No party of interest.
    Unattributed,
}

#[derive(Debug, Clone)]
struct PartyMatcher {
    name: String,
    keys: Vec<String>,
}

impl PartyMatcher {
    fn from_config(party: &PartyConfig) -> Self {
        let keys = std::iter::once(&party.name)
            .chain(&party.aliases)
            .map(|key| key.trim().to_lowercase())
            .filter(|key| !key.is_empty())
            .collect();
        Self {
            name: party.name.trim().to_string(),
            keys,
        }
    }

    fn matches(&self, label: &str) -> bool {
        self.keys.iter().any(|key| label.contains(key.as_str()))
    }
}

/// Matching rules for responsibility labels.
///
/// Labels are compared case-insensitively by substring. Shared synonyms are
/// checked first; otherwise the first party (partners, then other parties)
/// whose name or alias appears in the label wins.
#[derive(Debug, Clone)]
pub struct ResponsibilityRules {
    synonyms: Vec<String>,
    parties: Vec<PartyMatcher>,
    partner_count: usize,
}

impl ResponsibilityRules {
    /// Builds rules from engine configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        let synonyms = config
            .shared_synonyms
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        let partners: Vec<PartyMatcher> = config
            .partners
            .iter()
            .take(2)
            .map(PartyMatcher::from_config)
            .collect();
        let partner_count = partners.len();
        let parties = partners
            .into_iter()
            .chain(config.other_parties.iter().map(PartyMatcher::from_config))
            .collect();

        Self {
            synonyms,
            parties,
            partner_count,
        }
    }

    /// Resolves a raw responsibility label.
    #[must_use]
    pub fn attribute(&self, label: &str) -> Attribution {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return Attribution::Unattributed;
        }
        if self.synonyms.iter().any(|s| label.contains(s.as_str())) {
            return Attribution::Shared;
        }
        self.parties
            .iter()
            .position(|party| party.matches(&label))
            .map_or(Attribution::Unattributed, Attribution::Party)
    }

    /// Display names of every party of interest, partners first.
    pub fn parties(&self) -> impl Iterator<Item = &str> {
        self.parties.iter().map(|party| party.name.as_str())
    }

    /// Indices of the two partners in [`Self::parties`].
    #[must_use]
    pub fn partner_indices(&self) -> std::ops::Range<usize> {
        0..self.partner_count
    }
}

impl Default for ResponsibilityRules {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rules() -> ResponsibilityRules {
        let mut config = EngineConfig::default();
        config.partners = vec![
            PartyConfig {
                name: "Ana".into(),
                aliases: vec!["Aninha".into()],
            },
            PartyConfig::named("Bruno"),
        ];
        config.other_parties = vec![PartyConfig::named("Kids")];
        ResponsibilityRules::from_config(&config)
    }

    #[rstest]
    #[case("shared", Attribution::Shared)]
    #[case("Both", Attribution::Shared)]
    #[case("Joint account", Attribution::Shared)]
    #[case("ana", Attribution::Party(0))]
    #[case("Aninha", Attribution::Party(0))]
    #[case("BRUNO", Attribution::Party(1))]
    #[case("kids school", Attribution::Party(2))]
    #[case("neighbour", Attribution::Unattributed)]
    #[case("", Attribution::Unattributed)]
    fn test_attribute(#[case] label: &str, #[case] expected: Attribution) {
        assert_eq!(rules().attribute(label), expected);
    }

    #[test]
    fn test_parties_list_partners_first() {
        let rules = rules();
        let names: Vec<&str> = rules.parties().collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Kids"]);
        assert_eq!(rules.partner_indices(), 0..2);
    }
}
