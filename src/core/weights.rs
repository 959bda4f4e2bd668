use crate::domain::model::ComponentCategory;
use std::collections::BTreeMap;
use std::fmt;

const BASE_WEIGHTS: [(ComponentCategory, f64); 4] = [
    (ComponentCategory::Gpu, 5.0),
    (ComponentCategory::Cpu, 4.0),
    (ComponentCategory::Ram, 2.0),
    (ComponentCategory::Storage, 2.0),
];

/// Additive adjustments per recognised priority tag.
fn adjustments(tag: &str) -> &'static [(ComponentCategory, f64)] {
    match tag {
        "gaming" => &[(ComponentCategory::Gpu, 2.0), (ComponentCategory::Cpu, 1.0)],
        "office" => &[(ComponentCategory::Cpu, 2.0), (ComponentCategory::Storage, 1.0)],
        "silent" => &[(ComponentCategory::Gpu, -1.0), (ComponentCategory::Cpu, -0.5)],
        _ => &[],
    }
}

/// Per-category scoring weights. Values may be negative.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    weights: BTreeMap<ComponentCategory, f64>,
}

impl ScoringWeights {
    pub fn get(&self, category: ComponentCategory) -> f64 {
        self.weights.get(&category).copied().unwrap_or(0.0)
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            weights: BASE_WEIGHTS.into_iter().collect(),
        }
    }
}

impl fmt::Display for ScoringWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .weights
            .iter()
            .map(|(category, weight)| format!("{}={}", category, weight))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Turns priority tags into scoring weights. Unknown tags are ignored and
/// repeated tags apply again.
pub fn resolve_weights<S: AsRef<str>>(priority_tags: &[S]) -> ScoringWeights {
    let mut weights = ScoringWeights::default();

    for tag in priority_tags {
        let tag = tag.as_ref().trim().to_ascii_lowercase();
        let deltas = adjustments(&tag);
        if deltas.is_empty() {
            tracing::debug!("Ignoring unrecognised priority tag '{}'", tag);
            continue;
        }
        for (category, delta) in deltas {
            *weights.weights.entry(*category).or_insert(0.0) += delta;
        }
    }

    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_weights() {
        let weights = resolve_weights::<&str>(&[]);
        assert_eq!(weights.get(ComponentCategory::Gpu), 5.0);
        assert_eq!(weights.get(ComponentCategory::Cpu), 4.0);
        assert_eq!(weights.get(ComponentCategory::Ram), 2.0);
        assert_eq!(weights.get(ComponentCategory::Storage), 2.0);
        assert_eq!(weights.get(ComponentCategory::Case), 0.0);
    }

    #[test]
    fn test_tags_are_additive() {
        let weights = resolve_weights(&["gaming", "silent"]);
        assert_eq!(weights.get(ComponentCategory::Gpu), 6.0);
        assert_eq!(weights.get(ComponentCategory::Cpu), 4.5);

        let weights = resolve_weights(&[" Office "]);
        assert_eq!(weights.get(ComponentCategory::Cpu), 6.0);
        assert_eq!(weights.get(ComponentCategory::Storage), 3.0);
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        assert_eq!(resolve_weights(&["rgb", ""]), ScoringWeights::default());
    }

    #[test]
    fn test_weights_can_go_negative() {
        let tags = vec!["silent".to_string(); 6];
        let weights = resolve_weights(&tags);
        assert_eq!(weights.get(ComponentCategory::Gpu), -1.0);
        assert_eq!(weights.get(ComponentCategory::Cpu), 1.0);
    }

    #[test]
    fn test_display_lists_every_weight() {
        let rendered = resolve_weights(&["gaming"]).to_string();
        assert_eq!(rendered, "cpu=5, ram=2, gpu=7, storage=2");
    }
}
