use std::collections::HashMap;

use super::types::ModelPricing;

/// How a model name was matched against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Partial,
    Fallback,
}

/// Closeness of a catalog key to the requested model, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Closeness {
    /// Same name up to case and surrounding whitespace
    Normalized,
    /// Key is a prefix, suffix or infix of the name, e.g. a dated version
    KeyInName,
    /// Name is an abbreviation of the key
    NameInKey,
}

/// Find catalog pricing for `model` by exact key, then by partial match.
///
/// Names equal to a key up to case and surrounding whitespace count as
/// exact. Otherwise keys contained in the name are preferred, longest
/// first, over keys that contain the name, shortest first. Remaining ties
/// resolve lexicographically, so the result does not depend on insertion
/// order.
pub(super) fn resolve_known<'a>(
    model: &str,
    models: &'a HashMap<String, ModelPricing>,
) -> Option<(&'a ModelPricing, MatchKind)> {
    if let Some(pricing) = models.get(model) {
        return Some((pricing, MatchKind::Exact));
    }

    let model_lower = model.trim().to_lowercase();
    if model_lower.is_empty() {
        return None;
    }

    let mut candidates: Vec<(Closeness, &String, &ModelPricing)> = models
        .iter()
        .filter_map(|(name, pricing)| {
            let name_lower = name.trim().to_lowercase();
            let closeness = if name_lower.is_empty() {
                return None;
            } else if name_lower == model_lower {
                Closeness::Normalized
            } else if model_lower.contains(&name_lower) {
                Closeness::KeyInName
            } else if name_lower.contains(&model_lower) {
                Closeness::NameInKey
            } else {
                return None;
            };
            Some((closeness, name, pricing))
        })
        .collect();
    candidates.sort_by(|(ca, a, _), (cb, b, _)| {
        ca.cmp(cb)
            .then_with(|| match ca {
                Closeness::KeyInName => b.len().cmp(&a.len()),
                _ => a.len().cmp(&b.len()),
            })
            .then_with(|| a.cmp(b))
    });

    candidates.first().map(|(closeness, _, pricing)| {
        let kind = match closeness {
            Closeness::Normalized => MatchKind::Exact,
            _ => MatchKind::Partial,
        };
        (*pricing, kind)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> HashMap<String, ModelPricing> {
        names
            .iter()
            .map(|n| (n.to_string(), ModelPricing::new(*n, 0.001, 0.002, "")))
            .collect()
    }

    #[test]
    fn exact_match_wins() {
        let models = catalog(&["gpt-4o", "gpt-4o-mini"]);
        let (p, kind) = resolve_known("gpt-4o", &models).unwrap();
        assert_eq!(p.model_name, "gpt-4o");
        assert_eq!(kind, MatchKind::Exact);
    }

    #[test]
    fn versioned_name_matches_longest_key() {
        let models = catalog(&["gpt-4", "gpt-4o", "gpt-4o-mini"]);
        let (p, kind) = resolve_known("gpt-4o-mini-2024-07-18", &models).unwrap();
        assert_eq!(p.model_name, "gpt-4o-mini");
        assert_eq!(kind, MatchKind::Partial);
    }

    #[test]
    fn short_name_matches_containing_key() {
        let models = catalog(&["claude-3-opus-20240229", "gpt-4"]);
        let (p, _) = resolve_known("claude-3-opus", &models).unwrap();
        assert_eq!(p.model_name, "claude-3-opus-20240229");
    }

    #[test]
    fn equal_length_ties_resolve_lexicographically() {
        let models = catalog(&["model-b", "model-a"]);
        let (p, _) = resolve_known("model-", &models).unwrap();
        assert_eq!(p.model_name, "model-a");
    }

    #[test]
    fn partial_match_ignores_case() {
        let models = catalog(&["gemini-1.5-pro"]);
        let (p, _) = resolve_known("Gemini-1.5-Pro-002", &models).unwrap();
        assert_eq!(p.model_name, "gemini-1.5-pro");
    }

    #[test]
    fn case_and_whitespace_variants_are_exact() {
        let models = catalog(&["gpt-4", "gpt-4-turbo", "gpt-4o", "gpt-4o-mini"]);
        for (input, expected) in [("GPT-4O", "gpt-4o"), (" gpt-4o", "gpt-4o"), ("GPT-4", "gpt-4")] {
            let (p, kind) = resolve_known(input, &models).unwrap();
            assert_eq!(p.model_name, expected, "input {input:?}");
            assert_eq!(kind, MatchKind::Exact);
        }
    }

    #[test]
    fn contained_key_beats_containing_key() {
        let models = catalog(&["gpt-4", "gpt-4-0613-preview"]);
        let (p, kind) = resolve_known("gpt-4-0613", &models).unwrap();
        assert_eq!(p.model_name, "gpt-4");
        assert_eq!(kind, MatchKind::Partial);
    }

    #[test]
    fn abbreviation_prefers_shortest_containing_key() {
        let models = catalog(&["claude-3-opus-20240229", "claude-3-opus-20240229-vertex"]);
        let (p, kind) = resolve_known("claude-3-opus", &models).unwrap();
        assert_eq!(p.model_name, "claude-3-opus-20240229");
        assert_eq!(kind, MatchKind::Partial);
    }

    #[test]
    fn no_match_returns_none() {
        let models = catalog(&["gpt-4o"]);
        assert!(resolve_known("llama-3-70b", &models).is_none());
    }

    #[test]
    fn empty_name_never_partially_matches() {
        let models = catalog(&["gpt-4o"]);
        assert!(resolve_known("", &models).is_none());
        assert!(resolve_known("   ", &models).is_none());
    }
}
