//! Suggestion generation and ranking.
//!
//! Suggestions are derived deterministically from the defect lists of an
//! analysis. Each carries an optional [`SuggestedAction`] that the engine can
//! run through its normal layout pipeline.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::metrics::LayoutMetrics;
use crate::graph::{NodeCluster, Overlap, Severity};
use crate::layout::LayoutAlgorithm;

/// Normalized spacing variance above which spacing is called uneven.
pub const HIGH_VARIANCE: f64 = 0.5;

/// Alignment score below which alignment is called poor.
pub const POOR_ALIGNMENT: f64 = 0.3;

/// Messiness above which the algorithm suggestion is raised to high.
const VERY_MESSY: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Spacing,
    Algorithm,
    Grouping,
    Alignment,
}

/// Remediation the engine knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "algorithm", rename_all = "kebab-case")]
pub enum SuggestedAction {
    ApplyAlgorithm(LayoutAlgorithm),
    OptimizeSpacing,
    SnapToGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub severity: Severity,
    pub message: String,
    /// Estimated score improvement in [0, 1].
    pub improvement: f64,
    pub action: Option<SuggestedAction>,
}

/// Defects a suggestion set is generated from.
pub(crate) struct Findings<'a> {
    pub overlaps: &'a [Overlap],
    pub cycle_count: usize,
    pub disconnected: &'a [NodeCluster],
    pub cluster_count: usize,
    pub node_count: usize,
    pub metrics: &'a LayoutMetrics,
    pub messiness: f64,
    pub is_messy: bool,
}

/// Generate suggestions for a set of findings, already ranked.
pub(crate) fn generate(findings: &Findings<'_>) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if !findings.overlaps.is_empty() {
        let worst = findings
            .overlaps
            .iter()
            .map(|o| o.severity)
            .max()
            .unwrap_or(Severity::Medium);
        suggestions.push(Suggestion {
            kind: SuggestionKind::Spacing,
            severity: if worst == Severity::High { Severity::High } else { Severity::Medium },
            message: format!("{} overlapping node pairs; spread nodes apart", findings.overlaps.len()),
            improvement: (0.2 + 0.05 * findings.overlaps.len() as f64).min(0.5),
            action: Some(SuggestedAction::OptimizeSpacing),
        });
    }

    if findings.cycle_count > 0 {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Algorithm,
            severity: Severity::High,
            message: format!(
                "{} cycle(s) detected; a force layout handles loops better than levels",
                findings.cycle_count
            ),
            improvement: 0.4,
            action: Some(SuggestedAction::ApplyAlgorithm(LayoutAlgorithm::Force)),
        });
    }

    if findings.cluster_count > 1 && !findings.disconnected.is_empty() {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Grouping,
            severity: Severity::Medium,
            message: format!(
                "{} disconnected group(s); connect them to the main flow or group them",
                findings.disconnected.len()
            ),
            improvement: 0.2,
            action: None,
        });
    }

    if findings.is_messy {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Algorithm,
            severity: if findings.messiness > VERY_MESSY { Severity::High } else { Severity::Medium },
            message: "layout looks disorganized; apply a hierarchical layout".to_owned(),
            improvement: findings.messiness.min(0.6),
            action: Some(SuggestedAction::ApplyAlgorithm(LayoutAlgorithm::Hierarchical)),
        });
    }

    if findings.metrics.spacing_variance > HIGH_VARIANCE {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Spacing,
            severity: Severity::Low,
            message: "spacing between nodes is uneven".to_owned(),
            improvement: 0.15,
            action: Some(SuggestedAction::OptimizeSpacing),
        });
    }

    if findings.node_count >= 3 && findings.metrics.alignment < POOR_ALIGNMENT {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Alignment,
            severity: Severity::Medium,
            message: "few nodes share a row or column; snap them to the grid".to_owned(),
            improvement: 0.3 * (1.0 - findings.metrics.alignment),
            action: Some(SuggestedAction::SnapToGrid),
        });
    }

    rank_suggestions(&mut suggestions);
    suggestions
}

/// Sort by severity, then estimated improvement, both descending.
///
/// The sort is stable, so equal suggestions keep generation order.
pub fn rank_suggestions(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| {
        b.severity.cmp(&a.severity).then_with(|| {
            b.improvement
                .partial_cmp(&a.improvement)
                .unwrap_or(Ordering::Equal)
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    fn clean_metrics() -> LayoutMetrics {
        LayoutMetrics {
            overlap_ratio: 0.0,
            spacing_variance: 0.0,
            alignment: 1.0,
            distribution: 1.0,
            density: 1.0,
            crossing_score: 0.0,
        }
    }

    fn findings<'a>(metrics: &'a LayoutMetrics) -> Findings<'a> {
        Findings {
            overlaps: &[],
            cycle_count: 0,
            disconnected: &[],
            cluster_count: 1,
            node_count: 4,
            metrics,
            messiness: 0.0,
            is_messy: false,
        }
    }

    #[test]
    fn test_clean_layout_has_no_suggestions() {
        let metrics = clean_metrics();
        assert!(generate(&findings(&metrics)).is_empty());
    }

    #[test]
    fn test_cycle_outranks_uneven_spacing() {
        let metrics = LayoutMetrics {
            spacing_variance: 0.8,
            ..clean_metrics()
        };
        let suggestions = generate(&Findings {
            cycle_count: 1,
            ..findings(&metrics)
        });

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].kind, SuggestionKind::Algorithm);
        assert_eq!(suggestions[0].severity, Severity::High);
        assert_eq!(
            suggestions[0].action,
            Some(SuggestedAction::ApplyAlgorithm(LayoutAlgorithm::Force))
        );
        assert_eq!(suggestions[1].kind, SuggestionKind::Spacing);
        assert_eq!(suggestions[1].severity, Severity::Low);
    }

    #[test]
    fn test_overlap_severity_follows_worst_pair() {
        let metrics = clean_metrics();
        let overlap = |severity| Overlap {
            a: NodeId::new("a"),
            b: NodeId::new("b"),
            distance: 10.0,
            severity,
        };

        let medium = [overlap(Severity::Medium)];
        let s = generate(&Findings {
            overlaps: &medium,
            ..findings(&metrics)
        });
        assert_eq!(s[0].severity, Severity::Medium);

        let mixed = [overlap(Severity::Medium), overlap(Severity::High)];
        let s = generate(&Findings {
            overlaps: &mixed,
            ..findings(&metrics)
        });
        assert_eq!(s[0].severity, Severity::High);
        assert_eq!(s[0].action, Some(SuggestedAction::OptimizeSpacing));
    }

    #[test]
    fn test_ties_break_on_improvement() {
        let mut suggestions = vec![
            Suggestion {
                kind: SuggestionKind::Grouping,
                severity: Severity::Medium,
                message: String::new(),
                improvement: 0.1,
                action: None,
            },
            Suggestion {
                kind: SuggestionKind::Alignment,
                severity: Severity::Medium,
                message: String::new(),
                improvement: 0.3,
                action: None,
            },
            Suggestion {
                kind: SuggestionKind::Spacing,
                severity: Severity::High,
                message: String::new(),
                improvement: 0.0,
                action: None,
            },
        ];
        rank_suggestions(&mut suggestions);
        let kinds: Vec<_> = suggestions.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SuggestionKind::Spacing, SuggestionKind::Alignment, SuggestionKind::Grouping]
        );
    }

    #[test]
    fn test_action_wire_format() {
        let json = serde_json::to_string(&SuggestedAction::ApplyAlgorithm(LayoutAlgorithm::Force)).unwrap();
        assert_eq!(json, r#"{"type":"apply-algorithm","algorithm":"force"}"#);
        let json = serde_json::to_string(&SuggestedAction::OptimizeSpacing).unwrap();
        assert_eq!(json, r#"{"type":"optimize-spacing"}"#);
    }
}
