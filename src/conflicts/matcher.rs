//! Affiliation matcher
//!
//! Pattern-matches case party names against a mediator's stored employers,
//! affiliations, and prior-case parties. Pure functions over the evidence
//! store snapshot; no I/O, no side effects.
//!
//! Matching is symmetric case-insensitive substring containment to tolerate
//! abbreviations ("Acme" vs "Acme LLC"). This is intentionally permissive
//! and produces false positives; downstream recommendation text always
//! flags findings as requiring manual review rather than automatic
//! disqualification.

use crate::types::{ConflictFinding, ConflictKind, ConflictSource, Mediator, RiskLevel};
use serde::{Deserialize, Serialize};

/// Symmetric containment: either string contains the other, ignoring case
fn names_overlap(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Find all conflicts between a mediator's stored record and the case parties
///
/// Risk assignment is monotonic in currency: a current employer or current
/// affiliation match is HIGH, a former one is MEDIUM, and prior-case
/// involvement is MEDIUM.
pub fn find_conflicts(mediator: &Mediator, party_names: &[String]) -> Vec<ConflictFinding> {
    let mut findings = Vec::new();

    for party in party_names {
        if let Some(employer) = &mediator.current_employer {
            if names_overlap(employer, party) {
                findings.push(ConflictFinding {
                    kind: ConflictKind::Employment,
                    matched_entity: employer.clone(),
                    matched_party: party.clone(),
                    risk: RiskLevel::High,
                    source: ConflictSource::Database,
                    reason: "current employment".to_string(),
                });
            }
        }

        for former in &mediator.former_employers {
            if names_overlap(former, party) {
                findings.push(ConflictFinding {
                    kind: ConflictKind::Employment,
                    matched_entity: former.clone(),
                    matched_party: party.clone(),
                    risk: RiskLevel::Medium,
                    source: ConflictSource::Database,
                    reason: "former employment".to_string(),
                });
            }
        }

        for affiliation in &mediator.affiliations {
            if names_overlap(&affiliation.entity, party) {
                let (risk, reason) = if affiliation.is_current {
                    (RiskLevel::High, "current affiliation")
                } else {
                    (RiskLevel::Medium, "former affiliation")
                };
                findings.push(ConflictFinding {
                    kind: ConflictKind::Affiliation,
                    matched_entity: affiliation.entity.clone(),
                    matched_party: party.clone(),
                    risk,
                    source: ConflictSource::Database,
                    reason: reason.to_string(),
                });
            }
        }

        for case in &mediator.case_history {
            for prior_party in &case.parties {
                if names_overlap(prior_party, party) {
                    findings.push(ConflictFinding {
                        kind: ConflictKind::PriorCase,
                        matched_entity: prior_party.clone(),
                        matched_party: party.clone(),
                        risk: RiskLevel::Medium,
                        source: ConflictSource::Database,
                        reason: "prior case involvement".to_string(),
                    });
                }
            }
        }
    }

    findings
}

/// Lightweight conflict summary for latency-sensitive list rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuickCheck {
    pub has_conflict: bool,
    pub conflict_count: usize,
    pub high_risk: bool,
}

/// Database-only conflict summary; never touches scraped evidence
pub fn quick_check(mediator: &Mediator, party_names: &[String]) -> QuickCheck {
    let findings = find_conflicts(mediator, party_names);
    QuickCheck {
        has_conflict: !findings.is_empty(),
        conflict_count: findings.len(),
        high_risk: findings.iter().any(|f| f.risk == RiskLevel::High),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Affiliation, CaseRecord};

    fn mediator_with_employer(employer: &str) -> Mediator {
        let mut m = Mediator::new("Jane Doe");
        m.current_employer = Some(employer.to_string());
        m
    }

    #[test]
    fn test_current_employer_is_high_risk() {
        let mediator = mediator_with_employer("Acme LLC");
        let findings = find_conflicts(&mediator, &["Acme LLC".to_string()]);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, ConflictKind::Employment);
        assert_eq!(findings[0].risk, RiskLevel::High);
        assert_eq!(findings[0].source, ConflictSource::Database);
    }

    #[test]
    fn test_former_employer_is_medium_risk() {
        let mut mediator = Mediator::new("Jane Doe");
        mediator.former_employers.push("Acme LLC".to_string());

        let findings = find_conflicts(&mediator, &["Acme LLC".to_string()]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].risk, RiskLevel::Medium);
        assert_eq!(findings[0].reason, "former employment");
    }

    #[test]
    fn test_current_affiliation_is_always_high() {
        let mut mediator = Mediator::new("Jane Doe");
        mediator.affiliations.push(Affiliation {
            entity: "Widget Industry Association".to_string(),
            relationship: "board member".to_string(),
            is_current: true,
        });

        let findings =
            find_conflicts(&mediator, &["Widget Industry Association".to_string()]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].risk, RiskLevel::High);
    }

    #[test]
    fn test_prior_case_involvement_is_medium() {
        let mut mediator = Mediator::new("Jane Doe");
        mediator.case_history.push(CaseRecord {
            parties: vec!["Globex Corp".to_string(), "Initech".to_string()],
            role: "mediator".to_string(),
            outcome: Some("settled".to_string()),
        });

        let findings = find_conflicts(&mediator, &["Initech".to_string()]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, ConflictKind::PriorCase);
        assert_eq!(findings[0].risk, RiskLevel::Medium);
        assert_eq!(findings[0].reason, "prior case involvement");
    }

    #[test]
    fn test_containment_is_symmetric_and_case_insensitive() {
        let mediator = mediator_with_employer("ACME");
        let findings = find_conflicts(&mediator, &["acme corporation".to_string()]);
        assert_eq!(findings.len(), 1);

        let mediator = mediator_with_employer("Acme Corporation");
        let findings = find_conflicts(&mediator, &["ACME".to_string()]);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_empty_strings_never_match() {
        let mut mediator = Mediator::new("Jane Doe");
        mediator.current_employer = Some(String::new());
        let findings = find_conflicts(&mediator, &["Acme".to_string()]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_no_match_no_findings() {
        let mediator = mediator_with_employer("Acme LLC");
        let findings = find_conflicts(&mediator, &["Unrelated Partners".to_string()]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_quick_check_summarizes() {
        let mediator = mediator_with_employer("Acme LLC");
        let check = quick_check(
            &mediator,
            &["Acme LLC".to_string(), "Unrelated".to_string()],
        );
        assert!(check.has_conflict);
        assert_eq!(check.conflict_count, 1);
        assert!(check.high_risk);

        let check = quick_check(&mediator, &["Unrelated".to_string()]);
        assert!(!check.has_conflict);
        assert!(!check.high_risk);
    }
}
