use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compliance::{evaluate, ComplianceRecord, ComplianceStatus, DesignMetadata};
use crate::conjunction::{screen_catalog, ConjunctionEvent, RiskLevel, ScreeningWindow};
use crate::propagation::{propagate, PropagationError};
use crate::tle::TrackedObject;

/// Top-level engine output for one object: conjunction events and
/// compliance records rolled up into an overall level, score, and ordered
/// recommendations.
#[derive(Debug, Serialize)]
pub struct RiskAssessment {
    pub catalog_number: u32,
    pub name: String,
    pub window_start: DateTime<Utc>,
    pub overall_risk: RiskLevel,
    /// 0 (worst) to 100 (best).
    pub overall_score: f64,
    pub conjunctions: Vec<ConjunctionEvent>,
    pub compliance: Vec<ComplianceRecord>,
    pub recommendations: Vec<String>,
    /// Objects that could not be screened, with the reason.
    pub skipped_objects: Vec<String>,
}

/// Screen `primary` against a catalog and evaluate its compliance.
/// Fails only when the primary itself cannot be propagated; per-secondary
/// failures are reported in `skipped_objects`.
pub fn assess(
    primary: &TrackedObject,
    others: &[TrackedObject],
    window: &ScreeningWindow,
    metadata: &DesignMetadata,
) -> Result<RiskAssessment, PropagationError> {
    let current_state = propagate(&primary.elements, window.start)?;

    let screening = screen_catalog(primary, others, window);
    let compliance = evaluate(primary, &current_state, metadata);

    let worst_event = screening.events.first().map(|e| e.risk_level);
    let conjunction_penalty = match worst_event {
        Some(RiskLevel::Critical) => 90.0,
        Some(RiskLevel::High) => 60.0,
        Some(RiskLevel::Medium) => 30.0,
        Some(RiskLevel::Low) => 5.0,
        None => 0.0,
    };

    let scored: Vec<f64> = compliance
        .iter()
        .filter(|r| r.status != ComplianceStatus::CannotEvaluate)
        .map(|r| r.score)
        .collect();
    let compliance_mean = if scored.is_empty() {
        50.0
    } else {
        scored.iter().sum::<f64>() / scored.len() as f64
    };

    let overall_score =
        ((100.0 - conjunction_penalty) * 0.7 + compliance_mean * 0.3).clamp(0.0, 100.0);
    let score_level = if overall_score < 25.0 {
        RiskLevel::Critical
    } else if overall_score < 50.0 {
        RiskLevel::High
    } else if overall_score < 75.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    let overall_risk = worst_event.unwrap_or(RiskLevel::Low).max(score_level);

    let recommendations = build_recommendations(&screening.events, &compliance);
    let skipped_objects = screening
        .failures
        .iter()
        .map(|f| format!("object {}: {}", f.catalog_number, f.error))
        .collect();

    Ok(RiskAssessment {
        catalog_number: primary.catalog_number(),
        name: primary.name.clone(),
        window_start: window.start,
        overall_risk,
        overall_score,
        conjunctions: screening.events,
        compliance,
        recommendations,
        skipped_objects,
    })
}

/// Conjunction actions first (events arrive sorted by severity), then
/// compliance remediation in requirement order.
fn build_recommendations(
    events: &[ConjunctionEvent],
    compliance: &[ComplianceRecord],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    let mut actionable = false;
    for event in events {
        if event.risk_level >= RiskLevel::Medium {
            actionable = true;
            recommendations.push(format!(
                "object {}: {}",
                event.secondary,
                event.risk_level.recommended_action()
            ));
        }
    }
    if !actionable {
        recommendations.push(RiskLevel::Low.recommended_action().to_string());
    }

    for record in compliance {
        match record.status {
            ComplianceStatus::NonCompliant => recommendations.push(format!(
                "address {} non-compliance: {}",
                record.requirement, record.rationale
            )),
            ComplianceStatus::Warning => recommendations.push(format!(
                "review {}: {}",
                record.requirement, record.rationale
            )),
            ComplianceStatus::CannotEvaluate => recommendations.push(format!(
                "supply design metadata for {}",
                record.requirement
            )),
            ComplianceStatus::Compliant => {}
        }
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tle::{self, ObjectClass};
    use chrono::Duration;

    const ISS_L1: &str = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    const ISS_L2: &str = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

    fn primary() -> TrackedObject {
        TrackedObject::new(
            "ISS (ZARYA)",
            ObjectClass::Satellite,
            tle::parse(ISS_L1, ISS_L2).unwrap(),
        )
    }

    fn shadow_debris() -> TrackedObject {
        let mut elements = tle::parse(ISS_L1, ISS_L2).unwrap();
        elements.catalog_number = 90001;
        TrackedObject::new("SHADOW DEB", ObjectClass::Debris, elements)
    }

    fn window(primary: &TrackedObject) -> ScreeningWindow {
        let mut w = ScreeningWindow::starting(primary.elements.epoch);
        w.horizon = Duration::hours(1);
        w
    }

    #[test]
    fn coincident_debris_drives_critical_assessment() {
        let p = primary();
        let assessment = assess(
            &p,
            &[shadow_debris()],
            &window(&p),
            &DesignMetadata::default(),
        )
        .unwrap();

        assert_eq!(assessment.overall_risk, RiskLevel::Critical);
        assert_eq!(assessment.conjunctions.len(), 1);
        assert_eq!(assessment.compliance.len(), 4);
        assert!(assessment.overall_score < 50.0);
        assert!(assessment.recommendations[0].contains("immediate avoidance maneuver"));
        // Missing design flags surface as metadata requests, not scores
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("supply design metadata")));
    }

    #[test]
    fn quiet_sky_scores_low_risk() {
        let p = primary();
        let assessment = assess(&p, &[], &window(&p), &DesignMetadata::default()).unwrap();

        assert_eq!(assessment.overall_risk, RiskLevel::Low);
        assert!(assessment.conjunctions.is_empty());
        assert!(assessment.overall_score > 75.0);
        assert_eq!(
            assessment.recommendations[0],
            "continue normal monitoring"
        );
    }

    #[test]
    fn assessment_is_deterministic() {
        let p = primary();
        let others = [shadow_debris()];
        let metadata = DesignMetadata::default();

        let a = assess(&p, &others, &window(&p), &metadata).unwrap();
        let b = assess(&p, &others, &window(&p), &metadata).unwrap();

        assert_eq!(a.overall_score, b.overall_score);
        assert_eq!(a.overall_risk, b.overall_risk);
        assert_eq!(a.recommendations, b.recommendations);
        assert_eq!(
            serde_json::to_string(&a.conjunctions).unwrap(),
            serde_json::to_string(&b.conjunctions).unwrap()
        );
    }
}
