use engine::AdMode;
use engine::api::{RollRequest, StatsRequest, roll_expression, roll_stats};

#[test]
fn roll_request_from_json() {
    let req: RollRequest =
        serde_json::from_str(r#"{"expression":"1d20+5","mode":"advantage","seed":2025}"#).unwrap();
    assert_eq!(req.mode, AdMode::Advantage);
    let res = roll_expression(&req).unwrap();
    assert!(res.total >= 6 && res.total <= 25);
    assert_eq!(res.details.len(), 2);
    assert_eq!(res.breakdown, res.details.join(" + "));
}

#[test]
fn mode_defaults_to_normal() {
    let req: RollRequest = serde_json::from_str(r#"{"expression":"2d6"}"#).unwrap();
    assert_eq!(req.mode, AdMode::Normal);
    assert!(req.seed.is_none());
    let res = roll_expression(&req).unwrap();
    assert!((2..=12).contains(&res.total));
}

#[test]
fn bad_expression_is_an_error() {
    let req = RollRequest {
        expression: "1dZ".into(),
        mode: AdMode::Normal,
        seed: Some(1),
    };
    let err = roll_expression(&req).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("1dZ"));
}

#[test]
fn seeded_stats_are_stable() {
    let a = roll_stats(&StatsRequest { seed: Some(7) });
    let b = roll_stats(&StatsRequest { seed: Some(7) });
    assert_eq!(a.scores, b.scores);
    assert_eq!(a.candidates, b.candidates);
    assert_eq!(a.scores.len(), 6);
}
