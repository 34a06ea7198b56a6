use adornment::adorn::{Engine, SearchState};
use adornment::construct::{AdornedAtom, AdornedKey, Atom, Program, Rule};
use adornment::report::Report;

#[test]
fn failed_request_reports_patterns_and_orderings() {
    let program: Program = vec![
        Rule::fact(Atom::new("T1", "X").with_constant(0, "Joe").unwrap()),
        Rule::new(Atom::new("T1", "X"), vec![Atom::new("Udirectory", "X").edb(true)]),
    ]
    .into_iter()
    .collect();
    let engine = Engine::new(&program);
    let mut state = SearchState::new();
    state.forbid(AdornedKey::parse("Udirectory", "f").unwrap());
    let query = AdornedAtom::new(Atom::new("T1", "X"), "f").unwrap();
    let adornment = engine.adorn_with(&query, state).unwrap();

    let report = Report::new(&adornment, &program);
    assert!(!report.success);
    assert!(report.rules.is_none());
    assert_eq!(report.failed_orderings, vec!["T1:f(X) := Udirectory(X)"]);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["query"], "T1:f");
    assert_eq!(json["failed_patterns"], serde_json::json!(["Udirectory:f", "T1:f"]));
    assert!(json.get("rules").is_none());
}

#[test]
fn successful_request_reports_rules() {
    let program = adornment::demo::directory_program().unwrap();
    let engine = Engine::new(&program);
    let query = AdornedAtom::new(Atom::new("Q", "Y"), "f").unwrap();
    let report = Report::new(&engine.adorn(&query).unwrap(), &program);
    assert!(report.success);
    assert_eq!(report.rules.as_ref().map(Vec::len), Some(26));
    assert_eq!(report.visited, 8);
    assert!(report.unresolved.is_empty());
}
