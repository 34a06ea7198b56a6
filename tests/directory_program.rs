use adornment::adorn::{Engine, SearchState};
use adornment::construct::{AdornedAtom, AdornedKey, Atom};
use adornment::demo::directory_program;

fn query() -> AdornedAtom {
    AdornedAtom::new(Atom::new("Q", "Y"), "f").unwrap()
}

fn key(predicate: &str, adornment: &str) -> AdornedKey {
    AdornedKey::parse(predicate, adornment).unwrap()
}

#[test]
fn directory_query_is_adorned() {
    let program = directory_program().unwrap();
    let engine = Engine::new(&program);
    let adornment = engine.adorn(&query()).expect("no malformed adornments");
    assert!(adornment.is_success());
    let adorned = adornment.program().unwrap();
    // every first ordering works, so no backtracking takes place
    assert_eq!(adorned.len(), 26);
    assert_eq!(adornment.failed_patterns().count(), 0);
    assert_eq!(adornment.failed_orderings().count(), 0);
    assert!(adornment.unresolved().is_empty());
    let rules: Vec<String> = adorned.iter().map(|r| r.to_string()).collect();
    assert!(rules.contains(&"Q:f(Y) := T3:bf(Joe,Y)".to_string()));
    assert!(rules.contains(&"Q:f(Z) := Q:f(Y),T3:bf(Y,Z)".to_string()));
    assert!(rules.contains(&"T3:fb(X,Y) := T1:f(X),WorksWith:bb(X,Y)".to_string()));
    assert_eq!(rules.last().unwrap(), "Q:f(Z) := Q:f(Y),T3:bf(Y,Z)");
}

#[test]
fn patterns_complete_innermost_first() {
    let program = directory_program().unwrap();
    let engine = Engine::new(&program);
    let adornment = engine.adorn(&query()).unwrap();
    let completed: Vec<String> = adornment.state().completed().iter().map(|k| k.to_string()).collect();
    assert_eq!(
        completed,
        vec!["T1:b", "T1:f", "T3:ff", "T2:ff", "T3:fb", "T2:bf", "T3:bf", "Q:f"]
    );
    assert!(adornment.state().in_progress().is_empty());
}

#[test]
fn visited_patterns_stay_within_the_pattern_space() {
    let program = directory_program().unwrap();
    let engine = Engine::new(&program);
    let adornment = engine.adorn(&query()).unwrap();
    // four intensional predicates of arity at most two
    assert!(adornment.state().visited() <= 4 * 4);
}

#[test]
fn duplicates_are_left_for_the_post_pass() {
    let program = directory_program().unwrap();
    let engine = Engine::new(&program);
    let mut adorned = engine.adorn(&query()).unwrap().into_program().unwrap();
    // the fact T1("Joe") is adorned T1:b under both T1:b and T1:f
    assert_eq!(adorned.deduplicate(), 1);
    assert_eq!(adorned.len(), 25);
    assert_eq!(adorned.deduplicate(), 0);
}

#[test]
fn adornment_is_deterministic() {
    let program = directory_program().unwrap();
    let engine = Engine::new(&program);
    let first = engine.adorn(&query()).unwrap().into_program().unwrap().to_string();
    let second = engine.adorn(&query()).unwrap().into_program().unwrap().to_string();
    assert_eq!(first, second);
}

#[test]
fn completed_root_is_a_cache_hit() {
    let program = directory_program().unwrap();
    let engine = Engine::new(&program);
    let state = engine.adorn(&query()).unwrap().into_state();
    let completed = state.completed().len();

    let again = engine.adorn_with(&query(), state).unwrap();
    assert!(again.is_success());
    assert_eq!(again.state().completed().len(), completed);
    // the stored rules are handed back rather than derived anew
    let adorned = again.program().unwrap();
    assert!(adorned.iter().any(|r| r.to_string() == "Q:f(Y) := T3:bf(Joe,Y)"));
    assert!(again.unresolved().is_empty());
}

#[test]
fn forbidden_directory_scan_fails_the_query() {
    let program = directory_program().unwrap();
    let engine = Engine::new(&program);
    let mut state = SearchState::new();
    // the directory can only be probed, never listed, and works-with needs both people
    state.forbid(key("Udirectory", "f"));
    state.forbid(key("WorksWith", "bf"));
    state.forbid(key("WorksWith", "fb"));
    state.forbid(key("WorksWith", "ff"));
    let adornment = engine.adorn_with(&query(), state).unwrap();
    assert!(!adornment.is_success());
    assert!(adornment.program().is_none());
    assert!(adornment.failed_patterns().any(|k| *k == key("Q", "f")));
    assert!(adornment.failed_patterns().any(|k| *k == key("T3", "bf")));
    assert!(!adornment.state().completed().contains(&key("Q", "f")));
    assert!(adornment.state().in_progress().is_empty());
}
