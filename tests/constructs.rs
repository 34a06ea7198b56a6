use adornment::construct::{AdornedAtom, Atom, Binding, Program, Rule, Term};
use adornment::AdornError;

#[test]
fn mismatched_adornment_length_is_rejected() {
    let atom = Atom::new("T2", "X,Y");
    let err = AdornedAtom::new(atom.clone(), "b").unwrap_err();
    assert!(matches!(err, AdornError::MalformedAdornment { expected: 2, found: 1, .. }));

    let mut adorned = AdornedAtom::new(atom, "bf").unwrap();
    assert!(adorned.set_adornment("bff").is_err());
    // a rejected assignment leaves the previous adornment in place
    assert_eq!(adorned.adornment(), "bf");
}

#[test]
fn only_b_and_f_are_bindings() {
    let err = AdornedAtom::new(Atom::new("T1", "X"), "x").unwrap_err();
    assert!(format!("{}", err).contains("'x'"));
}

#[test]
fn constants_are_always_bound() {
    let atom = Atom::new("T3", "X,Y").with_constant(0, "Joe").unwrap();
    let mut adorned = AdornedAtom::new(atom, "ff").unwrap();
    assert_eq!(adorned.adornment(), "bf");
    adorned.set_adornment("fb").unwrap();
    assert_eq!(adorned.adornment(), "bb");
    assert_eq!(adorned.to_string(), "T3:bb(Joe,Y)");
}

#[test]
fn constant_position_must_exist() {
    assert!(Atom::new("T1", "X").with_constant(1, "Joe").is_err());
}

#[test]
fn adorned_atoms_are_identified_by_name_and_pattern() {
    let a = AdornedAtom::new(Atom::new("T2", "X,Y"), "bf").unwrap();
    let b = AdornedAtom::new(Atom::new("T2", "Z,W"), "bf").unwrap();
    let c = AdornedAtom::new(Atom::new("T2", "X,Y"), "fb").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.key(), b.key());
    assert_ne!(a, c);
    assert_eq!(a.key().to_string(), "T2:bf");
}

#[test]
fn head_binding_of_a_variable() {
    let head = AdornedAtom::new(Atom::new("T2", "X,Y"), "bf").unwrap();
    assert!(head.is_bound(&Term::variable("X")));
    assert!(!head.is_bound(&Term::variable("Y")));
    assert!(!head.is_bound(&Term::variable("Z")));
    assert!(!head.is_bound(&Term::constant("X")));
    assert_eq!(head.pattern().bindings(), &[Binding::Bound, Binding::Free]);
}

#[test]
fn sips_are_enumerated_lexicographically() {
    let rule = Rule::new(
        Atom::new("P", "X"),
        vec![Atom::new("A", "X"), Atom::new("B", "X"), Atom::new("C", "X")],
    );
    let orders: Vec<Vec<usize>> = rule.sips().map(|s| s.order().to_vec()).collect();
    assert_eq!(
        orders,
        vec![
            vec![0, 1, 2],
            vec![0, 2, 1],
            vec![1, 0, 2],
            vec![1, 2, 0],
            vec![2, 0, 1],
            vec![2, 1, 0],
        ]
    );
    let reordered: Vec<String> = rule.sip(vec![2, 0, 1]).unwrap().atoms(&rule).map(|a| a.to_string()).collect();
    assert_eq!(reordered, vec!["C(X)", "A(X)", "B(X)"]);
    assert!(rule.sip(vec![0, 0, 1]).is_none());
}

#[test]
fn a_fact_has_the_empty_ordering() {
    let rule = Rule::fact(Atom::new("T1", "X").with_constant(0, "Joe").unwrap());
    let sips: Vec<_> = rule.sips().collect();
    assert_eq!(sips.len(), 1);
    assert!(sips[0].order().is_empty());
    assert!(rule.is_fact());
    assert_eq!(rule.to_string(), "T1(Joe) :=");
}

#[test]
fn programs_print_one_rule_per_line() {
    let program: Program = vec![
        Rule::fact(Atom::new("T1", "X").with_constant(0, "Joe").unwrap()),
        Rule::new(Atom::new("T1", "X"), vec![Atom::new("Udirectory", "X").edb(true)]),
    ]
    .into_iter()
    .collect();
    assert_eq!(program.to_string(), "T1(Joe) :=\nT1(X) := Udirectory(X)\n");
    assert_eq!(program.defining("T1").count(), 2);
    assert_eq!(program.defining("Udirectory").count(), 0);
}
