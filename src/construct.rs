// other keepers use HashSet or HashMap
use core::hash::{BuildHasherDefault, Hasher};
use std::collections::HashSet;
use std::hash::Hash;
use seahash::SeaHasher;

// used to print out readable forms of a construct
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{AdornError, Result};

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

// ------------- Term -------------
/// One argument position of an atom: either a named variable or a literal constant.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Term {
    Variable(String),
    Constant(String),
}

impl Term {
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }
    pub fn constant(value: impl Into<String>) -> Self {
        Self::Constant(value.into())
    }
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
    // Constants are never "the same variable" as anything, so they have no name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            Self::Constant(_) => None,
        }
    }
}
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Variable(name) => write!(f, "{}", name),
            Self::Constant(value) => write!(f, "{}", value),
        }
    }
}

// ------------- Binding -------------
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Binding {
    Bound,
    Free,
}

impl Binding {
    pub fn symbol(self) -> char {
        match self {
            Self::Bound => 'b',
            Self::Free => 'f',
        }
    }
}

/// A binding string such as `bf`, one [`Binding`] per argument position.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Pattern(Vec<Binding>);

impl Pattern {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self(bindings)
    }
    /// Reads a binding string, rejecting anything outside the `{b, f}` alphabet.
    /// The predicate name is only used to make the error readable.
    pub fn parse(predicate: &str, adornment: &str) -> Result<Self> {
        adornment
            .chars()
            .map(|character| match character {
                'b' => Ok(Binding::Bound),
                'f' => Ok(Binding::Free),
                _ => Err(AdornError::InvalidBinding {
                    predicate: predicate.to_owned(),
                    character,
                }),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
    pub fn bindings(&self) -> &[Binding] {
        &self.0
    }
    pub fn get(&self, position: usize) -> Option<Binding> {
        self.0.get(position).copied()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl FromIterator<Binding> for Pattern {
    fn from_iter<I: IntoIterator<Item = Binding>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s: String = self.0.iter().map(|b| b.symbol()).collect();
        write!(f, "{}", s)
    }
}

// ------------- Atom -------------
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Atom {
    name: String,
    terms: Vec<Term>,
    edb: bool,
}

impl Atom {
    /// Builds an intensional atom whose terms are the comma separated variables,
    /// so `Atom::new("T2", "X,Y")` is `T2(X,Y)`.
    pub fn new(name: &str, variables: &str) -> Self {
        let terms = variables
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(Term::variable)
            .collect();
        Self::from_terms(name, terms)
    }
    pub fn from_terms(name: &str, terms: Vec<Term>) -> Self {
        Self {
            name: name.to_owned(),
            terms,
            edb: false,
        }
    }
    // The flag and the constants can only be given while the atom is being built,
    // which keeps atoms immutable once they are part of a rule.
    pub fn edb(mut self, edb: bool) -> Self {
        self.edb = edb;
        self
    }
    pub fn with_constant(mut self, position: usize, value: &str) -> Result<Self> {
        let arity = self.arity();
        let term = self.terms.get_mut(position).ok_or_else(|| {
            AdornError::MalformedAtom(format!(
                "{} has arity {} so position {} cannot hold a constant",
                self.name, arity, position
            ))
        })?;
        *term = Term::constant(value);
        Ok(self)
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }
    pub fn arity(&self) -> usize {
        self.terms.len()
    }
    pub fn is_edb(&self) -> bool {
        self.edb
    }
    pub fn same_predicate(&self, other: &Atom) -> bool {
        self.name == other.name
    }
}

fn write_terms(f: &mut fmt::Formatter, terms: &[Term]) -> fmt::Result {
    let s: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
    write!(f, "({})", s.join(","))
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        write_terms(f, &self.terms)
    }
}

// ------------- AdornedKey -------------
/// The identity of an adorned atom for memoization: predicate name plus binding
/// pattern. Term contents are deliberately not part of it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct AdornedKey {
    predicate: String,
    pattern: Pattern,
}

impl AdornedKey {
    pub fn new(predicate: &str, pattern: Pattern) -> Self {
        Self {
            predicate: predicate.to_owned(),
            pattern,
        }
    }
    /// Shorthand for keys written the way they are printed, e.g. `("T3", "bf")`.
    pub fn parse(predicate: &str, adornment: &str) -> Result<Self> {
        Ok(Self::new(predicate, Pattern::parse(predicate, adornment)?))
    }
    pub fn predicate(&self) -> &str {
        &self.predicate
    }
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}
impl fmt::Display for AdornedKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.predicate, self.pattern)
    }
}
impl Serialize for AdornedKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ------------- AdornedAtom -------------
#[derive(Clone, Debug)]
pub struct AdornedAtom {
    atom: Atom,
    pattern: Pattern,
}

impl AdornedAtom {
    pub fn new(atom: Atom, adornment: &str) -> Result<Self> {
        let pattern = Pattern::parse(atom.name(), adornment)?;
        Self::from_pattern(atom, pattern)
    }
    pub fn from_pattern(atom: Atom, pattern: Pattern) -> Result<Self> {
        let pattern = Self::checked(&atom, pattern)?;
        Ok(Self { atom, pattern })
    }
    pub fn set_adornment(&mut self, adornment: &str) -> Result<()> {
        let pattern = Pattern::parse(self.atom.name(), adornment)?;
        self.pattern = Self::checked(&self.atom, pattern)?;
        Ok(())
    }
    // The length must match the arity, and constants are always bound no matter
    // what the caller asked for.
    fn checked(atom: &Atom, pattern: Pattern) -> Result<Pattern> {
        if pattern.len() != atom.arity() {
            return Err(AdornError::MalformedAdornment {
                predicate: atom.name().to_owned(),
                expected: atom.arity(),
                found: pattern.len(),
            });
        }
        Ok(atom
            .terms()
            .iter()
            .zip(pattern.bindings())
            .map(|(term, binding)| if term.is_constant() { Binding::Bound } else { *binding })
            .collect())
    }
    pub fn atom(&self) -> &Atom {
        &self.atom
    }
    pub fn name(&self) -> &str {
        self.atom.name()
    }
    pub fn terms(&self) -> &[Term] {
        self.atom.terms()
    }
    pub fn arity(&self) -> usize {
        self.atom.arity()
    }
    pub fn is_edb(&self) -> bool {
        self.atom.is_edb()
    }
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
    pub fn adornment(&self) -> String {
        self.pattern.to_string()
    }
    pub fn key(&self) -> AdornedKey {
        AdornedKey::new(self.name(), self.pattern.clone())
    }
    /// Whether the given variable is bound here, judged at the first position it occupies.
    pub fn is_bound(&self, term: &Term) -> bool {
        let Some(name) = term.name() else {
            return false;
        };
        self.atom
            .terms()
            .iter()
            .position(|t| t.name() == Some(name))
            .and_then(|position| self.pattern.get(position))
            == Some(Binding::Bound)
    }
}
impl PartialEq for AdornedAtom {
    fn eq(&self, other: &Self) -> bool {
        self.atom.name() == other.atom.name() && self.pattern == other.pattern
    }
}
impl Eq for AdornedAtom {}
impl Hash for AdornedAtom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.atom.name().hash(state);
        self.pattern.hash(state);
    }
}
impl fmt::Display for AdornedAtom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.atom.name(), self.pattern)?;
        write_terms(f, self.atom.terms())
    }
}

// ------------- Sip -------------
/// One sideways information passing choice: a total ordering of a rule body,
/// expressed as indices into the canonical body.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Sip(Vec<usize>);

impl Sip {
    pub fn order(&self) -> &[usize] {
        &self.0
    }
    pub fn atoms<'r, A>(&'r self, rule: &'r Rule<A>) -> impl Iterator<Item = &'r A> + 'r {
        self.0.iter().filter_map(|&i| rule.body.get(i))
    }
}
impl fmt::Display for Sip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "[{}]", s.join(","))
    }
}

/// Lexicographic enumeration of every ordering of `0..n`, produced lazily since
/// the search usually commits to one of the first few.
#[derive(Debug)]
pub struct Sips {
    next: Option<Vec<usize>>,
}

impl Iterator for Sips {
    type Item = Sip;
    fn next(&mut self) -> Option<Sip> {
        let current = self.next.take()?;
        let mut following = current.clone();
        if advance(&mut following) {
            self.next = Some(following);
        }
        Some(Sip(current))
    }
}

// Steps to the next permutation in lexicographic order, false once the last one is reached.
fn advance(order: &mut [usize]) -> bool {
    let Some(pivot) = order.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let Some(successor) = order.iter().rposition(|&i| i > order[pivot]) else {
        return false;
    };
    order.swap(pivot, successor);
    order[pivot + 1..].reverse();
    true
}

// ------------- Rule -------------
#[derive(Clone, Debug)]
pub struct Rule<A = Atom> {
    head: A,
    body: Vec<A>,
}

impl<A> Rule<A> {
    pub fn new(head: A, body: Vec<A>) -> Self {
        Self { head, body }
    }
    pub fn fact(head: A) -> Self {
        Self {
            head,
            body: Vec::new(),
        }
    }
    pub fn head(&self) -> &A {
        &self.head
    }
    pub fn body(&self) -> &[A] {
        &self.body
    }
    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }
    /// All orderings of the body, the canonical one first. A fact has exactly one,
    /// the empty ordering.
    pub fn sips(&self) -> Sips {
        Sips {
            next: Some((0..self.body.len()).collect()),
        }
    }
    /// A specific ordering, provided it is a permutation of this body.
    pub fn sip(&self, order: Vec<usize>) -> Option<Sip> {
        let mut sorted = order.clone();
        sorted.sort_unstable();
        if sorted.into_iter().eq(0..self.body.len()) {
            Some(Sip(order))
        } else {
            None
        }
    }
}
impl<A: fmt::Display> fmt::Display for Rule<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let body: Vec<String> = self.body.iter().map(|a| a.to_string()).collect();
        if body.is_empty() {
            write!(f, "{} :=", self.head)
        } else {
            write!(f, "{} := {}", self.head, body.join(","))
        }
    }
}

impl Rule<AdornedAtom> {
    // Everything that makes two adorned rules interchangeable: atoms including
    // their terms, plus the binding patterns.
    fn signature(&self) -> Vec<(&Atom, &Pattern)> {
        std::iter::once(&self.head)
            .chain(self.body.iter())
            .map(|a| (a.atom(), a.pattern()))
            .collect()
    }
}

// ------------- Program -------------
#[derive(Clone, Debug)]
pub struct Program<A = Atom> {
    rules: Vec<Rule<A>>,
}

impl<A> Program<A> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }
    pub fn push(&mut self, rule: Rule<A>) {
        self.rules.push(rule);
    }
    pub fn rules(&self) -> &[Rule<A>] {
        &self.rules
    }
    pub fn rule(&self, index: usize) -> Option<&Rule<A>> {
        self.rules.get(index)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Rule<A>> {
        self.rules.iter()
    }
    pub fn len(&self) -> usize {
        self.rules.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
impl<A> Default for Program<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl Program<Atom> {
    /// Rules whose head is the named predicate, in program order, with their indices.
    pub fn defining<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.head.name() == predicate)
    }
}

impl Program<AdornedAtom> {
    pub fn contains(&self, rule: &Rule<AdornedAtom>) -> bool {
        let signature = rule.signature();
        self.rules.iter().any(|r| r.signature() == signature)
    }
    /// Removes structurally identical rules, keeping the first occurrence, and
    /// returns how many were dropped. The engine never calls this on its own.
    pub fn deduplicate(&mut self) -> usize {
        let before = self.rules.len();
        let mut seen: HashSet<Vec<(Atom, Pattern)>, OtherHasher> = HashSet::default();
        self.rules.retain(|rule| {
            let signature = rule
                .signature()
                .into_iter()
                .map(|(atom, pattern)| (atom.clone(), pattern.clone()))
                .collect();
            seen.insert(signature)
        });
        before - self.rules.len()
    }
}

impl<A> FromIterator<Rule<A>> for Program<A> {
    fn from_iter<I: IntoIterator<Item = Rule<A>>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
impl<A> Extend<Rule<A>> for Program<A> {
    fn extend<I: IntoIterator<Item = Rule<A>>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}
impl<'a, A> IntoIterator for &'a Program<A> {
    type Item = &'a Rule<A>;
    type IntoIter = std::slice::Iter<'a, Rule<A>>;
    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
impl<A> IntoIterator for Program<A> {
    type Item = Rule<A>;
    type IntoIter = std::vec::IntoIter<Rule<A>>;
    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}
impl<A: fmt::Display> fmt::Display for Program<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
