//! The adornment search.
//!
//! [`Engine::adorn_atom`] and [`Engine::adorn_rule`] call each other: adorning a
//! binding pattern means finding, for every rule defining the predicate, a body
//! ordering under which every body atom is either extensional or can itself be
//! adorned. All memoization lives in a [`SearchState`] that is threaded through
//! every call by `&mut`, so a search can be started, inspected and resumed
//! without any global state.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info, warn};

use crate::construct::{
    AdornedAtom, AdornedKey, Atom, Binding, OtherHasher, Pattern, Program, Rule, Sip,
};
use crate::error::{AdornError, Result};

// Sets keep insertion order so that diagnostics print the same way every run.
pub type MemoSet<T> = IndexSet<T, OtherHasher>;

// ------------- SipKey -------------
/// Identifies one body ordering of one rule, tried under one head binding pattern.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SipKey {
    rule: usize,
    head: Pattern,
    sip: Sip,
}

impl SipKey {
    pub fn new(rule: usize, head: Pattern, sip: Sip) -> Self {
        Self { rule, head, sip }
    }
    pub fn rule(&self) -> usize {
        self.rule
    }
    pub fn head(&self) -> &Pattern {
        &self.head
    }
    pub fn sip(&self) -> &Sip {
        &self.sip
    }
}
impl fmt::Display for SipKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "rule {} under {} ordered {}", self.rule, self.head, self.sip)
    }
}

// ------------- SearchState -------------
#[derive(Debug, Default)]
pub struct SearchState {
    failed_adorn: MemoSet<AdornedKey>,
    failed_sips: MemoSet<SipKey>,
    completed: MemoSet<AdornedKey>,
    in_progress: MemoSet<AdornedKey>,
    // the rules each completed pattern contributed for its own head
    derived: IndexMap<AdornedKey, Vec<Rule<AdornedAtom>>, OtherHasher>,
    undefined: MemoSet<AdornedKey>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }
    /// Marks a binding pattern as unusable before the search starts, typically an
    /// access pattern a data source does not support (e.g. a web service that
    /// needs its first argument).
    pub fn forbid(&mut self, key: AdornedKey) {
        self.failed_adorn.insert(key);
    }
    pub fn failed_adorn(&self) -> &MemoSet<AdornedKey> {
        &self.failed_adorn
    }
    pub fn failed_sips(&self) -> &MemoSet<SipKey> {
        &self.failed_sips
    }
    pub fn completed(&self) -> &MemoSet<AdornedKey> {
        &self.completed
    }
    pub fn in_progress(&self) -> &MemoSet<AdornedKey> {
        &self.in_progress
    }
    pub fn undefined(&self) -> &MemoSet<AdornedKey> {
        &self.undefined
    }
    pub fn derived(&self, key: &AdornedKey) -> Option<&[Rule<AdornedAtom>]> {
        self.derived.get(key).map(Vec::as_slice)
    }
    /// Distinct binding patterns the search has settled or is working on.
    pub fn visited(&self) -> usize {
        self.failed_adorn.len() + self.completed.len() + self.in_progress.len()
    }
    fn fail(&mut self, key: &AdornedKey) {
        self.in_progress.shift_remove(key);
        self.failed_adorn.insert(key.clone());
    }
}

// ------------- Outcome -------------
/// Result of one adornment attempt. Failure is an ordinary outcome that drives
/// backtracking, so it is tagged here rather than reported as an error.
#[derive(Debug)]
pub enum Outcome {
    /// The adorned rules produced by this call, including those of any
    /// sub-adornments it triggered. Empty on a cache hit.
    Adorned(Vec<Rule<AdornedAtom>>),
    Infeasible,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Adorned(_))
    }
    pub fn rules(&self) -> &[Rule<AdornedAtom>] {
        match self {
            Self::Adorned(rules) => rules,
            Self::Infeasible => &[],
        }
    }
}

/// Adorns an ordered body in a single forward pass. A position is bound when it
/// holds a constant, a variable bound in the head, or a variable an earlier atom
/// already mentioned.
pub fn propagate<'a>(
    head: &AdornedAtom,
    body: impl IntoIterator<Item = &'a Atom>,
) -> Result<Vec<AdornedAtom>> {
    let mut seen: HashSet<&str, OtherHasher> = HashSet::default();
    let mut adorned = Vec::new();
    for atom in body {
        let pattern: Pattern = atom
            .terms()
            .iter()
            .map(|term| {
                let bound = match term.name() {
                    None => true,
                    Some(name) => seen.contains(name) || head.is_bound(term),
                };
                if let Some(name) = term.name() {
                    seen.insert(name);
                }
                if bound { Binding::Bound } else { Binding::Free }
            })
            .collect();
        adorned.push(AdornedAtom::from_pattern(atom.clone(), pattern)?);
    }
    Ok(adorned)
}

// ------------- Engine -------------
pub struct Engine<'p> {
    program: &'p Program,
}

impl<'p> Engine<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self { program }
    }
    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// Runs one root request with a fresh search state.
    pub fn adorn(&self, query: &AdornedAtom) -> Result<Adornment> {
        self.adorn_with(query, SearchState::new())
    }

    /// Runs one root request on a prepared state, e.g. one with forbidden access
    /// patterns, or one left over from an earlier request.
    pub fn adorn_with(&self, query: &AdornedAtom, mut state: SearchState) -> Result<Adornment> {
        let key = query.key();
        let (program, unresolved) = match self.adorn_atom(query, &mut state)? {
            Outcome::Adorned(rules) => {
                let mut program: Program<AdornedAtom> = rules.into_iter().collect();
                let returned = program.len();
                let unresolved = restore(&mut program, &key, &state);
                info!(
                    query = %key,
                    rules = program.len(),
                    restored = program.len() - returned,
                    visited = state.visited(),
                    "adornment complete"
                );
                for missing in &unresolved {
                    warn!(query = %key, pattern = %missing, "adorned program refers to a pattern with no adorned rules");
                }
                (Some(program), unresolved)
            }
            Outcome::Infeasible => {
                info!(
                    query = %key,
                    failed = state.failed_adorn.len(),
                    failed_orderings = state.failed_sips.len(),
                    "adornment failed"
                );
                (None, Vec::new())
            }
        };
        Ok(Adornment {
            query: query.clone(),
            program,
            state,
            unresolved,
        })
    }

    /// Adorns every rule defining `target`'s predicate under `target`'s binding
    /// pattern. Either all of them find a feasible ordering and the pattern is
    /// completed, or the pattern is recorded as infeasible and nothing is returned.
    pub fn adorn_atom(&self, target: &AdornedAtom, state: &mut SearchState) -> Result<Outcome> {
        let key = target.key();
        if state.failed_adorn.contains(&key) {
            debug!(pattern = %key, "known to be infeasible");
            return Ok(Outcome::Infeasible);
        }
        if state.completed.contains(&key) {
            debug!(pattern = %key, "already completed");
            return Ok(Outcome::Adorned(Vec::new()));
        }
        let defining: Vec<(usize, &Rule)> = self.program.defining(target.name()).collect();
        if defining.is_empty() {
            debug!(pattern = %key, "no rule defines the predicate");
            state.undefined.insert(key.clone());
            state.fail(&key);
            return Ok(Outcome::Infeasible);
        }

        debug!(pattern = %key, rules = defining.len(), "adorning");
        state.in_progress.insert(key.clone());
        let mut adorned = Vec::new();
        let mut own = Vec::with_capacity(defining.len());
        for (index, rule) in defining {
            let head = AdornedAtom::from_pattern(rule.head().clone(), target.pattern().clone())?;
            match self.first_feasible(index, rule, &head, state)? {
                Some(rules) => {
                    // the rule for this head always comes last
                    if let Some(rule) = rules.last() {
                        own.push(rule.clone());
                    }
                    adorned.extend(rules);
                }
                None => {
                    debug!(pattern = %key, rule = index, "every ordering failed");
                    state.fail(&key);
                    return Ok(Outcome::Infeasible);
                }
            }
        }

        state.in_progress.shift_remove(&key);
        state.completed.insert(key.clone());
        debug!(pattern = %key, rules = adorned.len(), "completed");
        state.derived.insert(key, own);
        Ok(Outcome::Adorned(adorned))
    }

    // Tries the orderings of one rule in enumeration order and commits to the first
    // that works.
    fn first_feasible(
        &self,
        index: usize,
        rule: &Rule,
        head: &AdornedAtom,
        state: &mut SearchState,
    ) -> Result<Option<Vec<Rule<AdornedAtom>>>> {
        for sip in rule.sips() {
            let sip_key = SipKey::new(index, head.pattern().clone(), sip);
            if state.failed_sips.contains(&sip_key) {
                debug!(head = %head, sip = %sip_key, "ordering known to fail");
                continue;
            }
            if let Outcome::Adorned(rules) = self.adorn_rule(index, head, sip_key.sip(), state)? {
                return Ok(Some(rules));
            }
        }
        Ok(None)
    }

    /// Adorns rule `index` for the given adorned head with its body taken in the
    /// order of `sip`. Intensional body patterns that are neither completed nor in
    /// progress are adorned recursively; one that is in progress is assumed to be
    /// satisfiable, its rules being supplied by the call that is working on it.
    pub fn adorn_rule(
        &self,
        index: usize,
        head: &AdornedAtom,
        sip: &Sip,
        state: &mut SearchState,
    ) -> Result<Outcome> {
        let rule = self.program.rule(index).ok_or(AdornError::UnknownRule(index))?;
        let body = propagate(head, sip.atoms(rule))?;
        debug!(head = %head, sip = %sip, "trying ordering");

        let mut adorned = Vec::new();
        for atom in &body {
            let key = atom.key();
            if state.failed_adorn.contains(&key) {
                debug!(head = %head, sip = %sip, pattern = %key, "ordering needs an infeasible pattern");
                state.failed_sips.insert(SipKey::new(index, head.pattern().clone(), sip.clone()));
                return Ok(Outcome::Infeasible);
            }
            if atom.is_edb() || state.completed.contains(&key) || state.in_progress.contains(&key) {
                continue;
            }
            match self.adorn_atom(atom, state)? {
                Outcome::Adorned(rules) => adorned.extend(rules),
                Outcome::Infeasible => {
                    state.failed_sips.insert(SipKey::new(index, head.pattern().clone(), sip.clone()));
                    return Ok(Outcome::Infeasible);
                }
            }
        }
        adorned.push(Rule::new(head.clone(), body));
        Ok(Outcome::Adorned(adorned))
    }
}

// A pattern can be completed inside an ordering that later fails. It stays
// completed, but the rules it produced were dropped along with that ordering, so
// later references to it would dangle. Walk the output from the query and put
// back the stored rules of every completed pattern it reaches. Patterns reached
// that never completed are returned.
fn restore(
    program: &mut Program<AdornedAtom>,
    query: &AdornedKey,
    state: &SearchState,
) -> Vec<AdornedKey> {
    let mut unresolved = Vec::new();
    let mut visited: HashSet<AdornedKey, OtherHasher> = HashSet::default();
    let mut queue = VecDeque::from([query.clone()]);
    while let Some(key) = queue.pop_front() {
        if !visited.insert(key.clone()) {
            continue;
        }
        let Some(rules) = state.derived.get(&key) else {
            unresolved.push(key);
            continue;
        };
        for rule in rules {
            if !program.contains(rule) {
                debug!(pattern = %key, rule = %rule, "restoring rule");
                program.push(rule.clone());
            }
            for atom in rule.body().iter().filter(|a| !a.is_edb()) {
                queue.push_back(atom.key());
            }
        }
    }
    unresolved
}

// ------------- Adornment -------------
/// The result of one root request: the adorned program on success, and the
/// search state either way so callers can report why it failed.
#[derive(Debug)]
pub struct Adornment {
    query: AdornedAtom,
    program: Option<Program<AdornedAtom>>,
    state: SearchState,
    unresolved: Vec<AdornedKey>,
}

impl Adornment {
    pub fn query(&self) -> &AdornedAtom {
        &self.query
    }
    pub fn is_success(&self) -> bool {
        self.program.is_some()
    }
    pub fn program(&self) -> Option<&Program<AdornedAtom>> {
        self.program.as_ref()
    }
    pub fn program_mut(&mut self) -> Option<&mut Program<AdornedAtom>> {
        self.program.as_mut()
    }
    pub fn into_program(self) -> Option<Program<AdornedAtom>> {
        self.program
    }
    pub fn state(&self) -> &SearchState {
        &self.state
    }
    pub fn into_state(self) -> SearchState {
        self.state
    }
    pub fn failed_patterns(&self) -> impl Iterator<Item = &AdornedKey> {
        self.state.failed_adorn.iter()
    }
    pub fn failed_orderings(&self) -> impl Iterator<Item = &SipKey> {
        self.state.failed_sips.iter()
    }
    /// Intensional patterns the adorned program uses without defining them. Only
    /// non-empty when a recursive pattern was assumed satisfiable while on the
    /// stack and later turned out not to be.
    pub fn unresolved(&self) -> &[AdornedKey] {
        &self.unresolved
    }
}
