use serde::Serialize;

use crate::adorn::{Adornment, SipKey};
use crate::construct::{AdornedAtom, AdornedKey, Program};

/// A serializable account of one root request, for printing or shipping elsewhere.
#[derive(Serialize, Debug)]
pub struct Report {
    pub query: AdornedKey,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,
    pub failed_patterns: Vec<AdornedKey>,
    pub failed_orderings: Vec<String>,
    pub undefined: Vec<AdornedKey>,
    pub unresolved: Vec<AdornedKey>,
    pub visited: usize,
}

impl Report {
    /// `program` is the unadorned program the request ran against, used to spell
    /// out failed orderings as rules.
    pub fn new(adornment: &Adornment, program: &Program) -> Self {
        let state = adornment.state();
        Self {
            query: adornment.query().key(),
            success: adornment.is_success(),
            rules: adornment
                .program()
                .map(|p| p.iter().map(|r| r.to_string()).collect()),
            failed_patterns: state.failed_adorn().iter().cloned().collect(),
            failed_orderings: state
                .failed_sips()
                .iter()
                .map(|k| describe(k, program))
                .collect(),
            undefined: state.undefined().iter().cloned().collect(),
            unresolved: adornment.unresolved().to_vec(),
            visited: state.visited(),
        }
    }
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// Renders a failed ordering as the rule it would have produced, body unadorned.
fn describe(key: &SipKey, program: &Program) -> String {
    let Some(rule) = program.rule(key.rule()) else {
        return key.to_string();
    };
    let head = AdornedAtom::from_pattern(rule.head().clone(), key.head().clone())
        .map(|h| h.to_string())
        .unwrap_or_else(|_| rule.head().to_string());
    let body: Vec<String> = key.sip().atoms(rule).map(|a| a.to_string()).collect();
    format!("{} := {}", head, body.join(","))
}
