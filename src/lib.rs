//! Adornment – binding-pattern annotation of recursive Datalog programs.
//!
//! Some predicates can only be evaluated when certain arguments are supplied:
//! a web service that needs a name before it returns an address, or an index
//! that can only be probed by key. Given a program and a binding pattern for the
//! query predicate, this crate finds, for every predicate the query reaches,
//! which argument positions are bound (`b`) or free (`f`) under some feasible
//! left-to-right evaluation order of each rule body, and rewrites the program so
//! that every atom carries that annotation.
//!
//! ## Modules
//! * [`construct`] – Terms, atoms, adorned atoms, rules, programs and the
//!   orderings (SIPs) of rule bodies.
//! * [`adorn`] – The [`adorn::Engine`], its [`adorn::SearchState`] and the
//!   result of a root request, [`adorn::Adornment`].
//! * [`report`] – A serializable summary of a request, including why it failed.
//! * [`settings`] – Configuration for the demonstration binary.
//! * [`demo`] – The illustrative program the binary adorns.
//!
//! ## Search
//! [`adorn::Engine::adorn_atom`] adorns all rules defining a predicate under one
//! binding pattern by trying body orderings until one works, recursing into
//! [`adorn::Engine::adorn_rule`] for each ordering, which in turn recurses into
//! `adorn_atom` for every intensional body pattern not seen before. Known
//! failures, failed orderings, completed patterns and patterns on the stack are
//! memoized in the search state, so each pattern is attempted at most once and
//! recursive predicates terminate.
//!
//! The first feasible adornment wins; no attempt is made to find a cheaper one.
//!
//! ## Quick Start
//! ```
//! use adornment::construct::{AdornedAtom, Atom, Program, Rule};
//! use adornment::adorn::Engine;
//! let program: Program = vec![
//!     Rule::fact(Atom::new("T1", "X").with_constant(0, "Joe").unwrap()),
//!     Rule::new(Atom::new("T1", "X"), vec![Atom::new("Udirectory", "X").edb(true)]),
//! ].into_iter().collect();
//! let engine = Engine::new(&program);
//! let query = AdornedAtom::new(Atom::new("T1", "X"), "f").unwrap();
//! let adornment = engine.adorn(&query).unwrap();
//! let adorned = adornment.program().unwrap();
//! assert_eq!(adorned.rules()[1].to_string(), "T1:f(X) := Udirectory:f(X)");
//! ```
//!
//! ## Duplicates
//! Independent branches of the search may adorn the same rule the same way.
//! The engine leaves such duplicates in place; call
//! [`construct::Program::deduplicate`] on the result if they are unwanted.

pub mod construct;
pub mod adorn;
pub mod report;
pub mod settings;
pub mod demo;
pub mod error;

pub use error::{AdornError, Result};
