// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # lang-advisor
//!
//! Programming language recommendations from project criteria, computed by a
//! forward-chaining rule engine with specificity priority.
//!
//! ## Architecture
//!
//! - **Knowledge base** (`knowledge`): closed registries of criteria and conclusions
//! - **Rule base** (`rules`): validated rules ordered by descending premise count
//! - **Inference** (`inference`): fixpoint forward chaining with first-proven ordering
//! - **Catalogs** (`catalog`): TOML bundles of the above; one ships in the binary
//! - **Advisor** (`advisor`): shared, thread-safe facade turning input codes into labels
//!
//! ## Library usage
//!
//! ```no_run
//! use lang_advisor::advisor::Advisor;
//!
//! let advisor = Advisor::builtin().unwrap();
//! let lines = advisor.recommend_labels(&["P_web", "P_easy"]).unwrap();
//! assert_eq!(lines, ["PHP (Web Backend)", "JavaScript (Frontend/Backend)"]);
//! ```

pub mod advisor;
pub mod catalog;
pub mod config;
pub mod error;
pub mod inference;
pub mod knowledge;
pub mod rules;
