#![deny(unsafe_code)]

//! Fuzzy field matching: scoring, assignment and the collaborators around it.

pub mod apply;
pub mod capture;
pub mod codec;
pub mod compat;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod repository;
pub mod schema;
pub mod settings;
pub mod similarity;
pub mod solver;
pub mod strategy;

pub use apply::{ApplyReport, SkippedField, apply_matches};
pub use capture::{capture, describe_targets};
pub use codec::{CodecError, NativeValue, ValueCodec};
pub use compat::{TypeCompatibility, TypeHierarchy};
pub use defaults::SynonymTable;
pub use engine::{MatchingEngine, match_fields};
pub use error::{MapError, Result};
pub use lookup::{AliasLookup, DefaultMappingLookup};
pub use repository::{AliasEntry, AliasStore};
pub use schema::{Schema, SchemaIntrospector};
pub use settings::MatcherSettings;
pub use similarity::similarity;
pub use solver::{AssignmentSolver, CostMatrix, GreedySolver, HungarianSolver};
pub use strategy::{NOISE_THRESHOLD, PairScore, score_pair};
