pub mod encoded;
pub mod error;
pub mod field;
pub mod ids;
pub mod lookup;
pub mod matching;
pub mod options;

pub use encoded::{EncodedValue, REFERENCE_KEY, TYPE_DATA_KEY, TYPE_TAG_KEY};
pub use error::{ModelError, Result};
pub use field::{CapturedFieldSet, FieldDescriptor, TargetDescriptor, TargetSet};
pub use ids::{FieldPath, ObjectRef, TypeName};
pub use lookup::{NameSet, eq_ignore_case};
pub use matching::{ConfidenceLevel, Match, MatchReport, StrategyKind};
pub use options::{SolverConfig, SolverKind};
