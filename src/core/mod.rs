//! Core extraction engine.
//!
//! ## Pipeline
//!
//! 1. **Metadata** (`metadata`): declaration files → component records
//! 2. **Usage** (`usage`): markup files → child edges and self-references
//! 3. **Assembly** (`tree`): records → sorted, memoized trees
//! 4. **Serialization** (`serialize`): trees → hierarchy JSON document
//!
//! `context::BuildContext` runs the phases in order over a discovered file set.
//!
//! ## Module Structure
//!
//! - `patterns`: line extractors for declaration files
//! - `paths`: template path normalization
//! - `registry`: component records and lookups
//! - `file_scanner`: file discovery
//! - `lines`: lossy line reading shared by both scanners

pub mod context;
pub mod file_scanner;
pub mod lines;
pub mod metadata;
pub mod paths;
pub mod patterns;
pub mod registry;
pub mod serialize;
pub mod tree;
pub mod usage;

pub use context::{BuildContext, BuildOutput};
pub use metadata::{MetadataScanError, MetadataScanner, PartialMetadata};
pub use paths::{normalize_markup_path, normalize_template_path};
pub use patterns::{DecoratorPatterns, LineExtractor};
pub use registry::{ComponentRecord, Registry, RegistryError, SelectorPatternError};
pub use serialize::{ROOT_NODE_NAME, RootNode, root_node, to_pretty_json};
pub use tree::{Forest, TopLevelTree, TreeAssembler, TreeError, TreeNode};
