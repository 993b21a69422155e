pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::ResolverConfig;

pub mod package;
pub use package::ModRecord;
pub use package::Dependencies;
pub use package::CatalogEntry;
pub use package::PackageReference;
pub use package::EngineVersion;
pub use package::load_catalog;

pub mod registry;
pub use registry::Registry;

pub mod activation;
pub use activation::ActivationEntry;
pub use activation::ActivationSequence;

pub mod problem;
pub use problem::Problem;
pub use problem::ProblemKind;
pub use problem::detect_problems;
pub use problem::problems_for_package;

pub mod relationship_resolver;
pub use relationship_resolver::ResolverBuilder;
pub use relationship_resolver::Resolver;
pub use relationship_resolver::Resolution;
pub use relationship_resolver::{build_registry, resolve, problems_for, auto_fix};
