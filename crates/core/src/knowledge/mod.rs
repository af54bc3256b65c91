//! Knowledge domains, the registry that holds them, and the query processor.

pub mod domain;
pub mod processor;
pub mod registry;
pub mod types;

pub use domain::{Domain, DomainLoader, KnowledgeSource};
pub use processor::{DOMAIN_FILTER_KEY, KnowledgeProcessor, PROCESS_QUERY_OPERATION, QueryOptions, rank_results};
pub use registry::{DomainRegistry, DomainStatus, FanOut, PreloadReport};
pub use types::{KnowledgeResult, ResultMetadata};
