pub mod cache;
pub mod clid;
pub mod config;
pub mod default_resolver;
pub mod error;
pub mod metric_consts;
pub mod registry;
pub mod resolver;
pub mod rules;
pub mod types;
pub mod uri;
pub mod utm;

pub use config::Config;
pub use error::AttributionError;
pub use registry::ResolverRegistry;
pub use resolver::RuleBasedResolver;
pub use types::{CategoryTrafficSource, RawAttribution, RuleConfig};
