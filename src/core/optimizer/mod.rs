//! Adaptive optimization layer
//!
//! - `types` - Options, responses and analytics
//! - `samples` - Bounded performance log
//! - `rules` - Auto-tuning rules and recommendations
//! - `layer` - `OptimizationLayer`, the caching and tuning wrapper

pub mod layer;
pub mod rules;
pub mod samples;
pub mod types;


pub use layer::{OptimizationLayer, normalize_request, optimize_query_params};
pub use rules::AutoOptimizer;
pub use samples::{PerformanceLog, SAMPLE_WINDOW};
pub use types::*;
