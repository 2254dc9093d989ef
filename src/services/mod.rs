pub mod engine;
pub mod recommendations;

pub use engine::CatalogEngine;
pub use engine::RecommendationEngine;
pub use recommendations::RecommendationService;
