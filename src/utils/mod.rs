pub mod cost_calculator;
pub mod error;
pub mod http_client;
pub mod logger;
pub mod model_helper;

pub use cost_calculator::{credit_purchase_total, CostBreakdown, CostCalculator, FallbackRates};
pub use error::{AppError, Result};
pub use http_client::HttpClient;
pub use logger::init_logger;
pub use model_helper::{best_of_n_model_id, display_model, parse_best_of_n_model, ParsedModel};
