// Data loading
pub mod timeseries;

// Re-export commonly used types
pub use timeseries::MarketData;
pub use timeseries::csv_file::{load_market_data, load_series_from_csv};
