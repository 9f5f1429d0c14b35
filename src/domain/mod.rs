// Domain types and value objects
pub mod candle;
pub mod direction;
pub mod session;
pub mod timeframe;

// Re-export commonly used types
pub use candle::Candle;
pub use direction::{BosDirection, Confidence, FvgDirection, SignalDirection, SweepSide, Trend};
pub use session::{Session, SessionCalendar, SessionWindow};
pub use timeframe::Timeframe;
