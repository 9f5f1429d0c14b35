use serde::{Deserialize, Serialize};

// Define the Candle struct with all its properties
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Open time of the candle, ms since epoch (UTC)
    pub timestamp_ms: i64,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
}

// Implement methods for the Candle struct
impl Candle {
    // A constructor for convenience
    pub fn new(
        timestamp_ms: i64,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        volume: f64,
    ) -> Self {
        Candle {
            timestamp_ms,
            open_price,
            high_price,
            low_price,
            close_price,
            volume,
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        if self.close_price >= self.open_price {
            (self.open_price, self.close_price)
        } else {
            (self.close_price, self.open_price)
        }
    }

    /// High above both body ends, low below both (the OHLC invariant)
    pub fn wicks_contain_body(&self) -> bool {
        let (body_low, body_high) = self.body_range();
        self.high_price >= body_high && self.low_price <= body_low
    }

    pub fn prices_finite(&self) -> bool {
        self.open_price.is_finite()
            && self.high_price.is_finite()
            && self.low_price.is_finite()
            && self.close_price.is_finite()
            && self.volume.is_finite()
    }
}
