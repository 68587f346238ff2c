//! Values produced by the route fetcher and consumed by the renderer.

/// Where an estimated cost figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostSource {
    /// Fare returned by the directions API.
    Fare,
    /// Distance multiplied by a configured per-kilometre rate.
    DistanceRate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
    pub source: CostSource,
}

impl Money {
    /// `12.34 EUR`
    pub fn display(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub origin: String,
    pub destination: String,
    pub distance_text: String,
    pub duration_text: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub estimated_cost: Option<Money>,
    pub overview_polyline: Option<String>,
}

/// A JPEG ready to be embedded with the DCTDecode filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub components: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display_rounds_to_cents() {
        let money = Money {
            amount: 7.456,
            currency: "EUR".into(),
            source: CostSource::DistanceRate,
        };
        assert_eq!(money.display(), "7.46 EUR");
    }
}
