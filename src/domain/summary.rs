// Summary domain model - per-type and grand totals
use super::asset::AssetType;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetSummary {
    pub counts: HashMap<AssetType, i64>,
    pub prices: HashMap<AssetType, f64>,
}

impl AssetSummary {
    pub fn add(&mut self, asset_type: AssetType, quantity: i64, value: f64) {
        let count = self.counts.entry(asset_type).or_default();
        *count = count.saturating_add(quantity);
        *self.prices.entry(asset_type).or_default() += value;
    }

    pub fn count(&self, asset_type: AssetType) -> i64 {
        self.counts.get(&asset_type).copied().unwrap_or(0)
    }

    pub fn price(&self, asset_type: AssetType) -> f64 {
        self.prices.get(&asset_type).copied().unwrap_or(0.0)
    }

    /// Saturates instead of overflowing on absurd upstream quantities
    pub fn total_assets(&self) -> i64 {
        AssetType::ALL
            .into_iter()
            .fold(0i64, |total, t| total.saturating_add(self.count(t)))
    }

    pub fn total_price(&self) -> f64 {
        AssetType::ALL.into_iter().map(|t| self.price(t)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_sum_over_types() {
        let mut summary = AssetSummary::default();
        summary.add(AssetType::Furniture, 3, 300.0);
        summary.add(AssetType::Furniture, 2, 50.0);
        summary.add(AssetType::Vehicle, 1, 20_000_000.0);

        assert_eq!(summary.count(AssetType::Furniture), 5);
        assert_eq!(summary.count(AssetType::Other), 0);
        assert_eq!(summary.total_assets(), 6);
        assert_eq!(summary.total_price(), 20_000_350.0);
    }

    #[test]
    fn test_counts_saturate() {
        let mut summary = AssetSummary::default();
        summary.add(AssetType::Furniture, i64::MAX - 1, 0.0);
        summary.add(AssetType::Furniture, 10, 0.0);
        summary.add(AssetType::Vehicle, i64::MAX, 0.0);

        assert_eq!(summary.count(AssetType::Furniture), i64::MAX);
        assert_eq!(summary.total_assets(), i64::MAX);
    }
}
