// Summary renderer - Totals per asset type written into the summary badges
use crate::application::formatter::{format_currency, integer_quantity, total_value};
use crate::domain::asset::{AssetCountsByStation, AssetType};
use crate::domain::page::{DashboardPage, SummarySlot};
use crate::domain::summary::AssetSummary;

pub const TOTAL_ASSETS_CLASS: &str = "total-assets-count";
pub const TOTAL_PRICE_CLASS: &str = "total-price";

pub fn summarize(counts: &AssetCountsByStation) -> AssetSummary {
    let mut summary = AssetSummary::default();
    for (asset_type, aggregates) in counts.iter() {
        let quantity = aggregates
            .iter()
            .map(|a| integer_quantity(&a.total_quantity))
            .fold(0i64, i64::saturating_add);
        summary.add(asset_type, quantity, total_value(aggregates));
    }
    summary
}

fn count_class(asset_type: AssetType) -> &'static str {
    match asset_type {
        AssetType::Furniture => "furniture-count",
        AssetType::Vehicle => "vehicle-count",
        AssetType::OfficeEquipment => "office-equipment-count",
        AssetType::Other => "other-count",
    }
}

pub fn summary_slots(summary: &AssetSummary) -> Vec<SummarySlot> {
    let mut slots = vec![
        SummarySlot::new(
            TOTAL_ASSETS_CLASS,
            "Total Assets",
            summary.total_assets().to_string(),
        ),
        SummarySlot::new(
            TOTAL_PRICE_CLASS,
            "Total Price",
            format_currency(summary.total_price()),
        ),
    ];
    slots.extend(AssetType::ALL.into_iter().map(|t| {
        SummarySlot::new(count_class(t), t.display_name(), summary.count(t).to_string())
    }));
    slots
}

#[derive(Debug, Default)]
pub struct SummaryRenderer;

impl SummaryRenderer {
    /// Write the six summary badges. A missing container is logged and
    /// leaves the page untouched.
    pub fn render(&self, counts: &AssetCountsByStation, page: &mut DashboardPage) {
        let summary = summarize(counts);

        match page.summary_container_mut() {
            Ok(container) => {
                container.set_slots(summary_slots(&summary));
                tracing::debug!(
                    "Rendered summary: {} assets, total price {}",
                    summary.total_assets(),
                    summary.total_price()
                );
            }
            Err(e) => tracing::error!("Asset counts container: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::StationAggregate;

    fn sample_counts() -> AssetCountsByStation {
        AssetCountsByStation::new()
            .with_type(
                AssetType::Furniture,
                vec![
                    StationAggregate::new("Dodoma", "10", "1,500"),
                    StationAggregate::new("Arusha", 5, 2000),
                ],
            )
            .with_type(
                AssetType::Vehicle,
                vec![StationAggregate::new("Arusha", "2", "45,000,000")],
            )
            .with_type(
                AssetType::Other,
                vec![StationAggregate::new("Tanga", "x", 100)],
            )
    }

    #[test]
    fn test_grand_totals() {
        let counts = sample_counts();
        let summary = summarize(&counts);

        assert_eq!(summary.count(AssetType::Furniture), 15);
        assert_eq!(summary.count(AssetType::Vehicle), 2);
        assert_eq!(summary.count(AssetType::OfficeEquipment), 0);
        assert_eq!(summary.count(AssetType::Other), 0);

        let per_type: i64 = AssetType::ALL.into_iter().map(|t| summary.count(t)).sum();
        assert_eq!(summary.total_assets(), per_type);

        let expected_price: f64 = AssetType::ALL
            .into_iter()
            .map(|t| total_value(counts.stations(t)))
            .sum();
        assert_eq!(summary.total_price(), expected_price);
        assert_eq!(summary.total_price(), 15_000.0 + 10_000.0 + 90_000_000.0);
    }

    #[test]
    fn test_huge_quantities_do_not_overflow() {
        let huge = 6_000_000_000_000_000_000u64;
        let counts = AssetCountsByStation::new().with_type(
            AssetType::Furniture,
            vec![
                StationAggregate::new("Dodoma", huge, 1),
                StationAggregate::new("Arusha", huge, 1),
            ],
        );

        let summary = summarize(&counts);
        assert_eq!(summary.count(AssetType::Furniture), i64::MAX);
        assert_eq!(summary.total_assets(), i64::MAX);

        let mut page = DashboardPage::new(true, None, false);
        SummaryRenderer.render(&counts, &mut page);
        assert_eq!(
            page.slot_value(TOTAL_ASSETS_CLASS),
            Some(i64::MAX.to_string().as_str())
        );
    }

    #[test]
    fn test_render_writes_six_slots() {
        let mut page = DashboardPage::new(true, None, false);
        SummaryRenderer.render(&sample_counts(), &mut page);

        let texts: Vec<String> = page
            .summary_container
            .as_ref()
            .unwrap()
            .slots
            .iter()
            .map(|s| s.text())
            .collect();

        assert_eq!(
            texts,
            vec![
                "Total Assets: 17",
                "Total Price: TSh 90,025,000",
                "Furniture: 15",
                "Vehicles: 2",
                "Office Equipment: 0",
                "Other Assets: 0",
            ]
        );
    }

    #[test]
    fn test_render_without_container_is_noop() {
        let mut page = DashboardPage::new(false, Some((800, 400)), false);
        SummaryRenderer.render(&sample_counts(), &mut page);

        assert!(page.summary_container.is_none());
        assert!(page.chart_canvas.as_ref().unwrap().frame.is_none());
    }
}
