//! Publish prediction aggregation.
//!
//! Two views over the stored predictions:
//!
//! - a single channel view, returned only when the channel's gradient is
//!   strictly above the threshold
//! - a weekly programming grid, built from every prediction whose gradient
//!   is at or above the threshold, placing each channel on the slot of its
//!   strongest predicted item
//!
//! The two thresholds differ on purpose: `>` for a single channel, `>=`
//! for the grid.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{
    ChannelId, GridChannel, ProgrammingGridEntry, PublishPredictionRecord, Weekstamp,
};
use crate::presentation::PublishPredictionView;
use crate::store::PredictionStore;
use crate::{CatalogError, Result};

/// Reject thresholds that no gradient can be compared against
pub fn validate_min_gradient(min_gradient: f64) -> Result<()> {
    if min_gradient.is_finite() && min_gradient >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidInput(format!(
            "min_gradient must be a non-negative number, got {}",
            min_gradient
        )))
    }
}

/// Reduce one prediction record to its view, or `None` when the gradient
/// does not exceed `min_gradient`
pub fn single_channel_prediction(
    record: PublishPredictionRecord,
    min_gradient: f64,
    filter_below_average: bool,
) -> Option<PublishPredictionView> {
    if record.gradient <= min_gradient {
        return None;
    }

    let mut items = record.prediction_items;
    if filter_below_average {
        items.retain(|item| item.deviation_from_average > 0.0);
    }

    Some(PublishPredictionView {
        channel_id: record.channel_id,
        title: record.title,
        gradient: record.gradient,
        prediction_items: items,
    })
}

/// Group the top item of every qualifying record by weekstamp.
///
/// Entries appear in the order their weekstamp was first seen; channels in
/// an entry keep the order of `records`.
pub fn weekly_programming_grid(
    records: &[PublishPredictionRecord],
    min_gradient: f64,
) -> Vec<ProgrammingGridEntry> {
    let mut slots: HashMap<Weekstamp, usize> = HashMap::new();
    let mut grid: Vec<ProgrammingGridEntry> = Vec::new();

    for record in records.iter().filter(|r| r.gradient >= min_gradient) {
        let Some(top) = record.prediction_items.first() else {
            debug!("Prediction for {} has no items", record.channel_id);
            continue;
        };

        let weekstamp = Weekstamp::from(top);
        let channel = GridChannel {
            id: record.channel_id.clone(),
            title: record.title.clone(),
        };

        match slots.get(&weekstamp) {
            Some(&index) => grid[index].channels.push(channel),
            None => {
                slots.insert(weekstamp, grid.len());
                grid.push(ProgrammingGridEntry {
                    weekstamp,
                    channels: vec![channel],
                });
            }
        }
    }

    grid
}

/// Prediction queries over a [`PredictionStore`]
#[derive(Clone)]
pub struct PredictionService {
    store: Arc<dyn PredictionStore>,
}

impl PredictionService {
    pub fn new(store: Arc<dyn PredictionStore>) -> Self {
        Self { store }
    }

    pub async fn single_channel_prediction(
        &self,
        channel_id: &ChannelId,
        min_gradient: f64,
        filter_below_average: bool,
    ) -> Result<Option<PublishPredictionView>> {
        validate_min_gradient(min_gradient)?;

        let Some(record) = self.store.get_prediction(channel_id).await? else {
            debug!("No prediction stored for {}", channel_id);
            return Ok(None);
        };

        let view = single_channel_prediction(record, min_gradient, filter_below_average);
        if view.is_none() {
            debug!("Prediction for {} below gradient {}", channel_id, min_gradient);
        }
        Ok(view)
    }

    pub async fn weekly_programming_grid(&self, min_gradient: f64) -> Result<Vec<ProgrammingGridEntry>> {
        validate_min_gradient(min_gradient)?;

        let records = self.store.get_all_predictions().await?;
        let grid = weekly_programming_grid(&records, min_gradient);

        info!(
            "📅 Programming grid: {} slots from {} predictions (min gradient {})",
            grid.len(),
            records.len(),
            min_gradient
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PredictionItem;
    use crate::store::MemoryStore;

    fn item(day: u8, hour: u8, deviation: f64) -> PredictionItem {
        PredictionItem {
            day_of_week: day,
            hour_of_day: hour,
            deviation_from_average: deviation,
        }
    }

    fn record(id: &str, gradient: f64, items: Vec<PredictionItem>) -> PublishPredictionRecord {
        PublishPredictionRecord {
            channel_id: ChannelId::from(id),
            title: format!("{} title", id),
            gradient,
            prediction_items: items,
        }
    }

    fn channel_ids(entry: &ProgrammingGridEntry) -> Vec<&str> {
        entry.channels.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_grid_threshold_is_inclusive() {
        let records = vec![
            record("UC05", 0.5, vec![item(1, 10, 1.0)]),
            record("UC07", 0.7, vec![item(2, 10, 1.0)]),
            record("UC09", 0.9, vec![item(3, 10, 1.0)]),
        ];

        let grid = weekly_programming_grid(&records, 0.7);
        let ids: Vec<&str> = grid.iter().flat_map(channel_ids).collect();
        assert_eq!(ids, vec!["UC07", "UC09"]);
    }

    #[test]
    fn test_single_channel_threshold_is_exclusive() {
        assert!(single_channel_prediction(record("UC07", 0.7, vec![item(1, 1, 1.0)]), 0.7, false).is_none());
        assert!(single_channel_prediction(record("UC071", 0.71, vec![item(1, 1, 1.0)]), 0.7, false).is_some());
    }

    #[test]
    fn test_grid_uses_top_item_only() {
        let records = vec![record(
            "UC1",
            0.9,
            vec![item(5, 18, 2.0), item(6, 12, 1.5), item(0, 9, 1.0)],
        )];

        let grid = weekly_programming_grid(&records, 0.0);
        assert_eq!(grid.len(), 1);
        assert_eq!(
            grid[0].weekstamp,
            Weekstamp {
                day_of_week: 5,
                hour_of_day: 18
            }
        );
    }

    #[test]
    fn test_grid_groups_shared_slot_in_processing_order() {
        let records = vec![
            record("UCb", 0.8, vec![item(2, 20, 1.0)]),
            record("UCempty", 0.95, Vec::new()),
            record("UCa", 0.9, vec![item(2, 20, 3.0)]),
            record("UCc", 0.9, vec![item(4, 8, 1.0)]),
        ];

        let grid = weekly_programming_grid(&records, 0.7);
        assert_eq!(grid.len(), 2);

        let shared = grid
            .iter()
            .find(|entry| entry.weekstamp.day_of_week == 2)
            .unwrap();
        assert_eq!(channel_ids(shared), vec!["UCb", "UCa"]);
        assert_eq!(shared.channels[0].title, "UCb title");
    }

    #[test]
    fn test_filter_below_average_keeps_order() {
        let items = vec![
            item(1, 8, 2.5),
            item(1, 9, -0.5),
            item(3, 8, 0.0),
            item(4, 20, 0.1),
            item(6, 7, 1.2),
        ];

        let unfiltered = single_channel_prediction(record("UC1", 0.9, items.clone()), 0.7, false).unwrap();
        assert_eq!(unfiltered.prediction_items, items);

        let filtered = single_channel_prediction(record("UC1", 0.9, items), 0.7, true).unwrap();
        let deviations: Vec<f64> = filtered
            .prediction_items
            .iter()
            .map(|i| i.deviation_from_average)
            .collect();
        assert_eq!(deviations, vec![2.5, 0.1, 1.2]);
    }

    #[tokio::test]
    async fn test_service_reads_store() {
        let store = MemoryStore::new();
        store.upsert_prediction(record("UC1", 0.8, vec![item(1, 1, 1.0)])).await;
        store.upsert_prediction(record("UC2", 0.75, vec![item(1, 1, 1.0)])).await;
        let service = PredictionService::new(Arc::new(store.clone()));

        let grid = service.weekly_programming_grid(0.7).await.unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(channel_ids(&grid[0]), vec!["UC1", "UC2"]);

        assert!(service
            .single_channel_prediction(&ChannelId::from("UC9"), 0.7, false)
            .await
            .unwrap()
            .is_none());
        assert!(service
            .single_channel_prediction(&ChannelId::from("UC1"), 0.7, false)
            .await
            .unwrap()
            .is_some());

        store.set_healthy(false).await;
        assert!(service.weekly_programming_grid(0.7).await.is_err());
    }

    #[tokio::test]
    async fn test_service_rejects_unusable_threshold() {
        let store = MemoryStore::new();
        store.upsert_prediction(record("UC1", 0.8, vec![item(1, 1, 1.0)])).await;
        let service = PredictionService::new(Arc::new(store));

        for min_gradient in [f64::NAN, -0.1, f64::INFINITY] {
            assert!(matches!(
                service.weekly_programming_grid(min_gradient).await,
                Err(CatalogError::InvalidInput(_))
            ));
            assert!(matches!(
                service
                    .single_channel_prediction(&ChannelId::from("UC1"), min_gradient, false)
                    .await,
                Err(CatalogError::InvalidInput(_))
            ));
        }

        assert!(validate_min_gradient(0.0).is_ok());
    }
}
