// src/sim/history.rs
use crate::sim::erosion::YearlySnapshot;
use bevy::prelude::*;

/// Ergebnis eines Erosionslaufs mit Wiedergabe-Index für die Darstellung.
#[derive(Resource, Debug, Default)]
pub struct ErosionHistory {
    pub snapshots: Vec<YearlySnapshot>,
    /// Gesamtfläche der Ciénegas vor der Reduktion.
    pub original_area: f64,
    /// Index des aktuell *angezeigten* Snapshots.
    pub current_display_index: Option<usize>,
}

impl ErosionHistory {
    pub fn new(snapshots: Vec<YearlySnapshot>, original_area: f64) -> Self {
        let current_display_index = if snapshots.is_empty() { None } else { Some(0) };
        Self {
            snapshots,
            original_area,
            current_display_index,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get_current_display_snapshot(&self) -> Option<&YearlySnapshot> {
        self.current_display_index
            .and_then(|idx| self.snapshots.get(idx))
    }

    pub fn snapshot_for_year(&self, year: i32) -> Option<&YearlySnapshot> {
        self.snapshots.iter().find(|s| s.year == year)
    }

    /// Nächster Frame; am Ende wieder von vorn (Endloswiedergabe).
    pub fn step_forward(&mut self) -> Option<&YearlySnapshot> {
        let len = self.snapshots.len();
        if len == 0 {
            return None;
        }
        let next = self.current_display_index.map_or(0, |idx| (idx + 1) % len);
        self.current_display_index = Some(next);
        self.snapshots.get(next)
    }

    pub fn step_backward(&mut self) -> Option<&YearlySnapshot> {
        let idx = self.current_display_index?;
        if idx > 0 {
            self.current_display_index = Some(idx - 1);
        }
        self.get_current_display_snapshot()
    }

    /// Reduktion in Prozent für den angezeigten Snapshot.
    pub fn current_reduction_percent(&self) -> Option<f64> {
        self.get_current_display_snapshot()
            .map(|s| s.reduction_percent(self.original_area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureCollection;

    fn snapshot(year: i32) -> YearlySnapshot {
        YearlySnapshot {
            year,
            geometries: FeatureCollection::default(),
        }
    }

    #[test]
    fn test_playback_wraps_around() {
        let mut history = ErosionHistory::new(vec![snapshot(2023), snapshot(2024)], 100.0);
        assert_eq!(history.get_current_display_snapshot().map(|s| s.year), Some(2023));
        assert_eq!(history.step_forward().map(|s| s.year), Some(2024));
        assert_eq!(history.step_forward().map(|s| s.year), Some(2023));
    }

    #[test]
    fn test_step_backward_stops_at_first() {
        let mut history = ErosionHistory::new(vec![snapshot(2023), snapshot(2024)], 100.0);
        assert_eq!(history.step_backward().map(|s| s.year), Some(2023));
        history.step_forward();
        assert_eq!(history.step_backward().map(|s| s.year), Some(2023));
    }

    #[test]
    fn test_empty_history() {
        let mut history = ErosionHistory::default();
        assert!(history.step_forward().is_none());
        assert!(history.current_reduction_percent().is_none());
        assert!(history.snapshot_for_year(2023).is_none());
    }

    #[test]
    fn test_collapsed_snapshot_reports_full_reduction() {
        let history = ErosionHistory::new(vec![snapshot(2030)], 100.0);
        assert_eq!(history.current_reduction_percent(), Some(100.0));
    }
}
