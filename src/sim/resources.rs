// src/sim/resources.rs
use crate::features::{FeatureSource, FeatureStore};
use crate::sim::timeline::{Timeline, TimelinePosition};
use bevy::prelude::*;

/// Quelle der Eingabe-Layer; wird beim Initialisieren einmal gelesen.
#[derive(Resource)]
pub struct FeatureSourceHandle(pub Box<dyn FeatureSource + Send + Sync>);

impl FeatureSourceHandle {
    pub fn new(source: impl FeatureSource + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }
}

/// Die geladenen Layer, unverändert für die gesamte Sitzung.
#[derive(Resource, Debug, Clone)]
pub struct WetlandFeatures(pub FeatureStore);

/// Interaktive Belastungs-Zeitleiste der laufenden Sitzung.
#[derive(Resource, Debug)]
pub struct ContaminationTimeline(pub Timeline);

// --- Events ---

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct AdvanceYearRequest;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RetreatYearRequest;

/// Wird nach jedem Start, Vor- und Zurückschritt gesendet.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TimelineChangedEvent {
    pub year: i32,
    pub position: TimelinePosition,
    pub visible_points: usize,
}

impl TimelineChangedEvent {
    pub fn from_timeline(timeline: &Timeline) -> Self {
        Self {
            year: timeline.current_year(),
            position: timeline.position(),
            visible_points: timeline.current_point_count(),
        }
    }
}
