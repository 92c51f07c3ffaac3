// src/sim/timeline.rs
//! Interaktiver Zeitverlauf der Mikroplastik-Belastung mit Jahres-Cache.

use crate::config::TimelineConfig;
use crate::error::{SimulationError, SimulationResult};
use crate::features::FeatureStore;
use crate::sim::dispersion::{ContaminantPoint, DispersionEngine};
use bevy::log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};
use std::collections::BTreeMap;

/// Lage des aktuellen Jahres innerhalb des Bereichs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelinePosition {
    AtStart,
    Mid,
    AtEnd,
}

/// Zustand einer Sitzung: aktuelles Jahr und berechnete Jahre.
///
/// Einmal berechnete Jahre werden nie neu berechnet oder verworfen.
#[derive(Debug, Clone)]
pub struct Timeline {
    config: TimelineConfig,
    engine: DispersionEngine,
    current_year: i32,
    cache: BTreeMap<i32, Vec<ContaminantPoint>>,
    rng: StdRng,
}

impl Timeline {
    /// Startet eine Sitzung und berechnet das Startjahr.
    ///
    /// Mit `config.seed` ist der Lauf reproduzierbar.
    pub fn start(store: &FeatureStore, config: TimelineConfig) -> SimulationResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::start_with_rng(store, config, rng)
    }

    pub fn start_with_rng(
        store: &FeatureStore,
        config: TimelineConfig,
        rng: StdRng,
    ) -> SimulationResult<Self> {
        config.validate()?;
        let start_year = config.start_year;
        let mut dispersion = config.dispersion.clone();
        dispersion.start_year = start_year;

        let mut timeline = Self {
            engine: DispersionEngine::new(dispersion)?,
            current_year: start_year,
            cache: BTreeMap::new(),
            config,
            rng,
        };
        timeline.ensure_year(store, start_year)?;
        info!(
            "Timeline started at {} ({} points).",
            timeline.current_year,
            timeline.current_point_count()
        );
        Ok(timeline)
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn position(&self) -> TimelinePosition {
        if self.current_year <= self.config.start_year {
            TimelinePosition::AtStart
        } else if self.current_year >= self.config.end_year {
            TimelinePosition::AtEnd
        } else {
            TimelinePosition::Mid
        }
    }

    pub fn can_advance(&self) -> bool {
        self.current_year < self.config.end_year
    }

    pub fn can_retreat(&self) -> bool {
        self.current_year > self.config.start_year
    }

    /// Ein Jahr vorwärts; berechnet das Jahr, falls es noch nicht im Cache ist.
    ///
    /// Schlägt die Berechnung fehl, bleiben Jahr und Cache unverändert.
    pub fn advance(&mut self, store: &FeatureStore) -> SimulationResult<i32> {
        if !self.can_advance() {
            return Err(SimulationError::BoundaryReached {
                year: self.current_year,
            });
        }
        let next_year = self.current_year + 1;
        self.ensure_year(store, next_year)?;
        self.current_year = next_year;
        debug!("Advanced timeline to {}.", self.current_year);
        Ok(self.current_year)
    }

    /// Ein Jahr zurück; am Startjahr ohne Wirkung. Der Cache bleibt erhalten.
    pub fn retreat(&mut self) -> i32 {
        if self.can_retreat() {
            self.current_year -= 1;
            debug!("Retreated timeline to {}.", self.current_year);
        }
        self.current_year
    }

    /// Alle Punkte vom Startjahr bis zum aktuellen Jahr, nach Jahren geordnet.
    pub fn current_points(&self) -> impl Iterator<Item = &ContaminantPoint> + '_ {
        self.points_by_year().flat_map(|(_, points)| points.iter())
    }

    pub fn current_point_count(&self) -> usize {
        self.points_by_year().map(|(_, points)| points.len()).sum()
    }

    /// Sichtbare Punkte gruppiert nach Jahr (z.B. für eine Farbe pro Jahr).
    pub fn points_by_year(&self) -> impl Iterator<Item = (i32, &[ContaminantPoint])> + '_ {
        self.cache
            .range(self.config.start_year..=self.current_year)
            .map(|(year, points)| (*year, points.as_slice()))
    }

    pub fn points_for_year(&self, year: i32) -> Option<&[ContaminantPoint]> {
        self.cache.get(&year).map(Vec::as_slice)
    }

    pub fn cached_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.cache.keys().copied()
    }

    fn ensure_year(&mut self, store: &FeatureStore, year: i32) -> SimulationResult<()> {
        if self.cache.contains_key(&year) {
            return Ok(());
        }
        let seed_count = self.config.seed_count_for(year);
        let points = self
            .engine
            .disperse_year(store, year, seed_count, &mut self.rng)?;
        self.cache.insert(year, points);
        Ok(())
    }
}
