//! Date-keyed activity log
//!
//! Finalized activities are handed to an [`ActivityLog`]; the session never
//! writes one itself. [`DailyLog`] keeps each day's records in save order and
//! finds a record by id across days, which is how summary views look it up.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::Result;
use crate::TrackerError;
use crate::types::OutdoorRunActivity;

/// Persistence seam for finalized activities
pub trait ActivityLog {
    /// Append a record to the given day. Fails if the id is already stored.
    fn append(&mut self, date: NaiveDate, activity: OutdoorRunActivity) -> Result<()>;

    /// Look up a record by id on any day
    fn find(&self, id: Uuid) -> Option<&OutdoorRunActivity>;
}

/// In-memory log of outdoor runs grouped by calendar day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLog {
    days: BTreeMap<NaiveDate, Vec<OutdoorRunActivity>>,
}

impl DailyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records saved on `date`, oldest first
    pub fn activities_on(&self, date: NaiveDate) -> &[OutdoorRunActivity] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    /// Days with at least one record, in calendar order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// Every record with its day, in calendar then save order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &OutdoorRunActivity)> + '_ {
        self.days.iter().flat_map(|(date, runs)| runs.iter().map(move |run| (*date, run)))
    }

    /// Day a record was saved on
    pub fn date_of(&self, id: Uuid) -> Option<NaiveDate> {
        self.iter().find(|(_, run)| run.id == id).map(|(date, _)| date)
    }

    /// Remove a record, dropping its day when it was the last one
    pub fn remove(&mut self, id: Uuid) -> Option<OutdoorRunActivity> {
        let date = self.date_of(id)?;
        let runs = self.days.get_mut(&date)?;
        let index = runs.iter().position(|run| run.id == id)?;
        let removed = runs.remove(index);
        if runs.is_empty() {
            self.days.remove(&date);
        }
        debug!(%id, %date, "Removed activity");
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total distance across all records in kilometers
    pub fn total_distance_km(&self) -> f64 {
        self.iter().map(|(_, run)| run.distance_km).sum()
    }
}

impl ActivityLog for DailyLog {
    fn append(&mut self, date: NaiveDate, activity: OutdoorRunActivity) -> Result<()> {
        if self.find(activity.id).is_some() {
            return Err(TrackerError::duplicate_activity(activity.id));
        }

        info!(
            id = %activity.id,
            %date,
            distance_km = activity.distance_km,
            duration_seconds = activity.duration_seconds,
            "Activity saved"
        );
        self.days.entry(date).or_default().push(activity);
        Ok(())
    }

    fn find(&self, id: Uuid) -> Option<&OutdoorRunActivity> {
        self.days.values().flatten().find(|run| run.id == id)
    }
}
