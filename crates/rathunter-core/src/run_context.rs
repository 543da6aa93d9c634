//! Run clock and locale.
//!
//! A [`RunContext`] is created once at startup and passed to every call
//! that needs "now" or the local offset, so augmentation and age filtering
//! are deterministic under test.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};

/// Resolves the local UTC offset in force at a given instant.
pub trait ZoneRules: std::fmt::Debug + Send + Sync {
    fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset;
}

/// The host's local timezone, daylight saving included.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostZone;

impl ZoneRules for HostZone {
    fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        Local.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }
}

impl ZoneRules for FixedOffset {
    fn offset_at(&self, _instant: DateTime<Utc>) -> FixedOffset {
        *self
    }
}

#[derive(Debug, Clone)]
pub struct RunContext {
    now: DateTime<FixedOffset>,
    zone: Arc<dyn ZoneRules>,
    timezone_name: String,
}

impl RunContext {
    /// Builds a context at a fixed instant with a single fixed offset.
    ///
    /// When `timezone_name` is `None` the name is derived from the offset,
    /// e.g. `UTC+11:00`.
    #[must_use]
    pub fn at(now: DateTime<Utc>, offset: FixedOffset, timezone_name: Option<String>) -> Self {
        Self::with_zone(now, Arc::new(offset), timezone_name)
    }

    /// Builds a context whose local times follow `zone`, so each instant
    /// gets the offset in force at that instant.
    #[must_use]
    pub fn with_zone(
        now: DateTime<Utc>,
        zone: Arc<dyn ZoneRules>,
        timezone_name: Option<String>,
    ) -> Self {
        let now = now.with_timezone(&zone.offset_at(now));
        let timezone_name = timezone_name.unwrap_or_else(|| offset_name(*now.offset()));
        Self {
            now,
            zone,
            timezone_name,
        }
    }

    /// Captures the wall clock. `offset` pins every conversion to one fixed
    /// offset; otherwise the host timezone is consulted per instant.
    #[must_use]
    pub fn from_clock(offset: Option<FixedOffset>, timezone_name: Option<String>) -> Self {
        let zone: Arc<dyn ZoneRules> = match offset {
            Some(offset) => Arc::new(offset),
            None => Arc::new(HostZone),
        };
        Self::with_zone(Utc::now(), zone, timezone_name)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    /// The offset in force at the run's "now".
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        *self.now.offset()
    }

    #[must_use]
    pub fn timezone_name(&self) -> &str {
        &self.timezone_name
    }

    /// Converts a UTC instant into the local offset in force at that instant.
    #[must_use]
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.zone.offset_at(instant))
    }

    /// Whole minutes between `instant` and the run's "now".
    ///
    /// Rounds half away from zero. Instants after "now" give negative values.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn minutes_since(&self, instant: DateTime<FixedOffset>) -> i64 {
        let elapsed_ms = (self.now - instant).num_milliseconds();
        (elapsed_ms as f64 / 60_000.0).round() as i64
    }

    /// Metadata describing this run for a notification about `search_query`.
    #[must_use]
    pub fn metadata(&self, search_query: &str) -> RunMetadata {
        RunMetadata {
            last_run: self.now,
            timezone_name: self.timezone_name.clone(),
            search_query: search_query.to_string(),
        }
    }
}

fn offset_name(offset: FixedOffset) -> String {
    format!("UTC{offset}")
}

/// Run details rendered into notification emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMetadata {
    pub last_run: DateTime<FixedOffset>,
    pub timezone_name: String,
    pub search_query: String,
}
