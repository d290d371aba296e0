use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{parse_date_range, DateRange};
use crate::stop::{has_unannounced_marker, TourStop};

/// Where a stop stands relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    Unannounced,
    Pending,
    Finished,
    Ongoing,
    Upcoming,
}

impl StopStatus {
    pub const ALL: [Self; 5] = [
        Self::Unannounced,
        Self::Pending,
        Self::Finished,
        Self::Ongoing,
        Self::Upcoming,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unannounced => "unannounced",
            Self::Pending => "pending",
            Self::Finished => "finished",
            Self::Ongoing => "ongoing",
            Self::Upcoming => "upcoming",
        }
    }

    /// Marker colour as `#RRGGBB`.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Unannounced => "#9E9E9E",
            Self::Pending => "#FF9800",
            Self::Finished => "#4CAF50",
            Self::Ongoing => "#2196F3",
            Self::Upcoming => "#F44336",
        }
    }

    /// Marker colour as an RGB triple.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Unannounced => (0x9E, 0x9E, 0x9E),
            Self::Pending => (0xFF, 0x98, 0x00),
            Self::Finished => (0x4C, 0xAF, 0x50),
            Self::Ongoing => (0x21, 0x96, 0xF3),
            Self::Upcoming => (0xF4, 0x43, 0x36),
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Unannounced => "⚫",
            Self::Pending => "🟡",
            Self::Finished => "🟢",
            Self::Ongoing => "🔵",
            Self::Upcoming => "🔴",
        }
    }

    /// Localization key of the status label.
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Unannounced => "status.unannounced",
            Self::Pending => "status.pending",
            Self::Finished => "status.finished",
            Self::Ongoing => "status.ongoing",
            Self::Upcoming => "status.upcoming",
        }
    }

    /// Stops that can be opened from the map.
    pub const fn has_date(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Classifies a stop. `unannounced` wins over everything, then a missing
/// range, then the position of `today` relative to the range.
pub fn classify(unannounced: bool, range: Option<DateRange>, today: NaiveDate) -> StopStatus {
    if unannounced {
        return StopStatus::Unannounced;
    }
    let Some(range) = range else {
        return StopStatus::Pending;
    };

    if range.end < today {
        StopStatus::Finished
    } else if range.contains(today) {
        StopStatus::Ongoing
    } else {
        StopStatus::Upcoming
    }
}

/// Classifies from a display name, detecting the unannounced markers in it.
pub fn classify_name(name: &str, range: Option<DateRange>, today: NaiveDate) -> StopStatus {
    classify(has_unannounced_marker(name), range, today)
}

/// Classifies a loaded stop, honouring its explicit announcement flag.
pub fn stop_status(stop: &TourStop, today: NaiveDate) -> StopStatus {
    classify(stop.is_unannounced(), parse_date_range(&stop.date_text), today)
}
