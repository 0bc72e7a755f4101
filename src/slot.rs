use chrono::{Datelike, Local, Weekday};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("unknown day '{0}' (expected Monday to Friday)")]
    UnknownDay(String),
    #[error("unknown time slot '{0}'")]
    UnknownTime(String),
}

/// A teaching day of the week. Weekends carry no classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }

    pub fn short(&self) -> &'static str {
        &self.as_str()[..3]
    }

    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(Day::Monday),
            Weekday::Tue => Some(Day::Tuesday),
            Weekday::Wed => Some(Day::Wednesday),
            Weekday::Thu => Some(Day::Thursday),
            Weekday::Fri => Some(Day::Friday),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    /// The local wall-clock day, or `None` on a weekend.
    pub fn today() -> Option<Self> {
        Self::from_weekday(Local::now().weekday())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = SlotError;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Day::ALL
            .into_iter()
            .find(|day| {
                day.as_str().eq_ignore_ascii_case(needle) || day.short().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| SlotError::UnknownDay(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Theory,
    Lab,
}

/// One labeled time range of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    label: &'static str,
    display: &'static str,
    kind: SlotKind,
}

const fn theory(label: &'static str, display: &'static str) -> TimeSlot {
    TimeSlot {
        label,
        display,
        kind: SlotKind::Theory,
    }
}

const fn lab(label: &'static str, display: &'static str) -> TimeSlot {
    TimeSlot {
        label,
        display,
        kind: SlotKind::Lab,
    }
}

/// Theory slots first, then lab slots; this is the grid's row order.
pub const TIME_SLOTS: [TimeSlot; 23] = [
    theory("08:00 T", "08:00 - 08:50 (Theory)"),
    theory("09:00 T", "09:00 - 09:50 (Theory)"),
    theory("10:00 T", "10:00 - 10:50 (Theory)"),
    theory("11:00 T", "11:00 - 11:50 (Theory)"),
    theory("12:00 T", "12:00 - 12:50 (Theory)"),
    theory("14:00 T", "14:00 - 14:50 (Theory)"),
    theory("15:00 T", "15:00 - 15:50 (Theory)"),
    theory("16:00 T", "16:00 - 16:50 (Theory)"),
    theory("17:00 T", "17:00 - 17:50 (Theory)"),
    theory("18:00 T", "18:00 - 18:50 (Theory)"),
    theory("19:00 T", "19:00 - 19:50 (Theory)"),
    lab("08:00 L", "08:00 - 08:50 (Lab)"),
    lab("08:51 L", "08:51 - 09:40 (Lab)"),
    lab("09:51 L", "09:51 - 10:40 (Lab)"),
    lab("10:41 L", "10:41 - 11:30 (Lab)"),
    lab("11:40 L", "11:40 - 12:30 (Lab)"),
    lab("12:31 L", "12:31 - 13:20 (Lab)"),
    lab("14:00 L", "14:00 - 14:50 (Lab)"),
    lab("14:51 L", "14:51 - 15:40 (Lab)"),
    lab("15:51 L", "15:51 - 16:40 (Lab)"),
    lab("16:41 L", "16:41 - 17:30 (Lab)"),
    lab("17:40 L", "17:40 - 18:30 (Lab)"),
    lab("18:31 L", "18:31 - 19:20 (Lab)"),
];

impl TimeSlot {
    /// Short grid key, e.g. `"08:00 T"`.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Full range, e.g. `"08:00 - 08:50 (Theory)"`. This is the persisted form.
    pub fn display(&self) -> &'static str {
        self.display
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// Start time as shown on compact cards, e.g. `"08:00"`.
    pub fn start(&self) -> &'static str {
        self.display.split(' ').next().unwrap_or(self.display)
    }

    /// Position of this slot in [`TIME_SLOTS`].
    pub fn index(&self) -> usize {
        TIME_SLOTS
            .iter()
            .position(|slot| slot == self)
            .unwrap_or(TIME_SLOTS.len())
    }

    pub fn find(input: &str) -> Option<Self> {
        let needle = input.trim();
        TIME_SLOTS.iter().copied().find(|slot| {
            slot.display == needle || slot.label.eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display)
    }
}

impl FromStr for TimeSlot {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::find(s).ok_or_else(|| SlotError::UnknownTime(s.to_string()))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeSlot::find(&raw).ok_or_else(|| de::Error::custom(SlotError::UnknownTime(raw)))
    }
}

/// A (day, time slot) cell of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub day: Day,
    pub time: TimeSlot,
}

impl Slot {
    pub fn new(day: Day, time: TimeSlot) -> Self {
        Self { day, time }
    }

    /// Validates both parts against the catalog.
    pub fn parse(day: &str, time: &str) -> Result<Self, SlotError> {
        Ok(Self {
            day: day.parse()?,
            time: time.parse()?,
        })
    }

    /// Every cell of the grid, day-major, in catalog order (115 cells).
    pub fn catalog() -> impl Iterator<Item = Slot> {
        Day::ALL
            .into_iter()
            .flat_map(|day| TIME_SLOTS.iter().map(move |time| Slot::new(day, *time)))
    }

    pub(crate) fn grid_order(&self) -> (Day, usize) {
        (self.day, self.time.index())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.time)
    }
}
