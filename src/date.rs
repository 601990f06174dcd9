use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Calendar parts derived once from `published_at`, in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PublishedParts {
    pub year: i32,
    pub month: u8, // 1..=12
    pub hour: u8,  // 0..=23
}

impl PublishedParts {
    pub fn from_datetime(dt: OffsetDateTime) -> Self {
        let utc = dt.to_offset(UtcOffset::UTC);
        Self { year: utc.year(), month: utc.month() as u8, hour: utc.hour() }
    }
}

/// Parse an RFC 3339 / ISO-8601 instant such as `2023-05-01T12:34:56Z`.
pub fn parse_published(s: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(s.trim(), &Rfc3339).ok()
}

/// Parse and split in one step; `None` if the string is not a valid instant.
pub fn published_parts(s: &str) -> Option<PublishedParts> {
    parse_published(s).map(PublishedParts::from_datetime)
}
