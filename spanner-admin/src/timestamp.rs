use time::error::ComponentRange;
use time::OffsetDateTime;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// expire_timestamp converts a point in time into the protobuf timestamp used by the admin API.
///
/// `seconds` counts whole seconds since the Unix epoch and is negative for earlier points.
/// `nanos` always lies in `0..1_000_000_000` and counts forward in time, so epoch minus
/// one nanosecond becomes `{ seconds: -1, nanos: 999_999_999 }`.
pub fn expire_timestamp(t: OffsetDateTime) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: t.unix_timestamp(),
        nanos: t.nanosecond() as i32,
    }
}

/// from_timestamp recomposes a protobuf timestamp into an `OffsetDateTime` in UTC.
///
/// Un-normalized nanos (negative or larger than a second) are carried into the seconds.
pub fn from_timestamp(ts: &prost_types::Timestamp) -> Result<OffsetDateTime, ComponentRange> {
    let total = ts.seconds as i128 * NANOS_PER_SECOND + ts.nanos as i128;
    OffsetDateTime::from_unix_timestamp_nanos(total)
}
