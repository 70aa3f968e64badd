use time::OffsetDateTime;
use time::macros::format_description;

/// Formats `datetime` the way message timestamps are shown.
pub fn display(datetime: OffsetDateTime) -> String {
    datetime
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| datetime.unix_timestamp().to_string())
}

/// Formats the current local time, falling back to UTC when the local
/// offset cannot be determined.
pub fn display_now() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    display(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn display_format() {
        assert_eq!(display(datetime!(2024-03-05 07:08:09 UTC)), "2024-03-05 07:08:09");
    }
}
