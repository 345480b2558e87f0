//! Clock-driven windows for rolling live feeds.

use frontdesk_core::dates::TimestampRange;
use frontdesk_core::error::CoreError;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::dashboard::week_range;
use crate::live::Window;

/// The current local day in `tz`, recomputed at each midnight.
pub fn today(tz: TimeZone) -> impl FnMut() -> Result<Window, CoreError> + Send + 'static {
    move || {
        let now = Timestamp::now();
        let range = TimestampRange::day(now.to_zoned(tz.clone()).date(), &tz)?;
        Ok(Window::until_end(range, now))
    }
}

/// The current Monday-to-Sunday week in `tz`, recomputed each Monday.
pub fn this_week(tz: TimeZone) -> impl FnMut() -> Result<Window, CoreError> + Send + 'static {
    move || {
        let now = Timestamp::now();
        let range = week_range(now.to_zoned(tz.clone()).date(), &tz)?;
        Ok(Window::until_end(range, now))
    }
}
