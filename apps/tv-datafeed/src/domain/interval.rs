//! Chart Intervals
//!
//! The closed set of bar granularities the chart protocol accepts.
//! Each variant carries an opaque token understood by the remote
//! service; the token has no structure beyond identity.

/// Bar granularity for a historical series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    /// 1-minute bars.
    OneMinute,
    /// 3-minute bars.
    ThreeMinutes,
    /// 5-minute bars.
    FiveMinutes,
    /// 15-minute bars.
    FifteenMinutes,
    /// 30-minute bars.
    ThirtyMinutes,
    /// 45-minute bars.
    FortyFiveMinutes,
    /// 1-hour bars.
    OneHour,
    /// 2-hour bars.
    TwoHours,
    /// 3-hour bars.
    ThreeHours,
    /// 4-hour bars.
    FourHours,
    /// Daily bars.
    #[default]
    Daily,
    /// Weekly bars.
    Weekly,
    /// Monthly bars.
    Monthly,
}

impl Interval {
    /// Wire token sent in `create_series`.
    #[must_use]
    pub const fn as_token(&self) -> &'static str {
        match self {
            Self::OneMinute => "1",
            Self::ThreeMinutes => "3",
            Self::FiveMinutes => "5",
            Self::FifteenMinutes => "15",
            Self::ThirtyMinutes => "30",
            Self::FortyFiveMinutes => "45",
            Self::OneHour => "1H",
            Self::TwoHours => "2H",
            Self::ThreeHours => "3H",
            Self::FourHours => "4H",
            Self::Daily => "1D",
            Self::Weekly => "1W",
            Self::Monthly => "1M",
        }
    }

    /// Parse an interval from its wire token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1" => Some(Self::OneMinute),
            "3" => Some(Self::ThreeMinutes),
            "5" => Some(Self::FiveMinutes),
            "15" => Some(Self::FifteenMinutes),
            "30" => Some(Self::ThirtyMinutes),
            "45" => Some(Self::FortyFiveMinutes),
            "1H" => Some(Self::OneHour),
            "2H" => Some(Self::TwoHours),
            "3H" => Some(Self::ThreeHours),
            "4H" => Some(Self::FourHours),
            "1D" => Some(Self::Daily),
            "1W" => Some(Self::Weekly),
            "1M" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let all = [
            Interval::OneMinute,
            Interval::ThreeMinutes,
            Interval::FiveMinutes,
            Interval::FifteenMinutes,
            Interval::ThirtyMinutes,
            Interval::FortyFiveMinutes,
            Interval::OneHour,
            Interval::TwoHours,
            Interval::ThreeHours,
            Interval::FourHours,
            Interval::Daily,
            Interval::Weekly,
            Interval::Monthly,
        ];
        for interval in all {
            assert_eq!(Interval::from_token(interval.as_token()), Some(interval));
        }
    }

    #[test]
    fn unknown_token_rejected() {
        assert_eq!(Interval::from_token("7H"), None);
        assert_eq!(Interval::from_token(""), None);
        assert_eq!(Interval::from_token("1d"), None);
    }

    #[test]
    fn default_is_daily() {
        assert_eq!(Interval::default(), Interval::Daily);
        assert_eq!(Interval::default().as_token(), "1D");
    }
}
