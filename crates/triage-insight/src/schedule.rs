//! Resolution of DATE / TIME mentions into a concrete proposed start.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;

const END_OF_DAY_HOUR: u32 = 17;

/// Partial schedule assembled from several mentions. The first mention to
/// supply a date (or time) wins.
#[derive(Debug, Default)]
struct Parts {
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    /// Exact instant from "in N minutes/hours".
    instant: Option<NaiveDateTime>,
}

impl Parts {
    fn date(&mut self, d: Option<NaiveDate>) {
        if self.date.is_none() {
            self.date = d;
        }
    }

    fn time(&mut self, t: Option<NaiveTime>) {
        if self.time.is_none() {
            self.time = t;
        }
    }
}

/// Turns mentions such as "tomorrow", "3pm" or "March 28" into a
/// `NaiveDateTime` relative to a reference time.
pub struct ScheduleResolver {
    default_start_hour: u32,
    clock: Regex,
    h24: Regex,
    iso: Regex,
    numeric: Regex,
    month_day: Regex,
    day_of_month: Regex,
    relative: Regex,
    weekday: Regex,
    period: Regex,
    end_of: Regex,
    daypart: Regex,
}

impl ScheduleResolver {
    /// `default_start_hour` is used when a date is mentioned without a time.
    pub fn new(default_start_hour: u32) -> Self {
        let re = |p: &str| Regex::new(p).expect("Invalid schedule regex");
        Self {
            default_start_hour: default_start_hour.min(23),
            clock: re(r"^(\d{1,2})(?::(\d{2}))?\s*([ap])\.?\s*m\.?$"),
            h24: re(r"^(\d{1,2}):(\d{2})$"),
            iso: re(r"^(\d{4})-(\d{1,2})-(\d{1,2})$"),
            numeric: re(r"^(\d{1,2})[/-](\d{1,2})(?:[/-](\d{2,4}))?$"),
            month_day: re(r"^([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?$"),
            day_of_month: re(r"^(\d{1,2})(?:st|nd|rd|th)?\s+of\s+([a-z]+)(?:,?\s+(\d{4}))?$"),
            relative: re(r"^in\s+([a-z0-9]+)\s+([a-z]+)$"),
            weekday: re(
                r"^(?:(next|this|last|coming)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)$",
            ),
            period: re(r"^(next|this|last|coming)\s+(week|month|year|weekend)$"),
            end_of: re(r"^end\s+of\s+(?:the\s+)?(day|week|month)$"),
            daypart: re(
                r"^(?:(this|tomorrow|yesterday)\s+|in\s+the\s+)(morning|afternoon|evening|night)$",
            ),
        }
    }

    /// Combine all mentions into one start time; `None` when nothing resolves.
    ///
    /// Date without time uses the default start hour, time without date uses
    /// the reference date.
    pub fn resolve<S: AsRef<str>>(&self, mentions: &[S], now: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut parts = Parts::default();
        for mention in mentions {
            let normalized = mention
                .as_ref()
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            self.parse_mention(&normalized, now, &mut parts);
        }

        match (parts.date, parts.time, parts.instant) {
            (Some(d), Some(t), _) => Some(d.and_time(t)),
            (Some(d), None, _) => d.and_hms_opt(self.default_start_hour, 0, 0),
            (None, Some(t), _) => Some(now.date().and_time(t)),
            (None, None, instant) => instant,
        }
    }

    fn parse_mention(&self, m: &str, now: NaiveDateTime, parts: &mut Parts) {
        let today = now.date();

        match m {
            "today" => return parts.date(Some(today)),
            "tomorrow" => return parts.date(today.succ_opt()),
            "yesterday" => return parts.date(today.pred_opt()),
            "tonight" => {
                parts.date(Some(today));
                return parts.time(hm(20, 0));
            }
            "noon" | "midday" => return parts.time(hm(12, 0)),
            "midnight" => return parts.time(hm(0, 0)),
            "eod" | "cob" => {
                parts.date(Some(today));
                return parts.time(hm(END_OF_DAY_HOUR, 0));
            }
            "eow" => {
                parts.date(upcoming(today, Weekday::Fri, false));
                return parts.time(hm(END_OF_DAY_HOUR, 0));
            }
            _ => {}
        }

        if let Some(c) = self.clock.captures(m) {
            let hour: u32 = num(&c[1]);
            let minute: u32 = c.get(2).map_or(0, |g| num(g.as_str()));
            if (1..=12).contains(&hour) {
                let hour = match (&c[3], hour) {
                    ("p", h) if h != 12 => h + 12,
                    ("a", 12) => 0,
                    (_, h) => h,
                };
                parts.time(hm(hour, minute));
            }
            return;
        }

        if let Some(c) = self.h24.captures(m) {
            return parts.time(hm(num(&c[1]), num(&c[2])));
        }

        if let Some(c) = self.iso.captures(m) {
            return parts.date(NaiveDate::from_ymd_opt(num(&c[1]) as i32, num(&c[2]), num(&c[3])));
        }

        if let Some(c) = self.numeric.captures(m) {
            let (month, day) = (num(&c[1]), num(&c[2]));
            let date = match c.get(3) {
                Some(y) => NaiveDate::from_ymd_opt(full_year(num(y.as_str())), month, day),
                None => infer_year(today, month, day),
            };
            return parts.date(date);
        }

        if let Some(c) = self.month_day.captures(m) {
            if let Some(month) = month_from_name(&c[1]) {
                let day = num(&c[2]);
                let date = match c.get(3) {
                    Some(y) => NaiveDate::from_ymd_opt(num(y.as_str()) as i32, month, day),
                    None => infer_year(today, month, day),
                };
                return parts.date(date);
            }
        }

        if let Some(c) = self.day_of_month.captures(m) {
            if let Some(month) = month_from_name(&c[2]) {
                let day = num(&c[1]);
                let date = match c.get(3) {
                    Some(y) => NaiveDate::from_ymd_opt(num(y.as_str()) as i32, month, day),
                    None => infer_year(today, month, day),
                };
                return parts.date(date);
            }
        }

        // "in the morning" also fits this shape; it falls through to dayparts.
        let relative = self
            .relative
            .captures(m)
            .and_then(|c| Some((quantity(&c[1])?, c)));
        if let Some((n, c)) = relative {
            match c[2].trim_end_matches('s') {
                "minute" | "min" => parts.instant = parts.instant.or(Some(now + Duration::minutes(n))),
                "hour" | "hr" => parts.instant = parts.instant.or(Some(now + Duration::hours(n))),
                "day" => parts.date(today.checked_add_signed(Duration::days(n))),
                "week" => parts.date(today.checked_add_signed(Duration::weeks(n))),
                "month" => parts.date(today.checked_add_months(Months::new(n as u32))),
                _ => {}
            }
            return;
        }

        if let Some(c) = self.weekday.captures(m) {
            let Ok(target) = c[2].parse::<Weekday>() else { return };
            let date = match c.get(1).map(|g| g.as_str()) {
                Some("next" | "coming") => upcoming(today, target, true),
                Some("last") => {
                    let back = (today.weekday().num_days_from_monday() + 7
                        - target.num_days_from_monday())
                        % 7;
                    let back = if back == 0 { 7 } else { back };
                    today.checked_sub_signed(Duration::days(i64::from(back)))
                }
                _ => upcoming(today, target, false),
            };
            return parts.date(date);
        }

        if let Some(c) = self.period.captures(m) {
            let forward = matches!(&c[1], "next" | "coming");
            let back = &c[1] == "last";
            let date = match &c[2] {
                "week" if forward => today.checked_add_signed(Duration::weeks(1)),
                "week" if back => today.checked_sub_signed(Duration::weeks(1)),
                "month" if forward => today.checked_add_months(Months::new(1)),
                "month" if back => today.checked_sub_months(Months::new(1)),
                "year" if forward => today.checked_add_months(Months::new(12)),
                "year" if back => today.checked_sub_months(Months::new(12)),
                "weekend" => upcoming(today, Weekday::Sat, forward),
                _ => Some(today),
            };
            return parts.date(date);
        }

        if let Some(c) = self.end_of.captures(m) {
            let date = match &c[1] {
                "day" => Some(today),
                "week" => upcoming(today, Weekday::Fri, false),
                _ => last_day_of_month(today),
            };
            parts.date(date);
            return parts.time(hm(END_OF_DAY_HOUR, 0));
        }

        if let Some(c) = self.daypart.captures(m) {
            let date = match c.get(1).map(|g| g.as_str()) {
                Some("tomorrow") => today.succ_opt(),
                Some("yesterday") => today.pred_opt(),
                _ => Some(today),
            };
            let hour = match &c[2] {
                "morning" => 9,
                "afternoon" => 14,
                "evening" => 18,
                _ => 20,
            };
            parts.date(date);
            parts.time(hm(hour, 0));
        }
    }
}

impl Default for ScheduleResolver {
    fn default() -> Self {
        Self::new(9)
    }
}

fn hm(hour: u32, minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Digits captured by a `\d{1,4}` group; out-of-range values fail later in chrono.
fn num(s: &str) -> u32 {
    s.parse().unwrap_or(u32::MAX)
}

fn full_year(y: u32) -> i32 {
    if y < 100 {
        2000 + y as i32
    } else {
        y as i32
    }
}

/// Month/day without a year: this year, or next year if already past.
fn infer_year(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(this_year)
    }
}

/// Next occurrence of `target`, today included unless `skip_today`.
fn upcoming(today: NaiveDate, target: Weekday, skip_today: bool) -> Option<NaiveDate> {
    let ahead =
        (target.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
    let ahead = if ahead == 0 && skip_today { 7 } else { ahead };
    today.checked_add_signed(Duration::days(i64::from(ahead)))
}

fn last_day_of_month(today: NaiveDate) -> Option<NaiveDate> {
    today
        .with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn quantity(word: &str) -> Option<i64> {
    let n = match word {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => return digits.parse().ok().filter(|n| *n <= 10_000),
    };
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wednesday, 2026-03-11 10:30.
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 11)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, 0)
    }

    fn resolve(mentions: &[&str]) -> Option<NaiveDateTime> {
        ScheduleResolver::default().resolve(mentions, now())
    }

    #[test]
    fn test_relative_day_with_clock_time() {
        assert_eq!(resolve(&["tomorrow", "3pm"]), at(2026, 3, 12, 15, 0));
        assert_eq!(resolve(&["today", "3:30 p.m"]), at(2026, 3, 11, 15, 30));
        assert_eq!(resolve(&["yesterday"]), at(2026, 3, 10, 9, 0));
    }

    #[test]
    fn test_time_without_date_uses_reference_date() {
        assert_eq!(resolve(&["noon"]), at(2026, 3, 11, 12, 0));
        assert_eq!(resolve(&["15:45"]), at(2026, 3, 11, 15, 45));
        assert_eq!(resolve(&["midnight"]), at(2026, 3, 11, 0, 0));
    }

    #[test]
    fn test_twelve_oclock_meridiem() {
        assert_eq!(resolve(&["12pm"]), at(2026, 3, 11, 12, 0));
        assert_eq!(resolve(&["12 am"]), at(2026, 3, 11, 0, 0));
        assert_eq!(resolve(&["9 a.m."]), at(2026, 3, 11, 9, 0));
        assert_eq!(resolve(&["13pm"]), None);
    }

    #[test]
    fn test_weekdays() {
        assert_eq!(resolve(&["Friday"]), at(2026, 3, 13, 9, 0));
        assert_eq!(resolve(&["wednesday"]), at(2026, 3, 11, 9, 0));
        assert_eq!(resolve(&["next Wednesday"]), at(2026, 3, 18, 9, 0));
        assert_eq!(resolve(&["next friday"]), at(2026, 3, 13, 9, 0));
        assert_eq!(resolve(&["last monday"]), at(2026, 3, 9, 9, 0));
    }

    #[test]
    fn test_absolute_dates() {
        assert_eq!(resolve(&["2026-04-02"]), at(2026, 4, 2, 9, 0));
        assert_eq!(resolve(&["4/2/2026", "10:15"]), at(2026, 4, 2, 10, 15));
        assert_eq!(resolve(&["04-02-26"]), at(2026, 4, 2, 9, 0));
        assert_eq!(resolve(&["March 28, 2026"]), at(2026, 3, 28, 9, 0));
        assert_eq!(resolve(&["28th of March"]), at(2026, 3, 28, 9, 0));
        assert_eq!(resolve(&["2026-02-30"]), None);
    }

    #[test]
    fn test_past_month_day_rolls_to_next_year() {
        assert_eq!(resolve(&["March 1"]), at(2027, 3, 1, 9, 0));
        assert_eq!(resolve(&["3/1"]), at(2027, 3, 1, 9, 0));
        assert_eq!(resolve(&["Dec 24th"]), at(2026, 12, 24, 9, 0));
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(resolve(&["in 2 hours"]), at(2026, 3, 11, 12, 30));
        assert_eq!(resolve(&["in 30 minutes"]), at(2026, 3, 11, 11, 0));
        assert_eq!(resolve(&["in three days"]), at(2026, 3, 14, 9, 0));
        assert_eq!(resolve(&["in 2 weeks"]), at(2026, 3, 25, 9, 0));
    }

    #[test]
    fn test_day_parts_and_end_of() {
        assert_eq!(resolve(&["tonight"]), at(2026, 3, 11, 20, 0));
        assert_eq!(resolve(&["tomorrow morning"]), at(2026, 3, 12, 9, 0));
        assert_eq!(resolve(&["in the afternoon"]), at(2026, 3, 11, 14, 0));
        assert_eq!(resolve(&["end of day"]), at(2026, 3, 11, 17, 0));
        assert_eq!(resolve(&["EOD"]), at(2026, 3, 11, 17, 0));
        assert_eq!(resolve(&["end of the week"]), at(2026, 3, 13, 17, 0));
        assert_eq!(resolve(&["end of month"]), at(2026, 3, 31, 17, 0));
    }

    #[test]
    fn test_periods() {
        assert_eq!(resolve(&["next week"]), at(2026, 3, 18, 9, 0));
        assert_eq!(resolve(&["next month"]), at(2026, 4, 11, 9, 0));
        assert_eq!(resolve(&["this weekend"]), at(2026, 3, 14, 9, 0));
    }

    #[test]
    fn test_first_mention_wins() {
        assert_eq!(resolve(&["Friday", "tomorrow", "2pm", "4pm"]), at(2026, 3, 13, 14, 0));
    }

    #[test]
    fn test_unresolvable() {
        assert_eq!(resolve(&[]), None);
        assert_eq!(resolve(&["sometime soon"]), None);
    }

    #[test]
    fn test_custom_default_hour() {
        let r = ScheduleResolver::new(13);
        assert_eq!(r.resolve(&["tomorrow"], now()), at(2026, 3, 12, 13, 0));
    }
}
