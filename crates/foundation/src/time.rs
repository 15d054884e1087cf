/// Wall-clock instant in milliseconds since the Unix epoch (UTC).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

const MS_PER_DAY: i64 = 86_400_000;

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(0);

    pub fn from_millis(ms: i64) -> Self {
        Timestamp(ms)
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    pub fn civil_date(self) -> CivilDate {
        let (year, month, day) = civil_from_days(self.0.div_euclid(MS_PER_DAY));
        CivilDate { year, month, day }
    }

    /// Short US-style date, e.g. `Jan 5, 2024`.
    pub fn short_date(self) -> String {
        let d = self.civil_date();
        format!(
            "{} {}, {}",
            MONTH_ABBREV[(d.month - 1) as usize],
            d.day,
            d.year
        )
    }
}

/// Proleptic Gregorian calendar date.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CivilDate {
    pub year: i64,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
}

/// Days since 1970-01-01 for a civil date.
pub fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let m = month as i64;
    let y = if m <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400);
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Parses catalog approach timestamps of the form `2024-Jan-05 12:34` (UTC).
///
/// The time-of-day part is optional.
pub fn parse_catalog_datetime(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    let (date, time) = match text.split_once(' ') {
        Some((d, t)) => (d, Some(t.trim())),
        None => (text, None),
    };

    let mut parts = date.split('-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month_name = parts.next()?;
    let day: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let month = MONTH_ABBREV
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month_name))? as u8
        + 1;
    if !(1..=31).contains(&day) {
        return None;
    }

    let mut ms = days_from_civil(year, month, day) * MS_PER_DAY;
    if let Some(time) = time {
        let (h, m) = time.split_once(':')?;
        let h: i64 = h.parse().ok()?;
        let m: i64 = m.parse().ok()?;
        if !(0..24).contains(&h) || !(0..60).contains(&m) {
            return None;
        }
        ms += (h * 60 + m) * 60_000;
    }
    Some(Timestamp(ms))
}
