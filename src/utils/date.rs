use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DMY_RE: Regex = Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").unwrap();
    static ref HHMM_RE: Regex = Regex::new(r"^([0-9]{1,2}):([0-9]{2})$").unwrap();
}

/// Data odierna secondo l'orologio locale del server
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Converte "DD/MM/YYYY" in una data; `None` se il formato o la data non sono validi.
pub fn parse_dmy(s: &str) -> Option<NaiveDate> {
    let caps = DMY_RE.captures(s.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_dmy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Minuti dalla mezzanotte per un orario "H:MM" o "HH:MM" (00:00 - 23:59)
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let caps = HHMM_RE.captures(s.trim())?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}

/// Normalizza un orario valido in "HH:MM"
pub fn normalize_hhmm(s: &str) -> Option<String> {
    parse_hhmm(s).map(format_hhmm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dmy_round_trips_through_iso_date() {
        let d = parse_dmy("03/03/2025").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(format_dmy(d), "03/03/2025");
    }

    #[test]
    fn dmy_rejects_bad_format_and_impossible_dates() {
        assert!(parse_dmy("2025-03-03").is_none());
        assert!(parse_dmy("3/3/2025").is_none());
        assert!(parse_dmy("31/02/2025").is_none());
    }

    #[test]
    fn hhmm_parsing_and_normalization() {
        assert_eq!(parse_hhmm("08:00"), Some(480));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(normalize_hhmm("7:05").as_deref(), Some("07:05"));
        assert!(parse_hhmm("24:00").is_none());
        assert!(parse_hhmm("12:60").is_none());
        assert!(parse_hhmm("noon").is_none());
    }
}
