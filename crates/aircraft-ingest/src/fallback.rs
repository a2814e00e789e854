//! Deterministic enumeration of one day's snapshot filenames.
//!
//! The source publishes a snapshot every five seconds named `HHMMSSZ.json.gz`,
//! so the full candidate set can be rebuilt without reading the listing page.

/// Seconds between consecutive snapshots.
pub const SNAPSHOT_INTERVAL_SECS: u32 = 5;

/// Number of snapshots in one day.
pub const SNAPSHOTS_PER_DAY: usize = (24 * 60 * 60 / SNAPSHOT_INTERVAL_SECS) as usize;

/// Filename for the snapshot at the given time of day.
pub fn snapshot_name(hour: u32, minute: u32, second: u32) -> String {
    format!("{hour:02}{minute:02}{second:02}Z.json.gz")
}

/// All snapshot filenames for one day, in ascending time order.
pub fn generate_day_candidates() -> Vec<String> {
    let mut names = Vec::with_capacity(SNAPSHOTS_PER_DAY);
    for hour in 0..24 {
        for minute in 0..60 {
            for second in (0..60).step_by(SNAPSHOT_INTERVAL_SECS as usize) {
                names.push(snapshot_name(hour, minute, second));
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_count_and_bounds() {
        let names = generate_day_candidates();
        assert_eq!(names.len(), 17_280);
        assert_eq!(names.len(), SNAPSHOTS_PER_DAY);
        assert_eq!(names.first().map(String::as_str), Some("000000Z.json.gz"));
        assert_eq!(names[1], "000005Z.json.gz");
        assert_eq!(names.last().map(String::as_str), Some("235955Z.json.gz"));
    }

    #[test]
    fn test_every_name_is_well_formed_and_ascending() {
        let re = Regex::new(r"^(\d{2})(\d{2})(\d{2})Z\.json\.gz$").unwrap();
        let mut previous: Option<u32> = None;

        for name in generate_day_candidates() {
            let caps = re.captures(&name).expect("name matches pattern");
            let h: u32 = caps[1].parse().unwrap();
            let m: u32 = caps[2].parse().unwrap();
            let s: u32 = caps[3].parse().unwrap();
            assert!(h < 24 && m < 60 && s < 60 && s % 5 == 0, "{name}");

            let t = h * 3600 + m * 60 + s;
            if let Some(p) = previous {
                assert!(t > p, "{name} not after previous");
            }
            previous = Some(t);
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate_day_candidates(), generate_day_candidates());
    }
}
