use chrono::{Local, NaiveDateTime, SubsecRound};

/// Source of the current local date and time.
///
/// The calculators take "now" as an argument; the refresh driver asks a
/// `Clock` for it once per recalculation so tests can pin or count samples.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Host wall clock, truncated to whole seconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(0)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CountingClock;
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn system_clock_has_no_fraction() {
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }

    #[test]
    fn counting_clock_counts_samples() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let clock = CountingClock::new(start);
        assert_eq!(clock.samples(), 0);

        let as_port: &dyn Clock = &clock;
        assert_eq!(as_port.now(), start);
        assert_eq!(as_port.now(), start);
        assert_eq!(clock.samples(), 2);
    }

    #[test]
    fn counting_clock_can_be_moved() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let clock = CountingClock::new(start);
        clock.set(start + chrono::Duration::seconds(5));

        assert_eq!(clock.now().second(), 5);
        assert_eq!(clock.samples(), 1);
    }
}
