//! Countdown to the target date
//!
//! Ticked once a second with the wall clock. The first tick at or past the target
//! reports `reached`; afterwards the display stays at zero for the rest of the session.

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountdownUnits {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl CountdownUnits {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Floors `remaining_ms` into whole days, hours, minutes and seconds.
    pub fn from_remaining_ms(remaining_ms: f64) -> Self {
        if remaining_ms.is_nan() || remaining_ms <= 0.0 {
            return Self::ZERO;
        }
        let mut rest = remaining_ms.floor() as u64;
        let days = rest / MS_PER_DAY;
        rest -= days * MS_PER_DAY;
        let hours = rest / MS_PER_HOUR;
        rest -= hours * MS_PER_HOUR;
        let minutes = rest / MS_PER_MINUTE;
        rest -= minutes * MS_PER_MINUTE;
        Self {
            days,
            hours,
            minutes,
            seconds: rest / MS_PER_SECOND,
        }
    }

    pub fn days_text(&self) -> String {
        self.days.to_string()
    }

    pub fn hours_text(&self) -> String {
        format!("{:02}", self.hours)
    }

    pub fn minutes_text(&self) -> String {
        format!("{:02}", self.minutes)
    }

    pub fn seconds_text(&self) -> String {
        format!("{:02}", self.seconds)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownPhase {
    Counting,
    Celebrating,
    /// The celebration was closed; nothing more happens this session.
    Celebrated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownTick {
    pub units: CountdownUnits,
    pub phase: CountdownPhase,
    /// Set only on the tick that crossed zero.
    pub reached: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct Countdown {
    target_ms: f64,
    phase: CountdownPhase,
}

impl Countdown {
    pub fn new(target_ms: f64) -> Self {
        Self {
            target_ms,
            phase: CountdownPhase::Counting,
        }
    }

    pub fn target_ms(&self) -> f64 {
        self.target_ms
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn tick(&mut self, now_ms: f64) -> CountdownTick {
        if self.phase != CountdownPhase::Counting {
            return CountdownTick {
                units: CountdownUnits::ZERO,
                phase: self.phase,
                reached: false,
            };
        }

        let remaining = self.target_ms - now_ms;
        if remaining > 0.0 {
            return CountdownTick {
                units: CountdownUnits::from_remaining_ms(remaining),
                phase: self.phase,
                reached: false,
            };
        }

        self.phase = CountdownPhase::Celebrating;
        CountdownTick {
            units: CountdownUnits::ZERO,
            phase: self.phase,
            reached: true,
        }
    }

    /// Called when the celebration closes. Only moves forward from `Celebrating`.
    pub fn finish_celebration(&mut self) {
        if self.phase == CountdownPhase::Celebrating {
            self.phase = CountdownPhase::Celebrated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_one_of_each_unit() {
        let units = CountdownUnits::from_remaining_ms(90_061_001.0);
        assert_eq!(
            units,
            CountdownUnits {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
    }

    #[test]
    fn display_padding() {
        let units = CountdownUnits::from_remaining_ms((12 * MS_PER_DAY + 3 * MS_PER_HOUR + 7_000) as f64);
        assert_eq!(units.days_text(), "12");
        assert_eq!(units.hours_text(), "03");
        assert_eq!(units.minutes_text(), "00");
        assert_eq!(units.seconds_text(), "07");
    }

    #[test]
    fn non_positive_remaining_is_zero() {
        assert_eq!(CountdownUnits::from_remaining_ms(0.0), CountdownUnits::ZERO);
        assert_eq!(CountdownUnits::from_remaining_ms(-5.0), CountdownUnits::ZERO);
        assert_eq!(CountdownUnits::from_remaining_ms(f64::NAN), CountdownUnits::ZERO);
    }

    #[test]
    fn reaches_zero_exactly_once() {
        let mut cd = Countdown::new(10_000.0);
        let t = cd.tick(8_500.0);
        assert_eq!(t.units.seconds, 1);
        assert!(!t.reached);

        let t = cd.tick(10_000.0);
        assert!(t.reached);
        assert_eq!(t.phase, CountdownPhase::Celebrating);

        let t = cd.tick(11_000.0);
        assert!(!t.reached);
        assert_eq!(t.units, CountdownUnits::ZERO);
    }

    #[test]
    fn closed_celebration_never_counts_again() {
        let mut cd = Countdown::new(0.0);
        assert!(cd.tick(1.0).reached);
        cd.finish_celebration();
        assert_eq!(cd.phase(), CountdownPhase::Celebrated);

        // even a clock jumping backwards stays finished
        let t = cd.tick(-100_000.0);
        assert_eq!(t.phase, CountdownPhase::Celebrated);
        assert!(!t.reached);
        assert_eq!(t.units, CountdownUnits::ZERO);
    }

    #[test]
    fn finish_before_reaching_is_ignored() {
        let mut cd = Countdown::new(5_000.0);
        cd.finish_celebration();
        assert_eq!(cd.phase(), CountdownPhase::Counting);
    }
}
