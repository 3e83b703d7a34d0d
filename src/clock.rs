use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{ AtomicI64, Ordering };
use std::sync::Arc;
use uuid::Uuid;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Wall-clock milliseconds, bumped by one whenever two ids would land on
/// the same tick so ids from one process are strictly increasing.
pub struct MillisIdGenerator {
    clock: Arc<dyn Clock>,
    last: AtomicI64,
}

impl MillisIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, last: AtomicI64::new(i64::MIN) }
    }
}

impl IdGenerator for MillisIdGenerator {
    fn next_id(&self) -> String {
        let now = self.clock.now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = if now > prev { now } else { prev + 1 };
            match self.last.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return next.to_string(),
                Err(actual) => prev = actual,
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    Millis,
    Uuid,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseIdSchemeError {
    message: String,
}

impl fmt::Display for ParseIdSchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseIdSchemeError {}

impl FromStr for IdScheme {
    type Err = ParseIdSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "millis" => Ok(IdScheme::Millis),
            "uuid" => Ok(IdScheme::Uuid),
            _ =>
                Err(ParseIdSchemeError {
                    message: format!("Invalid id scheme: '{}'", s),
                }),
        }
    }
}

pub fn new_id_generator(scheme: IdScheme, clock: Arc<dyn Clock>) -> Arc<dyn IdGenerator> {
    match scheme {
        IdScheme::Millis => Arc::new(MillisIdGenerator::new(clock)),
        IdScheme::Uuid => Arc::new(UuidIdGenerator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FrozenClock(DateTime<Utc>);

    impl Clock for FrozenClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn millis_ids_follow_the_clock() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ids = MillisIdGenerator::new(Arc::new(FrozenClock(at)));
        assert_eq!(ids.next_id(), at.timestamp_millis().to_string());
    }

    #[test]
    fn millis_ids_never_repeat_within_one_tick() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ids = MillisIdGenerator::new(Arc::new(FrozenClock(at)));
        let first: i64 = ids.next_id().parse().unwrap();
        let second: i64 = ids.next_id().parse().unwrap();
        let third: i64 = ids.next_id().parse().unwrap();
        assert_eq!(second, first + 1);
        assert_eq!(third, first + 2);
    }

    #[test]
    fn uuid_ids_are_distinct() {
        let ids = UuidIdGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn id_scheme_parses_case_insensitively() {
        assert_eq!("MILLIS".parse::<IdScheme>(), Ok(IdScheme::Millis));
        assert_eq!("uuid".parse::<IdScheme>(), Ok(IdScheme::Uuid));
        assert!("snowflake".parse::<IdScheme>().is_err());
    }
}
