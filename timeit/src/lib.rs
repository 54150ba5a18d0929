#![forbid(unsafe_code)]

//! Wall-clock micro-benchmark loop: build a payload, time one operation on
//! it, repeat, report the average.

use std::fmt::{self, Display};
use std::time::{Duration, Instant};

////////////////////////////////////////////////////////////////////////////////

/// Aggregate of repeated wall-clock measurements of a single operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Measurement {
    total: Duration,
    trials: u32,
}

impl Measurement {
    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Mean duration of a single trial.
    pub fn average(&self) -> Duration {
        self.total / self.trials
    }
}

impl Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let average = self.average();
        writeln!(f, "per measurement on average")?;
        writeln!(f, "{} us.", average.as_micros())?;
        writeln!(f, "{} ms.", average.as_secs_f64() * 1e3)?;
        writeln!(f, "{} s.", average.as_secs_f64())?;
        write!(f, "measurements taken: {}", self.trials)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Runs `op` `ntimes` times, building a fresh payload with `seed` before
/// each trial. Only the call to `op` is on the clock; seeding happens
/// outside of it, and each trial consumes its own payload, so the operation
/// never mutates input shared across trials. `ntimes` is clamped to at
/// least one trial.
pub fn timeit<T, S, Op>(mut seed: S, mut op: Op, ntimes: u32) -> Measurement
where
    S: FnMut() -> T,
    Op: FnMut(T),
{
    let trials = ntimes.max(1);
    let mut total = Duration::ZERO;

    for _ in 0..trials {
        let payload = seed();

        let start = Instant::now();
        op(payload);
        total += start.elapsed();
    }

    Measurement { total, trials }
}

////////////////////////////////////////////////////////////////////////////////
