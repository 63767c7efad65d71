//! A boolean source ticked once per training step, used to decide whether
//! a dense layer rehashes its LSH index.
use crate::error::{Error, Result};

pub enum Scheduler {
    ConstantFrequency {
        period: u64,
        counter: u64,
    },
    ExponentialDecay {
        period: u64,
        decay: f64,
        counter: u64,
    },
}

impl Scheduler {
    pub fn constant_frequency(n: u64) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidSchedulerConfig(
                "frequency must be non-zero".to_string(),
            ));
        }
        Ok(Scheduler::ConstantFrequency {
            period: n,
            counter: 0,
        })
    }

    pub fn exponential_decay(n: u64, decay: f64) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidSchedulerConfig(
                "initial period must be non-zero".to_string(),
            ));
        }
        if !decay.is_finite() {
            return Err(Error::InvalidSchedulerConfig(
                "decay rate must be finite".to_string(),
            ));
        }
        Ok(Scheduler::ExponentialDecay {
            period: n,
            decay,
            counter: 0,
        })
    }

    /// Advances the internal counter by one training step; returns whether
    /// this step fires a rehash.
    pub fn tick(&mut self) -> bool {
        match self {
            Scheduler::ConstantFrequency { period, counter } => {
                *counter += 1;
                if *counter >= *period {
                    *counter = 0;
                    true
                } else {
                    false
                }
            }
            Scheduler::ExponentialDecay {
                period,
                decay,
                counter,
            } => {
                *counter += 1;
                if *counter >= *period {
                    *counter = 0;
                    let grown = (*period as f64 * decay.exp()).ceil();
                    *period = if grown.is_finite() && grown >= 1.0 {
                        grown as u64
                    } else {
                        u64::MAX
                    };
                    true
                } else {
                    false
                }
            }
        }
    }
}
