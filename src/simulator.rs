//! Artificial network impairment.
//!
//! Loopback UDP never loses anything, so without help the retransmission
//! paths would go completely unexercised. Before any datagram is actually
//! handed to the socket, it passes through an impairment policy:
//!
//! | Fault  | Description                                                  |
//! |--------|--------------------------------------------------------------|
//! | Loss   | Drop the datagram with probability `loss_rate` (never sent). |
//! | Delay  | With probability `delay_rate`, sleep for a uniformly random  |
//! |        | duration in `[delay_min, delay_max]` before sending.         |
//!
//! Both draws are independent. The same policy shape is applied on the data
//! path (sender → receiver) and the ACK path (receiver → sender), so both
//! directions are lossy and delay-prone.
//!
//! The decisions live behind the [`Impairment`] trait rather than a
//! process-wide RNG: each engine owns its policy, and tests can inject a
//! seeded [`Simulator`] (or a scripted implementation) for reproducible runs.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-datagram impairment decisions.
///
/// `should_drop` is consulted first; a dropped datagram is silently
/// discarded and `delay` is never asked about it.
pub trait Impairment: Send {
    /// Decide whether the next datagram is lost before transmission.
    fn should_drop(&mut self) -> bool;

    /// Decide whether (and for how long) the next datagram is delayed.
    fn delay(&mut self) -> Option<Duration>;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the random impairment policy.
///
/// Probabilities are in the range `[0.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Probability that any given datagram is silently dropped.
    pub loss_rate: f64,
    /// Probability that a datagram is delayed before sending.
    pub delay_rate: f64,
    /// Lower bound of the random delay.
    pub delay_min: Duration,
    /// Upper bound of the random delay.
    pub delay_max: Duration,
}

impl SimulatorConfig {
    /// Default impairment for the data path: 20% loss, 20% delay of 50–300 ms.
    pub fn data_path() -> Self {
        Self {
            loss_rate: 0.2,
            delay_rate: 0.2,
            delay_min: Duration::from_millis(50),
            delay_max: Duration::from_millis(300),
        }
    }

    /// Default impairment for the ACK path: 20% loss, 20% delay of 50–200 ms.
    pub fn ack_path() -> Self {
        Self {
            loss_rate: 0.2,
            delay_rate: 0.2,
            delay_min: Duration::from_millis(50),
            delay_max: Duration::from_millis(200),
        }
    }

    /// A transparent pass-through: nothing is dropped, nothing is delayed.
    pub fn lossless() -> Self {
        Self {
            loss_rate: 0.0,
            delay_rate: 0.0,
            delay_min: Duration::ZERO,
            delay_max: Duration::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// The random impairment policy used in production runs.
#[derive(Debug)]
pub struct Simulator {
    config: SimulatorConfig,
    rng: StdRng,
}

impl Simulator {
    /// Create a simulator with an entropy-seeded RNG.
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a simulator with a fixed seed so test runs are reproducible.
    pub fn seeded(config: SimulatorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Impairment for Simulator {
    fn should_drop(&mut self) -> bool {
        self.rng.gen::<f64>() < self.config.loss_rate
    }

    fn delay(&mut self) -> Option<Duration> {
        if self.rng.gen::<f64>() < self.config.delay_rate {
            Some(self.rng.gen_range(self.config.delay_min..=self.config.delay_max))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
