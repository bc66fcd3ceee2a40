//! Model of how the kubelet turns probe attempts into verdicts.
//!
//! Readiness and liveness share the `/status` endpoint but are evaluated independently, each
//! with its own clock starting at container launch. Time is passed in as the elapsed
//! `Duration` since launch so the model can be driven without a real clock.

use log::debug;
use std::time::Duration;

use crate::models::workload_spec::{ContainerTemplate, ProbePolicy};

/// Result of a single probe attempt.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ProbeOutcome {
    Success,
    Failure,
    /// No answer within the probe timeout. Counts as a failure.
    Timeout,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Verdict {
    Unknown,
    Passing,
    Failing,
}

/// Threshold bookkeeping shared by both probe kinds.
///
/// Attempts are accepted only when due: never before the initial delay, and at most one per
/// period slot. A caller arriving late lands in the slot for the current time, not in each
/// slot it missed.
#[derive(Debug, Clone)]
pub struct ProbeTracker {
    policy: ProbePolicy,
    // slots consumed so far, counted from the initial delay
    attempts: u32,
    consecutive_successes: i32,
    consecutive_failures: i32,
    verdict: Verdict,
}

impl ProbeTracker {
    pub fn new(policy: ProbePolicy) -> Self {
        ProbeTracker {
            policy,
            attempts: 0,
            consecutive_successes: 0,
            consecutive_failures: 0,
            verdict: Verdict::Unknown,
        }
    }

    /// Time since container start at which the next attempt is scheduled.
    pub fn next_attempt_at(&self) -> Duration {
        self.policy.initial_delay() + self.policy.period() * self.attempts
    }

    pub fn is_due(&self, elapsed: Duration) -> bool {
        elapsed >= self.next_attempt_at()
    }

    /// Number of the period slot `elapsed` falls into, 1 being the slot at the initial delay.
    fn slot_at(&self, elapsed: Duration) -> u32 {
        let since_delay = elapsed - self.policy.initial_delay();
        let period = self.policy.period().as_millis();
        if period == 0 {
            return self.attempts + 1;
        }
        (since_delay.as_millis() / period) as u32 + 1
    }

    fn record(&mut self, elapsed: Duration, outcome: ProbeOutcome) -> Verdict {
        if !self.is_due(elapsed) {
            return self.verdict;
        }
        self.attempts = self.slot_at(elapsed);

        match outcome {
            ProbeOutcome::Success => {
                self.consecutive_failures = 0;
                self.consecutive_successes += 1;
                if self.consecutive_successes >= self.policy.success_threshold {
                    self.verdict = Verdict::Passing;
                }
            }
            ProbeOutcome::Failure | ProbeOutcome::Timeout => {
                self.consecutive_successes = 0;
                self.consecutive_failures += 1;
                if self.consecutive_failures >= self.policy.failure_threshold {
                    self.verdict = Verdict::Failing;
                }
            }
        }

        self.verdict
    }

    /// Forget all history, as when the container is restarted.
    fn reset(&mut self) {
        self.attempts = 0;
        self.consecutive_successes = 0;
        self.consecutive_failures = 0;
        self.verdict = Verdict::Unknown;
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Readiness {
    Unknown,
    Ready,
    NotReady,
}

/// Decides whether the pod is listed as an endpoint of its services.
#[derive(Debug, Clone)]
pub struct ReadinessProbe {
    tracker: ProbeTracker,
}

impl ReadinessProbe {
    pub fn new(policy: ProbePolicy) -> Self {
        ReadinessProbe {
            tracker: ProbeTracker::new(policy),
        }
    }

    pub fn tracker(&self) -> &ProbeTracker {
        &self.tracker
    }

    pub fn is_due(&self, elapsed: Duration) -> bool {
        self.tracker.is_due(elapsed)
    }

    pub fn state(&self) -> Readiness {
        match self.tracker.verdict {
            Verdict::Unknown => Readiness::Unknown,
            Verdict::Passing => Readiness::Ready,
            Verdict::Failing => Readiness::NotReady,
        }
    }

    /// Records an attempt made `elapsed` after container start. Attempts that are not due
    /// leave the state unchanged.
    pub fn record(&mut self, elapsed: Duration, outcome: ProbeOutcome) -> Readiness {
        let before = self.state();
        self.tracker.record(elapsed, outcome);
        let after = self.state();
        if before != after {
            debug!("readiness {:?} -> {:?} at {:?}", before, after, elapsed);
        }
        after
    }

    /// The container was restarted: readiness is evaluated from scratch.
    pub fn restarted(&mut self) {
        self.tracker.reset();
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Liveness {
    Unknown,
    Alive,
    Dead,
}

/// Decides whether the container gets restarted.
#[derive(Debug, Clone)]
pub struct LivenessProbe {
    tracker: ProbeTracker,
}

impl LivenessProbe {
    pub fn new(policy: ProbePolicy) -> Self {
        LivenessProbe {
            tracker: ProbeTracker::new(policy),
        }
    }

    pub fn tracker(&self) -> &ProbeTracker {
        &self.tracker
    }

    pub fn is_due(&self, elapsed: Duration) -> bool {
        self.tracker.is_due(elapsed)
    }

    pub fn state(&self) -> Liveness {
        match self.tracker.verdict {
            Verdict::Unknown => Liveness::Unknown,
            Verdict::Passing => Liveness::Alive,
            Verdict::Failing => Liveness::Dead,
        }
    }

    /// Records an attempt made `elapsed` after container start. Attempts that are not due
    /// leave the state unchanged.
    pub fn record(&mut self, elapsed: Duration, outcome: ProbeOutcome) -> Liveness {
        let before = self.state();
        self.tracker.record(elapsed, outcome);
        let after = self.state();
        if before != after {
            debug!("liveness {:?} -> {:?} at {:?}", before, after, elapsed);
        }
        after
    }

    pub fn should_restart(&self) -> bool {
        self.state() == Liveness::Dead
    }

    /// The container was restarted: its clock and counters start over.
    pub fn restarted(&mut self) {
        self.tracker.reset();
    }
}

/// Both probes of one container. Restarting the container resets both clocks.
#[derive(Debug, Clone)]
pub struct ContainerProbes {
    pub readiness: ReadinessProbe,
    pub liveness: LivenessProbe,
}

impl ContainerProbes {
    pub fn new(container: &ContainerTemplate) -> Self {
        ContainerProbes {
            readiness: ReadinessProbe::new(container.readiness.clone()),
            liveness: LivenessProbe::new(container.liveness.clone()),
        }
    }

    pub fn restarted(&mut self) {
        self.readiness.restarted();
        self.liveness.restarted();
    }
}
