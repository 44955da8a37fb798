use std::fmt;
use std::time::{Duration, Instant};

use motive_core::{BehaviorElement, ElementMeta, Outcome, SenseInfo, Services};

use crate::config::{ExecutorConfig, Pacing};
use crate::error::ExecutorResult;
use crate::plant::{KinematicPlant, Plant};
use crate::report::RunReport;

type ServicesFactory = Box<dyn Fn() -> Services + Send + Sync>;

/// Drives one root element from `initialize` to its terminal outcome.
///
/// Each period: stamp the sense timestamp, notify "tick", tick the root, apply its command to the
/// plant, then wait one period. The loop stops after the first terminal outcome, which still gets
/// its command applied. Every run builds a fresh [`Services`] bundle from the factory (by default
/// [`Services::default`]), so reflex bookkeeping never leaks between runs.
pub struct Executor<P = KinematicPlant> {
    config: ExecutorConfig,
    plant: P,
    services: ServicesFactory,
}

impl Executor<KinematicPlant> {
    pub fn new(config: ExecutorConfig) -> ExecutorResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            plant: KinematicPlant,
            services: Box::new(Services::default),
        })
    }
}

impl<P: Plant> Executor<P> {
    pub fn with_plant<Q: Plant>(self, plant: Q) -> Executor<Q> {
        Executor {
            config: self.config,
            plant,
            services: self.services,
        }
    }

    pub fn with_services<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Services + Send + Sync + 'static,
    {
        self.services = Box::new(factory);
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn plant(&self) -> &P {
        &self.plant
    }

    /// Run on the calling thread, blocking between ticks.
    ///
    /// Returns right after the terminal tick's command is applied, without waiting out its period.
    pub fn run(&mut self, root: &mut dyn BehaviorElement) -> RunReport {
        let mut drive = Drive::begin(&self.config, (self.services)(), root);
        loop {
            let outcome = drive.tick(root, &mut self.plant);
            if outcome.is_terminal() {
                return drive.finish(root, outcome);
            }
            if self.config.pacing == Pacing::RealTime {
                std::thread::sleep(drive.period);
            }
        }
    }

    /// Run as a future, suspending on the tokio timer between ticks.
    ///
    /// Like [`run`](Self::run), it completes without waiting after the terminal tick.
    ///
    /// With simulated pacing the future still yields once per tick so a long run does not starve
    /// other tasks on the same worker.
    pub async fn run_async(&mut self, root: &mut dyn BehaviorElement) -> RunReport {
        let mut drive = Drive::begin(&self.config, (self.services)(), root);
        loop {
            let outcome = drive.tick(root, &mut self.plant);
            if outcome.is_terminal() {
                return drive.finish(root, outcome);
            }
            match self.config.pacing {
                Pacing::RealTime => tokio::time::sleep(drive.period).await,
                Pacing::Simulated => tokio::task::yield_now().await,
            }
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for Executor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.config)
            .field("plant", &self.plant)
            .finish_non_exhaustive()
    }
}

/// State of one run between `initialize` and `finalize`.
struct Drive {
    services: Services,
    meta: ElementMeta,
    sense: SenseInfo,
    pacing: Pacing,
    period: Duration,
    clock: Instant,
    first_tick: Option<Instant>,
    ticks: u64,
}

impl Drive {
    fn begin(config: &ExecutorConfig, services: Services, root: &mut dyn BehaviorElement) -> Self {
        let now = Instant::now();
        let sense = SenseInfo::at(now)
            .with_position(config.initial_x)
            .with_velocity(config.initial_velocity);

        let meta = root.initialize(services.clone());
        services.notify(meta.name(), "initialize");
        tracing::info!(
            root = meta.name(),
            period_ms = config.period_ms,
            pacing = ?config.pacing,
            "run started"
        );

        Self {
            services,
            meta,
            sense,
            pacing: config.pacing,
            period: config.period(),
            clock: now,
            first_tick: None,
            ticks: 0,
        }
    }

    fn tick(&mut self, root: &mut dyn BehaviorElement, plant: &mut dyn Plant) -> Outcome {
        self.sense.timestamp = match self.pacing {
            Pacing::RealTime => Instant::now(),
            Pacing::Simulated => self.clock,
        };
        self.first_tick.get_or_insert(self.sense.timestamp);

        self.services.notify(self.meta.name(), "tick");
        let outcome = root.tick(&self.sense);
        plant.apply(&mut self.sense, outcome.actuate, self.period);

        self.ticks += 1;
        self.clock += self.period;
        tracing::trace!(
            tick = self.ticks,
            outcome = ?outcome.value,
            velocity = outcome.actuate.velocity,
            x = self.sense.measured_x,
            "tick applied"
        );
        outcome
    }

    fn finish(self, root: &mut dyn BehaviorElement, outcome: Outcome) -> RunReport {
        root.finalize();
        self.services.notify(self.meta.name(), "finalize");

        let elapsed = self
            .first_tick
            .map(|first| self.sense.timestamp.saturating_duration_since(first))
            .unwrap_or_default();
        tracing::info!(
            root = self.meta.name(),
            outcome = ?outcome.value,
            ticks = self.ticks,
            elapsed_ms = elapsed.as_millis() as u64,
            "run finished"
        );

        RunReport {
            root: self.meta.name().to_owned(),
            outcome,
            ticks: self.ticks,
            final_sense: self.sense,
            elapsed,
        }
    }
}
