//! Fluent builder for constructing a [`Sim`].

use pt_core::{PtError, Request, SimConfig};
use pt_routing::Sequencer;
use pt_travel::{build_time_model, TimeModel, TravelTimeModel};

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<M>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: fleet, routing, KPI, and seed settings
/// - `M: TravelTimeModel`: usually [`TimeModel`] from [`SimBuilder::from_config`]
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                 |
/// |-------------------|-----------------------------------------|
/// | `.requests(v)`    | none (the run emits no events)          |
/// | `.sequencer(s)`   | `Sequencer::from_config(&config.routing)` |
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimBuilder::from_config(config)?
///     .requests(requests)
///     .build()?;
/// let output = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<M: TravelTimeModel> {
    config:    SimConfig,
    model:     M,
    requests:  Vec<Request>,
    sequencer: Option<Sequencer>,
}

impl SimBuilder<TimeModel> {
    /// Build the configured travel-time backend and wrap it in a builder.
    pub fn from_config(config: SimConfig) -> SimResult<Self> {
        let model = build_time_model(&config.time_model)?;
        Ok(Self::new(config, model))
    }
}

impl<M: TravelTimeModel> SimBuilder<M> {
    pub fn new(config: SimConfig, model: M) -> Self {
        Self {
            config,
            model,
            requests:  Vec::new(),
            sequencer: None,
        }
    }

    pub fn requests(mut self, requests: Vec<Request>) -> Self {
        self.requests = requests;
        self
    }

    /// Override the sequencer derived from `config.routing`.
    pub fn sequencer(mut self, sequencer: Sequencer) -> Self {
        self.sequencer = Some(sequencer);
        self
    }

    /// Validate the configuration and requests, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim<M>> {
        self.config.validate()?;
        if !self.requests.is_empty() && self.config.kpi.on_time_threshold_min.is_none() {
            return Err(PtError::Config("missing kpi.on_time_threshold_min".into()).into());
        }

        for r in &self.requests {
            if !(r.pickup.lat.is_finite() && r.pickup.lon.is_finite()) {
                return Err(PtError::Config(format!("request {} has a non-finite pickup", r.id)).into());
            }
        }

        let sequencer = self
            .sequencer
            .unwrap_or_else(|| Sequencer::from_config(&self.config.routing));

        Ok(Sim {
            config:   self.config,
            model:    self.model,
            sequencer,
            requests: self.requests,
        })
    }
}
