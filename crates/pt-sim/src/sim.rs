//! The `Sim` struct and its group loop.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info};

use pt_core::{GeoPoint, Request, SimConfig};
use pt_routing::Sequencer;
use pt_travel::TravelTimeModel;

use crate::kpi::{compute_kpis, RunKpis};
use crate::partition::partition;
use crate::plan::{Event, GroupKey, VehicleGroupPlan, VehicleRoute};
use crate::{SimObserver, SimResult};

/// One vehicle load awaiting planning.
struct Job<'a> {
    key:    GroupKey,
    index:  usize,
    center: GeoPoint,
    load:   Vec<&'a Request>,
}

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct RunOutput {
    pub plans:  Vec<VehicleGroupPlan>,
    pub events: Vec<Event>,
    pub routes: Vec<VehicleRoute>,
    pub kpis:   RunKpis,
}

/// The simulation runner.
///
/// For each (center, slot, class) group in ascending key order:
///
/// 1. **Partition**: split the group's requests into vehicle loads.
/// 2. **Plan** (parallel with the `parallel` feature): per load, build the
///    mean and sampled matrices, sequence the tour, and propagate the
///    promised and actual timelines.
/// 3. **Report** (sequential, job order): derive events and the route
///    summary and hand them to the observer.
///
/// KPIs are computed once over every event of the run.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<M: TravelTimeModel> {
    pub config:    SimConfig,
    /// Shared by every group; its caches are the only cross-group state.
    pub model:     M,
    pub sequencer: Sequencer,
    pub requests:  Vec<Request>,
}

impl<M: TravelTimeModel> Sim<M> {
    /// Group requests by key, preserving arrival order within each group.
    pub fn groups(&self) -> BTreeMap<GroupKey, Vec<&Request>> {
        let mut groups: BTreeMap<GroupKey, Vec<&Request>> = BTreeMap::new();
        for r in &self.requests {
            groups.entry(GroupKey::of(r)).or_default().push(r);
        }
        groups
    }

    /// Plan every vehicle, report to `observer`, and aggregate KPIs.
    pub fn run<O: SimObserver>(&self, observer: &mut O) -> SimResult<RunOutput> {
        let t0 = Instant::now();
        let groups = self.groups();
        observer.on_run_start(groups.len(), self.requests.len());
        info!(
            groups = groups.len(),
            requests = self.requests.len(),
            strategy = %self.sequencer.strategy,
            model = self.model.name(),
            "run started"
        );

        let mut jobs = Vec::new();
        for (key, reqs) in &groups {
            let center = reqs[0].center_location;
            let loads = partition(
                reqs,
                center,
                self.config.routing.partition,
                self.config.fleet.capacity_for(key.class),
                self.config.fleet.max_vehicles_per_center_slot,
            )?;
            debug!(group = %key, requests = reqs.len(), vehicles = loads.len(), "group partitioned");
            jobs.extend(
                loads
                    .into_iter()
                    .enumerate()
                    .map(|(index, load)| Job { key: *key, index, center, load }),
            );
        }

        let plans = self.plan_jobs(&jobs)?;

        let mut events = Vec::new();
        let mut routes = Vec::with_capacity(plans.len());
        for plan in &plans {
            let ev = plan.events();
            let route = plan.route();
            observer.on_vehicle(&route, &ev);
            events.extend(ev);
            routes.push(route);
        }

        let summary = compute_kpis(events.iter().map(|e| &e.times), self.config.kpi.on_time_threshold_min)?;
        let kpis = RunKpis {
            summary,
            vehicles_used:         routes.len(),
            total_travel_time_min: routes.iter().map(VehicleRoute::actual_duration).sum(),
            runtime_total_sec:     t0.elapsed().as_secs_f64(),
        };
        observer.on_run_end(&kpis);
        self.model.report_stats();

        info!(
            vehicles = kpis.vehicles_used,
            events = events.len(),
            pickup_on_time = kpis.summary.pickup_on_time_rate,
            center_on_time = kpis.summary.center_on_time_rate,
            runtime_sec = kpis.runtime_total_sec,
            "run finished"
        );

        Ok(RunOutput { plans, events, routes, kpis })
    }

    /// Plan every job.  Output order always matches `jobs`.
    fn plan_jobs(&self, jobs: &[Job<'_>]) -> SimResult<Vec<VehicleGroupPlan>> {
        let model = &self.model;
        let sequencer = &self.sequencer;
        let seed = self.config.seed;
        let plan = |job: &Job<'_>| {
            VehicleGroupPlan::build(job.key, job.index, job.center, &job.load, model, sequencer, seed)
        };

        #[cfg(not(feature = "parallel"))]
        let planned: Vec<Option<VehicleGroupPlan>> = jobs.iter().map(plan).collect::<SimResult<_>>()?;

        // Indexed parallel iterators collect in input order.
        #[cfg(feature = "parallel")]
        let planned: Vec<Option<VehicleGroupPlan>> = {
            use rayon::prelude::*;
            jobs.par_iter().map(plan).collect::<SimResult<_>>()?
        };

        Ok(planned.into_iter().flatten().collect())
    }
}
