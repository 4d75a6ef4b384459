use bimap::BiHashMap;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Exp};

use crate::domain::event_queue::EventQueue;
use crate::domain::ledger::ResourceLedger;
use crate::domain::mapping::{Lease, PathMap};
use crate::domain::request::{VirtualNodeId, VirtualRequest};
use crate::domain::substrate::{NodeId, SubstrateNetwork};
use crate::embedder::{EmbedResult, Embedder};
use crate::error::{Error, Result};

/// Source of arriving virtual network requests.
///
/// Implementations must hand out requests whose virtual topology is
/// connected; the generator resamples internally until that holds.
pub trait RequestProvider {
    fn next_request(&mut self, arrival_time: f64) -> VirtualRequest;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimEvent {
    Arrival,
}

/// Outcome of one tick, handed to the experiment driver.
///
/// `success` is `None` on an idle tick. When several arrivals fall into
/// one tick, `reward` sums their per-arrival rewards and the mapping
/// fields describe the last one processed; `arrivals` disambiguates.
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    pub step: u64,
    pub reward: f64,
    pub success: Option<bool>,
    pub node_mapping: Option<BiHashMap<VirtualNodeId, NodeId>>,
    pub link_paths: Option<PathMap>,
    pub expires_at: Option<f64>,
    pub arrivals: usize,
}

/// Discrete-event admission loop.
///
/// Each tick advances virtual time by one, expires due leases (always
/// before any admission, so freed capacity is visible to arrivals in
/// the same tick), processes every due arrival event and schedules the
/// follow-up arrival at `t + Exp(arrival_rate)`.
///
/// The clock has no terminal state; the driver decides how many ticks
/// to run.
pub struct SimulationClock {
    ledger: ResourceLedger,
    embedder: Box<dyn Embedder>,
    provider: Box<dyn RequestProvider>,
    events: EventQueue<SimEvent>,
    active_leases: Vec<Lease>,
    interarrival: Exp<f64>,
    rng: StdRng,
    current_time: f64,
    step: u64,
    total_arrivals: u64,
    accepted: u64,
}

impl SimulationClock {
    pub fn new(
        ledger: ResourceLedger,
        embedder: Box<dyn Embedder>,
        provider: Box<dyn RequestProvider>,
        arrival_rate: f64,
        rng: StdRng,
    ) -> Result<Self> {
        let interarrival = Exp::new(arrival_rate)
            .map_err(|e| Error::ConfigurationError(format!("invalid arrival_rate {arrival_rate}: {e}")))?;

        Ok(Self {
            ledger,
            embedder,
            provider,
            events: EventQueue::new(),
            active_leases: Vec::new(),
            interarrival,
            rng,
            current_time: 0.0,
            step: 0,
            total_arrivals: 0,
            accepted: 0,
        })
    }

    /// Schedules the first arrival. Call once before ticking; tests may
    /// instead inject deterministic arrivals via `schedule_arrival`.
    pub fn start(&mut self) {
        let first = self.current_time + self.sample_interarrival();
        self.schedule_arrival(first);
    }

    pub fn schedule_arrival(&mut self, time: f64) {
        self.events.push(time, SimEvent::Arrival);
    }

    fn sample_interarrival(&mut self) -> f64 {
        self.interarrival.sample(&mut self.rng)
    }

    /// Runs one tick: expirations, then every due arrival, then the
    /// scheduling of each arrival's successor.
    pub fn tick(&mut self) -> TickResult {
        self.step += 1;
        self.current_time += 1.0;

        let expired = self.expire_leases();
        if expired > 0 {
            log::debug!("[step {}] Released {} expired lease(s), {} still active.", self.step, expired, self.active_leases.len());
        }

        let mut result = TickResult { step: self.step, ..TickResult::default() };

        while let Some((event_time, SimEvent::Arrival)) = self.events.pop_due(self.current_time) {
            self.process_arrival(event_time, &mut result);

            let next_arrival = self.current_time + self.sample_interarrival();
            self.schedule_arrival(next_arrival);
        }

        result
    }

    fn process_arrival(&mut self, arrival_time: f64, result: &mut TickResult) {
        let request = self.provider.next_request(arrival_time);
        self.total_arrivals += 1;
        result.arrivals += 1;

        match self.embedder.embed(self.ledger.substrate(), &request) {
            EmbedResult::Embedded(mapping) => {
                self.ledger.apply(&request, &mapping);
                self.accepted += 1;

                let expires_at = self.current_time + request.duration as f64;

                log::info!(
                    "[step {}] Accepted VNR {} ({} nodes, {} edges), lease expires at t={}.",
                    self.step,
                    request.id,
                    request.num_nodes(),
                    request.edges.len(),
                    expires_at
                );

                result.reward += 1.0;
                result.success = Some(true);
                result.node_mapping = Some(mapping.node_map.clone());
                result.link_paths = Some(mapping.path_map.clone());
                result.expires_at = Some(expires_at);

                self.active_leases.push(Lease { request, mapping, expires_at });
            }
            EmbedResult::Infeasible => {
                // Rejections are final: no retry, no backlog queue.
                log::info!("[step {}] Rejected VNR {}: no feasible embedding.", self.step, request.id);

                result.reward -= 1.0;
                result.success = Some(false);
                result.node_mapping = None;
                result.link_paths = None;
                result.expires_at = None;
            }
        }
    }

    fn expire_leases(&mut self) -> usize {
        let now = self.current_time;
        let (expired, active): (Vec<Lease>, Vec<Lease>) = self.active_leases.drain(..).partition(|lease| lease.expires_at <= now);
        self.active_leases = active;

        for lease in &expired {
            self.ledger.release_embedding(&lease.request, &lease.mapping);
        }

        expired.len()
    }

    pub fn substrate(&self) -> &SubstrateNetwork {
        self.ledger.substrate()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn active_leases(&self) -> &[Lease] {
        &self.active_leases
    }

    pub fn total_arrivals(&self) -> u64 {
        self.total_arrivals
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }
}
