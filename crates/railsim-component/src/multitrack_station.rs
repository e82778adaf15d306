//! `MultiTrackStation`: a station with separate pools of stopping and
//! bypass tracks. A stopping dwell is drawn from a Burr Type XII
//! distribution; a bypassing train pays a flat `bypass_time`.
//!
//! The Burr sampler is a closed-form inverse-CDF transform, so it needs no
//! extra dependency beyond the `SimRng` uniform-variate helper already used
//! by every jitter.

use railsim_core::{AgentId, CollectionId, ComponentId, RailError, RailResult, SimRng};
use railsim_resource::Resource;

use crate::collection::Collection;
use crate::component::Component;
use crate::context::{DwellStep, EntryContext};
use railsim_jitter::{Jitter, NoJitter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackKind {
    Stopping,
    Bypass,
}

/// Burr Type XII inverse CDF: `x = scale * ((1 - u)^(-1/d) - 1)^(1/c) + loc`.
fn burr_sample(c: f64, d: f64, loc: f64, scale: f64, u: f64) -> f64 {
    scale * ((1.0 - u).powf(-1.0 / d) - 1.0).powf(1.0 / c) + loc
}

#[derive(Debug)]
pub struct MultiTrackStation {
    uid: ComponentId,
    bypass_time: u64,
    burr_c: f64,
    burr_d: f64,
    burr_loc: f64,
    burr_scale: f64,
    jitter: Box<dyn Jitter>,
    collection: Option<CollectionId>,
    resource: Resource,
    stopping_tracks: Vec<Option<AgentId>>,
    bypass_tracks: Vec<Option<AgentId>>,
    agent_track: std::collections::HashMap<AgentId, TrackKind>,
}

#[allow(clippy::too_many_arguments)]
impl MultiTrackStation {
    pub fn new(
        uid: ComponentId,
        num_stopping_tracks: u32,
        num_bypass_tracks: u32,
        bypass_time: i64,
        burr_c: f64,
        burr_d: f64,
        burr_loc: f64,
        burr_scale: f64,
        jitter: Box<dyn Jitter>,
        collection: Option<CollectionId>,
    ) -> RailResult<Self> {
        if num_stopping_tracks == 0 && num_bypass_tracks == 0 {
            return Err(RailError::not_positive("num_stopping_tracks + num_bypass_tracks", 0.0));
        }
        if bypass_time < 0 {
            return Err(RailError::not_positive("bypass_time", bypass_time as f64));
        }
        if burr_c <= 0.0 {
            return Err(RailError::not_positive("burr_c", burr_c));
        }
        if burr_d <= 0.0 {
            return Err(RailError::not_positive("burr_d", burr_d));
        }
        if burr_scale <= 0.0 {
            return Err(RailError::not_positive("burr_scale", burr_scale));
        }
        Ok(Self {
            uid,
            bypass_time: bypass_time as u64,
            burr_c,
            burr_d,
            burr_loc,
            burr_scale,
            jitter,
            collection,
            resource: Resource::new(num_stopping_tracks + num_bypass_tracks),
            stopping_tracks: vec![None; num_stopping_tracks as usize],
            bypass_tracks: vec![None; num_bypass_tracks as usize],
            agent_track: std::collections::HashMap::new(),
        })
    }

    fn free_slot(tracks: &[Option<AgentId>]) -> Option<usize> {
        tracks.iter().position(|t| t.is_none())
    }
}

impl Component for MultiTrackStation {
    fn uid(&self) -> ComponentId {
        self.uid
    }

    fn type_name(&self) -> &'static str {
        "MultiTrackStation"
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    fn collection(&self) -> Option<CollectionId> {
        self.collection
    }

    fn can_accept_agent(
        &self,
        agent: AgentId,
        ctx: &EntryContext,
        collections: &dyn Fn(CollectionId) -> Option<&dyn Collection>,
    ) -> bool {
        let has_track = if ctx.stopping {
            Self::free_slot(&self.stopping_tracks).is_some()
        } else {
            Self::free_slot(&self.bypass_tracks).is_some() || Self::free_slot(&self.stopping_tracks).is_some()
        };
        if !has_track {
            return false;
        }
        match self.collection {
            None => true,
            Some(cid) => collections(cid).is_some_and(|c| c.can_accept_agent(agent, ctx.same_zone)),
        }
    }

    fn accept_agent(
        &mut self,
        agent: AgentId,
        ctx: &EntryContext,
        collections: &mut dyn FnMut(CollectionId) -> Option<&mut dyn Collection>,
    ) {
        let kind = if ctx.stopping {
            let i = Self::free_slot(&self.stopping_tracks).expect("no free stopping track at accept time");
            self.stopping_tracks[i] = Some(agent);
            TrackKind::Stopping
        } else if let Some(i) = Self::free_slot(&self.bypass_tracks) {
            self.bypass_tracks[i] = Some(agent);
            TrackKind::Bypass
        } else {
            let i = Self::free_slot(&self.stopping_tracks).expect("no free track at accept time");
            self.stopping_tracks[i] = Some(agent);
            TrackKind::Stopping
        };
        self.agent_track.insert(agent, kind);
        if let Some(cid) = self.collection {
            if let Some(c) = collections(cid) {
                c.accept_agent(agent, ctx.same_zone);
            }
        }
    }

    fn release_agent(
        &mut self,
        agent: AgentId,
        same_zone: bool,
        collections: &mut dyn FnMut(CollectionId) -> Option<&mut dyn Collection>,
    ) -> DwellStep {
        let kind = self.agent_track.remove(&agent).expect("release_agent called for an unregistered station agent");
        let tracks = match kind {
            TrackKind::Stopping => &mut self.stopping_tracks,
            TrackKind::Bypass => &mut self.bypass_tracks,
        };
        if let Some(slot) = tracks.iter_mut().find(|t| **t == Some(agent)) {
            *slot = None;
        }
        let mut step = DwellStep::default().with_requeue(true);
        if let Some(cid) = self.collection {
            if let Some(c) = collections(cid) {
                step.requeue_agent = c.release_agent(agent, same_zone).requeue_agent;
            }
        }
        step
    }

    fn begin_dwell(&mut self, agent: AgentId, rng: &mut SimRng) -> DwellStep {
        let jitter = self.jitter.sample(rng);
        let kind = *self.agent_track.get(&agent).expect("begin_dwell called before accept_agent");
        let delay = match kind {
            TrackKind::Bypass => (self.bypass_time as f64 + jitter).round().max(0.0) as u64,
            TrackKind::Stopping => {
                let u = rng.uniform01();
                let sample = burr_sample(self.burr_c, self.burr_d, self.burr_loc, self.burr_scale, u);
                (sample + jitter).round().max(0.0) as u64
            }
        };
        DwellStep::wait(delay)
    }
}
