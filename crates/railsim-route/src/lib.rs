//! Routes and Tours: ordered component sequences with scheduled holds.
//!
//! A [`Route`] is reusable infrastructure: an ordered sequence of component
//! references, nothing more. A [`Tour`] assigns a specific train's schedule
//! (arrival/departure holds) to each use of a route, and stitches several
//! routes together end-to-end.
//!
//! Rather than a linked list of segments walked lazily, this crate uses a
//! flat, index-addressed `Vec<ComponentId>` per route (no `prev`/`next`
//! pointers to manage) and [`Tour::resolve`] eagerly produces the full
//! flattened traversal a train will walk by index: components and routes are
//! stored by id, and a resolved tour holds plain indices.

use railsim_core::{ComponentId, RailError, RailResult, Tick};

#[cfg(test)]
mod tests;

/// A reusable, ordered sequence of components.
#[derive(Debug, Clone)]
pub struct Route {
    segments: Vec<ComponentId>,
}

impl Route {
    /// Build a route from an ordered, non-empty list of components.
    pub fn new(segments: Vec<ComponentId>) -> RailResult<Self> {
        if segments.is_empty() {
            return Err(RailError::InputMismatch(
                "a route must contain at least one component".into(),
            ));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[ComponentId] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        false // enforced non-empty at construction
    }
}

/// An optional schedule hold for one segment: `arrival` is the earliest time
/// the agent may have entered; `departure` is the earliest time it may
/// leave. Either, both, or neither may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleArgs {
    pub arrival: Option<Tick>,
    pub departure: Option<Tick>,
}

/// One use of a [`Route`] within a [`Tour`], carrying the per-segment
/// schedule args for that use. `args.len()` must equal `route`'s segment
/// count once the referenced route is known (checked by `Tour::resolve`,
/// since routes are looked up by id rather than embedded).
#[derive(Debug, Clone)]
pub struct TourRouteRef {
    pub route: railsim_core::RouteId,
    pub args: Vec<Option<ScheduleArgs>>,
}

/// An ordered list of routes a train will traverse in sequence.
///
/// Consecutive routes must share a bridging component: the last segment of
/// route *i* and the first segment of route *i+1* must be the same
/// component. `Tour::resolve` enforces this and performs the bridging merge.
#[derive(Debug, Clone)]
pub struct Tour {
    pub routes: Vec<TourRouteRef>,
    pub creation_time: Tick,
    pub deletion_time: Tick,
}

/// One step of a fully resolved tour traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSegment {
    pub component: ComponentId,
    pub arrival: Option<Tick>,
    pub departure: Option<Tick>,
}

impl Tour {
    /// Flatten this tour into the concrete sequence of segments a train will
    /// walk, merging bridging components between consecutive routes: the
    /// bridging component is visited once, its departure taken from the
    /// *next* route's first segment, and traversal continues from that
    /// route's *second* segment.
    pub fn resolve(&self, lookup: impl Fn(railsim_core::RouteId) -> RailResult<Route>) -> RailResult<Vec<ResolvedSegment>> {
        if self.routes.is_empty() {
            return Err(RailError::InputMismatch(
                "a tour must contain at least one route".into(),
            ));
        }

        let mut resolved = Vec::new();
        let routes: Vec<Route> = self
            .routes
            .iter()
            .map(|r| lookup(r.route))
            .collect::<RailResult<_>>()?;

        for (i, route_ref) in self.routes.iter().enumerate() {
            let route = &routes[i];
            if route_ref.args.len() != route.len() {
                return Err(RailError::InputMismatch(format!(
                    "tour route args length {} does not match route length {}",
                    route_ref.args.len(),
                    route.len()
                )));
            }

            let is_last_route = i + 1 == self.routes.len();
            let last_idx = route.len() - 1;

            // Segment 0 of every route but the first was already emitted as
            // the bridging component while resolving the previous route.
            let from = if i == 0 { 0 } else { 1 };
            // All segments except the bridging last one (the last route
            // emits its final segment too, since there is nothing to bridge
            // into).
            let upto = if is_last_route { route.len() } else { last_idx };
            for k in from..upto {
                let args = route_ref.args[k].unwrap_or_default();
                resolved.push(ResolvedSegment {
                    component: route.segments()[k],
                    arrival: args.arrival,
                    departure: args.departure,
                });
            }

            if !is_last_route {
                let next_route = &routes[i + 1];
                let next_ref = &self.routes[i + 1];
                if next_route.segments()[0] != route.segments()[last_idx] {
                    return Err(RailError::InputMismatch(format!(
                        "route {} does not bridge into route {}: last/first components differ",
                        i, i + 1
                    )));
                }
                let bridging_args = route_ref.args[last_idx].unwrap_or_default();
                let next_first_args = next_ref.args.first().copied().flatten().unwrap_or_default();
                resolved.push(ResolvedSegment {
                    component: route.segments()[last_idx],
                    arrival: bridging_args.arrival,
                    departure: next_first_args.departure,
                });
            }
        }

        Ok(resolved)
    }
}
