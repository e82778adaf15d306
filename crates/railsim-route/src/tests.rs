use super::*;
use railsim_core::RouteId;
use std::collections::HashMap;

fn cid(n: u32) -> ComponentId {
    ComponentId::try_from(n as usize).unwrap()
}

fn route_table(routes: Vec<(RouteId, Vec<ComponentId>)>) -> HashMap<RouteId, Route> {
    routes
        .into_iter()
        .map(|(id, segs)| (id, Route::new(segs).unwrap()))
        .collect()
}

fn lookup(table: &HashMap<RouteId, Route>) -> impl Fn(RouteId) -> RailResult<Route> + '_ {
    move |id| {
        table
            .get(&id)
            .cloned()
            .ok_or_else(|| RailError::Invariant(format!("unknown route {id}")))
    }
}

#[test]
fn route_rejects_empty_segments() {
    let err = Route::new(vec![]).unwrap_err();
    assert!(matches!(err, RailError::InputMismatch(_)));
}

#[test]
fn single_route_tour_resolves_all_segments_in_order() {
    let r0 = RouteId::try_from(0usize).unwrap();
    let table = route_table(vec![(r0, vec![cid(1), cid(2), cid(3)])]);

    let tour = Tour {
        routes: vec![TourRouteRef {
            route: r0,
            args: vec![
                Some(ScheduleArgs { arrival: Some(Tick(0)), departure: None }),
                None,
                Some(ScheduleArgs { arrival: None, departure: Some(Tick(50)) }),
            ],
        }],
        creation_time: Tick(0),
        deletion_time: Tick(1000),
    };

    let resolved = tour.resolve(lookup(&table)).unwrap();
    assert_eq!(
        resolved,
        vec![
            ResolvedSegment { component: cid(1), arrival: Some(Tick(0)), departure: None },
            ResolvedSegment { component: cid(2), arrival: None, departure: None },
            ResolvedSegment { component: cid(3), arrival: None, departure: Some(Tick(50)) },
        ]
    );
}

#[test]
fn bridging_component_is_emitted_once_with_departure_from_next_route() {
    // Route 0: A -> B -> C.  Route 1: C -> D.
    // C is the bridging component: visited once, departure taken from
    // route 1's first segment arg, traversal resumes at route 1's second
    // segment (D) rather than repeating C.
    let r0 = RouteId::try_from(0usize).unwrap();
    let r1 = RouteId::try_from(1usize).unwrap();
    let table = route_table(vec![
        (r0, vec![cid(1), cid(2), cid(3)]),
        (r1, vec![cid(3), cid(4)]),
    ]);

    let tour = Tour {
        routes: vec![
            TourRouteRef {
                route: r0,
                args: vec![None, None, Some(ScheduleArgs { arrival: Some(Tick(5)), departure: None })],
            },
            TourRouteRef {
                route: r1,
                args: vec![Some(ScheduleArgs { arrival: None, departure: Some(Tick(99)) }), None],
            },
        ],
        creation_time: Tick(0),
        deletion_time: Tick(1000),
    };

    let resolved = tour.resolve(lookup(&table)).unwrap();
    assert_eq!(
        resolved,
        vec![
            ResolvedSegment { component: cid(1), arrival: None, departure: None },
            ResolvedSegment { component: cid(2), arrival: None, departure: None },
            ResolvedSegment { component: cid(3), arrival: Some(Tick(5)), departure: Some(Tick(99)) },
            ResolvedSegment { component: cid(4), arrival: None, departure: None },
        ]
    );
}

#[test]
fn three_routes_bridge_in_sequence_without_duplicating_midpoints() {
    let r0 = RouteId::try_from(0usize).unwrap();
    let r1 = RouteId::try_from(1usize).unwrap();
    let r2 = RouteId::try_from(2usize).unwrap();
    let table = route_table(vec![
        (r0, vec![cid(1), cid(2)]),
        (r1, vec![cid(2), cid(3)]),
        (r2, vec![cid(3), cid(4), cid(5)]),
    ]);

    let tour = Tour {
        routes: vec![
            TourRouteRef { route: r0, args: vec![None, None] },
            TourRouteRef { route: r1, args: vec![None, None] },
            TourRouteRef { route: r2, args: vec![None, None, None] },
        ],
        creation_time: Tick(0),
        deletion_time: Tick(1000),
    };

    let resolved = tour.resolve(lookup(&table)).unwrap();
    let components: Vec<ComponentId> = resolved.iter().map(|s| s.component).collect();
    assert_eq!(components, vec![cid(1), cid(2), cid(3), cid(4), cid(5)]);
}

#[test]
fn single_segment_bridging_route_contributes_no_extra_entry() {
    // A route consisting solely of the bridging component (route.len() == 1)
    // must not emit a duplicate before the bridging block handles it.
    let r0 = RouteId::try_from(0usize).unwrap();
    let r1 = RouteId::try_from(1usize).unwrap();
    let r2 = RouteId::try_from(2usize).unwrap();
    let table = route_table(vec![
        (r0, vec![cid(1), cid(2)]),
        (r1, vec![cid(2)]),
        (r2, vec![cid(2), cid(3)]),
    ]);

    let tour = Tour {
        routes: vec![
            TourRouteRef { route: r0, args: vec![None, None] },
            TourRouteRef { route: r1, args: vec![None] },
            TourRouteRef { route: r2, args: vec![None, None] },
        ],
        creation_time: Tick(0),
        deletion_time: Tick(1000),
    };

    let resolved = tour.resolve(lookup(&table)).unwrap();
    let components: Vec<ComponentId> = resolved.iter().map(|s| s.component).collect();
    assert_eq!(components, vec![cid(1), cid(2), cid(3)]);
}

#[test]
fn mismatched_args_length_is_rejected() {
    let r0 = RouteId::try_from(0usize).unwrap();
    let table = route_table(vec![(r0, vec![cid(1), cid(2)])]);
    let tour = Tour {
        routes: vec![TourRouteRef { route: r0, args: vec![None] }],
        creation_time: Tick(0),
        deletion_time: Tick(1000),
    };
    let err = tour.resolve(lookup(&table)).unwrap_err();
    assert!(matches!(err, RailError::InputMismatch(_)));
}

#[test]
fn non_bridging_consecutive_routes_are_rejected() {
    let r0 = RouteId::try_from(0usize).unwrap();
    let r1 = RouteId::try_from(1usize).unwrap();
    let table = route_table(vec![
        (r0, vec![cid(1), cid(2)]),
        (r1, vec![cid(9), cid(3)]), // does not start at cid(2)
    ]);
    let tour = Tour {
        routes: vec![
            TourRouteRef { route: r0, args: vec![None, None] },
            TourRouteRef { route: r1, args: vec![None, None] },
        ],
        creation_time: Tick(0),
        deletion_time: Tick(1000),
    };
    let err = tour.resolve(lookup(&table)).unwrap_err();
    assert!(matches!(err, RailError::InputMismatch(_)));
}

#[test]
fn empty_tour_is_rejected() {
    let table: HashMap<RouteId, Route> = HashMap::new();
    let tour = Tour { routes: vec![], creation_time: Tick(0), deletion_time: Tick(0) };
    let err = tour.resolve(lookup(&table)).unwrap_err();
    assert!(matches!(err, RailError::InputMismatch(_)));
}
