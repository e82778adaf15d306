//! Integration tests driving a full [`crate::Model`] end to end, built from
//! config records via [`crate::ModelBuilder`], one per scenario recorded for
//! the quantified properties above.

use std::collections::HashMap;

use railsim_core::Tick;

use crate::config::{ComponentKind, ComponentRecord, RouteRecord, ScheduleArgsRecord, TourRecord, TourRouteRecord, TrainRecord};
use crate::observer::EventObserver;
use crate::ModelBuilder;

/// Records every enter/exit, keyed by train name, so a test can ask "when
/// did this train leave its last component".
#[derive(Default)]
struct Recorder {
    exits: HashMap<String, Vec<Tick>>,
    enters: HashMap<String, Vec<(Tick, String)>>,
}

impl EventObserver for Recorder {
    fn on_enter(&mut self, now: Tick, train_uid: &str, component_uid: &str, _component_type: &str) {
        self.enters.entry(train_uid.to_string()).or_default().push((now, component_uid.to_string()));
    }

    fn on_exit(&mut self, now: Tick, train_uid: &str, _component_uid: &str, _component_type: &str) {
        self.exits.entry(train_uid.to_string()).or_default().push(now);
    }
}

impl Recorder {
    fn last_exit(&self, train: &str) -> Tick {
        *self.exits.get(train).and_then(|v| v.last()).unwrap_or_else(|| panic!("{train} never exited anything"))
    }

    fn visit_count(&self, train: &str, component_uid: &str) -> usize {
        self.enters.get(train).map(|v| v.iter().filter(|(_, c)| c == component_uid).count()).unwrap_or(0)
    }
}

fn track(u: &str, v: &str, traversal_time: i64, capacity: u32) -> ComponentRecord {
    ComponentRecord { u: u.into(), v: v.into(), key: 0, kind: ComponentKind::TimedTrack { traversal_time, capacity }, jitter: None, collection: None }
}

fn no_args(n: usize) -> Vec<Option<ScheduleArgsRecord>> {
    vec![None; n]
}

/// 3 `TimedTrack`s in series (180/80/80 ticks, capacities 1/2/1), one train,
/// no holds: exits the third at t = 180 + 80 + 80 = 340.
#[test]
fn linear_traversal_no_jitter() {
    let components = vec![track("A", "B", 180, 1), track("B", "C", 80, 2), track("C", "D", 80, 1)];
    let route = RouteRecord {
        name: "main".into(),
        components: vec![
            crate::config::ComponentRef { u: "A".into(), v: "B".into(), key: 0 },
            crate::config::ComponentRef { u: "B".into(), v: "C".into(), key: 0 },
            crate::config::ComponentRef { u: "C".into(), v: "D".into(), key: 0 },
        ],
    };
    let tour = TourRecord {
        name: "tour1".into(),
        creation_time: 0,
        deletion_time: 1_000,
        routes: vec![TourRouteRecord { name: "main".into(), args: no_args(3) }],
    };
    let train = TrainRecord { name: "T1".into(), max_speed: 1.0, tour: "tour1".into() };

    let mut model = ModelBuilder::new(1)
        .components(components)
        .routes(vec![route])
        .tours(vec![tour])
        .trains(vec![train])
        .build()
        .expect("model builds");

    model.start();
    let mut recorder = Recorder::default();
    model.run(None, &mut recorder).expect("run completes");

    assert_eq!(recorder.last_exit("T1"), Tick(340));
}

/// Two `TimedTrack`s, capacity 1 each, traversal 100 each; two trains
/// launched together on the same route: T1 exits at 200, T2 queues behind
/// it on every hop and exits at 300.
#[test]
fn capacity_one_queueing() {
    let components = vec![track("A", "B", 100, 1), track("B", "C", 100, 1)];
    let route = RouteRecord {
        name: "main".into(),
        components: vec![
            crate::config::ComponentRef { u: "A".into(), v: "B".into(), key: 0 },
            crate::config::ComponentRef { u: "B".into(), v: "C".into(), key: 0 },
        ],
    };
    let tour = TourRecord {
        name: "tour1".into(),
        creation_time: 0,
        deletion_time: 1_000,
        routes: vec![TourRouteRecord { name: "main".into(), args: no_args(2) }],
    };
    let trains = vec![
        TrainRecord { name: "T1".into(), max_speed: 1.0, tour: "tour1".into() },
        TrainRecord { name: "T2".into(), max_speed: 1.0, tour: "tour1".into() },
    ];

    let mut model = ModelBuilder::new(1).components(components).routes(vec![route]).tours(vec![tour]).trains(trains).build().expect("model builds");

    model.start();
    let mut recorder = Recorder::default();
    model.run(None, &mut recorder).expect("run completes");

    assert_eq!(recorder.last_exit("T1"), Tick(200));
    assert_eq!(recorder.last_exit("T2"), Tick(300));
}

/// A single `TimedTrack` (traversal 50) whose only route segment carries a
/// `departure = 90`: the train finishes its dwell at t = 50 but holds for
/// departure, exiting at t = 90.
#[test]
fn departure_hold() {
    let components = vec![track("A", "B", 50, 1)];
    let route = RouteRecord { name: "main".into(), components: vec![crate::config::ComponentRef { u: "A".into(), v: "B".into(), key: 0 }] };
    let tour = TourRecord {
        name: "tour1".into(),
        creation_time: 0,
        deletion_time: 1_000,
        routes: vec![TourRouteRecord { name: "main".into(), args: vec![Some(ScheduleArgsRecord { arrival: None, departure: Some(90) })] }],
    };
    let train = TrainRecord { name: "T1".into(), max_speed: 1.0, tour: "tour1".into() };

    let mut model = ModelBuilder::new(1).components(components).routes(vec![route]).tours(vec![tour]).trains(vec![train]).build().expect("model builds");

    model.start();
    let mut recorder = Recorder::default();
    model.run(None, &mut recorder).expect("run completes");

    assert_eq!(recorder.last_exit("T1"), Tick(90));
}

/// `MultiBlockTrack`: 2 tracks, 3 blocks, traversal_time 30 (block traversal
/// 10 each). Trains A (t=0), B (t=5), C (t=12), all u->v. A and B share the
/// first track back-to-back; C takes the second track. A exits at 30, B at
/// 40, C at 42 (delayed one block-traversal behind its track being claimed
/// at t=12, then three 10-tick hops: 12 -> 22 -> 32 -> 42).
#[test]
fn multi_block_track_cellular_automaton() {
    let component = ComponentRecord {
        u: "X".into(),
        v: "Y".into(),
        key: 0,
        kind: ComponentKind::MultiBlockTrack { num_tracks: 2, num_blocks: 3, traversal_time: 30 },
        jitter: None,
        collection: None,
    };
    let route = RouteRecord { name: "main".into(), components: vec![crate::config::ComponentRef { u: "X".into(), v: "Y".into(), key: 0 }] };
    let tours = vec![
        TourRecord {
            name: "tourA".into(),
            creation_time: 0,
            deletion_time: 1_000,
            routes: vec![TourRouteRecord { name: "main".into(), args: vec![Some(ScheduleArgsRecord { arrival: Some(0), departure: None })] }],
        },
        TourRecord {
            name: "tourB".into(),
            creation_time: 0,
            deletion_time: 1_000,
            routes: vec![TourRouteRecord { name: "main".into(), args: vec![Some(ScheduleArgsRecord { arrival: Some(5), departure: None })] }],
        },
        TourRecord {
            name: "tourC".into(),
            creation_time: 0,
            deletion_time: 1_000,
            routes: vec![TourRouteRecord { name: "main".into(), args: vec![Some(ScheduleArgsRecord { arrival: Some(12), departure: None })] }],
        },
    ];
    let trains = vec![
        TrainRecord { name: "A".into(), max_speed: 1.0, tour: "tourA".into() },
        TrainRecord { name: "B".into(), max_speed: 1.0, tour: "tourB".into() },
        TrainRecord { name: "C".into(), max_speed: 1.0, tour: "tourC".into() },
    ];

    let mut model = ModelBuilder::new(1).components(vec![component]).routes(vec![route]).tours(tours).trains(trains).build().expect("model builds");

    model.start();
    let mut recorder = Recorder::default();
    model.run(None, &mut recorder).expect("run completes");

    assert_eq!(recorder.last_exit("A"), Tick(30));
    assert_eq!(recorder.last_exit("B"), Tick(40));
    assert_eq!(recorder.last_exit("C"), Tick(42));
}

/// Two `TimedTrack`s (traversal 100 each) sharing a `BlockExclusiveZone`.
/// Two trains take both; T2 cannot enter the first component until T1
/// releases the zone by finishing the second, at t = 200.
#[test]
fn block_exclusive_zone_serializes_two_trains() {
    let collection = Some(crate::config::CollectionRecord { r#type: "BlockExclusiveZone".into(), key: "zone1".into() });
    let components = vec![
        ComponentRecord { u: "A".into(), v: "B".into(), key: 0, kind: ComponentKind::TimedTrack { traversal_time: 100, capacity: 1 }, jitter: None, collection: collection.clone() },
        ComponentRecord { u: "B".into(), v: "C".into(), key: 0, kind: ComponentKind::TimedTrack { traversal_time: 100, capacity: 1 }, jitter: None, collection },
    ];
    let route = RouteRecord {
        name: "main".into(),
        components: vec![
            crate::config::ComponentRef { u: "A".into(), v: "B".into(), key: 0 },
            crate::config::ComponentRef { u: "B".into(), v: "C".into(), key: 0 },
        ],
    };
    let tour = TourRecord {
        name: "tour1".into(),
        creation_time: 0,
        deletion_time: 1_000,
        routes: vec![TourRouteRecord { name: "main".into(), args: no_args(2) }],
    };
    let trains = vec![
        TrainRecord { name: "T1".into(), max_speed: 1.0, tour: "tour1".into() },
        TrainRecord { name: "T2".into(), max_speed: 1.0, tour: "tour1".into() },
    ];

    let mut model = ModelBuilder::new(1).components(components).routes(vec![route]).tours(vec![tour]).trains(trains).build().expect("model builds");

    model.start();
    let mut recorder = Recorder::default();
    model.run(None, &mut recorder).expect("run completes");

    let t2_first_enter = recorder
        .enters
        .get("T2")
        .and_then(|v| v.first())
        .unwrap_or_else(|| panic!("T2 never entered anything"));
    assert_eq!(t2_first_enter.0, Tick(200));
    assert_eq!(recorder.last_exit("T1"), Tick(200));
    assert_eq!(recorder.last_exit("T2"), Tick(400));
}

/// A tour of two routes that bridge at `P-Q`: route1 ends there, route2
/// starts there. The agent must visit `P-Q` exactly once, and route2's
/// `departure = 500` on its (shared) first segment governs the hold, not
/// route1's (unset) arg for the same segment: dwell on `P-Q` finishes at
/// t=50 but holds until t=500, then a further 50-tick dwell on `Q-R` puts
/// the exit at t=550.
#[test]
fn tour_route_bridging_visits_shared_station_once() {
    let components = vec![track("P", "Q", 50, 1), track("Q", "R", 50, 1)];
    let route1 = RouteRecord { name: "leg1".into(), components: vec![crate::config::ComponentRef { u: "P".into(), v: "Q".into(), key: 0 }] };
    let route2 = RouteRecord {
        name: "leg2".into(),
        components: vec![
            crate::config::ComponentRef { u: "P".into(), v: "Q".into(), key: 0 },
            crate::config::ComponentRef { u: "Q".into(), v: "R".into(), key: 0 },
        ],
    };
    let tour = TourRecord {
        name: "tour1".into(),
        creation_time: 0,
        deletion_time: 1_000,
        routes: vec![
            TourRouteRecord { name: "leg1".into(), args: no_args(1) },
            TourRouteRecord {
                name: "leg2".into(),
                args: vec![Some(ScheduleArgsRecord { arrival: None, departure: Some(500) }), None],
            },
        ],
    };
    let train = TrainRecord { name: "T1".into(), max_speed: 1.0, tour: "tour1".into() };

    let mut model = ModelBuilder::new(1).components(components).routes(vec![route1, route2]).tours(vec![tour]).trains(vec![train]).build().expect("model builds");

    model.start();
    let mut recorder = Recorder::default();
    model.run(None, &mut recorder).expect("run completes");

    let train_ref = model.train_by_name("T1").expect("train registered");
    assert_eq!(train_ref.segments.len(), 2, "bridging must not duplicate the shared boundary component");

    assert_eq!(recorder.visit_count("T1", "P-Q-0"), 1);
    assert_eq!(recorder.last_exit("T1"), Tick(550));
}
