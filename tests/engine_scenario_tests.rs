use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::{sleep, Duration};

use agentviz::constants::nodes::*;
use agentviz::{
    HighlightStyle, Interaction, InteractionKind, Layout, RandomTick, RecordingSurface,
    Visualization, VisualizationEngine,
};

fn ready_engine() -> (VisualizationEngine, Arc<RecordingSurface>) {
    let engine = VisualizationEngine::builtin().unwrap();
    let surface = Arc::new(RecordingSurface::new());
    engine.attach_surface(surface.clone());
    (engine, surface)
}

#[tokio::test(start_paused = true)]
async fn alarm_to_central_animates_one_hop() {
    let (engine, surface) = ready_engine();

    let result = engine.process(
        Interaction::new(ALARM, CENTRAL, InteractionKind::Message).with_text("threshold crossed"),
    );
    match &result {
        Visualization::Animated { path, .. } => assert_eq!(path, &vec![ALARM, CENTRAL]),
        other => panic!("unexpected result {other:?}"),
    }

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(surface.hops(), vec![(ALARM.to_string(), CENTRAL.to_string())]);
    assert_eq!(surface.pulses(), vec![CENTRAL.to_string()]);
    assert_eq!(engine.log().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn relayed_interaction_plays_every_hop() {
    let (engine, surface) = ready_engine();

    let result = engine.process(Interaction::new("Client", ALARM, InteractionKind::ApiCall));
    assert!(result.is_animated());

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(
        surface.hops(),
        vec![
            (USER.to_string(), CENTRAL.to_string()),
            (CENTRAL.to_string(), ALARM.to_string())
        ]
    );
    assert_eq!(engine.scheduler().active_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn unknown_source_is_recorded_but_not_animated() {
    let (engine, surface) = ready_engine();

    let result = engine.process(Interaction::new("GhostService", CENTRAL, InteractionKind::Message));

    assert!(matches!(result, Visualization::Unresolved { .. }));
    assert_eq!(engine.log().len(), 1);
    assert!(surface.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unroutable_and_self_interactions_are_suppressed() {
    let (engine, surface) = ready_engine();

    assert!(matches!(
        engine.process(Interaction::new(WALLET, MESSAGE_CALL, InteractionKind::Message)),
        Visualization::NoPath { .. }
    ));
    assert!(matches!(
        engine.process(Interaction::new(CENTRAL, "CentralAgent-replica", InteractionKind::Message)),
        Visualization::NoPath { .. }
    ));
    assert_eq!(engine.log().len(), 2);
    assert!(surface.hops().is_empty());
}

#[tokio::test(start_paused = true)]
async fn processing_before_surface_attached_only_records() {
    let engine = VisualizationEngine::builtin().unwrap();

    let result = engine.process(Interaction::new(ALARM, CENTRAL, InteractionKind::Message));

    assert_eq!(result, Visualization::Unavailable);
    assert_eq!(engine.log().len(), 1);
}

fn alarm_related_edge(engine: &VisualizationEngine, source: &str, target: &str) -> bool {
    engine.topology().is_alarm_related(source) || engine.topology().is_alarm_related(target)
}

#[tokio::test(start_paused = true)]
async fn random_ticks_respect_alarm_edges() {
    let (engine, surface) = ready_engine();
    let mut rng = StdRng::seed_from_u64(7);
    let related_edges = engine
        .topology()
        .list_edges()
        .iter()
        .filter(|edge| alarm_related_edge(&engine, &edge.source, &edge.target))
        .count();
    // User-Central, DataClean-Central, Central-AutoTrade, Central-Alarm, Alarm-MessageCall
    assert_eq!(related_edges, 5);

    let mut animated = 0;
    let mut highlighted = 0;
    for _ in 0..64 {
        match engine.simulate_random_flow(&mut rng) {
            RandomTick::Animated { source, target, .. } => {
                assert!(!alarm_related_edge(&engine, &source, &target));
                animated += 1;
            }
            RandomTick::AlarmHighlight { source, target } => {
                assert!(alarm_related_edge(&engine, &source, &target));
                highlighted += 1;
            }
            RandomTick::Skipped => panic!("every builtin edge is drawable"),
        }
    }
    assert_eq!(animated + highlighted, 64);
    assert_eq!(surface.hops().len(), animated);

    let highlights = surface.highlights();
    assert!(highlights
        .iter()
        .filter(|(_, style)| *style == HighlightStyle::Alert)
        .all(|(node, _)| node == ALARM));
    assert_eq!(
        highlights
            .iter()
            .filter(|(_, style)| *style == HighlightStyle::Alert)
            .count(),
        highlighted
    );
    assert!(highlights
        .iter()
        .filter(|(_, style)| *style == HighlightStyle::Related)
        .all(|(node, _)| node != ALARM));
}

#[tokio::test(start_paused = true)]
async fn edge_next_to_alarm_neighbor_is_highlighted_not_animated() {
    let (engine, surface) = ready_engine();

    let mut seen = false;
    for seed in 0..500 {
        let mut rng = StdRng::seed_from_u64(seed);
        match engine.simulate_random_flow(&mut rng) {
            RandomTick::AlarmHighlight { source, target }
                if source == CENTRAL && target == AUTO_TRADE =>
            {
                seen = true;
                break;
            }
            RandomTick::Animated { source, target, .. } => {
                assert!(
                    !(source == CENTRAL && target == AUTO_TRADE),
                    "seed {seed} animated CentralAgent->AutoTradeAgent"
                );
            }
            _ => {}
        }
    }
    assert!(seen, "CentralAgent->AutoTradeAgent never drawn in 500 seeds");

    let highlights = surface.highlights();
    assert!(highlights.contains(&(CENTRAL.to_string(), HighlightStyle::Related)));
    assert!(highlights.contains(&(AUTO_TRADE.to_string(), HighlightStyle::Related)));
    assert!(highlights.contains(&(ALARM.to_string(), HighlightStyle::Alert)));
}

#[tokio::test(start_paused = true)]
async fn random_tick_without_surface_is_skipped() {
    let engine = VisualizationEngine::builtin().unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(engine.simulate_random_flow(&mut rng), RandomTick::Skipped);
}

#[tokio::test(start_paused = true)]
async fn resize_rescales_flow_endpoints() {
    let (engine, _surface) = ready_engine();
    let alarm = engine.topology().get_node(ALARM).unwrap().clone();

    engine.resize(2000.0, 1600.0);
    engine
        .scheduler()
        .animate_hop(ALARM, CENTRAL, "#3498db", Duration::from_millis(1000))
        .unwrap();

    let flows = engine.scheduler().active_flows();
    let expected = Layout::fit(2000.0, 1600.0).center(&alarm);
    assert_eq!(flows[0].from, expected);
    assert_eq!(expected.x, alarm.position.x * 2.0 + alarm.size.w / 2.0);

    assert_eq!(engine.reset_view(), 1);
    assert_eq!(engine.scheduler().layout(), Layout::default());
}
