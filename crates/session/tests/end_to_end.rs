use std::sync::Arc;
use std::time::Duration;

use feeds::{EarthquakeRecord, MemoryFeeds, NeoFeed, NeoRecord, SeismicProfile};
use foundation::math::LatLon;
use foundation::time::Timestamp;
use layers::{MemorySurface, OverlayController, SurfaceOp};
use orbit::{MemoryScene, OrbitVisualizer};
use pretty_assertions::assert_eq;
use serde_json::json;
use session::neo_browser::DETAIL_FALLBACK_NOTICE;
use session::{
    MemoryBackend, NeoBrowser, Phase, Session, SessionEvent, SimulationParameters,
    SimulationResult,
};

const STACK: [&str; 8] = [
    "shockwave-fill",
    "shockwave-line",
    "fireball-fill",
    "fireball-line",
    "crater-glow",
    "crater-fill",
    "crater-line",
    "impact-point",
];

fn crater(crater_d_m: f64) -> SimulationResult {
    SimulationResult {
        crater_d_m,
        crater_depth_m: crater_d_m / 5.0,
        velocity_mph: 44_738.7,
        energy_mt: 75_000.0,
        vaporized_population: 250.0,
        summary_text: "Regional devastation.".to_string(),
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn last_fly_to(surface: &MemorySurface) -> Option<(LatLon, f64)> {
    surface.ops().into_iter().rev().find_map(|op| match op {
        SurfaceOp::FlyTo { center, zoom } => Some((center, zoom)),
        _ => None,
    })
}

struct Harness {
    session: Session,
    feeds: Arc<MemoryFeeds>,
    backend: Arc<MemoryBackend>,
    surface: Arc<MemorySurface>,
}

fn harness() -> Harness {
    let feeds = Arc::new(MemoryFeeds::new());
    let backend = Arc::new(MemoryBackend::returning(crater(1000.0)));
    let surface = Arc::new(MemorySurface::new());
    let session = Session::new(
        feeds.clone(),
        backend.clone(),
        OverlayController::new(surface.clone()),
    );
    Harness {
        session,
        feeds,
        backend,
        surface,
    }
}

#[tokio::test]
async fn one_kilometer_impact_near_los_angeles() {
    let h = harness();
    let site = LatLon::new(34.0, -118.0);
    h.feeds.set_earthquakes(vec![EarthquakeRecord {
        magnitude: 7.0,
        place: Some("Ridgecrest, CA".to_string()),
        timestamp: Timestamp(1_562_383_193_000),
        latitude: 35.77,
        longitude: -117.6,
    }]);

    h.session.select_site(site);
    assert_eq!(last_fly_to(&h.surface), Some((site, 4.0)));
    h.session.settle_lookups().await;
    h.session.set_parameters(SimulationParameters {
        diameter_km: 1.0,
        velocity_km_s: 20.0,
        angle_deg: 45.0,
        density_kg_m3: 3000.0,
        population_density_per_km2: 100.0,
    });

    let report = h.session.run().await.expect("run");
    assert_close(report.radii.crater_km, 0.5);
    assert_close(report.radii.fireball_km, 1.5);
    assert_close(report.radii.shockwave_km, 4.0);
    assert_eq!(report.zoom, 12);
    assert_eq!(last_fly_to(&h.surface), Some((site, 12.0)));
    assert_eq!(h.surface.layer_ids(), STACK);
    assert_eq!(h.session.phase(), Phase::Rendered);
    assert!(h.session.is_pulsing());

    let request = &h.backend.requests()[0];
    assert_eq!(request.lat, 34.0);
    assert_eq!(request.lon, -118.0);
    assert_eq!(request.population_density_per_km2, 100.0);

    let quake = report.earthquake.as_ref().expect("comparison");
    assert_eq!(quake.magnitude, 7.0);
    assert_eq!(quake.direction, "N");
    let text = report.render();
    assert!(text.contains("Crater Diameter: 1000 m (1.00 km)"));
    assert!(text.contains("Seismic data unavailable for this location."));
    assert!(text.contains("The asteroid impact releases"));
}

#[tokio::test]
async fn second_run_replaces_the_first_generation() {
    let h = harness();
    h.session.select_site(LatLon::new(34.0, -118.0));
    h.session.run().await.expect("first run");

    h.backend.push_result(crater(30_000.0));
    let second = LatLon::new(48.85, 2.35);
    h.session.select_site(second);
    let report = h.session.run().await.expect("second run");

    assert_eq!(h.surface.layer_ids(), STACK);
    assert_eq!(h.surface.source_ids().len(), 5);
    let generation = h.session.overlay_generation().expect("generation");
    assert_eq!(generation.number, 2);
    assert_eq!(generation.site, second);
    assert_eq!(report.zoom, 7);
}

#[tokio::test(start_paused = true)]
async fn lookups_apply_only_to_the_current_site() {
    let h = harness();
    let slow = LatLon::new(35.0, 139.0);
    let fast = LatLon::new(-22.9, -43.2);
    h.feeds.set_site_delay(slow, Duration::from_secs(3));
    h.feeds.set_population(Some(6_000.0));
    h.feeds.set_seismic(Some(SeismicProfile {
        pgam: Some(2.0),
        sdc: Some("E".to_string()),
        sds: None,
        sd1: None,
        site: LatLon::new(0.0, 0.0),
    }));

    h.session.select_site(slow);
    tokio::time::sleep(Duration::from_secs(1)).await;
    let token = h.session.select_site(fast);
    h.session.settle_lookups().await;

    assert_eq!(h.session.seismic().expect("seismic").site, fast);
    let report = h.session.run().await.expect("run");
    assert_eq!(report.site, fast);
    assert_close(report.seismic_modifier, 1.15);
    assert!(report.population_auto_fetched);

    let events: Vec<SessionEvent> = h
        .session
        .drain_events()
        .into_iter()
        .map(|e| e.payload)
        .collect();
    let stale = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::StaleDiscarded { .. }))
        .count();
    assert_eq!(stale, 2);
    assert!(events.contains(&SessionEvent::Rendered {
        token,
        crater_d_m: 1000.0,
    }));
}

fn neo_feed() -> NeoFeed {
    serde_json::from_value(json!({
        "element_count": 2,
        "near_earth_objects": {
            "2024-01-05": [
                {
                    "id": "3542519",
                    "name": "(2010 PK9)",
                    "is_potentially_hazardous_asteroid": true,
                    "estimated_diameter": {"kilometers": {
                        "estimated_diameter_min": 0.12, "estimated_diameter_max": 0.28 }},
                    "close_approach_data": [{
                        "close_approach_date_full": "2024-Jan-05 12:34",
                        "relative_velocity": {"kilometers_per_second": "18.5"},
                        "miss_distance": {"kilometers": "5589845.7"}
                    }]
                },
                {
                    "id": "2000433",
                    "name": "433 Eros (A898 PA)",
                    "estimated_diameter": {"kilometers": {
                        "estimated_diameter_min": 22.0, "estimated_diameter_max": 49.0 }},
                    "close_approach_data": [{
                        "close_approach_date_full": "2024-Jan-04 01:00",
                        "relative_velocity": {"kilometers_per_second": "5.9"}
                    }]
                }
            ]
        }
    }))
    .expect("feed")
}

fn eros_detail() -> NeoRecord {
    serde_json::from_value(json!({
        "id": "2000433",
        "name": "433 Eros (A898 PA)",
        "orbital_data": {
            "semi_major_axis": "1.458",
            "eccentricity": "0.2229",
            "inclination": "10.83",
            "perihelion_distance": "1.133",
            "aphelion_distance": "1.783"
        }
    }))
    .expect("detail")
}

#[tokio::test(start_paused = true)]
async fn catalog_object_seeds_the_next_run() {
    let h = harness();
    h.feeds.set_neo_feed(Some(neo_feed()));
    h.feeds.insert_neo_detail(eros_detail());
    let scene = Arc::new(MemoryScene::new());
    let mut browser = NeoBrowser::new(
        h.feeds.clone(),
        OrbitVisualizer::with_frame_interval(scene.clone(), Duration::from_millis(16)),
    );

    let ids: Vec<String> = browser
        .load()
        .await
        .expect("load")
        .iter()
        .map(|e| e.id.clone())
        .collect();
    assert_eq!(ids, vec!["2000433", "3542519"]);

    browser.select("2000433").await.expect("select");
    assert_eq!(browser.notice(), None);
    let summary = browser.visualizer().summary().expect("preview");
    assert_eq!(summary.orbit.semi_major_axis_au, 1.458);
    assert_eq!(summary.orbit.inclination_deg, 10.83);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(scene.renders() > 0);

    let seed = browser.use_selected().expect("seed");
    assert!(!browser.visualizer().is_running());
    assert_eq!(scene.live_counts(), (0, 0, 0));
    assert_eq!(seed.diameter_km, 35.5);
    assert_eq!(seed.velocity_km_s, 11.0);

    h.session.apply_neo_seed(&seed);
    let params = h.session.parameters();
    assert_eq!(params.diameter_km, 35.5);
    assert_eq!(params.velocity_km_s, 11.0);
    assert_eq!(params.angle_deg, 45.0);

    h.session.select_site(LatLon::new(0.0, 0.0));
    let report = h.session.run().await.expect("run");
    assert_eq!(report.neo_name.as_deref(), Some("433 Eros (A898 PA)"));
    assert!(report.result_lines()[0].starts_with("Using NASA NEO Data"));
}

#[tokio::test(start_paused = true)]
async fn missing_detail_falls_back_to_the_basic_entry() {
    let feeds = Arc::new(MemoryFeeds::new());
    feeds.set_neo_feed(Some(neo_feed()));
    let scene = Arc::new(MemoryScene::new());
    let mut browser = NeoBrowser::new(feeds, OrbitVisualizer::new(scene.clone()));
    browser.load().await.expect("load");

    browser.select("3542519").await.expect("select");
    assert_eq!(browser.notice(), Some(DETAIL_FALLBACK_NOTICE));
    let summary = browser.visualizer().summary().expect("preview");
    assert_eq!(summary.orbit.semi_major_axis_au, 1.5);
    assert_eq!(summary.velocity_km_s, 18.5);

    // Selecting another entry replaces the running preview.
    browser.select("2000433").await.expect("select");
    assert_eq!(scene.live_counts(), (1, 1, 1));

    browser.close_preview();
    assert_eq!(scene.live_counts(), (0, 0, 0));
    let seed = browser.use_selected().expect("seed");
    assert_eq!(seed.name, "433 Eros (A898 PA)");
}
