extern crate argus;

use argus::attitude::NadirPointing;
use argus::cosmic::GeodeticPoint;
use argus::io::config::MissionConfig;
use argus::md::access::ACCESS;
use argus::md::{Mission, Site};
use argus::prelude::LegKind;
use argus::propagators::KeplerianPropagator;
use argus::time::Unit;
use std::sync::Arc;

fn june_solstice_config() -> MissionConfig {
    // The defaults already start at the June solstice with the ascending
    // node at the solar right ascension, so the ascending equator crossing
    // happens near local noon.
    MissionConfig::default()
}

/// A site at the sub-satellite point reached `offset_s` after the horizon
/// start, for the mission orbit of the provided configuration.
fn sub_satellite_site(config: &MissionConfig, name: &str, score: f64, offset_s: f64) -> Site {
    let probe = Mission::from_sites("probe", Vec::new(), config.clone()).unwrap();
    let prop = KeplerianPropagator::new(
        probe.satellite().initial_orbit,
        Arc::new(NadirPointing),
    )
    .unwrap();
    let epoch = probe.horizon().start() + offset_s * Unit::Second;
    let itrf = prop.orbit_at(epoch).unwrap().to_itrf();
    let lat = (itrf.z_km / itrf.rmag()).asin().to_degrees();
    let lon = itrf.y_km.atan2(itrf.x_km).to_degrees();
    Site::new(name, score, GeodeticPoint::new(lat, lon, 0.0))
}

#[test]
fn polar_night_site_is_all_dark() {
    // At the June solstice a site at 80 deg south never sees the Sun, let
    // alone 15 deg above its horizon: the illumination constraint can never
    // combine with visibility.
    let config = june_solstice_config();
    let site = Site::new("Concordia", 5.0, GeodeticPoint::new(-80.0, 0.0, 0.0));
    let mut mission = Mission::from_sites("all dark", vec![site.clone()], config).unwrap();

    let access = mission.compute_access_plan();
    let timeline = access.get(&site).expect("the site must have a timeline");
    assert!(
        timeline.is_empty(),
        "an unlit site must have an empty access timeline"
    );

    assert!(mission.compute_observation_plan().is_empty());

    mission.compute_cinematic_plan().unwrap();
    let plan = mission.cinematic_plan();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.legs()[0].kind, LegKind::NadirLaw);
    assert!(plan.covers(mission.horizon()));

    assert!(mission.check_cinematic_plan().unwrap());
    assert_eq!(mission.final_score().unwrap(), 0.0);
}

#[test]
fn daylit_overflight_is_observed_end_to_end() {
    // Wide-aperture variant so that the target under the early ground track
    // is observable with certainty: the site sits at the sub-satellite point
    // two minutes into the horizon, in daylight, with the glare constraint
    // disabled (zero minimum phase angle holds everywhere).
    let mut config = june_solstice_config();
    config.pointing_capacity_deg = 80.0;
    config.max_sun_incidence_deg = 88.0;
    config.max_sun_phase_deg = 0.0;

    let site = sub_satellite_site(&config, "Overflown", 42.0, 120.0);
    let mut mission = Mission::from_sites("daylit", vec![site.clone()], config).unwrap();
    let integration = mission.integration_time();

    mission.compute_access_plan();
    let timeline = mission
        .access_plan()
        .get(&site)
        .expect("the site must have a timeline")
        .clone();
    assert!(
        !timeline.is_empty(),
        "an overflown daylit site must have access windows"
    );
    for window in timeline.phenomena_of(ACCESS) {
        assert!(
            window.duration() > integration,
            "every access window must outlast the integration time"
        );
    }

    mission.compute_observation_plan();
    let leg = mission
        .observation_plan()
        .get(&site)
        .expect("the site must be scheduled")
        .clone();
    assert_eq!(leg.duration(), integration);
    assert!(
        timeline
            .phenomena_of(ACCESS)
            .iter()
            .any(|window| window.timespan.contains(&leg.interval)),
        "the observation must sit inside an access window"
    );

    mission.compute_cinematic_plan().unwrap();
    let plan = mission.cinematic_plan();
    assert!(plan.len() >= 3);
    assert!(plan.covers(mission.horizon()));
    assert_eq!(
        plan.legs()
            .iter()
            .filter(|leg| leg.kind == LegKind::ObservationLaw)
            .count(),
        1
    );

    assert!(mission.check_cinematic_plan().unwrap());
    assert_eq!(mission.final_score().unwrap(), 42.0);
}

#[test]
fn score_requires_a_checked_plan() {
    let config = june_solstice_config();
    let mission = Mission::from_sites("unchecked", Vec::new(), config).unwrap();
    assert!(mission.final_score().is_err());
}

#[test]
fn catalogue_mission_takes_the_top_ranking_sites() {
    let mission = Mission::new("catalogue", 5, MissionConfig::default()).unwrap();
    let names: Vec<&str> = mission.sites().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Tokyo", "Delhi", "Shanghai", "Sao Paulo", "Mexico City"]
    );
}

#[test]
fn requesting_more_sites_than_the_catalogue_fails() {
    assert!(Mission::new("greedy", 100, MissionConfig::default()).is_err());
}

#[test]
fn vts_outputs_are_written() {
    let out_dir = std::env::temp_dir().join(format!("argus-vts-{}", std::process::id()));
    let mut config = june_solstice_config();
    config.vts_directory = out_dir.display().to_string();

    let site = Site::new("Concordia", 5.0, GeodeticPoint::new(-80.0, 0.0, 0.0));
    let mut mission = Mission::from_sites("vts", vec![site], config).unwrap();
    mission.compute_access_plan();
    mission.compute_observation_plan();
    mission.compute_cinematic_plan().unwrap();
    mission.generate_vts_visualization().unwrap();

    for file in [
        "Argus_Target_Sites_POI.txt",
        "Argus_Satellite_Trajectory_OEM.txt",
        "Argus_Nadir_Pointing_AEM.txt",
        "Argus_Cinematic_Plan_AEM.txt",
        "Argus_Cinematic_Plan_Events_MEM.txt",
    ] {
        let path = out_dir.join(file);
        let metadata = std::fs::metadata(&path)
            .unwrap_or_else(|_| panic!("{} must exist", path.display()));
        assert!(metadata.len() > 0, "{} must not be empty", path.display());
    }

    let _ = std::fs::remove_dir_all(&out_dir);
}
