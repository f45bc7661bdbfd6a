extern crate argus;

use argus::attitude::{AttitudeLeg, ConstantSpinSlew, LegKind, NadirPointing, TargetGroundPointing};
use argus::cosmic::{GeodeticPoint, OneAxisEllipsoid, Orbit, Satellite, EARTH_EQUATORIAL_RADIUS_KM};
use argus::md::cinematic::{check_cinematic_plan, compute_cinematic_plan, final_score, StrictLegSequence};
use argus::md::timeline::DateInterval;
use argus::md::{ObservationPlan, Site};
use argus::prelude::AttitudeLaw;
use argus::propagators::KeplerianPropagator;
use argus::time::{Epoch, Unit};
use std::sync::Arc;

fn t0() -> Epoch {
    Epoch::from_gregorian_utc(2024, 6, 21, 0, 0, 0, 0)
}

fn horizon() -> DateInterval {
    DateInterval::new(t0(), t0() + 1.0 * Unit::Day)
}

fn earth() -> OneAxisEllipsoid {
    OneAxisEllipsoid::new(EARTH_EQUATORIAL_RADIUS_KM, 0.0)
}

/// Capacity 30 deg, max rate 2 deg/s, acceleration 1 deg/s^2: the worst-case
/// slew lasts 32 s.
fn satellite() -> Satellite {
    let orbit = Orbit::keplerian(
        EARTH_EQUATORIAL_RADIUS_KM + 694.0,
        1e-4,
        98.2,
        90.0,
        0.0,
        0.0,
        t0(),
        argus::cosmic::Frame::EME2000,
    );
    Satellite::new(
        "Argus 1",
        orbit,
        30.0,
        2.0_f64.to_radians(),
        1.0_f64.to_radians(),
    )
}

fn propagator() -> KeplerianPropagator {
    KeplerianPropagator::new(satellite().initial_orbit, Arc::new(NadirPointing)).unwrap()
}

/// A site at the sub-satellite point of the provided epoch, so that the
/// observation attitude stays close to nadir around that time.
fn sub_satellite_site(name: &str, score: f64, epoch: Epoch) -> Site {
    let itrf = propagator().orbit_at(epoch).unwrap().to_itrf();
    let lat = (itrf.z_km / itrf.rmag()).asin().to_degrees();
    let lon = itrf.y_km.atan2(itrf.x_km).to_degrees();
    Site::new(name, score, GeodeticPoint::new(lat, lon, 0.0))
}

fn observation_leg(site: &Site, start: Epoch, duration_s: f64) -> AttitudeLeg {
    AttitudeLeg::from_law(
        format!("OBS_{}", site.name),
        DateInterval::new(start, start + duration_s * Unit::Second),
        LegKind::ObservationLaw,
        Arc::new(TargetGroundPointing::new(earth(), site.point)),
    )
}

fn assert_contiguous_cover(plan: &StrictLegSequence) {
    assert!(plan.covers(horizon()), "plan must cover the horizon exactly");
    for pair in plan.legs().windows(2) {
        assert_eq!(
            pair[0].end(),
            pair[1].start(),
            "consecutive legs must share their endpoint"
        );
    }
}

#[test]
fn single_observation_yields_five_legs() {
    let site = sub_satellite_site("Paris", 10.0, t0() + 3_600.0 * Unit::Second);
    let mut plan_map = ObservationPlan::new();
    plan_map.insert(
        site.clone(),
        observation_leg(&site, t0() + 3_600.0 * Unit::Second, 10.0),
    );

    let sat = satellite();
    let prop = propagator();
    let plan = compute_cinematic_plan(&plan_map, horizon(), &sat, &prop).unwrap();

    let kinds: Vec<LegKind> = plan.legs().iter().map(|leg| leg.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LegKind::NadirLaw,
            LegKind::Slew,
            LegKind::ObservationLaw,
            LegKind::Slew,
            LegKind::NadirLaw,
        ]
    );
    assert_contiguous_cover(&plan);

    // The slews at the nadir boundaries are allotted the worst-case duration
    assert_eq!(plan.legs()[1].duration(), sat.max_slew_duration());
    assert_eq!(plan.legs()[3].duration(), sat.max_slew_duration());

    assert!(check_cinematic_plan(&plan, &sat, &prop).unwrap());
    // Checking an unchanged plan twice yields the same verdict
    assert!(check_cinematic_plan(&plan, &sat, &prop).unwrap());

    assert_eq!(final_score(&plan_map), 10.0);
}

#[test]
fn long_gap_inserts_an_intermediate_nadir_rest() {
    let start_a = t0() + 1_000.0 * Unit::Second;
    let start_b = t0() + 5_000.0 * Unit::Second;
    let site_a = sub_satellite_site("A", 9.0, start_a);
    let site_b = sub_satellite_site("B", 3.0, start_b);

    let mut plan_map = ObservationPlan::new();
    plan_map.insert(site_a.clone(), observation_leg(&site_a, start_a, 10.0));
    plan_map.insert(site_b.clone(), observation_leg(&site_b, start_b, 10.0));

    let sat = satellite();
    let prop = propagator();
    let plan = compute_cinematic_plan(&plan_map, horizon(), &sat, &prop).unwrap();

    // nadir, slew, obs A, slew, intermediate nadir, slew, obs B, slew, nadir
    assert_eq!(plan.len(), 9);
    assert!(plan.legs().iter().any(|leg| leg.name == "Nadir_Law_Inter"));
    assert_contiguous_cover(&plan);

    // Observations appear in ascending start order
    let obs_starts: Vec<Epoch> = plan
        .legs()
        .iter()
        .filter(|leg| leg.kind == LegKind::ObservationLaw)
        .map(|leg| leg.start())
        .collect();
    assert_eq!(obs_starts, vec![start_a, start_b]);

    assert!(check_cinematic_plan(&plan, &sat, &prop).unwrap());
    assert_eq!(final_score(&plan_map), 12.0);
}

#[test]
fn tight_gap_uses_a_single_direct_slew() {
    let sat = satellite();
    let start_a = t0() + 1_000.0 * Unit::Second;
    // Gap of 1.2 worst-case slews between the end of A and the start of B
    let gap = 1.2 * sat.max_slew_duration().to_seconds();
    let start_b = start_a + 10.0 * Unit::Second + gap * Unit::Second;
    let site_a = sub_satellite_site("A", 9.0, start_a);
    let site_b = sub_satellite_site("B", 3.0, start_b);

    let mut plan_map = ObservationPlan::new();
    plan_map.insert(site_a.clone(), observation_leg(&site_a, start_a, 10.0));
    plan_map.insert(site_b.clone(), observation_leg(&site_b, start_b, 10.0));

    let prop = propagator();
    let plan = compute_cinematic_plan(&plan_map, horizon(), &sat, &prop).unwrap();

    // nadir, slew, obs A, direct slew, obs B, slew, nadir
    assert_eq!(plan.len(), 7);
    assert!(plan.legs().iter().all(|leg| leg.name != "Nadir_Law_Inter"));
    assert!(plan.legs().iter().any(|leg| leg.name == "Slew_A_to_B"));
    assert_contiguous_cover(&plan);

    assert!(check_cinematic_plan(&plan, &sat, &prop).unwrap());
}

#[test]
fn empty_observation_plan_reduces_to_nadir() {
    let sat = satellite();
    let prop = propagator();
    let plan = compute_cinematic_plan(&ObservationPlan::new(), horizon(), &sat, &prop).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.legs()[0].kind, LegKind::NadirLaw);
    assert!(plan.covers(horizon()));
    assert!(check_cinematic_plan(&plan, &sat, &prop).unwrap());
    assert_eq!(final_score(&ObservationPlan::new()), 0.0);
}

#[test]
fn a_rushed_slew_is_flagged_by_the_validator() {
    let sat = satellite();
    let prop = propagator();

    // A 90 deg reorientation crammed into one second
    let q_start = prop.attitude_at(t0()).unwrap();
    let far_target = sub_satellite_site("Far", 1.0, t0() + 1_500.0 * Unit::Second);
    let far_law = TargetGroundPointing::new(earth(), far_target.point);
    let q_end = far_law.attitude(&prop, t0() + 1.0 * Unit::Second).unwrap();

    let mut rushed = StrictLegSequence::new();
    rushed
        .push(AttitudeLeg::from_slew(
            "Slew_Nadir_to_Far",
            ConstantSpinSlew::new(q_start, q_end),
        ))
        .unwrap();

    assert!(!check_cinematic_plan(&rushed, &sat, &prop).unwrap());
    // The verdict does not change on a re-run
    assert!(!check_cinematic_plan(&rushed, &sat, &prop).unwrap());
}

#[test]
fn leg_sequences_reject_gaps() {
    let mut seq = StrictLegSequence::new();
    let nadir: Arc<dyn AttitudeLaw> = Arc::new(NadirPointing);
    seq.push(AttitudeLeg::from_law(
        "Nadir_1",
        DateInterval::new(t0(), t0() + 100.0 * Unit::Second),
        LegKind::NadirLaw,
        nadir.clone(),
    ))
    .unwrap();
    let gapped = AttitudeLeg::from_law(
        "Nadir_2",
        DateInterval::new(t0() + 101.0 * Unit::Second, t0() + 200.0 * Unit::Second),
        LegKind::NadirLaw,
        nadir,
    );
    assert!(seq.push(gapped).is_err());
}
