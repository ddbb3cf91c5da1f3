//! End-to-end pair sweeps over the river network fixture.
//!
//! These tests drive the public API only: load a network, sweep its output variables and
//! check the joint tables and statistics against values worked out by hand from the CPTs.

mod common;

use common::{assert_close, init_logging, river};
use jpd_core::{
    batch::PairSweep,
    config::{AnalysisConfig, MeanSource},
    diagnostic::JpdDiagnostic,
    event::Event,
    jpd::build_jpd,
    network::BeliefNetwork,
    oracle::{BeliefOracle, BeliefSession},
    properties::VariableId,
    stats::{correlation, covariance},
    JpdError,
};
use std::sync::mpsc::channel;

fn var(name: &str) -> VariableId {
    VariableId::new(name)
}

fn states(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_all_pairs_over_river() {
    init_logging();
    let mut sweep = PairSweep::simple(river());
    let results = sweep.all_pairs().unwrap();

    let order: Vec<(String, String)> = results
        .pairs
        .iter()
        .map(|p| (p.a.to_string(), p.b.to_string()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Discharge".into(), "Turbidity".into()),
            ("Discharge".into(), "Oxygen".into()),
            ("Turbidity".into(), "Oxygen".into()),
        ],
        "pairs follow the network's output order"
    );

    for pair in &results.pairs {
        assert!((pair.table.interior_sum() - 1.0).abs() < 1e-9);
        assert!(pair.diagnostics.is_empty(), "{:?}", pair.diagnostics);
        assert!((-1.0..=1.0).contains(&pair.correlation));
    }

    let dt = results.get(&var("Discharge"), &var("Turbidity")).unwrap();
    assert_eq!(dt.table.a_values(), vec![10.0, 20.0, 40.0]);
    assert_eq!(dt.table.b_values(), &[0.0, 1.0]);
    assert_close(dt.table.cell(0, 0), 0.45);
    assert_close(dt.table.cell(0, 1), 0.0);
    assert_close(dt.table.cell(1, 1), 0.132);
    assert_close(dt.table.cell(2, 1), 0.176);
    assert_close(dt.covariance, 3.5508);
    assert_close(dt.correlation, 0.6669423765256779);

    let to = results.get(&var("Oxygen"), &var("Turbidity")).unwrap();
    assert_close(to.covariance, -0.3495296);
    assert_close(to.correlation, -0.4102806340283637);

    // Every finding entered along the way was retracted
    assert!(sweep.into_inner().findings().is_empty());
}

#[test]
fn test_correlation_is_symmetric_in_pair_order() {
    let mut session = BeliefSession::new(river());
    let stats = |session: &mut BeliefSession<BeliefNetwork>, a: &str, b: &str| {
        let table = build_jpd(session, &var(a), &var(b)).unwrap();
        let (mean_a, std_a) = moments_of(session, a);
        let (mean_b, std_b) = moments_of(session, b);
        let cov = covariance(mean_a, mean_b, &table);
        (cov, correlation(std_a, std_b, cov))
    };
    let forward = stats(&mut session, "Discharge", "Oxygen");
    let backward = stats(&mut session, "Oxygen", "Discharge");
    assert_close(forward.0, backward.0);
    assert_close(forward.1, backward.1);
    assert_close(forward.0, -5.04288);
}

fn moments_of(session: &mut BeliefSession<BeliefNetwork>, variable: &str) -> (f64, f64) {
    let summary = jpd_core::jpd::prior_summary(session, &var(variable)).unwrap();
    (summary.mean, summary.std)
}

#[test]
fn test_conditional_batch_on_input_node() {
    init_logging();
    let (tx, rx) = channel();
    let mut sweep = PairSweep::new(river(), AnalysisConfig::default(), Some(tx));
    let batch = sweep
        .all_conditional_pairs(&var("Rain"), &states(&["dry", "wet"]))
        .unwrap();
    drop(sweep);

    assert_eq!(batch.len(), 2);
    for results in &batch {
        // C(3, 2) pairs, output variables sorted by name
        assert_eq!(
            results.variables(),
            vec![var("Discharge"), var("Oxygen"), var("Turbidity")]
        );
        assert_eq!(results.pairs.len(), 3);
        for pair in &results.pairs {
            assert!((pair.table.interior_sum() - 1.0).abs() < 1e-9);
            assert!(pair.diagnostics.is_empty());
        }
    }

    let dry = &batch[0];
    assert_eq!(dry.condition.as_ref().unwrap().state, "dry");
    let dt = dry.get(&var("Discharge"), &var("Turbidity")).unwrap();
    assert_close(dt.covariance, 2.4);
    assert_close(dt.correlation, 0.654653670707977);

    let wet = &batch[1];
    let ot = wet.get(&var("Oxygen"), &var("Turbidity")).unwrap();
    assert_close(ot.covariance, -0.39424);
    assert_close(ot.correlation, -0.42426234687148223);

    let events: Vec<Event> = rx.iter().collect();
    let progress: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            Event::Progress { completed, total } => {
                assert_eq!(*total, 6);
                Some(*completed)
            }
            _ => None,
        })
        .collect();
    assert_eq!(progress, (1..=6).collect::<Vec<usize>>());
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::PairComplete { .. }))
            .count(),
        6
    );
}

#[test]
fn test_conditioning_on_an_output_node_degenerates() {
    let mut sweep = PairSweep::simple(river());
    let batch = sweep
        .all_conditional_pairs(&var("Discharge"), &states(&["low"]))
        .unwrap();
    let results = &batch[0];

    // Discharge is certain under its own finding: mid and high rows are zero-filled
    let dt = results.get(&var("Discharge"), &var("Turbidity")).unwrap();
    assert_eq!(dt.table.row(1), &[0.0, 0.0]);
    assert_eq!(dt.table.row(2), &[0.0, 0.0]);
    assert_close(dt.table.interior_sum(), 1.0);
    assert!(dt.correlation.is_nan());
    assert_eq!(dt.diagnostics.iter().filter(|d| d.is_degenerate()).count(), 2);

    // Turbidity is always clear at low discharge, Oxygen is not degenerate
    let ot = results.get(&var("Oxygen"), &var("Turbidity")).unwrap();
    assert!(ot.correlation.is_nan());
    assert!(!ot.diagnostics.iter().any(|d| d.is_degenerate()));
    assert!(ot.diagnostics.iter().any(|d| matches!(
        d,
        JpdDiagnostic::ZeroVariance { variable, condition: Some(_) } if variable == &var("Turbidity")
    )));
    assert_close(ot.covariance, 0.0);
}

#[test]
fn test_joint_marginal_means_agree_with_exact_inference() {
    let config = AnalysisConfig {
        mean_source: MeanSource::JointMarginal,
        ..Default::default()
    };
    let by_marginal = PairSweep::new(river(), config, None).all_pairs().unwrap();
    let by_prior = PairSweep::simple(river()).all_pairs().unwrap();
    for (m, p) in by_marginal.pairs.iter().zip(&by_prior.pairs) {
        assert_close(m.covariance, p.covariance);
        assert_close(m.correlation, p.correlation);
    }
}

#[test]
fn test_single_state_output_gives_nan_correlation() {
    let network: BeliefNetwork = r#"
name = "gauge"

[[nodes]]
name = "Gauge"
nodeset = "OUT"
states = [{ name = "fixed", title = "3" }]
cpt = [[1.0]]

[[nodes]]
name = "Level"
nodeset = "OUT"
states = [{ name = "low", title = "1" }, { name = "high", title = "2" }]
cpt = [[0.25, 0.75]]
"#
    .parse()
    .unwrap();
    let results = PairSweep::simple(network).all_pairs().unwrap();
    let pair = &results.pairs[0];
    assert_eq!(pair.table.rows(), 1);
    assert_close(pair.table.interior_sum(), 1.0);
    assert_close(pair.covariance, 0.0);
    assert!(pair.correlation.is_nan());
}

#[test]
fn test_single_output_has_no_pairs() {
    let network: BeliefNetwork = r#"
name = "lonely"

[[nodes]]
name = "Level"
nodeset = "OUT"
states = [{ name = "low", title = "1" }, { name = "high", title = "2" }]
cpt = [[0.25, 0.75]]
"#
    .parse()
    .unwrap();
    let mut sweep = PairSweep::simple(network);
    assert!(sweep.all_pairs().unwrap().pairs.is_empty());
    let batch = sweep
        .all_conditional_pairs(&var("Level"), &states(&["low", "high"]))
        .unwrap();
    assert_eq!(batch.len(), 2);
    assert!(batch.iter().all(|r| r.pairs.is_empty()));
}

#[test]
fn test_non_numeric_output_titles_fail() {
    let network: BeliefNetwork = r#"
name = "words"

[[nodes]]
name = "Colour"
nodeset = "OUT"
states = [{ name = "red" }, { name = "blue" }]
cpt = [[0.5, 0.5]]

[[nodes]]
name = "Level"
nodeset = "OUT"
states = [{ name = "low", title = "1" }, { name = "high", title = "2" }]
cpt = [[0.25, 0.75]]
"#
    .parse()
    .unwrap();
    let mut sweep = PairSweep::simple(network);
    assert!(matches!(
        sweep.all_pairs(),
        Err(JpdError::InvalidStateLabel { .. })
    ));
    assert!(sweep.into_inner().findings().is_empty());
}

#[test]
fn test_unknown_conditioning_state_aborts() {
    let mut sweep = PairSweep::simple(river());
    let err = sweep
        .all_conditional_pairs(&var("Rain"), &states(&["dry", "drizzle"]))
        .unwrap_err();
    assert!(matches!(err, JpdError::NotFound(_)), "{err:?}");
    let network = sweep.into_inner();
    assert!(network.findings().is_empty());
    assert!(network.output_variables().is_ok());
}
