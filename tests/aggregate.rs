//! Validates best-grid selection, grouped statistics, correlation, and the
//! compressibility-hypothesis regression

use gridscore::eval::aggregate::{self, CORRELATION_METRICS};
use gridscore::eval::evaluator::{EvaluationTable, MetricRow, MetricSet};
use gridscore::grid::assign::GridResolution;
use gridscore::metrics::compression::CompressionProbe;

fn metric_row(domain: &str, cells: u32, p_score: f64) -> MetricRow {
    MetricRow {
        domain: domain.to_string(),
        category: "e-commerce".to_string(),
        resolution: GridResolution::square(cells),
        component_count: 40,
        metrics: MetricSet {
            grid_consistency: 0.9,
            hit_rate: 0.95,
            density: 40.0 / 2_073_600.0,
            entropy: 2.0,
            bbox_coverage: 0.6,
            compression: Some(CompressionProbe {
                ratio: 0.7,
                lossless_bytes: 1_000_000,
                lossy_bytes: 300_000,
            }),
            p_score,
        },
    }
}

fn table_for(domain: &str, p_scores: [f64; 3]) -> Vec<MetricRow> {
    vec![
        metric_row(domain, 4, p_scores[0]),
        metric_row(domain, 8, p_scores[1]),
        metric_row(domain, 16, p_scores[2]),
    ]
}

#[test]
fn test_best_grid_selects_maximal_p_score() {
    let mut table = EvaluationTable::new("training".to_string());
    table.rows = table_for("amazon_se", [0.41, 0.52, 0.37]);

    let expected = vec!["amazon_se".to_string()];
    let summary = aggregate::aggregate(std::slice::from_ref(&table), &expected).unwrap();

    let best = summary.best_grids.first().unwrap();
    assert_eq!(best.resolution, GridResolution::square(8));
    assert!((best.metrics.p_score - 0.52).abs() < f64::EPSILON);
    assert_eq!(best.dataset, "training");
}

#[test]
fn test_best_grid_ties_break_by_input_order() {
    let mut table = EvaluationTable::new("training".to_string());
    table.rows = table_for("walmart_com", [0.5, 0.5, 0.5]);

    let expected = vec!["walmart_com".to_string()];
    let summary = aggregate::aggregate(std::slice::from_ref(&table), &expected).unwrap();

    // First occurrence wins: the 4x4 row came first
    let best = summary.best_grids.first().unwrap();
    assert_eq!(best.resolution, GridResolution::square(4));
}

#[test]
fn test_domains_keep_first_seen_order() {
    let mut table = EvaluationTable::new("training".to_string());
    table.rows = table_for("walmart_com", [0.4, 0.5, 0.3]);
    table.rows.extend(table_for("amazon_se", [0.2, 0.1, 0.3]));

    let expected = vec!["walmart_com".to_string(), "amazon_se".to_string()];
    let summary = aggregate::aggregate(std::slice::from_ref(&table), &expected).unwrap();

    let domains: Vec<&str> = summary
        .best_grids
        .iter()
        .map(|b| b.domain.as_str())
        .collect();
    assert_eq!(domains, vec!["walmart_com", "amazon_se"]);
}

#[test]
fn test_missing_domains_abort_aggregation() {
    let mut table = EvaluationTable::new("training".to_string());
    table.rows = table_for("amazon_se", [0.41, 0.52, 0.37]);

    let expected = vec!["amazon_se".to_string(), "walmart_com".to_string()];
    let error = aggregate::aggregate(std::slice::from_ref(&table), &expected).unwrap_err();

    let message = error.to_string();
    assert!(message.contains("walmart_com"));
    assert!(!message.contains("amazon_se,"));
}

#[test]
fn test_hypothesis_derived_fields() {
    let mut table = EvaluationTable::new("training".to_string());
    table.rows = table_for("amazon_se", [0.41, 0.52, 0.37]);

    let expected = vec!["amazon_se".to_string()];
    let summary = aggregate::aggregate(std::slice::from_ref(&table), &expected).unwrap();

    let best = summary.best_grids.first().unwrap();
    let entropy_density = 2.0 * (40.0 / 2_073_600.0);
    assert!((best.entropy_density - entropy_density).abs() < 1e-15);

    let expected_cr = 1.0 / entropy_density;
    assert!((best.expected_cr.unwrap() - expected_cr).abs() < 1e-9);
    assert!((best.cr_residual.unwrap() - (expected_cr - 0.7)).abs() < 1e-9);
}

#[test]
fn test_hypothesis_guards_zero_entropy_density() {
    let mut row = metric_row("empty_page", 4, 0.2);
    row.metrics.entropy = 0.0;
    let mut table = EvaluationTable::new("training".to_string());
    table.rows = vec![row];

    let expected = vec!["empty_page".to_string()];
    let summary = aggregate::aggregate(std::slice::from_ref(&table), &expected).unwrap();

    let best = summary.best_grids.first().unwrap();
    assert!(best.expected_cr.is_none());
    assert!(best.cr_residual.is_none());
    assert!(summary.hypothesis.is_none());
}

#[test]
fn test_regression_perfect_on_reciprocal_relationship() {
    // Two domains whose ratios satisfy cr = 1 / (entropy * density) exactly
    let mut table = EvaluationTable::new("training".to_string());
    for (domain, entropy, density, cells) in [
        ("site_a", 2.0, 0.6, 4),
        ("site_b", 4.0, 0.5, 8),
    ] {
        let mut row = metric_row(domain, cells, 0.5);
        row.metrics.entropy = entropy;
        row.metrics.density = density;
        row.metrics.compression = Some(CompressionProbe {
            ratio: 1.0 / (entropy * density),
            lossless_bytes: 1_000_000,
            lossy_bytes: 100_000,
        });
        table.rows.push(row);
    }

    let expected = vec!["site_a".to_string(), "site_b".to_string()];
    let summary = aggregate::aggregate(std::slice::from_ref(&table), &expected).unwrap();

    let fit = summary.hypothesis.unwrap();
    assert!((fit.r_squared - 1.0).abs() < 1e-12);

    for best in &summary.best_grids {
        assert!(best.cr_residual.unwrap().abs() < 1e-12);
    }
}

#[test]
fn test_group_statistics() {
    let mut table = EvaluationTable::new("training".to_string());
    table.rows = table_for("amazon_se", [0.4, 0.5, 0.3]);
    table.rows.extend(table_for("walmart_com", [0.3, 0.7, 0.2]));

    let expected = vec!["amazon_se".to_string(), "walmart_com".to_string()];
    let summary = aggregate::aggregate(std::slice::from_ref(&table), &expected).unwrap();

    assert_eq!(summary.group_stats.len(), 1);
    let group = summary.group_stats.first().unwrap();
    assert_eq!(group.dataset, "training");
    assert_eq!(group.category, "e-commerce");

    let p_score = group
        .metrics
        .iter()
        .find(|m| m.metric == "p_score")
        .unwrap();
    assert_eq!(p_score.count, 2);
    assert!((p_score.mean.unwrap() - 0.6).abs() < 1e-12);

    // Sample std dev of {0.5, 0.7}
    assert!((p_score.std_dev.unwrap() - 0.2_f64 / std::f64::consts::SQRT_2).abs() < 1e-12);
}

#[test]
fn test_unavailable_compression_shrinks_cr_sample() {
    let mut table = EvaluationTable::new("training".to_string());
    table.rows = table_for("amazon_se", [0.4, 0.5, 0.3]);
    let mut degraded = metric_row("walmart_com", 8, 0.6);
    degraded.metrics.compression = None;
    table.rows.push(degraded);

    let expected = vec!["amazon_se".to_string(), "walmart_com".to_string()];
    let summary = aggregate::aggregate(std::slice::from_ref(&table), &expected).unwrap();

    let group = summary.group_stats.first().unwrap();
    let cr = group.metrics.iter().find(|m| m.metric == "cr_file").unwrap();
    let p_score = group
        .metrics
        .iter()
        .find(|m| m.metric == "p_score")
        .unwrap();
    assert_eq!(cr.count, 1);
    assert_eq!(p_score.count, 2);
}

#[test]
fn test_correlation_matrix_shape_and_extremes() {
    let mut table = EvaluationTable::new("training".to_string());
    // P_Score tracks entropy exactly; density constant across domains
    for (i, domain) in ["a", "b", "c", "d"].iter().enumerate() {
        let mut row = metric_row(domain, 8, 0.1 * (i + 1) as f64);
        row.metrics.entropy = (i + 1) as f64;
        table.rows.push(row);
    }

    let expected: Vec<String> = ["a", "b", "c", "d"].iter().map(ToString::to_string).collect();
    let summary = aggregate::aggregate(std::slice::from_ref(&table), &expected).unwrap();

    let matrix = &summary.correlation;
    assert_eq!(matrix.labels, CORRELATION_METRICS.to_vec());
    assert_eq!(matrix.values.dim(), (5, 5));

    let index_of = |name: &str| matrix.labels.iter().position(|l| *l == name).unwrap();
    let entropy_idx = index_of("entropy");
    let p_score_idx = index_of("p_score");
    let density_idx = index_of("density");

    let entropy_vs_p = matrix
        .values
        .get((entropy_idx, p_score_idx))
        .copied()
        .flatten()
        .unwrap();
    assert!((entropy_vs_p - 1.0).abs() < 1e-12);

    // Constant density has zero variance: correlation undefined, not NaN
    assert!(matrix
        .values
        .get((density_idx, p_score_idx))
        .copied()
        .flatten()
        .is_none());
}
