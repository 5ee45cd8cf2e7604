//! End-to-end clustering scenarios against small synthetic fiber sets.

use fiber_cluster::{
    ClusterError, FiberCollection, ScalarProfile, SpectralClusterConfig, SpectralClusterer,
};
use ndarray::array;

/// Two tight pairs of near-identical fibers, far apart from each other,
/// interleaved so pair membership does not follow input order.
fn two_pair_collection() -> FiberCollection {
    let epsilon = 0.01;
    FiberCollection::from_points(&[
        // pair A
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        // pair B, offset far along y
        vec![[0.0, 100.0, 0.0], [1.0, 100.0, 0.0]],
        // pair A, perturbed
        vec![[0.0, epsilon, 0.0], [1.0, epsilon, 0.0]],
        // pair B, perturbed
        vec![[0.0, 100.0 + epsilon, 0.0], [1.0, 100.0 + epsilon, 0.0]],
    ])
    .unwrap()
}

fn two_pair_config() -> SpectralClusterConfig {
    // With distances normalized to [0, 1], sigma = 0.4 keeps same-pair
    // similarity near 1 and cross-pair similarity below 0.1
    SpectralClusterConfig::builder()
        .k_clusters(2)
        .num_eigenvectors(2)
        .sigma(0.4)
        .num_jobs(2)
        .seed(42)
        .build()
}

#[test]
fn two_pair_scenario_splits_exactly() {
    let collection = two_pair_collection();
    let clusterer = SpectralClusterer::new(two_pair_config()).unwrap();

    let result = clusterer.cluster(&collection).unwrap();

    assert_eq!(result.labels.len(), 4);
    assert_eq!(result.k_clusters(), 2);
    for &label in &result.labels {
        assert!(label < 2);
    }

    // Fibers 0 and 2 form pair A, fibers 1 and 3 form pair B
    assert_eq!(result.labels[0], result.labels[2]);
    assert_eq!(result.labels[1], result.labels[3]);
    assert_ne!(result.labels[0], result.labels[1]);
}

#[test]
fn two_pair_colors_are_distinct() {
    let collection = two_pair_collection();
    let clusterer = SpectralClusterer::new(two_pair_config()).unwrap();

    let result = clusterer.cluster(&collection).unwrap();

    let a = result.colors[0].map(f64::from);
    let b = result.colors[1].map(f64::from);
    let rgb_distance = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt();
    assert!(
        rgb_distance > 50.0,
        "cluster colors too close: {:?} vs {:?}",
        result.colors[0],
        result.colors[1]
    );
}

#[test]
fn repeated_runs_are_identical() {
    let collection = two_pair_collection();
    let clusterer = SpectralClusterer::new(two_pair_config()).unwrap();

    let first = clusterer.cluster(&collection).unwrap();
    let second = clusterer.cluster(&collection).unwrap();

    assert_eq!(first.labels, second.labels);
    assert_eq!(first.colors, second.colors);
    assert_eq!(first.centroids, second.centroids);
}

#[test]
fn annotations_cover_every_fiber() {
    let collection = two_pair_collection();
    let clusterer = SpectralClusterer::new(two_pair_config()).unwrap();

    let result = clusterer.cluster(&collection).unwrap();
    let annotations = result.annotations();

    assert_eq!(annotations.len(), 4);
    for (annotation, &label) in annotations.iter().zip(result.labels.iter()) {
        assert_eq!(annotation.cluster, label);
        assert_eq!(annotation.color, result.colors[label]);
    }
}

#[test]
fn empty_input_produces_no_result() {
    let empty = FiberCollection::from_points(&[]).unwrap();
    let clusterer = SpectralClusterer::new(two_pair_config()).unwrap();

    assert!(matches!(
        clusterer.cluster(&empty),
        Err(ClusterError::EmptyInput)
    ));
}

#[test]
fn single_eigenvector_config_never_runs() {
    let config = SpectralClusterConfig::builder()
        .k_clusters(2)
        .num_eigenvectors(1)
        .build();

    // Rejected at construction, before any matrix can be computed
    assert!(matches!(
        SpectralClusterer::new(config),
        Err(ClusterError::InvalidConfig(_))
    ));
}

#[test]
fn scalar_profile_clustering_splits_by_value() {
    let collection = two_pair_collection();
    // Profile values grouped the same way as the geometry
    let profile = ScalarProfile::new(
        "FA",
        array![
            [0.20, 0.21],
            [0.80, 0.81],
            [0.20, 0.20],
            [0.81, 0.80],
        ],
    );

    let config = SpectralClusterConfig::builder()
        .k_clusters(2)
        .num_eigenvectors(2)
        .sigma(0.2)
        .seed(42)
        .build();
    let clusterer = SpectralClusterer::new(config).unwrap();

    let result = clusterer.cluster_scalar(&collection, &profile).unwrap();
    assert_eq!(result.labels[0], result.labels[2]);
    assert_eq!(result.labels[1], result.labels[3]);
    assert_ne!(result.labels[0], result.labels[1]);
}

#[test]
fn misaligned_scalar_profile_rejected() {
    let collection = two_pair_collection();
    let profile = ScalarProfile::new("FA", array![[0.2, 0.2], [0.8, 0.8]]);
    let clusterer = SpectralClusterer::new(two_pair_config()).unwrap();

    assert!(matches!(
        clusterer.cluster_scalar(&collection, &profile),
        Err(ClusterError::InvalidData(_))
    ));
}
