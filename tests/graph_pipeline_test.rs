use card_catalog::graph::{
    build_graph, compute_layout, export_adjacency_matrix, export_edge_list, graph_from_edge_list, graph_statistics,
    GraphBuilder, GraphError, NodeId,
};
use card_catalog::record::loader::parse_table;
use card_catalog::record::{FieldValue, Record, RecordId};
use card_catalog::{Catalog, CatalogConfig, EntityKind, FilterSpec, GraphRequest};
use std::collections::HashSet;

fn dataset(id: u64, name: &str, diseases: &[&str], modalities: &[&str]) -> Record {
    Record::new(RecordId::new(id))
        .with_field("Study Name", name)
        .with_field("Diseases Included", diseases.to_vec())
        .with_field("Data Modalities", modalities.to_vec())
}

fn cohort() -> Vec<Record> {
    vec![
        dataset(0, "ADNI", &["Alzheimer's Disease", "MCI"], &["MRI", "PET", "Genomics"]),
        dataset(1, "AIBL", &["alzheimer's disease", "MCI"], &["MRI", "PET"]),
        dataset(2, "PPMI", &["Parkinson's Disease"], &["MRI", "DaTscan"]),
        dataset(3, "AMP-PD", &["Parkinson's Disease", "DLB"], &["Genomics"]),
        dataset(4, "ALS-TDI", &["ALS"], &["Clinical"]),
    ]
}

/// Intersection size per field, computed independently of the builder
fn shared_count(a: &Record, b: &Record, fields: &[&str]) -> u32 {
    fields
        .iter()
        .map(|f| {
            let set = |r: &Record| -> HashSet<String> {
                r.get(f).map(FieldValue::items).unwrap_or_default().iter().map(|v| v.to_lowercase()).collect()
            };
            set(a).intersection(&set(b)).count() as u32
        })
        .sum()
}

#[test]
fn test_scenario_shared_list_values() {
    let records = vec![
        dataset(0, "A", &["Alzheimer's", "MCI"], &["Imaging"]),
        dataset(1, "B", &["Alzheimer's", "MCI"], &["Imaging"]),
    ];
    let graph = build_graph(&records, &["Diseases Included"], 1).unwrap();

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edges()[0].weight, 2);
}

#[test]
fn test_scenario_no_shared_values() {
    let records = vec![
        dataset(0, "A", &["AD"], &["MRI"]),
        dataset(1, "B", &["PD"], &["PET"]),
        dataset(2, "C", &["ALS"], &["EEG"]),
    ];
    let graph = build_graph(&records, &["Diseases Included", "Data Modalities"], 1).unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_scenario_threshold_above_max_weight() {
    let fields = ["Diseases Included", "Data Modalities"];
    let records = cohort();
    let max_weight = build_graph(&records, &fields, 1)
        .unwrap()
        .edges()
        .iter()
        .map(|e| e.weight)
        .max()
        .unwrap();
    assert_eq!(max_weight, 4);

    assert_eq!(build_graph(&records, &fields, max_weight + 1).unwrap().edge_count(), 0);
}

#[test]
fn test_scenario_empty_records() {
    let graph = build_graph(&[], &["Diseases Included"], 1).unwrap();

    assert_eq!(graph.node_count(), 0);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(compute_layout(&graph, 42), Err(GraphError::EmptyGraph));
    assert_eq!(graph_statistics(&graph), Err(GraphError::EmptyGraph));
}

#[test]
fn test_edge_weights_match_recomputed_intersections() {
    let fields = ["Diseases Included", "Data Modalities"];
    let records = cohort();
    let graph = build_graph(&records, &fields, 1).unwrap();

    for i in 0..records.len() {
        for j in (i + 1)..records.len() {
            let expected = shared_count(&records[i], &records[j], &fields);
            let actual = graph
                .edge_between(NodeId::from(i), NodeId::from(j))
                .map(|e| e.weight)
                .unwrap_or(0);
            assert_eq!(actual, expected, "pair ({}, {})", i, j);
        }
    }
}

#[test]
fn test_graph_is_simple() {
    let graph = build_graph(&cohort(), &["Diseases Included", "Data Modalities"], 1).unwrap();
    let mut pairs = HashSet::new();

    for edge in graph.edges() {
        assert_ne!(edge.source, edge.target);
        assert!(edge.weight >= 1);
        assert!(pairs.insert((edge.source, edge.target)));
        let listed: usize = edge.shared.iter().map(|s| s.values.len()).sum();
        assert_eq!(listed as u32, edge.weight);
    }
}

#[test]
fn test_higher_threshold_gives_edge_subset() {
    let fields = ["Diseases Included", "Data Modalities"];
    let records = cohort();
    let edge_set = |min| -> HashSet<(NodeId, NodeId)> {
        build_graph(&records, &fields, min)
            .unwrap()
            .edges()
            .iter()
            .map(|e| (e.source, e.target))
            .collect()
    };

    for min in 1..5 {
        assert!(edge_set(min + 1).is_subset(&edge_set(min)));
    }
}

#[test]
fn test_layout_determinism() {
    let graph = build_graph(&cohort(), &["Diseases Included", "Data Modalities"], 1).unwrap();
    let a = compute_layout(&graph, 42).unwrap();
    let b = compute_layout(&graph, 42).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.len(), graph.node_count());
    assert!(a.iter().all(|(_, (x, y))| x.is_finite() && y.is_finite()));
}

#[test]
fn test_build_is_deterministic() {
    let fields = ["Diseases Included", "Data Modalities"];
    let records = cohort();
    let first = build_graph(&records, &fields, 1).unwrap();
    let second = build_graph(&records, &fields, 1).unwrap();

    assert_eq!(first.nodes(), second.nodes());
    assert_eq!(first.edges(), second.edges());
    // Inputs are left untouched
    assert_eq!(records, cohort());
}

#[test]
fn test_edge_list_round_trip() {
    let graph = build_graph(&cohort(), &["Diseases Included", "Data Modalities"], 1).unwrap();
    let matrix = export_adjacency_matrix(&graph);
    let rebuilt = graph_from_edge_list(&matrix.labels, &export_edge_list(&graph)).unwrap();

    assert_eq!(export_adjacency_matrix(&rebuilt), matrix);
    assert_eq!(rebuilt.edges().len(), graph.edges().len());
    for (a, b) in rebuilt.edges().iter().zip(graph.edges()) {
        assert_eq!((a.source, a.target, a.weight), (b.source, b.target, b.weight));
        assert_eq!(a.shared, b.shared);
    }
}

const CODE_REPOS_TSV: &str = "Repository Link\tLanguages\n\
https://github.com/org-a/pipeline\tPython\n\
https://github.com/org-b/pipeline\tPython\n\
https://github.com/org-c/viewer\tPython, R\n";

#[test]
fn test_round_trip_with_colliding_repository_names() {
    let records = parse_table(EntityKind::CodeRepos, CODE_REPOS_TSV.as_bytes()).unwrap().into_records();
    let graph = GraphBuilder::new(&["Languages"]).kind(EntityKind::CodeRepos).build(&records).unwrap();

    let labels: Vec<&str> = graph.nodes().iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["pipeline", "pipeline", "viewer"]);
    assert_eq!(graph.edge_count(), 3);

    let matrix = export_adjacency_matrix(&graph);
    assert_eq!(matrix.labels, vec!["pipeline", "pipeline (2)", "viewer"]);
    let rebuilt = graph_from_edge_list(&matrix.labels, &export_edge_list(&graph)).unwrap();
    assert_eq!(export_adjacency_matrix(&rebuilt), matrix);
}

#[test]
fn test_statistics_on_cohort() {
    let graph = build_graph(&cohort(), &["Diseases Included", "Data Modalities"], 1).unwrap();
    let stats = graph_statistics(&graph).unwrap();

    assert_eq!(stats.node_count, 5);
    // ALS-TDI shares nothing
    assert_eq!(stats.component_count, 2);
    assert_eq!(stats.top_connected[0].label, "ADNI");
    assert_eq!(stats.top_connected.last().map(|c| c.degree), Some(0));
}

const DATASETS_TSV: &str = "Study Name\tAbbreviation\tDiseases Included\tData Modalities\n\
Alzheimer's Disease Neuroimaging Initiative\tADNI\tAlzheimer's Disease; MCI\t[imaging, genetic] MRI; PET; GWAS\n\
Australian Imaging Biomarkers and Lifestyle\tAIBL\tAlzheimer’s Disease\t[imaging] MRI; PET\n\
Parkinson's Progression Markers Initiative\tPPMI\tParkinson's Disease\t[imaging] MRI; DaTscan\n";

#[test]
fn test_catalog_pipeline_from_tables() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = CatalogConfig::default();
    config.data.tables_dir = dir.path().to_path_buf();
    std::fs::write(dir.path().join(config.data.file_for(EntityKind::Datasets)), DATASETS_TSV).unwrap();

    let catalog = Catalog::new(config);
    let built = catalog.build(&GraphRequest::new(EntityKind::Datasets)).unwrap();

    assert_eq!(built.graph.node_count(), 3);
    assert_eq!(built.dropped, 0);
    // Curly apostrophe is unified at load time, so ADNI and AIBL share the disease
    let edge = built.graph.edge_between(NodeId(0), NodeId(1)).unwrap();
    assert_eq!(edge.weight, 3);
    assert_eq!(
        edge.shared_summary(),
        "Diseases Included: Alzheimer's Disease; Data Modalities: MRI, PET"
    );
    assert_eq!(built.layout.as_ref().map(|l| l.len()), Some(3));

    // Served from the cache until invalidated
    assert_eq!(catalog.cache().len(), 1);
    let (_, is_stale) = catalog.cache().get(EntityKind::Datasets).unwrap();
    assert!(!is_stale);
    catalog.invalidate();
    assert!(catalog.cache().is_empty());

    let filtered = catalog
        .build(&GraphRequest::new(EntityKind::Datasets).filter(FilterSpec::new().any_of("Coarse Data Types", ["genetic"])))
        .unwrap();
    assert_eq!(filtered.graph.node_count(), 1);
    assert_eq!(filtered.graph.nodes()[0].label, "Alzheimer's Disease Neuroimaging Initiative");
}
