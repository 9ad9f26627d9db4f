//! End-to-end integration test over a synthetic two-file PAF directory.
//! The first sample's file mirrors scenario S2 (two targets bridged by one
//! query); the second sample contributes an unrelated, disjoint pair, so the
//! test also exercises ingestion across multiple files in one directory.

use scafflinker::config::PipelineConfig;
use scafflinker::io::writer::{write_scaffolds, OutputFormat};
use scafflinker::pipeline::scaffold::ScaffoldType;
use scafflinker::pipeline::{driver, ingest};
use scafflinker::utils::intern::Interner;
use std::io::Write;

fn write_paf(dir: &std::path::Path, name: &str, lines: &[&str]) {
    let mut f = std::fs::File::create(dir.join(name)).unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
}

#[test]
fn two_file_directory_bridges_one_cluster_and_scaffolds_another() {
    let dir = tempfile::tempdir().unwrap();
    write_paf(
        dir.path(),
        "run_sampleA.paf",
        &[
            "qA\t200000\t0\t80000\t+\ttA\t100000\t10000\t90000\t80000\t84000\t60",
            "qA\t200000\t100000\t190000\t+\ttB\t120000\t20000\t110000\t80000\t84000\t60",
        ],
    );
    write_paf(
        dir.path(),
        "run_sampleB.paf",
        &["qC\t200000\t10000\t60000\t+\ttC\t180000\t5000\t55000\t50000\t51000\t60"],
    );

    let mut interner = Interner::new();
    let records = ingest::ingest(dir.path(), &mut interner).unwrap();
    assert_eq!(records.len(), 3);

    let config = PipelineConfig {
        nb_match_min: 10_000,
        id_seq_min: 0.80,
        ..PipelineConfig::for_tests()
    };
    let scaffolds = driver::run(&records, &interner, &config);
    assert_eq!(scaffolds.len(), 2);

    let bridged = scaffolds.iter().find(|s| s.len() == 3).expect("the sampleA cluster bridges tA and tB");
    assert_eq!(bridged[0].contig_name, "tA");
    assert_eq!(bridged[1].ty, ScaffoldType::Query);
    assert_eq!(bridged[2].contig_name, "tB");

    let single = scaffolds.iter().find(|s| s.len() == 1).expect("the sampleB cluster has no bridging partner");
    assert_eq!(single[0].contig_name, "tC");

    let mut out = Vec::new();
    write_scaffolds(&mut out, &scaffolds, OutputFormat::Tsv).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Contig_name\tStart\tEnd\treverse\tlen\tType\n"));
    assert_eq!(text.matches("Contig_name\tStart\tEnd\treverse\tlen\tType").count(), 2);
    // One blank line separates the two tables: header + 3 rows, blank, header + 1 row.
    assert_eq!(text.lines().count(), 7);
}
