//! Loading result CSVs into a temporary SQLite file.

use std::path::{Path, PathBuf};
use genelink_db::{load_csv, Database, DbError, LoadSummary, StoredGene, TableCounts};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const HEADER: &str =
    "HGNC ID,Gene Symbol,HGNC Gene Name,Gene Aliases,hg38 Coordinates,hg19 Coordinates,Disease\r\n";

fn write_csv(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut body = HEADER.to_string();
    for row in rows {
        body.push_str(row);
        body.push_str("\r\n");
    }
    std::fs::write(&path, body).unwrap();
    path
}

async fn open(dir: &TempDir) -> Database {
    let db = Database::open(dir.path().join("genes.db")).await.unwrap();
    db.initialize().await.unwrap();
    db
}

#[tokio::test]
async fn test_load_result_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "genes.csv", &[
        "HGNC:9644,PTPN11,protein tyrosine phosphatase non-receptor type 11,BPTP3; SHP2,chr12:112418351-112509913,chr12:112856155-112947717,\"LEOPARD syndrome, type 1; Noonan syndrome\"",
        "HGNC:6990,MECP2,methyl-CpG binding protein 2,,chrX:154021573-154137103,,Rett syndrome",
    ]);

    let db = open(&dir).await;
    let summary = load_csv(&db, &csv).await.unwrap();
    assert_eq!(summary, LoadSummary { genes: 2, aliases: 2, diseases: 3 });

    assert_eq!(
        db.gene(6990).await.unwrap(),
        Some(StoredGene {
            hgnc_id: 6990,
            symbol: "MECP2".into(),
            name: Some("methyl-CpG binding protein 2".into()),
            coord_hg38: Some("chrX:154021573-154137103".into()),
            coord_hg19: None,
        })
    );
    assert_eq!(db.aliases(9644).await.unwrap(), vec!["BPTP3", "SHP2"]);
    assert_eq!(
        db.diseases(9644).await.unwrap(),
        vec!["LEOPARD syndrome, type 1", "Noonan syndrome"]
    );
    assert!(db.aliases(6990).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reload_replaces_aliases_and_diseases() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_csv(dir.path(), "first.csv", &[
        "HGNC:11998,TP53,tumor protein p53,LFS1; p53,chr17:7661779-7687538,,Li-Fraumeni syndrome; breast cancer",
    ]);
    let second = write_csv(dir.path(), "second.csv", &[
        "HGNC:11998,TP53,tumor protein p53,p53,chr17:7661779-7687538,chr17:7565097-7590856,Li-Fraumeni syndrome",
    ]);

    let db = open(&dir).await;
    load_csv(&db, &first).await.unwrap();
    load_csv(&db, &second).await.unwrap();

    assert_eq!(db.counts().await.unwrap(), TableCounts { genes: 1, aliases: 1, diseases: 1 });
    assert_eq!(db.aliases(11998).await.unwrap(), vec!["p53"]);
    assert_eq!(db.diseases(11998).await.unwrap(), vec!["Li-Fraumeni syndrome"]);
    let gene = db.gene(11998).await.unwrap().unwrap();
    assert_eq!(gene.coord_hg19.as_deref(), Some("chr17:7565097-7590856"));
}

#[tokio::test]
async fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;
    let missing = dir.path().join("nope.csv");

    let err = load_csv(&db, &missing).await.unwrap_err();
    assert!(matches!(err, DbError::InputNotFound(_)));
    assert_eq!(err.to_string(), format!("Input file '{}' not found", missing.display()));
}

#[tokio::test]
async fn test_unreadable_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "Symbol,Other\r\nTP53,x\r\n").unwrap();

    let db = open(&dir).await;
    let err = load_csv(&db, &path).await.unwrap_err();
    assert!(err.to_string().starts_with("Error reading CSV file:"));
}

#[tokio::test]
async fn test_bad_row_rolls_back_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "genes.csv", &[
        "HGNC:9644,PTPN11,protein tyrosine phosphatase non-receptor type 11,SHP2,,,Noonan syndrome",
        "not-an-id,KRAS,KRAS proto-oncogene,,,,Costello syndrome",
    ]);

    let db = open(&dir).await;
    let err = load_csv(&db, &csv).await.unwrap_err();
    assert!(matches!(err, DbError::InvalidHgncId(id) if id == "not-an-id"));
    assert_eq!(db.counts().await.unwrap(), TableCounts::default());
}
