//! CSV output of enriched gene records. Rows end in CRLF as per RFC 4180.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use genelink_common::{GeneInfo, Result, GENE_INFO_HEADERS};
use tracing::info;

/// Write the header row and one row per gene to `writer`.
pub fn write_rows<W: Write>(genes: &[GeneInfo], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    wtr.write_record(GENE_INFO_HEADERS)?;
    for gene in genes {
        wtr.write_record([
            &gene.hgnc_id,
            &gene.gene_symbol,
            &gene.gene_name,
            &gene.gene_aliases,
            &gene.coord_hg38,
            &gene.coord_hg19,
            &gene.disease,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `genes` to a CSV file at `path`, replacing any existing file.
pub fn write_csv(genes: &[GeneInfo], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_rows(genes, file)?;
    info!(path = %path.display(), rows = genes.len(), "Wrote gene CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_and_quoting() {
        let gene = GeneInfo {
            hgnc_id: "HGNC:9644".into(),
            gene_symbol: "PTPN11".into(),
            gene_name: "protein tyrosine phosphatase non-receptor type 11".into(),
            gene_aliases: "BPTP3; SHP2".into(),
            coord_hg38: "chr12:112418351-112509913".into(),
            coord_hg19: String::new(),
            disease: "LEOPARD syndrome, type 1; Noonan syndrome".into(),
        };
        let mut buf = Vec::new();
        write_rows(&[gene], &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert_eq!(
            out,
            "HGNC ID,Gene Symbol,HGNC Gene Name,Gene Aliases,hg38 Coordinates,hg19 Coordinates,Disease\r\n\
             HGNC:9644,PTPN11,protein tyrosine phosphatase non-receptor type 11,BPTP3; SHP2,\
             chr12:112418351-112509913,,\"LEOPARD syndrome, type 1; Noonan syndrome\"\r\n"
        );
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&[], &path).unwrap();
        let out = std::fs::read_to_string(&path).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("HGNC ID,"));
    }
}
