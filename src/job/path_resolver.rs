//! # Path Resolution Module
//!
//! Calcola il path del file di output di un job.
//! Funzione pura: nessun accesso al filesystem, `output_dir` non viene verificata.

use std::path::{Path, PathBuf};

/// Utility per calcolare il path di output di un job
pub struct PathResolver;

impl PathResolver {
    /// Calcola il path di output.
    ///
    /// Con un nome esplicito non vuoto il risultato è `output_dir/<nome>`,
    /// altrimenti `output_dir/<stem>_compressed_q<quality><ext>`.
    pub fn resolve(
        input_path: &Path,
        output_dir: &Path,
        quality: u8,
        explicit_name: Option<&str>,
    ) -> PathBuf {
        match explicit_name.filter(|name| !name.trim().is_empty()) {
            Some(name) => output_dir.join(name),
            None => output_dir.join(Self::default_filename(input_path, quality)),
        }
    }

    /// Nome di default: lo stem e l'estensione vengono separati all'ultimo punto
    pub fn default_filename(input_path: &Path, quality: u8) -> String {
        let base = input_path
            .file_name()
            .map(Path::new)
            .unwrap_or_else(|| Path::new(""));

        let stem = base.file_stem().unwrap_or_default().to_string_lossy();
        let ext = base
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        format!("{}_compressed_q{}{}", stem, quality, ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name() {
        let out = PathResolver::resolve(Path::new("/in/report.pdf"), Path::new("/out"), 40, None);
        assert_eq!(out, PathBuf::from("/out/report_compressed_q40.pdf"));
    }

    #[test]
    fn test_explicit_name_ignores_quality_and_stem() {
        let out = PathResolver::resolve(
            Path::new("/in/report.pdf"),
            Path::new("/out"),
            40,
            Some("x.pdf"),
        );
        assert_eq!(out, PathBuf::from("/out/x.pdf"));
    }

    #[test]
    fn test_blank_explicit_name_falls_back_to_default() {
        let out = PathResolver::resolve(Path::new("scan.pdf"), Path::new("/out"), 15, Some("  "));
        assert_eq!(out, PathBuf::from("/out/scan_compressed_q15.pdf"));
    }

    #[test]
    fn test_splits_at_last_dot() {
        assert_eq!(
            PathResolver::default_filename(Path::new("/a/scan.v2.PDF"), 50),
            "scan.v2_compressed_q50.PDF"
        );
        assert_eq!(
            PathResolver::default_filename(Path::new("/a/noext"), 30),
            "noext_compressed_q30"
        );
        assert_eq!(
            PathResolver::default_filename(Path::new("/a/.hidden"), 30),
            ".hidden_compressed_q30"
        );
    }

    #[test]
    fn test_output_dir_is_not_touched() {
        let out = PathResolver::resolve(
            Path::new("doc.pdf"),
            Path::new("/definitely/not/there"),
            20,
            None,
        );
        assert_eq!(out, PathBuf::from("/definitely/not/there/doc_compressed_q20.pdf"));
    }
}
