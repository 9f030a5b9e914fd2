//! Data module - archive extraction, table loading and cleaning

mod archive;
mod loader;
mod processor;

pub use archive::{ArchiveError, ArchiveMember, ArchiveReader};
pub use loader::{wine_columns, LoaderError, TableLoader, CLASS_COLUMN, FEATURE_COLUMNS};
pub use processor::{DataProcessor, ProcessorError};

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use zip::write::FileOptions;
    use zip::{CompressionMethod, ZipWriter};

    /// First rows of each class from the wine data file.
    pub const WINE_SAMPLE: &str = "\
1,14.23,1.71,2.43,15.6,127,2.8,3.06,.28,2.29,5.64,1.04,3.92,1065
1,13.2,1.78,2.14,11.2,100,2.65,2.76,.26,1.28,4.38,1.05,3.4,1050
1,13.16,2.36,2.67,18.6,101,2.8,3.24,.3,2.81,5.68,1.03,3.17,1185
2,12.37,.94,1.36,10.6,88,1.98,.57,.28,.42,1.95,1.05,1.82,520
2,12.33,1.1,2.28,16,101,2.05,1.09,.63,.41,3.27,1.25,1.67,680
3,12.86,1.35,2.32,18,122,1.51,1.25,.21,.94,4.1,.76,1.29,630
3,12.88,2.99,2.4,20,104,1.3,1.22,.24,.83,5.4,.74,1.42,530
";

    /// Deterministic rows with the real class split (59 / 71 / 48 for 178 rows).
    pub fn synthetic_wine_data(rows: usize) -> String {
        let mut out = String::new();
        for i in 0..rows {
            let class = match i {
                0..=58 => 1,
                59..=129 => 2,
                _ => 3,
            };
            let alcohol = 11.0 + (i % 40) as f64 * 0.1;
            let features: Vec<String> = (0..13)
                .map(|j| format!("{:.2}", alcohol + j as f64 * 0.5))
                .collect();
            out.push_str(&format!("{},{}\n", class, features.join(",")));
        }
        out
    }

    pub fn write_zip(dir: &Path, name: &str, members: &[(&str, &[u8])]) -> PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for (member, bytes) in members {
            zip.start_file(*member, options).unwrap();
            zip.write_all(bytes).unwrap();
        }
        zip.finish().unwrap();
        path
    }
}
