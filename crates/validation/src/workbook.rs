use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Workbook path is not a directory: {0}")]
    NotADirectory(String),

    #[error("I/O error reading workbook: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error in section '{section}': {source}")]
    Csv {
        section: String,
        #[source]
        source: csv::Error,
    },
}

/// One named section (sheet) of an upload: a header row plus raw string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawSection {
    /// Parse CSV text with a header row.
    pub fn parse_csv(name: &str, csv_data: &str) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let to_load_error = |source| LoadError::Csv {
            section: name.to_string(),
            source,
        };

        let headers = reader
            .headers()
            .map_err(to_load_error)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(to_load_error)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    /// Load a standalone CSV file, named after its file stem.
    pub fn from_csv_file(path: &Path) -> Result<Self, LoadError> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string();
        let contents = fs::read_to_string(path)?;
        Self::parse_csv(&name, &contents)
    }

    /// Exact header match after trimming.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(column)).map(String::as_str)
    }
}

/// A set of named sections, the in-memory shape of an uploaded workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawWorkbook {
    sections: Vec<RawSection>,
}

impl RawWorkbook {
    pub fn new(sections: Vec<RawSection>) -> Self {
        Self { sections }
    }

    pub fn section(&self, name: &str) -> Option<&RawSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Load every `*.csv` file in `dir` as a section named after the file stem,
    /// so `Fund Info.csv` becomes the "Fund Info" section.
    pub fn from_dir(dir: &Path) -> Result<Self, LoadError> {
        if !dir.is_dir() {
            return Err(LoadError::NotADirectory(dir.display().to_string()));
        }

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut sections = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!("Skipping workbook file with non UTF-8 name: {}", path.display());
                continue;
            };
            let contents = fs::read_to_string(&path)?;
            sections.push(RawSection::parse_csv(name, &contents)?);
        }

        let workbook = Self::new(sections);
        tracing::debug!(
            "Loaded workbook {} with sections {:?}",
            dir.display(),
            workbook.section_names()
        );

        Ok(workbook)
    }
}
