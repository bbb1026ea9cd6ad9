//! Employee roster loaded once per session from a spreadsheet or CSV file.
//!
//! The roster is an owned, immutable value. Matching code only ever borrows it.

mod table;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, instrument};

/// Sheet the workbook loader reads when none is configured.
pub const DEFAULT_SHEET: &str = "DATA";

/// Placeholder shown for absent fields when records are presented.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Roster file `{0}` not found")]
    FileNotFound(PathBuf),
    #[error("Sheet '{0}' not found in workbook, rename the sheet to '{0}'")]
    SheetNotFound(String),
    #[error("Roster is missing required columns: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("Roster table has no header row")]
    MissingHeader,
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Required columns, in the order they are presented to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Nip,
    Name,
    FunctionalTitle,
    StructuralTitle,
    Grade,
    Rank,
    PositionDate,
    GradeDate,
    Email,
    Phone,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Nip,
        Column::Name,
        Column::FunctionalTitle,
        Column::StructuralTitle,
        Column::Grade,
        Column::Rank,
        Column::PositionDate,
        Column::GradeDate,
        Column::Email,
        Column::Phone,
    ];

    /// Header text the column carries in the source table.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Column::Nip => "NIP",
            Column::Name => "Nama",
            Column::FunctionalTitle => "Jabatan Fungsional Tertentu",
            Column::StructuralTitle => "Jabatan Struktural",
            Column::Grade => "Golongan Pegawai Saat Ini",
            Column::Rank => "Pangkat Pegawai Saat Ini",
            Column::PositionDate => "TMT Jabatan",
            Column::GradeDate => "TMT Golongan Saat Ini",
            Column::Email => "Email",
            Column::Phone => "No HP",
        }
    }
}

/// One employee row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub nip: String,
    pub name: Option<String>,
    pub functional_title: Option<String>,
    pub structural_title: Option<String>,
    pub grade: Option<String>,
    pub rank: Option<String>,
    pub position_date: Option<String>,
    pub grade_date: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Record {
    #[must_use]
    pub fn get(&self, column: Column) -> Option<&str> {
        match column {
            Column::Nip => Some(self.nip.as_str()).filter(|s| !s.is_empty()),
            Column::Name => self.name.as_deref(),
            Column::FunctionalTitle => self.functional_title.as_deref(),
            Column::StructuralTitle => self.structural_title.as_deref(),
            Column::Grade => self.grade.as_deref(),
            Column::Rank => self.rank.as_deref(),
            Column::PositionDate => self.position_date.as_deref(),
            Column::GradeDate => self.grade_date.as_deref(),
            Column::Email => self.email.as_deref(),
            Column::Phone => self.phone.as_deref(),
        }
    }

    /// Field value, or [`PLACEHOLDER`] when absent.
    #[must_use]
    pub fn display(&self, column: Column) -> &str {
        self.get(column).unwrap_or(PLACEHOLDER)
    }

    fn set(&mut self, column: Column, value: Option<String>) {
        match column {
            Column::Nip => self.nip = value.unwrap_or_default(),
            Column::Name => self.name = value,
            Column::FunctionalTitle => self.functional_title = value,
            Column::StructuralTitle => self.structural_title = value,
            Column::Grade => self.grade = value,
            Column::Rank => self.rank = value,
            Column::PositionDate => self.position_date = value,
            Column::GradeDate => self.grade_date = value,
            Column::Email => self.email = value,
            Column::Phone => self.phone = value,
        }
    }
}

/// Ordered, immutable collection of [`Record`]s.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<Record>,
    // NIPs with every whitespace character removed, index-aligned with `records`
    nip_keys: Vec<String>,
}

impl Roster {
    /// Load the roster from `path`.
    ///
    /// `.csv` files are read as plain CSV, anything else is opened as a workbook
    /// and `sheet` is read from it.
    ///
    /// # Errors
    /// Fails when the file, the sheet or any required column is missing, or when
    /// the file can't be parsed.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), sheet = %sheet))]
    pub fn load(path: impl AsRef<Path>, sheet: &str) -> Result<Self, RosterError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RosterError::FileNotFound(path.to_path_buf()));
        }
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        let (headers, rows) = if is_csv {
            table::read_csv(path)?
        } else {
            table::read_workbook(path, sheet)?
        };
        let roster = Self::from_table(&headers, rows)?;
        info!(records = roster.len(), "Roster loaded");
        Ok(roster)
    }

    /// Build a roster from a header row and raw cells.
    ///
    /// Cells are cleaned the same way the file loaders clean them. Rows where
    /// every required column is empty are skipped.
    ///
    /// # Errors
    /// Returns [`RosterError::MissingColumns`] listing every required header not
    /// present in `headers`.
    pub fn from_table<H, R, C>(headers: &[H], rows: R) -> Result<Self, RosterError>
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<Option<C>>>,
        C: AsRef<str>,
    {
        let headers: Vec<String> = headers
            .iter()
            .map(|h| table::clean_cell(h.as_ref()).unwrap_or_default())
            .collect();

        let mut positions = Vec::with_capacity(Column::ALL.len());
        let mut missing = Vec::new();
        for column in Column::ALL {
            match headers.iter().position(|h| h == column.header()) {
                Some(idx) => positions.push((column, idx)),
                None => missing.push(column.header().to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(RosterError::MissingColumns(missing));
        }

        let mut records = Vec::new();
        for row in rows {
            let mut record = Record::default();
            let mut any = false;
            for &(column, idx) in &positions {
                let value = row
                    .get(idx)
                    .and_then(Option::as_ref)
                    .and_then(|c| table::clean_cell(c.as_ref()));
                any |= value.is_some();
                record.set(column, value);
            }
            if any {
                records.push(record);
            }
        }
        Ok(Self::from_records(records))
    }

    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        let nip_keys = records
            .iter()
            .map(|r| r.nip.chars().filter(|c| !c.is_whitespace()).collect())
            .collect();
        Self { records, nip_keys }
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Record> {
        self.records.get(idx)
    }

    /// Whitespace-stripped NIPs, aligned with [`Roster::records`].
    pub(crate) fn nip_keys(&self) -> &[String] {
        &self.nip_keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn headers() -> Vec<&'static str> {
        Column::ALL.iter().map(|c| c.header()).collect()
    }

    const CSV_HEADER: &str = "NIP,Nama,Jabatan Fungsional Tertentu,Jabatan Struktural,Golongan Pegawai Saat Ini,Pangkat Pegawai Saat Ini,TMT Jabatan,TMT Golongan Saat Ini,Email,No HP";

    #[test]
    fn test_from_table_reports_every_missing_column() {
        let result = Roster::from_table(&["NIP", "Nama", "Email"], Vec::<Vec<Option<&str>>>::new());
        let Err(RosterError::MissingColumns(missing)) = result else {
            panic!("expected missing columns error");
        };
        assert_eq!(missing.len(), 7);
        assert!(missing.contains(&"No HP".to_string()));
        assert!(missing.contains(&"Jabatan Struktural".to_string()));
        assert!(!missing.contains(&"NIP".to_string()));
    }

    #[test]
    fn test_from_table_cleans_cells_and_ignores_extra_columns() {
        let mut header = vec!["Unit"];
        header.extend(headers());
        let row = vec![
            Some("Bagian Umum"),
            Some(" 0012345678 "),
            Some("Restu\u{a0}Wibowo"),
            None,
            Some(""),
            Some("III/a"),
            Some("Penata Muda"),
            None,
            None,
            Some("restu@example.go.id"),
            None,
        ];
        let roster = Roster::from_table(&header, vec![row]).unwrap();
        assert_eq!(roster.len(), 1);
        let record = &roster.records()[0];
        assert_eq!(record.nip, "0012345678");
        assert_eq!(record.name.as_deref(), Some("Restu Wibowo"));
        assert_eq!(record.structural_title, None);
        assert_eq!(record.display(Column::FunctionalTitle), PLACEHOLDER);
        assert_eq!(record.display(Column::Grade), "III/a");
    }

    #[test]
    fn test_from_table_skips_blank_rows() {
        let blank: Vec<Option<&str>> = vec![None; 10];
        let mut named: Vec<Option<&str>> = vec![None; 10];
        named[1] = Some("Tanpa NIP");
        let roster = Roster::from_table(&headers(), vec![blank, named]).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.records()[0].nip, "");
        assert_eq!(roster.records()[0].display(Column::Nip), PLACEHOLDER);
    }

    #[test]
    fn test_nip_keys_strip_whitespace() {
        let roster = Roster::from_records(vec![Record {
            nip: "19900101 202003 1 001".to_string(),
            ..Default::default()
        }]);
        assert_eq!(roster.nip_keys(), ["199001012020031001".to_string()]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Roster::load(dir.path().join("kepegawaian.xlsx"), DEFAULT_SHEET);
        assert!(matches!(result, Err(RosterError::FileNotFound(_))));
    }

    #[test]
    fn test_load_csv_keeps_leading_zeros() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{CSV_HEADER}").unwrap();
        writeln!(
            file,
            "001990010120200310,Restu Wibowo,Analis Kebijakan,,III/b,Penata Muda Tk. I,2021-01-01,2020-04-01,restu@example.go.id,0812"
        )
        .unwrap();
        writeln!(file, ",,,,,,,,,").unwrap();

        let roster = Roster::load(file.path(), DEFAULT_SHEET).unwrap();
        assert_eq!(roster.len(), 1);
        let record = &roster.records()[0];
        assert_eq!(record.nip, "001990010120200310");
        assert_eq!(record.structural_title, None);
        assert_eq!(record.phone.as_deref(), Some("0812"));
    }

    #[test]
    fn test_load_csv_missing_column() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "NIP,Nama").unwrap();
        writeln!(file, "123,Someone").unwrap();
        let result = Roster::load(file.path(), DEFAULT_SHEET);
        assert!(matches!(result, Err(RosterError::MissingColumns(cols)) if cols.len() == 8));
    }

    fn workbook_fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/roster.xlsx")
    }

    #[test]
    fn test_load_workbook_data_sheet() {
        let roster = Roster::load(workbook_fixture(), DEFAULT_SHEET).unwrap();
        assert_eq!(roster.len(), 2);

        let restu = &roster.records()[0];
        assert_eq!(restu.nip, "19800101");
        assert_eq!(restu.name.as_deref(), Some("Restu Wibowo"));
        assert_eq!(restu.structural_title, None);
        assert_eq!(restu.position_date.as_deref(), Some("2021-01-01"));
        assert_eq!(restu.grade_date.as_deref(), Some("2019-04-01"));
        assert_eq!(restu.phone.as_deref(), Some("81234567890"));

        let siti = &roster.records()[1];
        assert_eq!(siti.nip, "0012345678");
        assert_eq!(siti.position_date.as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn test_load_workbook_missing_sheet() {
        let result = Roster::load(workbook_fixture(), "Pegawai");
        assert!(matches!(result, Err(RosterError::SheetNotFound(name)) if name == "Pegawai"));
    }

    #[test]
    fn test_load_rejects_non_workbook() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(file, "definitely not a zip archive").unwrap();
        let result = Roster::load(file.path(), DEFAULT_SHEET);
        assert!(matches!(result, Err(RosterError::Workbook(_))));
    }
}
