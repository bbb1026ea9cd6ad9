//! Context block assembly and prompt construction.
//!
//! Matched records become a CSV table tagged `[Excel]`, each selected passage
//! a block tagged `[Web]`. Blocks are joined with a `---` rule; when nothing
//! matched the block is [`EMPTY_CONTEXT`].

use crate::roster::{Column, Record};
use crate::selector::Passage;

/// Context used when neither the roster nor the pages produced anything.
pub const EMPTY_CONTEXT: &str = "(KONTEKS KOSONG)";

/// Answer shown when the model returns nothing, and the phrase the model is
/// told to use when the context is insufficient.
pub const NO_DATA: &str = "data tidak tersedia";

pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";
pub const ROSTER_TAG: &str = "Sumber: [Excel]";
pub const WEB_TAG: &str = "Sumber: [Web]";

pub const SYSTEM_PROMPT: &str = "Kamu asisten kepegawaian PSEKP yang ramah dan profesional.\n\
- Gaya bahasa alami seperti mengetik manual.\n\
- Jawaban harus berdasarkan konteks (Excel dan Website) yang diberikan.\n\
- Jika banyak pegawai, tampilkan daftar berpoin dengan tag [Excel].\n\
- Tambahkan penanda sumber di akhir kalimat: [Excel] atau [Web].\n\
- Jika data tidak memadai, jawab 'data tidak tersedia'.\n\
- Jangan tampilkan URL/domain.";

/// Words that mark a question about the organisation rather than its staff.
pub const ORG_KEYWORDS: &[&str] = &[
    "tugas",
    "fungsi",
    "tupoksi",
    "struktur",
    "organisasi",
    "visi",
    "misi",
    "layanan",
    "sejarah",
    "profil",
    "mandat",
    "peran",
    "kewenangan",
    "kebijakan",
];

#[must_use]
pub fn is_org_question(query: &str) -> bool {
    let lowered = query.to_lowercase();
    ORG_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Which prompt variant a context calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMode {
    /// Roster rows are part of the context
    Roster,
    /// Only web passages (or nothing) back the answer
    Website,
}

impl ContextMode {
    #[must_use]
    pub fn temperature(self) -> f64 {
        match self {
            ContextMode::Roster => 0.35,
            ContextMode::Website => 0.4,
        }
    }

    fn instructions(self) -> &'static str {
        match self {
            ContextMode::Roster => {
                "Gunakan gaya bahasa alami seperti mengetik manual.\n\
                 Jika banyak pegawai, tampilkan semua sebagai daftar berpoin."
            }
            ContextMode::Website => "Jawablah dengan bahasa alami dan berdasarkan konteks Website.",
        }
    }
}

/// Assembled context for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub block: String,
    pub mode: ContextMode,
    /// Roster rows included in the block
    pub records: usize,
    pub passages: Vec<Passage>,
}

impl Context {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.block == EMPTY_CONTEXT
    }

    /// Prompt sent as the user message.
    #[must_use]
    pub fn user_prompt(&self, query: &str) -> String {
        format!(
            "{}\n\nKONTEKS:\n{}\n\nPERTANYAAN:\n{}",
            self.mode.instructions(),
            self.block,
            query
        )
    }
}

/// Serialize records as CSV with the required column headers, `-` for absent
/// fields, at most `limit` rows.
///
/// # Errors
/// Only fails if the CSV writer does.
pub fn records_csv(records: &[&Record], limit: usize) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(Column::ALL.iter().map(|c| c.header()))?;
    for record in records.iter().take(limit) {
        writer.write_record(Column::ALL.iter().map(|&c| record.display(c)))?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Build the context block for `query` from already-selected records and
/// passages.
///
/// Organisation questions leave the roster out even when rows matched.
///
/// # Errors
/// See [`records_csv`].
pub fn assemble(
    query: &str,
    records: &[&Record],
    passages: Vec<Passage>,
    max_rows: usize,
) -> Result<Context, csv::Error> {
    let use_roster = !records.is_empty() && max_rows > 0 && !is_org_question(query);

    let mut blocks = Vec::with_capacity(passages.len() + 1);
    let mut included = 0;
    if use_roster {
        blocks.push(format!("{ROSTER_TAG}\n{}", records_csv(records, max_rows)?));
        included = records.len().min(max_rows);
    }
    blocks.extend(passages.iter().map(|p| format!("{WEB_TAG}\n{}", p.text)));

    let block = if blocks.is_empty() {
        EMPTY_CONTEXT.to_string()
    } else {
        blocks.join(BLOCK_SEPARATOR)
    };
    Ok(Context {
        block,
        mode: if use_roster {
            ContextMode::Roster
        } else {
            ContextMode::Website
        },
        records: included,
        passages,
    })
}
