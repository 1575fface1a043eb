//! Linker map parsing
//!
//! Builds a [`SymbolTable`] from a GNU ld style map file produced with
//! `-ffunction-sections`, where every function lives in its own
//! `.text.<name>` input section:
//!
//! ```text
//!  .text.arm_cfft_f32
//!                 0x08001234       0x9c ./Source/arm_cfft_f32.o
//! ```
//!
//! Long section names push the address/size pair onto the next line, so the
//! header and the size line are matched independently.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

static SECTION_HEADER_RE: OnceLock<Regex> = OnceLock::new();
static ADDRESS_SIZE_RE: OnceLock<Regex> = OnceLock::new();

fn section_header_re() -> &'static Regex {
    SECTION_HEADER_RE.get_or_init(|| {
        // SAFETY: static pattern, validated by the unit tests below.
        Regex::new(r"^\s*\.text\.(\S+)").expect("section header regex is valid")
    })
}

fn address_size_re() -> &'static Regex {
    ADDRESS_SIZE_RE.get_or_init(|| {
        // SAFETY: static pattern, validated by the unit tests below.
        Regex::new(r"^\s*0x([0-9a-fA-F]+)\s+0x([0-9a-fA-F]+)").expect("address/size regex is valid")
    })
}

/// Address and size of a single function section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Function name as it appears after `.text.`
    pub name: String,
    /// Load address
    pub address: u64,
    /// Own size in bytes
    pub size: u64,
}

/// Function name to [`FunctionRecord`] mapping
///
/// Immutable once built. A name that occurs twice in the map keeps the
/// record of its last occurrence.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    records: HashMap<String, FunctionRecord>,
}

impl SymbolTable {
    /// Look up a function record
    pub fn get(&self, name: &str) -> Option<&FunctionRecord> {
        self.records.get(name)
    }

    /// Own size of `name`, or 0 when the map has no entry for it
    pub fn size_of(&self, name: &str) -> u64 {
        self.records.get(name).map_or(0, |record| record.size)
    }

    /// Whether the map had a size entry for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Number of functions with a size entry
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no function record was parsed
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.records.values()
    }

    fn insert(&mut self, record: FunctionRecord) {
        self.records.insert(record.name.clone(), record);
    }
}

impl FromIterator<FunctionRecord> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = FunctionRecord>>(iter: I) -> Self {
        let mut table = SymbolTable::default();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

/// Map scanner state: whether a section header is waiting for its size line
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    Idle,
    Pending(String),
}

/// Incremental map scanner
///
/// Feed lines one at a time with [`MapScanner::feed`]; each call returns the
/// record completed by that line, if any.
#[derive(Debug)]
pub struct MapScanner {
    state: ScanState,
}

impl Default for MapScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl MapScanner {
    /// Create a scanner with no pending section
    pub fn new() -> Self {
        Self {
            state: ScanState::Idle,
        }
    }

    /// Consume one line of map text
    pub fn feed(&mut self, line: &str) -> Option<FunctionRecord> {
        if let Some(caps) = section_header_re().captures(line) {
            // A header without a size line is dropped when the next header arrives
            self.state = ScanState::Pending(caps[1].to_string());
            return None;
        }

        let caps = address_size_re().captures(line)?;
        let ScanState::Pending(name) = &self.state else {
            return None;
        };

        let address = u64::from_str_radix(&caps[1], 16).ok()?;
        let size = u64::from_str_radix(&caps[2], 16).ok()?;

        let record = FunctionRecord {
            name: name.clone(),
            address,
            size,
        };
        self.state = ScanState::Idle;
        Some(record)
    }
}

/// Parse linker map text into a [`SymbolTable`]
///
/// Lines that are neither a `.text.<name>` header nor an address/size pair are
/// ignored, so arbitrary map content can be passed in whole.
///
/// # Examples
///
/// ```
/// use fn_footprint::analyzer::symbols::build_symbol_table;
///
/// let map = " .text.main\n                0x08000100       0x2c main.o\n";
/// let table = build_symbol_table(map);
///
/// assert_eq!(table.size_of("main"), 0x2c);
/// assert_eq!(table.get("main").unwrap().address, 0x0800_0100);
/// ```
pub fn build_symbol_table(text: &str) -> SymbolTable {
    let mut scanner = MapScanner::new();
    text.lines().filter_map(|line| scanner.feed(line)).collect()
}
