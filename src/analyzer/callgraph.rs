//! Disassembly parsing
//!
//! Builds a [`CallGraph`] from `objdump -d` style listings:
//!
//! ```text
//! 08000244 <arm_cfft_f32>:
//!  8000244:	b570      	push	{r4, r5, r6, lr}
//!  800024e:	f000 f8a1 	bl	8000394 <arm_bitreversal_32>
//! ```
//!
//! Only direct calls whose target is printed as `<name>` are recorded.
//! Which instructions count as calls is controlled by [`CallMnemonics`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use crate::error::FootprintError;

static BLOCK_HEADER_RE: OnceLock<Regex> = OnceLock::new();

fn block_header_re() -> &'static Regex {
    BLOCK_HEADER_RE.get_or_init(|| {
        // SAFETY: static pattern, validated by the unit tests below.
        Regex::new(r"^\s*([0-9a-fA-F]+) <([\w$@.]+)>:").expect("block header regex is valid")
    })
}

/// Named mnemonic set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallPreset {
    /// Calls that save a return address: `call`/`callq`, `bl`, `blx`
    #[default]
    Linked,
    /// Linked calls plus the unconditional branches `b` and `b.w`,
    /// which Thumb compilers emit for tail calls
    TailCalls,
}

impl CallPreset {
    /// Mnemonics recognized by this preset
    pub fn mnemonics(self) -> &'static [&'static str] {
        match self {
            CallPreset::Linked => &["call", "callq", "bl", "blx"],
            CallPreset::TailCalls => &["call", "callq", "bl", "blx", "b", "b.w"],
        }
    }
}

impl fmt::Display for CallPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallPreset::Linked => f.write_str("linked"),
            CallPreset::TailCalls => f.write_str("tail-calls"),
        }
    }
}

/// Set of instruction mnemonics treated as direct calls
///
/// # Examples
///
/// ```
/// use fn_footprint::analyzer::callgraph::CallMnemonics;
///
/// let linked = CallMnemonics::linked();
/// assert!(linked.contains("bl"));
/// assert!(!linked.contains("b.w"));
///
/// let tail = CallMnemonics::with_tail_calls();
/// assert!(tail.contains("b.w"));
/// ```
#[derive(Debug, Clone)]
pub struct CallMnemonics {
    names: BTreeSet<String>,
    call_re: Option<Regex>,
}

impl CallMnemonics {
    /// Calls that save a return address
    pub fn linked() -> Self {
        Self::from_preset(CallPreset::Linked)
    }

    /// Linked calls plus unconditional branches used as tail calls
    pub fn with_tail_calls() -> Self {
        Self::from_preset(CallPreset::TailCalls)
    }

    /// Mnemonics of a named preset
    pub fn from_preset(preset: CallPreset) -> Self {
        let names = preset.mnemonics().iter().map(|m| m.to_string()).collect();
        Self::from_names(names)
    }

    /// User-defined mnemonic set
    ///
    /// Every mnemonic must be a single non-empty token. An empty iterator is
    /// accepted and yields a graph without edges.
    pub fn custom<I, S>(mnemonics: I) -> Result<Self, FootprintError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = BTreeSet::new();
        for mnemonic in mnemonics {
            names.insert(validate_mnemonic(mnemonic.as_ref())?);
        }
        Ok(Self::from_names(names))
    }

    /// Return a copy extended with additional mnemonics
    pub fn extended<I, S>(&self, extra: I) -> Result<Self, FootprintError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = self.names.clone();
        for mnemonic in extra {
            names.insert(validate_mnemonic(mnemonic.as_ref())?);
        }
        Ok(Self::from_names(names))
    }

    /// Whether `mnemonic` is in the set
    pub fn contains(&self, mnemonic: &str) -> bool {
        self.names.contains(mnemonic)
    }

    /// Mnemonics in lexical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Extract the call target from an instruction line
    ///
    /// The target is the last `<name>` on the line following a recognized
    /// mnemonic, which matches objdump's `bl 8000394 <target>` layout.
    pub fn call_target<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.call_re
            .as_ref()?
            .captures(line)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str())
    }

    fn from_names(names: BTreeSet<String>) -> Self {
        let call_re = build_call_regex(&names);
        Self { names, call_re }
    }
}

impl Default for CallMnemonics {
    fn default() -> Self {
        Self::linked()
    }
}

impl PartialEq for CallMnemonics {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for CallMnemonics {}

fn validate_mnemonic(mnemonic: &str) -> Result<String, FootprintError> {
    let trimmed = mnemonic.trim();
    let malformed = trimmed.is_empty()
        || trimmed.chars().any(char::is_whitespace)
        || trimmed.contains(['<', '>']);
    if malformed {
        return Err(FootprintError::InvalidMnemonic {
            mnemonic: mnemonic.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn build_call_regex(names: &BTreeSet<String>) -> Option<Regex> {
    // An empty alternation would match every line
    if names.is_empty() {
        return None;
    }

    // Longest first so `blx` is tried before `bl` and `b.w` before `b`
    let mut sorted: Vec<&String> = names.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = sorted
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"\b({})\b.*<([\w$@.]+)>", alternation);

    // SAFETY: every alternative is regex-escaped and validated as a single token
    Some(Regex::new(&pattern).expect("escaped call regex is valid"))
}

/// Directed call graph: caller name to distinct callee names
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    edges: HashMap<String, HashSet<String>>,
    observed: HashSet<String>,
}

impl CallGraph {
    /// Callees of `caller`, if it makes any recorded call
    pub fn callees(&self, caller: &str) -> Option<&HashSet<String>> {
        self.edges.get(caller)
    }

    /// Whether `caller` has at least one recorded callee
    pub fn has_callees(&self, caller: &str) -> bool {
        self.edges.contains_key(caller)
    }

    /// Whether the disassembly mentioned `name` as a function block or call target
    pub fn is_observed(&self, name: &str) -> bool {
        self.observed.contains(name)
    }

    /// Number of callers with at least one callee
    pub fn caller_count(&self) -> usize {
        self.edges.len()
    }

    /// Total number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(HashSet::len).sum()
    }

    /// Number of distinct function names seen in the disassembly
    pub fn function_count(&self) -> usize {
        self.observed.len()
    }

    /// Record a function block without edges
    pub fn add_function(&mut self, name: &str) {
        if !self.observed.contains(name) {
            self.observed.insert(name.to_string());
        }
    }

    /// Record a call edge; duplicates collapse
    pub fn add_edge(&mut self, caller: &str, callee: &str) {
        self.add_function(caller);
        self.add_function(callee);
        self.edges
            .entry(caller.to_string())
            .or_default()
            .insert(callee.to_string());
    }
}

impl<C, E> FromIterator<(C, E)> for CallGraph
where
    C: AsRef<str>,
    E: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (C, E)>>(iter: I) -> Self {
        let mut graph = CallGraph::default();
        for (caller, callee) in iter {
            graph.add_edge(caller.as_ref(), callee.as_ref());
        }
        graph
    }
}

/// Parse disassembly text into a [`CallGraph`]
///
/// # Examples
///
/// ```
/// use fn_footprint::analyzer::callgraph::{build_call_graph, CallMnemonics};
///
/// let listing = "\
/// 08000244 <main>:
///  8000246:\tf000 f8a1 \tbl\t8000394 <init>
/// ";
/// let graph = build_call_graph(listing, &CallMnemonics::linked());
///
/// assert!(graph.callees("main").unwrap().contains("init"));
/// ```
pub fn build_call_graph(text: &str, mnemonics: &CallMnemonics) -> CallGraph {
    let mut graph = CallGraph::default();
    let mut current: Option<&str> = None;

    for line in text.lines() {
        if let Some(caps) = block_header_re().captures(line) {
            if let Some(name) = caps.get(2) {
                graph.add_function(name.as_str());
                current = Some(name.as_str());
            }
            continue;
        }

        let Some(caller) = current else {
            continue;
        };

        if let Some(callee) = mnemonics.call_target(line) {
            graph.add_edge(caller, callee);
        }
    }

    graph
}
