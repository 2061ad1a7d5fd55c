//! Input schema for aggregated profiling statistics.
//!
//! One record per profiled function: its own totals plus, for every
//! caller, the totals of that specific caller -> function edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a profiled callable unit
///
/// Ordering is lexicographic over (file, line, name) and is what makes
/// layouts deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId {
    /// Source file (or a pseudo-location for built-ins)
    pub file: String,

    /// First line of the definition
    #[serde(default)]
    pub line: u32,

    /// Function name as displayed in the graph
    pub name: String,
}

impl FunctionId {
    pub fn new(file: impl Into<String>, line: u32, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            name: name.into(),
        }
    }

    /// Stable `file:line:name` label, used for stacks and colour hashing
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.name)
    }
}

/// Aggregated call statistics for a function or a single call edge
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CallStat {
    /// Total number of calls
    #[serde(alias = "cc")]
    pub call_count: u64,

    /// Calls that were not recursive re-entries
    #[serde(alias = "nc")]
    pub primitive_call_count: u64,

    /// Time spent in the function itself
    #[serde(alias = "tt")]
    pub self_time: f64,

    /// Time spent in the function and everything it called
    #[serde(alias = "ct")]
    pub cumulative_time: f64,
}

impl CallStat {
    pub fn new(call_count: u64, primitive_call_count: u64, self_time: f64, cumulative_time: f64) -> Self {
        Self {
            call_count,
            primitive_call_count,
            self_time,
            cumulative_time,
        }
    }

    /// Multiply every field by `factor`
    ///
    /// Counts are rounded half-to-even; negative products saturate to zero.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            call_count: scale_count(self.call_count, factor),
            primitive_call_count: scale_count(self.primitive_call_count, factor),
            self_time: self.self_time * factor,
            cumulative_time: self.cumulative_time * factor,
        }
    }
}

fn scale_count(count: u64, factor: f64) -> u64 {
    (count as f64 * factor).round_ties_even().max(0.0) as u64
}

/// One caller of a function together with the stats of that edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallerStat {
    #[serde(flatten)]
    pub function: FunctionId,

    #[serde(flatten)]
    pub stat: CallStat,
}

/// Statistics for one profiled function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    #[serde(flatten)]
    pub function: FunctionId,

    #[serde(flatten)]
    pub stat: CallStat,

    /// Callers of this function; empty for entry points
    #[serde(default)]
    pub callers: Vec<CallerStat>,
}

impl FunctionRecord {
    pub fn new(function: FunctionId, stat: CallStat) -> Self {
        Self {
            function,
            stat,
            callers: Vec::new(),
        }
    }

    /// Add a caller edge (builder style, handy for constructing fixtures)
    pub fn called_by(mut self, caller: FunctionId, stat: CallStat) -> Self {
        self.callers.push(CallerStat {
            function: caller,
            stat,
        });
        self
    }
}

/// Statistics document as written by `--save-stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsFile {
    /// Schema version for compatibility checking
    pub version: String,

    pub functions: Vec<FunctionRecord>,
}
