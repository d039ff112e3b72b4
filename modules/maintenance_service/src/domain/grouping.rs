//! Hierarchical grouping with subtotals for report grids
//!
//! Rows are partitioned by one or more key columns (first-appearance order),
//! each partition is followed by its subtotal line, and the output ends with
//! a single grand total.

use indexmap::IndexMap;

/// One grouping column
pub struct GroupLevel<'a, T> {
    /// Column caption, e.g. "Mine"
    pub label: &'static str,
    key: Box<dyn Fn(&T) -> String + Send + Sync + 'a>,
}

impl<'a, T> GroupLevel<'a, T> {
    pub fn new(label: &'static str, key: impl Fn(&T) -> String + Send + Sync + 'a) -> Self {
        Self {
            label,
            key: Box::new(key),
        }
    }

    pub fn key(&self, row: &T) -> String {
        (self.key)(row)
    }
}

/// A line of a grouped report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine<T> {
    Detail(T),
    Subtotal {
        /// 0 for the outermost level
        depth: usize,
        label: &'static str,
        key: String,
        total: i64,
        count: usize,
    },
    GrandTotal {
        total: i64,
        count: usize,
    },
}

impl<T> ReportLine<T> {
    pub fn is_detail(&self) -> bool {
        matches!(self, Self::Detail(_))
    }
}

/// Partition `rows` by `levels`, interleaving subtotal lines
///
/// `value` extracts the summed quantity of a row.
pub fn group_with_subtotals<T, F>(
    rows: Vec<T>,
    levels: &[GroupLevel<'_, T>],
    value: F,
) -> Vec<ReportLine<T>>
where
    F: Fn(&T) -> i64,
{
    let mut out = Vec::with_capacity(rows.len() + 1);
    let (total, count) = emit(rows, levels, 0, &value, &mut out);
    out.push(ReportLine::GrandTotal { total, count });
    out
}

fn emit<T, F>(
    rows: Vec<T>,
    levels: &[GroupLevel<'_, T>],
    depth: usize,
    value: &F,
    out: &mut Vec<ReportLine<T>>,
) -> (i64, usize)
where
    F: Fn(&T) -> i64,
{
    let Some(level) = levels.get(depth) else {
        let total = rows.iter().map(value).sum();
        let count = rows.len();
        out.extend(rows.into_iter().map(ReportLine::Detail));
        return (total, count);
    };

    let mut groups: IndexMap<String, Vec<T>> = IndexMap::new();
    for row in rows {
        groups.entry(level.key(&row)).or_default().push(row);
    }

    let mut total = 0;
    let mut count = 0;
    for (key, members) in groups {
        let (group_total, group_count) = emit(members, levels, depth + 1, value, out);
        out.push(ReportLine::Subtotal {
            depth,
            label: level.label,
            key,
            total: group_total,
            count: group_count,
        });
        total += group_total;
        count += group_count;
    }
    (total, count)
}
