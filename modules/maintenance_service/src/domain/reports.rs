//! Report layouts: columns, grouping levels and summed value of every
//! report screen, and the conversion of grouped lines into a `ReportTable`

use super::filter::{FilterSubject, LocationIds};
use super::grouping::{group_with_subtotals, GroupLevel, ReportLine};
use crate::contract::{HistoryEntry, ItemJobCount, JobPartUsage, ServicedItem, TechnicianJob};
use crate::export::{Cell, ReportTable, RowKind, TableRow};

/// How a report's rows are shown and subtotalled
pub struct ReportLayout<T> {
    pub title: &'static str,
    /// File name stem for exports
    pub slug: &'static str,
    pub headers: &'static [&'static str],
    pub levels: Vec<GroupLevel<'static, T>>,
    pub value: fn(&T) -> i64,
    /// Column receiving subtotal and grand total values
    pub value_column: usize,
    pub cells: fn(&T) -> Vec<Cell>,
}

impl<T> ReportLayout<T> {
    /// Group `rows` and render them into a table
    pub fn build(&self, rows: Vec<T>, title: String, filter_labels: Vec<String>) -> ReportTable {
        let lines = group_with_subtotals(rows, &self.levels, self.value);
        let rows = lines.into_iter().map(|line| self.render_line(line)).collect();
        ReportTable {
            title,
            filter_labels,
            headers: self.headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    fn render_line(&self, line: ReportLine<T>) -> TableRow {
        match line {
            ReportLine::Detail(row) => TableRow {
                kind: RowKind::Detail,
                cells: (self.cells)(&row),
            },
            ReportLine::Subtotal {
                depth,
                label,
                key,
                total,
                ..
            } => TableRow {
                kind: RowKind::Subtotal { depth },
                cells: self.total_cells(format!("Total {}: {}", label, key), total),
            },
            ReportLine::GrandTotal { total, .. } => TableRow {
                kind: RowKind::GrandTotal,
                cells: self.total_cells("Grand Total".to_string(), total),
            },
        }
    }

    fn total_cells(&self, caption: String, total: i64) -> Vec<Cell> {
        let mut cells = vec![Cell::Empty; self.headers.len()];
        if let Some(first) = cells.first_mut() {
            *first = Cell::Text(caption);
        }
        if let Some(value) = cells.get_mut(self.value_column) {
            *value = Cell::Integer(total);
        }
        cells
    }
}

/// Parts used per job, grouped by mine and shaft
pub fn services_done_layout() -> ReportLayout<JobPartUsage> {
    ReportLayout {
        title: "Services Done",
        slug: "services_done",
        headers: &[
            "Date",
            "Job",
            "Serial No",
            "Equipment Type",
            "Section",
            "Gang",
            "Technician",
            "Part No",
            "Part",
            "Qty",
        ],
        levels: vec![
            GroupLevel::new("Mine", |r: &JobPartUsage| r.mine.clone()),
            GroupLevel::new("Shaft", |r: &JobPartUsage| r.shaft.clone()),
        ],
        value: |r| r.quantity.into(),
        value_column: 9,
        cells: |r| {
            vec![
                r.job_date.into(),
                r.job_id.into(),
                r.serial_no.as_str().into(),
                r.equipment_type.as_str().into(),
                r.section.as_str().into(),
                r.gang.as_str().into(),
                r.technician.as_str().into(),
                r.part_no.clone().into(),
                r.part_description.clone().into(),
                r.quantity.into(),
            ]
        },
    }
}

/// Serviced items, grouped by category and type
pub fn service_list_layout() -> ReportLayout<ServicedItem> {
    ReportLayout {
        title: "Service List",
        slug: "service_list",
        headers: &["Serial No", "Category", "Equipment Type", "Last Service", "Services"],
        levels: vec![
            GroupLevel::new("Category", |r: &ServicedItem| r.category.clone()),
            GroupLevel::new("Equipment Type", |r: &ServicedItem| r.equipment_type.clone()),
        ],
        value: |r| r.service_count,
        value_column: 4,
        cells: |r| {
            vec![
                r.serial_no.as_str().into(),
                r.category.as_str().into(),
                r.equipment_type.as_str().into(),
                r.last_service_date.into(),
                r.service_count.into(),
            ]
        },
    }
}

/// Jobs per technician; every job counts once
pub fn jobs_per_technician_layout() -> ReportLayout<TechnicianJob> {
    ReportLayout {
        title: "Jobs per Technician",
        slug: "jobs_per_technician",
        headers: &["Date", "Job", "Serial No", "Equipment Type", "Job Type", "Jobs"],
        levels: vec![GroupLevel::new("Technician", |r: &TechnicianJob| {
            r.technician.clone()
        })],
        value: |_| 1,
        value_column: 5,
        cells: |r| {
            vec![
                r.job_date.into(),
                r.job_id.into(),
                r.serial_no.as_str().into(),
                r.equipment_type.as_str().into(),
                r.job_type.as_str().into(),
                Cell::Integer(1),
            ]
        },
    }
}

/// Job count per item, grouped by category and type
pub fn job_count_layout() -> ReportLayout<ItemJobCount> {
    ReportLayout {
        title: "Job Count per Item",
        slug: "job_count",
        headers: &["Serial No", "Category", "Equipment Type", "Jobs"],
        levels: vec![
            GroupLevel::new("Category", |r: &ItemJobCount| r.category.clone()),
            GroupLevel::new("Equipment Type", |r: &ItemJobCount| r.equipment_type.clone()),
        ],
        value: |r| r.job_count,
        value_column: 3,
        cells: |r| {
            vec![
                r.serial_no.as_str().into(),
                r.category.as_str().into(),
                r.equipment_type.as_str().into(),
                r.job_count.into(),
            ]
        },
    }
}

/// Full history of one item; ungrouped, grand total of parts used
pub fn individual_history_layout() -> ReportLayout<HistoryEntry> {
    ReportLayout {
        title: "Individual History",
        slug: "individual_history",
        headers: &[
            "Date",
            "Job",
            "Job Type",
            "Technician",
            "Gang",
            "Part No",
            "Part",
            "Qty",
            "Remarks",
        ],
        levels: Vec::new(),
        value: |r| r.quantity.map_or(0, i64::from),
        value_column: 7,
        cells: |r| {
            vec![
                r.job_date.into(),
                r.job_id.into(),
                r.job_type.as_str().into(),
                r.technician.as_str().into(),
                r.gang.as_str().into(),
                r.part_no.clone().into(),
                r.part_description.clone().into(),
                r.quantity.into(),
                r.remarks.clone().into(),
            ]
        },
    }
}

impl FilterSubject for JobPartUsage {
    const HAS_LOCATION: bool = true;

    fn equipment_type_id(&self) -> Option<i32> {
        Some(self.type_id)
    }

    fn location(&self) -> Option<LocationIds> {
        Some(LocationIds {
            mine_id: self.mine_id,
            shaft_id: self.shaft_id,
            section_id: self.section_id,
            gang_id: self.gang_id,
        })
    }
}

impl FilterSubject for TechnicianJob {
    const HAS_LOCATION: bool = true;

    fn equipment_type_id(&self) -> Option<i32> {
        Some(self.type_id)
    }

    fn location(&self) -> Option<LocationIds> {
        Some(LocationIds {
            mine_id: self.mine_id,
            shaft_id: self.shaft_id,
            section_id: self.section_id,
            gang_id: self.gang_id,
        })
    }
}

impl FilterSubject for ServicedItem {
    fn equipment_type_id(&self) -> Option<i32> {
        Some(self.type_id)
    }
}

impl FilterSubject for ItemJobCount {
    fn equipment_type_id(&self) -> Option<i32> {
        Some(self.type_id)
    }
}
