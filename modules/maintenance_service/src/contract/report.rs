//! Report rows returned by the reporting RPC functions

use chrono::NaiveDate;

/// Inclusive date range passed as `p_startdate` / `p_enddate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// `get_servicedlist`: items serviced in the period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicedItem {
    pub item_id: i32,
    pub serial_no: String,
    pub category: String,
    pub type_id: i32,
    pub equipment_type: String,
    pub last_service_date: Option<NaiveDate>,
    pub service_count: i64,
}

/// `jobswithparts`: one row per part used on a job (part columns are empty
/// for jobs that consumed no parts)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPartUsage {
    pub job_id: i32,
    pub job_date: NaiveDate,
    pub item_id: i32,
    pub serial_no: String,
    pub type_id: i32,
    pub equipment_type: String,
    pub mine_id: i32,
    pub mine: String,
    pub shaft_id: i32,
    pub shaft: String,
    pub section_id: i32,
    pub section: String,
    pub gang_id: i32,
    pub gang: String,
    pub technician: String,
    pub part_no: Option<String>,
    pub part_description: Option<String>,
    pub quantity: i32,
}

/// `get_jobspertechnician`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicianJob {
    pub technician_id: i32,
    pub technician: String,
    pub job_id: i32,
    pub job_date: NaiveDate,
    pub job_type: String,
    pub serial_no: String,
    pub type_id: i32,
    pub equipment_type: String,
    pub mine_id: i32,
    pub shaft_id: i32,
    pub section_id: i32,
    pub gang_id: i32,
}

/// `get_jobcountper_item`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemJobCount {
    pub item_id: i32,
    pub serial_no: String,
    pub category: String,
    pub type_id: i32,
    pub equipment_type: String,
    pub job_count: i64,
}

/// `rpt_indivhistory`: service history of a single item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub job_id: i32,
    pub job_date: NaiveDate,
    pub job_type: String,
    pub technician: String,
    pub gang: String,
    pub part_no: Option<String>,
    pub part_description: Option<String>,
    pub quantity: Option<i32>,
    pub remarks: Option<String>,
}
