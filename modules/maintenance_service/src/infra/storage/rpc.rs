//! Stored function calls
//!
//! The reporting and lookup views live in Postgres functions. Each call is
//! a `SELECT * FROM <function>(p_name => $n, ...)` whose result columns are
//! read into a `FromQueryResult` row and mapped onto a contract model.

use crate::contract::{
    EquipmentTypeDetail, HistoryEntry, ItemJobCount, JobPartUsage, LocationDetail, NoteComment,
    NoteSummary, PartForType, Permission, ReportPeriod, ServicedItem, TechnicianJob,
};
use crate::domain::repository::ReportRepository;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement, Value};
use std::sync::Arc;
use uuid::Uuid;

/// `SELECT * FROM f(p_a => $1, p_b => $2)`
fn function_sql(function: &str, params: &[&str]) -> String {
    let params = params
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} => ${}", name, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT * FROM {}({})", function, params)
}

/// Run a stored function with named arguments and read every row
async fn call<R: FromQueryResult>(
    db: &DatabaseConnection,
    function: &str,
    args: Vec<(&str, Value)>,
) -> Result<Vec<R>> {
    let names: Vec<&str> = args.iter().map(|(name, _)| *name).collect();
    let sql = function_sql(function, &names);
    let values = args.into_iter().map(|(_, value)| value);
    let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, values);

    tracing::debug!(function, "calling stored function");
    let rows = R::find_by_statement(stmt)
        .all(db)
        .await
        .map_err(|e| anyhow::anyhow!("{} failed: {}", function, e))?;
    Ok(rows)
}

fn period_args(period: ReportPeriod) -> Vec<(&'static str, Value)> {
    vec![
        ("p_startdate", period.start.into()),
        ("p_enddate", period.end.into()),
    ]
}

// ===== Lookup Views =====

#[derive(Debug, FromQueryResult)]
struct EquipmentTypeRow {
    typeid: i32,
    categoryid: i32,
    category: String,
    description: String,
    isactive: bool,
}

/// `get_allequipmenttypes()`
pub async fn all_equipment_types(db: &DatabaseConnection) -> Result<Vec<EquipmentTypeDetail>> {
    let rows: Vec<EquipmentTypeRow> = call(db, "get_allequipmenttypes", vec![]).await?;
    Ok(rows
        .into_iter()
        .map(|r| EquipmentTypeDetail {
            type_id: r.typeid,
            category_id: r.categoryid,
            category: r.category,
            description: r.description,
            is_active: r.isactive,
        })
        .collect())
}

#[derive(Debug, FromQueryResult)]
struct ShaftRow {
    shaftid: i32,
    mineid: i32,
    mine: String,
    description: String,
    isactive: bool,
}

#[derive(Debug, FromQueryResult)]
struct SectionRow {
    sectionid: i32,
    shaftid: i32,
    shaft: String,
    mineid: i32,
    mine: String,
    description: String,
    isactive: bool,
}

#[derive(Debug, FromQueryResult)]
struct GangRow {
    gangid: i32,
    sectionid: i32,
    section: String,
    shaftid: i32,
    shaft: String,
    mineid: i32,
    mine: String,
    description: String,
    isactive: bool,
}

/// `get_allshafts()`
pub async fn all_shafts(db: &DatabaseConnection) -> Result<Vec<LocationDetail>> {
    let rows: Vec<ShaftRow> = call(db, "get_allshafts", vec![]).await?;
    Ok(rows
        .into_iter()
        .map(|r| LocationDetail {
            id: r.shaftid,
            description: r.description,
            is_active: r.isactive,
            mine_id: r.mineid,
            mine: r.mine,
            shaft_id: None,
            shaft: None,
            section_id: None,
            section: None,
        })
        .collect())
}

/// `get_allsections()`
pub async fn all_sections(db: &DatabaseConnection) -> Result<Vec<LocationDetail>> {
    let rows: Vec<SectionRow> = call(db, "get_allsections", vec![]).await?;
    Ok(rows
        .into_iter()
        .map(|r| LocationDetail {
            id: r.sectionid,
            description: r.description,
            is_active: r.isactive,
            mine_id: r.mineid,
            mine: r.mine,
            shaft_id: Some(r.shaftid),
            shaft: Some(r.shaft),
            section_id: None,
            section: None,
        })
        .collect())
}

/// `get_allgangs()`
pub async fn all_gangs(db: &DatabaseConnection) -> Result<Vec<LocationDetail>> {
    let rows: Vec<GangRow> = call(db, "get_allgangs", vec![]).await?;
    Ok(rows
        .into_iter()
        .map(|r| LocationDetail {
            id: r.gangid,
            description: r.description,
            is_active: r.isactive,
            mine_id: r.mineid,
            mine: r.mine,
            shaft_id: Some(r.shaftid),
            shaft: Some(r.shaft),
            section_id: Some(r.sectionid),
            section: Some(r.section),
        })
        .collect())
}

#[derive(Debug, FromQueryResult)]
struct PartForTypeRow {
    partspertypeid: i32,
    typeid: i32,
    partid: i32,
    partno: String,
    description: String,
}

/// `get_partspertype(p_typeid)`
pub async fn parts_per_type(db: &DatabaseConnection, type_id: i32) -> Result<Vec<PartForType>> {
    let rows: Vec<PartForTypeRow> =
        call(db, "get_partspertype", vec![("p_typeid", type_id.into())]).await?;
    Ok(rows
        .into_iter()
        .map(|r| PartForType {
            id: r.partspertypeid,
            type_id: r.typeid,
            part_id: r.partid,
            part_no: r.partno,
            part_description: r.description,
        })
        .collect())
}

// ===== Notes =====

#[derive(Debug, FromQueryResult)]
struct NoteRow {
    noteid: i32,
    itemid: i32,
    serialno: String,
    notedate: NaiveDate,
    note: String,
    commentcount: i64,
}

impl From<NoteRow> for NoteSummary {
    fn from(r: NoteRow) -> Self {
        Self {
            id: r.noteid,
            item_id: r.itemid,
            serial_no: r.serialno,
            note_date: r.notedate,
            note: r.note,
            comment_count: r.commentcount,
        }
    }
}

/// `get_allnotes()`
pub async fn all_notes(db: &DatabaseConnection) -> Result<Vec<NoteSummary>> {
    let rows: Vec<NoteRow> = call(db, "get_allnotes", vec![]).await?;
    Ok(rows.into_iter().map(NoteSummary::from).collect())
}

/// `get_noteslikeserialno(p_serialno)`
pub async fn notes_like_serial(db: &DatabaseConnection, serial_no: &str) -> Result<Vec<NoteSummary>> {
    let rows: Vec<NoteRow> = call(
        db,
        "get_noteslikeserialno",
        vec![("p_serialno", serial_no.into())],
    )
    .await?;
    Ok(rows.into_iter().map(NoteSummary::from).collect())
}

#[derive(Debug, FromQueryResult)]
struct CommentRow {
    commentid: i32,
    noteid: i32,
    comment: String,
    commentdate: DateTime<Utc>,
    createdby: Option<Uuid>,
}

/// `get_commentsbynoteid(p_noteid)`
pub async fn comments_by_note(db: &DatabaseConnection, note_id: i32) -> Result<Vec<NoteComment>> {
    let rows: Vec<CommentRow> =
        call(db, "get_commentsbynoteid", vec![("p_noteid", note_id.into())]).await?;
    Ok(rows
        .into_iter()
        .map(|r| NoteComment {
            id: r.commentid,
            note_id: r.noteid,
            comment: r.comment,
            comment_date: r.commentdate,
            created_by: r.createdby,
        })
        .collect())
}

// ===== Access =====

#[derive(Debug, FromQueryResult)]
struct PermissionRow {
    functionid: i32,
    description: String,
}

/// `get_permissions_by_user(p_userid)`
pub async fn permissions_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Permission>> {
    let rows: Vec<PermissionRow> = call(
        db,
        "get_permissions_by_user",
        vec![("p_userid", user_id.into())],
    )
    .await?;
    Ok(rows
        .into_iter()
        .map(|r| Permission {
            function_id: r.functionid,
            description: r.description,
        })
        .collect())
}

// ===== Reports =====

#[derive(Debug, FromQueryResult)]
struct ServicedRow {
    itemid: i32,
    serialno: String,
    category: String,
    typeid: i32,
    equipmenttype: String,
    lastservicedate: Option<NaiveDate>,
    servicecount: i64,
}

#[derive(Debug, FromQueryResult)]
struct JobWithPartsRow {
    jobid: i32,
    jobdate: NaiveDate,
    itemid: i32,
    serialno: String,
    typeid: i32,
    equipmenttype: String,
    mineid: i32,
    mine: String,
    shaftid: i32,
    shaft: String,
    sectionid: i32,
    section: String,
    gangid: i32,
    gang: String,
    technician: String,
    partno: Option<String>,
    partdescription: Option<String>,
    quantity: Option<i32>,
}

#[derive(Debug, FromQueryResult)]
struct TechnicianJobRow {
    technicianid: i32,
    technician: String,
    jobid: i32,
    jobdate: NaiveDate,
    jobtype: String,
    serialno: String,
    typeid: i32,
    equipmenttype: String,
    mineid: i32,
    shaftid: i32,
    sectionid: i32,
    gangid: i32,
}

#[derive(Debug, FromQueryResult)]
struct JobCountRow {
    itemid: i32,
    serialno: String,
    category: String,
    typeid: i32,
    equipmenttype: String,
    jobcount: i64,
}

#[derive(Debug, FromQueryResult)]
struct HistoryRow {
    jobid: i32,
    jobdate: NaiveDate,
    jobtype: String,
    technician: String,
    gang: String,
    partno: Option<String>,
    partdescription: Option<String>,
    quantity: Option<i32>,
    remarks: Option<String>,
}

pub struct SeaOrmReportRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmReportRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportRepository for SeaOrmReportRepository {
    async fn serviced_list(&self, period: ReportPeriod) -> Result<Vec<ServicedItem>> {
        let rows: Vec<ServicedRow> =
            call(&self.db, "get_servicedlist", period_args(period)).await?;
        Ok(rows
            .into_iter()
            .map(|r| ServicedItem {
                item_id: r.itemid,
                serial_no: r.serialno,
                category: r.category,
                type_id: r.typeid,
                equipment_type: r.equipmenttype,
                last_service_date: r.lastservicedate,
                service_count: r.servicecount,
            })
            .collect())
    }

    async fn jobs_with_parts(&self, period: ReportPeriod) -> Result<Vec<JobPartUsage>> {
        let rows: Vec<JobWithPartsRow> =
            call(&self.db, "jobswithparts", period_args(period)).await?;
        Ok(rows
            .into_iter()
            .map(|r| JobPartUsage {
                job_id: r.jobid,
                job_date: r.jobdate,
                item_id: r.itemid,
                serial_no: r.serialno,
                type_id: r.typeid,
                equipment_type: r.equipmenttype,
                mine_id: r.mineid,
                mine: r.mine,
                shaft_id: r.shaftid,
                shaft: r.shaft,
                section_id: r.sectionid,
                section: r.section,
                gang_id: r.gangid,
                gang: r.gang,
                technician: r.technician,
                part_no: r.partno,
                part_description: r.partdescription,
                // jobs without parts come back with a null quantity
                quantity: r.quantity.unwrap_or(0),
            })
            .collect())
    }

    async fn jobs_per_technician(&self, period: ReportPeriod) -> Result<Vec<TechnicianJob>> {
        let rows: Vec<TechnicianJobRow> =
            call(&self.db, "get_jobspertechnician", period_args(period)).await?;
        Ok(rows
            .into_iter()
            .map(|r| TechnicianJob {
                technician_id: r.technicianid,
                technician: r.technician,
                job_id: r.jobid,
                job_date: r.jobdate,
                job_type: r.jobtype,
                serial_no: r.serialno,
                type_id: r.typeid,
                equipment_type: r.equipmenttype,
                mine_id: r.mineid,
                shaft_id: r.shaftid,
                section_id: r.sectionid,
                gang_id: r.gangid,
            })
            .collect())
    }

    async fn job_count_per_item(&self, period: ReportPeriod) -> Result<Vec<ItemJobCount>> {
        let rows: Vec<JobCountRow> =
            call(&self.db, "get_jobcountper_item", period_args(period)).await?;
        Ok(rows
            .into_iter()
            .map(|r| ItemJobCount {
                item_id: r.itemid,
                serial_no: r.serialno,
                category: r.category,
                type_id: r.typeid,
                equipment_type: r.equipmenttype,
                job_count: r.jobcount,
            })
            .collect())
    }

    async fn individual_history(&self, item_id: i32) -> Result<Vec<HistoryEntry>> {
        let rows: Vec<HistoryRow> =
            call(&self.db, "rpt_indivhistory", vec![("p_itemid", item_id.into())]).await?;
        Ok(rows
            .into_iter()
            .map(|r| HistoryEntry {
                job_id: r.jobid,
                job_date: r.jobdate,
                job_type: r.jobtype,
                technician: r.technician,
                gang: r.gang,
                part_no: r.partno,
                part_description: r.partdescription,
                quantity: r.quantity,
                remarks: r.remarks,
            })
            .collect())
    }
}
