//! In-memory repositories and a seeded mine for the integration tests
#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use maintenance_service::config::Config;
use maintenance_service::contract::*;
use maintenance_service::domain::repository::{
    AccessRepository, CatalogRepository, EquipmentItemRepository, JobReference, JobRepository,
    NoteRepository, PartRepository, ReportRepository, Repositories, TechnicianRepository,
};
use maintenance_service::domain::Service;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn march_2024() -> ReportPeriod {
    ReportPeriod {
        start: date(2024, 3, 1),
        end: date(2024, 3, 31),
    }
}

#[derive(Default)]
struct Tables {
    last_id: i32,
    catalog: HashMap<CatalogKind, BTreeMap<i32, CatalogEntry>>,
    items: BTreeMap<i32, EquipmentItem>,
    parts: BTreeMap<i32, Part>,
    /// partspertypeid -> (typeid, partid)
    part_links: BTreeMap<i32, (i32, i32)>,
    technicians: BTreeMap<i32, Technician>,
    jobs: BTreeMap<i32, Job>,
    job_parts: BTreeMap<i32, JobPart>,
    notes: BTreeMap<i32, Note>,
    comments: BTreeMap<i32, NoteComment>,
    users: BTreeMap<Uuid, User>,
    grants: BTreeMap<i32, UserFunction>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn entry(&self, kind: CatalogKind, id: i32) -> Option<&CatalogEntry> {
        self.catalog.get(&kind).and_then(|rows| rows.get(&id))
    }

    fn describe(&self, kind: CatalogKind, id: i32) -> String {
        self.entry(kind, id)
            .map(|e| e.description.clone())
            .unwrap_or_default()
    }

    fn parent_of(&self, kind: CatalogKind, id: i32) -> i32 {
        self.entry(kind, id)
            .and_then(|e| e.parent_id)
            .unwrap_or_default()
    }

    /// (mine, shaft, section) ids above a gang
    fn gang_ancestors(&self, gang_id: i32) -> (i32, i32, i32) {
        let section = self.parent_of(CatalogKind::Gang, gang_id);
        let shaft = self.parent_of(CatalogKind::Section, section);
        let mine = self.parent_of(CatalogKind::Shaft, shaft);
        (mine, shaft, section)
    }

    fn item_type(&self, item_id: i32) -> (i32, String, String) {
        let type_id = self.items.get(&item_id).map(|i| i.type_id).unwrap_or_default();
        let category_id = self.parent_of(CatalogKind::EquipmentType, type_id);
        (
            type_id,
            self.describe(CatalogKind::EquipmentType, type_id),
            self.describe(CatalogKind::EquipmentCategory, category_id),
        )
    }

    fn serial(&self, item_id: i32) -> String {
        self.items
            .get(&item_id)
            .map(|i| i.serial_no.clone())
            .unwrap_or_default()
    }

    fn technician_name(&self, id: i32) -> String {
        self.technicians
            .get(&id)
            .map(Technician::full_name)
            .unwrap_or_default()
    }

    fn jobs_in(&self, period: ReportPeriod) -> Vec<Job> {
        self.jobs
            .values()
            .filter(|j| period.contains(j.job_date))
            .cloned()
            .collect()
    }

    fn parts_of(&self, job_id: i32) -> Vec<JobPart> {
        self.job_parts
            .values()
            .filter(|p| p.job_id == job_id)
            .cloned()
            .collect()
    }
}

/// One store implementing every repository trait
#[derive(Clone, Default)]
pub struct MockDb {
    tables: Arc<RwLock<Tables>>,
    failing: Arc<RwLock<bool>>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            catalog: Arc::new(self.clone()),
            items: Arc::new(self.clone()),
            parts: Arc::new(self.clone()),
            technicians: Arc::new(self.clone()),
            jobs: Arc::new(self.clone()),
            notes: Arc::new(self.clone()),
            access: Arc::new(self.clone()),
            reports: Arc::new(self.clone()),
        }
    }

    /// Make every report query fail, as a lost connection would
    pub fn fail_reports(&self) {
        *self.failing.write() = true;
    }

    pub fn job_count(&self) -> usize {
        self.tables.read().jobs.len()
    }

    pub fn job_part_count(&self) -> usize {
        self.tables.read().job_parts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.tables.read().comments.len()
    }

    fn check_available(&self) -> Result<()> {
        if *self.failing.read() {
            bail!("connection reset by peer");
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for MockDb {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>> {
        let t = self.tables.read();
        Ok(t.catalog
            .get(&kind)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find(&self, kind: CatalogKind, id: i32) -> Result<Option<CatalogEntry>> {
        Ok(self.tables.read().entry(kind, id).cloned())
    }

    async fn create(&self, kind: CatalogKind, entry: &NewCatalogEntry) -> Result<CatalogEntry> {
        let mut t = self.tables.write();
        let id = t.next_id();
        let row = CatalogEntry {
            id,
            parent_id: entry.parent_id,
            description: entry.description.clone(),
            is_active: true,
        };
        t.catalog.entry(kind).or_default().insert(id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        kind: CatalogKind,
        id: i32,
        entry: &NewCatalogEntry,
    ) -> Result<CatalogEntry> {
        let mut t = self.tables.write();
        let row = t
            .catalog
            .get_mut(&kind)
            .and_then(|rows| rows.get_mut(&id))
            .ok_or_else(|| anyhow!("{} row {} missing", kind, id))?;
        row.parent_id = entry.parent_id;
        row.description = entry.description.clone();
        Ok(row.clone())
    }

    async fn set_active(&self, kind: CatalogKind, id: i32, is_active: bool) -> Result<()> {
        let mut t = self.tables.write();
        if let Some(row) = t.catalog.get_mut(&kind).and_then(|rows| rows.get_mut(&id)) {
            row.is_active = is_active;
        }
        Ok(())
    }

    async fn delete(&self, kind: CatalogKind, id: i32) -> Result<()> {
        let mut t = self.tables.write();
        if let Some(rows) = t.catalog.get_mut(&kind) {
            rows.remove(&id);
        }
        Ok(())
    }

    async fn equipment_types_detailed(&self) -> Result<Vec<EquipmentTypeDetail>> {
        let t = self.tables.read();
        let types = t.catalog.get(&CatalogKind::EquipmentType);
        Ok(types
            .into_iter()
            .flat_map(|rows| rows.values())
            .map(|e| {
                let category_id = e.parent_id.unwrap_or_default();
                EquipmentTypeDetail {
                    type_id: e.id,
                    category_id,
                    category: t.describe(CatalogKind::EquipmentCategory, category_id),
                    description: e.description.clone(),
                    is_active: e.is_active,
                }
            })
            .collect())
    }

    async fn locations_detailed(&self, level: CatalogKind) -> Result<Vec<LocationDetail>> {
        let t = self.tables.read();
        let rows: Vec<CatalogEntry> = t
            .catalog
            .get(&level)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default();
        let detail = |e: CatalogEntry| {
            let parent = e.parent_id.unwrap_or_default();
            let (mine_id, shaft_id, section_id) = match level {
                CatalogKind::Shaft => (parent, None, None),
                CatalogKind::Section => (t.parent_of(CatalogKind::Shaft, parent), Some(parent), None),
                _ => {
                    let shaft = t.parent_of(CatalogKind::Section, parent);
                    (t.parent_of(CatalogKind::Shaft, shaft), Some(shaft), Some(parent))
                }
            };
            LocationDetail {
                id: e.id,
                description: e.description,
                is_active: e.is_active,
                mine_id,
                mine: t.describe(CatalogKind::Mine, mine_id),
                shaft_id,
                shaft: shaft_id.map(|id| t.describe(CatalogKind::Shaft, id)),
                section_id,
                section: section_id.map(|id| t.describe(CatalogKind::Section, id)),
            }
        };
        Ok(rows.into_iter().map(detail).collect())
    }
}

#[async_trait]
impl EquipmentItemRepository for MockDb {
    async fn list(&self, type_id: Option<i32>) -> Result<Vec<EquipmentItem>> {
        let t = self.tables.read();
        Ok(t.items
            .values()
            .filter(|i| type_id.map_or(true, |id| i.type_id == id))
            .cloned()
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<EquipmentItem>> {
        Ok(self.tables.read().items.get(&id).cloned())
    }

    async fn find_by_serial(&self, serial_no: &str) -> Result<Option<EquipmentItem>> {
        let t = self.tables.read();
        Ok(t.items
            .values()
            .find(|i| i.serial_no.eq_ignore_ascii_case(serial_no))
            .cloned())
    }

    async fn create(&self, item: &NewEquipmentItem) -> Result<EquipmentItem> {
        let mut t = self.tables.write();
        let id = t.next_id();
        let row = EquipmentItem {
            id,
            type_id: item.type_id,
            serial_no: item.serial_no.clone(),
            description: item.description.clone(),
            is_active: true,
        };
        t.items.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, item: &NewEquipmentItem) -> Result<EquipmentItem> {
        let mut t = self.tables.write();
        let row = t
            .items
            .get_mut(&id)
            .ok_or_else(|| anyhow!("item {} missing", id))?;
        row.type_id = item.type_id;
        row.serial_no = item.serial_no.clone();
        row.description = item.description.clone();
        Ok(row.clone())
    }

    async fn set_active(&self, id: i32, is_active: bool) -> Result<()> {
        if let Some(row) = self.tables.write().items.get_mut(&id) {
            row.is_active = is_active;
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        self.tables.write().items.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl PartRepository for MockDb {
    async fn list(&self) -> Result<Vec<Part>> {
        Ok(self.tables.read().parts.values().cloned().collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Part>> {
        Ok(self.tables.read().parts.get(&id).cloned())
    }

    async fn create(&self, part: &NewPart) -> Result<Part> {
        let mut t = self.tables.write();
        let id = t.next_id();
        let row = Part {
            id,
            part_no: part.part_no.clone(),
            description: part.description.clone(),
            is_active: true,
        };
        t.parts.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, part: &NewPart) -> Result<Part> {
        let mut t = self.tables.write();
        let row = t
            .parts
            .get_mut(&id)
            .ok_or_else(|| anyhow!("part {} missing", id))?;
        row.part_no = part.part_no.clone();
        row.description = part.description.clone();
        Ok(row.clone())
    }

    async fn set_active(&self, id: i32, is_active: bool) -> Result<()> {
        if let Some(row) = self.tables.write().parts.get_mut(&id) {
            row.is_active = is_active;
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        self.tables.write().parts.remove(&id);
        Ok(())
    }

    async fn parts_for_type(&self, type_id: i32) -> Result<Vec<PartForType>> {
        let t = self.tables.read();
        Ok(t.part_links
            .iter()
            .filter(|(_, (ty, _))| *ty == type_id)
            .filter_map(|(id, (ty, part_id))| {
                t.parts.get(part_id).map(|p| PartForType {
                    id: *id,
                    type_id: *ty,
                    part_id: *part_id,
                    part_no: p.part_no.clone(),
                    part_description: p.description.clone(),
                })
            })
            .collect())
    }

    async fn link(&self, type_id: i32, part_id: i32) -> Result<i32> {
        let mut t = self.tables.write();
        let id = t.next_id();
        t.part_links.insert(id, (type_id, part_id));
        Ok(id)
    }

    async fn find_link(&self, id: i32) -> Result<Option<(i32, i32)>> {
        Ok(self.tables.read().part_links.get(&id).copied())
    }

    async fn unlink(&self, id: i32) -> Result<()> {
        self.tables.write().part_links.remove(&id);
        Ok(())
    }

    async fn count_links(&self, type_id: Option<i32>, part_id: Option<i32>) -> Result<u64> {
        let t = self.tables.read();
        let count = t
            .part_links
            .values()
            .filter(|(ty, p)| type_id.map_or(true, |id| id == *ty) && part_id.map_or(true, |id| id == *p))
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl TechnicianRepository for MockDb {
    async fn list(&self) -> Result<Vec<Technician>> {
        Ok(self.tables.read().technicians.values().cloned().collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Technician>> {
        Ok(self.tables.read().technicians.get(&id).cloned())
    }

    async fn create(&self, technician: &NewTechnician) -> Result<Technician> {
        let mut t = self.tables.write();
        let id = t.next_id();
        let row = Technician {
            id,
            name: technician.name.clone(),
            surname: technician.surname.clone(),
            is_active: true,
        };
        t.technicians.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, technician: &NewTechnician) -> Result<Technician> {
        let mut t = self.tables.write();
        let row = t
            .technicians
            .get_mut(&id)
            .ok_or_else(|| anyhow!("technician {} missing", id))?;
        row.name = technician.name.clone();
        row.surname = technician.surname.clone();
        Ok(row.clone())
    }

    async fn set_active(&self, id: i32, is_active: bool) -> Result<()> {
        if let Some(row) = self.tables.write().technicians.get_mut(&id) {
            row.is_active = is_active;
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        self.tables.write().technicians.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl JobRepository for MockDb {
    async fn list(&self, period: Option<ReportPeriod>) -> Result<Vec<Job>> {
        let t = self.tables.read();
        Ok(match period {
            Some(period) => t.jobs_in(period),
            None => t.jobs.values().cloned().collect(),
        })
    }

    async fn find(&self, id: i32) -> Result<Option<Job>> {
        Ok(self.tables.read().jobs.get(&id).cloned())
    }

    async fn create(&self, job: &NewJob) -> Result<(Job, Vec<JobPart>)> {
        let mut t = self.tables.write();
        let id = t.next_id();
        let row = Job {
            id,
            item_id: job.item_id,
            technician_id: job.technician_id,
            gang_id: job.gang_id,
            job_date: job.job_date,
            job_type: job.job_type.clone(),
            remarks: job.remarks.clone(),
        };
        t.jobs.insert(id, row.clone());
        let mut parts = Vec::new();
        for part in &job.parts {
            let part_row = JobPart {
                id: t.next_id(),
                job_id: id,
                part_id: part.part_id,
                quantity: part.quantity,
            };
            t.job_parts.insert(part_row.id, part_row.clone());
            parts.push(part_row);
        }
        Ok((row, parts))
    }

    async fn update(&self, id: i32, job: &JobUpdate) -> Result<Job> {
        let mut t = self.tables.write();
        let row = t
            .jobs
            .get_mut(&id)
            .ok_or_else(|| anyhow!("job {} missing", id))?;
        row.item_id = job.item_id;
        row.technician_id = job.technician_id;
        row.gang_id = job.gang_id;
        row.job_date = job.job_date;
        row.job_type = job.job_type.clone();
        row.remarks = job.remarks.clone();
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut t = self.tables.write();
        t.job_parts.retain(|_, p| p.job_id != id);
        t.jobs.remove(&id);
        Ok(())
    }

    async fn parts(&self, job_id: i32) -> Result<Vec<JobPart>> {
        Ok(self.tables.read().parts_of(job_id))
    }

    async fn add_part(&self, job_id: i32, part: &NewJobPart) -> Result<JobPart> {
        let mut t = self.tables.write();
        let row = JobPart {
            id: t.next_id(),
            job_id,
            part_id: part.part_id,
            quantity: part.quantity,
        };
        t.job_parts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_part(&self, id: i32) -> Result<Option<JobPart>> {
        Ok(self.tables.read().job_parts.get(&id).cloned())
    }

    async fn remove_part(&self, id: i32) -> Result<()> {
        self.tables.write().job_parts.remove(&id);
        Ok(())
    }

    async fn count_referencing(&self, reference: JobReference) -> Result<u64> {
        let t = self.tables.read();
        let count = match reference {
            JobReference::Item(id) => t.jobs.values().filter(|j| j.item_id == id).count(),
            JobReference::Technician(id) => {
                t.jobs.values().filter(|j| j.technician_id == id).count()
            }
            JobReference::Gang(id) => t.jobs.values().filter(|j| j.gang_id == id).count(),
            JobReference::Part(id) => t.job_parts.values().filter(|p| p.part_id == id).count(),
        };
        Ok(count as u64)
    }
}

#[async_trait]
impl NoteRepository for MockDb {
    async fn all_notes(&self) -> Result<Vec<NoteSummary>> {
        let t = self.tables.read();
        Ok(t.notes
            .values()
            .map(|n| NoteSummary {
                id: n.id,
                item_id: n.item_id,
                serial_no: t.serial(n.item_id),
                note_date: n.note_date,
                note: n.note.clone(),
                comment_count: t.comments.values().filter(|c| c.note_id == n.id).count() as i64,
            })
            .collect())
    }

    async fn notes_like_serial(&self, serial_no: &str) -> Result<Vec<NoteSummary>> {
        let needle = serial_no.to_lowercase();
        let notes = NoteRepository::all_notes(self).await?;
        Ok(notes
            .into_iter()
            .filter(|n| n.serial_no.to_lowercase().contains(&needle))
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Note>> {
        Ok(self.tables.read().notes.get(&id).cloned())
    }

    async fn create(&self, note: &NewNote) -> Result<Note> {
        let mut t = self.tables.write();
        let row = Note {
            id: t.next_id(),
            item_id: note.item_id,
            note_date: note.note_date,
            note: note.note.clone(),
            created_by: note.created_by,
        };
        t.notes.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_text(&self, id: i32, note: &str) -> Result<Note> {
        let mut t = self.tables.write();
        let row = t
            .notes
            .get_mut(&id)
            .ok_or_else(|| anyhow!("note {} missing", id))?;
        row.note = note.to_string();
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut t = self.tables.write();
        t.comments.retain(|_, c| c.note_id != id);
        t.notes.remove(&id);
        Ok(())
    }

    async fn comments(&self, note_id: i32) -> Result<Vec<NoteComment>> {
        let t = self.tables.read();
        Ok(t.comments
            .values()
            .filter(|c| c.note_id == note_id)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, comment: &NewNoteComment) -> Result<NoteComment> {
        let mut t = self.tables.write();
        let row = NoteComment {
            id: t.next_id(),
            note_id: comment.note_id,
            comment: comment.comment.clone(),
            comment_date: Utc::now(),
            created_by: comment.created_by,
        };
        t.comments.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_comment(&self, id: i32) -> Result<Option<NoteComment>> {
        Ok(self.tables.read().comments.get(&id).cloned())
    }

    async fn delete_comment(&self, id: i32) -> Result<()> {
        self.tables.write().comments.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AccessRepository for MockDb {
    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.tables.read().users.values().cloned().collect())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let row = User {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: true,
        };
        self.tables.write().users.insert(user.id, row.clone());
        Ok(row)
    }

    async fn update_user(&self, id: Uuid, email: &str, full_name: &str) -> Result<User> {
        let mut t = self.tables.write();
        let row = t
            .users
            .get_mut(&id)
            .ok_or_else(|| anyhow!("user {} missing", id))?;
        row.email = email.to_string();
        row.full_name = full_name.to_string();
        Ok(row.clone())
    }

    async fn set_user_active(&self, id: Uuid, is_active: bool) -> Result<()> {
        if let Some(row) = self.tables.write().users.get_mut(&id) {
            row.is_active = is_active;
        }
        Ok(())
    }

    async fn user_functions(&self, user_id: Uuid) -> Result<Vec<UserFunction>> {
        let t = self.tables.read();
        Ok(t.grants
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn grant(&self, user_id: Uuid, function_id: i32) -> Result<UserFunction> {
        let mut t = self.tables.write();
        let row = UserFunction {
            id: t.next_id(),
            user_id,
            function_id,
        };
        t.grants.insert(row.id, row.clone());
        Ok(row)
    }

    async fn revoke(&self, user_id: Uuid, function_id: i32) -> Result<()> {
        self.tables
            .write()
            .grants
            .retain(|_, g| !(g.user_id == user_id && g.function_id == function_id));
        Ok(())
    }

    async fn count_grants(&self, function_id: i32) -> Result<u64> {
        let t = self.tables.read();
        Ok(t.grants.values().filter(|g| g.function_id == function_id).count() as u64)
    }

    async fn permissions(&self, user_id: Uuid) -> Result<Vec<Permission>> {
        let t = self.tables.read();
        Ok(t.grants
            .values()
            .filter(|g| g.user_id == user_id)
            .map(|g| Permission {
                function_id: g.function_id,
                description: t.describe(CatalogKind::Function, g.function_id),
            })
            .collect())
    }
}

#[async_trait]
impl ReportRepository for MockDb {
    async fn serviced_list(&self, period: ReportPeriod) -> Result<Vec<ServicedItem>> {
        self.check_available()?;
        let t = self.tables.read();
        let mut per_item: BTreeMap<i32, (NaiveDate, i64)> = BTreeMap::new();
        for job in t.jobs_in(period) {
            let entry = per_item.entry(job.item_id).or_insert((job.job_date, 0));
            entry.0 = entry.0.max(job.job_date);
            entry.1 += 1;
        }
        Ok(per_item
            .into_iter()
            .map(|(item_id, (last, count))| {
                let (type_id, equipment_type, category) = t.item_type(item_id);
                ServicedItem {
                    item_id,
                    serial_no: t.serial(item_id),
                    category,
                    type_id,
                    equipment_type,
                    last_service_date: Some(last),
                    service_count: count,
                }
            })
            .collect())
    }

    async fn jobs_with_parts(&self, period: ReportPeriod) -> Result<Vec<JobPartUsage>> {
        self.check_available()?;
        let t = self.tables.read();
        let mut rows = Vec::new();
        for job in t.jobs_in(period) {
            let (type_id, equipment_type, _) = t.item_type(job.item_id);
            let (mine_id, shaft_id, section_id) = t.gang_ancestors(job.gang_id);
            let base = JobPartUsage {
                job_id: job.id,
                job_date: job.job_date,
                item_id: job.item_id,
                serial_no: t.serial(job.item_id),
                type_id,
                equipment_type,
                mine_id,
                mine: t.describe(CatalogKind::Mine, mine_id),
                shaft_id,
                shaft: t.describe(CatalogKind::Shaft, shaft_id),
                section_id,
                section: t.describe(CatalogKind::Section, section_id),
                gang_id: job.gang_id,
                gang: t.describe(CatalogKind::Gang, job.gang_id),
                technician: t.technician_name(job.technician_id),
                part_no: None,
                part_description: None,
                quantity: 0,
            };
            let parts = t.parts_of(job.id);
            if parts.is_empty() {
                rows.push(base);
                continue;
            }
            for used in parts {
                let part = t.parts.get(&used.part_id);
                rows.push(JobPartUsage {
                    part_no: part.map(|p| p.part_no.clone()),
                    part_description: part.map(|p| p.description.clone()),
                    quantity: used.quantity,
                    ..base.clone()
                });
            }
        }
        Ok(rows)
    }

    async fn jobs_per_technician(&self, period: ReportPeriod) -> Result<Vec<TechnicianJob>> {
        self.check_available()?;
        let t = self.tables.read();
        Ok(t.jobs_in(period)
            .into_iter()
            .map(|job| {
                let (type_id, equipment_type, _) = t.item_type(job.item_id);
                let (mine_id, shaft_id, section_id) = t.gang_ancestors(job.gang_id);
                TechnicianJob {
                    technician_id: job.technician_id,
                    technician: t.technician_name(job.technician_id),
                    job_id: job.id,
                    job_date: job.job_date,
                    job_type: job.job_type.clone(),
                    serial_no: t.serial(job.item_id),
                    type_id,
                    equipment_type,
                    mine_id,
                    shaft_id,
                    section_id,
                    gang_id: job.gang_id,
                }
            })
            .collect())
    }

    async fn job_count_per_item(&self, period: ReportPeriod) -> Result<Vec<ItemJobCount>> {
        let serviced = ReportRepository::serviced_list(self, period).await?;
        Ok(serviced
            .into_iter()
            .map(|s| ItemJobCount {
                item_id: s.item_id,
                serial_no: s.serial_no,
                category: s.category,
                type_id: s.type_id,
                equipment_type: s.equipment_type,
                job_count: s.service_count,
            })
            .collect())
    }

    async fn individual_history(&self, item_id: i32) -> Result<Vec<HistoryEntry>> {
        self.check_available()?;
        let t = self.tables.read();
        let mut jobs: Vec<&Job> = t.jobs.values().filter(|j| j.item_id == item_id).collect();
        jobs.sort_by_key(|j| (j.job_date, j.id));
        let mut rows = Vec::new();
        for job in jobs {
            let base = HistoryEntry {
                job_id: job.id,
                job_date: job.job_date,
                job_type: job.job_type.clone(),
                technician: t.technician_name(job.technician_id),
                gang: t.describe(CatalogKind::Gang, job.gang_id),
                part_no: None,
                part_description: None,
                quantity: None,
                remarks: job.remarks.clone(),
            };
            let parts = t.parts_of(job.id);
            if parts.is_empty() {
                rows.push(base);
                continue;
            }
            for used in parts {
                let part = t.parts.get(&used.part_id);
                rows.push(HistoryEntry {
                    part_no: part.map(|p| p.part_no.clone()),
                    part_description: part.map(|p| p.description.clone()),
                    quantity: Some(used.quantity),
                    ..base.clone()
                });
            }
        }
        Ok(rows)
    }
}

/// Ids of the seeded rows
///
/// Kopanang (No. 1 Shaft / Level 42 / Gang A) and Vaal (Main / Level 7 /
/// Gang B); a loader and a pump; two parts; two technicians; one user
/// with the `Reports` function granted.
#[derive(Debug, Clone)]
pub struct Seed {
    pub mobile: i32,
    pub fixed: i32,
    pub loader: i32,
    pub pump: i32,
    pub kopanang: i32,
    pub kopanang_shaft: i32,
    pub kopanang_section: i32,
    pub gang_a: i32,
    pub vaal: i32,
    pub vaal_shaft: i32,
    pub vaal_section: i32,
    pub gang_b: i32,
    pub lhd: i32,
    pub pump_item: i32,
    pub filter: i32,
    pub belt: i32,
    pub sipho: i32,
    pub thandi: i32,
    pub reports_fn: i32,
    pub admin_fn: i32,
    pub user: Uuid,
}

pub struct Fixture {
    pub db: MockDb,
    pub service: Arc<Service>,
    pub seed: Seed,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = MockDb::new();
        let service = Arc::new(Service::new(db.repositories(), config));
        let seed = seed(&service).await;
        Self { db, service, seed }
    }

    /// A job with the given parts, dated inside March 2024
    pub async fn record_job(
        &self,
        item_id: i32,
        technician_id: i32,
        gang_id: i32,
        day: u32,
        parts: &[(i32, i32)],
    ) -> Job {
        let (job, _) = self
            .service
            .create_job(NewJob {
                item_id,
                technician_id,
                gang_id,
                job_date: date(2024, 3, day),
                job_type: "Service".to_string(),
                remarks: None,
                parts: parts
                    .iter()
                    .map(|&(part_id, quantity)| NewJobPart { part_id, quantity })
                    .collect(),
            })
            .await
            .unwrap();
        job
    }
}

async fn add(service: &Service, kind: CatalogKind, parent_id: Option<i32>, name: &str) -> i32 {
    service
        .create_catalog_entry(
            kind,
            NewCatalogEntry {
                parent_id,
                description: name.to_string(),
            },
        )
        .await
        .unwrap()
        .id
}

async fn seed(service: &Service) -> Seed {
    let mobile = add(service, CatalogKind::EquipmentCategory, None, "Mobile").await;
    let fixed = add(service, CatalogKind::EquipmentCategory, None, "Fixed").await;
    let loader = add(service, CatalogKind::EquipmentType, Some(mobile), "LHD").await;
    let pump = add(service, CatalogKind::EquipmentType, Some(fixed), "Pump").await;

    let kopanang = add(service, CatalogKind::Mine, None, "Kopanang").await;
    let kopanang_shaft = add(service, CatalogKind::Shaft, Some(kopanang), "No. 1 Shaft").await;
    let kopanang_section =
        add(service, CatalogKind::Section, Some(kopanang_shaft), "Level 42").await;
    let gang_a = add(service, CatalogKind::Gang, Some(kopanang_section), "Gang A").await;

    let vaal = add(service, CatalogKind::Mine, None, "Vaal").await;
    let vaal_shaft = add(service, CatalogKind::Shaft, Some(vaal), "Main").await;
    let vaal_section = add(service, CatalogKind::Section, Some(vaal_shaft), "Level 7").await;
    let gang_b = add(service, CatalogKind::Gang, Some(vaal_section), "Gang B").await;

    let lhd = service
        .create_item(NewEquipmentItem {
            type_id: loader,
            serial_no: "LHD-0042".to_string(),
            description: Some("Sandvik LH410".to_string()),
        })
        .await
        .unwrap()
        .id;
    let pump_item = service
        .create_item(NewEquipmentItem {
            type_id: pump,
            serial_no: "PMP-7".to_string(),
            description: None,
        })
        .await
        .unwrap()
        .id;

    let filter = service
        .create_part(NewPart {
            part_no: "F-100".to_string(),
            description: "Oil filter".to_string(),
        })
        .await
        .unwrap()
        .id;
    let belt = service
        .create_part(NewPart {
            part_no: "B-220".to_string(),
            description: "Drive belt".to_string(),
        })
        .await
        .unwrap()
        .id;

    let sipho = service
        .create_technician(NewTechnician {
            name: "Sipho".to_string(),
            surname: "Dlamini".to_string(),
        })
        .await
        .unwrap()
        .id;
    let thandi = service
        .create_technician(NewTechnician {
            name: "Thandi".to_string(),
            surname: "Mokoena".to_string(),
        })
        .await
        .unwrap()
        .id;

    let reports_fn = add(service, CatalogKind::Function, None, "Reports").await;
    let admin_fn = add(service, CatalogKind::Function, None, "Admin").await;
    let user = Uuid::new_v4();
    service
        .create_user(NewUser {
            id: user,
            email: "foreman@kopanang.co.za".to_string(),
            full_name: "Pieter Foreman".to_string(),
        })
        .await
        .unwrap();
    service.grant_function(user, reports_fn).await.unwrap();

    Seed {
        mobile,
        fixed,
        loader,
        pump,
        kopanang,
        kopanang_shaft,
        kopanang_section,
        gang_a,
        vaal,
        vaal_shaft,
        vaal_section,
        gang_b,
        lhd,
        pump_item,
        filter,
        belt,
        sipho,
        thandi,
        reports_fn,
        admin_fn,
        user,
    }
}
