//! SeaORM repository implementations

use super::entity;
use super::mapper::{job_part_active_model, CatalogActiveModel};
use super::rpc;
use crate::contract::{
    CatalogEntry, CatalogKind, EquipmentItem, EquipmentTypeDetail, Job, JobPart, JobUpdate,
    LocationDetail, NewCatalogEntry, NewEquipmentItem, NewJob, NewJobPart, NewNote,
    NewNoteComment, NewPart, NewTechnician, NewUser, Note, NoteComment, NoteSummary, Part,
    PartForType, Permission, ReportPeriod, Technician, User, UserFunction,
};
use crate::domain::repository::{
    AccessRepository, CatalogRepository, EquipmentItemRepository, JobReference, JobRepository,
    NoteRepository, PartRepository, TechnicianRepository,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// Run `$body` with `$m` bound to the entity module of a lookup table
macro_rules! with_catalog_table {
    ($kind:expr, $m:ident => $body:expr) => {
        match $kind {
            CatalogKind::EquipmentCategory => {
                use entity::equipmentcategories as $m;
                $body
            }
            CatalogKind::EquipmentType => {
                use entity::equipmenttypes as $m;
                $body
            }
            CatalogKind::Mine => {
                use entity::mines as $m;
                $body
            }
            CatalogKind::Shaft => {
                use entity::shafts as $m;
                $body
            }
            CatalogKind::Section => {
                use entity::sections as $m;
                $body
            }
            CatalogKind::Gang => {
                use entity::gangs as $m;
                $body
            }
            CatalogKind::Function => {
                use entity::functions as $m;
                $body
            }
        }
    };
}

// ===== Catalog Repository =====

pub struct SeaOrmCatalogRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>> {
        with_catalog_table!(kind, m => {
            let rows = m::Entity::find()
                .order_by_asc(m::Column::Description)
                .all(&*self.db)
                .await?;
            Ok(rows.into_iter().map(CatalogEntry::from).collect())
        })
    }

    async fn find(&self, kind: CatalogKind, id: i32) -> Result<Option<CatalogEntry>> {
        with_catalog_table!(kind, m => {
            let row = m::Entity::find_by_id(id).one(&*self.db).await?;
            Ok(row.map(CatalogEntry::from))
        })
    }

    async fn create(&self, kind: CatalogKind, entry: &NewCatalogEntry) -> Result<CatalogEntry> {
        with_catalog_table!(kind, m => {
            let active = m::ActiveModel::new_entry(entry)?;
            let row = active.insert(&*self.db).await?;
            Ok(CatalogEntry::from(row))
        })
    }

    async fn update(
        &self,
        kind: CatalogKind,
        id: i32,
        entry: &NewCatalogEntry,
    ) -> Result<CatalogEntry> {
        with_catalog_table!(kind, m => {
            let row = m::Entity::find_by_id(id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| anyhow!("{} row {} disappeared", kind, id))?;
            let mut active: m::ActiveModel = row.into();
            active.apply(entry)?;
            let row = active.update(&*self.db).await?;
            Ok(CatalogEntry::from(row))
        })
    }

    async fn set_active(&self, kind: CatalogKind, id: i32, is_active: bool) -> Result<()> {
        with_catalog_table!(kind, m => {
            let row = m::Entity::find_by_id(id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| anyhow!("{} row {} disappeared", kind, id))?;
            let mut active: m::ActiveModel = row.into();
            active.set_active(is_active);
            active.update(&*self.db).await?;
            Ok(())
        })
    }

    async fn delete(&self, kind: CatalogKind, id: i32) -> Result<()> {
        with_catalog_table!(kind, m => {
            m::Entity::delete_by_id(id).exec(&*self.db).await?;
            Ok(())
        })
    }

    async fn equipment_types_detailed(&self) -> Result<Vec<EquipmentTypeDetail>> {
        rpc::all_equipment_types(&self.db).await
    }

    async fn locations_detailed(&self, level: CatalogKind) -> Result<Vec<LocationDetail>> {
        match level {
            CatalogKind::Shaft => rpc::all_shafts(&self.db).await,
            CatalogKind::Section => rpc::all_sections(&self.db).await,
            CatalogKind::Gang => rpc::all_gangs(&self.db).await,
            other => Err(anyhow!("no detailed view for {}", other)),
        }
    }
}

// ===== Equipment Item Repository =====

pub struct SeaOrmEquipmentItemRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmEquipmentItemRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i32) -> Result<entity::equipmentitems::Model> {
        entity::equipmentitems::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| anyhow!("equipment item {} disappeared", id))
    }
}

#[async_trait]
impl EquipmentItemRepository for SeaOrmEquipmentItemRepository {
    async fn list(&self, type_id: Option<i32>) -> Result<Vec<EquipmentItem>> {
        use entity::equipmentitems::{Column, Entity};

        let mut query = Entity::find();
        if let Some(type_id) = type_id {
            query = query.filter(Column::Typeid.eq(type_id));
        }
        let rows = query.order_by_asc(Column::Serialno).all(&*self.db).await?;
        Ok(rows.into_iter().map(EquipmentItem::from).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<EquipmentItem>> {
        let row = entity::equipmentitems::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;
        Ok(row.map(EquipmentItem::from))
    }

    async fn find_by_serial(&self, serial_no: &str) -> Result<Option<EquipmentItem>> {
        use entity::equipmentitems::{Column, Entity};

        let row = Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(Column::Serialno))).eq(serial_no.to_lowercase()))
            .one(&*self.db)
            .await?;
        Ok(row.map(EquipmentItem::from))
    }

    async fn create(&self, item: &NewEquipmentItem) -> Result<EquipmentItem> {
        let active: entity::equipmentitems::ActiveModel = item.into();
        let row = active.insert(&*self.db).await?;
        Ok(row.into())
    }

    async fn update(&self, id: i32, item: &NewEquipmentItem) -> Result<EquipmentItem> {
        let mut active: entity::equipmentitems::ActiveModel = self.find_model(id).await?.into();
        active.typeid = Set(item.type_id);
        active.serialno = Set(item.serial_no.clone());
        active.description = Set(item.description.clone());
        let row = active.update(&*self.db).await?;
        Ok(row.into())
    }

    async fn set_active(&self, id: i32, is_active: bool) -> Result<()> {
        let mut active: entity::equipmentitems::ActiveModel = self.find_model(id).await?.into();
        active.isactive = Set(is_active);
        active.update(&*self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        entity::equipmentitems::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}

// ===== Part Repository =====

pub struct SeaOrmPartRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmPartRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i32) -> Result<entity::parts::Model> {
        entity::parts::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| anyhow!("part {} disappeared", id))
    }
}

#[async_trait]
impl PartRepository for SeaOrmPartRepository {
    async fn list(&self) -> Result<Vec<Part>> {
        let rows = entity::parts::Entity::find()
            .order_by_asc(entity::parts::Column::Partno)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Part::from).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Part>> {
        let row = entity::parts::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(row.map(Part::from))
    }

    async fn create(&self, part: &NewPart) -> Result<Part> {
        let active: entity::parts::ActiveModel = part.into();
        let row = active.insert(&*self.db).await?;
        Ok(row.into())
    }

    async fn update(&self, id: i32, part: &NewPart) -> Result<Part> {
        let mut active: entity::parts::ActiveModel = self.find_model(id).await?.into();
        active.partno = Set(part.part_no.clone());
        active.description = Set(part.description.clone());
        let row = active.update(&*self.db).await?;
        Ok(row.into())
    }

    async fn set_active(&self, id: i32, is_active: bool) -> Result<()> {
        let mut active: entity::parts::ActiveModel = self.find_model(id).await?.into();
        active.isactive = Set(is_active);
        active.update(&*self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        entity::parts::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn parts_for_type(&self, type_id: i32) -> Result<Vec<PartForType>> {
        rpc::parts_per_type(&self.db, type_id).await
    }

    async fn link(&self, type_id: i32, part_id: i32) -> Result<i32> {
        let active = entity::partspertype::ActiveModel {
            typeid: Set(type_id),
            partid: Set(part_id),
            ..Default::default()
        };
        let row = active.insert(&*self.db).await?;
        Ok(row.partspertypeid)
    }

    async fn find_link(&self, id: i32) -> Result<Option<(i32, i32)>> {
        let row = entity::partspertype::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;
        Ok(row.map(|r| (r.typeid, r.partid)))
    }

    async fn unlink(&self, id: i32) -> Result<()> {
        entity::partspertype::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn count_links(&self, type_id: Option<i32>, part_id: Option<i32>) -> Result<u64> {
        use entity::partspertype::{Column, Entity};

        let mut query = Entity::find();
        if let Some(type_id) = type_id {
            query = query.filter(Column::Typeid.eq(type_id));
        }
        if let Some(part_id) = part_id {
            query = query.filter(Column::Partid.eq(part_id));
        }
        Ok(query.count(&*self.db).await?)
    }
}

// ===== Technician Repository =====

pub struct SeaOrmTechnicianRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTechnicianRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i32) -> Result<entity::technicians::Model> {
        entity::technicians::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| anyhow!("technician {} disappeared", id))
    }
}

#[async_trait]
impl TechnicianRepository for SeaOrmTechnicianRepository {
    async fn list(&self) -> Result<Vec<Technician>> {
        use entity::technicians::{Column, Entity};

        let rows = Entity::find()
            .order_by_asc(Column::Surname)
            .order_by_asc(Column::Name)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Technician::from).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Technician>> {
        let row = entity::technicians::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;
        Ok(row.map(Technician::from))
    }

    async fn create(&self, technician: &NewTechnician) -> Result<Technician> {
        let active: entity::technicians::ActiveModel = technician.into();
        let row = active.insert(&*self.db).await?;
        Ok(row.into())
    }

    async fn update(&self, id: i32, technician: &NewTechnician) -> Result<Technician> {
        let mut active: entity::technicians::ActiveModel = self.find_model(id).await?.into();
        active.name = Set(technician.name.clone());
        active.surname = Set(technician.surname.clone());
        let row = active.update(&*self.db).await?;
        Ok(row.into())
    }

    async fn set_active(&self, id: i32, is_active: bool) -> Result<()> {
        let mut active: entity::technicians::ActiveModel = self.find_model(id).await?.into();
        active.isactive = Set(is_active);
        active.update(&*self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        entity::technicians::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}

// ===== Job Repository =====

pub struct SeaOrmJobRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmJobRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobRepository for SeaOrmJobRepository {
    async fn list(&self, period: Option<ReportPeriod>) -> Result<Vec<Job>> {
        use entity::jobs::{Column, Entity};

        let mut query = Entity::find();
        if let Some(period) = period {
            query = query.filter(Column::Jobdate.between(period.start, period.end));
        }
        let rows = query
            .order_by_asc(Column::Jobdate)
            .order_by_asc(Column::Jobid)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Job>> {
        let row = entity::jobs::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(row.map(Job::from))
    }

    async fn create(&self, job: &NewJob) -> Result<(Job, Vec<JobPart>)> {
        let txn = self.db.begin().await?;

        let header = entity::jobs::ActiveModel {
            itemid: Set(job.item_id),
            technicianid: Set(job.technician_id),
            gangid: Set(job.gang_id),
            jobdate: Set(job.job_date),
            jobtype: Set(job.job_type.clone()),
            remarks: Set(job.remarks.clone()),
            ..Default::default()
        };
        let created = header.insert(&txn).await?;

        let mut parts = Vec::with_capacity(job.parts.len());
        for part in &job.parts {
            let row = job_part_active_model(created.jobid, part)
                .insert(&txn)
                .await?;
            parts.push(JobPart::from(row));
        }

        txn.commit().await?;
        Ok((created.into(), parts))
    }

    async fn update(&self, id: i32, job: &JobUpdate) -> Result<Job> {
        let row = entity::jobs::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| anyhow!("job {} disappeared", id))?;
        let mut active: entity::jobs::ActiveModel = row.into();
        active.itemid = Set(job.item_id);
        active.technicianid = Set(job.technician_id);
        active.gangid = Set(job.gang_id);
        active.jobdate = Set(job.job_date);
        active.jobtype = Set(job.job_type.clone());
        active.remarks = Set(job.remarks.clone());
        let row = active.update(&*self.db).await?;
        Ok(row.into())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        entity::partsperjob::Entity::delete_many()
            .filter(entity::partsperjob::Column::Jobid.eq(id))
            .exec(&txn)
            .await?;
        entity::jobs::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn parts(&self, job_id: i32) -> Result<Vec<JobPart>> {
        use entity::partsperjob::{Column, Entity};

        let rows = Entity::find()
            .filter(Column::Jobid.eq(job_id))
            .order_by_asc(Column::Partsperjobid)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(JobPart::from).collect())
    }

    async fn add_part(&self, job_id: i32, part: &NewJobPart) -> Result<JobPart> {
        let row = job_part_active_model(job_id, part)
            .insert(&*self.db)
            .await?;
        Ok(row.into())
    }

    async fn find_part(&self, id: i32) -> Result<Option<JobPart>> {
        let row = entity::partsperjob::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;
        Ok(row.map(JobPart::from))
    }

    async fn remove_part(&self, id: i32) -> Result<()> {
        entity::partsperjob::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn count_referencing(&self, reference: JobReference) -> Result<u64> {
        use entity::jobs::{Column, Entity};

        let count = match reference {
            JobReference::Item(id) => {
                Entity::find()
                    .filter(Column::Itemid.eq(id))
                    .count(&*self.db)
                    .await?
            }
            JobReference::Technician(id) => {
                Entity::find()
                    .filter(Column::Technicianid.eq(id))
                    .count(&*self.db)
                    .await?
            }
            JobReference::Gang(id) => {
                Entity::find()
                    .filter(Column::Gangid.eq(id))
                    .count(&*self.db)
                    .await?
            }
            JobReference::Part(id) => {
                entity::partsperjob::Entity::find()
                    .filter(entity::partsperjob::Column::Partid.eq(id))
                    .count(&*self.db)
                    .await?
            }
        };
        Ok(count)
    }
}

// ===== Note Repository =====

pub struct SeaOrmNoteRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmNoteRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteRepository for SeaOrmNoteRepository {
    async fn all_notes(&self) -> Result<Vec<NoteSummary>> {
        rpc::all_notes(&self.db).await
    }

    async fn notes_like_serial(&self, serial_no: &str) -> Result<Vec<NoteSummary>> {
        rpc::notes_like_serial(&self.db, serial_no).await
    }

    async fn find(&self, id: i32) -> Result<Option<Note>> {
        let row = entity::notes::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(row.map(Note::from))
    }

    async fn create(&self, note: &NewNote) -> Result<Note> {
        let active: entity::notes::ActiveModel = note.into();
        let row = active.insert(&*self.db).await?;
        Ok(row.into())
    }

    async fn update_text(&self, id: i32, note: &str) -> Result<Note> {
        let row = entity::notes::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| anyhow!("note {} disappeared", id))?;
        let mut active: entity::notes::ActiveModel = row.into();
        active.note = Set(note.to_string());
        let row = active.update(&*self.db).await?;
        Ok(row.into())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        entity::notecomments::Entity::delete_many()
            .filter(entity::notecomments::Column::Noteid.eq(id))
            .exec(&txn)
            .await?;
        entity::notes::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn comments(&self, note_id: i32) -> Result<Vec<NoteComment>> {
        rpc::comments_by_note(&self.db, note_id).await
    }

    async fn create_comment(&self, comment: &NewNoteComment) -> Result<NoteComment> {
        let active: entity::notecomments::ActiveModel = comment.into();
        let row = active.insert(&*self.db).await?;
        Ok(row.into())
    }

    async fn find_comment(&self, id: i32) -> Result<Option<NoteComment>> {
        let row = entity::notecomments::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;
        Ok(row.map(NoteComment::from))
    }

    async fn delete_comment(&self, id: i32) -> Result<()> {
        entity::notecomments::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}

// ===== Access Repository =====

pub struct SeaOrmAccessRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAccessRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> Result<entity::users::Model> {
        entity::users::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| anyhow!("user {} disappeared", id))
    }
}

#[async_trait]
impl AccessRepository for SeaOrmAccessRepository {
    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = entity::users::Entity::find()
            .order_by_asc(entity::users::Column::Fullname)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = entity::users::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(row.map(User::from))
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let active: entity::users::ActiveModel = user.into();
        let row = active.insert(&*self.db).await?;
        Ok(row.into())
    }

    async fn update_user(&self, id: Uuid, email: &str, full_name: &str) -> Result<User> {
        let mut active: entity::users::ActiveModel = self.find_model(id).await?.into();
        active.email = Set(email.to_string());
        active.fullname = Set(full_name.to_string());
        let row = active.update(&*self.db).await?;
        Ok(row.into())
    }

    async fn set_user_active(&self, id: Uuid, is_active: bool) -> Result<()> {
        let mut active: entity::users::ActiveModel = self.find_model(id).await?.into();
        active.isactive = Set(is_active);
        active.update(&*self.db).await?;
        Ok(())
    }

    async fn user_functions(&self, user_id: Uuid) -> Result<Vec<UserFunction>> {
        use entity::userfunctions::{Column, Entity};

        let rows = Entity::find()
            .filter(Column::Userid.eq(user_id))
            .order_by_asc(Column::Functionid)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(UserFunction::from).collect())
    }

    async fn grant(&self, user_id: Uuid, function_id: i32) -> Result<UserFunction> {
        let active = entity::userfunctions::ActiveModel {
            userid: Set(user_id),
            functionid: Set(function_id),
            ..Default::default()
        };
        let row = active.insert(&*self.db).await?;
        Ok(row.into())
    }

    async fn revoke(&self, user_id: Uuid, function_id: i32) -> Result<()> {
        use entity::userfunctions::{Column, Entity};

        Entity::delete_many()
            .filter(Column::Userid.eq(user_id))
            .filter(Column::Functionid.eq(function_id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn count_grants(&self, function_id: i32) -> Result<u64> {
        use entity::userfunctions::{Column, Entity};

        let count = Entity::find()
            .filter(Column::Functionid.eq(function_id))
            .count(&*self.db)
            .await?;
        Ok(count)
    }

    async fn permissions(&self, user_id: Uuid) -> Result<Vec<Permission>> {
        rpc::permissions_by_user(&self.db, user_id).await
    }
}
