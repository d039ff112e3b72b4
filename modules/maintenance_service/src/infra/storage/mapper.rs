//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity;
use crate::contract::{
    CatalogEntry, EquipmentItem, Job, JobPart, NewCatalogEntry, NewEquipmentItem, NewJobPart,
    NewNote, NewNoteComment, NewPart, NewTechnician, NewUser, Note, NoteComment, Part,
    Technician, User, UserFunction,
};
use anyhow::Result;
use sea_orm::ActiveValue::Set;

// ===== Lookup Table Conversions =====

/// Writes shared by the description-only tables
pub trait CatalogActiveModel: Sized {
    /// Active model for a new, active row
    fn new_entry(entry: &NewCatalogEntry) -> Result<Self>;

    /// Overwrite description and parent
    fn apply(&mut self, entry: &NewCatalogEntry) -> Result<()>;

    /// Set the `isactive` flag; a no-op for tables without one
    fn set_active(&mut self, is_active: bool);
}

macro_rules! catalog_mapping {
    ($table:ident, $id:ident) => {
        impl From<entity::$table::Model> for CatalogEntry {
            fn from(model: entity::$table::Model) -> Self {
                Self {
                    id: model.$id,
                    parent_id: None,
                    description: model.description,
                    is_active: model.isactive,
                }
            }
        }

        impl CatalogActiveModel for entity::$table::ActiveModel {
            fn new_entry(entry: &NewCatalogEntry) -> Result<Self> {
                Ok(Self {
                    description: Set(entry.description.clone()),
                    isactive: Set(true),
                    ..Default::default()
                })
            }

            fn apply(&mut self, entry: &NewCatalogEntry) -> Result<()> {
                self.description = Set(entry.description.clone());
                Ok(())
            }

            fn set_active(&mut self, is_active: bool) {
                self.isactive = Set(is_active);
            }
        }
    };
    ($table:ident, $id:ident, parent = $parent:ident) => {
        impl From<entity::$table::Model> for CatalogEntry {
            fn from(model: entity::$table::Model) -> Self {
                Self {
                    id: model.$id,
                    parent_id: Some(model.$parent),
                    description: model.description,
                    is_active: model.isactive,
                }
            }
        }

        impl CatalogActiveModel for entity::$table::ActiveModel {
            fn new_entry(entry: &NewCatalogEntry) -> Result<Self> {
                let mut model = Self {
                    isactive: Set(true),
                    ..Default::default()
                };
                model.apply(entry)?;
                Ok(model)
            }

            fn apply(&mut self, entry: &NewCatalogEntry) -> Result<()> {
                let parent_id = entry.parent_id.ok_or_else(|| {
                    anyhow::anyhow!("{} rows need a {}", stringify!($table), stringify!($parent))
                })?;
                self.$parent = Set(parent_id);
                self.description = Set(entry.description.clone());
                Ok(())
            }

            fn set_active(&mut self, is_active: bool) {
                self.isactive = Set(is_active);
            }
        }
    };
}

catalog_mapping!(equipmentcategories, categoryid);
catalog_mapping!(equipmenttypes, typeid, parent = categoryid);
catalog_mapping!(mines, mineid);
catalog_mapping!(shafts, shaftid, parent = mineid);
catalog_mapping!(sections, sectionid, parent = shaftid);
catalog_mapping!(gangs, gangid, parent = sectionid);

impl From<entity::functions::Model> for CatalogEntry {
    fn from(model: entity::functions::Model) -> Self {
        Self {
            id: model.functionid,
            parent_id: None,
            description: model.description,
            is_active: true,
        }
    }
}

impl CatalogActiveModel for entity::functions::ActiveModel {
    fn new_entry(entry: &NewCatalogEntry) -> Result<Self> {
        Ok(Self {
            description: Set(entry.description.clone()),
            ..Default::default()
        })
    }

    fn apply(&mut self, entry: &NewCatalogEntry) -> Result<()> {
        self.description = Set(entry.description.clone());
        Ok(())
    }

    fn set_active(&mut self, _is_active: bool) {}
}

// ===== Equipment and Part Conversions =====

impl From<entity::equipmentitems::Model> for EquipmentItem {
    fn from(model: entity::equipmentitems::Model) -> Self {
        Self {
            id: model.itemid,
            type_id: model.typeid,
            serial_no: model.serialno,
            description: model.description,
            is_active: model.isactive,
        }
    }
}

impl From<&NewEquipmentItem> for entity::equipmentitems::ActiveModel {
    fn from(item: &NewEquipmentItem) -> Self {
        Self {
            typeid: Set(item.type_id),
            serialno: Set(item.serial_no.clone()),
            description: Set(item.description.clone()),
            isactive: Set(true),
            ..Default::default()
        }
    }
}

impl From<entity::parts::Model> for Part {
    fn from(model: entity::parts::Model) -> Self {
        Self {
            id: model.partid,
            part_no: model.partno,
            description: model.description,
            is_active: model.isactive,
        }
    }
}

impl From<&NewPart> for entity::parts::ActiveModel {
    fn from(part: &NewPart) -> Self {
        Self {
            partno: Set(part.part_no.clone()),
            description: Set(part.description.clone()),
            isactive: Set(true),
            ..Default::default()
        }
    }
}

// ===== People Conversions =====

impl From<entity::technicians::Model> for Technician {
    fn from(model: entity::technicians::Model) -> Self {
        Self {
            id: model.technicianid,
            name: model.name,
            surname: model.surname,
            is_active: model.isactive,
        }
    }
}

impl From<&NewTechnician> for entity::technicians::ActiveModel {
    fn from(technician: &NewTechnician) -> Self {
        Self {
            name: Set(technician.name.clone()),
            surname: Set(technician.surname.clone()),
            isactive: Set(true),
            ..Default::default()
        }
    }
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        Self {
            id: model.userid,
            email: model.email,
            full_name: model.fullname,
            is_active: model.isactive,
        }
    }
}

impl From<&NewUser> for entity::users::ActiveModel {
    fn from(user: &NewUser) -> Self {
        Self {
            userid: Set(user.id),
            email: Set(user.email.clone()),
            fullname: Set(user.full_name.clone()),
            isactive: Set(true),
        }
    }
}

impl From<entity::userfunctions::Model> for UserFunction {
    fn from(model: entity::userfunctions::Model) -> Self {
        Self {
            id: model.userfunctionid,
            user_id: model.userid,
            function_id: model.functionid,
        }
    }
}

// ===== Job Conversions =====

impl From<entity::jobs::Model> for Job {
    fn from(model: entity::jobs::Model) -> Self {
        Self {
            id: model.jobid,
            item_id: model.itemid,
            technician_id: model.technicianid,
            gang_id: model.gangid,
            job_date: model.jobdate,
            job_type: model.jobtype,
            remarks: model.remarks,
        }
    }
}

impl From<entity::partsperjob::Model> for JobPart {
    fn from(model: entity::partsperjob::Model) -> Self {
        Self {
            id: model.partsperjobid,
            job_id: model.jobid,
            part_id: model.partid,
            quantity: model.quantity,
        }
    }
}

/// Active model for a part consumed by `job_id`
pub fn job_part_active_model(job_id: i32, part: &NewJobPart) -> entity::partsperjob::ActiveModel {
    entity::partsperjob::ActiveModel {
        jobid: Set(job_id),
        partid: Set(part.part_id),
        quantity: Set(part.quantity),
        ..Default::default()
    }
}

// ===== Note Conversions =====

impl From<entity::notes::Model> for Note {
    fn from(model: entity::notes::Model) -> Self {
        Self {
            id: model.noteid,
            item_id: model.itemid,
            note_date: model.notedate,
            note: model.note,
            created_by: model.createdby,
        }
    }
}

impl From<&NewNote> for entity::notes::ActiveModel {
    fn from(note: &NewNote) -> Self {
        Self {
            itemid: Set(note.item_id),
            notedate: Set(note.note_date),
            note: Set(note.note.clone()),
            createdby: Set(note.created_by),
            ..Default::default()
        }
    }
}

impl From<entity::notecomments::Model> for NoteComment {
    fn from(model: entity::notecomments::Model) -> Self {
        Self {
            id: model.commentid,
            note_id: model.noteid,
            comment: model.comment,
            comment_date: model.commentdate,
            created_by: model.createdby,
        }
    }
}

impl From<&NewNoteComment> for entity::notecomments::ActiveModel {
    fn from(comment: &NewNoteComment) -> Self {
        Self {
            noteid: Set(comment.note_id),
            comment: Set(comment.comment.clone()),
            commentdate: Set(chrono::Utc::now()),
            createdby: Set(comment.created_by),
            ..Default::default()
        }
    }
}
