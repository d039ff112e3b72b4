//! Mapper implementations for converting between DTOs and contract models

use super::dto::*;
use crate::contract;
use crate::domain::{LocationFilter, LocationOptions};
use crate::export::{Cell, ReportTable, RowKind};

// ===== Lookup table conversions =====

impl From<contract::CatalogEntry> for CatalogEntryDto {
    fn from(entry: contract::CatalogEntry) -> Self {
        Self {
            id: entry.id,
            parentid: entry.parent_id,
            description: entry.description,
            isactive: entry.is_active,
        }
    }
}

impl From<CatalogEntryRequest> for contract::NewCatalogEntry {
    fn from(req: CatalogEntryRequest) -> Self {
        Self {
            parent_id: req.parentid,
            description: req.description,
        }
    }
}

impl From<contract::EquipmentTypeDetail> for EquipmentTypeDetailDto {
    fn from(detail: contract::EquipmentTypeDetail) -> Self {
        Self {
            typeid: detail.type_id,
            categoryid: detail.category_id,
            category: detail.category,
            description: detail.description,
            isactive: detail.is_active,
        }
    }
}

impl From<contract::LocationDetail> for LocationDetailDto {
    fn from(detail: contract::LocationDetail) -> Self {
        Self {
            id: detail.id,
            description: detail.description,
            isactive: detail.is_active,
            mineid: detail.mine_id,
            mine: detail.mine,
            shaftid: detail.shaft_id,
            shaft: detail.shaft,
            sectionid: detail.section_id,
            section: detail.section,
        }
    }
}

// ===== Equipment conversions =====

impl From<contract::EquipmentItem> for EquipmentItemDto {
    fn from(item: contract::EquipmentItem) -> Self {
        Self {
            itemid: item.id,
            typeid: item.type_id,
            serialno: item.serial_no,
            description: item.description,
            isactive: item.is_active,
        }
    }
}

impl From<EquipmentItemRequest> for contract::NewEquipmentItem {
    fn from(req: EquipmentItemRequest) -> Self {
        Self {
            type_id: req.typeid,
            serial_no: req.serialno,
            description: req.description,
        }
    }
}

impl From<contract::Part> for PartDto {
    fn from(part: contract::Part) -> Self {
        Self {
            partid: part.id,
            partno: part.part_no,
            description: part.description,
            isactive: part.is_active,
        }
    }
}

impl From<PartRequest> for contract::NewPart {
    fn from(req: PartRequest) -> Self {
        Self {
            part_no: req.partno,
            description: req.description,
        }
    }
}

impl From<contract::PartForType> for PartForTypeDto {
    fn from(link: contract::PartForType) -> Self {
        Self {
            partspertypeid: link.id,
            typeid: link.type_id,
            partid: link.part_id,
            partno: link.part_no,
            description: link.part_description,
        }
    }
}

// ===== Technician conversions =====

impl From<contract::Technician> for TechnicianDto {
    fn from(technician: contract::Technician) -> Self {
        Self {
            technicianid: technician.id,
            name: technician.name,
            surname: technician.surname,
            isactive: technician.is_active,
        }
    }
}

impl From<TechnicianRequest> for contract::NewTechnician {
    fn from(req: TechnicianRequest) -> Self {
        Self {
            name: req.name,
            surname: req.surname,
        }
    }
}

// ===== Job conversions =====

impl From<contract::Job> for JobDto {
    fn from(job: contract::Job) -> Self {
        Self {
            jobid: job.id,
            itemid: job.item_id,
            technicianid: job.technician_id,
            gangid: job.gang_id,
            jobdate: job.job_date,
            jobtype: job.job_type,
            remarks: job.remarks,
        }
    }
}

impl From<contract::JobPart> for JobPartDto {
    fn from(part: contract::JobPart) -> Self {
        Self {
            partsperjobid: part.id,
            jobid: part.job_id,
            partid: part.part_id,
            quantity: part.quantity,
        }
    }
}

impl From<JobPartRequest> for contract::NewJobPart {
    fn from(req: JobPartRequest) -> Self {
        Self {
            part_id: req.partid,
            quantity: req.quantity,
        }
    }
}

impl From<JobRequest> for contract::NewJob {
    fn from(req: JobRequest) -> Self {
        Self {
            item_id: req.itemid,
            technician_id: req.technicianid,
            gang_id: req.gangid,
            job_date: req.jobdate,
            job_type: req.jobtype,
            remarks: req.remarks,
            parts: req.parts.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<JobRequest> for contract::JobUpdate {
    fn from(req: JobRequest) -> Self {
        Self {
            item_id: req.itemid,
            technician_id: req.technicianid,
            gang_id: req.gangid,
            job_date: req.jobdate,
            job_type: req.jobtype,
            remarks: req.remarks,
        }
    }
}

// ===== Note conversions =====

impl From<contract::NoteSummary> for NoteSummaryDto {
    fn from(note: contract::NoteSummary) -> Self {
        Self {
            noteid: note.id,
            itemid: note.item_id,
            serialno: note.serial_no,
            notedate: note.note_date,
            note: note.note,
            commentcount: note.comment_count,
        }
    }
}

impl From<contract::Note> for NoteDto {
    fn from(note: contract::Note) -> Self {
        Self {
            noteid: note.id,
            itemid: note.item_id,
            notedate: note.note_date,
            note: note.note,
            createdby: note.created_by,
        }
    }
}

impl From<contract::NoteComment> for NoteCommentDto {
    fn from(comment: contract::NoteComment) -> Self {
        Self {
            commentid: comment.id,
            noteid: comment.note_id,
            comment: comment.comment,
            commentdate: comment.comment_date,
            createdby: comment.created_by,
        }
    }
}

// ===== User conversions =====

impl From<contract::User> for UserDto {
    fn from(user: contract::User) -> Self {
        Self {
            userid: user.id,
            email: user.email,
            fullname: user.full_name,
            isactive: user.is_active,
        }
    }
}

impl From<CreateUserRequest> for contract::NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            id: req.userid,
            email: req.email,
            full_name: req.fullname,
        }
    }
}

impl From<contract::UserFunction> for UserFunctionDto {
    fn from(grant: contract::UserFunction) -> Self {
        Self {
            userfunctionid: grant.id,
            userid: grant.user_id,
            functionid: grant.function_id,
        }
    }
}

impl From<contract::UserPermissions> for UserPermissionsDto {
    fn from(permissions: contract::UserPermissions) -> Self {
        Self {
            userid: permissions.user_id,
            functions: permissions
                .functions
                .into_iter()
                .map(|p| PermissionDto {
                    functionid: p.function_id,
                    description: p.description,
                })
                .collect(),
        }
    }
}

// ===== Report conversions =====

fn cell_value(cell: Cell) -> serde_json::Value {
    match cell {
        Cell::Text(text) => serde_json::Value::String(text),
        Cell::Integer(n) => serde_json::Value::from(n),
        Cell::Date(date) => serde_json::Value::String(date.format("%Y-%m-%d").to_string()),
        Cell::Empty => serde_json::Value::Null,
    }
}

impl From<ReportTable> for ReportDto {
    fn from(table: ReportTable) -> Self {
        let rows = table
            .rows
            .into_iter()
            .map(|row| {
                let (kind, depth) = match row.kind {
                    RowKind::Detail => ("detail", None),
                    RowKind::Subtotal { depth } => ("subtotal", Some(depth)),
                    RowKind::GrandTotal => ("grandtotal", None),
                };
                ReportRowDto {
                    kind: kind.to_string(),
                    depth,
                    cells: row.cells.into_iter().map(cell_value).collect(),
                }
            })
            .collect();
        Self {
            title: table.title,
            filters: table.filter_labels,
            headers: table.headers,
            rows,
        }
    }
}

impl From<LocationQuery> for LocationFilter {
    fn from(query: LocationQuery) -> Self {
        Self {
            mine_id: query.mineid,
            shaft_id: query.shaftid,
            section_id: query.sectionid,
            gang_id: query.gangid,
        }
    }
}

impl From<LocationOptions> for LocationOptionsDto {
    fn from(options: LocationOptions) -> Self {
        Self {
            selection: LocationSelectionDto {
                mineid: options.selection.mine_id,
                shaftid: options.selection.shaft_id,
                sectionid: options.selection.section_id,
                gangid: options.selection.gang_id,
            },
            mines: options.mines.into_iter().map(Into::into).collect(),
            shafts: options.shafts.into_iter().map(Into::into).collect(),
            sections: options.sections.into_iter().map(Into::into).collect(),
            gangs: options.gangs.into_iter().map(Into::into).collect(),
        }
    }
}
