//! Lookup tables, equipment items, parts and technicians

mod common;

use common::Fixture;
use maintenance_service::contract::*;

fn entry(parent_id: Option<i32>, description: &str) -> NewCatalogEntry {
    NewCatalogEntry {
        parent_id,
        description: description.to_string(),
    }
}

#[tokio::test]
async fn test_sibling_descriptions_are_unique_ignoring_case() {
    let fx = Fixture::new().await;
    let s = &fx.seed;

    let err = fx
        .service
        .create_catalog_entry(CatalogKind::Shaft, entry(Some(s.kopanang), "  no. 1 SHAFT "))
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Conflict { .. }), "{err}");

    // same name under another mine is fine
    let created = fx
        .service
        .create_catalog_entry(CatalogKind::Shaft, entry(Some(s.vaal), " No. 1 Shaft "))
        .await
        .unwrap();
    assert_eq!(created.description, "No. 1 Shaft");
    assert_eq!(created.parent_id, Some(s.vaal));
    assert!(created.is_active);
}

#[tokio::test]
async fn test_rename_to_own_description_is_not_a_duplicate() {
    let fx = Fixture::new().await;
    let updated = fx
        .service
        .update_catalog_entry(CatalogKind::Mine, fx.seed.vaal, entry(None, "VAAL"))
        .await
        .unwrap();
    assert_eq!(updated.description, "VAAL");
}

#[tokio::test]
async fn test_parent_rules() {
    let fx = Fixture::new().await;

    let missing = fx
        .service
        .create_catalog_entry(CatalogKind::Gang, entry(None, "Gang C"))
        .await
        .unwrap_err();
    assert!(matches!(missing, MaintenanceError::Validation { .. }));

    let unexpected = fx
        .service
        .create_catalog_entry(CatalogKind::Mine, entry(Some(fx.seed.vaal), "Tau Lekoa"))
        .await
        .unwrap_err();
    assert!(matches!(unexpected, MaintenanceError::Validation { .. }));

    let unknown = fx
        .service
        .create_catalog_entry(CatalogKind::Section, entry(Some(9999), "Level 1"))
        .await
        .unwrap_err();
    assert_eq!(unknown, MaintenanceError::not_found("Shaft", 9999));

    let blank = fx
        .service
        .create_catalog_entry(CatalogKind::EquipmentCategory, entry(None, "   "))
        .await
        .unwrap_err();
    assert!(matches!(blank, MaintenanceError::Validation { .. }));
}

#[tokio::test]
async fn test_inactive_parent_blocks_new_children_but_not_existing_ones() {
    let fx = Fixture::new().await;
    let s = &fx.seed;
    fx.service
        .set_catalog_active(CatalogKind::Section, s.kopanang_section, false)
        .await
        .unwrap();

    let err = fx
        .service
        .create_catalog_entry(CatalogKind::Gang, entry(Some(s.kopanang_section), "Gang C"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        MaintenanceError::inactive("Section", s.kopanang_section)
    );

    let renamed = fx
        .service
        .update_catalog_entry(
            CatalogKind::Gang,
            s.gang_a,
            entry(Some(s.kopanang_section), "Gang A1"),
        )
        .await
        .unwrap();
    assert_eq!(renamed.description, "Gang A1");
}

#[tokio::test]
async fn test_list_hides_inactive_and_filters_by_parent() {
    let fx = Fixture::new().await;
    let s = &fx.seed;
    fx.service
        .create_catalog_entry(CatalogKind::Shaft, entry(Some(s.kopanang), "Adit"))
        .await
        .unwrap();
    fx.service
        .set_catalog_active(CatalogKind::Shaft, s.vaal_shaft, false)
        .await
        .unwrap();

    let active = fx
        .service
        .list_catalog(CatalogKind::Shaft, None, false)
        .await
        .unwrap();
    let names: Vec<&str> = active.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(names, vec!["Adit", "No. 1 Shaft"]);

    let all = fx
        .service
        .list_catalog(CatalogKind::Shaft, None, true)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let vaal_only = fx
        .service
        .list_catalog(CatalogKind::Shaft, Some(s.vaal), true)
        .await
        .unwrap();
    assert_eq!(vaal_only.len(), 1);
    assert!(!vaal_only[0].is_active);
}

#[tokio::test]
async fn test_functions_cannot_be_deactivated() {
    let fx = Fixture::new().await;
    let err = fx
        .service
        .set_catalog_active(CatalogKind::Function, fx.seed.admin_fn, false)
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Validation { .. }));
}

#[tokio::test]
async fn test_delete_guards() {
    let fx = Fixture::new().await;
    let s = &fx.seed;

    let with_children = fx
        .service
        .delete_catalog_entry(CatalogKind::Mine, s.vaal)
        .await
        .unwrap_err();
    assert!(matches!(with_children, MaintenanceError::Conflict { .. }));

    let with_items = fx
        .service
        .delete_catalog_entry(CatalogKind::EquipmentType, s.pump)
        .await
        .unwrap_err();
    assert!(matches!(with_items, MaintenanceError::Conflict { .. }));

    fx.record_job(s.lhd, s.sipho, s.gang_b, 4, &[]).await;
    let with_jobs = fx
        .service
        .delete_catalog_entry(CatalogKind::Gang, s.gang_b)
        .await
        .unwrap_err();
    assert!(matches!(with_jobs, MaintenanceError::Conflict { .. }));

    let granted = fx
        .service
        .delete_catalog_entry(CatalogKind::Function, s.reports_fn)
        .await
        .unwrap_err();
    assert!(matches!(granted, MaintenanceError::Conflict { .. }));
    let grants = fx.service.user_functions(s.user).await.unwrap();
    assert!(grants.iter().any(|g| g.function_id == s.reports_fn));

    fx.service
        .delete_catalog_entry(CatalogKind::Function, s.admin_fn)
        .await
        .unwrap();
    let gone = fx
        .service
        .get_catalog_entry(CatalogKind::Function, s.admin_fn)
        .await
        .unwrap_err();
    assert_eq!(gone, MaintenanceError::not_found("Function", s.admin_fn));
}

#[tokio::test]
async fn test_equipment_type_with_linked_parts_cannot_be_deleted() {
    let fx = Fixture::new().await;
    let s = &fx.seed;
    let drill = fx
        .service
        .create_catalog_entry(CatalogKind::EquipmentType, entry(Some(s.mobile), "Drill rig"))
        .await
        .unwrap();
    fx.service.link_part_to_type(drill.id, s.belt).await.unwrap();

    let err = fx
        .service
        .delete_catalog_entry(CatalogKind::EquipmentType, drill.id)
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Conflict { .. }));
}

#[tokio::test]
async fn test_detailed_views() {
    let fx = Fixture::new().await;
    let s = &fx.seed;

    let types = fx.service.equipment_types_detailed().await.unwrap();
    let pairs: Vec<(&str, &str)> = types
        .iter()
        .map(|t| (t.category.as_str(), t.description.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Fixed", "Pump"), ("Mobile", "LHD")]);

    let gangs = fx.service.locations_detailed(CatalogKind::Gang).await.unwrap();
    let gang_a = gangs.iter().find(|g| g.id == s.gang_a).unwrap();
    assert_eq!(gang_a.mine, "Kopanang");
    assert_eq!(gang_a.shaft.as_deref(), Some("No. 1 Shaft"));
    assert_eq!(gang_a.section_id, Some(s.kopanang_section));

    let err = fx
        .service
        .locations_detailed(CatalogKind::Mine)
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Validation { .. }));
}

// ===== Equipment items =====

#[tokio::test]
async fn test_serial_numbers_are_unique_ignoring_case() {
    let fx = Fixture::new().await;
    let err = fx
        .service
        .create_item(NewEquipmentItem {
            type_id: fx.seed.loader,
            serial_no: "lhd-0042".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Conflict { .. }));

    let bad = fx
        .service
        .create_item(NewEquipmentItem {
            type_id: fx.seed.loader,
            serial_no: "LHD 43".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(bad, MaintenanceError::Validation { .. }));
}

#[tokio::test]
async fn test_find_item_by_serial_trims_input() {
    let fx = Fixture::new().await;
    let item = fx.service.find_item_by_serial("  LHD-0042 ").await.unwrap();
    assert_eq!(item.id, fx.seed.lhd);
    assert_eq!(item.description.as_deref(), Some("Sandvik LH410"));

    let err = fx.service.find_item_by_serial("NOPE-1").await.unwrap_err();
    assert_eq!(err, MaintenanceError::not_found("Equipment item", "NOPE-1"));
}

#[tokio::test]
async fn test_items_need_an_active_type() {
    let fx = Fixture::new().await;
    let s = &fx.seed;
    fx.service
        .set_catalog_active(CatalogKind::EquipmentType, s.pump, false)
        .await
        .unwrap();

    let err = fx
        .service
        .create_item(NewEquipmentItem {
            type_id: s.pump,
            serial_no: "PMP-8".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, MaintenanceError::inactive("Equipment type", s.pump));

    // the existing pump keeps its (now inactive) type on update
    let updated = fx
        .service
        .update_item(
            s.pump_item,
            NewEquipmentItem {
                type_id: s.pump,
                serial_no: "PMP-7".to_string(),
                description: Some("  Shaft bottom  ".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Shaft bottom"));
}

#[tokio::test]
async fn test_item_with_history_cannot_be_deleted() {
    let fx = Fixture::new().await;
    let s = &fx.seed;
    fx.record_job(s.pump_item, s.thandi, s.gang_a, 2, &[]).await;

    let err = fx.service.delete_item(s.pump_item).await.unwrap_err();
    assert!(matches!(err, MaintenanceError::Conflict { .. }));

    let spare = fx
        .service
        .create_item(NewEquipmentItem {
            type_id: s.loader,
            serial_no: "LHD-0099".to_string(),
            description: None,
        })
        .await
        .unwrap();
    fx.service.delete_item(spare.id).await.unwrap();
    let items = fx.service.list_items(Some(s.loader)).await.unwrap();
    assert_eq!(items.len(), 1);
}

// ===== Parts =====

#[tokio::test]
async fn test_part_numbers_are_unique() {
    let fx = Fixture::new().await;
    let err = fx
        .service
        .create_part(NewPart {
            part_no: "f-100".to_string(),
            description: "Another filter".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Conflict { .. }));

    let parts = fx.service.list_parts().await.unwrap();
    let numbers: Vec<&str> = parts.iter().map(|p| p.part_no.as_str()).collect();
    assert_eq!(numbers, vec!["B-220", "F-100"]);
}

#[tokio::test]
async fn test_link_and_unlink_parts() {
    let fx = Fixture::new().await;
    let s = &fx.seed;

    let link = fx.service.link_part_to_type(s.loader, s.filter).await.unwrap();
    assert_eq!(link.part_no, "F-100");
    assert_eq!(link.part_description, "Oil filter");

    let again = fx
        .service
        .link_part_to_type(s.loader, s.filter)
        .await
        .unwrap_err();
    assert!(matches!(again, MaintenanceError::Conflict { .. }));

    let linked = fx.service.delete_part(s.filter).await.unwrap_err();
    assert!(matches!(linked, MaintenanceError::Conflict { .. }));

    fx.service.unlink_part_from_type(link.id).await.unwrap();
    assert!(fx.service.parts_for_type(s.loader).await.unwrap().is_empty());

    let missing = fx.service.unlink_part_from_type(link.id).await.unwrap_err();
    assert_eq!(missing, MaintenanceError::not_found("Part link", link.id));

    fx.service.delete_part(s.filter).await.unwrap();
}

#[tokio::test]
async fn test_inactive_part_cannot_be_linked() {
    let fx = Fixture::new().await;
    let s = &fx.seed;
    fx.service.set_part_active(s.belt, false).await.unwrap();
    let err = fx
        .service
        .link_part_to_type(s.pump, s.belt)
        .await
        .unwrap_err();
    assert_eq!(err, MaintenanceError::inactive("Part", s.belt));
}

// ===== Technicians =====

#[tokio::test]
async fn test_technicians_sorted_and_unique() {
    let fx = Fixture::new().await;
    fx.service
        .create_technician(NewTechnician {
            name: "Andile".to_string(),
            surname: "Bhengu".to_string(),
        })
        .await
        .unwrap();

    let dup = fx
        .service
        .create_technician(NewTechnician {
            name: "sipho".to_string(),
            surname: "DLAMINI".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(dup, MaintenanceError::Conflict { .. }));

    let names: Vec<String> = fx
        .service
        .list_technicians()
        .await
        .unwrap()
        .iter()
        .map(Technician::full_name)
        .collect();
    assert_eq!(names, vec!["Andile Bhengu", "Sipho Dlamini", "Thandi Mokoena"]);
}

#[tokio::test]
async fn test_technician_with_jobs_cannot_be_deleted() {
    let fx = Fixture::new().await;
    let s = &fx.seed;
    fx.record_job(s.lhd, s.sipho, s.gang_a, 1, &[]).await;

    let err = fx.service.delete_technician(s.sipho).await.unwrap_err();
    assert!(matches!(err, MaintenanceError::Conflict { .. }));

    fx.service.delete_technician(s.thandi).await.unwrap();
    let err = fx.service.get_technician(s.thandi).await.unwrap_err();
    assert_eq!(err, MaintenanceError::not_found("Technician", s.thandi));
}
