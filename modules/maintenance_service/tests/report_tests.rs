//! Grouped reports, report filters and exports

mod common;

use common::{date, march_2024, Fixture};
use maintenance_service::contract::*;
use maintenance_service::domain::{LocationFilter, ReportFilter};
use maintenance_service::export::{render, Cell, ExportFormat, RowKind};

/// Three March jobs and one in April
///
/// 1. LHD-0042, Sipho, Gang A (Kopanang), filter x2 + belt x1
/// 2. PMP-7, Thandi, Gang B (Vaal), filter x1
/// 3. LHD-0042, Thandi, Gang A, no parts
async fn with_jobs() -> Fixture {
    let fx = Fixture::new().await;
    let s = fx.seed.clone();
    fx.record_job(s.lhd, s.sipho, s.gang_a, 4, &[(s.filter, 2), (s.belt, 1)])
        .await;
    fx.record_job(s.pump_item, s.thandi, s.gang_b, 10, &[(s.filter, 1)])
        .await;
    fx.record_job(s.lhd, s.thandi, s.gang_a, 20, &[]).await;
    fx.service
        .create_job(NewJob {
            item_id: s.lhd,
            technician_id: s.sipho,
            gang_id: s.gang_a,
            job_date: date(2024, 4, 2),
            job_type: "Inspection".to_string(),
            remarks: None,
            parts: vec![],
        })
        .await
        .unwrap();
    fx
}

fn march() -> ReportFilter {
    ReportFilter {
        period: Some(march_2024()),
        ..Default::default()
    }
}

fn kinds(rows: &[maintenance_service::export::TableRow]) -> Vec<RowKind> {
    rows.iter().map(|r| r.kind).collect()
}

#[tokio::test]
async fn test_services_done_groups_by_mine_and_shaft() {
    let fx = with_jobs().await;
    let report = fx.service.services_done(march()).await.unwrap();
    let table = &report.table;

    assert_eq!(table.title, "MineTrack - Services Done");
    assert_eq!(table.filter_labels, vec!["Period: 2024-03-01 to 2024-03-31"]);
    assert_eq!(report.file_stem, "services_done_2024-03-01_2024-03-31");
    assert_eq!(
        kinds(&table.rows),
        vec![
            RowKind::Detail,
            RowKind::Detail,
            RowKind::Detail,
            RowKind::Subtotal { depth: 1 },
            RowKind::Subtotal { depth: 0 },
            RowKind::Detail,
            RowKind::Subtotal { depth: 1 },
            RowKind::Subtotal { depth: 0 },
            RowKind::GrandTotal,
        ]
    );
    assert_eq!(table.rows[4].cells[0], Cell::Text("Total Mine: Kopanang".to_string()));
    assert_eq!(table.rows[4].cells[9], Cell::Integer(3));
    assert_eq!(table.rows[8].cells[9], Cell::Integer(4));

    // the job without parts still shows, with empty part columns
    let bare = &table.rows[2];
    assert_eq!(bare.cells[7], Cell::Empty);
    assert_eq!(bare.cells[9], Cell::Integer(0));
}

#[tokio::test]
async fn test_location_filter_narrows_rows_and_labels() {
    let fx = with_jobs().await;
    let s = &fx.seed;

    let filter = ReportFilter {
        location: LocationFilter {
            mine_id: Some(s.vaal),
            ..Default::default()
        },
        ..march()
    };
    let report = fx.service.services_done(filter).await.unwrap();
    let details: Vec<_> = report
        .table
        .rows
        .iter()
        .filter(|r| r.kind == RowKind::Detail)
        .collect();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].cells[2], Cell::Text("PMP-7".to_string()));
    assert_eq!(report.table.filter_labels[1], "Mine: Vaal");
}

#[tokio::test]
async fn test_gang_filter_fills_in_its_ancestors() {
    let fx = with_jobs().await;
    let s = &fx.seed;

    let filter = ReportFilter {
        location: LocationFilter {
            gang_id: Some(s.gang_b),
            ..Default::default()
        },
        ..march()
    };
    let report = fx.service.jobs_per_technician(filter).await.unwrap();
    assert_eq!(
        report.table.filter_labels,
        vec![
            "Period: 2024-03-01 to 2024-03-31",
            "Mine: Vaal",
            "Shaft: Main",
            "Section: Level 7",
            "Gang: Gang B",
        ]
    );
    assert_eq!(report.table.rows.len(), 3);
}

#[tokio::test]
async fn test_reports_without_location_columns_skip_location_labels() {
    let fx = with_jobs().await;
    let filter = ReportFilter {
        location: LocationFilter {
            mine_id: Some(fx.seed.vaal),
            ..Default::default()
        },
        ..march()
    };
    let report = fx.service.job_count(filter).await.unwrap();
    assert_eq!(report.table.filter_labels, vec!["Period: 2024-03-01 to 2024-03-31"]);
    // Kopanang jobs are still counted
    let grand = report.table.rows.last().unwrap();
    assert_eq!(grand.cells[3], Cell::Integer(3));
}

#[tokio::test]
async fn test_service_list_by_equipment_type() {
    let fx = with_jobs().await;
    let filter = ReportFilter {
        equipment_type_id: Some(fx.seed.pump),
        ..march()
    };
    let report = fx.service.service_list(filter).await.unwrap();
    let table = &report.table;

    assert_eq!(table.filter_labels[1], "Equipment type: Pump");
    assert_eq!(table.rows.len(), 4);
    assert_eq!(table.rows[0].cells[0], Cell::Text("PMP-7".to_string()));
    assert_eq!(table.rows[0].cells[3], Cell::Date(date(2024, 3, 10)));
    assert_eq!(table.rows[2].cells[0], Cell::Text("Total Category: Fixed".to_string()));
}

#[tokio::test]
async fn test_jobs_per_technician_counts_jobs_not_parts() {
    let fx = with_jobs().await;
    let report = fx.service.jobs_per_technician(march()).await.unwrap();
    let subtotals: Vec<(&Cell, &Cell)> = report
        .table
        .rows
        .iter()
        .filter(|r| r.kind != RowKind::Detail)
        .map(|r| (&r.cells[0], &r.cells[5]))
        .collect();
    assert_eq!(
        subtotals,
        vec![
            (&Cell::Text("Total Technician: Sipho Dlamini".to_string()), &Cell::Integer(1)),
            (&Cell::Text("Total Technician: Thandi Mokoena".to_string()), &Cell::Integer(2)),
            (&Cell::Text("Grand Total".to_string()), &Cell::Integer(3)),
        ]
    );
}

#[tokio::test]
async fn test_job_count_per_item() {
    let fx = with_jobs().await;
    let report = fx.service.job_count(march()).await.unwrap();
    let table = &report.table;

    assert_eq!(report.file_stem, "job_count_2024-03-01_2024-03-31");
    assert_eq!(table.rows[0].cells[0], Cell::Text("LHD-0042".to_string()));
    assert_eq!(table.rows[0].cells[3], Cell::Integer(2));
    let grand = table.rows.last().unwrap();
    assert_eq!(grand.kind, RowKind::GrandTotal);
    assert_eq!(grand.cells[3], Cell::Integer(3));
}

#[tokio::test]
async fn test_individual_history() {
    let fx = with_jobs().await;
    let report = fx.service.individual_history(fx.seed.lhd).await.unwrap();
    let table = &report.table;

    assert_eq!(report.file_stem, "individual_history_LHD-0042");
    assert_eq!(
        table.filter_labels,
        vec!["Serial No: LHD-0042", "Equipment Type: LHD"]
    );
    // job 1 twice (two parts), job 3, the April job, grand total
    assert_eq!(table.rows.len(), 5);
    assert_eq!(table.rows[4].cells[7], Cell::Integer(3));

    let err = fx.service.individual_history(31337).await.unwrap_err();
    assert_eq!(err, MaintenanceError::not_found("Equipment item", 31337));
}

#[tokio::test]
async fn test_period_rules() {
    let fx = with_jobs().await;

    let reversed = ReportFilter {
        period: Some(ReportPeriod {
            start: date(2024, 3, 31),
            end: date(2024, 3, 1),
        }),
        ..Default::default()
    };
    let err = fx.service.job_count(reversed).await.unwrap_err();
    assert!(matches!(err, MaintenanceError::Validation { .. }));

    // without dates the report covers the recent past, which holds no 2024 jobs
    let recent = fx.service.job_count(ReportFilter::default()).await.unwrap();
    assert_eq!(recent.table.rows.len(), 1);
    assert!(recent.table.filter_labels[0].starts_with("Period: "));
}

#[tokio::test]
async fn test_storage_failure_is_internal() {
    let fx = with_jobs().await;
    fx.db.fail_reports();
    let err = fx.service.services_done(march()).await.unwrap_err();
    assert_eq!(err, MaintenanceError::Internal);
}

#[tokio::test]
async fn test_location_options_cascade() {
    let fx = Fixture::new().await;
    let s = &fx.seed;

    let empty = fx
        .service
        .location_options(LocationFilter::default())
        .await
        .unwrap();
    assert_eq!(empty.mines.len(), 2);
    assert!(empty.shafts.is_empty());

    let options = fx
        .service
        .location_options(LocationFilter {
            shaft_id: Some(s.kopanang_shaft),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(options.selection.mine_id, Some(s.kopanang));
    assert_eq!(options.shafts.len(), 1);
    assert_eq!(options.sections.len(), 1);
    assert_eq!(options.sections[0].id, s.kopanang_section);
    assert!(options.gangs.is_empty());
}

#[tokio::test]
async fn test_generated_report_exports() {
    let fx = with_jobs().await;
    let report = fx.service.services_done(march()).await.unwrap();

    let csv = render(&report.table, ExportFormat::Csv).unwrap();
    let text = String::from_utf8(csv).unwrap();
    assert!(text.starts_with("MineTrack - Services Done"));
    assert!(text.contains("Total Mine: Vaal"));

    let xlsx = render(&report.table, ExportFormat::Xlsx).unwrap();
    assert_eq!(&xlsx[..2], b"PK");

    let pdf = render(&report.table, ExportFormat::Pdf).unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    assert_eq!(
        ExportFormat::Xlsx.file_name(&report.file_stem),
        "services_done_2024-03-01_2024-03-31.xlsx"
    );
}
