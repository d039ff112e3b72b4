//! Cascading mine → shaft → section → gang filter plus the date range /
//! equipment type filter shared by all report screens

use super::validation::unique_key;
use crate::contract::{CatalogEntry, CatalogKind, LocationDetail, ReportPeriod};

/// Selected location; a level is only meaningful when its parent is set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationFilter {
    pub mine_id: Option<i32>,
    pub shaft_id: Option<i32>,
    pub section_id: Option<i32>,
    pub gang_id: Option<i32>,
}

/// Location columns carried by a report row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationIds {
    pub mine_id: i32,
    pub shaft_id: i32,
    pub section_id: i32,
    pub gang_id: i32,
}

impl LocationFilter {
    /// Select a mine; clears shaft, section and gang
    pub fn select_mine(&mut self, mine_id: Option<i32>) {
        self.mine_id = mine_id;
        self.shaft_id = None;
        self.section_id = None;
        self.gang_id = None;
    }

    /// Select a shaft; clears section and gang
    pub fn select_shaft(&mut self, shaft_id: Option<i32>) {
        self.shaft_id = shaft_id;
        self.section_id = None;
        self.gang_id = None;
    }

    /// Select a section; clears gang
    pub fn select_section(&mut self, section_id: Option<i32>) {
        self.section_id = section_id;
        self.gang_id = None;
    }

    pub fn select_gang(&mut self, gang_id: Option<i32>) {
        self.gang_id = gang_id;
    }

    pub fn is_empty(&self) -> bool {
        self.mine_id.is_none()
            && self.shaft_id.is_none()
            && self.section_id.is_none()
            && self.gang_id.is_none()
    }

    /// Make the selection consistent with the location hierarchy
    ///
    /// A level that is unknown or belongs to a different parent is dropped
    /// together with everything below it. A level given without its
    /// ancestors gets them filled in from the hierarchy.
    pub fn normalize(
        self,
        shafts: &[LocationDetail],
        sections: &[LocationDetail],
        gangs: &[LocationDetail],
    ) -> Self {
        let mut out = LocationFilter {
            mine_id: self.mine_id,
            ..Default::default()
        };

        if let Some(shaft_id) = self.shaft_id {
            match shafts.iter().find(|s| s.id == shaft_id) {
                Some(shaft) if out.mine_id.map_or(true, |m| m == shaft.mine_id) => {
                    out.mine_id = Some(shaft.mine_id);
                    out.shaft_id = Some(shaft_id);
                }
                _ => return out,
            }
        }

        if let Some(section_id) = self.section_id {
            match sections.iter().find(|s| s.id == section_id) {
                Some(section)
                    if (out.shaft_id.is_none() || out.shaft_id == section.shaft_id)
                        && out.mine_id.map_or(true, |m| m == section.mine_id) =>
                {
                    out.mine_id = Some(section.mine_id);
                    out.shaft_id = section.shaft_id;
                    out.section_id = Some(section_id);
                }
                _ => return out,
            }
        }

        if let Some(gang_id) = self.gang_id {
            if let Some(gang) = gangs.iter().find(|g| g.id == gang_id) {
                let fits = (out.section_id.is_none() || out.section_id == gang.section_id)
                    && (out.shaft_id.is_none() || out.shaft_id == gang.shaft_id)
                    && out.mine_id.map_or(true, |m| m == gang.mine_id);
                if fits {
                    out.mine_id = Some(gang.mine_id);
                    out.shaft_id = gang.shaft_id;
                    out.section_id = gang.section_id;
                    out.gang_id = Some(gang_id);
                }
            }
        }

        out
    }

    pub fn matches(&self, location: &LocationIds) -> bool {
        self.mine_id.map_or(true, |id| id == location.mine_id)
            && self.shaft_id.map_or(true, |id| id == location.shaft_id)
            && self.section_id.map_or(true, |id| id == location.section_id)
            && self.gang_id.map_or(true, |id| id == location.gang_id)
    }
}

/// Report rows that can be narrowed by the report filter
pub trait FilterSubject {
    /// Whether `location` ever returns `Some` for this row type
    const HAS_LOCATION: bool = false;

    fn equipment_type_id(&self) -> Option<i32> {
        None
    }

    /// `None` when the row carries no location columns
    fn location(&self) -> Option<LocationIds> {
        None
    }
}

/// Date range + equipment type + location selection of a report screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub period: Option<ReportPeriod>,
    pub equipment_type_id: Option<i32>,
    pub location: LocationFilter,
}

impl ReportFilter {
    pub fn matches<T: FilterSubject>(&self, row: &T) -> bool {
        if let (Some(wanted), Some(actual)) = (self.equipment_type_id, row.equipment_type_id()) {
            if wanted != actual {
                return false;
            }
        }
        match row.location() {
            Some(location) => self.location.matches(&location),
            None => true,
        }
    }

    pub fn apply<T: FilterSubject>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }

    /// The part of the filter that rows of type `T` can be narrowed by
    pub fn scoped<T: FilterSubject>(&self) -> Self {
        if T::HAS_LOCATION {
            *self
        } else {
            Self {
                location: LocationFilter::default(),
                ..*self
            }
        }
    }

    /// Lines printed under an exported report's title
    ///
    /// `describe` resolves a lookup id to its description; unresolved ids
    /// are printed as `#id`.
    pub fn labels(&self, describe: impl Fn(CatalogKind, i32) -> Option<String>) -> Vec<String> {
        let mut labels = Vec::new();
        if let Some(period) = self.period {
            labels.push(format!("Period: {} to {}", period.start, period.end));
        }
        let selections = [
            (CatalogKind::EquipmentType, self.equipment_type_id),
            (CatalogKind::Mine, self.location.mine_id),
            (CatalogKind::Shaft, self.location.shaft_id),
            (CatalogKind::Section, self.location.section_id),
            (CatalogKind::Gang, self.location.gang_id),
        ];
        for (kind, id) in selections {
            if let Some(id) = id {
                let name = describe(kind, id).unwrap_or_else(|| format!("#{}", id));
                labels.push(format!("{}: {}", kind.resource(), name));
            }
        }
        labels
    }
}

/// Dropdown contents for the cascading location filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationOptions {
    pub selection: LocationFilter,
    pub mines: Vec<CatalogEntry>,
    pub shafts: Vec<LocationDetail>,
    pub sections: Vec<LocationDetail>,
    pub gangs: Vec<LocationDetail>,
}

/// Normalize `filter` and list the choices available at every level
///
/// A level only offers choices once its parent is selected.
pub fn location_options(
    filter: LocationFilter,
    mut mines: Vec<CatalogEntry>,
    shafts: Vec<LocationDetail>,
    sections: Vec<LocationDetail>,
    gangs: Vec<LocationDetail>,
) -> LocationOptions {
    let selection = filter.normalize(&shafts, &sections, &gangs);

    mines.sort_by_cached_key(|m| unique_key(&m.description));

    let mut shafts: Vec<LocationDetail> = match selection.mine_id {
        Some(mine_id) => shafts.into_iter().filter(|s| s.mine_id == mine_id).collect(),
        None => Vec::new(),
    };
    let mut sections: Vec<LocationDetail> = match selection.shaft_id {
        Some(shaft_id) => sections
            .into_iter()
            .filter(|s| s.shaft_id == Some(shaft_id))
            .collect(),
        None => Vec::new(),
    };
    let mut gangs: Vec<LocationDetail> = match selection.section_id {
        Some(section_id) => gangs
            .into_iter()
            .filter(|g| g.section_id == Some(section_id))
            .collect(),
        None => Vec::new(),
    };
    for list in [&mut shafts, &mut sections, &mut gangs] {
        list.sort_by_cached_key(|l| unique_key(&l.description));
    }

    LocationOptions {
        selection,
        mines,
        shafts,
        sections,
        gangs,
    }
}
