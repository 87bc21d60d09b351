pub mod domain;
pub mod hierarchy;
pub mod kpi;
pub mod metadata;
mod overview;
pub mod report;

pub use domain::{IssueRole, IssueRow, IssueType};
pub use hierarchy::{reconcile, GroupKind, Hierarchy, HierarchyEntry, HierarchyLevel, HierarchyNode};
pub use kpi::{aggregate, daily_task_count, Percentage, SprintKpis, StatusBucket};
pub use metadata::{MetadataProblem, SprintMetadata, SprintMetadataError};
pub use overview::{ExportOverview, StatusCount};
pub use report::{
    RenderedReport, ReportBuilder, ReportOptions, ReportRenderError, ReportTheme,
    XLSX_CONTENT_TYPE,
};

use serde::Serialize;

/// Everything the renderer needs from an export: the ordered tree and its KPIs.
#[derive(Debug, Clone, Serialize)]
pub struct SprintAnalysis {
    pub hierarchy: Hierarchy,
    pub kpis: SprintKpis,
}

impl SprintAnalysis {
    /// Runs the reconciler and the aggregator over the same read-only rows.
    pub fn from_rows(rows: &[IssueRow]) -> Self {
        Self {
            hierarchy: reconcile(rows),
            kpis: aggregate(rows),
        }
    }
}
