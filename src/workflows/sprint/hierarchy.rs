use super::domain::{serialize_date_label, IssueRole, IssueRow};
use chrono::NaiveDate;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub const UNLINKED_GROUP_KEY: &str = "\u{2014}";
pub const UNLINKED_GROUP_TYPE: &str = "Group";
pub const UNLINKED_GROUP_SUMMARY: &str = "UNLINKED / STANDALONE ITEMS";
pub const EXTERNAL_EPIC_TYPE: &str = "Epic";
pub const EXTERNAL_EPIC_PREFIX: &str = "[EXTERNAL EPIC]";

/// Depth of a node in the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HierarchyLevel {
    Group,
    Item,
    SubTask,
}

impl HierarchyLevel {
    pub const fn depth(self) -> u8 {
        match self {
            Self::Group => 0,
            Self::Item => 1,
            Self::SubTask => 2,
        }
    }
}

impl Serialize for HierarchyLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.depth())
    }
}

/// How a level-0 group came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// An epic row present in the export.
    Epic,
    /// Header fabricated for a parent key that is not an epic in the export.
    ExternalEpic,
    /// Catch-all for parentless stories and orphaned sub-tasks.
    Unlinked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    pub level: HierarchyLevel,
    pub issue_key: String,
    pub issue_type: String,
    pub summary: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
    #[serde(serialize_with = "serialize_date_label")]
    pub target_start: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_date_label")]
    pub target_end: Option<NaiveDate>,
    pub latest_comment: String,
}

impl HierarchyNode {
    fn from_row(row: &IssueRow, level: HierarchyLevel) -> Self {
        Self {
            level,
            issue_key: row.key.clone(),
            issue_type: row.issue_type.label().to_string(),
            summary: row.summary.clone(),
            status: row.status.clone(),
            priority: row.priority.clone(),
            assignee: row.assignee.clone(),
            target_start: row.target_start,
            target_end: row.target_end,
            latest_comment: row.latest_comment.clone(),
        }
    }

    fn placeholder(issue_key: &str, issue_type: &str, summary: String) -> Self {
        Self {
            level: HierarchyLevel::Group,
            issue_key: issue_key.to_string(),
            issue_type: issue_type.to_string(),
            summary,
            status: String::new(),
            priority: String::new(),
            assignee: String::new(),
            target_start: None,
            target_end: None,
            latest_comment: String::new(),
        }
    }
}

/// A level-0 header and everything listed beneath it, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyGroup {
    pub kind: GroupKind,
    pub header: HierarchyNode,
    pub members: Vec<HierarchyNode>,
}

impl HierarchyGroup {
    fn new(kind: GroupKind, header: HierarchyNode) -> Self {
        Self {
            kind,
            header,
            members: Vec::new(),
        }
    }

    /// Keys of the level-1 items placed in this group.
    pub fn item_keys(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|node| node.level == HierarchyLevel::Item)
            .map(|node| node.issue_key.as_str())
    }
}

/// One slot of the flattened hierarchy; spacers sit between level-0 groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyEntry<'a> {
    Node(&'a HierarchyNode),
    Spacer,
}

impl HierarchyEntry<'_> {
    pub fn node(&self) -> Option<&HierarchyNode> {
        match self {
            HierarchyEntry::Node(node) => Some(node),
            HierarchyEntry::Spacer => None,
        }
    }
}

/// Ordered forest produced by [`reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    groups: Vec<HierarchyGroup>,
}

impl Hierarchy {
    pub fn groups(&self) -> &[HierarchyGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every node top-to-bottom, without spacers.
    pub fn nodes(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.groups
            .iter()
            .flat_map(|group| std::iter::once(&group.header).chain(group.members.iter()))
    }

    /// Nodes in output order with a spacer before every group header but the first.
    pub fn entries(&self) -> Vec<HierarchyEntry<'_>> {
        let mut entries = Vec::new();
        for (index, group) in self.groups.iter().enumerate() {
            if index > 0 {
                entries.push(HierarchyEntry::Spacer);
            }
            entries.push(HierarchyEntry::Node(&group.header));
            entries.extend(group.members.iter().map(HierarchyEntry::Node));
        }
        entries
    }
}

impl Serialize for Hierarchy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut seq = serializer.serialize_seq(Some(entries.len()))?;
        for entry in &entries {
            seq.serialize_element(&entry.node())?;
        }
        seq.end()
    }
}

/// Story-role and sub-task rows bucketed by parent key, file order kept per bucket.
struct RowIndex<'a> {
    epics: Vec<&'a IssueRow>,
    stories: Vec<&'a IssueRow>,
    subtasks: Vec<&'a IssueRow>,
    stories_by_parent: HashMap<&'a str, Vec<&'a IssueRow>>,
    subtasks_by_parent: HashMap<&'a str, Vec<&'a IssueRow>>,
}

impl<'a> RowIndex<'a> {
    fn build(rows: &'a [IssueRow]) -> Self {
        let mut index = RowIndex {
            epics: Vec::new(),
            stories: Vec::new(),
            subtasks: Vec::new(),
            stories_by_parent: HashMap::new(),
            subtasks_by_parent: HashMap::new(),
        };

        for row in rows {
            match row.role() {
                Some(IssueRole::Epic) => index.epics.push(row),
                Some(IssueRole::Story) => {
                    index.stories.push(row);
                    if let Some(parent) = row.parent() {
                        index.stories_by_parent.entry(parent).or_default().push(row);
                    }
                }
                Some(IssueRole::SubTask) => {
                    index.subtasks.push(row);
                    if let Some(parent) = row.parent() {
                        index.subtasks_by_parent.entry(parent).or_default().push(row);
                    }
                }
                None => {}
            }
        }

        index
    }

    fn subtasks_of(&self, story_key: &str) -> &[&'a IssueRow] {
        self.subtasks_by_parent
            .get(story_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn stories_of(&self, epic_key: &str) -> &[&'a IssueRow] {
        self.stories_by_parent
            .get(epic_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Rebuilds the Epic → Story → Sub-task tree from a flat export.
///
/// Three passes run in order: epics present in the export claim their
/// stories, stories pointing at unknown parents are grouped under a
/// synthetic header per parent key, and whatever remains (parentless
/// stories, sub-tasks whose parent story was never placed) is collected in a
/// single unlinked group. Every story-role and sub-task row lands exactly
/// once; rows with an unrecognised type are left out.
pub fn reconcile(rows: &[IssueRow]) -> Hierarchy {
    let index = RowIndex::build(rows);
    let mut processed: HashSet<&str> = HashSet::new();
    let mut groups = Vec::new();

    for epic in &index.epics {
        let mut group = HierarchyGroup::new(
            GroupKind::Epic,
            HierarchyNode::from_row(epic, HierarchyLevel::Group),
        );
        for story in index.stories_of(&epic.key) {
            if processed.insert(story.key.as_str()) {
                place_story(&mut group, story, &index);
            }
        }
        groups.push(group);
    }

    let mut external: Vec<(&str, Vec<&IssueRow>)> = Vec::new();
    let mut external_slots: HashMap<&str, usize> = HashMap::new();
    for story in index.stories.iter().copied() {
        if processed.contains(story.key.as_str()) {
            continue;
        }
        let Some(parent) = story.parent() else {
            continue;
        };
        let slot = *external_slots.entry(parent).or_insert_with(|| {
            external.push((parent, Vec::new()));
            external.len() - 1
        });
        external[slot].1.push(story);
    }

    for (parent, stories) in external {
        let header = HierarchyNode::placeholder(
            parent,
            EXTERNAL_EPIC_TYPE,
            format!("{EXTERNAL_EPIC_PREFIX} {parent}"),
        );
        let mut group = HierarchyGroup::new(GroupKind::ExternalEpic, header);
        for story in stories {
            processed.insert(story.key.as_str());
            place_story(&mut group, story, &index);
        }
        groups.push(group);
    }

    let standalone: Vec<&IssueRow> = index
        .stories
        .iter()
        .copied()
        .filter(|story| !processed.contains(story.key.as_str()))
        .collect();
    let orphans: Vec<&IssueRow> = index
        .subtasks
        .iter()
        .copied()
        .filter(|subtask| {
            subtask
                .parent()
                .map_or(true, |parent| !processed.contains(parent))
        })
        .collect();

    if !standalone.is_empty() || !orphans.is_empty() {
        let header = HierarchyNode::placeholder(
            UNLINKED_GROUP_KEY,
            UNLINKED_GROUP_TYPE,
            UNLINKED_GROUP_SUMMARY.to_string(),
        );
        let mut group = HierarchyGroup::new(GroupKind::Unlinked, header);
        group.members.extend(
            standalone
                .iter()
                .map(|story| HierarchyNode::from_row(story, HierarchyLevel::Item)),
        );
        group.members.extend(
            orphans
                .iter()
                .map(|subtask| HierarchyNode::from_row(subtask, HierarchyLevel::SubTask)),
        );
        groups.push(group);
    }

    debug!(
        epics = index.epics.len(),
        stories = index.stories.len(),
        subtasks = index.subtasks.len(),
        groups = groups.len(),
        standalone = standalone.len(),
        orphans = orphans.len(),
        "reconciled export hierarchy"
    );

    Hierarchy { groups }
}

fn place_story(group: &mut HierarchyGroup, story: &IssueRow, index: &RowIndex<'_>) {
    group
        .members
        .push(HierarchyNode::from_row(story, HierarchyLevel::Item));
    group.members.extend(
        index
            .subtasks_of(&story.key)
            .iter()
            .map(|subtask| HierarchyNode::from_row(subtask, HierarchyLevel::SubTask)),
    );
}
