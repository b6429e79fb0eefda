//! The screen editor's concrete section type and its default factory.
//!
//! A section is a rectangle with identity, stacking order, and an
//! open-ended `props` payload the widget subsystem owns. The kind tag
//! decides default content and default size only; nothing in the geometry
//! engine branches on it apart from [`SectionKind::Container`] being able
//! to host a drill-down scope.

#[cfg(test)]
#[path = "section_test.rs"]
mod section_test;

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::entity::{EntityFactory, EntityId, LayoutEntity};
use crate::geom::Frame;

/// The kind of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Nestable container; can become a drill-down scope.
    Container,
    /// Single widget host.
    Single,
    /// Spreadsheet-style grid host.
    Grid,
    /// Tabbed widget host.
    Tab,
    /// Search bar strip.
    Search,
    /// Frame-template header band.
    Header,
    /// Frame-template side rail.
    Sider,
    /// Frame-template content region.
    Region,
}

impl SectionKind {
    /// Whether sections of this kind may host child sections.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Container)
    }
}

/// A section as stored in the geometry model and in snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier.
    pub id: EntityId,
    /// Content kind tag.
    pub kind: SectionKind,
    /// World-space frame.
    pub frame: Frame,
    /// Stacking order among siblings in the same scope.
    pub z: i64,
    /// Locked sections are immune to pointer-driven edits.
    #[serde(default)]
    pub lock: bool,
    /// Owning container scope; `None` at root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_scope: Option<EntityId>,
    /// Open-ended per-kind payload (titles, widget bindings, …), owned by
    /// the content subsystem and opaque to the engine.
    #[serde(default = "empty_props")]
    pub props: serde_json::Value,
}

fn empty_props() -> serde_json::Value {
    json!({})
}

impl LayoutEntity for Section {
    fn id(&self) -> EntityId {
        self.id
    }

    fn frame(&self) -> Frame {
        self.frame
    }

    fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    fn z(&self) -> i64 {
        self.z
    }

    fn set_z(&mut self, z: i64) {
        self.z = z;
    }

    fn locked(&self) -> bool {
        self.lock
    }

    fn parent_scope(&self) -> Option<EntityId> {
        self.parent_scope
    }

    fn scopeable(&self) -> bool {
        self.kind.is_container()
    }
}

/// Default factory for screen-editor sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionFactory;

impl SectionFactory {
    fn default_props(kind: SectionKind) -> serde_json::Value {
        match kind {
            SectionKind::Grid => json!({ "rows": 2, "cols": 2 }),
            SectionKind::Tab => json!({ "tabs": ["Tab 1"] }),
            SectionKind::Search => json!({ "placeholder": "Search" }),
            _ => json!({}),
        }
    }
}

impl EntityFactory for SectionFactory {
    type Entity = Section;
    type Kind = SectionKind;

    fn create(&self, kind: SectionKind, frame: Frame, scope: Option<EntityId>) -> Section {
        Section {
            id: Uuid::new_v4(),
            kind,
            frame,
            z: 0,
            lock: false,
            parent_scope: scope,
            props: Self::default_props(kind),
        }
    }

    fn default_size(&self, kind: SectionKind) -> (f64, f64) {
        match kind {
            SectionKind::Container => (400.0, 300.0),
            SectionKind::Single => (320.0, 240.0),
            SectionKind::Grid => (480.0, 320.0),
            SectionKind::Tab => (400.0, 280.0),
            SectionKind::Search => (360.0, 80.0),
            SectionKind::Header => (960.0, 80.0),
            SectionKind::Sider => (240.0, 600.0),
            SectionKind::Region => (480.0, 360.0),
        }
    }

    fn duplicate(&self, source: &Section) -> Section {
        Section { id: Uuid::new_v4(), ..source.clone() }
    }
}
