use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::hierarchy::sqlite::SqliteQuery;
use crate::hierarchy::{HierarchyNode, SqlNode};

/// Organization (team) node. `parent_id == 0` marks a top-level organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub parent_id: i64,
    pub level: i64,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(default)]
    pub children: Vec<Organization>,
}

impl HierarchyNode for Organization {
    const KIND: &'static str = "organization";

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn parent_id(&self) -> i64 {
        self.parent_id
    }
    fn set_parent_id(&mut self, parent_id: i64) {
        self.parent_id = parent_id;
    }
    fn level(&self) -> i64 {
        self.level
    }
    fn set_level(&mut self, level: i64) {
        self.level = level;
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn children(&self) -> &[Self] {
        &self.children
    }
    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    fn merge_editable(&mut self, patch: Self) {
        self.name = patch.name;
        self.description = patch.description;
        self.parent_id = patch.parent_id;
    }
}

impl SqlNode for Organization {
    const TABLE: &'static str = "organizations";
    const COLUMNS: &'static [&'static str] = &["name", "parent_id", "level", "description"];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            parent_id: row.try_get("parent_id")?,
            level: row.try_get("level")?,
            description: row.try_get("description")?,
            children: Vec::new(),
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.name.as_str()).bind(self.parent_id).bind(self.level).bind(self.description.as_str())
    }
}

/// Request body for creating or updating an organization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPayload {
    pub name: String,
    /// Omitted on create means root; omitted on update keeps the current parent.
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default, rename = "desc")]
    pub description: String,
}

impl From<OrganizationPayload> for Organization {
    fn from(p: OrganizationPayload) -> Self {
        Self { id: 0, name: p.name, parent_id: p.parent_id.unwrap_or(0), level: 0, description: p.description, children: Vec::new() }
    }
}

/// Front-end route entry; nests exactly like organizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: i64,
    pub path: String,
    pub name: String,
    pub component: String,
    pub redirect: String,
    pub title: String,
    pub icon: String,
    pub order_no: i64,
    pub hidden: bool,
    pub keep_alive: bool,
    pub parent_id: i64,
    pub application_id: i64,
    pub level: i64,
    #[serde(default)]
    pub children: Vec<Menu>,
}

impl HierarchyNode for Menu {
    const KIND: &'static str = "menu";

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn parent_id(&self) -> i64 {
        self.parent_id
    }
    fn set_parent_id(&mut self, parent_id: i64) {
        self.parent_id = parent_id;
    }
    fn level(&self) -> i64 {
        self.level
    }
    fn set_level(&mut self, level: i64) {
        self.level = level;
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn children(&self) -> &[Self] {
        &self.children
    }
    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    fn merge_editable(&mut self, patch: Self) {
        self.path = patch.path;
        self.name = patch.name;
        self.component = patch.component;
        self.redirect = patch.redirect;
        self.title = patch.title;
        self.icon = patch.icon;
        self.order_no = patch.order_no;
        self.hidden = patch.hidden;
        self.keep_alive = patch.keep_alive;
        self.parent_id = patch.parent_id;
        self.application_id = patch.application_id;
    }
}

impl SqlNode for Menu {
    const TABLE: &'static str = "menus";
    const COLUMNS: &'static [&'static str] = &[
        "path",
        "name",
        "component",
        "redirect",
        "title",
        "icon",
        "order_no",
        "hidden",
        "keep_alive",
        "parent_id",
        "application_id",
        "level",
    ];

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            path: row.try_get("path")?,
            name: row.try_get("name")?,
            component: row.try_get("component")?,
            redirect: row.try_get("redirect")?,
            title: row.try_get("title")?,
            icon: row.try_get("icon")?,
            order_no: row.try_get("order_no")?,
            hidden: row.try_get("hidden")?,
            keep_alive: row.try_get("keep_alive")?,
            parent_id: row.try_get("parent_id")?,
            application_id: row.try_get("application_id")?,
            level: row.try_get("level")?,
            children: Vec::new(),
        })
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.path.as_str())
            .bind(self.name.as_str())
            .bind(self.component.as_str())
            .bind(self.redirect.as_str())
            .bind(self.title.as_str())
            .bind(self.icon.as_str())
            .bind(self.order_no)
            .bind(self.hidden)
            .bind(self.keep_alive)
            .bind(self.parent_id)
            .bind(self.application_id)
            .bind(self.level)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPayload {
    pub path: String,
    pub name: String,
    pub component: String,
    #[serde(default)]
    pub redirect: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon: String,
    pub order_no: i64,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_keep_alive")]
    pub keep_alive: bool,
    /// Omitted on create means root; omitted on update keeps the current parent.
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub application_id: i64,
}

fn default_keep_alive() -> bool {
    true
}

impl From<MenuPayload> for Menu {
    fn from(p: MenuPayload) -> Self {
        Self {
            id: 0,
            path: p.path,
            name: p.name,
            component: p.component,
            redirect: p.redirect,
            title: p.title,
            icon: p.icon,
            order_no: p.order_no,
            hidden: p.hidden,
            keep_alive: p.keep_alive,
            parent_id: p.parent_id.unwrap_or(0),
            application_id: p.application_id,
            level: 0,
            children: Vec::new(),
        }
    }
}

/// `?name=<prefix>` filter of the tree endpoints.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NameFilter {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub page_number: i64,
    #[serde(rename = "desc")]
    pub description: String,
    pub meta: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub page_number: i64,
    #[serde(default, rename = "desc")]
    pub description: String,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    pub title: Option<String>,
    pub page_size: Option<i64>,
    pub page_number: Option<i64>,
    /// `asc` or `desc` by id.
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub page: i64,
    pub page_number: i64,
    pub total_page: i64,
    pub total: i64,
    pub data: Vec<Book>,
}
