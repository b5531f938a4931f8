// Page model
//
// In-process stand-in for the DOM of the dashboard page. Components own the elements they
// render into; every write bumps a revision so a front end can redraw.

use crate::breadcrumbs::BreadcrumbItem;
use crate::{ConsoleError, Result};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tokio::sync::watch;

/// Elements the console reads and writes, by DOM id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    RecentActivityTable,
    StatusMessage,
    Navigation,
    UpdateCheck,
}

impl ElementId {
    pub const ALL: [ElementId; 4] = [
        ElementId::StatusMessage,
        ElementId::UpdateCheck,
        ElementId::Navigation,
        ElementId::RecentActivityTable,
    ];

    pub fn dom_id(self) -> &'static str {
        match self {
            ElementId::RecentActivityTable => "recent-activity-table",
            ElementId::StatusMessage => "status-message",
            ElementId::Navigation => "navigation",
            ElementId::UpdateCheck => "updateCheck",
        }
    }

    pub fn kind(self) -> ElementKind {
        match self {
            ElementId::RecentActivityTable => ElementKind::Table,
            ElementId::StatusMessage => ElementKind::Text,
            ElementId::Navigation => ElementKind::List,
            ElementId::UpdateCheck => ElementKind::Checkbox,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Table,
    Text,
    List,
    Checkbox,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Table => "table",
            ElementKind::Text => "text",
            ElementKind::List => "list",
            ElementKind::Checkbox => "checkbox",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Table(Table),
    Text(String),
    List(Vec<BreadcrumbItem>),
    Checkbox(bool),
}

impl Element {
    fn empty(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Table => Element::Table(Table::default()),
            ElementKind::Text => Element::Text(String::new()),
            ElementKind::List => Element::List(Vec::new()),
            ElementKind::Checkbox => Element::Checkbox(false),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Table(_) => ElementKind::Table,
            Element::Text(_) => ElementKind::Text,
            Element::List(_) => ElementKind::List,
            Element::Checkbox(_) => ElementKind::Checkbox,
        }
    }
}

/// Table column: which record property it shows, its heading and relative width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub data_prop: &'static str,
    pub title: &'static str,
    pub width_percent: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Map records into rows, one cell per column, by the column's data property.
    ///
    /// Null or missing properties render as empty cells.
    pub fn from_records<T: Serialize>(columns: &[Column], records: &[T]) -> Result<Self> {
        let rows = records
            .iter()
            .map(|record| -> Result<Vec<String>> {
                let value = serde_json::to_value(record)?;
                Ok(columns
                    .iter()
                    .map(|column| cell(value.get(column.data_prop)))
                    .collect())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            columns: columns.to_vec(),
            rows,
        })
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Dashboard page
pub struct Page {
    elements: DashMap<ElementId, Element>,
    revision: watch::Sender<u64>,
}

impl Page {
    pub fn new(ids: &[ElementId]) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            elements: ids
                .iter()
                .map(|id| (*id, Element::empty(id.kind())))
                .collect(),
            revision,
        }
    }

    /// Page with every element the console uses
    pub fn standard() -> Self {
        Self::new(&ElementId::ALL)
    }

    pub fn has(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn require(&self, id: ElementId) -> Result<()> {
        if self.has(id) {
            Ok(())
        } else {
            Err(ConsoleError::MissingElement(id))
        }
    }

    pub fn set_table(&self, id: ElementId, table: Table) -> Result<()> {
        self.replace(id, Element::Table(table))
    }

    pub fn set_text(&self, id: ElementId, text: impl Into<String>) -> Result<()> {
        self.replace(id, Element::Text(text.into()))
    }

    pub fn set_list(&self, id: ElementId, items: Vec<BreadcrumbItem>) -> Result<()> {
        self.replace(id, Element::List(items))
    }

    pub fn set_checked(&self, id: ElementId, checked: bool) -> Result<()> {
        self.replace(id, Element::Checkbox(checked))
    }

    pub fn table(&self, id: ElementId) -> Result<Table> {
        self.read(id, ElementKind::Table, |element| match element {
            Element::Table(table) => Some(table.clone()),
            _ => None,
        })
    }

    pub fn text(&self, id: ElementId) -> Result<String> {
        self.read(id, ElementKind::Text, |element| match element {
            Element::Text(text) => Some(text.clone()),
            _ => None,
        })
    }

    pub fn list(&self, id: ElementId) -> Result<Vec<BreadcrumbItem>> {
        self.read(id, ElementKind::List, |element| match element {
            Element::List(items) => Some(items.clone()),
            _ => None,
        })
    }

    pub fn checked(&self, id: ElementId) -> Result<bool> {
        self.read(id, ElementKind::Checkbox, |element| match element {
            Element::Checkbox(checked) => Some(*checked),
            _ => None,
        })
    }

    /// Number of writes so far
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Watch page revisions
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Plain-text rendering of every element on the page
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for id in ElementId::ALL {
            let Some(element) = self.elements.get(&id).map(|e| e.value().clone()) else {
                continue;
            };
            match element {
                Element::Text(text) => out.push_str(&format!("Status: {text}\n")),
                Element::Checkbox(checked) => out.push_str(&format!(
                    "Auto refresh: [{}]\n",
                    if checked { "x" } else { " " }
                )),
                Element::List(items) => out.push_str(&render_trail(&items)),
                Element::Table(table) => out.push_str(&render_table(&table)),
            }
        }
        out
    }

    fn replace(&self, id: ElementId, element: Element) -> Result<()> {
        {
            let mut slot = self
                .elements
                .get_mut(&id)
                .ok_or(ConsoleError::MissingElement(id))?;
            let actual = slot.kind();
            if actual != element.kind() {
                return Err(ConsoleError::WrongElementKind {
                    id,
                    expected: element.kind(),
                    actual,
                });
            }
            *slot = element;
        }
        self.revision.send_modify(|r| *r += 1);
        Ok(())
    }

    fn read<T>(
        &self,
        id: ElementId,
        expected: ElementKind,
        f: impl FnOnce(&Element) -> Option<T>,
    ) -> Result<T> {
        let element = self
            .elements
            .get(&id)
            .ok_or(ConsoleError::MissingElement(id))?;
        f(element.value()).ok_or(ConsoleError::WrongElementKind {
            id,
            expected,
            actual: element.kind(),
        })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::standard()
    }
}

fn render_trail(items: &[BreadcrumbItem]) -> String {
    let crumbs: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(position, item)| match item.target {
            Some(_) => format!("[{position}] {}", item.label),
            None => item.label.clone(),
        })
        .collect();
    format!("Navigation: {}\n", crumbs.join(" > "))
}

fn render_table(table: &Table) -> String {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.title.len()).collect();
    for row in &table.rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };

    let mut out = String::from("Recent activity\n");
    out.push_str(&line(table.columns.iter().map(|c| c.title).collect()));
    for row in &table.rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EntityId;

    const COLUMNS: [Column; 2] = [
        Column {
            data_prop: "name",
            title: "Name",
            width_percent: 50,
        },
        Column {
            data_prop: "count",
            title: "Count",
            width_percent: 50,
        },
    ];

    #[derive(Serialize)]
    struct Row {
        name: Option<String>,
        count: u32,
    }

    #[test]
    fn test_table_from_records_maps_columns() {
        let records = vec![
            Row {
                name: Some("web".into()),
                count: 3,
            },
            Row {
                name: None,
                count: 0,
            },
        ];
        let table = Table::from_records(&COLUMNS, &records).unwrap();
        assert_eq!(table.columns, COLUMNS.to_vec());
        assert_eq!(
            table.rows,
            vec![
                vec!["web".to_string(), "3".to_string()],
                vec![String::new(), "0".to_string()],
            ]
        );
    }

    #[test]
    fn test_missing_element_is_an_error() {
        let page = Page::new(&[ElementId::StatusMessage]);
        assert!(page.has(ElementId::StatusMessage));
        assert!(matches!(
            page.require(ElementId::Navigation),
            Err(ConsoleError::MissingElement(ElementId::Navigation))
        ));
        assert!(page.set_checked(ElementId::UpdateCheck, true).is_err());
    }

    #[test]
    fn test_wrong_element_kind_is_an_error() {
        let page = Page::standard();
        let err = page
            .replace(ElementId::StatusMessage, Element::Checkbox(true))
            .unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::WrongElementKind {
                id: ElementId::StatusMessage,
                expected: ElementKind::Checkbox,
                actual: ElementKind::Text,
            }
        ));
    }

    #[test]
    fn test_writes_bump_revision() {
        let page = Page::standard();
        let rx = page.subscribe();
        assert_eq!(page.revision(), 0);

        page.set_text(ElementId::StatusMessage, "12:00:00").unwrap();
        page.set_checked(ElementId::UpdateCheck, true).unwrap();

        assert_eq!(page.revision(), 2);
        assert_eq!(*rx.borrow(), 2);
        assert_eq!(page.text(ElementId::StatusMessage).unwrap(), "12:00:00");
        assert!(page.checked(ElementId::UpdateCheck).unwrap());
    }

    #[test]
    fn test_render_text() {
        let page = Page::standard();
        page.set_text(ElementId::StatusMessage, "03:05:09").unwrap();
        page.set_list(
            ElementId::Navigation,
            vec![
                BreadcrumbItem::link(EntityId::new("1"), "Root"),
                BreadcrumbItem::current("Leaf"),
            ],
        )
        .unwrap();
        page.set_table(
            ElementId::RecentActivityTable,
            Table {
                columns: COLUMNS.to_vec(),
                rows: vec![vec!["web".into(), "3".into()]],
            },
        )
        .unwrap();

        let text = page.render_text();
        assert_eq!(
            text,
            "Status: 03:05:09\n\
             Auto refresh: [ ]\n\
             Navigation: [0] Root > Leaf\n\
             Recent activity\n\
             Name | Count\n\
             web  | 3\n"
        );
    }
}
