//! Project case-study modal.

use web_sys::{Document, Element};

use crate::dom::{self, Overlay};
use crate::error::Result;
use crate::projects::{self, ProjectRecord};

const TRIGGER_SELECTOR: &str = ".tile-cta";
const PROJECT_ID_ATTR: &str = "data-project-id";

#[derive(Clone, Debug)]
pub struct Modal {
    overlay: Overlay,
    doc: Document,
    title: Option<Element>,
    subtitle: Option<Element>,
    description: Option<Element>,
    tech_list: Option<Element>,
    link: Option<Element>,
}

impl Modal {
    pub fn find(doc: &Document) -> Option<Self> {
        let overlay = Overlay::new(doc.get_element_by_id("modal-overlay")?);
        Some(Self {
            overlay,
            doc: doc.clone(),
            title: doc.get_element_by_id("modal-title"),
            subtitle: doc.get_element_by_id("modal-subtitle"),
            description: doc.get_element_by_id("modal-description"),
            tech_list: doc.get_element_by_id("modal-tech-list"),
            link: doc.get_element_by_id("modal-link"),
        })
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Shows the record for `project_id`. Unknown ids leave the modal untouched.
    pub fn show(&self, project_id: &str) -> bool {
        let Some(record) = projects::lookup(project_id) else { return false };
        self.populate(record);
        self.overlay.open();
        true
    }

    pub fn close(&self) {
        self.overlay.close();
    }

    fn populate(&self, record: &ProjectRecord) {
        let text_fields = [
            (&self.title, record.title),
            (&self.subtitle, record.subtitle),
            (&self.description, record.description),
        ];
        for (el, text) in text_fields {
            if let Some(el) = el {
                el.set_text_content(Some(text));
            }
        }
        if let Some(link) = &self.link {
            link.set_attribute("href", record.link).ok();
        }
        if let Some(list) = &self.tech_list {
            list.set_inner_html("");
            for tech in record.tech.iter().copied() {
                if let Ok(li) = self.doc.create_element("li") {
                    li.set_text_content(Some(tech));
                    list.append_child(&li).ok();
                }
            }
        }
    }
}

pub fn install(doc: &Document) -> Result<Option<Modal>> {
    let Some(modal) = Modal::find(doc) else { return Ok(None) };

    for trigger in dom::query_all(doc, TRIGGER_SELECTOR) {
        let m = modal.clone();
        let t = trigger.clone();
        dom::listen(&trigger, "click", move |_| {
            if let Some(id) = t.get_attribute(PROJECT_ID_ATTR) {
                m.show(&id);
            }
        })?;
    }
    if let Some(close_btn) = doc.get_element_by_id("modal-close") {
        let m = modal.clone();
        dom::listen(&close_btn, "click", move |_| m.close())?;
    }
    modal.overlay().close_on_backdrop()?;
    Ok(Some(modal))
}
