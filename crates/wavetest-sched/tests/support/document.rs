//! Minimal document model used as the host under test.
//!
//! Elements carry an event target, optional text and attributes, and an
//! optional invocation target (the element that receives focus when this one
//! is activated). Tree mutations deliberately fire no legacy mutation events;
//! focus changes fire `focus` on the element gaining it.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::json;
use wavetest_sched::EventTarget;

struct ElementState {
    text: String,
    attributes: HashMap<String, String>,
    children: Vec<String>,
    invokes: Option<String>,
    target: EventTarget,
}

impl ElementState {
    fn new() -> Self {
        Self {
            text: String::new(),
            attributes: HashMap::new(),
            children: Vec::new(),
            invokes: None,
            target: EventTarget::new(),
        }
    }
}

struct DocState {
    elements: HashMap<String, ElementState>,
    active: Option<String>,
}

/// The in-process host document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocState>>,
    target: EventTarget,
}

impl Document {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DocState {
                elements: HashMap::new(),
                active: None,
            })),
            target: EventTarget::new(),
        }
    }

    /// Document-level event target.
    pub fn target(&self) -> EventTarget {
        self.target.clone()
    }

    pub fn create_element(&self, id: &str) -> Element {
        self.inner
            .borrow_mut()
            .elements
            .insert(id.to_string(), ElementState::new());
        Element {
            doc: self.clone(),
            id: id.to_string(),
        }
    }

    pub fn element(&self, id: &str) -> Option<Element> {
        if self.inner.borrow().elements.contains_key(id) {
            Some(Element {
                doc: self.clone(),
                id: id.to_string(),
            })
        } else {
            None
        }
    }

    /// Id of the element that currently holds focus.
    pub fn active_element(&self) -> Option<String> {
        self.inner.borrow().active.clone()
    }

    /// Move focus to `id`, firing `focus` on the element gaining it.
    pub fn focus(&self, id: &str) {
        let target = match self.inner.borrow().elements.get(id) {
            Some(element) => element.target.clone(),
            None => return,
        };
        self.inner.borrow_mut().active = Some(id.to_string());
        target.dispatch("focus", json!({ "id": id }));
    }

    /// Activate `id`: focus it, then walk its invocation chain, focusing each
    /// linked element in declared order. Cycles stop the walk.
    pub fn activate(&self, id: &str) {
        let mut visited = HashSet::new();
        let mut current = Some(id.to_string());
        while let Some(element) = current {
            if !visited.insert(element.clone()) {
                break;
            }
            self.focus(&element);
            current = self.inner.borrow().elements.get(&element).and_then(|e| e.invokes.clone());
        }
    }

    // --- tree mutations (no legacy mutation events fire) --------------------

    pub fn append_child(&self, parent: &str, child: &str) {
        self.create_element(child);
        if let Some(state) = self.inner.borrow_mut().elements.get_mut(parent) {
            state.children.push(child.to_string());
        }
    }

    pub fn remove_element(&self, id: &str) {
        let mut state = self.inner.borrow_mut();
        state.elements.remove(id);
        for element in state.elements.values_mut() {
            element.children.retain(|c| c != id);
        }
        if state.active.as_deref() == Some(id) {
            state.active = None;
        }
    }

    pub fn set_attribute(&self, id: &str, name: &str, value: &str) {
        if let Some(state) = self.inner.borrow_mut().elements.get_mut(id) {
            state.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_text(&self, id: &str, text: &str) {
        if let Some(state) = self.inner.borrow_mut().elements.get_mut(id) {
            state.text = text.to_string();
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one element of a [`Document`].
#[derive(Clone)]
pub struct Element {
    doc: Document,
    id: String,
}

impl Element {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// This element's event target.
    pub fn target(&self) -> EventTarget {
        self.doc
            .inner
            .borrow()
            .elements
            .get(&self.id)
            .map(|e| e.target.clone())
            .unwrap_or_default()
    }

    /// Wire the invocation relationship: activating this element moves focus
    /// on to `target_id`.
    pub fn set_invokes(&self, target_id: &str) {
        if let Some(state) = self.doc.inner.borrow_mut().elements.get_mut(&self.id) {
            state.invokes = Some(target_id.to_string());
        }
    }

    pub fn text(&self) -> String {
        self.doc
            .inner
            .borrow()
            .elements
            .get(&self.id)
            .map(|e| e.text.clone())
            .unwrap_or_default()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.doc
            .inner
            .borrow()
            .elements
            .get(&self.id)
            .and_then(|e| e.attributes.get(name).cloned())
    }
}
