#![forbid(unsafe_code)]

//! DOM plumbing: page elements, the output list, and the collapse listener.

use std::borrow::Cow;
use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent};
use webshell_core::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
use webshell_core::listener::ListenerSlot;
use webshell_session::ViewState;
use webshell_widgets::input::LineControl;
use webshell_widgets::output::{EntryId, OutputEntry, Pushed};

use crate::markup::{self, COLLAPSED, COLLAPSIBLE};

/// Class that hides the editor or the rendered source block.
pub(crate) const EDITOR_CLOSED: &str = "editorclosed";

thread_local! {
    static TOGGLE_LISTENER: ListenerSlot<Closure<dyn FnMut(Event)>> = const { ListenerSlot::new() };
}

/// Install the document-wide collapse listener once per page.
///
/// Returns `Ok(false)` when it is already installed.
pub(crate) fn install_toggle_listener(document: &Document) -> Result<bool, JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    TOGGLE_LISTENER.with(|slot| {
        slot.try_install_with(|| {
            let listener = Closure::wrap(Box::new(on_toggle_click) as Box<dyn FnMut(Event)>);
            body.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
            Ok(listener)
        })
    })
}

fn on_toggle_click(event: Event) {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };
    if !markup::is_collapser(&target.class_name()) {
        return;
    }
    let owner = target
        .parent_element()
        .and_then(|parent| parent.get_elements_by_class_name(COLLAPSIBLE).item(0))
        .and_then(|list| list.parent_element());
    if let Some(owner) = owner {
        let _ = owner.class_list().toggle(COLLAPSED);
    }
}

/// Elements the console looks up by id.
pub(crate) struct Page {
    pub(crate) document: Document,
    main: HtmlElement,
    login: HtmlElement,
    pub(crate) input: HtmlInputElement,
    pub(crate) file_selector: HtmlInputElement,
    pub(crate) edit_block: Option<Element>,
    pub(crate) source_block: Option<Element>,
    pub(crate) editor_area: Option<Element>,
}

impl Page {
    /// Look up the page elements. The editor elements are optional.
    pub(crate) fn lookup(document: Document) -> Result<Self, JsValue> {
        let main = required(&document, "main")?.dyn_into::<HtmlElement>()?;
        let login = required(&document, "login")?.dyn_into::<HtmlElement>()?;
        let input = required(&document, "input")?.dyn_into::<HtmlInputElement>()?;
        let file_selector = required(&document, "fileSelector")?.dyn_into::<HtmlInputElement>()?;
        Ok(Self {
            edit_block: document.get_element_by_id("editblock"),
            source_block: document.get_element_by_id("sourceblock"),
            editor_area: document.get_element_by_id("editor"),
            document,
            main,
            login,
            input,
            file_selector,
        })
    }

    /// Hide the console until the socket opens.
    pub(crate) fn hide_console(&self) -> Result<(), JsValue> {
        self.main.style().set_property("visibility", "hidden")
    }

    /// Show the panel for `view`.
    pub(crate) fn show(&self, view: ViewState) -> Result<(), JsValue> {
        match view {
            ViewState::Connected => {
                self.main.style().set_property("visibility", "visible")?;
                self.login.style().set_property("display", "none")?;
                self.main.style().set_property("display", "block")
            }
            ViewState::Login => {
                self.login.style().set_property("display", "block")?;
                self.main.style().set_property("display", "none")
            }
        }
    }

    /// Swap the editor and the source block.
    pub(crate) fn show_editor(&self, open: bool) -> Result<(), JsValue> {
        let (shown, hidden) = if open {
            (&self.edit_block, &self.source_block)
        } else {
            (&self.source_block, &self.edit_block)
        };
        if let Some(el) = shown {
            el.class_list().remove_1(EDITOR_CLOSED)?;
        }
        if let Some(el) = hidden {
            el.class_list().add_1(EDITOR_CLOSED)?;
        }
        Ok(())
    }
}

fn required(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id} element")))
}

/// The `#output` list, kept in step with the session's output pane.
pub(crate) struct OutputView {
    container: Element,
    nodes: HashMap<EntryId, Element>,
}

impl OutputView {
    pub(crate) fn new(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            container: required(document, "output")?,
            nodes: HashMap::new(),
        })
    }

    /// Insert a freshly pushed entry at the top and drop evicted ones.
    pub(crate) fn insert(
        &mut self,
        document: &Document,
        pushed: &Pushed,
        entry: &OutputEntry,
    ) -> Result<(), JsValue> {
        let node = document.create_element("p")?;
        node.set_inner_html(&markup::entry_markup(entry));
        let first = self.container.first_child();
        self.container.insert_before(&node, first.as_ref())?;
        self.nodes.insert(pushed.id, node);
        for id in &pushed.evicted {
            self.remove(*id);
        }
        Ok(())
    }

    /// Replace the text of a status entry.
    pub(crate) fn set_text(&self, id: EntryId, text: &str) {
        if let Some(node) = self.nodes.get(&id) {
            node.set_text_content(Some(text));
        }
    }

    pub(crate) fn remove(&mut self, id: EntryId) {
        if let Some(node) = self.nodes.remove(&id) {
            node.remove();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.container.set_inner_html("");
        self.nodes.clear();
    }
}

/// The `#input` element as a history-bound control.
pub(crate) struct DomInput<'a>(pub(crate) &'a HtmlInputElement);

impl LineControl for DomInput<'_> {
    fn value(&self) -> Cow<'_, str> {
        Cow::Owned(self.0.value())
    }

    fn set_value(&mut self, value: &str) {
        self.0.set_value(value);
    }
}

/// Convert a DOM keyboard event.
///
/// Falls back to the legacy key code when `key` is not an ASCII character,
/// so Ctrl+S still reads as `s` on non-Latin layouts.
pub(crate) fn key_event(event: &KeyboardEvent, kind: KeyEventKind) -> KeyEvent {
    let modifiers = Modifiers::from_dom(
        event.shift_key(),
        event.alt_key(),
        event.ctrl_key(),
        event.meta_key(),
    );
    let mut key = KeyEvent::from_dom(&event.key(), modifiers, kind);
    let legacy_fallback = match &key.code {
        KeyCode::Char(c) => !c.is_ascii(),
        KeyCode::Unidentified(_) => true,
        _ => false,
    };
    if legacy_fallback {
        let legacy = KeyCode::from_legacy(event.key_code());
        if !matches!(legacy, KeyCode::Unidentified(_)) {
            key.code = legacy;
        }
    }
    key
}
