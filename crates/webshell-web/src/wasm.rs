#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    ClipboardEvent, CloseEvent, Event, File, FormData, KeyboardEvent, MessageEvent, ProgressEvent,
    WebSocket, XmlHttpRequest,
};
use webshell_core::event::KeyEventKind;
use webshell_session::clipboard;
use webshell_session::editor::{self, EditorState, SaveOutcome, ShortcutAction};
use webshell_session::{
    Editor, MessageOutcome, PageLocation, Result as ShellResult, Session, ShellConfig, ShellError,
    Transport, Upload,
};
use webshell_widgets::output::Pushed;

use crate::dom::{self, DomInput, OutputView, Page};

#[wasm_bindgen]
extern "C" {
    /// The markdown editor widget loaded by the page.
    #[wasm_bindgen(js_name = SimpleMDE)]
    type SimpleMde;

    #[wasm_bindgen(constructor, js_class = "SimpleMDE", catch)]
    fn new(options: &JsValue) -> Result<SimpleMde, JsValue>;

    #[wasm_bindgen(method)]
    fn value(this: &SimpleMde) -> String;

    #[wasm_bindgen(method, js_name = toTextArea)]
    fn to_text_area(this: &SimpleMde);
}

type Listener<E> = Closure<dyn FnMut(E)>;

/// `WebSocket` as a session transport.
struct SocketTransport {
    socket: WebSocket,
    _onopen: Listener<Event>,
    _onmessage: Listener<MessageEvent>,
    _onerror: Listener<Event>,
    _onclose: Listener<CloseEvent>,
}

impl Transport for SocketTransport {
    fn send_text(&mut self, text: &str) -> ShellResult<()> {
        self.socket.send_with_str(text).map_err(transport_error)
    }

    fn close(&mut self) -> ShellResult<()> {
        self.socket.close().map_err(transport_error)
    }
}

impl Drop for SocketTransport {
    /// Detach the callbacks before they are freed so a socket that outlives
    /// its transport never calls into dropped closures.
    fn drop(&mut self) {
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onerror(None);
        self.socket.set_onclose(None);
        if self.socket.ready_state() < WebSocket::CLOSING {
            let _ = self.socket.close();
        }
    }
}

fn transport_error(err: JsValue) -> ShellError {
    ShellError::Transport(describe(&err))
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

struct Shell {
    session: Session<SocketTransport>,
    editor: Editor,
    page: Page,
    output: OutputView,
    mde: Option<SimpleMde>,
}

impl Shell {
    fn render_pushed(&mut self, pushed: &Pushed) -> Result<(), JsValue> {
        match self.session.output().get(pushed.id) {
            Some(entry) => self.output.insert(&self.page.document, pushed, entry),
            None => Ok(()),
        }
    }

    /// Bring the page in line with the editor state. A failed transition
    /// leaves both the state and the blocks as they were.
    fn apply_editor(&mut self) -> Result<(), JsValue> {
        let Self {
            editor, page, mde, ..
        } = self;
        editor
            .settle(|state| show_editor(page, mde, state == EditorState::Open))
            .map(|_| ())
    }
}

fn show_editor(page: &Page, mde: &mut Option<SimpleMde>, open: bool) -> Result<(), JsValue> {
    if !open {
        if let Some(widget) = mde.take() {
            widget.to_text_area();
        }
        return page.show_editor(false);
    }
    if mde.is_none() {
        let options = editor_options(page.editor_area.as_ref())?;
        *mde = Some(SimpleMde::new(&options)?);
    }
    page.show_editor(true)
}

fn editor_options(element: Option<&web_sys::Element>) -> Result<JsValue, JsValue> {
    let options = js_sys::Object::new();
    if let Some(element) = element {
        js_sys::Reflect::set(&options, &"element".into(), element)?;
    }
    js_sys::Reflect::set(&options, &"spellChecker".into(), &JsValue::FALSE)?;
    js_sys::Reflect::set(&options, &"indentWithTabs".into(), &JsValue::TRUE)?;
    js_sys::Reflect::set(&options, &"tabSize".into(), &JsValue::from_f64(4.0))?;
    Ok(options.into())
}

fn editor_available() -> bool {
    js_sys::Reflect::has(&js_sys::global(), &"SimpleMDE".into()).unwrap_or(false)
}

fn page_location() -> Result<PageLocation, JsValue> {
    let location = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .location();
    Ok(PageLocation::new(
        location.protocol()?,
        location.host()?,
        location.pathname()?,
    ))
}

/// Browser console: socket session, output pane, input history, upload and
/// markdown editor, bound to the page's elements.
#[wasm_bindgen]
pub struct WebShell {
    shell: Rc<RefCell<Shell>>,
    listeners: Vec<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl WebShell {
    /// Bind to the current page. `options` is an optional JSON-compatible
    /// object with the shell configuration fields.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<WebShell, JsValue> {
        let json = if options.is_undefined() || options.is_null() {
            String::new()
        } else {
            js_sys::JSON::stringify(&options)?
                .as_string()
                .unwrap_or_default()
        };
        let config = ShellConfig::from_json(&json)
            .map_err(|err| JsValue::from_str(&format!("invalid options: {err}")))?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let output = OutputView::new(&document)?;
        let page = Page::lookup(document)?;
        let session = Session::new(config, page_location()?);

        Ok(Self {
            shell: Rc::new(RefCell::new(Shell {
                session,
                editor: Editor::new(),
                page,
                output,
                mde: None,
            })),
            listeners: Vec::new(),
        })
    }

    /// Hide the console, wire input history, the file picker, editor
    /// shortcuts, and the copy handler. `console_target` overrides the
    /// configured socket path suffix when non-empty.
    pub fn init(&mut self, console_target: &str) -> Result<(), JsValue> {
        let (document, input, file_selector) = {
            let mut shell = self.shell.borrow_mut();
            if !console_target.is_empty() {
                let config = shell.session.config().clone().with_console_target(console_target);
                let location = page_location()?;
                shell.session = Session::new(config, location);
            }
            shell.page.hide_console()?;
            (
                shell.page.document.clone(),
                shell.page.input.clone(),
                shell.page.file_selector.clone(),
            )
        };
        dom::install_toggle_listener(&document)?;

        let weak = Rc::downgrade(&self.shell);
        self.listen(&input, "keydown", move |event: Event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                on_input_key(&weak, key);
            }
        })?;

        let weak = Rc::downgrade(&self.shell);
        self.listen(&file_selector, "change", move |event: Event| {
            let file = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            if let Some(file) = file {
                if let Err(err) = start_upload(&weak, &file) {
                    warn(&format!("upload failed to start: {}", describe(&err)));
                }
            }
        })?;

        let weak = Rc::downgrade(&self.shell);
        self.listen(&document, "keydown", move |event: Event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                on_shortcut(&weak, key, KeyEventKind::Press);
            }
        })?;

        let weak = Rc::downgrade(&self.shell);
        self.listen(&document, "keyup", move |event: Event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                on_shortcut(&weak, key, KeyEventKind::Release);
            }
        })?;

        let doc = document.clone();
        self.listen(&document, "copy", move |event: Event| {
            if let Some(event) = event.dyn_ref::<ClipboardEvent>() {
                on_copy(&doc, event);
            }
        })?;
        Ok(())
    }

    /// Open the socket.
    pub fn connect(&self) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.shell);
        let mut shell = self.shell.borrow_mut();
        shell
            .session
            .connect(|address| open_socket(address, &weak))
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        shell.page.show(shell.session.view_state())
    }

    /// Close the socket.
    #[wasm_bindgen(js_name = closeSocket)]
    pub fn close_socket(&self) -> Result<(), JsValue> {
        self.shell
            .borrow_mut()
            .session
            .close()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Push display data through the push contract.
    pub fn push(&self, data: &str) -> Result<(), JsValue> {
        let mut shell = self.shell.borrow_mut();
        let pushed = shell
            .session
            .push(data)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        shell.render_pushed(&pushed)
    }

    /// Open or close the markdown editor.
    #[wasm_bindgen(js_name = toggleEditor)]
    pub fn toggle_editor(&self) -> Result<(), JsValue> {
        if !editor_available() {
            return Ok(());
        }
        let mut shell = self.shell.borrow_mut();
        shell.editor.toggle();
        shell.apply_editor()
    }

    /// Close the editor if open.
    #[wasm_bindgen(js_name = cancelEditor)]
    pub fn cancel_editor(&self) -> Result<(), JsValue> {
        let mut shell = self.shell.borrow_mut();
        if shell.editor.cancel() {
            shell.apply_editor()?;
        }
        Ok(())
    }

    /// Post the editor content to the page path.
    #[wasm_bindgen(js_name = saveEditor)]
    pub fn save_editor(&self) -> Result<(), JsValue> {
        save_editor(&self.shell)
    }
}

impl WebShell {
    fn listen<F>(
        &mut self,
        target: &web_sys::EventTarget,
        event: &str,
        handler: F,
    ) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let listener = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
        self.listeners.push(listener);
        Ok(())
    }
}

fn open_socket(address: &str, weak: &Weak<RefCell<Shell>>) -> ShellResult<SocketTransport> {
    let socket = WebSocket::new(address).map_err(transport_error)?;

    let w = weak.clone();
    let onopen = Closure::wrap(Box::new(move |_: Event| {
        with_shell(&w, |shell| {
            shell.session.on_open();
            shell.output.clear();
            shell.page.show(shell.session.view_state())
        });
    }) as Box<dyn FnMut(Event)>);

    let w = weak.clone();
    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        let Some(frame) = event.data().as_string() else {
            return;
        };
        on_frame(&w, &frame);
    }) as Box<dyn FnMut(MessageEvent)>);

    let w = weak.clone();
    let onerror = Closure::wrap(Box::new(move |event: Event| {
        log(&format!("socket error: {}", event.type_()));
        with_shell(&w, |shell| {
            shell.session.on_error(&event.type_());
            Ok(())
        });
    }) as Box<dyn FnMut(Event)>);

    let w = weak.clone();
    let onclose = Closure::wrap(Box::new(move |event: CloseEvent| {
        log(&format!("socket closed: {} {}", event.code(), event.reason()));
        with_shell(&w, |shell| {
            shell.session.on_close();
            shell.page.show(shell.session.view_state())
        });
    }) as Box<dyn FnMut(CloseEvent)>);

    socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));

    Ok(SocketTransport {
        socket,
        _onopen: onopen,
        _onmessage: onmessage,
        _onerror: onerror,
        _onclose: onclose,
    })
}

/// Run `f` against the shell if it is still alive, logging DOM failures.
fn with_shell(weak: &Weak<RefCell<Shell>>, f: impl FnOnce(&mut Shell) -> Result<(), JsValue>) {
    let Some(shell) = weak.upgrade() else {
        return;
    };
    let Ok(mut shell) = shell.try_borrow_mut() else {
        warn("shell busy; event dropped");
        return;
    };
    if let Err(err) = f(&mut shell) {
        warn(&describe(&err));
    }
}

fn on_frame(weak: &Weak<RefCell<Shell>>, frame: &str) {
    let mut open_picker = None;
    with_shell(weak, |shell| match shell.session.on_message(frame) {
        Ok(MessageOutcome::Displayed(pushed)) => shell.render_pushed(&pushed),
        Ok(MessageOutcome::UploadRequested(_)) => {
            open_picker = Some(shell.page.file_selector.clone());
            Ok(())
        }
        Ok(MessageOutcome::Ignored) => Ok(()),
        Err(err) => {
            warn(&err.to_string());
            Ok(())
        }
    });
    // The picker dispatches events synchronously; click it outside the borrow.
    if let Some(picker) = open_picker {
        picker.click();
    }
}

fn on_input_key(weak: &Weak<RefCell<Shell>>, event: &KeyboardEvent) {
    let key = dom::key_event(event, KeyEventKind::Press);
    with_shell(weak, |shell| {
        let input = shell.page.input.clone();
        let mut control = DomInput(&input);
        shell
            .session
            .handle_input_key(&key, &mut control)
            .map(|_| ())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    });
}

fn on_shortcut(weak: &Weak<RefCell<Shell>>, event: &KeyboardEvent, kind: KeyEventKind) {
    let key = dom::key_event(event, kind);
    if key.is_release() && !editor_available() {
        return;
    }
    let Some(shell) = weak.upgrade() else {
        return;
    };

    let action = match shell.try_borrow_mut() {
        Ok(mut s) => s.editor.handle_shortcut(&key),
        Err(_) => return,
    };
    match action {
        Some(ShortcutAction::SuppressDefault) => {
            event.prevent_default();
            event.stop_propagation();
        }
        Some(ShortcutAction::Save) => {
            if let Err(err) = save_editor(&shell) {
                warn(&describe(&err));
            }
        }
        Some(ShortcutAction::Open | ShortcutAction::Close) => {
            with_shell(&Rc::downgrade(&shell), Shell::apply_editor);
        }
        None => {}
    }
}

fn on_copy(document: &web_sys::Document, event: &ClipboardEvent) {
    let Ok(Some(selection)) = document.get_selection() else {
        return;
    };
    // A text-node anchor is judged by its parent element.
    let Some(anchor) = selection.anchor_node().and_then(|node| {
        node.dyn_ref::<web_sys::Element>()
            .cloned()
            .or_else(|| node.parent_element())
    }) else {
        return;
    };
    let class_list = anchor.class_list();
    let classes: Vec<String> = (0..class_list.length())
        .filter_map(|i| class_list.item(i))
        .collect();
    let text = String::from(selection.to_string());
    let Some(normalized) =
        clipboard::copy_override(classes.iter().map(String::as_str), &text)
    else {
        return;
    };
    if let Some(data) = event.clipboard_data() {
        if data.set_data("text", &normalized).is_ok() {
            event.prevent_default();
        }
    }
}

fn save_editor(shell: &Rc<RefCell<Shell>>) -> Result<(), JsValue> {
    let request = {
        let s = shell.borrow();
        let Some(mde) = s.mde.as_ref() else {
            return Ok(());
        };
        let location = page_location()?;
        s.editor.save_request(&location.pathname, mde.value())
    };

    let xhr = XmlHttpRequest::new()?;
    xhr.open_with_async("POST", &request.url, true)?;
    xhr.set_request_header("Content-type", request.content_type)?;

    let handle = xhr.clone();
    let onload = Closure::wrap(Box::new(move |_: Event| {
        let status = handle.status().unwrap_or(0);
        let body = handle.response_text().ok().flatten().unwrap_or_default();
        if editor::handle_save_response(status, &body) == SaveOutcome::Reload {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        }
    }) as Box<dyn FnMut(Event)>);
    xhr.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    xhr.send_with_opt_str(Some(request.body.as_str()))
}

fn start_upload(weak: &Weak<RefCell<Shell>>, file: &File) -> Result<(), JsValue> {
    let Some(shell) = weak.upgrade() else {
        return Ok(());
    };
    let upload = {
        let mut s = shell.borrow_mut();
        let (upload, pushed) = s.session.begin_upload();
        s.render_pushed(&pushed)?;
        upload
    };

    let form = FormData::new()?;
    form.append_with_blob(&upload.request().field, file)?;
    let xhr = XmlHttpRequest::new()?;
    xhr.open_with_async("POST", &upload.request().url, true)?;

    let status_entry = upload.status_entry();
    let in_flight: Rc<RefCell<Option<Upload>>> = Rc::new(RefCell::new(Some(upload)));

    let w = weak.clone();
    let progress_upload = Rc::clone(&in_flight);
    let onprogress = Closure::wrap(Box::new(move |event: ProgressEvent| {
        with_shell(&w, |shell| {
            let guard = progress_upload.borrow();
            let Some(upload) = guard.as_ref() else {
                return Ok(());
            };
            let loaded = event.loaded() as u64;
            let total = event.total() as u64;
            if let Some(text) = shell.session.upload_progress(upload, loaded, total) {
                shell.output.set_text(status_entry, &text);
            }
            Ok(())
        });
    }) as Box<dyn FnMut(ProgressEvent)>);
    xhr.upload()?
        .set_onprogress(Some(onprogress.as_ref().unchecked_ref()));
    onprogress.forget();

    let w = weak.clone();
    let handle = xhr.clone();
    let ondone = Closure::wrap(Box::new(move |_: Event| {
        let Some(upload) = in_flight.borrow_mut().take() else {
            return;
        };
        let status = handle.status().unwrap_or(0);
        let body = handle.response_text().ok().flatten().unwrap_or_default();
        with_shell(&w, |shell| {
            let outcome = shell.session.finish_upload(upload, status, &body);
            shell.output.remove(outcome.removed);
            match &outcome.pushed {
                Ok(pushed) => shell.render_pushed(pushed),
                Err(err) => {
                    warn(&err.to_string());
                    Ok(())
                }
            }
        });
    }) as Box<dyn FnMut(Event)>);
    xhr.set_onload(Some(ondone.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(ondone.as_ref().unchecked_ref()));
    ondone.forget();

    xhr.send_with_opt_form_data(Some(&form))
}
