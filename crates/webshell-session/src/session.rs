#![forbid(unsafe_code)]

//! Socket session state machine.
//!
//! [`Session`] owns the output pane, the input history binding, and the
//! transport while connected. The host forwards socket callbacks
//! (`on_open`, `on_message`, `on_error`, `on_close`) and input key events;
//! the session answers with what changed so a materializer can update the
//! page.
//!
//! ```
//! use webshell_session::address::PageLocation;
//! use webshell_session::config::ShellConfig;
//! use webshell_session::session::{Session, ViewState};
//! use webshell_session::transport::MemoryTransport;
//!
//! let location = PageLocation::new("https:", "example.org", "/admin");
//! let config = ShellConfig::default().with_console_target("/shell");
//! let mut session = Session::<MemoryTransport>::new(config, location);
//!
//! let address = session.connect(|_| Ok(MemoryTransport::new())).unwrap();
//! assert_eq!(address, "wss://example.org/admin/shell");
//!
//! session.on_open();
//! assert_eq!(session.view_state(), ViewState::Connected);
//! session.on_message("hello & welcome").unwrap();
//! assert_eq!(session.output().len(), 1);
//! ```

use webshell_core::event::KeyEvent;
use webshell_widgets::input::{BindingOutcome, HistoryBinding, LineControl};
use webshell_widgets::json_tree::TreeLines;
use webshell_widgets::output::{OutputEntry, OutputPane, Pushed};

use crate::address::PageLocation;
use crate::config::ShellConfig;
use crate::error::{Result, ShellError};
use crate::frame::{self, Inbound};
use crate::transport::Transport;
use crate::upload::{Upload, UploadOutcome, UploadRequest};

/// Which panel the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Login panel; no open socket.
    #[default]
    Login,
    /// Console panel; socket open.
    Connected,
}

/// What an inbound frame did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// A display frame was pushed.
    Displayed(Pushed),
    /// The server asked for a file; the host should open its picker.
    UploadRequested(UploadRequest),
    /// An unrecognised control frame.
    Ignored,
}

/// One console session.
#[derive(Debug)]
pub struct Session<T> {
    config: ShellConfig,
    location: PageLocation,
    view: ViewState,
    transport: Option<T>,
    output: OutputPane,
    binding: HistoryBinding,
    pending_upload: Option<UploadRequest>,
}

impl<T: Transport> Session<T> {
    /// Create a disconnected session.
    #[must_use]
    pub fn new(config: ShellConfig, location: PageLocation) -> Self {
        let output = OutputPane::new().with_limit(config.output_limit);
        Self {
            config,
            location,
            view: ViewState::Login,
            transport: None,
            output,
            binding: HistoryBinding::new(),
            pending_upload: None,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Socket address derived from the page location and console target.
    #[must_use]
    pub fn address(&self) -> String {
        self.location.socket_address(&self.config.console_target)
    }

    /// Open a transport to [`address`](Self::address) with `open` and keep
    /// it. Returns the address.
    ///
    /// A transport that is still held is closed and dropped first, and the
    /// view returns to [`ViewState::Login`] until the host reports
    /// [`on_open`](Self::on_open) for the new one.
    pub fn connect<F>(&mut self, open: F) -> Result<String>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        if let Some(mut previous) = self.transport.take() {
            webshell_core::info!("closing previous transport");
            if let Err(err) = previous.close() {
                webshell_core::warn!(error = %err, "previous transport failed to close");
            }
            self.view = ViewState::Login;
        }
        let address = self.address();
        webshell_core::info!(%address, "connecting");
        self.transport = Some(open(&address)?);
        Ok(address)
    }

    /// Socket opened: show the console and clear previous output.
    pub fn on_open(&mut self) {
        webshell_core::info!("socket open");
        self.view = ViewState::Connected;
        self.output.clear();
    }

    /// Route one inbound frame.
    ///
    /// Malformed display JSON and malformed upload directives are logged,
    /// dropped, and returned as errors. Nothing is pushed for them.
    pub fn on_message(&mut self, frame: &str) -> Result<MessageOutcome> {
        let result = self.route(frame);
        if let Err(err) = &result {
            webshell_core::warn!(error = %err, "dropping frame");
        }
        result
    }

    fn route(&mut self, frame: &str) -> Result<MessageOutcome> {
        match frame::parse_inbound(frame)? {
            Inbound::Display(data) => {
                webshell_core::debug!(len = data.len(), "display frame");
                frame::push(&mut self.output, data).map(MessageOutcome::Displayed)
            }
            Inbound::Upload(directive) => {
                let request = directive.resolve(&self.location.pathname, &self.config.upload_field);
                webshell_core::debug!(url = %request.url, "upload requested");
                self.pending_upload = Some(request.clone());
                Ok(MessageOutcome::UploadRequested(request))
            }
            Inbound::UnknownControl(control) => {
                webshell_core::debug!(frame = control, "ignoring control frame");
                Ok(MessageOutcome::Ignored)
            }
        }
    }

    /// Transport error. Logged only; the host reports the close separately.
    pub fn on_error(&mut self, detail: &str) {
        webshell_core::warn!(detail, "socket error");
    }

    /// Socket closed: drop the transport and show the login panel.
    pub fn on_close(&mut self) {
        webshell_core::info!("socket closed");
        self.transport = None;
        self.view = ViewState::Login;
    }

    /// Ask the transport to close.
    pub fn close(&mut self) -> Result<()> {
        self.transport.as_mut().ok_or(ShellError::NotConnected)?.close()
    }

    /// Whether a transport is held.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Current panel.
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.view
    }

    /// Send the control's text and clear it.
    ///
    /// Without a transport this does nothing and returns `Ok(false)`.
    pub fn send<C: LineControl + ?Sized>(&mut self, control: &mut C) -> Result<bool> {
        send_on(&mut self.transport, control)
    }

    /// Feed an input key event through the history binding. Enter with text
    /// sends it.
    pub fn handle_input_key<C: LineControl + ?Sized>(
        &mut self,
        key: &KeyEvent,
        control: &mut C,
    ) -> Result<BindingOutcome> {
        let transport = &mut self.transport;
        let mut sent = Ok(false);
        let outcome = self
            .binding
            .handle_key(key, control, |c| sent = send_on(transport, c));
        sent.map(|_| outcome)
    }

    /// The input history binding.
    #[must_use]
    pub fn binding(&self) -> &HistoryBinding {
        &self.binding
    }

    /// Push display data through the push contract.
    pub fn push(&mut self, data: &str) -> Result<Pushed> {
        frame::push(&mut self.output, data)
    }

    /// The output pane.
    #[must_use]
    pub fn output(&self) -> &OutputPane {
        &self.output
    }

    /// The output pane, mutably (e.g. to toggle a tree node).
    pub fn output_mut(&mut self) -> &mut OutputPane {
        &mut self.output
    }

    /// Plain-text view of the output pane, newest entry first.
    ///
    /// Trees are pretty-printed with the configured indent; other entries
    /// appear as stored.
    #[must_use]
    pub fn transcript(&self) -> String {
        let lines = TreeLines::new().with_indent(self.config.tree_indent);
        self.output
            .iter()
            .map(|(_, entry)| match entry {
                OutputEntry::Tree(root) => lines.text(root),
                OutputEntry::Markup(s) | OutputEntry::Text(s) | OutputEntry::Status(s) => s.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The most recent upload directive, if no upload has started since.
    #[must_use]
    pub fn pending_upload(&self) -> Option<&UploadRequest> {
        self.pending_upload.as_ref()
    }

    /// Start uploading a chosen file.
    ///
    /// Uses the pending directive if there is one, else the defaults.
    pub fn begin_upload(&mut self) -> (Upload, Pushed) {
        let request = self.pending_upload.take().unwrap_or_else(|| UploadRequest {
            url: self.location.pathname.clone(),
            field: self.config.upload_field.clone(),
        });
        Upload::begin(&mut self.output, request)
    }

    /// Report upload progress. Returns the new status text.
    pub fn upload_progress(&mut self, upload: &Upload, loaded: u64, total: u64) -> Option<String> {
        upload.progress(&mut self.output, loaded, total)
    }

    /// Report upload completion.
    pub fn finish_upload(&mut self, upload: Upload, status: u16, body: &str) -> UploadOutcome {
        let outcome = upload.finish(&mut self.output, status, body);
        if let Err(err) = &outcome.pushed {
            webshell_core::warn!(error = %err, "dropping upload response");
        }
        outcome
    }
}

fn send_on<T, C>(transport: &mut Option<T>, control: &mut C) -> Result<bool>
where
    T: Transport,
    C: LineControl + ?Sized,
{
    let Some(transport) = transport.as_mut() else {
        webshell_core::debug!("send ignored while disconnected");
        return Ok(false);
    };
    transport.send_text(&control.value())?;
    control.set_value("");
    Ok(true)
}
