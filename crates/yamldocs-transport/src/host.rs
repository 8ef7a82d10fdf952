//! Host integration — pairs the server with whatever browser view the host embeds.
//!
//! A tool window's start/stop buttons map onto [`ViewerSession::start`] and
//! [`ViewerSession::stop`]; the session keeps the view pointed at the server
//! while it runs and at a blank page otherwise.

use crate::server::{local_url, StartError, WebServer};

/// Page shown while the server is stopped.
pub const BLANK_PAGE: &str = "about:blank";

/// An embedded browser the host can navigate.
pub trait BrowserView: Send + Sync {
    fn load_url(&self, url: &str);
}

/// A server plus the view that displays it.
pub struct ViewerSession<V: BrowserView> {
    server: WebServer,
    view: V,
}

impl<V: BrowserView> ViewerSession<V> {
    pub fn new(server: WebServer, view: V) -> Self {
        Self { server, view }
    }

    /// Start the server and navigate the view to it.
    /// On failure the view is left where it was.
    pub fn start(&self) -> Result<u16, StartError> {
        let port = self.server.start()?;
        self.view.load_url(&local_url(port));
        Ok(port)
    }

    /// Stop the server and blank the view.
    pub fn stop(&self) {
        self.server.stop();
        self.view.load_url(BLANK_PAGE);
    }

    /// URL for opening the UI in an external browser, while running.
    pub fn external_url(&self) -> Option<String> {
        self.server.url()
    }

    pub fn server(&self) -> &WebServer {
        &self.server
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}
