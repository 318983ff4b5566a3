//! System clipboard access for the copy action

use anyhow::{Context, Result};
use tracing::debug;

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard backed by `arboard`, opened on first use.
///
/// Headless sessions have no clipboard; opening fails there and every copy
/// reports an error that callers swallow.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
            self.inner = Some(clipboard);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            anyhow::bail!("Clipboard unavailable");
        };

        clipboard
            .set_text(text.to_string())
            .context("Failed to write clipboard")?;
        debug!(bytes = text.len(), "Copied snippet to clipboard");
        Ok(())
    }
}

/// In-memory clipboard for tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    pub fail: bool,
}

#[cfg(test)]
impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("no display");
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}
