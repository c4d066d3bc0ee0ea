//! Port negotiation for the dev server.

use crate::error::{CliError, Result};
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};

/// Asks the operator whether to move to another port.
pub trait PortPrompt {
    fn confirm_alternative(&self, desired: u16, alternative: u16) -> bool;
}

/// Interactive terminal prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PortPrompt for TerminalPrompt {
    fn confirm_alternative(&self, desired: u16, _alternative: u16) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(format!(
                "Something is already running on port {}. Would you like to run the app on another port instead?",
                desired
            ))
            .default(true)
            .interact()
            .unwrap_or(false)
    }
}

/// Pick the port to listen on.
///
/// Returns `desired` if it is free. Otherwise finds the next free port and,
/// when `prompt` is present, asks whether to use it. Returns `None` when
/// there is no prompt (non-interactive) or the operator declines.
pub fn choose_port(host: &str, desired: u16, prompt: Option<&dyn PortPrompt>) -> Result<Option<u16>> {
    resolve_addr(host, desired)?;

    if is_port_free(host, desired) {
        return Ok(Some(desired));
    }

    let Some(alternative) = find_free_port(host, desired) else {
        tracing::warn!(desired, "No free port found above {}", desired);
        return Ok(None);
    };

    match prompt {
        Some(prompt) if prompt.confirm_alternative(desired, alternative) => Ok(Some(alternative)),
        Some(_) => Ok(None),
        None => {
            crate::ui::warning(&format!("Something is already running on port {}.", desired));
            Ok(None)
        }
    }
}

/// Whether a listener can bind `host:port` right now.
pub fn is_port_free(host: &str, port: u16) -> bool {
    match resolve_addr(host, port) {
        Ok(addr) => TcpListener::bind(addr).is_ok(),
        Err(_) => false,
    }
}

fn find_free_port(host: &str, desired: u16) -> Option<u16> {
    (desired.saturating_add(1)..=u16::MAX).find(|&port| is_port_free(host, port))
}

pub(crate) fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| CliError::Server(format!("Could not resolve host '{}'", host)))
}
